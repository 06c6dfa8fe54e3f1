//! `generate` subcommand: write a synthetic dataset as wide and long CSVs.
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{Context, Result};
use serde::Serialize;

use survey_viz::config::GeneratorConfig;
use survey_viz::generator::Recipe;
use survey_viz::io::{write_long_csv_path, write_wide_csv_path};
use survey_viz::presets::{diagnosis_recipe, survey_recipe};
use survey_viz::reshape::melt_all;
use survey_viz::table::IdColumn;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dataset {
    Diagnosis,
    Survey,
}

impl Dataset {
    pub fn recipe(&self) -> Recipe {
        match self {
            Dataset::Diagnosis => diagnosis_recipe(),
            Dataset::Survey => survey_recipe(),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Dataset::Diagnosis => "diagnosis",
            Dataset::Survey => "survey",
        }
    }
}

impl fmt::Display for Dataset {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Dataset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "diagnosis" => Ok(Dataset::Diagnosis),
            "survey" => Ok(Dataset::Survey),
            _ => Err(format!(
                "Unknown dataset: {}. Expected 'diagnosis' or 'survey'",
                s
            )),
        }
    }
}

/// Paths of the files written by `generate_tables`.
#[derive(Debug, Clone, Serialize)]
pub struct GeneratedFiles {
    pub wide: PathBuf,
    pub long: PathBuf,
    pub recipe: PathBuf,
    pub n_records: usize,
    pub n_long_rows: usize,
}

/// Generate `dataset`, melt every numeric column, and write
/// `<name>_wide.csv`, `<name>_long.csv` and the recipe as `<name>_recipe.json`
/// into `output_dir`. The recipe file can be edited and passed back through
/// the tutorial config's `survey_recipe` field.
pub fn generate_tables<P: AsRef<Path>>(
    dataset: Dataset,
    config: &GeneratorConfig,
    output_dir: P,
) -> Result<GeneratedFiles> {
    let output_dir = output_dir.as_ref();
    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("Failed to create output directory: {}", output_dir.display()))?;

    let recipe = dataset.recipe();
    let wide = recipe
        .generate(config.n_records, config.seed)
        .with_context(|| format!("Failed to generate the {} dataset", dataset))?;
    let long = melt_all(&wide, &[IdColumn::Record, IdColumn::Group])
        .with_context(|| format!("Failed to reshape the {} dataset", dataset))?;

    let wide_path = output_dir.join(format!("{}_wide.csv", dataset.name()));
    let long_path = output_dir.join(format!("{}_long.csv", dataset.name()));
    write_wide_csv_path(&wide, &wide_path)?;
    write_long_csv_path(&long, &long_path)?;

    let recipe_path = output_dir.join(format!("{}_recipe.json", dataset.name()));
    let recipe_json =
        serde_json::to_string_pretty(&recipe).context("Failed to serialize the recipe")?;
    std::fs::write(&recipe_path, recipe_json)
        .with_context(|| format!("Failed to write recipe: {}", recipe_path.display()))?;

    log::info!(
        "Wrote {} records to {} and {} long rows to {}",
        wide.nrows(),
        wide_path.display(),
        long.nrows(),
        long_path.display()
    );

    Ok(GeneratedFiles {
        wide: wide_path,
        long: long_path,
        recipe: recipe_path,
        n_records: wide.nrows(),
        n_long_rows: long.nrows(),
    })
}
