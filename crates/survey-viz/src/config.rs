use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::generator::Recipe;
use crate::tips::TIPS_URL;

/// Record count and seed for one generated dataset.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeneratorConfig {
    pub n_records: usize,
    pub seed: u64,
}

impl GeneratorConfig {
    pub fn new(n_records: usize, seed: u64) -> Self {
        Self { n_records, seed }
    }
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            n_records: 100,
            seed: 42,
        }
    }
}

/// The chart categories the tutorial walks through.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum PlotKind {
    Swarm,
    Density,
    BoxJitter,
    Violin,
    BarLine,
    CorrelationHeatmap,
    ScatterRegression,
    StackedBar,
    Map,
}

impl PlotKind {
    pub const ALL: [PlotKind; 9] = [
        PlotKind::Swarm,
        PlotKind::Density,
        PlotKind::BoxJitter,
        PlotKind::Violin,
        PlotKind::BarLine,
        PlotKind::CorrelationHeatmap,
        PlotKind::ScatterRegression,
        PlotKind::StackedBar,
        PlotKind::Map,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            PlotKind::Swarm => "swarm",
            PlotKind::Density => "density",
            PlotKind::BoxJitter => "box_jitter",
            PlotKind::Violin => "violin",
            PlotKind::BarLine => "bar_line",
            PlotKind::CorrelationHeatmap => "correlation_heatmap",
            PlotKind::ScatterRegression => "scatter_regression",
            PlotKind::StackedBar => "stacked_bar",
            PlotKind::Map => "map",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            PlotKind::Swarm => "Swarm plot",
            PlotKind::Density => "Density plot",
            PlotKind::BoxJitter => "Box plot with jittered points",
            PlotKind::Violin => "Violin plot",
            PlotKind::BarLine => "Bar and line chart",
            PlotKind::CorrelationHeatmap => "Correlation heatmap",
            PlotKind::ScatterRegression => "Scatter plot with regression line",
            PlotKind::StackedBar => "Stacked bar chart",
            PlotKind::Map => "Regional map",
        }
    }
}

impl fmt::Display for PlotKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PlotKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace('-', "_");
        PlotKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.name() == normalized)
            .ok_or_else(|| {
                let valid: Vec<&str> = PlotKind::ALL.iter().map(|k| k.name()).collect();
                format!("Unknown plot kind: {}. Expected one of: {}", s, valid.join(", "))
            })
    }
}

/// Where the tips dataset for the violin chart comes from.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TipsSource {
    Path { path: PathBuf },
    /// Requires the `remote` feature.
    Url { url: String },
    /// Leave the violin chart out.
    Skip,
}

impl Default for TipsSource {
    fn default() -> Self {
        TipsSource::Url {
            url: TIPS_URL.to_string(),
        }
    }
}

/// Settings for rendering the whole tutorial.
#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(default)]
pub struct TutorialConfig {
    pub title: String,
    pub output_dir: PathBuf,
    /// Two-group measurement data (swarm, density, box, heatmap, scatter).
    pub diagnosis: GeneratorConfig,
    /// Four-country survey data (bar+line, stacked bar, map).
    pub survey: GeneratorConfig,
    /// Replaces the built-in survey recipe when set.
    pub survey_recipe: Option<Recipe>,
    pub tips: TipsSource,
    pub plots: Vec<PlotKind>,
    /// Z-score features before the swarm and box charts.
    pub standardize: bool,
    /// Also write one standalone HTML file per chart.
    pub write_plot_files: bool,
}

impl Default for TutorialConfig {
    fn default() -> Self {
        Self {
            title: "Exploring survey data with nine chart types".to_string(),
            output_dir: PathBuf::from("survey_viz_output"),
            diagnosis: GeneratorConfig::default(),
            survey: GeneratorConfig::new(500, 7),
            survey_recipe: None,
            tips: TipsSource::default(),
            plots: PlotKind::ALL.to_vec(),
            standardize: true,
            write_plot_files: false,
        }
    }
}

/// Load a tutorial configuration from a JSON file. Missing fields take their
/// defaults.
pub fn load_tutorial_config<P: AsRef<Path>>(path: P) -> Result<TutorialConfig> {
    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read config: {}", path.as_ref().display()))?;
    let config: TutorialConfig = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse config: {}", path.as_ref().display()))?;
    Ok(config)
}
