//! Integration tests for the tutorial runner and the generate command.

use std::io::Write;
use std::str::FromStr;

use survey_viz::config::{load_tutorial_config, GeneratorConfig, PlotKind, TipsSource, TutorialConfig};
use survey_viz::generator::{Distribution, Recipe, Transform};
use survey_viz_cli::generate::{generate_tables, Dataset};
use survey_viz_cli::tutorial::{build_plot, prepare_datasets, render_tutorial};

const TIPS_CSV: &str = "total_bill,tip,sex,day\n\
                        10,1,Female,Sun\n12,2,Female,Sun\n20,3,Male,Sun\n15,2,Male,Sun\n\
                        11,1.5,Female,Sat\n18,2.5,Male,Sat\n";

fn config_in(dir: &std::path::Path) -> TutorialConfig {
    TutorialConfig {
        output_dir: dir.to_path_buf(),
        tips: TipsSource::Skip,
        diagnosis: GeneratorConfig::new(60, 42),
        survey: GeneratorConfig::new(120, 7),
        ..TutorialConfig::default()
    }
}

// ---------------------------------------------------------------------------
// generate
// ---------------------------------------------------------------------------

#[test]
fn generate_writes_wide_and_long_csv() {
    let dir = tempfile::tempdir().unwrap();
    let files =
        generate_tables(Dataset::Diagnosis, &GeneratorConfig::new(100, 42), dir.path()).unwrap();
    assert_eq!(files.n_records, 100);
    assert_eq!(files.n_long_rows, 600);

    let wide = std::fs::read_to_string(&files.wide).unwrap();
    // header plus one line per record
    assert_eq!(wide.lines().count(), 101);
    assert!(wide.starts_with("id,diagnosis,radius_mean,texture_mean,perimeter_mean"));

    let long = std::fs::read_to_string(&files.long).unwrap();
    assert_eq!(long.lines().count(), 601);
    assert!(long.starts_with("id,diagnosis,feature,value"));

    let recipe: survey_viz::generator::Recipe =
        serde_json::from_str(&std::fs::read_to_string(&files.recipe).unwrap()).unwrap();
    assert_eq!(recipe.column_names().len(), 6);
}

#[test]
fn generate_zero_records_writes_headers_only() {
    let dir = tempfile::tempdir().unwrap();
    let files = generate_tables(Dataset::Survey, &GeneratorConfig::new(0, 1), dir.path()).unwrap();
    assert_eq!(files.n_long_rows, 0);
    let long = std::fs::read_to_string(&files.long).unwrap();
    assert_eq!(long.lines().count(), 1);
}

#[test]
fn dataset_parses_case_insensitively() {
    assert_eq!(Dataset::from_str("Survey"), Ok(Dataset::Survey));
    assert_eq!(Dataset::from_str("diagnosis"), Ok(Dataset::Diagnosis));
    assert!(Dataset::from_str("census").is_err());
}

// ---------------------------------------------------------------------------
// render
// ---------------------------------------------------------------------------

#[test]
fn render_without_tips_skips_the_violin() {
    let dir = tempfile::tempdir().unwrap();
    let summary = render_tutorial(&config_in(dir.path())).unwrap();
    assert_eq!(summary.rendered.len(), 8);
    assert_eq!(summary.skipped, vec![PlotKind::Violin]);

    let html = std::fs::read_to_string(&summary.report_path).unwrap();
    assert!(html.contains("Swarm plot"));
    assert!(html.contains("Regional map"));
    assert!(!html.contains("Violin plot"));
}

#[test]
fn render_with_local_tips_and_plot_files() {
    let dir = tempfile::tempdir().unwrap();
    let tips_path = dir.path().join("tips.csv");
    std::fs::File::create(&tips_path)
        .unwrap()
        .write_all(TIPS_CSV.as_bytes())
        .unwrap();

    let mut config = config_in(dir.path());
    config.tips = TipsSource::Path { path: tips_path };
    config.plots = vec![PlotKind::Violin, PlotKind::Density];
    config.write_plot_files = true;

    let summary = render_tutorial(&config).unwrap();
    assert_eq!(summary.rendered, vec![PlotKind::Violin, PlotKind::Density]);
    assert!(summary.skipped.is_empty());
    assert!(dir.path().join("violin.html").exists());
    assert!(dir.path().join("density.html").exists());

    let html = std::fs::read_to_string(&summary.report_path).unwrap();
    assert!(html.contains("mean tip %"));
    assert!(html.contains("<td>Sun</td><td>4</td>"));
    assert!(html.contains("<td>Sat</td><td>2</td>"));
}

#[test]
fn unwritable_plot_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = config_in(dir.path());
    config.plots = vec![PlotKind::Density];
    config.write_plot_files = true;
    // a directory where the chart file should go
    std::fs::create_dir(dir.path().join("density.html")).unwrap();

    let err = render_tutorial(&config).unwrap_err();
    assert!(format!("{:#}", err).contains("density.html"));
}

#[test]
fn box_chart_comes_with_quartile_table() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = config_in(dir.path());
    config.plots = vec![PlotKind::BoxJitter];
    let summary = render_tutorial(&config).unwrap();
    let html = std::fs::read_to_string(&summary.report_path).unwrap();
    assert!(html.contains("<th>median</th>"));
    assert!(html.contains("<td>perimeter_mean</td>"));
}

#[test]
fn missing_tips_file_only_skips_the_violin() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = config_in(dir.path());
    config.tips = TipsSource::Path {
        path: dir.path().join("absent.csv"),
    };
    let data = prepare_datasets(&config).unwrap();
    assert!(data.tips.is_none());
    assert!(data.tips_by_day.is_none());
    assert!(build_plot(PlotKind::Violin, &data, &config).unwrap().is_none());
    assert!(build_plot(PlotKind::Swarm, &data, &config).unwrap().is_some());
}

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

#[test]
fn config_defaults_render_every_chart() {
    let cfg = TutorialConfig::default();
    assert_eq!(cfg.plots.len(), 9);
    assert_eq!(cfg.diagnosis, GeneratorConfig::new(100, 42));
    assert!(cfg.standardize);
    assert!(matches!(cfg.tips, TipsSource::Url { .. }));
}

#[test]
fn default_tips_source_is_fetchable_in_a_default_build() {
    assert!(matches!(TutorialConfig::default().tips, TipsSource::Url { .. }));
    assert!(cfg!(feature = "remote"), "the default build must be able to fetch the tips CSV");
}

#[test]
fn invalid_custom_survey_recipe_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = config_in(dir.path());
    config.survey_recipe = Some(Recipe::new("country", vec!["Germany"]).derived(
        "trust",
        "satisfaction",
        Transform::Linear { slope: 1.0, intercept: 0.0 },
        Distribution::Normal { mean: 0.0, sd: 1.0 },
    ));
    let err = prepare_datasets(&config).err().unwrap();
    assert!(format!("{:#}", err).contains("satisfaction"));
}

#[test]
fn config_loads_partial_json() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    std::fs::write(
        &path,
        r#"{"title": "Custom", "plots": ["swarm", "map"], "tips": {"kind": "skip"}, "survey": {"n_records": 50, "seed": 3}}"#,
    )
    .unwrap();
    let cfg = load_tutorial_config(&path).unwrap();
    assert_eq!(cfg.title, "Custom");
    assert_eq!(cfg.plots, vec![PlotKind::Swarm, PlotKind::Map]);
    assert_eq!(cfg.tips, TipsSource::Skip);
    assert_eq!(cfg.survey, GeneratorConfig::new(50, 3));
    assert_eq!(cfg.diagnosis, GeneratorConfig::default());
}

#[test]
fn config_parse_errors_are_reported() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.json");
    std::fs::write(&path, "{ not json").unwrap();
    assert!(load_tutorial_config(&path).is_err());
    assert!(load_tutorial_config(dir.path().join("absent.json")).is_err());
}

#[test]
fn plot_kind_parses_names_and_rejects_unknown() {
    assert_eq!(PlotKind::from_str("box-jitter"), Ok(PlotKind::BoxJitter));
    assert_eq!(PlotKind::from_str("MAP"), Ok(PlotKind::Map));
    let err = PlotKind::from_str("pie").unwrap_err();
    assert!(err.contains("swarm"));
}
