//! Integration tests for recipe validation and seeded generation.

use survey_viz::error::GeneratorError;
use survey_viz::generator::{Distribution, Recipe, Source, Transform};
use survey_viz::presets::{diagnosis_recipe, survey_recipe, PERIMETER_NOISE_SD, PERIMETER_SLOPE};

// ---------------------------------------------------------------------------
// Reproducibility
// ---------------------------------------------------------------------------

#[test]
fn same_seed_reproduces_identical_tables() {
    for n in [0usize, 1, 17, 250] {
        let a = diagnosis_recipe().generate(n, 42).unwrap();
        let b = diagnosis_recipe().generate(n, 42).unwrap();
        assert_eq!(a, b, "tables differ for n = {}", n);
        for (ca, cb) in a.columns().iter().zip(b.columns()) {
            let bits_a: Vec<u64> = ca.values.iter().map(|v| v.to_bits()).collect();
            let bits_b: Vec<u64> = cb.values.iter().map(|v| v.to_bits()).collect();
            assert_eq!(bits_a, bits_b);
        }
    }
}

#[test]
fn different_seeds_give_different_tables() {
    let a = survey_recipe().generate(50, 1).unwrap();
    let b = survey_recipe().generate(50, 2).unwrap();
    assert_ne!(a.column("income"), b.column("income"));
}

// ---------------------------------------------------------------------------
// Shape and edge cases
// ---------------------------------------------------------------------------

#[test]
fn diagnosis_scenario_has_expected_shape() {
    let wide = diagnosis_recipe().generate(100, 42).unwrap();
    assert_eq!(wide.nrows(), 100);
    assert_eq!(wide.n_numeric(), 6);
    assert_eq!(wide.n_columns(), 7);
    assert_eq!(wide.levels(), &["Group A".to_string(), "Group B".to_string()]);
    for column in wide.columns() {
        assert_eq!(column.values.len(), 100);
        assert!(column.values.iter().all(|v| v.is_finite()));
    }
}

#[test]
fn zero_records_yields_empty_table_with_columns() {
    let wide = diagnosis_recipe().generate(0, 42).unwrap();
    assert!(wide.is_empty());
    assert_eq!(wide.n_numeric(), 6);
    assert!(wide.column("perimeter_mean").unwrap().is_empty());
}

#[test]
fn group_labels_only_use_declared_levels() {
    let wide = survey_recipe().generate(400, 3).unwrap();
    assert!(wide.group_codes().iter().all(|&c| c < 4));
    // 400 uniform draws over four levels leave no level empty
    assert!(wide.group_counts().iter().all(|&c| c > 0));
}

// ---------------------------------------------------------------------------
// Correlated measurements
// ---------------------------------------------------------------------------

#[test]
fn perimeter_tracks_six_times_radius() {
    let recipe = diagnosis_recipe();
    let step = recipe
        .steps
        .iter()
        .find(|s| s.name == "perimeter_mean")
        .unwrap();
    assert_eq!(step.inputs(), vec!["radius_mean"]);
    let noise_sd = match &step.source {
        Source::Derived { noise, .. } => noise.std_dev(),
        other => panic!("perimeter_mean should be derived, got {:?}", other),
    };
    assert_eq!(noise_sd, PERIMETER_NOISE_SD);

    let wide = recipe.generate(100, 42).unwrap();
    let radius = wide.column("radius_mean").unwrap();
    let perimeter = wide.column("perimeter_mean").unwrap();
    for (r, p) in radius.iter().zip(perimeter) {
        let z = (p - PERIMETER_SLOPE * r).abs() / noise_sd;
        assert!(z < 6.0, "residual of {} standard deviations", z);
    }
}

#[test]
fn group_conditioned_means_differ() {
    let wide = diagnosis_recipe().generate(1000, 11).unwrap();
    let grouped = wide.values_by_group("radius_mean").unwrap();
    let mean = |v: &Vec<f64>| v.iter().sum::<f64>() / v.len() as f64;
    assert!(mean(&grouped[1]) - mean(&grouped[0]) > 3.0);
}

#[test]
fn zero_noise_derivation_is_exact() {
    let recipe = Recipe::new("group", vec!["a", "b"])
        .independent("x", Distribution::Uniform { low: 0.0, high: 1.0 })
        .derived(
            "y",
            "x",
            Transform::Quadratic { a: 2.0, b: 1.0, c: -3.0 },
            Distribution::Normal { mean: 0.0, sd: 0.0 },
        );
    let wide = recipe.generate(20, 5).unwrap();
    for (x, y) in wide.column("x").unwrap().iter().zip(wide.column("y").unwrap()) {
        assert!((y - (2.0 * x * x + x - 3.0)).abs() < 1e-12);
    }
}

// ---------------------------------------------------------------------------
// Recipe validation
// ---------------------------------------------------------------------------

#[test]
fn derived_step_before_its_input_is_rejected() {
    let recipe = Recipe::new("group", vec!["a"])
        .derived(
            "y",
            "x",
            Transform::Linear { slope: 1.0, intercept: 0.0 },
            Distribution::Normal { mean: 0.0, sd: 1.0 },
        )
        .independent("x", Distribution::Normal { mean: 0.0, sd: 1.0 });
    assert_eq!(
        recipe.generate(10, 1),
        Err(GeneratorError::UnresolvedInput {
            column: "y".to_string(),
            input: "x".to_string()
        })
    );
}

#[test]
fn undefined_input_is_rejected() {
    let recipe = Recipe::new("group", vec!["a"]).derived(
        "concavity_mean",
        "undefined_column",
        Transform::Linear { slope: 1.0, intercept: 0.0 },
        Distribution::Normal { mean: 0.0, sd: 1.0 },
    );
    assert!(matches!(
        recipe.validate(),
        Err(GeneratorError::UnresolvedInput { .. })
    ));
}

#[test]
fn level_count_mismatch_is_rejected() {
    let recipe = Recipe::new("group", vec!["a", "b", "c"]).by_group(
        "x",
        vec![
            Distribution::Normal { mean: 0.0, sd: 1.0 },
            Distribution::Normal { mean: 1.0, sd: 1.0 },
        ],
    );
    assert_eq!(
        recipe.validate(),
        Err(GeneratorError::LevelCountMismatch {
            column: "x".to_string(),
            expected: 3,
            found: 2
        })
    );
}

#[test]
fn invalid_parameters_are_rejected() {
    let negative_sd = Recipe::new("group", vec!["a"])
        .independent("x", Distribution::Normal { mean: 0.0, sd: -1.0 });
    assert!(matches!(
        negative_sd.validate(),
        Err(GeneratorError::InvalidDistribution { .. })
    ));

    let empty_range = Recipe::new("group", vec!["a"])
        .independent("x", Distribution::Uniform { low: 2.0, high: 2.0 });
    assert!(matches!(
        empty_range.validate(),
        Err(GeneratorError::InvalidDistribution { .. })
    ));
}

#[test]
fn non_finite_parameters_are_rejected() {
    let nan_mean = Recipe::new("group", vec!["a"])
        .independent("x", Distribution::Normal { mean: f64::NAN, sd: 1.0 });
    assert!(matches!(
        nan_mean.validate(),
        Err(GeneratorError::InvalidDistribution { .. })
    ));
    assert!(nan_mean.generate(3, 1).is_err());

    let negative_sigma = Recipe::new("group", vec!["a", "b"]).by_group(
        "x",
        vec![
            Distribution::LogNormal { mu: 0.0, sigma: 1.0 },
            Distribution::LogNormal { mu: 0.0, sigma: -0.5 },
        ],
    );
    assert!(matches!(
        negative_sigma.validate(),
        Err(GeneratorError::InvalidDistribution { .. })
    ));

    let infinite_mu = Recipe::new("group", vec!["a"])
        .independent("x", Distribution::LogNormal { mu: f64::INFINITY, sigma: 1.0 });
    assert!(infinite_mu.validate().is_err());

    let nan_slope = Recipe::new("group", vec!["a"])
        .independent("x", Distribution::Normal { mean: 0.0, sd: 1.0 })
        .derived(
            "y",
            "x",
            Transform::Linear { slope: f64::NAN, intercept: 0.0 },
            Distribution::Normal { mean: 0.0, sd: 1.0 },
        );
    assert!(matches!(
        nan_slope.validate(),
        Err(GeneratorError::InvalidDistribution { ref column, .. }) if column == "y"
    ));
}

#[test]
fn duplicate_and_levelless_recipes_are_rejected() {
    let dup = Recipe::new("group", vec!["a"])
        .independent("x", Distribution::Normal { mean: 0.0, sd: 1.0 })
        .independent("x", Distribution::Normal { mean: 0.0, sd: 1.0 });
    assert_eq!(dup.validate(), Err(GeneratorError::DuplicateColumn("x".to_string())));

    let clash = Recipe::new("group", vec!["a"])
        .independent("group", Distribution::Normal { mean: 0.0, sd: 1.0 });
    assert!(clash.validate().is_err());

    let no_levels = Recipe::new("group", Vec::<String>::new());
    assert_eq!(no_levels.validate(), Err(GeneratorError::NoLevels));
}

#[test]
fn recipe_parses_from_json() {
    let json = r#"{
        "group_column": "region",
        "levels": ["North", "South"],
        "steps": [
            {"name": "x", "source": {"source": "by_group", "distributions": [
                {"kind": "normal", "mean": 0.0, "sd": 1.0},
                {"kind": "uniform", "low": 0.0, "high": 2.0}
            ]}},
            {"name": "y", "source": {"source": "derived", "input": "x",
                "transform": {"kind": "linear", "slope": 2.0, "intercept": 1.0},
                "noise": {"kind": "normal", "mean": 0.0, "sd": 0.1}}}
        ]
    }"#;
    let recipe: Recipe = serde_json::from_str(json).unwrap();
    assert_eq!(recipe.column_names(), vec!["x", "y"]);
    assert_eq!(recipe.steps[1].inputs(), vec!["x"]);
    let wide = recipe.generate(10, 9).unwrap();
    assert_eq!(wide.group_column(), "region");
    assert_eq!(wide.n_columns(), 3);
}
