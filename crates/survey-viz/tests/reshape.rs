//! Integration tests for melt / pivot_wider.

use survey_viz::error::ReshapeError;
use survey_viz::presets::{diagnosis_recipe, survey_recipe};
use survey_viz::reshape::{melt, melt_all, pivot_wider};
use survey_viz::table::{IdColumn, WideTable};

fn small_table() -> WideTable {
    WideTable::from_labels("group", &["a", "b", "a"])
        .with_column("x", vec![1.0, 2.0, 3.0])
        .unwrap()
        .with_column("y", vec![10.0, 20.0, 30.0])
        .unwrap()
        .with_column("z", vec![-1.0, -2.0, -3.0])
        .unwrap()
}

// ---------------------------------------------------------------------------
// Cardinality and ordering
// ---------------------------------------------------------------------------

#[test]
fn diagnosis_scenario_melts_to_600_rows() {
    let wide = diagnosis_recipe().generate(100, 42).unwrap();
    let names = wide.column_names();
    let long = melt(&wide, &[IdColumn::Group], &names).unwrap();
    assert_eq!(long.nrows(), 600);
    assert_eq!(long.n_columns(), 3);
    assert_eq!(long.column_names(), vec!["diagnosis", "feature", "value"]);
}

#[test]
fn row_count_is_records_times_columns() {
    let wide = survey_recipe().generate(37, 4).unwrap();
    let names = wide.column_names();
    for k in 0..=names.len() {
        let long = melt(&wide, &[IdColumn::Record], &names[..k]).unwrap();
        assert_eq!(long.nrows(), 37 * k);
    }
}

#[test]
fn rows_follow_record_then_requested_column_order() {
    let wide = small_table();
    let long = melt(&wide, &[IdColumn::Record, IdColumn::Group], &["z", "x"]).unwrap();
    let order: Vec<(usize, &str)> = long
        .rows()
        .iter()
        .map(|r| (r.record, r.feature.as_str()))
        .collect();
    assert_eq!(
        order,
        vec![(0, "z"), (0, "x"), (1, "z"), (1, "x"), (2, "z"), (2, "x")]
    );
    assert_eq!(long.features(), &["z".to_string(), "x".to_string()]);
    assert_eq!(long.column_names(), vec!["id", "group", "feature", "value"]);
}

#[test]
fn long_values_match_wide_cells() {
    let wide = survey_recipe().generate(25, 8).unwrap();
    let long = melt_all(&wide, &[IdColumn::Record, IdColumn::Group]).unwrap();
    for row in long.rows() {
        assert_eq!(Some(row.value), wide.value(row.record, &row.feature));
        assert_eq!(long.group_label(row), wide.group_label(row.record));
    }
}

// ---------------------------------------------------------------------------
// Round trip
// ---------------------------------------------------------------------------

#[test]
fn pivot_wider_restores_the_wide_table() {
    let wide = diagnosis_recipe().generate(60, 42).unwrap();
    let long = melt_all(&wide, &[IdColumn::Group]).unwrap();
    let restored = pivot_wider(&long).unwrap();
    assert_eq!(restored, wide);
}

#[test]
fn pivot_wider_of_subset_keeps_requested_columns() {
    let wide = small_table();
    let long = melt(&wide, &[IdColumn::Record], &["y"]).unwrap();
    let restored = pivot_wider(&long).unwrap();
    assert_eq!(restored.column_names(), vec!["y"]);
    assert_eq!(restored.column("y"), wide.column("y"));
    assert_eq!(restored.group_codes(), wide.group_codes());
}

#[test]
fn pivot_wider_without_features_keeps_group_labels() {
    let wide = WideTable::from_labels("group", &["a", "b", "b"]);
    let long = melt(&wide, &[IdColumn::Group], &Vec::<String>::new()).unwrap();
    assert!(long.is_empty());
    assert_eq!(long.record_groups(), &[0, 1, 1]);

    let restored = pivot_wider(&long).unwrap();
    assert_eq!(restored.group_codes(), &[0, 1, 1]);
    assert_eq!(restored, wide);
}

// ---------------------------------------------------------------------------
// Errors and edge cases
// ---------------------------------------------------------------------------

#[test]
fn absent_column_is_invalid() {
    let wide = small_table();
    let err = melt(&wide, &[IdColumn::Group], &["x", "missing"]).unwrap_err();
    assert_eq!(err, ReshapeError::InvalidColumn("missing".to_string()));
}

#[test]
fn group_label_is_not_a_measurement_column() {
    let wide = small_table();
    assert!(matches!(
        melt(&wide, &[IdColumn::Record], &["group"]),
        Err(ReshapeError::InvalidColumn(_))
    ));
}

#[test]
fn repeated_column_is_rejected() {
    let wide = small_table();
    assert_eq!(
        melt(&wide, &[IdColumn::Group], &["x", "x"]).unwrap_err(),
        ReshapeError::DuplicateColumn("x".to_string())
    );
}

#[test]
fn empty_table_melts_to_empty_long_table() {
    let wide = diagnosis_recipe().generate(0, 42).unwrap();
    let long = melt_all(&wide, &[IdColumn::Group]).unwrap();
    assert!(long.is_empty());
    assert_eq!(long.features().len(), 6);

    let restored = pivot_wider(&long).unwrap();
    assert!(restored.is_empty());
    assert_eq!(restored.n_numeric(), 6);
}

#[test]
fn empty_table_still_checks_column_names() {
    let wide = diagnosis_recipe().generate(0, 42).unwrap();
    assert!(matches!(
        melt(&wide, &[IdColumn::Group], &["nope"]),
        Err(ReshapeError::InvalidColumn(_))
    ));
}

#[test]
fn repeated_id_columns_are_collapsed() {
    let wide = small_table();
    let long = melt(&wide, &[IdColumn::Group, IdColumn::Group], &["x"]).unwrap();
    assert_eq!(long.n_columns(), 3);
}
