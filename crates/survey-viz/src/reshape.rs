//! Wide-to-long reshaping and its inverse.
//!
//! `melt` unpivots the requested numeric columns so that plots can facet on
//! the feature name. Output rows are grouped by record order and, within a
//! record, follow the requested column order. `pivot_wider` rebuilds the wide
//! table and checks that every (record, feature) cell appears exactly once.
use std::collections::HashSet;

use crate::error::ReshapeError;
use crate::table::{IdColumn, LongRow, LongTable, WideTable, ID_COLUMN};

/// Unpivot `value_columns` of `wide` into a long table.
///
/// # Arguments
///
/// * `wide` - The wide source table.
/// * `id_columns` - Identity columns to carry over (record id and/or group label).
/// * `value_columns` - Ordered numeric column names to unpivot.
///
/// # Returns
///
/// A long table with `wide.nrows() * value_columns.len()` rows, or
/// `ReshapeError::InvalidColumn` if a requested column is absent. A wide table
/// with zero records yields an empty long table.
pub fn melt<S: AsRef<str>>(
    wide: &WideTable,
    id_columns: &[IdColumn],
    value_columns: &[S],
) -> Result<LongTable, ReshapeError> {
    let mut seen = HashSet::new();
    let mut sources = Vec::with_capacity(value_columns.len());
    for name in value_columns {
        let name = name.as_ref();
        let values = wide
            .column(name)
            .ok_or_else(|| ReshapeError::InvalidColumn(name.to_string()))?;
        if !seen.insert(name) {
            return Err(ReshapeError::DuplicateColumn(name.to_string()));
        }
        sources.push((name, values));
    }

    let mut id_seen = HashSet::new();
    let id_columns: Vec<IdColumn> = id_columns
        .iter()
        .copied()
        .filter(|id| id_seen.insert(*id))
        .collect();

    if wide.is_empty() {
        log::debug!("melt called on an empty table; returning an empty long table");
    }

    let mut rows = Vec::with_capacity(wide.nrows() * sources.len());
    for record in 0..wide.nrows() {
        let group_code = wide.group_codes()[record];
        for (name, values) in &sources {
            rows.push(LongRow {
                record,
                group_code,
                feature: name.to_string(),
                value: values[record],
            });
        }
    }

    Ok(LongTable {
        group_column: wide.group_column().to_string(),
        levels: wide.levels().to_vec(),
        id_columns,
        features: sources.iter().map(|(name, _)| name.to_string()).collect(),
        record_groups: wide.group_codes().to_vec(),
        rows,
    })
}

/// Unpivot every numeric column of `wide`, in declaration order.
pub fn melt_all(wide: &WideTable, id_columns: &[IdColumn]) -> Result<LongTable, ReshapeError> {
    melt(wide, id_columns, &wide.column_names())
}

/// Rebuild the wide table from a long table.
///
/// Columns come back in the long table's feature order. Fails when a
/// (record, feature) cell is missing or duplicated.
pub fn pivot_wider(long: &LongTable) -> Result<WideTable, ReshapeError> {
    let n_records = long.n_records();
    let n_features = long.features().len();
    let mut cells: Vec<Option<f64>> = vec![None; n_records * n_features];

    for row in long.rows() {
        let feature_idx = long
            .features()
            .iter()
            .position(|f| *f == row.feature)
            .ok_or_else(|| ReshapeError::InvalidColumn(row.feature.clone()))?;
        if row.record >= n_records {
            return Err(ReshapeError::InvalidColumn(format!(
                "{} {}",
                ID_COLUMN, row.record
            )));
        }
        let slot = &mut cells[row.record * n_features + feature_idx];
        if slot.is_some() {
            return Err(ReshapeError::DuplicateCell {
                record: row.record,
                feature: row.feature.clone(),
            });
        }
        *slot = Some(row.value);
    }

    let codes = long.record_groups().to_vec();
    let mut wide = WideTable::new(long.group_column(), long.levels().to_vec(), codes)
        .map_err(|_| ReshapeError::InvalidColumn(long.group_column().to_string()))?;
    for (feature_idx, feature) in long.features().iter().enumerate() {
        let mut values = Vec::with_capacity(n_records);
        for record in 0..n_records {
            match cells[record * n_features + feature_idx] {
                Some(v) => values.push(v),
                None => {
                    return Err(ReshapeError::MissingCell {
                        record,
                        feature: feature.clone(),
                    })
                }
            }
        }
        wide.push_column(feature.clone(), values)
            .map_err(|_| ReshapeError::DuplicateColumn(feature.clone()))?;
    }

    Ok(wide)
}
