//! Wide and long observation tables.
//!
//! A `WideTable` holds one row per record: a categorical group label stored as
//! a code into an ordered level list, plus named numeric columns of equal
//! length. Record identity is the row position. A `LongTable` holds one row per
//! (record, feature) pair and is produced by `reshape::melt`.
use serde::{Deserialize, Serialize};

use crate::error::TableError;

/// Output name of the record identity column.
pub const ID_COLUMN: &str = "id";
/// Output name of the feature-name column in long tables.
pub const FEATURE_COLUMN: &str = "feature";
/// Output name of the value column in long tables.
pub const VALUE_COLUMN: &str = "value";

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub values: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WideTable {
    /// Name of the categorical label column (e.g. "diagnosis", "country").
    group_column: String,
    /// Ordered level names; group codes index into this list.
    levels: Vec<String>,
    group_codes: Vec<usize>,
    columns: Vec<Column>,
}

impl WideTable {
    /// Create a table with group labels only; numeric columns are added with
    /// `push_column`.
    pub fn new(
        group_column: impl Into<String>,
        levels: Vec<String>,
        group_codes: Vec<usize>,
    ) -> Result<Self, TableError> {
        if let Some(&bad) = group_codes.iter().find(|&&c| c >= levels.len()) {
            return Err(TableError::UnknownGroupCode(bad));
        }
        Ok(WideTable {
            group_column: group_column.into(),
            levels,
            group_codes,
            columns: Vec::new(),
        })
    }

    /// Create a table from raw labels. Levels are ordered by first appearance.
    pub fn from_labels<S: AsRef<str>>(group_column: impl Into<String>, labels: &[S]) -> Self {
        let mut levels: Vec<String> = Vec::new();
        let mut group_codes = Vec::with_capacity(labels.len());
        for label in labels {
            let label = label.as_ref();
            let code = match levels.iter().position(|l| l == label) {
                Some(code) => code,
                None => {
                    levels.push(label.to_string());
                    levels.len() - 1
                }
            };
            group_codes.push(code);
        }
        WideTable {
            group_column: group_column.into(),
            levels,
            group_codes,
            columns: Vec::new(),
        }
    }

    pub fn push_column(
        &mut self,
        name: impl Into<String>,
        values: Vec<f64>,
    ) -> Result<(), TableError> {
        let name = name.into();
        if name == self.group_column || self.columns.iter().any(|c| c.name == name) {
            return Err(TableError::DuplicateColumn(name));
        }
        if values.len() != self.nrows() {
            return Err(TableError::LengthMismatch {
                column: name,
                expected: self.nrows(),
                found: values.len(),
            });
        }
        self.columns.push(Column { name, values });
        Ok(())
    }

    /// Builder-style variant of `push_column`.
    pub fn with_column(
        mut self,
        name: impl Into<String>,
        values: Vec<f64>,
    ) -> Result<Self, TableError> {
        self.push_column(name, values)?;
        Ok(self)
    }

    pub fn nrows(&self) -> usize {
        self.group_codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.group_codes.is_empty()
    }

    /// Number of numeric measurement columns.
    pub fn n_numeric(&self) -> usize {
        self.columns.len()
    }

    /// Number of columns including the group label.
    pub fn n_columns(&self) -> usize {
        self.columns.len() + 1
    }

    pub fn group_column(&self) -> &str {
        &self.group_column
    }

    pub fn levels(&self) -> &[String] {
        &self.levels
    }

    pub fn group_codes(&self) -> &[usize] {
        &self.group_codes
    }

    pub fn group_label(&self, record: usize) -> &str {
        &self.levels[self.group_codes[record]]
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Names of the numeric columns in declaration order.
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn column(&self, name: &str) -> Option<&[f64]> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.values.as_slice())
    }

    pub fn value(&self, record: usize, column: &str) -> Option<f64> {
        self.column(column).and_then(|values| values.get(record).copied())
    }

    /// Split one column into per-level value lists, indexed by group code.
    pub fn values_by_group(&self, column: &str) -> Option<Vec<Vec<f64>>> {
        let values = self.column(column)?;
        let mut grouped = vec![Vec::new(); self.levels.len()];
        for (&code, &v) in self.group_codes.iter().zip(values) {
            grouped[code].push(v);
        }
        Some(grouped)
    }

    /// Number of records per level, indexed by group code.
    pub fn group_counts(&self) -> Vec<usize> {
        let mut counts = vec![0usize; self.levels.len()];
        for &code in &self.group_codes {
            counts[code] += 1;
        }
        counts
    }

    /// Apply `f` to every numeric column, keeping names and group labels.
    pub fn map_columns<F>(&self, mut f: F) -> WideTable
    where
        F: FnMut(&str, &[f64]) -> Vec<f64>,
    {
        WideTable {
            group_column: self.group_column.clone(),
            levels: self.levels.clone(),
            group_codes: self.group_codes.clone(),
            columns: self
                .columns
                .iter()
                .map(|c| Column {
                    name: c.name.clone(),
                    values: f(&c.name, &c.values),
                })
                .collect(),
        }
    }
}

/// Identity columns a long table can carry over from its wide source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdColumn {
    /// Record identity (row position in the wide table).
    Record,
    /// The categorical group label.
    Group,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LongRow {
    pub record: usize,
    pub group_code: usize,
    pub feature: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LongTable {
    pub(crate) group_column: String,
    pub(crate) levels: Vec<String>,
    pub(crate) id_columns: Vec<IdColumn>,
    pub(crate) features: Vec<String>,
    /// Group code of every source record, so labels survive even when no
    /// feature was unpivoted.
    pub(crate) record_groups: Vec<usize>,
    pub(crate) rows: Vec<LongRow>,
}

impl LongTable {
    pub fn nrows(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Number of visible columns: preserved identity columns, feature, value.
    pub fn n_columns(&self) -> usize {
        self.id_columns.len() + 2
    }

    pub fn column_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .id_columns
            .iter()
            .map(|id| match id {
                IdColumn::Record => ID_COLUMN.to_string(),
                IdColumn::Group => self.group_column.clone(),
            })
            .collect();
        names.push(FEATURE_COLUMN.to_string());
        names.push(VALUE_COLUMN.to_string());
        names
    }

    pub fn rows(&self) -> &[LongRow] {
        &self.rows
    }

    pub fn id_columns(&self) -> &[IdColumn] {
        &self.id_columns
    }

    /// Unpivoted feature names in the order they were requested.
    pub fn features(&self) -> &[String] {
        &self.features
    }

    pub fn levels(&self) -> &[String] {
        &self.levels
    }

    pub fn group_column(&self) -> &str {
        &self.group_column
    }

    /// Record count of the wide table this was melted from.
    pub fn n_records(&self) -> usize {
        self.record_groups.len()
    }

    /// Group code of each source record, indexed by record id.
    pub fn record_groups(&self) -> &[usize] {
        &self.record_groups
    }

    pub fn group_label(&self, row: &LongRow) -> &str {
        &self.levels[row.group_code]
    }

    /// Rows belonging to one level, in table order.
    pub fn rows_for_group(&self, group_code: usize) -> impl Iterator<Item = &LongRow> {
        self.rows.iter().filter(move |r| r.group_code == group_code)
    }
}
