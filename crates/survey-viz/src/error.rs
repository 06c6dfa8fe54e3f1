use std::error::Error;
use std::fmt;

/// Errors raised while assembling a `WideTable`.
#[derive(Debug, Clone, PartialEq)]
pub enum TableError {
    /// A column's length differs from the number of records.
    LengthMismatch {
        column: String,
        expected: usize,
        found: usize,
    },
    DuplicateColumn(String),
    /// A group code points past the end of the level list.
    UnknownGroupCode(usize),
}

impl fmt::Display for TableError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            TableError::LengthMismatch {
                column,
                expected,
                found,
            } => write!(
                f,
                "Column '{}' has {} values but the table has {} records",
                column, found, expected
            ),
            TableError::DuplicateColumn(name) => write!(f, "Column '{}' already exists", name),
            TableError::UnknownGroupCode(code) => {
                write!(f, "Group code {} does not refer to a known level", code)
            }
        }
    }
}

impl Error for TableError {}

/// Errors raised when a generation recipe is malformed.
#[derive(Debug, Clone, PartialEq)]
pub enum GeneratorError {
    NoLevels,
    DuplicateColumn(String),
    /// A derived step names an input that no earlier step produces.
    UnresolvedInput { column: String, input: String },
    /// A group-conditioned step lists parameters for the wrong number of levels.
    LevelCountMismatch {
        column: String,
        expected: usize,
        found: usize,
    },
    InvalidDistribution { column: String, reason: String },
}

impl fmt::Display for GeneratorError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            GeneratorError::NoLevels => write!(f, "A recipe needs at least one group level"),
            GeneratorError::DuplicateColumn(name) => {
                write!(f, "Column '{}' is generated more than once", name)
            }
            GeneratorError::UnresolvedInput { column, input } => write!(
                f,
                "Column '{}' is derived from '{}', which is not generated before it",
                column, input
            ),
            GeneratorError::LevelCountMismatch {
                column,
                expected,
                found,
            } => write!(
                f,
                "Column '{}' lists parameters for {} levels, expected {}",
                column, found, expected
            ),
            GeneratorError::InvalidDistribution { column, reason } => {
                write!(f, "Invalid distribution for column '{}': {}", column, reason)
            }
        }
    }
}

impl Error for GeneratorError {}

/// Errors raised by the long-format reshaper.
#[derive(Debug, Clone, PartialEq)]
pub enum ReshapeError {
    /// A requested measurement or identity column is absent from the table.
    InvalidColumn(String),
    /// The same column was requested twice, which would duplicate cells.
    DuplicateColumn(String),
    /// Two long rows map to the same (record, feature) cell.
    DuplicateCell { record: usize, feature: String },
    /// A (record, feature) cell has no long row.
    MissingCell { record: usize, feature: String },
}

impl fmt::Display for ReshapeError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ReshapeError::InvalidColumn(name) => {
                write!(f, "Column '{}' is not present in the table", name)
            }
            ReshapeError::DuplicateColumn(name) => {
                write!(f, "Column '{}' was requested more than once", name)
            }
            ReshapeError::DuplicateCell { record, feature } => write!(
                f,
                "Record {} has more than one value for '{}'",
                record, feature
            ),
            ReshapeError::MissingCell { record, feature } => {
                write!(f, "Record {} has no value for '{}'", record, feature)
            }
        }
    }
}

impl Error for ReshapeError {}
