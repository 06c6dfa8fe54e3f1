//! Column standardization so features measured on different scales can share
//! one axis in swarm and box plots.

use crate::table::WideTable;

/// Per-column mean/std, in the table's column order.
#[derive(Clone, Debug)]
pub struct Scaler {
    pub names: Vec<String>,
    pub mean: Vec<f64>,
    pub std: Vec<f64>,
}

impl Scaler {
    /// Minimum stddev to avoid division by zero when transforming.
    const MIN_STD: f64 = 1e-12;
}

/// Fit a `Scaler` from the numeric columns of a wide table.
///
/// Empty columns get mean 0 and the minimum stddev, so transforming an empty
/// table is a no-op.
pub fn fit_scaler(wide: &WideTable) -> Scaler {
    let mut names = Vec::with_capacity(wide.n_numeric());
    let mut mean = Vec::with_capacity(wide.n_numeric());
    let mut std = Vec::with_capacity(wide.n_numeric());

    for column in wide.columns() {
        let n = column.values.len() as f64;
        let m = if column.values.is_empty() {
            0.0
        } else {
            column.values.iter().sum::<f64>() / n
        };
        let var = if column.values.is_empty() {
            0.0
        } else {
            column.values.iter().map(|v| (v - m) * (v - m)).sum::<f64>() / n
        };
        names.push(column.name.clone());
        mean.push(m);
        std.push(var.sqrt().max(Scaler::MIN_STD));
    }

    Scaler { names, mean, std }
}

/// Transform every column using the provided `Scaler`. Columns the scaler was
/// not fitted on are passed through unchanged.
pub fn transform_all(wide: &WideTable, sc: &Scaler) -> WideTable {
    wide.map_columns(|name, values| match sc.names.iter().position(|n| n == name) {
        Some(idx) => values
            .iter()
            .map(|v| (v - sc.mean[idx]) / sc.std[idx])
            .collect(),
        None => values.to_vec(),
    })
}

/// Fit a scaler and return the standardized table in one call.
pub fn standardize(wide: &WideTable) -> WideTable {
    let sc = fit_scaler(wide);
    transform_all(wide, &sc)
}
