//! Summary statistics behind the tutorial charts.
//!
//! Quartiles use linear interpolation between order statistics. Kernel
//! densities use a Gaussian kernel with Silverman's rule-of-thumb bandwidth
//! (R's `bw.nrd0`).
use itertools_num::linspace;
use statrs::consts::SQRT_2PI;
use statrs::statistics::Statistics;

use crate::error::ReshapeError;
use crate::table::WideTable;

/// Arithmetic mean; `NaN` for an empty slice.
pub fn mean(values: &[f64]) -> f64 {
    values.iter().mean()
}

/// Sample standard deviation (n - 1); `NaN` for fewer than two values.
pub fn std_dev(values: &[f64]) -> f64 {
    values.iter().std_dev()
}

/// Quantile of an ascending-sorted slice with linear interpolation.
///
/// Returns `None` for an empty slice.
pub fn quantile_sorted(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let q = q.clamp(0.0, 1.0);
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * frac)
}

fn sorted_finite(values: &[f64]) -> Vec<f64> {
    let mut sorted: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    sorted
}

/// Five-number summary plus Tukey whiskers and outliers.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxSummary {
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
    /// Smallest value within `q1 - 1.5 * IQR`.
    pub lower_whisker: f64,
    /// Largest value within `q3 + 1.5 * IQR`.
    pub upper_whisker: f64,
    pub outliers: Vec<f64>,
}

impl BoxSummary {
    pub fn iqr(&self) -> f64 {
        self.q3 - self.q1
    }
}

pub fn box_summary(values: &[f64]) -> Option<BoxSummary> {
    let sorted = sorted_finite(values);
    let q1 = quantile_sorted(&sorted, 0.25)?;
    let median = quantile_sorted(&sorted, 0.5)?;
    let q3 = quantile_sorted(&sorted, 0.75)?;
    let iqr = q3 - q1;
    let lo_fence = q1 - 1.5 * iqr;
    let hi_fence = q3 + 1.5 * iqr;

    let inside: Vec<f64> = sorted
        .iter()
        .copied()
        .filter(|&v| v >= lo_fence && v <= hi_fence)
        .collect();
    let outliers = sorted
        .iter()
        .copied()
        .filter(|&v| v < lo_fence || v > hi_fence)
        .collect();

    Some(BoxSummary {
        min: sorted[0],
        q1,
        median,
        q3,
        max: sorted[sorted.len() - 1],
        lower_whisker: inside.first().copied().unwrap_or(q1),
        upper_whisker: inside.last().copied().unwrap_or(q3),
        outliers,
    })
}

/// Silverman's rule of thumb: `0.9 * min(sd, IQR / 1.34) * n^(-1/5)`.
///
/// Falls back to `sd`, then `|x[0]|`, then `1.0` when the spread estimate is
/// zero. Returns `None` for an empty input.
pub fn silverman_bandwidth(values: &[f64]) -> Option<f64> {
    let sorted = sorted_finite(values);
    if sorted.is_empty() {
        return None;
    }
    let n = sorted.len() as f64;
    let sd = if sorted.len() > 1 { std_dev(&sorted) } else { 0.0 };
    let iqr = quantile_sorted(&sorted, 0.75)? - quantile_sorted(&sorted, 0.25)?;

    let mut lo = sd.min(iqr / 1.34);
    if lo <= 0.0 {
        lo = sd;
    }
    if lo <= 0.0 {
        lo = sorted[0].abs();
    }
    if lo <= 0.0 {
        lo = 1.0;
    }
    Some(0.9 * lo * n.powf(-0.2))
}

fn gaussian_kernel(u: f64) -> f64 {
    (-0.5 * u * u).exp() / SQRT_2PI
}

/// Kernel density estimate at a single point.
pub fn kde_at(values: &[f64], bandwidth: f64, x: f64) -> f64 {
    if values.is_empty() || bandwidth <= 0.0 {
        return 0.0;
    }
    let n = values.len() as f64;
    values
        .iter()
        .map(|&v| gaussian_kernel((x - v) / bandwidth))
        .sum::<f64>()
        / (n * bandwidth)
}

/// Density curve evaluated on an evenly spaced grid.
#[derive(Debug, Clone, PartialEq)]
pub struct KdeCurve {
    pub x: Vec<f64>,
    pub density: Vec<f64>,
    pub bandwidth: f64,
}

impl KdeCurve {
    pub fn max_density(&self) -> f64 {
        self.density.iter().copied().fold(0.0, f64::max)
    }
}

/// Gaussian KDE on `n_points` grid points spanning three bandwidths beyond
/// the data range.
pub fn gaussian_kde(values: &[f64], n_points: usize) -> Option<KdeCurve> {
    let bandwidth = silverman_bandwidth(values)?;
    let sorted = sorted_finite(values);
    let lo = sorted[0] - 3.0 * bandwidth;
    let hi = sorted[sorted.len() - 1] + 3.0 * bandwidth;
    let x: Vec<f64> = linspace(lo, hi, n_points.max(2)).collect();
    let density = x.iter().map(|&xi| kde_at(&sorted, bandwidth, xi)).collect();
    Some(KdeCurve {
        x,
        density,
        bandwidth,
    })
}

/// Pearson correlation coefficient.
///
/// `None` when the lengths differ, fewer than two pairs exist, or either side
/// has zero variance.
pub fn pearson(a: &[f64], b: &[f64]) -> Option<f64> {
    if a.len() != b.len() || a.len() < 2 {
        return None;
    }
    let ma = mean(a);
    let mb = mean(b);
    let mut cov = 0.0;
    let mut va = 0.0;
    let mut vb = 0.0;
    for (&x, &y) in a.iter().zip(b) {
        cov += (x - ma) * (y - mb);
        va += (x - ma) * (x - ma);
        vb += (y - mb) * (y - mb);
    }
    if va <= 0.0 || vb <= 0.0 {
        return None;
    }
    Some(cov / (va.sqrt() * vb.sqrt()))
}

#[derive(Debug, Clone, PartialEq)]
pub struct CorrelationMatrix {
    pub names: Vec<String>,
    /// Row-major, `values[i][j] = r(names[i], names[j])`; `NaN` when undefined.
    pub values: Vec<Vec<f64>>,
}

/// Pairwise Pearson correlations of the named columns.
pub fn correlation_matrix<S: AsRef<str>>(
    wide: &WideTable,
    columns: &[S],
) -> Result<CorrelationMatrix, ReshapeError> {
    let mut data = Vec::with_capacity(columns.len());
    for name in columns {
        let name = name.as_ref();
        let values = wide
            .column(name)
            .ok_or_else(|| ReshapeError::InvalidColumn(name.to_string()))?;
        data.push(values);
    }

    let k = data.len();
    let mut values = vec![vec![f64::NAN; k]; k];
    for i in 0..k {
        for j in i..k {
            let r = pearson(data[i], data[j]).unwrap_or(f64::NAN);
            values[i][j] = r;
            values[j][i] = r;
        }
    }

    Ok(CorrelationMatrix {
        names: columns.iter().map(|c| c.as_ref().to_string()).collect(),
        values,
    })
}

/// Ordinary least squares fit `y = slope * x + intercept`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
    pub r_squared: f64,
}

impl LinearFit {
    pub fn predict(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }
}

/// `None` when the lengths differ, fewer than two pairs exist, or `x` is
/// constant.
pub fn linear_fit(x: &[f64], y: &[f64]) -> Option<LinearFit> {
    if x.len() != y.len() || x.len() < 2 {
        return None;
    }
    let mx = mean(x);
    let my = mean(y);
    let mut sxy = 0.0;
    let mut sxx = 0.0;
    let mut syy = 0.0;
    for (&xi, &yi) in x.iter().zip(y) {
        sxy += (xi - mx) * (yi - my);
        sxx += (xi - mx) * (xi - mx);
        syy += (yi - my) * (yi - my);
    }
    if sxx <= 0.0 {
        return None;
    }
    let slope = sxy / sxx;
    let intercept = my - slope * mx;
    let r_squared = if syy > 0.0 {
        (sxy * sxy) / (sxx * syy)
    } else {
        1.0
    };
    Some(LinearFit {
        slope,
        intercept,
        r_squared,
    })
}

#[derive(Debug, Clone, PartialEq)]
pub struct GroupSummary {
    pub level: String,
    pub count: usize,
    pub mean: f64,
    pub std_dev: f64,
}

/// Count, mean and sample stddev of one column per group level, in level
/// order. `None` if the column is absent.
pub fn group_summaries(wide: &WideTable, column: &str) -> Option<Vec<GroupSummary>> {
    let grouped = wide.values_by_group(column)?;
    Some(
        wide.levels()
            .iter()
            .zip(grouped)
            .map(|(level, values)| GroupSummary {
                level: level.clone(),
                count: values.len(),
                mean: mean(&values),
                std_dev: std_dev(&values),
            })
            .collect(),
    )
}

/// Counts of one binned column per group level.
#[derive(Debug, Clone, PartialEq)]
pub struct CrossTab {
    /// Group levels (one row each).
    pub row_labels: Vec<String>,
    /// Bin labels (one column each).
    pub col_labels: Vec<String>,
    pub counts: Vec<Vec<usize>>,
}

impl CrossTab {
    /// Row-normalised proportions; rows without records stay at zero.
    pub fn row_shares(&self) -> Vec<Vec<f64>> {
        self.counts
            .iter()
            .map(|row| {
                let total: usize = row.iter().sum();
                row.iter()
                    .map(|&c| if total == 0 { 0.0 } else { c as f64 / total as f64 })
                    .collect()
            })
            .collect()
    }

    /// Counts of one bin across all rows, in row order.
    pub fn column_counts(&self, col: usize) -> Vec<usize> {
        self.counts.iter().map(|row| row[col]).collect()
    }
}

/// Bin `column` with the ascending `edges` and count records per (level, bin).
///
/// Bins are half-open `[e_i, e_{i+1})` except the last, which is closed.
/// Values below the first edge land in the first bin and values above the
/// last edge in the last bin. `None` if the column is absent or fewer than two
/// edges are given.
pub fn binned_crosstab(wide: &WideTable, column: &str, edges: &[f64]) -> Option<CrossTab> {
    if edges.len() < 2 {
        return None;
    }
    let values = wide.column(column)?;
    let n_bins = edges.len() - 1;
    let mut counts = vec![vec![0usize; n_bins]; wide.levels().len()];

    for (&code, &v) in wide.group_codes().iter().zip(values) {
        if !v.is_finite() {
            continue;
        }
        let bin = edges[1..n_bins]
            .iter()
            .position(|&e| v < e)
            .unwrap_or(n_bins - 1);
        counts[code][bin] += 1;
    }

    let col_labels = edges
        .windows(2)
        .map(|w| format!("{:.0}–{:.0}", w[0], w[1]))
        .collect();

    Some(CrossTab {
        row_labels: wide.levels().to_vec(),
        col_labels,
        counts,
    })
}
