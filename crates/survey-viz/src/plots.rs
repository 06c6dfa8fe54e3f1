//! Plotly builders for the nine tutorial charts.
//!
//! Each builder consumes a table (or a statistic computed from one) and
//! returns a `Plot`; rendering and file output are left to the caller.
use plotly::common::{AxisSide, ColorScale, ColorScalePalette, Fill, Line, Marker, Mode, TickMode};
use plotly::layout::{Axis, BarMode, Center, Layout, Mapbox, MapboxStyle};
use plotly::{Bar, BoxPlot, HeatMap, Plot, Scatter, ScatterMapbox};

use crate::geo::{MapPoint, RegionMetric};
use crate::layout::{fit_to_width, jitter, swarm_offsets};
use crate::stats::{gaussian_kde, group_summaries, linear_fit, CorrelationMatrix, CrossTab};
use crate::table::{LongTable, WideTable};
use crate::tips::TipPercentages;

const PALETTE: [&str; 8] = [
    "#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2", "#7f7f7f",
];

/// Colour assigned to a group code.
pub fn group_color(code: usize) -> &'static str {
    PALETTE[code % PALETTE.len()]
}

fn feature_axis(features: &[String], title: &str) -> Axis {
    Axis::new()
        .title(title)
        .tick_mode(TickMode::Array)
        .tick_values((0..features.len()).map(|i| i as f64).collect())
        .tick_text(features.to_vec())
}

fn missing(column: &str) -> String {
    format!("Column '{}' is not present in the table", column)
}

/// Beeswarm of every feature in a long table, coloured by group.
pub fn swarm_plot(long: &LongTable, title: &str) -> Plot {
    let mut plot = Plot::new();

    let (lo, hi) = long
        .rows()
        .iter()
        .map(|r| r.value)
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)));
    let y_spacing = if hi > lo { (hi - lo) / 60.0 } else { 1.0 };

    for (fi, feature) in long.features().iter().enumerate() {
        let rows: Vec<_> = long.rows().iter().filter(|r| r.feature == *feature).collect();
        let values: Vec<f64> = rows.iter().map(|r| r.value).collect();
        let mut offsets = swarm_offsets(&values, y_spacing, 1.0);
        fit_to_width(&mut offsets, 0.42);

        for (code, level) in long.levels().iter().enumerate() {
            let (x, y): (Vec<f64>, Vec<f64>) = rows
                .iter()
                .zip(&offsets)
                .filter(|(r, _)| r.group_code == code)
                .map(|(r, off)| (fi as f64 + off, r.value))
                .unzip();
            plot.add_trace(
                Scatter::new(x, y)
                    .mode(Mode::Markers)
                    .name(level)
                    .legend_group(level)
                    .show_legend(fi == 0)
                    .marker(Marker::new().size(4).color(group_color(code))),
            );
        }
    }

    plot.set_layout(
        Layout::new()
            .title(title)
            .x_axis(feature_axis(long.features(), "Feature"))
            .y_axis(Axis::new().title("Value")),
    );
    plot
}

/// Overlaid kernel density curves of one column, one per group.
pub fn density_plot(wide: &WideTable, column: &str, title: &str) -> Result<Plot, String> {
    let grouped = wide.values_by_group(column).ok_or_else(|| missing(column))?;

    let mut plot = Plot::new();
    for (code, (level, values)) in wide.levels().iter().zip(grouped).enumerate() {
        let Some(curve) = gaussian_kde(&values, 200) else {
            log::debug!("No values for level '{}' in '{}'; no density drawn", level, column);
            continue;
        };
        plot.add_trace(
            Scatter::new(curve.x, curve.density)
                .mode(Mode::Lines)
                .name(level)
                .fill(Fill::ToZeroY)
                .opacity(0.6)
                .line(Line::new().color(group_color(code)).width(2.0)),
        );
    }

    plot.set_layout(
        Layout::new()
            .title(title)
            .x_axis(Axis::new().title(column))
            .y_axis(Axis::new().title("Density")),
    );
    Ok(plot)
}

/// Side-by-side boxes per (feature, group) with seeded jittered points.
pub fn box_jitter_plot(long: &LongTable, title: &str, seed: u64) -> Plot {
    let mut plot = Plot::new();
    let n_levels = long.levels().len().max(1);
    let slot = 0.8 / n_levels as f64;

    for (code, level) in long.levels().iter().enumerate() {
        let shift = -0.4 + slot * (code as f64 + 0.5);
        let mut x = Vec::new();
        let mut y = Vec::new();
        for row in long.rows_for_group(code) {
            let Some(fi) = long.features().iter().position(|f| *f == row.feature) else {
                continue;
            };
            x.push(fi as f64 + shift);
            y.push(row.value);
        }

        let offsets = jitter(x.len(), slot * 0.6, seed.wrapping_add(code as u64));
        let jittered: Vec<f64> = x.iter().zip(&offsets).map(|(a, b)| a + b).collect();

        plot.add_trace(
            BoxPlot::new_xy(x, y.clone())
                .name(level)
                .marker(Marker::new().color(group_color(code))),
        );
        plot.add_trace(
            Scatter::new(jittered, y)
                .mode(Mode::Markers)
                .name(level)
                .show_legend(false)
                .opacity(0.5)
                .marker(Marker::new().size(3).color(group_color(code))),
        );
    }

    plot.set_layout(
        Layout::new()
            .title(title)
            .x_axis(feature_axis(long.features(), "Feature"))
            .y_axis(Axis::new().title("Value")),
    );
    plot
}

/// Split violins of tip percentage per day: the first sex on the left half,
/// the second on the right.
pub fn violin_plot(tips: &TipPercentages, title: &str) -> Plot {
    let curves: Vec<Vec<_>> = tips
        .values
        .iter()
        .map(|by_sex| by_sex.iter().map(|v| gaussian_kde(v, 120)).collect())
        .collect();
    let max_density = curves
        .iter()
        .flatten()
        .flatten()
        .map(|c| c.max_density())
        .fold(0.0, f64::max);
    let scale = if max_density > 0.0 { 0.45 / max_density } else { 0.0 };

    let mut plot = Plot::new();
    for (di, by_sex) in curves.iter().enumerate() {
        for (si, curve) in by_sex.iter().enumerate() {
            let Some(curve) = curve else { continue };
            let side = if si % 2 == 0 { -1.0 } else { 1.0 };
            let centre = di as f64;

            let mut x = vec![centre];
            let mut y = vec![curve.x[0]];
            x.extend(curve.density.iter().map(|d| centre + side * d * scale));
            y.extend(curve.x.iter().copied());
            x.push(centre);
            y.push(curve.x[curve.x.len() - 1]);

            let sex = &tips.sexes[si];
            plot.add_trace(
                Scatter::new(x, y)
                    .mode(Mode::Lines)
                    .name(sex)
                    .legend_group(sex)
                    .show_legend(di == 0)
                    .fill(Fill::ToSelf)
                    .line(Line::new().color(group_color(si)).width(1.0)),
            );
        }
    }

    plot.set_layout(
        Layout::new()
            .title(title)
            .x_axis(feature_axis(&tips.days, "Day"))
            .y_axis(Axis::new().title("Tip (% of total bill)")),
    );
    plot
}

/// Group means of `bar_column` as bars, with group means of `line_column` as
/// a line on a secondary axis.
pub fn bar_line_plot(
    wide: &WideTable,
    bar_column: &str,
    line_column: &str,
    title: &str,
) -> Result<Plot, String> {
    let bars = group_summaries(wide, bar_column).ok_or_else(|| missing(bar_column))?;
    let line = group_summaries(wide, line_column).ok_or_else(|| missing(line_column))?;
    let levels: Vec<String> = wide.levels().to_vec();

    let mut plot = Plot::new();
    plot.add_trace(
        Bar::new(levels.clone(), bars.iter().map(|s| s.mean).collect())
            .name(&format!("Mean {}", bar_column)),
    );
    plot.add_trace(
        Scatter::new(levels, line.iter().map(|s| s.mean).collect())
            .mode(Mode::LinesMarkers)
            .name(&format!("Mean {}", line_column))
            .y_axis("y2")
            .line(Line::new().color(group_color(1)).width(3.0)),
    );

    plot.set_layout(
        Layout::new()
            .title(title)
            .x_axis(Axis::new().title(wide.group_column()))
            .y_axis(Axis::new().title(bar_column))
            .y_axis2(
                Axis::new()
                    .title(line_column)
                    .overlaying("y")
                    .side(AxisSide::Right),
            ),
    );
    Ok(plot)
}

/// Heatmap of a correlation matrix on a diverging scale.
pub fn correlation_heatmap(matrix: &CorrelationMatrix, title: &str) -> Plot {
    let mut plot = Plot::new();
    plot.add_trace(
        HeatMap::new(matrix.names.clone(), matrix.names.clone(), matrix.values.clone())
            .color_scale(ColorScale::Palette(ColorScalePalette::RdBu)),
    );
    plot.set_layout(Layout::new().title(title));
    plot
}

/// Scatter of two columns coloured by group, with the pooled least squares
/// line.
pub fn scatter_regression_plot(
    wide: &WideTable,
    x_column: &str,
    y_column: &str,
    title: &str,
) -> Result<Plot, String> {
    let x = wide.column(x_column).ok_or_else(|| missing(x_column))?;
    let y = wide.column(y_column).ok_or_else(|| missing(y_column))?;

    let mut plot = Plot::new();
    for (code, level) in wide.levels().iter().enumerate() {
        let (gx, gy): (Vec<f64>, Vec<f64>) = wide
            .group_codes()
            .iter()
            .zip(x.iter().zip(y))
            .filter(|(c, _)| **c == code)
            .map(|(_, (&a, &b))| (a, b))
            .unzip();
        plot.add_trace(
            Scatter::new(gx, gy)
                .mode(Mode::Markers)
                .name(level)
                .marker(Marker::new().size(6).color(group_color(code))),
        );
    }

    if let Some(fit) = linear_fit(x, y) {
        let lo = x.iter().copied().fold(f64::INFINITY, f64::min);
        let hi = x.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        plot.add_trace(
            Scatter::new(vec![lo, hi], vec![fit.predict(lo), fit.predict(hi)])
                .mode(Mode::Lines)
                .name(&format!(
                    "y = {:.3}x + {:.3} (R² = {:.2})",
                    fit.slope, fit.intercept, fit.r_squared
                ))
                .line(Line::new().color("black").width(2.0)),
        );
    } else {
        log::warn!("No regression line for {} ~ {}: fit undefined", y_column, x_column);
    }

    plot.set_layout(
        Layout::new()
            .title(title)
            .x_axis(Axis::new().title(x_column))
            .y_axis(Axis::new().title(y_column)),
    );
    Ok(plot)
}

/// Stacked bars, one stack per group, one segment per bin. With `shares`
/// each stack is normalised to 100%.
pub fn stacked_bar_plot(crosstab: &CrossTab, title: &str, shares: bool) -> Plot {
    let proportions = crosstab.row_shares();
    let mut plot = Plot::new();
    for (bi, bin) in crosstab.col_labels.iter().enumerate() {
        let y: Vec<f64> = if shares {
            proportions.iter().map(|row| row[bi] * 100.0).collect()
        } else {
            crosstab.column_counts(bi).iter().map(|&c| c as f64).collect()
        };
        plot.add_trace(Bar::new(crosstab.row_labels.clone(), y).name(bin));
    }

    let y_title = if shares { "Share of respondents (%)" } else { "Respondents" };
    plot.set_layout(
        Layout::new()
            .title(title)
            .bar_mode(BarMode::Stack)
            .y_axis(Axis::new().title(y_title)),
    );
    plot
}

/// Respondent points plus one marker per region, sized by respondent count
/// and coloured by the aggregated metric.
pub fn region_map(metrics: &[RegionMetric], points: &[MapPoint], metric_name: &str, title: &str) -> Plot {
    let mut plot = Plot::new();

    if !points.is_empty() {
        plot.add_trace(
            ScatterMapbox::new(
                points.iter().map(|p| p.lat).collect::<Vec<f64>>(),
                points.iter().map(|p| p.lon).collect::<Vec<f64>>(),
            )
            .mode(Mode::Markers)
            .name("Respondents")
            .marker(Marker::new().size(4).color("grey").opacity(0.4)),
        );
    }

    let max_count = metrics.iter().map(|m| m.count).max().unwrap_or(1).max(1);
    plot.add_trace(
        ScatterMapbox::new(
            metrics.iter().map(|m| m.lat).collect::<Vec<f64>>(),
            metrics.iter().map(|m| m.lon).collect::<Vec<f64>>(),
        )
        .mode(Mode::Markers)
        .name(&format!("Mean {}", metric_name))
        .text_array(
            metrics
                .iter()
                .map(|m| format!("{}: {:.2} (n = {})", m.region, m.mean, m.count))
                .collect::<Vec<String>>(),
        )
        .marker(
            Marker::new()
                .size_array(
                    metrics
                        .iter()
                        .map(|m| 15 + 25 * m.count / max_count)
                        .collect(),
                )
                .color_array(metrics.iter().map(|m| m.mean).collect::<Vec<f64>>())
                .color_scale(ColorScale::Palette(ColorScalePalette::Viridis))
                .show_scale(true),
        ),
    );

    let n = metrics.len().max(1) as f64;
    let (lat, lon) = if metrics.is_empty() {
        (48.0, 8.0)
    } else {
        (
            metrics.iter().map(|m| m.lat).sum::<f64>() / n,
            metrics.iter().map(|m| m.lon).sum::<f64>() / n,
        )
    };
    plot.set_layout(
        Layout::new().title(title).mapbox(
            Mapbox::new()
                .style(MapboxStyle::OpenStreetMap)
                .center(Center::new(lat, lon))
                .zoom(3),
        ),
    );
    plot
}
