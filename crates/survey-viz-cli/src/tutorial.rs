//! `render` subcommand: build every chart and assemble the tutorial report.
use std::path::PathBuf;

use anyhow::{Context, Result};
use maud::{html, Markup};

use survey_viz::config::{PlotKind, TipsSource, TutorialConfig};
use survey_viz::geo::{region_metrics, respondent_points};
use survey_viz::plots;
use survey_viz::preprocessing::standardize;
use survey_viz::presets::{diagnosis_recipe, survey_recipe};
use survey_viz::report::{Report, ReportSection};
use survey_viz::reshape::melt_all;
use survey_viz::stats::{binned_crosstab, box_summary, correlation_matrix, group_summaries};
use survey_viz::table::{IdColumn, WideTable};
use survey_viz::tips::{read_tips_path, tip_percentages, tips_table, TipPercentages, TipRecord};

/// Life-satisfaction bands used by the stacked bar chart.
const SATISFACTION_EDGES: [f64; 5] = [0.0, 4.0, 6.0, 8.0, 11.0];

/// Tables every chart draws from, generated once per run.
pub struct Datasets {
    pub diagnosis: WideTable,
    pub survey: WideTable,
    pub tips: Option<TipPercentages>,
    /// Tips with `day` as the group label, for the per-day summary table.
    pub tips_by_day: Option<WideTable>,
}

#[derive(Debug, Clone)]
pub struct TutorialSummary {
    pub report_path: PathBuf,
    pub rendered: Vec<PlotKind>,
    pub skipped: Vec<PlotKind>,
}

fn load_tips(source: &TipsSource) -> Option<Vec<TipRecord>> {
    let records = match source {
        TipsSource::Skip => return None,
        TipsSource::Path { path } => read_tips_path(path),
        TipsSource::Url { url } => fetch_tips(url),
    };
    match records {
        Ok(records) => Some(records),
        Err(err) => {
            log::warn!("Tips dataset unavailable, the violin chart will be skipped: {:#}", err);
            None
        }
    }
}

#[cfg(feature = "remote")]
fn fetch_tips(url: &str) -> Result<Vec<TipRecord>> {
    survey_viz::tips::fetch_tips(url)
}

#[cfg(not(feature = "remote"))]
fn fetch_tips(url: &str) -> Result<Vec<TipRecord>> {
    anyhow::bail!(
        "Fetching {} requires the `remote` feature; pass a local CSV path instead",
        url
    )
}

pub fn prepare_datasets(config: &TutorialConfig) -> Result<Datasets> {
    let diagnosis = diagnosis_recipe()
        .generate(config.diagnosis.n_records, config.diagnosis.seed)
        .context("Failed to generate the diagnosis dataset")?;

    let recipe = match &config.survey_recipe {
        Some(custom) => {
            custom
                .validate()
                .context("The survey_recipe in the configuration is invalid")?;
            custom.clone()
        }
        None => survey_recipe(),
    };
    let survey = recipe
        .generate(config.survey.n_records, config.survey.seed)
        .context("Failed to generate the survey dataset")?;

    let needs_tips = config.plots.contains(&PlotKind::Violin);
    let records = if needs_tips { load_tips(&config.tips) } else { None };

    Ok(Datasets {
        diagnosis,
        survey,
        tips: records.as_deref().map(tip_percentages),
        tips_by_day: records.as_deref().map(tips_table),
    })
}

fn narrative(kind: PlotKind) -> &'static str {
    match kind {
        PlotKind::Swarm => {
            "A swarm plot shows every observation of every feature without overlap, so both \
             the distribution and the sample size stay visible. Features are standardized \
             first so they share one axis."
        }
        PlotKind::Density => {
            "Kernel density estimates smooth each group's distribution into a continuous \
             curve, which makes shifts in location and spread between groups easy to compare."
        }
        PlotKind::BoxJitter => {
            "Box plots summarise quartiles and flag outliers; the jittered points on top keep \
             the raw observations in view."
        }
        PlotKind::Violin => {
            "Split violins mirror one density per category on each side of the axis, here tip \
             percentages by day, split by the sex of the bill payer."
        }
        PlotKind::BarLine => {
            "Bars carry one measure per country while the line on the secondary axis shows a \
             second measure on its own scale."
        }
        PlotKind::CorrelationHeatmap => {
            "A correlation heatmap gives a one-glance overview of which measurements move \
             together. Derived measurements show up as strongly correlated pairs."
        }
        PlotKind::ScatterRegression => {
            "A scatter plot with a least squares line shows the direction and strength of the \
             relationship between two continuous measures."
        }
        PlotKind::StackedBar => {
            "Stacked bars normalised to 100% compare the composition of responses across \
             countries regardless of sample size."
        }
        PlotKind::Map => {
            "Aggregating a measure per region and placing it on a map reveals geographic \
             patterns; marker size reflects the number of respondents."
        }
    }
}

/// Numeric companion to a chart, rendered below it.
fn summary_table(kind: PlotKind, data: &Datasets) -> Option<Markup> {
    match kind {
        PlotKind::BoxJitter => {
            let rows: Vec<_> = data
                .diagnosis
                .columns()
                .iter()
                .filter_map(|c| box_summary(&c.values).map(|summary| (c.name.as_str(), summary)))
                .collect();
            if rows.is_empty() {
                return None;
            }
            Some(html! {
                table class="summary" {
                    tr { th { "feature" } th { "q1" } th { "median" } th { "q3" } th { "IQR" } th { "outliers" } }
                    @for (name, s) in &rows {
                        tr {
                            td { (name) }
                            td { (format!("{:.3}", s.q1)) }
                            td { (format!("{:.3}", s.median)) }
                            td { (format!("{:.3}", s.q3)) }
                            td { (format!("{:.3}", s.iqr())) }
                            td { (s.outliers.len()) }
                        }
                    }
                }
            })
        }
        PlotKind::Violin => {
            let by_day = data.tips_by_day.as_ref()?;
            let summaries = group_summaries(by_day, "tip_pct")?;
            Some(html! {
                table class="summary" {
                    tr { th { "day" } th { "bills" } th { "mean tip %" } th { "sd" } }
                    @for s in &summaries {
                        tr {
                            td { (s.level) }
                            td { (s.count) }
                            td { (format!("{:.1}", s.mean)) }
                            td { (format!("{:.1}", s.std_dev)) }
                        }
                    }
                }
            })
        }
        _ => None,
    }
}

/// Build the chart for `kind`, or `None` when its input is unavailable.
pub fn build_plot(
    kind: PlotKind,
    data: &Datasets,
    config: &TutorialConfig,
) -> Result<Option<plotly::Plot>> {
    let diagnosis_scaled = || {
        if config.standardize {
            standardize(&data.diagnosis)
        } else {
            data.diagnosis.clone()
        }
    };

    let plot = match kind {
        PlotKind::Swarm => {
            let long = melt_all(&diagnosis_scaled(), &[IdColumn::Group])?;
            plots::swarm_plot(&long, "Measurements by diagnosis group")
        }
        PlotKind::Density => plots::density_plot(
            &data.diagnosis,
            "radius_mean",
            "Distribution of radius_mean by group",
        )
        .map_err(anyhow::Error::msg)?,
        PlotKind::BoxJitter => {
            let long = melt_all(&diagnosis_scaled(), &[IdColumn::Record, IdColumn::Group])?;
            plots::box_jitter_plot(&long, "Measurements by diagnosis group", config.diagnosis.seed)
        }
        PlotKind::Violin => match &data.tips {
            Some(tips) => plots::violin_plot(tips, "Tip percentage by day and sex"),
            None => return Ok(None),
        },
        PlotKind::BarLine => plots::bar_line_plot(
            &data.survey,
            "income",
            "life_satisfaction",
            "Income and life satisfaction by country",
        )
        .map_err(anyhow::Error::msg)?,
        PlotKind::CorrelationHeatmap => {
            let matrix = correlation_matrix(&data.diagnosis, &data.diagnosis.column_names())?;
            plots::correlation_heatmap(&matrix, "Correlation between measurements")
        }
        PlotKind::ScatterRegression => plots::scatter_regression_plot(
            &data.survey,
            "income",
            "life_satisfaction",
            "Life satisfaction against income",
        )
        .map_err(anyhow::Error::msg)?,
        PlotKind::StackedBar => {
            let crosstab = binned_crosstab(&data.survey, "life_satisfaction", &SATISFACTION_EDGES)
                .context("Column 'life_satisfaction' is not present in the survey table")?;
            plots::stacked_bar_plot(&crosstab, "Life satisfaction bands by country", true)
        }
        PlotKind::Map => {
            let metrics = region_metrics(&data.survey, "life_satisfaction")
                .context("Column 'life_satisfaction' is not present in the survey table")?;
            let points = respondent_points(&data.survey, 1.5, config.survey.seed);
            plots::region_map(
                &metrics,
                &points,
                "life_satisfaction",
                "Mean life satisfaction by country",
            )
        }
    };
    Ok(Some(plot))
}

/// Render the selected charts into `<output_dir>/tutorial.html`.
pub fn render_tutorial(config: &TutorialConfig) -> Result<TutorialSummary> {
    std::fs::create_dir_all(&config.output_dir).with_context(|| {
        format!(
            "Failed to create output directory: {}",
            config.output_dir.display()
        )
    })?;

    let data = prepare_datasets(config)?;
    log::info!(
        "Generated {} diagnosis records and {} survey records",
        data.diagnosis.nrows(),
        data.survey.nrows()
    );
    for table in [&data.diagnosis, &data.survey] {
        log::debug!(
            "{} counts per level: {:?}",
            table.group_column(),
            table.levels().iter().zip(table.group_counts()).collect::<Vec<_>>()
        );
    }

    let mut report = Report::new(&config.title);
    report.set_intro(
        "Every chart below is drawn from freshly generated synthetic data. The generator is \
         seeded, so rerunning the tutorial reproduces the same figures.",
    );

    let mut rendered = Vec::new();
    let mut skipped = Vec::new();
    for &kind in &config.plots {
        let Some(plot) = build_plot(kind, &data, config)
            .with_context(|| format!("Failed to build the {} chart", kind))?
        else {
            log::warn!("Skipping the {} chart: input data unavailable", kind);
            skipped.push(kind);
            continue;
        };

        if config.write_plot_files {
            let path = config.output_dir.join(format!("{}.html", kind.name()));
            std::fs::write(&path, plot.to_html())
                .with_context(|| format!("Failed to write chart: {}", path.display()))?;
            log::debug!("Wrote {}", path.display());
        }

        let mut section = ReportSection::new(kind.title());
        section.add_content(html! { p { (narrative(kind)) } });
        section.add_plot(plot);
        if let Some(table) = summary_table(kind, &data) {
            section.add_content(table);
        }
        report.add_section(section);
        rendered.push(kind);
    }

    let report_path = config.output_dir.join("tutorial.html");
    report.save_to_file(&report_path)?;

    Ok(TutorialSummary {
        report_path,
        rendered,
        skipped,
    })
}
