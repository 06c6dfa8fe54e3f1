use anyhow::Result;
use clap::{Arg, ArgAction, ArgMatches, Command, ValueHint};
use log::LevelFilter;
use std::path::PathBuf;

use survey_viz::config::{load_tutorial_config, GeneratorConfig, PlotKind, TipsSource, TutorialConfig};
use survey_viz_cli::generate::{generate_tables, Dataset};
use survey_viz_cli::tutorial::render_tutorial;

fn main() -> Result<()> {
    env_logger::Builder::default()
        .filter_level(LevelFilter::Error)
        .parse_env(env_logger::Env::default().filter_or("SURVEY_VIZ_LOG", "error,survey_viz=info,survey_viz_cli=info"))
        .init();

    let matches = Command::new("survey-viz")
        .version(clap::crate_version!())
        .about("Synthetic survey data and exploratory charts")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("render")
                .about("Render the tutorial report with all (or selected) charts")
                .arg(
                    Arg::new("config")
                        .short('c')
                        .long("config")
                        .help("Path to a JSON tutorial configuration file")
                        .value_parser(clap::value_parser!(PathBuf))
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("output_dir")
                        .short('o')
                        .long("output_dir")
                        .help("Directory the report is written to. Overrides the configuration file.")
                        .value_parser(clap::value_parser!(PathBuf))
                        .value_hint(ValueHint::DirPath),
                )
                .arg(
                    Arg::new("plots")
                        .short('p')
                        .long("plots")
                        .help("Comma-separated chart kinds to render (e.g. swarm,density,map)")
                        .value_delimiter(',')
                        .value_parser(clap::value_parser!(PlotKind)),
                )
                .arg(
                    Arg::new("tips")
                        .short('t')
                        .long("tips")
                        .help("Local tips CSV for the violin chart. Overrides the configured source.")
                        .value_parser(clap::value_parser!(PathBuf))
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("seed")
                        .short('s')
                        .long("seed")
                        .help("Seed for both generated datasets")
                        .value_parser(clap::value_parser!(u64)),
                )
                .arg(
                    Arg::new("no_standardize")
                        .long("no_standardize")
                        .help("Plot raw instead of standardized measurements in the swarm and box charts")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("plot_files")
                        .long("plot_files")
                        .help("Also write one standalone HTML file per chart")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("generate")
                .about("Write a synthetic dataset as wide and long CSV files")
                .arg(
                    Arg::new("dataset")
                        .help("Dataset to generate: diagnosis or survey")
                        .required(true)
                        .value_parser(clap::value_parser!(Dataset)),
                )
                .arg(
                    Arg::new("n_records")
                        .short('n')
                        .long("n_records")
                        .help("Number of records to generate")
                        .default_value("100")
                        .value_parser(clap::value_parser!(usize)),
                )
                .arg(
                    Arg::new("seed")
                        .short('s')
                        .long("seed")
                        .help("Random seed")
                        .default_value("42")
                        .value_parser(clap::value_parser!(u64)),
                )
                .arg(
                    Arg::new("output_dir")
                        .short('o')
                        .long("output_dir")
                        .help("Directory the CSV files are written to")
                        .default_value(".")
                        .value_parser(clap::value_parser!(PathBuf))
                        .value_hint(ValueHint::DirPath),
                ),
        )
        .get_matches();

    match matches.subcommand() {
        Some(("render", render_matches)) => handle_render(render_matches)?,
        Some(("generate", generate_matches)) => handle_generate(generate_matches)?,
        _ => unreachable!(),
    }

    Ok(())
}

fn handle_render(matches: &ArgMatches) -> Result<()> {
    let mut config = match matches.get_one::<PathBuf>("config") {
        Some(path) => load_tutorial_config(path)?,
        None => TutorialConfig::default(),
    };

    if let Some(dir) = matches.get_one::<PathBuf>("output_dir") {
        config.output_dir = dir.clone();
    }
    if let Some(plots) = matches.get_many::<PlotKind>("plots") {
        config.plots = plots.copied().collect();
    }
    if let Some(path) = matches.get_one::<PathBuf>("tips") {
        config.tips = TipsSource::Path { path: path.clone() };
    }
    if let Some(&seed) = matches.get_one::<u64>("seed") {
        config.diagnosis.seed = seed;
        config.survey.seed = seed;
    }
    if matches.get_flag("no_standardize") {
        config.standardize = false;
    }
    if matches.get_flag("plot_files") {
        config.write_plot_files = true;
    }

    log::debug!("Tutorial configuration: {:?}", config);
    let summary = render_tutorial(&config)?;
    log::info!(
        "Rendered {} charts into {}",
        summary.rendered.len(),
        summary.report_path.display()
    );
    if !summary.skipped.is_empty() {
        log::warn!("Skipped charts: {:?}", summary.skipped);
    }
    Ok(())
}

fn handle_generate(matches: &ArgMatches) -> Result<()> {
    let dataset = *matches
        .get_one::<Dataset>("dataset")
        .ok_or_else(|| anyhow::anyhow!("A dataset name is required"))?;
    let n_records = *matches.get_one::<usize>("n_records").unwrap_or(&100);
    let seed = *matches.get_one::<u64>("seed").unwrap_or(&42);
    let output_dir = matches
        .get_one::<PathBuf>("output_dir")
        .cloned()
        .unwrap_or_else(|| PathBuf::from("."));

    let files = generate_tables(dataset, &GeneratorConfig::new(n_records, seed), output_dir)?;
    println!("{}", serde_json::to_string_pretty(&files)?);
    Ok(())
}
