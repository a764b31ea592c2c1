pub mod aggregate;
pub mod capability;
pub mod cli;
pub mod config;
pub mod dashboard;
pub mod data;
pub mod error;
pub mod frame;
pub mod impute;
pub mod io_utils;
pub mod load;
pub mod normalize;
pub mod report;
pub mod schema;
pub mod search;
pub mod table;

use std::{
    env,
    io::{self, Write},
    sync::OnceLock,
};

use anyhow::{Context, Result};
use clap::Parser;
use log::{LevelFilter, debug, info, warn};

use crate::{
    cli::{Cli, Commands, InputArgs},
    config::DashboardConfig,
    dashboard::SearchRequest,
    frame::Table,
    load::LoadOptions,
    report::{Report, Section, SectionBody},
    search::SearchTarget,
};

static LOGGER: OnceLock<()> = OnceLock::new();

fn init_logging() {
    LOGGER.get_or_init(|| {
        let mut builder = env_logger::Builder::from_env(env_logger::Env::default());
        if env::var("RUST_LOG").is_err() {
            builder.filter_module("drug_eda", LevelFilter::Info);
        }
        let _ = builder.format_timestamp_millis().try_init();
    });
}

pub fn run() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    match cli.command {
        Commands::Dashboard(args) => handle_dashboard(&args),
        Commands::Search(args) => handle_search(&args),
        Commands::Top(args) => handle_top(&args),
        Commands::Trend(args) => handle_trend(&args),
        Commands::Columns(args) => handle_columns(&args),
    }
}

fn handle_dashboard(args: &cli::DashboardArgs) -> Result<()> {
    let mut config = resolve_config(&args.input)?;
    if let Some(top_n) = args.top_n {
        config.top_n = top_n;
    }
    if let Some(scale) = args.scale {
        config.scale = scale;
    }
    if let Some(rows) = args.preview_rows {
        config.preview_rows = rows;
    }
    config.validate().context("Validating dashboard options")?;

    let table = load_prepared(&config, &args.input)?;
    let request = args.query.as_ref().map(|query| {
        SearchRequest::new(
            query.as_str(),
            SearchTarget::from_option(args.column.as_deref()),
        )
    });
    let report = dashboard::build_dashboard(&table, &config, request.as_ref());
    emit(&report, &args.input)
}

fn handle_search(args: &cli::SearchArgs) -> Result<()> {
    let mut config = resolve_config(&args.input)?;
    if let Some(top_n) = args.top_n {
        config.top_n = top_n;
    }
    if let Some(rows) = args.preview_rows {
        config.preview_rows = rows;
    }
    config.validate().context("Validating search options")?;

    let table = load_prepared(&config, &args.input)?;
    let target = SearchTarget::from_option(args.column.as_deref());
    info!("Searching for '{}' in {}", args.query, target);
    let request = SearchRequest::new(args.query.as_str(), target);
    let mut report = Report::new(config.title.clone());
    for section in dashboard::search_sections(&table, &config, &request) {
        report.push(section);
    }
    if report.sections.is_empty() {
        // An empty query filters nothing, so every row is a match.
        let rows = search::filter(&table, &request.query, &request.target)?;
        report.push(Section::rows(
            format!("All Rows in {}", request.target),
            &rows,
            config.preview_rows,
        ));
    }
    emit(&report, &args.input)
}

fn handle_top(args: &cli::TopArgs) -> Result<()> {
    let mut config = resolve_config(&args.input)?;
    if let Some(top_n) = args.top_n {
        config.top_n = top_n;
    }
    config.validate().context("Validating top options")?;

    let table = load_prepared(&config, &args.input)?;
    let title = format!("Top {} {} by {}", config.top_n, args.group, args.measure);
    let outcome = aggregate::top_n(&table, &args.group, &args.measure, config.top_n);
    let mut report = Report::new(config.title.clone());
    report.push(aggregate_section(title, outcome));
    emit(&report, &args.input)
}

fn handle_trend(args: &cli::TrendArgs) -> Result<()> {
    anyhow::ensure!(
        args.scale.is_finite() && args.scale > 0.0,
        "scale must be a positive number"
    );
    let config = resolve_config(&args.input)?;
    let table = load_prepared(&config, &args.input)?;
    let measures = args.measures.iter().map(String::as_str).collect::<Vec<_>>();
    debug!("Trend measures: {:?}", measures);
    let title = format!("Totals by {}", args.category);
    let outcome = aggregate::trend_by_category(&table, &args.category, &measures)
        .map(|result| result.scaled(args.scale));
    let mut report = Report::new(config.title.clone());
    report.push(aggregate_section(title, outcome));
    emit(&report, &args.input)
}

fn handle_columns(args: &cli::ColumnsArgs) -> Result<()> {
    let config = resolve_config(&args.input)?;
    // Missing counts are reported before imputation fills them.
    let table = normalize::normalize_categoricals(load_raw(&config, &args.input)?);
    let summaries = schema::summarize(&table);
    let headers = ["Column", "Type", "Non-missing", "Missing", "Distinct"]
        .into_iter()
        .map(str::to_string)
        .collect();
    let rows = summaries
        .iter()
        .map(schema::ColumnSummary::render_row)
        .collect::<Vec<_>>();
    let mut report = Report::new(config.title.clone());
    report.push(Section::new(
        "Columns",
        SectionBody::Rows {
            total_rows: rows.len(),
            headers,
            rows,
        },
    ));
    emit(&report, &args.input)
}

fn aggregate_section(
    title: String,
    outcome: std::result::Result<aggregate::AggregationResult, error::Unavailable>,
) -> Section {
    match outcome {
        Ok(result) => Section::new(title, SectionBody::Aggregate { result }),
        Err(unavailable) => {
            warn!("Skipping '{title}': {unavailable}");
            Section::new(
                title,
                SectionBody::Skipped {
                    reason: unavailable.to_string(),
                },
            )
        }
    }
}

/// Loads the config file (if any) and applies the shared input flags.
fn resolve_config(args: &InputArgs) -> Result<DashboardConfig> {
    let mut config = DashboardConfig::load_or_default(args.config.as_deref())?;
    if let Some(input) = &args.input {
        config.input = input.clone();
    }
    if let Some(encoding) = &args.input_encoding {
        config.encoding = Some(encoding.clone());
    }
    Ok(config)
}

fn load_raw(config: &DashboardConfig, args: &InputArgs) -> Result<Table> {
    let delimiter = match (args.delimiter, config.delimiter.as_deref()) {
        (Some(delimiter), _) => Some(delimiter),
        (None, Some(configured)) => Some(
            io_utils::parse_delimiter(configured).context("Parsing configured delimiter")?,
        ),
        (None, None) => None,
    };
    let options = LoadOptions {
        delimiter,
        encoding: config.encoding.clone(),
    };
    Ok(load::load_table(&config.input, &options)?)
}

fn load_prepared(config: &DashboardConfig, args: &InputArgs) -> Result<Table> {
    Ok(dashboard::prepare(load_raw(config, args)?))
}

fn emit(report: &Report, args: &InputArgs) -> Result<()> {
    let rendered = report.render(args.format)?;
    let mut stdout = io::stdout().lock();
    stdout
        .write_all(rendered.as_bytes())
        .context("Writing report to stdout")?;
    stdout.flush().context("Flushing stdout")
}
