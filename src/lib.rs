pub mod catalog;
pub mod chart;
pub mod cli;
pub mod data;
pub mod dataset;
pub mod error;
pub mod filter;
pub mod report;
pub mod schema;
pub mod table;

use std::{env, sync::OnceLock};

use anyhow::{Context, Result};
use clap::Parser;
use log::{info, warn};

use crate::{
    chart::{ChartData, ChartKind, ChartSpec},
    cli::{AnalysisArgs, Cli, Commands, OverviewArgs, ReportArgs},
    dataset::{Dataset, DatasetView},
    error::ReportError,
    filter::CountrySelection,
};

static LOGGER: OnceLock<()> = OnceLock::new();

fn init_logging() {
    LOGGER.get_or_init(|| {
        let mut builder = env_logger::Builder::from_env(env_logger::Env::default());
        if env::var("RUST_LOG").is_err() {
            builder.filter_module("booking_report", log::LevelFilter::Info);
        }
        let _ = builder.format_timestamp_millis().try_init();
    });
}

pub fn run() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    match cli.command {
        Commands::Overview(args) => handle_overview(&args),
        Commands::Analysis(args) => handle_analysis(&args),
        Commands::Report(args) => handle_report(&args),
    }
}

fn load_dataset(path: &std::path::Path) -> Result<Dataset> {
    let dataset = Dataset::load(path)?;
    info!(
        "Loaded {} row(s) across {} column(s) from {:?}",
        dataset.row_count(),
        dataset.schema().columns.len(),
        path
    );
    Ok(dataset)
}

fn handle_overview(args: &OverviewArgs) -> Result<()> {
    let dataset = load_dataset(&args.input)?;

    println!("Hotel Booking Dataset Overview");
    println!();
    print_preview(&dataset.view(), args.rows);

    println!();
    println!("Column Descriptions");
    let headers = vec!["Column Name".to_string(), "Description".to_string()];
    let rows = catalog::entries()
        .iter()
        .map(|entry| vec![entry.name.to_string(), entry.description.to_string()])
        .collect::<Vec<_>>();
    table::print_table(&headers, &rows);
    Ok(())
}

fn handle_analysis(args: &AnalysisArgs) -> Result<()> {
    let dataset = load_dataset(&args.input)?;
    dataset
        .require_columns(report::required_columns())
        .context("Validating report configuration against the loaded schema")?;

    let view = dataset.view();
    let charts = match chart::analysis_view(&view, args.month_order.into()) {
        Ok(charts) => charts,
        Err(ReportError::EmptyInput) => {
            println!("no data");
            return Ok(());
        }
        Err(err) => return Err(err.into()),
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&charts)?);
    } else {
        for spec in &charts {
            print_chart(spec);
            println!();
        }
    }
    info!("Rendered {} analysis chart(s)", charts.len());
    Ok(())
}

fn handle_report(args: &ReportArgs) -> Result<()> {
    let dataset = load_dataset(&args.input)?;
    dataset
        .require_columns([report::COUNTRY_COLUMN])
        .context("Validating report configuration against the loaded schema")?;

    let selection = match &args.country {
        Some(name) => CountrySelection::parse(name),
        None => CountrySelection::AllCountries,
    };
    let options = filter::country_options(&dataset)?;
    if let CountrySelection::Country(name) = &selection
        && !options.iter().any(|option| option == name)
    {
        warn!("Country '{name}' is not present in the dataset");
    }

    let filtered = filter::filter_by_country(&dataset, &selection)?;
    let top = filter::top_countries(&filtered, args.top)?;
    let spec = chart::top_countries_bar(top, args.top);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&spec)?);
    } else {
        print_chart(&spec);
        println!();
        println!("Filtered Data Preview ({})", selection.label());
        print_preview(&filtered, args.rows);
    }
    Ok(())
}

fn print_preview(view: &DatasetView, limit: usize) {
    let headers = view.dataset().schema().column_names();
    let rows = view
        .iter()
        .take(limit)
        .map(|row| {
            row.iter()
                .map(|cell| cell.as_ref().map(|v| v.as_display()).unwrap_or_default())
                .collect::<Vec<_>>()
        })
        .collect::<Vec<_>>();
    if rows.is_empty() {
        println!("no data");
        return;
    }
    table::print_table(&headers, &rows);
}

fn print_chart(spec: &ChartSpec) {
    println!("{}", spec.title);
    match &spec.data {
        ChartData::Scalar { value, suffix } => {
            println!("{value:.2}{suffix}");
        }
        ChartData::Counts { rows } => {
            let (key_label, value_label) = axis_labels(spec, "value", "count");
            let headers = vec![key_label, value_label];
            let rendered = rows
                .iter()
                .map(|row| vec![row.key.clone(), row.count.to_string()])
                .collect::<Vec<_>>();
            table::print_table(&headers, &rendered);
        }
        ChartData::Values { rows } => {
            let (key_label, value_label) = axis_labels(spec, "value", "mean");
            let headers = vec![key_label, value_label];
            let rendered = rows
                .iter()
                .map(|row| vec![row.key.clone(), format!("{:.2}", row.value)])
                .collect::<Vec<_>>();
            table::print_table(&headers, &rendered);
        }
        ChartData::Matrix { columns, values } => {
            let mut headers = vec!["column".to_string()];
            headers.extend(columns.iter().cloned());
            let rendered = columns
                .iter()
                .zip(values)
                .map(|(name, row)| {
                    let mut cells = vec![name.clone()];
                    cells.extend(row.iter().map(|v| {
                        if v.is_finite() {
                            format!("{v:.2}")
                        } else {
                            String::new()
                        }
                    }));
                    cells
                })
                .collect::<Vec<_>>();
            table::print_table(&headers, &rendered);
        }
    }
}

// For horizontal bars the group key lives on the y axis.
fn axis_labels(spec: &ChartSpec, key_default: &str, value_default: &str) -> (String, String) {
    let x = spec.x_label.clone();
    let y = spec.y_label.clone();
    match spec.kind {
        ChartKind::HorizontalBar => (
            y.unwrap_or_else(|| key_default.to_string()),
            x.unwrap_or_else(|| value_default.to_string()),
        ),
        _ => (
            x.unwrap_or_else(|| key_default.to_string()),
            y.unwrap_or_else(|| value_default.to_string()),
        ),
    }
}
