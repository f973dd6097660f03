use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::report::MonthOrder;

#[derive(Debug, Parser)]
#[command(author, version, about = "Hotel booking reports over a cleaned CSV", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Preview the dataset and show the column descriptions
    Overview(OverviewArgs),
    /// Render the aggregate analysis charts as tables (or JSON chart specs)
    Analysis(AnalysisArgs),
    /// Country-based booking report with a top-N bound
    Report(ReportArgs),
}

#[derive(Debug, Args)]
pub struct OverviewArgs {
    /// Cleaned booking CSV to load ("-" reads stdin)
    #[arg(short = 'i', long = "input")]
    pub input: PathBuf,
    /// Number of data rows to preview
    #[arg(long, default_value_t = 10)]
    pub rows: usize,
}

#[derive(Debug, Args)]
pub struct AnalysisArgs {
    /// Cleaned booking CSV to load ("-" reads stdin)
    #[arg(short = 'i', long = "input")]
    pub input: PathBuf,
    /// Ordering policy for the monthly volume chart
    #[arg(long = "month-order", value_enum, default_value = "frequency")]
    pub month_order: MonthOrderArg,
    /// Emit chart specifications as JSON instead of text tables
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Args)]
pub struct ReportArgs {
    /// Cleaned booking CSV to load ("-" reads stdin)
    #[arg(short = 'i', long = "input")]
    pub input: PathBuf,
    /// Exact country value to filter on (defaults to all countries)
    #[arg(long)]
    pub country: Option<String>,
    /// Top-N bound for the country ranking (must be at least 1)
    #[arg(long, default_value_t = 10)]
    pub top: usize,
    /// Number of filtered rows to preview below the chart
    #[arg(long, default_value_t = 10)]
    pub rows: usize,
    /// Emit the chart specification as JSON instead of a text table
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
#[value(rename_all = "kebab-case")]
pub enum MonthOrderArg {
    Frequency,
    Calendar,
}

impl From<MonthOrderArg> for MonthOrder {
    fn from(arg: MonthOrderArg) -> Self {
        match arg {
            MonthOrderArg::Frequency => MonthOrder::Frequency,
            MonthOrderArg::Calendar => MonthOrder::Calendar,
        }
    }
}
