use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::{dashboard, io_utils, report::OutputFormat};

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Exploratory analysis of state drug utilization CSV extracts",
    long_about = None
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Clean the dataset and render every dashboard view
    Dashboard(DashboardArgs),
    /// Filter rows by a case-insensitive substring and summarize the matches
    Search(SearchArgs),
    /// Rank groups by the sum of a numeric column
    Top(TopArgs),
    /// Sum one or more numeric columns per category
    Trend(TrendArgs),
    /// List columns with their inferred types and missing counts
    Columns(ColumnsArgs),
}

#[derive(Debug, Args)]
pub struct InputArgs {
    /// Input CSV file (defaults to the configured dataset path)
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,
    /// YAML file with dashboard settings
    #[arg(short = 'c', long = "config")]
    pub config: Option<PathBuf>,
    /// CSV delimiter character (supports ',', 'tab', ';', '|')
    #[arg(long, value_parser = parse_delimiter)]
    pub delimiter: Option<u8>,
    /// Character encoding of the input file (defaults to utf-8)
    #[arg(long = "input-encoding")]
    pub input_encoding: Option<String>,
    /// Output format for the report
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(Debug, Args)]
pub struct DashboardArgs {
    #[command(flatten)]
    pub input: InputArgs,
    /// Number of drugs shown in the top-N views
    #[arg(long = "top")]
    pub top_n: Option<usize>,
    /// Divisor applied to trend and comparison totals
    #[arg(long)]
    pub scale: Option<f64>,
    /// Rows shown in the data overview (0 shows all)
    #[arg(long = "rows")]
    pub preview_rows: Option<usize>,
    /// Optional search term appended to the dashboard
    #[arg(short = 'q', long = "query")]
    pub query: Option<String>,
    /// Column to search (defaults to all columns)
    #[arg(long = "column")]
    pub column: Option<String>,
}

#[derive(Debug, Args)]
pub struct SearchArgs {
    #[command(flatten)]
    pub input: InputArgs,
    /// Case-insensitive substring to look for
    #[arg(short = 'q', long = "query")]
    pub query: String,
    /// Column to search (defaults to all columns)
    #[arg(long = "column")]
    pub column: Option<String>,
    /// Number of drugs shown in the top-N views
    #[arg(long = "top")]
    pub top_n: Option<usize>,
    /// Matching rows shown (0 shows all)
    #[arg(long = "rows")]
    pub preview_rows: Option<usize>,
}

#[derive(Debug, Args)]
pub struct TopArgs {
    #[command(flatten)]
    pub input: InputArgs,
    /// Column to group by
    #[arg(long, default_value = dashboard::PRODUCT_NAME)]
    pub group: String,
    /// Numeric column to sum
    #[arg(long, default_value = dashboard::TOTAL_AMOUNT)]
    pub measure: String,
    /// Number of groups to keep
    #[arg(long = "top")]
    pub top_n: Option<usize>,
}

#[derive(Debug, Args)]
pub struct TrendArgs {
    #[command(flatten)]
    pub input: InputArgs,
    /// Column whose values become the categories
    #[arg(long, default_value = dashboard::UTILIZATION_TYPE)]
    pub category: String,
    /// Numeric columns to sum (repeatable)
    #[arg(
        long = "measure",
        action = clap::ArgAction::Append,
        default_values_t = [dashboard::UNITS.to_string(), dashboard::TOTAL_AMOUNT.to_string()]
    )]
    pub measures: Vec<String>,
    /// Divisor applied to every sum
    #[arg(long, default_value_t = 1.0)]
    pub scale: f64,
}

#[derive(Debug, Args)]
pub struct ColumnsArgs {
    #[command(flatten)]
    pub input: InputArgs,
}

fn parse_delimiter(value: &str) -> Result<u8, String> {
    io_utils::parse_delimiter(value).map_err(|err| err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn trend_defaults_to_units_and_amount() {
        let cli = Cli::parse_from(["drug-eda", "trend"]);
        let Commands::Trend(args) = cli.command else {
            panic!("expected trend command");
        };
        assert_eq!(
            args.measures,
            vec![dashboard::UNITS.to_string(), dashboard::TOTAL_AMOUNT.to_string()]
        );
        assert_eq!(args.category, dashboard::UTILIZATION_TYPE);
    }

    #[test]
    fn delimiter_names_are_accepted() {
        let cli = Cli::parse_from(["drug-eda", "columns", "--delimiter", "tab", "--format", "json"]);
        let Commands::Columns(args) = cli.command else {
            panic!("expected columns command");
        };
        assert_eq!(args.input.delimiter, Some(b'\t'));
        assert_eq!(args.input.format, OutputFormat::Json);
    }
}
