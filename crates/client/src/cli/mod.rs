//! CLI command definitions.

pub mod events;
pub mod session;
pub mod view;

use chrono::{NaiveDate, NaiveTime};
use clap::{Parser, Subcommand, ValueEnum};

use daybook_core::calendar::{Category, Priority, RecurrencePattern};
use daybook_core::date::{parse_local, parse_local_time};

/// Calendar views over a remote schedule store.
#[derive(Debug, Parser)]
#[command(name = "daybook")]
#[command(version, about = "Calendar views over a remote schedule store", long_about = None)]
pub struct Cli {
    /// Remote store base URL.
    #[arg(long, env = "DAYBOOK_URL")]
    pub base_url: Option<String>,

    /// Output format.
    #[arg(long, global = true, default_value = "pretty")]
    pub format: OutputFormat,

    /// Work against the local offline file instead of the remote store.
    #[arg(long, global = true)]
    pub offline: bool,

    /// Suppress non-essential output.
    #[arg(long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Output format options.
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    /// Raw JSON output.
    Json,
    /// Human-readable output.
    #[default]
    Pretty,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Save the session used for remote calls.
    Login(session::LoginArgs),
    /// Forget the saved session.
    Logout,
    /// Show the month grid.
    Month(view::ViewArgs),
    /// Show the week grid.
    Week(view::ViewArgs),
    /// Show the day grid.
    Day(view::ViewArgs),
    /// Event management.
    Events(events::EventsCommand),
}

/// CLI category (with clap ValueEnum).
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CategoryArg {
    Work,
    Personal,
    Meeting,
    Deadline,
    Other,
}

impl From<CategoryArg> for Category {
    fn from(c: CategoryArg) -> Self {
        match c {
            CategoryArg::Work => Category::Work,
            CategoryArg::Personal => Category::Personal,
            CategoryArg::Meeting => Category::Meeting,
            CategoryArg::Deadline => Category::Deadline,
            CategoryArg::Other => Category::Other,
        }
    }
}

/// CLI priority (with clap ValueEnum).
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PriorityArg {
    Low,
    Medium,
    High,
}

impl From<PriorityArg> for Priority {
    fn from(p: PriorityArg) -> Self {
        match p {
            PriorityArg::Low => Priority::Low,
            PriorityArg::Medium => Priority::Medium,
            PriorityArg::High => Priority::High,
        }
    }
}

/// CLI recurrence (with clap ValueEnum).
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RepeatArg {
    Daily,
    Weekly,
    Monthly,
    Yearly,
    /// Stop repeating.
    Never,
}

impl From<RepeatArg> for RecurrencePattern {
    fn from(r: RepeatArg) -> Self {
        match r {
            RepeatArg::Daily => RecurrencePattern::Daily,
            RepeatArg::Weekly => RecurrencePattern::Weekly,
            RepeatArg::Monthly => RecurrencePattern::Monthly,
            RepeatArg::Yearly => RecurrencePattern::Yearly,
            RepeatArg::Never => RecurrencePattern::None,
        }
    }
}

/// Parses a `YYYY-MM-DD` argument.
pub fn parse_date_arg(value: &str) -> Result<NaiveDate, String> {
    parse_local(value).map_err(|e| e.to_string())
}

/// Parses an `HH:MM` or `HH:MM:SS` argument.
pub fn parse_time_arg(value: &str) -> Result<NaiveTime, String> {
    parse_local_time(value).map_err(|e| e.to_string())
}

/// Parses a `YYYY-MM` argument into (year, month).
pub fn parse_month_arg(value: &str) -> Result<(i32, u32), String> {
    use chrono::Datelike;

    let date = parse_local(&format!("{}-01", value.trim()))
        .map_err(|_| format!("expected YYYY-MM, got '{value}'"))?;
    Ok((date.year(), date.month()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_month_arg() {
        assert_eq!(parse_month_arg("2024-02"), Ok((2024, 2)));
        assert!(parse_month_arg("2024-13").is_err());
        assert!(parse_month_arg("February").is_err());
    }

    #[test]
    fn test_cli_parses_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["daybook", "month", "--date", "2024-02-14", "--format", "json"])
            .unwrap();

        assert!(matches!(cli.format, OutputFormat::Json));
        match cli.command {
            Commands::Month(args) => {
                assert_eq!(args.date, NaiveDate::from_ymd_opt(2024, 2, 14));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_cli_rejects_bad_date() {
        assert!(Cli::try_parse_from(["daybook", "day", "--date", "2024-02-30"]).is_err());
    }
}
