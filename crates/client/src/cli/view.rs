//! Grid view CLI arguments.

use chrono::NaiveDate;
use clap::Args;

use super::{parse_date_arg, CategoryArg};

/// Arguments shared by `month`, `week` and `day`.
#[derive(Debug, Args)]
pub struct ViewArgs {
    /// Anchor date (YYYY-MM-DD). Defaults to today.
    #[arg(long, value_parser = parse_date_arg)]
    pub date: Option<NaiveDate>,
    /// Only show events of this category.
    #[arg(long, value_enum)]
    pub category: Option<CategoryArg>,
}
