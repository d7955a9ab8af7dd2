//! Event CLI commands.

use chrono::{NaiveDate, NaiveTime};
use clap::{Parser, Subcommand};

use super::{parse_date_arg, parse_month_arg, parse_time_arg, CategoryArg, PriorityArg, RepeatArg};

/// Event management commands.
#[derive(Debug, Parser)]
pub struct EventsCommand {
    #[command(subcommand)]
    pub action: EventsAction,
}

/// Available event actions.
#[derive(Debug, Subcommand)]
pub enum EventsAction {
    /// List events on a day or starting in a month.
    List {
        /// Day to list (YYYY-MM-DD), recurrences included. Defaults to today.
        #[arg(long, value_parser = parse_date_arg, conflicts_with = "month")]
        date: Option<NaiveDate>,
        /// Month to list (YYYY-MM), by nominal start date.
        #[arg(long, value_parser = parse_month_arg)]
        month: Option<(i32, u32)>,
        /// Only list events of this category.
        #[arg(long, value_enum)]
        category: Option<CategoryArg>,
    },
    /// Create a new event.
    Create {
        /// Event title.
        #[arg(long)]
        title: String,
        /// Start date (YYYY-MM-DD).
        #[arg(long, value_parser = parse_date_arg)]
        date: NaiveDate,
        /// End date (YYYY-MM-DD) for multi-day events.
        #[arg(long, value_parser = parse_date_arg)]
        end_date: Option<NaiveDate>,
        /// Start time (HH:MM). Omit both times for an all-day event.
        #[arg(long, value_parser = parse_time_arg, requires = "end_time")]
        start_time: Option<NaiveTime>,
        /// End time (HH:MM).
        #[arg(long, value_parser = parse_time_arg, requires = "start_time")]
        end_time: Option<NaiveTime>,
        #[arg(long, value_enum)]
        category: Option<CategoryArg>,
        #[arg(long, value_enum)]
        priority: Option<PriorityArg>,
        /// Optional description.
        #[arg(long)]
        description: Option<String>,
        /// Optional location.
        #[arg(long)]
        location: Option<String>,
        /// Attendees, comma separated.
        #[arg(long, value_delimiter = ',')]
        attendees: Vec<String>,
        /// Color override (hex or CSS name).
        #[arg(long)]
        color: Option<String>,
        /// Repeat the event.
        #[arg(long, value_enum)]
        repeat: Option<RepeatArg>,
        /// Last day a repetition may start (YYYY-MM-DD).
        #[arg(long, value_parser = parse_date_arg, requires = "repeat")]
        until: Option<NaiveDate>,
    },
    /// Update an event.
    Update {
        /// Event ID.
        id: String,
        /// A day the event currently appears on (YYYY-MM-DD).
        #[arg(long, value_parser = parse_date_arg)]
        on: NaiveDate,
        /// New title.
        #[arg(long)]
        title: Option<String>,
        /// New start date. The event keeps its length unless --end-date is given.
        #[arg(long, value_parser = parse_date_arg)]
        date: Option<NaiveDate>,
        /// New end date.
        #[arg(long, value_parser = parse_date_arg)]
        end_date: Option<NaiveDate>,
        /// New start time.
        #[arg(long, value_parser = parse_time_arg, requires = "end_time")]
        start_time: Option<NaiveTime>,
        /// New end time.
        #[arg(long, value_parser = parse_time_arg, requires = "start_time")]
        end_time: Option<NaiveTime>,
        /// Make the event all-day.
        #[arg(long, conflicts_with_all = ["start_time", "end_time"])]
        all_day: bool,
        #[arg(long, value_enum)]
        category: Option<CategoryArg>,
        #[arg(long, value_enum)]
        priority: Option<PriorityArg>,
        /// New description.
        #[arg(long)]
        description: Option<String>,
        /// New location.
        #[arg(long)]
        location: Option<String>,
        /// New color.
        #[arg(long)]
        color: Option<String>,
        /// New recurrence. `never` stops the series.
        #[arg(long, value_enum)]
        repeat: Option<RepeatArg>,
        /// New last day of the series.
        #[arg(long, value_parser = parse_date_arg, requires = "repeat")]
        until: Option<NaiveDate>,
    },
    /// Delete an event.
    Delete {
        /// Event ID.
        id: String,
        /// A day the event currently appears on (YYYY-MM-DD).
        #[arg(long, value_parser = parse_date_arg)]
        on: NaiveDate,
    },
}
