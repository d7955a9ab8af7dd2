//! Pretty output formatting.

use chrono::{Datelike, NaiveDate};

use daybook_core::calendar::ScheduleEvent;
use daybook_core::date::format_local;
use daybook_core::grid::{CalendarGrid, DayCell, DayColumn, MonthGrid, TimeGrid};

const RULE_WIDTH: usize = 40;

/// Short description of when an event happens.
pub fn format_when(event: &ScheduleEvent) -> String {
    let start = format_local(&event.start_date);
    if event.is_multi_day() {
        return format!("{} to {}", start, format_local(&event.end_date));
    }
    match (event.start_time(), event.end_time()) {
        (Some(from), Some(to)) => {
            format!("{} {}-{}", start, from.format("%H:%M"), to.format("%H:%M"))
        }
        _ => format!("{} (all day)", start),
    }
}

/// Format an event for display.
pub fn format_event(event: &ScheduleEvent) -> String {
    let mut output = format!(
        "{} [{}]\n  ID: {}\n  When: {}\n  Priority: {}",
        event.title,
        event.category.as_str(),
        event.id,
        format_when(event),
        event.priority.as_str()
    );
    if event.is_recurring {
        if let Some(pattern) = event.recurrence_pattern {
            output.push_str(&format!("\n  Repeats: {}", pattern.as_str()));
            if let Some(until) = &event.recurrence_end_date {
                output.push_str(&format!(" until {}", format_local(until)));
            }
        }
    }
    if let Some(desc) = &event.description {
        output.push_str(&format!("\n  Description: {}", desc));
    }
    if let Some(loc) = &event.location {
        output.push_str(&format!("\n  Location: {}", loc));
    }
    if !event.attendees.is_empty() {
        output.push_str(&format!("\n  Attendees: {}", event.attendees.join(", ")));
    }
    output.push_str(&format!("\n  Color: {}", event.effective_color()));
    output
}

/// Format events for display.
pub fn format_events(events: &[ScheduleEvent]) -> String {
    if events.is_empty() {
        return "No events found.".to_string();
    }
    let mut output = format!("EVENTS ({})\n", events.len());
    output.push_str(&"-".repeat(RULE_WIDTH));
    for event in events {
        output.push_str(&format!("\n{}", format_event(event)));
        output.push('\n');
    }
    output
}

/// Format any projected grid.
pub fn format_grid(grid: &CalendarGrid) -> String {
    match grid {
        CalendarGrid::Month(month) => format_month_grid(month),
        CalendarGrid::Week(time) => format_time_grid("WEEK", time),
        CalendarGrid::Day(time) => format_time_grid("DAY", time),
    }
}

/// Format a month grid as a Sunday-first table followed by each day's events.
///
/// Today is marked with `>`, days with events with `*`. Padding days from the
/// neighbouring months are wrapped in parentheses and carry no markers.
pub fn format_month_grid(grid: &MonthGrid) -> String {
    let title = NaiveDate::from_ymd_opt(grid.year, grid.month, 1)
        .map(|first| first.format("%B %Y").to_string().to_uppercase())
        .unwrap_or_else(|| format!("{}-{:02}", grid.year, grid.month));

    let mut output = format!("{}\n", title);
    output.push_str(&"-".repeat(RULE_WIDTH));
    output.push_str("\n  Sun  Mon  Tue  Wed  Thu  Fri  Sat\n");

    for week in &grid.weeks {
        let row: Vec<String> = week.iter().map(format_cell_label).collect();
        output.push_str(&row.join(""));
        output.push('\n');
    }

    for cell in grid.cells().filter(|cell| !cell.events.is_empty()) {
        output.push_str(&format!(
            "\n{} ({})",
            format_local(&cell.date),
            cell.date.format("%a")
        ));
        for event in cell.visible() {
            output.push_str(&format!("\n  {}", format_line(event)));
        }
        let hidden = cell.overflow_count();
        if hidden > 0 {
            output.push_str(&format!("\n  +{} more", hidden));
        }
        output.push('\n');
    }
    output
}

fn format_cell_label(cell: &DayCell) -> String {
    if !cell.is_current_month {
        return format!("{:>5}", format!("({})", cell.date.day()));
    }
    let today = if cell.is_today { ">" } else { " " };
    let busy = if cell.events.is_empty() { " " } else { "*" };
    format!(" {}{:>2}{}", today, cell.date.day(), busy)
}

/// Format a week or day grid, one block per column.
pub fn format_time_grid(label: &str, grid: &TimeGrid) -> String {
    let mut output = if grid.range.start == grid.range.end {
        format!("{} {}\n", label, format_local(&grid.range.start))
    } else {
        format!(
            "{} {} to {}\n",
            label,
            format_local(&grid.range.start),
            format_local(&grid.range.end)
        )
    };
    output.push_str(&"-".repeat(RULE_WIDTH));
    for column in &grid.columns {
        output.push_str(&format!("\n{}", format_column(column)));
        output.push('\n');
    }
    output
}

fn format_column(column: &DayColumn) -> String {
    let mut output = format!(
        "{} {}",
        column.date.format("%a"),
        format_local(&column.date)
    );
    if column.is_today {
        output.push_str(" (today)");
    }
    if column.event_count() == 0 {
        output.push_str("\n  (no events)");
        return output;
    }
    for event in &column.all_day {
        output.push_str(&format!("\n  all day  {}", format_line(event)));
    }
    for slot in column.slots.iter().filter(|slot| !slot.events.is_empty()) {
        for event in &slot.events {
            output.push_str(&format!("\n  {:02}:00    {}", slot.hour, format_line(event)));
        }
    }
    for event in &column.outside_hours {
        output.push_str(&format!("\n  other    {}", format_line(event)));
    }
    output
}

/// One-line summary used inside grids.
fn format_line(event: &ScheduleEvent) -> String {
    let mut line = format!("{} [{}]", event.title, event.category.as_str());
    if let (Some(from), Some(to)) = (event.start_time(), event.end_time()) {
        line.push_str(&format!(" {}-{}", from.format("%H:%M"), to.format("%H:%M")));
    }
    if event.is_multi_day() {
        line.push_str(&format!(
            " ({} to {})",
            format_local(&event.start_date),
            format_local(&event.end_date)
        ));
    }
    line
}
