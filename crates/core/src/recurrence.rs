//! RecurrenceExpander: turns a (possibly recurring) event into the concrete
//! date intervals on which it is active inside a query window.
//!
//! Expansion is window-relative. The iterator jumps straight to the first
//! candidate near the window start and stops at the window end, so a series
//! without an end date never materializes beyond what was asked for.

use chrono::{Datelike, Days, NaiveDate};

use crate::calendar::{RecurrencePattern, ScheduleEvent};
use crate::date::{shift_months, DateRange};

/// Upper bound on occurrences produced for a single window.
pub const MAX_OCCURRENCES_PER_WINDOW: usize = 1_000;

/// One concrete interval on which an event is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Occurrence {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl Occurrence {
    /// Returns true if the occurrence covers `date`.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    pub fn range(&self) -> DateRange {
        DateRange {
            start: self.start,
            end: self.end,
        }
    }
}

/// The pattern that actually drives expansion for `event`.
///
/// A recurring event without a pattern, or a pattern on an event not flagged
/// as recurring, is a data-integrity problem. Both are logged and treated as
/// non-recurring instead of failing the query.
pub fn effective_pattern(event: &ScheduleEvent) -> RecurrencePattern {
    if !event.is_recurring {
        if let Some(pattern) = event
            .recurrence_pattern
            .filter(|pattern| *pattern != RecurrencePattern::None)
        {
            tracing::warn!(
                event_id = %event.id,
                title = %event.title,
                pattern = pattern.as_str(),
                "Event has a recurrence pattern but is not recurring, ignoring the pattern"
            );
        }
        return RecurrencePattern::None;
    }
    match event.recurrence_pattern {
        Some(pattern) => pattern,
        None => {
            tracing::warn!(
                event_id = %event.id,
                title = %event.title,
                "Recurring event has no recurrence pattern, treating as non-recurring"
            );
            RecurrencePattern::None
        }
    }
}

/// Lazily yields the occurrences of `event` that intersect `window`.
///
/// The returned iterator is `Clone`, so it can be restarted from its inputs.
pub fn expand(event: &ScheduleEvent, window: DateRange) -> Occurrences {
    let pattern = effective_pattern(event);
    let span = event.span_days() as u64;
    let until = match pattern {
        RecurrencePattern::None => None,
        _ => event.recurrence_end_date,
    };

    let mut occurrences = Occurrences {
        series_start: event.start_date,
        span,
        pattern,
        window,
        until,
        index: 0,
        emitted: 0,
        done: false,
    };
    occurrences.index = occurrences.first_candidate_index();
    occurrences
}

/// Returns true if `event` is active on `date`, either on its nominal
/// interval or on one of its recurrences.
pub fn occurs_on(event: &ScheduleEvent, date: NaiveDate) -> bool {
    expand(event, DateRange::single(date)).next().is_some()
}

/// Iterator over the occurrences of one event within one window.
#[derive(Debug, Clone)]
pub struct Occurrences {
    series_start: NaiveDate,
    span: u64,
    pattern: RecurrencePattern,
    window: DateRange,
    until: Option<NaiveDate>,
    index: u32,
    emitted: usize,
    done: bool,
}

impl Occurrences {
    /// Start date of the n-th occurrence, computed from the series start so
    /// month-end clamping never accumulates.
    fn nth_start(&self, n: u32) -> Option<NaiveDate> {
        match self.pattern {
            RecurrencePattern::None => (n == 0).then_some(self.series_start),
            RecurrencePattern::Daily => self.series_start.checked_add_days(Days::new(n as u64)),
            RecurrencePattern::Weekly => self
                .series_start
                .checked_add_days(Days::new(7 * n as u64)),
            RecurrencePattern::Monthly => shift_months(self.series_start, n as i32),
            RecurrencePattern::Yearly => shift_months(self.series_start, 12 * n as i32),
        }
    }

    /// Index of the first occurrence that could still reach the window.
    /// May undershoot; `next` skips the remainder.
    fn first_candidate_index(&self) -> u32 {
        let Some(earliest_start) = self.window.start.checked_sub_days(Days::new(self.span)) else {
            return 0;
        };
        if earliest_start <= self.series_start {
            return 0;
        }

        let days = (earliest_start - self.series_start).num_days();
        let months = (earliest_start.year() - self.series_start.year()) as i64 * 12
            + earliest_start.month() as i64
            - self.series_start.month() as i64;

        let index = match self.pattern {
            RecurrencePattern::None => 0,
            RecurrencePattern::Daily => days,
            RecurrencePattern::Weekly => days / 7,
            RecurrencePattern::Monthly => months - 1,
            RecurrencePattern::Yearly => months / 12 - 1,
        };
        index.clamp(0, u32::MAX as i64) as u32
    }
}

impl Iterator for Occurrences {
    type Item = Occurrence;

    fn next(&mut self) -> Option<Occurrence> {
        while !self.done {
            if self.emitted >= MAX_OCCURRENCES_PER_WINDOW {
                self.done = true;
                break;
            }

            let Some(start) = self.nth_start(self.index) else {
                self.done = true;
                break;
            };
            if start > self.window.end || self.until.is_some_and(|until| start > until) {
                self.done = true;
                break;
            }
            self.index = self.index.saturating_add(1);

            let Some(end) = start.checked_add_days(Days::new(self.span)) else {
                self.done = true;
                break;
            };
            if end < self.window.start {
                continue;
            }

            self.emitted += 1;
            return Some(Occurrence { start, end });
        }
        None
    }
}
