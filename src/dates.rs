//! Calendar-day token generation for date-indexed archive URLs.
//!
//! Every epaper site publishes one issue per day behind a URL that embeds
//! the issue date, so every crawl starts by enumerating the days of the
//! archive. Sites disagree about how the date is written (`2019-01/04`,
//! `201903/21`, `2019-01-04`, ...), which is captured by the pair of
//! separator strings in [`DateSeparators`].
//!
//! # The overshoot quirk
//!
//! [`date_tokens`] emits the current day *before* testing it against the
//! end bound. With `step_days == 1` that gives the inclusive range you
//! would expect. With `step_days > 1` the final token can land up to
//! `step_days - 1` days past `end`:
//!
//! ```text
//! date_tokens(2019-01-01, 2019-01-05, step 3) -> 2019-01-01, 2019-01-04, 2019-01-07
//! ```
//!
//! Coarse-stepped sites have always been crawled with this behavior and a
//! day-or-two of 404s past the end of an archive is harmless, so the loop
//! shape is kept as-is rather than clamped.

use chrono::{Datelike, Duration, Local, NaiveDate};

/// Separator strings placed between the year/month and month/day segments
/// of a date token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateSeparators {
    /// Between the year and the month.
    pub year_month: &'static str,
    /// Between the month and the day.
    pub month_day: &'static str,
}

impl DateSeparators {
    /// `2019-01/04` — the dominant convention (Founder CMS archives).
    pub const DASH_SLASH: DateSeparators = DateSeparators {
        year_month: "-",
        month_day: "/",
    };

    /// `201903/21` — used by the sznews family of layouts.
    pub const NONE_SLASH: DateSeparators = DateSeparators {
        year_month: "",
        month_day: "/",
    };

    /// `2019-01-04` — plain ISO-style dates.
    pub const DASH_DASH: DateSeparators = DateSeparators {
        year_month: "-",
        month_day: "-",
    };
}

impl Default for DateSeparators {
    fn default() -> Self {
        Self::DASH_SLASH
    }
}

/// First archive day assumed when a caller supplies no start bound.
fn fixed_epoch() -> NaiveDate {
    NaiveDate::from_ymd_opt(2016, 1, 1).unwrap()
}

/// Render one day with the requested separators, zero-padded.
fn format_token(date: NaiveDate, separators: DateSeparators) -> String {
    format!(
        "{:04}{}{:02}{}{:02}",
        date.year(),
        separators.year_month,
        date.month(),
        separators.month_day,
        date.day()
    )
}

/// Enumerate the calendar days of `[start, end]` as formatted tokens.
///
/// `start` defaults to 2016-01-01 and `end` to today (local date) when
/// omitted. The sequence is lazy and finite; cloning the iterator before
/// use restarts it.
///
/// # Behavior at the bounds
///
/// - The first token is always `start`, even when `start > end` — the
///   degenerate case yields exactly that one token.
/// - With `step_days == 1` the last token is exactly `end`.
/// - With `step_days > 1` the last token may exceed `end` by up to
///   `step_days - 1` days (see the module docs).
///
/// `step_days` must be positive; `0` is treated as `1`.
pub fn date_tokens(
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
    step_days: u32,
    separators: DateSeparators,
) -> impl Iterator<Item = String> + Clone {
    debug_assert!(step_days >= 1, "step_days must be a positive day count");
    let start = start.unwrap_or_else(fixed_epoch);
    let end = end.unwrap_or_else(|| Local::now().date_naive());
    let step = Duration::days(step_days.max(1) as i64);

    let mut current = Some(start);
    std::iter::from_fn(move || {
        let date = current?;
        // Emit first, then decide whether to advance: the pre-increment
        // comparison against `end` is what produces the overshoot.
        current = if date < end { Some(date + step) } else { None };
        Some(format_token(date, separators))
    })
}
