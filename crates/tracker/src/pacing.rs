use chrono::{Local, NaiveDate};

use crate::duration::{format_duration_verbose, parse_duration};
use crate::model::VideoRecord;

/// Calendar days left until the exam, counted from today's local midnight.
///
/// Empty or unparseable dates count as "no exam date set" and yield 0.
/// Any parseable date yields at least 1: the exam day itself and past dates
/// clamp to 1 so the daily-budget divisor can never reach zero.
pub fn remaining_days(exam_date: &str) -> i64 {
    if exam_date.is_empty() {
        return 0;
    }

    match NaiveDate::parse_from_str(exam_date, "%Y-%m-%d") {
        Ok(exam) => remaining_days_from(exam, Local::now().date_naive()),
        Err(_) => 0,
    }
}

/// The pure date arithmetic behind [`remaining_days`], with the reference
/// day injected.
pub fn remaining_days_from(exam: NaiveDate, today: NaiveDate) -> i64 {
    // Midnight-to-midnight difference is already whole days, so the ceiling
    // of the original time delta reduces to the signed day count.
    let diff = (exam - today).num_days();
    diff.max(1)
}

/// Seconds of viewing required per day to clear `total_seconds` within
/// `remaining_days`, rounded up.
///
/// Rounding is deliberately biased upward: under-estimating the daily target
/// risks missing the exam date. A non-positive day count yields 0; normal
/// callers never pass one because of the clamp in [`remaining_days`], but
/// direct callers get the guard.
pub fn daily_budget_seconds(total_seconds: u64, remaining_days: i64) -> u64 {
    if remaining_days <= 0 {
        return 0;
    }
    let days = remaining_days as u64;
    total_seconds.div_ceil(days)
}

/// Display string for the daily viewing target over the incomplete subset.
pub fn compute_daily_budget(videos: &[VideoRecord], exam_date: &str) -> String {
    let total_seconds: u64 = videos
        .iter()
        .filter(|video| !video.completed)
        .map(|video| parse_duration(&video.duration))
        .sum();

    let days = remaining_days(exam_date);
    let daily = daily_budget_seconds(total_seconds, days);

    format_duration_verbose(daily)
}
