use regex::Regex;
use std::sync::OnceLock;

/// The only accepted duration format: unbounded minutes, exactly two second digits
fn duration_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^\d+:\d{2}$").expect("duration pattern is valid"))
}

/// Check whether a string is a well-formed `m:ss` duration
pub fn is_valid_duration(text: &str) -> bool {
    duration_pattern().is_match(text)
}

/// Convert a `m:ss` duration string to total seconds.
///
/// Anything that does not match the pattern (empty string, wrong separator,
/// seconds not zero-padded to two digits) yields 0 rather than an error, so
/// a single bad record can never take down a whole view.
pub fn parse_duration(text: &str) -> u64 {
    if !is_valid_duration(text) {
        return 0;
    }

    let (minutes, seconds) = match text.split_once(':') {
        Some(parts) => parts,
        None => return 0,
    };

    // An absurdly wide minute field still matches the pattern; saturate
    // rather than overflow.
    let minutes: u64 = minutes.parse().unwrap_or(0);
    let seconds: u64 = seconds.parse().unwrap_or(0);

    minutes.saturating_mul(60).saturating_add(seconds)
}

/// Render seconds as "<m>分 <s>秒" for the daily-budget display.
/// No hour rollover and no zero padding.
pub fn format_duration_verbose(total_seconds: u64) -> String {
    let minutes = total_seconds / 60;
    let seconds = total_seconds % 60;
    format!("{}分 {}秒", minutes, seconds)
}

/// Render seconds as zero-padded `HH:MM:SS`.
/// The hour field widens past 99 hours instead of truncating.
pub fn format_duration_clock(total_seconds: u64) -> String {
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;
    format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
}
