//! Minute-of-day parsing for free-text time labels.
//!
//! Time labels are opaque display strings (`"08:30 – 10:00"`, `"2pm-4"`,
//! `"1130 to 1"`). They are never normalized in storage — only at comparison
//! time, by parsing both sides into minute-of-day intervals. Parsing is
//! deliberately forgiving about punctuation and deliberately total: an
//! unparsable label yields `None`, never an error, so ambiguous slots simply
//! drop out of comparisons.

use serde::Serialize;

/// Characters that may separate the two halves of a range expression.
/// The word "to" is folded into a hyphen before splitting.
const SEPARATORS: [char; 6] = ['–', '—', '−', '~', '→', '-'];

/// A half-open minute-of-day interval `[start, end)`.
///
/// `start` is always within `0..=1439`. `end` may exceed 1439 for ranges
/// synthesized from a single point near midnight; overlap math is unaffected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimeRange {
    /// Minutes since midnight, inclusive.
    pub start: u16,
    /// Minutes since midnight, exclusive.
    pub end: u16,
}

impl TimeRange {
    /// Whether two half-open intervals intersect. Touching endpoints
    /// (`end == other.start`) do not count as overlap.
    pub fn overlaps(&self, other: &TimeRange) -> bool {
        self.start < other.end && other.start < self.end
    }
}

/// Parse a clock-time expression into minutes since midnight.
///
/// Accepts case-insensitive text containing digits and optional `am`/`pm`
/// markers, with arbitrary separator punctuation (`"08:30"`, `"8.30"`,
/// `"830"`, `"2pm"`, `"14 00"`). Everything outside `[0-9apm ]` is stripped
/// before parsing. Digit-string length decides the split: 1–2 digits are an
/// hour, 3 digits are H+MM, 4 digits are HH+MM.
///
/// A `pm` marker adds 12 hours unless the hour is already ≥ 12; an `am`
/// marker maps hour 12 to 0. Without a marker the hour is taken literally
/// (24-hour clock).
///
/// Returns `None` when the cleaned string is empty, has more than four
/// digits, or the hour/minute fall outside `0..=23` / `0..=59`.
///
/// # Examples
///
/// ```
/// use timetable_engine::clock::parse_clock_time;
///
/// assert_eq!(parse_clock_time("08:30"), Some(510));
/// assert_eq!(parse_clock_time("2pm"), Some(840));
/// assert_eq!(parse_clock_time("12am"), Some(0));
/// assert_eq!(parse_clock_time("25:00"), None);
/// ```
pub fn parse_clock_time(text: &str) -> Option<u16> {
    let lowered = text.trim().to_lowercase();
    let kept: String = lowered
        .chars()
        .filter(|c| c.is_ascii_digit() || matches!(c, 'a' | 'p' | 'm' | ' '))
        .collect();

    let is_pm = kept.contains('p');
    let is_am = kept.contains('a');

    let digits: String = kept.chars().filter(char::is_ascii_digit).collect();
    if digits.is_empty() {
        return None;
    }

    let (hour, minute): (u16, u16) = match digits.len() {
        1 | 2 => (digits.parse().ok()?, 0),
        3 => (digits[..1].parse().ok()?, digits[1..].parse().ok()?),
        4 => (digits[..2].parse().ok()?, digits[2..].parse().ok()?),
        _ => return None,
    };

    if hour > 23 || minute > 59 {
        return None;
    }

    let hour = if is_pm && hour < 12 {
        hour + 12
    } else if is_am && hour == 12 {
        0
    } else {
        hour
    };

    Some(hour * 60 + minute)
}

/// Parse a time-range expression into a [`TimeRange`].
///
/// The text is split on en-dash, em-dash, minus sign, tilde, arrow, hyphen,
/// or the word "to". With fewer than two parts the whole string is treated
/// as a single point in time and a 60-minute range `[t, t+60)` is
/// synthesized. Otherwise the first part is the start and the rejoined
/// remainder is the end.
///
/// An end at or before the start gets 12 hours added once, so unmarked PM
/// ranges like `"11:30 – 1:00"` span noon correctly. If the end still does
/// not exceed the start after that adjustment, the range is invalid.
///
/// # Examples
///
/// ```
/// use timetable_engine::clock::{parse_range, TimeRange};
///
/// assert_eq!(
///     parse_range("08:30 – 10:00"),
///     Some(TimeRange { start: 510, end: 600 })
/// );
/// assert_eq!(
///     parse_range("11:30 – 1:00"),
///     Some(TimeRange { start: 690, end: 780 })
/// );
/// assert_eq!(parse_range("9"), Some(TimeRange { start: 540, end: 600 }));
/// assert_eq!(parse_range(""), None);
/// ```
pub fn parse_range(text: &str) -> Option<TimeRange> {
    let lowered = text.trim().to_lowercase();
    if lowered.is_empty() {
        return None;
    }
    let unified = lowered.replace(" to ", "-");

    let parts: Vec<&str> = unified.split(SEPARATORS).map(str::trim).collect();
    if parts.len() < 2 {
        let point = parse_clock_time(&unified)?;
        return Some(TimeRange {
            start: point,
            end: point + 60,
        });
    }

    let start = parse_clock_time(parts[0])?;
    let mut end = parse_clock_time(&parts[1..].join(" "))?;
    if end <= start {
        end += 720;
    }
    if end <= start {
        return None;
    }
    Some(TimeRange { start, end })
}

/// Parse the end clock of a range expression's trailing half.
///
/// Used by the booking transaction to anchor a booking's expiry to the slot's
/// end time. Returns `None` when the text has no separator or the trailing
/// half is unparsable; the caller supplies the 23:59 fallback.
pub fn end_clock_minutes(text: &str) -> Option<u16> {
    let lowered = text.trim().to_lowercase();
    let unified = lowered.replace(" to ", "-");

    let mut parts = unified.split(SEPARATORS);
    parts.next()?;
    let rest: Vec<&str> = parts.map(str::trim).collect();
    if rest.is_empty() {
        return None;
    }
    parse_clock_time(&rest.join(" "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    // ── parse_clock_time tests ──────────────────────────────────────────

    #[test]
    fn test_parse_colon_form() {
        assert_eq!(parse_clock_time("08:30"), Some(8 * 60 + 30));
        assert_eq!(parse_clock_time("14:05"), Some(14 * 60 + 5));
    }

    #[test]
    fn test_parse_bare_hour() {
        assert_eq!(parse_clock_time("9"), Some(540));
        assert_eq!(parse_clock_time("23"), Some(23 * 60));
    }

    #[test]
    fn test_parse_three_digit_form() {
        // 930 = 9:30
        assert_eq!(parse_clock_time("930"), Some(9 * 60 + 30));
    }

    #[test]
    fn test_parse_four_digit_form() {
        assert_eq!(parse_clock_time("1430"), Some(14 * 60 + 30));
        assert_eq!(parse_clock_time("0030"), Some(30));
    }

    #[test]
    fn test_parse_pm_marker() {
        assert_eq!(parse_clock_time("2pm"), Some(14 * 60));
        assert_eq!(parse_clock_time("2:30 PM"), Some(14 * 60 + 30));
    }

    #[test]
    fn test_parse_noon_and_midnight_markers() {
        // 12pm stays noon, 12am wraps to midnight
        assert_eq!(parse_clock_time("12pm"), Some(12 * 60));
        assert_eq!(parse_clock_time("12am"), Some(0));
    }

    #[test]
    fn test_parse_pm_on_24h_hour_is_ignored() {
        assert_eq!(parse_clock_time("14pm"), Some(14 * 60));
    }

    #[test]
    fn test_parse_strips_punctuation() {
        assert_eq!(parse_clock_time("8.30"), Some(8 * 60 + 30));
        assert_eq!(parse_clock_time("[08:30]"), Some(8 * 60 + 30));
    }

    #[test]
    fn test_parse_rejects_out_of_range() {
        assert_eq!(parse_clock_time("25:00"), None);
        assert_eq!(parse_clock_time("10:75"), None);
        assert_eq!(parse_clock_time("12345"), None);
    }

    #[test]
    fn test_parse_rejects_empty_and_letters() {
        assert_eq!(parse_clock_time(""), None);
        assert_eq!(parse_clock_time("   "), None);
        assert_eq!(parse_clock_time("noon"), None);
    }

    // ── parse_range tests ───────────────────────────────────────────────

    #[test]
    fn test_range_en_dash() {
        assert_eq!(
            parse_range("08:30 – 10:00"),
            Some(TimeRange {
                start: 510,
                end: 600
            })
        );
    }

    #[test]
    fn test_range_hyphen_and_tilde() {
        let expected = Some(TimeRange {
            start: 600,
            end: 690,
        });
        assert_eq!(parse_range("10:00-11:30"), expected);
        assert_eq!(parse_range("10:00 ~ 11:30"), expected);
    }

    #[test]
    fn test_range_word_to() {
        assert_eq!(
            parse_range("9 to 11"),
            Some(TimeRange {
                start: 540,
                end: 660
            })
        );
    }

    #[test]
    fn test_range_single_point_synthesizes_hour() {
        assert_eq!(
            parse_range("14:00"),
            Some(TimeRange {
                start: 840,
                end: 900
            })
        );
    }

    #[test]
    fn test_range_unmarked_pm_gets_12h_shift() {
        // "11:30 – 1:00" spans noon
        assert_eq!(
            parse_range("11:30 – 1:00"),
            Some(TimeRange {
                start: 690,
                end: 780
            })
        );
    }

    #[test]
    fn test_range_equal_endpoints_shift_once_then_fail() {
        // 13:00 – 1:00 → end 780 == start 780 → +720 → 1500, valid
        assert_eq!(
            parse_range("13:00 – 1:00"),
            Some(TimeRange {
                start: 780,
                end: 1500
            })
        );
        // identical halves collapse even after the shift? 10:00 – 10:00
        // becomes 600..1320 after one shift, which is accepted.
        assert_eq!(
            parse_range("10:00 – 10:00"),
            Some(TimeRange {
                start: 600,
                end: 1320
            })
        );
    }

    #[test]
    fn test_range_invalid_half_propagates_none() {
        assert_eq!(parse_range("junk – 10:00"), None);
        assert_eq!(parse_range("08:30 – junk"), None);
    }

    // ── end_clock_minutes tests ─────────────────────────────────────────

    #[test]
    fn test_end_clock_of_range() {
        assert_eq!(end_clock_minutes("08:30 – 10:00"), Some(600));
        assert_eq!(end_clock_minutes("9 to 2pm"), Some(14 * 60));
    }

    #[test]
    fn test_end_clock_without_separator() {
        assert_eq!(end_clock_minutes("08:30"), None);
    }

    #[test]
    fn test_end_clock_unparsable_half() {
        assert_eq!(end_clock_minutes("08:30 – whenever"), None);
    }

    // ── property tests ──────────────────────────────────────────────────

    proptest! {
        /// Accepted clock times always land inside a single day.
        #[test]
        fn prop_clock_time_within_day(s in "\\PC{0,12}") {
            if let Some(minutes) = parse_clock_time(&s) {
                prop_assert!(minutes <= 1439);
            }
        }

        /// Parsed ranges always run forward.
        #[test]
        fn prop_ranges_run_forward(s in "[0-9apm:~ –-]{0,16}") {
            if let Some(range) = parse_range(&s) {
                prop_assert!(range.start < range.end);
                prop_assert!(range.start <= 1439);
            }
        }
    }
}
