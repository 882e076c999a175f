//! Conflict detection between two time-label texts.
//!
//! Labels are compared by parsing both sides into minute-of-day intervals
//! and intersecting them as half-open ranges. A label that fails to parse
//! never conflicts with anything: unreadable slots are excluded from
//! comparisons rather than treated as errors.

use crate::clock::parse_range;

/// Whether two time-label texts describe conflicting intervals.
///
/// Both operands are parsed independently via [`parse_range`]; if either
/// fails to parse, the answer is `false`. Two ranges overlap iff
/// `requested.start < existing.end && existing.start < requested.end` —
/// touching endpoints do not count.
///
/// # Examples
///
/// ```
/// use timetable_engine::overlap::labels_overlap;
///
/// assert!(labels_overlap("08:30 – 10:00", "09:00 – 09:30"));
/// assert!(!labels_overlap("08:30 – 10:00", "10:00 – 11:00"));
/// assert!(!labels_overlap("08:30 – 10:00", "not a time"));
/// ```
pub fn labels_overlap(requested: &str, existing: &str) -> bool {
    match (parse_range(requested), parse_range(existing)) {
        (Some(req), Some(ex)) => req.overlaps(&ex),
        _ => false,
    }
}
