//! The booking transaction: validate and commit a same-day reservation.
//!
//! A booking is keyed by (room, day, time label). Re-booking an existing key
//! updates the entry in place — an upsert, never a duplicate. Expiry is
//! anchored to "today" in the campus timezone at the slot's end clock; the
//! caller supplies the `now` instant and the timezone explicitly, so the
//! transaction itself never reads the system clock.

use chrono::{DateTime, TimeZone, Utc};
use chrono_tz::Tz;
use serde::Serialize;

use crate::clock::end_clock_minutes;
use crate::error::{Result, ScheduleError};
use crate::model::{Booking, Campus, Day};

/// Tolerance before a just-ended slot is considered expired. Within this
/// window a booking keeps its natural end time even though it lies in the
/// past.
pub const GRACE_MS: i64 = 5 * 60 * 1000;

/// How far behind `now` an already-lapsed booking's effective expiry is set,
/// so the next sweep retires it without the transaction having to reject.
const INSTANT_EXPIRY_BACKDATE_MS: i64 = 10_000;

/// End clock used when the trailing half of the time label is unparsable.
const FALLBACK_END_MINUTES: u16 = 23 * 60 + 59;

/// A booking request as collected from the host.
///
/// `day` is raw text: anything that is not one of the seven canonical
/// weekday names is coerced to Monday (logged, not rejected).
#[derive(Debug, Clone)]
pub struct BookingRequest {
    pub day: String,
    pub time_label: String,
    pub teacher: String,
    pub subject: String,
}

/// What the transaction committed.
#[derive(Debug, Clone, Serialize)]
pub struct BookingReceipt {
    pub day: Day,
    pub time_label: String,
    /// Absolute expiry instant, epoch milliseconds.
    pub expires_at_ms: i64,
    /// True when an existing entry was updated rather than appended.
    pub updated: bool,
}

/// Validate and commit a temporary booking on one room.
///
/// # Arguments
///
/// * `campus` — the store to mutate
/// * `building`, `floor`, `room` — indices addressing the room
/// * `request` — day text, time label, teacher, subject
/// * `now` — the current instant (typically `Utc::now()`, supplied by the host)
/// * `tz` — the campus timezone; "today" and the expiry clock live in it
///
/// # Errors
///
/// [`ScheduleError::MissingField`] when teacher or subject is empty after
/// trimming, or an index error when the room does not exist. On any error
/// the store is left unchanged.
///
/// The caller is expected to persist the snapshot after a successful return.
pub fn book_room(
    campus: &mut Campus,
    building: usize,
    floor: usize,
    room: usize,
    request: &BookingRequest,
    now: DateTime<Utc>,
    tz: Tz,
) -> Result<BookingReceipt> {
    let teacher = request.teacher.trim();
    let subject = request.subject.trim();
    if teacher.is_empty() {
        return Err(ScheduleError::MissingField("teacher"));
    }
    if subject.is_empty() {
        return Err(ScheduleError::MissingField("subject"));
    }

    let day = Day::coerce(&request.day);
    let expires_at_ms = compute_expiry_ms(&request.time_label, now, tz);

    let room_ref = campus.room_mut(building, floor, room)?;
    let updated = match room_ref.booking_index(day, &request.time_label) {
        Some(idx) => {
            let entry = &mut room_ref.booked[idx];
            entry.teacher = teacher.to_string();
            entry.subject = subject.to_string();
            entry.expires_at_ms = expires_at_ms;
            entry.active = true;
            true
        }
        None => {
            room_ref.booked.push(Booking {
                day,
                time_label: request.time_label.clone(),
                teacher: teacher.to_string(),
                subject: subject.to_string(),
                expires_at_ms,
                active: true,
            });
            if room_ref.semester.trim().is_empty() {
                room_ref.semester = "Booked Class".to_string();
            }
            if room_ref.departments.is_empty() {
                room_ref.departments = vec!["General".to_string()];
            }
            false
        }
    };

    campus.floor_mut(building, floor)?.refresh_time_labels();

    log::info!(
        "booking saved: {} {} (teacher {}, expires at epoch ms {})",
        day,
        request.time_label,
        teacher,
        expires_at_ms
    );

    Ok(BookingReceipt {
        day,
        time_label: request.time_label.clone(),
        expires_at_ms,
        updated,
    })
}

/// Today's date in `tz` at the slot's end clock, as epoch milliseconds,
/// with the grace window applied: an expiry more than [`GRACE_MS`] in the
/// past is replaced by `now − 10 s` so the booking is created but retired
/// on the next sweep.
fn compute_expiry_ms(time_label: &str, now: DateTime<Utc>, tz: Tz) -> i64 {
    let end_minutes = end_clock_minutes(time_label).unwrap_or(FALLBACK_END_MINUTES);
    let local_now = now.with_timezone(&tz);

    let naive_end = local_now
        .date_naive()
        .and_hms_opt(u32::from(end_minutes) / 60, u32::from(end_minutes) % 60, 0);

    // A DST gap can make the local end time nonexistent; collapse to now in
    // that case so the grace logic decides the outcome.
    let mut expires_at_ms = naive_end
        .and_then(|naive| tz.from_local_datetime(&naive).earliest())
        .map(|dt| dt.timestamp_millis())
        .unwrap_or_else(|| now.timestamp_millis());

    let now_ms = now.timestamp_millis();
    if expires_at_ms < now_ms - GRACE_MS {
        expires_at_ms = now_ms - INSTANT_EXPIRY_BACKDATE_MS;
    }
    expires_at_ms
}
