//! The expiry engine: retire lapsed temporary bookings.
//!
//! One sweep scans every room, deletes bookings whose expiry lies strictly
//! before `now`, and refreshes each floor's time-label view so columns that
//! only a lapsed booking referenced disappear. The permanent ledger is never
//! touched. Sweeping is idempotent: a second pass with the same `now`
//! reports no change.

use crate::model::Campus;

/// How often the host's watch loop should run a sweep, in seconds.
pub const SWEEP_INTERVAL_SECS: u64 = 30;

/// Remove every booking that expired before `now_ms` and prune unreferenced
/// time labels. Returns whether anything changed, so the caller can decide
/// whether to persist.
pub fn sweep(campus: &mut Campus, now_ms: i64) -> bool {
    let mut changed = false;

    for building in &mut campus.buildings {
        for floor in &mut building.floors {
            for room in &mut floor.rooms {
                let room_name = room.name.clone();
                let before = room.booked.len();
                room.booked.retain(|b| {
                    if b.expires_at_ms < now_ms {
                        log::info!(
                            "expiring booking in {}: {} {} (ended at epoch ms {})",
                            room_name,
                            b.day,
                            b.time_label,
                            b.expires_at_ms
                        );
                        false
                    } else {
                        true
                    }
                });
                if room.booked.len() != before {
                    changed = true;
                }
            }

            let labels_before = floor.time_labels.clone();
            floor.refresh_time_labels();
            if floor.time_labels != labels_before {
                changed = true;
            }
        }
    }

    changed
}
