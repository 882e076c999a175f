//! # timetable-engine
//!
//! Deterministic room scheduling for campus timetables.
//!
//! The engine keeps a campus of buildings, floors and rooms with two slot
//! ledgers per room (permanent classes and expiring walk-in bookings),
//! evaluates time-range overlap on forgiving human-typed labels, answers
//! availability queries, and retires lapsed bookings. All time-dependent
//! operations take an explicit "now" — the engine never reads the system
//! clock, so every computation is reproducible.
//!
//! ## Modules
//!
//! - [`clock`] — Forgiving clock-time and time-range label parsing
//! - [`overlap`] — Half-open interval overlap between two labels
//! - [`model`] — Campus / Building / Floor / Room store and timetable projection
//! - [`availability`] — Free-room queries over the permanent ledger
//! - [`booking`] — Walk-in booking transaction with grace-window expiry
//! - [`expiry`] — Periodic sweep retiring lapsed bookings
//! - [`persist`] — Snapshot persistence and the mutation façade
//! - [`error`] — Error types

pub mod availability;
pub mod booking;
pub mod clock;
pub mod error;
pub mod expiry;
pub mod model;
pub mod overlap;
pub mod persist;

pub use availability::{find_free_rooms, FloorAvailability, FreeRoom};
pub use booking::{book_room, BookingReceipt, BookingRequest, GRACE_MS};
pub use clock::{end_clock_minutes, parse_clock_time, parse_range, TimeRange};
pub use error::{Result, ScheduleError};
pub use expiry::{sweep, SWEEP_INTERVAL_SECS};
pub use model::{
    Booking, Building, Campus, CellEntry, Day, Floor, Room, RoomConfig, ScheduledSlot,
    PREDEFINED_LABELS,
};
pub use overlap::labels_overlap;
pub use persist::{JsonFileStore, ScheduleService, SnapshotStore};
