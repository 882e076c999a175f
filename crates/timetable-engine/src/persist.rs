//! Snapshot persistence and the mutation façade.
//!
//! The store is serialized as one nested JSON document (versionless) through
//! the [`SnapshotStore`] seam, so hosts can swap the backing medium. The
//! shipping implementation is a plain file. [`ScheduleService`] pairs the
//! in-memory [`Campus`] with a backend and persists after every mutating
//! operation; a failed save is logged and the in-memory change kept —
//! losing a snapshot write is preferred over blocking the host, and the next
//! mutation will write the then-current state anyway.

use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;

use crate::booking::{book_room, BookingReceipt, BookingRequest};
use crate::error::{Result, ScheduleError};
use crate::expiry::sweep;
use crate::model::{Campus, Day, Room, RoomConfig};

/// Durable storage for the whole campus snapshot.
pub trait SnapshotStore {
    fn save(&self, campus: &Campus) -> Result<()>;
    /// `Ok(None)` means no snapshot exists yet — a fresh install, not an
    /// error.
    fn load(&self) -> Result<Option<Campus>>;
}

/// File-backed [`SnapshotStore`] writing pretty-printed JSON.
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        JsonFileStore { path: path.into() }
    }
}

impl SnapshotStore for JsonFileStore {
    fn save(&self, campus: &Campus) -> Result<()> {
        let json = serde_json::to_string_pretty(campus)
            .map_err(|e| ScheduleError::Persistence(e.to_string()))?;
        fs::write(&self.path, json).map_err(|e| {
            ScheduleError::Persistence(format!("{}: {}", self.path.display(), e))
        })
    }

    fn load(&self) -> Result<Option<Campus>> {
        match fs::read_to_string(&self.path) {
            Ok(text) => serde_json::from_str(&text)
                .map(Some)
                .map_err(|e| ScheduleError::Persistence(format!("{}: {}", self.path.display(), e))),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(ScheduleError::Persistence(format!(
                "{}: {}",
                self.path.display(),
                e
            ))),
        }
    }
}

/// The campus store paired with its persistence backend.
///
/// Every mutating method commits the change in memory first, then saves the
/// snapshot. Save failures warn and continue.
pub struct ScheduleService<S: SnapshotStore> {
    campus: Campus,
    store: S,
}

impl<S: SnapshotStore> ScheduleService<S> {
    /// Hydrate from the backend, starting empty when no snapshot exists.
    pub fn open(store: S) -> Result<Self> {
        let campus = store.load()?.unwrap_or_default();
        Ok(ScheduleService { campus, store })
    }

    pub fn campus(&self) -> &Campus {
        &self.campus
    }

    fn persist(&self) {
        if let Err(err) = self.store.save(&self.campus) {
            log::warn!("snapshot save failed, keeping in-memory changes: {err}");
        }
    }

    pub fn ensure_buildings(&mut self, count: usize) -> usize {
        let added = self.campus.ensure_buildings(count);
        if added > 0 {
            self.persist();
        }
        added
    }

    pub fn rename_building(&mut self, idx: usize, name: &str) -> Result<()> {
        self.campus.rename_building(idx, name)?;
        self.persist();
        Ok(())
    }

    pub fn reset_building_name(&mut self, idx: usize) -> Result<()> {
        self.campus.reset_building_name(idx)?;
        self.persist();
        Ok(())
    }

    pub fn set_floor_count(&mut self, building: usize, count: usize) -> Result<()> {
        self.campus.building_mut(building)?.set_floor_count(count);
        self.persist();
        Ok(())
    }

    pub fn add_room(&mut self, building: usize, floor: usize, config: RoomConfig) -> Result<()> {
        self.campus.add_room(building, floor, config)?;
        self.persist();
        Ok(())
    }

    pub fn remove_room(&mut self, building: usize, floor: usize, room: usize) -> Result<Room> {
        let removed = self.campus.remove_room(building, floor, room)?;
        self.persist();
        Ok(removed)
    }

    pub fn book_room(
        &mut self,
        building: usize,
        floor: usize,
        room: usize,
        request: &BookingRequest,
        now: DateTime<Utc>,
        tz: Tz,
    ) -> Result<BookingReceipt> {
        let receipt = book_room(&mut self.campus, building, floor, room, request, now, tz)?;
        self.persist();
        Ok(receipt)
    }

    /// Run one expiry sweep; the snapshot is saved only when something
    /// actually changed.
    pub fn sweep(&mut self, now_ms: i64) -> bool {
        let changed = sweep(&mut self.campus, now_ms);
        if changed {
            self.persist();
        }
        changed
    }

    /// Move a permanent slot to another (day, label) cell.
    #[allow(clippy::too_many_arguments)]
    pub fn move_slot(
        &mut self,
        building: usize,
        floor: usize,
        room: usize,
        from_day: Day,
        from_label: &str,
        to_day: Day,
        to_label: &str,
    ) -> Result<()> {
        self.campus
            .room_mut(building, floor, room)?
            .move_slot(from_day, from_label, to_day, to_label);
        self.campus.floor_mut(building, floor)?.refresh_time_labels();
        self.persist();
        Ok(())
    }

    /// Discard every building and persist the empty snapshot.
    pub fn reset(&mut self) {
        self.campus.reset();
        self.persist();
    }
}
