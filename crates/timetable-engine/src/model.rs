//! The schedule store: buildings → floors → rooms → slots.
//!
//! [`Campus`] is an explicit store object passed by reference to every
//! component — no ambient globals. Each room keeps two ledgers of record
//! types: permanent weekly slots that never expire, and temporary bookings
//! that the expiry engine deletes once lapsed. Floors carry a materialized
//! view of every time label in use, refreshed by pure recomputation after
//! each mutation rather than patched incrementally.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::clock::{parse_clock_time, parse_range};
use crate::error::{Result, ScheduleError};

/// Canonical slot labels rendered as fixed timetable columns, in display
/// order. Custom labels slot in next to their nearest neighbour.
pub const PREDEFINED_LABELS: [&str; 5] = [
    "08:30 – 10:00",
    "10:00 – 11:30",
    "11:30 – 01:00",
    "01:00 – 02:30",
    "02:30 – 04:00",
];

/// Ordinal floor names used when floors are created by count.
const FLOOR_NAMES: [&str; 21] = [
    "Ground",
    "First",
    "Second",
    "Third",
    "Fourth",
    "Fifth",
    "Sixth",
    "Seventh",
    "Eighth",
    "Ninth",
    "Tenth",
    "Eleventh",
    "Twelfth",
    "Thirteenth",
    "Fourteenth",
    "Fifteenth",
    "Sixteenth",
    "Seventeenth",
    "Eighteenth",
    "Nineteenth",
    "Twentieth",
];

// ── Day ─────────────────────────────────────────────────────────────────────

/// A canonical weekday name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Day {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Day {
    pub const ALL: [Day; 7] = [
        Day::Monday,
        Day::Tuesday,
        Day::Wednesday,
        Day::Thursday,
        Day::Friday,
        Day::Saturday,
        Day::Sunday,
    ];

    /// Parse a day name, case-insensitive; accepts the full name or a
    /// three-letter prefix ("tue", "Tuesday").
    pub fn parse(text: &str) -> Option<Day> {
        let lowered = text.trim().to_lowercase();
        Day::ALL
            .into_iter()
            .find(|d| {
                let name = d.name().to_lowercase();
                lowered == name || (lowered.len() == 3 && name.starts_with(&lowered))
            })
    }

    /// Parse a day name, falling back to Monday for anything unrecognized.
    /// The coercion is logged, not surfaced as an error.
    pub fn coerce(text: &str) -> Day {
        Day::parse(text).unwrap_or_else(|| {
            log::warn!("invalid day name '{}', coercing to Monday", text.trim());
            Day::Monday
        })
    }

    pub fn name(&self) -> &'static str {
        match self {
            Day::Monday => "Monday",
            Day::Tuesday => "Tuesday",
            Day::Wednesday => "Wednesday",
            Day::Thursday => "Thursday",
            Day::Friday => "Friday",
            Day::Saturday => "Saturday",
            Day::Sunday => "Sunday",
        }
    }
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ── Slot records ────────────────────────────────────────────────────────────

/// A recurring weekly reservation configured at setup time. Never
/// auto-expires.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledSlot {
    pub day: Day,
    pub time_label: String,
    pub teacher: String,
    pub subject: String,
}

/// A same-day reservation created through the availability flow. Deleted
/// (not deactivated) once its expiry timestamp has passed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Booking {
    pub day: Day,
    pub time_label: String,
    pub teacher: String,
    pub subject: String,
    /// Absolute expiry instant, epoch milliseconds.
    pub expires_at_ms: i64,
    /// Display precedence flag; remaining bookings are active in practice
    /// since expiry removes entries outright.
    pub active: bool,
}

// ── Room ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Room {
    pub name: String,
    pub capacity: u32,
    pub semester: String,
    pub departments: Vec<String>,
    /// Permanent ledger.
    pub scheduled: Vec<ScheduledSlot>,
    /// Temporary ledger.
    pub booked: Vec<Booking>,
}

impl Room {
    /// Whether the permanent ledger already holds this exact (day, label)
    /// pair.
    pub fn has_scheduled(&self, day: Day, time_label: &str) -> bool {
        self.scheduled
            .iter()
            .any(|s| s.day == day && s.time_label == time_label)
    }

    /// Index of the temporary entry keyed by this exact (day, label) pair,
    /// if one exists. This is the booking upsert key.
    pub fn booking_index(&self, day: Day, time_label: &str) -> Option<usize> {
        self.booked
            .iter()
            .position(|b| b.day == day && b.time_label == time_label)
    }

    /// Move a permanent slot to a new (day, label) cell.
    ///
    /// The first slot matching the source pair is removed and its
    /// teacher/subject carried over to a new slot at the destination. If the
    /// destination pair is already occupied by this room, the append silently
    /// no-ops while the source removal stays committed — a documented
    /// data-loss edge of the drag-reassignment flow. Temporary bookings are
    /// never touched.
    pub fn move_slot(&mut self, from_day: Day, from_label: &str, to_day: Day, to_label: &str) {
        if from_day == to_day && from_label == to_label {
            return;
        }

        let Some(idx) = self
            .scheduled
            .iter()
            .position(|s| s.day == from_day && s.time_label == from_label)
        else {
            return;
        };
        let removed = self.scheduled.remove(idx);

        if !self.has_scheduled(to_day, to_label) {
            self.scheduled.push(ScheduledSlot {
                day: to_day,
                time_label: to_label.to_string(),
                teacher: removed.teacher,
                subject: removed.subject,
            });
        }
    }
}

// ── Floor ───────────────────────────────────────────────────────────────────

/// One occupant of a timetable cell, ready for rendering.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CellEntry {
    pub room: String,
    pub capacity: u32,
    pub teacher: String,
    pub subject: String,
    pub semester: String,
    /// True when this entry comes from the temporary ledger.
    pub booked: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Floor {
    pub name: String,
    pub rooms: Vec<Room>,
    /// Materialized view: every time label used by any room on this floor,
    /// insertion-ordered and deduplicated. Kept current by
    /// [`Floor::refresh_time_labels`].
    #[serde(default)]
    pub time_labels: Vec<String>,
}

impl Floor {
    pub fn new(name: impl Into<String>) -> Self {
        Floor {
            name: name.into(),
            rooms: Vec::new(),
            time_labels: Vec::new(),
        }
    }

    /// Recompute the time-label view from scratch: drop labels no longer
    /// referenced by any permanent or remaining temporary slot, keep the
    /// stored order of survivors, and append newly referenced labels in
    /// room order.
    pub fn refresh_time_labels(&mut self) {
        let referenced: Vec<&str> = self
            .rooms
            .iter()
            .flat_map(|room| {
                room.scheduled
                    .iter()
                    .map(|s| s.time_label.as_str())
                    .chain(room.booked.iter().map(|b| b.time_label.as_str()))
            })
            .collect();

        let mut labels: Vec<String> = self
            .time_labels
            .drain(..)
            .filter(|label| referenced.iter().any(|r| r == label))
            .collect();
        for label in referenced {
            if !labels.iter().any(|l| l == label) {
                labels.push(label.to_string());
            }
        }
        self.time_labels = labels;
    }

    /// Column order for the timetable grid: predefined labels first in their
    /// fixed order, then each custom label inserted after the predefined
    /// label whose start minute is closest, nearest customs placed first.
    pub fn ordered_labels(&self, predefined: &[&str]) -> Vec<String> {
        let start_of = |label: &str| -> i32 {
            parse_range(label)
                .map(|r| i32::from(r.start))
                .or_else(|| parse_clock_time(label).map(i32::from))
                .unwrap_or(0)
        };

        let used_predefined: Vec<&str> = predefined
            .iter()
            .copied()
            .filter(|p| self.time_labels.iter().any(|l| l == p))
            .collect();

        let mut customs: Vec<&str> = self
            .time_labels
            .iter()
            .map(String::as_str)
            .filter(|l| !predefined.contains(l))
            .collect();

        let mut columns: Vec<String> = used_predefined.iter().map(|p| p.to_string()).collect();
        if used_predefined.is_empty() {
            columns.extend(customs.iter().map(|c| c.to_string()));
            return columns;
        }

        let distance = |custom: &str| -> i32 {
            used_predefined
                .iter()
                .map(|p| (start_of(custom) - start_of(p)).abs())
                .min()
                .unwrap_or(i32::MAX)
        };
        customs.sort_by_key(|c| distance(c));

        for custom in customs {
            let closest = used_predefined
                .iter()
                .enumerate()
                .min_by_key(|(_, p)| (start_of(custom) - start_of(p)).abs())
                .map(|(idx, _)| idx)
                .unwrap_or(0);

            // Insert after the closest predefined label and after any customs
            // already attached to it.
            let anchor = used_predefined[closest];
            let mut pos = columns.iter().position(|c| c == anchor).unwrap_or(0) + 1;
            while pos < columns.len() && !predefined.contains(&columns[pos].as_str()) {
                pos += 1;
            }
            columns.insert(pos, custom.to_string());
        }
        columns
    }

    /// Occupants of one (day, label) cell across all rooms. Permanent slots
    /// come first; an active booking for the same room/day/label replaces
    /// that room's permanent entries and is flagged as booked.
    pub fn cell_occupants(&self, day: Day, time_label: &str) -> Vec<CellEntry> {
        let mut entries: Vec<(usize, CellEntry)> = Vec::new();

        for (room_idx, room) in self.rooms.iter().enumerate() {
            for slot in &room.scheduled {
                if slot.day == day && slot.time_label == time_label {
                    entries.push((
                        room_idx,
                        CellEntry {
                            room: room.name.clone(),
                            capacity: room.capacity,
                            teacher: slot.teacher.clone(),
                            subject: slot.subject.clone(),
                            semester: room.semester.clone(),
                            booked: false,
                        },
                    ));
                }
            }
        }

        for (room_idx, room) in self.rooms.iter().enumerate() {
            for booking in &room.booked {
                if booking.day == day && booking.time_label == time_label && booking.active {
                    entries.retain(|(idx, _)| *idx != room_idx);
                    entries.push((
                        room_idx,
                        CellEntry {
                            room: room.name.clone(),
                            capacity: room.capacity,
                            teacher: booking.teacher.clone(),
                            subject: booking.subject.clone(),
                            semester: room.semester.clone(),
                            booked: true,
                        },
                    ));
                }
            }
        }

        entries.into_iter().map(|(_, e)| e).collect()
    }
}

// ── Building ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Building {
    pub name: String,
    pub floors: Vec<Floor>,
}

impl Building {
    /// Resize the floor list to `count`. Shrinking truncates from the top;
    /// growing appends floors with ordinal default names ("Ground", "First",
    /// …, then "{n}th").
    pub fn set_floor_count(&mut self, count: usize) {
        if count < self.floors.len() {
            self.floors.truncate(count);
            return;
        }
        for idx in self.floors.len()..count {
            self.floors.push(Floor::new(ordinal_floor_name(idx)));
        }
    }
}

fn ordinal_floor_name(index: usize) -> String {
    FLOOR_NAMES
        .get(index)
        .map(|n| (*n).to_string())
        .unwrap_or_else(|| format!("{}th", index + 1))
}

fn default_building_name(index: usize) -> String {
    format!("Building {}", index + 1)
}

// ── Campus ──────────────────────────────────────────────────────────────────

/// Parameters for adding a room. One [`ScheduledSlot`] is created per time
/// label, with the day, teacher and subject repeated across them.
#[derive(Debug, Clone)]
pub struct RoomConfig {
    pub name: String,
    pub capacity: u32,
    pub day: Day,
    pub time_labels: Vec<String>,
    pub teacher: String,
    pub subject: String,
    pub semester: String,
    pub departments: Vec<String>,
}

/// The whole entity graph. This is the one mutable store object; every
/// component takes it (or a part of it) explicitly.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Campus {
    pub buildings: Vec<Building>,
}

impl Campus {
    pub fn new() -> Self {
        Campus::default()
    }

    /// Grow the building list to at least `count`, appending buildings with
    /// positional default names. Returns how many were added.
    pub fn ensure_buildings(&mut self, count: usize) -> usize {
        let before = self.buildings.len();
        for idx in before..count {
            self.buildings.push(Building {
                name: default_building_name(idx),
                floors: Vec::new(),
            });
        }
        self.buildings.len() - before
    }

    pub fn building(&self, idx: usize) -> Result<&Building> {
        self.buildings
            .get(idx)
            .ok_or(ScheduleError::BuildingNotFound(idx))
    }

    pub fn building_mut(&mut self, idx: usize) -> Result<&mut Building> {
        self.buildings
            .get_mut(idx)
            .ok_or(ScheduleError::BuildingNotFound(idx))
    }

    pub fn floor_mut(&mut self, building: usize, floor: usize) -> Result<&mut Floor> {
        self.building_mut(building)?
            .floors
            .get_mut(floor)
            .ok_or(ScheduleError::FloorNotFound { building, floor })
    }

    /// Give a building a custom name.
    pub fn rename_building(&mut self, idx: usize, name: &str) -> Result<()> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ScheduleError::MissingField("building name"));
        }
        self.building_mut(idx)?.name = name.to_string();
        Ok(())
    }

    /// Drop a building's custom name back to its positional default.
    pub fn reset_building_name(&mut self, idx: usize) -> Result<()> {
        self.building_mut(idx)?.name = default_building_name(idx);
        Ok(())
    }

    /// Add a room with its initial permanent slots and register its labels
    /// on the floor.
    pub fn add_room(&mut self, building: usize, floor: usize, config: RoomConfig) -> Result<()> {
        if config.name.trim().is_empty() {
            return Err(ScheduleError::MissingField("room name"));
        }
        if config.teacher.trim().is_empty() {
            return Err(ScheduleError::MissingField("teacher"));
        }
        if config.subject.trim().is_empty() {
            return Err(ScheduleError::MissingField("subject"));
        }
        if config.semester.trim().is_empty() {
            return Err(ScheduleError::MissingField("semester"));
        }
        if config.time_labels.is_empty() {
            return Err(ScheduleError::MissingField("time slots"));
        }
        if config.departments.is_empty() {
            return Err(ScheduleError::MissingField("departments"));
        }
        if config.capacity == 0 {
            return Err(ScheduleError::InvalidCapacity(0));
        }

        let scheduled = config
            .time_labels
            .iter()
            .map(|label| ScheduledSlot {
                day: config.day,
                time_label: label.clone(),
                teacher: config.teacher.clone(),
                subject: config.subject.clone(),
            })
            .collect();

        let floor_ref = self.floor_mut(building, floor)?;
        floor_ref.rooms.push(Room {
            name: config.name,
            capacity: config.capacity,
            semester: config.semester,
            departments: config.departments,
            scheduled,
            booked: Vec::new(),
        });
        floor_ref.refresh_time_labels();
        Ok(())
    }

    /// Remove a room, discarding both of its ledgers and pruning labels the
    /// floor no longer references. Removing the last room clears the floor's
    /// label view entirely.
    pub fn remove_room(&mut self, building: usize, floor: usize, room: usize) -> Result<Room> {
        let floor_ref = self.floor_mut(building, floor)?;
        if room >= floor_ref.rooms.len() {
            return Err(ScheduleError::RoomNotFound {
                building,
                floor,
                room,
            });
        }
        let removed = floor_ref.rooms.remove(room);
        floor_ref.refresh_time_labels();
        Ok(removed)
    }

    pub fn room_mut(&mut self, building: usize, floor: usize, room: usize) -> Result<&mut Room> {
        self.floor_mut(building, floor)?
            .rooms
            .get_mut(room)
            .ok_or(ScheduleError::RoomNotFound {
                building,
                floor,
                room,
            })
    }

    /// Full reset: discard every building.
    pub fn reset(&mut self) {
        self.buildings.clear();
    }
}
