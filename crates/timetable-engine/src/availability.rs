//! Free-room search across a building.
//!
//! Answers "which rooms are free on this day during this time range",
//! grouped by floor. Rooms sharing a name (case-insensitive, trimmed) are
//! collapsed into one candidate: the first occurrence is the representative,
//! and a permanent slot on *any* same-named room marks the whole group busy.
//!
//! Only the permanent ledger is consulted. Active temporary bookings do not
//! block search results even though the timetable shows them as occupying
//! the cell — a deliberate carry-over from the source system, pinned by a
//! test below rather than silently corrected.

use serde::Serialize;

use crate::model::{Building, Day};
use crate::overlap::labels_overlap;

/// A free room candidate within one floor.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FreeRoom {
    /// Index of the representative room within the floor's room list.
    pub room_index: usize,
    pub name: String,
    pub capacity: u32,
}

/// The free rooms of one floor. Floors with no free rooms are omitted from
/// results entirely.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FloorAvailability {
    pub floor_index: usize,
    pub floor_name: String,
    pub rooms: Vec<FreeRoom>,
}

/// Find every room in `building` free on `day` during `time_text`.
///
/// A room group is free iff no room carrying its name has a permanent slot
/// whose day matches and whose label overlaps the requested range. The
/// capacity filter applies after freeness: with `min_capacity == 0` it is
/// disabled, otherwise the representative's capacity must reach it.
///
/// An empty result is a valid outcome, not an error. An unparsable
/// `time_text` conflicts with nothing, so every room reports as free.
pub fn find_free_rooms(
    building: &Building,
    day: Day,
    time_text: &str,
    min_capacity: u32,
) -> Vec<FloorAvailability> {
    let mut results = Vec::new();

    for (floor_index, floor) in building.floors.iter().enumerate() {
        // Insertion-ordered grouping by normalized room name.
        let mut groups: Vec<(String, FreeRoom, bool)> = Vec::new();

        for (room_index, room) in floor.rooms.iter().enumerate() {
            let key = room.name.trim().to_lowercase();
            if !groups.iter().any(|(k, _, _)| *k == key) {
                groups.push((
                    key.clone(),
                    FreeRoom {
                        room_index,
                        name: room.name.clone(),
                        capacity: room.capacity,
                    },
                    true,
                ));
            }

            let occupied = room
                .scheduled
                .iter()
                .any(|slot| slot.day == day && labels_overlap(time_text, &slot.time_label));
            if occupied {
                if let Some(group) = groups.iter_mut().find(|(k, _, _)| *k == key) {
                    group.2 = false;
                }
            }
        }

        let rooms: Vec<FreeRoom> = groups
            .into_iter()
            .filter(|(_, room, free)| {
                *free && (min_capacity == 0 || room.capacity >= min_capacity)
            })
            .map(|(_, room, _)| room)
            .collect();

        if !rooms.is_empty() {
            results.push(FloorAvailability {
                floor_index,
                floor_name: floor.name.clone(),
                rooms,
            });
        }
    }

    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Booking, Floor, Room, ScheduledSlot};

    fn room(name: &str, capacity: u32, slots: Vec<(Day, &str)>) -> Room {
        Room {
            name: name.to_string(),
            capacity,
            semester: "Fall".to_string(),
            departments: vec!["CS".to_string()],
            scheduled: slots
                .into_iter()
                .map(|(day, label)| ScheduledSlot {
                    day,
                    time_label: label.to_string(),
                    teacher: "Aslam".to_string(),
                    subject: "Physics".to_string(),
                })
                .collect(),
            booked: Vec::new(),
        }
    }

    fn building(rooms: Vec<Room>) -> Building {
        Building {
            name: "Building 1".to_string(),
            floors: vec![Floor {
                name: "Ground".to_string(),
                rooms,
                time_labels: Vec::new(),
            }],
        }
    }

    #[test]
    fn test_overlapping_permanent_slot_excludes_room() {
        let b = building(vec![room(
            "R1",
            30,
            vec![(Day::Monday, "08:30 – 10:00")],
        )]);
        let free = find_free_rooms(&b, Day::Monday, "09:00 – 09:30", 0);
        assert!(free.is_empty());
    }

    #[test]
    fn test_touching_range_keeps_room_free() {
        let b = building(vec![room(
            "R1",
            30,
            vec![(Day::Monday, "08:30 – 10:00")],
        )]);
        let free = find_free_rooms(&b, Day::Monday, "10:00 – 11:00", 0);
        assert_eq!(free.len(), 1);
        assert_eq!(free[0].rooms[0].name, "R1");
    }

    #[test]
    fn test_day_and_label_are_checked_as_a_pair() {
        // Busy Monday morning and Tuesday midday; Monday midday stays free.
        let b = building(vec![room(
            "R1",
            30,
            vec![
                (Day::Monday, "08:30 – 10:00"),
                (Day::Tuesday, "10:00 – 11:30"),
            ],
        )]);
        let free = find_free_rooms(&b, Day::Monday, "10:30 – 11:00", 0);
        assert_eq!(free.len(), 1);
    }

    #[test]
    fn test_duplicate_names_collapse_first_occurrence_wins() {
        let b = building(vec![
            room("Lab A", 20, vec![]),
            room(" lab a ", 60, vec![(Day::Monday, "08:30 – 10:00")]),
        ]);
        // The second entry's slot marks the whole group busy on Monday.
        assert!(find_free_rooms(&b, Day::Monday, "09:00 – 09:30", 0).is_empty());

        // On Tuesday the group is free and reported once, with the first
        // occurrence as representative.
        let free = find_free_rooms(&b, Day::Tuesday, "09:00 – 09:30", 0);
        assert_eq!(free[0].rooms.len(), 1);
        assert_eq!(free[0].rooms[0].name, "Lab A");
        assert_eq!(free[0].rooms[0].capacity, 20);
        assert_eq!(free[0].rooms[0].room_index, 0);
    }

    #[test]
    fn test_capacity_filter_applies_after_freeness() {
        let b = building(vec![room("R1", 30, vec![]), room("R2", 80, vec![])]);
        let free = find_free_rooms(&b, Day::Monday, "09:00 – 09:30", 50);
        assert_eq!(free[0].rooms.len(), 1);
        assert_eq!(free[0].rooms[0].name, "R2");

        // Zero disables the filter.
        let free = find_free_rooms(&b, Day::Monday, "09:00 – 09:30", 0);
        assert_eq!(free[0].rooms.len(), 2);
    }

    #[test]
    fn test_empty_floors_are_omitted() {
        let mut b = building(vec![room("R1", 30, vec![(Day::Monday, "08:30 – 10:00")])]);
        b.floors.push(Floor {
            name: "First".to_string(),
            rooms: vec![room("R2", 30, vec![])],
            time_labels: Vec::new(),
        });
        let free = find_free_rooms(&b, Day::Monday, "09:00 – 09:30", 0);
        assert_eq!(free.len(), 1);
        assert_eq!(free[0].floor_name, "First");
        assert_eq!(free[0].floor_index, 1);
    }

    /// Carry-over behavior: an active temporary booking does NOT exclude a
    /// room from search results, even though the timetable shows it as
    /// occupying the cell. Do not "fix" this without changing the contract.
    #[test]
    fn test_active_booking_does_not_block_availability() {
        let mut r = room("R1", 30, vec![]);
        r.booked.push(Booking {
            day: Day::Monday,
            time_label: "09:00 – 10:00".to_string(),
            teacher: "Sana".to_string(),
            subject: "Lab".to_string(),
            expires_at_ms: i64::MAX,
            active: true,
        });
        let b = building(vec![r]);

        let free = find_free_rooms(&b, Day::Monday, "09:00 – 09:30", 0);
        assert_eq!(free.len(), 1, "temporary bookings must not block search");
    }

    #[test]
    fn test_unparsable_request_conflicts_with_nothing() {
        let b = building(vec![room(
            "R1",
            30,
            vec![(Day::Monday, "08:30 – 10:00")],
        )]);
        let free = find_free_rooms(&b, Day::Monday, "whenever", 0);
        assert_eq!(free.len(), 1);
    }
}
