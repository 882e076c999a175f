//! Command-line front end for the campus timetable engine.
//!
//! The engine itself never reads the system clock; this binary is where
//! "now" is sampled and handed down, and where the snapshot file lives.
//! Building, floor and room positions are 1-based on the command line and
//! translated to the engine's 0-based indexes here.

use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use chrono::Utc;
use chrono_tz::Tz;
use clap::{Parser, Subcommand};
use timetable_engine::{
    find_free_rooms, BookingRequest, Day, JsonFileStore, RoomConfig, ScheduleService,
    PREDEFINED_LABELS, SWEEP_INTERVAL_SECS,
};

/// Campus room-booking timetable.
#[derive(Parser, Debug)]
#[command(name = "timetable")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the campus snapshot file
    #[arg(long, global = true, default_value = "campus.json")]
    data: PathBuf,

    /// IANA timezone the campus runs in
    #[arg(long, global = true, env = "TIMETABLE_TZ", default_value = "Asia/Karachi")]
    timezone: String,

    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Ensure at least N buildings exist
    Setup {
        /// Number of buildings
        buildings: usize,
    },
    /// Rename a building, or restore its default name
    Rename {
        /// Building position (1-based)
        building: usize,
        /// New name; omit together with --reset to restore the default
        name: Option<String>,
        /// Restore the default "Building N" name
        #[arg(long, conflicts_with = "name")]
        reset: bool,
    },
    /// Set the number of floors in a building
    Floors {
        /// Building position (1-based)
        building: usize,
        /// Floor count
        count: usize,
    },
    /// Add a room with its weekly class schedule
    AddRoom {
        /// Building position (1-based)
        building: usize,
        /// Floor position (1-based)
        floor: usize,
        /// Room name
        #[arg(short, long)]
        name: String,
        /// Seating capacity
        #[arg(short, long)]
        capacity: u32,
        /// Day the classes run on (e.g. Monday or mon)
        #[arg(short, long)]
        day: String,
        /// Time slot labels, repeatable (e.g. --time "08:30 – 10:00")
        #[arg(short, long = "time", required = true)]
        times: Vec<String>,
        /// Teacher name
        #[arg(long)]
        teacher: String,
        /// Subject name
        #[arg(long)]
        subject: String,
        /// Semester label
        #[arg(long)]
        semester: String,
        /// Departments, repeatable
        #[arg(long = "department", required = true)]
        departments: Vec<String>,
    },
    /// Remove a room and its whole schedule
    RemoveRoom {
        /// Building position (1-based)
        building: usize,
        /// Floor position (1-based)
        floor: usize,
        /// Room position on the floor (1-based)
        room: usize,
    },
    /// Find rooms free during a time range
    Free {
        /// Building position (1-based)
        building: usize,
        /// Day to check
        #[arg(short, long)]
        day: String,
        /// Requested time range (forgiving, e.g. "9 to 1030" or "2:30pm-4pm")
        #[arg(short, long)]
        time: String,
        /// Minimum seating capacity
        #[arg(short, long, default_value = "0")]
        capacity: u32,
    },
    /// Book a room for a same-day slot; the booking expires when the slot ends
    Book {
        /// Building position (1-based)
        building: usize,
        /// Floor position (1-based)
        floor: usize,
        /// Room position on the floor (1-based)
        room: usize,
        /// Day of the booking
        #[arg(short, long)]
        day: String,
        /// Time slot label
        #[arg(short, long)]
        time: String,
        /// Teacher name
        #[arg(long)]
        teacher: String,
        /// Subject name
        #[arg(long)]
        subject: String,
    },
    /// Move a scheduled class to another day/time cell
    Move {
        /// Building position (1-based)
        building: usize,
        /// Floor position (1-based)
        floor: usize,
        /// Room position on the floor (1-based)
        room: usize,
        /// Day the class is on now
        #[arg(long)]
        from_day: String,
        /// Time label the class is on now
        #[arg(long)]
        from_time: String,
        /// Destination day
        #[arg(long)]
        to_day: String,
        /// Destination time label
        #[arg(long)]
        to_time: String,
    },
    /// Retire expired bookings, once or continuously
    Sweep {
        /// Keep sweeping every 30 seconds
        #[arg(short, long)]
        watch: bool,
    },
    /// Print a floor's weekly timetable grid
    Show {
        /// Building position (1-based)
        building: usize,
        /// Floor position (1-based)
        floor: usize,
    },
    /// Delete every building and start over
    Reset {
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args = Args::parse();

    let tz: Tz = args
        .timezone
        .parse()
        .map_err(|_| anyhow::anyhow!("unknown timezone: {}", args.timezone))?;
    let mut service = ScheduleService::open(JsonFileStore::new(&args.data))
        .with_context(|| format!("loading snapshot {}", args.data.display()))?;

    match args.command {
        Command::Setup { buildings } => {
            let added = service.ensure_buildings(buildings);
            println!(
                "{} building(s), {} added",
                service.campus().buildings.len(),
                added
            );
        }
        Command::Rename {
            building,
            name,
            reset,
        } => {
            let idx = position(building, "building")?;
            if reset {
                service.reset_building_name(idx)?;
            } else {
                let name = name.context("provide a new name or --reset")?;
                service.rename_building(idx, &name)?;
            }
            println!("renamed to {}", service.campus().building(idx)?.name);
        }
        Command::Floors { building, count } => {
            let idx = position(building, "building")?;
            service.set_floor_count(idx, count)?;
            println!("building {} now has {} floor(s)", building, count);
        }
        Command::AddRoom {
            building,
            floor,
            name,
            capacity,
            day,
            times,
            teacher,
            subject,
            semester,
            departments,
        } => {
            let b = position(building, "building")?;
            let f = position(floor, "floor")?;
            let config = RoomConfig {
                name,
                capacity,
                day: parse_day(&day)?,
                time_labels: times,
                teacher,
                subject,
                semester,
                departments,
            };
            service.add_room(b, f, config)?;
            println!("room added");
        }
        Command::RemoveRoom {
            building,
            floor,
            room,
        } => {
            let removed = service.remove_room(
                position(building, "building")?,
                position(floor, "floor")?,
                position(room, "room")?,
            )?;
            println!("removed room {}", removed.name);
        }
        Command::Free {
            building,
            day,
            time,
            capacity,
        } => {
            let idx = position(building, "building")?;
            let floors = find_free_rooms(
                service.campus().building(idx)?,
                parse_day(&day)?,
                &time,
                capacity,
            );
            if args.json {
                println!("{}", serde_json::to_string_pretty(&floors)?);
            } else if floors.is_empty() {
                println!("no free rooms");
            } else {
                for floor in &floors {
                    println!("{}:", floor.floor_name);
                    for room in &floor.rooms {
                        println!("  {} (capacity {})", room.name, room.capacity);
                    }
                }
            }
        }
        Command::Book {
            building,
            floor,
            room,
            day,
            time,
            teacher,
            subject,
        } => {
            let receipt = service.book_room(
                position(building, "building")?,
                position(floor, "floor")?,
                position(room, "room")?,
                &BookingRequest {
                    day,
                    time_label: time,
                    teacher,
                    subject,
                },
                Utc::now(),
                tz,
            )?;
            if args.json {
                println!("{}", serde_json::to_string_pretty(&receipt)?);
            } else {
                println!(
                    "{} {} {} (expires {})",
                    if receipt.updated { "updated" } else { "booked" },
                    receipt.day.name(),
                    receipt.time_label,
                    receipt.expires_at_ms
                );
            }
        }
        Command::Move {
            building,
            floor,
            room,
            from_day,
            from_time,
            to_day,
            to_time,
        } => {
            service.move_slot(
                position(building, "building")?,
                position(floor, "floor")?,
                position(room, "room")?,
                parse_day(&from_day)?,
                &from_time,
                parse_day(&to_day)?,
                &to_time,
            )?;
            println!("moved to {} {}", parse_day(&to_day)?.name(), to_time);
        }
        Command::Sweep { watch } => loop {
            let changed = service.sweep(Utc::now().timestamp_millis());
            if args.json {
                println!("{}", serde_json::json!({ "changed": changed }));
            } else if changed {
                println!("expired bookings removed");
            } else {
                println!("nothing to expire");
            }
            if !watch {
                break;
            }
            thread::sleep(Duration::from_secs(SWEEP_INTERVAL_SECS));
        },
        Command::Show { building, floor } => {
            let b = position(building, "building")?;
            let f = position(floor, "floor")?;
            let building = service.campus().building(b)?;
            let floor = building
                .floors
                .get(f)
                .with_context(|| format!("no floor {} in {}", f + 1, building.name))?;
            let labels = floor.ordered_labels(&PREDEFINED_LABELS);
            if args.json {
                let grid: Vec<serde_json::Value> = Day::ALL
                    .iter()
                    .map(|day| {
                        serde_json::json!({
                            "day": day.name(),
                            "cells": labels
                                .iter()
                                .map(|label| floor.cell_occupants(*day, label))
                                .collect::<Vec<_>>(),
                        })
                    })
                    .collect();
                println!("{}", serde_json::to_string_pretty(&grid)?);
            } else {
                println!("{} — {}", building.name, floor.name);
                for day in Day::ALL {
                    println!("{}:", day.name());
                    for label in &labels {
                        let cells = floor.cell_occupants(day, label);
                        if cells.is_empty() {
                            continue;
                        }
                        for cell in cells {
                            println!(
                                "  {}  {}  {} / {}{}",
                                label,
                                cell.room,
                                cell.subject,
                                cell.teacher,
                                if cell.booked { "  [booked]" } else { "" }
                            );
                        }
                    }
                }
            }
        }
        Command::Reset { yes } => {
            if !yes {
                bail!("refusing to wipe the campus without --yes");
            }
            service.reset();
            println!("campus reset");
        }
    }

    Ok(())
}

/// 1-based command-line position to 0-based engine index.
fn position(value: usize, what: &str) -> Result<usize> {
    value
        .checked_sub(1)
        .with_context(|| format!("{what} positions start at 1"))
}

fn parse_day(text: &str) -> Result<Day> {
    Day::parse(text).with_context(|| format!("unrecognized day: {text}"))
}
