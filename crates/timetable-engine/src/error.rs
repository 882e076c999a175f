//! Error types for scheduling operations.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScheduleError {
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Room capacity must be greater than zero (got {0})")]
    InvalidCapacity(i64),

    #[error("No building at index {0}")]
    BuildingNotFound(usize),

    #[error("No floor at index {floor} in building {building}")]
    FloorNotFound { building: usize, floor: usize },

    #[error("No room at index {room} on floor {floor} of building {building}")]
    RoomNotFound {
        building: usize,
        floor: usize,
        room: usize,
    },

    #[error("Persistence failure: {0}")]
    Persistence(String),
}

pub type Result<T> = std::result::Result<T, ScheduleError>;
