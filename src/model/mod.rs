mod entities;
mod itinerary;
mod leg;
mod stop_time;
mod timetable;
mod transfer;

pub use entities::*;
pub use itinerary::*;
pub use leg::*;
pub use stop_time::*;
pub use timetable::*;
pub use transfer::*;

use std::sync::Arc;

use thiserror::Error;

use crate::shared::time::Time;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Stop id `{0}` does not match any entry")]
    InvalidStopID(String),
    #[error("Route id `{0}` does not match any entry")]
    InvalidRouteID(String),
    #[error("Trip id `{0}` does not match any entry")]
    InvalidTripID(String),
    #[error("Id `{0}` is already in use")]
    DuplicateID(String),
    #[error("Invalid stop times for trip {trip}: {reason}")]
    InvalidStopTimes { trip: Arc<str>, reason: String },
    #[error("Trip {trip} does not call at stop {stop_idx} at {time}")]
    StopPositionNotFound {
        trip: Arc<str>,
        stop_idx: u32,
        time: Time,
    },
    #[error("Invalid itinerary: {0}")]
    InvalidItinerary(String),
}
