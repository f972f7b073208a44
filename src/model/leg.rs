use std::fmt;

use crate::{
    model::{Error, StopTime, Trip, TripStopTime},
    shared::time::{Duration, Time},
};

/// From the origin to the first stop. Produced by the upstream search and never re-timed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessLeg {
    pub to_stop_idx: u32,
    pub departure_time: Time,
    pub arrival_time: Time,
    pub cost: i32,
}

/// From the last stop to the destination. Produced by the upstream search and never re-timed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EgressLeg {
    pub from_stop_idx: u32,
    pub departure_time: Time,
    pub arrival_time: Time,
    pub cost: i32,
}

/// A walk between the alight stop of one trip and the board stop of the next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferLeg {
    pub from_stop_idx: u32,
    pub to_stop_idx: u32,
    pub departure_time: Time,
    pub arrival_time: Time,
    pub cost: i32,
}

impl TransferLeg {
    pub fn duration(&self) -> Duration {
        self.arrival_time - self.departure_time
    }
}

/// A ride on one trip between two stop positions.
#[derive(Debug, Clone, Copy)]
pub struct TransitLeg<'a> {
    trip: &'a Trip,
    board_pos: usize,
    alight_pos: usize,
    cost: i32,
}

impl<'a> TransitLeg<'a> {
    pub fn new(trip: &'a Trip, board_pos: usize, alight_pos: usize, cost: i32) -> Result<Self, Error> {
        if board_pos >= alight_pos || alight_pos >= trip.number_of_stops() {
            return Err(Error::InvalidItinerary(format!(
                "trip {} cannot be ridden from position {board_pos} to {alight_pos}",
                trip.id
            )));
        }
        Ok(Self {
            trip,
            board_pos,
            alight_pos,
            cost,
        })
    }

    /// Builds a leg from the board and alight calls reported by the upstream search.
    ///
    /// The positions were already validated upstream, so failing to find them again means
    /// the itinerary and the timetable disagree.
    pub fn locate(
        trip: &'a Trip,
        board: StopTime,
        alight: StopTime,
        cost: i32,
    ) -> Result<Self, Error> {
        let board_pos = trip
            .find_departure_stop_position(board.time, board.stop_idx)
            .filter(|pos| trip.departure(*pos) == board.time)
            .ok_or_else(|| Error::StopPositionNotFound {
                trip: trip.id.clone(),
                stop_idx: board.stop_idx,
                time: board.time,
            })?;
        let alight_pos = trip
            .find_arrival_stop_position(alight.time, alight.stop_idx)
            .filter(|pos| trip.arrival(*pos) == alight.time && *pos > board_pos)
            .ok_or_else(|| Error::StopPositionNotFound {
                trip: trip.id.clone(),
                stop_idx: alight.stop_idx,
                time: alight.time,
            })?;
        Self::new(trip, board_pos, alight_pos, cost)
    }

    pub fn trip(&self) -> &'a Trip {
        self.trip
    }

    pub fn board_pos(&self) -> usize {
        self.board_pos
    }

    pub fn alight_pos(&self) -> usize {
        self.alight_pos
    }

    pub fn board(&self) -> TripStopTime<'a> {
        TripStopTime::departure(self.trip, self.board_pos)
    }

    pub fn alight(&self) -> TripStopTime<'a> {
        TripStopTime::arrival(self.trip, self.alight_pos)
    }

    pub fn board_stop_idx(&self) -> u32 {
        self.trip.stop_idx(self.board_pos)
    }

    pub fn alight_stop_idx(&self) -> u32 {
        self.trip.stop_idx(self.alight_pos)
    }

    pub fn board_time(&self) -> Time {
        self.trip.departure(self.board_pos)
    }

    pub fn alight_time(&self) -> Time {
        self.trip.arrival(self.alight_pos)
    }

    pub fn ride_duration(&self) -> Duration {
        self.alight_time() - self.board_time()
    }

    pub fn cost(&self) -> i32 {
        self.cost
    }
}

impl PartialEq for TransitLeg<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.trip.index == other.trip.index
            && self.board_pos == other.board_pos
            && self.alight_pos == other.alight_pos
            && self.cost == other.cost
    }
}

impl Eq for TransitLeg<'_> {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Leg<'a> {
    Access(AccessLeg),
    Transit(TransitLeg<'a>),
    Transfer(TransferLeg),
    Egress(EgressLeg),
}

impl<'a> Leg<'a> {
    pub fn departure_time(&self) -> Time {
        match self {
            Leg::Access(leg) => leg.departure_time,
            Leg::Transit(leg) => leg.board_time(),
            Leg::Transfer(leg) => leg.departure_time,
            Leg::Egress(leg) => leg.departure_time,
        }
    }

    pub fn arrival_time(&self) -> Time {
        match self {
            Leg::Access(leg) => leg.arrival_time,
            Leg::Transit(leg) => leg.alight_time(),
            Leg::Transfer(leg) => leg.arrival_time,
            Leg::Egress(leg) => leg.arrival_time,
        }
    }

    pub fn from_stop_idx(&self) -> Option<u32> {
        match self {
            Leg::Access(_) => None,
            Leg::Transit(leg) => Some(leg.board_stop_idx()),
            Leg::Transfer(leg) => Some(leg.from_stop_idx),
            Leg::Egress(leg) => Some(leg.from_stop_idx),
        }
    }

    pub fn to_stop_idx(&self) -> Option<u32> {
        match self {
            Leg::Access(leg) => Some(leg.to_stop_idx),
            Leg::Transit(leg) => Some(leg.alight_stop_idx()),
            Leg::Transfer(leg) => Some(leg.to_stop_idx),
            Leg::Egress(_) => None,
        }
    }

    pub fn cost(&self) -> i32 {
        match self {
            Leg::Access(leg) => leg.cost,
            Leg::Transit(leg) => leg.cost(),
            Leg::Transfer(leg) => leg.cost,
            Leg::Egress(leg) => leg.cost,
        }
    }

    pub fn as_transit(&self) -> Option<&TransitLeg<'a>> {
        match self {
            Leg::Transit(leg) => Some(leg),
            _ => None,
        }
    }
}

impl fmt::Display for Leg<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Leg::Access(leg) => write!(f, "Access {} {}", leg.departure_time, leg.arrival_time),
            Leg::Transit(leg) => write!(
                f,
                "{} {} {}",
                leg.trip.id,
                leg.board_time(),
                leg.alight_time()
            ),
            Leg::Transfer(leg) => write!(f, "Walk {}", leg.duration()),
            Leg::Egress(leg) => write!(f, "Egress {} {}", leg.departure_time, leg.arrival_time),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::model::Pattern;

    fn hms(time: &str) -> Time {
        Time::from_hms(time).unwrap()
    }

    /// Stops 0..=3 at 10:00, 10:10, 10:12 and 10:20.
    fn trip() -> Trip {
        let times: Box<[Time]> = ["10:00:00", "10:10:00", "10:12:00", "10:20:00"]
            .into_iter()
            .map(hms)
            .collect();
        Trip {
            index: 0,
            id: "A1".into(),
            route_idx: 0,
            pattern: Arc::new(Pattern {
                index: 0,
                route_idx: 0,
                stops: vec![0, 1, 2, 3].into(),
            }),
            arrivals: times.clone(),
            departures: times,
        }
    }

    fn not_found(stop_idx: u32, time: &str) -> Error {
        Error::StopPositionNotFound {
            trip: "A1".into(),
            stop_idx,
            time: hms(time),
        }
    }

    #[test]
    fn locate_finds_the_scheduled_positions() {
        let trip = trip();
        let leg = TransitLeg::locate(
            &trip,
            StopTime::new(0, hms("10:00:00")),
            StopTime::new(2, hms("10:12:00")),
            900,
        )
        .unwrap();
        assert_eq!((leg.board_pos(), leg.alight_pos()), (0, 2));
        assert_eq!(leg.ride_duration(), Duration::from_minutes(12));
        assert_eq!(leg.cost(), 900);
    }

    #[test]
    fn locate_rejects_a_time_the_trip_does_not_serve() {
        let trip = trip();
        let err = TransitLeg::locate(
            &trip,
            StopTime::new(1, hms("10:11:00")),
            StopTime::new(3, hms("10:20:00")),
            0,
        )
        .unwrap_err();
        assert_eq!(err, not_found(1, "10:11:00"));
    }

    #[test]
    fn locate_rejects_the_wrong_stop() {
        let trip = trip();
        // Stop 3 is served, but at 10:20 and not at 10:12
        let err = TransitLeg::locate(
            &trip,
            StopTime::new(0, hms("10:00:00")),
            StopTime::new(3, hms("10:12:00")),
            0,
        )
        .unwrap_err();
        assert_eq!(err, not_found(3, "10:12:00"));
    }

    #[test]
    fn locate_rejects_alighting_before_boarding() {
        let trip = trip();
        let err = TransitLeg::locate(
            &trip,
            StopTime::new(2, hms("10:12:00")),
            StopTime::new(1, hms("10:10:00")),
            0,
        )
        .unwrap_err();
        assert_eq!(err, not_found(1, "10:10:00"));

        assert!(matches!(
            TransitLeg::new(&trip, 2, 2, 0),
            Err(Error::InvalidItinerary(_))
        ));
    }
}
