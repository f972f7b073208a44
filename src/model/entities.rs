use std::sync::Arc;

use crate::shared::{
    Identifiable,
    time::{Duration, Time},
};

/// A physical point where passengers can board or alight from a vehicle.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Stop {
    /// The global internal index used for O(1) array lookups in the timetable.
    pub index: u32,
    /// Unique external identifier for the stop.
    pub id: Arc<str>,
    /// Human-readable name (e.g., "Main St & 4th Ave").
    pub name: Arc<str>,
}

impl Identifiable for Stop {
    fn id(&self) -> &str {
        &self.id
    }
}

/// A grouping of trips that are displayed to riders under a single name (e.g., "Blue Line").
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Route {
    pub index: u32,
    pub id: Arc<str>,
    pub short_name: Option<Arc<str>>,
}

impl Identifiable for Route {
    fn id(&self) -> &str {
        &self.id
    }
}

/// The ordered stop sequence shared by every trip of a route that calls at exactly
/// those stops. A pattern may visit the same stop more than once.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Pattern {
    pub index: u32,
    /// Pointer back to the display-level [`Route`].
    pub route_idx: u32,
    /// Stop indices served by this pattern in order.
    pub stops: Arc<[u32]>,
}

impl Pattern {
    pub fn number_of_stops(&self) -> usize {
        self.stops.len()
    }

    pub fn stop_idx(&self, stop_pos: usize) -> u32 {
        self.stops[stop_pos]
    }
}

/// A specific journey taken by a vehicle through the stops of its [`Pattern`].
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Trip {
    pub index: u32,
    pub id: Arc<str>,
    /// Pointer to the parent [`Route`].
    pub route_idx: u32,
    pub pattern: Arc<Pattern>,
    /// Scheduled arrival per stop position.
    pub arrivals: Box<[Time]>,
    /// Scheduled departure per stop position.
    pub departures: Box<[Time]>,
}

impl Identifiable for Trip {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Trip {
    pub fn number_of_stops(&self) -> usize {
        self.pattern.number_of_stops()
    }

    pub fn stop_idx(&self, stop_pos: usize) -> u32 {
        self.pattern.stop_idx(stop_pos)
    }

    pub fn arrival(&self, stop_pos: usize) -> Time {
        self.arrivals[stop_pos]
    }

    pub fn departure(&self, stop_pos: usize) -> Time {
        self.departures[stop_pos]
    }

    /// Finds the first stop position departing at or after `earliest` that serves `stop_idx`.
    ///
    /// The scan walks the trip in time order until the time bound holds and then keeps
    /// going in the same direction until the stop matches. Running off the end of the
    /// pattern is reported as `None`.
    pub fn find_departure_stop_position(&self, earliest: Time, stop_idx: u32) -> Option<usize> {
        let n = self.number_of_stops();
        let mut pos = 0;
        while pos < n && self.departures[pos] < earliest {
            pos += 1;
        }
        while pos < n && self.stop_idx(pos) != stop_idx {
            pos += 1;
        }
        (pos < n).then_some(pos)
    }

    /// Mirror of [`Trip::find_departure_stop_position`] for arrivals: walks backwards from
    /// the end of the trip to the last position arriving at or before `latest` that serves
    /// `stop_idx`.
    pub fn find_arrival_stop_position(&self, latest: Time, stop_idx: u32) -> Option<usize> {
        let mut pos = self.number_of_stops();
        while pos > 0 && self.arrivals[pos - 1] > latest {
            pos -= 1;
        }
        while pos > 0 && self.stop_idx(pos - 1) != stop_idx {
            pos -= 1;
        }
        pos.checked_sub(1)
    }
}

/// A walk between two stops, as resolved by the street network.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Connection {
    pub from_stop_idx: u32,
    pub to_stop_idx: u32,
    pub duration: Duration,
}
