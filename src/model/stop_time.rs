use std::fmt;

use crate::{model::Trip, shared::time::Time};

/// A stop and a point in time, without any trip attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StopTime {
    pub stop_idx: u32,
    pub time: Time,
}

impl StopTime {
    pub fn new(stop_idx: u32, time: Time) -> Self {
        Self { stop_idx, time }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    Arrival,
    Departure,
}

/// A call of a trip at one stop position. The stop and the time are read from the trip,
/// so they always agree with the schedule.
#[derive(Debug, Clone, Copy)]
pub struct TripStopTime<'a> {
    trip: &'a Trip,
    stop_pos: usize,
    event: Event,
}

impl<'a> TripStopTime<'a> {
    pub fn arrival(trip: &'a Trip, stop_pos: usize) -> Self {
        Self {
            trip,
            stop_pos,
            event: Event::Arrival,
        }
    }

    pub fn departure(trip: &'a Trip, stop_pos: usize) -> Self {
        Self {
            trip,
            stop_pos,
            event: Event::Departure,
        }
    }

    pub fn trip(&self) -> &'a Trip {
        self.trip
    }

    pub fn stop_pos(&self) -> usize {
        self.stop_pos
    }

    pub fn stop_idx(&self) -> u32 {
        self.trip.stop_idx(self.stop_pos)
    }

    pub fn time(&self) -> Time {
        match self.event {
            Event::Arrival => self.trip.arrival(self.stop_pos),
            Event::Departure => self.trip.departure(self.stop_pos),
        }
    }
}

impl PartialEq for TripStopTime<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.trip.index == other.trip.index
            && self.stop_pos == other.stop_pos
            && self.event == other.event
    }
}

impl Eq for TripStopTime<'_> {}

impl fmt::Display for TripStopTime<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{} {} {}]", self.stop_idx(), self.time(), self.trip.id)
    }
}
