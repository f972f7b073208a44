use std::fmt;

use tracing::trace;

use crate::{
    model::{Connection, DeclaredTransfer, Junction, Timetable, Trip, TripStopTime},
    optimizer::SlackProvider,
    shared::time::Duration,
};

/// A place where the rider may leave one trip and board the next.
#[derive(Debug, Clone, Copy)]
pub struct TripToTripTransfer<'a> {
    /// Arrival of the source trip.
    pub from: TripStopTime<'a>,
    /// Departure of the target trip.
    pub to: TripStopTime<'a>,
    /// The walk between the two stops, `None` when both are the same stop.
    pub connection: Option<Connection>,
    /// Best matching declared transfer, if any.
    pub declared: Option<&'a DeclaredTransfer>,
}

impl<'a> TripToTripTransfer<'a> {
    /// The join used by an existing itinerary.
    pub fn from_junction(junction: &Junction<'_, 'a>, timetable: &'a Timetable) -> Self {
        let from = junction.from.alight();
        let to = junction.to.board();
        let connection = junction.transfer.map(|leg| Connection {
            from_stop_idx: leg.from_stop_idx,
            to_stop_idx: leg.to_stop_idx,
            duration: leg.duration(),
        });
        Self {
            from,
            to,
            connection,
            declared: timetable.transfers().find_transfer(
                from.stop_idx(),
                to.stop_idx(),
                from.trip(),
                to.trip(),
            ),
        }
    }

    pub fn walk_duration(&self) -> Duration {
        self.connection
            .map(|connection| connection.duration)
            .unwrap_or(Duration::ZERO)
    }

    pub fn same_stop(&self) -> bool {
        self.from.stop_idx() == self.to.stop_idx()
    }

    /// Source and target stop positions, which identify the join.
    pub fn positions(&self) -> (usize, usize) {
        (self.from.stop_pos(), self.to.stop_pos())
    }
}

impl fmt::Display for TripToTripTransfer<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.connection {
            Some(connection) => write!(f, "{} ~ Walk {} ~ {}", self.from, connection.duration, self.to),
            None => write!(f, "{} ~ {}", self.from, self.to),
        }
    }
}

/// Enumerates every feasible join between two consecutive trips.
pub struct TransferCandidateFinder<'a, 's, S: SlackProvider> {
    timetable: &'a Timetable,
    slack: &'s S,
}

impl<'a, 's, S: SlackProvider> TransferCandidateFinder<'a, 's, S> {
    pub fn new(timetable: &'a Timetable, slack: &'s S) -> Self {
        Self { timetable, slack }
    }

    /// Scans the stop positions of `from_trip` after `start_pos` and returns each place
    /// where `to_trip` can still be caught, either at the same stop or after a walk.
    ///
    /// An empty result is valid and means the current join point should be kept.
    pub fn find(
        &self,
        from_trip: &'a Trip,
        start_pos: usize,
        to_trip: &'a Trip,
    ) -> Vec<TripToTripTransfer<'a>> {
        let slack = self.slack.transit_slack(&from_trip.pattern);
        let mut candidates = Vec::new();

        for pos in (start_pos + 1)..from_trip.number_of_stops() {
            let from = TripStopTime::arrival(from_trip, pos);
            let stop_idx = from.stop_idx();
            let earliest = from.time() + slack;

            if let Some(to_pos) = to_trip.find_departure_stop_position(earliest, stop_idx) {
                candidates.push(self.candidate(from, TripStopTime::departure(to_trip, to_pos), None));
            }

            for connection in self.timetable.connections_from(stop_idx) {
                if connection.to_stop_idx == stop_idx {
                    continue;
                }
                let earliest = earliest + connection.duration;
                if let Some(to_pos) =
                    to_trip.find_departure_stop_position(earliest, connection.to_stop_idx)
                {
                    candidates.push(self.candidate(
                        from,
                        TripStopTime::departure(to_trip, to_pos),
                        Some(*connection),
                    ));
                }
            }
        }

        trace!(
            "{} candidate(s) from {} to {}",
            candidates.len(),
            from_trip.id,
            to_trip.id
        );
        candidates
    }

    fn candidate(
        &self,
        from: TripStopTime<'a>,
        to: TripStopTime<'a>,
        connection: Option<Connection>,
    ) -> TripToTripTransfer<'a> {
        TripToTripTransfer {
            from,
            to,
            connection,
            declared: self.timetable.transfers().find_transfer(
                from.stop_idx(),
                to.stop_idx(),
                from.trip(),
                to.trip(),
            ),
        }
    }
}
