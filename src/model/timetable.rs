use std::{collections::HashMap, sync::Arc};

use crate::{
    model::{
        Connection, DeclaredTransfer, Error, Pattern, Route, Stop, TransferPoint,
        TransferService, Trip,
    },
    shared::time::{Duration, Time},
};

type IdToIndex = HashMap<Arc<str>, u32>;

/// Immutable schedule store handed to the optimizer.
#[derive(Debug, Clone, Default)]
pub struct Timetable {
    pub stops: Box<[Stop]>,
    pub routes: Box<[Route]>,
    pub patterns: Box<[Arc<Pattern>]>,
    pub trips: Box<[Trip]>,

    stop_lookup: IdToIndex,
    route_lookup: IdToIndex,
    trip_lookup: IdToIndex,
    // Walking connections indexed by origin stop
    stop_to_connections: Box<[Box<[Connection]>]>,
    transfers: TransferService,
}

impl Timetable {
    pub fn builder() -> TimetableBuilder {
        TimetableBuilder::new()
    }

    pub fn stop_by_id(&self, id: &str) -> Option<&Stop> {
        let index = self.stop_lookup.get(id)?;
        self.stops.get(*index as usize)
    }

    pub fn route_by_id(&self, id: &str) -> Option<&Route> {
        let index = self.route_lookup.get(id)?;
        self.routes.get(*index as usize)
    }

    pub fn trip_by_id(&self, id: &str) -> Option<&Trip> {
        let index = self.trip_lookup.get(id)?;
        self.trips.get(*index as usize)
    }

    /// Walks leaving `stop_idx`, empty for unknown stops.
    pub fn connections_from(&self, stop_idx: u32) -> &[Connection] {
        self.stop_to_connections
            .get(stop_idx as usize)
            .map(|connections| &connections[..])
            .unwrap_or(&[])
    }

    pub fn transfers(&self) -> &TransferService {
        &self.transfers
    }
}

/// Reference to one side of a declared transfer by external ids.
#[derive(Debug, Clone, Copy)]
pub enum PointRef<'r> {
    Stop(&'r str),
    Route { stop: &'r str, route: &'r str },
    Trip { stop: &'r str, trip: &'r str },
}

#[derive(Debug, Default)]
pub struct TimetableBuilder {
    stops: Vec<Stop>,
    routes: Vec<Route>,
    patterns: Vec<Arc<Pattern>>,
    trips: Vec<Trip>,
    connections: Vec<Connection>,
    transfers: TransferService,

    stop_lookup: IdToIndex,
    route_lookup: IdToIndex,
    trip_lookup: IdToIndex,
    pattern_lookup: HashMap<(u32, Arc<[u32]>), usize>,
}

impl TimetableBuilder {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn stop(&mut self, id: &str, name: &str) -> Result<u32, Error> {
        if self.stop_lookup.contains_key(id) {
            return Err(Error::DuplicateID(id.into()));
        }
        let index = self.stops.len() as u32;
        let stop = Stop {
            index,
            id: id.into(),
            name: name.into(),
        };
        self.stop_lookup.insert(stop.id.clone(), index);
        self.stops.push(stop);
        Ok(index)
    }

    pub fn route(&mut self, id: &str, short_name: Option<&str>) -> Result<u32, Error> {
        if self.route_lookup.contains_key(id) {
            return Err(Error::DuplicateID(id.into()));
        }
        let index = self.routes.len() as u32;
        let route = Route {
            index,
            id: id.into(),
            short_name: short_name.map(Into::into),
        };
        self.route_lookup.insert(route.id.clone(), index);
        self.routes.push(route);
        Ok(index)
    }

    /// Adds a trip calling at `stop_times`, given as `(stop id, arrival, departure)`.
    ///
    /// Trips of one route calling at the same stops share a single [`Pattern`].
    pub fn trip(
        &mut self,
        id: &str,
        route_id: &str,
        stop_times: &[(&str, Time, Time)],
    ) -> Result<u32, Error> {
        if self.trip_lookup.contains_key(id) {
            return Err(Error::DuplicateID(id.into()));
        }
        let route_idx = *self
            .route_lookup
            .get(route_id)
            .ok_or_else(|| Error::InvalidRouteID(route_id.into()))?;
        let trip_id: Arc<str> = id.into();
        if stop_times.len() < 2 {
            return Err(Error::InvalidStopTimes {
                trip: trip_id,
                reason: "a trip calls at two stops at least".into(),
            });
        }

        let mut stops = Vec::with_capacity(stop_times.len());
        let mut arrivals = Vec::with_capacity(stop_times.len());
        let mut departures = Vec::with_capacity(stop_times.len());
        let mut last_departure: Option<Time> = None;
        for (pos, (stop_id, arrival, departure)) in stop_times.iter().enumerate() {
            let stop_idx = self.stop_idx(stop_id)?;
            if departure < arrival {
                return Err(Error::InvalidStopTimes {
                    trip: trip_id,
                    reason: format!("departs before arriving at position {pos}"),
                });
            }
            if last_departure.is_some_and(|last| *arrival < last) {
                return Err(Error::InvalidStopTimes {
                    trip: trip_id,
                    reason: format!("arrives at position {pos} before leaving the previous stop"),
                });
            }
            last_departure = Some(*departure);
            stops.push(stop_idx);
            arrivals.push(*arrival);
            departures.push(*departure);
        }

        let stops: Arc<[u32]> = stops.into();
        let pattern = match self.pattern_lookup.get(&(route_idx, stops.clone())) {
            Some(pattern_idx) => self.patterns[*pattern_idx].clone(),
            None => {
                let pattern = Arc::new(Pattern {
                    index: self.patterns.len() as u32,
                    route_idx,
                    stops: stops.clone(),
                });
                self.pattern_lookup
                    .insert((route_idx, stops), self.patterns.len());
                self.patterns.push(pattern.clone());
                pattern
            }
        };

        let index = self.trips.len() as u32;
        self.trip_lookup.insert(trip_id.clone(), index);
        self.trips.push(Trip {
            index,
            id: trip_id,
            route_idx,
            pattern,
            arrivals: arrivals.into(),
            departures: departures.into(),
        });
        Ok(index)
    }

    /// Adds a one-way walk between two stops.
    pub fn connection(&mut self, from: &str, to: &str, duration: Duration) -> Result<(), Error> {
        let from_stop_idx = self.stop_idx(from)?;
        let to_stop_idx = self.stop_idx(to)?;
        self.connections.push(Connection {
            from_stop_idx,
            to_stop_idx,
            duration,
        });
        Ok(())
    }

    pub fn point(&self, point: PointRef<'_>) -> Result<TransferPoint, Error> {
        Ok(match point {
            PointRef::Stop(stop) => TransferPoint::Stop {
                stop_idx: self.stop_idx(stop)?,
            },
            PointRef::Route { stop, route } => TransferPoint::Route {
                stop_idx: self.stop_idx(stop)?,
                route_idx: *self
                    .route_lookup
                    .get(route)
                    .ok_or_else(|| Error::InvalidRouteID(route.into()))?,
            },
            PointRef::Trip { stop, trip } => TransferPoint::Trip {
                stop_idx: self.stop_idx(stop)?,
                trip_idx: *self
                    .trip_lookup
                    .get(trip)
                    .ok_or_else(|| Error::InvalidTripID(trip.into()))?,
            },
        })
    }

    pub fn declared_transfer(&mut self, transfer: DeclaredTransfer) -> &mut Self {
        self.transfers.add(transfer);
        self
    }

    pub fn build(self) -> Timetable {
        let mut stop_to_connections: Vec<Vec<Connection>> = vec![Vec::new(); self.stops.len()];
        for connection in self.connections {
            stop_to_connections[connection.from_stop_idx as usize].push(connection);
        }
        Timetable {
            stops: self.stops.into(),
            routes: self.routes.into(),
            patterns: self.patterns.into(),
            trips: self.trips.into(),
            stop_lookup: self.stop_lookup,
            route_lookup: self.route_lookup,
            trip_lookup: self.trip_lookup,
            stop_to_connections: stop_to_connections
                .into_iter()
                .map(Into::into)
                .collect(),
            transfers: self.transfers,
        }
    }

    fn stop_idx(&self, id: &str) -> Result<u32, Error> {
        self.stop_lookup
            .get(id)
            .copied()
            .ok_or_else(|| Error::InvalidStopID(id.into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TransferPriority;

    fn hms(time: &str) -> Time {
        Time::from_hms(time).unwrap()
    }

    fn builder() -> TimetableBuilder {
        let mut builder = Timetable::builder();
        for id in ["A", "B", "C"] {
            builder.stop(id, id).unwrap();
        }
        builder.route("R1", Some("1")).unwrap();
        builder
    }

    #[test]
    fn trips_share_patterns() {
        let mut builder = builder();
        let t1 = [
            ("A", hms("10:00:00"), hms("10:00:00")),
            ("B", hms("10:05:00"), hms("10:06:00")),
        ];
        let t2 = t1.map(|(stop, a, d)| (stop, a + Duration::from_hours(1), d + Duration::from_hours(1)));
        builder.trip("T1", "R1", &t1).unwrap();
        builder.trip("T2", "R1", &t2).unwrap();
        builder
            .trip(
                "T3",
                "R1",
                &[
                    ("A", hms("10:00:00"), hms("10:00:00")),
                    ("C", hms("10:05:00"), hms("10:05:00")),
                ],
            )
            .unwrap();
        let timetable = builder.build();

        assert_eq!(timetable.patterns.len(), 2);
        let t1 = timetable.trip_by_id("T1").unwrap();
        let t2 = timetable.trip_by_id("T2").unwrap();
        assert!(Arc::ptr_eq(&t1.pattern, &t2.pattern));
        assert_eq!(t2.departure(1), hms("11:06:00"));
    }

    #[test]
    fn rejects_unknown_ids() {
        let mut builder = builder();
        let stop_times = [
            ("A", hms("10:00:00"), hms("10:00:00")),
            ("Z", hms("10:05:00"), hms("10:05:00")),
        ];
        assert!(matches!(
            builder.trip("T1", "R1", &stop_times),
            Err(Error::InvalidStopID(id)) if id == "Z"
        ));
        assert!(matches!(
            builder.trip("T1", "R9", &stop_times),
            Err(Error::InvalidRouteID(_))
        ));
        assert!(matches!(builder.stop("A", "again"), Err(Error::DuplicateID(_))));
    }

    #[test]
    fn rejects_decreasing_stop_times() {
        let mut builder = builder();
        let err = builder.trip(
            "T1",
            "R1",
            &[
                ("A", hms("10:00:00"), hms("10:02:00")),
                ("B", hms("10:01:00"), hms("10:03:00")),
            ],
        );
        assert!(matches!(err, Err(Error::InvalidStopTimes { .. })));
        let err = builder.trip("T1", "R1", &[("A", hms("10:00:00"), hms("10:00:00"))]);
        assert!(matches!(err, Err(Error::InvalidStopTimes { .. })));
    }

    #[test]
    fn connections_and_transfers() {
        let mut builder = builder();
        builder
            .connection("A", "B", Duration::from_minutes(2))
            .unwrap();
        let from = builder.point(PointRef::Stop("A")).unwrap();
        let to = builder
            .point(PointRef::Route {
                stop: "B",
                route: "R1",
            })
            .unwrap();
        builder.declared_transfer(DeclaredTransfer::new(from, to, TransferPriority::Preferred));
        assert!(builder
            .point(PointRef::Trip {
                stop: "A",
                trip: "nope"
            })
            .is_err());
        let timetable = builder.build();

        let a = timetable.stop_by_id("A").unwrap().index;
        assert_eq!(timetable.connections_from(a).len(), 1);
        assert_eq!(
            timetable.connections_from(a)[0].duration,
            Duration::from_minutes(2)
        );
        assert!(timetable.connections_from(99).is_empty());
        assert_eq!(timetable.transfers().len(), 1);
        assert_eq!(
            timetable.route_by_id("R1").unwrap().short_name.as_deref(),
            Some("1")
        );
    }
}
