#![allow(dead_code)]

use interchange::{
    model::{DeclaredTransfer, PointRef, Trip},
    prelude::*,
};

pub fn hms(time: &str) -> Time {
    Time::from_hms(time).unwrap()
}

/// Trip A rides S -> X -> Y -> Z, trip B rides W -> X -> Y -> D and trip C continues
/// from Y or D to F. Trip E is a short ride S -> X and trip L a very long one.
pub fn timetable(declared: &[(&str, TransferPriority)]) -> Timetable {
    let mut builder = Timetable::builder();
    for id in ["S", "X", "Y", "Z", "W", "D", "F"] {
        builder.stop(id, id).unwrap();
    }
    for id in ["A", "B", "C", "E", "L"] {
        builder.route(id, Some(id)).unwrap();
    }
    let trips: [(&str, &str, &[(&str, &str)]); 5] = [
        (
            "A1",
            "A",
            &[("S", "10:00:00"), ("X", "10:10:00"), ("Y", "10:12:00"), ("Z", "10:20:00")],
        ),
        (
            "B1",
            "B",
            &[("W", "10:05:00"), ("X", "10:11:00"), ("Y", "10:14:00"), ("D", "10:30:00")],
        ),
        ("C1", "C", &[("Y", "10:16:00"), ("D", "10:40:00"), ("F", "10:50:00")]),
        ("E1", "E", &[("S", "10:00:00"), ("X", "10:05:00")]),
        ("L1", "L", &[("S", "06:00:00"), ("X", "18:00:00")]),
    ];
    for (id, route, calls) in trips {
        let stop_times: Vec<(&str, Time, Time)> = calls
            .iter()
            .map(|(stop, time)| (*stop, hms(time), hms(time)))
            .collect();
        builder.trip(id, route, &stop_times).unwrap();
    }
    builder
        .connection("Z", "D", Duration::from_minutes(3))
        .unwrap();

    for (stop, priority) in declared {
        let from = builder.point(PointRef::Stop(*stop)).unwrap();
        let to = builder.point(PointRef::Stop(*stop)).unwrap();
        builder.declared_transfer(DeclaredTransfer::new(from, to, *priority).guaranteed());
    }
    builder.build()
}

/// Trip A rides S -> X -> Z and trip B rides W -> X -> D -> F. Riders may walk from Z to D
/// in three minutes, under the declared transfer if one is given.
pub fn walking_timetable(declared: Option<TransferPriority>) -> Timetable {
    let mut builder = Timetable::builder();
    for id in ["S", "X", "Z", "W", "D", "F"] {
        builder.stop(id, id).unwrap();
    }
    builder.route("A", Some("A")).unwrap();
    builder.route("B", Some("B")).unwrap();
    let a = [("S", "10:00:00"), ("X", "10:05:00"), ("Z", "10:15:00")];
    let b = [
        ("W", "10:00:00"),
        ("X", "10:06:00"),
        ("D", "10:25:00"),
        ("F", "10:40:00"),
    ];
    for (id, route, calls) in [("A1", "A", &a[..]), ("B1", "B", &b[..])] {
        let stop_times: Vec<(&str, Time, Time)> = calls
            .iter()
            .map(|(stop, time)| (*stop, hms(time), hms(time)))
            .collect();
        builder.trip(id, route, &stop_times).unwrap();
    }
    builder
        .connection("Z", "D", Duration::from_minutes(3))
        .unwrap();

    if let Some(priority) = declared {
        let from = builder.point(PointRef::Stop("Z")).unwrap();
        let to = builder.point(PointRef::Stop("D")).unwrap();
        builder.declared_transfer(DeclaredTransfer::new(from, to, priority).guaranteed());
    }
    builder.build()
}

pub fn config() -> Config {
    let mut config = Config::default();
    config.slack.transfer_slack = Duration::from_seconds(30);
    config
}

fn position(trip: &Trip, stop_idx: u32, after: Option<usize>) -> usize {
    let start = after.map(|pos| pos + 1).unwrap_or(0);
    (start..trip.number_of_stops())
        .find(|pos| trip.stop_idx(*pos) == stop_idx)
        .unwrap()
}

/// Builds an itinerary riding `(trip, board stop, alight stop)` in order, joined at the
/// same stop. Access and egress take two minutes each.
pub fn itinerary<'a>(timetable: &'a Timetable, rides: &[(&str, &str, &str)]) -> Itinerary<'a> {
    let stop = |id: &str| timetable.stop_by_id(id).unwrap().index;
    let mut legs = Vec::new();
    for (i, (trip_id, from, to)) in rides.iter().enumerate() {
        let trip = timetable.trip_by_id(*trip_id).unwrap();
        let board_pos = position(trip, stop(*from), None);
        let alight_pos = position(trip, stop(*to), Some(board_pos));
        let leg = TransitLeg::new(trip, board_pos, alight_pos, 1000).unwrap();
        if i == 0 {
            legs.push(Leg::Access(AccessLeg {
                to_stop_idx: leg.board_stop_idx(),
                departure_time: leg.board_time() - Duration::from_minutes(2),
                arrival_time: leg.board_time(),
                cost: 240,
            }));
        }
        legs.push(Leg::Transit(leg));
    }
    let last = legs.last().and_then(Leg::as_transit).copied().unwrap();
    legs.push(Leg::Egress(EgressLeg {
        from_stop_idx: last.alight_stop_idx(),
        departure_time: last.alight_time(),
        arrival_time: last.alight_time() + Duration::from_minutes(2),
        cost: 240,
    }));
    Itinerary::new(legs).unwrap()
}

/// `(alight stop, board stop)` ids of every junction.
pub fn transfer_stops(timetable: &Timetable, itinerary: &Itinerary<'_>) -> Vec<(String, String)> {
    itinerary
        .junctions()
        .iter()
        .map(|junction| {
            (
                timetable.stops[junction.from.alight_stop_idx() as usize].id.to_string(),
                timetable.stops[junction.to.board_stop_idx() as usize].id.to_string(),
            )
        })
        .collect()
}
