use interchange::{
    optimizer::{CostCalculator, PermutationBuilder},
    prelude::*,
};
use proptest::{collection::vec, prelude::*};

const TRANSFER_SLACK: u32 = 30;

/// Two trips on different routes over the same stops, B running `delay` seconds behind A.
fn timetable(hops: &[u32], delay: u32) -> Timetable {
    let mut builder = Timetable::builder();
    let stops: Vec<String> = (0..=hops.len()).map(|i| format!("S{i}")).collect();
    for id in &stops {
        builder.stop(id, id).unwrap();
    }
    builder.route("A", None).unwrap();
    builder.route("B", None).unwrap();

    let mut time = Time::from_hms("08:00:00").unwrap();
    let mut calls = Vec::new();
    for (i, stop) in stops.iter().enumerate() {
        if i > 0 {
            time += Duration::from_seconds(hops[i - 1]);
        }
        calls.push((stop.as_str(), time, time));
    }
    builder.trip("A1", "A", &calls).unwrap();
    let delayed: Vec<_> = calls
        .iter()
        .map(|(stop, a, d)| {
            let delay = Duration::from_seconds(delay);
            (*stop, *a + delay, *d + delay)
        })
        .collect();
    builder.trip("B1", "B", &delayed).unwrap();
    builder.build()
}

/// Rides A from the first stop to `join`, then B to the last stop.
fn itinerary(timetable: &Timetable, join: usize) -> Itinerary<'_> {
    let a = timetable.trip_by_id("A1").unwrap();
    let b = timetable.trip_by_id("B1").unwrap();
    let last = b.number_of_stops() - 1;
    let first = TransitLeg::new(a, 0, join, 0).unwrap();
    let second = TransitLeg::new(b, join, last, 0).unwrap();
    Itinerary::new(vec![
        Leg::Access(AccessLeg {
            to_stop_idx: first.board_stop_idx(),
            departure_time: first.board_time(),
            arrival_time: first.board_time(),
            cost: 0,
        }),
        Leg::Transit(first),
        Leg::Transit(second),
        Leg::Egress(EgressLeg {
            from_stop_idx: second.alight_stop_idx(),
            departure_time: second.alight_time(),
            arrival_time: second.alight_time(),
            cost: 0,
        }),
    ])
    .unwrap()
}

fn scenario() -> impl Strategy<Value = (Vec<u32>, u32, usize)> {
    (3usize..9).prop_flat_map(|stops| {
        (
            vec(60u32..900, stops - 1),
            TRANSFER_SLACK..1800,
            1..stops - 1,
        )
    })
}

fn slack() -> DefaultSlackProvider {
    DefaultSlackProvider::new(SlackConfig {
        transfer_slack: Duration::from_seconds(TRANSFER_SLACK),
        ..Default::default()
    })
}

proptest! {
    #[test]
    fn permutations_keep_trips_and_slack((hops, delay, join) in scenario()) {
        let timetable = timetable(&hops, delay);
        let original = itinerary(&timetable, join);
        let slack = slack();
        let costs = CostCalculator::default();
        let permutations = PermutationBuilder::new(&timetable, &slack, &costs).build(&original);

        // One join per stop B can still be ridden from
        prop_assert_eq!(permutations.len(), hops.len() - 1);
        prop_assert!(permutations.iter().any(|p| p.same_transfer_points(&original)));
        for permutation in &permutations {
            prop_assert_eq!(permutation.trip_indices(), original.trip_indices());
            prop_assert_eq!(permutation.departure_time(), original.departure_time());
            prop_assert_eq!(permutation.arrival_time(), original.arrival_time());
            for junction in permutation.junctions() {
                let earliest = junction.from.alight_time()
                    + junction.walk_duration()
                    + slack.transit_slack(&junction.from.trip().pattern);
                prop_assert!(junction.to.board_time() >= earliest);
                prop_assert!(junction.from.alight_pos() > junction.from.board_pos());
                prop_assert!(junction.to.alight_pos() > junction.to.board_pos());
            }
        }
    }

    #[test]
    fn optimizer_never_changes_trips((hops, delay, join) in scenario()) {
        let timetable = timetable(&hops, delay);
        let original = itinerary(&timetable, join);
        let mut config = Config::default();
        config.slack.transfer_slack = Duration::from_seconds(TRANSFER_SLACK);
        let optimizer = Optimizer::from_config(&timetable, config);

        let result = optimizer.optimize(vec![original.clone()]).unwrap();
        prop_assert!(!result.is_empty());
        for optimized in &result {
            prop_assert_eq!(optimized.itinerary().trip_indices(), original.trip_indices());
            prop_assert_eq!(optimized.transfer_priority_cost(), 0);
        }
    }
}
