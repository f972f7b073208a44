use tracing::{debug, trace};

use crate::{
    model::{Itinerary, Leg, Timetable, TransferLeg, TransitLeg, Trip},
    optimizer::{CostCalculator, SlackProvider, TransferCandidateFinder, TripToTripTransfer},
    shared::time::{Duration, Time},
};

/// A suffix of an alternative itinerary: the join chosen at `junction`, followed by the
/// rest of the tail in `next`.
#[derive(Debug, Clone, Copy)]
struct TailNode<'a> {
    candidate: TripToTripTransfer<'a>,
    next: Option<usize>,
}

/// Entry of the working set. The head of the tail is the transit leg boarded by `node`
/// (the last transit leg when `node` is `None`); its alight position is already fixed.
#[derive(Debug, Clone, Copy)]
struct TailRef {
    node: Option<usize>,
    head_alight_pos: usize,
}

/// An alternative itinerary together with the join chosen at each of its junctions.
#[derive(Debug, Clone)]
pub struct Permutation<'a> {
    pub itinerary: Itinerary<'a>,
    pub joins: Vec<TripToTripTransfer<'a>>,
}

/// Combines the transfer candidates of every junction into complete, re-timed
/// alternative itineraries.
pub struct PermutationBuilder<'a, 'o, S: SlackProvider> {
    timetable: &'a Timetable,
    slack: &'o S,
    costs: &'o CostCalculator,
}

impl<'a, 'o, S: SlackProvider> PermutationBuilder<'a, 'o, S> {
    pub fn new(timetable: &'a Timetable, slack: &'o S, costs: &'o CostCalculator) -> Self {
        Self {
            timetable,
            slack,
            costs,
        }
    }

    /// Candidates per junction. The join used by `itinerary` is always part of the list.
    ///
    /// The scan of trip `i` starts at the earliest position trip `i` can be boarded at by
    /// any candidate of the previous junction.
    pub fn junction_candidates(&self, itinerary: &Itinerary<'a>) -> Vec<Vec<TripToTripTransfer<'a>>> {
        let finder = TransferCandidateFinder::new(self.timetable, self.slack);
        let mut start_pos = itinerary
            .transit_legs()
            .next()
            .map(TransitLeg::board_pos)
            .unwrap_or_default();
        let mut result = Vec::new();

        for junction in itinerary.junctions() {
            let original = TripToTripTransfer::from_junction(&junction, self.timetable);
            let mut candidates = finder.find(junction.from.trip(), start_pos, junction.to.trip());
            if !candidates
                .iter()
                .any(|candidate| candidate.positions() == original.positions())
            {
                candidates.push(original);
            }
            start_pos = candidates
                .iter()
                .map(|candidate| candidate.to.stop_pos())
                .min()
                .unwrap_or(original.to.stop_pos());
            result.push(candidates);
        }
        result
    }

    /// Every alternative of `itinerary`, the original join points included. An itinerary
    /// without junctions is returned as the only alternative.
    pub fn build(&self, itinerary: &Itinerary<'a>) -> Vec<Itinerary<'a>> {
        self.permutations(itinerary)
            .into_iter()
            .map(|permutation| permutation.itinerary)
            .collect()
    }

    /// Same as [`PermutationBuilder::build`], keeping the joins each alternative was built from.
    pub fn permutations(&self, itinerary: &Itinerary<'a>) -> Vec<Permutation<'a>> {
        let unchanged = || {
            vec![Permutation {
                itinerary: itinerary.clone(),
                joins: vec![],
            }]
        };
        let transit_legs: Vec<&TransitLeg<'a>> = itinerary.transit_legs().collect();
        let (Some(first), Some(last)) = (transit_legs.first(), transit_legs.last()) else {
            return unchanged();
        };
        if transit_legs.len() < 2 {
            return unchanged();
        }
        let first_board_pos = first.board_pos();

        let candidates = self.junction_candidates(itinerary);
        let mut arena: Vec<TailNode<'a>> = Vec::new();
        let mut tails = vec![TailRef {
            node: None,
            head_alight_pos: last.alight_pos(),
        }];

        for junction in (0..candidates.len()).rev() {
            let mut next_tails = Vec::new();
            for tail in &tails {
                for candidate in &candidates[junction] {
                    // Board the head strictly before alighting it
                    if candidate.to.stop_pos() >= tail.head_alight_pos {
                        continue;
                    }
                    arena.push(TailNode {
                        candidate: *candidate,
                        next: tail.node,
                    });
                    next_tails.push(TailRef {
                        node: Some(arena.len() - 1),
                        head_alight_pos: candidate.from.stop_pos(),
                    });
                }
            }
            trace!("{} tail(s) after junction {junction}", next_tails.len());
            tails = next_tails;
        }

        tails
            .into_iter()
            .filter(|tail| tail.head_alight_pos > first_board_pos)
            .filter_map(|tail| {
                let joins = Self::joins(&arena, tail.node);
                let Some(permutation) = self.materialize(itinerary, &transit_legs, &joins) else {
                    debug!("Discarding a permutation that breaks the itinerary order");
                    return None;
                };
                Some(Permutation {
                    itinerary: permutation,
                    joins,
                })
            })
            .collect()
    }

    fn joins(arena: &[TailNode<'a>], mut node: Option<usize>) -> Vec<TripToTripTransfer<'a>> {
        let mut joins = Vec::new();
        while let Some(index) = node {
            joins.push(arena[index].candidate);
            node = arena[index].next;
        }
        joins
    }

    /// Rebuilds the itinerary with one join per junction, re-timing and re-pricing every
    /// leg between the access and egress legs.
    fn materialize(
        &self,
        itinerary: &Itinerary<'a>,
        transit_legs: &[&TransitLeg<'a>],
        joins: &[TripToTripTransfer<'a>],
    ) -> Option<Itinerary<'a>> {
        let mut legs = Vec::with_capacity(transit_legs.len() * 2);
        let mut board_pos = transit_legs.first()?.board_pos();
        let mut ready_at = itinerary.access().arrival_time;

        for (i, leg) in transit_legs.iter().enumerate() {
            let trip = leg.trip();
            let join = joins.get(i);
            let alight_pos = join
                .map(|join| join.from.stop_pos())
                .unwrap_or(leg.alight_pos());

            let board_time = trip.departure(board_pos);
            let wait = board_time.checked_duration_since(ready_at)?;
            let ride = trip.arrival(alight_pos).checked_duration_since(board_time)?;
            let cost = self.costs.transit_cost(i == 0, wait, ride);
            legs.push(Leg::Transit(
                TransitLeg::new(trip, board_pos, alight_pos, cost).ok()?,
            ));

            let Some(join) = join else {
                break;
            };
            let alight_time = trip.arrival(alight_pos);
            let next_board_time = join.to.time();
            ready_at = alight_time;
            if let Some(connection) = join.connection {
                let walk = connection.duration;
                let departure = self.walk_departure(alight_time, next_board_time, walk, trip);
                legs.push(Leg::Transfer(TransferLeg {
                    from_stop_idx: connection.from_stop_idx,
                    to_stop_idx: connection.to_stop_idx,
                    departure_time: departure,
                    arrival_time: departure + walk,
                    cost: self.costs.walk_cost(walk),
                }));
                ready_at = alight_time + walk;
            }
            board_pos = join.to.stop_pos();
        }

        Itinerary::from_parts(itinerary.access().clone(), legs, itinerary.egress().clone()).ok()
    }

    /// The walk starts once the alight slack has passed, but never so late that the next
    /// trip is missed.
    fn walk_departure(
        &self,
        alight_time: Time,
        board_time: Time,
        walk: Duration,
        trip: &Trip,
    ) -> Time {
        let preferred = alight_time + self.slack.alight_slack(&trip.pattern);
        let latest = Time::from_seconds(board_time.as_seconds().saturating_sub(walk.as_seconds()));
        preferred.min(latest).max(alight_time)
    }
}
