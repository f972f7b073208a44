use std::fmt;

use crate::{
    model::{AccessLeg, EgressLeg, Error, Leg, TransferLeg, TransitLeg},
    shared::time::{Duration, Time},
};

/// A complete journey as found by the upstream search: an access leg, transit legs that
/// may be separated by walking transfers, and an egress leg.
///
/// Itineraries are immutable. Every constructor validates the leg shape, that consecutive
/// legs meet at the same stop and that times never go backwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Itinerary<'a> {
    access: AccessLeg,
    legs: Vec<Leg<'a>>,
    egress: EgressLeg,
}

/// The join between two consecutive transit legs.
#[derive(Debug, Clone, Copy)]
pub struct Junction<'i, 'a> {
    pub from: &'i TransitLeg<'a>,
    pub transfer: Option<&'i TransferLeg>,
    pub to: &'i TransitLeg<'a>,
}

impl Junction<'_, '_> {
    pub fn walk_duration(&self) -> Duration {
        self.transfer
            .map(TransferLeg::duration)
            .unwrap_or(Duration::ZERO)
    }

    /// Time spent standing at the board stop, walking excluded.
    pub fn wait(&self) -> Duration {
        self.to
            .board_time()
            .checked_duration_since(self.from.alight_time() + self.walk_duration())
            .unwrap_or(Duration::ZERO)
    }

    pub fn same_stop(&self) -> bool {
        self.from.alight_stop_idx() == self.to.board_stop_idx()
    }
}

impl<'a> Itinerary<'a> {
    /// Builds an itinerary from the full ordered leg sequence, access and egress included.
    pub fn new(legs: Vec<Leg<'a>>) -> Result<Self, Error> {
        let mut legs = legs.into_iter();
        let access = match legs.next() {
            Some(Leg::Access(access)) => access,
            _ => {
                return Err(Error::InvalidItinerary(
                    "an itinerary must start with an access leg".into(),
                ));
            }
        };
        let mut legs: Vec<Leg<'a>> = legs.collect();
        let egress = match legs.pop() {
            Some(Leg::Egress(egress)) => egress,
            _ => {
                return Err(Error::InvalidItinerary(
                    "an itinerary must end with an egress leg".into(),
                ));
            }
        };
        Self::from_parts(access, legs, egress)
    }

    /// Builds an itinerary from its access leg, the transit and transfer legs in between
    /// and its egress leg.
    pub fn from_parts(
        access: AccessLeg,
        legs: Vec<Leg<'a>>,
        egress: EgressLeg,
    ) -> Result<Self, Error> {
        let itinerary = Self {
            access,
            legs,
            egress,
        };
        itinerary.validate()?;
        Ok(itinerary)
    }

    fn validate(&self) -> Result<(), Error> {
        let mut previous: Option<&Leg<'a>> = None;
        for leg in &self.legs {
            match (previous, leg) {
                (_, Leg::Access(_)) | (_, Leg::Egress(_)) => {
                    return Err(Error::InvalidItinerary(
                        "access and egress legs must be at the ends of an itinerary".into(),
                    ));
                }
                (None, Leg::Transfer(_)) => {
                    return Err(Error::InvalidItinerary(
                        "the first ride must follow the access leg directly".into(),
                    ));
                }
                (Some(Leg::Transfer(_)), Leg::Transfer(_)) => {
                    return Err(Error::InvalidItinerary(
                        "two transfer legs in a row".into(),
                    ));
                }
                _ => {}
            }
            previous = Some(leg);
        }
        match previous {
            Some(Leg::Transit(_)) => {}
            None => return Err(Error::InvalidItinerary("no transit leg".into())),
            Some(_) => {
                return Err(Error::InvalidItinerary(
                    "the last ride must be followed by the egress leg directly".into(),
                ));
            }
        }

        // (from stop, to stop, departure, arrival) along the whole journey
        let steps = std::iter::once((
            None,
            Some(self.access.to_stop_idx),
            self.access.departure_time,
            self.access.arrival_time,
        ))
        .chain(self.legs.iter().map(|leg| {
            (
                leg.from_stop_idx(),
                leg.to_stop_idx(),
                leg.departure_time(),
                leg.arrival_time(),
            )
        }))
        .chain(std::iter::once((
            Some(self.egress.from_stop_idx),
            None,
            self.egress.departure_time,
            self.egress.arrival_time,
        )));

        let mut last: Option<(Option<u32>, Time)> = None;
        for (i, (from_stop, to_stop, departure, arrival)) in steps.enumerate() {
            if arrival < departure {
                return Err(Error::InvalidItinerary(format!(
                    "leg {i} arrives at {arrival} before departing at {departure}"
                )));
            }
            if let Some((last_stop, last_arrival)) = last {
                if departure < last_arrival {
                    return Err(Error::InvalidItinerary(format!(
                        "leg {i} departs at {departure} before the previous leg arrives at {last_arrival}"
                    )));
                }
                if let (Some(a), Some(b)) = (last_stop, from_stop)
                    && a != b
                {
                    return Err(Error::InvalidItinerary(format!(
                        "leg {i} starts at stop {b} but the previous leg ends at stop {a}"
                    )));
                }
            }
            last = Some((to_stop, arrival));
        }
        Ok(())
    }

    pub fn access(&self) -> &AccessLeg {
        &self.access
    }

    pub fn egress(&self) -> &EgressLeg {
        &self.egress
    }

    /// The transit and transfer legs between access and egress.
    pub fn legs(&self) -> &[Leg<'a>] {
        &self.legs
    }

    /// The full ordered leg sequence, access and egress included.
    pub fn into_legs(self) -> Vec<Leg<'a>> {
        let mut legs = Vec::with_capacity(self.legs.len() + 2);
        legs.push(Leg::Access(self.access));
        legs.extend(self.legs);
        legs.push(Leg::Egress(self.egress));
        legs
    }

    pub fn transit_legs(&self) -> impl Iterator<Item = &TransitLeg<'a>> {
        self.legs.iter().filter_map(Leg::as_transit)
    }

    pub fn number_of_transit_legs(&self) -> usize {
        self.transit_legs().count()
    }

    pub fn number_of_transfers(&self) -> usize {
        self.number_of_transit_legs().saturating_sub(1)
    }

    pub fn junctions(&self) -> Vec<Junction<'_, 'a>> {
        let mut junctions = Vec::new();
        let mut from: Option<&TransitLeg<'a>> = None;
        let mut transfer: Option<&TransferLeg> = None;
        for leg in &self.legs {
            match leg {
                Leg::Transit(to) => {
                    if let Some(from) = from {
                        junctions.push(Junction { from, transfer, to });
                    }
                    from = Some(to);
                    transfer = None;
                }
                Leg::Transfer(leg) => transfer = Some(leg),
                _ => {}
            }
        }
        junctions
    }

    pub fn departure_time(&self) -> Time {
        self.access.departure_time
    }

    pub fn arrival_time(&self) -> Time {
        self.egress.arrival_time
    }

    pub fn generalized_cost(&self) -> i32 {
        self.access.cost + self.legs.iter().map(Leg::cost).sum::<i32>() + self.egress.cost
    }

    /// Total in-vehicle time.
    pub fn transit_duration(&self) -> Duration {
        self.transit_legs().map(TransitLeg::ride_duration).sum()
    }

    pub fn trip_indices(&self) -> Vec<u32> {
        self.transit_legs().map(|leg| leg.trip().index).collect()
    }

    /// True when both itineraries ride the same trips and join them at the same stop
    /// positions.
    pub fn same_transfer_points(&self, other: &Itinerary<'_>) -> bool {
        let ours = self
            .transit_legs()
            .map(|leg| (leg.trip().index, leg.board_pos(), leg.alight_pos()));
        let theirs = other
            .transit_legs()
            .map(|leg| (leg.trip().index, leg.board_pos(), leg.alight_pos()));
        ours.eq(theirs)
    }
}

impl fmt::Display for Itinerary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Access {} ~ {}",
            self.access.departure_time, self.access.to_stop_idx
        )?;
        for leg in &self.legs {
            match leg {
                Leg::Transit(leg) => write!(
                    f,
                    " ~ BUS {} {} {} ~ {}",
                    leg.trip().id,
                    leg.board_time(),
                    leg.alight_time(),
                    leg.alight_stop_idx()
                )?,
                Leg::Transfer(leg) => {
                    write!(f, " ~ Walk {} ~ {}", leg.duration(), leg.to_stop_idx)?
                }
                _ => {}
            }
        }
        write!(
            f,
            " ~ Egress {} [${}]",
            self.egress.arrival_time,
            self.generalized_cost()
        )
    }
}
