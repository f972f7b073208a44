use std::fmt;

use crate::model::{DeclaredTransfer, Itinerary};

/// An itinerary chosen by the optimizer, with the costs it was selected on.
#[derive(Debug, Clone, PartialEq)]
pub struct OptimizedItinerary<'a> {
    pub(crate) itinerary: Itinerary<'a>,
    pub(crate) transfer_priority_cost: i32,
    pub(crate) wait_time_optimized_cost: i32,
    pub(crate) generalized_cost: i32,
    pub(crate) transfers_to: Vec<Option<&'a DeclaredTransfer>>,
    pub(crate) same_as_original: bool,
}

impl<'a> OptimizedItinerary<'a> {
    /// Wraps an itinerary that was not optimized.
    pub(crate) fn unchanged(itinerary: Itinerary<'a>) -> Self {
        let generalized_cost = itinerary.generalized_cost();
        Self {
            transfers_to: vec![None; itinerary.number_of_transfers()],
            itinerary,
            transfer_priority_cost: 0,
            wait_time_optimized_cost: generalized_cost,
            generalized_cost,
            same_as_original: true,
        }
    }

    pub fn itinerary(&self) -> &Itinerary<'a> {
        &self.itinerary
    }

    pub fn into_itinerary(self) -> Itinerary<'a> {
        self.itinerary
    }

    /// Sum of the negated priority scores of the declared transfers used. Lower is better.
    pub fn transfer_priority_cost(&self) -> i32 {
        self.transfer_priority_cost
    }

    /// Generalized cost with risk-adjusted waits, or the plain generalized cost when
    /// wait-time optimization is disabled.
    pub fn wait_time_optimized_cost(&self) -> i32 {
        self.wait_time_optimized_cost
    }

    pub fn generalized_cost(&self) -> i32 {
        self.generalized_cost
    }

    /// Declared transfer used at junction `junction`, if any.
    pub fn transfer_to(&self, junction: usize) -> Option<&'a DeclaredTransfer> {
        self.transfers_to.get(junction).copied().flatten()
    }

    pub fn transfers_to(&self) -> &[Option<&'a DeclaredTransfer>] {
        &self.transfers_to
    }

    /// True when the transfer points are the ones of the input itinerary.
    pub fn is_same_as_original(&self) -> bool {
        self.same_as_original
    }
}

impl fmt::Display for OptimizedItinerary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} [priority {}, wait {}]",
            self.itinerary, self.transfer_priority_cost, self.wait_time_optimized_cost
        )
    }
}
