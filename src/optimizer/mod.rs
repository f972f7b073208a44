mod candidates;
mod config;
mod cost;
mod diff;
mod filter;
mod optimized;
mod permutations;
mod priority;
mod slack;
mod wait_time;

pub use candidates::*;
pub use config::*;
pub use cost::*;
pub use filter::*;
pub use optimized::*;
pub use permutations::*;
pub use priority::*;
pub use slack::*;
pub use wait_time::*;

use thiserror::Error;
use tracing::debug;

use crate::{
    model::{self, Itinerary, Timetable},
    optimizer::diff::TransferDiff,
};

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Model(#[from] model::Error),
    #[error("A minimum safe transfer time needs at least one itinerary")]
    NoItineraries,
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Picks where consecutive trips of each itinerary should be joined.
///
/// The optimizer never changes which trips are ridden. For every itinerary it enumerates
/// the alternative transfer points, drops the ones using forbidden transfers and keeps
/// those with the best declared transfers, then the safest waits.
pub struct Optimizer<'a, S: SlackProvider = DefaultSlackProvider> {
    timetable: &'a Timetable,
    slack: S,
    config: Config,
    costs: CostCalculator,
}

impl<'a> Optimizer<'a, DefaultSlackProvider> {
    /// Optimizer using the slack of `config` for every pattern.
    pub fn from_config(timetable: &'a Timetable, config: Config) -> Self {
        let slack = DefaultSlackProvider::new(config.slack.clone());
        Self::new(timetable, slack).with_config(config)
    }
}

impl<'a, S: SlackProvider> Optimizer<'a, S> {
    pub fn new(timetable: &'a Timetable, slack: S) -> Self {
        Self {
            timetable,
            slack,
            config: Config::default(),
            costs: CostCalculator::default(),
        }
    }

    /// The slack section of `config` is ignored here, slack comes from the provider.
    pub fn with_config(mut self, config: Config) -> Self {
        self.costs = CostCalculator::new(config.cost.clone());
        self.config = config;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Optimizes a batch of itineraries found for one request.
    ///
    /// Results keep the order of the input: all alternatives kept for the first itinerary
    /// come before those of the second. An itinerary may yield several alternatives when
    /// they tie, or none when every alternative uses a forbidden transfer.
    pub fn optimize(
        &self,
        itineraries: Vec<Itinerary<'a>>,
    ) -> Result<Vec<OptimizedItinerary<'a>>, Error> {
        self.config.validate()?;
        if itineraries.is_empty() {
            return Ok(vec![]);
        }

        let wait_time_model = if self.config.optimize_transfer_wait_time {
            let min_safe_transfer_time =
                MinSafeTransferTimeCalculator::new(self.slack.transfer_slack())
                    .min_safe_transfer_time(&itineraries)?;
            debug!("Min safe transfer time: {min_safe_transfer_time}");
            Some(WaitTimeCostModel::new(
                WaitTimeCostCurve::new(
                    min_safe_transfer_time,
                    self.config.min_safe_wait_time_factor,
                ),
                self.config.wait_reluctance,
                &self.costs,
            ))
        } else {
            None
        };

        let mut result = Vec::with_capacity(itineraries.len());
        for itinerary in itineraries {
            result.extend(self.optimize_itinerary(itinerary, wait_time_model.as_ref()));
        }
        Ok(result)
    }

    fn optimize_itinerary(
        &self,
        itinerary: Itinerary<'a>,
        wait_time_model: Option<&WaitTimeCostModel<'_>>,
    ) -> Vec<OptimizedItinerary<'a>> {
        if itinerary.number_of_transit_legs() < 2 {
            return vec![OptimizedItinerary::unchanged(itinerary)];
        }

        let permutations = PermutationBuilder::new(self.timetable, &self.slack, &self.costs)
            .permutations(&itinerary);
        let diff = TransferDiff::new(&itinerary);
        diff.log_stage(
            "permutations",
            permutations.iter().map(|permutation| &permutation.itinerary),
        );

        let candidates: Vec<OptimizedItinerary<'a>> = permutations
            .into_iter()
            .filter_map(|Permutation { itinerary: permutation, joins }| {
                let transfers_to = PriorityCostModel::matched_transfers(&joins);
                let transfer_priority_cost = PriorityCostModel::cost_of(&transfers_to)?;
                let generalized_cost = permutation.generalized_cost();
                let wait_time_optimized_cost = wait_time_model
                    .map(|model| model.cost(&permutation))
                    .unwrap_or(generalized_cost);
                Some(OptimizedItinerary {
                    same_as_original: permutation.same_transfer_points(&itinerary),
                    itinerary: permutation,
                    transfer_priority_cost,
                    wait_time_optimized_cost,
                    generalized_cost,
                    transfers_to,
                })
            })
            .collect();

        if candidates.is_empty() {
            debug!("Dropping itinerary, every alternative uses a forbidden transfer: {itinerary}");
            return vec![];
        }

        self.filter_chain()
            .filter_with(candidates, |stage, survivors| {
                diff.log_stage(stage, survivors.iter().map(OptimizedItinerary::itinerary))
            })
    }

    fn filter_chain(&self) -> MinCostFilterChain<OptimizedItinerary<'a>> {
        let mut chain = MinCostFilterChain::<OptimizedItinerary<'a>>::new();
        if self.config.optimize_transfer_priority {
            chain = chain.stage("transfer-priority", |it: &OptimizedItinerary<'a>| {
                it.transfer_priority_cost as i64
            });
        }
        let wait_stage = if self.config.optimize_transfer_wait_time {
            "wait-time"
        } else {
            "generalized-cost"
        };
        chain
            .stage(wait_stage, |it: &OptimizedItinerary<'a>| {
                it.wait_time_optimized_cost as i64
            })
            .stage("tie-break", |it: &OptimizedItinerary<'a>| {
                it.itinerary
                    .transit_legs()
                    .map(|leg| leg.board_time().as_seconds() as i64)
                    .sum::<i64>()
            })
    }
}
