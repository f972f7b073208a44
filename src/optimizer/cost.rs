use crate::{optimizer::CostParams, shared::time::Duration};

/// Prices re-timed legs with the generalized cost used by the upstream search.
#[derive(Debug, Clone, Default)]
pub struct CostCalculator {
    params: CostParams,
}

impl CostCalculator {
    pub fn new(params: CostParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &CostParams {
        &self.params
    }

    pub fn wait_cost(&self, wait: Duration) -> i32 {
        round(self.params.wait_reluctance * wait.as_seconds_f64())
    }

    pub fn walk_cost(&self, walk: Duration) -> i32 {
        round(self.params.walk_reluctance * walk.as_seconds_f64())
    }

    /// Cost of a ride including the wait before boarding it.
    pub fn transit_cost(&self, first_ride: bool, wait: Duration, ride: Duration) -> i32 {
        let mut cost = self.params.board_cost;
        if !first_ride {
            cost += self.params.transfer_cost;
        }
        cost + self.wait_cost(wait) + round(self.params.transit_reluctance * ride.as_seconds_f64())
    }
}

fn round(value: f64) -> i32 {
    value.round() as i32
}
