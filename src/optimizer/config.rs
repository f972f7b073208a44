use serde::{Deserialize, Serialize};

use crate::{optimizer::Error, shared::time::Duration};

/// Tuning of the transfer optimizer. Every field falls back to its default when missing
/// from a deserialized document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Prefer alternatives that use operator-declared transfers.
    pub optimize_transfer_priority: bool,
    /// Prefer alternatives whose waiting time is spread out safely.
    /// When disabled the generalized cost is used instead.
    pub optimize_transfer_wait_time: bool,
    /// Weight `p` applied to the risk-adjusted wait cost.
    pub wait_reluctance: f64,
    /// Ratio `n` between the cost of a zero wait and the cost of a safe wait.
    pub min_safe_wait_time_factor: f64,
    pub cost: CostParams,
    pub slack: SlackConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            optimize_transfer_priority: true,
            optimize_transfer_wait_time: true,
            wait_reluctance: 1.0,
            min_safe_wait_time_factor: 5.0,
            cost: CostParams::default(),
            slack: SlackConfig::default(),
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<(), Error> {
        if self.min_safe_wait_time_factor.is_nan() || self.min_safe_wait_time_factor < 1.0 {
            return Err(Error::InvalidConfig(format!(
                "min_safe_wait_time_factor must be at least 1, got {}",
                self.min_safe_wait_time_factor
            )));
        }
        let reluctances = [
            ("wait_reluctance", self.wait_reluctance),
            ("cost.walk_reluctance", self.cost.walk_reluctance),
            ("cost.wait_reluctance", self.cost.wait_reluctance),
            ("cost.transit_reluctance", self.cost.transit_reluctance),
        ];
        for (name, value) in reluctances {
            if !value.is_finite() || value < 0.0 {
                return Err(Error::InvalidConfig(format!(
                    "{name} must be a finite non-negative number, got {value}"
                )));
            }
        }
        Ok(())
    }
}

/// Weights of the generalized cost used to re-price re-timed legs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CostParams {
    /// Flat cost of every boarding.
    pub board_cost: i32,
    /// Extra cost of every boarding after the first.
    pub transfer_cost: i32,
    pub walk_reluctance: f64,
    pub wait_reluctance: f64,
    pub transit_reluctance: f64,
}

impl Default for CostParams {
    fn default() -> Self {
        Self {
            board_cost: 600,
            transfer_cost: 0,
            walk_reluctance: 2.0,
            wait_reluctance: 1.0,
            transit_reluctance: 1.0,
        }
    }
}

/// Slack applied to every pattern unless a route overrides it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SlackConfig {
    pub board_slack: Duration,
    pub alight_slack: Duration,
    pub transfer_slack: Duration,
}

impl Default for SlackConfig {
    fn default() -> Self {
        Self {
            board_slack: Duration::ZERO,
            alight_slack: Duration::ZERO,
            transfer_slack: Duration::from_minutes(2),
        }
    }
}
