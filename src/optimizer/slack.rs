use std::collections::HashMap;

use crate::{model::Pattern, optimizer::SlackConfig, shared::time::Duration};

/// Buffers required around boarding, alighting and changing vehicles.
pub trait SlackProvider {
    fn board_slack(&self, pattern: &Pattern) -> Duration;

    fn alight_slack(&self, pattern: &Pattern) -> Duration;

    fn transfer_slack(&self) -> Duration;

    /// Minimum time between arriving with one pattern and departing with the next.
    fn transit_slack(&self, pattern: &Pattern) -> Duration {
        self.alight_slack(pattern) + self.transfer_slack() + self.board_slack(pattern)
    }
}

/// Slack from [`SlackConfig`], optionally overridden per route.
#[derive(Debug, Clone, Default)]
pub struct DefaultSlackProvider {
    config: SlackConfig,
    // route index -> (board, alight)
    route_slack: HashMap<u32, (Duration, Duration)>,
}

impl DefaultSlackProvider {
    pub fn new(config: SlackConfig) -> Self {
        Self {
            config,
            route_slack: HashMap::new(),
        }
    }

    pub fn with_route_slack(mut self, route_idx: u32, board: Duration, alight: Duration) -> Self {
        self.route_slack.insert(route_idx, (board, alight));
        self
    }
}

impl From<SlackConfig> for DefaultSlackProvider {
    fn from(config: SlackConfig) -> Self {
        Self::new(config)
    }
}

impl SlackProvider for DefaultSlackProvider {
    fn board_slack(&self, pattern: &Pattern) -> Duration {
        self.route_slack
            .get(&pattern.route_idx)
            .map(|(board, _)| *board)
            .unwrap_or(self.config.board_slack)
    }

    fn alight_slack(&self, pattern: &Pattern) -> Duration {
        self.route_slack
            .get(&pattern.route_idx)
            .map(|(_, alight)| *alight)
            .unwrap_or(self.config.alight_slack)
    }

    fn transfer_slack(&self) -> Duration {
        self.config.transfer_slack
    }
}
