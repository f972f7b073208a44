use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::{model::Trip, shared::time::Duration};

/// Operator priority of a declared transfer, ordered from forbidden to most wanted.
#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransferPriority {
    NotAllowed,
    #[default]
    Allowed,
    Preferred,
    Recommended,
}

impl TransferPriority {
    pub fn is_allowed(&self) -> bool {
        !matches!(self, TransferPriority::NotAllowed)
    }

    /// Preference term of the priority, `None` for a forbidden transfer.
    pub const fn score(&self) -> Option<i32> {
        match self {
            TransferPriority::NotAllowed => None,
            TransferPriority::Allowed => Some(0),
            TransferPriority::Preferred => Some(1),
            TransferPriority::Recommended => Some(2),
        }
    }
}

/// One side of a declared transfer. The more specific the point, the higher it ranks
/// when several transfers match the same junction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransferPoint {
    Stop { stop_idx: u32 },
    Route { stop_idx: u32, route_idx: u32 },
    Trip { stop_idx: u32, trip_idx: u32 },
}

impl TransferPoint {
    pub fn stop_idx(&self) -> u32 {
        match self {
            TransferPoint::Stop { stop_idx }
            | TransferPoint::Route { stop_idx, .. }
            | TransferPoint::Trip { stop_idx, .. } => *stop_idx,
        }
    }

    pub fn specificity_ranking(&self) -> u32 {
        match self {
            TransferPoint::Stop { .. } => 0,
            TransferPoint::Route { .. } => 1,
            TransferPoint::Trip { .. } => 2,
        }
    }

    pub fn matches(&self, stop_idx: u32, trip: &Trip) -> bool {
        if self.stop_idx() != stop_idx {
            return false;
        }
        match self {
            TransferPoint::Stop { .. } => true,
            TransferPoint::Route { route_idx, .. } => *route_idx == trip.route_idx,
            TransferPoint::Trip { trip_idx, .. } => *trip_idx == trip.index,
        }
    }
}

/// Operator metadata describing how two trips may be joined at a pair of stops.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeclaredTransfer {
    pub from: TransferPoint,
    pub to: TransferPoint,
    pub priority: TransferPriority,
    /// The rider stays in the vehicle while it changes trip.
    pub stay_seated: bool,
    /// The departing trip waits for the arriving one.
    pub guaranteed: bool,
    /// Operator minimum for changing vehicles here. Informational, the optimizer relies on
    /// slack instead.
    pub min_transfer_time: Option<Duration>,
}

impl DeclaredTransfer {
    pub const STAY_SEATED_SCORE: i32 = 100;
    pub const GUARANTEED_SCORE: i32 = 10;

    pub fn new(from: TransferPoint, to: TransferPoint, priority: TransferPriority) -> Self {
        Self {
            from,
            to,
            priority,
            stay_seated: false,
            guaranteed: false,
            min_transfer_time: None,
        }
    }

    pub fn stay_seated(mut self) -> Self {
        self.stay_seated = true;
        self
    }

    pub fn guaranteed(mut self) -> Self {
        self.guaranteed = true;
        self
    }

    pub fn with_min_transfer_time(mut self, min_transfer_time: Duration) -> Self {
        self.min_transfer_time = Some(min_transfer_time);
        self
    }

    pub fn specificity_ranking(&self) -> u32 {
        self.from.specificity_ranking() + self.to.specificity_ranking()
    }

    pub fn matches(&self, from_stop: u32, to_stop: u32, from_trip: &Trip, to_trip: &Trip) -> bool {
        self.from.matches(from_stop, from_trip) && self.to.matches(to_stop, to_trip)
    }

    pub fn is_allowed(&self) -> bool {
        self.priority.is_allowed()
    }

    /// How strongly the operator wants this transfer used:
    /// `100·stay_seated + 10·guaranteed + priority`. `None` if the transfer is forbidden.
    pub fn priority_score(&self) -> Option<i32> {
        let mut score = self.priority.score()?;
        if self.stay_seated {
            score += Self::STAY_SEATED_SCORE;
        }
        if self.guaranteed {
            score += Self::GUARANTEED_SCORE;
        }
        Some(score)
    }
}

/// All declared transfers, grouped by their (from stop, to stop) pair.
#[derive(Debug, Clone, Default)]
pub struct TransferService {
    table: HashMap<(u32, u32), Vec<DeclaredTransfer>>,
    len: usize,
}

impl TransferService {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn add(&mut self, transfer: DeclaredTransfer) {
        self.table
            .entry((transfer.from.stop_idx(), transfer.to.stop_idx()))
            .or_default()
            .push(transfer);
        self.len += 1;
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the most specific transfer matching the junction. On equal rank the
    /// transfer added first wins.
    pub fn find_transfer(
        &self,
        from_stop: u32,
        to_stop: u32,
        from_trip: &Trip,
        to_trip: &Trip,
    ) -> Option<&DeclaredTransfer> {
        let mut best: Option<&DeclaredTransfer> = None;
        for transfer in self.table.get(&(from_stop, to_stop))? {
            if !transfer.matches(from_stop, to_stop, from_trip, to_trip) {
                continue;
            }
            if best.is_none_or(|b| transfer.specificity_ranking() > b.specificity_ranking()) {
                best = Some(transfer);
            }
        }
        best
    }
}
