use crate::{model::DeclaredTransfer, optimizer::TripToTripTransfer};

/// Scores an alternative against the declared transfers of its joins.
///
/// A junction costs the negated priority score of its most specific declared transfer,
/// or 0 without one. Lower is better, so stronger declared transfers win.
pub struct PriorityCostModel;

impl PriorityCostModel {
    /// The declared transfer matched by each join, in junction order.
    pub fn matched_transfers<'a>(
        joins: &[TripToTripTransfer<'a>],
    ) -> Vec<Option<&'a DeclaredTransfer>> {
        joins.iter().map(|join| join.declared).collect()
    }

    /// `None` when any junction uses a forbidden transfer.
    pub fn cost_of(matched: &[Option<&DeclaredTransfer>]) -> Option<i32> {
        matched.iter().try_fold(0, |total, transfer| match transfer {
            Some(transfer) => Some(total - transfer.priority_score()?),
            None => Some(total),
        })
    }
}
