use tracing::{Level, debug, enabled};

use crate::{model::Itinerary, shared::Identifiable};

/// Debug view of how the optimizer narrowed the alternatives of one itinerary.
pub(crate) struct TransferDiff<'o, 'a> {
    original: &'o Itinerary<'a>,
}

impl<'o, 'a> TransferDiff<'o, 'a> {
    pub(crate) fn new(original: &'o Itinerary<'a>) -> Self {
        Self { original }
    }

    pub(crate) fn log_stage<'i, I>(&self, stage: &str, survivors: I)
    where
        I: IntoIterator<Item = &'i Itinerary<'a>>,
        'a: 'i,
    {
        if !enabled!(Level::DEBUG) {
            return;
        }
        let mut lines = Vec::new();
        let mut kept_original = false;
        for itinerary in survivors {
            let unchanged = itinerary.same_transfer_points(self.original);
            kept_original |= unchanged;
            lines.push(format!(
                "  {} {}",
                if unchanged { "=" } else { "+" },
                describe(itinerary)
            ));
        }
        debug!(
            "{stage}: {} alternative(s), original {}\n  * {}\n{}",
            lines.len(),
            if kept_original { "kept" } else { "dropped" },
            describe(self.original),
            lines.join("\n")
        );
    }
}

/// One line per itinerary: the trips and where they are joined.
fn describe(itinerary: &Itinerary<'_>) -> String {
    let junctions = itinerary.junctions();
    let mut parts = Vec::new();
    for (i, leg) in itinerary.transit_legs().enumerate() {
        if let Some(junction) = i.checked_sub(1).and_then(|j| junctions.get(j)) {
            parts.push(format!("wait {}", junction.wait()));
        }
        parts.push(format!(
            "{} {}@{} {}@{}",
            leg.trip().id(),
            leg.board_stop_idx(),
            leg.board_time(),
            leg.alight_stop_idx(),
            leg.alight_time()
        ));
    }
    format!("{} [${}]", parts.join(" ~ "), itinerary.generalized_cost())
}
