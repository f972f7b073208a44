use std::f64::consts::E;

use crate::{
    model::Itinerary,
    optimizer::{CostCalculator, Error},
    shared::time::Duration,
};

/// Risk-adjusted cost of waiting `w` seconds at a junction:
///
/// `cost(w) = n·t0 / (1 + (n − 1)·ln(1 + (e − 1)·w / t0))`
///
/// where `t0` is the minimum safe transfer time and `n` the cost ratio between a zero
/// wait and a safe one. The curve starts at `n·t0`, passes through `t0` at `w = t0` and
/// keeps decreasing towards zero, so tight connections are punished and long waits are
/// only mildly rewarded.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaitTimeCostCurve {
    t0: f64,
    n: f64,
}

impl WaitTimeCostCurve {
    pub fn new(min_safe_transfer_time: Duration, n: f64) -> Self {
        Self {
            t0: min_safe_transfer_time.as_seconds_f64().max(1.0),
            n,
        }
    }

    pub fn min_safe_transfer_time(&self) -> f64 {
        self.t0
    }

    pub fn cost(&self, wait: Duration) -> f64 {
        self.cost_seconds(wait.as_seconds_f64())
    }

    pub fn cost_seconds(&self, wait: f64) -> f64 {
        let decay = 1.0 + (self.n - 1.0) * (1.0 + (E - 1.0) * wait / self.t0).ln();
        self.n * self.t0 / decay
    }
}

/// Derives the minimum safe transfer time of a batch from its shortest ride.
#[derive(Debug, Clone, Copy)]
pub struct MinSafeTransferTimeCalculator {
    transfer_slack: Duration,
}

impl MinSafeTransferTimeCalculator {
    pub const TRANSIT_TIME_FACTOR: f64 = 0.0667;
    pub const MIN_LIMIT: Duration = Duration::from_minutes(1);
    pub const MAX_LIMIT: Duration = Duration::from_minutes(40);

    pub fn new(transfer_slack: Duration) -> Self {
        Self { transfer_slack }
    }

    /// `round(shortest in-vehicle time × 6.67%)`, at least the transfer slack and one
    /// minute, at most 40 minutes. The lower bound wins if the two bounds cross.
    pub fn min_safe_transfer_time(&self, itineraries: &[Itinerary<'_>]) -> Result<Duration, Error> {
        let min_transit_time = itineraries
            .iter()
            .map(Itinerary::transit_duration)
            .min()
            .ok_or(Error::NoItineraries)?;
        let value = (min_transit_time.as_seconds_f64() * Self::TRANSIT_TIME_FACTOR).round() as u32;
        let lower = self.transfer_slack.max(Self::MIN_LIMIT);
        Ok(Duration::from_seconds(value)
            .min(Self::MAX_LIMIT)
            .max(lower))
    }
}

/// Generalized cost where each junction's raw wait cost is swapped for its risk-adjusted
/// value, weighted by the wait reluctance.
#[derive(Debug, Clone)]
pub struct WaitTimeCostModel<'c> {
    curve: WaitTimeCostCurve,
    wait_reluctance: f64,
    costs: &'c CostCalculator,
}

impl<'c> WaitTimeCostModel<'c> {
    pub fn new(curve: WaitTimeCostCurve, wait_reluctance: f64, costs: &'c CostCalculator) -> Self {
        Self {
            curve,
            wait_reluctance,
            costs,
        }
    }

    pub fn curve(&self) -> &WaitTimeCostCurve {
        &self.curve
    }

    pub fn cost(&self, itinerary: &Itinerary<'_>) -> i32 {
        let mut cost = itinerary.generalized_cost();
        for junction in itinerary.junctions() {
            let wait = junction.wait();
            cost -= self.costs.wait_cost(wait);
            cost += (self.wait_reluctance * self.curve.cost(wait)).round() as i32;
        }
        cost
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(curve: &WaitTimeCostCurve, wait: Duration, expected: f64) {
        let actual = curve.cost(wait);
        assert!(
            (actual - expected).abs() < 0.01,
            "cost({wait}) = {actual}, expected {expected}"
        );
    }

    #[test]
    fn calibration_two_minutes() {
        let curve = WaitTimeCostCurve::new(Duration::from_minutes(2), 2.0);
        assert_close(&curve, Duration::from_seconds(1), 236.64);
        assert_close(&curve, Duration::from_seconds(12), 207.15);
        assert_close(&curve, Duration::from_seconds(24), 185.27);
        assert_close(&curve, Duration::from_seconds(60), 148.14);
        assert_close(&curve, Duration::from_seconds(240), 96.39);
        assert_close(&curve, Duration::from_seconds(600), 73.60);
        assert_close(&curve, Duration::from_days(5), 24.67);
    }

    #[test]
    fn calibration_ten_minutes() {
        let curve = WaitTimeCostCurve::new(Duration::from_minutes(10), 5.0);
        assert_close(&curve, Duration::from_seconds(1), 2966.07);
        assert_close(&curve, Duration::from_minutes(1), 1835.69);
        assert_close(&curve, Duration::from_minutes(2), 1375.15);
        assert_close(&curve, Duration::from_minutes(5), 861.96);
        assert_close(&curve, Duration::from_minutes(20), 431.06);
        assert_close(&curve, Duration::from_minutes(50), 298.70);
        assert_close(&curve, Duration::from_days(5), 101.74);
    }

    #[test]
    fn boundary_laws() {
        for t0 in [60, 120, 600, 2400] {
            for n in [1.0, 1.5, 2.0, 5.0, 10.0] {
                let curve = WaitTimeCostCurve::new(Duration::from_seconds(t0), n);
                let t0 = t0 as f64;
                assert!((curve.cost_seconds(0.0) - n * t0).abs() < 1e-9);
                assert!((curve.cost_seconds(t0) - t0).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn curve_never_increases() {
        let curve = WaitTimeCostCurve::new(Duration::from_minutes(3), 4.0);
        let mut last = f64::MAX;
        for wait in (0..7200).step_by(15) {
            let cost = curve.cost(Duration::from_seconds(wait));
            assert!(cost <= last);
            assert!(cost > 0.0);
            last = cost;
        }
    }

    #[test]
    fn min_safe_time_requires_itineraries() {
        let calculator = MinSafeTransferTimeCalculator::new(Duration::from_minutes(1));
        assert!(matches!(
            calculator.min_safe_transfer_time(&[]),
            Err(Error::NoItineraries)
        ));
    }
}
