use super::config::FeeConfig;

/// Fair band around the expected fee.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ComputedRange {
    pub expected: f64,
    pub min: f64,
    pub max: f64,
    /// Set when the floor lifted `min` above `max` and `max` was raised to match.
    pub clamped: bool,
}

/// `min = max(floor, expected - offset)`, `max = expected + offset`, with an
/// inverted band collapsed onto `min`.
pub fn fair_range(expected: f64, config: &FeeConfig) -> ComputedRange {
    let min = config.min_floor.max(expected - config.range_offset);
    let max = expected + config.range_offset;

    if min > max {
        return ComputedRange {
            expected,
            min,
            max: min,
            clamped: true,
        };
    }

    ComputedRange {
        expected,
        min,
        max,
        clamped: false,
    }
}

/// Zero when either input is blank or the product overflows, so the snapshot
/// always serializes to a value that reads back.
pub(crate) fn monthly_fee(budget: Option<f64>, fee_percent: Option<f64>) -> f64 {
    match (budget, fee_percent) {
        (Some(budget), Some(fee)) => {
            let monthly = budget * fee / 100.0;
            if monthly.is_finite() {
                monthly
            } else {
                0.0
            }
        }
        _ => 0.0,
    }
}
