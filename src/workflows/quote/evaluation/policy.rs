use super::rules::ComputedRange;
use crate::workflows::quote::domain::Verdict;

/// A blank fee reads as the neutral verdict rather than an error.
pub(crate) fn classify(fee_percent: Option<f64>, range: &ComputedRange) -> Verdict {
    let Some(fee) = fee_percent.filter(|value| value.is_finite()) else {
        return Verdict::Typical;
    };

    if fee < range.min {
        Verdict::Efficient
    } else if fee <= range.max {
        Verdict::Typical
    } else {
        Verdict::High
    }
}
