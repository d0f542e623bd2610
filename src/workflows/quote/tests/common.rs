use std::collections::BTreeMap;

use crate::workflows::quote::domain::{ChecklistItem, Difficulty, QuoteInput};
use crate::workflows::quote::evaluation::{FeeConfig, QuoteEvaluator};
use crate::workflows::quote::ServiceChecklist;

pub(super) fn fee_config() -> FeeConfig {
    FeeConfig::standard()
}

pub(super) fn checklist() -> ServiceChecklist {
    ServiceChecklist::new(vec![
        ChecklistItem::new("targeting", "Audience targeting", 2.0),
        ChecklistItem::new("creative", "Creative production", 2.0),
        ChecklistItem::new("reporting", "Reporting", 1.0),
        ChecklistItem::new("broken", "Unpriced extra", f64::NAN),
    ])
}

pub(super) fn evaluator() -> QuoteEvaluator {
    QuoteEvaluator::new(fee_config(), checklist())
}

/// Medium tier with all priced items selected: expected 15, band 13..=17.
pub(super) fn medium_full_input(fee: f64) -> QuoteInput {
    QuoteInput::new(Difficulty::Medium)
        .with_budget(2_000_000.0)
        .with_fee(fee)
        .with_items(["targeting", "creative", "reporting"])
}

/// Config whose floor sits far above the band so `min` overtakes `max`.
pub(super) fn inverted_config() -> FeeConfig {
    FeeConfig::new(
        1.0,
        BTreeMap::from([(Difficulty::Low, 0.0)]),
        1.0,
        10.0,
    )
    .expect("valid config")
}
