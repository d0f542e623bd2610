mod config;
mod policy;
mod rules;

pub use config::{FeeConfig, DEFAULT_DIFFICULTY_ADJUST};
pub use rules::{fair_range, ComputedRange};

use super::checklist::{aggregate, ServiceChecklist};
use super::domain::{FeeBreakdown, QuoteInput, ResultSnapshot};
use policy::classify;
use tracing::debug;

/// Stateless evaluator applying the fee configuration to a quote.
#[derive(Debug, Clone, Default)]
pub struct QuoteEvaluator {
    config: FeeConfig,
    checklist: ServiceChecklist,
}

impl QuoteEvaluator {
    pub fn new(config: FeeConfig, checklist: ServiceChecklist) -> Self {
        Self { config, checklist }
    }

    pub fn config(&self) -> &FeeConfig {
        &self.config
    }

    pub fn checklist(&self) -> &ServiceChecklist {
        &self.checklist
    }

    pub fn evaluate(&self, input: &QuoteInput) -> ResultSnapshot {
        evaluate(input, &self.config, &self.checklist)
    }
}

/// Pure evaluation: the snapshot depends only on the arguments.
pub fn evaluate(
    input: &QuoteInput,
    config: &FeeConfig,
    checklist: &ServiceChecklist,
) -> ResultSnapshot {
    let difficulty_adjust = config.adjustment_for(input.difficulty);
    let summary = aggregate(&checklist.select(&input.selected_item_ids));
    let expected = config.base_fee + difficulty_adjust + summary.sum;
    let range = rules::fair_range(expected, config);

    let fee_percent = input.fee();
    let budget = input.monthly_budget();
    let verdict = classify(fee_percent, &range);
    let monthly_fee = rules::monthly_fee(budget, fee_percent);

    debug!(
        expected,
        min = range.min,
        max = range.max,
        clamped = range.clamped,
        ?verdict,
        "quote evaluated"
    );

    let selected_count = summary.items.len();
    ResultSnapshot {
        verdict,
        fee_percent,
        expected_percent: expected,
        min: range.min,
        max: range.max,
        range_clamped: range.clamped,
        monthly_budget: budget,
        monthly_fee,
        selected_items: summary.items,
        selected_count,
        breakdown: FeeBreakdown {
            base_fee: config.base_fee,
            difficulty_adjust,
            checklist_sum: summary.sum,
        },
    }
}
