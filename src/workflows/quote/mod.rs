//! Fee quote evaluation: checklist aggregation, fair-range computation, and
//! verdict classification.

pub mod checklist;
pub mod domain;
pub mod evaluation;

#[cfg(test)]
mod tests;

pub use checklist::{aggregate, ChecklistSummary, ServiceChecklist};
pub use domain::{ChecklistItem, Difficulty, FeeBreakdown, QuoteInput, ResultSnapshot, Verdict};
pub use evaluation::{evaluate, ComputedRange, FeeConfig, QuoteEvaluator};
