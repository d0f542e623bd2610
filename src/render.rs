use quote_check::workflows::feedback::{FeeBucket, FeedbackRecord};
use quote_check::workflows::quote::{FeeBreakdown, QuoteEvaluator, ResultSnapshot};
use quote_check::workflows::session::SaveOutcome;

/// Percent with at most two decimals and no trailing zeros.
fn percent(value: f64) -> String {
    let formatted = format!("{value:.2}");
    let trimmed = formatted.trim_end_matches('0').trim_end_matches('.');
    format!("{trimmed}%")
}

pub(crate) fn explain(breakdown: &FeeBreakdown, expected: f64) -> String {
    format!(
        "base {} + difficulty {} + services {} = {}",
        percent(breakdown.base_fee),
        percent(breakdown.difficulty_adjust),
        percent(breakdown.checklist_sum),
        percent(expected)
    )
}

pub(crate) fn render_snapshot(snapshot: &ResultSnapshot) {
    match snapshot.fee_percent {
        Some(fee) => println!("Verdict: {} (quoted {})", snapshot.verdict.label(), percent(fee)),
        None => println!(
            "Verdict: {} (no fee entered)",
            snapshot.verdict.label()
        ),
    }
    println!(
        "Fair range: {} - {}",
        percent(snapshot.min),
        percent(snapshot.max)
    );
    if snapshot.range_clamped {
        println!("(range collapsed: the floor exceeded the upper bound)");
    }
    println!(
        "Expected: {}",
        explain(&snapshot.breakdown, snapshot.expected_percent)
    );

    if let Some(budget) = snapshot.monthly_budget {
        println!(
            "Monthly fee: {:.0} on a {:.0} budget",
            snapshot.monthly_fee, budget
        );
    }

    if snapshot.selected_items.is_empty() {
        println!("No services selected");
    } else {
        println!("\nIncluded services ({})", snapshot.selected_count);
        for label in &snapshot.selected_items {
            println!("- {label}");
        }
    }
}

pub(crate) fn render_checklist(evaluator: &QuoteEvaluator) {
    let config = evaluator.config();
    println!("Base fee: {}", percent(config.base_fee));
    for (tier, adjust) in &config.difficulty_adjust {
        println!("- {tier} difficulty: +{}", percent(*adjust));
    }
    println!(
        "Range: expected +/- {} (floor {})",
        percent(config.range_offset),
        percent(config.min_floor)
    );

    println!("\nService checklist");
    for item in evaluator.checklist().items() {
        println!("- {} [{}]: +{}", item.label, item.id, percent(item.weight));
    }
}

pub(crate) fn render_history(history: &[FeedbackRecord], limit: usize) {
    if history.is_empty() {
        println!("No feedback saved yet");
        return;
    }

    println!(
        "Feedback history ({} of {} shown, newest first)",
        history.len().min(limit),
        history.len()
    );
    for record in history.iter().take(limit) {
        let snapshot = record.result_snapshot.as_ref();
        let verdict = snapshot
            .map(|snapshot| snapshot.verdict.label())
            .unwrap_or("no result");
        println!(
            "- {} {} verdict={} fee={} action={}",
            record.timestamp.format("%Y-%m-%d %H:%M:%S"),
            record.sentiment.key(),
            verdict,
            FeeBucket::for_snapshot(snapshot).label(),
            record.action_intent.as_deref().unwrap_or("-")
        );
    }
}

pub(crate) fn render_save_outcome(outcome: &SaveOutcome) {
    println!(
        "Saved! ({} record(s) in history)",
        outcome.history_len
    );
    if outcome.show_survey_prompt {
        match outcome.survey_url.as_deref() {
            Some(url) => println!("Tell us more: {url}"),
            None => println!("Tell us more in the follow-up survey."),
        }
    }
}
