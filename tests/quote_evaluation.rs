use quote_check::workflows::quote::{
    aggregate, ChecklistItem, Difficulty, FeeConfig, QuoteEvaluator, QuoteInput, Verdict,
};

fn medium_quote(fee: f64) -> QuoteInput {
    QuoteInput::new(Difficulty::Medium)
        .with_fee(fee)
        .with_items(["creative_production", "landing_page", "ad_copy"])
}

#[test]
fn medium_tier_with_five_points_of_services_spans_thirteen_to_seventeen() {
    let evaluator = QuoteEvaluator::default();

    let cheap = evaluator.evaluate(&medium_quote(10.0));
    assert_eq!(cheap.expected_percent, 15.0);
    assert_eq!(cheap.min, 13.0);
    assert_eq!(cheap.max, 17.0);
    assert_eq!(cheap.verdict, Verdict::Efficient);

    assert_eq!(evaluator.evaluate(&medium_quote(15.0)).verdict, Verdict::Typical);
    assert_eq!(evaluator.evaluate(&medium_quote(20.0)).verdict, Verdict::High);
}

#[test]
fn blank_fee_on_low_tier_is_fair_with_no_monthly_fee() {
    let evaluator = QuoteEvaluator::default();
    let snapshot = evaluator.evaluate(&QuoteInput::new(Difficulty::Low).with_budget(500_000.0));

    assert_eq!(snapshot.expected_percent, 8.0);
    assert_eq!(snapshot.min, 6.0);
    assert_eq!(snapshot.max, 10.0);
    assert_eq!(snapshot.verdict, Verdict::Typical);
    assert_eq!(snapshot.fee_percent, None);
    assert_eq!(snapshot.monthly_fee, 0.0);
    assert!(snapshot.selected_items.is_empty());
}

#[test]
fn monthly_fee_scales_budget_by_quoted_percent() {
    let evaluator = QuoteEvaluator::default();
    let snapshot = evaluator.evaluate(&medium_quote(15.0).with_budget(1_000_000.0));

    assert_eq!(snapshot.monthly_fee, 150_000.0);
    assert_eq!(snapshot.monthly_budget, Some(1_000_000.0));
}

#[test]
fn boundaries_are_inclusive_on_the_fair_band() {
    let evaluator = QuoteEvaluator::default();
    let epsilon = 1e-9;

    assert_eq!(
        evaluator.evaluate(&medium_quote(13.0 - epsilon)).verdict,
        Verdict::Efficient
    );
    assert_eq!(evaluator.evaluate(&medium_quote(13.0)).verdict, Verdict::Typical);
    assert_eq!(evaluator.evaluate(&medium_quote(17.0)).verdict, Verdict::Typical);
    assert_eq!(
        evaluator.evaluate(&medium_quote(17.0 + epsilon)).verdict,
        Verdict::High
    );
}

#[test]
fn range_stays_ordered_across_tiers_and_selections() {
    let evaluator = QuoteEvaluator::default();
    let ids: Vec<String> = evaluator
        .checklist()
        .items()
        .iter()
        .map(|item| item.id.clone())
        .collect();

    for tier in Difficulty::ALL {
        for take in 0..=ids.len() {
            let input = QuoteInput::new(tier).with_items(ids.iter().take(take).cloned());
            let snapshot = evaluator.evaluate(&input);
            assert!(
                snapshot.min <= snapshot.max,
                "{tier} with {take} items produced {} > {}",
                snapshot.min,
                snapshot.max
            );
            assert!(!snapshot.range_clamped);
        }
    }
}

#[test]
fn evaluation_is_repeatable() {
    let evaluator = QuoteEvaluator::default();
    let input = medium_quote(14.5).with_budget(2_400.0);

    assert_eq!(evaluator.evaluate(&input), evaluator.evaluate(&input));
}

#[test]
fn unknown_difficulty_uses_fallback_adjustment() {
    let evaluator = QuoteEvaluator::default();
    let input: QuoteInput =
        serde_json::from_str(r#"{"difficulty":"Extreme","feePercent":"9"}"#).expect("input");

    let snapshot = evaluator.evaluate(&input);
    assert_eq!(input.difficulty, None);
    assert_eq!(snapshot.breakdown.difficulty_adjust, 2.0);
    assert_eq!(snapshot.expected_percent, 10.0);
    assert_eq!(snapshot.fee_percent, Some(9.0));
}

#[test]
fn aggregation_ignores_order_and_non_finite_weights() {
    let mut forward = vec![
        ChecklistItem::new("a", "A", 1.5),
        ChecklistItem::new("b", "B", f64::INFINITY),
        ChecklistItem::new("c", "C", 2.0),
    ];
    for item in &mut forward {
        item.selected = true;
    }
    let mut reversed = forward.clone();
    reversed.reverse();

    assert_eq!(aggregate(&forward).sum, 3.5);
    assert_eq!(aggregate(&reversed).sum, 3.5);
}

#[test]
fn negative_range_offset_is_rejected() {
    let standard = FeeConfig::standard();
    let result = FeeConfig::new(
        standard.base_fee,
        standard.difficulty_adjust,
        -1.0,
        standard.min_floor,
    );
    assert!(result.is_err());
}
