use crate::workflows::quote::domain::{Difficulty, QuoteInput};
use serde_json::json;

#[test]
fn stored_input_round_trips_through_camel_case_json() {
    let input = QuoteInput::new(Difficulty::High)
        .with_budget(3_000_000.0)
        .with_fee(12.5)
        .with_items(["creative"]);

    let value = serde_json::to_value(&input).expect("serializes");
    assert_eq!(
        value,
        json!({
            "difficulty": "High",
            "budget": 3_000_000.0,
            "feePercent": 12.5,
            "selectedItemIds": ["creative"],
        })
    );
}

#[test]
fn malformed_fields_degrade_independently() {
    let raw = json!({
        "difficulty": "Extreme",
        "budget": "1500000",
        "feePercent": {"oops": true},
        "selectedItemIds": ["targeting", 7, null, "reporting"],
    });

    let input: QuoteInput = serde_json::from_value(raw).expect("lenient parse");

    assert_eq!(input.difficulty, None);
    assert_eq!(input.budget, Some(1_500_000.0));
    assert_eq!(input.fee_percent, None);
    assert_eq!(input.selected_item_ids.len(), 2);
}

#[test]
fn missing_fields_fall_back_to_defaults() {
    let input: QuoteInput = serde_json::from_value(json!({})).expect("empty object parses");
    assert_eq!(input, QuoteInput::default());
}

#[test]
fn difficulty_parse_is_case_insensitive() {
    assert_eq!(Difficulty::parse(" medium "), Some(Difficulty::Medium));
    assert_eq!(Difficulty::parse("HIGH"), Some(Difficulty::High));
    assert_eq!(Difficulty::parse("unknown"), None);
}
