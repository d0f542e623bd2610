use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Qualitative project-complexity tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    Low,
    Medium,
    High,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Low, Difficulty::Medium, Difficulty::High];

    /// Case-insensitive lookup; unrecognised tiers yield `None`.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "low" => Some(Self::Low),
            "medium" | "mid" => Some(Self::Medium),
            "high" => Some(Self::High),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Difficulty::Low => "Low",
            Difficulty::Medium => "Medium",
            Difficulty::High => "High",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A selectable service with its fee-percentage weight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChecklistItem {
    pub id: String,
    pub label: String,
    pub weight: f64,
    #[serde(default)]
    pub selected: bool,
}

impl ChecklistItem {
    pub fn new(id: impl Into<String>, label: impl Into<String>, weight: f64) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            weight,
            selected: false,
        }
    }

    /// Weight contribution, with non-finite weights counting as zero.
    pub fn effective_weight(&self) -> f64 {
        if self.weight.is_finite() {
            self.weight
        } else {
            0.0
        }
    }
}

/// Raw form state. Blank numeric fields are `None` and never rejected.
///
/// Deserialization is lenient field by field so a partially corrupt stored
/// payload still restores whatever parts are usable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteInput {
    #[serde(default, deserialize_with = "lenient_difficulty")]
    pub difficulty: Option<Difficulty>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub budget: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub fee_percent: Option<f64>,
    #[serde(default, deserialize_with = "lenient_ids")]
    pub selected_item_ids: BTreeSet<String>,
}

impl QuoteInput {
    pub fn new(difficulty: Difficulty) -> Self {
        Self {
            difficulty: Some(difficulty),
            ..Self::default()
        }
    }

    pub fn with_budget(mut self, budget: f64) -> Self {
        self.budget = Some(budget);
        self
    }

    pub fn with_fee(mut self, fee_percent: f64) -> Self {
        self.fee_percent = Some(fee_percent);
        self
    }

    pub fn with_items<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.selected_item_ids.extend(ids.into_iter().map(Into::into));
        self
    }

    /// Fee percent if the field holds a finite number.
    pub fn fee(&self) -> Option<f64> {
        self.fee_percent.filter(|value| value.is_finite())
    }

    /// Monthly budget if the field holds a finite number.
    pub fn monthly_budget(&self) -> Option<f64> {
        self.budget.filter(|value| value.is_finite())
    }
}

fn lenient_difficulty<'de, D>(deserializer: D) -> Result<Option<Difficulty>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value.as_str().and_then(Difficulty::parse))
}

fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let number = match value {
        Value::Number(number) => number.as_f64(),
        Value::String(raw) => raw.trim().parse::<f64>().ok(),
        _ => None,
    };
    Ok(number.filter(|value| value.is_finite()))
}

fn lenient_ids<'de, D>(deserializer: D) -> Result<BTreeSet<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Array(entries) => entries
            .into_iter()
            .filter_map(|entry| match entry {
                Value::String(id) => Some(id),
                _ => None,
            })
            .collect(),
        _ => BTreeSet::new(),
    })
}

/// Qualitative classification of a fee against the fair range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Verdict {
    Efficient,
    Typical,
    High,
}

impl Verdict {
    pub fn label(&self) -> &'static str {
        match self {
            Verdict::Efficient => "Good value",
            Verdict::Typical => "Fair",
            Verdict::High => "Excessive",
        }
    }

    /// Stable identifier used in analytics parameters and exports.
    pub fn key(&self) -> &'static str {
        match self {
            Verdict::Efficient => "efficient",
            Verdict::Typical => "typical",
            Verdict::High => "high",
        }
    }
}

/// Additive parts of the expected fee, kept so renderers can explain it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeeBreakdown {
    pub base_fee: f64,
    pub difficulty_adjust: f64,
    pub checklist_sum: f64,
}

/// Immutable outcome of one evaluation. Recomputation replaces it wholesale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultSnapshot {
    pub verdict: Verdict,
    pub fee_percent: Option<f64>,
    pub expected_percent: f64,
    pub min: f64,
    pub max: f64,
    #[serde(default)]
    pub range_clamped: bool,
    pub monthly_budget: Option<f64>,
    pub monthly_fee: f64,
    pub selected_items: Vec<String>,
    pub selected_count: usize,
    pub breakdown: FeeBreakdown,
}
