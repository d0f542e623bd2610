use std::collections::BTreeSet;

use serde::Serialize;

use super::domain::ChecklistItem;

/// Reduced view of the selected checklist items.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ChecklistSummary {
    pub sum: f64,
    /// Selected labels in declaration order.
    pub items: Vec<String>,
}

/// Sums selected weights and collects selected labels in declaration order.
pub fn aggregate(items: &[ChecklistItem]) -> ChecklistSummary {
    items
        .iter()
        .filter(|item| item.selected)
        .fold(ChecklistSummary::default(), |mut summary, item| {
            summary.sum += item.effective_weight();
            summary.items.push(item.label.clone());
            summary
        })
}

/// Ordered catalog of the services a quote may include.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServiceChecklist {
    items: Vec<ChecklistItem>,
}

impl ServiceChecklist {
    pub fn new(items: Vec<ChecklistItem>) -> Self {
        let items = items
            .into_iter()
            .map(|mut item| {
                item.selected = false;
                item
            })
            .collect();
        Self { items }
    }

    /// Default catalog of agency services and their fee weights.
    pub fn standard() -> Self {
        Self::new(vec![
            ChecklistItem::new("keyword_research", "Keyword research", 1.0),
            ChecklistItem::new("ad_copy", "Ad copywriting", 1.0),
            ChecklistItem::new("creative_production", "Creative production", 2.0),
            ChecklistItem::new("landing_page", "Landing page optimisation", 2.0),
            ChecklistItem::new("bid_management", "Daily bid management", 1.0),
            ChecklistItem::new("conversion_tracking", "Conversion tracking setup", 1.0),
            ChecklistItem::new("weekly_report", "Weekly performance report", 0.5),
        ])
    }

    pub fn items(&self) -> &[ChecklistItem] {
        &self.items
    }

    pub fn contains(&self, id: &str) -> bool {
        self.items.iter().any(|item| item.id == id)
    }

    /// Catalog copy with `selected` set from the given ids. Unknown ids are ignored.
    pub fn select(&self, ids: &BTreeSet<String>) -> Vec<ChecklistItem> {
        self.items
            .iter()
            .map(|item| ChecklistItem {
                selected: ids.contains(&item.id),
                ..item.clone()
            })
            .collect()
    }
}

impl Default for ServiceChecklist {
    fn default() -> Self {
        Self::standard()
    }
}
