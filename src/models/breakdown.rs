use super::costs::ServiceCost;
use serde::Deserialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CategoryBreakdown {
    pub category: String,
    #[serde(default)]
    pub total_cost: f64,
    #[serde(default)]
    pub service_count: usize,
    #[serde(default)]
    pub services: Vec<ServiceCost>,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct ServicesBreakdown {
    #[serde(default)]
    pub breakdown: Vec<CategoryBreakdown>,
    #[serde(default)]
    pub total_cost: f64,
    #[serde(default)]
    pub total_services: usize,
    #[serde(default)]
    pub category_count: usize,
}

impl ServicesBreakdown {
    /// Share of total cost per category, in percent.
    pub fn category_shares(&self) -> Vec<(&str, f64)> {
        self.breakdown
            .iter()
            .map(|c| {
                let share = if self.total_cost > 0.0 {
                    c.total_cost / self.total_cost * 100.0
                } else {
                    0.0
                };
                (c.category.as_str(), share)
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ProviderBreakdown {
    Failed { error: String },
    Ready(ServicesBreakdown),
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct BreakdownReport {
    #[serde(default)]
    pub providers: BTreeMap<String, ProviderBreakdown>,
    #[serde(default)]
    pub total_cost: f64,
    #[serde(default)]
    pub total_services: usize,
}

impl BreakdownReport {
    /// Report holding a single provider's breakdown.
    pub fn single(provider: &str, breakdown: ServicesBreakdown) -> Self {
        Self {
            total_cost: breakdown.total_cost,
            total_services: breakdown.total_services,
            providers: BTreeMap::from([(provider.to_string(), ProviderBreakdown::Ready(breakdown))]),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// Categories merged across providers, most expensive first.
    pub fn merged_categories(&self) -> Vec<(String, f64)> {
        let mut totals: BTreeMap<&str, f64> = BTreeMap::new();
        for provider in self.providers.values() {
            if let ProviderBreakdown::Ready(breakdown) = provider {
                for category in &breakdown.breakdown {
                    *totals.entry(category.category.as_str()).or_default() += category.total_cost;
                }
            }
        }

        let mut merged: Vec<(String, f64)> = totals
            .into_iter()
            .map(|(name, cost)| (name.to_string(), cost))
            .collect();
        merged.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        merged
    }
}
