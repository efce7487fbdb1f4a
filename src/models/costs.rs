use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A configured cloud provider as listed by `GET /providers`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderInfo {
    pub name: String,
    #[serde(default)]
    pub display_name: Option<String>,
}

impl ProviderInfo {
    /// Returns the display name, falling back to the upper-cased identifier.
    pub fn label(&self) -> String {
        self.display_name
            .clone()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| self.name.to_uppercase())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderStatus {
    Active,
    Error,
    #[serde(other)]
    Unknown,
}

/// One row of `GET /costs/summary`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CostSummaryEntry {
    pub provider: String,
    #[serde(default)]
    pub mtd_cost: Option<f64>,
    pub status: ProviderStatus,
    #[serde(default)]
    pub error: Option<String>,
}

/// The summary endpoint must return an array; anything else fails to decode.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(transparent)]
pub struct CostSummary {
    entries: Vec<CostSummaryEntry>,
}

impl CostSummary {
    pub fn new(entries: Vec<CostSummaryEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[CostSummaryEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of month-to-date cost across providers that reported successfully.
    pub fn total_mtd(&self) -> f64 {
        self.active().filter_map(|e| e.mtd_cost).sum()
    }

    pub fn active(&self) -> impl Iterator<Item = &CostSummaryEntry> {
        self.entries
            .iter()
            .filter(|e| e.status == ProviderStatus::Active)
    }

    pub fn active_count(&self) -> usize {
        self.active().count()
    }

    pub fn failed_count(&self) -> usize {
        self.entries.len() - self.active_count()
    }

    /// The provider with the highest month-to-date spend.
    pub fn top_provider(&self) -> Option<&CostSummaryEntry> {
        self.active().max_by(|a, b| {
            a.mtd_cost
                .unwrap_or(0.0)
                .partial_cmp(&b.mtd_cost.unwrap_or(0.0))
                .unwrap_or(std::cmp::Ordering::Equal)
        })
    }
}

/// Month-to-date cost of a single service.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ServiceCost {
    #[serde(default)]
    pub service: String,
    #[serde(default)]
    pub cost: f64,
    #[serde(default)]
    pub project: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(transparent)]
pub struct ServiceCosts {
    items: Vec<ServiceCost>,
}

impl ServiceCosts {
    pub fn new(items: Vec<ServiceCost>) -> Self {
        Self { items }
    }

    pub fn is_empty(&self) -> bool {
        self.services().next().is_none()
    }

    /// Rows that describe a service, most expensive first.
    pub fn sorted(&self) -> Vec<&ServiceCost> {
        let mut rows: Vec<&ServiceCost> = self.services().collect();
        rows.sort_by(|a, b| {
            b.cost
                .partial_cmp(&a.cost)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        rows
    }

    pub fn total(&self) -> f64 {
        self.services().map(|s| s.cost).sum()
    }

    fn services(&self) -> impl Iterator<Item = &ServiceCost> {
        self.items.iter().filter(|s| s.error.is_none())
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DailyCost {
    pub date: NaiveDate,
    pub cost: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(transparent)]
pub struct DailyCosts {
    days: Vec<DailyCost>,
}

impl DailyCosts {
    pub fn new(days: Vec<DailyCost>) -> Self {
        Self { days }
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn total(&self) -> f64 {
        self.days.iter().map(|d| d.cost).sum()
    }

    pub fn average(&self) -> Option<f64> {
        if self.days.is_empty() {
            None
        } else {
            Some(self.total() / self.days.len() as f64)
        }
    }

    pub fn peak(&self) -> Option<&DailyCost> {
        self.days.iter().max_by(|a, b| {
            a.cost
                .partial_cmp(&b.cost)
                .unwrap_or(std::cmp::Ordering::Equal)
        })
    }

    /// Chart series ordered by date: (labels, values).
    pub fn series_data(&self) -> (Vec<String>, Vec<f64>) {
        let mut sorted = self.days.clone();
        sorted.sort_by_key(|d| d.date);

        let x_data = sorted
            .iter()
            .map(|d| d.date.format("%m-%d").to_string())
            .collect();
        let y_data = sorted.iter().map(|d| d.cost).collect();

        (x_data, y_data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(provider: &str, cost: Option<f64>, status: ProviderStatus) -> CostSummaryEntry {
        CostSummaryEntry {
            provider: provider.to_string(),
            mtd_cost: cost,
            status,
            error: None,
        }
    }

    #[test]
    fn summary_totals_skip_failed_providers() {
        let summary = CostSummary::new(vec![
            entry("aws", Some(1200.5), ProviderStatus::Active),
            entry("azure", None, ProviderStatus::Error),
            entry("gcp", Some(300.25), ProviderStatus::Active),
        ]);

        assert!((summary.total_mtd() - 1500.75).abs() < 1e-9);
        assert_eq!(summary.active_count(), 2);
        assert_eq!(summary.failed_count(), 1);
        assert_eq!(summary.top_provider().unwrap().provider, "aws");
    }

    #[test]
    fn summary_rejects_object_payload() {
        let result: Result<CostSummary, _> =
            serde_json::from_str(r#"{"error": "boom"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn unknown_status_is_tolerated() {
        let summary: CostSummary = serde_json::from_str(
            r#"[{"provider": "oci", "status": "pending"}]"#,
        )
        .unwrap();
        assert_eq!(summary.entries()[0].status, ProviderStatus::Unknown);
        assert_eq!(summary.active_count(), 0);
    }

    #[test]
    fn error_rows_are_not_services() {
        let costs: ServiceCosts = serde_json::from_str(
            r#"[{"service": "EC2", "cost": 12.0}, {"error": "Throttled"}]"#,
        )
        .unwrap();
        assert!(!costs.is_empty());
        assert_eq!(costs.sorted().len(), 1);
        assert_eq!(costs.total(), 12.0);
    }

    #[test]
    fn daily_series_is_sorted_by_date() {
        let days: DailyCosts = serde_json::from_str(
            r#"[{"date": "2025-10-02", "cost": 20.0}, {"date": "2025-10-01", "cost": 10.0}]"#,
        )
        .unwrap();

        let (labels, values) = days.series_data();
        assert_eq!(labels, vec!["10-01", "10-02"]);
        assert_eq!(values, vec![10.0, 20.0]);
        assert_eq!(days.average(), Some(15.0));
        assert_eq!(days.peak().unwrap().cost, 20.0);
    }

    #[test]
    fn provider_label_falls_back_to_name() {
        let p = ProviderInfo {
            name: "aws".to_string(),
            display_name: None,
        };
        assert_eq!(p.label(), "AWS");
    }
}
