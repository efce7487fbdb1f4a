use serde::Deserialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical,
    High,
    Warning,
    Medium,
    Low,
    #[default]
    #[serde(other)]
    Unknown,
}

impl Severity {
    /// Returns CSS class name for color coding
    pub const fn css_class(&self) -> &'static str {
        match self {
            Self::Critical => "severity-critical",
            Self::High => "severity-high",
            Self::Warning => "severity-warning",
            Self::Medium => "severity-medium",
            Self::Low => "severity-low",
            Self::Unknown => "severity-unknown",
        }
    }

    /// Key used by the backend in `severity_counts`.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Critical => "critical",
            Self::High => "high",
            Self::Warning => "warning",
            Self::Medium => "medium",
            Self::Low => "low",
            Self::Unknown => "unknown",
        }
    }

    pub const fn label(&self) -> &'static str {
        match self {
            Self::Critical => "Critical",
            Self::High => "High",
            Self::Warning => "Warning",
            Self::Medium => "Medium",
            Self::Low => "Low",
            Self::Unknown => "Unknown",
        }
    }
}

/// A detected cost anomaly, tagged with its provider by the aggregate endpoint.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Anomaly {
    #[serde(default)]
    pub provider: Option<String>,
    #[serde(default)]
    pub service: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub expected_cost: f64,
    #[serde(default)]
    pub actual_cost: f64,
    #[serde(default)]
    pub deviation_percent: f64,
    #[serde(default)]
    pub severity: Severity,
    #[serde(default)]
    pub detected_at: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub recommendation: Option<String>,
}

impl Anomaly {
    pub fn excess_cost(&self) -> f64 {
        self.actual_cost - self.expected_cost
    }
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(transparent)]
pub struct Anomalies {
    items: Vec<Anomaly>,
}

impl Anomalies {
    pub fn new(items: Vec<Anomaly>) -> Self {
        Self { items }
    }

    pub fn items(&self) -> &[Anomaly] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn total_excess(&self) -> f64 {
        self.items.iter().map(Anomaly::excess_cost).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Alert {
    #[serde(default)]
    pub provider: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub severity: Severity,
    #[serde(default)]
    pub acknowledged: bool,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct AlertsReport {
    #[serde(default)]
    pub alerts: Vec<Alert>,
    #[serde(default)]
    pub total_count: usize,
    #[serde(default)]
    pub unacknowledged_count: usize,
    #[serde(default)]
    pub severity_counts: BTreeMap<String, usize>,
}

impl AlertsReport {
    pub fn is_empty(&self) -> bool {
        self.alerts.is_empty()
    }

    pub fn count_for(&self, severity: &str) -> usize {
        self.severity_counts.get(severity).copied().unwrap_or(0)
    }

    /// Unacknowledged alerts, most severe first.
    pub fn open_alerts(&self) -> Vec<&Alert> {
        let mut open: Vec<&Alert> = self.alerts.iter().filter(|a| !a.acknowledged).collect();
        open.sort_by_key(|a| a.severity);
        open
    }
}

/// Provider list endpoints for alerts return bare arrays.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(transparent)]
pub struct Alerts {
    pub items: Vec<Alert>,
}

impl From<Alerts> for AlertsReport {
    fn from(alerts: Alerts) -> Self {
        let mut severity_counts = BTreeMap::new();
        for alert in &alerts.items {
            *severity_counts
                .entry(alert.severity.as_str().to_string())
                .or_default() += 1;
        }
        Self {
            total_count: alerts.items.len(),
            unacknowledged_count: alerts.items.iter().filter(|a| !a.acknowledged).count(),
            severity_counts,
            alerts: alerts.items,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Effort {
    Low,
    Medium,
    High,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Recommendation {
    #[serde(default)]
    pub provider: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub potential_savings_monthly: f64,
    #[serde(default)]
    pub potential_savings_yearly: f64,
    #[serde(default)]
    pub effort: Option<Effort>,
    #[serde(default)]
    pub impact: Option<Effort>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(transparent)]
pub struct Recommendations {
    pub items: Vec<Recommendation>,
}

impl From<Recommendations> for RecommendationsReport {
    fn from(list: Recommendations) -> Self {
        Self {
            total_potential_savings_monthly: list
                .items
                .iter()
                .map(|r| r.potential_savings_monthly)
                .sum(),
            total_potential_savings_yearly: list
                .items
                .iter()
                .map(|r| r.potential_savings_yearly)
                .sum(),
            recommendation_count: list.items.len(),
            recommendations: list.items,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct RecommendationsReport {
    #[serde(default)]
    pub recommendations: Vec<Recommendation>,
    #[serde(default)]
    pub total_potential_savings_monthly: f64,
    #[serde(default)]
    pub total_potential_savings_yearly: f64,
    #[serde(default)]
    pub recommendation_count: usize,
}

impl RecommendationsReport {
    pub fn is_empty(&self) -> bool {
        self.recommendations.is_empty()
    }

    /// Low-effort items ordered by monthly savings.
    pub fn quick_wins(&self) -> Vec<&Recommendation> {
        let mut wins: Vec<&Recommendation> = self
            .recommendations
            .iter()
            .filter(|r| r.effort == Some(Effort::Low))
            .collect();
        wins.sort_by(|a, b| {
            b.potential_savings_monthly
                .partial_cmp(&a.potential_savings_monthly)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        wins
    }
}
