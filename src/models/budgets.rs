use serde::Deserialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BudgetKind {
    Overall,
    Category,
    #[default]
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BudgetStatus {
    OnTrack,
    AtRisk,
    #[default]
    #[serde(other)]
    Unknown,
}

impl BudgetStatus {
    pub const fn label(&self) -> &'static str {
        match self {
            Self::OnTrack => "On track",
            Self::AtRisk => "At risk",
            Self::Unknown => "Unknown",
        }
    }

    pub const fn css_class(&self) -> &'static str {
        match self {
            Self::OnTrack => "budget-on-track",
            Self::AtRisk => "budget-at-risk",
            Self::Unknown => "budget-unknown",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Budget {
    #[serde(default)]
    pub provider: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default, rename = "type")]
    pub kind: BudgetKind,
    #[serde(default)]
    pub budget_amount: f64,
    #[serde(default)]
    pub spent_amount: f64,
    #[serde(default)]
    pub remaining_amount: Option<f64>,
    #[serde(default)]
    pub utilization_percent: Option<f64>,
    #[serde(default)]
    pub projected_eom: Option<f64>,
    #[serde(default)]
    pub projected_utilization: Option<f64>,
    #[serde(default)]
    pub period: Option<String>,
    #[serde(default)]
    pub status: BudgetStatus,
}

impl Budget {
    /// Spent share of the budget in percent, computed when the backend omits it.
    pub fn utilization(&self) -> f64 {
        self.utilization_percent.unwrap_or_else(|| {
            if self.budget_amount > 0.0 {
                self.spent_amount / self.budget_amount * 100.0
            } else {
                0.0
            }
        })
    }

    pub fn remaining(&self) -> f64 {
        self.remaining_amount
            .unwrap_or(self.budget_amount - self.spent_amount)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(transparent)]
pub struct Budgets {
    pub items: Vec<Budget>,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct BudgetsReport {
    #[serde(default)]
    pub budgets: Vec<Budget>,
    #[serde(default)]
    pub total_budget: f64,
    #[serde(default)]
    pub total_spent: f64,
    #[serde(default)]
    pub total_remaining: f64,
    #[serde(default)]
    pub overall_utilization: f64,
    #[serde(default)]
    pub at_risk_count: usize,
}

impl From<Budgets> for BudgetsReport {
    fn from(list: Budgets) -> Self {
        let overall: Vec<&Budget> = list
            .items
            .iter()
            .filter(|b| b.kind == BudgetKind::Overall)
            .collect();
        let total_budget: f64 = overall.iter().map(|b| b.budget_amount).sum();
        let total_spent: f64 = overall.iter().map(|b| b.spent_amount).sum();
        Self {
            total_budget,
            total_spent,
            total_remaining: total_budget - total_spent,
            overall_utilization: if total_budget > 0.0 {
                total_spent / total_budget * 100.0
            } else {
                0.0
            },
            at_risk_count: list
                .items
                .iter()
                .filter(|b| b.status == BudgetStatus::AtRisk)
                .count(),
            budgets: list.items,
        }
    }
}

impl BudgetsReport {
    pub fn is_empty(&self) -> bool {
        self.budgets.is_empty()
    }

    pub fn overall(&self) -> impl Iterator<Item = &Budget> {
        self.budgets.iter().filter(|b| b.kind == BudgetKind::Overall)
    }

    pub fn at_risk(&self) -> impl Iterator<Item = &Budget> {
        self.budgets
            .iter()
            .filter(|b| b.status == BudgetStatus::AtRisk)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Increasing,
    #[default]
    Stable,
    Decreasing,
    #[serde(other)]
    Unknown,
}

impl Trend {
    pub const fn icon(&self) -> &'static str {
        match self {
            Self::Increasing => "↑",
            Self::Decreasing => "↓",
            Self::Stable | Self::Unknown => "→",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ForecastPoint {
    pub date: String,
    #[serde(default)]
    pub cost: f64,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub cost_low: Option<f64>,
    #[serde(default)]
    pub cost_high: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct Forecast {
    #[serde(default)]
    pub forecast_data: Vec<ForecastPoint>,
    #[serde(default)]
    pub current_mtd: f64,
    #[serde(default)]
    pub projected_eom: f64,
    #[serde(default)]
    pub daily_average: f64,
    #[serde(default)]
    pub trend: Trend,
    #[serde(default)]
    pub confidence: f64,
}

/// Per-provider slot of the aggregate forecast; a failing provider carries
/// only its error message.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ProviderForecast {
    Failed { error: String },
    Ready(Forecast),
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct ForecastReport {
    #[serde(default)]
    pub providers: BTreeMap<String, ProviderForecast>,
    #[serde(default)]
    pub total_current_mtd: f64,
    #[serde(default)]
    pub total_projected_eom: f64,
}

impl ForecastReport {
    /// Report holding a single provider's forecast.
    pub fn single(provider: &str, forecast: Forecast) -> Self {
        Self {
            total_current_mtd: forecast.current_mtd,
            total_projected_eom: forecast.projected_eom,
            providers: BTreeMap::from([(provider.to_string(), ProviderForecast::Ready(forecast))]),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    pub fn ready(&self) -> impl Iterator<Item = (&String, &Forecast)> {
        self.providers.iter().filter_map(|(name, f)| match f {
            ProviderForecast::Ready(forecast) => Some((name, forecast)),
            ProviderForecast::Failed { .. } => None,
        })
    }

    /// Projected growth from the current month-to-date total to end of month.
    pub fn projected_increase(&self) -> f64 {
        self.total_projected_eom - self.total_current_mtd
    }
}
