use std::rc::Rc;
use yew::prelude::*;

use crate::components::chart::{Chart, Series};
use crate::components::insights::ScopeProps;
use crate::components::status::Status;
use crate::config::Config;
use crate::hooks::Scope;
use crate::hooks::use_budgets::{use_budgets, use_forecast, use_services_breakdown};
use crate::models::breakdown::BreakdownReport;
use crate::models::budgets::{Budget, BudgetsReport, ForecastReport, ProviderForecast};
use crate::utils::format::{currency, percent};

/// Budgets tab: spend against budget, end-of-month forecast, and where the
/// money goes.
#[function_component(BudgetsTab)]
pub fn budgets_tab() -> Html {
    html! {
        <div class="budgets-tab">
            <BudgetsPanel />
            <div class="panel-row">
                <ForecastPanel />
                <BreakdownPanel />
            </div>
        </div>
    }
}

#[function_component(BudgetsPanel)]
pub fn budgets_panel(props: &ScopeProps) -> Html {
    let budgets = use_budgets(props.scope.clone());

    html! {
        <section class="panel">
            <h2>{"Budgets"}</h2>
            <Status
                loading={budgets.loading}
                error={budgets.error.clone()}
                empty={budgets.data().is_none_or(BudgetsReport::is_empty)}
                on_retry={budgets.refetch.clone()}
                empty_message="No budgets configured."
            >
                if let Some(report) = budgets.data() {
                    <div class="summary-grid">
                        <div class="summary-item">
                            <h3>{"Budget"}</h3>
                            <p class="summary-value">{currency(report.total_budget)}</p>
                        </div>
                        <div class="summary-item">
                            <h3>{"Spent"}</h3>
                            <p class="summary-value">{currency(report.total_spent)}</p>
                        </div>
                        <div class="summary-item">
                            <h3>{"Utilization"}</h3>
                            <p class="summary-value">{percent(report.overall_utilization)}</p>
                        </div>
                        <div class="summary-item">
                            <h3>{"At risk"}</h3>
                            <p class="summary-value">{report.at_risk_count}</p>
                        </div>
                    </div>
                    <div class="budget-list">
                        { for report.budgets.iter().map(budget_row) }
                    </div>
                }
            </Status>
        </section>
    }
}

fn budget_row(budget: &Budget) -> Html {
    let utilization = budget.utilization();
    let width = format!("width: {:.0}%", utilization.clamp(0.0, 100.0));

    html! {
        <div class={classes!("budget-row", budget.status.css_class())}>
            <div class="budget-label">
                <strong>{&budget.name}</strong>
                if let Some(provider) = &budget.provider {
                    <span class="budget-provider">{provider.to_uppercase()}</span>
                }
                <span class="budget-status">{budget.status.label()}</span>
            </div>
            <div class="progress">
                <div class="progress-bar" style={width}></div>
            </div>
            <div class="budget-figures">
                {format!(
                    "{} of {} ({}), {} left",
                    currency(budget.spent_amount),
                    currency(budget.budget_amount),
                    percent(utilization),
                    currency(budget.remaining()),
                )}
                if let Some(projected) = budget.projected_eom {
                    {format!(", projected {}", currency(projected))}
                }
            </div>
        </div>
    }
}

#[function_component(ForecastPanel)]
pub fn forecast_panel(props: &ScopeProps) -> Html {
    let forecast = use_forecast(props.scope.clone(), Config::DEFAULT_FORECAST_DAYS);

    html! {
        <section class="panel">
            <h2>{format!("{}-day forecast", Config::DEFAULT_FORECAST_DAYS)}</h2>
            <Status
                loading={forecast.loading}
                error={forecast.error.clone()}
                empty={forecast.data().is_none_or(ForecastReport::is_empty)}
                on_retry={forecast.refetch.clone()}
            >
                if let Some(report) = forecast.data() {
                    <div class="summary-grid">
                        <div class="summary-item">
                            <h3>{"Current MTD"}</h3>
                            <p class="summary-value">{currency(report.total_current_mtd)}</p>
                        </div>
                        <div class="summary-item">
                            <h3>{"Projected EOM"}</h3>
                            <p class="summary-value">{currency(report.total_projected_eom)}</p>
                        </div>
                        <div class="summary-item">
                            <h3>{"Remaining growth"}</h3>
                            <p class="summary-value">{currency(report.projected_increase())}</p>
                        </div>
                    </div>
                    <table class="data-table">
                        <thead>
                            <tr>
                                <th>{"Provider"}</th>
                                <th class="numeric">{"Daily avg"}</th>
                                <th class="numeric">{"Projected"}</th>
                                <th>{"Trend"}</th>
                                <th class="numeric">{"Confidence"}</th>
                            </tr>
                        </thead>
                        <tbody>
                            { for report.providers.iter().map(|(name, slot)| match slot {
                                ProviderForecast::Ready(f) => html! {
                                    <tr>
                                        <td>{name.to_uppercase()}</td>
                                        <td class="numeric">{currency(f.daily_average)}</td>
                                        <td class="numeric">{currency(f.projected_eom)}</td>
                                        <td>{f.trend.icon()}</td>
                                        <td class="numeric">{percent(f.confidence * 100.0)}</td>
                                    </tr>
                                },
                                ProviderForecast::Failed { error } => html! {
                                    <tr class="row-error">
                                        <td>{name.to_uppercase()}</td>
                                        <td colspan="4">{error}</td>
                                    </tr>
                                },
                            }) }
                        </tbody>
                    </table>
                }
            </Status>
        </section>
    }
}

#[function_component(BreakdownPanel)]
pub fn breakdown_panel(props: &ScopeProps) -> Html {
    let breakdown = use_services_breakdown(props.scope.clone());
    let series: Rc<Series> = use_memo(breakdown.data.clone(), |data| {
        data.as_deref()
            .map(|report| report.merged_categories().into_iter().unzip())
            .unwrap_or_default()
    });

    let chart_id = match &props.scope {
        Scope::All => "category-breakdown".to_string(),
        Scope::Provider(provider) => format!("category-breakdown-{provider}"),
    };

    html! {
        <section class="panel">
            <h2>{"Spend by category"}</h2>
            <Status
                loading={breakdown.loading}
                error={breakdown.error.clone()}
                empty={breakdown.data().is_none_or(BreakdownReport::is_empty)}
                on_retry={breakdown.refetch.clone()}
            >
                if let Some(report) = breakdown.data() {
                    <p class="panel-note">
                        {format!("{} across {} services", currency(report.total_cost), report.total_services)}
                    </p>
                    <Chart
                        id={chart_id}
                        title="By category"
                        series={Rc::clone(&series)}
                        unit="USD"
                    />
                }
            </Status>
        </section>
    }
}
