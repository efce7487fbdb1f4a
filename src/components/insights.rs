use yew::prelude::*;

use crate::components::status::Status;
use crate::hooks::Scope;
use crate::hooks::use_insights::{use_alerts, use_anomalies, use_recommendations};
use crate::models::insights::{Alert, AlertsReport, Anomalies, RecommendationsReport, Severity};
use crate::utils::format::currency;

#[derive(Properties, PartialEq)]
pub struct ScopeProps {
    #[prop_or_default]
    pub scope: Scope,
}

/// Insights tab: every provider's anomalies, alerts and savings.
#[function_component(Insights)]
pub fn insights() -> Html {
    html! {
        <div class="insights-tab">
            <div class="panel-row">
                <AnomaliesPanel />
                <AlertsPanel />
            </div>
            <RecommendationsPanel />
        </div>
    }
}

fn severity_badge(severity: Severity) -> Html {
    html! {
        <span class={classes!("badge", severity.css_class())}>{severity.label()}</span>
    }
}

fn provider_cell(provider: Option<&String>) -> Html {
    provider.map_or_else(Html::default, |p| html! { <td>{p.to_uppercase()}</td> })
}

#[function_component(AnomaliesPanel)]
pub fn anomalies_panel(props: &ScopeProps) -> Html {
    let anomalies = use_anomalies(props.scope.clone());

    html! {
        <section class="panel">
            <div class="panel-header">
                <h2>{"Anomalies"}</h2>
                <button class="refresh-button" onclick={anomalies.refetch.reform(|_: MouseEvent| ())}>
                    {"Refresh"}
                </button>
            </div>
            <Status
                loading={anomalies.loading}
                error={anomalies.error.clone()}
                empty={anomalies.data().is_none_or(Anomalies::is_empty)}
                on_retry={anomalies.refetch.clone()}
                empty_message="No anomalies detected."
            >
                if let Some(list) = anomalies.data() {
                    <p class="panel-note">{format!("Excess spend: {}", currency(list.total_excess()))}</p>
                    <table class="data-table">
                        <thead>
                            <tr>
                                if props.scope == Scope::All { <th>{"Provider"}</th> }
                                <th>{"Service"}</th>
                                <th class="numeric">{"Expected"}</th>
                                <th class="numeric">{"Actual"}</th>
                                <th class="numeric">{"Deviation"}</th>
                                <th>{"Severity"}</th>
                            </tr>
                        </thead>
                        <tbody>
                            { for list.items().iter().map(|a| html! {
                                <tr title={a.description.clone()}>
                                    if props.scope == Scope::All { {provider_cell(a.provider.as_ref())} }
                                    <td>{&a.service}</td>
                                    <td class="numeric">{currency(a.expected_cost)}</td>
                                    <td class="numeric">{currency(a.actual_cost)}</td>
                                    <td class="numeric">{format!("{:+.1}%", a.deviation_percent)}</td>
                                    <td>{severity_badge(a.severity)}</td>
                                </tr>
                            }) }
                        </tbody>
                    </table>
                }
            </Status>
        </section>
    }
}

#[function_component(AlertsPanel)]
pub fn alerts_panel(props: &ScopeProps) -> Html {
    let alerts = use_alerts(props.scope.clone());

    html! {
        <section class="panel">
            <div class="panel-header">
                <h2>{"Alerts"}</h2>
                <button class="refresh-button" onclick={alerts.refetch.reform(|_: MouseEvent| ())}>
                    {"Refresh"}
                </button>
            </div>
            <Status
                loading={alerts.loading}
                error={alerts.error.clone()}
                empty={alerts.data().is_none_or(AlertsReport::is_empty)}
                on_retry={alerts.refetch.clone()}
                empty_message="No alerts."
            >
                if let Some(report) = alerts.data() {
                    <p class="panel-note">
                        {format!(
                            "{} open of {} ({} critical)",
                            report.unacknowledged_count,
                            report.total_count,
                            report.count_for(Severity::Critical.as_str()),
                        )}
                    </p>
                    <ul class="alert-list">
                        { for report.open_alerts().into_iter().map(alert_item) }
                    </ul>
                }
            </Status>
        </section>
    }
}

fn alert_item(alert: &Alert) -> Html {
    html! {
        <li class={classes!("alert-item", alert.severity.css_class())}>
            {severity_badge(alert.severity)}
            <strong>{&alert.title}</strong>
            if let Some(provider) = &alert.provider {
                <span class="alert-provider">{provider.to_uppercase()}</span>
            }
            <p>{&alert.message}</p>
        </li>
    }
}

#[function_component(RecommendationsPanel)]
pub fn recommendations_panel(props: &ScopeProps) -> Html {
    let recommendations = use_recommendations(props.scope.clone());

    html! {
        <section class="panel">
            <h2>{"Recommendations"}</h2>
            <Status
                loading={recommendations.loading}
                error={recommendations.error.clone()}
                empty={recommendations.data().is_none_or(RecommendationsReport::is_empty)}
                on_retry={recommendations.refetch.clone()}
                empty_message="No recommendations right now."
            >
                if let Some(report) = recommendations.data() {
                    <div class="summary-grid">
                        <div class="summary-item">
                            <h3>{"Monthly savings"}</h3>
                            <p class="summary-value">{currency(report.total_potential_savings_monthly)}</p>
                        </div>
                        <div class="summary-item">
                            <h3>{"Yearly savings"}</h3>
                            <p class="summary-value">{currency(report.total_potential_savings_yearly)}</p>
                        </div>
                        <div class="summary-item">
                            <h3>{"Quick wins"}</h3>
                            <p class="summary-value">{report.quick_wins().len()}</p>
                        </div>
                    </div>
                    <ul class="recommendation-list">
                        { for report.recommendations.iter().map(|r| html! {
                            <li class="recommendation-item">
                                <strong>{&r.title}</strong>
                                <span class="savings">{format!("{}/mo", currency(r.potential_savings_monthly))}</span>
                                if let Some(description) = &r.description {
                                    <p>{description}</p>
                                }
                            </li>
                        }) }
                    </ul>
                }
            </Status>
        </section>
    }
}
