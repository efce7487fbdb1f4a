use std::rc::Rc;
use web_sys::HtmlSelectElement;
use yew::prelude::*;

use crate::components::budgets::{BreakdownPanel, BudgetsPanel, ForecastPanel};
use crate::components::chart::{Chart, ChartKind};
use crate::components::insights::{AlertsPanel, AnomaliesPanel, RecommendationsPanel};
use crate::components::status::Status;
use crate::config::Config;
use crate::hooks::Scope;
use crate::hooks::use_costs::{use_daily_costs, use_mtd_costs};
use crate::hooks::use_metrics::{use_live_metrics, use_timeseries};
use crate::models::costs::{DailyCosts, ServiceCosts};
use crate::models::metrics::{LiveMetrics, MetricKind, Timeseries};
use crate::utils::format::{currency, percent};

const DAY_RANGES: [u32; 3] = [7, 30, 90];

#[derive(Properties, PartialEq)]
pub struct ProviderTabProps {
    pub provider: AttrValue,
}

#[function_component(ProviderTab)]
pub fn provider_tab(props: &ProviderTabProps) -> Html {
    let scope = Scope::Provider(props.provider.to_string());

    html! {
        <div class="provider-tab">
            <div class="panel-row">
                <MtdCosts provider={props.provider.clone()} />
                <LiveMetricsPanel provider={props.provider.clone()} />
            </div>
            <DailyCostsPanel provider={props.provider.clone()} />
            <MetricsHistory provider={props.provider.clone()} />
            <div class="panel-row">
                <AnomaliesPanel scope={scope.clone()} />
                <AlertsPanel scope={scope.clone()} />
            </div>
            <RecommendationsPanel scope={scope.clone()} />
            <div class="panel-row">
                <BudgetsPanel scope={scope.clone()} />
                <ForecastPanel scope={scope.clone()} />
            </div>
            <BreakdownPanel {scope} />
        </div>
    }
}

#[function_component(MtdCosts)]
fn mtd_costs(props: &ProviderTabProps) -> Html {
    let costs = use_mtd_costs(props.provider.to_string());

    html! {
        <section class="panel">
            <h2>{"Cost by service"}</h2>
            <Status
                loading={costs.loading}
                error={costs.error.clone()}
                empty={costs.data().is_none_or(ServiceCosts::is_empty)}
                on_retry={costs.refetch.clone()}
                empty_message="No spend recorded this month."
            >
                if let Some(costs) = costs.data() {
                    <table class="data-table">
                        <thead>
                            <tr><th>{"Service"}</th><th>{"Category"}</th><th class="numeric">{"Cost"}</th></tr>
                        </thead>
                        <tbody>
                            { for costs.sorted().into_iter().map(|item| html! {
                                <tr>
                                    <td>{&item.service}</td>
                                    <td>{item.category.clone().unwrap_or_default()}</td>
                                    <td class="numeric">{currency(item.cost)}</td>
                                </tr>
                            }) }
                        </tbody>
                        <tfoot>
                            <tr><td colspan="2">{"Total"}</td><td class="numeric">{currency(costs.total())}</td></tr>
                        </tfoot>
                    </table>
                }
            </Status>
        </section>
    }
}

#[function_component(DailyCostsPanel)]
fn daily_costs_panel(props: &ProviderTabProps) -> Html {
    let days = use_state(|| Config::DEFAULT_DAILY_DAYS);
    let costs = use_daily_costs(props.provider.to_string(), *days);
    let series = use_memo(costs.data.clone(), |data| {
        data.as_deref().map(DailyCosts::series_data).unwrap_or_default()
    });

    let on_change = {
        let days = days.clone();
        Callback::from(move |e: Event| {
            let target: HtmlSelectElement = e.target_unchecked_into();
            if let Ok(value) = target.value().parse::<u32>() {
                days.set(value);
            }
        })
    };

    html! {
        <section class="panel">
            <div class="panel-header">
                <h2>{"Daily cost"}</h2>
                <select class="range-selector" onchange={on_change} aria-label="Select range">
                    { for DAY_RANGES.iter().map(|d| html! {
                        <option value={d.to_string()} selected={*d == *days}>{format!("Last {d} days")}</option>
                    }) }
                </select>
            </div>
            <Status
                loading={costs.loading}
                error={costs.error.clone()}
                empty={costs.data().is_none_or(DailyCosts::is_empty)}
                on_retry={costs.refetch.clone()}
            >
                if let Some(daily) = costs.data() {
                    <div class="summary-grid">
                        <div class="summary-item">
                            <h3>{"Total"}</h3>
                            <p class="summary-value">{currency(daily.total())}</p>
                        </div>
                        <div class="summary-item">
                            <h3>{"Daily average"}</h3>
                            <p class="summary-value">{daily.average().map_or_else(|| "N/A".to_string(), currency)}</p>
                        </div>
                        <div class="summary-item">
                            <h3>{"Peak day"}</h3>
                            <p class="summary-value">
                                {daily.peak().map_or_else(
                                    || "N/A".to_string(),
                                    |p| format!("{} ({})", currency(p.cost), p.date.format("%b %d")),
                                )}
                            </p>
                        </div>
                    </div>
                    <Chart
                        id={format!("daily-cost-{}", props.provider)}
                        title="Daily cost"
                        series={Rc::clone(&series)}
                        unit="USD"
                    />
                }
            </Status>
        </section>
    }
}

#[function_component(LiveMetricsPanel)]
fn live_metrics_panel(props: &ProviderTabProps) -> Html {
    let metrics = use_live_metrics(props.provider.to_string());

    html! {
        <section class="panel">
            <h2>{"Live metrics"}</h2>
            <Status
                loading={metrics.loading}
                error={metrics.error.clone()}
                empty={metrics.data().is_none()}
                on_retry={metrics.refetch.clone()}
            >
                if let Some(live) = metrics.data() {
                    {live_metrics_grid(live)}
                }
            </Status>
        </section>
    }
}

fn live_metrics_grid(live: &LiveMetrics) -> Html {
    let optional = |value: Option<f64>, fmt: fn(f64) -> String| {
        value.map_or_else(|| "N/A".to_string(), fmt)
    };
    let mbps = |v: f64| format!("{v:.2} Mbps");

    html! {
        <>
            if let Some(error) = &live.error {
                <p class="inline-error">{error}</p>
            }
            <div class="summary-grid">
                <div class="summary-item">
                    <h3>{"CPU"}</h3>
                    <p class="summary-value">{percent(live.cpu_percent)}</p>
                </div>
                <div class="summary-item">
                    <h3>{"Memory"}</h3>
                    <p class="summary-value">{optional(live.memory_percent, percent)}</p>
                </div>
                <div class="summary-item">
                    <h3>{"Network in"}</h3>
                    <p class="summary-value">{optional(live.network_in_mbps, mbps)}</p>
                </div>
                <div class="summary-item">
                    <h3>{"Network out"}</h3>
                    <p class="summary-value">{optional(live.network_out_mbps, mbps)}</p>
                </div>
                <div class="summary-item">
                    <h3>{"Instances"}</h3>
                    <p class="summary-value">{live.instances_monitored}</p>
                </div>
            </div>
            if let Some(updated) = live.updated_at {
                <p class="updated-at">{format!("Updated {}", updated.format("%H:%M:%S UTC"))}</p>
            }
        </>
    }
}

#[function_component(MetricsHistory)]
fn metrics_history(props: &ProviderTabProps) -> Html {
    let kind = use_state(MetricKind::default);
    let series = use_timeseries(props.provider.to_string(), *kind, Config::TIMESERIES_MINUTES);
    let chart_data = use_memo(series.data.clone(), |data| {
        data.as_deref().map(Timeseries::series_data).unwrap_or_default()
    });

    let switch = |target: MetricKind| {
        let kind = kind.clone();
        Callback::from(move |_: MouseEvent| kind.set(target))
    };

    html! {
        <section class="panel">
            <div class="panel-header">
                <h2>{format!("{} (last {} minutes)", kind.label(), Config::TIMESERIES_MINUTES)}</h2>
                <div class="toggle-group">
                    { for [MetricKind::Cpu, MetricKind::Memory].into_iter().map(|k| html! {
                        <button
                            class={classes!("toggle", (k == *kind).then_some("active"))}
                            onclick={switch(k)}
                        >
                            {k.label()}
                        </button>
                    }) }
                </div>
            </div>
            <Status
                loading={series.loading}
                error={series.error.clone()}
                empty={series.data().is_none_or(Timeseries::is_empty)}
                on_retry={series.refetch.clone()}
            >
                <Chart
                    id={format!("metrics-{}", props.provider)}
                    title={kind.label()}
                    series={Rc::clone(&chart_data)}
                    kind={ChartKind::Line}
                    unit="%"
                />
            </Status>
        </section>
    }
}
