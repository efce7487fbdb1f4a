use yew::prelude::*;

use crate::components::status::Status;
use crate::hooks::use_costs::use_cost_summary;
use crate::models::costs::{CostSummary, ProviderStatus};
use crate::utils::format::currency;

/// Month-to-date spend across every configured provider.
#[function_component(Overview)]
pub fn overview() -> Html {
    let summary = use_cost_summary();

    html! {
        <section class="overview">
            <h2>{"Month to date"}</h2>
            <Status
                loading={summary.loading}
                error={summary.error.clone()}
                empty={summary.data().is_none_or(CostSummary::is_empty)}
                on_retry={summary.refetch.clone()}
                empty_message="No providers configured."
            >
                if let Some(summary) = summary.data() {
                    {summary_cards(summary)}
                    {provider_table(summary)}
                }
            </Status>
        </section>
    }
}

fn summary_cards(summary: &CostSummary) -> Html {
    let top = summary.top_provider().map_or_else(
        || "N/A".to_string(),
        |entry| entry.provider.to_uppercase(),
    );

    html! {
        <div class="summary-grid">
            <div class="summary-item">
                <h3>{"Total spend"}</h3>
                <p class="summary-value">{currency(summary.total_mtd())}</p>
            </div>
            <div class="summary-item">
                <h3>{"Active providers"}</h3>
                <p class="summary-value">{summary.active_count()}</p>
            </div>
            <div class="summary-item">
                <h3>{"Top provider"}</h3>
                <p class="summary-value">{top}</p>
            </div>
            if summary.failed_count() > 0 {
                <div class="summary-item warning">
                    <h3>{"Unavailable"}</h3>
                    <p class="summary-value">{summary.failed_count()}</p>
                </div>
            }
        </div>
    }
}

fn provider_table(summary: &CostSummary) -> Html {
    html! {
        <table class="data-table">
            <thead>
                <tr><th>{"Provider"}</th><th>{"Status"}</th><th class="numeric">{"MTD cost"}</th></tr>
            </thead>
            <tbody>
                { for summary.entries().iter().map(|entry| {
                    let (class, label) = match entry.status {
                        ProviderStatus::Active => ("status-active", "Active"),
                        ProviderStatus::Error => ("status-error", "Error"),
                        ProviderStatus::Unknown => ("status-unknown", "Unknown"),
                    };
                    html! {
                        <tr>
                            <td>{entry.provider.to_uppercase()}</td>
                            <td class={class} title={entry.error.clone()}>{label}</td>
                            <td class="numeric">
                                {entry.mtd_cost.map_or_else(|| "-".to_string(), currency)}
                            </td>
                        </tr>
                    }
                }) }
            </tbody>
        </table>
    }
}
