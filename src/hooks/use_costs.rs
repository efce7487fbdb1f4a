use yew::prelude::*;

use super::use_api::{require_api, use_api};
use super::use_resource::{ResourceHandle, ResourceOptions, use_resource};
use crate::models::costs::{CostSummary, DailyCosts, ProviderInfo, ServiceCosts};

#[hook]
pub fn use_providers() -> ResourceHandle<Vec<ProviderInfo>> {
    let api = use_api();
    use_resource((), ResourceOptions::default(), move |()| {
        let api = api.clone();
        async move { require_api(api.as_ref())?.providers().await }
    })
}

#[hook]
pub fn use_cost_summary() -> ResourceHandle<CostSummary> {
    let api = use_api();
    use_resource((), ResourceOptions::default(), move |()| {
        let api = api.clone();
        async move { require_api(api.as_ref())?.cost_summary().await }
    })
}

/// Month-to-date cost per service for one provider
#[hook]
pub fn use_mtd_costs(provider: String) -> ResourceHandle<ServiceCosts> {
    let api = use_api();
    use_resource(provider, ResourceOptions::default(), move |provider: String| {
        let api = api.clone();
        async move { require_api(api.as_ref())?.mtd_costs(&provider).await }
    })
}

#[hook]
pub fn use_daily_costs(provider: String, days: u32) -> ResourceHandle<DailyCosts> {
    let api = use_api();
    use_resource(
        (provider, days),
        ResourceOptions::default(),
        move |(provider, days): (String, u32)| {
            let api = api.clone();
            async move { require_api(api.as_ref())?.daily_costs(&provider, days).await }
        },
    )
}
