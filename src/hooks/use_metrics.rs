use yew::prelude::*;

use super::use_api::{require_api, use_api};
use super::use_resource::{ResourceHandle, ResourceOptions, use_resource};
use crate::config::Config;
use crate::models::metrics::{LiveMetrics, MetricKind, Timeseries};

/// Live utilization, re-polled in the background. A failed poll keeps the
/// last reading on screen next to the error.
#[hook]
pub fn use_live_metrics(provider: String) -> ResourceHandle<LiveMetrics> {
    let api = use_api();
    use_resource(
        provider,
        ResourceOptions::polling(Config::METRICS_REFRESH_MS),
        move |provider: String| {
            let api = api.clone();
            async move { require_api(api.as_ref())?.live_metrics(&provider).await }
        },
    )
}

#[hook]
pub fn use_timeseries(provider: String, kind: MetricKind, minutes: u32) -> ResourceHandle<Timeseries> {
    let api = use_api();
    use_resource(
        (provider, kind, minutes),
        ResourceOptions::default(),
        move |(provider, kind, minutes): (String, MetricKind, u32)| {
            let api = api.clone();
            async move {
                require_api(api.as_ref())?
                    .timeseries(&provider, kind, minutes)
                    .await
            }
        },
    )
}
