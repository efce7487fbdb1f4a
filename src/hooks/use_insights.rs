use yew::prelude::*;

use super::use_api::{Scope, require_api, use_api};
use super::use_resource::{ResourceHandle, ResourceOptions, use_resource};
use crate::models::insights::{Anomalies, AlertsReport, RecommendationsReport};

#[hook]
pub fn use_anomalies(scope: Scope) -> ResourceHandle<Anomalies> {
    let api = use_api();
    use_resource(scope, ResourceOptions::default(), move |scope: Scope| {
        let api = api.clone();
        async move {
            let api = require_api(api.as_ref())?;
            match scope {
                Scope::All => api.all_anomalies().await,
                Scope::Provider(provider) => api.anomalies(&provider).await,
            }
        }
    })
}

/// Alerts with counts; a single provider's list is summarized client-side.
#[hook]
pub fn use_alerts(scope: Scope) -> ResourceHandle<AlertsReport> {
    let api = use_api();
    use_resource(scope, ResourceOptions::default(), move |scope: Scope| {
        let api = api.clone();
        async move {
            let api = require_api(api.as_ref())?;
            match scope {
                Scope::All => api.all_alerts().await,
                Scope::Provider(provider) => api.alerts(&provider).await.map(AlertsReport::from),
            }
        }
    })
}

#[hook]
pub fn use_recommendations(scope: Scope) -> ResourceHandle<RecommendationsReport> {
    let api = use_api();
    use_resource(scope, ResourceOptions::default(), move |scope: Scope| {
        let api = api.clone();
        async move {
            let api = require_api(api.as_ref())?;
            match scope {
                Scope::All => api.all_recommendations().await,
                Scope::Provider(provider) => api
                    .recommendations(&provider)
                    .await
                    .map(RecommendationsReport::from),
            }
        }
    })
}
