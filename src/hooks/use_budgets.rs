use yew::prelude::*;

use super::use_api::{Scope, require_api, use_api};
use super::use_resource::{ResourceHandle, ResourceOptions, use_resource};
use crate::models::breakdown::BreakdownReport;
use crate::models::budgets::{BudgetsReport, ForecastReport};

#[hook]
pub fn use_budgets(scope: Scope) -> ResourceHandle<BudgetsReport> {
    let api = use_api();
    use_resource(scope, ResourceOptions::default(), move |scope: Scope| {
        let api = api.clone();
        async move {
            let api = require_api(api.as_ref())?;
            match scope {
                Scope::All => api.all_budgets().await,
                Scope::Provider(provider) => api.budgets(&provider).await.map(BudgetsReport::from),
            }
        }
    })
}

#[hook]
pub fn use_forecast(scope: Scope, days: u32) -> ResourceHandle<ForecastReport> {
    let api = use_api();
    use_resource(
        (scope, days),
        ResourceOptions::default(),
        move |(scope, days): (Scope, u32)| {
            let api = api.clone();
            async move {
                let api = require_api(api.as_ref())?;
                match scope {
                    Scope::All => api.all_forecasts(days).await,
                    Scope::Provider(provider) => api
                        .forecast(&provider, days)
                        .await
                        .map(|f| ForecastReport::single(&provider, f)),
                }
            }
        },
    )
}

#[hook]
pub fn use_services_breakdown(scope: Scope) -> ResourceHandle<BreakdownReport> {
    let api = use_api();
    use_resource(scope, ResourceOptions::default(), move |scope: Scope| {
        let api = api.clone();
        async move {
            let api = require_api(api.as_ref())?;
            match scope {
                Scope::All => api.all_services_breakdown().await,
                Scope::Provider(provider) => api
                    .services_breakdown(&provider)
                    .await
                    .map(|b| BreakdownReport::single(&provider, b)),
            }
        }
    })
}
