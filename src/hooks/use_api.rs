use std::ops::Deref;
use std::rc::Rc;
use yew::prelude::*;

use super::use_resource::{ResourceHandle, ResourceOptions, use_resource};
use crate::models::auth::HealthStatus;
use crate::models::error::AppError;
use crate::services::api::ApiClient;

/// Context carrying the shared API client down the component tree.
#[derive(Clone)]
pub struct ApiContext(pub Rc<ApiClient>);

impl PartialEq for ApiContext {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Deref for ApiContext {
    type Target = ApiClient;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Shared API client, if an `ApiContext` provider is mounted above.
#[hook]
pub fn use_api() -> Option<Rc<ApiClient>> {
    use_context::<ApiContext>().map(|ctx| ctx.0)
}

pub(crate) fn require_api(api: Option<&Rc<ApiClient>>) -> Result<Rc<ApiClient>, AppError> {
    api.cloned()
        .ok_or_else(|| AppError::ConfigError("API client is not available".to_string()))
}

/// Which slice of the data an insight hook fetches.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Scope {
    /// Aggregate endpoint across every configured provider
    #[default]
    All,
    Provider(String),
}

/// Backend liveness, shown in the dashboard header.
#[hook]
pub fn use_health() -> ResourceHandle<HealthStatus> {
    let api = use_api();
    use_resource((), ResourceOptions::default(), move |()| {
        let api = api.clone();
        async move { require_api(api.as_ref())?.health().await }
    })
}
