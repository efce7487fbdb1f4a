pub mod resource;
pub mod use_api;
pub mod use_auth;
pub mod use_budgets;
pub mod use_costs;
pub mod use_insights;
pub mod use_metrics;
pub mod use_resource;

pub use use_api::{ApiContext, Scope, use_api};
pub use use_resource::{ResourceHandle, ResourceOptions, use_resource};
