pub mod auth;
pub mod breakdown;
pub mod budgets;
pub mod costs;
pub mod error;
pub mod insights;
pub mod metrics;
