pub mod budgets;
pub mod chart;
pub mod dashboard;
pub mod insights;
pub mod login;
pub mod overview;
pub mod provider_tab;
pub mod status;

pub use dashboard::Dashboard;
pub use login::AuthPage;
