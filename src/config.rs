/// Configuration constants for the application
pub struct Config;

impl Config {
    /// Base path of the backend API, overridable at build time
    pub const API_BASE_URL: &'static str = match option_env!("DASHBOARD_API_BASE") {
        Some(url) => url,
        None => "/api",
    };

    /// Timezone sent in `X-Timezone` when the browser cannot resolve one
    pub const FALLBACK_TIMEZONE: &'static str = "UTC";

    /// Storage key holding the bearer token
    pub const TOKEN_KEY: &'static str = "token";

    /// Storage key holding the JSON user profile
    pub const USER_KEY: &'static str = "user";

    /// Live metrics polling interval in milliseconds (30 seconds)
    pub const METRICS_REFRESH_MS: u32 = 30_000;

    pub const DEFAULT_DAILY_DAYS: u32 = 30;

    pub const DEFAULT_FORECAST_DAYS: u32 = 7;

    pub const TIMESERIES_MINUTES: u32 = 30;

    pub const MIN_USERNAME_LEN: usize = 3;

    pub const MIN_PASSWORD_LEN: usize = 6;

    /// Accept a reset token returned directly by `/auth/forgot`. The backend
    /// only does this in development, so release builds ignore it.
    pub const ACCEPT_DEV_RESET_TOKEN: bool = cfg!(debug_assertions);

    /// Debounce delay for chart re-rendering on window resize
    pub const RESIZE_DEBOUNCE_MS: u32 = 150;
}
