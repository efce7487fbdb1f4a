use crate::config::Config;
use crate::models::{
    auth::{
        CurrentUser, ForgotRequest, ForgotResponse, HealthStatus, LoginRequest, LoginResponse,
        MessageResponse, RegisterRequest, ResetRequest, Session, UserProfile,
    },
    breakdown::{BreakdownReport, ServicesBreakdown},
    budgets::{Budgets, BudgetsReport, Forecast, ForecastReport},
    costs::{CostSummary, DailyCosts, ProviderInfo, ServiceCosts},
    error::AppError,
    insights::{Alerts, AlertsReport, Anomalies, Recommendations, RecommendationsReport},
    metrics::{LiveMetrics, MetricKind, Timeseries},
};
use crate::services::session::SessionStore;
use crate::services::transport::{ApiRequest, HttpTransport, RawResponse, Transport};
use reqwest::Method;
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;
use std::rc::Rc;
use yew::Callback;

// API CONFIGURATION
/// Configuration for the dashboard API client.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiConfig {
    base_url: String,
    timezone: String,
}

impl ApiConfig {
    /// Creates a builder for constructing an `ApiConfig`.
    pub fn builder() -> ApiConfigBuilder {
        ApiConfigBuilder::default()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// IANA zone sent with every request in `X-Timezone`.
    pub fn timezone(&self) -> &str {
        &self.timezone
    }

    /// Joins a resource path onto the base URL.
    pub fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        ApiConfigBuilder::default().build()
    }
}

// API CONFIGURATION BUILDER
/// Builder for constructing an `ApiConfig` with custom settings.
#[derive(Debug, Default)]
pub struct ApiConfigBuilder {
    base_url: Option<String>,
    timezone: Option<String>,
}

impl ApiConfigBuilder {
    /// Sets a custom base URL (primarily for testing).
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Overrides the detected timezone.
    pub fn timezone(mut self, zone: impl Into<String>) -> Self {
        self.timezone = Some(zone.into());
        self
    }

    /// Builds the `ApiConfig`.
    pub fn build(self) -> ApiConfig {
        let base_url = self
            .base_url
            .unwrap_or_else(|| Config::API_BASE_URL.to_string());

        ApiConfig {
            base_url: resolve_base_url(&base_url, page_origin().as_deref()),
            timezone: self
                .timezone
                .or_else(detect_timezone)
                .filter(|zone| !zone.trim().is_empty())
                .unwrap_or_else(|| Config::FALLBACK_TIMEZONE.to_string()),
        }
    }
}

/// `reqwest` only accepts absolute URLs, so a path-only base such as `/api`
/// is anchored to the page origin when one is known.
pub fn resolve_base_url(base: &str, origin: Option<&str>) -> String {
    if base.starts_with("http://") || base.starts_with("https://") {
        return base.to_string();
    }
    match origin {
        Some(origin) => format!(
            "{}/{}",
            origin.trim_end_matches('/'),
            base.trim_start_matches('/')
        ),
        None => base.to_string(),
    }
}

#[cfg(target_arch = "wasm32")]
fn page_origin() -> Option<String> {
    web_sys::window()?.location().origin().ok()
}

#[cfg(not(target_arch = "wasm32"))]
fn page_origin() -> Option<String> {
    None
}

/// Best-effort IANA zone from the browser's `Intl` API.
#[cfg(target_arch = "wasm32")]
fn detect_timezone() -> Option<String> {
    let format = js_sys::Intl::DateTimeFormat::new(&js_sys::Array::new(), &js_sys::Object::new());
    let options = format.resolved_options();
    js_sys::Reflect::get(&options, &wasm_bindgen::JsValue::from_str("timeZone"))
        .ok()?
        .as_string()
}

#[cfg(not(target_arch = "wasm32"))]
fn detect_timezone() -> Option<String> {
    None
}

// REQUEST OPTIONS
/// Per-call options for [`ApiClient::request`].
#[derive(Debug, Clone)]
pub struct RequestOptions {
    pub method: Method,
    pub body: Option<Value>,
    pub headers: Vec<(String, String)>,
    /// Report a 401 to the caller without clearing the session or emitting
    /// the unauthorized callback. Used by the login/register/reset forms so
    /// they can show the server's message.
    pub skip_auth_redirect: bool,
}

impl RequestOptions {
    pub const fn get() -> Self {
        Self {
            method: Method::GET,
            body: None,
            headers: Vec::new(),
            skip_auth_redirect: false,
        }
    }

    pub const fn post(body: Value) -> Self {
        Self {
            method: Method::POST,
            body: Some(body),
            headers: Vec::new(),
            skip_auth_redirect: false,
        }
    }

    pub const fn without_auth_redirect(mut self) -> Self {
        self.skip_auth_redirect = true;
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self::get()
    }
}

// DASHBOARD CLIENT
/// Single entry point for every backend call.
///
/// Attaches the JSON, timezone and bearer headers, normalizes non-2xx
/// responses into [`AppError`], and on a 401 clears the injected session and
/// emits the unauthorized callback.
pub struct ApiClient<T: Transport = HttpTransport> {
    transport: T,
    config: ApiConfig,
    session: Rc<dyn SessionStore>,
    on_unauthorized: Option<Callback<()>>,
}

impl ApiClient<HttpTransport> {
    /// Creates a client over the real HTTP transport.
    pub fn new(config: ApiConfig, session: Rc<dyn SessionStore>) -> Result<Self, AppError> {
        Ok(Self::with_transport(HttpTransport::new()?, config, session))
    }
}

impl<T: Transport> ApiClient<T> {
    pub fn with_transport(transport: T, config: ApiConfig, session: Rc<dyn SessionStore>) -> Self {
        Self {
            transport,
            config,
            session,
            on_unauthorized: None,
        }
    }

    /// Registers the listener told about session expiry.
    pub fn on_unauthorized(mut self, callback: Callback<()>) -> Self {
        self.on_unauthorized = Some(callback);
        self
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    pub fn session(&self) -> &Rc<dyn SessionStore> {
        &self.session
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Performs one request and returns the parsed body of a 2xx response.
    pub async fn request(&self, path: &str, options: RequestOptions) -> Result<Value, AppError> {
        let body = options.body.as_ref().map(Value::to_string);
        let request = ApiRequest {
            method: options.method,
            url: self.config.url(path),
            headers: self.headers(options.headers),
            body,
        };

        let response = self.transport.send(request).await?;
        let payload = parse_body(&response);

        if response.is_success() {
            return Ok(payload);
        }

        if response.status == 401 {
            let message = extract_message(&payload).unwrap_or_else(|| "Unauthorized".to_string());
            if !options.skip_auth_redirect {
                self.expire_session();
            }
            return Err(AppError::Unauthorized { message });
        }

        let status = response.status;
        Err(AppError::Http {
            status,
            message: extract_message(&payload).unwrap_or_else(|| format!("HTTP {status}")),
        })
    }

    fn headers(&self, extra: Vec<(String, String)>) -> Vec<(String, String)> {
        let mut headers = vec![
            ("Content-Type".to_string(), "application/json".to_string()),
            ("X-Timezone".to_string(), self.config.timezone().to_string()),
        ];
        if let Some(token) = self.session.token() {
            headers.push(("Authorization".to_string(), format!("Bearer {token}")));
        }
        for (name, value) in extra {
            headers.retain(|(key, _)| !key.eq_ignore_ascii_case(&name));
            headers.push((name, value));
        }
        headers
    }

    fn expire_session(&self) {
        log::info!("Received 401, clearing stored session");
        self.session.clear();
        if let Some(callback) = &self.on_unauthorized {
            callback.emit(());
        }
    }

    async fn get<R: DeserializeOwned>(&self, path: &str) -> Result<R, AppError> {
        decode(self.request(path, RequestOptions::get()).await?)
    }

    /// GET for provider cost lists. A failed cloud call comes back as 200
    /// with `[{"error": "..."}]`, which is reported as an error here.
    async fn get_rows<R: DeserializeOwned>(&self, path: &str) -> Result<R, AppError> {
        let payload = self.request(path, RequestOptions::get()).await?;
        if let Some(message) = inline_error(&payload) {
            log::warn!("Provider reported an error for {path}: {message}");
            return Err(AppError::DataError(message));
        }
        decode(payload)
    }

    /// POST used by the auth forms: 401s are returned, never redirected.
    async fn post_auth<B: Serialize, R: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<R, AppError> {
        let options = RequestOptions::post(encode(body)?).without_auth_redirect();
        decode(self.request(path, options).await?)
    }

    // AUTH

    /// Logs in and stores the issued session.
    pub async fn login(&self, username: &str, password: &str) -> Result<Session, AppError> {
        let request = LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        };
        let response: LoginResponse = self.post_auth("/auth/login", &request).await?;
        let session = Session::from(response);
        self.session.save(&session);
        Ok(session)
    }

    /// Returns the server's confirmation message.
    pub async fn register(&self, request: &RegisterRequest) -> Result<String, AppError> {
        let response: MessageResponse = self.post_auth("/auth/register", request).await?;
        Ok(response
            .message
            .unwrap_or_else(|| "User registered successfully.".to_string()))
    }

    pub async fn forgot_password(&self, request: &ForgotRequest) -> Result<ForgotResponse, AppError> {
        self.post_auth("/auth/forgot", request).await
    }

    pub async fn reset_password(&self, token: &str, new_password: &str) -> Result<String, AppError> {
        let request = ResetRequest {
            token: token.to_string(),
            new_password: new_password.to_string(),
        };
        let response: MessageResponse = self.post_auth("/auth/reset", &request).await?;
        Ok(response
            .message
            .unwrap_or_else(|| "Password updated successfully.".to_string()))
    }

    /// Tells the backend, then clears the local session whatever it answered.
    pub async fn logout(&self) {
        let options = RequestOptions::post(Value::Object(serde_json::Map::new())).without_auth_redirect();
        if let Err(e) = self.request("/auth/logout", options).await {
            log::warn!("Logout request failed: {e}");
        }
        self.session.clear();
    }

    pub async fn current_user(&self) -> Result<UserProfile, AppError> {
        let me: CurrentUser = self.get("/auth/me").await?;
        Ok(me.user)
    }

    pub async fn health(&self) -> Result<HealthStatus, AppError> {
        self.get("/health").await
    }

    // COSTS

    pub async fn providers(&self) -> Result<Vec<ProviderInfo>, AppError> {
        self.get("/providers").await
    }

    pub async fn cost_summary(&self) -> Result<CostSummary, AppError> {
        self.get("/costs/summary").await
    }

    pub async fn mtd_costs(&self, provider: &str) -> Result<ServiceCosts, AppError> {
        let path = provider_path(provider, "/costs/mtd")?;
        self.get_rows(&path).await
    }

    pub async fn daily_costs(&self, provider: &str, days: u32) -> Result<DailyCosts, AppError> {
        let path = provider_path(provider, &format!("/costs/daily?days={days}"))?;
        self.get_rows(&path).await
    }

    // METRICS

    pub async fn live_metrics(&self, provider: &str) -> Result<LiveMetrics, AppError> {
        let path = provider_path(provider, "/metrics/live")?;
        self.get(&path).await
    }

    pub async fn timeseries(
        &self,
        provider: &str,
        kind: MetricKind,
        minutes: u32,
    ) -> Result<Timeseries, AppError> {
        let path = provider_path(
            provider,
            &format!("/metrics/timeseries?type={}&minutes={minutes}", kind.as_str()),
        )?;
        self.get(&path).await
    }

    // INSIGHTS

    pub async fn all_anomalies(&self) -> Result<Anomalies, AppError> {
        self.get("/anomalies/all").await
    }

    pub async fn anomalies(&self, provider: &str) -> Result<Anomalies, AppError> {
        let path = provider_path(provider, "/anomalies")?;
        self.get(&path).await
    }

    pub async fn all_forecasts(&self, days: u32) -> Result<ForecastReport, AppError> {
        self.get(&format!("/forecast/all?days={days}")).await
    }

    pub async fn forecast(&self, provider: &str, days: u32) -> Result<Forecast, AppError> {
        let path = provider_path(provider, &format!("/forecast?days={days}"))?;
        self.get(&path).await
    }

    pub async fn all_recommendations(&self) -> Result<RecommendationsReport, AppError> {
        self.get("/recommendations/all").await
    }

    pub async fn recommendations(&self, provider: &str) -> Result<Recommendations, AppError> {
        let path = provider_path(provider, "/recommendations")?;
        self.get(&path).await
    }

    pub async fn all_alerts(&self) -> Result<AlertsReport, AppError> {
        self.get("/alerts/all").await
    }

    pub async fn alerts(&self, provider: &str) -> Result<Alerts, AppError> {
        let path = provider_path(provider, "/alerts")?;
        self.get(&path).await
    }

    // BUDGETS

    pub async fn all_budgets(&self) -> Result<BudgetsReport, AppError> {
        self.get("/budgets/all").await
    }

    pub async fn budgets(&self, provider: &str) -> Result<Budgets, AppError> {
        let path = provider_path(provider, "/budgets")?;
        self.get(&path).await
    }

    pub async fn all_services_breakdown(&self) -> Result<BreakdownReport, AppError> {
        self.get("/services/breakdown/all").await
    }

    pub async fn services_breakdown(&self, provider: &str) -> Result<ServicesBreakdown, AppError> {
        let path = provider_path(provider, "/services/breakdown")?;
        self.get(&path).await
    }
}

/// Builds a provider-scoped path, rejecting a missing identifier before any
/// request is attempted.
pub fn provider_path(provider: &str, suffix: &str) -> Result<String, AppError> {
    let provider = provider.trim();
    if provider.is_empty() {
        return Err(AppError::MissingArgument("provider"));
    }
    Ok(format!("/{provider}{suffix}"))
}

/// JSON when declared as such, text otherwise; unparsable JSON becomes `Null`.
pub fn parse_body(response: &RawResponse) -> Value {
    if response.is_json() {
        serde_json::from_str(&response.body).unwrap_or(Value::Null)
    } else {
        Value::String(response.body.clone())
    }
}

/// Picks the server-supplied `error`, then `message`.
pub fn extract_message(payload: &Value) -> Option<String> {
    ["error", "message"].iter().find_map(|key| {
        payload
            .get(key)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .map(str::to_owned)
    })
}

/// First `error` message carried by a row of a list payload.
pub fn inline_error(payload: &Value) -> Option<String> {
    payload.as_array()?.iter().find_map(|row| {
        row.get("error")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .map(str::to_owned)
    })
}

fn encode<B: Serialize>(body: &B) -> Result<Value, AppError> {
    serde_json::to_value(body)
        .map_err(|e| AppError::DataError(format!("Failed to encode request: {e}")))
}

fn decode<R: DeserializeOwned>(payload: Value) -> Result<R, AppError> {
    serde_json::from_value(payload)
        .map_err(|e| AppError::DataError(format!("Unexpected response shape: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_config_builder_defaults() {
        let config = ApiConfig::builder().build();
        assert_eq!(config.base_url(), Config::API_BASE_URL);
        assert_eq!(config.timezone(), "UTC");
    }

    #[test]
    fn test_config_builder_custom_timezone() {
        let config = ApiConfig::builder().timezone("Europe/London").build();
        assert_eq!(config.timezone(), "Europe/London");

        let blank = ApiConfig::builder().timezone("  ").build();
        assert_eq!(blank.timezone(), "UTC");
    }

    #[test]
    fn test_url_construction() {
        let config = ApiConfig::builder()
            .base_url("http://localhost:5050/api/")
            .build();
        assert_eq!(
            config.url("/costs/summary"),
            "http://localhost:5050/api/costs/summary"
        );
    }

    #[test]
    fn test_relative_base_resolves_against_origin() {
        assert_eq!(
            resolve_base_url("/api", Some("https://dash.example.com/")),
            "https://dash.example.com/api"
        );
        assert_eq!(resolve_base_url("/api", None), "/api");
        assert_eq!(
            resolve_base_url("http://backend:5050/api", Some("https://dash.example.com")),
            "http://backend:5050/api"
        );
    }

    #[test]
    fn test_provider_path() {
        assert_eq!(provider_path("aws", "/costs/mtd").unwrap(), "/aws/costs/mtd");
        assert_eq!(
            provider_path("  ", "/costs/mtd"),
            Err(AppError::MissingArgument("provider"))
        );
    }

    #[test]
    fn test_message_priority() {
        assert_eq!(
            extract_message(&json!({"error": "bad", "message": "ignored"})),
            Some("bad".to_string())
        );
        assert_eq!(
            extract_message(&json!({"error": "", "message": "fallback"})),
            Some("fallback".to_string())
        );
        assert_eq!(extract_message(&json!({"error": {"code": 1}})), None);
        assert_eq!(extract_message(&Value::String("oops".to_string())), None);
    }

    #[test]
    fn test_inline_error_rows() {
        assert_eq!(
            inline_error(&json!([{"error": "AccessDenied"}])),
            Some("AccessDenied".to_string())
        );
        assert_eq!(
            inline_error(&json!([{"service": "EC2", "cost": 1.0}, {"error": " Throttled "}])),
            Some("Throttled".to_string())
        );
        assert_eq!(inline_error(&json!([{"date": "2025-10-01", "cost": 3.0}])), None);
        assert_eq!(inline_error(&json!({"error": "not a list"})), None);
    }

    #[test]
    fn test_body_parsing() {
        assert_eq!(
            parse_body(&RawResponse::json(200, r#"{"ok": true}"#)),
            json!({"ok": true})
        );
        assert_eq!(parse_body(&RawResponse::json(200, "<html>")), Value::Null);
        assert_eq!(
            parse_body(&RawResponse::text(200, "pong")),
            Value::String("pong".to_string())
        );
    }

    #[test]
    fn test_request_options() {
        let options = RequestOptions::post(json!({}))
            .without_auth_redirect()
            .header("X-Trace", "1");
        assert_eq!(options.method, Method::POST);
        assert!(options.skip_auth_redirect);
        assert_eq!(options.headers.len(), 1);
        assert!(!RequestOptions::default().skip_auth_redirect);
    }
}
