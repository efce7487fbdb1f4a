#[cfg(test)]
mod tests {
    use cloud_cost_dashboard::hooks::resource::{ErrorPolicy, Resource, ResourceAction, ResourceState};
    use cloud_cost_dashboard::hooks::use_auth::{AuthAction, AuthFlow, AuthMode, AuthSubmission, perform};
    use cloud_cost_dashboard::models::{
        auth::{ForgotRequest, Role, Session, UserProfile},
        error::AppError,
        metrics::MetricKind,
    };
    use cloud_cost_dashboard::services::api::{ApiClient, ApiConfig, RequestOptions};
    use cloud_cost_dashboard::services::session::{MemorySession, SessionStore};
    use cloud_cost_dashboard::services::transport::{ApiRequest, RawResponse, Transport};
    use futures::channel::oneshot;
    use futures::executor::{LocalPool, block_on};
    use futures::future::{FutureExt, LocalBoxFuture};
    use futures::task::LocalSpawnExt;
    use std::cell::{Cell, RefCell};
    use std::collections::{HashMap, VecDeque};
    use std::rc::Rc;
    use yew::{Callback, Reducible};

    // ===== Test doubles =====

    /// Records every request and answers from a queue.
    #[derive(Default)]
    struct MockTransport {
        requests: RefCell<Vec<ApiRequest>>,
        responses: RefCell<VecDeque<Result<RawResponse, AppError>>>,
    }

    impl MockTransport {
        fn with(responses: Vec<RawResponse>) -> Self {
            Self {
                requests: RefCell::default(),
                responses: RefCell::new(responses.into_iter().map(Ok).collect()),
            }
        }

        fn sent(&self) -> Vec<ApiRequest> {
            self.requests.borrow().clone()
        }
    }

    impl Transport for MockTransport {
        async fn send(&self, request: ApiRequest) -> Result<RawResponse, AppError> {
            self.requests.borrow_mut().push(request);
            self.responses
                .borrow_mut()
                .pop_front()
                .unwrap_or_else(|| Err(AppError::Network("no response queued".to_string())))
        }
    }

    fn config() -> ApiConfig {
        ApiConfig::builder()
            .base_url("http://api.test/api")
            .timezone("Europe/London")
            .build()
    }

    fn client(
        responses: Vec<RawResponse>,
        session: Rc<MemorySession>,
    ) -> ApiClient<MockTransport> {
        ApiClient::with_transport(MockTransport::with(responses), config(), session)
    }

    fn alice_session() -> Session {
        Session {
            token: "tok-abc".to_string(),
            user: UserProfile {
                username: "alice".to_string(),
                role: Role::Admin,
            },
        }
    }

    fn counter() -> (Rc<Cell<usize>>, Callback<()>) {
        let hits = Rc::new(Cell::new(0));
        let callback = {
            let hits = hits.clone();
            Callback::from(move |()| hits.set(hits.get() + 1))
        };
        (hits, callback)
    }

    /// Applies dispatched actions the way `use_reducer` would.
    struct Recorder<T> {
        state: RefCell<Rc<ResourceState<T>>>,
        dispatches: Cell<usize>,
    }

    impl<T> Recorder<T> {
        fn snapshot(&self) -> Rc<ResourceState<T>> {
            Rc::clone(&self.state.borrow())
        }
    }

    fn recorded<T: 'static, D: 'static>(
        fetch: impl Fn(D) -> LocalBoxFuture<'static, Result<T, AppError>> + 'static,
        policy: ErrorPolicy,
    ) -> (Resource<T, D>, Rc<Recorder<T>>) {
        let recorder = Rc::new(Recorder {
            state: RefCell::new(Rc::new(ResourceState::pending())),
            dispatches: Cell::new(0),
        });
        let sink = recorder.clone();
        let resource = Resource::new(
            fetch,
            move |action: ResourceAction<T>| {
                let next = sink.snapshot().reduce(action);
                *sink.state.borrow_mut() = next;
                sink.dispatches.set(sink.dispatches.get() + 1);
            },
            policy,
        );
        (resource, recorder)
    }

    // ===== Error Type Tests =====

    #[test]
    fn test_app_error_display() {
        let error = AppError::Http {
            status: 503,
            message: "Service unavailable".to_string(),
        };
        assert_eq!(error.to_string(), "Service unavailable");
        assert_eq!(error.status(), Some(503));
        assert_eq!(
            AppError::MissingArgument("provider").to_string(),
            "provider is required"
        );
        assert!(AppError::Cancelled.is_cancelled());
    }

    // ===== API Client Tests =====

    #[test]
    fn test_authorization_header_only_with_token() {
        let anonymous = client(
            vec![RawResponse::json(200, r#"{"ok": true, "service": "cloud-cost"}"#)],
            Rc::new(MemorySession::new()),
        );
        block_on(anonymous.health()).unwrap();
        let request = &anonymous.transport().sent()[0];
        assert_eq!(request.header("Authorization"), None);
        assert_eq!(request.header("Content-Type"), Some("application/json"));
        assert_eq!(request.header("X-Timezone"), Some("Europe/London"));
        assert_eq!(request.url, "http://api.test/api/health");

        let signed_in = client(
            vec![RawResponse::json(200, "[]")],
            Rc::new(MemorySession::with_session(alice_session())),
        );
        block_on(signed_in.providers()).unwrap();
        assert_eq!(
            signed_in.transport().sent()[0].header("Authorization"),
            Some("Bearer tok-abc")
        );
    }

    #[test]
    fn test_empty_token_sends_no_authorization() {
        let mut session = alice_session();
        session.token.clear();
        let api = client(
            vec![RawResponse::json(200, "[]")],
            Rc::new(MemorySession::with_session(session)),
        );
        block_on(api.providers()).unwrap();
        assert_eq!(api.transport().sent()[0].header("Authorization"), None);
    }

    #[test]
    fn test_unauthorized_clears_session_and_notifies_once() {
        let session = Rc::new(MemorySession::with_session(alice_session()));
        let (hits, on_unauthorized) = counter();
        let api = client(
            vec![RawResponse::json(401, r#"{"error": "Token expired"}"#)],
            session.clone(),
        )
        .on_unauthorized(on_unauthorized);

        let result = block_on(api.cost_summary());

        assert_eq!(
            result,
            Err(AppError::Unauthorized {
                message: "Token expired".to_string()
            })
        );
        assert_eq!(session.token(), None);
        assert_eq!(session.user(), None);
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn test_unauthorized_opt_out_leaves_session_alone() {
        let session = Rc::new(MemorySession::with_session(alice_session()));
        let (hits, on_unauthorized) = counter();
        let api = client(
            vec![RawResponse::json(401, r#"{"error": "Invalid password"}"#)],
            session.clone(),
        )
        .on_unauthorized(on_unauthorized);

        let result = block_on(api.login("alice", "wrong"));

        assert_eq!(
            result.unwrap_err().to_string(),
            "Invalid password"
        );
        assert_eq!(session.token().as_deref(), Some("tok-abc"));
        assert_eq!(hits.get(), 0);
    }

    #[test]
    fn test_login_token_is_sent_on_next_request() {
        let session = Rc::new(MemorySession::new());
        let api = client(
            vec![
                RawResponse::json(
                    200,
                    r#"{"token": "tok-new", "user": {"username": "bob", "role": "viewer"},
                        "expires_at": "2025-10-05T12:00:00Z", "client_tz": "Europe/London"}"#,
                ),
                RawResponse::json(200, r#"[{"name": "aws", "display_name": "AWS"}]"#),
            ],
            session.clone(),
        );

        let logged_in = block_on(api.login("bob", "hunter22")).unwrap();
        assert_eq!(logged_in.user.username, "bob");
        assert_eq!(session.token().as_deref(), Some("tok-new"));

        let providers = block_on(api.providers()).unwrap();
        assert_eq!(providers[0].label(), "AWS");

        let sent = api.transport().sent();
        assert_eq!(sent[0].header("Authorization"), None);
        assert_eq!(sent[0].body.as_deref().map(|b| b.contains("\"username\":\"bob\"")), Some(true));
        assert_eq!(sent[1].header("Authorization"), Some("Bearer tok-new"));
    }

    #[test]
    fn test_missing_provider_never_reaches_transport() {
        let api = client(vec![], Rc::new(MemorySession::new()));

        assert_eq!(
            block_on(api.mtd_costs("")),
            Err(AppError::MissingArgument("provider"))
        );
        assert_eq!(
            block_on(api.live_metrics("   ")),
            Err(AppError::MissingArgument("provider"))
        );
        assert!(api.transport().sent().is_empty());
    }

    #[test]
    fn test_non_array_summary_is_data_error() {
        let api = client(
            vec![RawResponse::json(200, r#"{"providers": "unexpected"}"#)],
            Rc::new(MemorySession::new()),
        );
        assert!(matches!(
            block_on(api.cost_summary()),
            Err(AppError::DataError(_))
        ));
    }

    #[test]
    fn test_error_message_fallbacks() {
        let api = client(
            vec![
                RawResponse::json(400, r#"{"message": "days must be positive"}"#),
                RawResponse::text(502, "<html>Bad gateway</html>"),
                RawResponse::json(500, "not json"),
            ],
            Rc::new(MemorySession::new()),
        );

        assert_eq!(
            block_on(api.daily_costs("aws", 0)).unwrap_err().to_string(),
            "days must be positive"
        );
        assert_eq!(
            block_on(api.all_alerts()),
            Err(AppError::Http {
                status: 502,
                message: "HTTP 502".to_string()
            })
        );
        assert_eq!(
            block_on(api.all_budgets()).unwrap_err().to_string(),
            "HTTP 500"
        );
    }

    #[test]
    fn test_query_parameters_and_paths() {
        let api = client(
            vec![
                RawResponse::json(200, "[]"),
                RawResponse::json(200, r#"{"ts": [], "memory_percent": []}"#),
                RawResponse::json(200, r#"{"providers": {}}"#),
                RawResponse::json(200, "[]"),
            ],
            Rc::new(MemorySession::new()),
        );

        block_on(api.daily_costs("gcp", 30)).unwrap();
        block_on(api.timeseries("azure", MetricKind::Memory, 30)).unwrap();
        block_on(api.all_forecasts(7)).unwrap();
        block_on(api.alerts("aws")).unwrap();

        let urls: Vec<String> = api.transport().sent().into_iter().map(|r| r.url).collect();
        assert_eq!(
            urls,
            vec![
                "http://api.test/api/gcp/costs/daily?days=30",
                "http://api.test/api/azure/metrics/timeseries?type=memory&minutes=30",
                "http://api.test/api/forecast/all?days=7",
                "http://api.test/api/aws/alerts",
            ]
        );
    }

    #[test]
    fn test_caller_headers_override_defaults() {
        let api = client(
            vec![RawResponse::json(200, "{}")],
            Rc::new(MemorySession::new()),
        );
        block_on(api.request(
            "/health",
            RequestOptions::get().header("x-timezone", "Asia/Tokyo"),
        ))
        .unwrap();

        let request = &api.transport().sent()[0];
        assert_eq!(request.header("X-Timezone"), Some("Asia/Tokyo"));
        assert_eq!(
            request.headers.iter().filter(|(k, _)| k.eq_ignore_ascii_case("x-timezone")).count(),
            1
        );
    }

    #[test]
    fn test_logout_clears_session_even_when_request_fails() {
        let session = Rc::new(MemorySession::with_session(alice_session()));
        let api = client(vec![], session.clone());

        block_on(api.logout());

        assert!(!session.is_authenticated());
        assert_eq!(api.transport().sent()[0].url, "http://api.test/api/auth/logout");
    }

    // ===== Resource Tests =====

    #[test]
    fn test_response_after_cancel_is_not_committed() {
        let (tx, rx) = oneshot::channel::<Result<u32, AppError>>();
        let slot = Rc::new(RefCell::new(Some(rx)));
        let (resource, recorder) = recorded(
            move |()| {
                let rx = slot.borrow_mut().take();
                async move {
                    match rx {
                        Some(rx) => rx.await.unwrap_or(Err(AppError::Cancelled)),
                        None => Err(AppError::Network("no channel".to_string())),
                    }
                }
                .boxed_local()
            },
            ErrorPolicy::Clear,
        );

        let pending = resource.load(());
        resource.cancel();
        tx.send(Ok(42)).unwrap();
        block_on(pending);

        // Only the Started action was applied.
        assert_eq!(recorder.dispatches.get(), 1);
        assert_eq!(recorder.snapshot().data(), None);
        assert_eq!(recorder.snapshot().error, None);
    }

    #[test]
    fn test_latest_parameter_wins() {
        let (tx_first, rx_first) = oneshot::channel::<Result<&'static str, AppError>>();
        let (tx_second, rx_second) = oneshot::channel::<Result<&'static str, AppError>>();
        let channels = Rc::new(RefCell::new(HashMap::from([(1, rx_first), (2, rx_second)])));

        let (resource, recorder) = recorded(
            move |id: u32| {
                let rx = channels.borrow_mut().remove(&id);
                async move {
                    match rx {
                        Some(rx) => rx.await.unwrap_or(Err(AppError::Cancelled)),
                        None => Err(AppError::Network("no channel".to_string())),
                    }
                }
                .boxed_local()
            },
            ErrorPolicy::Clear,
        );

        let mut pool = LocalPool::new();
        let spawner = pool.spawner();

        spawner.spawn_local(resource.load(1)).unwrap();
        pool.run_until_stalled();
        spawner.spawn_local(resource.load(2)).unwrap();
        pool.run_until_stalled();

        tx_second.send(Ok("second")).unwrap();
        pool.run_until_stalled();
        // The superseded request has been dropped, so nobody is listening.
        assert!(tx_first.send(Ok("first")).is_err());
        pool.run_until_stalled();

        let state = recorder.snapshot();
        assert_eq!(state.data(), Some(&"second"));
        assert!(!state.loading);
    }

    #[test]
    fn test_reload_reuses_arguments() {
        let api = Rc::new(client(
            vec![
                RawResponse::json(200, r#"[{"date": "2025-10-01", "cost": 12.5}]"#),
                RawResponse::json(200, r#"[{"date": "2025-10-01", "cost": 12.5}]"#),
            ],
            Rc::new(MemorySession::new()),
        ));
        let (resource, recorder) = recorded(
            {
                let api = api.clone();
                move |(provider, days): (String, u32)| {
                    let api = api.clone();
                    async move { api.daily_costs(&provider, days).await }.boxed_local()
                }
            },
            ErrorPolicy::Clear,
        );

        let deps = ("aws".to_string(), 30);
        block_on(resource.load(deps.clone()));
        let first = recorder.snapshot();
        block_on(resource.load(deps));
        let second = recorder.snapshot();

        let sent = api.transport().sent();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0], sent[1]);
        assert_eq!(first.data(), second.data());
        assert_eq!(second.data().map(|d| d.total()), Some(12.5));
    }

    #[test]
    fn test_inline_provider_error_becomes_resource_error() {
        let api = Rc::new(client(
            vec![
                RawResponse::json(200, r#"[{"error": "AccessDenied"}]"#),
                RawResponse::json(200, r#"[{"error": "AccessDenied"}]"#),
            ],
            Rc::new(MemorySession::new()),
        ));

        let (mtd, mtd_state) = recorded(
            {
                let api = api.clone();
                move |provider: String| {
                    let api = api.clone();
                    async move { api.mtd_costs(&provider).await }.boxed_local()
                }
            },
            ErrorPolicy::Clear,
        );
        block_on(mtd.load("aws".to_string()));

        let state = mtd_state.snapshot();
        assert_eq!(state.data(), None);
        assert_eq!(state.error.as_deref(), Some("Data error: AccessDenied"));
        assert!(!state.loading);

        assert_eq!(
            block_on(api.daily_costs("aws", 30)),
            Err(AppError::DataError("AccessDenied".to_string()))
        );
    }

    #[test]
    fn test_failed_refresh_keeps_last_data() {
        let outcomes = Rc::new(RefCell::new(VecDeque::from([
            Ok(55.0),
            Err(AppError::Network("timeout".to_string())),
        ])));
        let (resource, recorder) = recorded(
            move |()| {
                let next = outcomes
                    .borrow_mut()
                    .pop_front()
                    .unwrap_or(Err(AppError::Cancelled));
                async move { next }.boxed_local()
            },
            ErrorPolicy::KeepData,
        );

        block_on(resource.load(()));
        block_on(resource.refresh(()));

        let state = recorder.snapshot();
        assert_eq!(state.data(), Some(&55.0));
        assert_eq!(state.error.as_deref(), Some("Network error: timeout"));
        assert!(!state.loading);
    }

    #[test]
    fn test_failure_clears_data_by_default() {
        let outcomes = Rc::new(RefCell::new(VecDeque::from([
            Ok(1u8),
            Err(AppError::Http {
                status: 500,
                message: "boom".to_string(),
            }),
        ])));
        let (resource, recorder) = recorded(
            move |()| {
                let next = outcomes
                    .borrow_mut()
                    .pop_front()
                    .unwrap_or(Err(AppError::Cancelled));
                async move { next }.boxed_local()
            },
            ErrorPolicy::Clear,
        );

        block_on(resource.load(()));
        block_on(resource.load(()));

        let state = recorder.snapshot();
        assert_eq!(state.data(), None);
        assert_eq!(state.error.as_deref(), Some("boom"));
    }

    // ===== Auth Flow Tests =====

    #[test]
    fn test_reset_link_opens_reset_form() {
        let flow = AuthFlow::new(Some("reset-tok".to_string()));
        assert_eq!(flow.mode, AuthMode::Reset);
        assert_eq!(flow.reset_token, "reset-tok");
        assert!(flow.username.is_empty());
        assert!(flow.password.is_empty());

        assert_eq!(AuthFlow::new(None).mode, AuthMode::Login);
    }

    #[test]
    fn test_forgot_then_reset_round_trip() {
        let api = client(
            vec![
                RawResponse::json(
                    200,
                    r#"{"ok": true, "message": "If the account exists, we sent instructions.", "reset_token": "dev-tok"}"#,
                ),
                RawResponse::json(200, r#"{"ok": true, "message": "Password updated successfully."}"#),
            ],
            Rc::new(MemorySession::new()),
        );

        let (action, session) = block_on(perform(
            &api,
            AuthSubmission::Forgot(ForgotRequest {
                username: Some("alice".to_string()),
                email: None,
            }),
        ));
        assert!(session.is_none());
        let flow = Rc::new(AuthFlow::new(None).with_dev_tokens(true))
            .reduce(AuthAction::SwitchMode(AuthMode::Forgot))
            .reduce(action);
        assert_eq!(flow.mode, AuthMode::Reset);
        assert_eq!(flow.reset_token, "dev-tok");

        let (action, _) = block_on(perform(
            &api,
            AuthSubmission::Reset {
                token: flow.reset_token.clone(),
                new_password: "n3wpass".to_string(),
            },
        ));
        let flow = flow.reduce(action);
        assert_eq!(flow.mode, AuthMode::Login);
        assert_eq!(flow.notice.as_deref(), Some("Password updated successfully."));
        assert!(flow.reset_token.is_empty());
    }

    #[test]
    fn test_login_failure_lands_in_error_slot() {
        let api = client(
            vec![RawResponse::json(401, r#"{"error": "User not found"}"#)],
            Rc::new(MemorySession::new()),
        );
        let (action, session) = block_on(perform(
            &api,
            AuthSubmission::Login {
                username: "ghost".to_string(),
                password: "whatever".to_string(),
            },
        ));
        assert!(session.is_none());

        let flow = Rc::new(AuthFlow::new(None))
            .reduce(AuthAction::Submitting)
            .reduce(action);
        assert_eq!(flow.error.as_deref(), Some("User not found"));
        assert!(!flow.busy);
    }
}
