use std::rc::Rc;

use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use super::use_api::{require_api, use_api};
use crate::config::Config;
use crate::models::auth::{ForgotRequest, ForgotResponse, RegisterRequest, Role, Session};
use crate::models::error::AppError;
use crate::services::api::ApiClient;
use crate::services::transport::Transport;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthMode {
    #[default]
    Login,
    Register,
    Forgot,
    Reset,
}

impl AuthMode {
    pub const fn title(&self) -> &'static str {
        match self {
            Self::Login => "Sign in",
            Self::Register => "Create account",
            Self::Forgot => "Forgot password",
            Self::Reset => "Reset password",
        }
    }

    const fn uses_username(self) -> bool {
        matches!(self, Self::Login | Self::Register | Self::Forgot)
    }

    const fn uses_email(self) -> bool {
        matches!(self, Self::Register | Self::Forgot)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthField {
    Username,
    Password,
    ConfirmPassword,
    Email,
    ResetToken,
    NewPassword,
}

pub enum AuthAction {
    SwitchMode(AuthMode),
    Edit(AuthField, String),
    SetRole(Role),
    Submitting,
    Failed(String),
    LoggedIn,
    Registered(String),
    ForgotSent(ForgotResponse),
    PasswordReset(String),
}

/// Form state of the login page across its four modes.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AuthFlow {
    pub mode: AuthMode,
    pub username: String,
    pub password: String,
    pub confirm_password: String,
    pub email: String,
    pub role: Role,
    pub reset_token: String,
    pub new_password: String,
    pub error: Option<String>,
    pub notice: Option<String>,
    pub busy: bool,
    accept_dev_token: bool,
}

/// A validated form, ready to be sent.
#[derive(Debug, Clone, PartialEq)]
pub enum AuthSubmission {
    Login { username: String, password: String },
    Register(RegisterRequest),
    Forgot(ForgotRequest),
    Reset { token: String, new_password: String },
}

impl AuthFlow {
    /// Starts in Reset mode when the page was opened from a reset link.
    pub fn new(reset_token: Option<String>) -> Self {
        let mut flow = Self {
            accept_dev_token: Config::ACCEPT_DEV_RESET_TOKEN,
            ..Self::default()
        };
        if let Some(token) = reset_token.filter(|t| !t.trim().is_empty()) {
            flow.mode = AuthMode::Reset;
            flow.reset_token = token;
        }
        flow
    }

    /// Overrides whether a reset token returned by `/auth/forgot` is used.
    pub fn with_dev_tokens(mut self, accept: bool) -> Self {
        self.accept_dev_token = accept;
        self
    }

    fn switch(&mut self, mode: AuthMode) {
        self.mode = mode;
        self.password.clear();
        self.confirm_password.clear();
        self.new_password.clear();
        if !mode.uses_username() {
            self.username.clear();
        }
        if !mode.uses_email() {
            self.email.clear();
        }
        if mode != AuthMode::Reset {
            self.reset_token.clear();
        }
        self.error = None;
        self.notice = None;
    }

    /// Checks the current form; nothing is sent when this fails.
    pub fn validate(&self) -> Result<AuthSubmission, AppError> {
        let username = self.username.trim();
        let email = self.email.trim();
        let invalid = |msg: &str| Err(AppError::Validation(msg.to_string()));

        match self.mode {
            AuthMode::Login => {
                if username.is_empty() || self.password.is_empty() {
                    return invalid("Username and password are required.");
                }
                Ok(AuthSubmission::Login {
                    username: username.to_string(),
                    password: self.password.clone(),
                })
            }
            AuthMode::Register => {
                if username.chars().count() < Config::MIN_USERNAME_LEN {
                    return invalid("Username must be at least 3 characters.");
                }
                check_new_password(&self.password, &self.confirm_password)?;
                if !email.is_empty() && !is_valid_email(email) {
                    return invalid("Enter a valid email address.");
                }
                Ok(AuthSubmission::Register(RegisterRequest {
                    username: username.to_string(),
                    password: self.password.clone(),
                    email: (!email.is_empty()).then(|| email.to_string()),
                    role: self.role,
                }))
            }
            AuthMode::Forgot => {
                if username.is_empty() && email.is_empty() {
                    return invalid("Enter your username or email.");
                }
                if !email.is_empty() && !is_valid_email(email) {
                    return invalid("Enter a valid email address.");
                }
                Ok(AuthSubmission::Forgot(ForgotRequest {
                    username: (!username.is_empty()).then(|| username.to_string()),
                    email: (!email.is_empty()).then(|| email.to_string()),
                }))
            }
            AuthMode::Reset => {
                let token = self.reset_token.trim();
                if token.is_empty() {
                    return invalid("Reset token is required.");
                }
                check_new_password(&self.new_password, &self.confirm_password)?;
                Ok(AuthSubmission::Reset {
                    token: token.to_string(),
                    new_password: self.new_password.clone(),
                })
            }
        }
    }
}

impl Reducible for AuthFlow {
    type Action = AuthAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        let mut next = (*self).clone();
        match action {
            AuthAction::SwitchMode(mode) => next.switch(mode),
            AuthAction::Edit(field, value) => {
                let slot = match field {
                    AuthField::Username => &mut next.username,
                    AuthField::Password => &mut next.password,
                    AuthField::ConfirmPassword => &mut next.confirm_password,
                    AuthField::Email => &mut next.email,
                    AuthField::ResetToken => &mut next.reset_token,
                    AuthField::NewPassword => &mut next.new_password,
                };
                *slot = value;
            }
            AuthAction::SetRole(role) => next.role = role,
            AuthAction::Submitting => {
                next.busy = true;
                next.error = None;
                next.notice = None;
            }
            AuthAction::Failed(message) => {
                next.busy = false;
                next.error = Some(message);
            }
            AuthAction::LoggedIn => {
                next.busy = false;
                next.password.clear();
            }
            AuthAction::Registered(message) => {
                next.busy = false;
                next.switch(AuthMode::Login);
                next.notice = Some(message);
            }
            AuthAction::ForgotSent(response) => {
                next.busy = false;
                match response.reset_token.filter(|_| next.accept_dev_token) {
                    Some(token) => {
                        next.switch(AuthMode::Reset);
                        next.reset_token = token;
                        next.notice =
                            Some("Reset token received. Choose a new password.".to_string());
                    }
                    None => {
                        next.switch(AuthMode::Login);
                        next.notice = Some(response.message.unwrap_or_else(|| {
                            "If the account exists, we sent instructions.".to_string()
                        }));
                    }
                }
            }
            AuthAction::PasswordReset(message) => {
                next.busy = false;
                next.switch(AuthMode::Login);
                next.notice = Some(message);
            }
        }
        Rc::new(next)
    }
}

fn check_new_password(password: &str, confirm: &str) -> Result<(), AppError> {
    if password.chars().count() < Config::MIN_PASSWORD_LEN {
        return Err(AppError::Validation(
            "Password must be at least 6 characters.".to_string(),
        ));
    }
    if password != confirm {
        return Err(AppError::Validation("Passwords do not match.".to_string()));
    }
    Ok(())
}

/// Loose shape check: `local@domain.tld`, no whitespace.
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
        }
        None => false,
    }
}

/// Sends a validated form and maps the outcome to the next action.
/// Login success also returns the stored session.
pub async fn perform<T: Transport>(
    api: &ApiClient<T>,
    submission: AuthSubmission,
) -> (AuthAction, Option<Session>) {
    let result = match submission {
        AuthSubmission::Login { username, password } => api
            .login(&username, &password)
            .await
            .map(|session| (AuthAction::LoggedIn, Some(session))),
        AuthSubmission::Register(request) => api
            .register(&request)
            .await
            .map(|message| (AuthAction::Registered(message), None)),
        AuthSubmission::Forgot(request) => api
            .forgot_password(&request)
            .await
            .map(|response| (AuthAction::ForgotSent(response), None)),
        AuthSubmission::Reset {
            token,
            new_password,
        } => api
            .reset_password(&token, &new_password)
            .await
            .map(|message| (AuthAction::PasswordReset(message), None)),
    };

    result.unwrap_or_else(|e| (AuthAction::Failed(e.to_string()), None))
}

/// Handle returned by `use_auth_flow`
#[derive(Clone, PartialEq)]
pub struct AuthFlowHandle {
    pub flow: UseReducerHandle<AuthFlow>,
    pub dispatch: Callback<AuthAction>,
    pub submit: Callback<()>,
}

/// Login page state machine wired to the shared API client.
#[hook]
pub fn use_auth_flow(reset_token: Option<String>, on_login: Callback<Session>) -> AuthFlowHandle {
    let flow = use_reducer(move || AuthFlow::new(reset_token));
    let api = use_api();

    let dispatch = {
        let flow = flow.clone();
        Callback::from(move |action| flow.dispatch(action))
    };

    let submit = {
        let flow = flow.clone();
        Callback::from(move |()| {
            if flow.busy {
                return;
            }
            let submission = match flow.validate() {
                Ok(submission) => submission,
                Err(e) => return flow.dispatch(AuthAction::Failed(e.to_string())),
            };
            let api = match require_api(api.as_ref()) {
                Ok(api) => api,
                Err(e) => return flow.dispatch(AuthAction::Failed(e.to_string())),
            };

            flow.dispatch(AuthAction::Submitting);
            let flow = flow.clone();
            let on_login = on_login.clone();
            spawn_local(async move {
                let (action, session) = perform(&api, submission).await;
                flow.dispatch(action);
                if let Some(session) = session {
                    on_login.emit(session);
                }
            });
        })
    };

    AuthFlowHandle {
        flow,
        dispatch,
        submit,
    }
}

/// `token` query parameter of the current page, if any.
pub fn reset_token_from_url() -> Option<String> {
    let search = web_sys::window()?.location().search().ok()?;
    web_sys::UrlSearchParams::new_with_str(&search)
        .ok()?
        .get("token")
        .filter(|t| !t.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flow(mode: AuthMode) -> AuthFlow {
        let mut flow = AuthFlow::new(None);
        flow.switch(mode);
        flow
    }

    #[test]
    fn switching_mode_clears_secrets_and_messages() {
        let mut start = flow(AuthMode::Register);
        start.username = "alice".to_string();
        start.password = "secret1".to_string();
        start.confirm_password = "secret1".to_string();
        start.email = "alice@example.com".to_string();
        start.error = Some("old".to_string());

        let login = Rc::new(start).reduce(AuthAction::SwitchMode(AuthMode::Login));
        assert_eq!(login.username, "alice");
        assert!(login.password.is_empty());
        assert!(login.confirm_password.is_empty());
        assert!(login.email.is_empty());
        assert_eq!(login.error, None);

        let reset = login.reduce(AuthAction::SwitchMode(AuthMode::Reset));
        assert!(reset.username.is_empty());
    }

    #[test]
    fn register_validation_rules() {
        let mut form = flow(AuthMode::Register);
        form.username = "al".to_string();
        form.password = "secret1".to_string();
        form.confirm_password = "secret1".to_string();
        assert!(matches!(form.validate(), Err(AppError::Validation(_))));

        form.username = "alice".to_string();
        form.confirm_password = "secret2".to_string();
        assert_eq!(
            form.validate(),
            Err(AppError::Validation("Passwords do not match.".to_string()))
        );

        form.confirm_password = "secret1".to_string();
        form.email = "not-an-email".to_string();
        assert!(form.validate().is_err());

        form.email = String::new();
        match form.validate() {
            Ok(AuthSubmission::Register(request)) => {
                assert_eq!(request.username, "alice");
                assert_eq!(request.email, None);
                assert_eq!(request.role, Role::Viewer);
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn forgot_requires_username_or_email() {
        let mut form = flow(AuthMode::Forgot);
        assert!(form.validate().is_err());

        form.email = "ops@example.com".to_string();
        assert_eq!(
            form.validate(),
            Ok(AuthSubmission::Forgot(ForgotRequest {
                username: None,
                email: Some("ops@example.com".to_string()),
            }))
        );
    }

    #[test]
    fn forgot_with_token_moves_to_reset_when_accepted() {
        let response = ForgotResponse {
            message: Some("sent".to_string()),
            reset_token: Some("tok-1".to_string()),
        };

        let accepted = Rc::new(flow(AuthMode::Forgot).with_dev_tokens(true))
            .reduce(AuthAction::ForgotSent(response.clone()));
        assert_eq!(accepted.mode, AuthMode::Reset);
        assert_eq!(accepted.reset_token, "tok-1");

        let ignored = Rc::new(flow(AuthMode::Forgot).with_dev_tokens(false))
            .reduce(AuthAction::ForgotSent(response));
        assert_eq!(ignored.mode, AuthMode::Login);
        assert_eq!(ignored.notice.as_deref(), Some("sent"));
        assert!(ignored.reset_token.is_empty());
    }

    #[test]
    fn email_shape() {
        assert!(is_valid_email("a@b.io"));
        assert!(!is_valid_email("a@b"));
        assert!(!is_valid_email("@b.io"));
        assert!(!is_valid_email("a b@c.io"));
        assert!(!is_valid_email("a@@b.io"));
    }
}
