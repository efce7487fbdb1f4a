use web_sys::{HtmlInputElement, HtmlSelectElement};
use yew::prelude::*;

use crate::hooks::use_auth::{
    AuthAction, AuthField, AuthFlow, AuthMode, reset_token_from_url, use_auth_flow,
};
use crate::models::auth::{Role, Session};

#[derive(Properties, PartialEq)]
pub struct AuthPageProps {
    pub on_login: Callback<Session>,
}

/// Sign in, registration and password recovery.
#[function_component(AuthPage)]
pub fn auth_page(props: &AuthPageProps) -> Html {
    let deep_link = use_memo((), |_| reset_token_from_url());
    let auth = use_auth_flow((*deep_link).clone(), props.on_login.clone());
    let flow: &AuthFlow = &auth.flow;

    let input = |field: AuthField| {
        let dispatch = auth.dispatch.clone();
        Callback::from(move |e: InputEvent| {
            let target: HtmlInputElement = e.target_unchecked_into();
            dispatch.emit(AuthAction::Edit(field, target.value()));
        })
    };
    let switch = |mode: AuthMode| {
        let dispatch = auth.dispatch.clone();
        Callback::from(move |e: MouseEvent| {
            e.prevent_default();
            dispatch.emit(AuthAction::SwitchMode(mode));
        })
    };
    let on_submit = {
        let submit = auth.submit.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            submit.emit(());
        })
    };
    let on_role = {
        let dispatch = auth.dispatch.clone();
        Callback::from(move |e: Event| {
            let target: HtmlSelectElement = e.target_unchecked_into();
            if let Ok(role) = target.value().parse::<Role>() {
                dispatch.emit(AuthAction::SetRole(role));
            }
        })
    };

    let username_field = html! {
        <label>
            {"Username"}
            <input type="text" autocomplete="username"
                value={flow.username.clone()} oninput={input(AuthField::Username)} />
        </label>
    };
    let email_field = |label: &'static str| html! {
        <label>
            {label}
            <input type="email" autocomplete="email"
                value={flow.email.clone()} oninput={input(AuthField::Email)} />
        </label>
    };
    let confirm_field = html! {
        <label>
            {"Confirm password"}
            <input type="password" autocomplete="new-password"
                value={flow.confirm_password.clone()} oninput={input(AuthField::ConfirmPassword)} />
        </label>
    };

    let fields = match flow.mode {
        AuthMode::Login => html! {
            <>
                {username_field}
                <label>
                    {"Password"}
                    <input type="password" autocomplete="current-password"
                        value={flow.password.clone()} oninput={input(AuthField::Password)} />
                </label>
            </>
        },
        AuthMode::Register => html! {
            <>
                {username_field}
                {email_field("Email (optional)")}
                <label>
                    {"Password"}
                    <input type="password" autocomplete="new-password"
                        value={flow.password.clone()} oninput={input(AuthField::Password)} />
                </label>
                {confirm_field}
                <label>
                    {"Role"}
                    <select onchange={on_role}>
                        { for Role::all().into_iter().map(|role| html! {
                            <option value={role.as_str()} selected={role == flow.role}>{role.label()}</option>
                        }) }
                    </select>
                </label>
            </>
        },
        AuthMode::Forgot => html! {
            <>
                {username_field}
                {email_field("Or email")}
            </>
        },
        AuthMode::Reset => html! {
            <>
                <label>
                    {"Reset token"}
                    <input type="text"
                        value={flow.reset_token.clone()} oninput={input(AuthField::ResetToken)} />
                </label>
                <label>
                    {"New password"}
                    <input type="password" autocomplete="new-password"
                        value={flow.new_password.clone()} oninput={input(AuthField::NewPassword)} />
                </label>
                {confirm_field}
            </>
        },
    };

    let submit_label = match flow.mode {
        AuthMode::Login => "Sign in",
        AuthMode::Register => "Register",
        AuthMode::Forgot => "Send reset instructions",
        AuthMode::Reset => "Set new password",
    };

    html! {
        <div class="auth-page">
            <form class="auth-card" onsubmit={on_submit}>
                <h1>{"Cloud Cost Dashboard"}</h1>
                <h2>{flow.mode.title()}</h2>

                if let Some(notice) = &flow.notice {
                    <p class="auth-notice">{notice}</p>
                }
                if let Some(error) = &flow.error {
                    <p class="auth-error" role="alert">{error}</p>
                }

                {fields}

                <button type="submit" class="primary" disabled={flow.busy}>
                    { if flow.busy { "Please wait..." } else { submit_label } }
                </button>

                <nav class="auth-links">
                    if flow.mode != AuthMode::Login {
                        <a href="#" onclick={switch(AuthMode::Login)}>{"Back to sign in"}</a>
                    }
                    if flow.mode == AuthMode::Login {
                        <a href="#" onclick={switch(AuthMode::Register)}>{"Create an account"}</a>
                        <a href="#" onclick={switch(AuthMode::Forgot)}>{"Forgot password?"}</a>
                    }
                </nav>
            </form>
        </div>
    }
}
