use std::rc::Rc;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use crate::components::{AuthPage, Dashboard};
use crate::hooks::ApiContext;
use crate::models::auth::{Session, UserProfile};
use crate::services::api::{ApiClient, ApiConfig};
use crate::services::session::{BrowserSession, SessionStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Login,
    Dashboard,
}

#[function_component(App)]
pub fn app() -> Html {
    let route = use_state(|| {
        if BrowserSession.is_authenticated() {
            Route::Dashboard
        } else {
            Route::Login
        }
    });
    let user = use_state(|| BrowserSession.user());

    // One client for the lifetime of the page; a 401 anywhere sends the user
    // back to the login form.
    let api = {
        let route = route.setter();
        let user = user.setter();
        use_memo((), move |_| {
            let on_unauthorized = Callback::from(move |()| {
                user.set(None);
                route.set(Route::Login);
            });
            ApiClient::new(ApiConfig::default(), Rc::new(BrowserSession))
                .map(|client| ApiContext(Rc::new(client.on_unauthorized(on_unauthorized))))
        })
    };

    // Refresh the stored profile when resuming a session.
    {
        let api = api.clone();
        let user = user.setter();
        use_effect_with(*route, move |route| {
            if let (Route::Dashboard, Ok(ctx)) = (route, api.as_ref()) {
                let client = ctx.0.clone();
                spawn_local(async move {
                    match client.current_user().await {
                        Ok(profile) => user.set(Some(profile)),
                        Err(e) => log::warn!("Could not refresh profile: {e}"),
                    }
                });
            }
            || ()
        });
    }

    let on_login = {
        let route = route.setter();
        let user = user.setter();
        Callback::from(move |session: Session| {
            log::info!("Signed in as {}", session.user.username);
            user.set(Some(session.user));
            route.set(Route::Dashboard);
        })
    };

    let on_logout = {
        let api = api.clone();
        let route = route.setter();
        let user = user.setter();
        Callback::from(move |()| {
            if let Ok(ctx) = api.as_ref() {
                let client = ctx.0.clone();
                spawn_local(async move { client.logout().await });
            }
            user.set(None::<UserProfile>);
            route.set(Route::Login);
        })
    };

    let ctx = match api.as_ref() {
        Ok(ctx) => ctx.clone(),
        Err(e) => {
            return html! {
                <div class="status error">
                    <p>{"❌ "}{e.to_string()}</p>
                </div>
            };
        }
    };

    html! {
        <ContextProvider<ApiContext> context={ctx}>
            {match *route {
                Route::Login => html! { <AuthPage {on_login} /> },
                Route::Dashboard => html! {
                    <Dashboard user={(*user).clone()} {on_logout} />
                },
            }}
            <style>
                {include_str!("style.css")}
            </style>
        </ContextProvider<ApiContext>>
    }
}
