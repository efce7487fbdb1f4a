use yew::prelude::*;

use crate::components::budgets::BudgetsTab;
use crate::components::insights::Insights;
use crate::components::overview::Overview;
use crate::components::provider_tab::ProviderTab;
use crate::hooks::use_api::use_health;
use crate::hooks::use_costs::use_providers;
use crate::models::auth::UserProfile;

#[derive(Debug, Clone, PartialEq)]
enum Tab {
    Overview,
    Provider(AttrValue),
    Insights,
    Budgets,
}

#[derive(Properties, PartialEq)]
pub struct DashboardProps {
    pub user: Option<UserProfile>,
    pub on_logout: Callback<()>,
}

#[function_component(Dashboard)]
pub fn dashboard(props: &DashboardProps) -> Html {
    let tab = use_state(|| Tab::Overview);
    let providers = use_providers();
    let health = use_health();

    let select = |target: Tab| {
        let tab = tab.clone();
        Callback::from(move |_: MouseEvent| tab.set(target.clone()))
    };
    let tab_button = |target: Tab, label: String| {
        let active = *tab == target;
        html! {
            <button class={classes!("tab", active.then_some("active"))} onclick={select(target)}>
                {label}
            </button>
        }
    };

    let health_badge = match health.data() {
        Some(status) if status.ok => html! { <span class="health ok" title={status.service.clone()}>{"API online"}</span> },
        _ if health.loading => Html::default(),
        _ => html! { <span class="health down">{"API unreachable"}</span> },
    };

    let content = match &*tab {
        Tab::Overview => html! { <Overview /> },
        Tab::Provider(name) => html! { <ProviderTab key={name.to_string()} provider={name.clone()} /> },
        Tab::Insights => html! { <Insights /> },
        Tab::Budgets => html! { <BudgetsTab /> },
    };

    html! {
        <div class="app-container">
            <header class="app-header">
                <h1>{"Cloud Cost Dashboard"}</h1>
                <div class="header-actions">
                    {health_badge}
                    if let Some(user) = &props.user {
                        <span class="user-badge">
                            {format!("{} ({})", user.username, user.role.label())}
                        </span>
                    }
                    <button class="logout-button" onclick={props.on_logout.reform(|_: MouseEvent| ())}>
                        {"Log out"}
                    </button>
                </div>
            </header>

            <nav class="tab-bar">
                {tab_button(Tab::Overview, "Overview".to_string())}
                if let Some(list) = providers.data() {
                    { for list.iter().map(|p| tab_button(Tab::Provider(p.name.clone().into()), p.label())) }
                }
                {tab_button(Tab::Insights, "Insights".to_string())}
                {tab_button(Tab::Budgets, "Budgets".to_string())}
            </nav>
            if let Some(error) = &providers.error {
                <p class="inline-error">{format!("Could not load providers: {error}")}</p>
            }

            <main class="app-main">
                {content}
            </main>
        </div>
    }
}
