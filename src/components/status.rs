use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct StatusProps {
    pub loading: bool,
    pub error: Option<String>,
    /// True when the settled payload has nothing to show
    pub empty: bool,
    pub on_retry: Callback<()>,
    #[prop_or(AttrValue::Static("Nothing to show yet."))]
    pub empty_message: AttrValue,
    #[prop_or_default]
    pub children: Html,
}

/// Loading / error / empty / populated wrapper around a resource panel.
#[function_component(Status)]
pub fn status(props: &StatusProps) -> Html {
    if props.loading {
        return html! {
            <div class="status loading">
                <div class="spinner"></div>
                <p>{"Loading data..."}</p>
            </div>
        };
    }

    let error = props.error.as_ref().map(|msg| {
        let on_retry = props.on_retry.reform(|_: MouseEvent| ());
        html! {
            <div class="status error">
                <p>{"❌ "}{msg}</p>
                <button class="retry-button" onclick={on_retry}>{"Retry"}</button>
            </div>
        }
    });

    html! {
        <>
            {error}
            if props.empty {
                if props.error.is_none() {
                    <div class="status empty">
                        <p>{props.empty_message.clone()}</p>
                    </div>
                }
            } else {
                {props.children.clone()}
            }
        </>
    }
}
