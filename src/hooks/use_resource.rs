use std::future::Future;
use std::ops::Deref;
use std::rc::Rc;

use futures::FutureExt;
use gloo_timers::callback::Interval;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use super::resource::{ErrorPolicy, Resource, ResourceState};
use crate::models::error::AppError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResourceOptions {
    /// Silent re-fetch period while mounted
    pub refresh_ms: Option<u32>,
    pub on_error: ErrorPolicy,
}

impl ResourceOptions {
    pub const fn polling(refresh_ms: u32) -> Self {
        Self {
            refresh_ms: Some(refresh_ms),
            on_error: ErrorPolicy::KeepData,
        }
    }
}

/// Handle returned by `use_resource`
pub struct ResourceHandle<T: 'static> {
    state: UseReducerHandle<ResourceState<T>>,
    /// Re-runs the fetch with the current arguments
    pub refetch: Callback<()>,
}

impl<T: 'static> Deref for ResourceHandle<T> {
    type Target = ResourceState<T>;

    fn deref(&self) -> &Self::Target {
        &self.state
    }
}

impl<T: 'static> Clone for ResourceHandle<T> {
    fn clone(&self) -> Self {
        Self {
            state: self.state.clone(),
            refetch: self.refetch.clone(),
        }
    }
}

impl<T: 'static> PartialEq for ResourceHandle<T> {
    fn eq(&self, other: &Self) -> bool {
        *self.state == *other.state && self.refetch == other.refetch
    }
}

/// Generic fetch-on-mount hook.
///
/// Loads on mount and whenever `deps` changes, discards responses from
/// superseded or unmounted requests, and optionally re-fetches silently on
/// an interval.
///
/// `fetch` is replaced on every render, so it may capture props or state
/// freely. `options.on_error` is read once, on mount.
#[hook]
pub fn use_resource<T, D, F, Fut>(deps: D, options: ResourceOptions, fetch: F) -> ResourceHandle<T>
where
    T: 'static,
    D: Clone + PartialEq + 'static,
    F: Fn(D) -> Fut + 'static,
    Fut: Future<Output = Result<T, AppError>> + 'static,
{
    let state = use_reducer(ResourceState::<T>::pending);

    let fetch = Rc::new(fetch);
    let resource = {
        let dispatcher = state.dispatcher();
        let fetch = Rc::clone(&fetch);
        use_memo((), move |_| {
            Resource::new(
                move |deps| fetch(deps).boxed_local(),
                move |action| dispatcher.dispatch(action),
                options.on_error,
            )
        })
    };
    // Later requests see this render's captures, not the first render's.
    resource.set_fetcher(move |deps| fetch(deps).boxed_local());

    let latest = use_mut_ref(|| deps.clone());
    *latest.borrow_mut() = deps.clone();

    {
        let resource = resource.clone();
        use_effect_with(deps, move |deps| {
            spawn_local(resource.load(deps.clone()));

            let poll = options.refresh_ms.map(|ms| {
                let resource = resource.clone();
                let deps = deps.clone();
                Interval::new(ms, move || spawn_local(resource.refresh(deps.clone())))
            });

            move || {
                resource.cancel();
                drop(poll);
            }
        });
    }

    let refetch = use_callback((), move |(), _| {
        let deps = latest.borrow().clone();
        spawn_local(resource.load(deps));
    });

    ResourceHandle { state, refetch }
}
