use crate::models::error::AppError;
use futures::future::{AbortHandle, AbortRegistration, Abortable, LocalBoxFuture};
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use yew::Reducible;

/// Request state of one resource: the last committed payload, whether a
/// request is in flight and the last failure message.
#[derive(Debug)]
pub struct ResourceState<T> {
    pub data: Option<Rc<T>>,
    pub loading: bool,
    pub error: Option<String>,
}

impl<T> ResourceState<T> {
    /// State of a resource whose first request has not settled yet.
    pub const fn pending() -> Self {
        Self {
            data: None,
            loading: true,
            error: None,
        }
    }

    pub fn data(&self) -> Option<&T> {
        self.data.as_deref()
    }

    /// Settled without error and without data.
    pub const fn is_idle(&self) -> bool {
        !self.loading && self.error.is_none() && self.data.is_none()
    }
}

impl<T> Default for ResourceState<T> {
    fn default() -> Self {
        Self::pending()
    }
}

impl<T> Clone for ResourceState<T> {
    fn clone(&self) -> Self {
        Self {
            data: self.data.clone(),
            loading: self.loading,
            error: self.error.clone(),
        }
    }
}

// Payloads are shared, so identity is enough to decide whether to re-render.
impl<T> PartialEq for ResourceState<T> {
    fn eq(&self, other: &Self) -> bool {
        let same_data = match (&self.data, &other.data) {
            (Some(a), Some(b)) => Rc::ptr_eq(a, b),
            (None, None) => true,
            _ => false,
        };
        same_data && self.loading == other.loading && self.error == other.error
    }
}

pub enum ResourceAction<T> {
    /// A visible request started: data and error are cleared.
    Started,
    Succeeded(Rc<T>),
    Failed { message: String, keep_data: bool },
}

impl<T> Reducible for ResourceState<T> {
    type Action = ResourceAction<T>;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        match action {
            ResourceAction::Started => Rc::new(Self::pending()),
            ResourceAction::Succeeded(data) => Rc::new(Self {
                data: Some(data),
                loading: false,
                error: None,
            }),
            ResourceAction::Failed { message, keep_data } => Rc::new(Self {
                data: if keep_data { self.data.clone() } else { None },
                loading: false,
                error: Some(message),
            }),
        }
    }
}

/// What a failed request does to previously committed data.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ErrorPolicy {
    #[default]
    Clear,
    /// Keep showing the last good payload next to the error.
    KeepData,
}

/// Identifies one issued request; only the newest ticket may commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestTicket(u64);

/// Generation counter plus the abort handle of the in-flight request.
#[derive(Debug, Default)]
pub struct RequestTracker {
    generation: Cell<u64>,
    in_flight: RefCell<Option<AbortHandle>>,
}

impl RequestTracker {
    /// Supersedes whatever is in flight and issues a new ticket.
    pub fn begin(&self) -> (RequestTicket, AbortRegistration) {
        self.cancel();
        let (handle, registration) = AbortHandle::new_pair();
        *self.in_flight.borrow_mut() = Some(handle);
        (RequestTicket(self.generation.get()), registration)
    }

    /// Invalidates the current ticket and aborts its future.
    pub fn cancel(&self) {
        self.generation.set(self.generation.get().wrapping_add(1));
        if let Some(handle) = self.in_flight.take() {
            handle.abort();
        }
    }

    pub fn is_current(&self, ticket: RequestTicket) -> bool {
        self.generation.get() == ticket.0
    }
}

pub type Fetcher<T, D> = Rc<dyn Fn(D) -> LocalBoxFuture<'static, Result<T, AppError>>>;

/// One fetchable resource: a fetch function, the sink its outcomes are
/// dispatched to, and the staleness guard between them.
///
/// `load` and `refresh` return the future that settles the request; the
/// caller decides where to drive it (`spawn_local` in components, an
/// executor in tests).
pub struct Resource<T, D> {
    fetcher: RefCell<Fetcher<T, D>>,
    dispatch: Rc<dyn Fn(ResourceAction<T>)>,
    tracker: Rc<RequestTracker>,
    policy: ErrorPolicy,
}

impl<T: 'static, D: 'static> Resource<T, D> {
    pub fn new<F, S>(fetcher: F, dispatch: S, policy: ErrorPolicy) -> Self
    where
        F: Fn(D) -> LocalBoxFuture<'static, Result<T, AppError>> + 'static,
        S: Fn(ResourceAction<T>) + 'static,
    {
        Self {
            fetcher: RefCell::new(Rc::new(fetcher)),
            dispatch: Rc::new(dispatch),
            tracker: Rc::new(RequestTracker::default()),
            policy,
        }
    }

    /// Visible (re)load: clears data and raises the loading flag first.
    pub fn load(&self, deps: D) -> LocalBoxFuture<'static, ()> {
        (self.dispatch)(ResourceAction::Started);
        self.run(deps)
    }

    /// Background reload that leaves the current state on screen until it
    /// settles.
    pub fn refresh(&self, deps: D) -> LocalBoxFuture<'static, ()> {
        self.run(deps)
    }

    /// Replaces the fetch function used by later requests. In-flight
    /// requests keep the function they started with.
    pub fn set_fetcher<F>(&self, fetcher: F)
    where
        F: Fn(D) -> LocalBoxFuture<'static, Result<T, AppError>> + 'static,
    {
        *self.fetcher.borrow_mut() = Rc::new(fetcher);
    }

    /// Discards whatever is in flight, e.g. on unmount.
    pub fn cancel(&self) {
        self.tracker.cancel();
    }

    fn run(&self, deps: D) -> LocalBoxFuture<'static, ()> {
        let (ticket, registration) = self.tracker.begin();
        let fetch = Rc::clone(&self.fetcher.borrow());
        let request = Abortable::new(fetch(deps), registration);
        let tracker = Rc::clone(&self.tracker);
        let dispatch = Rc::clone(&self.dispatch);
        let keep_data = self.policy == ErrorPolicy::KeepData;

        Box::pin(async move {
            let result = request.await.unwrap_or(Err(AppError::Cancelled));
            if !tracker.is_current(ticket) {
                log::debug!("Discarding response from a superseded request");
                return;
            }
            match result {
                Ok(data) => dispatch(ResourceAction::Succeeded(Rc::new(data))),
                Err(e) if e.is_cancelled() => {}
                Err(e) => {
                    log::warn!("Resource request failed: {e}");
                    dispatch(ResourceAction::Failed {
                        message: e.to_string(),
                        keep_data,
                    });
                }
            }
        })
    }
}
