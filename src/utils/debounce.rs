use gloo::events::EventListener;
use gloo_timers::callback::Timeout;
use std::cell::RefCell;
use std::rc::Rc;

/// Window resize listener that runs `callback` only once resizing has been
/// quiet for `delay_ms`.
///
/// Returns `None` when there is no window to listen on. The listener is
/// detached when dropped, so keep it alive for as long as the owning
/// component is mounted:
///
/// ```rust,ignore
/// use_effect_with(container_ref.clone(), move |container_ref| {
///     let listener = debounced_resize_listener(move || redraw(), Config::RESIZE_DEBOUNCE_MS);
///     move || drop(listener)
/// });
/// ```
pub fn debounced_resize_listener<F>(callback: F, delay_ms: u32) -> Option<EventListener>
where
    F: Fn() + 'static,
{
    let window = web_sys::window()?;
    let pending: Rc<RefCell<Option<Timeout>>> = Rc::new(RefCell::new(None));
    let callback = Rc::new(callback);

    Some(EventListener::new(&window, "resize", move |_| {
        // Dropping a Timeout cancels it.
        pending.borrow_mut().take();

        let cb = Rc::clone(&callback);
        *pending.borrow_mut() = Some(Timeout::new(delay_ms, move || cb()));
    }))
}
