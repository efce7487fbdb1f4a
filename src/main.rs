use cloud_cost_dashboard::App;

fn main() {
    console_error_panic_hook::set_once();
    if let Err(e) = console_log::init_with_level(log::Level::Info) {
        web_sys::console::warn_1(&format!("Logger unavailable: {e}").into());
    }
    yew::Renderer::<App>::new().render();
}
