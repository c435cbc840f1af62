use std::cell::RefCell;

use log::{error, info, warn};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::PageTransitionEvent;

mod config;
mod controller;
mod countdown;
mod dom;
mod effects;
mod error;
mod nav;
mod reveal;
mod schedule;
mod scroll;
mod scroll_top;
mod storage;
mod tracking;

use controller::PageController;
use error::SetupError;
use scroll_top::ScrollToTop;

thread_local! {
    static CONTROLLER: RefCell<Option<PageController>> = RefCell::new(None);
}

fn print_banner() {
    gloo_console::log!("%c🎵 IMMERSED - Jazz Concert 🎵", "font-size: 20px; font-weight: bold; color: #d4af76;");
    gloo_console::log!("%cFeaturing Niels Lan Doky - Knight of Jazz", "font-size: 14px; color: #666;");
    gloo_console::log!("%cNovember 15, 2025 | GEM CENTER", "font-size: 12px; color: #999;");
}

fn mount_scroll_to_top() -> Result<(), SetupError> {
    let document = dom::document()?;
    let body = document.body().ok_or(SetupError::MissingElement("body"))?;
    let host = document.create_element("div")?;
    body.append_child(&host)?;
    yew::Renderer::<ScrollToTop>::with_root(host).render();
    Ok(())
}

// Pages restored from the back/forward cache keep their controller.
fn teardown_on_pagehide() -> Result<(), SetupError> {
    let window = dom::window()?;
    let on_pagehide = Closure::wrap(Box::new(move |event: PageTransitionEvent| {
        if event.persisted() {
            return;
        }
        if let Some(controller) = CONTROLLER.with(|slot| slot.borrow_mut().take()) {
            controller.teardown();
        }
    }) as Box<dyn FnMut(PageTransitionEvent)>);
    window.add_event_listener_with_callback("pagehide", on_pagehide.as_ref().unchecked_ref())?;
    on_pagehide.forget();
    Ok(())
}

fn main() {
    // Initialize console error panic hook for better error messages
    console_error_panic_hook::set_once();

    // Initialize logging
    console_log::init_with_level(config::log_level()).expect("error initializing log");

    print_banner();
    info!("Starting page controller");

    match PageController::install() {
        Ok(controller) => CONTROLLER.with(|slot| *slot.borrow_mut() = Some(controller)),
        Err(err) => {
            error!("Page controller failed to start: {}", err);
            return;
        }
    }

    if let Err(err) = mount_scroll_to_top() {
        warn!("Scroll to top button unavailable: {}", err);
    }
    if let Err(err) = teardown_on_pagehide() {
        warn!("Teardown on pagehide not registered: {}", err);
    }
}
