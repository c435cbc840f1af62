//! Small page affordances that need no state of their own: smooth in-page
//! scrolling, card hover, click tracking, staggered cards, pulsing ticket
//! buttons, lazy images and the load-time reveal of the hero.

use gloo_timers::callback::{Interval, Timeout};
use log::{debug, info, warn};
use wasm_bindgen::JsCast;
use web_sys::js_sys::Reflect;
use web_sys::{Document, Element, Event, HtmlAnchorElement, HtmlElement, Window};

use crate::config::{self, selectors};
use crate::dom::{self, Listener};
use crate::error::SetupError;
use crate::tracking::{self, TrackEvent};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Trigger {
    Click,
    MouseEnter,
    MouseLeave,
}

impl Trigger {
    fn event(self) -> &'static str {
        match self {
            Trigger::Click => "click",
            Trigger::MouseEnter => "mouseenter",
            Trigger::MouseLeave => "mouseleave",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Label {
    Fixed(&'static str),
    Href,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Effect {
    Style {
        property: &'static str,
        value: &'static str,
    },
    ScrollToAnchor,
    Track {
        category: &'static str,
        action: &'static str,
        label: Label,
    },
}

struct Binding {
    selector: &'static str,
    trigger: Trigger,
    effect: Effect,
}

const BINDINGS: &[Binding] = &[
    Binding {
        selector: selectors::IN_PAGE_ANCHORS,
        trigger: Trigger::Click,
        effect: Effect::ScrollToAnchor,
    },
    Binding {
        selector: selectors::ARTIST_CARDS,
        trigger: Trigger::MouseEnter,
        effect: Effect::Style {
            property: "transform",
            value: "translateY(-10px) scale(1.02)",
        },
    },
    Binding {
        selector: selectors::ARTIST_CARDS,
        trigger: Trigger::MouseLeave,
        effect: Effect::Style {
            property: "transform",
            value: "translateY(0) scale(1)",
        },
    },
    Binding {
        selector: selectors::TRACKED_BUTTONS,
        trigger: Trigger::Click,
        effect: Effect::Track {
            category: "Button",
            action: "Click",
            label: Label::Fixed("Get Tickets"),
        },
    },
    Binding {
        selector: selectors::EXTERNAL_LINKS,
        trigger: Trigger::Click,
        effect: Effect::Track {
            category: "External Link",
            action: "Click",
            label: Label::Href,
        },
    },
];

/// Animation delay for the nth card of a staggered collection.
pub fn stagger_delay(index: usize) -> String {
    format!("{}s", index as f64 / 10.0)
}

/// Scroll position that puts `target_top` just below the fixed navbar.
pub fn anchor_scroll_top(target_top: i32, navbar_height: i32) -> f64 {
    (target_top - navbar_height) as f64
}

fn apply(effect: Effect, element: &Element, event: &Event) {
    match effect {
        Effect::Style { property, value } => dom::set_style(element, property, value),
        Effect::ScrollToAnchor => {
            event.prevent_default();
            scroll_to_anchor(element);
        }
        Effect::Track {
            category,
            action,
            label,
        } => {
            let label = match label {
                Label::Fixed(text) => text.to_string(),
                Label::Href => element
                    .dyn_ref::<HtmlAnchorElement>()
                    .map(|anchor| anchor.href())
                    .unwrap_or_default(),
            };
            tracking::track(&TrackEvent::new(category, action, label));
        }
    }
}

fn scroll_to_anchor(anchor: &Element) {
    let Some(href) = anchor.get_attribute("href") else { return };
    if href == "#" {
        return;
    }
    let (Ok(window), Ok(document)) = (dom::window(), dom::document()) else { return };
    let Some(target) = dom::query(&document, &href).and_then(|el| el.dyn_into::<HtmlElement>().ok())
    else {
        debug!("No scroll target for {}", href);
        return;
    };
    let navbar_height = dom::query(&document, selectors::NAVBAR)
        .and_then(|el| el.dyn_into::<HtmlElement>().ok())
        .map(|navbar| navbar.offset_height())
        .unwrap_or(0);
    dom::smooth_scroll_to(&window, anchor_scroll_top(target.offset_top(), navbar_height));
}

fn supports_native_lazy_loading(window: &Window) -> bool {
    Reflect::get(window, &"HTMLImageElement".into())
        .and_then(|ctor| Reflect::get(&ctor, &"prototype".into()))
        .and_then(|proto| Reflect::has(&proto, &"loading".into()))
        .unwrap_or(false)
}

fn load_lazy_images(window: &Window, document: &Document) -> Result<(), SetupError> {
    if supports_native_lazy_loading(window) {
        for image in dom::query_all(document, selectors::LAZY_IMAGES) {
            if let Some(src) = image.get_attribute("data-src") {
                image.set_attribute("src", &src)?;
            }
        }
        return Ok(());
    }
    info!("Native lazy loading unsupported, loading lazysizes");
    let script = document.create_element("script")?;
    script.set_attribute("src", config::LAZYSIZES_URL)?;
    let body = document.body().ok_or(SetupError::MissingElement("body"))?;
    body.append_child(&script)?;
    Ok(())
}

fn reveal_loaded_page(document: &Document) {
    if let Some(body) = document.body() {
        dom::set_class(&body, "loaded", true);
    }
    if let Some(hero) = dom::query(document, selectors::HERO_CONTENT) {
        dom::set_style(&hero, "opacity", "1");
    }
}

fn pulse(buttons: Vec<Element>) -> Interval {
    Interval::new(config::PULSE_INTERVAL_MS, move || {
        for button in &buttons {
            dom::set_style(button, "animation", "pulse 0.5s ease");
        }
        let buttons = buttons.clone();
        Timeout::new(config::PULSE_DURATION_MS, move || {
            for button in &buttons {
                dom::set_style(button, "animation", "");
            }
        })
        .forget();
    })
}

pub struct Affordances {
    _listeners: Vec<Listener>,
    _pulse: Option<Interval>,
}

pub fn install(window: &Window, document: &Document) -> Result<Affordances, SetupError> {
    let mut listeners = Vec::new();
    for binding in BINDINGS {
        for element in dom::query_all(document, binding.selector) {
            let target = element.clone();
            let effect = binding.effect;
            listeners.push(Listener::new(&element, binding.trigger.event(), move |event| {
                apply(effect, &target, &event)
            })?);
        }
    }

    for (index, card) in dom::query_all(document, selectors::DIRECTOR_CARDS).iter().enumerate() {
        dom::set_style(card, "animation-delay", &stagger_delay(index));
    }

    let buttons = dom::query_all(document, selectors::PULSE_BUTTONS);
    let pulsing = (!buttons.is_empty()).then(|| pulse(buttons));

    if let Err(err) = load_lazy_images(window, document) {
        warn!("Lazy images not set up: {}", err);
    }

    // The module may start after `load` already fired.
    if document.ready_state() == "complete" {
        reveal_loaded_page(document);
    } else {
        let document = document.clone();
        listeners.push(Listener::new(window, "load", move |_| reveal_loaded_page(&document))?);
    }

    Ok(Affordances {
        _listeners: listeners,
        _pulse: pulsing,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stagger_steps_by_a_tenth_of_a_second() {
        assert_eq!(stagger_delay(0), "0s");
        assert_eq!(stagger_delay(3), "0.3s");
        assert_eq!(stagger_delay(10), "1s");
    }

    #[test]
    fn anchor_lands_below_navbar() {
        assert_eq!(anchor_scroll_top(1200, 80), 1120.0);
        assert_eq!(anchor_scroll_top(40, 80), -40.0);
    }

    #[test]
    fn every_tracked_click_has_a_category() {
        let tracked: Vec<_> = BINDINGS
            .iter()
            .filter_map(|b| match b.effect {
                Effect::Track { category, .. } => Some((b.selector, b.trigger, category)),
                _ => None,
            })
            .collect();
        assert_eq!(tracked.len(), 2);
        assert!(tracked.iter().all(|(_, trigger, category)| *trigger == Trigger::Click && !category.is_empty()));
    }

    #[test]
    fn hover_lift_is_undone_on_leave() {
        let card_styles: Vec<_> = BINDINGS
            .iter()
            .filter(|b| b.selector == selectors::ARTIST_CARDS)
            .map(|b| b.trigger)
            .collect();
        assert_eq!(card_styles, vec![Trigger::MouseEnter, Trigger::MouseLeave]);
    }
}
