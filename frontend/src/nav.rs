use std::cell::Cell;
use std::rc::Rc;

use log::{debug, info};
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement, KeyboardEvent};

use crate::config::selectors;
use crate::dom::{self, Listener};
use crate::error::SetupError;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MenuState {
    #[default]
    Closed,
    Open,
}

impl MenuState {
    pub fn toggled(self) -> Self {
        match self {
            MenuState::Closed => MenuState::Open,
            MenuState::Open => MenuState::Closed,
        }
    }

    pub fn is_open(self) -> bool {
        self == MenuState::Open
    }

    /// Next state for `event`, or `None` when the event leaves the menu alone.
    pub fn on(self, event: MenuEvent) -> Option<Self> {
        match (event, self) {
            (MenuEvent::Toggle, _) => Some(self.toggled()),
            (MenuEvent::LinkClick, _) => Some(MenuState::Closed),
            (MenuEvent::Escape, MenuState::Open) => Some(MenuState::Closed),
            (MenuEvent::Escape, MenuState::Closed) => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MenuEvent {
    Toggle,
    LinkClick,
    Escape,
}

/// Inline style for each of the three hamburger bars. Open turns them into a cross.
pub fn bar_styles(state: MenuState) -> [(&'static str, &'static str); 3] {
    match state {
        MenuState::Open => [
            ("transform", "rotate(45deg) translateY(7px)"),
            ("opacity", "0"),
            ("transform", "rotate(-45deg) translateY(-7px)"),
        ],
        MenuState::Closed => [
            ("transform", "none"),
            ("opacity", "1"),
            ("transform", "none"),
        ],
    }
}

/// Where focus should jump when Tab leaves the menu's focusable range, if anywhere.
pub fn focus_wrap(active: Option<usize>, count: usize, backwards: bool) -> Option<usize> {
    let last = count.checked_sub(1)?;
    match (active, backwards) {
        (Some(0), true) => Some(last),
        (Some(i), false) if i == last => Some(0),
        _ => None,
    }
}

struct Menu {
    menu: Element,
    toggle: Element,
    state: Cell<MenuState>,
}

impl Menu {
    fn apply(&self, next: MenuState) {
        self.state.set(next);
        dom::set_class(&self.menu, "active", next.is_open());
        let bars = dom::query_all_in(&self.toggle, "span");
        for (bar, (property, value)) in bars.iter().zip(bar_styles(next)) {
            dom::set_style(bar, property, value);
        }
    }

    fn handle(&self, event: MenuEvent) {
        if let Some(next) = self.state.get().on(event) {
            debug!("Menu {:?} after {:?}", next, event);
            self.apply(next);
        }
    }
}

pub struct NavController {
    _listeners: Vec<Listener>,
}

/// Wires the mobile menu. Pages without a toggle get no menu behavior at all.
pub fn install(document: &Document) -> Result<Option<NavController>, SetupError> {
    let (Some(toggle), Some(menu)) = (
        dom::query(document, selectors::NAV_TOGGLE),
        dom::query(document, selectors::NAV_MENU),
    ) else {
        info!("No nav toggle on this page, skipping mobile menu");
        return Ok(None);
    };

    let menu = Rc::new(Menu {
        menu,
        toggle: toggle.clone(),
        state: Cell::new(MenuState::Closed),
    });
    let mut listeners = Vec::new();

    {
        let menu = menu.clone();
        listeners.push(Listener::new(&toggle, "click", move |_| menu.handle(MenuEvent::Toggle))?);
    }

    for link in dom::query_all(document, selectors::NAV_LINKS) {
        let menu = menu.clone();
        listeners.push(Listener::new(&link, "click", move |_| menu.handle(MenuEvent::LinkClick))?);
    }

    {
        let menu = menu.clone();
        listeners.push(Listener::new(document, "keydown", move |event| {
            let Some(key) = event.dyn_ref::<KeyboardEvent>() else { return };
            if key.key() == "Escape" {
                menu.handle(MenuEvent::Escape);
            }
        })?);
    }

    let focusable = dom::query_all_in(&menu.menu, selectors::NAV_FOCUSABLE);
    if !focusable.is_empty() {
        let document = document.clone();
        listeners.push(Listener::new(&menu.menu, "keydown", move |event| {
            let Some(key) = event.dyn_ref::<KeyboardEvent>() else { return };
            if key.key() != "Tab" {
                return;
            }
            let active = document.active_element();
            let position = focusable.iter().position(|el| Some(el) == active.as_ref());
            if let Some(target) = focus_wrap(position, focusable.len(), key.shift_key()) {
                event.prevent_default();
                if let Some(el) = focusable[target].dyn_ref::<HtmlElement>() {
                    let _ = el.focus();
                }
            }
        })?);
    }

    Ok(Some(NavController {
        _listeners: listeners,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn odd_toggles_open_even_toggles_close() {
        for presses in 1..=7 {
            let state = (0..presses).fold(MenuState::Closed, |s, _| s.toggled());
            assert_eq!(state.is_open(), presses % 2 == 1, "after {presses} presses");
        }
    }

    #[test]
    fn link_click_always_closes() {
        for presses in 0..=6 {
            let state = (0..presses).fold(MenuState::Closed, |s, _| s.toggled());
            assert_eq!(state.on(MenuEvent::LinkClick), Some(MenuState::Closed), "after {presses} presses");
        }
    }

    #[test]
    fn escape_only_acts_while_open() {
        assert_eq!(MenuState::Open.on(MenuEvent::Escape), Some(MenuState::Closed));
        assert_eq!(MenuState::Closed.on(MenuEvent::Escape), None);
    }

    #[test]
    fn toggle_event_flips_state() {
        assert_eq!(MenuState::Closed.on(MenuEvent::Toggle), Some(MenuState::Open));
        assert_eq!(MenuState::Open.on(MenuEvent::Toggle), Some(MenuState::Closed));
    }

    #[test]
    fn bars_form_cross_only_when_open() {
        assert_eq!(bar_styles(MenuState::Open)[1], ("opacity", "0"));
        assert_eq!(bar_styles(MenuState::Closed)[1], ("opacity", "1"));
        assert_eq!(bar_styles(MenuState::Closed)[0], ("transform", "none"));
    }

    #[test]
    fn tab_wraps_at_both_ends() {
        assert_eq!(focus_wrap(Some(3), 4, false), Some(0));
        assert_eq!(focus_wrap(Some(0), 4, true), Some(3));
    }

    #[test]
    fn tab_inside_range_is_left_alone() {
        assert_eq!(focus_wrap(Some(1), 4, false), None);
        assert_eq!(focus_wrap(Some(3), 4, true), None);
        assert_eq!(focus_wrap(None, 4, false), None);
        assert_eq!(focus_wrap(Some(0), 0, true), None);
    }
}
