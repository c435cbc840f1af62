use std::cell::RefCell;
use std::rc::{Rc, Weak};

use chrono::Local;
use gloo_timers::callback::{Interval, Timeout};
use log::{debug, info};
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement, KeyboardEvent, Window};

use crate::config::{self, selectors};
use crate::dom::{self, Listener};
use crate::error::SetupError;
use crate::storage::{BrowserSession, SessionStore};

const MS_PER_SECOND: i64 = 1_000;
const MS_PER_MINUTE: i64 = 60 * MS_PER_SECOND;
const MS_PER_HOUR: i64 = 60 * MS_PER_MINUTE;
const MS_PER_DAY: i64 = 24 * MS_PER_HOUR;

/// Remaining time split into display units. Days are uncapped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Remaining {
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
}

impl Remaining {
    /// `None` once the deadline has passed.
    pub fn from_millis(ms: i64) -> Option<Self> {
        if ms < 0 {
            return None;
        }
        Some(Self {
            days: ms / MS_PER_DAY,
            hours: (ms % MS_PER_DAY) / MS_PER_HOUR,
            minutes: (ms % MS_PER_HOUR) / MS_PER_MINUTE,
            seconds: (ms % MS_PER_MINUTE) / MS_PER_SECOND,
        })
    }

    pub fn render(&self) -> [String; 4] {
        [self.days, self.hours, self.minutes, self.seconds].map(|n| format!("{:02}", n))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Tick {
    Running { fields: [String; 4], changed: [bool; 4] },
    /// Fields read "00" and the popup goes away after `dismiss_after_ms`.
    Expired { dismiss_after_ms: u32 },
}

/// Tracks what the four fields currently show so only changed ones flip.
#[derive(Debug, Clone)]
pub struct Countdown {
    shown: [String; 4],
}

impl Countdown {
    pub fn new(shown: [String; 4]) -> Self {
        Self { shown }
    }

    pub fn tick(&mut self, remaining_ms: i64) -> Tick {
        match Remaining::from_millis(remaining_ms) {
            Some(remaining) => {
                let fields = remaining.render();
                let changed = std::array::from_fn(|i| fields[i] != self.shown[i]);
                self.shown = fields.clone();
                Tick::Running { fields, changed }
            }
            None => {
                self.shown = std::array::from_fn(|_| "00".to_string());
                Tick::Expired {
                    dismiss_after_ms: config::EXPIRED_DISMISS_DELAY_MS,
                }
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PopupState {
    NotYetShown,
    Shown,
    /// Terminal for the rest of the page view.
    Dismissed,
}

pub struct CountdownPopup<S> {
    store: S,
    state: PopupState,
}

impl<S: SessionStore> CountdownPopup<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            state: PopupState::NotYetShown,
        }
    }

    pub fn state(&self) -> PopupState {
        self.state
    }

    /// Delay before the popup should open, or `None` if it stays hidden this view.
    pub fn on_load(&self, now_ms: i64, deadline_ms: i64) -> Option<u32> {
        let ended = now_ms >= deadline_ms;
        let already_shown = self.store.get(config::POPUP_SESSION_KEY).is_some();
        (!ended && !already_shown).then_some(config::POPUP_OPEN_DELAY_MS)
    }

    /// Returns true if the popup just became visible.
    pub fn show(&mut self) -> bool {
        if self.state != PopupState::NotYetShown {
            return false;
        }
        self.state = PopupState::Shown;
        self.store.set(config::POPUP_SESSION_KEY, "true");
        true
    }

    /// User dismissal; only meaningful while the popup is visible.
    pub fn dismiss(&mut self) -> bool {
        if self.state != PopupState::Shown {
            return false;
        }
        self.state = PopupState::Dismissed;
        true
    }

    /// Forced dismissal at the end of the countdown, from any state.
    /// Returns true if the popup was visible.
    pub fn expire(&mut self) -> bool {
        let was_shown = self.state == PopupState::Shown;
        self.state = PopupState::Dismissed;
        was_shown
    }
}

struct PopupView {
    popup: Element,
    body: Option<HtmlElement>,
    fields: [Element; 4],
    machine: RefCell<CountdownPopup<BrowserSession>>,
    countdown: RefCell<Countdown>,
    deadline_ms: i64,
}

impl PopupView {
    fn open(&self) {
        if self.machine.borrow_mut().show() {
            info!("Showing countdown popup");
            dom::set_class(&self.popup, "active", true);
            if let Some(body) = &self.body {
                let _ = body.style().set_property("overflow", "hidden");
            }
        }
    }

    fn close(&self) {
        if self.machine.borrow_mut().dismiss() {
            debug!("Countdown popup {:?}", self.machine.borrow().state());
            self.hide();
        }
    }

    fn expire(&self) {
        if self.machine.borrow_mut().expire() {
            self.hide();
        }
    }

    fn hide(&self) {
        dom::set_class(&self.popup, "active", false);
        if let Some(body) = &self.body {
            let _ = body.style().remove_property("overflow");
        }
    }
}

fn flip(field: &Element, value: &str) {
    dom::set_class(field, "flip", true);
    field.set_text_content(Some(value));
    let field = field.clone();
    Timeout::new(config::FLIP_DURATION_MS, move || {
        dom::set_class(&field, "flip", false);
    })
    .forget();
}

fn tick(view: &Rc<PopupView>, finish: &Rc<RefCell<Option<Timeout>>>, ticker: &Weak<RefCell<Option<Interval>>>) {
    // Already expired, waiting for the final dismissal.
    if finish.borrow().is_some() {
        return;
    }
    let remaining = view.deadline_ms - Local::now().timestamp_millis();
    let outcome = view.countdown.borrow_mut().tick(remaining);
    match outcome {
        Tick::Running { fields, changed } => {
            for ((field, value), changed) in view.fields.iter().zip(&fields).zip(changed) {
                if changed {
                    flip(field, value);
                }
            }
        }
        Tick::Expired { dismiss_after_ms } => {
            for field in &view.fields {
                field.set_text_content(Some("00"));
            }
            let view = view.clone();
            let ticker = ticker.clone();
            let timeout = Timeout::new(dismiss_after_ms, move || {
                info!("Countdown finished, closing popup");
                view.expire();
                if let Some(ticker) = ticker.upgrade() {
                    ticker.borrow_mut().take();
                }
            });
            *finish.borrow_mut() = Some(timeout);
        }
    }
}

/// Countdown popup plus its once-per-second ticker.
pub struct CountdownController {
    _listeners: Vec<Listener>,
    _open: Option<Timeout>,
    _ticker: Rc<RefCell<Option<Interval>>>,
    _finish: Rc<RefCell<Option<Timeout>>>,
}

pub fn install(window: &Window, document: &Document) -> Result<CountdownController, SetupError> {
    let popup = dom::require(document, selectors::POPUP)?;
    let close = dom::require_in(&popup, selectors::POPUP_CLOSE)?;
    let overlay = dom::require_in(&popup, selectors::POPUP_OVERLAY)?;
    let [days, hours, minutes, seconds] = selectors::COUNTDOWN_FIELDS;
    let fields = [
        document.get_element_by_id(days).ok_or(SetupError::MissingElement(days))?,
        document.get_element_by_id(hours).ok_or(SetupError::MissingElement(hours))?,
        document.get_element_by_id(minutes).ok_or(SetupError::MissingElement(minutes))?,
        document.get_element_by_id(seconds).ok_or(SetupError::MissingElement(seconds))?,
    ];
    let shown = std::array::from_fn(|i| fields[i].text_content().unwrap_or_default());
    let deadline_ms = config::popup_deadline()?.timestamp_millis();

    let view = Rc::new(PopupView {
        popup,
        body: document.body(),
        fields,
        machine: RefCell::new(CountdownPopup::new(BrowserSession::open(window))),
        countdown: RefCell::new(Countdown::new(shown)),
        deadline_ms,
    });

    let open = view
        .machine
        .borrow()
        .on_load(Local::now().timestamp_millis(), deadline_ms)
        .map(|delay| {
            let view = view.clone();
            Timeout::new(delay, move || view.open())
        });

    let mut listeners = Vec::new();
    for target in [&close, &overlay] {
        let view = view.clone();
        listeners.push(Listener::new(target, "click", move |_| view.close())?);
    }
    {
        let view = view.clone();
        listeners.push(Listener::new(document, "keydown", move |event| {
            if let Some(key) = event.dyn_ref::<KeyboardEvent>() {
                if key.key() == "Escape" {
                    view.close();
                }
            }
        })?);
    }

    let ticker: Rc<RefCell<Option<Interval>>> = Rc::new(RefCell::new(None));
    let finish: Rc<RefCell<Option<Timeout>>> = Rc::new(RefCell::new(None));
    tick(&view, &finish, &Rc::downgrade(&ticker));
    let interval = {
        let view = view.clone();
        let finish = finish.clone();
        let weak = Rc::downgrade(&ticker);
        Interval::new(config::COUNTDOWN_TICK_MS, move || tick(&view, &finish, &weak))
    };
    *ticker.borrow_mut() = Some(interval);

    Ok(CountdownController {
        _listeners: listeners,
        _open: open,
        _ticker: ticker,
        _finish: finish,
    })
}

/// Console reminder of how long until the event itself.
pub fn reminder_message(remaining_ms: i64) -> Option<String> {
    if remaining_ms <= 0 {
        return None;
    }
    let days = remaining_ms / MS_PER_DAY;
    let hours = (remaining_ms % MS_PER_DAY) / MS_PER_HOUR;
    Some(format!("Event in {} days and {} hours", days, hours))
}

pub struct EventReminder {
    _interval: Interval,
}

pub fn install_reminder() -> Result<EventReminder, SetupError> {
    let event_ms = config::event_date()?.timestamp_millis();
    let remind = move || {
        if let Some(message) = reminder_message(event_ms - Local::now().timestamp_millis()) {
            info!("{}", message);
        }
    };
    remind();
    Ok(EventReminder {
        _interval: Interval::new(config::EVENT_REMINDER_INTERVAL_MS, remind),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    const DEADLINE: i64 = 1_760_486_400_000;

    fn fresh() -> [String; 4] {
        std::array::from_fn(|_| String::new())
    }

    #[test]
    fn splits_one_of_each_unit() {
        let remaining = Remaining::from_millis(90_061 * 1_000).unwrap();
        assert_eq!(remaining.render(), ["01", "01", "01", "01"]);
    }

    #[test]
    fn days_are_uncapped_and_units_wrap() {
        let ms = 123 * MS_PER_DAY + 23 * MS_PER_HOUR + 59 * MS_PER_MINUTE + 59 * MS_PER_SECOND + 999;
        let remaining = Remaining::from_millis(ms).unwrap();
        assert_eq!(remaining.render(), ["123", "23", "59", "59"]);
    }

    #[test]
    fn zero_remaining_is_still_running() {
        let mut countdown = Countdown::new(fresh());
        assert!(matches!(countdown.tick(0), Tick::Running { .. }));
    }

    #[test]
    fn negative_remaining_expires_and_dismisses_after_two_seconds() {
        let mut countdown = Countdown::new(fresh());
        assert_eq!(countdown.tick(-1), Tick::Expired { dismiss_after_ms: 2_000 });
        // Zeroed fields: a later running tick showing 00 everywhere flips nothing.
        assert_eq!(
            countdown.tick(0),
            Tick::Running {
                fields: std::array::from_fn(|_| "00".to_string()),
                changed: [false; 4],
            }
        );
    }

    #[test]
    fn only_changed_fields_flip() {
        let mut countdown = Countdown::new(fresh());
        countdown.tick(90_061_000);
        match countdown.tick(90_060_000) {
            Tick::Running { fields, changed } => {
                assert_eq!(fields, ["01", "01", "01", "00"]);
                assert_eq!(changed, [false, false, false, true]);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn never_shows_after_deadline() {
        for already_shown in [false, true] {
            let store = MemoryStore::default();
            if already_shown {
                store.set(config::POPUP_SESSION_KEY, "true");
            }
            let popup = CountdownPopup::new(store);
            assert_eq!(popup.on_load(DEADLINE, DEADLINE), None);
            assert_eq!(popup.on_load(DEADLINE + 1, DEADLINE), None);
        }
    }

    #[test]
    fn first_view_opens_after_one_second_and_sets_flag() {
        let store = MemoryStore::default();
        let mut popup = CountdownPopup::new(store.clone());
        assert_eq!(popup.on_load(DEADLINE - 10_000, DEADLINE), Some(1_000));
        assert!(popup.show());
        assert_eq!(popup.state(), PopupState::Shown);
        assert_eq!(store.get(config::POPUP_SESSION_KEY).as_deref(), Some("true"));

        let second_view = CountdownPopup::new(store);
        assert_eq!(second_view.on_load(DEADLINE - 5_000, DEADLINE), None);
    }

    #[test]
    fn dismissal_is_terminal() {
        let mut popup = CountdownPopup::new(MemoryStore::default());
        assert!(!popup.dismiss());
        popup.show();
        assert!(popup.dismiss());
        assert_eq!(popup.state(), PopupState::Dismissed);
        assert!(!popup.show());
        assert!(!popup.dismiss());
        assert_eq!(popup.state(), PopupState::Dismissed);
    }

    #[test]
    fn expiry_dismisses_from_any_state() {
        let mut hidden = CountdownPopup::new(MemoryStore::default());
        assert!(!hidden.expire());
        assert_eq!(hidden.state(), PopupState::Dismissed);
        assert!(!hidden.show());

        let mut visible = CountdownPopup::new(MemoryStore::default());
        visible.show();
        assert!(visible.expire());
        assert_eq!(visible.state(), PopupState::Dismissed);
    }

    #[test]
    fn reminder_only_before_event() {
        assert_eq!(
            reminder_message(2 * MS_PER_DAY + 5 * MS_PER_HOUR + 30 * MS_PER_MINUTE).as_deref(),
            Some("Event in 2 days and 5 hours")
        );
        assert_eq!(reminder_message(0), None);
        assert_eq!(reminder_message(-MS_PER_HOUR), None);
    }
}
