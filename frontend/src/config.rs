use chrono::{DateTime, Local, NaiveDateTime};
use log::Level;

use crate::error::SetupError;

#[cfg(debug_assertions)]
pub fn log_level() -> Level {
    Level::Debug  // Verbose console output while developing locally
}

#[cfg(not(debug_assertions))]
pub fn log_level() -> Level {
    Level::Info
}

// Countdown popup closes for good once this passes (browser local time)
pub const POPUP_DEADLINE: &str = "2025-10-15T00:00:00";
pub const EVENT_DATE: &str = "2025-11-15T19:00:00";

pub const POPUP_SESSION_KEY: &str = "countdownPopupShown";

pub const NAV_SCROLLED_THRESHOLD: f64 = 100.0;
pub const SCROLL_TOP_THRESHOLD: f64 = 500.0;
pub const ACTIVE_SECTION_OFFSET: f64 = 150.0;
pub const PARALLAX_SPEED: f64 = 0.5;

pub const SCROLL_DEBOUNCE_MS: u32 = 10;
pub const POPUP_OPEN_DELAY_MS: u32 = 1_000;
pub const COUNTDOWN_TICK_MS: u32 = 1_000;
pub const FLIP_DURATION_MS: u32 = 600;
pub const EXPIRED_DISMISS_DELAY_MS: u32 = 2_000;
pub const COUNTER_DURATION_MS: u32 = 2_000;
pub const COUNTER_STEP_MS: u32 = 16;
pub const PULSE_INTERVAL_MS: u32 = 5_000;
pub const PULSE_DURATION_MS: u32 = 500;
pub const EVENT_REMINDER_INTERVAL_MS: u32 = 3_600_000;

pub const REVEAL_THRESHOLD: f64 = 0.1;
pub const REVEAL_ROOT_MARGIN: &str = "0px 0px -100px 0px";
pub const COUNTER_THRESHOLD: f64 = 0.5;

pub const LAZYSIZES_URL: &str =
    "https://cdnjs.cloudflare.com/ajax/libs/lazysizes/5.3.2/lazysizes.min.js";

pub mod selectors {
    pub const NAVBAR: &str = ".navbar";
    pub const NAV_TOGGLE: &str = ".nav-toggle";
    pub const NAV_MENU: &str = ".nav-menu";
    pub const NAV_LINKS: &str = ".nav-menu a";
    pub const NAV_FOCUSABLE: &str = "a, button";
    pub const SECTIONS: &str = "section[id]";
    pub const PARALLAX: &str = ".decorative-lines";
    pub const REVEAL: &str = ".about, .artists, .event-details, .living-heritage, .partners, .tickets";
    pub const STATS: &str = ".stat";
    pub const STAT_VALUE: &str = "h3";
    pub const IN_PAGE_ANCHORS: &str = "a[href^=\"#\"]";
    pub const ARTIST_CARDS: &str = ".artist-card";
    pub const DIRECTOR_CARDS: &str = ".director-card";
    pub const PULSE_BUTTONS: &str = ".hero-cta, .tickets-button";
    pub const TRACKED_BUTTONS: &str = ".hero-cta, .tickets-button, .cta-button";
    pub const EXTERNAL_LINKS: &str = "a[target=\"_blank\"]";
    pub const LAZY_IMAGES: &str = "img[loading=\"lazy\"]";
    pub const HERO_CONTENT: &str = ".hero-content";
    pub const POPUP: &str = "#countdown-popup";
    pub const POPUP_CLOSE: &str = ".countdown-close";
    pub const POPUP_OVERLAY: &str = ".countdown-popup-overlay";
    pub const COUNTDOWN_FIELDS: [&str; 4] = ["days", "hours", "minutes", "seconds"];
}

pub fn popup_deadline() -> Result<DateTime<Local>, SetupError> {
    local_instant(POPUP_DEADLINE)
}

pub fn event_date() -> Result<DateTime<Local>, SetupError> {
    local_instant(EVENT_DATE)
}

fn local_instant(text: &str) -> Result<DateTime<Local>, SetupError> {
    text.parse::<NaiveDateTime>()
        .ok()
        .and_then(|naive| naive.and_local_timezone(Local).earliest())
        .ok_or_else(|| SetupError::InvalidDate(text.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deadline_precedes_event() {
        let deadline = popup_deadline().unwrap();
        let event = event_date().unwrap();
        assert!(deadline < event);
    }

    #[test]
    fn rejects_malformed_instant() {
        assert!(matches!(
            local_instant("2025-13-40T00:00:00"),
            Err(SetupError::InvalidDate(_))
        ));
    }
}
