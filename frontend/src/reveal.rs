use gloo_timers::future::TimeoutFuture;
use log::debug;
use wasm_bindgen_futures::spawn_local;
use web_sys::{Document, Element};

use crate::config::{self, selectors};
use crate::dom::{self, Observer};
use crate::error::SetupError;
use crate::schedule::{Alive, Lifetime};

/// Text shown for a counter value. Only the 40 and 50 stats carry a "+".
pub fn format_count(value: u32, target: u32) -> String {
    let suffix = if target == 40 || target == 50 { "+" } else { "" };
    format!("{}{}", value, suffix)
}

/// Reads the counter target from a stat's text. Only a plain integer,
/// optionally followed by "+", counts; anything else is left as written.
pub fn parse_target(text: &str) -> Option<u32> {
    let number = text.trim();
    let number = number.strip_suffix('+').unwrap_or(number);
    if number.is_empty() || !number.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    number.parse().ok()
}

/// Linear count-up from zero, one item per step. The last item is always
/// the exact target.
#[derive(Debug, Clone)]
pub struct CounterAnimation {
    target: u32,
    increment: f64,
    current: f64,
    finished: bool,
}

impl CounterAnimation {
    pub fn new(target: u32, duration_ms: u32, step_ms: u32) -> Self {
        let steps = duration_ms as f64 / step_ms.max(1) as f64;
        Self {
            target,
            increment: target as f64 / steps,
            current: 0.0,
            finished: false,
        }
    }
}

impl Iterator for CounterAnimation {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        if self.finished {
            return None;
        }
        self.current += self.increment;
        if self.current >= self.target as f64 {
            self.finished = true;
            Some(format_count(self.target, self.target))
        } else {
            Some(format_count(self.current.floor() as u32, self.target))
        }
    }
}

async fn run_counter(display: Element, target: u32, alive: Alive) {
    let frames = CounterAnimation::new(target, config::COUNTER_DURATION_MS, config::COUNTER_STEP_MS);
    for frame in frames {
        TimeoutFuture::new(config::COUNTER_STEP_MS).await;
        if !alive.is_alive() {
            return;
        }
        display.set_text_content(Some(&frame));
    }
}

/// Reveal-on-view sections and count-up statistics.
pub struct RevealAnimator {
    _sections: Observer,
    _stats: Observer,
    _counters: Lifetime,
}

pub fn install(document: &Document) -> Result<RevealAnimator, SetupError> {
    let sections = Observer::new(
        config::REVEAL_THRESHOLD,
        Some(config::REVEAL_ROOT_MARGIN),
        |section| dom::set_class(section, "animate-in", true),
    )?;
    for section in dom::query_all(document, selectors::REVEAL) {
        sections.observe(&section);
    }

    let counters = Lifetime::new();
    let alive = counters.alive();
    let stats = Observer::new(config::COUNTER_THRESHOLD, None, move |stat| {
        let display = dom::query_in(stat, selectors::STAT_VALUE).unwrap_or_else(|| stat.clone());
        let text = display.text_content().unwrap_or_default();
        if let Some(target) = parse_target(&text) {
            debug!("Counting up to {}", target);
            spawn_local(run_counter(display, target, alive.clone()));
        }
    })?;
    for stat in dom::query_all(document, selectors::STATS) {
        stats.observe(&stat);
    }

    Ok(RevealAnimator {
        _sections: sections,
        _stats: stats,
        _counters: counters,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn value_of(frame: &str) -> u32 {
        frame.trim_end_matches('+').parse().unwrap()
    }

    #[test]
    fn counts_to_forty_plus_without_overshoot() {
        let frames: Vec<String> = CounterAnimation::new(40, 2000, 16).collect();
        assert_eq!(frames.last().map(String::as_str), Some("40+"));
        let values: Vec<u32> = frames.iter().map(|f| value_of(f)).collect();
        assert!(values.windows(2).all(|w| w[0] <= w[1]));
        assert!(values.iter().all(|&v| v <= 40));
        assert!(frames.iter().all(|f| f.ends_with('+')));
    }

    #[test]
    fn other_targets_have_no_suffix() {
        let frames: Vec<String> = CounterAnimation::new(25, 2000, 16).collect();
        assert_eq!(frames.last().map(String::as_str), Some("25"));
        assert!(frames.iter().all(|f| !f.ends_with('+')));
    }

    #[test]
    fn runs_for_about_the_duration() {
        let steps = CounterAnimation::new(50, 2000, 16).count();
        assert!((124..=126).contains(&steps), "{steps} steps");
    }

    #[test]
    fn zero_target_finishes_immediately() {
        let frames: Vec<String> = CounterAnimation::new(0, 2000, 16).collect();
        assert_eq!(frames, vec!["0".to_string()]);
    }

    #[test]
    fn parses_target_from_decorated_text() {
        assert_eq!(parse_target("40+"), Some(40));
        assert_eq!(parse_target(" 50 "), Some(50));
        assert_eq!(parse_target("Years"), None);
    }

    #[test]
    fn ignores_text_that_is_not_a_single_integer() {
        assert_eq!(parse_target("24/7"), None);
        assert_eq!(parse_target("1.5K"), None);
        assert_eq!(parse_target("+"), None);
        assert_eq!(parse_target("-3"), None);
    }
}
