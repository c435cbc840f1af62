use std::fmt;

use log::{debug, info};
use serde::Serialize;

/// Analytics event. No sink is wired up yet, events only go to the console.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrackEvent {
    pub category: String,
    pub action: String,
    pub label: String,
}

impl TrackEvent {
    pub fn new(category: &str, action: &str, label: impl Into<String>) -> Self {
        Self {
            category: category.to_string(),
            action: action.to_string(),
            label: label.into(),
        }
    }
}

impl fmt::Display for TrackEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {} - {}", self.category, self.action, self.label)
    }
}

pub fn track(event: &TrackEvent) {
    info!("Event: {}", event);
    if let Ok(payload) = serde_json::to_string(event) {
        debug!("tracking payload {}", payload);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_category_action_label() {
        let event = TrackEvent::new("Button", "Click", "Get Tickets");
        assert_eq!(event.to_string(), "Button - Click - Get Tickets");
    }

    #[test]
    fn serializes_all_fields() {
        let event = TrackEvent::new("External Link", "Click", "https://example.org/");
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["category"], "External Link");
        assert_eq!(value["action"], "Click");
        assert_eq!(value["label"], "https://example.org/");
    }
}
