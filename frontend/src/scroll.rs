use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement, Window};

use crate::config::{self, selectors};
use crate::dom::{self, Listener};
use crate::error::SetupError;
use crate::schedule::Debounce;

/// Everything that depends only on the vertical scroll offset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollEffects {
    pub navbar_scrolled: bool,
    pub show_scroll_top: bool,
    pub parallax_offset: f64,
}

impl ScrollEffects {
    pub fn at(offset: f64) -> Self {
        Self {
            navbar_scrolled: offset > config::NAV_SCROLLED_THRESHOLD,
            show_scroll_top: offset > config::SCROLL_TOP_THRESHOLD,
            parallax_offset: offset * config::PARALLAX_SPEED,
        }
    }
}

/// Vertical extent of a page section, in document pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extent {
    pub top: f64,
    pub height: f64,
}

impl Extent {
    fn contains(&self, y: f64) -> bool {
        y >= self.top && y < self.top + self.height
    }
}

/// Index of the section under the active-section probe line, first match in document order.
pub fn active_section(offset: f64, sections: &[Extent]) -> Option<usize> {
    let probe = offset + config::ACTIVE_SECTION_OFFSET;
    sections.iter().position(|section| section.contains(probe))
}

struct ScrollTargets {
    window: Window,
    navbar: Option<Element>,
    links: Vec<Element>,
    sections: Vec<HtmlElement>,
    parallax: Vec<Element>,
}

impl ScrollTargets {
    fn update(&self) {
        let offset = self.window.scroll_y().unwrap_or(0.0);
        let effects = ScrollEffects::at(offset);

        if let Some(navbar) = &self.navbar {
            dom::set_class(navbar, "scrolled", effects.navbar_scrolled);
        }

        let transform = format!("translateY({}px)", effects.parallax_offset);
        for el in &self.parallax {
            dom::set_style(el, "transform", &transform);
        }

        let extents: Vec<Extent> = self
            .sections
            .iter()
            .map(|section| Extent {
                top: section.offset_top() as f64,
                height: section.offset_height() as f64,
            })
            .collect();
        // Nothing under the probe keeps the previous highlight.
        if let Some(index) = active_section(offset, &extents) {
            let anchor = format!("#{}", self.sections[index].id());
            for link in &self.links {
                let is_active = link.get_attribute("href").as_deref() == Some(anchor.as_str());
                dom::set_class(link, "active", is_active);
            }
        }
    }
}

pub struct ScrollController {
    _listener: Listener,
}

pub fn install(window: &Window, document: &Document) -> Result<ScrollController, SetupError> {
    let targets = ScrollTargets {
        window: window.clone(),
        navbar: dom::query(document, selectors::NAVBAR),
        links: dom::query_all(document, selectors::NAV_LINKS),
        sections: dom::query_all(document, selectors::SECTIONS)
            .into_iter()
            .filter_map(|el| el.dyn_into::<HtmlElement>().ok())
            .collect(),
        parallax: dom::query_all(document, selectors::PARALLAX),
    };
    let debounce = Debounce::new(config::SCROLL_DEBOUNCE_MS, move || targets.update());
    let listener = Listener::new(window, "scroll", move |_| debounce.trigger())?;

    Ok(ScrollController {
        _listener: listener,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thresholds_are_strict() {
        for offset in [0.0, 50.0, 100.0, 100.5, 499.0, 500.0, 501.0, 2000.0] {
            let effects = ScrollEffects::at(offset);
            assert_eq!(effects.navbar_scrolled, offset > 100.0, "offset {offset}");
            assert_eq!(effects.show_scroll_top, offset > 500.0, "offset {offset}");
        }
    }

    #[test]
    fn parallax_moves_at_half_speed() {
        assert_eq!(ScrollEffects::at(0.0).parallax_offset, 0.0);
        assert_eq!(ScrollEffects::at(300.0).parallax_offset, 150.0);
    }

    fn layout() -> Vec<Extent> {
        vec![
            Extent { top: 0.0, height: 600.0 },
            Extent { top: 600.0, height: 800.0 },
            Extent { top: 1400.0, height: 400.0 },
        ]
    }

    #[test]
    fn probe_sits_150px_below_offset() {
        let sections = layout();
        assert_eq!(active_section(0.0, &sections), Some(0));
        assert_eq!(active_section(449.0, &sections), Some(0));
        assert_eq!(active_section(450.0, &sections), Some(1));
        assert_eq!(active_section(1250.0, &sections), Some(2));
    }

    #[test]
    fn probe_past_last_section_matches_nothing() {
        assert_eq!(active_section(1700.0, &layout()), None);
    }

    #[test]
    fn exactly_one_section_matches_inside_layout() {
        let sections = layout();
        for offset in (0..1650).step_by(25) {
            let probe = offset as f64 + 150.0;
            let matches = sections.iter().filter(|s| s.contains(probe)).count();
            assert_eq!(matches, 1, "offset {offset}");
            assert!(active_section(offset as f64, &sections).is_some());
        }
    }
}
