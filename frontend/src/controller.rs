use log::{debug, info, warn};

use crate::countdown::{self, CountdownController, EventReminder};
use crate::dom;
use crate::effects::{self, Affordances};
use crate::error::SetupError;
use crate::nav::{self, NavController};
use crate::reveal::{self, RevealAnimator};
use crate::scroll::{self, ScrollController};

/// Owns every listener, observer and timer the page installs. Dropping it
/// (through `teardown`) detaches all of them.
pub struct PageController {
    _nav: Option<NavController>,
    _scroll: Option<ScrollController>,
    _reveal: Option<RevealAnimator>,
    _countdown: Option<CountdownController>,
    _reminder: Option<EventReminder>,
    _affordances: Option<Affordances>,
}

fn feature<T>(name: &str, result: Result<T, SetupError>) -> Option<T> {
    match result {
        Ok(feature) => {
            debug!("{} ready", name);
            Some(feature)
        }
        Err(err) => {
            warn!("{} disabled: {}", name, err);
            None
        }
    }
}

impl PageController {
    pub fn install() -> Result<Self, SetupError> {
        let window = dom::window()?;
        let document = dom::document()?;

        Ok(Self {
            _nav: feature("navigation", nav::install(&document)).flatten(),
            _scroll: feature("scroll effects", scroll::install(&window, &document)),
            _reveal: feature("reveal animations", reveal::install(&document)),
            _countdown: feature("countdown popup", countdown::install(&window, &document)),
            _reminder: feature("event reminder", countdown::install_reminder()),
            _affordances: feature("page affordances", effects::install(&window, &document)),
        })
    }

    pub fn teardown(self) {
        info!("Tearing down page controller");
    }
}
