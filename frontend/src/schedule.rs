use std::cell::{Cell, RefCell};
use std::rc::Rc;

use gloo_timers::callback::Timeout;

/// Coalesces bursts of triggers into one call after `wait_ms` of quiet.
pub struct Debounce {
    wait_ms: u32,
    action: Rc<dyn Fn()>,
    pending: RefCell<Option<Timeout>>,
}

impl Debounce {
    pub fn new<F>(wait_ms: u32, action: F) -> Self
    where
        F: Fn() + 'static,
    {
        Self {
            wait_ms,
            action: Rc::new(action),
            pending: RefCell::new(None),
        }
    }

    pub fn trigger(&self) {
        let action = self.action.clone();
        let timeout = Timeout::new(self.wait_ms, move || action());
        // Replacing the old timeout drops it, which clears it.
        *self.pending.borrow_mut() = Some(timeout);
    }
}

/// Owner side of a cancellation flag for spawned async work.
/// Dropping it tells every `Alive` handle to stop.
pub struct Lifetime {
    alive: Rc<Cell<bool>>,
}

#[derive(Clone)]
pub struct Alive(Rc<Cell<bool>>);

impl Lifetime {
    pub fn new() -> Self {
        Self {
            alive: Rc::new(Cell::new(true)),
        }
    }

    pub fn alive(&self) -> Alive {
        Alive(self.alive.clone())
    }
}

impl Drop for Lifetime {
    fn drop(&mut self) {
        self.alive.set(false);
    }
}

impl Alive {
    pub fn is_alive(&self) -> bool {
        self.0.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dropping_lifetime_stops_handles() {
        let lifetime = Lifetime::new();
        let alive = lifetime.alive();
        let other = alive.clone();
        assert!(alive.is_alive());
        drop(lifetime);
        assert!(!alive.is_alive());
        assert!(!other.is_alive());
    }
}
