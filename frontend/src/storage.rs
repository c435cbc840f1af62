use log::warn;
use web_sys::{Storage, Window};

/// Key-value storage that lives for one browsing session.
pub trait SessionStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
}

/// `window.sessionStorage`. Storage can be unavailable (privacy modes,
/// sandboxed frames); reads then come back empty and writes are dropped.
pub struct BrowserSession {
    storage: Option<Storage>,
}

impl BrowserSession {
    pub fn open(window: &Window) -> Self {
        let storage = window.session_storage().ok().flatten();
        if storage.is_none() {
            warn!("sessionStorage unavailable, popup will show on every visit");
        }
        Self { storage }
    }
}

impl SessionStore for BrowserSession {
    fn get(&self, key: &str) -> Option<String> {
        self.storage
            .as_ref()
            .and_then(|storage| storage.get_item(key).ok())
            .flatten()
    }

    fn set(&self, key: &str, value: &str) {
        if let Some(storage) = &self.storage {
            let _ = storage.set_item(key, value);
        }
    }
}

#[cfg(test)]
pub use memory::MemoryStore;


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_is_shared_between_clones() {
        let first = MemoryStore::default();
        let second = first.clone();
        assert_eq!(second.get("k"), None);
        first.set("k", "true");
        assert_eq!(second.get("k").as_deref(), Some("true"));
    }
}
