//! Key-value storage seam over the browser Web Storage API.
//!
//! Every persisted blob in the app (cart, session credentials, notification
//! preferences) goes through [`KeyValueStore`] so holders can be constructed
//! against an in-memory store in tests and on the host.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// Serialized cart/order state.
pub const CART_KEY: &str = "taproom-cart";
/// Session credentials blob (`{ token, email?, password? }`).
pub const SESSION_KEY: &str = "taproom-session";
/// Notification preferences (sound on/off, cached permission).
pub const PREFS_KEY: &str = "taproom-prefs";

/// Minimal string key-value store.
///
/// Reads and writes are synchronous; failures (quota, disabled storage) are
/// swallowed - persistence is best-effort, the in-memory state stays
/// authoritative for the tab.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
}

/// In-memory store used in tests and as the host-side stand-in.
#[derive(Default, Clone)]
pub struct MemoryStore {
    entries: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
    }

    fn remove(&self, key: &str) {
        self.entries.borrow_mut().remove(key);
    }
}

/// Browser `localStorage` (survives tab close).
#[cfg(target_arch = "wasm32")]
#[derive(Clone, Copy, Default)]
pub struct LocalStore;

#[cfg(target_arch = "wasm32")]
impl KeyValueStore for LocalStore {
    fn get(&self, key: &str) -> Option<String> {
        web_sys::window()?.local_storage().ok()??.get_item(key).ok()?
    }

    fn set(&self, key: &str, value: &str) {
        if let Some(Ok(Some(storage))) = web_sys::window().map(|w| w.local_storage()) {
            let _ = storage.set_item(key, value);
        }
    }

    fn remove(&self, key: &str) {
        if let Some(Ok(Some(storage))) = web_sys::window().map(|w| w.local_storage()) {
            let _ = storage.remove_item(key);
        }
    }
}

/// Browser `sessionStorage` (scoped to the tab).
#[cfg(target_arch = "wasm32")]
#[derive(Clone, Copy, Default)]
pub struct SessionStore;

#[cfg(target_arch = "wasm32")]
impl KeyValueStore for SessionStore {
    fn get(&self, key: &str) -> Option<String> {
        web_sys::window()?.session_storage().ok()??.get_item(key).ok()?
    }

    fn set(&self, key: &str, value: &str) {
        if let Some(Ok(Some(storage))) = web_sys::window().map(|w| w.session_storage()) {
            let _ = storage.set_item(key, value);
        }
    }

    fn remove(&self, key: &str) {
        if let Some(Ok(Some(storage))) = web_sys::window().map(|w| w.session_storage()) {
            let _ = storage.remove_item(key);
        }
    }
}

/// Durable store for the current target (localStorage in the browser).
pub fn durable() -> Rc<dyn KeyValueStore> {
    #[cfg(target_arch = "wasm32")]
    {
        Rc::new(LocalStore)
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        Rc::new(MemoryStore::new())
    }
}

/// Tab-scoped store for the current target (sessionStorage in the browser).
pub fn tab_scoped() -> Rc<dyn KeyValueStore> {
    #[cfg(target_arch = "wasm32")]
    {
        Rc::new(SessionStore)
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        Rc::new(MemoryStore::new())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_round_trips() {
        let store = MemoryStore::new();
        assert_eq!(store.get(CART_KEY), None);

        store.set(CART_KEY, "{}");
        assert_eq!(store.get(CART_KEY).as_deref(), Some("{}"));

        store.remove(CART_KEY);
        assert_eq!(store.get(CART_KEY), None);
    }

    #[test]
    fn memory_store_clones_share_entries() {
        let store = MemoryStore::new();
        let other = store.clone();
        store.set(SESSION_KEY, "blob");
        assert_eq!(other.get(SESSION_KEY).as_deref(), Some("blob"));
    }
}
