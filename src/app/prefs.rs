//! Per-user browser preferences with localStorage persistence.
//!
//! Tracks the sound toggle and a snapshot of the browser notification
//! permission. Permission is requested once; the outcome is cached so the
//! app never re-prompts.

use std::rc::Rc;

use dioxus::prelude::*;
use serde::{Deserialize, Serialize};

use super::storage::{self, KeyValueStore};

/// Cached outcome of the one-time notification permission request.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum PermissionSnapshot {
    #[default]
    Unknown,
    Granted,
    Denied,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PrefsState {
    pub sound_enabled: bool,
    #[serde(default)]
    pub notifications: PermissionSnapshot,
}

impl Default for PrefsState {
    fn default() -> Self {
        Self {
            sound_enabled: true,
            notifications: PermissionSnapshot::Unknown,
        }
    }
}

/// Preference holder shared via context.
#[derive(Clone)]
pub struct PrefsContext {
    state: Signal<PrefsState>,
    store: Rc<dyn KeyValueStore>,
}

impl PrefsContext {
    pub fn load(store: Rc<dyn KeyValueStore>) -> Self {
        let initial = store
            .get(storage::PREFS_KEY)
            .and_then(|raw| serde_json::from_str(&raw).ok())
            .unwrap_or_default();
        Self {
            state: Signal::new(initial),
            store,
        }
    }

    pub fn sound_enabled(&self) -> bool {
        self.state.read().sound_enabled
    }

    pub fn toggle_sound(&self) {
        let mut state = self.state;
        state.with_mut(|s| s.sound_enabled = !s.sound_enabled);
        self.persist();
    }

    pub fn notifications(&self) -> PermissionSnapshot {
        self.state.read().notifications
    }

    pub fn set_notifications(&self, snapshot: PermissionSnapshot) {
        let mut state = self.state;
        state.with_mut(|s| s.notifications = snapshot);
        self.persist();
    }

    /// Ask the browser for notification permission once and cache the
    /// outcome. A denied or unavailable API only disables notifications.
    pub fn request_notification_permission(&self) {
        if self.notifications() != PermissionSnapshot::Unknown {
            return;
        }
        #[cfg(target_arch = "wasm32")]
        {
            use wasm_bindgen_futures::JsFuture;
            let ctx = self.clone();
            wasm_bindgen_futures::spawn_local(async move {
                let snapshot = match web_sys::Notification::request_permission() {
                    Ok(promise) => match JsFuture::from(promise).await {
                        Ok(value) => match value.as_string().as_deref() {
                            Some("granted") => PermissionSnapshot::Granted,
                            _ => PermissionSnapshot::Denied,
                        },
                        Err(_) => PermissionSnapshot::Denied,
                    },
                    Err(_) => PermissionSnapshot::Denied,
                };
                ctx.set_notifications(snapshot);
            });
        }
        #[cfg(not(target_arch = "wasm32"))]
        {
            self.set_notifications(PermissionSnapshot::Denied);
        }
    }

    fn persist(&self) {
        match serde_json::to_string(&*self.state.read()) {
            Ok(raw) => self.store.set(storage::PREFS_KEY, &raw),
            Err(e) => tracing::warn!("failed to serialize prefs: {e}"),
        }
    }
}

/// Initialize the preferences context provider - call once at app root.
pub fn use_prefs_provider() {
    use_context_provider(|| PrefsContext::load(storage::durable()));
}

/// Get the preferences context - use in any component.
pub fn use_prefs() -> PrefsContext {
    use_context::<PrefsContext>()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn default_prefs_have_sound_on_and_permission_unknown() {
        let prefs = PrefsState::default();
        assert!(prefs.sound_enabled);
        assert_eq!(prefs.notifications, PermissionSnapshot::Unknown);
    }

    #[test]
    fn prefs_round_trip_through_storage_blob() {
        let prefs = PrefsState {
            sound_enabled: false,
            notifications: PermissionSnapshot::Granted,
        };
        let raw = serde_json::to_string(&prefs).unwrap();
        let back: PrefsState = serde_json::from_str(&raw).unwrap();
        assert_eq!(back, prefs);

        // Older blob without the permission field.
        let old: PrefsState = serde_json::from_str(r#"{"soundEnabled":true}"#).unwrap();
        assert_eq!(old.notifications, PermissionSnapshot::Unknown);
    }
}
