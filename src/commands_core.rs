//! Platform-independent command logic
//!
//! These functions contain the actual toggle logic, free of `tauri::` types.
//! The Tauri command wrappers in `commands.rs` and the tray call into these.

use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::{info, warn};

use crate::bootstrap;
use crate::config::{Config, ConfigStore};
use crate::window_layer::{LayerError, WindowControl};

/// The one live copy of the settings plus where they are persisted.
pub struct OverlayState {
    config: Mutex<Config>,
    store: ConfigStore,
}

impl OverlayState {
    pub fn new(config: Config, store: ConfigStore) -> Self {
        Self {
            config: Mutex::new(config),
            store,
        }
    }

    fn lock(&self) -> MutexGuard<'_, Config> {
        self.config.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn snapshot(&self) -> Config {
        self.lock().clone()
    }

    /// Script that brings a freshly loaded page's toggle in line with the
    /// live click-through state. The injected bootstrap only knows the
    /// startup value, which is stale after a toggle followed by a reload.
    pub fn page_sync_script(&self) -> String {
        bootstrap::sync_click_through_script(self.snapshot().click_through)
    }

    /// Apply click-through natively; persist only if the native call succeeded.
    pub fn set_click_through(
        &self,
        control: &impl WindowControl,
        on: bool,
    ) -> Result<(), LayerError> {
        if let Err(e) = control.set_click_through(on) {
            warn!("Click-through {} not applied: {}", on, e);
            return Err(e);
        }
        let mut config = self.lock();
        config.click_through = on;
        self.store.save(&config);
        info!("Click-through set to {}", on);
        Ok(())
    }

    /// Apply always-on-top natively; persist only if the native call succeeded.
    pub fn set_always_on_top(
        &self,
        control: &impl WindowControl,
        on: bool,
    ) -> Result<(), LayerError> {
        if let Err(e) = control.set_always_on_top(on) {
            warn!("Always-on-top {} not applied: {}", on, e);
            return Err(e);
        }
        let mut config = self.lock();
        config.always_on_top = on;
        self.store.save(&config);
        info!("Always-on-top set to {}", on);
        Ok(())
    }

    /// Flip always-on-top, returning the new value.
    pub fn toggle_always_on_top(&self, control: &impl WindowControl) -> Result<bool, LayerError> {
        let next = !self.lock().always_on_top;
        self.set_always_on_top(control, next)?;
        Ok(next)
    }

    pub fn minimize(&self, control: &impl WindowControl) {
        if let Err(e) = control.minimize() {
            warn!("Minimize failed: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::tests::scratch_store;
    use crate::window_layer::tests::RecordingWindow;
    use crate::window_layer::WindowLayer;

    fn layer(fail: bool) -> (WindowLayer<RecordingWindow>, RecordingWindow) {
        let native = RecordingWindow {
            fail,
            ..Default::default()
        };
        (WindowLayer::new(Some(native.clone())), native)
    }

    #[test]
    fn test_click_through_success_persists() {
        let store = scratch_store("ct_ok");
        let state = OverlayState::new(Config::default(), store.clone());
        let (control, native) = layer(false);

        state.set_click_through(&control, true).unwrap();

        assert_eq!(*native.calls.borrow(), vec!["pass_through(true)"]);
        assert!(state.snapshot().click_through);
        assert!(store.load().click_through);
    }

    #[test]
    fn test_click_through_failure_is_not_persisted() {
        let store = scratch_store("ct_fail");
        let state = OverlayState::new(Config::default(), store.clone());
        let (control, _) = layer(true);

        assert!(state.set_click_through(&control, true).is_err());

        assert!(!state.snapshot().click_through);
        assert!(!store.path().exists());
    }

    #[test]
    fn test_always_on_top_failure_keeps_stored_value() {
        let store = scratch_store("top_fail");
        let state = OverlayState::new(Config::default(), store.clone());
        store.save(&state.snapshot());
        let (control, _) = layer(true);

        assert!(state.set_always_on_top(&control, false).is_err());

        assert!(state.snapshot().always_on_top);
        assert!(store.load().always_on_top);
    }

    #[test]
    fn test_toggle_always_on_top_flips_and_persists() {
        let store = scratch_store("top_toggle");
        let state = OverlayState::new(Config::default(), store.clone());
        let (control, native) = layer(false);

        assert!(!state.toggle_always_on_top(&control).unwrap());
        assert!(state.toggle_always_on_top(&control).unwrap());

        assert_eq!(*native.calls.borrow(), vec!["topmost(false)", "topmost(true)"]);
        assert!(store.load().always_on_top);
    }

    #[test]
    fn test_toggles_keep_other_fields() {
        let store = scratch_store("fields");
        let initial = Config {
            base_url: "http://h:9000".into(),
            api_key: "abc".into(),
            overlay: true,
            ..Default::default()
        };
        let state = OverlayState::new(initial.clone(), store.clone());
        let (control, _) = layer(false);

        state.set_click_through(&control, true).unwrap();

        let stored = store.load();
        assert_eq!(stored.base_url, initial.base_url);
        assert_eq!(stored.api_key, initial.api_key);
        assert!(stored.overlay);
        assert!(stored.click_through);
    }

    #[test]
    fn test_page_sync_follows_live_click_through() {
        let store = scratch_store("page_sync");
        let state = OverlayState::new(Config::default(), store);
        let (control, _) = layer(false);

        assert_eq!(state.page_sync_script(), bootstrap::sync_click_through_script(false));
        state.set_click_through(&control, true).unwrap();
        assert_eq!(state.page_sync_script(), bootstrap::sync_click_through_script(true));
    }

    #[test]
    fn test_page_sync_ignores_failed_toggle() {
        let store = scratch_store("page_sync_fail");
        let state = OverlayState::new(Config::default(), store);
        let (control, _) = layer(true);

        assert!(state.set_click_through(&control, true).is_err());
        assert_eq!(state.page_sync_script(), bootstrap::sync_click_through_script(false));
    }

    #[test]
    fn test_unavailable_window_still_persists() {
        let store = scratch_store("no_handle");
        let state = OverlayState::new(Config::default(), store.clone());
        let control: WindowLayer<RecordingWindow> = WindowLayer::new(None);

        state.set_click_through(&control, true).unwrap();
        state.minimize(&control);

        assert!(store.load().click_through);
    }
}
