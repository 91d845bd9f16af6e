//! Tauri command handlers
//!
//! Invoked from the overlay page through the `btOverlay*` globals installed by
//! the bootstrap script. The logic lives in `commands_core`; these are thin
//! Tauri wrappers. They are synchronous so they run on the main event loop.

use tauri::{State, WebviewWindow};
use tracing::debug;

use crate::commands_core::OverlayState;
use crate::window_layer;

/// Minimize the overlay window
#[tauri::command]
pub fn overlay_minimize(window: WebviewWindow, state: State<'_, OverlayState>) {
    debug!("[command:overlay_minimize] Invoked by page.");
    state.minimize(&window_layer::for_window(&window));
}

/// Enable or disable click-through; persisted only when applied
#[tauri::command]
pub fn overlay_set_click_through(
    window: WebviewWindow,
    state: State<'_, OverlayState>,
    on: bool,
) -> Result<(), String> {
    debug!("[command:overlay_set_click_through] on={}", on);
    state
        .set_click_through(&window_layer::for_window(&window), on)
        .map_err(|e| e.to_string())
}

/// Enable or disable always-on-top; persisted only when applied
#[tauri::command]
pub fn overlay_set_always_on_top(
    window: WebviewWindow,
    state: State<'_, OverlayState>,
    on: bool,
) -> Result<(), String> {
    debug!("[command:overlay_set_always_on_top] on={}", on);
    state
        .set_always_on_top(&window_layer::for_window(&window), on)
        .map_err(|e| e.to_string())
}
