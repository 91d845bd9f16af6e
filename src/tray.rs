//! System tray — click-through release, always-on-top toggle, minimize, quit.

use tauri::{
    image::Image,
    menu::{MenuBuilder, MenuItemBuilder},
    tray::{TrayIconBuilder, TrayIconEvent},
    AppHandle, Manager,
};
use tracing::{debug, info, warn};

use crate::bootstrap;
use crate::commands_core::OverlayState;
use crate::shell::OVERLAY_LABEL;
use crate::window_layer;

/// Setup the system tray with icon and overlay menu
pub fn setup_tray(app: &AppHandle) -> Result<(), Box<dyn std::error::Error>> {
    info!("Setting up system tray...");

    let icon = Image::from_bytes(include_bytes!("../icons/32x32.png"))
        .unwrap_or_else(|_| Image::new_owned(vec![255u8; 32 * 32 * 4], 32, 32));

    let release_item =
        MenuItemBuilder::with_id("release_click_through", "Disable Click-through").build(app)?;
    let on_top_item =
        MenuItemBuilder::with_id("toggle_on_top", "Toggle Always on Top").build(app)?;
    let minimize_item = MenuItemBuilder::with_id("minimize", "Minimize").build(app)?;
    let quit_item = MenuItemBuilder::with_id("quit", "Quit").build(app)?;

    let menu = MenuBuilder::new(app)
        .item(&release_item)
        .item(&on_top_item)
        .item(&minimize_item)
        .separator()
        .item(&quit_item)
        .build()?;

    let _tray = TrayIconBuilder::new()
        .icon(icon)
        .tooltip("BigTree Overlay")
        .menu(&menu)
        .on_menu_event(move |app, event| {
            let Some(window) = app.get_webview_window(OVERLAY_LABEL) else {
                if event.id().as_ref() == "quit" {
                    app.exit(0);
                }
                return;
            };
            let state = app.state::<OverlayState>();
            let layer = window_layer::for_window(&window);

            match event.id().as_ref() {
                "release_click_through" => {
                    info!("Tray: releasing click-through");
                    if state.set_click_through(&layer, false).is_ok() {
                        if let Err(e) = window.eval(&bootstrap::sync_click_through_script(false)) {
                            warn!("Tray: failed to sync page toggle: {}", e);
                        }
                    }
                }
                "toggle_on_top" => match state.toggle_always_on_top(&layer) {
                    Ok(on) => info!("Tray: always-on-top now {}", on),
                    Err(e) => warn!("Tray: failed to toggle always-on-top: {}", e),
                },
                "minimize" => state.minimize(&layer),
                "quit" => {
                    info!("Quit triggered from tray");
                    app.exit(0);
                }
                _ => {}
            }
        })
        .on_tray_icon_event(|tray, event| {
            if let TrayIconEvent::Click { button, .. } = event {
                if button == tauri::tray::MouseButton::Left {
                    debug!("Tray icon clicked");
                    if let Some(window) = tray.app_handle().get_webview_window(OVERLAY_LABEL) {
                        let _ = window.unminimize();
                        let _ = window.show();
                        let _ = window.set_focus();
                    }
                }
            }
        })
        .build(app)?;

    info!("System tray setup complete");
    Ok(())
}
