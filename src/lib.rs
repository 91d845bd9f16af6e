//! BigTree Overlay Desktop
//!
//! Tauri shell that shows the remote BigTree overlay page in a native window
//! and adds always-on-top, click-through and minimize on top of it.

#![cfg_attr(
    all(not(debug_assertions), target_os = "windows"),
    windows_subsystem = "windows"
)]

pub mod bootstrap;
pub mod cli;
mod commands;
pub mod commands_core;
pub mod config;
pub mod shell;
mod tray;
pub mod window_layer;

use anyhow::Context;
use tauri::webview::PageLoadEvent;
use tauri::{Manager, RunEvent};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use crate::cli::Options;
use crate::commands_core::OverlayState;
use crate::config::ConfigStore;
use crate::shell::OVERLAY_LABEL;

/// Initialize logging based on debug/release mode; `RUST_LOG` overrides.
fn init_logging() {
    let default_level = if cfg!(debug_assertions) { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(cfg!(debug_assertions))
        .with_line_number(cfg!(debug_assertions))
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }
}

/// Main entry point
pub fn main() {
    init_logging();
    info!("Starting BigTree Overlay v{}", env!("CARGO_PKG_VERSION"));

    let options = Options::from_env();
    if let Err(e) = run(options) {
        error!("{:#}", e);
        std::process::exit(1);
    }
}

fn run(options: Options) -> anyhow::Result<()> {
    let store = ConfigStore::locate();
    info!("Config file: {}", store.path().display());

    let launch = shell::prepare(&options, &store)?;
    let state = OverlayState::new(launch.config.clone(), store);

    let app = tauri::Builder::default()
        .plugin(tauri_plugin_single_instance::init(|app, args, _cwd| {
            info!("Second instance started with args {:?}, focusing overlay", args);
            if let Some(window) = app.get_webview_window(OVERLAY_LABEL) {
                let _ = window.unminimize();
                let _ = window.show();
                let _ = window.set_focus();
            }
        }))
        .manage(state)
        // The init script carries the startup toggle; resync it on every load
        .on_page_load(|webview, payload| {
            if webview.label() != OVERLAY_LABEL || payload.event() != PageLoadEvent::Finished {
                return;
            }
            let script = webview.state::<OverlayState>().page_sync_script();
            if let Err(e) = webview.eval(&script) {
                warn!("Failed to sync page toggle after load: {}", e);
            }
        })
        .setup(move |app| {
            info!("Application setup starting...");
            let handle = app.handle().clone();

            shell::open_overlay_window(&handle, &launch)?;

            if let Err(e) = tray::setup_tray(&handle) {
                warn!("Failed to setup system tray: {}", e);
            }

            info!("Application setup complete");
            Ok(())
        })
        .invoke_handler(tauri::generate_handler![
            commands::overlay_minimize,
            commands::overlay_set_click_through,
            commands::overlay_set_always_on_top,
        ])
        .build(tauri::generate_context!())
        .context("error while building BigTree Overlay")?;

    app.run(|_app, event| {
        if let RunEvent::Exit = event {
            info!("Overlay closed, exiting");
        }
    });
    Ok(())
}
