//! Startup orchestration
//!
//! Options are merged over the stored config, the result is persisted when it
//! changed, and the overlay window gets its stored layer state before it
//! navigates to `<base>/overlay`.

use anyhow::Context;
use tauri::{AppHandle, WebviewUrl, WebviewWindow, WebviewWindowBuilder};
use tracing::{debug, info, warn};
use url::Url;

use crate::bootstrap;
use crate::cli::Options;
use crate::config::{Config, ConfigStore};
use crate::window_layer::{self, WindowControl};

pub const OVERLAY_LABEL: &str = "overlay";
pub const WINDOW_TITLE: &str = "BigTree Overlay Client";
pub const WINDOW_WIDTH: f64 = 1200.0;
pub const WINDOW_HEIGHT: f64 = 800.0;

/// Everything needed to open the overlay window.
#[derive(Debug, Clone)]
pub struct Launch {
    pub config: Config,
    pub target: Url,
}

/// Merge `options` over the stored config and compute the navigation target.
///
/// An unusable base URL is never persisted: a bad `-base` keeps the stored
/// one and a bad stored one is dropped in favour of the fallback.
pub fn prepare(options: &Options, store: &ConfigStore) -> anyhow::Result<Launch> {
    let stored = store.load();
    let mut config = stored.clone();
    if options.apply(&mut config) {
        debug!("Command-line options override the stored config");
    }
    if !config.base_url.is_empty() {
        config.base_url = match normalize_base_url(&config.base_url) {
            Some(base) => base,
            None => {
                warn!("Ignoring invalid base URL {:?}", config.base_url);
                normalize_base_url(&stored.base_url).unwrap_or_default()
            }
        };
    }

    let changed = config != stored;
    if config.base_url.is_empty() {
        config.base_url = config.effective_base_url().to_string();
    }
    if changed {
        store.save(&config);
    }

    let target = overlay_url(&config.base_url)?;
    info!("Overlay target: {}", target);
    Ok(Launch { config, target })
}

/// Canonical form of a base URL: trimmed, `http://` assumed when no scheme is
/// given, no trailing slash. `None` unless it is an http(s) URL with a host.
pub fn normalize_base_url(raw: &str) -> Option<String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    let with_scheme = if raw.contains("://") {
        raw.to_string()
    } else {
        format!("http://{}", raw)
    };

    let parsed = Url::parse(&with_scheme).ok()?;
    if !matches!(parsed.scheme(), "http" | "https") || !parsed.has_host() {
        return None;
    }
    let base = with_scheme.trim_end_matches('/').to_string();
    overlay_url(&base).ok()?;
    Some(base)
}

/// `<base>/overlay`, ignoring trailing slashes on the base.
pub fn overlay_url(base: &str) -> anyhow::Result<Url> {
    let joined = format!("{}/overlay", base.trim_end_matches('/'));
    Url::parse(&joined).with_context(|| format!("invalid base URL {:?}", base))
}

/// Push the stored layer state to the window; failures are logged only.
pub fn apply_initial_state(control: &impl WindowControl, config: &Config) {
    if let Err(e) = control.set_always_on_top(config.always_on_top) {
        warn!("Initial always-on-top not applied: {}", e);
    }
    if let Err(e) = control.set_click_through(config.click_through) {
        warn!("Initial click-through not applied: {}", e);
    }
}

/// Apply the initial state, then navigate.
pub fn start<C, F>(control: &C, launch: &Launch, navigate: F) -> anyhow::Result<()>
where
    C: WindowControl,
    F: FnOnce(&Url) -> anyhow::Result<()>,
{
    apply_initial_state(control, &launch.config);
    navigate(&launch.target)
}

/// Create the overlay window on a blank page and start it.
pub fn open_overlay_window(app: &AppHandle, launch: &Launch) -> anyhow::Result<WebviewWindow> {
    let blank = Url::parse("about:blank").context("blank page URL")?;
    let window = WebviewWindowBuilder::new(app, OVERLAY_LABEL, WebviewUrl::External(blank))
        .title(WINDOW_TITLE)
        .inner_size(WINDOW_WIDTH, WINDOW_HEIGHT)
        .resizable(true)
        .initialization_script(&bootstrap::build_script(&launch.config))
        .build()
        .context("failed to create overlay window")?;
    info!("Overlay window created");

    let layer = window_layer::for_window(&window);
    start(&layer, launch, |url| {
        window
            .navigate(url.clone())
            .with_context(|| format!("failed to navigate to {}", url))
    })?;

    Ok(window)
}
