//! Bootstrap script injected before the overlay page's own scripts
//!
//! Seeds localStorage with the connection settings, installs the `btOverlay*`
//! bridge globals and, with the `overlay-controls` feature, a small floating
//! panel (click-through toggle + minimize) with an Escape release.

use crate::config::Config;

pub const STORAGE_BASE_URL: &str = "bt_base_url";
pub const STORAGE_API_KEY: &str = "bt_api_key";
pub const STORAGE_OVERLAY: &str = "bt_overlay";

/// Tauri commands behind the page-side bridge globals.
pub const CMD_MINIMIZE: &str = "overlay_minimize";
pub const CMD_SET_CLICK_THROUGH: &str = "overlay_set_click_through";
pub const CMD_SET_ALWAYS_ON_TOP: &str = "overlay_set_always_on_top";

/// Page-side hook that lets native code resync the toggle button.
pub const SYNC_CLICK_THROUGH_FN: &str = "btOverlaySyncClickThrough";

/// Encode `s` as a double-quoted JavaScript string literal.
pub fn js_string(s: &str) -> String {
    let quoted = serde_json::to_string(s).unwrap_or_else(|_| "\"\"".to_string());
    // Line/paragraph separators are line terminators for pre-ES2019 engines
    quoted
        .replace('\u{2028}', "\\u2028")
        .replace('\u{2029}', "\\u2029")
}

/// Build the initialization script for `config`.
pub fn build_script(config: &Config) -> String {
    build_script_with(config, cfg!(feature = "overlay-controls"))
}

pub fn build_script_with(config: &Config, controls: bool) -> String {
    let mut script = format!(
        r#"(() => {{
  try {{
    localStorage.setItem({key_base}, {base});
    localStorage.setItem({key_api}, {api});
    localStorage.setItem({key_overlay}, {overlay});
  }} catch (e) {{}}

  const invoke = (cmd, args) => {{
    const ipc = window.__TAURI_INTERNALS__;
    if (!ipc || typeof ipc.invoke !== "function") return Promise.resolve();
    return ipc.invoke(cmd, args || {{}}).catch((e) => console.warn("[bt-overlay]", cmd, e));
  }};
  window.btOverlayMinimize = () => invoke({cmd_min});
  window.btOverlaySetClickThrough = (on) => invoke({cmd_click}, {{ on: !!on }});
  window.btOverlaySetAlwaysOnTop = (on) => invoke({cmd_top}, {{ on: !!on }});
"#,
        key_base = js_string(STORAGE_BASE_URL),
        base = js_string(&config.base_url),
        key_api = js_string(STORAGE_API_KEY),
        api = js_string(&config.api_key),
        key_overlay = js_string(STORAGE_OVERLAY),
        overlay = js_string(if config.overlay { "1" } else { "0" }),
        cmd_min = js_string(CMD_MINIMIZE),
        cmd_click = js_string(CMD_SET_CLICK_THROUGH),
        cmd_top = js_string(CMD_SET_ALWAYS_ON_TOP),
    );

    if controls {
        script.push_str(&controls_script(config.click_through));
    }

    script.push_str("})();\n");
    script
}

fn controls_script(click_through: bool) -> String {
    format!(
        r#"
  const btnStyle = "height:28px;border-radius:8px;border:1px solid rgba(255,255,255,.2);background:rgba(10,20,16,.8);color:#e8f7ef;cursor:pointer;";

  const wrap = document.createElement("div");
  wrap.id = "btOverlayControls";
  wrap.style.cssText = "position:fixed;top:12px;right:12px;z-index:99999;display:flex;gap:8px;align-items:center;";

  const btnClick = document.createElement("button");
  btnClick.title = "Toggle click-through (Esc to disable)";
  btnClick.style.cssText = btnStyle + "font-weight:600;padding:0 10px;";
  const showClickThrough = (on) => {{
    btnClick.dataset.on = on ? "1" : "0";
    btnClick.textContent = on ? "Clickthrough: On" : "Clickthrough: Off";
  }};
  showClickThrough({initial});
  btnClick.onclick = () => {{
    const on = btnClick.dataset.on !== "1";
    showClickThrough(on);
    window.btOverlaySetClickThrough(on);
  }};

  const btnMin = document.createElement("button");
  btnMin.textContent = "\u2014";
  btnMin.title = "Minimize";
  btnMin.style.cssText = btnStyle + "width:34px;font-weight:700;";
  btnMin.onclick = () => window.btOverlayMinimize();

  window.{sync} = (on) => showClickThrough(!!on);

  document.addEventListener("keydown", (ev) => {{
    if (ev.key === "Escape" && btnClick.dataset.on === "1") {{
      showClickThrough(false);
      window.btOverlaySetClickThrough(false);
    }}
  }});

  wrap.appendChild(btnClick);
  wrap.appendChild(btnMin);
  const mount = () => {{
    if (!document.getElementById(wrap.id)) document.body.appendChild(wrap);
  }};
  if (document.body) mount();
  else document.addEventListener("DOMContentLoaded", mount);
"#,
        initial = if click_through { "true" } else { "false" },
        sync = SYNC_CLICK_THROUGH_FN,
    )
}

/// Snippet evaluated in the page when click-through changes natively.
pub fn sync_click_through_script(on: bool) -> String {
    format!(
        "if (typeof window.{sync} === \"function\") window.{sync}({on});",
        sync = SYNC_CLICK_THROUGH_FN,
        on = on,
    )
}
