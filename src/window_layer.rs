//! Window Layer Control — always-on-top, click-through, minimize
//!
//! Windows: topmost z-order via SetWindowPos, click-through via WS_EX_LAYERED | WS_EX_TRANSPARENT.
//! macOS: NSFloatingWindowLevel and setIgnoresMouseEvents on the NSWindow.
//! Linux: keep-above hint, input pass-through and iconify through the GTK window.
//!
//! Callers only see [`WindowControl`]. A window whose native handle is not
//! available yet turns every operation into a successful no-op.

use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum LayerError {
    #[error("{op} failed: {message}")]
    Native { op: &'static str, message: String },
}

impl LayerError {
    pub(crate) fn native(op: &'static str, message: impl ToString) -> Self {
        Self::Native {
            op,
            message: message.to_string(),
        }
    }
}

/// The three window-manager operations the shell needs.
pub trait WindowControl {
    fn set_always_on_top(&self, on: bool) -> Result<(), LayerError>;
    fn set_click_through(&self, on: bool) -> Result<(), LayerError>;
    fn minimize(&self) -> Result<(), LayerError>;
}

/// Raw native calls against a window that is known to exist.
pub trait NativeWindow {
    fn set_topmost(&self, on: bool) -> Result<(), LayerError>;
    fn set_pass_through(&self, on: bool) -> Result<(), LayerError>;
    fn iconify(&self) -> Result<(), LayerError>;
}

/// [`WindowControl`] over an optional native handle.
pub struct WindowLayer<N> {
    native: Option<N>,
}

impl<N: NativeWindow> WindowLayer<N> {
    pub fn new(native: Option<N>) -> Self {
        Self { native }
    }

    fn with_native(
        &self,
        op: &'static str,
        f: impl FnOnce(&N) -> Result<(), LayerError>,
    ) -> Result<(), LayerError> {
        match &self.native {
            Some(native) => f(native),
            None => {
                debug!("{}: native window not available yet, skipping", op);
                Ok(())
            }
        }
    }
}

impl<N: NativeWindow> WindowControl for WindowLayer<N> {
    fn set_always_on_top(&self, on: bool) -> Result<(), LayerError> {
        self.with_native("set_always_on_top", |w| w.set_topmost(on))
    }

    fn set_click_through(&self, on: bool) -> Result<(), LayerError> {
        self.with_native("set_click_through", |w| w.set_pass_through(on))
    }

    fn minimize(&self) -> Result<(), LayerError> {
        self.with_native("minimize", |w| w.iconify())
    }
}

pub type PlatformLayer = WindowLayer<platform::PlatformWindow>;

/// Adapter for a Tauri window, resolving its native handle now.
pub fn for_window(window: &tauri::WebviewWindow) -> PlatformLayer {
    WindowLayer::new(platform::PlatformWindow::from_webview(window))
}

// ============================================================================
// Windows
// ============================================================================

#[cfg(target_os = "windows")]
mod platform {
    use super::{LayerError, NativeWindow};
    use windows::Win32::Foundation::{SetLastError, COLORREF, HWND, WIN32_ERROR};
    use windows::Win32::UI::WindowsAndMessaging::*;

    pub struct PlatformWindow {
        hwnd: HWND,
    }

    impl PlatformWindow {
        pub fn from_webview(window: &tauri::WebviewWindow) -> Option<Self> {
            let raw = window.hwnd().ok()?;
            let hwnd = HWND(raw.0 as *mut core::ffi::c_void);
            if hwnd.0.is_null() {
                return None;
            }
            Some(Self { hwnd })
        }
    }

    impl NativeWindow for PlatformWindow {
        fn set_topmost(&self, on: bool) -> Result<(), LayerError> {
            let after = if on { HWND_TOPMOST } else { HWND_NOTOPMOST };
            unsafe {
                SetWindowPos(
                    self.hwnd,
                    after,
                    0,
                    0,
                    0,
                    0,
                    SWP_NOMOVE | SWP_NOSIZE | SWP_NOACTIVATE,
                )
            }
            .map_err(|e| LayerError::native("SetWindowPos", e))
        }

        fn set_pass_through(&self, on: bool) -> Result<(), LayerError> {
            let flags = (WS_EX_LAYERED.0 | WS_EX_TRANSPARENT.0) as isize;
            unsafe {
                let style = GetWindowLongPtrW(self.hwnd, GWL_EXSTYLE);
                let style = if on { style | flags } else { style & !flags };

                // SetWindowLongPtrW returns 0 both for failure and for a previous style of 0
                SetLastError(WIN32_ERROR(0));
                if SetWindowLongPtrW(self.hwnd, GWL_EXSTYLE, style) == 0 {
                    let err = windows::core::Error::from_win32();
                    if err.code().is_err() {
                        return Err(LayerError::native("SetWindowLongPtrW", err));
                    }
                }

                if on {
                    // Layered windows stay invisible until their attributes are set
                    SetLayeredWindowAttributes(self.hwnd, COLORREF(0), 255, LWA_ALPHA)
                        .map_err(|e| LayerError::native("SetLayeredWindowAttributes", e))?;
                }
            }
            Ok(())
        }

        fn iconify(&self) -> Result<(), LayerError> {
            // Return value is the previous visibility, not success
            unsafe {
                let _ = ShowWindow(self.hwnd, SW_MINIMIZE);
            }
            Ok(())
        }
    }
}

// ============================================================================
// macOS
// ============================================================================

#[cfg(target_os = "macos")]
mod platform {
    use super::{LayerError, NativeWindow};
    use objc::runtime::{Object, NO, YES};
    use objc::{msg_send, sel, sel_impl};

    const NS_NORMAL_WINDOW_LEVEL: i64 = 0;
    const NS_FLOATING_WINDOW_LEVEL: i64 = 3;

    pub struct PlatformWindow {
        ns_window: *mut Object,
    }

    impl PlatformWindow {
        pub fn from_webview(window: &tauri::WebviewWindow) -> Option<Self> {
            let ns_window = window.ns_window().ok()? as *mut Object;
            if ns_window.is_null() {
                return None;
            }
            Some(Self { ns_window })
        }
    }

    impl NativeWindow for PlatformWindow {
        fn set_topmost(&self, on: bool) -> Result<(), LayerError> {
            let level = if on {
                NS_FLOATING_WINDOW_LEVEL
            } else {
                NS_NORMAL_WINDOW_LEVEL
            };
            unsafe {
                let _: () = msg_send![self.ns_window, setLevel: level];
            }
            Ok(())
        }

        fn set_pass_through(&self, on: bool) -> Result<(), LayerError> {
            let ignore = if on { YES } else { NO };
            unsafe {
                let _: () = msg_send![self.ns_window, setIgnoresMouseEvents: ignore];
            }
            Ok(())
        }

        fn iconify(&self) -> Result<(), LayerError> {
            unsafe {
                let _: () = msg_send![self.ns_window, miniaturize: std::ptr::null_mut::<Object>()];
            }
            Ok(())
        }
    }
}

// ============================================================================
// Linux and other GTK targets
// ============================================================================

#[cfg(not(any(target_os = "windows", target_os = "macos")))]
mod platform {
    use super::{LayerError, NativeWindow};

    /// Tauri drives the GTK window directly on these targets.
    pub struct PlatformWindow {
        window: tauri::WebviewWindow,
    }

    impl PlatformWindow {
        pub fn from_webview(window: &tauri::WebviewWindow) -> Option<Self> {
            Some(Self {
                window: window.clone(),
            })
        }
    }

    impl NativeWindow for PlatformWindow {
        fn set_topmost(&self, on: bool) -> Result<(), LayerError> {
            self.window
                .set_always_on_top(on)
                .map_err(|e| LayerError::native("keep_above", e))
        }

        fn set_pass_through(&self, on: bool) -> Result<(), LayerError> {
            self.window
                .set_ignore_cursor_events(on)
                .map_err(|e| LayerError::native("pass_through", e))
        }

        fn iconify(&self) -> Result<(), LayerError> {
            self.window
                .minimize()
                .map_err(|e| LayerError::native("iconify", e))
        }
    }
}
