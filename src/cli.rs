//! Command-line options
//!
//! Accepts both `--base URL` and the single-dash spelling `-base URL` /
//! `-base=URL`. Boolean switches take an optional `=true|false`, or a
//! following `true`/`false` argument.

use clap::Parser;
use std::ffi::OsString;

use crate::config::Config;

#[derive(Debug, Default, Parser)]
#[command(name = "bigtree-overlay", version, about = "BigTree overlay client")]
pub struct Options {
    /// Base URL (e.g. http://localhost:8443)
    #[arg(long = "base", value_name = "URL")]
    pub base: Option<String>,

    /// API key (from /auth)
    #[arg(long = "key", value_name = "KEY")]
    pub key: Option<String>,

    /// Enable overlay mode (cannot be turned off from the command line)
    #[arg(long, value_name = "BOOL", num_args = 0..=1, require_equals = true, default_missing_value = "true")]
    pub overlay: Option<bool>,

    /// Keep window on top [stored default: true]
    #[arg(long, value_name = "BOOL", num_args = 0..=1, require_equals = true, default_missing_value = "true")]
    pub ontop: Option<bool>,

    /// Enable click-through [stored default: false]
    #[arg(long, value_name = "BOOL", num_args = 0..=1, require_equals = true, default_missing_value = "true")]
    pub clickthrough: Option<bool>,
}

const LONG_NAMES: &[&str] = &["base", "key", "overlay", "ontop", "clickthrough", "help", "version"];

/// Switches that take an optional boolean value.
const BOOL_NAMES: &[&str] = &["overlay", "ontop", "clickthrough"];

/// Rewrite `-name[=v]` into `--name[=v]` for the known long options, and
/// join a spaced `true`/`false` onto a boolean switch (`-ontop false`).
/// Everything after `--` is left alone.
pub fn normalize_args<I, T>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let mut args = args.into_iter().map(Into::into).peekable();
    let mut out: Vec<OsString> = args.next().into_iter().collect();

    while let Some(arg) = args.next() {
        let Some(text) = arg.to_str() else {
            out.push(arg);
            continue;
        };
        if text == "--" {
            out.push(arg);
            out.extend(args);
            break;
        }
        let Some(spec) = text.strip_prefix("--").or_else(|| text.strip_prefix('-')) else {
            out.push(arg);
            continue;
        };
        let (name, has_value) = match spec.split_once('=') {
            Some((name, _)) => (name, true),
            None => (spec, false),
        };
        if !LONG_NAMES.contains(&name) {
            out.push(arg);
            continue;
        }

        let mut long = format!("--{}", spec);
        if !has_value && BOOL_NAMES.contains(&name) {
            if let Some(value) = args.next_if(|next| matches!(next.to_str(), Some("true" | "false"))) {
                long.push('=');
                long.push_str(&value.to_string_lossy());
            }
        }
        out.push(OsString::from(long));
    }
    out
}

impl Options {
    pub fn from_env() -> Self {
        Self::parse_from(normalize_args(std::env::args_os()))
    }

    /// Merge overrides onto `config`; returns whether anything changed.
    pub fn apply(&self, config: &mut Config) -> bool {
        let mut changed = false;

        if let Some(base) = self.base.as_deref().filter(|s| !s.is_empty()) {
            changed |= replace(&mut config.base_url, base.to_string());
        }
        if let Some(key) = self.key.as_deref().filter(|s| !s.is_empty()) {
            changed |= replace(&mut config.api_key, key.to_string());
        }
        if self.overlay == Some(true) {
            changed |= replace(&mut config.overlay, true);
        }
        if let Some(on) = self.ontop {
            changed |= replace(&mut config.always_on_top, on);
        }
        if let Some(on) = self.clickthrough {
            changed |= replace(&mut config.click_through, on);
        }

        changed
    }
}

fn replace<T: PartialEq>(slot: &mut T, value: T) -> bool {
    if *slot == value {
        return false;
    }
    *slot = value;
    true
}
