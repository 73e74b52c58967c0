//! cvar-unhide - FFI Layer
//!
//! This crate provides the C ABI boundary between the host bridge and the
//! Rust core logic. It compiles to a cdylib (.so/.dll).
//!
//! The host bridge owns the native plugin object. It forwards the host's
//! lifecycle calls, mirrors console variables and commands into the
//! registry, and hands console lines for the plugin's commands to
//! [`ffi::registration::rust_dispatch_command`].

use std::sync::LazyLock;

use parking_lot::Mutex;
use tracing_subscriber::EnvFilter;

use cvar_unhide_core::ServerPlugin;

pub mod ffi;

/// Process-wide plugin instance
///
/// Every export locks it for the duration of the call. Calls that arrive
/// while it is already held (a command handler calling back in) are refused
/// rather than deadlocking.
pub static PLUGIN: LazyLock<Mutex<ServerPlugin>> =
    LazyLock::new(|| Mutex::new(ServerPlugin::default()));

/// Install the log subscriber
///
/// `RUST_LOG` wins when set; otherwise `debug` or `info` depending on the
/// config. A subscriber installed by an earlier load is left alone.
pub fn init_tracing(debug: bool) {
    let default_level = if debug { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
