//! cvar-unhide - Core Logic
//!
//! Registry model and console commands for inspecting and mutating the
//! host's console variables and commands.
//!
//! # Re-exports
//!
//! This crate re-exports the SDK and engine crates for convenience:
//! - [`sdk`] - host interface types, version strings and flag constants
//! - [`engine`] - engine globals and interface loading

pub use cvar_unhide_engine as engine;
pub use cvar_unhide_sdk as sdk;

pub mod commands;
pub mod config;
pub mod launch;
pub mod plugin;
pub mod registry;

// Re-export commonly used items
pub use commands::{
    BufferedConsole, Color, CommandArgs, CommandError, ConsoleOutput, MessageLevel,
    PreparedDispatch, ServerClass, TracingConsole, PLUGIN_COMMANDS,
};
pub use config::{ConfigError, ConfigResult, CoreConfig};
pub use launch::CommandLine;
pub use plugin::{
    CommandOutcome, LoadError, PluginResult, ServerPlugin, PLUGIN_NAME, PLUGIN_VERSION,
};
pub use registry::{
    ChangeCallback, ConVar, ConVarDef, CvarFlags, CvarRegistry, EntryKey, EntryKind,
    RegistryEntry, RegistryError,
};
