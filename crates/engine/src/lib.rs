//! cvar-unhide Engine - Interface Loading and Engine Context
//!
//! This crate handles:
//! - Loading host interfaces via CreateInterface, probing successive versions
//! - Bundling the acquired interfaces into an [`EngineGlobals`] context
//!
//! # Architecture
//!
//! Interfaces are acquired once during plugin load via [`loader::load_interfaces`].
//! The resulting [`globals::EngineGlobals`] is owned by the plugin state rather
//! than a process-wide static, so "not loaded yet" and "unloaded" are both
//! simply the absence of a value.

pub mod error;
pub mod globals;
pub mod loader;

pub use error::InterfaceError;
pub use globals::EngineGlobals;
pub use loader::{get_global_vars, load_interfaces, InterfaceFactory, MAX_VERSION_PROBES};
