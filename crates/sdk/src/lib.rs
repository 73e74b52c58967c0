//! cvar-unhide SDK - Source Engine Host Type Definitions
//!
//! This crate contains opaque type definitions for the host interfaces the
//! plugin resolves at load time, along with the console variable flag
//! vocabulary. It has no dependencies and compiles quickly, allowing parallel
//! compilation of dependent crates.
//!
//! # Modules
//!
//! - [`interfaces`] - Opaque C++ interface types and the CreateInterface ABI
//! - [`versions`] - Interface names and their first probed version
//! - [`convar`] - FCVAR_* flag constants

pub mod convar;
pub mod interfaces;
pub mod versions;

pub use convar::*;
pub use interfaces::*;
pub use versions::{InterfaceVersion, INTERFACE_VERSIONS};
