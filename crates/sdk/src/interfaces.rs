//! Source engine host interface type definitions
//!
//! These are opaque types representing C++ engine interfaces.
//! We don't need their internal structure - just pointers.
//! The few virtual calls the plugin makes go through raw vtable access.

use std::ffi::c_void;

/// CreateInterface return code: interface found
pub const IFACE_OK: i32 = 0;

/// CreateInterface return code: interface not found
pub const IFACE_FAILED: i32 = 1;

/// Opaque type for IVEngineServer
/// Engine services available to server plugins
#[repr(C)]
pub struct IVEngineServer {
    _opaque: [u8; 0],
}

/// Opaque type for IServerPluginHelpers
/// Helper functions for server plugins (dialogs, client queries)
#[repr(C)]
pub struct IServerPluginHelpers {
    _opaque: [u8; 0],
}

/// Opaque type for IServerGameDLL
/// Primary server-side game interface, source of the server class list
#[repr(C)]
pub struct IServerGameDLL {
    _opaque: [u8; 0],
}

/// Opaque type for IPlayerInfoManager
/// Player info access; also hands out the CGlobalVars snapshot
#[repr(C)]
pub struct IPlayerInfoManager {
    _opaque: [u8; 0],
}

/// Opaque type for CGlobalVars
/// Global game variables (tick count, frametime, edict list, etc.)
#[repr(C)]
pub struct CGlobalVars {
    _opaque: [u8; 0],
}

/// CreateInterface function signature
///
/// This is the standard Source engine pattern for acquiring interfaces.
/// Each module (engine, server) exports a CreateInterface function.
///
/// # Arguments
/// * `name` - Interface version string (e.g., "VEngineServer023")
/// * `return_code` - Optional pointer to receive error code ([`IFACE_OK`] = success)
///
/// # Returns
/// Pointer to the interface, or null if not found
pub type CreateInterfaceFn =
    unsafe extern "C" fn(name: *const std::ffi::c_char, return_code: *mut i32) -> *mut c_void;
