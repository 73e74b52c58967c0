//! Engine interface loading via CreateInterface pattern

use std::ffi::{c_void, CString};
use std::ptr::NonNull;

use cvar_unhide_sdk::{
    versions, CGlobalVars, CreateInterfaceFn, IPlayerInfoManager, IServerGameDLL,
    IServerPluginHelpers, IVEngineServer, InterfaceVersion, IFACE_FAILED, IFACE_OK,
};

use crate::error::InterfaceError;
use crate::globals::EngineGlobals;

/// How many ascending versions are tried before giving up on an interface
pub const MAX_VERSION_PROBES: i32 = 5;

/// IPlayerInfoManager::GetGlobalVars - second virtual after GetPlayerInfo
const GET_GLOBAL_VARS_INDEX: usize = 1;

/// Function signature for IPlayerInfoManager::GetGlobalVars
/// CGlobalVars* GetGlobalVars()
///
/// A member function: 32-bit MSVC passes `this` in ECX (`thiscall`), every
/// other target uses the C convention with `this` as the first argument.
#[cfg(all(windows, target_arch = "x86"))]
type GetGlobalVarsFn =
    unsafe extern "thiscall" fn(this: *mut IPlayerInfoManager) -> *mut CGlobalVars;
#[cfg(not(all(windows, target_arch = "x86")))]
type GetGlobalVarsFn = unsafe extern "C" fn(this: *mut IPlayerInfoManager) -> *mut CGlobalVars;

/// Wrapper around a CreateInterface factory function
pub struct InterfaceFactory {
    factory: CreateInterfaceFn,
    name: &'static str,
}

impl InterfaceFactory {
    /// Create a new factory wrapper
    ///
    /// # Arguments
    /// * `factory` - The CreateInterface function pointer
    /// * `name` - Human-readable name for error messages (e.g., "engine", "game server")
    pub fn new(factory: CreateInterfaceFn, name: &'static str) -> Self {
        Self { factory, name }
    }

    /// Get the factory's display name
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Get an interface by its exact version string
    ///
    /// Succeeds only if the factory reports [`IFACE_OK`] and hands back a
    /// non-null pointer.
    ///
    /// # Safety
    /// The returned pointer is only valid if T matches the actual interface type
    pub unsafe fn get<T>(&self, version: &str) -> Result<NonNull<T>, InterfaceError> {
        let c_version = CString::new(version)
            .map_err(|_| InterfaceError::InvalidVersionString(version.to_string()))?;

        let mut ret_code: i32 = IFACE_FAILED;
        let ptr = (self.factory)(c_version.as_ptr(), &mut ret_code);

        if ret_code != IFACE_OK {
            return Err(InterfaceError::Rejected {
                version: version.to_string(),
                factory: self.name,
                code: ret_code,
            });
        }

        NonNull::new(ptr as *mut T)
            .ok_or_else(|| InterfaceError::NullPointer(format!("{} from {}", version, self.name)))
    }

    /// Load an interface, probing up to [`MAX_VERSION_PROBES`] ascending versions
    ///
    /// Every attempt is logged. The first version the factory accepts wins.
    ///
    /// # Safety
    /// Same as `get`
    #[tracing::instrument(skip(self), fields(factory = self.name))]
    pub unsafe fn load<T>(
        &self,
        interface: InterfaceVersion,
    ) -> Result<NonNull<T>, InterfaceError> {
        tracing::info!("Loading {}", interface.version_string(interface.start));

        let last = interface.start + MAX_VERSION_PROBES - 1;

        for version in interface.start..=last {
            let version_string = interface.version_string(version);

            if version > interface.start {
                tracing::info!("  - trying {}...", version_string);
            }

            match self.get::<T>(&version_string) {
                Ok(ptr) => {
                    tracing::info!("{}: OK ({:p})", version_string, ptr.as_ptr());
                    return Ok(ptr);
                }
                Err(e) => tracing::warn!("{}: FAILED ({})", version_string, e),
            }
        }

        tracing::warn!("  - giving up on {}.", interface.name);
        Err(InterfaceError::NotFound {
            name: interface.name.to_string(),
            first: interface.start,
            last,
        })
    }
}

/// Ask the player info manager for the global variables snapshot
///
/// # Safety
/// `player_info_manager` must point to a live IPlayerInfoManager.
pub unsafe fn get_global_vars(
    player_info_manager: NonNull<IPlayerInfoManager>,
) -> Option<NonNull<CGlobalVars>> {
    let this = player_info_manager.as_ptr();
    let vtable = *(this as *const *const *const c_void);
    let func: GetGlobalVarsFn = std::mem::transmute(*vtable.add(GET_GLOBAL_VARS_INDEX));
    NonNull::new(func(this))
}

/// Load all required engine interfaces
///
/// Called during plugin Load with the two factories the host passes in.
/// Fails on the first interface that cannot be resolved.
///
/// # Arguments
/// * `interface_factory` - CreateInterface from the engine module
/// * `game_server_factory` - CreateInterface from the game server module
///
/// # Safety
/// Factory functions must be callable.
#[tracing::instrument(skip_all)]
pub unsafe fn load_interfaces(
    interface_factory: CreateInterfaceFn,
    game_server_factory: CreateInterfaceFn,
) -> Result<EngineGlobals, InterfaceError> {
    let engine_factory = InterfaceFactory::new(interface_factory, "engine");
    let server_factory = InterfaceFactory::new(game_server_factory, "game server");

    let engine = engine_factory.load::<IVEngineServer>(versions::ENGINE_SERVER)?;
    let helpers = engine_factory.load::<IServerPluginHelpers>(versions::PLUGIN_HELPERS)?;
    let server_game_dll = server_factory.load::<IServerGameDLL>(versions::SERVER_GAME_DLL)?;
    let player_info_manager =
        server_factory.load::<IPlayerInfoManager>(versions::PLAYER_INFO_MANAGER)?;

    let global_vars = get_global_vars(player_info_manager);
    if let Some(ref gv) = global_vars {
        tracing::info!("CGlobalVars: {:p}", gv.as_ptr());
    } else {
        tracing::warn!("CGlobalVars: player info manager returned null");
    }

    let globals = EngineGlobals::new(engine, helpers, server_game_dll, player_info_manager)
        .with_global_vars(global_vars);

    Ok(globals)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::{c_char, CStr};
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Stand-in for an IPlayerInfoManager object: just a vtable pointer
    #[repr(C)]
    struct FakePlayerInfoManager {
        vtable: &'static [GetGlobalVarsFn; 2],
    }

    static GLOBALS_MARKER: u8 = 0;

    /// Define a fake virtual with the same calling convention as `GetGlobalVarsFn`
    macro_rules! fake_virtual {
        ($name:ident => $body:expr) => {
            #[cfg(all(windows, target_arch = "x86"))]
            unsafe extern "thiscall" fn $name(
                _this: *mut IPlayerInfoManager,
            ) -> *mut CGlobalVars {
                $body
            }
            #[cfg(not(all(windows, target_arch = "x86")))]
            unsafe extern "C" fn $name(
                _this: *mut IPlayerInfoManager,
            ) -> *mut CGlobalVars {
                $body
            }
        };
    }

    fake_virtual!(fake_get_player_info => std::ptr::null_mut());
    fake_virtual!(fake_get_global_vars => &GLOBALS_MARKER as *const u8 as *mut CGlobalVars);

    static FAKE_VTABLE: [GetGlobalVarsFn; 2] = [fake_get_player_info, fake_get_global_vars];

    static FAKE_PIM: FakePlayerInfoManager = FakePlayerInfoManager {
        vtable: &FAKE_VTABLE,
    };

    static INTERFACE_MARKER: u8 = 0;

    unsafe fn respond(return_code: *mut i32, code: i32, ptr: *mut c_void) -> *mut c_void {
        if !return_code.is_null() {
            *return_code = code;
        }
        ptr
    }

    /// Engine factory that only knows VEngineServer024 (023 missing) and the helpers
    unsafe extern "C" fn engine_factory(
        name: *const c_char,
        return_code: *mut i32,
    ) -> *mut c_void {
        let marker = &INTERFACE_MARKER as *const u8 as *mut c_void;
        match CStr::from_ptr(name).to_str().unwrap_or("") {
            "VEngineServer024" | "ISERVERPLUGINHELPERS001" => {
                respond(return_code, IFACE_OK, marker)
            }
            _ => respond(return_code, IFACE_FAILED, std::ptr::null_mut()),
        }
    }

    unsafe extern "C" fn server_factory(
        name: *const c_char,
        return_code: *mut i32,
    ) -> *mut c_void {
        match CStr::from_ptr(name).to_str().unwrap_or("") {
            "ServerGameDLL005" => respond(
                return_code,
                IFACE_OK,
                &INTERFACE_MARKER as *const u8 as *mut c_void,
            ),
            "PlayerInfoManager002" => respond(
                return_code,
                IFACE_OK,
                &FAKE_PIM as *const FakePlayerInfoManager as *mut c_void,
            ),
            _ => respond(return_code, IFACE_FAILED, std::ptr::null_mut()),
        }
    }

    static REJECT_CALLS: AtomicUsize = AtomicUsize::new(0);

    unsafe extern "C" fn rejecting_factory(
        _name: *const c_char,
        return_code: *mut i32,
    ) -> *mut c_void {
        REJECT_CALLS.fetch_add(1, Ordering::SeqCst);
        respond(return_code, IFACE_FAILED, std::ptr::null_mut())
    }

    unsafe extern "C" fn null_ok_factory(
        _name: *const c_char,
        return_code: *mut i32,
    ) -> *mut c_void {
        respond(return_code, IFACE_OK, std::ptr::null_mut())
    }

    #[test]
    fn test_load_probes_next_version() {
        let factory = InterfaceFactory::new(engine_factory, "engine");
        let ptr = unsafe { factory.load::<IVEngineServer>(versions::ENGINE_SERVER) };
        assert!(ptr.is_ok());
    }

    #[test]
    fn test_load_gives_up_after_five_versions() {
        let factory = InterfaceFactory::new(rejecting_factory, "engine");
        let err = unsafe { factory.load::<IVEngineServer>(versions::ENGINE_SERVER) }.unwrap_err();

        assert_eq!(REJECT_CALLS.load(Ordering::SeqCst), MAX_VERSION_PROBES as usize);
        match err {
            InterfaceError::NotFound { name, first, last } => {
                assert_eq!(name, "VEngineServer");
                assert_eq!(first, 23);
                assert_eq!(last, 27);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_get_rejects_null_with_ok_code() {
        let factory = InterfaceFactory::new(null_ok_factory, "engine");
        let err = unsafe { factory.get::<IVEngineServer>("VEngineServer023") }.unwrap_err();
        assert!(matches!(err, InterfaceError::NullPointer(_)));
    }

    #[test]
    fn test_get_rejects_interior_null() {
        let factory = InterfaceFactory::new(engine_factory, "engine");
        let err = unsafe { factory.get::<IVEngineServer>("VEngine\0Server") }.unwrap_err();
        assert!(matches!(err, InterfaceError::InvalidVersionString(_)));
    }

    #[test]
    fn test_load_interfaces_resolves_global_vars() {
        let globals = unsafe { load_interfaces(engine_factory, server_factory) }.unwrap();
        assert_eq!(
            globals.global_vars_ptr(),
            Some(&GLOBALS_MARKER as *const u8 as *mut CGlobalVars)
        );
    }

    #[test]
    fn test_load_interfaces_fails_without_server_factory_interfaces() {
        let result = unsafe { load_interfaces(engine_factory, engine_factory) };
        assert!(matches!(result, Err(InterfaceError::NotFound { .. })));
    }
}
