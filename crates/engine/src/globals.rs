//! Engine interface context
//!
//! Host interfaces are acquired once during plugin load and kept in an
//! [`EngineGlobals`] value owned by the plugin state. Before load completes
//! there is no value at all; unload drops it.

use std::ptr::NonNull;
use std::thread::ThreadId;

use cvar_unhide_sdk::{
    CGlobalVars, IPlayerInfoManager, IServerGameDLL, IServerPluginHelpers, IVEngineServer,
};

/// Engine state containing all acquired interfaces
pub struct EngineGlobals {
    /// Engine services (required)
    pub engine: NonNull<IVEngineServer>,

    /// Plugin helpers (required)
    pub helpers: NonNull<IServerPluginHelpers>,

    /// Game server DLL (required)
    pub server_game_dll: NonNull<IServerGameDLL>,

    /// Player info manager (required)
    pub player_info_manager: NonNull<IPlayerInfoManager>,

    /// Global variables snapshot handed out by the player info manager
    global_vars: Option<NonNull<CGlobalVars>>,

    /// Thread that loaded the plugin; the host dispatches commands on it
    pub main_thread_id: ThreadId,
}

// SAFETY: All pointers are to engine interfaces that live for the entire plugin lifetime.
// The host only calls into the plugin from its main thread.
unsafe impl Send for EngineGlobals {}
unsafe impl Sync for EngineGlobals {}

impl EngineGlobals {
    /// Create new EngineGlobals
    ///
    /// # Arguments
    /// * `engine` - Engine services interface
    /// * `helpers` - Plugin helpers interface
    /// * `server_game_dll` - Game server DLL interface
    /// * `player_info_manager` - Player info manager interface
    pub fn new(
        engine: NonNull<IVEngineServer>,
        helpers: NonNull<IServerPluginHelpers>,
        server_game_dll: NonNull<IServerGameDLL>,
        player_info_manager: NonNull<IPlayerInfoManager>,
    ) -> Self {
        Self {
            engine,
            helpers,
            server_game_dll,
            player_info_manager,
            global_vars: None,
            main_thread_id: std::thread::current().id(),
        }
    }

    /// Set the global variables snapshot
    pub fn with_global_vars(mut self, ptr: Option<NonNull<CGlobalVars>>) -> Self {
        self.global_vars = ptr;
        self
    }

    /// Get engine services pointer
    pub fn engine_ptr(&self) -> *mut IVEngineServer {
        self.engine.as_ptr()
    }

    /// Get plugin helpers pointer
    pub fn helpers_ptr(&self) -> *mut IServerPluginHelpers {
        self.helpers.as_ptr()
    }

    /// Get game server DLL pointer
    pub fn server_game_dll_ptr(&self) -> *mut IServerGameDLL {
        self.server_game_dll.as_ptr()
    }

    /// Get player info manager pointer
    pub fn player_info_manager_ptr(&self) -> *mut IPlayerInfoManager {
        self.player_info_manager.as_ptr()
    }

    /// Get global variables pointer (None if the player info manager returned null)
    pub fn global_vars_ptr(&self) -> Option<*mut CGlobalVars> {
        self.global_vars.map(|nn| nn.as_ptr())
    }

    /// Check if current thread is the thread that loaded the plugin
    pub fn is_main_thread(&self) -> bool {
        std::thread::current().id() == self.main_thread_id
    }
}

impl std::fmt::Debug for EngineGlobals {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EngineGlobals")
            .field("engine", &self.engine)
            .field("helpers", &self.helpers)
            .field("server_game_dll", &self.server_game_dll)
            .field("player_info_manager", &self.player_info_manager)
            .field("global_vars", &self.global_vars)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_global_vars_optional() {
        let mut marker = [0u8; 4];
        let ptr = NonNull::from(&mut marker).cast::<u8>();

        let globals = EngineGlobals::new(ptr.cast(), ptr.cast(), ptr.cast(), ptr.cast());
        assert!(globals.global_vars_ptr().is_none());
        assert!(globals.is_main_thread());

        let globals = globals.with_global_vars(Some(ptr.cast()));
        assert_eq!(globals.global_vars_ptr(), Some(ptr.as_ptr() as *mut CGlobalVars));
    }
}
