//! Interface names for CreateInterface
//!
//! The host exports each interface under `<name><NNN>`, a three-digit
//! zero-padded version suffix. Only the name and the first version worth
//! probing are stored here; the loader walks upwards from there.

/// A versioned interface the plugin resolves at load time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InterfaceVersion {
    /// Interface name without version suffix (e.g., "VEngineServer")
    pub name: &'static str,
    /// First version suffix to try
    pub start: i32,
}

impl InterfaceVersion {
    /// Format the full version string for a given suffix (e.g., "VEngineServer023")
    pub fn version_string(&self, version: i32) -> String {
        format!("{}{:03}", self.name, version)
    }
}

/// Engine services (IVEngineServer)
pub const ENGINE_SERVER: InterfaceVersion = InterfaceVersion {
    name: "VEngineServer",
    start: 23,
};

/// Server plugin helpers (IServerPluginHelpers)
pub const PLUGIN_HELPERS: InterfaceVersion = InterfaceVersion {
    name: "ISERVERPLUGINHELPERS",
    start: 1,
};

/// Game server DLL (IServerGameDLL)
pub const SERVER_GAME_DLL: InterfaceVersion = InterfaceVersion {
    name: "ServerGameDLL",
    start: 5,
};

/// Player info manager (IPlayerInfoManager)
pub const PLAYER_INFO_MANAGER: InterfaceVersion = InterfaceVersion {
    name: "PlayerInfoManager",
    start: 2,
};

/// Collected interface versions for iteration
pub const INTERFACE_VERSIONS: &[(&str, InterfaceVersion)] = &[
    ("EngineServer", ENGINE_SERVER),
    ("PluginHelpers", PLUGIN_HELPERS),
    ("ServerGameDLL", SERVER_GAME_DLL),
    ("PlayerInfoManager", PLAYER_INFO_MANAGER),
];
