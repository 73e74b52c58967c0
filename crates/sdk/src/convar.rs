//! ConVar flag definitions for the Source engine
//!
//! Every registry entry (ConVar or ConCommand) carries a 32-bit flag word.
//! Bit positions mirror `tier1/iconvar.h`.

// ConVar flag constants
pub mod flags {
    /// No flags
    pub const FCVAR_NONE: u32 = 0;
    /// Not yet registered with the cvar system
    pub const FCVAR_UNREGISTERED: u32 = 1 << 0;
    /// Hidden in released products
    pub const FCVAR_DEVELOPMENTONLY: u32 = 1 << 1;
    /// Defined by the game DLL
    pub const FCVAR_GAMEDLL: u32 = 1 << 2;
    /// Defined by the client DLL
    pub const FCVAR_CLIENTDLL: u32 = 1 << 3;
    /// Hidden from find/autocomplete
    pub const FCVAR_HIDDEN: u32 = 1 << 4;
    /// Protected (password-like), value not sent to clients
    pub const FCVAR_PROTECTED: u32 = 1 << 5;
    /// Singleplayer only
    pub const FCVAR_SPONLY: u32 = 1 << 6;
    /// Saved to config
    pub const FCVAR_ARCHIVE: u32 = 1 << 7;
    /// Notify players when changed
    pub const FCVAR_NOTIFY: u32 = 1 << 8;
    /// Changes client info string
    pub const FCVAR_USERINFO: u32 = 1 << 9;
    /// Only printable characters allowed in the value
    pub const FCVAR_PRINTABLEONLY: u32 = 1 << 10;
    /// Don't log changes
    pub const FCVAR_UNLOGGED: u32 = 1 << 11;
    /// Never try to print the value as a string
    pub const FCVAR_NEVER_AS_STRING: u32 = 1 << 12;
    /// Replicated to clients
    pub const FCVAR_REPLICATED: u32 = 1 << 13;
    /// Only with sv_cheats
    pub const FCVAR_CHEAT: u32 = 1 << 14;
    /// Per split-screen player
    pub const FCVAR_SS: u32 = 1 << 15;
    /// Record in demo
    pub const FCVAR_DEMO: u32 = 1 << 16;
    /// Don't record in demo
    pub const FCVAR_DONTRECORD: u32 = 1 << 17;
    /// Added by split-screen slot registration
    pub const FCVAR_SS_ADDED: u32 = 1 << 18;
    /// Available in release
    pub const FCVAR_RELEASE: u32 = 1 << 19;
    /// Cannot change when connected
    pub const FCVAR_NOT_CONNECTED: u32 = 1 << 22;
    /// Server can execute on clients
    pub const FCVAR_SERVER_CAN_EXECUTE: u32 = 1 << 28;
    /// Server cannot query
    pub const FCVAR_SERVER_CANNOT_QUERY: u32 = 1 << 29;
    /// ClientCmd can execute
    pub const FCVAR_CLIENTCMD_CAN_EXECUTE: u32 = 1 << 30;
}
