//! Typed ConVar/ConCommand flags

use bitflags::bitflags;
use cvar_unhide_sdk::flags as raw;

bitflags! {
    /// Flags carried by every registry entry
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct CvarFlags: u32 {
        const UNREGISTERED = raw::FCVAR_UNREGISTERED;
        const DEVELOPMENTONLY = raw::FCVAR_DEVELOPMENTONLY;
        const GAMEDLL = raw::FCVAR_GAMEDLL;
        const CLIENTDLL = raw::FCVAR_CLIENTDLL;
        const HIDDEN = raw::FCVAR_HIDDEN;
        const PROTECTED = raw::FCVAR_PROTECTED;
        const SPONLY = raw::FCVAR_SPONLY;
        const ARCHIVE = raw::FCVAR_ARCHIVE;
        const NOTIFY = raw::FCVAR_NOTIFY;
        const USERINFO = raw::FCVAR_USERINFO;
        const PRINTABLEONLY = raw::FCVAR_PRINTABLEONLY;
        const UNLOGGED = raw::FCVAR_UNLOGGED;
        const NEVER_AS_STRING = raw::FCVAR_NEVER_AS_STRING;
        const REPLICATED = raw::FCVAR_REPLICATED;
        const CHEAT = raw::FCVAR_CHEAT;
        const SS = raw::FCVAR_SS;
        const DEMO = raw::FCVAR_DEMO;
        const DONTRECORD = raw::FCVAR_DONTRECORD;
        const SS_ADDED = raw::FCVAR_SS_ADDED;
        const RELEASE = raw::FCVAR_RELEASE;
        const NOT_CONNECTED = raw::FCVAR_NOT_CONNECTED;
        const SERVER_CAN_EXECUTE = raw::FCVAR_SERVER_CAN_EXECUTE;
        const SERVER_CANNOT_QUERY = raw::FCVAR_SERVER_CANNOT_QUERY;
        const CLIENTCMD_CAN_EXECUTE = raw::FCVAR_CLIENTCMD_CAN_EXECUTE;
    }
}

impl CvarFlags {
    /// Flags that keep an entry out of normal console listings
    pub const HIDDEN_MASK: Self = Self::DEVELOPMENTONLY.union(Self::HIDDEN);

    /// Check if the entry is hidden or development-only
    pub fn is_hidden(self) -> bool {
        self.intersects(Self::HIDDEN_MASK)
    }
}

/// Display names for one flag
#[derive(Debug, Clone, Copy)]
pub struct FlagName {
    pub flag: CvarFlags,
    /// Short token used in listings
    pub short: &'static str,
    /// Long name used in descriptions
    pub long: &'static str,
}

/// Flags that have display names, in listing order
pub const FLAG_NAMES: &[FlagName] = &[
    FlagName {
        flag: CvarFlags::DEVELOPMENTONLY,
        short: "devonly",
        long: "developmentonly",
    },
    FlagName {
        flag: CvarFlags::GAMEDLL,
        short: "sv",
        long: "game",
    },
    FlagName {
        flag: CvarFlags::CLIENTDLL,
        short: "cl",
        long: "client",
    },
    FlagName {
        flag: CvarFlags::HIDDEN,
        short: "hidden",
        long: "hidden",
    },
    FlagName {
        flag: CvarFlags::PROTECTED,
        short: "prot",
        long: "protected",
    },
    FlagName {
        flag: CvarFlags::SPONLY,
        short: "sp",
        long: "singleplayer",
    },
    FlagName {
        flag: CvarFlags::ARCHIVE,
        short: "a",
        long: "archive",
    },
    FlagName {
        flag: CvarFlags::NOTIFY,
        short: "nf",
        long: "notify",
    },
    FlagName {
        flag: CvarFlags::USERINFO,
        short: "user",
        long: "userinfo",
    },
    FlagName {
        flag: CvarFlags::PRINTABLEONLY,
        short: "print",
        long: "printableonly",
    },
    FlagName {
        flag: CvarFlags::NEVER_AS_STRING,
        short: "numeric",
        long: "never_as_string",
    },
    FlagName {
        flag: CvarFlags::REPLICATED,
        short: "rep",
        long: "replicated",
    },
    FlagName {
        flag: CvarFlags::CHEAT,
        short: "cheat",
        long: "cheat",
    },
    FlagName {
        flag: CvarFlags::SS,
        short: "ss",
        long: "ss",
    },
    FlagName {
        flag: CvarFlags::DEMO,
        short: "demo",
        long: "demo",
    },
    FlagName {
        flag: CvarFlags::DONTRECORD,
        short: "norecord",
        long: "dontrecord",
    },
];

/// Render the short flag tokens as a quoted, comma-separated list
///
/// `ARCHIVE | CHEAT` becomes `"a", "cheat"`. Flags without a display name
/// are skipped.
pub fn flags_summary(flags: CvarFlags) -> String {
    FLAG_NAMES
        .iter()
        .filter(|f| flags.contains(f.flag))
        .map(|f| format!("\"{}\"", f.short))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Render the long flag names as a space-separated list
pub fn flags_description(flags: CvarFlags) -> String {
    FLAG_NAMES
        .iter()
        .filter(|f| flags.contains(f.flag))
        .map(|f| f.long)
        .collect::<Vec<_>>()
        .join(" ")
}
