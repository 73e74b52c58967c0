//! Console commands exposed by the plugin
//!
//! | Command            | Effect                                              |
//! |--------------------|-----------------------------------------------------|
//! | `cvar_unhide_all`  | strip hidden/development-only flags from everything |
//! | `find_all`         | case-insensitive search over names and help text    |
//! | `cvarlist_all`     | sorted table of every entry (`hidden` filters)      |
//! | `force_dispatch`   | run a command bypassing host restrictions           |
//! | `cvar_set`         | overwrite a variable's raw value                    |
//! | `dump_netprops`    | print networked class property layouts             |

mod args;
pub mod mutator;
pub mod netprops;
pub mod print;
pub mod scanner;

pub use args::{CommandArgs, COMMAND_MAX_ARGC, COMMAND_MAX_LENGTH};
pub use mutator::{force_dispatch, prepare_dispatch, set_raw, PreparedDispatch, SetRawOutcome};
pub use netprops::{dump_netprops, SendProp, SendPropKind, SendTable, ServerClass};
pub use print::{BufferedConsole, Color, ConsoleOutput, MessageLevel, TracingConsole};
pub use scanner::{find_all, list_all, unhide_all};

pub const CVAR_UNHIDE_ALL: &str = "cvar_unhide_all";
pub const FIND_ALL: &str = "find_all";
pub const CVARLIST_ALL: &str = "cvarlist_all";
pub const FORCE_DISPATCH: &str = "force_dispatch";
pub const CVAR_SET: &str = "cvar_set";
pub const DUMP_NETPROPS: &str = "dump_netprops";

/// Name and help text of a plugin command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PluginCommand {
    pub name: &'static str,
    pub help: &'static str,
}

/// Every command the plugin registers with the host
pub const PLUGIN_COMMANDS: &[PluginCommand] = &[
    PluginCommand {
        name: CVAR_UNHIDE_ALL,
        help: "Removes FCVAR_DEVELOPMENTONLY and FCVAR_HIDDEN from all ConVars and ConCommands",
    },
    PluginCommand {
        name: FIND_ALL,
        help: "Find ConVars and ConCommands by name or description, hidden ones included",
    },
    PluginCommand {
        name: CVARLIST_ALL,
        help: "List all ConVars and ConCommands. Pass 'hidden' to only list hidden ones",
    },
    PluginCommand {
        name: FORCE_DISPATCH,
        help: "Dispatch a ConCommand directly, ignoring its flags",
    },
    PluginCommand {
        name: CVAR_SET,
        help: "Set a ConVar's raw value, ignoring bounds. Pass 'nocallback' to skip change callbacks",
    },
    PluginCommand {
        name: DUMP_NETPROPS,
        help: "Dump the networked properties of every server class. Optional depth (-1 for all)",
    },
];

/// Check if `name` is one of the plugin's own commands
pub fn is_plugin_command(name: &str) -> bool {
    PLUGIN_COMMANDS.iter().any(|c| c.name == name)
}

/// Command failures reported to the console
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    #[error("{command}: Syntax: {syntax}")]
    Usage {
        command: &'static str,
        syntax: &'static str,
    },

    #[error("force_dispatch: Unable to find ConCommand {0}")]
    CommandNotFound(String),

    #[error("cvar_set: Unable to find ConVar {0}")]
    VariableNotFound(String),
}

impl CommandError {
    pub fn usage(command: &'static str, syntax: &'static str) -> Self {
        Self::Usage { command, syntax }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plugin_commands() {
        assert_eq!(PLUGIN_COMMANDS.len(), 6);
        assert!(is_plugin_command("cvar_set"));
        assert!(!is_plugin_command("CVAR_SET"));
        assert!(!is_plugin_command("sv_cheats"));
    }

    #[test]
    fn test_usage_message() {
        let err = CommandError::usage(FIND_ALL, "<search>");
        assert_eq!(err.to_string(), "find_all: Syntax: <search>");
    }
}
