//! Plugin lifecycle
//!
//! [`ServerPlugin`] is everything the plugin owns between the host's load
//! and unload calls: the engine interfaces, the mirrored registry, the
//! server class list and the config. Before [`ServerPlugin::load`] succeeds
//! (and after [`ServerPlugin::unload`]) there is no engine context and no
//! command is handled.

use cvar_unhide_engine::{EngineGlobals, InterfaceError};

use crate::commands::{
    mutator, netprops, scanner, CommandArgs, ConsoleOutput, PreparedDispatch, ServerClass,
    CVARLIST_ALL, CVAR_SET, CVAR_UNHIDE_ALL, DUMP_NETPROPS, FIND_ALL, FORCE_DISPATCH,
};
use crate::config::CoreConfig;
use crate::launch::{self, CommandLine, INSECURE_PARM};
use crate::registry::CvarRegistry;

/// Plugin name as shown to the host
pub const PLUGIN_NAME: &str = "cvar-unhide";

/// Plugin version
pub const PLUGIN_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Errors that abort plugin activation
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("Missing launch option {0}")]
    MissingLaunchSafeguard(&'static str),

    #[error(transparent)]
    Interface(#[from] InterfaceError),

    #[error("Plugin is already loaded")]
    AlreadyLoaded,
}

/// Return value of the host's client hooks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(i32)]
pub enum PluginResult {
    /// Keep going, let the host and other plugins process the event
    #[default]
    Continue = 0,
    /// Run the game's handler but use our return value
    Override = 1,
    /// Don't run the game's handler
    Stop = 2,
}

/// What happened to a console line handed to the plugin
#[derive(Debug)]
pub enum CommandOutcome {
    /// Not one of the plugin's commands (or the plugin isn't loaded)
    NotHandled,
    /// Command ran to completion
    Handled,
    /// `force_dispatch` resolved; the caller runs it once the plugin is released
    Dispatch(PreparedDispatch),
}

/// Plugin state
pub struct ServerPlugin {
    engine: Option<EngineGlobals>,
    registry: CvarRegistry,
    server_classes: Vec<ServerClass>,
    config: CoreConfig,
    command_client: i32,
    current_map: Option<String>,
}

impl ServerPlugin {
    pub fn new(config: CoreConfig) -> Self {
        Self {
            engine: None,
            registry: CvarRegistry::new(),
            server_classes: Vec::new(),
            config,
            command_client: -1,
            current_map: None,
        }
    }

    /// Check if load completed and unload hasn't happened yet
    pub fn is_loaded(&self) -> bool {
        self.engine.is_some()
    }

    pub fn engine(&self) -> Option<&EngineGlobals> {
        self.engine.as_ref()
    }

    pub fn registry(&self) -> &CvarRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut CvarRegistry {
        &mut self.registry
    }

    pub fn config(&self) -> &CoreConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: CoreConfig) {
        self.config = config;
    }

    pub fn server_classes(&self) -> &[ServerClass] {
        &self.server_classes
    }

    pub fn set_server_classes(&mut self, classes: Vec<ServerClass>) {
        tracing::debug!("Received {} server classes", classes.len());
        self.server_classes = classes;
    }

    /// Activate the plugin
    ///
    /// Checks the launch safeguard (when enabled), then resolves the engine
    /// interfaces through `resolve`. Any failure leaves the plugin unloaded.
    pub fn load<F>(
        &mut self,
        command_line: &mut CommandLine,
        resolve: F,
        out: &mut dyn ConsoleOutput,
    ) -> Result<(), LoadError>
    where
        F: FnOnce() -> Result<EngineGlobals, InterfaceError>,
    {
        if self.is_loaded() {
            return Err(LoadError::AlreadyLoaded);
        }

        if self.config.require_insecure && !launch::check_insecure(command_line, out) {
            return Err(LoadError::MissingLaunchSafeguard(INSECURE_PARM));
        }

        let engine = resolve().map_err(|e| {
            out.warning(&format!("{}: {}", PLUGIN_NAME, e));
            LoadError::from(e)
        })?;

        tracing::info!("{} loaded ({:?})", self.description(), engine);
        self.engine = Some(engine);
        Ok(())
    }

    /// Tear down: drop the engine context and everything mirrored from the host
    pub fn unload(&mut self) {
        if self.engine.take().is_some() {
            tracing::info!("{} unloading", PLUGIN_NAME);
        }
        self.registry = CvarRegistry::new();
        self.server_classes.clear();
        self.command_client = -1;
        self.current_map = None;
    }

    /// Description string reported to the host
    pub fn description(&self) -> String {
        format!("{}, {}", PLUGIN_NAME, PLUGIN_VERSION)
    }

    pub fn level_init(&mut self, map_name: &str) {
        tracing::debug!("Level init: {}", map_name);
        self.current_map = Some(map_name.to_string());
    }

    pub fn level_shutdown(&mut self) {
        tracing::debug!("Level shutdown");
        self.current_map = None;
    }

    pub fn current_map(&self) -> Option<&str> {
        self.current_map.as_deref()
    }

    /// Remember which client issued the command being processed
    pub fn set_command_client(&mut self, index: i32) {
        self.command_client = index;
    }

    /// Client index of the current command (-1 for the server console)
    pub fn command_client(&self) -> i32 {
        self.command_client
    }

    pub fn pause(&mut self) {
        tracing::trace!("Pause");
    }

    pub fn unpause(&mut self) {
        tracing::trace!("UnPause");
    }

    pub fn server_activate(&mut self, edict_count: i32, client_max: i32) {
        tracing::trace!("ServerActivate: {} edicts, {} clients", edict_count, client_max);
    }

    pub fn game_frame(&mut self, _simulating: bool) {}

    pub fn client_active(&mut self, _slot: i32) {}

    pub fn client_disconnect(&mut self, _slot: i32) {}

    pub fn client_put_in_server(&mut self, _slot: i32, _name: &str) {}

    pub fn client_settings_changed(&mut self, _slot: i32) {}

    pub fn client_connect(&mut self, slot: i32, name: &str, address: &str) -> PluginResult {
        tracing::trace!("ClientConnect: {} {} ({})", slot, name, address);
        PluginResult::Continue
    }

    pub fn client_command(&mut self, _slot: i32, _args: &CommandArgs) -> PluginResult {
        PluginResult::Continue
    }

    pub fn network_id_validated(&mut self, _user_name: &str, _network_id: &str) -> PluginResult {
        PluginResult::Continue
    }

    /// Run one of the plugin's console commands
    ///
    /// Usage and lookup failures are printed as warnings and still count as
    /// handled. `force_dispatch` is returned unresolved so the target runs
    /// without the plugin borrowed.
    pub fn execute(&mut self, args: &CommandArgs, out: &mut dyn ConsoleOutput) -> CommandOutcome {
        if !self.is_loaded() {
            return CommandOutcome::NotHandled;
        }

        let result = match args.command_name() {
            CVAR_UNHIDE_ALL => {
                scanner::unhide_all(&mut self.registry, out);
                Ok(None)
            }
            FIND_ALL => scanner::find_all(&self.registry, args, out).map(|_| None),
            CVARLIST_ALL => {
                scanner::list_all(&self.registry, args, self.config.list_name_width, out);
                Ok(None)
            }
            FORCE_DISPATCH => mutator::prepare_dispatch(&self.registry, args).map(Some),
            CVAR_SET => mutator::set_raw(&mut self.registry, args, out).map(|_| None),
            DUMP_NETPROPS => {
                netprops::dump_netprops(&self.server_classes, args, out);
                Ok(None)
            }
            _ => return CommandOutcome::NotHandled,
        };

        match result {
            Ok(Some(dispatch)) => CommandOutcome::Dispatch(dispatch),
            Ok(None) => CommandOutcome::Handled,
            Err(e) => {
                out.warning(&e.to_string());
                CommandOutcome::Handled
            }
        }
    }

    /// Tokenize and run a console line, including any forced dispatch
    ///
    /// Returns whether the line was one of the plugin's commands.
    pub fn run(&mut self, line: &str, out: &mut dyn ConsoleOutput) -> bool {
        match self.execute(&CommandArgs::tokenize(line), out) {
            CommandOutcome::NotHandled => false,
            CommandOutcome::Handled => true,
            CommandOutcome::Dispatch(dispatch) => {
                dispatch.invoke(out);
                true
            }
        }
    }
}

impl Default for ServerPlugin {
    fn default() -> Self {
        Self::new(CoreConfig::default())
    }
}
