//! Registry entry types
//!
//! Commands and variables share a name, help text and flags; everything
//! else is variant-specific.

use std::fmt;
use std::sync::Arc;

use super::flags::CvarFlags;
use super::value::CvarValue;
use crate::commands::CommandArgs;

/// Handler invoked when a ConCommand is dispatched
pub type CommandHandler = Arc<dyn Fn(&CommandArgs) + Send + Sync>;

/// Change notification: `(entry, old string value, old float value)`
pub type ChangeCallback = Box<dyn Fn(&RegistryEntry, &str, f32) + Send + Sync>;

/// A named console command or variable
pub struct RegistryEntry {
    name: String,
    help: String,
    flags: CvarFlags,
    kind: EntryKind,
}

/// What a registry entry is
pub enum EntryKind {
    Command(ConCommand),
    Variable(ConVar),
}

impl RegistryEntry {
    pub(crate) fn new(name: &str, help: &str, flags: CvarFlags, kind: EntryKind) -> Self {
        Self {
            name: name.to_string(),
            help: help.to_string(),
            flags,
            kind,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Help text (may be empty)
    pub fn help(&self) -> &str {
        &self.help
    }

    pub fn flags(&self) -> CvarFlags {
        self.flags
    }

    /// Check if any of `flags` is set
    pub fn is_flag_set(&self, flags: CvarFlags) -> bool {
        self.flags.intersects(flags)
    }

    pub fn add_flags(&mut self, flags: CvarFlags) {
        self.flags.insert(flags);
    }

    pub fn remove_flags(&mut self, flags: CvarFlags) {
        self.flags.remove(flags);
    }

    pub fn set_flags(&mut self, flags: CvarFlags) {
        self.flags = flags;
    }

    pub fn kind(&self) -> &EntryKind {
        &self.kind
    }

    pub fn is_command(&self) -> bool {
        matches!(self.kind, EntryKind::Command(_))
    }

    pub fn as_command(&self) -> Option<&ConCommand> {
        match &self.kind {
            EntryKind::Command(command) => Some(command),
            EntryKind::Variable(_) => None,
        }
    }

    pub fn as_var(&self) -> Option<&ConVar> {
        match &self.kind {
            EntryKind::Variable(var) => Some(var),
            EntryKind::Command(_) => None,
        }
    }

    pub fn as_var_mut(&mut self) -> Option<&mut ConVar> {
        match &mut self.kind {
            EntryKind::Variable(var) => Some(var),
            EntryKind::Command(_) => None,
        }
    }

    /// Current string value, `None` for commands
    pub fn value_string(&self) -> Option<&str> {
        self.as_var().map(ConVar::string_value)
    }
}

impl fmt::Debug for RegistryEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistryEntry")
            .field("name", &self.name)
            .field("flags", &self.flags)
            .field("kind", &self.kind)
            .finish()
    }
}

impl fmt::Debug for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Command(_) => f.write_str("Command"),
            Self::Variable(var) => f.debug_tuple("Variable").field(var).finish(),
        }
    }
}

/// A console command
pub struct ConCommand {
    handler: CommandHandler,
}

impl ConCommand {
    pub fn new<F>(handler: F) -> Self
    where
        F: Fn(&CommandArgs) + Send + Sync + 'static,
    {
        Self {
            handler: Arc::new(handler),
        }
    }

    /// Run the handler with the given arguments
    pub fn dispatch(&self, args: &CommandArgs) {
        (self.handler)(args)
    }

    /// Shared handle to the handler, usable after the registry is released
    pub fn handler(&self) -> CommandHandler {
        Arc::clone(&self.handler)
    }
}

/// A console variable
pub struct ConVar {
    value: CvarValue,
    default: String,
    min: Option<f32>,
    max: Option<f32>,
    callbacks: Vec<ChangeCallback>,
}

impl ConVar {
    pub fn new(default: &str) -> Self {
        Self {
            value: CvarValue::new(default),
            default: default.to_string(),
            min: None,
            max: None,
            callbacks: Vec::new(),
        }
    }

    pub fn int_value(&self) -> i32 {
        self.value.int_value()
    }

    pub fn float_value(&self) -> f32 {
        self.value.float_value()
    }

    pub fn string_value(&self) -> &str {
        self.value.string_value()
    }

    pub fn value(&self) -> &CvarValue {
        &self.value
    }

    pub(crate) fn value_mut(&mut self) -> &mut CvarValue {
        &mut self.value
    }

    pub fn default_value(&self) -> &str {
        &self.default
    }

    pub fn min(&self) -> Option<f32> {
        self.min
    }

    pub fn max(&self) -> Option<f32> {
        self.max
    }

    /// Clamp `value` to the configured bounds
    ///
    /// Returns the clamped value and whether clamping happened.
    pub fn clamp(&self, value: f32) -> (f32, bool) {
        if let Some(min) = self.min {
            if value < min {
                return (min, true);
            }
        }
        if let Some(max) = self.max {
            if value > max {
                return (max, true);
            }
        }
        (value, false)
    }

    /// Bind a change callback; bound callbacks run in registration order
    pub fn add_change_callback(&mut self, callback: ChangeCallback) {
        self.callbacks.push(callback);
    }

    pub fn callback_count(&self) -> usize {
        self.callbacks.len()
    }

    pub(crate) fn callbacks(&self) -> &[ChangeCallback] {
        &self.callbacks
    }
}

impl fmt::Debug for ConVar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConVar")
            .field("value", &self.value)
            .field("default", &self.default)
            .field("min", &self.min)
            .field("max", &self.max)
            .field("callbacks", &self.callbacks.len())
            .finish()
    }
}

/// Definition of a variable to register
///
/// ```ignore
/// registry.register_var(
///     ConVarDef::new("sv_gravity", "800")
///         .with_help("World gravity")
///         .with_flags(CvarFlags::REPLICATED)
///         .with_min(0.0),
/// )?;
/// ```
pub struct ConVarDef {
    pub(crate) name: String,
    pub(crate) help: String,
    pub(crate) flags: CvarFlags,
    pub(crate) var: ConVar,
}

impl ConVarDef {
    pub fn new(name: &str, default: &str) -> Self {
        Self {
            name: name.to_string(),
            help: String::new(),
            flags: CvarFlags::empty(),
            var: ConVar::new(default),
        }
    }

    pub fn with_help(mut self, help: &str) -> Self {
        self.help = help.to_string();
        self
    }

    pub fn with_flags(mut self, flags: CvarFlags) -> Self {
        self.flags = flags;
        self
    }

    pub fn with_min(mut self, min: f32) -> Self {
        self.var.min = Some(min);
        self
    }

    pub fn with_max(mut self, max: f32) -> Self {
        self.var.max = Some(max);
        self
    }

    pub fn with_on_change<F>(mut self, callback: F) -> Self
    where
        F: Fn(&RegistryEntry, &str, f32) + Send + Sync + 'static,
    {
        self.var.add_change_callback(Box::new(callback));
        self
    }
}
