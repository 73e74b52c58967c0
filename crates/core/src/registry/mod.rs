//! Console variable and command registry
//!
//! Every ConVar and ConCommand the host knows about lives here. Entries are
//! stored in a slotmap and indexed by exact (case-sensitive) name.
//!
//! # Change notification
//!
//! When a variable's value changes, callbacks bound to that variable run
//! first (in registration order), then the global chain (in registration
//! order). Each receives the entry plus the old string and float values.

mod entry;
mod flags;
mod value;

use std::collections::HashMap;

use slotmap::{new_key_type, SlotMap};

pub use entry::{
    ChangeCallback, CommandHandler, ConCommand, ConVar, ConVarDef, EntryKind, RegistryEntry,
};
pub use flags::{flags_description, flags_summary, CvarFlags, FlagName, FLAG_NAMES};
pub use value::{parse_float, parse_int, CvarValue, RawString};

use crate::commands::CommandArgs;

new_key_type! {
    /// Handle for a registry entry
    pub struct EntryKey;
}

/// Registry errors
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("'{0}' is already registered")]
    AlreadyRegistered(String),

    #[error("No ConVar or ConCommand named '{0}'")]
    NotFound(String),

    #[error("'{0}' is not a ConVar")]
    NotAVariable(String),

    #[error("'{0}' is not a ConCommand")]
    NotACommand(String),
}

/// The set of registered commands and variables
#[derive(Default)]
pub struct CvarRegistry {
    entries: SlotMap<EntryKey, RegistryEntry>,
    by_name: HashMap<String, EntryKey>,
    global_callbacks: Vec<ChangeCallback>,
}

impl CvarRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn insert(&mut self, entry: RegistryEntry) -> Result<EntryKey, RegistryError> {
        if self.by_name.contains_key(entry.name()) {
            tracing::warn!("'{}' already registered", entry.name());
            return Err(RegistryError::AlreadyRegistered(entry.name().to_string()));
        }

        let name = entry.name().to_string();
        let key = self.entries.insert(entry);
        self.by_name.insert(name.clone(), key);

        tracing::debug!("Registered {}", name);
        Ok(key)
    }

    /// Register a console command
    pub fn register_command<F>(
        &mut self,
        name: &str,
        help: &str,
        flags: CvarFlags,
        handler: F,
    ) -> Result<EntryKey, RegistryError>
    where
        F: Fn(&CommandArgs) + Send + Sync + 'static,
    {
        self.insert(RegistryEntry::new(
            name,
            help,
            flags,
            EntryKind::Command(ConCommand::new(handler)),
        ))
    }

    /// Register a console variable
    pub fn register_var(&mut self, def: ConVarDef) -> Result<EntryKey, RegistryError> {
        self.insert(RegistryEntry::new(
            &def.name,
            &def.help,
            def.flags,
            EntryKind::Variable(def.var),
        ))
    }

    /// Remove an entry by name
    pub fn unregister(&mut self, name: &str) -> bool {
        let Some(key) = self.by_name.remove(name) else {
            return false;
        };
        self.entries.remove(key);
        tracing::debug!("Unregistered {}", name);
        true
    }

    pub fn get(&self, key: EntryKey) -> Option<&RegistryEntry> {
        self.entries.get(key)
    }

    /// Look up an entry by exact name
    pub fn find(&self, name: &str) -> Option<&RegistryEntry> {
        self.by_name.get(name).and_then(|&key| self.entries.get(key))
    }

    pub fn find_mut(&mut self, name: &str) -> Option<&mut RegistryEntry> {
        let key = *self.by_name.get(name)?;
        self.entries.get_mut(key)
    }

    /// Look up a command; variables with that name don't match
    pub fn find_command(&self, name: &str) -> Option<&ConCommand> {
        self.find(name).and_then(RegistryEntry::as_command)
    }

    /// Look up a variable; commands with that name don't match
    pub fn find_var(&self, name: &str) -> Option<&ConVar> {
        self.find(name).and_then(RegistryEntry::as_var)
    }

    pub fn find_var_mut(&mut self, name: &str) -> Option<&mut ConVar> {
        self.find_mut(name).and_then(RegistryEntry::as_var_mut)
    }

    /// Iterate over all entries in unspecified order
    pub fn iter(&self) -> impl Iterator<Item = &RegistryEntry> {
        self.entries.values()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut RegistryEntry> {
        self.entries.values_mut()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Bind a change callback to one variable
    pub fn add_change_callback(
        &mut self,
        name: &str,
        callback: ChangeCallback,
    ) -> Result<(), RegistryError> {
        let entry = self
            .find_mut(name)
            .ok_or_else(|| RegistryError::NotFound(name.to_string()))?;
        let var = entry
            .as_var_mut()
            .ok_or_else(|| RegistryError::NotAVariable(name.to_string()))?;
        var.add_change_callback(callback);
        Ok(())
    }

    /// Add a callback that runs after any variable's bound callbacks
    pub fn add_global_change_callback(&mut self, callback: ChangeCallback) {
        self.global_callbacks.push(callback);
    }

    pub fn global_callback_count(&self) -> usize {
        self.global_callbacks.len()
    }

    /// Run the change chain for `name`
    ///
    /// Bound callbacks run first, then global ones. Returns how many ran;
    /// 0 if `name` is not a variable.
    pub fn notify_change(&self, name: &str, old_value: &str, old_float: f32) -> usize {
        let Some(entry) = self.find(name) else {
            return 0;
        };
        let Some(var) = entry.as_var() else {
            return 0;
        };

        for callback in var.callbacks() {
            callback(entry, old_value, old_float);
        }
        for callback in &self.global_callbacks {
            callback(entry, old_value, old_float);
        }

        var.callbacks().len() + self.global_callbacks.len()
    }

    /// Set a variable the way the host's own setter does
    ///
    /// The new value is parsed as a float and clamped to the variable's
    /// bounds; a clamped value is stored in `%f` form. Callbacks run only if
    /// the string value actually changed. Returns whether it changed.
    pub fn set_value(&mut self, name: &str, value: &str) -> Result<bool, RegistryError> {
        let entry = self
            .find_mut(name)
            .ok_or_else(|| RegistryError::NotFound(name.to_string()))?;
        let var = entry
            .as_var_mut()
            .ok_or_else(|| RegistryError::NotAVariable(name.to_string()))?;

        let old_value = var.string_value().to_string();
        let old_float = var.float_value();

        let (clamped, was_clamped) = var.clamp(parse_float(value));
        if was_clamped {
            var.value_mut().store(clamped, &format!("{:.6}", clamped));
        } else {
            var.value_mut().store(clamped, value);
        }

        let changed = var.string_value() != old_value;
        if changed {
            self.notify_change(name, &old_value, old_float);
        }
        Ok(changed)
    }

    /// Mirror a value the host has already stored
    ///
    /// The string is taken verbatim: no clamping and no callbacks, since the
    /// host ran both before reporting the change.
    pub fn sync_value(&mut self, name: &str, value: &str) -> Result<(), RegistryError> {
        let entry = self
            .find_mut(name)
            .ok_or_else(|| RegistryError::NotFound(name.to_string()))?;
        let var = entry
            .as_var_mut()
            .ok_or_else(|| RegistryError::NotAVariable(name.to_string()))?;
        var.value_mut().overwrite(value);
        Ok(())
    }

    /// Replace the flags of an entry
    pub fn set_flags(&mut self, name: &str, flags: CvarFlags) -> Result<(), RegistryError> {
        let entry = self
            .find_mut(name)
            .ok_or_else(|| RegistryError::NotFound(name.to_string()))?;
        entry.set_flags(flags);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::sync::Arc;

    fn recorder() -> (Arc<Mutex<Vec<String>>>, impl Fn(&str) -> ChangeCallback) {
        let log = Arc::new(Mutex::new(Vec::new()));
        let make = {
            let log = Arc::clone(&log);
            move |tag: &str| -> ChangeCallback {
                let log = Arc::clone(&log);
                let tag = tag.to_string();
                Box::new(move |entry: &RegistryEntry, old: &str, old_float: f32| {
                    log.lock().push(format!(
                        "{}:{}:{}->{}:{}",
                        tag,
                        entry.name(),
                        old,
                        entry.value_string().unwrap_or(""),
                        old_float
                    ));
                })
            }
        };
        (log, make)
    }

    #[test]
    fn test_register_and_find() {
        let mut registry = CvarRegistry::new();
        registry.register_var(ConVarDef::new("sv_cheats", "0")).unwrap();
        registry
            .register_command("status", "", CvarFlags::empty(), |_| {})
            .unwrap();

        assert_eq!(registry.len(), 2);
        assert!(registry.find_var("sv_cheats").is_some());
        assert!(registry.find_command("sv_cheats").is_none());
        assert!(registry.find_command("status").is_some());
        assert!(registry.find_var("status").is_none());
    }

    #[test]
    fn test_lookup_is_case_sensitive() {
        let mut registry = CvarRegistry::new();
        registry.register_var(ConVarDef::new("sv_cheats", "0")).unwrap();
        assert!(registry.find("SV_CHEATS").is_none());
    }

    #[test]
    fn test_duplicate_rejected() {
        let mut registry = CvarRegistry::new();
        registry.register_var(ConVarDef::new("x", "0")).unwrap();
        let err = registry
            .register_command("x", "", CvarFlags::empty(), |_| {})
            .unwrap_err();
        assert!(matches!(err, RegistryError::AlreadyRegistered(_)));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_unregister() {
        let mut registry = CvarRegistry::new();
        registry.register_var(ConVarDef::new("x", "0")).unwrap();
        assert!(registry.unregister("x"));
        assert!(!registry.unregister("x"));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_callbacks_bound_then_global() {
        let (log, make) = recorder();
        let mut registry = CvarRegistry::new();
        registry.register_var(ConVarDef::new("x", "1")).unwrap();
        registry.add_change_callback("x", make("b1")).unwrap();
        registry.add_global_change_callback(make("g1"));
        registry.add_change_callback("x", make("b2")).unwrap();
        registry.add_global_change_callback(make("g2"));

        assert!(registry.set_value("x", "2").unwrap());

        assert_eq!(
            *log.lock(),
            vec!["b1:x:1->2:1", "b2:x:1->2:1", "g1:x:1->2:1", "g2:x:1->2:1"]
        );
    }

    #[test]
    fn test_set_value_unchanged_skips_callbacks() {
        let (log, make) = recorder();
        let mut registry = CvarRegistry::new();
        registry.register_var(ConVarDef::new("x", "1")).unwrap();
        registry.add_global_change_callback(make("g"));

        assert!(!registry.set_value("x", "1").unwrap());
        assert!(log.lock().is_empty());
    }

    #[test]
    fn test_set_value_clamps() {
        let mut registry = CvarRegistry::new();
        registry
            .register_var(ConVarDef::new("x", "5").with_min(0.0).with_max(10.0))
            .unwrap();

        registry.set_value("x", "50").unwrap();
        let var = registry.find_var("x").unwrap();
        assert_eq!(var.string_value(), "10.000000");
        assert_eq!(var.float_value(), 10.0);
        assert_eq!(var.int_value(), 10);

        registry.set_value("x", "7").unwrap();
        assert_eq!(registry.find_var("x").unwrap().string_value(), "7");
    }

    #[test]
    fn test_set_value_errors() {
        let mut registry = CvarRegistry::new();
        registry
            .register_command("cmd", "", CvarFlags::empty(), |_| {})
            .unwrap();

        assert!(matches!(
            registry.set_value("missing", "1"),
            Err(RegistryError::NotFound(_))
        ));
        assert!(matches!(
            registry.set_value("cmd", "1"),
            Err(RegistryError::NotAVariable(_))
        ));
    }

    #[test]
    fn test_sync_value_mirrors_without_callbacks() {
        let (log, make) = recorder();
        let mut registry = CvarRegistry::new();
        registry
            .register_var(ConVarDef::new("sv_gravity", "800").with_max(600.0))
            .unwrap();
        registry
            .add_change_callback("sv_gravity", make("b"))
            .unwrap();
        registry.add_global_change_callback(make("g"));

        registry.sync_value("sv_gravity", "900").unwrap();

        let var = registry.find_var("sv_gravity").unwrap();
        assert_eq!(var.string_value(), "900");
        assert_eq!(var.int_value(), 900);
        assert_eq!(var.float_value(), 900.0);
        assert!(log.lock().is_empty());

        registry.set_value("sv_gravity", "500").unwrap();
        assert_eq!(
            *log.lock(),
            vec!["b:sv_gravity:900->500:900", "g:sv_gravity:900->500:900"]
        );
    }

    #[test]
    fn test_sync_value_errors() {
        let mut registry = CvarRegistry::new();
        registry
            .register_command("cmd", "", CvarFlags::empty(), |_| {})
            .unwrap();

        assert!(matches!(
            registry.sync_value("missing", "1"),
            Err(RegistryError::NotFound(_))
        ));
        assert!(matches!(
            registry.sync_value("cmd", "1"),
            Err(RegistryError::NotAVariable(_))
        ));
    }

    #[test]
    fn test_set_flags_replaces() {
        let mut registry = CvarRegistry::new();
        registry
            .register_var(ConVarDef::new("x", "0").with_flags(CvarFlags::HIDDEN))
            .unwrap();

        registry
            .set_flags("x", CvarFlags::CHEAT | CvarFlags::REPLICATED)
            .unwrap();
        let entry = registry.find("x").unwrap();
        assert_eq!(entry.flags(), CvarFlags::CHEAT | CvarFlags::REPLICATED);
        assert!(!entry.flags().is_hidden());

        assert!(matches!(
            registry.set_flags("missing", CvarFlags::empty()),
            Err(RegistryError::NotFound(_))
        ));
    }

    #[test]
    fn test_notify_change_on_command_is_noop() {
        let (log, make) = recorder();
        let mut registry = CvarRegistry::new();
        registry
            .register_command("cmd", "", CvarFlags::empty(), |_| {})
            .unwrap();
        registry.add_global_change_callback(make("g"));

        assert_eq!(registry.notify_change("cmd", "", 0.0), 0);
        assert!(log.lock().is_empty());
    }
}
