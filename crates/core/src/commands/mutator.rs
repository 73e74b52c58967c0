//! Commands that bypass the host's own safety checks
//!
//! `force_dispatch` runs a command handler directly, ignoring whatever flags
//! would normally block it. `cvar_set` overwrites a variable's storage
//! without clamping or change detection.

use super::{CommandArgs, CommandError, ConsoleOutput, CVAR_SET, FORCE_DISPATCH};
use crate::registry::{CommandHandler, CvarRegistry};

/// Trailing argument that suppresses change callbacks in `cvar_set`
pub const NO_CALLBACK_ARG: &str = "nocallback";

/// A resolved `force_dispatch`, ready to run
///
/// Holds its own handle to the handler so it can be invoked after the
/// registry has been released; handlers are free to call back into it.
pub struct PreparedDispatch {
    name: String,
    handler: CommandHandler,
    args: CommandArgs,
}

impl PreparedDispatch {
    /// Name of the target command
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Arguments the handler will receive
    pub fn args(&self) -> &CommandArgs {
        &self.args
    }

    /// Run the handler and report it
    pub fn invoke(self, out: &mut dyn ConsoleOutput) {
        tracing::debug!("{}: dispatching {}", FORCE_DISPATCH, self.args.raw());
        (self.handler)(&self.args);
        out.msg(&format!(
            "{}: Dispatched {} (args: {})",
            FORCE_DISPATCH,
            self.name,
            self.args.arg_s()
        ));
    }
}

impl std::fmt::Debug for PreparedDispatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PreparedDispatch")
            .field("name", &self.name)
            .field("args", &self.args)
            .finish()
    }
}

/// Resolve a `force_dispatch` line to its target command
///
/// Everything after `force_dispatch` is re-tokenized as the target's own
/// command line, so the handler sees its name at index 0.
pub fn prepare_dispatch(
    registry: &CvarRegistry,
    args: &CommandArgs,
) -> Result<PreparedDispatch, CommandError> {
    if args.arg_count() < 2 {
        return Err(CommandError::usage(
            FORCE_DISPATCH,
            "<command> [arg 1] [arg 2] [...] [arg n]",
        ));
    }

    let name = args.arg(1);
    let command = registry
        .find_command(name)
        .ok_or_else(|| CommandError::CommandNotFound(name.to_string()))?;

    Ok(PreparedDispatch {
        name: name.to_string(),
        handler: command.handler(),
        args: CommandArgs::tokenize(args.arg_s()),
    })
}

/// Resolve and run a `force_dispatch` in one step
pub fn force_dispatch(
    registry: &CvarRegistry,
    args: &CommandArgs,
    out: &mut dyn ConsoleOutput,
) -> Result<(), CommandError> {
    prepare_dispatch(registry, args)?.invoke(out);
    Ok(())
}

/// What `cvar_set` did
#[derive(Debug, Clone, PartialEq)]
pub struct SetRawOutcome {
    pub old_value: String,
    pub old_float: f32,
    pub new_value: String,
    /// Whether the string block had to grow
    pub reallocated: bool,
    pub callbacks_invoked: usize,
}

/// Overwrite a variable's raw value
///
/// The integer, float and string forms are all taken from the literal
/// argument: no bounds, no change detection. The string block grows when the
/// new value does not fit and is otherwise reused. Unless `nocallback` is
/// passed after the value, the change chain runs with the previous value.
pub fn set_raw(
    registry: &mut CvarRegistry,
    args: &CommandArgs,
    out: &mut dyn ConsoleOutput,
) -> Result<SetRawOutcome, CommandError> {
    if args.arg_count() < 3 {
        return Err(CommandError::usage(CVAR_SET, "<var> <value> [nocallback]"));
    }

    let name = args.arg(1);
    let new_value = args.arg(2);
    let no_callback = args.args()[3..]
        .iter()
        .any(|arg| arg.eq_ignore_ascii_case(NO_CALLBACK_ARG));

    let var = registry
        .find_var_mut(name)
        .ok_or_else(|| CommandError::VariableNotFound(name.to_string()))?;

    let old_value = var.string_value().to_string();
    let old_float = var.float_value();
    let reallocated = var.value_mut().overwrite(new_value);

    let callbacks_invoked = if no_callback {
        0
    } else {
        registry.notify_change(name, &old_value, old_float)
    };

    out.msg(&format!(
        "{}: Set {} \"{}\" => \"{}\"",
        CVAR_SET, name, old_value, new_value
    ));

    Ok(SetRawOutcome {
        old_value,
        old_float,
        new_value: new_value.to_string(),
        reallocated,
        callbacks_invoked,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::BufferedConsole;
    use crate::registry::{ChangeCallback, ConVarDef, CvarFlags, RegistryEntry};
    use parking_lot::Mutex;
    use std::sync::Arc;

    fn registry_with_log() -> (CvarRegistry, Arc<Mutex<Vec<String>>>) {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut registry = CvarRegistry::new();

        let seen = Arc::clone(&log);
        registry
            .register_var(
                ConVarDef::new("sv_gravity", "800")
                    .with_min(0.0)
                    .with_max(1000.0)
                    .with_on_change(move |entry, old, old_float| {
                        seen.lock().push(format!(
                            "{} {} {} {}",
                            entry.name(),
                            old,
                            old_float,
                            entry.value_string().unwrap_or("")
                        ));
                    }),
            )
            .unwrap();

        let seen = Arc::clone(&log);
        registry
            .register_command("echo_args", "", CvarFlags::CHEAT, move |args| {
                seen.lock().push(args.args().join("|"));
            })
            .unwrap();

        (registry, log)
    }

    #[test]
    fn test_set_raw_ignores_bounds() {
        let (mut registry, log) = registry_with_log();
        let mut out = BufferedConsole::new();

        let outcome = set_raw(
            &mut registry,
            &CommandArgs::tokenize("cvar_set sv_gravity 5000"),
            &mut out,
        )
        .unwrap();

        let var = registry.find_var("sv_gravity").unwrap();
        assert_eq!(var.string_value(), "5000");
        assert_eq!(var.int_value(), 5000);
        assert_eq!(var.float_value(), 5000.0);

        assert_eq!(outcome.old_value, "800");
        assert_eq!(outcome.old_float, 800.0);
        assert!(outcome.reallocated);
        assert_eq!(outcome.callbacks_invoked, 1);
        assert_eq!(*log.lock(), ["sv_gravity 800 800 5000"]);
        assert_eq!(out.text(), ["cvar_set: Set sv_gravity \"800\" => \"5000\""]);
    }

    #[test]
    fn test_set_raw_same_value_still_notifies() {
        let (mut registry, log) = registry_with_log();
        let mut out = BufferedConsole::new();

        let outcome = set_raw(
            &mut registry,
            &CommandArgs::tokenize("cvar_set sv_gravity 800"),
            &mut out,
        )
        .unwrap();

        assert!(!outcome.reallocated);
        assert_eq!(*log.lock(), ["sv_gravity 800 800 800"]);
    }

    #[test]
    fn test_set_raw_shrink_reuses_block() {
        let (mut registry, _log) = registry_with_log();
        let mut out = BufferedConsole::new();
        let before = registry.find_var("sv_gravity").unwrap().value().raw_string().capacity();

        let outcome = set_raw(
            &mut registry,
            &CommandArgs::tokenize("cvar_set sv_gravity 1"),
            &mut out,
        )
        .unwrap();

        let raw = registry.find_var("sv_gravity").unwrap().value().raw_string();
        assert!(!outcome.reallocated);
        assert_eq!(raw.capacity(), before);
        assert_eq!(raw.as_str(), "1");
    }

    #[test]
    fn test_set_raw_nocallback() {
        let (mut registry, log) = registry_with_log();
        let mut out = BufferedConsole::new();

        let outcome = set_raw(
            &mut registry,
            &CommandArgs::tokenize("cvar_set sv_gravity 10 NoCallback"),
            &mut out,
        )
        .unwrap();

        assert_eq!(outcome.callbacks_invoked, 0);
        assert!(log.lock().is_empty());
        assert_eq!(registry.find_var("sv_gravity").unwrap().string_value(), "10");
    }

    #[test]
    fn test_set_raw_runs_bound_then_global_chain() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let tagged = |tag: &'static str| -> ChangeCallback {
            let log = Arc::clone(&log);
            Box::new(move |entry: &RegistryEntry, old: &str, old_float: f32| {
                log.lock().push(format!(
                    "{} {} -> {} ({})",
                    tag,
                    old,
                    entry.value_string().unwrap_or(""),
                    old_float
                ));
            })
        };

        let mut registry = CvarRegistry::new();
        registry
            .register_var(ConVarDef::new("mp_timelimit", "30"))
            .unwrap();
        registry.add_global_change_callback(tagged("global1"));
        registry
            .add_change_callback("mp_timelimit", tagged("bound1"))
            .unwrap();
        registry.add_global_change_callback(tagged("global2"));
        registry
            .add_change_callback("mp_timelimit", tagged("bound2"))
            .unwrap();

        let outcome = set_raw(
            &mut registry,
            &CommandArgs::tokenize("cvar_set mp_timelimit 45"),
            &mut BufferedConsole::new(),
        )
        .unwrap();

        assert_eq!(outcome.callbacks_invoked, 4);
        assert_eq!(
            *log.lock(),
            [
                "bound1 30 -> 45 (30)",
                "bound2 30 -> 45 (30)",
                "global1 30 -> 45 (30)",
                "global2 30 -> 45 (30)",
            ]
        );
    }

    #[test]
    fn test_set_raw_nocallback_as_value_is_a_value() {
        let (mut registry, log) = registry_with_log();
        let mut out = BufferedConsole::new();

        set_raw(
            &mut registry,
            &CommandArgs::tokenize("cvar_set sv_gravity nocallback"),
            &mut out,
        )
        .unwrap();

        assert_eq!(registry.find_var("sv_gravity").unwrap().string_value(), "nocallback");
        assert_eq!(log.lock().len(), 1);
    }

    #[test]
    fn test_set_raw_errors() {
        let (mut registry, _log) = registry_with_log();
        let mut out = BufferedConsole::new();

        let err = set_raw(&mut registry, &CommandArgs::tokenize("cvar_set sv_gravity"), &mut out)
            .unwrap_err();
        assert_eq!(err.to_string(), "cvar_set: Syntax: <var> <value> [nocallback]");

        let err = set_raw(&mut registry, &CommandArgs::tokenize("cvar_set nope 1"), &mut out)
            .unwrap_err();
        assert_eq!(err.to_string(), "cvar_set: Unable to find ConVar nope");

        // Commands are not variables
        let err = set_raw(&mut registry, &CommandArgs::tokenize("cvar_set echo_args 1"), &mut out)
            .unwrap_err();
        assert!(matches!(err, CommandError::VariableNotFound(_)));
    }

    #[test]
    fn test_force_dispatch_forwards_args() {
        let (registry, log) = registry_with_log();
        let mut out = BufferedConsole::new();

        force_dispatch(
            &registry,
            &CommandArgs::tokenize(r#"force_dispatch echo_args a "b c""#),
            &mut out,
        )
        .unwrap();

        assert_eq!(*log.lock(), ["echo_args|a|b c"]);
        assert_eq!(
            out.text(),
            [r#"force_dispatch: Dispatched echo_args (args: a "b c")"#]
        );
    }

    #[test]
    fn test_force_dispatch_errors() {
        let (registry, log) = registry_with_log();
        let mut out = BufferedConsole::new();

        let err = force_dispatch(&registry, &CommandArgs::tokenize("force_dispatch"), &mut out)
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "force_dispatch: Syntax: <command> [arg 1] [arg 2] [...] [arg n]"
        );

        let err = force_dispatch(
            &registry,
            &CommandArgs::tokenize("force_dispatch sv_gravity"),
            &mut out,
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "force_dispatch: Unable to find ConCommand sv_gravity");
        assert!(log.lock().is_empty());
    }

    #[test]
    fn test_prepared_dispatch_outlives_registry() {
        let (registry, log) = registry_with_log();
        let prepared =
            prepare_dispatch(&registry, &CommandArgs::tokenize("force_dispatch echo_args x"))
                .unwrap();
        drop(registry);

        assert_eq!(prepared.name(), "echo_args");
        prepared.invoke(&mut BufferedConsole::new());
        assert_eq!(*log.lock(), ["echo_args|x"]);
    }
}
