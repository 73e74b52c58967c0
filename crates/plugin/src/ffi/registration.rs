//! Registry mirroring and command dispatch
//!
//! The bridge walks the host's ConVar list and mirrors each entry here,
//! wrapping the host's own handlers and change callbacks as C function
//! pointers. After a command runs it reads flags and values back. Changes
//! the host makes on its own side are pushed in with
//! [`rust_sync_convar_value`] and [`rust_set_flags`].
//!
//! All of these refuse to run while the plugin is busy: a mirrored command
//! or change callback that calls back into the plugin gets `false`.

use std::ffi::{c_char, c_int, CString};

use tracing::instrument;

use cvar_unhide_core::{
    ChangeCallback, CommandArgs, CommandOutcome, ConVarDef, CvarFlags, RegistryEntry, ServerClass,
};

use super::console::HostConsole;
use super::{cstr, write_cstr};
use crate::PLUGIN;

/// Host command handler: `(argc, argv, args after the command name)`
pub type ConCommandFn =
    unsafe extern "C" fn(argc: c_int, argv: *const *const c_char, arg_s: *const c_char);

/// Change callback: `(name, old string value, old float value)`
pub type ChangeCallbackFn =
    unsafe extern "C" fn(name: *const c_char, old_value: *const c_char, old_float: f32);

fn to_cstring(s: &str) -> CString {
    CString::new(s.replace('\0', "")).unwrap_or_default()
}

fn wrap_change_callback(callback: ChangeCallbackFn) -> ChangeCallback {
    Box::new(move |entry: &RegistryEntry, old_value: &str, old_float: f32| {
        let name = to_cstring(entry.name());
        let old_value = to_cstring(old_value);
        unsafe { callback(name.as_ptr(), old_value.as_ptr(), old_float) };
    })
}

/// Mirror a host ConVar into the registry
///
/// # Safety
/// - `name`, `default_value` and `help` must be valid C strings or null
#[no_mangle]
pub unsafe extern "C" fn rust_register_convar(
    name: *const c_char,
    default_value: *const c_char,
    help: *const c_char,
    flags: u32,
    has_min: bool,
    min: f32,
    has_max: bool,
    max: f32,
) -> bool {
    let name = cstr(name);
    if name.is_empty() {
        return false;
    }

    let mut def = ConVarDef::new(&name, &cstr(default_value))
        .with_help(&cstr(help))
        .with_flags(CvarFlags::from_bits_retain(flags));
    if has_min {
        def = def.with_min(min);
    }
    if has_max {
        def = def.with_max(max);
    }

    let Some(mut plugin) = PLUGIN.try_lock() else {
        return false;
    };
    plugin.registry_mut().register_var(def).is_ok()
}

/// Mirror a host ConCommand into the registry
///
/// # Safety
/// - `name` and `help` must be valid C strings or null
/// - `callback` must stay callable until the command is unregistered
#[no_mangle]
pub unsafe extern "C" fn rust_register_concommand(
    name: *const c_char,
    help: *const c_char,
    flags: u32,
    callback: Option<ConCommandFn>,
) -> bool {
    let name = cstr(name);
    let Some(callback) = callback else {
        return false;
    };
    if name.is_empty() {
        return false;
    }

    let handler = move |args: &CommandArgs| {
        let owned: Vec<CString> = args.args().iter().map(|a| to_cstring(a)).collect();
        let argv: Vec<*const c_char> = owned.iter().map(|a| a.as_ptr()).collect();
        let arg_s = to_cstring(args.arg_s());
        unsafe { callback(argv.len() as c_int, argv.as_ptr(), arg_s.as_ptr()) };
    };

    let Some(mut plugin) = PLUGIN.try_lock() else {
        return false;
    };
    plugin
        .registry_mut()
        .register_command(&name, &cstr(help), CvarFlags::from_bits_retain(flags), handler)
        .is_ok()
}

/// Remove a mirrored entry
///
/// # Safety
/// - `name` must be a valid C string or null
#[no_mangle]
pub unsafe extern "C" fn rust_unregister(name: *const c_char) -> bool {
    let name = cstr(name);
    let Some(mut plugin) = PLUGIN.try_lock() else {
        return false;
    };
    plugin.registry_mut().unregister(&name)
}

/// Bind a change callback to one ConVar
///
/// # Safety
/// - `name` must be a valid C string or null
#[no_mangle]
pub unsafe extern "C" fn rust_add_change_callback(
    name: *const c_char,
    callback: Option<ChangeCallbackFn>,
) -> bool {
    let name = cstr(name);
    let Some(callback) = callback else {
        return false;
    };
    let Some(mut plugin) = PLUGIN.try_lock() else {
        return false;
    };

    match plugin
        .registry_mut()
        .add_change_callback(&name, wrap_change_callback(callback))
    {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!("rust_add_change_callback: {}", e);
            false
        }
    }
}

/// Append a callback to the global change chain
#[no_mangle]
pub extern "C" fn rust_add_global_change_callback(callback: Option<ChangeCallbackFn>) -> bool {
    let Some(callback) = callback else {
        return false;
    };
    let Some(mut plugin) = PLUGIN.try_lock() else {
        return false;
    };
    plugin
        .registry_mut()
        .add_global_change_callback(wrap_change_callback(callback));
    true
}

/// Read an entry's current flags back
///
/// # Safety
/// - `name` must be a valid C string or null
/// - `flags` must be a valid pointer or null
#[no_mangle]
pub unsafe extern "C" fn rust_get_flags(name: *const c_char, flags: *mut u32) -> bool {
    let name = cstr(name);
    let Some(plugin) = PLUGIN.try_lock() else {
        return false;
    };
    let Some(entry) = plugin.registry().find(&name) else {
        return false;
    };
    if !flags.is_null() {
        *flags = entry.flags().bits();
    }
    true
}

/// Read a ConVar's current string value back
///
/// # Safety
/// - `name` must be a valid C string or null
/// - `value` must be a valid pointer to a buffer of at least `maxlen` bytes, or null
#[no_mangle]
pub unsafe extern "C" fn rust_get_convar_string(
    name: *const c_char,
    value: *mut c_char,
    maxlen: usize,
) -> bool {
    let name = cstr(name);
    let Some(plugin) = PLUGIN.try_lock() else {
        return false;
    };
    let Some(var) = plugin.registry().find_var(&name) else {
        return false;
    };
    write_cstr(value, maxlen, var.string_value());
    true
}

/// Mirror a value the host has already stored
///
/// Used after the host's own setter ran, so the value is taken as is: no
/// clamping and no change callbacks.
///
/// # Safety
/// - `name` and `value` must be valid C strings or null
#[no_mangle]
pub unsafe extern "C" fn rust_sync_convar_value(
    name: *const c_char,
    value: *const c_char,
) -> bool {
    let name = cstr(name);
    let Some(mut plugin) = PLUGIN.try_lock() else {
        return false;
    };

    match plugin.registry_mut().sync_value(&name, &cstr(value)) {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!("rust_sync_convar_value: {}", e);
            false
        }
    }
}

/// Mirror an entry's flags after the host changed them
///
/// # Safety
/// - `name` must be a valid C string or null
#[no_mangle]
pub unsafe extern "C" fn rust_set_flags(name: *const c_char, flags: u32) -> bool {
    let name = cstr(name);
    let Some(mut plugin) = PLUGIN.try_lock() else {
        return false;
    };

    match plugin
        .registry_mut()
        .set_flags(&name, CvarFlags::from_bits_retain(flags))
    {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!("rust_set_flags: {}", e);
            false
        }
    }
}

/// Replace the server class list used by `dump_netprops`
///
/// `json` is an array of `{ name, class_id, table }` objects.
///
/// # Safety
/// - `json` must be a valid C string or null
#[no_mangle]
#[instrument(skip_all)]
pub unsafe extern "C" fn rust_set_server_classes(json: *const c_char) -> bool {
    let classes = match ServerClass::list_from_json(&cstr(json)) {
        Ok(classes) => classes,
        Err(e) => {
            tracing::error!("Invalid server class list: {}", e);
            return false;
        }
    };

    let Some(mut plugin) = PLUGIN.try_lock() else {
        return false;
    };
    plugin.set_server_classes(classes);
    true
}

/// Run a console line if it is one of the plugin's commands
///
/// Returns true if the line was handled. A forced dispatch runs after the
/// plugin is released, so the target may call back in.
///
/// # Safety
/// - `line` must be a valid C string or null
#[no_mangle]
#[instrument(skip_all)]
pub unsafe extern "C" fn rust_dispatch_command(line: *const c_char) -> bool {
    let args = CommandArgs::tokenize(&cstr(line));
    let mut console = HostConsole;

    let outcome = {
        let Some(mut plugin) = PLUGIN.try_lock() else {
            tracing::warn!("{}: plugin busy, ignored", args.command_name());
            return false;
        };
        plugin.execute(&args, &mut console)
    };

    match outcome {
        CommandOutcome::NotHandled => false,
        CommandOutcome::Handled => true,
        CommandOutcome::Dispatch(dispatch) => {
            dispatch.invoke(&mut console);
            true
        }
    }
}
