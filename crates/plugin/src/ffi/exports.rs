//! C-compatible lifecycle exports called by the host bridge

use std::ffi::{c_char, c_int, c_void};
use std::path::Path;

use tracing::instrument;

use cvar_unhide_core::launch::CONSOLE_PARM;
use cvar_unhide_core::{
    CommandArgs, CommandLine, CoreConfig, PluginResult, ServerPlugin, PLUGIN_COMMANDS,
};
use cvar_unhide_engine::load_interfaces;
use cvar_unhide_sdk::CreateInterfaceFn;

use super::console::HostConsole;
use super::{cstr, write_cstr};
use crate::PLUGIN;

// Static strings with null terminators for C compatibility
static DESCRIPTION: &str = concat!("cvar-unhide, ", env!("CARGO_PKG_VERSION"), "\0");

/// Run `f` against the plugin unless it is already in use further up the stack
fn with_plugin<R>(busy: R, f: impl FnOnce(&mut ServerPlugin) -> R) -> R {
    match PLUGIN.try_lock() {
        Some(mut plugin) => f(&mut plugin),
        None => {
            tracing::warn!("Plugin re-entered while busy, call ignored");
            busy
        }
    }
}

/// Called when the host loads the plugin
///
/// `command_line` is the game's launch line, `game_dir` its game directory.
/// When load fails because `-insecure` is missing, `*append_console` is set
/// and the bridge should add `-console` to the host's command line.
///
/// # Safety
/// - `interface_factory` and `game_server_factory` must be valid CreateInterface functions
/// - `command_line` and `game_dir` must be valid C strings or null
/// - `append_console` must be a valid pointer or null
/// - `error` must be a valid pointer to a buffer of at least `maxlen` bytes, or null
#[no_mangle]
#[instrument(skip_all)]
pub unsafe extern "C" fn rust_plugin_load(
    interface_factory: *mut c_void,
    game_server_factory: *mut c_void,
    command_line: *const c_char,
    game_dir: *const c_char,
    append_console: *mut bool,
    error: *mut c_char,
    maxlen: usize,
) -> bool {
    let game_dir = cstr(game_dir);
    let config = if game_dir.is_empty() {
        Ok(CoreConfig::default())
    } else {
        CoreConfig::load(Path::new(&*game_dir))
    };

    crate::init_tracing(config.as_ref().map(|c| c.debug).unwrap_or(false));
    tracing::info!("cvar-unhide loading...");

    let config = config.unwrap_or_else(|e| {
        tracing::warn!("Failed to load core config, using defaults: {}", e);
        CoreConfig::default()
    });

    if !append_console.is_null() {
        *append_console = false;
    }

    // Validate factory pointers
    if interface_factory.is_null() {
        write_cstr(error, maxlen, "Interface factory is null");
        return false;
    }
    if game_server_factory.is_null() {
        write_cstr(error, maxlen, "Game server factory is null");
        return false;
    }

    // Cast factory function pointers
    let interface_factory: CreateInterfaceFn = std::mem::transmute(interface_factory);
    let game_server_factory: CreateInterfaceFn = std::mem::transmute(game_server_factory);

    let mut command_line = CommandLine::parse(&cstr(command_line));
    let had_console = command_line.find_parm(CONSOLE_PARM);

    let Some(mut plugin) = PLUGIN.try_lock() else {
        write_cstr(error, maxlen, "Plugin is busy");
        return false;
    };
    plugin.set_config(config);

    let result = plugin.load(
        &mut command_line,
        || load_interfaces(interface_factory, game_server_factory),
        &mut HostConsole,
    );

    if !append_console.is_null() {
        *append_console = !had_console && command_line.find_parm(CONSOLE_PARM);
    }

    match result {
        Ok(()) => {
            tracing::info!("cvar-unhide loaded successfully!");
            true
        }
        Err(e) => {
            tracing::error!("Failed to load: {}", e);
            write_cstr(error, maxlen, &e.to_string());
            false
        }
    }
}

/// Called when the host unloads the plugin
#[no_mangle]
#[instrument(skip_all)]
pub extern "C" fn rust_plugin_unload() -> bool {
    match std::panic::catch_unwind(|| PLUGIN.lock().unload()) {
        Ok(()) => true,
        Err(_) => {
            tracing::error!("Panic during unload");
            false
        }
    }
}

/// Plugin description shown by the host's plugin list
#[no_mangle]
pub extern "C" fn rust_get_plugin_description() -> *const c_char {
    DESCRIPTION.as_ptr() as *const c_char
}

/// Number of console commands the bridge should register
#[no_mangle]
pub extern "C" fn rust_get_plugin_command_count() -> usize {
    PLUGIN_COMMANDS.len()
}

/// Name and help text of the `index`th plugin command
///
/// The strings are static. Returns false when `index` is out of range.
///
/// # Safety
/// - `name` and `help` must be valid pointers to buffers of at least `maxlen` bytes, or null
#[no_mangle]
pub unsafe extern "C" fn rust_get_plugin_command(
    index: usize,
    name: *mut c_char,
    help: *mut c_char,
    maxlen: usize,
) -> bool {
    let Some(command) = PLUGIN_COMMANDS.get(index) else {
        return false;
    };
    write_cstr(name, maxlen, command.name);
    write_cstr(help, maxlen, command.help);
    true
}

/// Called from the host's LevelInit
///
/// # Safety
/// - `map_name` must be a valid null-terminated C string or null
#[no_mangle]
pub unsafe extern "C" fn rust_on_level_init(map_name: *const c_char) {
    let map_name = cstr(map_name);
    with_plugin((), |plugin| plugin.level_init(&map_name));
}

/// Called from the host's LevelShutdown
#[no_mangle]
pub extern "C" fn rust_on_level_shutdown() {
    with_plugin((), |plugin| plugin.level_shutdown());
}

/// Called from the host's SetCommandClient
#[no_mangle]
pub extern "C" fn rust_set_command_client(index: c_int) {
    with_plugin((), |plugin| plugin.set_command_client(index));
}

#[no_mangle]
pub extern "C" fn rust_on_pause() {
    with_plugin((), |plugin| plugin.pause());
}

#[no_mangle]
pub extern "C" fn rust_on_unpause() {
    with_plugin((), |plugin| plugin.unpause());
}

#[no_mangle]
pub extern "C" fn rust_on_server_activate(edict_count: c_int, client_max: c_int) {
    with_plugin((), |plugin| plugin.server_activate(edict_count, client_max));
}

/// Called from the host every server frame
#[no_mangle]
pub extern "C" fn rust_on_game_frame(simulating: bool) {
    with_plugin((), |plugin| plugin.game_frame(simulating));
}

#[no_mangle]
pub extern "C" fn rust_on_client_active(slot: c_int) {
    with_plugin((), |plugin| plugin.client_active(slot));
}

#[no_mangle]
pub extern "C" fn rust_on_client_disconnect(slot: c_int) {
    with_plugin((), |plugin| plugin.client_disconnect(slot));
}

/// # Safety
/// - `name` must be a valid null-terminated C string or null
#[no_mangle]
pub unsafe extern "C" fn rust_on_client_put_in_server(slot: c_int, name: *const c_char) {
    let name = cstr(name);
    with_plugin((), |plugin| plugin.client_put_in_server(slot, &name));
}

#[no_mangle]
pub extern "C" fn rust_on_client_settings_changed(slot: c_int) {
    with_plugin((), |plugin| plugin.client_settings_changed(slot));
}

/// Called from the host's ClientConnect; returns a `PluginResult` code
///
/// # Safety
/// - `name` and `address` must be valid null-terminated C strings or null
#[no_mangle]
pub unsafe extern "C" fn rust_on_client_connect(
    slot: c_int,
    name: *const c_char,
    address: *const c_char,
) -> c_int {
    let (name, address) = (cstr(name), cstr(address));
    with_plugin(PluginResult::Continue, |plugin| {
        plugin.client_connect(slot, &name, &address)
    }) as c_int
}

/// Called from the host's ClientCommand; returns a `PluginResult` code
///
/// # Safety
/// - `line` must be a valid null-terminated C string or null
#[no_mangle]
pub unsafe extern "C" fn rust_on_client_command(slot: c_int, line: *const c_char) -> c_int {
    let args = CommandArgs::tokenize(&cstr(line));
    with_plugin(PluginResult::Continue, |plugin| {
        plugin.client_command(slot, &args)
    }) as c_int
}

/// Called from the host's NetworkIDValidated; returns a `PluginResult` code
///
/// # Safety
/// - `user_name` and `network_id` must be valid null-terminated C strings or null
#[no_mangle]
pub unsafe extern "C" fn rust_on_network_id_validated(
    user_name: *const c_char,
    network_id: *const c_char,
) -> c_int {
    let (user_name, network_id) = (cstr(user_name), cstr(network_id));
    with_plugin(PluginResult::Continue, |plugin| {
        plugin.network_id_validated(&user_name, &network_id)
    }) as c_int
}
