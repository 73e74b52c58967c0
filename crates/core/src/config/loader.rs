//! Config path resolution
//!
//! Paths hang off the game directory the host reports at load time.

use std::path::{Path, PathBuf};

/// Directory name of the plugin under `addons/`
pub const ADDON_DIR_NAME: &str = "cvar_unhide";

/// Returns the plugin's addon directory.
///
/// Path: `<game dir>/addons/cvar_unhide/`
pub fn addon_dir(game_dir: &Path) -> PathBuf {
    game_dir.join("addons").join(ADDON_DIR_NAME)
}

/// Returns the configs directory.
///
/// Path: `<game dir>/addons/cvar_unhide/configs/`
pub fn configs_dir(game_dir: &Path) -> PathBuf {
    addon_dir(game_dir).join("configs")
}

/// Returns the core config path.
///
/// Path: `<game dir>/addons/cvar_unhide/configs/core.toml`
pub fn core_config_path(game_dir: &Path) -> PathBuf {
    configs_dir(game_dir).join("core.toml")
}
