//! Configuration path utilities and defaults for aws-control.
//!
//! This module provides functions for resolving the settings file path
//! and expanding shell variables like `~` in paths.

/// Default path for the persisted session settings
const DEFAULT_SETTINGS_PATH: &str = "~/.aws-control/settings.yml";

/// Runtime identifier applied by upgrades when none is given on the command line
pub const DEFAULT_TARGET_RUNTIME: &str = "python3.13";

/// Resolves the settings file path.
///
/// If a custom path is provided, uses that path. Otherwise, uses the default
/// settings path. Shell expansions like `~` are resolved.
///
/// # Arguments
///
/// * `settings_path_arg` - Optional custom settings file path
///
/// # Returns
///
/// The resolved path to the settings file
///
/// # Examples
///
/// ```
/// use aws_control_core::config::get_settings_path;
///
/// // Use default path
/// let default_path = get_settings_path(&None);
///
/// // Use custom path
/// let custom_path = get_settings_path(&Some("/path/to/settings.yml".to_string()));
/// ```
pub fn get_settings_path(settings_path_arg: &Option<String>) -> String {
    let settings_path = match settings_path_arg {
        Some(settings_path) => settings_path.as_str(),
        None => DEFAULT_SETTINGS_PATH,
    };

    shellexpand::tilde(settings_path).to_string()
}
