//! Session settings and their persistence.
//!
//! Settings are read once at startup and only written back when the operator
//! explicitly asks for a save. The file is always rewritten in full.

use std::fmt::{Display, Formatter};
use std::fs::{self, File};
use std::path::Path;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Credentials, region and the naming rule used for clones.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    pub credential_key: String,
    pub credential_secret: String,
    pub region: String,
    pub session_token: String,
    pub append_text: String,
    pub replace_text: String,
}

/// The scalar settings that can be edited from the menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingField {
    CredentialKey,
    CredentialSecret,
    Region,
    SessionToken,
    AppendText,
    ReplaceText,
}

impl SettingField {
    pub const ALL: [SettingField; 6] = [
        SettingField::CredentialKey,
        SettingField::CredentialSecret,
        SettingField::Region,
        SettingField::SessionToken,
        SettingField::AppendText,
        SettingField::ReplaceText,
    ];

    /// Example value shown while the input line is still empty.
    pub fn placeholder(&self) -> &'static str {
        match self {
            SettingField::CredentialKey => "e.g., AKIA...",
            SettingField::CredentialSecret => "e.g., Secret123",
            SettingField::Region => "e.g., us-east-1",
            SettingField::SessionToken => "e.g., IQoJb3JpZ2luX2Vj...",
            SettingField::AppendText => "e.g., -p313",
            SettingField::ReplaceText => "e.g., -p39",
        }
    }
}

impl Display for SettingField {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            SettingField::CredentialKey => "AWS Key",
            SettingField::CredentialSecret => "AWS Secret",
            SettingField::Region => "Region",
            SettingField::SessionToken => "Session Token",
            SettingField::AppendText => "New Text",
            SettingField::ReplaceText => "Replace Text",
        })
    }
}

impl Settings {
    pub fn get(&self, field: SettingField) -> &str {
        match field {
            SettingField::CredentialKey => &self.credential_key,
            SettingField::CredentialSecret => &self.credential_secret,
            SettingField::Region => &self.region,
            SettingField::SessionToken => &self.session_token,
            SettingField::AppendText => &self.append_text,
            SettingField::ReplaceText => &self.replace_text,
        }
    }

    pub fn set(&mut self, field: SettingField, value: String) {
        let slot = match field {
            SettingField::CredentialKey => &mut self.credential_key,
            SettingField::CredentialSecret => &mut self.credential_secret,
            SettingField::Region => &mut self.region,
            SettingField::SessionToken => &mut self.session_token,
            SettingField::AppendText => &mut self.append_text,
            SettingField::ReplaceText => &mut self.replace_text,
        };
        *slot = value;
    }

    /// Session token as the SDK wants it: absent rather than empty.
    pub fn session_token(&self) -> Option<String> {
        if self.session_token.is_empty() {
            None
        } else {
            Some(self.session_token.clone())
        }
    }
}

/// Reads the session settings from disk.
///
/// A missing file is not an error: the defaults (all fields empty) are returned.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or is not valid YAML.
pub fn get_settings(settings_path: &str) -> Result<Settings> {
    if !Path::exists(Path::new(settings_path)) {
        debug!("No settings file at `{settings_path}`, using defaults");
        return Ok(Settings::default());
    }

    let reader = File::open(settings_path)
        .map_err(|e| Error::io_error("settings".to_string(), settings_path.to_string(), e))?;

    serde_yaml::from_reader(reader).map_err(|e| {
        Error::yaml_error(
            "reading".to_string(),
            "settings".to_string(),
            settings_path.to_string(),
            e,
        )
    })
}

/// Writes all session settings to disk, creating the parent directory if needed.
///
/// # Errors
///
/// Returns an error if the directory or file cannot be created, or serialization fails.
pub fn write_settings(settings_path: &str, settings: &Settings) -> Result<()> {
    if let Some(parent) = Path::new(settings_path).parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|e| {
                Error::io_error(
                    "settings directory".to_string(),
                    parent.display().to_string(),
                    e,
                )
            })?;
        }
    }

    let f = File::create(settings_path)
        .map_err(|e| Error::io_error("settings".to_string(), settings_path.to_string(), e))?;

    serde_yaml::to_writer(f, settings).map_err(|e| {
        Error::yaml_error(
            "writing".to_string(),
            "settings".to_string(),
            settings_path.to_string(),
            e,
        )
    })
}
