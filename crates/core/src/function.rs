//! Domain model of a remote function and its sub-resources.
//!
//! These types are provider neutral; the AWS adapter converts to and from the SDK shapes.

use std::collections::HashMap;
use std::fmt::{Display, Formatter};

/// One entry of the account-wide function listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionSummary {
    pub name: String,
    pub runtime: Option<String>,
}

impl Display for FunctionSummary {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.runtime {
            Some(runtime) => write!(formatter, "{} ({})", self.name, runtime),
            None => formatter.write_str(&self.name),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VpcSettings {
    pub subnet_ids: Vec<String>,
    pub security_group_ids: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSystemMount {
    pub arn: String,
    pub local_mount_path: String,
}

/// Everything about a function that is copied verbatim into a clone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FunctionConfiguration {
    pub runtime: Option<String>,
    pub role: Option<String>,
    pub handler: Option<String>,
    pub memory_size: Option<i32>,
    pub timeout: Option<i32>,
    pub environment: Option<HashMap<String, String>>,
    pub layers: Vec<String>,
    pub vpc_config: Option<VpcSettings>,
    pub tracing_mode: Option<String>,
    pub architectures: Vec<String>,
    pub package_type: Option<String>,
    pub description: Option<String>,
    pub dead_letter_target: Option<String>,
    pub file_system_mounts: Vec<FileSystemMount>,
    pub ephemeral_storage_mb: Option<i32>,
}

/// Result of looking up a single function.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FunctionDescriptor {
    pub name: String,
    /// Reference used for tag operations (the function ARN on AWS).
    pub resource_ref: String,
    pub configuration: FunctionConfiguration,
    pub code_location: Option<String>,
}

/// What the provider reports back after a successful create.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedFunction {
    pub name: String,
    pub resource_ref: String,
    /// Version published on create.
    pub version: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateFunctionRequest {
    pub name: String,
    pub configuration: FunctionConfiguration,
    pub publish: bool,
}

impl CreateFunctionRequest {
    /// Copies the whole configuration of `source` under `name`, always publishing.
    pub fn from_descriptor(name: &str, source: &FunctionDescriptor) -> Self {
        Self {
            name: name.to_string(),
            configuration: source.configuration.clone(),
            publish: true,
        }
    }
}

/// An event-source mapping, either as read from a source or to be created on a destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventSourceMapping {
    pub function_name: String,
    pub event_source: String,
    pub batch_size: Option<i32>,
    pub enabled: bool,
    pub batching_window_seconds: Option<i32>,
    pub starting_position: Option<String>,
}

/// The textual state a provider reports for an active mapping.
pub const MAPPING_STATE_ENABLED: &str = "Enabled";

impl EventSourceMapping {
    pub fn is_enabled_state(state: Option<&str>) -> bool {
        state == Some(MAPPING_STATE_ENABLED)
    }

    /// The same mapping, pointing at a different function.
    pub fn retarget(&self, function_name: &str) -> Self {
        Self {
            function_name: function_name.to_string(),
            ..self.clone()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolicyDescriptor {
    pub document: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AliasDescriptor {
    pub name: String,
    pub function_version: String,
    pub description: Option<String>,
}
