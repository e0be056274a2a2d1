use std::fmt::{Display, Formatter};

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// The sub-resource copy step of a clone that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetadataStep {
    Tags,
    Concurrency,
    EventSourceMappings,
    Policy,
    Aliases,
}

impl Display for MetadataStep {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            MetadataStep::Tags => "tags",
            MetadataStep::Concurrency => "reserved concurrency",
            MetadataStep::EventSourceMappings => "event source mappings",
            MetadataStep::Policy => "resource policy",
            MetadataStep::Aliases => "aliases",
        })
    }
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("Failed to create a connection to AWS: {}", .0)]
    Connection(String),

    #[error("Function `{}` was not found: {}", .name, .reason)]
    NotFound { name: String, reason: String },

    #[error("Failed to download the code of `{}`: {}", .name, .reason)]
    Download { name: String, reason: String },

    #[error("Failed to create function `{}`: {}", .name, .reason)]
    Creation { name: String, reason: String },

    #[error("Failed to copy {} onto `{}`: {}", .step, .name, .reason)]
    MetadataCopy {
        step: MetadataStep,
        name: String,
        reason: String,
    },

    #[error("{}", .0)]
    Validation(String),

    #[error("AWS call `{}` failed: {}", .operation, .message)]
    Remote { operation: String, message: String },

    #[error("Error {} {} file at `{}`: {}", .action, .file_description, .path, .original)]
    Yaml {
        action: String,
        file_description: String,
        path: String,
        original: serde_yaml::Error,
    },

    #[error("IO error with {} file at path `{}`: {}", .file_description, .path, .original)]
    Io {
        file_description: String,
        path: String,
        original: std::io::Error,
    },

    #[error("STDIO error: {}", .0)]
    Stdio(#[from] std::io::Error),

    #[error("Misc error: {}", .0)]
    Misc(String),
}

impl Error {
    pub fn not_found(name: &str, reason: impl Into<String>) -> Self {
        Self::NotFound {
            name: name.to_string(),
            reason: reason.into(),
        }
    }

    pub fn remote(operation: &str, message: impl Display) -> Self {
        Self::Remote {
            operation: operation.to_string(),
            message: message.to_string(),
        }
    }

    pub fn metadata_copy(step: MetadataStep, name: &str, source: &Error) -> Self {
        Self::MetadataCopy {
            step,
            name: name.to_string(),
            reason: source.to_string(),
        }
    }

    pub fn yaml_error(
        action: String,
        file_description: String,
        path: String,
        original: serde_yaml::Error,
    ) -> Self {
        Self::Yaml {
            action,
            file_description,
            path,
            original,
        }
    }

    pub fn io_error(file_description: String, path: String, original: std::io::Error) -> Self {
        Self::Io {
            file_description,
            path,
            original,
        }
    }
}
