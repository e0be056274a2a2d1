//! The remote operations the orchestrators depend on.
//!
//! [`FunctionClient`] is the seam between orchestration and the cloud provider.
//! [`crate::aws::LambdaClient`] implements it against AWS Lambda; tests use an
//! in-memory implementation.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::Result;
use crate::function::{
    AliasDescriptor, CreateFunctionRequest, CreatedFunction, EventSourceMapping,
    FunctionDescriptor, FunctionSummary, PolicyDescriptor,
};
use crate::settings::Settings;

#[async_trait]
pub trait FunctionClient: Send + Sync {
    /// Every function visible to the credentials, across all pages.
    async fn list_all(&self) -> Result<Vec<FunctionSummary>>;

    /// Fails with [`crate::error::Error::NotFound`] when `name` does not exist.
    async fn get_descriptor(&self, name: &str) -> Result<FunctionDescriptor>;

    async fn download_code(&self, location: &str) -> Result<Vec<u8>>;

    async fn create(&self, request: &CreateFunctionRequest, code: Vec<u8>)
        -> Result<CreatedFunction>;

    async fn list_tags(&self, resource_ref: &str) -> Result<HashMap<String, String>>;

    async fn apply_tags(&self, resource_ref: &str, tags: &HashMap<String, String>) -> Result<()>;

    async fn get_concurrency(&self, name: &str) -> Result<Option<i32>>;

    async fn set_concurrency(&self, name: &str, reserved: i32) -> Result<()>;

    async fn list_event_source_mappings(&self, name: &str) -> Result<Vec<EventSourceMapping>>;

    async fn create_event_source_mapping(&self, mapping: &EventSourceMapping) -> Result<()>;

    /// `None` when the function has no resource policy.
    async fn get_policy(&self, name: &str) -> Result<Option<PolicyDescriptor>>;

    async fn add_invoke_permission(
        &self,
        name: &str,
        statement_id: &str,
        principal: &str,
    ) -> Result<()>;

    async fn list_aliases(&self, name: &str) -> Result<Vec<AliasDescriptor>>;

    async fn create_alias(
        &self,
        name: &str,
        alias_name: &str,
        version: &str,
        description: Option<&str>,
    ) -> Result<()>;

    async fn update_runtime(&self, name: &str, runtime: &str) -> Result<()>;
}

/// Builds a client from the current session settings.
///
/// A new client is made for every job so edited credentials take effect immediately.
#[async_trait]
pub trait ClientFactory: Send + Sync {
    /// Fails with [`crate::error::Error::Connection`] when no client can be built.
    async fn connect(&self, settings: &Settings) -> Result<Arc<dyn FunctionClient>>;
}
