//! [`FunctionClient`] implementation backed by AWS Lambda.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_lambda::config::Credentials;
use aws_sdk_lambda::error::DisplayErrorContext;
use aws_sdk_lambda::primitives::Blob;
use aws_sdk_lambda::types::{
    Architecture, DeadLetterConfig, Environment, EphemeralStorage, EventSourcePosition,
    FileSystemConfig, FunctionCode, PackageType, Runtime, TracingConfig, TracingMode, VpcConfig,
};
use aws_sdk_lambda::Client;
use log::{debug, info, warn};

use crate::client::{ClientFactory, FunctionClient};
use crate::error::{Error, Result};
use crate::function::{
    AliasDescriptor, CreateFunctionRequest, CreatedFunction, EventSourceMapping,
    FileSystemMount, FunctionConfiguration, FunctionDescriptor, FunctionSummary,
    PolicyDescriptor, VpcSettings,
};
use crate::settings::Settings;

const CREDENTIALS_PROVIDER_NAME: &str = "aws-control-settings";

fn remote_error<E: std::error::Error>(operation: &str, err: E) -> Error {
    Error::remote(operation, DisplayErrorContext(err))
}

/// Connects to Lambda with the credentials and region from [`Settings`].
#[derive(Default)]
pub struct LambdaConnector;

#[async_trait]
impl ClientFactory for LambdaConnector {
    async fn connect(&self, settings: &Settings) -> Result<Arc<dyn FunctionClient>> {
        Ok(Arc::new(LambdaClient::connect(settings).await?))
    }
}

pub struct LambdaClient {
    client: Client,
    http: reqwest::Client,
}

impl LambdaClient {
    /// Builds an SDK client for the configured region.
    ///
    /// When both key and secret are empty the default AWS credential chain is used.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Connection`] when the region is missing or only one half
    /// of the static credentials is set.
    pub async fn connect(settings: &Settings) -> Result<Self> {
        if settings.region.trim().is_empty() {
            return Err(Error::Connection("no region is set".to_string()));
        }

        let mut loader = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(settings.region.trim().to_string()));

        match (
            settings.credential_key.is_empty(),
            settings.credential_secret.is_empty(),
        ) {
            (true, true) => {
                info!("No static credentials set, using the default credential chain");
            }
            (false, false) => {
                loader = loader.credentials_provider(Credentials::new(
                    settings.credential_key.clone(),
                    settings.credential_secret.clone(),
                    settings.session_token(),
                    None,
                    CREDENTIALS_PROVIDER_NAME,
                ));
            }
            (true, false) => return Err(Error::Connection("AWS Key is not set".to_string())),
            (false, true) => return Err(Error::Connection("AWS Secret is not set".to_string())),
        }

        let sdk_config = loader.load().await;
        debug!("Lambda client configured for region `{}`", settings.region);

        Ok(Self {
            client: Client::new(&sdk_config),
            http: reqwest::Client::new(),
        })
    }
}

fn configuration_from_sdk(cfg: &aws_sdk_lambda::types::FunctionConfiguration) -> FunctionConfiguration {
    FunctionConfiguration {
        runtime: cfg.runtime().map(|r| r.as_str().to_string()),
        role: cfg.role().map(str::to_string),
        handler: cfg.handler().map(str::to_string),
        memory_size: cfg.memory_size(),
        timeout: cfg.timeout(),
        environment: cfg.environment().and_then(|e| e.variables()).cloned(),
        layers: cfg
            .layers()
            .iter()
            .filter_map(|layer| layer.arn().map(str::to_string))
            .collect(),
        vpc_config: cfg
            .vpc_config()
            .filter(|vpc| !vpc.subnet_ids().is_empty())
            .map(|vpc| VpcSettings {
                subnet_ids: vpc.subnet_ids().to_vec(),
                security_group_ids: vpc.security_group_ids().to_vec(),
            }),
        tracing_mode: cfg
            .tracing_config()
            .and_then(|t| t.mode())
            .map(|m| m.as_str().to_string()),
        architectures: cfg
            .architectures()
            .iter()
            .map(|a| a.as_str().to_string())
            .collect(),
        package_type: cfg.package_type().map(|p| p.as_str().to_string()),
        description: cfg.description().map(str::to_string),
        dead_letter_target: cfg
            .dead_letter_config()
            .and_then(|d| d.target_arn())
            .map(str::to_string),
        file_system_mounts: cfg
            .file_system_configs()
            .iter()
            .map(|fs| FileSystemMount {
                arn: fs.arn().to_string(),
                local_mount_path: fs.local_mount_path().to_string(),
            })
            .collect(),
        ephemeral_storage_mb: cfg.ephemeral_storage().map(|e| e.size()),
    }
}

fn non_empty<T>(values: Vec<T>) -> Option<Vec<T>> {
    if values.is_empty() {
        None
    } else {
        Some(values)
    }
}

#[async_trait]
impl FunctionClient for LambdaClient {
    async fn list_all(&self) -> Result<Vec<FunctionSummary>> {
        let functions = self
            .client
            .list_functions()
            .into_paginator()
            .items()
            .send()
            .collect::<std::result::Result<Vec<_>, _>>()
            .await
            .map_err(|e| remote_error("ListFunctions", e))?;

        Ok(functions
            .iter()
            .filter_map(|f| {
                f.function_name().map(|name| FunctionSummary {
                    name: name.to_string(),
                    runtime: f.runtime().map(|r| r.as_str().to_string()),
                })
            })
            .collect())
    }

    async fn get_descriptor(&self, name: &str) -> Result<FunctionDescriptor> {
        let output = self
            .client
            .get_function()
            .function_name(name)
            .send()
            .await
            .map_err(|e| {
                if e
                    .as_service_error()
                    .is_some_and(|service| service.is_resource_not_found_exception())
                {
                    Error::not_found(name, "the function does not exist")
                } else {
                    remote_error("GetFunction", e)
                }
            })?;

        let configuration = output
            .configuration()
            .ok_or_else(|| Error::not_found(name, "no configuration was returned"))?;

        Ok(FunctionDescriptor {
            name: name.to_string(),
            resource_ref: configuration.function_arn().unwrap_or(name).to_string(),
            configuration: configuration_from_sdk(configuration),
            code_location: output
                .code()
                .and_then(|code| code.location())
                .map(str::to_string),
        })
    }

    async fn download_code(&self, location: &str) -> Result<Vec<u8>> {
        let response = self
            .http
            .get(location)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|e| Error::remote("DownloadCode", e))?;

        let bytes = response
            .bytes()
            .await
            .map_err(|e| Error::remote("DownloadCode", e))?;

        Ok(bytes.to_vec())
    }

    async fn create(
        &self,
        request: &CreateFunctionRequest,
        code: Vec<u8>,
    ) -> Result<CreatedFunction> {
        let cfg = &request.configuration;

        let file_system_configs = cfg
            .file_system_mounts
            .iter()
            .map(|mount| {
                FileSystemConfig::builder()
                    .arn(&mount.arn)
                    .local_mount_path(&mount.local_mount_path)
                    .build()
                    .map_err(|e| remote_error("CreateFunction", e))
            })
            .collect::<Result<Vec<_>>>()?;

        let ephemeral_storage = cfg
            .ephemeral_storage_mb
            .map(|size| {
                EphemeralStorage::builder()
                    .size(size)
                    .build()
                    .map_err(|e| remote_error("CreateFunction", e))
            })
            .transpose()?;

        let output = self
            .client
            .create_function()
            .function_name(&request.name)
            .set_runtime(cfg.runtime.as_deref().map(Runtime::from))
            .set_role(cfg.role.clone())
            .set_handler(cfg.handler.clone())
            .code(FunctionCode::builder().zip_file(Blob::new(code)).build())
            .set_timeout(cfg.timeout)
            .set_memory_size(cfg.memory_size)
            .set_environment(cfg.environment.as_ref().map(|variables| {
                Environment::builder()
                    .set_variables(Some(variables.clone()))
                    .build()
            }))
            .set_layers(non_empty(cfg.layers.clone()))
            .set_vpc_config(cfg.vpc_config.as_ref().map(|vpc| {
                VpcConfig::builder()
                    .set_subnet_ids(Some(vpc.subnet_ids.clone()))
                    .set_security_group_ids(Some(vpc.security_group_ids.clone()))
                    .build()
            }))
            .set_tracing_config(cfg.tracing_mode.as_deref().map(|mode| {
                TracingConfig::builder()
                    .mode(TracingMode::from(mode))
                    .build()
            }))
            .set_architectures(non_empty(
                cfg.architectures
                    .iter()
                    .map(|a| Architecture::from(a.as_str()))
                    .collect(),
            ))
            .set_package_type(cfg.package_type.as_deref().map(PackageType::from))
            .set_description(cfg.description.clone())
            .set_dead_letter_config(cfg.dead_letter_target.as_ref().map(|target| {
                DeadLetterConfig::builder().target_arn(target).build()
            }))
            .set_file_system_configs(non_empty(file_system_configs))
            .set_ephemeral_storage(ephemeral_storage)
            .publish(request.publish)
            .send()
            .await
            .map_err(|e| remote_error("CreateFunction", e))?;

        Ok(CreatedFunction {
            name: output.function_name().unwrap_or(&request.name).to_string(),
            resource_ref: output.function_arn().unwrap_or(&request.name).to_string(),
            version: output.version().unwrap_or("$LATEST").to_string(),
        })
    }

    async fn list_tags(&self, resource_ref: &str) -> Result<HashMap<String, String>> {
        let output = self
            .client
            .list_tags()
            .resource(resource_ref)
            .send()
            .await
            .map_err(|e| remote_error("ListTags", e))?;

        Ok(output.tags().cloned().unwrap_or_default())
    }

    async fn apply_tags(&self, resource_ref: &str, tags: &HashMap<String, String>) -> Result<()> {
        self.client
            .tag_resource()
            .resource(resource_ref)
            .set_tags(Some(tags.clone()))
            .send()
            .await
            .map_err(|e| remote_error("TagResource", e))?;
        Ok(())
    }

    async fn get_concurrency(&self, name: &str) -> Result<Option<i32>> {
        let output = self
            .client
            .get_function_concurrency()
            .function_name(name)
            .send()
            .await
            .map_err(|e| remote_error("GetFunctionConcurrency", e))?;

        Ok(output.reserved_concurrent_executions())
    }

    async fn set_concurrency(&self, name: &str, reserved: i32) -> Result<()> {
        self.client
            .put_function_concurrency()
            .function_name(name)
            .reserved_concurrent_executions(reserved)
            .send()
            .await
            .map_err(|e| remote_error("PutFunctionConcurrency", e))?;
        Ok(())
    }

    async fn list_event_source_mappings(&self, name: &str) -> Result<Vec<EventSourceMapping>> {
        let mappings = self
            .client
            .list_event_source_mappings()
            .function_name(name)
            .into_paginator()
            .items()
            .send()
            .collect::<std::result::Result<Vec<_>, _>>()
            .await
            .map_err(|e| remote_error("ListEventSourceMappings", e))?;

        Ok(mappings
            .iter()
            .filter_map(|mapping| {
                let Some(event_source) = mapping.event_source_arn() else {
                    warn!(
                        "Skipping event source mapping {:?} of `{name}`: it has no source ARN",
                        mapping.uuid()
                    );
                    return None;
                };

                Some(EventSourceMapping {
                    function_name: name.to_string(),
                    event_source: event_source.to_string(),
                    batch_size: mapping.batch_size(),
                    enabled: EventSourceMapping::is_enabled_state(mapping.state()),
                    batching_window_seconds: mapping.maximum_batching_window_in_seconds(),
                    starting_position: mapping.starting_position().map(|p| p.as_str().to_string()),
                })
            })
            .collect())
    }

    async fn create_event_source_mapping(&self, mapping: &EventSourceMapping) -> Result<()> {
        self.client
            .create_event_source_mapping()
            .function_name(&mapping.function_name)
            .event_source_arn(&mapping.event_source)
            .set_batch_size(mapping.batch_size)
            .enabled(mapping.enabled)
            .set_maximum_batching_window_in_seconds(mapping.batching_window_seconds)
            .set_starting_position(
                mapping
                    .starting_position
                    .as_deref()
                    .map(EventSourcePosition::from),
            )
            .send()
            .await
            .map_err(|e| remote_error("CreateEventSourceMapping", e))?;
        Ok(())
    }

    async fn get_policy(&self, name: &str) -> Result<Option<PolicyDescriptor>> {
        match self.client.get_policy().function_name(name).send().await {
            Ok(output) => Ok(output.policy().map(|document| PolicyDescriptor {
                document: document.to_string(),
            })),
            Err(e)
                if e
                    .as_service_error()
                    .is_some_and(|service| service.is_resource_not_found_exception()) =>
            {
                Ok(None)
            }
            Err(e) => Err(remote_error("GetPolicy", e)),
        }
    }

    async fn add_invoke_permission(
        &self,
        name: &str,
        statement_id: &str,
        principal: &str,
    ) -> Result<()> {
        self.client
            .add_permission()
            .function_name(name)
            .statement_id(statement_id)
            .action("lambda:InvokeFunction")
            .principal(principal)
            .send()
            .await
            .map_err(|e| remote_error("AddPermission", e))?;
        Ok(())
    }

    async fn list_aliases(&self, name: &str) -> Result<Vec<AliasDescriptor>> {
        let aliases = self
            .client
            .list_aliases()
            .function_name(name)
            .into_paginator()
            .items()
            .send()
            .collect::<std::result::Result<Vec<_>, _>>()
            .await
            .map_err(|e| remote_error("ListAliases", e))?;

        Ok(aliases
            .iter()
            .filter_map(|alias| {
                alias.name().map(|alias_name| AliasDescriptor {
                    name: alias_name.to_string(),
                    function_version: alias.function_version().unwrap_or_default().to_string(),
                    description: alias.description().map(str::to_string),
                })
            })
            .collect())
    }

    async fn create_alias(
        &self,
        name: &str,
        alias_name: &str,
        version: &str,
        description: Option<&str>,
    ) -> Result<()> {
        self.client
            .create_alias()
            .function_name(name)
            .name(alias_name)
            .function_version(version)
            .set_description(description.map(str::to_string))
            .send()
            .await
            .map_err(|e| remote_error("CreateAlias", e))?;
        Ok(())
    }

    async fn update_runtime(&self, name: &str, runtime: &str) -> Result<()> {
        self.client
            .update_function_configuration()
            .function_name(name)
            .runtime(Runtime::from(runtime))
            .send()
            .await
            .map_err(|e| remote_error("UpdateFunctionConfiguration", e))?;
        Ok(())
    }
}
