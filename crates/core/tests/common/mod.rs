//! In-memory `FunctionClient` shared by the integration tests.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;
use aws_control_core::client::FunctionClient;
use aws_control_core::error::{Error, Result};
use aws_control_core::function::{
    AliasDescriptor, CreateFunctionRequest, CreatedFunction, EventSourceMapping,
    FunctionConfiguration, FunctionDescriptor, FunctionSummary, PolicyDescriptor,
};

#[derive(Debug, Clone, Default)]
pub struct FakeFunction {
    pub descriptor: FunctionDescriptor,
    pub code: Vec<u8>,
    pub tags: HashMap<String, String>,
    pub concurrency: Option<i32>,
    pub mappings: Vec<EventSourceMapping>,
    pub policy: Option<PolicyDescriptor>,
    pub permissions: Vec<(String, String)>,
    pub aliases: Vec<AliasDescriptor>,
}

impl FakeFunction {
    pub fn new(name: &str, runtime: &str) -> Self {
        Self {
            descriptor: FunctionDescriptor {
                name: name.to_string(),
                resource_ref: format!("arn:aws:lambda:us-east-1:123456789012:function:{name}"),
                configuration: FunctionConfiguration {
                    runtime: Some(runtime.to_string()),
                    role: Some("arn:aws:iam::123456789012:role/lambda".to_string()),
                    handler: Some("app.handler".to_string()),
                    memory_size: Some(256),
                    timeout: Some(30),
                    ..Default::default()
                },
                code_location: Some(format!("https://code.example/{name}.zip")),
            },
            code: name.as_bytes().to_vec(),
            ..Default::default()
        }
    }
}

#[derive(Default)]
pub struct FakeClient {
    pub functions: Mutex<HashMap<String, FakeFunction>>,
    pub calls: Mutex<Vec<String>>,
    /// Keys like `create:svc-b` make that call fail.
    pub failures: Mutex<HashSet<String>>,
}

impl FakeClient {
    pub fn with_functions(functions: Vec<FakeFunction>) -> Self {
        let client = Self::default();
        {
            let mut map = client.functions.lock().unwrap();
            for function in functions {
                map.insert(function.descriptor.name.clone(), function);
            }
        }
        client
    }

    pub fn fail(&self, operation: &str, name: &str) {
        self.failures
            .lock()
            .unwrap()
            .insert(format!("{operation}:{name}"));
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn called(&self, prefix: &str) -> bool {
        self.calls().iter().any(|call| call.starts_with(prefix))
    }

    pub fn function(&self, name: &str) -> Option<FakeFunction> {
        self.functions.lock().unwrap().get(name).cloned()
    }

    fn record(&self, operation: &str, name: &str) -> Result<()> {
        self.calls
            .lock()
            .unwrap()
            .push(format!("{operation}:{name}"));
        if self
            .failures
            .lock()
            .unwrap()
            .contains(&format!("{operation}:{name}"))
        {
            return Err(Error::remote(operation, format!("injected failure for `{name}`")));
        }
        Ok(())
    }

    fn name_for_ref(&self, resource_ref: &str) -> String {
        resource_ref
            .rsplit(':')
            .next()
            .unwrap_or(resource_ref)
            .to_string()
    }

    fn with_function<T>(&self, name: &str, f: impl FnOnce(&mut FakeFunction) -> T) -> Result<T> {
        let mut functions = self.functions.lock().unwrap();
        let function = functions
            .get_mut(name)
            .ok_or_else(|| Error::not_found(name, "the function does not exist"))?;
        Ok(f(function))
    }
}

#[async_trait]
impl FunctionClient for FakeClient {
    async fn list_all(&self) -> Result<Vec<FunctionSummary>> {
        self.record("list_all", "*")?;
        let mut summaries: Vec<FunctionSummary> = self
            .functions
            .lock()
            .unwrap()
            .values()
            .map(|f| FunctionSummary {
                name: f.descriptor.name.clone(),
                runtime: f.descriptor.configuration.runtime.clone(),
            })
            .collect();
        summaries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(summaries)
    }

    async fn get_descriptor(&self, name: &str) -> Result<FunctionDescriptor> {
        self.record("get_descriptor", name)?;
        self.with_function(name, |f| f.descriptor.clone())
    }

    async fn download_code(&self, location: &str) -> Result<Vec<u8>> {
        self.record("download_code", location)?;
        let functions = self.functions.lock().unwrap();
        functions
            .values()
            .find(|f| f.descriptor.code_location.as_deref() == Some(location))
            .map(|f| f.code.clone())
            .ok_or_else(|| Error::remote("download_code", "404 Not Found"))
    }

    async fn create(
        &self,
        request: &CreateFunctionRequest,
        code: Vec<u8>,
    ) -> Result<CreatedFunction> {
        self.record("create", &request.name)?;
        let mut functions = self.functions.lock().unwrap();
        if functions.contains_key(&request.name) {
            return Err(Error::remote("create", "function already exists"));
        }

        let resource_ref = format!(
            "arn:aws:lambda:us-east-1:123456789012:function:{}",
            request.name
        );
        functions.insert(
            request.name.clone(),
            FakeFunction {
                descriptor: FunctionDescriptor {
                    name: request.name.clone(),
                    resource_ref: resource_ref.clone(),
                    configuration: request.configuration.clone(),
                    code_location: None,
                },
                code,
                ..Default::default()
            },
        );

        Ok(CreatedFunction {
            name: request.name.clone(),
            resource_ref,
            version: if request.publish { "1" } else { "$LATEST" }.to_string(),
        })
    }

    async fn list_tags(&self, resource_ref: &str) -> Result<HashMap<String, String>> {
        let name = self.name_for_ref(resource_ref);
        self.record("list_tags", &name)?;
        self.with_function(&name, |f| f.tags.clone())
    }

    async fn apply_tags(&self, resource_ref: &str, tags: &HashMap<String, String>) -> Result<()> {
        let name = self.name_for_ref(resource_ref);
        self.record("apply_tags", &name)?;
        if let Some(key) = tags.keys().find(|key| key.starts_with("aws:")) {
            return Err(Error::remote("tag_resource", format!("`{key}` uses a reserved prefix")));
        }
        self.with_function(&name, |f| f.tags.extend(tags.clone()))
    }

    async fn get_concurrency(&self, name: &str) -> Result<Option<i32>> {
        self.record("get_concurrency", name)?;
        self.with_function(name, |f| f.concurrency)
    }

    async fn set_concurrency(&self, name: &str, reserved: i32) -> Result<()> {
        self.record("set_concurrency", name)?;
        self.with_function(name, |f| f.concurrency = Some(reserved))
    }

    async fn list_event_source_mappings(&self, name: &str) -> Result<Vec<EventSourceMapping>> {
        self.record("list_event_source_mappings", name)?;
        self.with_function(name, |f| f.mappings.clone())
    }

    async fn create_event_source_mapping(&self, mapping: &EventSourceMapping) -> Result<()> {
        self.record("create_event_source_mapping", &mapping.function_name)?;
        self.with_function(&mapping.function_name, |f| f.mappings.push(mapping.clone()))
    }

    async fn get_policy(&self, name: &str) -> Result<Option<PolicyDescriptor>> {
        self.record("get_policy", name)?;
        self.with_function(name, |f| f.policy.clone())
    }

    async fn add_invoke_permission(
        &self,
        name: &str,
        statement_id: &str,
        principal: &str,
    ) -> Result<()> {
        self.record("add_invoke_permission", name)?;
        self.with_function(name, |f| {
            f.permissions
                .push((statement_id.to_string(), principal.to_string()))
        })
    }

    async fn list_aliases(&self, name: &str) -> Result<Vec<AliasDescriptor>> {
        self.record("list_aliases", name)?;
        self.with_function(name, |f| f.aliases.clone())
    }

    async fn create_alias(
        &self,
        name: &str,
        alias_name: &str,
        version: &str,
        description: Option<&str>,
    ) -> Result<()> {
        self.record("create_alias", name)?;
        self.with_function(name, |f| {
            f.aliases.push(AliasDescriptor {
                name: alias_name.to_string(),
                function_version: version.to_string(),
                description: description.map(str::to_string),
            })
        })
    }

    async fn update_runtime(&self, name: &str, runtime: &str) -> Result<()> {
        self.record("update_runtime", name)?;
        self.with_function(name, |f| {
            f.descriptor.configuration.runtime = Some(runtime.to_string())
        })
    }
}
