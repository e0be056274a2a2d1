//! Reconstructs one function, and its dependent sub-resources, under a new name.
//!
//! The steps run strictly in order and the first failure aborts the rest for that
//! function. Nothing already created is rolled back.

use log::{debug, info};

use crate::client::FunctionClient;
use crate::error::{Error, MetadataStep, Result};
use crate::function::{CreateFunctionRequest, CreatedFunction, FunctionDescriptor};

/// Statement id of the invoke permission granted to a clone whose source has a policy.
pub const CLONED_POLICY_STATEMENT_ID: &str = "aws-control-cloned-invoke";
/// Principal allowed to invoke a clone whose source has a policy.
pub const CLONED_POLICY_PRINCIPAL: &str = "apigateway.amazonaws.com";
/// Tag keys under this prefix belong to AWS and cannot be set by callers.
pub const RESERVED_TAG_PREFIX: &str = "aws:";

/// What was copied onto the new function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CloneSummary {
    pub created: CreatedFunction,
    pub tags_copied: usize,
    pub reserved_concurrency: Option<i32>,
    pub mappings_copied: usize,
    pub policy_copied: bool,
    pub aliases_copied: usize,
}

/// Clones `source` into a new function called `destination`.
///
/// # Errors
///
/// - [`Error::NotFound`] if the source or its code location is missing (nothing is downloaded)
/// - [`Error::Download`] if the code cannot be fetched
/// - [`Error::Creation`] if the new function cannot be created
/// - [`Error::MetadataCopy`] if copying tags, concurrency, mappings, policy or aliases fails
pub async fn clone_function(
    client: &dyn FunctionClient,
    source: &str,
    destination: &str,
) -> Result<CloneSummary> {
    info!("Cloning `{source}` into `{destination}`");

    let descriptor = client.get_descriptor(source).await?;
    let Some(code_location) = descriptor.code_location.as_deref() else {
        return Err(Error::not_found(source, "no code location found for the function"));
    };

    let code = client
        .download_code(code_location)
        .await
        .map_err(|e| Error::Download {
            name: source.to_string(),
            reason: e.to_string(),
        })?;
    debug!("Downloaded {} bytes of code for `{source}`", code.len());

    let request = CreateFunctionRequest::from_descriptor(destination, &descriptor);
    let created = client
        .create(&request, code)
        .await
        .map_err(|e| Error::Creation {
            name: destination.to_string(),
            reason: e.to_string(),
        })?;

    let tags_copied = copy_tags(client, &descriptor, &created)
        .await
        .map_err(|e| Error::metadata_copy(MetadataStep::Tags, destination, &e))?;

    let reserved_concurrency = copy_concurrency(client, source, destination)
        .await
        .map_err(|e| Error::metadata_copy(MetadataStep::Concurrency, destination, &e))?;

    let mappings_copied = copy_event_source_mappings(client, source, destination)
        .await
        .map_err(|e| Error::metadata_copy(MetadataStep::EventSourceMappings, destination, &e))?;

    let policy_copied = copy_policy(client, source, destination)
        .await
        .map_err(|e| Error::metadata_copy(MetadataStep::Policy, destination, &e))?;

    let aliases_copied = copy_aliases(client, source, &created)
        .await
        .map_err(|e| Error::metadata_copy(MetadataStep::Aliases, destination, &e))?;

    info!("Cloned `{source}` into `{destination}` (version {})", created.version);

    Ok(CloneSummary {
        created,
        tags_copied,
        reserved_concurrency,
        mappings_copied,
        policy_copied,
        aliases_copied,
    })
}

async fn copy_tags(
    client: &dyn FunctionClient,
    source: &FunctionDescriptor,
    created: &CreatedFunction,
) -> Result<usize> {
    let mut tags = client.list_tags(&source.resource_ref).await?;
    tags.retain(|key, _| {
        let reserved = key.starts_with(RESERVED_TAG_PREFIX);
        if reserved {
            debug!("Skipping reserved tag `{key}` on `{}`", source.name);
        }
        !reserved
    });
    if tags.is_empty() {
        return Ok(0);
    }

    client.apply_tags(&created.resource_ref, &tags).await?;
    Ok(tags.len())
}

async fn copy_concurrency(
    client: &dyn FunctionClient,
    source: &str,
    destination: &str,
) -> Result<Option<i32>> {
    let Some(reserved) = client.get_concurrency(source).await? else {
        return Ok(None);
    };

    client.set_concurrency(destination, reserved).await?;
    Ok(Some(reserved))
}

async fn copy_event_source_mappings(
    client: &dyn FunctionClient,
    source: &str,
    destination: &str,
) -> Result<usize> {
    let mappings = client.list_event_source_mappings(source).await?;
    for mapping in &mappings {
        debug!("Copying event source `{}` onto `{destination}`", mapping.event_source);
        client
            .create_event_source_mapping(&mapping.retarget(destination))
            .await?;
    }
    Ok(mappings.len())
}

async fn copy_policy(client: &dyn FunctionClient, source: &str, destination: &str) -> Result<bool> {
    if client.get_policy(source).await?.is_none() {
        return Ok(false);
    }

    client
        .add_invoke_permission(destination, CLONED_POLICY_STATEMENT_ID, CLONED_POLICY_PRINCIPAL)
        .await?;
    Ok(true)
}

async fn copy_aliases(
    client: &dyn FunctionClient,
    source: &str,
    created: &CreatedFunction,
) -> Result<usize> {
    let aliases = client.list_aliases(source).await?;
    for alias in &aliases {
        client
            .create_alias(
                &created.name,
                &alias.name,
                &created.version,
                alias.description.as_deref(),
            )
            .await?;
    }
    Ok(aliases.len())
}
