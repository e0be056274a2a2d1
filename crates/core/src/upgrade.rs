//! Moves an existing function onto a new runtime in place.

use log::info;

use crate::client::FunctionClient;
use crate::error::Result;

/// Sets the runtime of an existing function in place.
///
/// # Errors
///
/// Returns the adapter error if the configuration update is rejected.
pub async fn upgrade_function(
    client: &dyn FunctionClient,
    name: &str,
    target_runtime: &str,
) -> Result<()> {
    info!("Upgrading `{name}` to runtime `{target_runtime}`");
    client.update_runtime(name, target_runtime).await
}
