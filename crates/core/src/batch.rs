//! Runs an orchestrator over every selected function and summarises the result.
//!
//! A failure only stops the remaining steps for that one function; the batch always
//! moves on to the next name.

use std::fmt::{Display, Formatter};

use log::{info, warn};

use crate::client::FunctionClient;
use crate::clone::clone_function;
use crate::error::{Error, Result};
use crate::naming::transform_name;
use crate::settings::Settings;
use crate::upgrade::upgrade_function;

/// The operation a batch applies to each selected function.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchKind {
    Clone,
    Upgrade,
    CloneAndUpgrade,
}

impl BatchKind {
    pub fn success_message(&self) -> &'static str {
        match self {
            BatchKind::Clone => "All selected functions were cloned.",
            BatchKind::Upgrade => "All selected functions were upgraded.",
            BatchKind::CloneAndUpgrade => "All selected functions were cloned and upgraded.",
        }
    }

    pub fn status_message(&self) -> &'static str {
        match self {
            BatchKind::Clone => "Cloning Lambda functions",
            BatchKind::Upgrade => "Upgrading Lambda runtimes",
            BatchKind::CloneAndUpgrade => "Cloning and upgrading Lambda functions",
        }
    }

    pub fn needs_naming_rule(&self) -> bool {
        matches!(self, BatchKind::Clone | BatchKind::CloneAndUpgrade)
    }
}

/// How failures are surfaced once a batch completes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportMode {
    /// Every failure, in the order the functions were processed.
    #[default]
    AllFailures,
    /// Only the most recent failure message.
    LastError,
}

impl Display for ReportMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            ReportMode::AllFailures => "all-failures",
            ReportMode::LastError => "last-error",
        })
    }
}

/// Everything a batch needs, captured when the operator confirms the selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchPlan {
    pub kind: BatchKind,
    pub names: Vec<String>,
    pub append_text: String,
    pub replace_text: String,
    pub target_runtime: String,
}

impl BatchPlan {
    pub fn new(kind: BatchKind, names: Vec<String>, settings: &Settings, target_runtime: &str) -> Self {
        Self {
            kind,
            names,
            append_text: settings.append_text.clone(),
            replace_text: settings.replace_text.clone(),
            target_runtime: target_runtime.to_string(),
        }
    }

    pub fn destination_name(&self, source: &str) -> String {
        transform_name(source, &self.append_text, &self.replace_text)
    }
}

/// Rejects a clone when the naming rule cannot produce a distinct name.
///
/// # Errors
///
/// Returns [`Error::Validation`] when the append text is empty, or when it is the
/// same as the replace text (replacing text with itself keeps the original name).
pub fn validate_naming_rule(append_text: &str, replace_text: &str) -> Result<()> {
    if append_text.is_empty() {
        return Err(Error::Validation(
            "New Text must be set before cloning, otherwise the clone would keep the original name."
                .to_string(),
        ));
    }
    if append_text == replace_text {
        return Err(Error::Validation(format!(
            "New Text and Replace Text are both `{append_text}`, so clones would keep their original names."
        )));
    }
    Ok(())
}

/// The clone name for `source`, refused when it would reuse `source` itself.
fn distinct_destination(plan: &BatchPlan, source: &str) -> Result<String> {
    let destination = plan.destination_name(source);
    if destination == source {
        return Err(Error::Validation(format!(
            "The naming rule leaves `{source}` unchanged, a clone needs a different name."
        )));
    }
    Ok(destination)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemFailure {
    pub name: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchReport {
    pub kind: BatchKind,
    pub attempted: Vec<String>,
    pub failures: Vec<ItemFailure>,
}

/// The single payload a finished job hands back to the menu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchOutcome {
    pub message: String,
    pub is_error: bool,
}

impl BatchReport {
    pub fn outcome(&self, mode: ReportMode) -> BatchOutcome {
        let Some(last) = self.failures.last() else {
            return BatchOutcome {
                message: self.kind.success_message().to_string(),
                is_error: false,
            };
        };

        let message = match mode {
            ReportMode::LastError => last.message.clone(),
            ReportMode::AllFailures => {
                let succeeded = self.attempted.len() - self.failures.len();
                let mut message = format!(
                    "{} of {} function(s) failed, {} succeeded:\n",
                    self.failures.len(),
                    self.attempted.len(),
                    succeeded
                );
                for failure in &self.failures {
                    message.push_str(&format!("\n- {}: {}", failure.name, failure.message));
                }
                message
            }
        };

        BatchOutcome {
            message,
            is_error: true,
        }
    }
}

async fn run_item(client: &dyn FunctionClient, plan: &BatchPlan, name: &str) -> Result<()> {
    match plan.kind {
        BatchKind::Clone => {
            clone_function(client, name, &distinct_destination(plan, name)?).await?;
        }
        BatchKind::Upgrade => {
            upgrade_function(client, name, &plan.target_runtime).await?;
        }
        BatchKind::CloneAndUpgrade => {
            let destination = distinct_destination(plan, name)?;
            clone_function(client, name, &destination).await?;
            upgrade_function(client, &destination, &plan.target_runtime).await?;
        }
    }
    Ok(())
}

/// Runs the plan over every name, one at a time, in selection order.
///
/// # Errors
///
/// Only [`Error::Validation`] is returned, before any remote call is made.
/// Per-function failures are collected into the report instead.
pub async fn run_batch(client: &dyn FunctionClient, plan: &BatchPlan) -> Result<BatchReport> {
    if plan.kind.needs_naming_rule() {
        validate_naming_rule(&plan.append_text, &plan.replace_text)?;
    }

    let mut failures = Vec::new();
    for name in &plan.names {
        if let Err(e) = run_item(client, plan, name).await {
            warn!("{:?} of `{name}` failed: {e}", plan.kind);
            failures.push(ItemFailure {
                name: name.clone(),
                message: e.to_string(),
            });
        }
    }

    info!(
        "{:?} batch finished: {} attempted, {} failed",
        plan.kind,
        plan.names.len(),
        failures.len()
    );

    Ok(BatchReport {
        kind: plan.kind,
        attempted: plan.names.clone(),
        failures,
    })
}
