//! Background job runner.
//!
//! Jobs run on the tokio runtime, off the interactive loop. Each job posts exactly
//! one [`JobEvent`] back through a channel; the event loop picks it up with
//! [`JobRunner::poll`] and hands it to the menu. At most one job is in flight.

use std::sync::Arc;

use log::{debug, error, info};
use tokio::runtime::Handle;
use tokio::sync::mpsc::{self, error::TryRecvError, UnboundedReceiver, UnboundedSender};

use aws_control_core::batch::{run_batch, BatchPlan, ReportMode};
use aws_control_core::client::ClientFactory;
use aws_control_core::error::{Error, Result};
use aws_control_core::function::FunctionSummary;
use aws_control_core::settings::{write_settings, Settings};

pub use aws_control_core::batch::BatchOutcome as JobOutcome;

/// Work a job performs, with every input captured when it was requested.
#[derive(Debug, Clone, PartialEq)]
pub enum JobRequest {
    SaveSettings {
        path: String,
        settings: Settings,
    },
    Batch {
        plan: BatchPlan,
        report_mode: ReportMode,
        settings: Settings,
    },
    ListFunctions {
        settings: Settings,
    },
}

/// What a finished job reports back.
#[derive(Debug)]
pub enum JobEvent {
    Finished(JobOutcome),
    /// Every function, sorted by name, or the reason listing failed.
    FunctionsListed(Result<Vec<FunctionSummary>>),
}

pub struct JobRunner {
    handle: Handle,
    factory: Arc<dyn ClientFactory>,
    sender: UnboundedSender<JobEvent>,
    receiver: UnboundedReceiver<JobEvent>,
    in_flight: bool,
}

impl JobRunner {
    pub fn new(handle: Handle, factory: Arc<dyn ClientFactory>) -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        Self {
            handle,
            factory,
            sender,
            receiver,
            in_flight: false,
        }
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight
    }

    /// Starts `request` in the background.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Misc`] if another job has not reported back yet.
    pub fn launch(&mut self, request: JobRequest) -> Result<()> {
        if self.in_flight {
            return Err(Error::Misc("another job is still running".to_string()));
        }

        self.in_flight = true;
        let factory = Arc::clone(&self.factory);
        let sender = self.sender.clone();

        self.handle.spawn(async move {
            let event = run_job(factory.as_ref(), request).await;
            if sender.send(event).is_err() {
                error!("Job finished after the interface closed");
            }
        });
        Ok(())
    }

    /// The report of the running job, once it has finished.
    pub fn poll(&mut self) -> Option<JobEvent> {
        match self.receiver.try_recv() {
            Ok(event) => {
                self.in_flight = false;
                Some(event)
            }
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                self.in_flight = false;
                None
            }
        }
    }
}

/// Runs one job to completion and folds any failure into the event.
pub async fn run_job(factory: &dyn ClientFactory, request: JobRequest) -> JobEvent {
    match request {
        JobRequest::SaveSettings { path, settings } => match write_settings(&path, &settings) {
            Ok(()) => {
                info!("Settings saved to `{path}`");
                JobEvent::Finished(JobOutcome {
                    message: format!("Settings saved to {path}"),
                    is_error: false,
                })
            }
            Err(e) => failed(e),
        },
        JobRequest::Batch {
            plan,
            report_mode,
            settings,
        } => {
            let client = match factory.connect(&settings).await {
                Ok(client) => client,
                Err(e) => return failed(e),
            };

            match run_batch(client.as_ref(), &plan).await {
                Ok(report) => JobEvent::Finished(report.outcome(report_mode)),
                Err(e) => failed(e),
            }
        }
        JobRequest::ListFunctions { settings } => {
            JobEvent::FunctionsListed(list_functions(factory, &settings).await)
        }
    }
}

async fn list_functions(factory: &dyn ClientFactory, settings: &Settings) -> Result<Vec<FunctionSummary>> {
    let client = factory.connect(settings).await?;
    let mut functions = client.list_all().await?;
    functions.sort_by(|a, b| a.name.cmp(&b.name));
    debug!("Listed {} functions", functions.len());
    Ok(functions)
}

fn failed(e: Error) -> JobEvent {
    error!("Job failed: {e}");
    JobEvent::Finished(JobOutcome {
        message: e.to_string(),
        is_error: true,
    })
}
