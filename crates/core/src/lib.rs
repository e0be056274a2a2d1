//! AWS Control Core Library
//!
//! This crate provides the non-interactive half of aws-control, a terminal tool for
//! bulk cloning and upgrading AWS Lambda functions during staged migrations.
//!
//! # Key Features
//!
//! - **Session Settings**: Load and save credentials, region and naming rules
//! - **Name Transformer**: Derive a clone's name with append/replace rules
//! - **Client Adapter**: A provider-neutral trait over the Lambda API, with an AWS implementation
//! - **Clone Orchestrator**: Copy code, configuration, tags, concurrency, event
//!   source mappings, policy and aliases onto a new function
//! - **Upgrade Orchestrator**: Change a function's runtime in place
//! - **Batches**: Run either orchestrator over a selection and report failures
//!
//! # Examples
//!
//! Deriving clone names:
//!
//! ```
//! use aws_control_core::naming::transform_name;
//!
//! assert_eq!(transform_name("billing-handler", "-p313", ""), "billing-handler-p313");
//! ```

pub mod aws;
pub mod batch;
pub mod client;
pub mod clone;
pub mod config;
pub mod error;
pub mod function;
pub mod naming;
pub mod settings;
pub mod upgrade;
