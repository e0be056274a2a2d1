//! AWS Control CLI Library
//!
//! This crate provides the interactive terminal interface of aws-control, a tool
//! for browsing, bulk cloning and bulk upgrading AWS Lambda functions.
//!
//! # Key Features
//!
//! - **Menu State Machine**: Keyboard driven menus with one level of back navigation
//! - **Function Lists**: Filterable lists with multi-select for batches
//! - **Background Jobs**: Saves and batches run off the input loop behind a spinner
//! - **Settings Editing**: Credentials, region and naming rules edited in place
//!
//! # Architecture
//!
//! - [`cli_args`]: Command-line argument parsing
//! - [`menu`]: States, lists, text input and rendering
//! - [`jobs`]: The background job runner
//! - [`app`]: The terminal event loop tying the above together
//!
//! # Examples
//!
//! ```bash
//! # Start with the default settings file
//! awsc
//!
//! # Upgrade to a different runtime and keep a log
//! RUST_LOG=debug awsc --target-runtime python3.12 --log-file /tmp/awsc.log
//!
//! # Report only the last failure of a batch
//! awsc --report last-error
//! ```

pub mod app;
pub mod cli_args;
pub mod jobs;
pub mod menu;
pub mod spinner;
