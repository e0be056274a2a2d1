//! Interactive menu and the lists it browses.
//!
//! This module holds the terminal user interface of aws-control: a state machine
//! that owns the current screen, the lists of actions and functions, text input
//! for settings, and the rendering of all of it.
//!
//! # Key Features
//!
//! - **Main Menu**: Edit settings, open the Lambda or Glue menus, help, save
//! - **Function Lists**: Browse, or multi-select functions to clone or upgrade
//! - **Filtering**: Case-insensitive substring filter on any list
//! - **Confirmation**: Every batch is confirmed on a summary screen before it runs
//!
//! # User Interface
//!
//! The interface supports:
//! - Arrow keys to move
//! - Enter to choose, confirm or dismiss
//! - Space to toggle a function in the clone and upgrade lists
//! - '/' to filter a list, escape to stop filtering
//! - Escape to go back, 'q' or ctrl+c to quit from the main menu

pub mod help;
pub mod list;
pub mod machine;
pub mod render;
pub mod text_input;
pub mod types;

pub use machine::{AppContext, Menu};
pub use types::{Effect, ListPurpose, MenuState};
