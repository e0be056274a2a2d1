//! Type definitions for the menu state machine.
//!
//! This module defines the states the interface can be in, the items shown in
//! its lists, and the effects a key press asks the event loop to perform.

use std::fmt::{Display, Formatter};

use aws_control_core::batch::BatchKind;
use aws_control_core::settings::SettingField;

use crate::jobs::JobRequest;

/// Which submenu is open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubMenuKind {
    Lambda,
    Glue,
}

impl Display for SubMenuKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            SubMenuKind::Lambda => "Lambda",
            SubMenuKind::Glue => "Glue",
        })
    }
}

/// Why a list of functions is being shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListPurpose {
    Browse,
    Clone,
    Upgrade,
    CloneAndUpgrade,
}

impl ListPurpose {
    /// The batch run when the selection is confirmed; `None` for browse-only lists.
    pub fn batch_kind(&self) -> Option<BatchKind> {
        match self {
            ListPurpose::Browse => None,
            ListPurpose::Clone => Some(BatchKind::Clone),
            ListPurpose::Upgrade => Some(BatchKind::Upgrade),
            ListPurpose::CloneAndUpgrade => Some(BatchKind::CloneAndUpgrade),
        }
    }

    pub fn is_selectable(&self) -> bool {
        self.batch_kind().is_some()
    }

    pub fn title(&self) -> &'static str {
        match self {
            ListPurpose::Browse => "Lambda Functions",
            ListPurpose::Clone => "Clone Lambda Functions",
            ListPurpose::Upgrade => "Upgrade Lambda Functions",
            ListPurpose::CloneAndUpgrade => "Clone + Upgrade Lambda Functions",
        }
    }
}

/// The background job a spinner is waiting on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobKind {
    SaveSettings,
    LoadFunctions(ListPurpose),
    Batch(ListPurpose),
}

impl JobKind {
    pub fn status_message(&self) -> &'static str {
        match self {
            JobKind::SaveSettings => "Saving Settings",
            JobKind::LoadFunctions(_) => "Loading Lambda functions",
            JobKind::Batch(purpose) => purpose
                .batch_kind()
                .map_or("Working", |kind| kind.status_message()),
        }
    }
}

/// Exactly one of these is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuState {
    MainMenu,
    SubMenu(SubMenuKind),
    TextInput(SettingField),
    Help,
    List(ListPurpose),
    SpinnerRunning(JobKind),
    ResultDisplay,
}

/// What a menu entry does when chosen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuAction {
    EditSetting(SettingField),
    OpenSubMenu(SubMenuKind),
    OpenList(ListPurpose),
    Help,
    SaveSettings,
    Unsupported(&'static str),
}

/// An entry of any list on screen.
///
/// Menu entries are display-only actions; functions can carry a selection flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListItem {
    Action {
        label: String,
        action: MenuAction,
    },
    Resource {
        name: String,
        detail: Option<String>,
        selected: bool,
    },
}

impl ListItem {
    pub fn action(label: &str, action: MenuAction) -> Self {
        ListItem::Action {
            label: label.to_string(),
            action,
        }
    }

    /// Text matched against the filter.
    pub fn filter_value(&self) -> &str {
        match self {
            ListItem::Action { label, .. } => label,
            ListItem::Resource { name, .. } => name,
        }
    }
}

impl Display for ListItem {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ListItem::Action { label, .. } => f.write_str(label),
            ListItem::Resource {
                name,
                detail: Some(detail),
                ..
            } => write!(f, "{name} ({detail})"),
            ListItem::Resource { name, .. } => f.write_str(name),
        }
    }
}

/// Why the result screen is showing, which decides what `enter` and `esc` do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResultContext {
    /// Plain message; any dismiss returns to the previous state.
    Informational,
    /// Selection summary; `enter` launches the batch, `esc` returns to the list.
    ConfirmSelection {
        purpose: ListPurpose,
        names: Vec<String>,
    },
    /// A batch has finished; dismissing reloads the list it came from.
    BatchFinished { purpose: ListPurpose },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultView {
    pub message: String,
    pub is_error: bool,
    pub context: ResultContext,
}

/// Side effects the event loop performs on behalf of the state machine.
#[derive(Debug, PartialEq)]
pub enum Effect {
    None,
    Quit,
    StartJob(JobRequest),
}

/// Direction to move the cursor in a list.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CycleDirection {
    Up,
    Down,
}

/// State for the list viewport.
///
/// Tracks the visible portion of a list when there are more
/// entries than can fit on screen.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct ViewportState {
    pub offset: usize,
    pub height: u16,
    pub width: u16,
}

/// Cursor, viewport and filter state of one list.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct UiState {
    /// Cursor position within the filtered entries
    pub selected_index: usize,
    /// Viewport state for scrolling
    pub viewport: ViewportState,
    /// Whether the user is currently typing a filter
    pub is_filtering: bool,
    /// Current filter text
    pub filter_text: String,
}
