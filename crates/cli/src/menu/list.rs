//! Filterable, optionally multi-select list backing every menu and function list.

use super::types::CycleDirection::{Down, Up};
use super::types::{CycleDirection, ListItem, UiState, ViewportState};

#[derive(Debug, Clone)]
pub struct SelectableList {
    items: Vec<ListItem>,
    multi_select: bool,
    pub ui_state: UiState,
}

impl SelectableList {
    pub fn new(items: Vec<ListItem>, multi_select: bool, viewport: ViewportState) -> Self {
        Self {
            items,
            multi_select,
            ui_state: UiState {
                selected_index: 0,
                viewport,
                is_filtering: false,
                filter_text: String::new(),
            },
        }
    }

    pub fn items(&self) -> &[ListItem] {
        &self.items
    }

    pub fn is_multi_select(&self) -> bool {
        self.multi_select
    }

    /// Indexes into `items` that match the current filter, in list order.
    pub fn visible_indexes(&self) -> Vec<usize> {
        let needle = self.ui_state.filter_text.to_lowercase();
        self.items
            .iter()
            .enumerate()
            .filter(|(_, item)| needle.is_empty() || item.filter_value().to_lowercase().contains(&needle))
            .map(|(i, _)| i)
            .collect()
    }

    /// The entry under the cursor.
    pub fn current(&self) -> Option<&ListItem> {
        self.visible_indexes()
            .get(self.ui_state.selected_index)
            .and_then(|&i| self.items.get(i))
    }

    pub fn move_cursor(&mut self, direction: CycleDirection) {
        let visible = self.visible_indexes().len();
        move_selected_index(&mut self.ui_state, visible, direction);
    }

    /// Flips the selection flag of the entry under the cursor.
    ///
    /// Returns `false` when nothing was toggled.
    pub fn toggle_current(&mut self) -> bool {
        if !self.multi_select {
            return false;
        }

        let Some(&index) = self.visible_indexes().get(self.ui_state.selected_index) else {
            return false;
        };

        match self.items.get_mut(index) {
            Some(ListItem::Resource { selected, .. }) => {
                *selected = !*selected;
                true
            }
            _ => false,
        }
    }

    /// Names of every selected entry, hidden by the filter or not, in list order.
    pub fn selected_names(&self) -> Vec<String> {
        self.items
            .iter()
            .filter_map(|item| match item {
                ListItem::Resource {
                    name,
                    selected: true,
                    ..
                } => Some(name.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn begin_filter(&mut self) {
        self.ui_state.is_filtering = true;
    }

    pub fn end_filter(&mut self) {
        self.ui_state.is_filtering = false;
        self.ui_state.filter_text.clear();
        self.reset_cursor();
    }

    pub fn push_filter(&mut self, c: char) {
        self.ui_state.filter_text.push(c);
        self.reset_cursor();
    }

    pub fn pop_filter(&mut self) -> bool {
        if self.ui_state.filter_text.pop().is_some() {
            self.reset_cursor();
            return true;
        }
        false
    }

    pub fn resize(&mut self, width: u16, height: u16) {
        let viewport = &mut self.ui_state.viewport;
        viewport.width = width;
        viewport.height = height.max(1);

        let selected = self.ui_state.selected_index;
        if selected >= viewport.offset + viewport.height as usize {
            viewport.offset = selected + 1 - viewport.height as usize;
        }
    }

    fn reset_cursor(&mut self) {
        self.ui_state.selected_index = 0;
        self.ui_state.viewport.offset = 0;
    }
}

/// Moves the cursor one step, wrapping at both ends and keeping it in the viewport.
fn move_selected_index(ui_state: &mut UiState, visible_count: usize, direction: CycleDirection) {
    if visible_count == 0 {
        return;
    }

    let height = (ui_state.viewport.height as usize).max(1);
    let previous = ui_state.selected_index;

    let new_index = match direction {
        Up => {
            if previous == 0 {
                let last = visible_count - 1;
                ui_state.viewport.offset = last.saturating_sub(height - 1);
                last
            } else {
                let index = previous - 1;
                if index < ui_state.viewport.offset {
                    ui_state.viewport.offset = index;
                }
                index
            }
        }
        Down => {
            let index = (previous + 1) % visible_count;
            if index < previous {
                ui_state.viewport.offset = 0;
            } else if index >= ui_state.viewport.offset + height {
                ui_state.viewport.offset = index + 1 - height;
            }
            index
        }
    };

    ui_state.selected_index = new_index;
}
