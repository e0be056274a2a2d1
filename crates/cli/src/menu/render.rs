//! Drawing the menu with crossterm.
//!
//! Every frame is drawn from scratch: clear, header bar, then the body of the
//! active state. Nothing here changes the menu.

use std::fmt::Display;
use std::io::{stdout, Stdout, Write};

use crossterm::cursor::{self, MoveTo};
use crossterm::queue;
use crossterm::style::Color::{DarkBlue, DarkGreen, DarkGrey, Red, Reset, Yellow};
use crossterm::style::{Attribute, Print, SetAttribute, SetBackgroundColor, SetForegroundColor};
use crossterm::terminal::{Clear, ClearType};

use aws_control_core::error::Result;
use aws_control_core::settings::SettingField;

use super::help::{HELP_ENTRIES, HELP_TITLE};
use super::list::SelectableList;
use super::machine::{display_value, AppContext, Menu, LIST_TOP_ROW, MAIN_MENU_TOP_ROW};
use super::types::{JobKind, ListItem, MenuState, ResultContext};

const LEFT_PADDING: usize = 2;

/// Draws the whole screen for the current state.
pub fn draw(menu: &Menu, ctx: &AppContext) -> Result<()> {
    let mut stdout = stdout();
    let (width, height) = menu.size();

    queue!(stdout, cursor::Hide, Clear(ClearType::All), MoveTo(0, 0))?;
    print_header(&mut stdout, &header_instructions(menu), width)?;

    match menu.state() {
        MenuState::MainMenu => {
            print_settings_summary(&mut stdout, ctx)?;
            if let Some(list) = menu.list() {
                print_title(&mut stdout, MAIN_MENU_TOP_ROW - 1, "Main Menu", list)?;
                print_list(&mut stdout, list, MAIN_MENU_TOP_ROW, height)?;
            }
        }
        MenuState::SubMenu(kind) => {
            if let Some(list) = menu.list() {
                print_title(&mut stdout, LIST_TOP_ROW - 1, &format!("{kind} Menu"), list)?;
                print_list(&mut stdout, list, LIST_TOP_ROW, height)?;
            }
        }
        MenuState::List(purpose) => {
            if let Some(list) = menu.list() {
                print_title(&mut stdout, LIST_TOP_ROW - 1, purpose.title(), list)?;
                print_list(&mut stdout, list, LIST_TOP_ROW, height)?;
            }
        }
        MenuState::TextInput(field) => print_text_input(&mut stdout, menu, field)?,
        MenuState::Help => print_help(&mut stdout, width)?,
        MenuState::SpinnerRunning(kind) => {
            queue!(
                stdout,
                MoveTo(LEFT_PADDING as u16, 2),
                SetForegroundColor(Yellow),
                Print(menu.spinner().frame()),
                SetForegroundColor(Reset),
                Print(format!(" {}...", kind.status_message())),
            )?;
        }
        MenuState::ResultDisplay => print_result(&mut stdout, menu, width)?,
    }

    stdout.flush()?;
    Ok(())
}

fn header_instructions(menu: &Menu) -> String {
    if let Some(list) = menu.list() {
        if list.ui_state.is_filtering {
            return "<esc>: Stop Filtering".to_string();
        }

        let count = list.visible_indexes().len();
        let position = format!(
            "{}/{}",
            pad_to_width_of((list.ui_state.selected_index + 1).min(count), count),
            count
        );
        return match menu.state() {
            MenuState::MainMenu => format!("/: Filter   |   {position}   |   q: Quit"),
            MenuState::List(purpose) if purpose.is_selectable() => format!(
                "space: Toggle   |   enter: Confirm   |   /: Filter   |   {position}   |   esc: Back"
            ),
            _ => format!("/: Filter   |   {position}   |   esc: Back"),
        };
    }

    match menu.state() {
        MenuState::TextInput(_) => "enter: Save   |   esc: Cancel".to_string(),
        MenuState::SpinnerRunning(JobKind::LoadFunctions(_)) => {
            "Loading, please wait   |   ctrl+c: Quit".to_string()
        }
        MenuState::SpinnerRunning(_) => "Working, please wait".to_string(),
        MenuState::ResultDisplay => match menu.result().map(|r| &r.context) {
            Some(ResultContext::ConfirmSelection { .. }) => "enter: Run   |   esc: Back".to_string(),
            _ => "enter/esc: Continue".to_string(),
        },
        _ => "esc: Back".to_string(),
    }
}

fn print_header(stdout: &mut Stdout, instructions: &str, width: u16) -> Result<()> {
    let left_padding = " ".repeat(LEFT_PADDING);
    let right_padding = " ".repeat(
        (width as usize)
            .saturating_sub(LEFT_PADDING)
            .saturating_sub(instructions.chars().count()),
    );

    queue!(
        stdout,
        MoveTo(0, 0),
        SetBackgroundColor(DarkGreen),
        Print(left_padding),
        Print(instructions),
        Print(right_padding),
        SetBackgroundColor(Reset),
        SetForegroundColor(Reset),
    )?;

    Ok(())
}

fn print_settings_summary(stdout: &mut Stdout, ctx: &AppContext) -> Result<()> {
    for (i, field) in SettingField::ALL.iter().enumerate() {
        let value = match field {
            SettingField::SessionToken if !ctx.settings.session_token.is_empty() => "set".to_string(),
            _ => display_value(*field, ctx.settings.get(*field)),
        };
        queue!(
            stdout,
            MoveTo(LEFT_PADDING as u16, 1 + i as u16),
            SetAttribute(Attribute::Bold),
            Print(format!("{field}: ")),
            SetAttribute(Attribute::Reset),
        )?;
        if value.is_empty() {
            queue!(
                stdout,
                SetForegroundColor(DarkGrey),
                Print("(not set)"),
                SetForegroundColor(Reset)
            )?;
        } else {
            queue!(stdout, Print(value))?;
        }
    }
    Ok(())
}

fn print_title(stdout: &mut Stdout, row: u16, title: &str, list: &SelectableList) -> Result<()> {
    let title = if list.ui_state.is_filtering {
        format!("{title} (filtering)")
    } else {
        title.to_string()
    };
    queue!(
        stdout,
        MoveTo(LEFT_PADDING as u16, row),
        SetAttribute(Attribute::Bold),
        Print(title),
        SetAttribute(Attribute::Reset),
    )?;
    Ok(())
}

/// Pad a value to match the width of the largest value
fn pad_to_width_of<T: Display>(value: T, max_number: usize) -> String {
    let width = format!("{}", max_number).len();
    format!("{:>width$}", value.to_string())
}

fn print_list(stdout: &mut Stdout, list: &SelectableList, top_row: u16, height: u16) -> Result<()> {
    let visible = list.visible_indexes();
    let viewport = &list.ui_state.viewport;

    if visible.is_empty() {
        queue!(
            stdout,
            MoveTo(0, top_row),
            SetForegroundColor(Red),
            Print("No matching entries!"),
            SetAttribute(Attribute::Reset),
        )?;
    }

    let rows = visible
        .iter()
        .enumerate()
        .skip(viewport.offset)
        .take(viewport.height as usize);

    for (row, (position, index)) in rows.enumerate() {
        let Some(item) = list.items().get(*index) else {
            continue;
        };
        let is_selected = position == list.ui_state.selected_index;
        write_row(
            stdout,
            top_row + row as u16,
            &row_content(item, list.is_multi_select()),
            is_selected,
            viewport.width,
        )?;
    }

    if list.ui_state.is_filtering {
        queue!(
            stdout,
            MoveTo(0, height.saturating_sub(1)),
            SetAttribute(Attribute::Bold),
            Print(format!("Filter: {}", list.ui_state.filter_text)),
            SetAttribute(Attribute::Reset)
        )?;
    }
    Ok(())
}

fn row_content(item: &ListItem, multi_select: bool) -> String {
    match item {
        ListItem::Resource { selected, .. } if multi_select => {
            let mark = if *selected { "[x]" } else { "[ ]" };
            format!("{mark} {item}")
        }
        _ => format!("{item}"),
    }
}

fn write_row(stdout: &mut Stdout, row: u16, content: &str, is_selected: bool, width: u16) -> Result<()> {
    queue!(stdout, MoveTo(0, row), Clear(ClearType::CurrentLine))?;

    let content = format!("{}{content}", " ".repeat(LEFT_PADDING));
    let padding = " ".repeat((width as usize).saturating_sub(content.chars().count()));

    if is_selected {
        queue!(
            stdout,
            SetAttribute(Attribute::Bold),
            SetBackgroundColor(DarkBlue),
            SetForegroundColor(Yellow),
        )?;
    }

    queue!(
        stdout,
        Print(content),
        Print(padding),
        SetAttribute(Attribute::Reset),
        SetBackgroundColor(Reset),
        SetForegroundColor(Reset),
    )?;

    Ok(())
}

fn print_text_input(stdout: &mut Stdout, menu: &Menu, field: SettingField) -> Result<()> {
    let Some(input) = menu.text_input() else {
        return Ok(());
    };

    queue!(
        stdout,
        MoveTo(LEFT_PADDING as u16, 2),
        SetAttribute(Attribute::Bold),
        Print(format!("Enter {field}")),
        SetAttribute(Attribute::Reset),
        MoveTo(LEFT_PADDING as u16, 4),
        Print("> "),
    )?;

    let value = input.value();
    if value.is_empty() {
        queue!(
            stdout,
            SetForegroundColor(DarkGrey),
            Print(field.placeholder()),
            SetForegroundColor(Reset)
        )?;
    } else {
        queue!(stdout, Print(value))?;
    }

    let cursor_column = LEFT_PADDING + 2 + input.cursor();
    queue!(stdout, MoveTo(cursor_column as u16, 4), cursor::Show)?;
    Ok(())
}

fn print_help(stdout: &mut Stdout, width: u16) -> Result<()> {
    queue!(
        stdout,
        MoveTo(LEFT_PADDING as u16, 2),
        SetAttribute(Attribute::Bold),
        Print(HELP_TITLE),
        SetAttribute(Attribute::Reset),
    )?;

    let text_width = (width as usize).saturating_sub(LEFT_PADDING * 2).max(20);
    let mut row = 4u16;
    for (name, definition) in HELP_ENTRIES {
        queue!(
            stdout,
            MoveTo(LEFT_PADDING as u16, row),
            SetForegroundColor(DarkGreen),
            SetAttribute(Attribute::Bold),
            Print(format!("{name}:")),
            SetAttribute(Attribute::Reset),
            SetForegroundColor(Reset),
        )?;
        row += 1;
        for line in wrap_text(definition, text_width) {
            queue!(stdout, MoveTo(LEFT_PADDING as u16, row), Print(line))?;
            row += 1;
        }
        row += 1;
    }
    Ok(())
}

fn print_result(stdout: &mut Stdout, menu: &Menu, width: u16) -> Result<()> {
    let Some(result) = menu.result() else {
        return Ok(());
    };

    let text_width = (width as usize).saturating_sub(LEFT_PADDING * 2).max(20);
    let mut row = 2u16;

    if result.is_error {
        queue!(stdout, SetForegroundColor(Red))?;
    }
    for line in wrap_text(&result.message, text_width) {
        queue!(stdout, MoveTo(LEFT_PADDING as u16, row), Print(line))?;
        row += 1;
    }
    queue!(stdout, SetForegroundColor(Reset))?;

    let instruction = match result.context {
        ResultContext::ConfirmSelection { .. } => "Press enter to run, esc to go back to the list.",
        _ => "Press enter or esc to continue.",
    };
    queue!(
        stdout,
        MoveTo(LEFT_PADDING as u16, row + 1),
        SetAttribute(Attribute::Italic),
        Print(instruction),
        SetAttribute(Attribute::Reset),
    )?;
    Ok(())
}

/// Breaks `text` into lines no wider than `width`, keeping existing line breaks.
///
/// Words longer than `width` are split.
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();

    for paragraph in text.split('\n') {
        let mut line = String::new();
        for word in paragraph.split_whitespace() {
            let mut word: Vec<char> = word.chars().collect();
            while word.len() > width {
                if !line.is_empty() {
                    lines.push(std::mem::take(&mut line));
                }
                let rest = word.split_off(width);
                lines.push(word.into_iter().collect());
                word = rest;
            }

            let line_len = line.chars().count();
            if line_len > 0 && line_len + 1 + word.len() > width {
                lines.push(std::mem::take(&mut line));
            }
            if !line.is_empty() {
                line.push(' ');
            }
            line.extend(word);
        }
        lines.push(line);
    }

    lines
}
