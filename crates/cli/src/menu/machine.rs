//! The menu state machine.
//!
//! [`Menu::handle_key`] routes one key press to the handler of the active state and
//! returns the [`Effect`] the event loop has to carry out. Finished jobs come back
//! in through [`Menu::job_event`]. Nothing in here touches the terminal or the
//! network.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use itertools::Itertools;
use log::{debug, info, warn};

use aws_control_core::batch::{validate_naming_rule, BatchKind, BatchPlan, ReportMode};
use aws_control_core::error::Result;
use aws_control_core::function::FunctionSummary;
use aws_control_core::settings::{SettingField, Settings};

use super::list::SelectableList;
use super::text_input::{TextInput, TextInputEvent};
use super::types::CycleDirection::{Down, Up};
use super::types::{
    Effect, JobKind, ListItem, ListPurpose, MenuAction, MenuState, ResultContext, ResultView,
    SubMenuKind, ViewportState,
};
use crate::jobs::{JobEvent, JobOutcome, JobRequest};
use crate::spinner::Spinner;

/// First row of the main menu entries; the settings summary sits above it.
pub const MAIN_MENU_TOP_ROW: u16 = 9;
/// First row of every other list, below the header bar and the title.
pub const LIST_TOP_ROW: u16 = 2;

/// Everything the state handlers read or change besides the menu itself.
#[derive(Debug, Clone)]
pub struct AppContext {
    pub settings: Settings,
    pub settings_path: String,
    pub target_runtime: String,
    pub report_mode: ReportMode,
}

pub struct Menu {
    state: MenuState,
    /// Where cancel and dismiss go back to. One level only.
    previous: MenuState,
    /// Entries of the open main menu or submenu
    menu: SelectableList,
    /// The menu whose entries are in `menu`
    menu_owner: MenuState,
    functions: Option<SelectableList>,
    text_input: Option<TextInput>,
    result: Option<ResultView>,
    spinner: Spinner,
    width: u16,
    height: u16,
}

/// Shows the last four characters of a secret value.
pub fn mask_secret(value: &str) -> String {
    if value.is_empty() {
        return String::new();
    }
    let chars: Vec<char> = value.chars().collect();
    let tail: String = chars[chars.len().saturating_sub(4)..].iter().collect();
    format!("****{tail}")
}

/// The value of `field` as it may appear on screen.
pub fn display_value(field: SettingField, value: &str) -> String {
    match field {
        SettingField::CredentialSecret | SettingField::SessionToken => mask_secret(value),
        _ => value.to_string(),
    }
}

fn menu_items(state: MenuState) -> Vec<ListItem> {
    match state {
        MenuState::SubMenu(SubMenuKind::Lambda) => vec![
            ListItem::action("List Lambda Functions", MenuAction::OpenList(ListPurpose::Browse)),
            ListItem::action("Clone Lambda Functions", MenuAction::OpenList(ListPurpose::Clone)),
            ListItem::action(
                "Upgrade Lambda Functions",
                MenuAction::OpenList(ListPurpose::Upgrade),
            ),
            ListItem::action(
                "Clone + Upgrade Lambda Functions",
                MenuAction::OpenList(ListPurpose::CloneAndUpgrade),
            ),
        ],
        MenuState::SubMenu(SubMenuKind::Glue) => ["List Glue Jobs", "Clone Glue Jobs", "Upgrade Glue Jobs"]
            .iter()
            .map(|label| {
                ListItem::action(label, MenuAction::Unsupported("Glue jobs are not supported yet."))
            })
            .collect(),
        _ => {
            let mut items: Vec<ListItem> = SettingField::ALL
                .iter()
                .map(|field| ListItem::action(&format!("Enter {field}"), MenuAction::EditSetting(*field)))
                .collect();
            items.push(ListItem::action("Lambda", MenuAction::OpenSubMenu(SubMenuKind::Lambda)));
            items.push(ListItem::action("Glue", MenuAction::OpenSubMenu(SubMenuKind::Glue)));
            items.push(ListItem::action("Help", MenuAction::Help));
            items.push(ListItem::action("Save Settings", MenuAction::SaveSettings));
            items
        }
    }
}

fn top_row(state: MenuState) -> u16 {
    match state {
        MenuState::MainMenu => MAIN_MENU_TOP_ROW,
        _ => LIST_TOP_ROW,
    }
}

fn viewport_for(state: MenuState, width: u16, height: u16) -> ViewportState {
    ViewportState {
        offset: 0,
        // One line below the list is reserved for the filter
        height: height.saturating_sub(top_row(state) + 1).max(1),
        width,
    }
}

fn is_quit_key(key_event: &KeyEvent) -> bool {
    matches!(key_event.code, KeyCode::Char('c')) && key_event.modifiers.contains(KeyModifiers::CONTROL)
}

impl Menu {
    pub fn new(width: u16, height: u16) -> Self {
        let state = MenuState::MainMenu;
        Self {
            state,
            previous: state,
            menu: SelectableList::new(menu_items(state), false, viewport_for(state, width, height)),
            menu_owner: state,
            functions: None,
            text_input: None,
            result: None,
            spinner: Spinner::default(),
            width,
            height,
        }
    }

    pub fn state(&self) -> MenuState {
        self.state
    }

    pub fn previous(&self) -> MenuState {
        self.previous
    }

    /// The list shown in the current state, if any.
    pub fn list(&self) -> Option<&SelectableList> {
        match self.state {
            MenuState::MainMenu | MenuState::SubMenu(_) => Some(&self.menu),
            MenuState::List(_) => self.functions.as_ref(),
            _ => None,
        }
    }

    fn list_mut(&mut self) -> Option<&mut SelectableList> {
        match self.state {
            MenuState::MainMenu | MenuState::SubMenu(_) => Some(&mut self.menu),
            MenuState::List(_) => self.functions.as_mut(),
            _ => None,
        }
    }

    pub fn text_input(&self) -> Option<&TextInput> {
        self.text_input.as_ref()
    }

    pub fn result(&self) -> Option<&ResultView> {
        self.result.as_ref()
    }

    pub fn spinner(&self) -> &Spinner {
        &self.spinner
    }

    pub fn size(&self) -> (u16, u16) {
        (self.width, self.height)
    }

    pub fn is_spinning(&self) -> bool {
        matches!(self.state, MenuState::SpinnerRunning(_))
    }

    /// Advances the spinner animation while a job is running.
    pub fn tick(&mut self) {
        if self.is_spinning() {
            self.spinner.tick();
        }
    }

    pub fn resize(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;

        let menu_height = viewport_for(self.menu_owner, width, height).height;
        self.menu.resize(width, menu_height);

        if let Some(functions) = self.functions.as_mut() {
            let list_height = height.saturating_sub(LIST_TOP_ROW + 1).max(1);
            functions.resize(width, list_height);
        }
    }

    pub fn handle_key(&mut self, key_event: KeyEvent, ctx: &mut AppContext) -> Effect {
        if let MenuState::SpinnerRunning(kind) = self.state {
            // Only a listing may be abandoned
            if matches!(kind, JobKind::LoadFunctions(_)) && is_quit_key(&key_event) {
                return Effect::Quit;
            }
            // Jobs cannot be cancelled, keys only move the animation along
            self.spinner.tick();
            return Effect::None;
        }

        if is_quit_key(&key_event) {
            return Effect::Quit;
        }

        match self.state {
            MenuState::MainMenu | MenuState::SubMenu(_) => self.handle_menu_key(key_event, ctx),
            MenuState::TextInput(_) => self.handle_text_input_key(key_event, ctx),
            MenuState::Help => {
                if matches!(key_event.code, KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q')) {
                    self.go_to(self.previous);
                }
                Effect::None
            }
            MenuState::List(purpose) => self.handle_list_key(key_event, purpose, ctx),
            MenuState::ResultDisplay => self.handle_result_key(key_event, ctx),
            MenuState::SpinnerRunning(_) => Effect::None,
        }
    }

    /// Routes the report of a finished background job.
    pub fn job_event(&mut self, event: JobEvent) {
        match event {
            JobEvent::Finished(outcome) => self.job_finished(outcome),
            JobEvent::FunctionsListed(functions) => {
                let MenuState::SpinnerRunning(JobKind::LoadFunctions(purpose)) = self.state else {
                    warn!("Ignoring a function listing outside of the loading spinner");
                    return;
                };
                self.functions_loaded(purpose, functions);
            }
        }
    }

    /// Called with the outcome of listing functions for `purpose`.
    fn functions_loaded(&mut self, purpose: ListPurpose, functions: Result<Vec<FunctionSummary>>) {
        let submenu = MenuState::SubMenu(SubMenuKind::Lambda);
        match functions {
            Ok(functions) => {
                debug!("Showing {} functions for {purpose:?}", functions.len());
                let items = functions
                    .into_iter()
                    .map(|function| ListItem::Resource {
                        name: function.name,
                        detail: function.runtime,
                        selected: false,
                    })
                    .collect();
                let state = MenuState::List(purpose);
                self.functions = Some(SelectableList::new(
                    items,
                    purpose.is_selectable(),
                    viewport_for(state, self.width, self.height),
                ));
                self.result = None;
                self.previous = submenu;
                self.go_to(state);
            }
            Err(e) => {
                warn!("Listing functions failed: {e}");
                self.functions = None;
                self.show_result(e.to_string(), true, ResultContext::Informational, submenu);
            }
        }
    }

    /// Called with the single outcome of the job the spinner is waiting on.
    pub fn job_finished(&mut self, outcome: JobOutcome) {
        let MenuState::SpinnerRunning(kind) = self.state else {
            warn!("Ignoring a job outcome outside of the spinner: {}", outcome.message);
            return;
        };

        info!("{} finished, error: {}", kind.status_message(), outcome.is_error);
        let (context, return_to) = match kind {
            JobKind::SaveSettings => (ResultContext::Informational, MenuState::MainMenu),
            JobKind::LoadFunctions(_) => (
                ResultContext::Informational,
                MenuState::SubMenu(SubMenuKind::Lambda),
            ),
            JobKind::Batch(purpose) => (
                ResultContext::BatchFinished { purpose },
                MenuState::SubMenu(SubMenuKind::Lambda),
            ),
        };
        self.show_result(outcome.message, outcome.is_error, context, return_to);
    }

    fn go_to(&mut self, state: MenuState) {
        if matches!(state, MenuState::MainMenu | MenuState::SubMenu(_)) && state != self.menu_owner {
            self.menu = SelectableList::new(
                menu_items(state),
                false,
                viewport_for(state, self.width, self.height),
            );
            self.menu_owner = state;
        }
        if !matches!(state, MenuState::TextInput(_)) {
            self.text_input = None;
        }
        self.state = state;
    }

    fn show_result(&mut self, message: String, is_error: bool, context: ResultContext, return_to: MenuState) {
        self.result = Some(ResultView {
            message,
            is_error,
            context,
        });
        self.previous = return_to;
        self.go_to(MenuState::ResultDisplay);
    }

    fn load_functions(&mut self, purpose: ListPurpose, ctx: &AppContext) -> Effect {
        self.start_job(
            JobKind::LoadFunctions(purpose),
            JobRequest::ListFunctions {
                settings: ctx.settings.clone(),
            },
        )
    }

    fn start_job(&mut self, kind: JobKind, request: JobRequest) -> Effect {
        self.spinner.reset();
        self.result = None;
        self.go_to(MenuState::SpinnerRunning(kind));
        Effect::StartJob(request)
    }

    /// Filter editing shared by every list. Returns `true` when the key was consumed.
    fn handle_filter_key(&mut self, key_event: &KeyEvent) -> bool {
        let Some(list) = self.list_mut() else {
            return false;
        };

        if !list.ui_state.is_filtering {
            if key_event.code == KeyCode::Char('/') {
                list.begin_filter();
                return true;
            }
            return false;
        }

        match key_event.code {
            KeyCode::Esc => list.end_filter(),
            KeyCode::Backspace => {
                list.pop_filter();
            }
            KeyCode::Char(' ') if list.is_multi_select() => return false,
            KeyCode::Char(c) => list.push_filter(c),
            _ => return false,
        }
        true
    }

    fn handle_cursor_key(&mut self, key_event: &KeyEvent) -> bool {
        let direction = match key_event.code {
            KeyCode::Up => Up,
            KeyCode::Down => Down,
            _ => return false,
        };
        if let Some(list) = self.list_mut() {
            list.move_cursor(direction);
        }
        true
    }

    fn handle_menu_key(&mut self, key_event: KeyEvent, ctx: &mut AppContext) -> Effect {
        if self.handle_filter_key(&key_event) || self.handle_cursor_key(&key_event) {
            return Effect::None;
        }

        match key_event.code {
            KeyCode::Enter => {
                let Some(ListItem::Action { action, .. }) = self.menu.current().cloned() else {
                    return Effect::None;
                };
                if self.menu.ui_state.is_filtering {
                    self.menu.end_filter();
                }
                self.activate(action, ctx)
            }
            KeyCode::Esc | KeyCode::Char('q') => match self.state {
                MenuState::MainMenu => Effect::Quit,
                _ => {
                    self.go_to(MenuState::MainMenu);
                    Effect::None
                }
            },
            _ => Effect::None,
        }
    }

    fn activate(&mut self, action: MenuAction, ctx: &mut AppContext) -> Effect {
        let here = self.state;
        match action {
            MenuAction::EditSetting(field) => {
                self.previous = here;
                self.text_input = Some(TextInput::new(field, ctx.settings.get(field)));
                self.state = MenuState::TextInput(field);
                Effect::None
            }
            MenuAction::OpenSubMenu(kind) => {
                self.previous = MenuState::MainMenu;
                self.go_to(MenuState::SubMenu(kind));
                Effect::None
            }
            MenuAction::OpenList(purpose) => {
                let needs_naming_rule = purpose.batch_kind().is_some_and(|kind| kind.needs_naming_rule());
                if needs_naming_rule {
                    let rule = validate_naming_rule(&ctx.settings.append_text, &ctx.settings.replace_text);
                    if let Err(e) = rule {
                        self.show_result(e.to_string(), true, ResultContext::Informational, here);
                        return Effect::None;
                    }
                }
                self.load_functions(purpose, ctx)
            }
            MenuAction::Help => {
                self.previous = here;
                self.go_to(MenuState::Help);
                Effect::None
            }
            MenuAction::SaveSettings => self.start_job(
                JobKind::SaveSettings,
                JobRequest::SaveSettings {
                    path: ctx.settings_path.clone(),
                    settings: ctx.settings.clone(),
                },
            ),
            MenuAction::Unsupported(message) => {
                self.show_result(message.to_string(), false, ResultContext::Informational, here);
                Effect::None
            }
        }
    }

    fn handle_text_input_key(&mut self, key_event: KeyEvent, ctx: &mut AppContext) -> Effect {
        let Some(input) = self.text_input.as_mut() else {
            self.go_to(self.previous);
            return Effect::None;
        };

        match input.handle_key(key_event) {
            TextInputEvent::Editing => {}
            TextInputEvent::Cancel => self.go_to(self.previous),
            TextInputEvent::Commit(value) => {
                let field = input.field;
                let message = format!("Saved {field}: {}", display_value(field, &value));
                ctx.settings.set(field, value);
                debug!("{field} updated");
                self.show_result(message, false, ResultContext::Informational, self.previous);
            }
        }
        Effect::None
    }

    fn handle_list_key(&mut self, key_event: KeyEvent, purpose: ListPurpose, ctx: &AppContext) -> Effect {
        if self.handle_filter_key(&key_event) || self.handle_cursor_key(&key_event) {
            return Effect::None;
        }

        let Some(functions) = self.functions.as_mut() else {
            self.go_to(self.previous);
            return Effect::None;
        };

        match key_event.code {
            KeyCode::Char(' ') => {
                functions.toggle_current();
                Effect::None
            }
            KeyCode::Enter => {
                let Some(kind) = purpose.batch_kind() else {
                    return Effect::None;
                };
                let names = functions.selected_names();
                if names.is_empty() {
                    return Effect::None;
                }
                let message = confirmation_message(kind, &names, ctx);
                self.show_result(
                    message,
                    false,
                    ResultContext::ConfirmSelection { purpose, names },
                    MenuState::List(purpose),
                );
                Effect::None
            }
            KeyCode::Esc | KeyCode::Char('q') => {
                self.functions = None;
                self.go_to(MenuState::SubMenu(SubMenuKind::Lambda));
                Effect::None
            }
            _ => Effect::None,
        }
    }

    fn handle_result_key(&mut self, key_event: KeyEvent, ctx: &AppContext) -> Effect {
        let Some(context) = self.result.as_ref().map(|r| r.context.clone()) else {
            self.go_to(self.previous);
            return Effect::None;
        };

        let dismissed = matches!(key_event.code, KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q'));

        match context {
            ResultContext::ConfirmSelection { purpose, names } => match key_event.code {
                KeyCode::Enter => {
                    let Some(kind) = purpose.batch_kind() else {
                        return Effect::None;
                    };
                    let plan = BatchPlan::new(kind, names, &ctx.settings, &ctx.target_runtime);
                    self.previous = MenuState::List(purpose);
                    self.start_job(
                        JobKind::Batch(purpose),
                        JobRequest::Batch {
                            plan,
                            report_mode: ctx.report_mode,
                            settings: ctx.settings.clone(),
                        },
                    )
                }
                KeyCode::Esc | KeyCode::Char('q') => {
                    // Back to the same list, selections intact
                    self.result = None;
                    self.go_to(MenuState::List(purpose));
                    Effect::None
                }
                _ => Effect::None,
            },
            ResultContext::BatchFinished { purpose } if dismissed => {
                // Rebuilt from a fresh listing, so every flag starts cleared
                self.functions = None;
                self.load_functions(purpose, ctx)
            }
            ResultContext::Informational if dismissed => {
                self.result = None;
                self.go_to(self.previous);
                Effect::None
            }
            _ => Effect::None,
        }
    }
}

fn confirmation_message(kind: BatchKind, names: &[String], ctx: &AppContext) -> String {
    let plan = BatchPlan::new(kind, Vec::new(), &ctx.settings, &ctx.target_runtime);
    let verb = match kind {
        BatchKind::Clone => "Clone",
        BatchKind::Upgrade => "Upgrade",
        BatchKind::CloneAndUpgrade => "Clone and upgrade",
    };

    let lines = names
        .iter()
        .map(|name| match kind {
            BatchKind::Clone => format!("{name} -> {}", plan.destination_name(name)),
            BatchKind::Upgrade => format!("{name} -> {}", plan.target_runtime),
            BatchKind::CloneAndUpgrade => format!(
                "{name} -> {} ({})",
                plan.destination_name(name),
                plan.target_runtime
            ),
        })
        .join("\n");

    format!("{verb} {} function(s)?\n\n{lines}", names.len())
}

#[cfg(test)]
mod tests {
    use aws_control_core::error::Error;

    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn context(append_text: &str) -> AppContext {
        context_with_rule(append_text, "")
    }

    fn context_with_rule(append_text: &str, replace_text: &str) -> AppContext {
        AppContext {
            settings: Settings {
                append_text: append_text.to_string(),
                replace_text: replace_text.to_string(),
                ..Default::default()
            },
            settings_path: "/tmp/aws-control/settings.yml".to_string(),
            target_runtime: "python3.13".to_string(),
            report_mode: ReportMode::AllFailures,
        }
    }

    fn summaries(names: &[&str]) -> Vec<FunctionSummary> {
        names
            .iter()
            .map(|name| FunctionSummary {
                name: name.to_string(),
                runtime: Some("python3.9".to_string()),
            })
            .collect()
    }

    /// Moves the cursor onto the entry labelled `label` and presses enter.
    fn choose(menu: &mut Menu, ctx: &mut AppContext, label: &str) -> Effect {
        let list = menu.list().unwrap();
        let count = list.items().len();
        let position = list
            .items()
            .iter()
            .position(|item| item.to_string() == label)
            .unwrap();
        let steps = (position + count - list.ui_state.selected_index) % count;
        for _ in 0..steps {
            menu.handle_key(key(KeyCode::Down), ctx);
        }
        menu.handle_key(key(KeyCode::Enter), ctx)
    }

    fn open_lambda(menu: &mut Menu, ctx: &mut AppContext) {
        choose(menu, ctx, "Lambda");
        assert_eq!(menu.state(), MenuState::SubMenu(SubMenuKind::Lambda));
    }

    fn listing(ctx: &AppContext) -> Effect {
        Effect::StartJob(JobRequest::ListFunctions {
            settings: ctx.settings.clone(),
        })
    }

    /// The purpose of the listing the spinner is waiting on.
    fn loading(menu: &Menu) -> ListPurpose {
        let MenuState::SpinnerRunning(JobKind::LoadFunctions(purpose)) = menu.state() else {
            panic!("Expected functions to be loading, state is {:?}", menu.state());
        };
        purpose
    }

    fn open_list(menu: &mut Menu, ctx: &mut AppContext, label: &str, names: &[&str]) -> ListPurpose {
        open_lambda(menu, ctx);
        assert_eq!(choose(menu, ctx, label), listing(ctx));
        let purpose = loading(menu);
        menu.job_event(JobEvent::FunctionsListed(Ok(summaries(names))));
        purpose
    }

    #[test]
    fn test_clone_select_refused_without_append_text() {
        let mut menu = Menu::new(80, 40);
        let mut ctx = context("");
        open_lambda(&mut menu, &mut ctx);

        let effect = choose(&mut menu, &mut ctx, "Clone Lambda Functions");

        assert_eq!(effect, Effect::None);
        assert_eq!(menu.state(), MenuState::ResultDisplay);
        let result = menu.result().unwrap();
        assert!(result.is_error);
        assert!(result.message.starts_with("New Text must be set"));

        menu.handle_key(key(KeyCode::Esc), &mut ctx);
        assert_eq!(menu.state(), MenuState::SubMenu(SubMenuKind::Lambda));
    }

    #[test]
    fn test_upgrade_select_does_not_need_append_text() {
        let mut menu = Menu::new(80, 40);
        let mut ctx = context("");
        open_lambda(&mut menu, &mut ctx);

        let effect = choose(&mut menu, &mut ctx, "Upgrade Lambda Functions");

        assert_eq!(effect, listing(&ctx));
        assert_eq!(loading(&menu), ListPurpose::Upgrade);
    }

    #[test]
    fn test_clone_select_refused_when_rule_keeps_names() {
        let mut menu = Menu::new(80, 40);
        let mut ctx = context_with_rule("-v2", "-v2");
        open_lambda(&mut menu, &mut ctx);

        let effect = choose(&mut menu, &mut ctx, "Clone + Upgrade Lambda Functions");

        assert_eq!(effect, Effect::None);
        let result = menu.result().unwrap();
        assert!(result.is_error);
        assert!(result.message.contains("New Text and Replace Text"));
    }

    #[test]
    fn test_loading_keeps_input_responsive_and_can_quit() {
        let mut menu = Menu::new(80, 40);
        let mut ctx = context("");
        open_lambda(&mut menu, &mut ctx);
        choose(&mut menu, &mut ctx, "List Lambda Functions");
        assert_eq!(loading(&menu), ListPurpose::Browse);

        let frame = menu.spinner().frame();
        assert_eq!(menu.handle_key(key(KeyCode::Esc), &mut ctx), Effect::None);
        assert_ne!(menu.spinner().frame(), frame);
        assert_eq!(
            menu.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL), &mut ctx),
            Effect::Quit
        );
    }

    #[test]
    fn test_enter_without_selection_is_a_no_op() {
        let mut menu = Menu::new(80, 40);
        let mut ctx = context("-p313");
        let purpose = open_list(&mut menu, &mut ctx, "Clone Lambda Functions", &["a", "b"]);

        let effect = menu.handle_key(key(KeyCode::Enter), &mut ctx);

        assert_eq!(effect, Effect::None);
        assert_eq!(menu.state(), MenuState::List(purpose));
    }

    #[test]
    fn test_confirm_then_escape_returns_to_list_with_selection() {
        let mut menu = Menu::new(80, 40);
        let mut ctx = context("-p313");
        let purpose = open_list(&mut menu, &mut ctx, "Clone Lambda Functions", &["billing-handler", "orders"]);

        menu.handle_key(key(KeyCode::Char(' ')), &mut ctx);
        menu.handle_key(key(KeyCode::Enter), &mut ctx);

        assert_eq!(menu.state(), MenuState::ResultDisplay);
        let result = menu.result().unwrap();
        assert!(result.message.contains("billing-handler -> billing-handler-p313"));
        assert!(!result.message.contains("orders"));

        menu.handle_key(key(KeyCode::Esc), &mut ctx);
        assert_eq!(menu.state(), MenuState::List(purpose));
        assert_eq!(menu.list().unwrap().selected_names(), vec!["billing-handler".to_string()]);
    }

    #[test]
    fn test_confirm_starts_batch_job() {
        let mut menu = Menu::new(80, 40);
        let mut ctx = context("");
        open_list(&mut menu, &mut ctx, "Upgrade Lambda Functions", &["a", "b"]);

        menu.handle_key(key(KeyCode::Char(' ')), &mut ctx);
        menu.handle_key(key(KeyCode::Down), &mut ctx);
        menu.handle_key(key(KeyCode::Char(' ')), &mut ctx);
        menu.handle_key(key(KeyCode::Enter), &mut ctx);
        assert!(menu.result().unwrap().message.contains("a -> python3.13"));

        let effect = menu.handle_key(key(KeyCode::Enter), &mut ctx);

        let Effect::StartJob(JobRequest::Batch { plan, report_mode, .. }) = effect else {
            panic!("Expected a batch job");
        };
        assert_eq!(plan.kind, BatchKind::Upgrade);
        assert_eq!(plan.names, vec!["a".to_string(), "b".to_string()]);
        assert_eq!(plan.target_runtime, "python3.13");
        assert_eq!(report_mode, ReportMode::AllFailures);
        assert_eq!(menu.state(), MenuState::SpinnerRunning(JobKind::Batch(ListPurpose::Upgrade)));
    }

    #[test]
    fn test_spinner_ignores_keys_until_job_finishes() {
        let mut menu = Menu::new(80, 40);
        let mut ctx = context("");
        open_list(&mut menu, &mut ctx, "Upgrade Lambda Functions", &["a"]);
        menu.handle_key(key(KeyCode::Char(' ')), &mut ctx);
        menu.handle_key(key(KeyCode::Enter), &mut ctx);
        menu.handle_key(key(KeyCode::Enter), &mut ctx);

        let frame = menu.spinner().frame();
        assert_eq!(menu.handle_key(key(KeyCode::Esc), &mut ctx), Effect::None);
        assert_eq!(
            menu.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL), &mut ctx),
            Effect::None
        );
        assert!(menu.is_spinning());
        assert_ne!(menu.spinner().frame(), frame);

        menu.job_finished(JobOutcome {
            message: BatchKind::Upgrade.success_message().to_string(),
            is_error: false,
        });

        assert_eq!(menu.state(), MenuState::ResultDisplay);
        assert_eq!(
            menu.result().unwrap().context,
            ResultContext::BatchFinished {
                purpose: ListPurpose::Upgrade
            }
        );
    }

    #[test]
    fn test_dismissing_batch_result_reloads_list_with_flags_cleared() {
        let mut menu = Menu::new(80, 40);
        let mut ctx = context("-p313");
        let purpose = open_list(&mut menu, &mut ctx, "Clone Lambda Functions", &["a", "b"]);
        menu.handle_key(key(KeyCode::Char(' ')), &mut ctx);
        menu.handle_key(key(KeyCode::Enter), &mut ctx);
        menu.handle_key(key(KeyCode::Enter), &mut ctx);
        menu.job_finished(JobOutcome {
            message: "1 of 1 function(s) failed".to_string(),
            is_error: true,
        });

        let effect = menu.handle_key(key(KeyCode::Esc), &mut ctx);
        assert_eq!(effect, listing(&ctx));
        assert_eq!(loading(&menu), purpose);

        menu.job_event(JobEvent::FunctionsListed(Ok(summaries(&["a", "a-p313", "b"]))));
        assert_eq!(menu.state(), MenuState::List(purpose));
        assert!(menu.list().unwrap().selected_names().is_empty());
    }

    #[test]
    fn test_leaving_and_reentering_list_clears_selection() {
        let mut menu = Menu::new(80, 40);
        let mut ctx = context("");
        let purpose = open_list(&mut menu, &mut ctx, "Upgrade Lambda Functions", &["a", "b"]);
        menu.handle_key(key(KeyCode::Char(' ')), &mut ctx);

        menu.handle_key(key(KeyCode::Esc), &mut ctx);
        assert_eq!(menu.state(), MenuState::SubMenu(SubMenuKind::Lambda));

        assert_eq!(choose(&mut menu, &mut ctx, "Upgrade Lambda Functions"), listing(&ctx));
        assert_eq!(loading(&menu), purpose);
        menu.job_event(JobEvent::FunctionsListed(Ok(summaries(&["a", "b"]))));
        assert!(menu.list().unwrap().selected_names().is_empty());
    }

    #[test]
    fn test_browse_list_cannot_select() {
        let mut menu = Menu::new(80, 40);
        let mut ctx = context("");
        open_list(&mut menu, &mut ctx, "List Lambda Functions", &["a"]);

        menu.handle_key(key(KeyCode::Char(' ')), &mut ctx);
        assert_eq!(menu.handle_key(key(KeyCode::Enter), &mut ctx), Effect::None);
        assert_eq!(menu.state(), MenuState::List(ListPurpose::Browse));
        assert!(menu.list().unwrap().selected_names().is_empty());
    }

    #[test]
    fn test_filter_in_list_keeps_items() {
        let mut menu = Menu::new(80, 40);
        let mut ctx = context("");
        open_list(&mut menu, &mut ctx, "Upgrade Lambda Functions", &["alpha", "beta"]);

        menu.handle_key(key(KeyCode::Char('/')), &mut ctx);
        menu.handle_key(key(KeyCode::Char('b')), &mut ctx);
        assert_eq!(menu.list().unwrap().visible_indexes(), vec![1]);

        // Escape leaves filter mode before it leaves the list
        menu.handle_key(key(KeyCode::Esc), &mut ctx);
        assert_eq!(menu.state(), MenuState::List(ListPurpose::Upgrade));
        assert_eq!(menu.list().unwrap().items().len(), 2);
    }

    #[test]
    fn test_listing_failure_shows_error_and_returns_to_submenu() {
        let mut menu = Menu::new(80, 40);
        let mut ctx = context("");
        open_lambda(&mut menu, &mut ctx);
        choose(&mut menu, &mut ctx, "List Lambda Functions");

        menu.job_event(JobEvent::FunctionsListed(Err(Error::Connection(
            "no region is set".to_string(),
        ))));
        assert_eq!(menu.state(), MenuState::ResultDisplay);
        assert!(menu.result().unwrap().is_error);

        menu.handle_key(key(KeyCode::Enter), &mut ctx);
        assert_eq!(menu.state(), MenuState::SubMenu(SubMenuKind::Lambda));
    }

    #[test]
    fn test_text_input_commit_updates_settings() {
        let mut menu = Menu::new(80, 40);
        let mut ctx = context("");
        choose(&mut menu, &mut ctx, "Enter Region");
        assert_eq!(menu.state(), MenuState::TextInput(SettingField::Region));

        for c in "eu-west-1".chars() {
            menu.handle_key(key(KeyCode::Char(c)), &mut ctx);
        }
        menu.handle_key(key(KeyCode::Enter), &mut ctx);

        assert_eq!(ctx.settings.region, "eu-west-1");
        assert_eq!(menu.result().unwrap().message, "Saved Region: eu-west-1");

        menu.handle_key(key(KeyCode::Esc), &mut ctx);
        assert_eq!(menu.state(), MenuState::MainMenu);
    }

    #[test]
    fn test_text_input_escape_discards() {
        let mut menu = Menu::new(80, 40);
        let mut ctx = context("-p313");
        choose(&mut menu, &mut ctx, "Enter New Text");

        menu.handle_key(key(KeyCode::Char('x')), &mut ctx);
        menu.handle_key(key(KeyCode::Esc), &mut ctx);

        assert_eq!(menu.state(), MenuState::MainMenu);
        assert_eq!(ctx.settings.append_text, "-p313");
        assert!(menu.text_input().is_none());
    }

    #[test]
    fn test_secret_is_masked_in_confirmation() {
        let mut menu = Menu::new(80, 40);
        let mut ctx = context("");
        choose(&mut menu, &mut ctx, "Enter AWS Secret");
        for c in "supersecret".chars() {
            menu.handle_key(key(KeyCode::Char(c)), &mut ctx);
        }
        menu.handle_key(key(KeyCode::Enter), &mut ctx);

        assert_eq!(ctx.settings.credential_secret, "supersecret");
        assert_eq!(menu.result().unwrap().message, "Saved AWS Secret: ****cret");
    }

    #[test]
    fn test_save_settings_starts_job_and_returns_to_main_menu() {
        let mut menu = Menu::new(80, 40);
        let mut ctx = context("-p313");

        let effect = choose(&mut menu, &mut ctx, "Save Settings");
        assert_eq!(
            effect,
            Effect::StartJob(JobRequest::SaveSettings {
                path: ctx.settings_path.clone(),
                settings: ctx.settings.clone(),
            })
        );
        assert_eq!(menu.state(), MenuState::SpinnerRunning(JobKind::SaveSettings));

        menu.job_finished(JobOutcome {
            message: "Settings saved".to_string(),
            is_error: false,
        });
        menu.handle_key(key(KeyCode::Enter), &mut ctx);
        assert_eq!(menu.state(), MenuState::MainMenu);
    }

    #[test]
    fn test_glue_actions_are_informational() {
        let mut menu = Menu::new(80, 40);
        let mut ctx = context("");
        choose(&mut menu, &mut ctx, "Glue");

        assert_eq!(choose(&mut menu, &mut ctx, "List Glue Jobs"), Effect::None);
        let result = menu.result().unwrap();
        assert!(!result.is_error);
        assert_eq!(result.message, "Glue jobs are not supported yet.");

        menu.handle_key(key(KeyCode::Esc), &mut ctx);
        assert_eq!(menu.state(), MenuState::SubMenu(SubMenuKind::Glue));
        menu.handle_key(key(KeyCode::Esc), &mut ctx);
        assert_eq!(menu.state(), MenuState::MainMenu);
    }

    #[test]
    fn test_quit_keys() {
        let mut menu = Menu::new(80, 40);
        let mut ctx = context("");
        assert_eq!(menu.handle_key(key(KeyCode::Char('q')), &mut ctx), Effect::Quit);

        open_lambda(&mut menu, &mut ctx);
        assert_eq!(
            menu.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL), &mut ctx),
            Effect::Quit
        );
        assert_eq!(menu.handle_key(key(KeyCode::Esc), &mut ctx), Effect::None);
        assert_eq!(menu.state(), MenuState::MainMenu);
    }

    #[test]
    fn test_help_returns_to_main_menu() {
        let mut menu = Menu::new(80, 40);
        let mut ctx = context("");
        choose(&mut menu, &mut ctx, "Help");
        assert_eq!(menu.state(), MenuState::Help);

        menu.handle_key(key(KeyCode::Esc), &mut ctx);
        assert_eq!(menu.state(), MenuState::MainMenu);
    }

    #[test]
    fn test_mask_secret() {
        assert_eq!(mask_secret(""), "");
        assert_eq!(mask_secret("abc"), "****abc");
        assert_eq!(mask_secret("abcdefgh"), "****efgh");
    }
}
