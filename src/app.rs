use crossterm::event::{KeyCode, KeyEvent};
use std::sync::mpsc::{self, Receiver};
use std::time::{Duration, Instant};

use crate::config::AppConfig;
use crate::record::{Record, Row};
use crate::theme::Theme;
use crate::ui::components::data_table::SortDirection;
use crate::ui::components::{DataTable, InputField, InputType};

/// How long a status message stays in the footer
const STATUS_TIMEOUT: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Filter,
    Table,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Popup {
    None,
    Help,
}

/// Demo switches that come from the command line rather than the config file
#[derive(Debug, Clone, Copy)]
pub struct DemoOptions {
    pub password: bool,
    pub loading: bool,
    pub selectable: bool,
}

impl Default for DemoOptions {
    fn default() -> Self {
        Self {
            password: false,
            loading: false,
            selectable: true,
        }
    }
}

pub struct App {
    pub focus: Focus,
    pub popup: Popup,
    pub theme: Theme,

    // Authoritative data and the filtered view handed to the table
    pub records: Vec<Row>,
    pub visible: Vec<Row>,
    pub filter: String,
    pub filter_field: String,

    pub input: InputField,
    pub table: DataTable<Row>,
    pub loading: bool,

    // Last selection reported by the table
    pub selected: Vec<Row>,

    // Status message (shown in footer, auto-clears after timeout)
    pub status_message: Option<String>,
    pub status_message_time: Option<Instant>,

    filter_changes: Receiver<String>,
    selection_changes: Receiver<Vec<Row>>,
}

impl App {
    pub fn new(config: &AppConfig, records: Vec<Row>, options: DemoOptions) -> Self {
        let theme = Theme::for_mode(config.theme).with_accent(config.accent.as_deref());

        let (filter_tx, filter_changes) = mpsc::channel();
        let (selection_tx, selection_changes) = mpsc::channel();

        let input_type = if options.password {
            InputType::Password
        } else {
            InputType::Text
        };
        let input = InputField::new()
            .label("Full Name")
            .placeholder("Enter your name")
            .helper_text("Please enter your legal name.")
            .error_message("Name cannot be empty")
            .show_clear_button(true)
            .show_password_toggle(options.password)
            .input_type(input_type)
            .variant(config.variant)
            .size(config.size)
            .loading(options.loading)
            .theme(theme.clone())
            .on_change(move |value| {
                if let Err(e) = filter_tx.send(value) {
                    tracing::debug!("Dropped filter change: {}", e);
                }
            });

        let table = DataTable::new(config.columns.clone())
            .selectable(options.selectable)
            .loading(options.loading)
            .row_key(config.row_key.clone())
            .on_row_select(move |rows: &[Row]| {
                if let Err(e) = selection_tx.send(rows.to_vec()) {
                    tracing::debug!("Dropped selection change: {}", e);
                }
            });

        let mut app = Self {
            focus: Focus::Filter,
            popup: Popup::None,
            theme,

            visible: records.clone(),
            records,
            filter: String::new(),
            filter_field: config.filter_field.clone(),

            input,
            table,
            loading: options.loading,

            selected: Vec::new(),

            status_message: None,
            status_message_time: None,

            filter_changes,
            selection_changes,
        };
        app.refilter();
        app
    }

    /// Set a status message (auto-clears after 3 seconds)
    fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = Some(msg.into());
        self.status_message_time = Some(Instant::now());
    }

    /// Records whose filter field contains the filter text, ignoring case
    fn matches_filter(&self, row: &Row) -> bool {
        let needle = self.filter.to_lowercase();
        row.display(&self.filter_field).to_lowercase().contains(&needle)
    }

    fn refilter(&mut self) {
        self.visible = self
            .records
            .iter()
            .filter(|row| self.matches_filter(row))
            .cloned()
            .collect();
        self.table.clamp_cursor(self.visible.len());
        self.input.set_invalid(self.filter.trim().is_empty());
    }

    /// Apply changes reported by the widget callbacks
    pub fn pump_events(&mut self) {
        let mut filter_changed = false;
        while let Ok(value) = self.filter_changes.try_recv() {
            self.filter = value;
            filter_changed = true;
        }
        if filter_changed {
            tracing::debug!("Filter changed to {:?}", self.filter);
            self.refilter();
        }

        while let Ok(rows) = self.selection_changes.try_recv() {
            self.selected = rows;
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if self.popup == Popup::Help {
            if matches!(
                key.code,
                KeyCode::Esc | KeyCode::Char('?') | KeyCode::Enter | KeyCode::Char('q')
            ) {
                self.popup = Popup::None;
            }
            return;
        }

        match key.code {
            KeyCode::Tab | KeyCode::BackTab => {
                self.focus = match self.focus {
                    Focus::Filter => Focus::Table,
                    Focus::Table => Focus::Filter,
                };
            }
            _ => match self.focus {
                Focus::Filter => self.handle_filter_key(key),
                Focus::Table => self.handle_table_key(key),
            },
        }

        self.pump_events();
    }

    fn handle_filter_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc | KeyCode::Enter => self.focus = Focus::Table,
            _ => {
                self.input.handle_key(key, &self.filter);
            }
        }
    }

    fn handle_table_key(&mut self, key: KeyEvent) {
        let len = self.visible.len();
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => self.table.cursor_down(len),
            KeyCode::Char('k') | KeyCode::Up => self.table.cursor_up(len),
            KeyCode::Char('h') | KeyCode::Left => self.table.focus_previous_column(),
            KeyCode::Char('l') | KeyCode::Right => self.table.focus_next_column(),

            KeyCode::Char('s') | KeyCode::Enter => self.sort_focused_column(),
            KeyCode::Char(' ') => self.table.toggle_cursor_row(&self.visible),

            KeyCode::Char('L') => self.toggle_loading(),
            KeyCode::Char('/') => self.focus = Focus::Filter,
            KeyCode::Char('?') => self.popup = Popup::Help,
            _ => {}
        }
    }

    fn sort_focused_column(&mut self) {
        let (title, sortable) = match self.table.columns().get(self.table.focused_column()) {
            Some(column) => (column.title.clone(), column.sortable),
            None => return,
        };
        if !sortable {
            self.set_status(format!("{} is not sortable", title));
            return;
        }

        self.table.toggle_focused_sort();
        if let Some(sort) = self.table.sort() {
            let direction = match sort.direction {
                SortDirection::Ascending => "ascending",
                SortDirection::Descending => "descending",
            };
            self.set_status(format!("Sorted by {} {}", title, direction));
        }
    }

    fn toggle_loading(&mut self) {
        self.loading = !self.loading;
        self.input.set_loading(self.loading);
        self.table.set_loading(self.loading);
        self.set_status(if self.loading { "Loading on" } else { "Loading off" });
    }

    /// Periodic work: spinner animation and status expiry
    pub fn tick(&mut self) {
        self.input.tick();

        if let Some(shown_at) = self.status_message_time {
            if shown_at.elapsed() >= STATUS_TIMEOUT {
                self.status_message = None;
                self.status_message_time = None;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::sample_records;
    use crossterm::event::KeyModifiers;

    fn app() -> App {
        App::new(&AppConfig::default(), sample_records(), DemoOptions::default())
    }

    fn press(app: &mut App, code: KeyCode) {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    fn visible_names(app: &App) -> Vec<String> {
        app.visible.iter().map(|r| r.display("name")).collect()
    }

    #[test]
    fn test_starts_invalid_with_all_rows() {
        let app = app();

        assert_eq!(app.visible.len(), 3);
        assert_eq!(app.input.assistive_text(), Some("Name cannot be empty"));
    }

    #[test]
    fn test_typing_filters_case_insensitively() {
        let mut app = app();
        type_text(&mut app, "BO");

        assert_eq!(app.filter, "BO");
        assert_eq!(visible_names(&app), vec!["Bob Smith"]);
        assert_eq!(app.input.assistive_text(), Some("Please enter your legal name."));
    }

    #[test]
    fn test_clear_restores_all_rows() {
        let mut app = app();
        type_text(&mut app, "carol");
        assert_eq!(app.visible.len(), 1);

        app.handle_key(KeyEvent::new(KeyCode::Char('u'), KeyModifiers::CONTROL));

        assert_eq!(app.filter, "");
        assert_eq!(app.visible.len(), 3);
        assert_eq!(app.input.assistive_text(), Some("Name cannot be empty"));
    }

    #[test]
    fn test_selection_reaches_app() {
        let mut app = app();
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.focus, Focus::Table);

        press(&mut app, KeyCode::Char(' '));
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Char(' '));
        let ids: Vec<String> = app.selected.iter().map(|r| r.display("id")).collect();
        assert_eq!(ids, vec!["1", "2"]);

        press(&mut app, KeyCode::Up);
        press(&mut app, KeyCode::Char(' '));
        let ids: Vec<String> = app.selected.iter().map(|r| r.display("id")).collect();
        assert_eq!(ids, vec!["2"]);
    }

    #[test]
    fn test_selection_survives_filtering() {
        let mut app = app();
        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Char(' '));
        press(&mut app, KeyCode::Char('/'));
        type_text(&mut app, "bob");

        assert_eq!(visible_names(&app), vec!["Bob Smith"]);
        assert_eq!(app.selected.len(), 1);
        assert!(!app.table.is_selected(&app.visible[0]));
    }

    #[test]
    fn test_sort_keys() {
        let mut app = app();
        press(&mut app, KeyCode::Tab);

        press(&mut app, KeyCode::Char('s'));
        press(&mut app, KeyCode::Char('s'));
        let order: Vec<String> = app
            .table
            .effective_order(&app.visible)
            .into_iter()
            .map(|r| r.display("name"))
            .collect();
        assert_eq!(order, vec!["Carol White", "Bob Smith", "Alice Johnson"]);
        assert_eq!(app.status_message.as_deref(), Some("Sorted by Name descending"));
    }

    #[test]
    fn test_loading_blocks_typing_and_selection() {
        let options = DemoOptions {
            loading: true,
            ..DemoOptions::default()
        };
        let mut app = App::new(&AppConfig::default(), sample_records(), options);

        type_text(&mut app, "x");
        assert_eq!(app.filter, "");

        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Char(' '));
        assert!(app.selected.is_empty());

        press(&mut app, KeyCode::Char('L'));
        assert!(!app.loading);
    }

    #[test]
    fn test_help_popup() {
        let mut app = app();
        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Char('?'));
        assert_eq!(app.popup, Popup::Help);

        press(&mut app, KeyCode::Char('s'));
        assert!(app.table.sort().is_none());

        press(&mut app, KeyCode::Esc);
        assert_eq!(app.popup, Popup::None);
    }
}
