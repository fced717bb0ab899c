//! Controlled text input
//!
//! The caller owns the value: it is passed in on every render and key
//! event, and every edit (typing, backspace, the clear affordance) is
//! reported through `on_change` with the new value. The field itself only
//! remembers whether a password is currently shown or masked, plus the
//! spinner phase.

use clap::ValueEnum;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Padding, Paragraph},
    Frame,
};
use serde::{Deserialize, Serialize};
use throbber_widgets_tui::{Throbber, ThrobberState};

use crate::theme::Theme;

const CLEAR_GLYPH: &str = "×";
const MASK_CHAR: char = '•';

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    Filled,
    #[default]
    Outlined,
    Ghost,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Size {
    Sm,
    #[default]
    Md,
    Lg,
}

impl Size {
    /// (horizontal, vertical) padding inside the box
    fn padding(self) -> (u16, u16) {
        match self {
            Size::Sm => (0, 0),
            Size::Md => (1, 0),
            Size::Lg => (2, 1),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum InputType {
    #[default]
    Text,
    Password,
}

type ChangeCallback = Box<dyn FnMut(String)>;

#[derive(Default)]
pub struct InputField {
    label: Option<String>,
    placeholder: Option<String>,
    helper_text: Option<String>,
    error_message: Option<String>,
    disabled: bool,
    invalid: bool,
    loading: bool,
    variant: Variant,
    size: Size,
    input_type: InputType,
    show_clear_button: bool,
    show_password_toggle: bool,
    theme: Theme,

    display_mode: InputType, // what is shown right now; starts as input_type
    spinner: ThrobberState,
    on_change: Option<ChangeCallback>,
}

impl InputField {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    pub fn helper_text(mut self, text: impl Into<String>) -> Self {
        self.helper_text = Some(text.into());
        self
    }

    pub fn error_message(mut self, text: impl Into<String>) -> Self {
        self.error_message = Some(text.into());
        self
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    pub fn invalid(mut self, invalid: bool) -> Self {
        self.invalid = invalid;
        self
    }

    pub fn loading(mut self, loading: bool) -> Self {
        self.loading = loading;
        self
    }

    pub fn variant(mut self, variant: Variant) -> Self {
        self.variant = variant;
        self
    }

    pub fn size(mut self, size: Size) -> Self {
        self.size = size;
        self
    }

    pub fn input_type(mut self, input_type: InputType) -> Self {
        self.input_type = input_type;
        self.display_mode = input_type;
        self
    }

    pub fn show_clear_button(mut self, show: bool) -> Self {
        self.show_clear_button = show;
        self
    }

    pub fn show_password_toggle(mut self, show: bool) -> Self {
        self.show_password_toggle = show;
        self
    }

    pub fn theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    pub fn on_change(mut self, callback: impl FnMut(String) + 'static) -> Self {
        self.on_change = Some(Box::new(callback));
        self
    }

    pub fn set_invalid(&mut self, invalid: bool) {
        self.invalid = invalid;
    }

    pub fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }

    pub fn display_mode(&self) -> InputType {
        self.display_mode
    }

    fn editable(&self) -> bool {
        !self.disabled && !self.loading
    }

    fn clear_visible(&self, value: &str) -> bool {
        self.show_clear_button && !value.is_empty() && self.editable()
    }

    /// Whether the show/hide affordance is offered
    pub fn password_toggle_visible(&self) -> bool {
        self.show_password_toggle && self.input_type == InputType::Password && !self.disabled
    }

    fn showing_error(&self) -> bool {
        self.invalid && self.error_message.is_some()
    }

    /// Error message when invalid, otherwise helper text. Never both.
    pub fn assistive_text(&self) -> Option<&str> {
        if self.showing_error() {
            self.error_message.as_deref()
        } else {
            self.helper_text.as_deref()
        }
    }

    fn emit(&mut self, value: String) {
        if let Some(callback) = self.on_change.as_mut() {
            callback(value);
        }
    }

    /// Clear affordance. Only acts while the clear button is visible.
    pub fn clear(&mut self, value: &str) -> bool {
        if !self.clear_visible(value) {
            return false;
        }
        tracing::debug!("Input cleared");
        self.emit(String::new());
        true
    }

    pub fn toggle_display_mode(&mut self) {
        self.display_mode = match self.display_mode {
            InputType::Password => InputType::Text,
            InputType::Text => InputType::Password,
        };
    }

    /// Returns true if the key was consumed
    pub fn handle_key(&mut self, key: KeyEvent, value: &str) -> bool {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            return match key.code {
                KeyCode::Char('u') => self.clear(value),
                KeyCode::Char('t') if self.password_toggle_visible() => {
                    self.toggle_display_mode();
                    true
                }
                _ => false,
            };
        }

        if !self.editable() {
            return false;
        }

        match key.code {
            KeyCode::Char(c) => {
                let mut next = value.to_string();
                next.push(c);
                self.emit(next);
                true
            }
            KeyCode::Backspace => {
                if !value.is_empty() {
                    let mut next = value.to_string();
                    next.pop();
                    self.emit(next);
                }
                true
            }
            _ => false,
        }
    }

    /// Advance the loading spinner
    pub fn tick(&mut self) {
        if self.loading {
            self.spinner.calc_next();
        }
    }

    fn box_height(&self) -> u16 {
        let borders = if self.variant == Variant::Ghost { 0 } else { 2 };
        1 + 2 * self.size.padding().1 + borders
    }

    /// Rows needed to render label, box and assistive text
    pub fn height(&self) -> u16 {
        let label = u16::from(self.label.is_some());
        let assistive = u16::from(self.assistive_text().is_some());
        label + self.box_height() + assistive
    }

    pub fn render(&self, f: &mut Frame, area: Rect, value: &str, focused: bool) {
        let mut constraints = Vec::with_capacity(3);
        if self.label.is_some() {
            constraints.push(Constraint::Length(1));
        }
        constraints.push(Constraint::Length(self.box_height()));
        if self.assistive_text().is_some() {
            constraints.push(Constraint::Length(1));
        }
        let chunks = Layout::vertical(constraints).split(area);
        let mut next = 0;

        if let Some(label) = &self.label {
            let style = Style::default().fg(self.theme.text).add_modifier(Modifier::BOLD);
            f.render_widget(Paragraph::new(Span::styled(label.as_str(), style)), chunks[next]);
            next += 1;
        }

        self.render_box(f, chunks[next], value, focused);
        next += 1;

        if let Some(text) = self.assistive_text() {
            let color = if self.showing_error() { self.theme.danger } else { self.theme.text_dim };
            f.render_widget(
                Paragraph::new(Span::styled(text, Style::default().fg(color))),
                chunks[next],
            );
        }
    }

    fn render_box(&self, f: &mut Frame, area: Rect, value: &str, focused: bool) {
        let theme = &self.theme;
        let active = focused && self.editable();
        let border_color = if self.invalid {
            theme.danger
        } else if active {
            theme.accent
        } else if self.variant == Variant::Filled {
            theme.bg_field
        } else {
            theme.inactive
        };

        let block = match self.variant {
            Variant::Outlined => Block::default().borders(Borders::ALL),
            Variant::Filled => Block::default()
                .borders(Borders::ALL)
                .style(Style::default().bg(theme.bg_field)),
            Variant::Ghost => Block::default(),
        };
        let (px, py) = self.size.padding();
        let block = block
            .border_style(Style::default().fg(border_color))
            .padding(Padding::new(px, px, py, py));
        let inner = block.inner(area);
        f.render_widget(block, area);
        if inner.width == 0 || inner.height == 0 {
            return;
        }

        let trailing = self.trailing_line(value);
        let trailing_width = (trailing.width() as u16).min(inner.width);
        let [text_area, trailing_area] = Layout::horizontal([
            Constraint::Min(0),
            Constraint::Length(trailing_width),
        ])
        .areas(Rect { height: 1, ..inner });

        let text_style = if self.disabled {
            Style::default().fg(theme.text_dim).add_modifier(Modifier::DIM)
        } else {
            Style::default().fg(theme.text)
        };

        let shown = if value.is_empty() {
            let placeholder = self.placeholder.as_deref().unwrap_or("");
            Span::styled(placeholder.to_string(), Style::default().fg(theme.text_dim))
        } else {
            Span::styled(self.visible_tail(value, text_area.width), text_style)
        };
        let shown_width = if value.is_empty() { 0 } else { shown.width() as u16 };
        f.render_widget(Paragraph::new(shown), text_area);
        f.render_widget(Paragraph::new(trailing), trailing_area);

        if active && text_area.width > 0 {
            let x = text_area.x + shown_width.min(text_area.width - 1);
            f.set_cursor_position((x, text_area.y));
        }
    }

    /// Display text (masked if needed), keeping the end visible when it overflows
    fn visible_tail(&self, value: &str, width: u16) -> String {
        let chars: Vec<char> = match self.display_mode {
            InputType::Password => value.chars().map(|_| MASK_CHAR).collect(),
            InputType::Text => value.chars().collect(),
        };
        let room = usize::from(width.saturating_sub(1)).max(1);
        let start = chars.len().saturating_sub(room);
        chars[start..].iter().collect()
    }

    fn trailing_line(&self, value: &str) -> Line<'static> {
        let dim = Style::default().fg(self.theme.text_dim);
        let mut spans: Vec<Span<'static>> = Vec::new();

        if self.clear_visible(value) {
            spans.push(Span::styled(CLEAR_GLYPH, dim));
        }
        if self.password_toggle_visible() {
            if !spans.is_empty() {
                spans.push(Span::raw(" "));
            }
            let label = match self.display_mode {
                InputType::Password => "show",
                InputType::Text => "hide",
            };
            spans.push(Span::styled(label, dim));
        }
        if self.loading {
            if !spans.is_empty() {
                spans.push(Span::raw(" "));
            }
            let spinner = Throbber::default().throbber_style(Style::default().fg(self.theme.accent));
            spans.push(spinner.to_symbol_span(&self.spinner));
        }

        Line::from(spans)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::components::buffer_text;
    use ratatui::{backend::TestBackend, Terminal};
    use std::cell::RefCell;
    use std::rc::Rc;

    fn recording() -> (InputField, Rc<RefCell<Vec<String>>>) {
        let changes: Rc<RefCell<Vec<String>>> = Rc::default();
        let sink = Rc::clone(&changes);
        let field = InputField::new().on_change(move |v| sink.borrow_mut().push(v));
        (field, changes)
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    fn draw(field: &InputField, value: &str) -> String {
        let mut terminal = Terminal::new(TestBackend::new(40, field.height())).unwrap();
        terminal
            .draw(|f| field.render(f, f.area(), value, true))
            .unwrap();
        buffer_text(terminal.backend().buffer())
    }

    #[test]
    fn test_error_replaces_helper() {
        let field = InputField::new()
            .helper_text("Please enter your legal name.")
            .error_message("X")
            .invalid(true);

        assert_eq!(field.assistive_text(), Some("X"));
        let text = draw(&field, "");
        assert!(text.contains('X'));
        assert!(!text.contains("legal name"));
    }

    #[test]
    fn test_helper_shown_when_valid_or_no_error_message() {
        let valid = InputField::new().helper_text("help").error_message("bad");
        assert_eq!(valid.assistive_text(), Some("help"));

        let invalid_without_message = InputField::new().helper_text("help").invalid(true);
        assert_eq!(invalid_without_message.assistive_text(), Some("help"));

        assert_eq!(InputField::new().assistive_text(), None);
    }

    #[test]
    fn test_clear_emits_empty_once() {
        let (field, changes) = recording();
        let mut field = field.show_clear_button(true);

        assert!(field.clear("abc"));
        assert_eq!(*changes.borrow(), vec![String::new()]);
    }

    #[test]
    fn test_clear_noop_when_hidden() {
        let (field, changes) = recording();
        let mut disabled = field.show_clear_button(true).disabled(true);
        assert!(!disabled.clear("abc"));

        let (field, loading_changes) = recording();
        let mut loading = field.show_clear_button(true).loading(true);
        assert!(!loading.clear("abc"));

        let (field, empty_changes) = recording();
        let mut empty = field.show_clear_button(true);
        assert!(!empty.clear(""));

        let (field, off_changes) = recording();
        let mut off = field;
        assert!(!off.clear("abc"));

        assert!(changes.borrow().is_empty());
        assert!(loading_changes.borrow().is_empty());
        assert!(empty_changes.borrow().is_empty());
        assert!(off_changes.borrow().is_empty());
    }

    #[test]
    fn test_typing_reports_new_value() {
        let (mut field, changes) = recording();

        assert!(field.handle_key(key(KeyCode::Char('d')), "abc"));
        assert!(field.handle_key(key(KeyCode::Backspace), "abc"));
        assert!(field.handle_key(key(KeyCode::Backspace), ""));

        assert_eq!(*changes.borrow(), vec!["abcd".to_string(), "ab".to_string()]);
    }

    #[test]
    fn test_disabled_ignores_typing() {
        let (field, changes) = recording();
        let mut field = field.disabled(true);

        assert!(!field.handle_key(key(KeyCode::Char('x')), ""));
        assert!(changes.borrow().is_empty());
    }

    #[test]
    fn test_ctrl_u_clears_through_callback() {
        let (field, changes) = recording();
        let mut field = field.show_clear_button(true);

        assert!(field.handle_key(ctrl('u'), "abc"));
        assert_eq!(*changes.borrow(), vec![String::new()]);
    }

    #[test]
    fn test_toggle_display_mode() {
        let (field, changes) = recording();
        let mut field = field
            .input_type(InputType::Password)
            .show_password_toggle(true);
        assert_eq!(field.display_mode(), InputType::Password);

        assert!(field.handle_key(ctrl('t'), "secret"));
        assert_eq!(field.display_mode(), InputType::Text);
        field.toggle_display_mode();
        assert_eq!(field.display_mode(), InputType::Password);
        assert!(changes.borrow().is_empty());
    }

    #[test]
    fn test_toggle_ignored_for_plain_fields() {
        let mut field = InputField::new().show_password_toggle(true);

        assert!(!field.handle_key(ctrl('t'), "abc"));
        assert_eq!(field.display_mode(), InputType::Text);
    }

    #[test]
    fn test_toggle_hidden_when_disabled() {
        let mut field = InputField::new()
            .input_type(InputType::Password)
            .show_password_toggle(true)
            .disabled(true);

        assert!(!field.password_toggle_visible());
        assert!(!field.handle_key(ctrl('t'), "abc"));
        assert_eq!(field.display_mode(), InputType::Password);

        let text = draw(&field, "abc");
        assert!(!text.contains("show"));
        assert!(!text.contains("hide"));
    }

    #[test]
    fn test_render_masks_password() {
        let mut field = InputField::new()
            .label("Password")
            .input_type(InputType::Password)
            .show_password_toggle(true);
        let masked = draw(&field, "abc");
        assert!(masked.contains("•••"));
        assert!(!masked.contains("abc"));
        assert!(masked.contains("show"));

        field.toggle_display_mode();
        let plain = draw(&field, "abc");
        assert!(plain.contains("abc"));
        assert!(plain.contains("hide"));
    }

    #[test]
    fn test_render_affordances() {
        let field = InputField::new()
            .label("Full Name")
            .placeholder("Enter your name")
            .show_clear_button(true);

        let empty = draw(&field, "");
        assert!(empty.contains("Full Name"));
        assert!(empty.contains("Enter your name"));
        assert!(!empty.contains(CLEAR_GLYPH));

        let filled = draw(&field, "Bob");
        assert!(filled.contains("Bob"));
        assert!(filled.contains(CLEAR_GLYPH));

        let loading = InputField::new().show_clear_button(true).loading(true);
        assert!(!draw(&loading, "Bob").contains(CLEAR_GLYPH));
    }

    #[test]
    fn test_render_spinner_while_loading() {
        // Row 1 is the text row inside the top border
        let content_row = |field: &InputField| {
            draw(field, "")
                .lines()
                .nth(1)
                .unwrap_or_default()
                .replace('│', "")
                .trim()
                .to_string()
        };

        assert!(!content_row(&InputField::new().loading(true)).is_empty());
        assert!(content_row(&InputField::new()).is_empty());
    }

    #[test]
    fn test_height_by_variant_and_size() {
        assert_eq!(InputField::new().height(), 3);
        assert_eq!(InputField::new().variant(Variant::Ghost).height(), 1);
        assert_eq!(
            InputField::new().label("L").helper_text("h").size(Size::Lg).height(),
            7
        );
    }
}
