//! Sortable, selectable table over any `Record` sequence
//!
//! The table never owns its data: callers pass the current slice on every
//! render and interaction, and the table keeps only its sort directive,
//! selection and keyboard focus. Selection is reported through the
//! `on_row_select` callback, in the order rows were checked.

use std::cmp::Ordering;

use ratatui::{
    layout::{Alignment, Constraint, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};
use serde::{Deserialize, Serialize};

use crate::record::{CellValue, Record};
use crate::theme::Theme;

const COLUMN_SPACING: u16 = 1;
const HEADER_HEIGHT: u16 = 2; // title row + bottom margin
const CHECKBOX_WIDTH: u16 = 3;

const LOADING_TEXT: &str = "Loading...";
const EMPTY_TEXT: &str = "No data available.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    pub key: String,
    pub title: String,
    pub field: String, // Record field projected into this column
    #[serde(default)]
    pub sortable: bool,
}

impl Column {
    pub fn new(key: impl Into<String>, title: impl Into<String>, field: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            title: title.into(),
            field: field.into(),
            sortable: false,
        }
    }

    pub fn sortable(mut self) -> Self {
        self.sortable = true;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortDirective {
    pub field: String,
    pub direction: SortDirection,
}

type SelectCallback<R> = Box<dyn FnMut(&[R])>;

pub struct DataTable<R> {
    columns: Vec<Column>,
    loading: bool,
    selectable: bool,
    row_key: String,

    sort: Option<SortDirective>,
    selected: Vec<R>, // insertion order
    on_row_select: Option<SelectCallback<R>>,

    // Keyboard focus
    cursor: usize,
    focused_column: usize,
}

impl<R: Record + Clone> DataTable<R> {
    pub fn new(columns: Vec<Column>) -> Self {
        Self {
            columns,
            loading: false,
            selectable: false,
            row_key: "id".to_string(),
            sort: None,
            selected: Vec::new(),
            on_row_select: None,
            cursor: 0,
            focused_column: 0,
        }
    }

    pub fn loading(mut self, loading: bool) -> Self {
        self.loading = loading;
        self
    }

    pub fn selectable(mut self, selectable: bool) -> Self {
        self.selectable = selectable;
        self
    }

    pub fn row_key(mut self, key: impl Into<String>) -> Self {
        self.row_key = key.into();
        self
    }

    pub fn on_row_select(mut self, callback: impl FnMut(&[R]) + 'static) -> Self {
        self.on_row_select = Some(Box::new(callback));
        self
    }

    pub fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }

    pub fn set_selectable(&mut self, selectable: bool) {
        self.selectable = selectable;
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn sort(&self) -> Option<&SortDirective> {
        self.sort.as_ref()
    }

    pub fn selected_rows(&self) -> &[R] {
        &self.selected
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn focused_column(&self) -> usize {
        self.focused_column
    }

    // ---- Sorting ----

    /// Header click. Cycles asc -> desc -> asc on the same column; there is
    /// no click path back to unsorted.
    pub fn toggle_sort(&mut self, column: usize) {
        let Some(col) = self.columns.get(column) else {
            return;
        };
        if !col.sortable {
            return;
        }

        let direction = match &self.sort {
            Some(s) if s.field == col.field && s.direction == SortDirection::Ascending => {
                SortDirection::Descending
            }
            _ => SortDirection::Ascending,
        };
        tracing::debug!("Sorting by {} {:?}", col.field, direction);
        self.sort = Some(SortDirective {
            field: col.field.clone(),
            direction,
        });
    }

    /// Rows in the order they are rendered
    pub fn effective_order<'a>(&self, data: &'a [R]) -> Vec<&'a R> {
        let Some(sort) = &self.sort else {
            return data.iter().collect();
        };

        let mut keyed: Vec<(Option<CellValue>, &'a R)> =
            data.iter().map(|row| (row.field(&sort.field), row)).collect();
        // sort_by is stable, so equal keys keep input order
        keyed.sort_by(|(a, _), (b, _)| compare_keys(a.as_ref(), b.as_ref(), sort.direction));
        keyed.into_iter().map(|(_, row)| row).collect()
    }

    // ---- Selection ----

    pub fn is_selected(&self, row: &R) -> bool {
        row.field(&self.row_key)
            .is_some_and(|id| self.position_of(&id).is_some())
    }

    fn position_of(&self, id: &CellValue) -> Option<usize> {
        self.selected
            .iter()
            .position(|s| s.field(&self.row_key).as_ref() == Some(id))
    }

    /// Checkbox click. Fires the selection callback once per effective toggle.
    pub fn toggle_row(&mut self, row: &R) {
        if !self.selectable {
            return;
        }
        let Some(id) = row.field(&self.row_key) else {
            tracing::debug!("Row has no '{}' field; cannot select it", self.row_key);
            return;
        };

        match self.position_of(&id) {
            Some(index) => {
                self.selected.remove(index);
                tracing::debug!("Deselected row {}", id);
            }
            None => {
                self.selected.push(row.clone());
                tracing::debug!("Selected row {}", id);
            }
        }

        if let Some(callback) = self.on_row_select.as_mut() {
            callback(&self.selected);
        }
    }

    // ---- Keyboard focus ----

    pub fn cursor_down(&mut self, len: usize) {
        if len > 0 {
            self.cursor = (self.cursor + 1) % len;
        }
    }

    pub fn cursor_up(&mut self, len: usize) {
        if len > 0 {
            self.cursor = (self.cursor + len - 1) % len;
        }
    }

    /// Keep the cursor on a valid row after the data shrinks
    pub fn clamp_cursor(&mut self, len: usize) {
        self.cursor = self.cursor.min(len.saturating_sub(1));
    }

    pub fn focus_next_column(&mut self) {
        if !self.columns.is_empty() {
            self.focused_column = (self.focused_column + 1) % self.columns.len();
        }
    }

    pub fn focus_previous_column(&mut self) {
        let len = self.columns.len();
        if len > 0 {
            self.focused_column = (self.focused_column + len - 1) % len;
        }
    }

    pub fn toggle_focused_sort(&mut self) {
        self.toggle_sort(self.focused_column);
    }

    pub fn toggle_cursor_row(&mut self, data: &[R]) {
        if self.loading {
            return;
        }
        let order = self.effective_order(data);
        if let Some(row) = order.get(self.cursor).copied() {
            self.toggle_row(row);
        }
    }

    // ---- Rendering ----

    pub fn render(&self, f: &mut Frame, area: Rect, data: &[R], theme: &Theme, focused: bool) {
        let border_color = if focused { theme.accent } else { theme.inactive };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border_color));
        let inner = block.inner(area);
        f.render_widget(block, area);

        let header = self.header_row(theme, focused);
        let widths = self.widths();

        let placeholder = if self.loading {
            Some(LOADING_TEXT)
        } else if data.is_empty() {
            Some(EMPTY_TEXT)
        } else {
            None
        };

        if let Some(text) = placeholder {
            let table = Table::new(Vec::<Row>::new(), widths)
                .header(header)
                .column_spacing(COLUMN_SPACING);
            f.render_widget(table, inner);

            // Single full-width row in place of the body
            if inner.height > HEADER_HEIGHT {
                let row_area = Rect {
                    y: inner.y + HEADER_HEIGHT,
                    height: 1,
                    ..inner
                };
                let line = Line::from(Span::styled(text, Style::default().fg(theme.text_dim)));
                f.render_widget(Paragraph::new(line).alignment(Alignment::Center), row_area);
            }
            return;
        }

        let rows: Vec<Row> = self
            .effective_order(data)
            .into_iter()
            .map(|row| self.body_row(row, theme))
            .collect();

        let table = Table::new(rows, widths)
            .header(header)
            .column_spacing(COLUMN_SPACING)
            .row_highlight_style(Style::default().bg(theme.bg_cursor));

        let mut state = TableState::default()
            .with_selected(focused.then(|| self.cursor.min(data.len() - 1)));
        f.render_stateful_widget(table, inner, &mut state);
    }

    fn widths(&self) -> Vec<Constraint> {
        let mut widths = Vec::with_capacity(self.columns.len() + 1);
        if self.selectable {
            widths.push(Constraint::Length(CHECKBOX_WIDTH));
        }
        widths.extend(self.columns.iter().map(|_| Constraint::Fill(1)));
        widths
    }

    fn header_row(&self, theme: &Theme, focused: bool) -> Row<'static> {
        let base = Style::default().fg(theme.header).add_modifier(Modifier::BOLD);
        let mut cells = Vec::with_capacity(self.columns.len() + 1);
        if self.selectable {
            cells.push(Cell::from(""));
        }

        for (i, col) in self.columns.iter().enumerate() {
            let mut spans = vec![Span::raw(col.title.clone())];
            if let Some(sort) = self.sort.as_ref().filter(|s| col.sortable && s.field == col.field) {
                let marker = match sort.direction {
                    SortDirection::Ascending => " ▲",
                    SortDirection::Descending => " ▼",
                };
                spans.push(Span::styled(marker, Style::default().fg(theme.accent)));
            }

            let style = if focused && i == self.focused_column {
                base.add_modifier(Modifier::UNDERLINED)
            } else {
                base
            };
            cells.push(Cell::from(Line::from(spans)).style(style));
        }

        Row::new(cells).height(1).bottom_margin(HEADER_HEIGHT - 1)
    }

    fn body_row(&self, row: &R, theme: &Theme) -> Row<'static> {
        let selected = self.selectable && self.is_selected(row);
        let mut cells = Vec::with_capacity(self.columns.len() + 1);
        if self.selectable {
            let checkbox = if selected { "[x]" } else { "[ ]" };
            cells.push(Cell::from(checkbox).style(Style::default().fg(theme.accent)));
        }
        cells.extend(self.columns.iter().map(|col| Cell::from(row.display(&col.field))));

        let style = if selected {
            Style::default().fg(theme.text).bg(theme.bg_selected)
        } else {
            Style::default().fg(theme.text)
        };
        Row::new(cells).style(style)
    }
}

/// Absent keys sort last in either direction; only present values are inverted
fn compare_keys(a: Option<&CellValue>, b: Option<&CellValue>, direction: SortDirection) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(a), Some(b)) => {
            let ord = a.natural_cmp(b);
            match direction {
                SortDirection::Ascending => ord,
                SortDirection::Descending => ord.reverse(),
            }
        }
    }
}
