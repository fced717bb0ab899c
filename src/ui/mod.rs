pub mod components;

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::app::{App, Focus, Popup};
use crate::record::Record;
use crate::ui::components::Column;

/// Tallest the selection panel grows before it clips
const MAX_SELECTED_LINES: u16 = 6;

pub fn draw(f: &mut Frame, app: &App) {
    let area = f.area();
    f.render_widget(Block::default().style(Style::default().bg(app.theme.bg)), area);

    let selected_height = if app.selected.is_empty() {
        0
    } else {
        (app.selected.len() as u16).min(MAX_SELECTED_LINES) + 2
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(app.input.height()), // Filter input
            Constraint::Length(1),                  // Spacer
            Constraint::Min(5),                     // Table
            Constraint::Length(selected_height),    // Selected rows
            Constraint::Length(1),                  // Footer
        ])
        .split(area);

    app.input
        .render(f, chunks[0], &app.filter, app.focus == Focus::Filter && app.popup == Popup::None);
    app.table
        .render(f, chunks[2], &app.visible, &app.theme, app.focus == Focus::Table);
    if !app.selected.is_empty() {
        draw_selected(f, app, chunks[3]);
    }
    draw_footer(f, app, chunks[4]);

    if app.popup == Popup::Help {
        draw_help_popup(f, app);
    }
}

/// "first (rest, ...)" built from the table's columns
fn selection_label(row: &impl Record, columns: &[Column]) -> String {
    let mut values = columns
        .iter()
        .map(|c| row.display(&c.field))
        .filter(|v| !v.is_empty());
    let first = values.next().unwrap_or_default();
    let rest: Vec<String> = values.collect();
    if rest.is_empty() {
        first
    } else {
        format!("{} ({})", first, rest.join(", "))
    }
}

fn draw_selected(f: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let block = Block::default()
        .title(Span::styled(
            format!(" Selected ({}) ", app.selected.len()),
            Style::default().fg(theme.header).add_modifier(Modifier::BOLD),
        ))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.inactive));

    let lines: Vec<Line> = app
        .selected
        .iter()
        .map(|row| {
            Line::from(vec![
                Span::styled("• ", Style::default().fg(theme.accent)),
                Span::styled(selection_label(row, app.table.columns()), Style::default().fg(theme.text)),
            ])
        })
        .collect();

    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn draw_footer(f: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;

    if let Some(status) = &app.status_message {
        let line = Line::from(Span::styled(status.as_str(), Style::default().fg(theme.accent)));
        f.render_widget(Paragraph::new(line).alignment(Alignment::Center), area);
        return;
    }

    let hints: Vec<(&str, &str)> = match app.focus {
        Focus::Filter => {
            let mut hints = vec![("Type", "Filter"), ("^U", "Clear")];
            if app.input.password_toggle_visible() {
                hints.push(("^T", "Show/Hide"));
            }
            hints.extend([("Tab", "Table"), ("^C", "Quit")]);
            hints
        }
        Focus::Table => vec![
            ("↑↓", "Row"),
            ("←→", "Column"),
            ("s", "Sort"),
            ("Space", "Select"),
            ("/", "Filter"),
            ("?", "Help"),
            ("q", "Quit"),
        ],
    };

    // Responsive: show fewer hints on narrow terminals
    let max_hints = if area.width < 60 { 4 } else { hints.len() };

    let hint_spans: Vec<Span> = hints
        .iter()
        .take(max_hints)
        .flat_map(|(key, action)| {
            vec![
                Span::styled(*key, Style::default().fg(theme.accent)),
                Span::styled(format!(" {} │ ", action), Style::default().fg(theme.text_dim)),
            ]
        })
        .collect();

    let footer = Paragraph::new(Line::from(hint_spans)).alignment(Alignment::Center);
    f.render_widget(footer, area);
}

fn draw_help_popup(f: &mut Frame, app: &App) {
    let theme = &app.theme;
    let area = f.area();
    let popup_area = centered_rect(
        if area.width < 80 { 95 } else { 60 },
        if area.height < 30 { 95 } else { 70 },
        area,
    );

    f.render_widget(Clear, popup_area);

    let section = |title: &'static str| {
        Line::from(Span::styled(
            title,
            Style::default().fg(theme.header).add_modifier(Modifier::BOLD),
        ))
    };
    let entry = |key: &'static str, action: String| {
        Line::from(vec![
            Span::styled(key, Style::default().fg(theme.accent)),
            Span::styled(action, Style::default().fg(theme.text)),
        ])
    };

    let mut help_text = vec![
        section("═══ Filter ═══"),
        entry("  Type      ", format!("Filter rows by {}", app.filter_field)),
        entry("  Ctrl+U    ", "Clear the filter".into()),
    ];
    if app.input.password_toggle_visible() {
        help_text.push(entry("  Ctrl+T    ", "Show/hide password input".into()));
    }
    help_text.extend([
        entry("  Esc/Enter ", "Jump to the table".into()),
        Line::from(""),
        section("═══ Table ═══"),
        entry("  ↑/↓ j/k   ", "Move between rows".into()),
        entry("  ←/→ h/l   ", "Move between columns".into()),
        entry("  s/Enter   ", "Sort by column (ascending ⇄ descending)".into()),
        entry("  Space     ", "Select/deselect row".into()),
        entry("  L         ", "Toggle loading state".into()),
        Line::from(""),
        section("═══ General ═══"),
        entry("  Tab       ", "Switch between filter and table".into()),
        entry("  ?         ", "Toggle this help".into()),
        entry("  q         ", "Quit (from the table)".into()),
        entry("  Ctrl+C    ", "Quit".into()),
    ]);

    let help = Paragraph::new(help_text)
        .block(
            Block::default()
                .title(Span::styled(
                    " Help ",
                    Style::default().fg(theme.accent).add_modifier(Modifier::BOLD),
                ))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.accent))
                .style(Style::default().bg(theme.bg)),
        )
        .wrap(Wrap { trim: false });

    f.render_widget(help, popup_area);
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
