//! The clients table: name, address, last-handshake age, and
//! per-column traffic bars measured against the usage ceiling.

use std::sync::Arc;

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, BorderType, Borders, Cell, Paragraph, Row, Table, TableState};
use wgdash_core::Client;

use crate::action::Action;
use crate::component::Component;
use crate::format::{fmt_bytes, fmt_elapsed, is_over_limit, usage_bar, usage_pct};
use crate::theme;

/// Width of the bar drawn under each traffic cell.
const BAR_WIDTH: u16 = 16;

pub struct ClientsTable {
    clients: Arc<Vec<Arc<Client>>>,
    table_state: TableState,
    ceiling_gb: f64,
    focused: bool,
}

impl ClientsTable {
    pub fn new(ceiling_gb: f64) -> Self {
        Self {
            clients: Arc::new(Vec::new()),
            table_state: TableState::default(),
            ceiling_gb,
            focused: true,
        }
    }

    fn selected_client(&self) -> Option<&Arc<Client>> {
        self.table_state
            .selected()
            .and_then(|i| self.clients.get(i))
    }

    #[allow(clippy::cast_possible_wrap, clippy::cast_sign_loss, clippy::as_conversions)]
    fn move_selection(&mut self, delta: isize) {
        if self.clients.is_empty() {
            self.table_state.select(None);
            return;
        }
        let len = self.clients.len() as isize;
        let current = self.table_state.selected().map_or(0, |i| i as isize);
        let next = (current + delta).clamp(0, len - 1);
        self.table_state.select(Some(next as usize));
    }

    fn select_first(&mut self) {
        if !self.clients.is_empty() {
            self.table_state.select(Some(0));
        }
    }

    fn select_last(&mut self) {
        if let Some(last) = self.clients.len().checked_sub(1) {
            self.table_state.select(Some(last));
        }
    }

    /// Keep the selection inside the table when rows appear or
    /// disappear under it.
    fn clamp_selection(&mut self) {
        if self.clients.is_empty() {
            self.table_state.select(None);
            return;
        }
        match self.table_state.selected() {
            Some(i) if i >= self.clients.len() => {
                self.table_state.select(Some(self.clients.len() - 1));
            }
            None => self.table_state.select(Some(0)),
            Some(_) => {}
        }
    }

    /// Two-line traffic cell: the formatted byte count over a usage
    /// bar. At or past the ceiling both lines turn alert red.
    fn traffic_cell(&self, bytes: u64, fill: Color) -> Text<'static> {
        let pct = usage_pct(bytes, self.ceiling_gb);
        let over = is_over_limit(pct);
        let (filled, empty) = usage_bar(pct, BAR_WIDTH);
        let bar_color = if over { theme::BAR_ALERT } else { fill };
        let label = format!("{} / {}GB", fmt_bytes(bytes), self.ceiling_gb);
        let label_style = if over {
            Style::default().fg(theme::BAR_ALERT)
        } else {
            theme::table_row()
        };
        Text::from(vec![
            Line::styled(label, label_style),
            Line::from(vec![
                Span::styled(filled, Style::default().fg(bar_color)),
                Span::styled(empty, Style::default().fg(theme::BAR_TRACK)),
            ]),
        ])
    }
}

impl Component for ClientsTable {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let action = match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.move_selection(-1);
                None
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.move_selection(1);
                None
            }
            KeyCode::Char('g') => {
                self.select_first();
                None
            }
            KeyCode::Char('G') => {
                self.select_last();
                None
            }
            KeyCode::Char('d') => self
                .selected_client()
                .map(|client| Action::RequestDownloadConfig(client.id)),
            KeyCode::Char('x') | KeyCode::Delete => self
                .selected_client()
                .map(|client| Action::RequestDeleteClient(client.id)),
            KeyCode::Char('a') => Some(Action::FocusAddForm),
            KeyCode::Char('m') => Some(Action::FocusCeiling),
            _ => None,
        };
        Ok(action)
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        match action {
            Action::ClientsUpdated(clients) => {
                self.clients = Arc::clone(clients);
                self.clamp_selection();
            }
            Action::CeilingChanged(gb) => self.ceiling_gb = *gb,
            _ => {}
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let border = if self.focused {
            theme::border_focused()
        } else {
            theme::border_default()
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(border)
            .title(Span::styled(" Clients ", theme::title_style()));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        if self.clients.is_empty() {
            frame.render_widget(
                Paragraph::new(Span::styled(
                    "No clients yet. Press a to create one.",
                    Style::default().fg(theme::BORDER_GRAY),
                )),
                inner,
            );
            return;
        }

        let header = Row::new(vec![
            Cell::from("Name").style(theme::table_header()),
            Cell::from("IP address").style(theme::table_header()),
            Cell::from("Connected").style(theme::table_header()),
            Cell::from("Uploaded").style(theme::table_header()),
            Cell::from("Downloaded").style(theme::table_header()),
        ]);

        let selected_idx = self.table_state.selected().unwrap_or(0);
        let rows: Vec<Row> = self
            .clients
            .iter()
            .enumerate()
            .map(|(i, client)| {
                let is_selected = i == selected_idx;
                let prefix = if is_selected { "▸" } else { " " };
                let row_style = if is_selected {
                    theme::table_selected()
                } else {
                    theme::table_row()
                };

                Row::new(vec![
                    Cell::from(format!("{prefix}{}", client.name)).style(
                        Style::default()
                            .fg(theme::NEON_CYAN)
                            .add_modifier(if is_selected {
                                Modifier::BOLD
                            } else {
                                Modifier::empty()
                            }),
                    ),
                    Cell::from(client.ip.to_string()),
                    Cell::from(format!("{} ago", fmt_elapsed(client.last_connected_secs))),
                    Cell::from(self.traffic_cell(client.uploaded_bytes, theme::BAR_UPLOAD)),
                    Cell::from(self.traffic_cell(client.downloaded_bytes, theme::BAR_DOWNLOAD)),
                ])
                .style(row_style)
                .height(2)
            })
            .collect();

        let widths = [
            Constraint::Min(14),
            Constraint::Length(15),
            Constraint::Length(12),
            Constraint::Length(22),
            Constraint::Length(22),
        ];

        let table = Table::new(rows, widths)
            .header(header)
            .row_highlight_style(theme::table_selected());

        let mut state = self.table_state;
        frame.render_stateful_widget(table, inner, &mut state);
    }

    fn focused(&self) -> bool {
        self.focused
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }
}
