//! The "Max data usage" field.
//!
//! Edits are local until Enter commits them; the committed value is
//! what the table measures its usage bars against. Rejected input
//! reverts to the last committed value.

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::Span;
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};

use crate::action::{Action, Notification};
use crate::component::Component;
use crate::theme;

pub struct CeilingInput {
    /// Text under edit. May be transiently unparseable.
    input: String,
    /// Last committed ceiling in GB. Always finite and positive.
    committed: f64,
    focused: bool,
}

impl CeilingInput {
    pub fn new(ceiling_gb: f64) -> Self {
        Self {
            input: ceiling_gb.to_string(),
            committed: ceiling_gb,
            focused: false,
        }
    }

    fn commit(&mut self) -> Option<Action> {
        let parsed = self
            .input
            .trim()
            .parse::<f64>()
            .ok()
            .and_then(|gb| wgdash_config::validate_ceiling(gb).ok());
        match parsed {
            Some(gb) => {
                self.committed = gb;
                self.input = gb.to_string();
                Some(Action::CeilingChanged(gb))
            }
            None => {
                let rejected = std::mem::replace(&mut self.input, self.committed.to_string());
                Some(Action::Notify(Notification::error(format!(
                    "Invalid ceiling {rejected:?}: expected a positive number of GB"
                ))))
            }
        }
    }
}

impl Component for CeilingInput {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let action = match key.code {
            KeyCode::Enter => self.commit(),
            KeyCode::Esc => {
                self.input = self.committed.to_string();
                Some(Action::FocusTable)
            }
            KeyCode::Backspace => {
                self.input.pop();
                None
            }
            KeyCode::Char(c)
                if (c.is_ascii_digit() || c == '.')
                    && !key.modifiers.contains(KeyModifiers::CONTROL) =>
            {
                self.input.push(c);
                None
            }
            _ => None,
        };
        Ok(action)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        if area.height < 3 {
            return;
        }

        let label_style = if self.focused {
            Style::default().fg(theme::NEON_CYAN)
        } else {
            Style::default().fg(theme::DIM_WHITE)
        };
        frame.render_widget(
            Paragraph::new(Span::styled("Max data usage (GB)", label_style)),
            Rect::new(area.x, area.y, area.width, 1),
        );

        let border_color = if self.focused {
            theme::ELECTRIC_PURPLE
        } else {
            theme::BORDER_GRAY
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(border_color));
        let block_area = Rect::new(area.x, area.y + 1, area.width, 3.min(area.height - 1));
        let inner = block.inner(block_area);
        frame.render_widget(block, block_area);

        let text = if self.focused {
            format!("{}\u{2588}", self.input)
        } else {
            self.input.clone()
        };
        frame.render_widget(
            Paragraph::new(Span::styled(text, Style::default().fg(theme::NEON_CYAN))),
            inner,
        );
    }

    fn focused(&self) -> bool {
        self.focused
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }
}
