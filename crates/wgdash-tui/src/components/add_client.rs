//! The create-client form: a single name field submitted with Enter.

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::Span;
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};

use crate::action::Action;
use crate::component::Component;
use crate::theme;

pub struct AddClientForm {
    name: String,
    focused: bool,
}

impl AddClientForm {
    pub fn new() -> Self {
        Self {
            name: String::new(),
            focused: false,
        }
    }
}

impl Component for AddClientForm {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let action = match key.code {
            KeyCode::Enter => {
                // The backend takes the name as-is; no client-side
                // validation. The field clears on submit and the new
                // row shows up with the next poll.
                let name = std::mem::take(&mut self.name);
                Some(Action::RequestCreateClient(name))
            }
            KeyCode::Esc => {
                self.name.clear();
                Some(Action::FocusTable)
            }
            KeyCode::Backspace => {
                self.name.pop();
                None
            }
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.name.push(c);
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
            Paragraph::new(Span::styled("Name (Enter creates the client)", label_style)),
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
            format!("{}\u{2588}", self.name)
        } else {
            self.name.clone()
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
