//! Application state and the main event/action loop.
//!
//! Events from the terminal become Actions; Actions mutate state and
//! fan out to every component. Backend calls run on spawned tasks and
//! report back through the same action channel.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Clear, Paragraph};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use wgdash_config::Config;
use wgdash_core::{ClientId, Controller};

use crate::action::{Action, Notification, NotificationLevel};
use crate::component::Component;
use crate::components::{AddClientForm, CeilingInput, ClientsTable};
use crate::data_bridge::spawn_data_bridge;
use crate::download;
use crate::event::{Event, EventReader};
use crate::theme;
use crate::tui::Tui;

/// Housekeeping tick interval (notification expiry).
const TICK_RATE: Duration = Duration::from_millis(250);
/// Render interval, ~30 FPS.
const RENDER_RATE: Duration = Duration::from_millis(33);
/// How long a toast stays on screen.
const NOTIFICATION_TTL: Duration = Duration::from_secs(3);

/// Which element receives keyboard input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Focus {
    Table,
    Ceiling,
    AddForm,
}

pub struct App {
    controller: Controller,
    focus: Focus,
    table: ClientsTable,
    ceiling: CeilingInput,
    add_form: AddClientForm,
    download_dir: PathBuf,
    client_count: usize,
    notification: Option<(Notification, Instant)>,
    action_tx: mpsc::UnboundedSender<Action>,
    action_rx: mpsc::UnboundedReceiver<Action>,
    should_quit: bool,
}

impl App {
    pub fn new(controller: Controller, config: &Config) -> Self {
        let (action_tx, action_rx) = mpsc::unbounded_channel();
        let ceiling_gb = config.ui.ceiling_gb;
        Self {
            controller,
            focus: Focus::Table,
            table: ClientsTable::new(ceiling_gb),
            ceiling: CeilingInput::new(ceiling_gb),
            add_form: AddClientForm::new(),
            download_dir: download::resolve_download_dir(config.ui.download_dir.as_deref()),
            client_count: 0,
            notification: None,
            action_tx,
            action_rx,
            should_quit: false,
        }
    }

    pub async fn run(mut self) -> Result<()> {
        let mut tui = Tui::new()?;
        tui.enter()?;

        let mut events = EventReader::new(TICK_RATE, RENDER_RATE);
        let bridge_cancel = CancellationToken::new();
        let bridge = spawn_data_bridge(
            self.controller.clone(),
            self.action_tx.clone(),
            bridge_cancel.clone(),
        );

        while !self.should_quit {
            let Some(event) = events.next().await else {
                break;
            };
            if let Some(action) = self.map_event(event)? {
                let _ = self.action_tx.send(action);
            }
            while let Ok(action) = self.action_rx.try_recv() {
                self.process_action(&mut tui, action)?;
            }
        }

        // Stop polling before tearing the terminal down; the bridge
        // shuts the controller down on its way out.
        bridge_cancel.cancel();
        let _ = bridge.await;
        events.stop();
        tui.exit()?;
        Ok(())
    }

    // ── Event mapping ──────────────────────────────────────────────

    fn map_event(&mut self, event: Event) -> Result<Option<Action>> {
        match event {
            Event::Tick => Ok(Some(Action::Tick)),
            Event::Render => Ok(Some(Action::Render)),
            Event::Resize(w, h) => Ok(Some(Action::Resize(w, h))),
            Event::Key(key) => self.map_key(key),
        }
    }

    fn map_key(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        // Ctrl+C always quits, regardless of focus.
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Ok(Some(Action::Quit));
        }
        if key.code == KeyCode::Tab {
            return Ok(Some(Action::FocusNext));
        }
        // 'q' only quits from the table; in the inputs it is text.
        if self.focus == Focus::Table && key.code == KeyCode::Char('q') {
            return Ok(Some(Action::Quit));
        }
        let component: &mut dyn Component = match self.focus {
            Focus::Table => &mut self.table,
            Focus::Ceiling => &mut self.ceiling,
            Focus::AddForm => &mut self.add_form,
        };
        component.handle_key_event(key)
    }

    // ── Action processing ──────────────────────────────────────────

    fn process_action(&mut self, tui: &mut Tui, action: Action) -> Result<()> {
        match &action {
            Action::Quit => self.should_quit = true,
            Action::Tick => self.expire_notification(),
            Action::Render => {
                tui.draw(|frame| self.render(frame))?;
            }
            // ratatui re-lays out on the next draw
            Action::Resize(_, _) => {}
            Action::FocusNext => self.cycle_focus(),
            Action::FocusTable => self.set_focus(Focus::Table),
            Action::FocusCeiling => self.set_focus(Focus::Ceiling),
            Action::FocusAddForm => self.set_focus(Focus::AddForm),
            Action::ClientsUpdated(clients) => self.client_count = clients.len(),
            Action::CeilingChanged(gb) => {
                self.notify(Notification::info(format!("Usage ceiling set to {gb} GB")));
            }
            Action::RequestCreateClient(name) => self.spawn_create(name.clone()),
            Action::RequestDeleteClient(id) => self.spawn_delete(*id),
            Action::RequestDownloadConfig(id) => self.spawn_download(*id),
            Action::Notify(notification) => self.notify(notification.clone()),
        }

        // Every component sees every action; follow-ups queue for the
        // next drain.
        let tx = self.action_tx.clone();
        for component in self.components_mut() {
            if let Some(follow_up) = component.update(&action)? {
                let _ = tx.send(follow_up);
            }
        }
        Ok(())
    }

    fn components_mut(&mut self) -> [&mut dyn Component; 3] {
        [&mut self.table, &mut self.ceiling, &mut self.add_form]
    }

    fn cycle_focus(&mut self) {
        let next = match self.focus {
            Focus::Table => Focus::Ceiling,
            Focus::Ceiling => Focus::AddForm,
            Focus::AddForm => Focus::Table,
        };
        self.set_focus(next);
    }

    fn set_focus(&mut self, focus: Focus) {
        self.focus = focus;
        self.table.set_focused(focus == Focus::Table);
        self.ceiling.set_focused(focus == Focus::Ceiling);
        self.add_form.set_focused(focus == Focus::AddForm);
    }

    // ── Backend commands ───────────────────────────────────────────

    /// Create a peer. Fire-and-forget: the new row arrives with the
    /// next poll, failures only go to the log.
    fn spawn_create(&self, name: String) {
        let controller = self.controller.clone();
        tokio::spawn(async move {
            match controller.add_client(&name).await {
                Ok(id) => info!(id, name = %name, "client created"),
                Err(e) => warn!(error = %e, name = %name, "create client failed"),
            }
        });
    }

    /// Delete a peer without confirmation; the row disappears with
    /// the next poll.
    fn spawn_delete(&self, id: ClientId) {
        let controller = self.controller.clone();
        tokio::spawn(async move {
            match controller.remove_client(id).await {
                Ok(()) => info!(id, "client deleted"),
                Err(e) => warn!(error = %e, id, "delete client failed"),
            }
        });
    }

    /// Fetch a peer's tunnel config and write it to the download
    /// directory, reporting the outcome as a toast.
    fn spawn_download(&self, id: ClientId) {
        let name = self
            .controller
            .store()
            .client_by_id(id)
            .map(|client| client.name.clone())
            .unwrap_or_default();
        let file_name = download::config_file_name(&name, id);
        let dir = self.download_dir.clone();
        let controller = self.controller.clone();
        let tx = self.action_tx.clone();
        tokio::spawn(async move {
            let notification = match controller.fetch_config(id).await {
                Ok(contents) => match download::write_config(&dir, &file_name, &contents) {
                    Ok(path) => {
                        info!(id, path = %path.display(), "config downloaded");
                        Notification::success(format!("Saved {}", path.display()))
                    }
                    Err(e) => Notification::error(format!("Could not write config: {e}")),
                },
                Err(e) => Notification::error(format!("Download failed: {e}")),
            };
            let _ = tx.send(Action::Notify(notification));
        });
    }

    // ── Notifications ──────────────────────────────────────────────

    fn notify(&mut self, notification: Notification) {
        self.notification = Some((notification, Instant::now()));
    }

    fn expire_notification(&mut self) {
        if let Some((_, created)) = &self.notification {
            if created.elapsed() > NOTIFICATION_TTL {
                self.notification = None;
            }
        }
    }

    // ── Rendering ──────────────────────────────────────────────────

    fn render(&self, frame: &mut Frame) {
        let [title_area, inputs_area, table_area, status_area] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(4),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .areas(frame.area());

        self.render_title(frame, title_area);

        let [ceiling_area, _, add_area] = Layout::horizontal([
            Constraint::Length(26),
            Constraint::Length(2),
            Constraint::Min(24),
        ])
        .areas(inputs_area);
        self.ceiling.render(frame, ceiling_area);
        self.add_form.render(frame, add_area);

        self.table.render(frame, table_area);
        self.render_status_bar(frame, status_area);
        self.render_notification(frame);
    }

    fn render_title(&self, frame: &mut Frame, area: Rect) {
        let count_label = if self.client_count == 1 {
            "1 client".to_string()
        } else {
            format!("{} clients", self.client_count)
        };
        let line = Line::from(vec![
            Span::styled("WireGuard dashboard", theme::title_style()),
            Span::styled(format!("   {count_label}"), theme::key_hint()),
        ]);
        frame.render_widget(Paragraph::new(line), area);
    }

    fn render_status_bar(&self, frame: &mut Frame, area: Rect) {
        let hints: &[(&str, &str)] = match self.focus {
            Focus::Table => &[
                ("j/k", "move"),
                ("a", "add"),
                ("m", "ceiling"),
                ("d", "download config"),
                ("x", "delete"),
                ("q", "quit"),
            ],
            Focus::Ceiling => &[("Enter", "apply"), ("Esc", "back"), ("Tab", "next field")],
            Focus::AddForm => &[
                ("Enter", "create client"),
                ("Esc", "back"),
                ("Tab", "next field"),
            ],
        };
        let mut spans = Vec::with_capacity(hints.len() * 2);
        for (key, desc) in hints {
            spans.push(Span::styled(format!(" {key} "), theme::key_hint_key()));
            spans.push(Span::styled(format!("{desc}  "), theme::key_hint()));
        }
        frame.render_widget(
            Paragraph::new(Line::from(spans)).style(theme::status_bar()),
            area,
        );
    }

    /// Bottom-right toast, drawn above the status bar.
    #[allow(clippy::cast_possible_truncation, clippy::as_conversions)]
    fn render_notification(&self, frame: &mut Frame) {
        let Some((notification, _)) = &self.notification else {
            return;
        };
        let area = frame.area();
        let width = (notification.message.len() as u16 + 6)
            .clamp(20, 60)
            .min(area.width);
        let height = 3u16;
        if area.height < height + 1 {
            return;
        }
        let rect = Rect::new(
            area.width.saturating_sub(width + 1),
            area.height.saturating_sub(height + 1),
            width,
            height,
        );
        let (color, icon) = match notification.level {
            NotificationLevel::Success => (theme::SUCCESS_GREEN, "✓"),
            NotificationLevel::Error => (theme::ERROR_RED, "✗"),
            NotificationLevel::Info => (theme::NEON_CYAN, "·"),
        };
        frame.render_widget(Clear, rect);
        let paragraph = Paragraph::new(Line::from(vec![
            Span::styled(format!(" {icon} "), Style::default().fg(color)),
            Span::styled(
                notification.message.clone(),
                Style::default().fg(theme::DIM_WHITE),
            ),
        ]))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(color)),
        );
        frame.render_widget(paragraph, rect);
    }
}
