use crossterm::event::{Event, KeyCode};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Layout, Margin, Rect},
    style::{Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, BorderType, Clear, Paragraph, Wrap},
};
use tokio::sync::oneshot;

use crate::notify::ConfirmRequest;
use crate::widgets::{Popup, Widget, theme::Theme};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Selection {
    Confirm,
    Cancel,
}

/// Modal confirmation dialog. Answers the originating `confirm()` call over
/// its oneshot channel; dropping the popup counts as a dismissal.
pub struct ConfirmPopup {
    title: String,
    message: String,
    confirm_label: String,
    cancel_label: String,
    selection: Selection,
    respond: Option<oneshot::Sender<bool>>,
}

impl ConfirmPopup {
    pub fn new(request: ConfirmRequest) -> Self {
        Self {
            title: request.title,
            message: request.message,
            confirm_label: "Delete".to_string(),
            cancel_label: "cancel".to_string(),
            // Default to the safe choice.
            selection: Selection::Cancel,
            respond: Some(request.respond),
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.respond.is_none()
    }

    fn answer(&mut self, affirmative: bool) {
        if let Some(tx) = self.respond.take() {
            let _ = tx.send(affirmative);
        }
    }
}

impl Widget for ConfirmPopup {
    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        frame.render_widget(Clear, area);
        let title = Line::styled(
            format!(" {} ", self.title),
            Style::default()
                .fg(theme.error())
                .add_modifier(Modifier::BOLD),
        )
        .centered();
        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .title(title)
            .border_style(Style::default().fg(theme.error()))
            .style(Style::default().bg(theme.panel_bg()).fg(theme.text()));

        frame.render_widget(block.clone(), area);
        let inner = block.inner(area).inner(Margin::new(1, 1));
        let layout = Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).split(inner);

        let body = Paragraph::new(Text::from(self.message.as_str()))
            .style(Style::default().fg(theme.text()))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });
        frame.render_widget(body, layout[0]);

        let confirm_style = if self.selection == Selection::Confirm {
            Style::default()
                .bg(theme.error())
                .fg(theme.selection_fg())
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default()
                .fg(theme.error())
                .add_modifier(Modifier::BOLD)
        };
        let cancel_style = if self.selection == Selection::Cancel {
            Style::default()
                .bg(theme.selection_bg())
                .fg(theme.selection_fg())
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(theme.text())
        };
        let buttons = Line::from(vec![
            Span::styled(format!("[ {} ]", self.confirm_label), confirm_style),
            Span::raw("  "),
            Span::styled(format!("[ {} ]", self.cancel_label), cancel_style),
        ]);
        let footer = Paragraph::new(Text::from(buttons)).alignment(Alignment::Center);
        frame.render_widget(footer, layout[1]);
    }

    fn handle_event(&mut self, event: &Event) -> bool {
        let Some(key) = event.as_key_press_event() else {
            return true;
        };
        match key.code {
            KeyCode::Left | KeyCode::Right | KeyCode::Tab | KeyCode::BackTab => {
                self.selection = match self.selection {
                    Selection::Confirm => Selection::Cancel,
                    Selection::Cancel => Selection::Confirm,
                };
            }
            KeyCode::Enter => {
                let affirmative = self.selection == Selection::Confirm;
                self.answer(affirmative);
            }
            KeyCode::Esc => self.answer(false),
            _ => {}
        }
        true
    }
}

impl Popup for ConfirmPopup {
    fn rect(&self, area: Rect) -> Rect {
        let width = (area.width as f32 * 0.4) as u16;
        let height = (area.height as f32 * 0.18) as u16;
        let width = width.max(34).min(area.width.saturating_sub(4));
        let height = height.max(7).min(area.height.saturating_sub(4));
        let x = area.x + (area.width.saturating_sub(width)) / 2;
        let y = area.y + (area.height.saturating_sub(height)) / 2;
        Rect {
            x,
            y,
            width,
            height,
        }
    }
}
