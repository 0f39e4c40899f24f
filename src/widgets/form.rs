use crossterm::event::{Event, KeyCode, KeyModifiers};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::Line,
    widgets::{Block, BorderType, Paragraph},
};
use unicode_width::UnicodeWidthStr;

use stockmate::form::{Draft, EditSession};

use crate::widgets::theme::Theme;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum FormField {
    Name,
    Price,
    Qty,
}

impl FormField {
    const ALL: [FormField; 3] = [FormField::Name, FormField::Price, FormField::Qty];

    fn label(self) -> &'static str {
        match self {
            FormField::Name => "Product",
            FormField::Price => "Price",
            FormField::Qty => "Quantity",
        }
    }

    fn index(self) -> usize {
        Self::ALL.iter().position(|field| *field == self).unwrap()
    }
}

/// The add/edit panel. The draft itself lives in the shared app state; this
/// widget only tracks which field has focus and where the cursor sits.
pub struct FormPanel {
    field: FormField,
    cursor: usize,
}

impl FormPanel {
    pub fn new() -> Self {
        Self {
            field: FormField::Name,
            cursor: 0,
        }
    }

    /// Refocus the first field and park the cursor at the end of its value.
    /// Called whenever the draft is replaced (new item, begin edit, cancel).
    pub fn reset(&mut self, draft: &Draft) {
        self.field = FormField::Name;
        self.cursor = draft.name.len();
    }

    pub fn next_field(&mut self, draft: &Draft) {
        let next = (self.field.index() + 1) % FormField::ALL.len();
        self.focus(FormField::ALL[next], draft);
    }

    pub fn prev_field(&mut self, draft: &Draft) {
        let len = FormField::ALL.len();
        let prev = (self.field.index() + len - 1) % len;
        self.focus(FormField::ALL[prev], draft);
    }

    fn focus(&mut self, field: FormField, draft: &Draft) {
        self.field = field;
        self.cursor = self.value(draft).len();
    }

    fn value<'a>(&self, draft: &'a Draft) -> &'a str {
        match self.field {
            FormField::Name => &draft.name,
            FormField::Price => &draft.price,
            FormField::Qty => &draft.qty,
        }
    }

    fn value_mut<'a>(&self, draft: &'a mut Draft) -> &'a mut String {
        match self.field {
            FormField::Name => &mut draft.name,
            FormField::Price => &mut draft.price,
            FormField::Qty => &mut draft.qty,
        }
    }

    /// Line editing for the focused field. Returns true when the event was
    /// consumed.
    pub fn handle_key(&mut self, event: &Event, draft: &mut Draft) -> bool {
        let Some(key) = event.as_key_press_event() else {
            return false;
        };
        // The draft may have been replaced behind our back.
        self.cursor = self.cursor.min(self.value(draft).len());

        if key.modifiers.contains(KeyModifiers::CONTROL) {
            match key.code {
                KeyCode::Char('a') => self.cursor = 0,
                KeyCode::Char('e') => self.cursor = self.value(draft).len(),
                KeyCode::Char('u') => {
                    self.value_mut(draft).replace_range(..self.cursor, "");
                    self.cursor = 0;
                }
                _ => return false,
            }
            return true;
        }

        match key.code {
            KeyCode::Char(c) => {
                self.value_mut(draft).insert(self.cursor, c);
                self.cursor += c.len_utf8();
            }
            KeyCode::Backspace => {
                let value = self.value_mut(draft);
                if let Some((idx, c)) = value[..self.cursor].char_indices().next_back() {
                    value.remove(idx);
                    self.cursor -= c.len_utf8();
                }
            }
            KeyCode::Delete => {
                let value = self.value_mut(draft);
                if self.cursor < value.len() {
                    value.remove(self.cursor);
                }
            }
            KeyCode::Left => {
                if let Some((idx, _)) = self.value(draft)[..self.cursor].char_indices().next_back()
                {
                    self.cursor = idx;
                }
            }
            KeyCode::Right => {
                let value = self.value(draft);
                if let Some(c) = value[self.cursor..].chars().next() {
                    self.cursor += c.len_utf8();
                }
            }
            KeyCode::Home => self.cursor = 0,
            KeyCode::End => self.cursor = self.value(draft).len(),
            _ => return false,
        }
        true
    }

    pub fn render(
        &mut self,
        frame: &mut Frame,
        area: Rect,
        theme: &Theme,
        session: &EditSession,
        focused: bool,
    ) {
        let (title, title_color) = if session.is_editing() {
            (" Edit item ", theme.accent_alt())
        } else {
            (" Add item ", theme.accent())
        };
        let border = if focused {
            Style::default().fg(title_color)
        } else {
            Style::default().fg(theme.border())
        };
        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .title(Line::styled(
                title,
                Style::default().fg(title_color).add_modifier(Modifier::BOLD),
            ))
            .border_style(border)
            .style(Style::default().bg(theme.panel_bg()).fg(theme.text()));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let [name_area, price_area, qty_area, hint_area] = inner.layout(&Layout::vertical([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(1),
        ]));
        let fields = [
            (FormField::Name, name_area, session.draft.name.as_str()),
            (FormField::Price, price_area, session.draft.price.as_str()),
            (FormField::Qty, qty_area, session.draft.qty.as_str()),
        ];
        for (field, field_area, value) in fields {
            let active = focused && field == self.field;
            let field_border = if active {
                Style::default().fg(title_color)
            } else {
                Style::default().fg(theme.border())
            };
            let input = Paragraph::new(value).style(Style::default().fg(theme.text())).block(
                Block::bordered()
                    .title(Line::styled(
                        field.label(),
                        Style::default().fg(theme.text_muted()),
                    ))
                    .border_style(field_border)
                    .style(Style::default().bg(theme.panel_bg_alt())),
            );
            frame.render_widget(input, field_area);
            if active {
                let cursor = self.cursor.min(value.len());
                let offset = UnicodeWidthStr::width(&value[..cursor]) as u16;
                frame.set_cursor_position((field_area.x + 1 + offset, field_area.y + 1));
            }
        }

        let hint = Paragraph::new(Line::styled(
            " tab field · enter save · esc cancel",
            Style::default().fg(theme.text_muted()),
        ));
        frame.render_widget(hint, hint_area);
    }
}
