use std::sync::{Arc, RwLock};

use crossterm::event::{Event, KeyCode, KeyModifiers};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, BorderType, Cell, Paragraph, Row, Table, TableState, Wrap},
};
use throbber_widgets_tui::{Throbber, ThrobberState};

use stockmate::metrics::{self, StockLevel};
use stockmate::model::InventoryItem;
use stockmate::store::DynamoStore;
use stockmate::sync::{AppState, LoadingState, SyncController};

use crate::notify::TuiNotifier;
use crate::widgets::form::FormPanel;
use crate::widgets::{Widget, theme::Theme};

type Controller = SyncController<DynamoStore, TuiNotifier>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Focus {
    Table,
    Form,
}

/// The main screen: summary panel, add/edit form, and the stock table.
pub struct InventoryWidget {
    controller: Controller,
    state: Arc<RwLock<AppState>>,
    table_state: TableState,
    throbber: ThrobberState,
    form: FormPanel,
    focus: Focus,
}

impl InventoryWidget {
    pub fn new(controller: Controller) -> Self {
        let state = controller.state();
        Self {
            controller,
            state,
            table_state: TableState::default(),
            throbber: ThrobberState::default(),
            form: FormPanel::new(),
            focus: Focus::Table,
        }
    }

    /// Kick off the initial listing.
    pub fn start(&self) {
        let ctrl = self.controller.clone();
        tokio::spawn(async move { ctrl.refresh().await });
    }

    fn selected_item(&self, items: &[InventoryItem]) -> Option<InventoryItem> {
        self.table_state
            .selected()
            .and_then(|index| items.get(index))
            .cloned()
    }

    fn clamp_selection(&mut self, len: usize) {
        match self.table_state.selected() {
            Some(_) if len == 0 => self.table_state.select(None),
            Some(index) if index >= len => self.table_state.select(Some(len - 1)),
            None if len > 0 => self.table_state.select(Some(0)),
            _ => {}
        }
    }

    fn render_summary(&mut self, frame: &mut Frame, area: Rect, theme: &Theme, state: &AppState) {
        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .title(Line::styled(
                " Summary ",
                Style::default().fg(theme.accent()).add_modifier(Modifier::BOLD),
            ))
            .border_style(Style::default().fg(theme.border()))
            .style(Style::default().bg(theme.panel_bg()).fg(theme.text()));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let [total_area, count_area, status_area] = inner.layout(&Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ]));

        let total = metrics::total_value(&state.items);
        let total_line = Line::from(vec![
            Span::styled("Total value  ", Style::default().fg(theme.text_muted())),
            Span::styled(
                format!("${total}"),
                Style::default().fg(theme.success()).add_modifier(Modifier::BOLD),
            ),
        ]);
        frame.render_widget(Paragraph::new(total_line), total_area);

        let count_line = Line::from(vec![
            Span::styled("Products     ", Style::default().fg(theme.text_muted())),
            Span::styled(state.items.len().to_string(), Style::default().fg(theme.text())),
        ]);
        frame.render_widget(Paragraph::new(count_line), count_area);

        if state.loading == LoadingState::Loading {
            let throbber = Throbber::default()
                .label("refreshing")
                .style(Style::default().fg(theme.text_muted()))
                .throbber_style(Style::default().fg(theme.accent()));
            frame.render_stateful_widget(throbber, status_area, &mut self.throbber);
            self.throbber.calc_next();
        }
    }

    fn render_table(&mut self, frame: &mut Frame, area: Rect, theme: &Theme, state: &AppState) {
        let status = match &state.loading {
            LoadingState::Loading => "loading…".to_string(),
            LoadingState::Failed(_) => "fetch failed".to_string(),
            LoadingState::Idle => format!("{} items", state.items.len()),
        };
        let border = if self.focus == Focus::Table {
            Style::default().fg(theme.accent())
        } else {
            Style::default().fg(theme.border())
        };
        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .title(Line::styled(
                " Inventory ",
                Style::default().fg(theme.accent()).add_modifier(Modifier::BOLD),
            ))
            .title(
                Line::styled(
                    format!(" {status} "),
                    Style::default().fg(theme.text_muted()),
                )
                .right_aligned(),
            )
            .title_bottom(Line::styled(
                " j/k move · n new · e edit · ^d delete · r refresh · q quit ",
                Style::default().fg(theme.text_muted()),
            ))
            .border_style(border)
            .style(Style::default().bg(theme.panel_bg()).fg(theme.text()));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        if let LoadingState::Failed(message) = &state.loading {
            let banner = Paragraph::new(Text::from(vec![
                Line::raw(""),
                Line::styled(
                    message.as_str(),
                    Style::default().fg(theme.error()).add_modifier(Modifier::BOLD),
                ),
                Line::styled("press r to retry", Style::default().fg(theme.text_muted())),
            ]))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });
            frame.render_widget(banner, inner);
            return;
        }

        if state.items.is_empty() {
            if state.loading == LoadingState::Idle {
                let empty = Paragraph::new(Text::from(vec![
                    Line::raw(""),
                    Line::styled(
                        "No items yet — press n to add one",
                        Style::default().fg(theme.text_muted()),
                    ),
                ]))
                .alignment(Alignment::Center);
                frame.render_widget(empty, inner);
            }
            return;
        }

        let header = Row::new(vec![
            Cell::from("PRODUCT"),
            Cell::from("QTY"),
            Cell::from(Line::raw("PRICE").right_aligned()),
            Cell::from(Line::raw("TOTAL").right_aligned()),
            Cell::from("ADDED"),
        ])
        .style(Style::default().fg(theme.text_muted()));

        let rows = state.items.iter().map(|item| {
            let qty_cell = match metrics::classify_stock(item) {
                StockLevel::Low => Cell::from(Span::styled(
                    format!("LOW {}", item.qty),
                    Style::default().fg(theme.warning()).add_modifier(Modifier::BOLD),
                )),
                StockLevel::Adequate => Cell::from(item.qty.to_string()),
            };
            Row::new(vec![
                Cell::from(item.name.clone()),
                qty_cell,
                Cell::from(Line::raw(format!("${}", item.price)).right_aligned()),
                Cell::from(Line::raw(format!("${}", metrics::line_total(item))).right_aligned()),
                Cell::from(item.created_at.format("%Y-%m-%d").to_string()),
            ])
        });

        let table = Table::new(
            rows,
            [
                Constraint::Fill(1),
                Constraint::Length(8),
                Constraint::Length(12),
                Constraint::Length(14),
                Constraint::Length(12),
            ],
        )
        .header(header)
        .highlight_symbol("▶ ")
        .row_highlight_style(
            Style::default()
                .bg(theme.selection_bg())
                .fg(theme.selection_fg()),
        );
        frame.render_stateful_widget(table, inner, &mut self.table_state);
    }

    fn handle_table_key(&mut self, code: KeyCode, modifiers: KeyModifiers) -> bool {
        let items = self.state.read().unwrap().items.clone();
        match code {
            KeyCode::Char('j') | KeyCode::Down => {
                self.select_next(items.len());
                true
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.select_prev(items.len());
                true
            }
            KeyCode::Char('r') => {
                let ctrl = self.controller.clone();
                tokio::spawn(async move { ctrl.refresh().await });
                true
            }
            KeyCode::Char('n') => {
                {
                    let mut state = self.state.write().unwrap();
                    state.session.cancel_edit();
                    self.form.reset(&state.session.draft);
                }
                self.focus = Focus::Form;
                true
            }
            KeyCode::Char('e') | KeyCode::Enter => {
                if let Some(item) = self.selected_item(&items) {
                    let mut state = self.state.write().unwrap();
                    state.session.begin_edit(&item);
                    self.form.reset(&state.session.draft);
                    self.focus = Focus::Form;
                }
                true
            }
            KeyCode::Char('d') if modifiers.contains(KeyModifiers::CONTROL) => {
                if let Some(item) = self.selected_item(&items) {
                    let ctrl = self.controller.clone();
                    tokio::spawn(async move { ctrl.remove(&item.id).await });
                }
                true
            }
            KeyCode::Delete => {
                if let Some(item) = self.selected_item(&items) {
                    let ctrl = self.controller.clone();
                    tokio::spawn(async move { ctrl.remove(&item.id).await });
                }
                true
            }
            _ => false,
        }
    }

    fn handle_form_key(&mut self, event: &Event, code: KeyCode) -> bool {
        match code {
            KeyCode::Esc => {
                let mut state = self.state.write().unwrap();
                state.session.cancel_edit();
                self.form.reset(&state.session.draft);
                drop(state);
                self.focus = Focus::Table;
                true
            }
            KeyCode::Tab => {
                let state = self.state.read().unwrap();
                self.form.next_field(&state.session.draft);
                true
            }
            KeyCode::BackTab => {
                let state = self.state.read().unwrap();
                self.form.prev_field(&state.session.draft);
                true
            }
            KeyCode::Enter => {
                let ctrl = self.controller.clone();
                tokio::spawn(async move { ctrl.submit().await });
                true
            }
            _ => {
                let mut state = self.state.write().unwrap();
                self.form.handle_key(event, &mut state.session.draft)
            }
        }
    }

    fn select_next(&mut self, len: usize) {
        if len == 0 {
            return;
        }
        let next = match self.table_state.selected() {
            Some(index) => (index + 1).min(len - 1),
            None => 0,
        };
        self.table_state.select(Some(next));
    }

    fn select_prev(&mut self, len: usize) {
        if len == 0 {
            return;
        }
        let prev = match self.table_state.selected() {
            Some(index) => index.saturating_sub(1),
            None => 0,
        };
        self.table_state.select(Some(prev));
    }
}

impl Widget for InventoryWidget {
    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let snapshot = {
            let state = self.state.read().unwrap();
            AppState {
                items: state.items.clone(),
                loading: state.loading.clone(),
                session: state.session.clone(),
            }
        };
        self.clamp_selection(snapshot.items.len());

        let [left, right] =
            area.layout(&Layout::horizontal([Constraint::Length(38), Constraint::Fill(1)]));
        let [summary_area, form_area, _] = left.layout(&Layout::vertical([
            Constraint::Length(5),
            Constraint::Length(14),
            Constraint::Fill(1),
        ]));

        self.render_summary(frame, summary_area, theme, &snapshot);
        self.form.render(
            frame,
            form_area,
            theme,
            &snapshot.session,
            self.focus == Focus::Form,
        );
        self.render_table(frame, right, theme, &snapshot);
    }

    fn handle_event(&mut self, event: &Event) -> bool {
        let Some(key) = event.as_key_press_event() else {
            return false;
        };
        match self.focus {
            Focus::Form => self.handle_form_key(event, key.code),
            Focus::Table => self.handle_table_key(key.code, key.modifiers),
        }
    }
}
