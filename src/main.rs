mod notify;
mod subcommands;
mod widgets;

use std::time::{Duration, Instant};

use clap::{Parser, Subcommand};
use color_eyre::eyre::Result;
use crossterm::event::{Event, EventStream, KeyCode};
use ratatui::{
    DefaultTerminal, Frame,
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Text},
    widgets::{Block, BorderType, Clear, Paragraph, Wrap},
};
use tokio::sync::mpsc::{self, UnboundedReceiver};
use tokio_stream::StreamExt;

use stockmate::store::DynamoStore;
use stockmate::sync::{NoticeKind, SyncController};
use stockmate::{aws, logging};

use crate::notify::{Message, Notice, TuiNotifier};
use crate::widgets::theme::Theme;
use crate::widgets::{ConfirmPopup, InventoryWidget, Popup, Widget};

const FRAMES_PER_SECOND: f32 = 30.0;

#[derive(Parser)]
#[command(name = "stockmate", version, about = "Terminal inventory tracker")]
struct Cli {
    /// Increase log verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Inventory table name
    #[arg(long, global = true, default_value = stockmate::store::DEFAULT_TABLE)]
    table: String,

    /// Custom endpoint, e.g. a local DynamoDB on http://localhost:8000
    #[arg(long)]
    endpoint_url: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Create the inventory table and wait for it to become active
    InitTable,
    /// Print the inventory without entering the TUI
    List {
        /// Emit a JSON array instead of a text table
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    rustls::crypto::aws_lc_rs::default_provider()
        .install_default()
        .expect("failed to install rustls crypto provider");
    color_eyre::install()?;

    let cli = Cli::parse();
    logging::init(cli.verbose)?;

    let client = aws::new_client(cli.endpoint_url.as_deref()).await?;
    match cli.command {
        Some(Command::InitTable) => subcommands::init_table::command(&client, &cli.table).await,
        Some(Command::List { json }) => {
            subcommands::list::command(&client, &cli.table, &subcommands::list::Options { json })
                .await
        }
        None => {
            aws::validate_connection(&client, &cli.table).await?;
            let store = DynamoStore::new(client, &cli.table);
            App::new(store).run_tui().await
        }
    }
}

struct ActiveToast {
    notice: Notice,
    deadline: Instant,
}

struct App {
    should_quit: bool,
    theme: Theme,
    inventory: InventoryWidget,
    popup: Option<ConfirmPopup>,
    toast: Option<ActiveToast>,
    rx: UnboundedReceiver<Message>,
}

impl App {
    fn new(store: DynamoStore) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let controller = SyncController::new(store, TuiNotifier::new(tx));
        Self {
            should_quit: false,
            theme: Theme::default(),
            inventory: InventoryWidget::new(controller),
            popup: None,
            toast: None,
            rx,
        }
    }

    async fn run_tui(self) -> Result<()> {
        let terminal = ratatui::init();
        let result = self.run(terminal).await;
        ratatui::restore();
        result
    }

    async fn run(mut self, mut terminal: DefaultTerminal) -> Result<()> {
        self.inventory.start();

        let period = Duration::from_secs_f32(1.0 / FRAMES_PER_SECOND);
        let mut interval = tokio::time::interval(period);
        let mut events = EventStream::new();

        while !self.should_quit {
            tokio::select! {
                _ = interval.tick() => {
                    self.expire_toast();
                    terminal.draw(|frame| self.render(frame))?;
                }
                Some(Ok(event)) = events.next() => self.handle_event(&event),
                Some(message) = self.rx.recv() => self.handle_message(message),
            }
        }
        Ok(())
    }

    fn render(&mut self, frame: &mut Frame) {
        let theme = self.theme;
        frame.render_widget(Block::new().style(Style::default().bg(theme.bg())), frame.area());

        let [title_area, body_area] = frame
            .area()
            .layout(&Layout::vertical([Constraint::Length(1), Constraint::Fill(1)]));
        let title = Line::styled(
            " stockmate",
            Style::default().fg(theme.accent()).add_modifier(Modifier::BOLD),
        );
        frame.render_widget(title, title_area);

        self.inventory.render(frame, body_area, &theme);

        if let Some(popup) = &mut self.popup {
            let area = popup.rect(body_area);
            frame.render_widget(Clear, area);
            popup.render(frame, area, &theme);
        }
        if let Some(toast) = &self.toast {
            render_toast(frame, body_area, &theme, &toast.notice);
        }
    }

    fn handle_event(&mut self, event: &Event) {
        if let Some(popup) = &mut self.popup {
            popup.handle_event(event);
            if popup.is_resolved() {
                self.popup = None;
            }
            return;
        }
        if self.inventory.handle_event(event) {
            return;
        }
        if let Some(key) = event.as_key_press_event()
            && matches!(key.code, KeyCode::Char('q') | KeyCode::Esc)
        {
            self.should_quit = true;
        }
    }

    fn handle_message(&mut self, message: Message) {
        match message {
            Message::Toast(notice) => {
                let ttl = match notice.kind {
                    NoticeKind::Error => Duration::from_secs(4),
                    NoticeKind::Success => Duration::from_secs(2),
                };
                self.toast = Some(ActiveToast {
                    notice,
                    deadline: Instant::now() + ttl,
                });
            }
            Message::Confirm(request) => self.popup = Some(ConfirmPopup::new(request)),
        }
    }

    fn expire_toast(&mut self) {
        if let Some(toast) = &self.toast
            && Instant::now() >= toast.deadline
        {
            self.toast = None;
        }
    }
}

fn render_toast(frame: &mut Frame, area: Rect, theme: &Theme, notice: &Notice) {
    let width = 42.min(area.width.saturating_sub(2));
    let body_lines = notice.body.as_deref().map_or(0, |body| {
        body.len().div_ceil(width.saturating_sub(2).max(1) as usize) as u16
    });
    let height = (2 + body_lines).min(area.height);
    let rect = Rect {
        x: area.x + area.width.saturating_sub(width + 1),
        y: area.y + area.height.saturating_sub(height + 1),
        width,
        height,
    };

    let color = match notice.kind {
        NoticeKind::Success => theme.success(),
        NoticeKind::Error => theme.error(),
    };
    let block = Block::bordered()
        .border_type(BorderType::Rounded)
        .title(Line::styled(
            format!(" {} ", notice.title),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ))
        .border_style(Style::default().fg(color))
        .style(Style::default().bg(theme.panel_bg()).fg(theme.text()));

    frame.render_widget(Clear, rect);
    let body = Paragraph::new(Text::from(notice.body.as_deref().unwrap_or_default()))
        .wrap(Wrap { trim: true })
        .block(block);
    frame.render_widget(body, rect);
}
