use async_trait::async_trait;
use tokio::sync::{mpsc::UnboundedSender, oneshot};

use stockmate::sync::{NoticeKind, Notifier};

#[derive(Debug, Clone)]
pub struct Notice {
    pub kind: NoticeKind,
    pub title: String,
    pub body: Option<String>,
}

pub struct ConfirmRequest {
    pub title: String,
    pub message: String,
    pub respond: oneshot::Sender<bool>,
}

pub enum Message {
    Toast(Notice),
    Confirm(ConfirmRequest),
}

/// Notifier for the TUI: toasts and confirm dialogs travel over the app
/// message channel; `confirm` suspends on a oneshot until the popup answers.
#[derive(Clone)]
pub struct TuiNotifier {
    tx: UnboundedSender<Message>,
}

impl TuiNotifier {
    pub fn new(tx: UnboundedSender<Message>) -> Self {
        Self { tx }
    }
}

#[async_trait]
impl Notifier for TuiNotifier {
    fn notify(&self, kind: NoticeKind, title: &str, body: Option<&str>) {
        let _ = self.tx.send(Message::Toast(Notice {
            kind,
            title: title.to_string(),
            body: body.map(str::to_string),
        }));
    }

    async fn confirm(&self, title: &str, body: &str) -> bool {
        let (tx, rx) = oneshot::channel();
        let sent = self.tx.send(Message::Confirm(ConfirmRequest {
            title: title.to_string(),
            message: body.to_string(),
            respond: tx,
        }));
        if sent.is_err() {
            return false;
        }
        // A dropped popup counts as a dismissal.
        rx.await.unwrap_or(false)
    }
}
