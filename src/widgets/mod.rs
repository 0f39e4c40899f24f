use crossterm::event::Event;
use ratatui::{Frame, layout::Rect};

pub mod confirm;
pub mod form;
pub mod inventory;
pub mod theme;

pub use confirm::ConfirmPopup;
pub use inventory::InventoryWidget;

use theme::Theme;

pub trait Widget {
    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme);

    /// Handle input events. Returns true if the event was handled.
    fn handle_event(&mut self, _event: &Event) -> bool {
        false
    }
}

pub trait Popup: Widget {
    fn rect(&self, area: Rect) -> Rect;
}
