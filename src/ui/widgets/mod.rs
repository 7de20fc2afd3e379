pub mod composer;
pub mod contact;
pub mod landing;
pub mod photos;

use crate::composer::ComposerCommand;
use crate::feeds::{FeedData, FeedFetcher};
use crate::post::ArtisanContact;
use crossterm::event::KeyEvent;
use ratatui::{layout::Rect, Frame};
use std::any::Any;

/// Something a widget wants the app to do after handling a key.
#[derive(Debug, Clone, PartialEq)]
pub enum WidgetAction {
    Composer(ComposerCommand),
    ContactSubmitted(ArtisanContact),
}

pub trait FeedWidget: Send {
    fn id(&self) -> String;
    fn title(&self) -> &str;
    fn position(&self) -> (usize, usize);
    fn render(&self, frame: &mut Frame, area: Rect, selected: bool);
    fn update_data(&mut self, data: FeedData);

    /// Background loader for this pane, if it has one.
    fn create_fetcher(&self) -> Option<Box<dyn FeedFetcher>> {
        None
    }

    fn scroll_up(&mut self);
    fn scroll_down(&mut self);
    fn set_selected(&mut self, selected: bool);

    fn handle_key(&mut self, _key: KeyEvent) -> Option<WidgetAction> {
        None
    }

    /// While true the widget receives every key, including app bindings.
    fn is_modal_open(&self) -> bool {
        false
    }

    fn as_any(&self) -> Option<&dyn Any> {
        None
    }

    fn as_any_mut(&mut self) -> Option<&mut dyn Any> {
        None
    }
}

pub(crate) fn border_style(selected: bool) -> ratatui::style::Style {
    use ratatui::style::{Color, Style};
    if selected {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::White)
    }
}

pub(crate) fn center_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    use ratatui::layout::{Constraint, Direction, Layout};

    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
