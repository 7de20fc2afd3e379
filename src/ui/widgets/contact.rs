use crate::config::ContactConfig;
use crate::feeds::FeedData;
use crate::post::ArtisanContact;
use crate::ui::widgets::{border_style, center_rect, FeedWidget, WidgetAction};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};
use std::any::Any;
use std::time::{Duration, Instant};

const POPUP_DURATION: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    ArtisanName,
    PhoneNum,
    Email,
    ShopAddress,
}

impl Field {
    const ALL: [Field; 4] = [
        Field::ArtisanName,
        Field::PhoneNum,
        Field::Email,
        Field::ShopAddress,
    ];

    fn label(self) -> &'static str {
        match self {
            Field::ArtisanName => "Artisan Name",
            Field::PhoneNum => "Phone Number",
            Field::Email => "Email",
            Field::ShopAddress => "Shop Address",
        }
    }

    fn required(self) -> bool {
        !matches!(self, Field::Email)
    }
}

#[derive(Debug, Clone)]
pub struct ContactWidget {
    id: String,
    title: String,
    position: (usize, usize),
    selected: bool,
    values: [String; 4],
    focused: usize,
    editing: bool,
    submitted: Option<ArtisanContact>,
    submitted_at: Option<Instant>,
    error: Option<String>,
}

impl ContactWidget {
    pub fn new(config: ContactConfig) -> Self {
        Self {
            id: format!("contact-{}-{}", config.position.row, config.position.col),
            title: config.title,
            position: (config.position.row, config.position.col),
            selected: false,
            values: Default::default(),
            focused: 0,
            editing: false,
            submitted: None,
            submitted_at: None,
            error: None,
        }
    }

    pub fn open_form(&mut self) {
        self.editing = true;
        self.error = None;
        if let Some(contact) = &self.submitted {
            self.values = [
                contact.artisan_name.clone(),
                contact.phone_num.clone(),
                contact.email.clone(),
                contact.shop_address.clone(),
            ];
        }
    }

    pub fn close_form(&mut self) {
        self.editing = false;
        self.error = None;
    }

    pub fn add_char(&mut self, c: char) {
        self.values[self.focused].push(c);
    }

    pub fn delete_char(&mut self) {
        self.values[self.focused].pop();
    }

    pub fn next_field(&mut self) {
        self.focused = (self.focused + 1) % Field::ALL.len();
    }

    pub fn prev_field(&mut self) {
        self.focused = (self.focused + Field::ALL.len() - 1) % Field::ALL.len();
    }

    /// Validate required fields and hand back the record.
    pub fn submit(&mut self) -> Result<ArtisanContact, String> {
        if let Some(missing) = Field::ALL
            .iter()
            .zip(&self.values)
            .find(|(field, value)| field.required() && value.trim().is_empty())
            .map(|(field, _)| *field)
        {
            let msg = format!("{} is required", missing.label());
            self.error = Some(msg.clone());
            return Err(msg);
        }

        let contact = ArtisanContact {
            artisan_name: self.values[0].trim().to_string(),
            phone_num: self.values[1].trim().to_string(),
            email: self.values[2].trim().to_string(),
            shop_address: self.values[3].trim().to_string(),
        };
        tracing::info!(artisan = %contact.artisan_name, "contact details submitted");

        self.submitted = Some(contact.clone());
        self.submitted_at = Some(Instant::now());
        self.close_form();
        Ok(contact)
    }

    pub fn submitted(&self) -> Option<&ArtisanContact> {
        self.submitted.as_ref()
    }

    fn popup_visible(&self) -> bool {
        self.submitted_at
            .is_some_and(|at| at.elapsed() < POPUP_DURATION)
    }
}

impl FeedWidget for ContactWidget {
    fn id(&self) -> String {
        self.id.clone()
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn position(&self) -> (usize, usize) {
        self.position
    }

    fn render(&self, frame: &mut Frame, area: Rect, selected: bool) {
        let block = Block::default()
            .title(format!(" {} ", self.title))
            .borders(Borders::ALL)
            .border_style(border_style(selected));

        let inner = block.inner(area);
        frame.render_widget(block, area);

        let mut lines = vec![Line::from("")];
        match &self.submitted {
            Some(contact) => {
                let values = [
                    &contact.artisan_name,
                    &contact.phone_num,
                    &contact.email,
                    &contact.shop_address,
                ];
                for (field, value) in Field::ALL.iter().zip(values) {
                    lines.push(Line::from(vec![
                        Span::styled(format!("{}: ", field.label()), Style::default().fg(Color::Gray)),
                        Span::raw(value.as_str()),
                    ]));
                }
            }
            None => lines.push(Line::from(Span::styled(
                "No contact details yet",
                Style::default().fg(Color::DarkGray),
            ))),
        }
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "Enter to edit contact details",
            Style::default().fg(Color::DarkGray),
        )));
        frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);

        if self.editing {
            self.render_form(frame, area);
        } else if self.popup_visible() {
            self.render_popup(frame, area);
        }
    }

    fn update_data(&mut self, _data: FeedData) {
        // Contact form is filled in by hand
    }

    fn scroll_up(&mut self) {
        if self.editing {
            self.prev_field();
        }
    }

    fn scroll_down(&mut self) {
        if self.editing {
            self.next_field();
        }
    }

    fn set_selected(&mut self, selected: bool) {
        self.selected = selected;
    }

    fn handle_key(&mut self, key: KeyEvent) -> Option<WidgetAction> {
        if !self.editing {
            if key.code == KeyCode::Enter {
                self.open_form();
            }
            return None;
        }

        match key.code {
            KeyCode::Esc => self.close_form(),
            KeyCode::Tab | KeyCode::Down => self.next_field(),
            KeyCode::BackTab | KeyCode::Up => self.prev_field(),
            KeyCode::Backspace => self.delete_char(),
            KeyCode::Enter => {
                return self.submit().ok().map(WidgetAction::ContactSubmitted);
            }
            KeyCode::Char(c) => self.add_char(c),
            _ => {}
        }
        None
    }

    fn is_modal_open(&self) -> bool {
        self.editing
    }

    fn as_any(&self) -> Option<&dyn Any> {
        Some(self)
    }

    fn as_any_mut(&mut self) -> Option<&mut dyn Any> {
        Some(self)
    }
}

impl ContactWidget {
    fn render_form(&self, frame: &mut Frame, area: Rect) {
        let modal_area = center_rect(80, 80, area);
        frame.render_widget(Clear, modal_area);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title("Contact Details");

        let inner = block.inner(modal_area);
        frame.render_widget(block, modal_area);

        let mut lines = Vec::new();
        for (i, (field, value)) in Field::ALL.iter().zip(&self.values).enumerate() {
            let marker = if field.required() { "*" } else { " " };
            let label_style = if i == self.focused {
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Gray)
            };
            let cursor = if i == self.focused { "_" } else { "" };
            lines.push(Line::from(vec![
                Span::styled(format!("{}{}: ", field.label(), marker), label_style),
                Span::raw(format!("{}{}", value, cursor)),
            ]));
        }

        lines.push(Line::from(""));
        if let Some(error) = &self.error {
            lines.push(Line::from(Span::styled(
                error.as_str(),
                Style::default().fg(Color::Red),
            )));
        }
        lines.push(Line::from(Span::styled(
            "Tab/↑↓ move | Enter submit | Esc cancel",
            Style::default().fg(Color::DarkGray),
        )));

        frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
    }

    fn render_popup(&self, frame: &mut Frame, area: Rect) {
        let popup_area = center_rect(40, 30, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Green));
        let paragraph = Paragraph::new(Line::from(Span::styled(
            "Submitted!",
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        )))
        .alignment(ratatui::layout::Alignment::Center)
        .block(block);
        frame.render_widget(paragraph, popup_area);
    }
}
