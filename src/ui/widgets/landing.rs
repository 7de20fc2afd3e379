use crate::config::LandingConfig;
use crate::feeds::content::ContentFetcher;
use crate::feeds::{FeedData, FeedFetcher, LandingContent};
use crate::post::ArtisanContact;
use crate::ui::widgets::{border_style, FeedWidget};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use std::any::Any;
use std::cell::Cell;

const CTA_TEXT: &str = "Explore art pieces";

pub struct LandingWidget {
    config: LandingConfig,
    fetcher: Option<ContentFetcher>,
    content: Option<LandingContent>,
    contact: Option<ArtisanContact>,
    loading: bool,
    error: Option<String>,
    scroll: usize,
    /// Furthest scroll offset at the last render.
    max_scroll: Cell<usize>,
    selected: bool,
}

impl LandingWidget {
    pub fn new(config: LandingConfig, fetcher: Option<ContentFetcher>) -> Self {
        Self {
            config,
            loading: fetcher.is_some(),
            fetcher,
            content: None,
            contact: None,
            error: None,
            scroll: 0,
            max_scroll: Cell::new(0),
            selected: false,
        }
    }

    pub fn set_contact(&mut self, contact: ArtisanContact) {
        self.contact = Some(contact);
    }

    /// Contact form name, then the name found in the recording.
    fn artisan_name(&self) -> &str {
        self.contact
            .as_ref()
            .map(|c| c.artisan_name.as_str())
            .filter(|name| !name.is_empty())
            .or_else(|| {
                self.content
                    .as_ref()
                    .map(|c| c.artisan_name.as_str())
                    .filter(|name| !name.is_empty())
            })
            .unwrap_or("Artisan")
    }

    /// Page body wrapped to `width` columns.
    pub fn build_lines(&self, width: usize) -> Vec<Line<'static>> {
        let width = width.max(10);
        let heading = Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD);
        let fallback = if self.fetcher.is_some() {
            LandingContent::placeholder()
        } else {
            LandingContent::unconfigured()
        };
        let content = self.content.as_ref().unwrap_or(&fallback);

        let mut lines = Vec::new();
        lines.push(Line::from(Span::styled(
            self.artisan_name().to_string(),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )));
        push_wrapped(&mut lines, &content.keywords, width, Style::default().fg(Color::Magenta));
        lines.push(Line::from(Span::styled(
            format!("[ {} ]", CTA_TEXT),
            Style::default().fg(Color::Black).bg(Color::Cyan),
        )));

        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled("About", heading)));
        push_wrapped(&mut lines, &content.about_text, width, Style::default());
        if !content.description.trim().is_empty() {
            lines.push(Line::from(""));
            push_wrapped(&mut lines, &content.description, width, Style::default().fg(Color::Gray));
        }

        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled("Story", heading)));
        if content.transcript.trim().is_empty() && self.content.is_none() {
            lines.push(Line::from(Span::styled(
                "No story yet",
                Style::default().fg(Color::DarkGray),
            )));
        } else {
            push_wrapped(&mut lines, &content.transcript, width, Style::default());
        }

        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled("Contact", heading)));
        match &self.contact {
            Some(contact) => {
                let fields = [
                    ("Name", &contact.artisan_name),
                    ("Phone", &contact.phone_num),
                    ("Email", &contact.email),
                    ("Visit", &contact.shop_address),
                ];
                for (label, value) in fields {
                    if value.is_empty() {
                        continue;
                    }
                    push_wrapped(
                        &mut lines,
                        &format!("{}: {}", label, value),
                        width,
                        Style::default().fg(Color::Gray),
                    );
                }
            }
            None => lines.push(Line::from(Span::styled(
                "Contact details not provided yet",
                Style::default().fg(Color::DarkGray),
            ))),
        }

        lines
    }
}

fn push_wrapped(lines: &mut Vec<Line<'static>>, text: &str, width: usize, style: Style) {
    for paragraph in text.lines() {
        if paragraph.trim().is_empty() {
            lines.push(Line::from(""));
            continue;
        }
        for wrapped in textwrap::wrap(paragraph, width) {
            lines.push(Line::from(Span::styled(wrapped.into_owned(), style)));
        }
    }
}

impl FeedWidget for LandingWidget {
    fn id(&self) -> String {
        format!(
            "landing-{}-{}",
            self.config.position.row, self.config.position.col
        )
    }

    fn title(&self) -> &str {
        &self.config.title
    }

    fn position(&self) -> (usize, usize) {
        (self.config.position.row, self.config.position.col)
    }

    fn render(&self, frame: &mut Frame, area: Rect, selected: bool) {
        let mut title = format!(" {} ", self.config.title);
        if self.loading {
            title.push_str("(loading) ");
        } else if self.error.is_some() {
            title.push_str("(offline) ");
        }

        let block = Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(border_style(selected));

        let inner = block.inner(area);
        let lines = self.build_lines(inner.width as usize);
        let max_scroll = lines.len().saturating_sub(inner.height as usize);
        self.max_scroll.set(max_scroll);
        let offset = self.scroll.min(max_scroll) as u16;

        let paragraph = Paragraph::new(lines).block(block).scroll((offset, 0));
        frame.render_widget(paragraph, area);
    }

    fn update_data(&mut self, data: FeedData) {
        self.loading = false;
        match data {
            FeedData::Content(content) => {
                self.content = Some(content);
                self.error = None;
            }
            FeedData::Error(e) => {
                self.content = Some(LandingContent::placeholder());
                self.error = Some(e);
            }
            FeedData::Loading => {
                self.loading = true;
            }
        }
    }

    fn create_fetcher(&self) -> Option<Box<dyn FeedFetcher>> {
        self.fetcher
            .clone()
            .map(|fetcher| Box::new(fetcher) as Box<dyn FeedFetcher>)
    }

    fn scroll_up(&mut self) {
        self.scroll = self.scroll.min(self.max_scroll.get()).saturating_sub(1);
    }

    fn scroll_down(&mut self) {
        if self.scroll < self.max_scroll.get() {
            self.scroll += 1;
        }
    }

    fn set_selected(&mut self, selected: bool) {
        self.selected = selected;
    }

    fn as_any(&self) -> Option<&dyn Any> {
        Some(self)
    }

    fn as_any_mut(&mut self) -> Option<&mut dyn Any> {
        Some(self)
    }
}
