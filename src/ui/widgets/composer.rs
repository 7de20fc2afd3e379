use crate::composer::{ComposerMessage, ComposerPhase, PostComposer};
use crate::config::ComposerConfig;
use crate::feeds::FeedData;
use crate::post::{Platform, ShareTarget};
use crate::post_parser::Segment;
use crate::ui::widgets::{border_style, center_rect, FeedWidget, WidgetAction};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};
use std::any::Any;

#[derive(Debug, Clone)]
pub struct ComposerWidget {
    id: String,
    title: String,
    position: (usize, usize),
    selected: bool,
    composer: PostComposer,
    mode: ComposerMode,
    scroll: u16,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum ComposerMode {
    Normal,
    EditDraft,
}

impl ComposerWidget {
    pub fn new(config: ComposerConfig) -> Self {
        Self {
            id: format!("composer-{}-{}", config.position.row, config.position.col),
            title: config.title,
            position: (config.position.row, config.position.col),
            selected: false,
            composer: PostComposer::new(config.default_platform),
            mode: ComposerMode::Normal,
            scroll: 0,
        }
    }

    pub fn composer(&self) -> &PostComposer {
        &self.composer
    }

    /// Feed a message to the composer, translating any command for the app.
    pub fn dispatch(&mut self, msg: ComposerMessage) -> Option<WidgetAction> {
        if matches!(msg, ComposerMessage::GenerationFinished { .. }) {
            self.scroll = 0;
        }
        self.composer.update(msg).map(WidgetAction::Composer)
    }

    pub fn set_status(&mut self, status: impl Into<String>) {
        self.composer.set_status(status);
    }

    fn handle_normal_key(&mut self, key: KeyEvent) -> Option<WidgetAction> {
        self.composer.clear_status();
        let msg = match key.code {
            KeyCode::Char('c') => {
                self.mode = ComposerMode::EditDraft;
                return None;
            }
            KeyCode::Char('x') => ComposerMessage::ClearDraft,
            KeyCode::Char('p') => ComposerMessage::CyclePlatform,
            KeyCode::Char('1') => ComposerMessage::SelectPlatform(Platform::Instagram),
            KeyCode::Char('2') => ComposerMessage::SelectPlatform(Platform::Twitter),
            KeyCode::Char('3') => ComposerMessage::SelectPlatform(Platform::Whatsapp),
            KeyCode::Char('4') => ComposerMessage::SelectPlatform(Platform::Email),
            KeyCode::Char('g') => ComposerMessage::Generate,
            KeyCode::Char('i') => ComposerMessage::Share(ShareTarget::Instagram),
            KeyCode::Char('t') => ComposerMessage::Share(ShareTarget::Twitter),
            KeyCode::Char('w') => ComposerMessage::Share(ShareTarget::Whatsapp),
            KeyCode::Char('m') => ComposerMessage::Share(ShareTarget::Email),
            KeyCode::Char('n') => ComposerMessage::FocusNextButton,
            KeyCode::Enter => ComposerMessage::ActivateButton,
            _ => return None,
        };
        self.dispatch(msg)
    }

    fn handle_edit_key(&mut self, key: KeyEvent) -> Option<WidgetAction> {
        match key.code {
            KeyCode::Esc | KeyCode::Enter => {
                self.mode = ComposerMode::Normal;
                None
            }
            KeyCode::Backspace => self.dispatch(ComposerMessage::DeleteChar),
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.dispatch(ComposerMessage::EditDraft(c))
            }
            _ => None,
        }
    }
}

/// Lay segments out as terminal lines: every `Break` starts a new line and
/// buttons become highlighted chips.
pub fn segments_to_lines(segments: &[Segment], focused_button: Option<usize>) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    let mut current: Vec<Span<'static>> = Vec::new();
    let mut button_index = 0;

    for segment in segments {
        match segment {
            Segment::Text(text) => current.push(Span::raw(text.clone())),
            Segment::Break => lines.push(Line::from(std::mem::take(&mut current))),
            Segment::Button { label } => {
                let style = if focused_button == Some(button_index) {
                    Style::default()
                        .fg(Color::Black)
                        .bg(Color::Yellow)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(Color::White).bg(Color::Blue)
                };
                current.push(Span::styled(format!(" {} ", label), style));
                button_index += 1;
            }
        }
    }
    if !current.is_empty() || (lines.is_empty() && !segments.is_empty()) {
        lines.push(Line::from(current));
    }

    lines
}

impl FeedWidget for ComposerWidget {
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
            .borders(Borders::ALL)
            .border_style(border_style(selected))
            .title(format!(
                " {} [{}] ",
                self.title,
                self.composer.draft().platform.label()
            ));

        let inner = block.inner(area);
        frame.render_widget(block, area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2),
                Constraint::Min(3),
                Constraint::Length(2),
            ])
            .split(inner);

        self.render_draft(frame, chunks[0]);
        self.render_post(frame, chunks[1]);
        self.render_footer(frame, chunks[2]);

        if self.mode == ComposerMode::EditDraft {
            self.render_edit_modal(frame, area);
        }
    }

    fn update_data(&mut self, _data: FeedData) {
        // Posts arrive through `dispatch`, not the feed channel
    }

    fn scroll_up(&mut self) {
        self.scroll = self.scroll.saturating_sub(1);
    }

    fn scroll_down(&mut self) {
        let lines = segments_to_lines(self.composer.segments(), None).len() as u16;
        if self.scroll + 1 < lines {
            self.scroll += 1;
        }
    }

    fn set_selected(&mut self, selected: bool) {
        self.selected = selected;
    }

    fn handle_key(&mut self, key: KeyEvent) -> Option<WidgetAction> {
        match self.mode {
            ComposerMode::Normal => self.handle_normal_key(key),
            ComposerMode::EditDraft => self.handle_edit_key(key),
        }
    }

    fn is_modal_open(&self) -> bool {
        self.mode != ComposerMode::Normal
    }

    fn as_any(&self) -> Option<&dyn Any> {
        Some(self)
    }

    fn as_any_mut(&mut self) -> Option<&mut dyn Any> {
        Some(self)
    }
}

impl ComposerWidget {
    fn render_draft(&self, frame: &mut Frame, area: Rect) {
        let draft = &self.composer.draft().text;
        let draft_line = if draft.is_empty() {
            Line::from(Span::styled(
                "Press c to describe your craft",
                Style::default().fg(Color::DarkGray),
            ))
        } else {
            Line::from(vec![
                Span::styled("Draft: ", Style::default().fg(Color::Gray)),
                Span::raw(draft.as_str()),
            ])
        };

        let current = self.composer.draft().platform;
        let mut platform_spans = vec![Span::styled("Platform: ", Style::default().fg(Color::Gray))];
        for (i, platform) in Platform::ALL.iter().enumerate() {
            let style = if *platform == current {
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::DarkGray)
            };
            platform_spans.push(Span::styled(format!("{}:{} ", i + 1, platform.label()), style));
        }

        let paragraph = Paragraph::new(vec![draft_line, Line::from(platform_spans)]);
        frame.render_widget(paragraph, area);
    }

    fn render_post(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .borders(Borders::TOP)
            .border_style(Style::default().fg(Color::DarkGray));

        let lines = if self.composer.post().is_none() {
            let hint = match self.composer.phase() {
                ComposerPhase::Generating => "Generating your post...",
                ComposerPhase::Failed => "No post generated.",
                _ => "Press g to generate a post",
            };
            vec![Line::from(Span::styled(hint, Style::default().fg(Color::DarkGray)))]
        } else {
            segments_to_lines(self.composer.segments(), self.composer.focused_button())
        };

        let paragraph = Paragraph::new(lines)
            .block(block)
            .wrap(Wrap { trim: false })
            .scroll((self.scroll, 0));
        frame.render_widget(paragraph, area);
    }

    fn render_footer(&self, frame: &mut Frame, area: Rect) {
        let state = match self.composer.phase() {
            ComposerPhase::Idle => Span::styled("Ready", Style::default().fg(Color::Gray)),
            ComposerPhase::Generating => {
                Span::styled("Generating...", Style::default().fg(Color::Yellow))
            }
            ComposerPhase::Displayed => {
                let when = self
                    .composer
                    .post()
                    .map(|p| {
                        p.generated_at
                            .to_zoned(jiff::tz::TimeZone::system())
                            .strftime("%H:%M:%S")
                            .to_string()
                    })
                    .unwrap_or_default();
                Span::styled(format!("Generated {}", when), Style::default().fg(Color::Green))
            }
            ComposerPhase::Failed => Span::styled(
                format!(
                    "Failed: {}",
                    self.composer.last_error().unwrap_or("unknown error")
                ),
                Style::default().fg(Color::Red),
            ),
        };

        let mut status_line = vec![state];
        if let Some(status) = self.composer.status() {
            status_line.push(Span::raw("  "));
            status_line.push(Span::styled(status, Style::default().fg(Color::Yellow)));
        }

        let help = Line::from(Span::styled(
            "c edit | p/1-4 platform | g generate | i t w m share | n/Enter buttons",
            Style::default().fg(Color::DarkGray),
        ));

        frame.render_widget(Paragraph::new(vec![Line::from(status_line), help]), area);
    }

    fn render_edit_modal(&self, frame: &mut Frame, area: Rect) {
        let modal_area = center_rect(70, 40, area);
        frame.render_widget(Clear, modal_area);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title("Describe your craft");

        let inner = block.inner(modal_area);
        frame.render_widget(block, modal_area);

        let text = vec![
            Line::from(""),
            Line::from(format!("{}_", self.composer.draft().text)),
            Line::from(""),
            Line::from(Span::styled(
                "Enter or Esc to close",
                Style::default().fg(Color::DarkGray),
            )),
        ];

        let paragraph = Paragraph::new(text)
            .wrap(Wrap { trim: false })
            .alignment(Alignment::Left);
        frame.render_widget(paragraph, inner);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::composer::ComposerCommand;
    use crate::config::Position;
    use crate::post::{GeneratedPost, PostDraft};
    use crate::post_parser;

    fn widget() -> ComposerWidget {
        ComposerWidget::new(ComposerConfig {
            title: "Social Post".to_string(),
            default_platform: Platform::Twitter,
            position: Position { row: 1, col: 0 },
        })
    }

    fn press(widget: &mut ComposerWidget, code: KeyCode) -> Option<WidgetAction> {
        widget.handle_key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn line_text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn test_segments_to_lines_breaks() {
        let segments = post_parser::parse("Hello\n[Button: Buy Now]\nBye");
        let lines = segments_to_lines(&segments, None);
        let texts: Vec<String> = lines.iter().map(line_text).collect();
        assert_eq!(texts, vec!["Hello", " Buy Now ", "Bye"]);
    }

    #[test]
    fn test_segments_to_lines_trailing_break() {
        let segments = post_parser::parse("one\n");
        assert_eq!(segments_to_lines(&segments, None).len(), 1);
        assert!(segments_to_lines(&[], None).is_empty());
    }

    #[test]
    fn test_focused_button_is_highlighted() {
        let segments = post_parser::parse("[Button:A][Button:B]");
        let lines = segments_to_lines(&segments, Some(1));
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].spans[0].style.bg, Some(Color::Blue));
        assert_eq!(lines[0].spans[1].style.bg, Some(Color::Yellow));
    }

    #[test]
    fn test_edit_mode_captures_keys() {
        let mut w = widget();
        press(&mut w, KeyCode::Char('c'));
        assert!(w.is_modal_open());

        for c in "g mugs".chars() {
            assert!(press(&mut w, KeyCode::Char(c)).is_none());
        }
        press(&mut w, KeyCode::Backspace);
        press(&mut w, KeyCode::Enter);

        assert!(!w.is_modal_open());
        assert_eq!(w.composer().draft().text, "g mug");
    }

    #[test]
    fn test_generate_key_emits_command() {
        let mut w = widget();
        press(&mut w, KeyCode::Char('c'));
        for c in "vases".chars() {
            press(&mut w, KeyCode::Char(c));
        }
        press(&mut w, KeyCode::Esc);
        press(&mut w, KeyCode::Char('3'));

        let action = press(&mut w, KeyCode::Char('g'));
        assert_eq!(
            action,
            Some(WidgetAction::Composer(ComposerCommand::Generate {
                request: 1,
                draft: PostDraft::new("vases", Platform::Whatsapp),
            }))
        );
        assert!(press(&mut w, KeyCode::Char('g')).is_none());
    }

    #[test]
    fn test_share_key_after_generation() {
        let mut w = widget();
        press(&mut w, KeyCode::Char('c'));
        press(&mut w, KeyCode::Char('a'));
        press(&mut w, KeyCode::Enter);
        press(&mut w, KeyCode::Char('g'));

        w.dispatch(ComposerMessage::GenerationFinished {
            request: 1,
            result: Ok(GeneratedPost::new("hello world", Platform::Twitter)),
        });

        assert_eq!(
            press(&mut w, KeyCode::Char('t')),
            Some(WidgetAction::Composer(ComposerCommand::Share {
                target: ShareTarget::Twitter,
                payload: "hello world".to_string(),
            }))
        );
    }
}
