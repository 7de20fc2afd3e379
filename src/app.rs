use crate::composer::{ComposerCommand, ComposerMessage, RequestId};
use crate::config::{Config, WidgetConfig};
use crate::error::GenerationError;
use crate::feeds::content::{ContentFetcher, ContentSource};
use crate::feeds::generator::GenerationClient;
use crate::feeds::{FeedData, FeedMessage};
use crate::post::{GeneratedPost, PostDraft};
use crate::share::ShareDispatcher;
use crate::ui;
use crate::ui::widgets::composer::ComposerWidget;
use crate::ui::widgets::contact::ContactWidget;
use crate::ui::widgets::landing::LandingWidget;
use crate::ui::widgets::photos::PhotosWidget;
use crate::ui::widgets::{FeedWidget, WidgetAction};
use anyhow::Result;
use crossterm::event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use futures::StreamExt;
use ratatui::DefaultTerminal;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

#[derive(Debug)]
pub enum AppEvent {
    Feed(FeedMessage),
    Generated {
        widget_id: String,
        request: RequestId,
        result: Result<GeneratedPost, GenerationError>,
    },
}

pub struct App {
    pub widgets: Vec<Box<dyn FeedWidget>>,
    pub selected: usize,
    pub should_quit: bool,
    tick_rate: Duration,
    generator: GenerationClient,
    share: ShareDispatcher,
    tx: mpsc::UnboundedSender<AppEvent>,
    rx: mpsc::UnboundedReceiver<AppEvent>,
    tasks: Vec<JoinHandle<()>>,
}

impl App {
    pub fn new(config: &Config, share: ShareDispatcher) -> Result<Self> {
        let fetcher = config
            .content_source()
            .map(|source| ContentFetcher::new(ContentSource::parse(&source)))
            .transpose()?;

        let mut widgets: Vec<Box<dyn FeedWidget>> = config
            .widgets
            .iter()
            .cloned()
            .map(|widget| -> Box<dyn FeedWidget> {
                match widget {
                    WidgetConfig::Landing(cfg) => Box::new(LandingWidget::new(cfg, fetcher.clone())),
                    WidgetConfig::Composer(cfg) => Box::new(ComposerWidget::new(cfg)),
                    WidgetConfig::Contact(cfg) => Box::new(ContactWidget::new(cfg)),
                    WidgetConfig::Photos(cfg) => Box::new(PhotosWidget::new(cfg)),
                }
            })
            .collect();
        widgets.sort_by_key(|w| w.position());

        if let Some(first) = widgets.first_mut() {
            first.set_selected(true);
        }

        let (tx, rx) = mpsc::unbounded_channel();

        Ok(Self {
            widgets,
            selected: 0,
            should_quit: false,
            tick_rate: Duration::from_millis(config.general.tick_rate_ms),
            generator: GenerationClient::new(&config.generator)?,
            share,
            tx,
            rx,
            tasks: Vec::new(),
        })
    }

    /// Kick off the one-shot loaders (landing content).
    pub fn start_fetchers(&mut self) {
        for widget in &mut self.widgets {
            let Some(fetcher) = widget.create_fetcher() else {
                continue;
            };
            let widget_id = widget.id();
            widget.update_data(FeedData::Loading);

            let tx = self.tx.clone();
            self.tasks.push(tokio::spawn(async move {
                let data = match fetcher.fetch().await {
                    Ok(data) => data,
                    Err(e) => FeedData::Error(e.to_string()),
                };
                // Receiver is gone once the app shuts down
                let _ = tx.send(AppEvent::Feed(FeedMessage { widget_id, data }));
            }));
        }
    }

    pub async fn run(&mut self, terminal: &mut DefaultTerminal) -> Result<()> {
        self.start_fetchers();

        let mut events = EventStream::new();
        let mut tick = tokio::time::interval(self.tick_rate);

        while !self.should_quit {
            terminal.draw(|frame| ui::render(frame, self))?;

            tokio::select! {
                maybe_event = events.next() => match maybe_event {
                    Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                        self.handle_key(key);
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        self.shutdown();
                        return Err(e.into());
                    }
                    None => break,
                },
                Some(event) = self.rx.recv() => self.handle_event(event),
                _ = tick.tick() => {}
            }
        }

        self.shutdown();
        Ok(())
    }

    pub async fn next_event(&mut self) -> Option<AppEvent> {
        self.rx.recv().await
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }

        let Some(widget) = self.widgets.get_mut(self.selected) else {
            if key.code == KeyCode::Char('q') {
                self.should_quit = true;
            }
            return;
        };

        if widget.is_modal_open() {
            let widget_id = widget.id();
            if let Some(action) = widget.handle_key(key) {
                self.perform(&widget_id, action);
            }
            return;
        }

        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Tab => self.select_next(),
            KeyCode::BackTab => self.select_prev(),
            KeyCode::Up | KeyCode::Char('k') => widget.scroll_up(),
            KeyCode::Down | KeyCode::Char('j') => widget.scroll_down(),
            _ => {
                let widget_id = widget.id();
                if let Some(action) = widget.handle_key(key) {
                    self.perform(&widget_id, action);
                }
            }
        }
    }

    fn select_next(&mut self) {
        if self.widgets.is_empty() {
            return;
        }
        self.select((self.selected + 1) % self.widgets.len());
    }

    fn select_prev(&mut self) {
        if self.widgets.is_empty() {
            return;
        }
        self.select((self.selected + self.widgets.len() - 1) % self.widgets.len());
    }

    fn select(&mut self, index: usize) {
        if let Some(old) = self.widgets.get_mut(self.selected) {
            old.set_selected(false);
        }
        self.selected = index;
        if let Some(new) = self.widgets.get_mut(index) {
            new.set_selected(true);
        }
    }

    fn perform(&mut self, widget_id: &str, action: WidgetAction) {
        match action {
            WidgetAction::Composer(ComposerCommand::Generate { request, draft }) => {
                self.spawn_generation(widget_id.to_string(), request, draft);
            }
            WidgetAction::Composer(ComposerCommand::Share { target, payload }) => {
                let status = match self.share.share(target, &payload) {
                    Ok(_) => format!("Opened {} share", target.label()),
                    Err(_) => format!("Could not open {} share", target.label()),
                };
                if let Some(composer) = self.composer_mut(widget_id) {
                    composer.set_status(status);
                }
            }
            WidgetAction::Composer(ComposerCommand::ButtonActivated(label)) => {
                tracing::info!(widget = widget_id, label = %label, "post button activated");
            }
            WidgetAction::ContactSubmitted(contact) => {
                for widget in &mut self.widgets {
                    if let Some(landing) = widget
                        .as_any_mut()
                        .and_then(|any| any.downcast_mut::<LandingWidget>())
                    {
                        landing.set_contact(contact.clone());
                    }
                }
            }
        }
    }

    fn spawn_generation(&mut self, widget_id: String, request: RequestId, draft: PostDraft) {
        tracing::info!(widget = %widget_id, request, platform = %draft.platform, "generating post");

        let client = self.generator.clone();
        let tx = self.tx.clone();
        self.tasks.retain(|task| !task.is_finished());
        self.tasks.push(tokio::spawn(async move {
            let result = client.generate(&draft).await;
            let _ = tx.send(AppEvent::Generated {
                widget_id,
                request,
                result,
            });
        }));
    }

    pub fn handle_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::Feed(msg) => {
                match self.widgets.iter_mut().find(|w| w.id() == msg.widget_id) {
                    Some(widget) => widget.update_data(msg.data),
                    None => tracing::debug!(widget = %msg.widget_id, "feed result for unknown widget"),
                }
            }
            AppEvent::Generated {
                widget_id,
                request,
                result,
            } => match self.composer_mut(&widget_id) {
                Some(composer) => {
                    composer.dispatch(ComposerMessage::GenerationFinished { request, result });
                }
                None => {
                    tracing::debug!(widget = %widget_id, request, "dropping result for closed composer");
                }
            },
        }
    }

    fn composer_mut(&mut self, widget_id: &str) -> Option<&mut ComposerWidget> {
        self.widgets
            .iter_mut()
            .filter(|w| w.id() == widget_id)
            .find_map(|w| w.as_any_mut().and_then(|any| any.downcast_mut::<ComposerWidget>()))
    }

    /// Tear down composers and outstanding work. Results that still arrive are
    /// ignored by the disposed composers.
    pub fn shutdown(&mut self) {
        for widget in &mut self.widgets {
            if let Some(composer) = widget
                .as_any_mut()
                .and_then(|any| any.downcast_mut::<ComposerWidget>())
            {
                composer.dispatch(ComposerMessage::Dispose);
            }
        }
        for task in self.tasks.drain(..) {
            task.abort();
        }
    }
}

/// Set up the terminal, run the dashboard, and always restore the terminal.
pub async fn run_tui(config: Config) -> Result<()> {
    let share = ShareDispatcher::system(config.share.clone());
    let mut app = App::new(&config, share)?;

    let mut terminal = ratatui::init();
    let result = app.run(&mut terminal).await;
    ratatui::restore();

    result
}
