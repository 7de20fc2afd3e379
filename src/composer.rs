//! State owned by the social post composer.
//!
//! All mutation goes through [`PostComposer::update`], which takes an explicit
//! [`ComposerMessage`] and may hand back a [`ComposerCommand`] for the app to
//! execute (network call, share action). Async results come back as messages
//! tagged with the request id they answer, so late or stale results can be
//! dropped instead of clobbering newer state.

use crate::error::GenerationError;
use crate::post::{GeneratedPost, Platform, PostDraft, ShareTarget};
use crate::post_parser::{self, Segment};

pub type RequestId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComposerPhase {
    Idle,
    Generating,
    Displayed,
    Failed,
}

#[derive(Debug)]
pub enum ComposerMessage {
    EditDraft(char),
    DeleteChar,
    ClearDraft,
    SelectPlatform(Platform),
    CyclePlatform,
    Generate,
    GenerationFinished {
        request: RequestId,
        result: Result<GeneratedPost, GenerationError>,
    },
    Share(ShareTarget),
    FocusNextButton,
    ActivateButton,
    Dispose,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ComposerCommand {
    Generate { request: RequestId, draft: PostDraft },
    Share { target: ShareTarget, payload: String },
    ButtonActivated(String),
}

#[derive(Debug, Clone)]
pub struct PostComposer {
    draft: PostDraft,
    post: Option<GeneratedPost>,
    segments: Vec<Segment>,
    phase: ComposerPhase,
    next_request: RequestId,
    in_flight: Option<RequestId>,
    last_error: Option<String>,
    status: Option<String>,
    focused_button: Option<usize>,
    disposed: bool,
}

impl PostComposer {
    pub fn new(platform: Platform) -> Self {
        Self {
            draft: PostDraft::new(String::new(), platform),
            post: None,
            segments: Vec::new(),
            phase: ComposerPhase::Idle,
            next_request: 1,
            in_flight: None,
            last_error: None,
            status: None,
            focused_button: None,
            disposed: false,
        }
    }

    pub fn draft(&self) -> &PostDraft {
        &self.draft
    }

    pub fn post(&self) -> Option<&GeneratedPost> {
        self.post.as_ref()
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn phase(&self) -> ComposerPhase {
        self.phase
    }

    pub fn in_flight(&self) -> Option<RequestId> {
        self.in_flight
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub fn focused_button(&self) -> Option<usize> {
        self.focused_button
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    pub fn update(&mut self, msg: ComposerMessage) -> Option<ComposerCommand> {
        if self.disposed {
            tracing::debug!(?msg, "composer disposed, dropping message");
            return None;
        }

        match msg {
            ComposerMessage::EditDraft(c) => {
                self.draft.text.push(c);
                None
            }
            ComposerMessage::DeleteChar => {
                self.draft.text.pop();
                None
            }
            ComposerMessage::ClearDraft => {
                self.draft.text.clear();
                None
            }
            ComposerMessage::SelectPlatform(platform) => {
                self.draft.platform = platform;
                None
            }
            ComposerMessage::CyclePlatform => {
                self.draft.platform = self.draft.platform.next();
                None
            }
            ComposerMessage::Generate => self.start_generation(),
            ComposerMessage::GenerationFinished { request, result } => {
                self.finish_generation(request, result);
                None
            }
            ComposerMessage::Share(target) => self.share(target),
            ComposerMessage::FocusNextButton => {
                let count = post_parser::button_labels(&self.segments).len();
                self.focused_button = match (count, self.focused_button) {
                    (0, _) => None,
                    (_, None) => Some(0),
                    (n, Some(i)) => Some((i + 1) % n),
                };
                None
            }
            ComposerMessage::ActivateButton => {
                let index = self.focused_button?;
                let label = post_parser::button_labels(&self.segments)
                    .get(index)?
                    .to_string();
                self.status = Some(format!("Button clicked: {}", label));
                Some(ComposerCommand::ButtonActivated(label))
            }
            ComposerMessage::Dispose => {
                self.disposed = true;
                if let Some(request) = self.in_flight.take() {
                    tracing::debug!(request, "composer disposed with generation in flight");
                }
                None
            }
        }
    }

    fn start_generation(&mut self) -> Option<ComposerCommand> {
        if let Some(request) = self.in_flight {
            tracing::debug!(request, "generation already in flight, ignoring trigger");
            self.status = Some("Still generating...".to_string());
            return None;
        }
        if self.draft.is_blank() {
            self.status = Some("Write something about your craft first".to_string());
            return None;
        }

        let request = self.next_request;
        self.next_request += 1;
        self.in_flight = Some(request);
        self.phase = ComposerPhase::Generating;
        self.status = None;

        Some(ComposerCommand::Generate {
            request,
            draft: self.draft.clone(),
        })
    }

    fn finish_generation(
        &mut self,
        request: RequestId,
        result: Result<GeneratedPost, GenerationError>,
    ) {
        if self.in_flight != Some(request) {
            tracing::debug!(request, in_flight = ?self.in_flight, "discarding stale generation result");
            return;
        }
        self.in_flight = None;

        match result {
            Ok(post) => {
                self.segments = post_parser::parse(&post.text);
                self.post = Some(post);
                self.focused_button = None;
                self.last_error = None;
                self.phase = ComposerPhase::Displayed;
            }
            Err(e) => {
                tracing::warn!(request, error = %e, "post generation failed");
                self.last_error = Some(e.to_string());
                self.phase = ComposerPhase::Failed;
            }
        }
    }

    fn share(&mut self, target: ShareTarget) -> Option<ComposerCommand> {
        if self.post.is_none() {
            self.status = Some("Generate a post before sharing".to_string());
            return None;
        }

        Some(ComposerCommand::Share {
            target,
            payload: post_parser::plain_text(&self.segments),
        })
    }

    /// Result of the app running a share command.
    pub fn set_status(&mut self, status: impl Into<String>) {
        if !self.disposed {
            self.status = Some(status.into());
        }
    }

    pub fn clear_status(&mut self) {
        self.status = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn composer_with_draft(text: &str, platform: Platform) -> PostComposer {
        let mut composer = PostComposer::new(platform);
        for c in text.chars() {
            composer.update(ComposerMessage::EditDraft(c));
        }
        composer
    }

    fn start(composer: &mut PostComposer) -> RequestId {
        match composer.update(ComposerMessage::Generate) {
            Some(ComposerCommand::Generate { request, .. }) => request,
            other => panic!("expected generate command, got {:?}", other),
        }
    }

    fn finish_ok(composer: &mut PostComposer, request: RequestId, text: &str) {
        let platform = composer.draft().platform;
        composer.update(ComposerMessage::GenerationFinished {
            request,
            result: Ok(GeneratedPost::new(text, platform)),
        });
    }

    #[test]
    fn test_draft_editing() {
        let mut composer = composer_with_draft("pots!", Platform::Twitter);
        composer.update(ComposerMessage::DeleteChar);
        assert_eq!(composer.draft().text, "pots");

        composer.update(ComposerMessage::SelectPlatform(Platform::Email));
        assert_eq!(composer.draft().platform, Platform::Email);
        composer.update(ComposerMessage::CyclePlatform);
        assert_eq!(composer.draft().platform, Platform::Instagram);

        composer.update(ComposerMessage::ClearDraft);
        assert!(composer.draft().text.is_empty());
        assert_eq!(composer.phase(), ComposerPhase::Idle);
    }

    #[test]
    fn test_generate_emits_command_with_draft() {
        let mut composer = composer_with_draft("clay pots", Platform::Twitter);
        let cmd = composer.update(ComposerMessage::Generate);

        assert_eq!(
            cmd,
            Some(ComposerCommand::Generate {
                request: 1,
                draft: PostDraft::new("clay pots", Platform::Twitter),
            })
        );
        assert_eq!(composer.phase(), ComposerPhase::Generating);
        assert_eq!(composer.in_flight(), Some(1));
    }

    #[test]
    fn test_blank_draft_does_not_generate() {
        let mut composer = composer_with_draft("   ", Platform::Twitter);
        assert!(composer.update(ComposerMessage::Generate).is_none());
        assert_eq!(composer.phase(), ComposerPhase::Idle);
        assert!(composer.status().is_some());
    }

    #[test]
    fn test_second_generate_while_in_flight_is_rejected() {
        let mut composer = composer_with_draft("clay pots", Platform::Twitter);
        let first = start(&mut composer);

        assert!(composer.update(ComposerMessage::Generate).is_none());
        assert_eq!(composer.in_flight(), Some(first));
        assert_eq!(composer.status(), Some("Still generating..."));
    }

    #[test]
    fn test_success_displays_parsed_post() {
        let mut composer = composer_with_draft("clay pots", Platform::Twitter);
        let request = start(&mut composer);
        finish_ok(&mut composer, request, "Hello\n[Button: Buy Now]\nBye");

        assert_eq!(composer.phase(), ComposerPhase::Displayed);
        assert_eq!(composer.in_flight(), None);
        assert_eq!(composer.post().unwrap().text, "Hello\n[Button: Buy Now]\nBye");
        assert_eq!(
            composer.segments(),
            &[
                Segment::Text("Hello".to_string()),
                Segment::Break,
                Segment::Button {
                    label: "Buy Now".to_string()
                },
                Segment::Break,
                Segment::Text("Bye".to_string()),
            ]
        );
    }

    #[test]
    fn test_failure_keeps_previous_post() {
        let mut composer = composer_with_draft("clay pots", Platform::Twitter);
        let first = start(&mut composer);
        finish_ok(&mut composer, first, "first post");

        let second = start(&mut composer);
        composer.update(ComposerMessage::GenerationFinished {
            request: second,
            result: Err(GenerationError::Status(502)),
        });

        assert_eq!(composer.phase(), ComposerPhase::Failed);
        assert_eq!(composer.post().unwrap().text, "first post");
        assert_eq!(composer.segments(), &[Segment::Text("first post".to_string())]);
        assert_eq!(composer.last_error(), Some("generator returned HTTP 502"));

        // A new explicit trigger is the only way out of Failed
        let third = start(&mut composer);
        assert!(third > second);
        assert_eq!(composer.phase(), ComposerPhase::Generating);
    }

    #[test]
    fn test_success_replaces_previous_post() {
        let mut composer = composer_with_draft("clay pots", Platform::Whatsapp);
        let first = start(&mut composer);
        finish_ok(&mut composer, first, "old");
        let second = start(&mut composer);
        finish_ok(&mut composer, second, "new");

        assert_eq!(composer.post().unwrap().text, "new");
        assert!(composer.last_error().is_none());
    }

    #[test]
    fn test_stale_result_is_discarded() {
        let mut composer = composer_with_draft("clay pots", Platform::Twitter);
        let request = start(&mut composer);

        finish_ok(&mut composer, request + 7, "stale");

        assert_eq!(composer.phase(), ComposerPhase::Generating);
        assert!(composer.post().is_none());
        assert_eq!(composer.in_flight(), Some(request));
    }

    #[test]
    fn test_result_after_dispose_is_discarded() {
        let mut composer = composer_with_draft("clay pots", Platform::Twitter);
        let request = start(&mut composer);

        composer.update(ComposerMessage::Dispose);
        finish_ok(&mut composer, request, "late");

        assert!(composer.is_disposed());
        assert!(composer.post().is_none());
        assert!(composer.segments().is_empty());
        assert_eq!(composer.in_flight(), None);
        assert!(composer.update(ComposerMessage::Generate).is_none());
    }

    #[test]
    fn test_share_requires_post() {
        let mut composer = composer_with_draft("clay pots", Platform::Twitter);
        assert!(composer
            .update(ComposerMessage::Share(ShareTarget::Twitter))
            .is_none());
        assert_eq!(composer.status(), Some("Generate a post before sharing"));
    }

    #[test]
    fn test_share_uses_plain_post_text() {
        let mut composer = composer_with_draft("clay pots", Platform::Twitter);
        let request = start(&mut composer);
        finish_ok(&mut composer, request, "New mugs!\n[Button:Order]");

        let cmd = composer.update(ComposerMessage::Share(ShareTarget::Whatsapp));
        assert_eq!(
            cmd,
            Some(ComposerCommand::Share {
                target: ShareTarget::Whatsapp,
                payload: "New mugs!\nOrder".to_string(),
            })
        );
    }

    #[test]
    fn test_button_focus_and_activation() {
        let mut composer = composer_with_draft("clay pots", Platform::Instagram);
        assert!(composer.update(ComposerMessage::ActivateButton).is_none());

        let request = start(&mut composer);
        finish_ok(&mut composer, request, "[Button:A] and [Button:B]");

        composer.update(ComposerMessage::FocusNextButton);
        composer.update(ComposerMessage::FocusNextButton);
        assert_eq!(composer.focused_button(), Some(1));
        assert_eq!(
            composer.update(ComposerMessage::ActivateButton),
            Some(ComposerCommand::ButtonActivated("B".to_string()))
        );
        assert_eq!(composer.status(), Some("Button clicked: B"));

        composer.update(ComposerMessage::FocusNextButton);
        assert_eq!(composer.focused_button(), Some(0));
    }
}
