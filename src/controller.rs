//! Card builder controller.
//!
//! Drives one card-building session: generate a background, composite a
//! message onto it, save the result. Session state lives on the
//! [`CardBuilder`] instance; dropping it ends the session.

use crate::error::{CardError, Result, ValidationError};
use crate::service::{BackgroundResponse, CardResponse, CardService};
use crate::view::{CardView, Notice, DEFAULT_CARD_FILENAME};

const BACKGROUND_ACTION: &str = "Background generation";
const CARD_ACTION: &str = "Card creation";
const DOWNLOAD_ACTION: &str = "Download";

/// Controller for a single card-building session.
///
/// Every operation takes `&mut self`, so at most one request is in flight
/// per builder.
pub struct CardBuilder<S, V> {
    service: S,
    view: V,
    background: Option<String>,
    card: Option<String>,
}

impl<S: CardService, V: CardView> CardBuilder<S, V> {
    /// Creates a builder with an empty session.
    pub fn new(service: S, mut view: V) -> Self {
        view.set_create_enabled(false);
        Self {
            service,
            view,
            background: None,
            card: None,
        }
    }

    /// Reference to the most recently generated background, if any.
    pub fn background(&self) -> Option<&str> {
        self.background.as_deref()
    }

    /// Reference to the displayed card, if any.
    pub fn card(&self) -> Option<&str> {
        self.card.as_deref()
    }

    /// Returns the view.
    pub fn view(&self) -> &V {
        &self.view
    }

    /// Returns the service.
    pub fn service(&self) -> &S {
        &self.service
    }

    /// Consumes the builder, returning service and view.
    pub fn into_parts(self) -> (S, V) {
        (self.service, self.view)
    }

    /// Generates a background from `prompt` and shows it in the preview.
    ///
    /// On success the returned reference becomes the session background and
    /// the create-card action is enabled. Any failure is reported to the view
    /// and leaves the previous background untouched. The busy indicator is
    /// cleared before this returns, whatever the outcome.
    pub async fn request_background(&mut self, prompt: &str) -> Result<String> {
        let prompt = prompt.trim();
        if prompt.is_empty() {
            return Err(self.report(BACKGROUND_ACTION, ValidationError::EmptyPrompt.into()));
        }

        tracing::debug!(service = self.service.name(), prompt, "requesting background");
        self.view.set_busy(true);
        let outcome = self.service.generate_background(prompt).await;
        self.view.set_busy(false);

        match outcome.and_then(BackgroundResponse::into_result) {
            Ok(reference) => {
                tracing::info!(bytes = reference.len(), "background ready");
                self.view.show_preview(&reference);
                self.view.set_create_enabled(true);
                self.background = Some(reference.clone());
                Ok(reference)
            }
            Err(err) => Err(self.report(BACKGROUND_ACTION, err)),
        }
    }

    /// Composites `message` onto the session background and shows the card.
    ///
    /// Requires a non-blank message and a background from a prior successful
    /// [`request_background`](Self::request_background). Failures keep the
    /// previously displayed card.
    pub async fn request_card_assembly(&mut self, message: &str) -> Result<String> {
        let message = message.trim();
        if message.is_empty() {
            return Err(self.report(CARD_ACTION, ValidationError::EmptyMessage.into()));
        }
        let Some(background) = self.background.clone() else {
            return Err(self.report(CARD_ACTION, ValidationError::MissingBackground.into()));
        };

        tracing::debug!(service = self.service.name(), message, "requesting card");
        self.view.set_busy(true);
        let outcome = self.service.create_card(&background, message).await;
        self.view.set_busy(false);

        match outcome.and_then(CardResponse::into_result) {
            Ok(reference) => {
                tracing::info!(bytes = reference.len(), "card ready");
                self.view.show_result(&reference);
                self.view.scroll_to_result();
                self.card = Some(reference.clone());
                Ok(reference)
            }
            Err(err) => Err(self.report(CARD_ACTION, err)),
        }
    }

    /// Saves the displayed card as `christmas-card.png`. Never touches the network.
    pub fn download_card(&mut self) -> Result<()> {
        let Some(card) = self.card.clone() else {
            return Err(self.report(DOWNLOAD_ACTION, ValidationError::NoCard.into()));
        };
        self.view
            .save_card(&card, DEFAULT_CARD_FILENAME)
            .map_err(|err| self.report(DOWNLOAD_ACTION, err))
    }

    fn report(&mut self, action: &str, err: CardError) -> CardError {
        if err.is_validation() {
            tracing::debug!(action, "rejected: {err}");
        } else {
            tracing::warn!(action, "failed: {err}");
        }
        self.view.notify(Notice::for_error(action, &err));
        err
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::HttpCardService;
    use crate::view::NoticeLevel;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::{Arc, Mutex};

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Background(String),
        Card(String, String),
    }

    /// Replays queued responses and records what it was asked.
    #[derive(Default)]
    struct ScriptedService {
        backgrounds: Mutex<VecDeque<Result<BackgroundResponse>>>,
        cards: Mutex<VecDeque<Result<CardResponse>>>,
        calls: Mutex<Vec<Call>>,
        busy: Arc<AtomicBool>,
        busy_during_calls: Mutex<Vec<bool>>,
    }

    impl ScriptedService {
        fn with_background(self, outcome: Result<BackgroundResponse>) -> Self {
            self.backgrounds.lock().unwrap().push_back(outcome);
            self
        }

        fn with_card(self, outcome: Result<CardResponse>) -> Self {
            self.cards.lock().unwrap().push_back(outcome);
            self
        }

        fn calls(&self) -> Vec<Call> {
            self.calls.lock().unwrap().clone()
        }

        fn observe_busy(&self) {
            let busy = self.busy.load(Ordering::SeqCst);
            self.busy_during_calls.lock().unwrap().push(busy);
        }
    }

    #[async_trait]
    impl CardService for ScriptedService {
        async fn generate_background(&self, prompt: &str) -> Result<BackgroundResponse> {
            self.observe_busy();
            self.calls
                .lock()
                .unwrap()
                .push(Call::Background(prompt.to_string()));
            self.backgrounds
                .lock()
                .unwrap()
                .pop_front()
                .expect("unexpected background request")
        }

        async fn create_card(&self, background_url: &str, message: &str) -> Result<CardResponse> {
            self.observe_busy();
            self.calls.lock().unwrap().push(Call::Card(
                background_url.to_string(),
                message.to_string(),
            ));
            self.cards
                .lock()
                .unwrap()
                .pop_front()
                .expect("unexpected card request")
        }
    }

    /// Records every UI change.
    #[derive(Default)]
    struct RecordingView {
        busy: Arc<AtomicBool>,
        busy_transitions: Vec<bool>,
        notices: Vec<Notice>,
        preview: Option<String>,
        create_enabled: bool,
        result: Option<String>,
        scrolled: usize,
        saved: Vec<(String, String)>,
        fail_saves: bool,
    }

    impl CardView for RecordingView {
        fn set_busy(&mut self, busy: bool) {
            self.busy.store(busy, Ordering::SeqCst);
            self.busy_transitions.push(busy);
        }

        fn notify(&mut self, notice: Notice) {
            self.notices.push(notice);
        }

        fn show_preview(&mut self, reference: &str) {
            self.preview = Some(reference.to_string());
        }

        fn set_create_enabled(&mut self, enabled: bool) {
            self.create_enabled = enabled;
        }

        fn show_result(&mut self, reference: &str) {
            self.result = Some(reference.to_string());
        }

        fn scroll_to_result(&mut self) {
            self.scrolled += 1;
        }

        fn save_card(&mut self, reference: &str, filename: &str) -> Result<()> {
            if self.fail_saves {
                return Err(CardError::UnsupportedReference(reference.to_string()));
            }
            self.saved.push((reference.to_string(), filename.to_string()));
            Ok(())
        }
    }

    fn builder(service: ScriptedService) -> CardBuilder<ScriptedService, RecordingView> {
        let view = RecordingView {
            busy: Arc::clone(&service.busy),
            ..Default::default()
        };
        CardBuilder::new(service, view)
    }

    #[tokio::test]
    async fn test_blank_prompt_is_rejected_without_request() {
        let mut b = builder(ScriptedService::default());

        for prompt in ["", "   ", "\n\t "] {
            let err = b.request_background(prompt).await.unwrap_err();
            assert!(matches!(
                err,
                CardError::Validation(ValidationError::EmptyPrompt)
            ));
        }

        assert!(b.service().calls().is_empty());
        assert_eq!(b.view().notices.len(), 3);
        assert!(b
            .view()
            .notices
            .iter()
            .all(|n| n.level == NoticeLevel::Validation));
        assert!(b.view().busy_transitions.is_empty());
        assert!(b.background().is_none());
    }

    #[tokio::test]
    async fn test_card_requires_prior_background() {
        let mut b = builder(ScriptedService::default());

        let err = b.request_card_assembly("Happy Holidays").await.unwrap_err();
        assert!(matches!(
            err,
            CardError::Validation(ValidationError::MissingBackground)
        ));
        assert!(b.service().calls().is_empty());
        assert!(!b.view().create_enabled);
        assert_eq!(b.view().notices[0].message, "Generate a background first.");
    }

    #[tokio::test]
    async fn test_blank_message_is_rejected_before_background_check() {
        let mut b = builder(ScriptedService::default());

        let err = b.request_card_assembly("  ").await.unwrap_err();
        assert!(matches!(
            err,
            CardError::Validation(ValidationError::EmptyMessage)
        ));
        assert!(b.service().calls().is_empty());
    }

    #[tokio::test]
    async fn test_background_success_updates_session() {
        let service =
            ScriptedService::default().with_background(Ok(BackgroundResponse::ok("X")));
        let mut b = builder(service);

        let reference = b.request_background("  snowy village  ").await.unwrap();

        assert_eq!(reference, "X");
        assert_eq!(b.background(), Some("X"));
        assert_eq!(b.view().preview.as_deref(), Some("X"));
        assert!(b.view().create_enabled);
        assert_eq!(
            b.service().calls(),
            vec![Call::Background("snowy village".into())]
        );
        assert_eq!(*b.service().busy_during_calls.lock().unwrap(), vec![true]);
        assert_eq!(b.view().busy_transitions, vec![true, false]);
        assert!(b.view().notices.is_empty());
    }

    #[tokio::test]
    async fn test_background_failure_keeps_previous_background() {
        let service = ScriptedService::default()
            .with_background(Ok(BackgroundResponse::ok("/img/old.png")))
            .with_background(Ok(BackgroundResponse::failed("E")));
        let mut b = builder(service);

        b.request_background("first").await.unwrap();
        let err = b.request_background("second").await.unwrap_err();

        assert!(matches!(err, CardError::Service(ref m) if m == "E"));
        assert_eq!(b.background(), Some("/img/old.png"));
        assert_eq!(b.view().preview.as_deref(), Some("/img/old.png"));
        assert!(b.view().create_enabled);

        let notice = &b.view().notices[0];
        assert_eq!(notice.level, NoticeLevel::Failure);
        assert!(notice.message.contains('E'));
        assert_eq!(notice.message, "Background generation failed: E");
        assert_eq!(b.view().busy_transitions, vec![true, false, true, false]);
    }

    #[tokio::test]
    async fn test_busy_cleared_after_transport_error() {
        let service = ScriptedService::default().with_background(Err(CardError::Io(
            std::io::Error::new(std::io::ErrorKind::ConnectionReset, "connection reset"),
        )));
        let mut b = builder(service);

        let err = b.request_background("winter forest").await.unwrap_err();

        assert!(matches!(err, CardError::Io(_)));
        assert!(!b.view().busy.load(Ordering::SeqCst));
        assert_eq!(b.view().busy_transitions, vec![true, false]);
        assert_eq!(b.view().notices[0].level, NoticeLevel::Error);
        assert!(b.view().notices[0].message.contains("connection reset"));
        assert!(b.view().preview.is_none());
    }

    #[tokio::test]
    async fn test_end_to_end_card() {
        let service = ScriptedService::default()
            .with_background(Ok(BackgroundResponse::ok("/img/1.png")))
            .with_card(Ok(CardResponse::ok("/img/card1.png")));
        let mut b = builder(service);

        b.request_background("winter forest").await.unwrap();
        assert_eq!(b.view().preview.as_deref(), Some("/img/1.png"));
        assert!(b.view().create_enabled);

        let card = b.request_card_assembly("Happy Holidays").await.unwrap();
        assert_eq!(card, "/img/card1.png");
        assert_eq!(b.card(), Some("/img/card1.png"));
        assert_eq!(b.view().result.as_deref(), Some("/img/card1.png"));
        assert_eq!(b.view().scrolled, 1);
        assert_eq!(
            b.service().calls(),
            vec![
                Call::Background("winter forest".into()),
                Call::Card("/img/1.png".into(), "Happy Holidays".into()),
            ]
        );
        assert_eq!(*b.service().busy_during_calls.lock().unwrap(), vec![true, true]);
        assert!(!b.view().busy.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_card_failure_keeps_previous_result() {
        let service = ScriptedService::default()
            .with_background(Ok(BackgroundResponse::ok("/img/1.png")))
            .with_card(Ok(CardResponse::ok("/img/card1.png")))
            .with_card(Ok(CardResponse::failed("text overlay failed")));
        let mut b = builder(service);

        b.request_background("winter forest").await.unwrap();
        b.request_card_assembly("Happy Holidays").await.unwrap();
        let err = b.request_card_assembly("Merry Christmas").await.unwrap_err();

        assert!(matches!(err, CardError::Service(_)));
        assert_eq!(b.card(), Some("/img/card1.png"));
        assert_eq!(b.view().result.as_deref(), Some("/img/card1.png"));
        assert_eq!(
            b.view().notices[0].message,
            "Card creation failed: text overlay failed"
        );
        assert_eq!(b.view().busy_transitions.last(), Some(&false));
    }

    #[tokio::test]
    async fn test_unreachable_backend_end_to_end() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let service = HttpCardService::builder()
            .base_url(format!("http://{addr}"))
            .build()
            .unwrap();
        let mut b = CardBuilder::new(service, RecordingView::default());

        let err = b.request_background("winter forest").await.unwrap_err();

        assert!(matches!(err, CardError::Network(_)));
        let notice = &b.view().notices[0];
        assert_eq!(notice.level, NoticeLevel::Error);
        assert!(notice.message.contains(&err.to_string()));
        assert!(b.view().preview.is_none());
        assert!(b.background().is_none());
        assert_eq!(b.view().busy_transitions, vec![true, false]);
    }

    #[tokio::test]
    async fn test_download_uses_default_filename() {
        let service = ScriptedService::default()
            .with_background(Ok(BackgroundResponse::ok("/img/1.png")))
            .with_card(Ok(CardResponse::ok("/img/card1.png")));
        let mut b = builder(service);

        let err = b.download_card().unwrap_err();
        assert!(matches!(err, CardError::Validation(ValidationError::NoCard)));
        assert!(b.view().saved.is_empty());

        b.request_background("winter forest").await.unwrap();
        b.request_card_assembly("Happy Holidays").await.unwrap();
        b.download_card().unwrap();

        assert_eq!(
            b.view().saved,
            vec![("/img/card1.png".to_string(), DEFAULT_CARD_FILENAME.to_string())]
        );
        assert_eq!(b.service().calls().len(), 2);
    }

    #[tokio::test]
    async fn test_download_failure_is_reported() {
        let service = ScriptedService::default()
            .with_background(Ok(BackgroundResponse::ok("/img/1.png")))
            .with_card(Ok(CardResponse::ok("/img/card1.png")));
        let mut b = builder(service);
        b.request_background("winter forest").await.unwrap();
        b.request_card_assembly("Happy Holidays").await.unwrap();

        b.view.fail_saves = true;
        let err = b.download_card().unwrap_err();

        assert!(matches!(err, CardError::UnsupportedReference(_)));
        assert_eq!(b.view().notices.len(), 1);
        assert_eq!(b.view().notices[0].level, NoticeLevel::Error);
    }
}
