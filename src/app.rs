//! Application state and core logic

use crate::api::{TtsApi, TtsApiClient};
use crate::audio::{AudioOutput, RodioOutput};
use crate::clipboard::{ClipboardSink, SystemClipboard};
use crate::config::TuiConfig;
use crate::error::TtsError;
use crate::platform::SHORTCUT_MODIFIER;
use crate::state::{
    AppState, ConfigurationForm, Field, FieldsStatus, FocusTarget, Form, FormData,
    DEFAULT_TEST_TEXT, TOKEN_KEY,
};
use crate::subscribe::subscription_url;
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::sync::Arc;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

/// Results of background work, delivered back to the event loop
#[derive(Debug)]
pub enum AppEvent {
    FieldsLoaded(Result<Vec<Arc<Field>>, TtsError>),
    ListenFinished(Result<(), TtsError>),
}

/// Main application struct
pub struct App {
    /// Current application state
    pub state: AppState,
    /// Status bar feedback, cleared on the next key press
    pub status_message: Option<String>,
    api: Arc<dyn TtsApi>,
    audio: Arc<dyn AudioOutput>,
    clipboard: Box<dyn ClipboardSink>,
    /// Origin used as `host` in subscription URLs
    origin: String,
    events_tx: UnboundedSender<AppEvent>,
    events_rx: UnboundedReceiver<AppEvent>,
    /// Whether the app should quit
    quit: bool,
}

impl App {
    /// Create the app against the configured server
    pub fn new(config: &TuiConfig) -> Result<Self> {
        let address = config.resolve_server_address();
        let client = TtsApiClient::new(&address)?;
        let origin = client.origin();
        tracing::info!("Using TTS server at {origin}");

        let form = ConfigurationForm::new(
            config.token.as_deref().unwrap_or_default(),
            config.test_text.as_deref().unwrap_or(DEFAULT_TEST_TEXT),
        );
        Ok(Self::with_services(
            Arc::new(client),
            Arc::new(RodioOutput),
            Box::new(SystemClipboard),
            origin,
            form,
        ))
    }

    pub fn with_services(
        api: Arc<dyn TtsApi>,
        audio: Arc<dyn AudioOutput>,
        clipboard: Box<dyn ClipboardSink>,
        origin: String,
        form: ConfigurationForm,
    ) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Self {
            state: AppState::new(form, origin.clone()),
            status_message: None,
            api,
            audio,
            clipboard,
            origin,
            events_tx,
            events_rx,
            quit: false,
        }
    }

    /// Check if app should quit
    pub fn should_quit(&self) -> bool {
        self.quit
    }

    /// Current token, persisted on exit
    pub fn token(&self) -> &str {
        self.state
            .form
            .form_data()
            .get(TOKEN_KEY)
            .unwrap_or_default()
    }

    /// Push an error message to the error queue for display
    pub fn push_error(&mut self, message: impl Into<String>) {
        self.state.push_error(message.into());
    }

    /// Fetch the field schema in the background
    pub fn load_fields(&mut self) {
        self.state.fields_status = FieldsStatus::Loading;
        let api = Arc::clone(&self.api);
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            let result = api.fetch_fields().await;
            let _ = tx.send(AppEvent::FieldsLoaded(result));
        });
    }

    /// Apply all finished background work without blocking
    pub fn drain_events(&mut self) {
        while let Ok(event) = self.events_rx.try_recv() {
            self.handle_event(event);
        }
    }

    /// Wait for the next background result
    #[cfg(test)]
    pub async fn next_event(&mut self) -> Option<AppEvent> {
        self.events_rx.recv().await
    }

    pub fn handle_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::FieldsLoaded(Ok(fields)) => {
                self.state.form.load_fields(fields);
                self.state.fields_status = FieldsStatus::Loaded;
                tracing::info!("Loaded {} form fields", self.state.form.tree().len());
            }
            AppEvent::FieldsLoaded(Err(err)) => {
                tracing::error!("There was an error fetching the fields: {err}");
                self.state.fields_status = FieldsStatus::Failed;
                self.push_error(format!("Error fetching the fields: {err}"));
            }
            AppEvent::ListenFinished(result) => {
                self.state.listen_enabled = true;
                match result {
                    Ok(()) => tracing::info!("Playback started"),
                    Err(err) => {
                        tracing::error!("Listen failed: {err}");
                        self.push_error(format!("Error: {err}"));
                    }
                }
            }
        }
    }

    /// Post the form to the invoke endpoint and play the returned audio.
    /// Ignored while a previous invocation is still running.
    pub fn listen(&mut self) {
        if !self.state.listen_enabled {
            return;
        }
        self.state.listen_enabled = false;

        let api = Arc::clone(&self.api);
        let audio = Arc::clone(&self.audio);
        let form = self.state.form.form_data().clone();
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            let result = invoke_and_play(api, audio, form).await;
            let _ = tx.send(AppEvent::ListenFinished(result));
        });
    }

    /// Copy the subscription URL for the current form to the clipboard
    pub fn generate_subscribe_url(&mut self) -> Option<String> {
        let url = match subscription_url(&self.origin, self.state.form.form_data()) {
            Ok(url) => url.to_string(),
            Err(err) => {
                tracing::error!("Failed to build subscribe URL: {err}");
                return None;
            }
        };
        match self.clipboard.set_text(url.clone()) {
            Ok(()) => {
                self.status_message = Some("Subscription URL copied to clipboard!".to_string());
            }
            Err(err) => tracing::error!("Failed to copy URL: {err}"),
        }
        Some(url)
    }

    /// Handle a key press
    pub fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        // Global quit, even over a dialog
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.quit = true;
            return Ok(());
        }

        // Error dialog is modal
        if self.state.has_errors() {
            if matches!(key.code, KeyCode::Enter | KeyCode::Esc) {
                self.state.dismiss_error();
            }
            return Ok(());
        }

        // Clear any status messages on key press
        self.status_message = None;

        // Keyboard shortcuts (work from anywhere)
        match key.code {
            KeyCode::Char('p') if key.modifiers.contains(SHORTCUT_MODIFIER) => {
                self.listen();
                return Ok(());
            }
            KeyCode::Char('u') if key.modifiers.contains(SHORTCUT_MODIFIER) => {
                self.generate_subscribe_url();
                return Ok(());
            }
            _ => {}
        }

        let chord = KeyModifiers::CONTROL | KeyModifiers::ALT;
        let active = self.state.form.active_target();
        let on_select = self
            .state
            .form
            .control(active)
            .is_some_and(|control| control.is_select());

        match key.code {
            KeyCode::Tab | KeyCode::Down => self.state.form.next_field(),
            KeyCode::BackTab | KeyCode::Up => self.state.form.prev_field(),
            KeyCode::Left | KeyCode::Char('h') if on_select => self.state.form.cycle_active(false),
            KeyCode::Right | KeyCode::Char('l') if on_select => self.state.form.cycle_active(true),
            KeyCode::Enter => match active {
                FocusTarget::Listen => self.listen(),
                FocusTarget::Subscribe => {
                    self.generate_subscribe_url();
                }
                _ => self.state.form.next_field(),
            },
            KeyCode::Char(c) if !key.modifiers.intersects(chord) => self.state.form.input_char(c),
            KeyCode::Backspace => self.state.form.backspace(),
            _ => {}
        }
        Ok(())
    }
}

async fn invoke_and_play(
    api: Arc<dyn TtsApi>,
    audio: Arc<dyn AudioOutput>,
    form: FormData,
) -> Result<(), TtsError> {
    let payload = api.invoke(form).await?;
    if let Some(content_type) = &payload.content_type {
        tracing::debug!("Decoding {content_type} audio");
    }
    tokio::task::spawn_blocking(move || audio.play(payload.bytes))
        .await
        .map_err(|e| TtsError::Output(e.to_string()))?
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{AudioPayload, MockTtsApi};
    use crate::audio::MockAudioOutput;
    use crate::clipboard::MockClipboardSink;
    use crate::state::{FieldOption, TEXT_KEY};
    use crossterm::event::KeyEventKind;
    use tokio_test::assert_ok;

    const ORIGIN: &str = "http://127.0.0.1:1233";

    fn app_with(
        api: MockTtsApi,
        audio: MockAudioOutput,
        clipboard: MockClipboardSink,
    ) -> App {
        App::with_services(
            Arc::new(api),
            Arc::new(audio),
            Box::new(clipboard),
            ORIGIN.to_string(),
            ConfigurationForm::new("tok", DEFAULT_TEST_TEXT),
        )
    }

    fn schema() -> Vec<Arc<Field>> {
        vec![Arc::new(Field {
            name: "model".to_string(),
            default_value: "Edge".to_string(),
            options: vec![
                FieldOption {
                    value: "Edge".to_string(),
                    related_fields: vec![Arc::new(Field {
                        name: "voice".to_string(),
                        default_value: "en-US-AriaNeural".to_string(),
                        ..Default::default()
                    })],
                },
                FieldOption {
                    value: "CoquiAI".to_string(),
                    related_fields: vec![],
                },
            ],
            ..Default::default()
        })]
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: crossterm::event::KeyEventState::NONE,
        }
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent {
            modifiers: KeyModifiers::CONTROL,
            ..key(KeyCode::Char(c))
        }
    }

    async fn loaded_app(mut api: MockTtsApi, audio: MockAudioOutput) -> App {
        api.expect_fetch_fields()
            .times(1)
            .returning(|| Ok(schema()));
        let mut app = app_with(api, audio, MockClipboardSink::new());
        app.load_fields();
        let event = app.next_event().await.unwrap();
        app.handle_event(event);
        app
    }

    #[tokio::test]
    async fn test_fields_loaded_builds_tree() {
        let app = loaded_app(MockTtsApi::new(), MockAudioOutput::new()).await;
        assert_eq!(app.state.fields_status, FieldsStatus::Loaded);
        assert_eq!(app.state.form.tree().len(), 2);
        assert_eq!(
            app.state.form.form_data().get("voice"),
            Some("en-US-AriaNeural")
        );
        assert!(!app.state.has_errors());
    }

    #[tokio::test]
    async fn test_fetch_error_populates_nothing_and_alerts() {
        let mut api = MockTtsApi::new();
        api.expect_fetch_fields()
            .times(1)
            .returning(|| Err(TtsError::Server("models unavailable".to_string())));
        let mut app = app_with(api, MockAudioOutput::new(), MockClipboardSink::new());

        app.load_fields();
        let event = app.next_event().await.unwrap();
        app.handle_event(event);

        assert!(app.state.form.tree().is_empty());
        assert_eq!(app.state.fields_status, FieldsStatus::Failed);
        assert!(app
            .state
            .current_error()
            .unwrap()
            .contains("models unavailable"));
    }

    #[tokio::test]
    async fn test_listen_plays_once_and_reenables() {
        let mut api = MockTtsApi::new();
        api.expect_invoke()
            .times(1)
            .withf(|form| form.get("model") == Some("Edge") && form.get(TEXT_KEY).is_some())
            .returning(|_| {
                Ok(AudioPayload {
                    bytes: vec![1, 2, 3],
                    content_type: Some("audio/mpeg".to_string()),
                })
            });
        let mut audio = MockAudioOutput::new();
        audio
            .expect_play()
            .times(1)
            .withf(|bytes| bytes == &vec![1u8, 2, 3])
            .returning(|_| Ok(()));
        let mut app = loaded_app(api, audio).await;

        app.listen();
        assert!(!app.state.listen_enabled);
        // Second press while in flight is ignored
        app.listen();

        let event = app.next_event().await.unwrap();
        app.handle_event(event);
        assert!(app.state.listen_enabled);
        assert!(!app.state.has_errors());
    }

    #[tokio::test]
    async fn test_listen_failure_alerts_and_reenables() {
        let mut api = MockTtsApi::new();
        api.expect_invoke()
            .times(1)
            .returning(|_| Err(TtsError::Server("invalid model".to_string())));
        let mut audio = MockAudioOutput::new();
        audio.expect_play().never();
        let mut app = loaded_app(api, audio).await;

        app.listen();
        let event = app.next_event().await.unwrap();
        app.handle_event(event);

        assert!(app.state.listen_enabled);
        let error = app.state.current_error().unwrap();
        assert!(error.contains("invalid model"));
    }

    #[tokio::test]
    async fn test_decode_failure_alerts_and_reenables() {
        let mut api = MockTtsApi::new();
        api.expect_invoke()
            .returning(|_| Ok(AudioPayload {
                bytes: vec![0],
                content_type: None,
            }));
        let mut audio = MockAudioOutput::new();
        audio
            .expect_play()
            .times(1)
            .returning(|_| Err(TtsError::Decode("unsupported".to_string())));
        let mut app = loaded_app(api, audio).await;

        app.handle_key(ctrl('p')).unwrap();
        let event = app.next_event().await.unwrap();
        app.handle_event(event);

        assert!(app.state.listen_enabled);
        assert!(app.state.current_error().unwrap().contains("decode"));
    }

    #[tokio::test]
    async fn test_subscribe_url_copied_without_text() {
        let mut clipboard = MockClipboardSink::new();
        clipboard
            .expect_set_text()
            .times(1)
            .withf(|url| {
                url.starts_with("http://127.0.0.1:1233/tts/api/subscribe?")
                    && !url.contains("text=")
                    && url.contains("host=http%3A%2F%2F127.0.0.1%3A1233")
            })
            .returning(|_| Ok(()));
        let mut app = app_with(MockTtsApi::new(), MockAudioOutput::new(), clipboard);

        let url = app.generate_subscribe_url().unwrap();
        assert!(url.contains("token=tok"));
        assert_eq!(
            app.status_message.as_deref(),
            Some("Subscription URL copied to clipboard!")
        );
    }

    #[tokio::test]
    async fn test_clipboard_failure_is_not_alerted() {
        let mut clipboard = MockClipboardSink::new();
        clipboard
            .expect_set_text()
            .returning(|_| Err(TtsError::Clipboard("no display".to_string())));
        let mut app = app_with(MockTtsApi::new(), MockAudioOutput::new(), clipboard);

        assert!(app.generate_subscribe_url().is_some());
        assert!(!app.state.has_errors());
        assert!(app.status_message.is_none());
    }

    #[tokio::test]
    async fn test_error_dialog_blocks_input_until_dismissed() {
        let mut app = app_with(
            MockTtsApi::new(),
            MockAudioOutput::new(),
            MockClipboardSink::new(),
        );
        app.push_error("boom");

        app.handle_key(key(KeyCode::Char('x'))).unwrap();
        assert_eq!(app.token(), "tok");

        app.handle_key(key(KeyCode::Esc)).unwrap();
        assert!(!app.state.has_errors());
        app.handle_key(key(KeyCode::Char('x'))).unwrap();
        assert_eq!(app.token(), "tokx");
    }

    #[tokio::test]
    async fn test_ctrl_c_quits_even_with_dialog() {
        let mut app = app_with(
            MockTtsApi::new(),
            MockAudioOutput::new(),
            MockClipboardSink::new(),
        );
        app.push_error("boom");
        assert!(!app.should_quit());
        assert_ok!(app.handle_key(KeyEvent {
            modifiers: KeyModifiers::CONTROL,
            ..key(KeyCode::Char('c'))
        }));
        assert!(app.should_quit());
    }

    #[tokio::test]
    async fn test_fields_arriving_mid_edit_keep_focus() {
        let mut api = MockTtsApi::new();
        api.expect_fetch_fields()
            .times(1)
            .returning(|| Ok(schema()));
        let mut app = app_with(api, MockAudioOutput::new(), MockClipboardSink::new());

        app.load_fields();
        // Before the schema arrives Tab goes straight to the text row
        assert_ok!(app.handle_key(key(KeyCode::Tab)));
        assert_ok!(app.handle_key(key(KeyCode::Char('a'))));

        let event = app.next_event().await.unwrap();
        app.handle_event(event);
        assert_ok!(app.handle_key(key(KeyCode::Char('b'))));

        let text = app.state.form.form_data().get(TEXT_KEY).unwrap();
        assert!(text.ends_with("repo.ab"));
        assert_eq!(app.token(), "tok");
        assert_eq!(app.state.form.active_target(), FocusTarget::Text);
    }

    #[tokio::test]
    async fn test_ctrl_u_copies_from_any_row() {
        let mut clipboard = MockClipboardSink::new();
        clipboard
            .expect_set_text()
            .times(1)
            .withf(|url| url.contains("/tts/api/subscribe?"))
            .returning(|_| Ok(()));
        let mut app = app_with(MockTtsApi::new(), MockAudioOutput::new(), clipboard);

        assert_ok!(app.handle_key(ctrl('u')));
        assert_eq!(app.token(), "tok");
        assert!(app.status_message.is_some());
    }

    #[tokio::test]
    async fn test_arrow_keys_cycle_focused_select() {
        let mut app = loaded_app(MockTtsApi::new(), MockAudioOutput::new()).await;
        app.handle_key(key(KeyCode::Tab)).unwrap();
        app.handle_key(key(KeyCode::Right)).unwrap();

        assert_eq!(app.state.form.form_data().get("model"), Some("CoquiAI"));
        assert!(app.state.form.form_data().get("voice").is_none());
        assert_eq!(app.state.form.tree().len(), 1);
    }

    #[tokio::test]
    async fn test_h_and_l_type_into_inputs() {
        let mut app = loaded_app(MockTtsApi::new(), MockAudioOutput::new()).await;
        app.handle_key(key(KeyCode::Char('h'))).unwrap();
        app.handle_key(key(KeyCode::Char('l'))).unwrap();
        assert_eq!(app.token(), "tokhl");
    }

    #[tokio::test]
    async fn test_enter_on_listen_button_invokes() {
        let mut api = MockTtsApi::new();
        api.expect_invoke().times(1).returning(|_| {
            Ok(AudioPayload {
                bytes: vec![9],
                content_type: None,
            })
        });
        let mut audio = MockAudioOutput::new();
        audio.expect_play().times(1).returning(|_| Ok(()));
        let mut app = loaded_app(api, audio).await;

        app.state.form.focus(FocusTarget::Listen);
        assert_ok!(app.handle_key(key(KeyCode::Enter)));
        assert!(!app.state.listen_enabled);

        let event = app.next_event().await.unwrap();
        app.handle_event(event);
        assert!(app.state.listen_enabled);
    }
}
