//! Text formatting through a generative-language backend
//!
//! - `prompt`: prompt template and default instructions
//! - `prospect`: outreach instructions built from prospect details
//!
//! Formatting fails open: any problem reaching the backend hands the caller
//! back the text it sent in.

pub mod prompt;
pub mod prospect;

use std::fmt;

use tracing::{error, info, warn};

use crate::config::{Credential, Settings};
use crate::error::DispatchError;
use crate::gemini::{GeminiClient, GenerativeModel};

/// Backend state chosen once at startup
pub enum Backend<M = GeminiClient> {
    Configured(M),
    Degraded,
}

impl Backend<GeminiClient> {
    pub fn initialize(settings: &Settings, credential: Option<Credential>) -> Self {
        let Some(credential) = credential else {
            warn!("⚠️  Warning: GOOGLE_API_KEY not found. AI features may not work.");
            return Backend::Degraded;
        };

        match GeminiClient::new(settings, credential) {
            Ok(client) => {
                info!("✅ Google AI configured successfully ({})", settings.model);
                Backend::Configured(client)
            }
            Err(e) => {
                error!("❌ Failed to configure Google AI client: {}", e);
                Backend::Degraded
            }
        }
    }
}

impl<M> Backend<M> {
    pub fn is_configured(&self) -> bool {
        matches!(self, Backend::Configured(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatRequest {
    pub text: String,
    pub instructions: Option<String>,
}

impl FormatRequest {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            instructions: None,
        }
    }

    pub fn with_instructions(mut self, instructions: impl Into<String>) -> Self {
        self.instructions = Some(instructions.into());
        self
    }

    pub fn prompt(&self) -> String {
        prompt::build_prompt(&self.text, self.instructions.as_deref())
    }
}

#[derive(Debug)]
pub enum FallbackReason {
    NotConfigured,
    Dispatch(DispatchError),
}

impl fmt::Display for FallbackReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FallbackReason::NotConfigured => write!(f, "GOOGLE_API_KEY not set"),
            FallbackReason::Dispatch(e) => write!(f, "{}", e),
        }
    }
}

#[derive(Debug)]
pub enum FormatOutcome {
    Formatted(String),
    Unchanged { text: String, reason: FallbackReason },
}

impl FormatOutcome {
    pub fn into_text(self) -> String {
        match self {
            FormatOutcome::Formatted(text) | FormatOutcome::Unchanged { text, .. } => text,
        }
    }

    pub fn is_formatted(&self) -> bool {
        matches!(self, FormatOutcome::Formatted(_))
    }
}

pub struct TextFormatter<M = GeminiClient> {
    backend: Backend<M>,
}

impl<M: GenerativeModel> TextFormatter<M> {
    pub fn new(backend: Backend<M>) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &Backend<M> {
        &self.backend
    }

    /// Run the pipeline and report why the text came back unchanged, if it did.
    pub fn try_format(&self, request: FormatRequest) -> FormatOutcome {
        let model = match &self.backend {
            Backend::Configured(model) => model,
            Backend::Degraded => {
                return FormatOutcome::Unchanged {
                    text: request.text,
                    reason: FallbackReason::NotConfigured,
                }
            }
        };

        let result = model.generate(&request.prompt()).and_then(|response| {
            let trimmed = response.trim();
            if trimmed.is_empty() {
                Err(DispatchError::EmptyResponse)
            } else {
                Ok(trimmed.to_string())
            }
        });

        match result {
            Ok(formatted) => FormatOutcome::Formatted(formatted),
            Err(e) => FormatOutcome::Unchanged {
                text: request.text,
                reason: FallbackReason::Dispatch(e),
            },
        }
    }

    /// Format `text`, returning it unchanged on any failure.
    pub fn format(&self, text: &str, instructions: Option<&str>) -> String {
        let mut request = FormatRequest::new(text);
        request.instructions = instructions.map(str::to_string);

        match self.try_format(request) {
            FormatOutcome::Formatted(formatted) => {
                info!("✅ AI formatted text successfully");
                formatted
            }
            FormatOutcome::Unchanged {
                text,
                reason: FallbackReason::NotConfigured,
            } => {
                warn!("⚠️  GOOGLE_API_KEY not set, returning original text");
                text
            }
            FormatOutcome::Unchanged {
                text,
                reason: FallbackReason::Dispatch(e),
            } => {
                error!("❌ Error formatting text with AI: {}", e);
                text
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gemini::MockGenerativeModel;
    use std::io;
    use std::net::TcpListener;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    #[derive(Clone, Default)]
    struct LogBuffer(Arc<Mutex<Vec<u8>>>);

    impl io::Write for LogBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl LogBuffer {
        fn contents(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    fn configured(mock: MockGenerativeModel) -> TextFormatter<MockGenerativeModel> {
        TextFormatter::new(Backend::Configured(mock))
    }

    fn degraded() -> TextFormatter<MockGenerativeModel> {
        TextFormatter::new(Backend::Degraded)
    }

    #[test]
    fn test_degraded_mode_is_identity() {
        let formatter = degraded();
        let text = "hey can u cover my shift";

        assert_eq!(formatter.format(text, None), text);
        assert_eq!(formatter.format(text, Some("Make it formal.")), text);
        assert!(!formatter.backend().is_configured());
    }

    #[test]
    fn test_degraded_mode_reports_reason() {
        let outcome = degraded().try_format(FormatRequest::new("hi"));
        match outcome {
            FormatOutcome::Unchanged {
                text,
                reason: FallbackReason::NotConfigured,
            } => assert_eq!(text, "hi"),
            other => panic!("Expected NotConfigured, got {:?}", other),
        }
    }

    #[test]
    fn test_degraded_mode_is_idempotent() {
        let formatter = degraded();
        let once = formatter.format("see u tmrw", None);
        let twice = formatter.format(&once, None);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_success_trims_response() {
        let mut mock = MockGenerativeModel::new();
        mock.expect_generate()
            .times(1)
            .returning(|_| Ok("\n  Could you please cover my shift?  \n".to_string()));

        let result = configured(mock).format("hey can u cover my shift", None);
        assert_eq!(result, "Could you please cover my shift?");
    }

    #[test]
    fn test_sends_built_prompt() {
        let text = "hey can u cover my shift";
        let expected_prompt = prompt::build_prompt(text, Some("Make it a haiku."));

        let mut mock = MockGenerativeModel::new();
        mock.expect_generate()
            .withf(move |prompt| prompt == expected_prompt)
            .times(1)
            .returning(|_| Ok("shift swap request".to_string()));

        let result = configured(mock).format(text, Some("Make it a haiku."));
        assert_eq!(result, "shift swap request");
    }

    #[test]
    fn test_omitted_instructions_send_default_prompt() {
        let text = "pls send the report";
        let expected_prompt = prompt::build_prompt(text, Some(prompt::DEFAULT_INSTRUCTIONS));

        let mut mock = MockGenerativeModel::new();
        mock.expect_generate()
            .withf(move |prompt| prompt == expected_prompt)
            .times(1)
            .returning(|_| Ok("Please send the report.".to_string()));

        assert_eq!(configured(mock).format(text, None), "Please send the report.");
    }

    #[test]
    fn test_dispatch_error_returns_original() {
        let mut mock = MockGenerativeModel::new();
        mock.expect_generate().times(1).returning(|_| {
            Err(DispatchError::Service {
                status: 503,
                message: "The model is overloaded.".to_string(),
            })
        });

        let formatter = configured(mock);
        let text = "hey can u cover my shift";
        assert_eq!(formatter.format(text, None), text);
    }

    #[test]
    fn test_dispatch_error_keeps_reason() {
        let mut mock = MockGenerativeModel::new();
        mock.expect_generate()
            .returning(|_| Err(DispatchError::Blocked { reason: "SAFETY".to_string() }));

        let outcome = configured(mock).try_format(FormatRequest::new("original"));
        assert!(!outcome.is_formatted());
        match outcome {
            FormatOutcome::Unchanged {
                text,
                reason: FallbackReason::Dispatch(DispatchError::Blocked { reason }),
            } => {
                assert_eq!(text, "original");
                assert_eq!(reason, "SAFETY");
            }
            other => panic!("Expected Blocked fallback, got {:?}", other),
        }
    }

    #[test]
    fn test_blank_response_falls_back() {
        let mut mock = MockGenerativeModel::new();
        mock.expect_generate().returning(|_| Ok("   \n".to_string()));

        let outcome = configured(mock).try_format(FormatRequest::new("keep me"));
        assert!(matches!(
            outcome,
            FormatOutcome::Unchanged {
                reason: FallbackReason::Dispatch(DispatchError::EmptyResponse),
                ..
            }
        ));
        assert_eq!(outcome.into_text(), "keep me");
    }

    #[test]
    fn test_empty_text_still_dispatched() {
        let mut mock = MockGenerativeModel::new();
        mock.expect_generate().times(1).returning(|_| Ok("Hello.".to_string()));

        assert_eq!(configured(mock).format("", None), "Hello.");
    }

    #[test]
    fn test_request_builder() {
        let request = FormatRequest::new("text").with_instructions("Be brief.");
        assert_eq!(request.instructions.as_deref(), Some("Be brief."));
        assert!(request.prompt().starts_with("Be brief."));
    }

    #[test]
    fn test_initialize_without_credential_degrades() {
        let backend = Backend::initialize(&Settings::default(), None);
        assert!(!backend.is_configured());
    }

    #[test]
    fn test_initialize_with_credential_configures() {
        let backend = Backend::initialize(&Settings::default(), Credential::new("test-key"));
        assert!(backend.is_configured());
    }

    #[test]
    fn test_fallback_reason_display() {
        assert_eq!(FallbackReason::NotConfigured.to_string(), "GOOGLE_API_KEY not set");
        assert_eq!(
            FallbackReason::Dispatch(DispatchError::EmptyResponse).to_string(),
            "Service returned no text"
        );
    }

    #[test]
    fn test_unreachable_service_returns_original_and_logs_detail() {
        let port = TcpListener::bind("127.0.0.1:0").unwrap().local_addr().unwrap().port();
        let settings = Settings {
            endpoint: format!("http://127.0.0.1:{}/v1beta", port),
            timeout: Some(Duration::from_secs(5)),
            ..Settings::default()
        };
        let client = GeminiClient::new(&settings, Credential::new("test-key").unwrap()).unwrap();
        let formatter = TextFormatter::new(Backend::Configured(client));
        let text = "hey can u cover my shift";

        match formatter.try_format(FormatRequest::new(text)) {
            FormatOutcome::Unchanged {
                text: original,
                reason: FallbackReason::Dispatch(DispatchError::Http(_)),
            } => assert_eq!(original, text),
            other => panic!("Expected Http fallback, got {:?}", other),
        }

        let logs = LogBuffer::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .finish();
        let result = tracing::subscriber::with_default(subscriber, || formatter.format(text, None));

        assert_eq!(result, text);
        let logs = logs.contents();
        assert!(logs.contains("Error formatting text with AI"), "logs: {}", logs);
        assert!(logs.contains("HTTP request failed"), "logs: {}", logs);
    }
}
