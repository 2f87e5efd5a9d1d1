/// AI writing assistant
///
/// The API's `/ai/*` endpoints are a thin pass-through to an external
/// text-generation service. This module owns the pieces in between:
///
/// - [`TextGenerator`]: the seam to the provider (one prompt in, text out)
/// - [`openai::OpenAiClient`]: production implementation over an
///   OpenAI-compatible `/chat/completions` endpoint
/// - [`AiAssistant`]: the four operations, built from [`prompts`]
///
/// There is no retry or fallback. A failed provider call is returned to the
/// caller as-is.
///
/// # Example
///
/// ```no_run
/// use quillpress_shared::ai::{openai::{AiConfig, OpenAiClient}, AiAssistant};
/// use std::sync::Arc;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = OpenAiClient::new(AiConfig {
///     api_key: "sk-...".to_string(),
///     ..Default::default()
/// })?;
/// let assistant = AiAssistant::new(Arc::new(client));
///
/// let tags = assistant.suggest_tags("<p>Borrow checking in practice</p>").await?;
/// # Ok(())
/// # }
/// ```

pub mod openai;
pub mod prompts;

use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

/// Error type for AI operations
#[derive(Debug, thiserror::Error)]
pub enum AiError {
    /// The request never got a usable HTTP response
    #[error("AI service request failed: {0}")]
    Request(String),

    /// The provider answered with a non-success status
    #[error("AI service returned {status}: {message}")]
    Provider { status: u16, message: String },

    /// The provider answered but produced no text
    #[error("AI service returned an empty response")]
    EmptyResponse,

    /// Client could not be built from its configuration
    #[error("AI service is misconfigured: {0}")]
    Config(String),
}

/// AI result type alias
pub type AiResult<T> = Result<T, AiError>;

/// A text-generation backend
///
/// Implementations send one system instruction plus one user message and
/// return the model's reply verbatim.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Short name for logs
    fn name(&self) -> &str;

    /// Generates a reply to `input` under the `instruction` system prompt
    async fn generate(&self, instruction: &str, input: &str) -> AiResult<String>;
}

/// The four writing-assistant operations
#[derive(Clone)]
pub struct AiAssistant {
    generator: Arc<dyn TextGenerator>,
}

impl AiAssistant {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self { generator }
    }

    async fn run(&self, operation: &str, instruction: &str, content: &str) -> AiResult<String> {
        debug!(
            provider = self.generator.name(),
            operation,
            content_len = content.len(),
            "Calling AI provider"
        );

        let reply = self.generator.generate(instruction, content).await?;
        let reply = reply.trim();
        if reply.is_empty() {
            return Err(AiError::EmptyResponse);
        }
        Ok(reply.to_string())
    }

    /// Rewrites content for clarity and grammar, keeping its HTML structure
    pub async fn improve_content(&self, content: &str) -> AiResult<String> {
        self.run("improve", prompts::IMPROVE, content).await
    }

    /// Produces a short summary of the content
    pub async fn summarize(&self, content: &str) -> AiResult<String> {
        self.run("summary", prompts::SUMMARY, content).await
    }

    /// Suggests a single title
    pub async fn suggest_title(&self, content: &str) -> AiResult<String> {
        let reply = self.run("suggest_title", prompts::SUGGEST_TITLE, content).await?;
        let title = prompts::parse_title(&reply);
        if title.is_empty() {
            return Err(AiError::EmptyResponse);
        }
        Ok(title)
    }

    /// Suggests up to [`prompts::MAX_SUGGESTED_TAGS`] normalized tags
    pub async fn suggest_tags(&self, content: &str) -> AiResult<Vec<String>> {
        let reply = self.run("suggest_tags", prompts::SUGGEST_TAGS, content).await?;
        Ok(prompts::parse_tags(&reply))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Replies with a fixed string and records what it was asked
    struct CannedGenerator {
        reply: String,
        calls: Mutex<Vec<(String, String)>>,
    }

    impl CannedGenerator {
        fn new(reply: &str) -> Arc<Self> {
            Arc::new(Self {
                reply: reply.to_string(),
                calls: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl TextGenerator for CannedGenerator {
        fn name(&self) -> &str {
            "canned"
        }

        async fn generate(&self, instruction: &str, input: &str) -> AiResult<String> {
            self.calls
                .lock()
                .unwrap()
                .push((instruction.to_string(), input.to_string()));
            Ok(self.reply.clone())
        }
    }

    struct FailingGenerator;

    #[async_trait]
    impl TextGenerator for FailingGenerator {
        fn name(&self) -> &str {
            "failing"
        }

        async fn generate(&self, _instruction: &str, _input: &str) -> AiResult<String> {
            Err(AiError::Provider {
                status: 503,
                message: "overloaded".to_string(),
            })
        }
    }

    #[tokio::test]
    async fn test_improve_passes_content_through() {
        let generator = CannedGenerator::new("  <p>Better text.</p>\n");
        let assistant = AiAssistant::new(generator.clone());

        let improved = assistant.improve_content("<p>text</p>").await.unwrap();
        assert_eq!(improved, "<p>Better text.</p>");

        let calls = generator.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, prompts::IMPROVE);
        assert_eq!(calls[0].1, "<p>text</p>");
    }

    #[tokio::test]
    async fn test_suggest_title_strips_quotes() {
        let assistant = AiAssistant::new(CannedGenerator::new("\"Fearless Concurrency\""));
        assert_eq!(
            assistant.suggest_title("...").await.unwrap(),
            "Fearless Concurrency"
        );
    }

    #[tokio::test]
    async fn test_suggest_tags_parses_reply() {
        let assistant = AiAssistant::new(CannedGenerator::new("Rust, #Async, rust, Tokio"));
        assert_eq!(
            assistant.suggest_tags("...").await.unwrap(),
            vec!["rust", "async", "tokio"]
        );
    }

    #[tokio::test]
    async fn test_blank_reply_is_an_error() {
        let assistant = AiAssistant::new(CannedGenerator::new("   "));
        assert!(matches!(
            assistant.summarize("...").await,
            Err(AiError::EmptyResponse)
        ));
    }

    #[tokio::test]
    async fn test_provider_failure_is_returned() {
        let assistant = AiAssistant::new(Arc::new(FailingGenerator));
        let err = assistant.summarize("...").await.unwrap_err();
        assert_eq!(err.to_string(), "AI service returned 503: overloaded");
    }
}
