use async_trait::async_trait;

/// Repository for generative model completions.
/// Abstracts the underlying provider (Anthropic, OpenAI, local models, etc.)
///
/// Implementations are responsible for:
/// - Request formatting and authentication
/// - Extracting the reply text from the provider's response shape
///
/// Implementations do NOT parse the reply: recovery of structured content
/// from it belongs to the caller.
#[async_trait]
pub trait ModelRepository: Send + Sync {
    /// Request a completion for the given system and user prompts.
    ///
    /// Returns the raw reply text, which may be malformed, truncated, or
    /// wrapped in prose.
    ///
    /// # Errors
    /// Returns error if the provider is unreachable, rejects the request,
    /// or is not configured.
    async fn complete(&self, system_prompt: &str, user_prompt: &str) -> Result<String, String>;
}
