use anyhow::Result;
use async_trait::async_trait;

/// Prompt for the one-shot startup connectivity check. Any successful
/// completion counts as connected; the requested wording is not verified.
pub const PROBE_PROMPT: &str =
    "Hello, can you respond with just the words \"Connection successful\"?";

/// Capability seam over the remote model endpoint so the conversation loop
/// and prober can run against a fake in tests.
#[async_trait]
pub trait ModelClient: Send + Sync {
    /// One-shot connectivity check; `Err` means the backend is unreachable.
    async fn probe(&self) -> Result<String>;

    /// Send a fully composed prompt and return the model's reply text.
    async fn send(&self, prompt: &str) -> Result<String>;
}
