//! EstateForge Assistant: a terminal chat widget for the EstateForge real
//! estate site, backed by the Gemini generateContent API.
//!
//! The conversation loop and the one-shot connectivity prober live in
//! [`conversation`] and are driven through the [`client::ModelClient`]
//! capability trait, so both can be exercised against fakes. The remaining
//! modules are the terminal surface.

pub mod app;
pub mod client;
pub mod config;
pub mod conversation;
pub mod gemini;
pub mod handler;
pub mod logging;
pub mod message;
pub mod tui;
pub mod ui;

pub use client::ModelClient;
pub use config::Config;
pub use conversation::{compose_prompt, Connectivity, Conversation, Submission};
pub use gemini::GeminiClient;
pub use message::{Message, Sender};

#[cfg(test)]
pub mod test_utils;
