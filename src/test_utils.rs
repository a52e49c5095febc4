//! Shared fakes for unit tests.

use std::sync::Mutex;

use anyhow::{anyhow, Result};
use async_trait::async_trait;

use crate::client::ModelClient;

/// Deterministic [`ModelClient`] that records every dispatched prompt.
pub struct FakeClient {
    probe_ok: bool,
    reply: Option<String>,
    sent: Mutex<Vec<String>>,
}

impl FakeClient {
    /// Probe succeeds; every send returns `reply`.
    pub fn connected(reply: &str) -> Self {
        Self {
            probe_ok: true,
            reply: Some(reply.to_string()),
            sent: Mutex::new(Vec::new()),
        }
    }

    /// Probe fails; sends would fail too.
    pub fn unreachable() -> Self {
        Self {
            probe_ok: false,
            reply: None,
            sent: Mutex::new(Vec::new()),
        }
    }

    pub fn sent_prompts(&self) -> Vec<String> {
        self.sent.lock().expect("prompt log poisoned").clone()
    }
}

#[async_trait]
impl ModelClient for FakeClient {
    async fn probe(&self) -> Result<String> {
        if self.probe_ok {
            Ok("Connection successful".to_string())
        } else {
            Err(anyhow!("probe refused"))
        }
    }

    async fn send(&self, prompt: &str) -> Result<String> {
        self.sent
            .lock()
            .expect("prompt log poisoned")
            .push(prompt.to_string());
        match &self.reply {
            Some(reply) => Ok(reply.clone()),
            None => Err(anyhow!("backend unreachable")),
        }
    }
}
