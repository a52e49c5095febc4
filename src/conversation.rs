use anyhow::Result;

use crate::message::{Message, Sender};

/// Assistant turn seeded into every fresh transcript.
pub const GREETING: &str = "Hello! I'm your AI-powered real estate assistant. I can help with property information, market trends, buying advice, and more. How can I assist you today?";

/// Reply substituted when the backend is already known unreachable and the
/// network call is skipped.
pub const OFFLINE_REPLY: &str =
    "I'm having trouble connecting to my knowledge base right now. Please try again later.";

/// Reply substituted when a dispatched send fails.
pub const ERROR_REPLY: &str = "I'm having trouble connecting to my knowledge base right now. Please try again later or ask another question about real estate.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Connectivity {
    /// Startup probe has not resolved yet.
    Unknown,
    Connected,
    /// Set by any probe or send failure; never re-upgraded within a session.
    Disconnected,
}

/// What the caller should do after handing user input to [`Conversation::submit`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    /// Blank input, or a send already in flight: nothing changed.
    Ignored,
    /// Backend known unreachable; fallback reply already appended locally.
    AnsweredLocally,
    /// Composed prompt to dispatch; [`Conversation::settle`] must be called
    /// with the outcome.
    Dispatch(String),
}

/// Owns the transcript, the connectivity flag, and the one-in-flight send
/// state machine. All mutations happen on the UI loop; the only async work
/// (probe, send) is done by the caller between `submit` and `settle`.
pub struct Conversation {
    messages: Vec<Message>,
    connectivity: Connectivity,
    awaiting_reply: bool,
    next_id: u64,
}

impl Conversation {
    pub fn new() -> Self {
        let mut conversation = Self {
            messages: Vec::new(),
            connectivity: Connectivity::Unknown,
            awaiting_reply: false,
            next_id: 1,
        };
        conversation.append(Sender::Assistant, GREETING);
        conversation
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn connectivity(&self) -> Connectivity {
        self.connectivity
    }

    /// True strictly between a dispatched submission and its settling; the
    /// input and send controls are inert while set.
    pub fn awaiting_reply(&self) -> bool {
        self.awaiting_reply
    }

    /// Record the outcome of the one-shot startup probe.
    pub fn record_probe(&mut self, result: Result<String>) {
        match result {
            Ok(_) => {
                self.connectivity = Connectivity::Connected;
                tracing::info!("Gemini API connection successful");
            }
            Err(err) => {
                self.connectivity = Connectivity::Disconnected;
                tracing::error!("Gemini API connection failed: {err:#}");
            }
        }
    }

    /// Run one submission through the loop: trim, optimistic user append,
    /// then either a local fallback (known disconnected) or a composed
    /// prompt for the caller to dispatch.
    pub fn submit(&mut self, input: &str) -> Submission {
        let text = input.trim();
        if text.is_empty() || self.awaiting_reply {
            return Submission::Ignored;
        }

        self.append(Sender::User, text);

        if self.connectivity == Connectivity::Disconnected {
            self.append(Sender::Assistant, OFFLINE_REPLY);
            return Submission::AnsweredLocally;
        }

        self.awaiting_reply = true;
        Submission::Dispatch(compose_prompt(text))
    }

    /// Apply the settled result of a dispatched send. A failure, or a reply
    /// that trims to nothing, downgrades connectivity and substitutes the
    /// fixed error reply.
    pub fn settle(&mut self, result: Result<String>) {
        match result {
            Ok(reply) if !reply.trim().is_empty() => {
                self.append(Sender::Assistant, reply);
            }
            Ok(_) => {
                tracing::warn!("model returned an empty reply");
                self.connectivity = Connectivity::Disconnected;
                self.append(Sender::Assistant, ERROR_REPLY);
            }
            Err(err) => {
                tracing::error!("error generating response: {err:#}");
                self.connectivity = Connectivity::Disconnected;
                self.append(Sender::Assistant, ERROR_REPLY);
            }
        }
        self.awaiting_reply = false;
    }

    fn append(&mut self, sender: Sender, text: impl Into<String>) {
        let id = self.next_id;
        self.next_id += 1;
        self.messages.push(Message::new(id, sender, text));
    }
}

impl Default for Conversation {
    fn default() -> Self {
        Self::new()
    }
}

/// Wrap a user question in the fixed real-estate framing instruction.
pub fn compose_prompt(question: &str) -> String {
    let mut prompt = String::new();
    prompt.push_str("You are an AI assistant for a real estate website called EstateForge. ");
    prompt.push_str(
        "Answer the following question about real estate, properties, housing market, or related topics. ",
    );
    prompt.push_str("Be helpful, concise, and informative: ");
    prompt.push_str(question);
    prompt
}
