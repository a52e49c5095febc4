use std::sync::Arc;

use anyhow::Result;
use tokio::task::JoinHandle;

use crate::client::ModelClient;
use crate::conversation::{Conversation, Submission};

/// Widget state for one run: the conversation core plus everything the
/// terminal surface needs (input buffer, viewport, in-flight task handles).
pub struct App {
    pub should_quit: bool,
    pub panel_open: bool,

    // Input state
    pub input: String,
    pub input_cursor: usize, // cursor position in input, in chars

    // Chat viewport (updated during render, used for scroll calculations)
    pub chat_scroll: u16,
    pub chat_height: u16,
    pub chat_width: u16,

    // Animation state (0-2 for the thinking ellipsis)
    pub animation_frame: u8,

    pub conversation: Conversation,
    client: Arc<dyn ModelClient>,
    probe_task: Option<JoinHandle<Result<String>>>,
    send_task: Option<JoinHandle<Result<String>>>,
}

impl App {
    pub fn new(client: Arc<dyn ModelClient>) -> Self {
        // Fire the one-shot connectivity probe; it must not block the first
        // render, so only its handle is kept and polled on tick.
        let probe_client = client.clone();
        let probe_task = Some(tokio::spawn(async move { probe_client.probe().await }));

        Self {
            should_quit: false,
            panel_open: false,

            input: String::new(),
            input_cursor: 0,

            chat_scroll: 0,
            chat_height: 0,
            chat_width: 0,

            animation_frame: 0,

            conversation: Conversation::new(),
            client,
            probe_task,
            send_task: None,
        }
    }

    pub fn awaiting_reply(&self) -> bool {
        self.conversation.awaiting_reply()
    }

    /// Run the input buffer through the conversation loop. The buffer is
    /// cleared only when the submission actually appended a user turn.
    pub fn submit_input(&mut self) {
        let input = self.input.clone();
        match self.conversation.submit(&input) {
            Submission::Ignored => {}
            Submission::AnsweredLocally => {
                self.input.clear();
                self.input_cursor = 0;
                self.scroll_chat_to_bottom();
            }
            Submission::Dispatch(prompt) => {
                self.input.clear();
                self.input_cursor = 0;
                let client = self.client.clone();
                self.send_task = Some(tokio::spawn(async move { client.send(&prompt).await }));
                self.scroll_chat_to_bottom();
            }
        }
    }

    /// Tick: poll in-flight tasks and advance the thinking animation.
    pub async fn tick(&mut self) {
        self.poll_tasks().await;
        if self.awaiting_reply() {
            self.animation_frame = (self.animation_frame + 1) % 3;
        }
    }

    /// Apply results of the probe/send tasks once they finish. Quitting with
    /// a task still in flight simply drops the handle; no cancellation.
    pub async fn poll_tasks(&mut self) {
        if self.probe_task.as_ref().is_some_and(|t| t.is_finished()) {
            if let Some(task) = self.probe_task.take() {
                self.conversation.record_probe(join_result(task.await));
            }
        }

        if self.send_task.as_ref().is_some_and(|t| t.is_finished()) {
            if let Some(task) = self.send_task.take() {
                self.conversation.settle(join_result(task.await));
                self.scroll_chat_to_bottom();
            }
        }
    }

    // Transcript scrolling
    pub fn scroll_up(&mut self) {
        self.chat_scroll = self.chat_scroll.saturating_sub(1);
    }

    pub fn scroll_down(&mut self) {
        self.chat_scroll = self.chat_scroll.saturating_add(1);
    }

    pub fn scroll_page_up(&mut self) {
        self.chat_scroll = self.chat_scroll.saturating_sub(self.chat_height.max(1));
    }

    pub fn scroll_page_down(&mut self) {
        self.chat_scroll = self.chat_scroll.saturating_add(self.chat_height.max(1));
    }

    /// Scroll so the latest message (or the thinking indicator) is visible.
    pub fn scroll_chat_to_bottom(&mut self) {
        // Use actual chat width for wrap calculation, default to 50 if not set
        let wrap_width = if self.chat_width > 0 {
            self.chat_width as usize
        } else {
            50
        };

        let mut total_lines: u16 = 0;

        for msg in self.conversation.messages() {
            total_lines += 1; // Sender label line
            for line in msg.text.lines() {
                // Use character count, not byte length, for proper UTF-8 handling
                let char_count = line.chars().count();
                if char_count == 0 {
                    total_lines += 1; // Empty line still takes one line
                } else {
                    total_lines += ((char_count / wrap_width) + 1) as u16;
                }
            }
            total_lines += 2; // Timestamp line + blank line after message
        }

        if self.awaiting_reply() {
            total_lines += 2; // Label + thinking indicator
        }

        let visible_height = if self.chat_height > 0 {
            self.chat_height
        } else {
            20
        };

        self.chat_scroll = total_lines.saturating_sub(visible_height);
    }
}

fn join_result(joined: Result<Result<String>, tokio::task::JoinError>) -> Result<String> {
    match joined {
        Ok(result) => result,
        Err(err) => Err(err.into()),
    }
}
