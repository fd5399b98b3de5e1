//! The speech pipeline boundary.
//!
//! Speech-to-text, turn detection, the language model and text-to-speech
//! are supplied by the hosting platform. The runtime only needs the
//! operations below.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use carecall_types::ChatContext;

use crate::error::AgentError;
use crate::tools::ToolSpec;

#[async_trait]
pub trait SpeechSession: Send + Sync {
    /// Queues `text` for playout to the caller.
    async fn say(&self, text: &str) -> Result<(), AgentError>;

    /// Asks the model for the next agent turn given the persona's context,
    /// instructions and tools. Returns the reply text when the pipeline
    /// produces it synchronously.
    async fn generate_reply(
        &self,
        chat_ctx: &ChatContext,
        instructions: &str,
        tools: &[ToolSpec],
    ) -> Result<Option<String>, AgentError>;

    /// Resolves once any in-flight speech has finished playing.
    async fn wait_for_playout(&self);

    /// Enables or disables the caller-facing audio output.
    fn set_audio_enabled(&self, enabled: bool);

    fn audio_enabled(&self) -> bool;
}

/// A speech session that records what it was asked to do.
///
/// Replies are taken from a script queue; once it is empty,
/// `generate_reply` returns `None`. After [`RecordingSpeech::fail_say`],
/// `say` returns an error without recording the text.
#[derive(Debug)]
pub struct RecordingSpeech {
    said: Mutex<Vec<String>>,
    replies: Mutex<VecDeque<String>>,
    reply_requests: AtomicUsize,
    playout_waits: AtomicUsize,
    audio_enabled: AtomicBool,
    fail_say: AtomicBool,
}

impl Default for RecordingSpeech {
    fn default() -> Self {
        Self {
            said: Mutex::new(Vec::new()),
            replies: Mutex::new(VecDeque::new()),
            reply_requests: AtomicUsize::new(0),
            playout_waits: AtomicUsize::new(0),
            audio_enabled: AtomicBool::new(true),
            fail_say: AtomicBool::new(false),
        }
    }
}

impl RecordingSpeech {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a reply for the next `generate_reply` call.
    pub fn script_reply(&self, reply: impl Into<String>) {
        self.replies
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push_back(reply.into());
    }

    /// Makes subsequent `say` calls fail.
    pub fn fail_say(&self) {
        self.fail_say.store(true, Ordering::SeqCst);
    }

    pub fn said(&self) -> Vec<String> {
        self.said
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn reply_requests(&self) -> usize {
        self.reply_requests.load(Ordering::SeqCst)
    }

    pub fn playout_waits(&self) -> usize {
        self.playout_waits.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SpeechSession for RecordingSpeech {
    async fn say(&self, text: &str) -> Result<(), AgentError> {
        if self.fail_say.load(Ordering::SeqCst) {
            return Err(AgentError::Speech("text-to-speech unavailable".to_string()));
        }
        self.said
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(text.to_string());
        Ok(())
    }

    async fn generate_reply(
        &self,
        _chat_ctx: &ChatContext,
        _instructions: &str,
        _tools: &[ToolSpec],
    ) -> Result<Option<String>, AgentError> {
        self.reply_requests.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .replies
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .pop_front())
    }

    async fn wait_for_playout(&self) {
        self.playout_waits.fetch_add(1, Ordering::SeqCst);
    }

    fn set_audio_enabled(&self, enabled: bool) {
        self.audio_enabled.store(enabled, Ordering::SeqCst);
    }

    fn audio_enabled(&self) -> bool {
        self.audio_enabled.load(Ordering::SeqCst)
    }
}
