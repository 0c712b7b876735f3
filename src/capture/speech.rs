use super::StatusMessage;
use anyhow::Result;
use tracing::{info, warn};

/// Controls a continuous speech-recognition provider.
///
/// Implementations wrap a real engine; tests script one. The provider feeds
/// `SpeechEvent`s back into the session.
pub trait Recognizer: Send {
    fn start(&mut self) -> Result<()>;
    fn stop(&mut self);
}

/// Events a recognition provider emits while a session runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpeechEvent {
    /// A transcription hypothesis. Interim results are replaced by later
    /// ones for the same segment; a final result commits the segment.
    Result { text: String, is_final: bool },
    /// The provider ended the session on its side (e.g. a timeout)
    End,
    Error(String),
}

/// Session lifecycle.
///
/// Provider `End` events restart the provider only while `Listening`; after
/// a stop request they complete the stop instead. This keeps provider-side
/// timeouts transparent without fighting a user-initiated stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpeechState {
    Idle,
    Listening,
    StoppingRequested,
}

/// Speech transcription session. Local-only: never talks to a relay.
pub struct SpeechSession {
    recognizer: Box<dyn Recognizer>,
    state: SpeechState,
    /// Finalized transcript segments, space-separated
    committed: String,
    /// Latest interim hypothesis, shown live but not yet committed
    pending: String,
    status: StatusMessage,
    restarts: usize,
}

impl SpeechSession {
    pub fn new(recognizer: Box<dyn Recognizer>) -> Self {
        Self {
            recognizer,
            state: SpeechState::Idle,
            committed: String::new(),
            pending: String::new(),
            status: StatusMessage::info("Status: Ready"),
            restarts: 0,
        }
    }

    /// Begin listening. Text already on screen is preserved: any pending
    /// interim text is folded into the committed transcript first.
    pub fn start(&mut self) -> Result<()> {
        if self.state != SpeechState::Idle {
            warn!("Speech session already listening");
            return Ok(());
        }

        let shown = self.transcript();
        let shown = shown.trim();
        self.committed = if shown.is_empty() {
            String::new()
        } else {
            format!("{shown} ")
        };
        self.pending.clear();

        match self.recognizer.start() {
            Ok(()) => {
                self.state = SpeechState::Listening;
                self.status = StatusMessage::info("Status: Listening... Speak now!");
                Ok(())
            }
            Err(e) => {
                self.status = StatusMessage::error(format!("Error: {e:#}"));
                Err(e)
            }
        }
    }

    /// Ask to stop. The session stays in `StoppingRequested` until the
    /// provider confirms with an `End` event.
    pub fn request_stop(&mut self) {
        if self.state != SpeechState::Listening {
            return;
        }
        self.state = SpeechState::StoppingRequested;
        self.recognizer.stop();
    }

    /// Feed a provider event through the state machine.
    pub fn handle_event(&mut self, event: SpeechEvent) {
        match event {
            SpeechEvent::Result { text, is_final } => {
                // Stray results after a completed stop are dropped
                if self.state == SpeechState::Idle {
                    return;
                }

                if is_final {
                    self.committed.push_str(&text);
                    self.committed.push(' ');
                    self.pending.clear();
                } else {
                    self.pending = text;
                }
            }
            SpeechEvent::End => match self.state {
                SpeechState::Listening => {
                    // Provider-side timeout: restart transparently
                    match self.recognizer.start() {
                        Ok(()) => {
                            self.restarts += 1;
                            info!("Recognition restarted (restart #{})", self.restarts);
                        }
                        Err(e) => {
                            warn!("Failed to restart recognition: {e:#}");
                            self.status = StatusMessage::error(format!("Error: {e:#}"));
                            self.state = SpeechState::Idle;
                        }
                    }
                }
                SpeechState::StoppingRequested => {
                    self.state = SpeechState::Idle;
                    self.status = StatusMessage::info("Status: Ready");
                }
                SpeechState::Idle => {}
            },
            SpeechEvent::Error(e) => {
                warn!("Speech recognition error: {e}");
                self.status = StatusMessage::error(format!("Error: {e}"));
                self.recognizer.stop();
                self.state = SpeechState::Idle;
            }
        }
    }

    /// Committed transcript plus the live interim text.
    pub fn transcript(&self) -> String {
        format!("{}{}", self.committed, self.pending)
    }

    /// Finalized segments only
    pub fn committed(&self) -> &str {
        &self.committed
    }

    /// Clear all accumulated text.
    pub fn clear(&mut self) {
        self.committed.clear();
        self.pending.clear();
        self.status = StatusMessage::info("Status: Text cleared");
    }

    /// Trimmed transcript for the clipboard; `None` when there is nothing.
    pub fn copy_text(&mut self) -> Option<String> {
        let transcript = self.transcript();
        let trimmed = transcript.trim();

        if trimmed.is_empty() {
            self.status = StatusMessage::info("Status: Nothing to copy");
            return None;
        }

        self.status = StatusMessage::info("Status: Copied to clipboard!");
        Some(trimmed.to_string())
    }

    pub fn state(&self) -> SpeechState {
        self.state
    }

    /// Number of transparent provider restarts so far
    pub fn restarts(&self) -> usize {
        self.restarts
    }

    pub fn status(&self) -> &StatusMessage {
        &self.status
    }
}
