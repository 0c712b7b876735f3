// Speech session walkthrough with a scripted recognition provider
//
// Feeds a canned event sequence through the session state machine and prints
// the displayed transcript after each step, including a provider-side
// timeout that the session restarts transparently.
//
// Usage: cargo run --example speech_console

use anyhow::Result;
use snapmail::capture::{Recognizer, SpeechEvent, SpeechSession};
use tracing::info;

/// Provider stand-in; a real one would wrap a recognition engine
struct ConsoleRecognizer;

impl Recognizer for ConsoleRecognizer {
    fn start(&mut self) -> Result<()> {
        info!("(provider) recognition started");
        Ok(())
    }

    fn stop(&mut self) {
        info!("(provider) recognition stopped");
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let mut session = SpeechSession::new(Box::new(ConsoleRecognizer));
    session.start()?;

    let events = [
        SpeechEvent::Result {
            text: "the quick".to_string(),
            is_final: false,
        },
        SpeechEvent::Result {
            text: "the quick brown fox".to_string(),
            is_final: false,
        },
        SpeechEvent::Result {
            text: "the quick brown fox".to_string(),
            is_final: true,
        },
        // Provider times out mid-session; the session restarts it
        SpeechEvent::End,
        SpeechEvent::Result {
            text: "jumps over the lazy dog".to_string(),
            is_final: true,
        },
    ];

    for event in events {
        session.handle_event(event);
        println!("display: {:?}", session.transcript());
    }

    session.request_stop();
    session.handle_event(SpeechEvent::End);

    info!("Provider restarts during session: {}", session.restarts());

    if let Some(text) = session.copy_text() {
        println!("clipboard: {text:?}");
    }

    Ok(())
}
