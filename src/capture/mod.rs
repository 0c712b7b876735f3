//! Capture sessions
//!
//! This module provides the session objects that turn a live device or
//! recognition stream into a finished artifact:
//! - `PhotoSession`: camera frame -> PNG data URL
//! - `RecorderSession`: encoded chunks -> WebM blob -> data URL
//! - `SpeechSession`: recognition events -> accumulated transcript
//!
//! Sessions own at most one stream, release before every acquire, and treat
//! release as idempotent. Real hardware sits behind the `MediaSource` and
//! `Recognizer` traits; tests drive sessions with synthetic implementations.

pub mod device;
pub mod photo;
pub mod recorder;
pub mod speech;

pub use device::{DeviceError, Facing, MediaSource, MediaStream, RawFrame, StreamConstraints};
pub use photo::{PhotoDownload, PhotoSession};
pub use recorder::{RecorderSession, RecorderState, VideoBlob};
pub use speech::{Recognizer, SpeechEvent, SpeechSession, SpeechState};

/// Severity of a user-facing status line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Success,
    Error,
}

/// Inline status message shown next to the capture controls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub level: StatusLevel,
    pub text: String,
}

impl StatusMessage {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            level: StatusLevel::Info,
            text: text.into(),
        }
    }

    pub fn success(text: impl Into<String>) -> Self {
        Self {
            level: StatusLevel::Success,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            level: StatusLevel::Error,
            text: text.into(),
        }
    }
}
