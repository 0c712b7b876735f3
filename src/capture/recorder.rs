use super::device::{DeviceError, MediaSource, MediaStream, StreamConstraints};
use super::StatusMessage;
use crate::artifact::{self, ArtifactKind};
use crate::relay::RelayClient;
use anyhow::{bail, Result};
use tokio::sync::mpsc;
use tracing::{info, warn};

/// A finished recording: encoded chunks concatenated into one buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoBlob {
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl VideoBlob {
    pub fn to_data_url(&self) -> String {
        artifact::encode_data_url(&self.mime, &self.bytes)
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Recorder lifecycle. Stopping is one-way: a stopped recording cannot
/// resume, only a fresh one can start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecorderState {
    Inactive,
    Recording,
    Stopped,
}

/// Video recording session.
///
/// Buffers encoded chunks in memory while the recorder runs; the producer
/// closing the chunk channel is the stop signal, after which the chunks are
/// concatenated into a single blob for preview and sending.
pub struct RecorderSession {
    id: String,
    stream: Option<Box<dyn MediaStream>>,
    state: RecorderState,
    recording: Option<VideoBlob>,
    status: StatusMessage,
}

impl RecorderSession {
    pub fn new() -> Self {
        Self {
            id: format!("recorder-{}", uuid::Uuid::new_v4()),
            stream: None,
            state: RecorderState::Inactive,
            recording: None,
            status: StatusMessage::info("Camera off"),
        }
    }

    /// Acquire camera and microphone, releasing any previous stream first.
    pub fn open(&mut self, source: &dyn MediaSource) -> Result<(), DeviceError> {
        self.release();

        info!("Accessing camera/microphone for session {}", self.id);

        match source.acquire(&StreamConstraints::recording()) {
            Ok(stream) => {
                self.stream = Some(stream);
                self.status =
                    StatusMessage::info("Camera ready. Click \"Start Recording\" to begin.");
                Ok(())
            }
            Err(e) => {
                warn!("Device access failed for session {}: {}", self.id, e);
                self.status = StatusMessage::error("Error: Could not access camera/microphone");
                Err(e)
            }
        }
    }

    /// Buffer encoded chunks until the recorder stops (the channel closes),
    /// then keep the concatenated blob. Empty chunks are dropped.
    pub async fn record(&mut self, mut chunk_rx: mpsc::Receiver<Vec<u8>>) -> Result<&VideoBlob> {
        if self.stream.as_ref().map(|s| s.is_live()) != Some(true) {
            bail!("no live stream to record");
        }

        self.state = RecorderState::Recording;
        self.status = StatusMessage::info("Recording...");
        self.recording = None;

        info!("Recording started for session {}", self.id);

        let mut chunks: Vec<Vec<u8>> = Vec::new();
        while let Some(chunk) = chunk_rx.recv().await {
            if chunk.is_empty() {
                continue;
            }
            chunks.push(chunk);
        }

        self.state = RecorderState::Stopped;

        let bytes = chunks.concat();
        info!(
            "Recording stopped for session {} ({} chunks, {} bytes)",
            self.id,
            chunks.len(),
            bytes.len()
        );

        self.status =
            StatusMessage::info("Recording complete. Click \"Send Video\" to email.");

        Ok(&*self.recording.insert(VideoBlob {
            mime: ArtifactKind::Webm.mime().to_string(),
            bytes,
        }))
    }

    /// The buffered recording, if one finished
    pub fn recording(&self) -> Option<&VideoBlob> {
        self.recording.as_ref()
    }

    /// Base64 data URL for the recorded blob; `None` until a non-empty
    /// recording exists.
    pub fn data_url(&self) -> Option<String> {
        self.recording
            .as_ref()
            .filter(|blob| !blob.is_empty())
            .map(VideoBlob::to_data_url)
    }

    /// Forward the recording to the video relay. A successful send clears
    /// the buffered recording so the next session starts fresh.
    pub async fn send(&mut self, relay: &RelayClient) -> Result<String> {
        let Some(data_url) = self.data_url() else {
            self.status = StatusMessage::info("No recording to send");
            bail!("no recording to send");
        };

        self.status = StatusMessage::info("Sending video...");

        match relay.send_video(&data_url).await {
            Ok(ack) => {
                self.recording = None;
                self.status = StatusMessage::success("Video sent successfully!");
                Ok(ack)
            }
            Err(e) => {
                self.status = StatusMessage::error(format!("Error: {e:#}"));
                Err(e)
            }
        }
    }

    pub fn state(&self) -> RecorderState {
        self.state
    }

    pub fn status(&self) -> &StatusMessage {
        &self.status
    }

    /// Drop the device stream. Safe to call when nothing was acquired.
    pub fn release(&mut self) {
        if let Some(mut stream) = self.stream.take() {
            stream.stop();
            info!("Released device stream for session {}", self.id);
        }
    }

    /// Page hidden: give the hardware back so no indicator stays lit.
    pub fn on_visibility_hidden(&mut self) {
        if self.stream.is_some() {
            self.release();
            self.status = StatusMessage::info("Camera was stopped.");
        }
    }
}

impl Default for RecorderSession {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for RecorderSession {
    fn drop(&mut self) {
        self.release();
    }
}
