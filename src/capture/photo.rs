use super::device::{DeviceError, MediaSource, MediaStream, RawFrame, StreamConstraints};
use super::StatusMessage;
use crate::artifact::{self, ArtifactKind};
use crate::relay::RelayClient;
use anyhow::{Context, Result};
use std::io::Cursor;
use tracing::{info, warn};

/// Locally saved photo: suggested filename plus the raw PNG bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhotoDownload {
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// Photo capture session.
///
/// Owns at most one live camera stream and the last captured artifact.
/// Every start releases the previous stream first, so two live streams can
/// never coexist within a session.
pub struct PhotoSession {
    id: String,
    stream: Option<Box<dyn MediaStream>>,
    /// Last captured artifact as a PNG data URL
    photo: Option<String>,
    status: StatusMessage,
}

impl PhotoSession {
    pub fn new() -> Self {
        Self {
            id: format!("photo-{}", uuid::Uuid::new_v4()),
            stream: None,
            photo: None,
            status: StatusMessage::info("Camera off"),
        }
    }

    /// Acquire the camera, releasing any previously held stream first.
    ///
    /// On denial the session degrades to a disabled state with an
    /// explanatory status; the user must re-trigger manually.
    pub fn start(&mut self, source: &dyn MediaSource) -> Result<(), DeviceError> {
        self.release();

        info!("Accessing camera for session {}", self.id);

        match source.acquire(&StreamConstraints::photo()) {
            Ok(stream) => {
                self.stream = Some(stream);
                self.status = StatusMessage::info("Camera ready");
                Ok(())
            }
            Err(e) => {
                warn!("Camera access failed for session {}: {}", self.id, e);
                self.status = StatusMessage::error(
                    "Could not access camera. Please check permissions and try again.",
                );
                Err(e)
            }
        }
    }

    /// Whether the capture control should be enabled
    pub fn can_capture(&self) -> bool {
        self.stream.as_ref().map(|s| s.is_live()).unwrap_or(false)
    }

    /// Grab the current frame and keep it as a PNG data URL.
    pub fn capture(&mut self) -> Result<&str> {
        let stream = self.stream.as_mut().context("no live camera stream")?;

        let frame = match stream.grab_frame() {
            Ok(frame) => frame,
            Err(e) => {
                self.status = StatusMessage::error("Error capturing photo");
                return Err(e.into());
            }
        };

        let png = encode_png(&frame)?;
        let data_url = artifact::encode_data_url(ArtifactKind::Png.mime(), &png);

        self.status = StatusMessage::success("Photo captured!");
        info!(
            "Captured {}x{} frame for session {}",
            frame.width, frame.height, self.id
        );

        Ok(self.photo.insert(data_url))
    }

    /// Last captured artifact, if any
    pub fn photo_data_url(&self) -> Option<&str> {
        self.photo.as_deref()
    }

    /// Package the captured photo for a local save, named like
    /// `photo-2025-01-30T12-30-45-123Z.png`.
    pub fn download(&self) -> Result<PhotoDownload> {
        let data_url = self.photo.as_deref().context("no photo captured yet")?;
        let decoded = artifact::decode_data_url(data_url)?;

        let filename = format!(
            "photo-{}.png",
            chrono::Utc::now().format("%Y-%m-%dT%H-%M-%S-%3fZ")
        );

        Ok(PhotoDownload {
            filename,
            bytes: decoded.bytes,
        })
    }

    /// Forward the captured photo to a relay gateway.
    pub async fn email(&mut self, relay: &RelayClient, to: &str, message: &str) -> Result<()> {
        let data_url = self.photo.as_deref().context("no photo to send")?;
        let decoded = artifact::decode_data_url(data_url)?;

        self.status = StatusMessage::info("Sending email...");

        match relay
            .send_email(
                to,
                "Photo from Photo Capture App",
                message,
                "capture.jpg",
                ArtifactKind::Png.mime(),
                decoded.bytes,
            )
            .await
        {
            Ok(()) => {
                self.status = StatusMessage::success("Email sent successfully!");
                Ok(())
            }
            Err(e) => {
                self.status = StatusMessage::error(format!("Failed to send email: {e:#}"));
                Err(e)
            }
        }
    }

    /// Drop the camera stream. Safe to call when nothing was acquired.
    pub fn release(&mut self) {
        if let Some(mut stream) = self.stream.take() {
            stream.stop();
            info!("Released camera stream for session {}", self.id);
        }
    }

    /// Page hidden: give the hardware back so no indicator stays lit.
    pub fn on_visibility_hidden(&mut self) {
        if self.stream.is_some() {
            self.release();
            self.status =
                StatusMessage::info("Camera was stopped. Click \"Start Camera\" to resume.");
        }
    }

    pub fn status(&self) -> &StatusMessage {
        &self.status
    }
}

impl Default for PhotoSession {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for PhotoSession {
    fn drop(&mut self) {
        self.release();
    }
}

fn encode_png(frame: &RawFrame) -> Result<Vec<u8>> {
    let image = image::RgbaImage::from_raw(frame.width, frame.height, frame.rgba.clone())
        .context("frame buffer does not match its dimensions")?;

    let mut png = Cursor::new(Vec::new());
    image
        .write_to(&mut png, image::ImageFormat::Png)
        .context("failed to encode PNG")?;

    Ok(png.into_inner())
}
