// Capture-side HTTP client for forwarding artifacts to a relay service

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

#[derive(Debug, Serialize)]
struct SendPhotoBody<'a> {
    image: &'a str,
}

#[derive(Debug, Serialize)]
struct SendVideoBody<'a> {
    video: &'a str,
}

/// Error payload relays return on 4xx/5xx
#[derive(Debug, Deserialize)]
struct RelayErrorBody {
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RelayAck {
    message: Option<String>,
}

/// HTTP client a capture session uses to hand an artifact to a relay.
pub struct RelayClient {
    http: reqwest::Client,
    base_url: String,
}

impl RelayClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// POST a photo data URL to the photo relay (`/send-email`).
    pub async fn send_photo(&self, data_url: &str) -> Result<()> {
        let response = self
            .http
            .post(format!("{}/send-email", self.base_url))
            .json(&SendPhotoBody { image: data_url })
            .send()
            .await
            .context("photo relay unreachable")?;

        Self::check(response).await?;
        info!("Photo forwarded to relay");
        Ok(())
    }

    /// POST a video data URL to the video relay (`/send-video`); returns the
    /// relay's acknowledgment message.
    pub async fn send_video(&self, data_url: &str) -> Result<String> {
        let response = self
            .http
            .post(format!("{}/send-video", self.base_url))
            .json(&SendVideoBody { video: data_url })
            .send()
            .await
            .context("video relay unreachable")?;

        let response = Self::check(response).await?;
        let ack: RelayAck = response.json().await.context("invalid relay response")?;

        info!("Video forwarded to relay");
        Ok(ack
            .message
            .unwrap_or_else(|| "Video sent successfully!".to_string()))
    }

    /// POST recipient, subject, text and one attachment to the gateway
    /// (`/api/send-email`).
    pub async fn send_email(
        &self,
        to: &str,
        subject: &str,
        text: &str,
        filename: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<()> {
        let attachment = reqwest::multipart::Part::bytes(bytes)
            .file_name(filename.to_string())
            .mime_str(content_type)
            .context("invalid attachment content type")?;

        let form = reqwest::multipart::Form::new()
            .text("to", to.to_string())
            .text("subject", subject.to_string())
            .text("text", text.to_string())
            .part("attachments", attachment);

        let response = self
            .http
            .post(format!("{}/api/send-email", self.base_url))
            .multipart(form)
            .send()
            .await
            .context("gateway unreachable")?;

        Self::check(response).await?;
        info!("Attachment forwarded to gateway");
        Ok(())
    }

    /// Map non-2xx responses to an error carrying the relay's message.
    async fn check(response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let message = response
            .json::<RelayErrorBody>()
            .await
            .ok()
            .and_then(|body| body.error)
            .unwrap_or_else(|| "Unknown error".to_string());

        Err(anyhow!("relay returned {status}: {message}"))
    }
}
