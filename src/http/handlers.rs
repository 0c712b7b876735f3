use super::state::AppState;
use crate::artifact;
use crate::mail::{EmailAttachment, OutgoingEmail};
use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct SendPhotoRequest {
    /// PNG artifact as a Base64 data URL
    pub image: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SendVideoRequest {
    /// WebM artifact as a Base64 data URL
    pub video: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SendAck {
    pub success: bool,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,

    /// Mail-failure detail, only populated in development mode
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorResponse {
    fn new(error: &str) -> Self {
        Self {
            error: error.to_string(),
            details: None,
        }
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /send-email
/// Forward a captured photo to the configured recipient
pub async fn send_photo_email(
    State(state): State<AppState>,
    Json(req): Json<SendPhotoRequest>,
) -> Response {
    let image = match req.image {
        Some(image) if !image.is_empty() => image,
        _ => return bad_request("No image provided"),
    };

    let decoded = match artifact::decode_data_url(&image) {
        Ok(decoded) => decoded,
        Err(e) => {
            warn!("Rejected photo payload: {e:#}");
            return bad_request("Invalid image data");
        }
    };

    let recipient = match fixed_recipient(&state) {
        Ok(recipient) => recipient,
        Err(response) => return response,
    };

    info!("Forwarding photo ({} bytes decoded)", decoded.bytes.len());

    let email = OutgoingEmail::photo(recipient, &image, decoded.bytes);

    match state.mailer.deliver(email).await {
        Ok(()) => StatusCode::OK.into_response(),
        Err(e) => {
            error!("Email error: {e:#}");
            mail_failure(&state, "Failed to send email", e)
        }
    }
}

/// POST /send-video
/// Forward a recorded video to the configured recipient
pub async fn send_video_email(
    State(state): State<AppState>,
    Json(req): Json<SendVideoRequest>,
) -> Response {
    let video = match req.video {
        Some(video) if !video.is_empty() => video,
        _ => return bad_request("No video data provided"),
    };

    let decoded = match artifact::decode_data_url(&video) {
        Ok(decoded) => decoded,
        Err(e) => {
            warn!("Rejected video payload: {e:#}");
            return bad_request("Invalid video data");
        }
    };

    let recipient = match fixed_recipient(&state) {
        Ok(recipient) => recipient,
        Err(response) => return response,
    };

    info!("Forwarding video ({} bytes decoded)", decoded.bytes.len());

    let email = OutgoingEmail::video(recipient, decoded.bytes);

    match state.mailer.deliver(email).await {
        Ok(()) => (
            StatusCode::OK,
            Json(SendAck {
                success: true,
                message: "Video sent successfully!".to_string(),
            }),
        )
            .into_response(),
        Err(e) => {
            error!("Error sending email: {e:#}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new("Failed to send video email")),
            )
                .into_response()
        }
    }
}

/// POST /api/send-email
/// Forward an uploaded attachment to a request-supplied recipient.
///
/// Fields: `to`, `subject`, `text`, plus one binary `attachments` part.
pub async fn send_gateway_email(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Response {
    let mut to = None;
    let mut subject = None;
    let mut text = None;
    let mut attachment: Option<EmailAttachment> = None;

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => {
                warn!("Rejected multipart payload: {e}");
                return bad_request("Invalid multipart payload");
            }
        };

        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };

        match name.as_str() {
            "to" => match field.text().await {
                Ok(value) => to = Some(value),
                Err(e) => {
                    warn!("Rejected multipart field {name}: {e}");
                    return bad_request("Invalid multipart payload");
                }
            },
            "subject" => match field.text().await {
                Ok(value) => subject = Some(value),
                Err(e) => {
                    warn!("Rejected multipart field {name}: {e}");
                    return bad_request("Invalid multipart payload");
                }
            },
            "text" => match field.text().await {
                Ok(value) => text = Some(value),
                Err(e) => {
                    warn!("Rejected multipart field {name}: {e}");
                    return bad_request("Invalid multipart payload");
                }
            },
            "attachments" => {
                let filename = field.file_name().unwrap_or("capture.jpg").to_string();
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();

                match field.bytes().await {
                    Ok(bytes) => {
                        attachment = Some(EmailAttachment {
                            filename,
                            content_type,
                            bytes: bytes.to_vec(),
                        });
                    }
                    Err(e) => {
                        warn!("Rejected attachment part: {e}");
                        return bad_request("Invalid multipart payload");
                    }
                }
            }
            // Unknown fields are ignored
            _ => {}
        }
    }

    let Some(to) = to.filter(|to| !to.is_empty()) else {
        return bad_request("Missing recipient address");
    };
    let Some(attachment) = attachment else {
        return bad_request("No attachment provided");
    };

    info!(
        "Forwarding attachment {} ({} bytes)",
        attachment.filename,
        attachment.bytes.len()
    );

    let email = OutgoingEmail::custom(
        to,
        subject.unwrap_or_else(|| "(no subject)".to_string()),
        text.unwrap_or_default(),
        Some(attachment),
    );

    match state.mailer.deliver(email).await {
        Ok(()) => (
            StatusCode::OK,
            Json(SendAck {
                success: true,
                message: "Email sent successfully!".to_string(),
            }),
        )
            .into_response(),
        Err(e) => {
            error!("Email error: {e:#}");
            mail_failure(&state, "Failed to send email", e)
        }
    }
}

/// GET /health
/// Health check endpoint; responds regardless of mail-provider reachability
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok",
        service: state.config.service_name(),
    })
}

// ============================================================================
// Helpers
// ============================================================================

fn bad_request(message: &str) -> Response {
    (StatusCode::BAD_REQUEST, Json(ErrorResponse::new(message))).into_response()
}

/// Delivery address for the fixed-recipient variants. Configuration
/// validation guarantees presence, so a miss here is a server error.
fn fixed_recipient(state: &AppState) -> Result<String, Response> {
    match &state.config.recipient {
        Some(recipient) => Ok(recipient.clone()),
        None => {
            error!(
                "No recipient configured for {}",
                state.config.service_name()
            );
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new("Recipient not configured")),
            )
                .into_response())
        }
    }
}

/// 500 response for a failed delivery; detail exposure is gated by the
/// deployment mode.
fn mail_failure(state: &AppState, message: &str, err: anyhow::Error) -> Response {
    let details = state
        .config
        .run_mode
        .is_development()
        .then(|| format!("{err:#}"));

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse {
            error: message.to_string(),
            details,
        }),
    )
        .into_response()
}
