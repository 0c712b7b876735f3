// Captured artifacts and their inline Base64 encoding
//
// Every pipeline hands media around as a data URL: a MIME marker followed by
// a Base64 payload. The relay side recovers the raw bytes by splitting on the
// first `base64,` marker; everything after it is decoded unmodified.

use anyhow::{Context, Result};
use base64::Engine;

/// Marker separating the data URL header from the Base64 payload.
pub const BASE64_MARKER: &str = "base64,";

/// Kind of binary artifact a relay attaches to an outgoing email.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    /// Still photo captured from a camera frame
    Png,
    /// Recorded video blob
    Webm,
}

impl ArtifactKind {
    /// MIME type used for the data URL and the email attachment
    pub fn mime(&self) -> &'static str {
        match self {
            ArtifactKind::Png => "image/png",
            ArtifactKind::Webm => "video/webm",
        }
    }

    /// Attachment filename for an outgoing email
    pub fn attachment_filename(&self) -> String {
        match self {
            ArtifactKind::Png => "photo.png".to_string(),
            ArtifactKind::Webm => {
                format!("recording-{}.webm", chrono::Utc::now().timestamp_millis())
            }
        }
    }
}

/// Raw bytes recovered from a data URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedArtifact {
    /// MIME type from the header, if one was present
    pub mime: Option<String>,
    pub bytes: Vec<u8>,
}

/// Encode raw bytes as a `data:<mime>;base64,<payload>` string
pub fn encode_data_url(mime: &str, bytes: &[u8]) -> String {
    format!(
        "data:{};base64,{}",
        mime,
        base64::engine::general_purpose::STANDARD.encode(bytes)
    )
}

/// Decode the payload following the first `base64,` marker.
///
/// The header before the marker only contributes the MIME type; any further
/// `base64,` occurrences belong to the payload and are left alone.
pub fn decode_data_url(input: &str) -> Result<DecodedArtifact> {
    let (header, payload) = input
        .split_once(BASE64_MARKER)
        .context("no base64 marker in data URL")?;

    let bytes = base64::engine::general_purpose::STANDARD
        .decode(payload)
        .context("invalid base64 payload in data URL")?;

    let mime = header
        .strip_prefix("data:")
        .map(|h| h.trim_end_matches(';').to_string())
        .filter(|m| !m.is_empty());

    Ok(DecodedArtifact { mime, bytes })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_simple_png_data_url() {
        let decoded = decode_data_url("data:image/png;base64,QUJD").unwrap();

        assert_eq!(decoded.bytes, b"ABC");
        assert_eq!(decoded.mime.as_deref(), Some("image/png"));
    }

    #[test]
    fn test_decode_splits_on_first_marker() {
        // "YmFzZTY0LA==" decodes to "base64,": the payload may itself
        // contain the marker text once decoded
        let decoded = decode_data_url("data:video/webm;base64,YmFzZTY0LA==").unwrap();

        assert_eq!(decoded.bytes, b"base64,");
    }

    #[test]
    fn test_decode_without_mime_header() {
        let decoded = decode_data_url("base64,QUJD").unwrap();

        assert_eq!(decoded.bytes, b"ABC");
        assert_eq!(decoded.mime, None);
    }

    #[test]
    fn test_decode_rejects_missing_marker() {
        assert!(decode_data_url("data:image/png,QUJD").is_err());
    }

    #[test]
    fn test_decode_rejects_invalid_payload() {
        assert!(decode_data_url("data:image/png;base64,not@valid!").is_err());
    }

    #[test]
    fn test_encode_decode_round_trip() {
        let bytes = vec![0u8, 1, 2, 255, 254];
        let url = encode_data_url("video/webm", &bytes);

        assert!(url.starts_with("data:video/webm;base64,"));
        assert_eq!(decode_data_url(&url).unwrap().bytes, bytes);
    }

    #[test]
    fn test_attachment_filenames() {
        assert_eq!(ArtifactKind::Png.attachment_filename(), "photo.png");

        let name = ArtifactKind::Webm.attachment_filename();
        assert!(name.starts_with("recording-"));
        assert!(name.ends_with(".webm"));
    }
}
