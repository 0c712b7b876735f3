use crate::artifact::ArtifactKind;

/// Body of an outgoing message. The photo relay embeds the artifact inline
/// as HTML; the others send plain text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmailBody {
    Text(String),
    Html(String),
}

/// Single binary attachment derived from a decoded artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailAttachment {
    pub filename: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// One outbound message, assembled per request. No state survives the send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingEmail {
    pub to: String,
    pub subject: String,
    pub body: EmailBody,
    pub attachment: Option<EmailAttachment>,
}

impl OutgoingEmail {
    /// Photo relay message: HTML body embedding the data URL, decoded bytes
    /// attached as `photo.png`.
    pub fn photo(to: String, data_url: &str, bytes: Vec<u8>) -> Self {
        Self {
            to,
            subject: "Captured Photo".to_string(),
            body: EmailBody::Html(format!(
                "<p>Here is the photo:</p><img src=\"{data_url}\" />"
            )),
            attachment: Some(EmailAttachment {
                filename: ArtifactKind::Png.attachment_filename(),
                content_type: ArtifactKind::Png.mime().to_string(),
                bytes,
            }),
        }
    }

    /// Video relay message with a timestamped WebM attachment.
    pub fn video(to: String, bytes: Vec<u8>) -> Self {
        Self {
            to,
            subject: "New Video Recording".to_string(),
            body: EmailBody::Text(
                "A new video recording has been sent to you.".to_string(),
            ),
            attachment: Some(EmailAttachment {
                filename: ArtifactKind::Webm.attachment_filename(),
                content_type: ArtifactKind::Webm.mime().to_string(),
                bytes,
            }),
        }
    }

    /// Gateway message: everything comes from the request.
    pub fn custom(
        to: String,
        subject: String,
        text: String,
        attachment: Option<EmailAttachment>,
    ) -> Self {
        Self {
            to,
            subject,
            body: EmailBody::Text(text),
            attachment,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_photo_email_embeds_data_url_and_attaches_png() {
        let email = OutgoingEmail::photo(
            "to@example.com".to_string(),
            "data:image/png;base64,QUJD",
            b"ABC".to_vec(),
        );

        assert_eq!(email.subject, "Captured Photo");
        match &email.body {
            EmailBody::Html(html) => assert!(html.contains("data:image/png;base64,QUJD")),
            EmailBody::Text(_) => panic!("photo email should have an HTML body"),
        }

        let attachment = email.attachment.unwrap();
        assert_eq!(attachment.filename, "photo.png");
        assert_eq!(attachment.content_type, "image/png");
        assert_eq!(attachment.bytes, b"ABC");
    }

    #[test]
    fn test_video_email_uses_webm_attachment() {
        let email = OutgoingEmail::video("to@example.com".to_string(), vec![1, 2, 3]);

        let attachment = email.attachment.unwrap();
        assert!(attachment.filename.starts_with("recording-"));
        assert!(attachment.filename.ends_with(".webm"));
        assert_eq!(attachment.content_type, "video/webm");
    }
}
