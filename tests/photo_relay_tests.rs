// Integration tests for the photo relay
//
// Handlers are driven through the router with a recording mail transport,
// so these tests verify both the HTTP contract and that validation failures
// never reach the transport.

use anyhow::{anyhow, Result};
use axum::body::Body;
use axum::http::{Request, StatusCode};
use snapmail::mail::{MailTransport, OutgoingEmail};
use snapmail::{create_router, AppState, RelayClient, RelayConfig, RelayVariant};
use std::sync::{Arc, Mutex};
use tower::ServiceExt;

struct RecordingMailer {
    sent: Mutex<Vec<OutgoingEmail>>,
}

impl RecordingMailer {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            sent: Mutex::new(Vec::new()),
        })
    }

    fn sent(&self) -> Vec<OutgoingEmail> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl MailTransport for RecordingMailer {
    async fn deliver(&self, email: OutgoingEmail) -> Result<()> {
        self.sent.lock().unwrap().push(email);
        Ok(())
    }

    fn name(&self) -> &str {
        "recording"
    }
}

struct FailingMailer;

#[async_trait::async_trait]
impl MailTransport for FailingMailer {
    async fn deliver(&self, _email: OutgoingEmail) -> Result<()> {
        Err(anyhow!("smtp connection refused"))
    }

    fn name(&self) -> &str {
        "failing"
    }
}

fn test_config(variant: RelayVariant, run_mode: &str) -> RelayConfig {
    let mut vars = config::Map::new();
    vars.insert("SMTP_USER".to_string(), "relay@example.com".to_string());
    vars.insert("SMTP_APP_PASSWORD".to_string(), "app-password".to_string());
    vars.insert("SENDER_EMAIL".to_string(), "relay@example.com".to_string());
    vars.insert(
        "RECIPIENT_EMAIL".to_string(),
        "inbox@example.com".to_string(),
    );
    vars.insert("RUN_MODE".to_string(), run_mode.to_string());

    RelayConfig::from_map(variant, vars).unwrap()
}

fn json_post(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn response_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_health_endpoint_reports_service() {
    let mailer = RecordingMailer::new();
    let app = create_router(AppState::new(
        test_config(RelayVariant::Photo, "development"),
        mailer,
    ));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json = response_json(response).await;
    assert_eq!(json["status"], "ok");
    assert_eq!(json["service"], "photo-relay");
}

#[tokio::test]
async fn test_missing_image_is_rejected_without_mail_call() {
    let mailer = RecordingMailer::new();
    let app = create_router(AppState::new(
        test_config(RelayVariant::Photo, "development"),
        mailer.clone(),
    ));

    let response = app.oneshot(json_post("/send-email", "{}")).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = response_json(response).await;
    assert_eq!(json["error"], "No image provided");
    assert!(mailer.sent().is_empty(), "mail transport must not be called");
}

#[tokio::test]
async fn test_empty_image_is_rejected() {
    let mailer = RecordingMailer::new();
    let app = create_router(AppState::new(
        test_config(RelayVariant::Photo, "development"),
        mailer.clone(),
    ));

    let response = app
        .oneshot(json_post("/send-email", r#"{"image":""}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(mailer.sent().is_empty());
}

#[tokio::test]
async fn test_photo_round_trip_attaches_decoded_bytes() {
    let mailer = RecordingMailer::new();
    let app = create_router(AppState::new(
        test_config(RelayVariant::Photo, "development"),
        mailer.clone(),
    ));

    let response = app
        .oneshot(json_post(
            "/send-email",
            r#"{"image":"data:image/png;base64,QUJD"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let sent = mailer.sent();
    assert_eq!(sent.len(), 1);

    let email = &sent[0];
    assert_eq!(email.to, "inbox@example.com");
    assert_eq!(email.subject, "Captured Photo");

    let attachment = email.attachment.as_ref().unwrap();
    assert_eq!(attachment.filename, "photo.png");
    assert_eq!(attachment.content_type, "image/png");
    assert_eq!(attachment.bytes, b"ABC", "attachment must be byte-identical");
}

#[tokio::test]
async fn test_invalid_data_url_is_rejected() {
    let mailer = RecordingMailer::new();
    let app = create_router(AppState::new(
        test_config(RelayVariant::Photo, "development"),
        mailer.clone(),
    ));

    // No base64 marker at all
    let response = app
        .oneshot(json_post("/send-email", r#"{"image":"data:image/png,QUJD"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = response_json(response).await;
    assert_eq!(json["error"], "Invalid image data");
    assert!(mailer.sent().is_empty());
}

#[tokio::test]
async fn test_mail_failure_includes_details_in_development() {
    let app = create_router(AppState::new(
        test_config(RelayVariant::Photo, "development"),
        Arc::new(FailingMailer),
    ));

    let response = app
        .oneshot(json_post(
            "/send-email",
            r#"{"image":"data:image/png;base64,QUJD"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let json = response_json(response).await;
    assert_eq!(json["error"], "Failed to send email");
    assert!(json["details"]
        .as_str()
        .unwrap()
        .contains("smtp connection refused"));
}

#[tokio::test]
async fn test_mail_failure_hides_details_in_production() {
    let app = create_router(AppState::new(
        test_config(RelayVariant::Photo, "production"),
        Arc::new(FailingMailer),
    ));

    let response = app
        .oneshot(json_post(
            "/send-email",
            r#"{"image":"data:image/png;base64,QUJD"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let json = response_json(response).await;
    assert_eq!(json["error"], "Failed to send email");
    assert!(json.get("details").is_none(), "details must be suppressed");
}

#[tokio::test]
async fn test_relay_client_posts_photo_data_url() {
    let mailer = RecordingMailer::new();
    let state = AppState::new(test_config(RelayVariant::Photo, "development"), mailer.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, create_router(state)).await.unwrap();
    });

    let client = RelayClient::new(format!("http://{addr}"));
    client
        .send_photo("data:image/png;base64,QUJD")
        .await
        .unwrap();

    let sent = mailer.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].attachment.as_ref().unwrap().bytes, b"ABC");

    // A rejected payload surfaces the relay's error message
    let err = client.send_photo("not a data url").await.unwrap_err();
    assert!(format!("{err:#}").contains("Invalid image data"));
}

#[tokio::test]
async fn test_static_pages_are_served_when_configured() {
    let static_dir = tempfile::tempdir().unwrap();
    std::fs::write(
        static_dir.path().join("index.html"),
        "<h1>Photo Capture</h1>",
    )
    .unwrap();

    let mut config = test_config(RelayVariant::Photo, "development");
    config.static_dir = Some(static_dir.path().to_path_buf());

    let app = create_router(AppState::new(config, RecordingMailer::new()));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/index.html")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(&bytes[..], b"<h1>Photo Capture</h1>");
}
