//! HTTP surface of the relay services
//!
//! One router per variant:
//! - photo: POST /send-email (JSON `{image}`)
//! - video: POST /send-video (JSON `{video}`)
//! - gateway: POST /api/send-email (multipart `to`/`subject`/`text`/`attachments`)
//! - all: GET /health
//!
//! Each request decodes one artifact and attempts exactly one outbound email.

mod handlers;
mod routes;
mod state;

pub use routes::create_router;
pub use state::AppState;
