pub mod artifact;
pub mod capture;
pub mod config;
pub mod http;
pub mod mail;
pub mod relay;

pub use artifact::{decode_data_url, encode_data_url, ArtifactKind, DecodedArtifact};
pub use capture::{
    DeviceError, MediaSource, MediaStream, PhotoSession, RawFrame, RecorderSession, Recognizer,
    SpeechEvent, SpeechSession, SpeechState, StreamConstraints,
};
pub use config::{RelayConfig, RelayVariant, RunMode};
pub use http::{create_router, AppState};
pub use mail::{EmailAttachment, EmailBody, MailTransport, OutgoingEmail, SmtpMailer};
pub use relay::RelayClient;
