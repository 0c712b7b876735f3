//! Outbound email assembly and delivery
//!
//! A relay converts one artifact into exactly one outbound message. The
//! `MailTransport` trait is the seam between handlers and SMTP so the
//! validation paths can be tested without a mail account.

mod message;
mod smtp;

pub use message::{EmailAttachment, EmailBody, OutgoingEmail};
pub use smtp::{MailTransport, SmtpMailer};
