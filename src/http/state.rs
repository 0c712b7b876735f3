use crate::config::RelayConfig;
use crate::mail::MailTransport;
use std::sync::Arc;

/// Shared application state for HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Process-wide immutable configuration
    pub config: Arc<RelayConfig>,
    /// Outbound mail transport; a trait object so tests can observe sends
    pub mailer: Arc<dyn MailTransport>,
}

impl AppState {
    pub fn new(config: RelayConfig, mailer: Arc<dyn MailTransport>) -> Self {
        Self {
            config: Arc::new(config),
            mailer,
        }
    }
}
