// Relay configuration
//
// Built once at process entry from environment variables and passed to
// handlers as an immutable struct. Missing required variables abort startup
// with a diagnostic naming every missing name, before any listener binds.

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::fmt;
use std::path::PathBuf;

/// The three deployable relay services.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelayVariant {
    /// Multipart `/api/send-email` endpoint used by the static photo page
    Gateway,
    /// JSON `/send-email` endpoint with a fixed recipient
    Photo,
    /// JSON `/send-video` endpoint with a fixed recipient
    Video,
}

impl RelayVariant {
    /// Service name reported by the health endpoint
    pub fn service_name(&self) -> &'static str {
        match self {
            RelayVariant::Gateway => "gateway",
            RelayVariant::Photo => "photo-relay",
            RelayVariant::Video => "video-relay",
        }
    }

    pub fn default_port(&self) -> u16 {
        match self {
            RelayVariant::Gateway => 3001,
            RelayVariant::Photo => 3002,
            RelayVariant::Video => 3003,
        }
    }

    /// Body ceiling when `MAX_UPLOAD_SIZE` is unset. Video payloads are an
    /// order of magnitude larger than photos.
    pub fn default_upload_size(&self) -> &'static str {
        match self {
            RelayVariant::Video => "50mb",
            _ => "10mb",
        }
    }

    pub fn default_sender_name(&self) -> &'static str {
        match self {
            RelayVariant::Gateway => "Capture Gateway",
            RelayVariant::Photo => "Photo Relay",
            RelayVariant::Video => "Video Sender",
        }
    }

    /// The gateway takes its recipient from each request; the other two
    /// variants deliver to a configured address.
    pub fn requires_fixed_recipient(&self) -> bool {
        !matches!(self, RelayVariant::Gateway)
    }
}

/// Deployment mode gating error-detail verbosity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    Development,
    Production,
}

impl RunMode {
    /// Anything other than `production` counts as development.
    pub fn parse(value: Option<&str>) -> Self {
        match value {
            Some("production") => RunMode::Production,
            _ => RunMode::Development,
        }
    }

    pub fn is_development(&self) -> bool {
        matches!(self, RunMode::Development)
    }
}

impl fmt::Display for RunMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunMode::Development => write!(f, "development"),
            RunMode::Production => write!(f, "production"),
        }
    }
}

/// Raw environment values before validation. Every field is optional here so
/// validation can report all missing names at once instead of failing on the
/// first.
#[derive(Debug, Deserialize)]
struct RawConfig {
    smtp_user: Option<String>,
    smtp_app_password: Option<String>,
    smtp_host: Option<String>,
    sender_name: Option<String>,
    sender_email: Option<String>,
    recipient_email: Option<String>,
    run_mode: Option<String>,
    max_upload_size: Option<String>,
    port: Option<String>,
    static_dir: Option<String>,
}

/// Immutable per-process relay configuration.
#[derive(Debug, Clone)]
pub struct RelayConfig {
    pub variant: RelayVariant,
    pub run_mode: RunMode,
    pub port: u16,
    /// Request body ceiling in bytes
    pub max_upload_size: usize,
    pub smtp_host: String,
    pub smtp_user: String,
    pub smtp_app_password: String,
    pub sender_name: String,
    pub sender_email: String,
    /// Fixed delivery address; `None` only for the gateway variant
    pub recipient: Option<String>,
    /// Optional directory of static pages served alongside the API
    pub static_dir: Option<PathBuf>,
}

impl RelayConfig {
    /// Load configuration from process environment variables.
    pub fn from_env(variant: RelayVariant) -> Result<Self> {
        Self::load(variant, config::Environment::default().ignore_empty(true))
    }

    /// Load configuration from an explicit variable map. Lets tests exercise
    /// the validation paths without touching process-global state.
    pub fn from_map(variant: RelayVariant, vars: config::Map<String, String>) -> Result<Self> {
        Self::load(
            variant,
            config::Environment::default()
                .ignore_empty(true)
                .source(Some(vars)),
        )
    }

    fn load(variant: RelayVariant, env: config::Environment) -> Result<Self> {
        let raw: RawConfig = config::Config::builder()
            .add_source(env)
            .build()
            .context("failed to read environment")?
            .try_deserialize()
            .context("failed to parse environment configuration")?;

        Self::from_raw(variant, raw)
    }

    fn from_raw(variant: RelayVariant, raw: RawConfig) -> Result<Self> {
        let mut missing = Vec::new();

        if raw.smtp_user.is_none() {
            missing.push("SMTP_USER");
        }
        if raw.smtp_app_password.is_none() {
            missing.push("SMTP_APP_PASSWORD");
        }
        if raw.sender_email.is_none() {
            missing.push("SENDER_EMAIL");
        }
        if variant.requires_fixed_recipient() && raw.recipient_email.is_none() {
            missing.push("RECIPIENT_EMAIL");
        }

        if !missing.is_empty() {
            bail!(
                "Missing required environment variables: {}",
                missing.join(", ")
            );
        }

        let port = match raw.port {
            Some(p) => p
                .parse::<u16>()
                .with_context(|| format!("PORT is not a valid port number: {p:?}"))?,
            None => variant.default_port(),
        };

        let size = raw
            .max_upload_size
            .unwrap_or_else(|| variant.default_upload_size().to_string());
        let max_upload_size = parse_size(&size)
            .with_context(|| format!("MAX_UPLOAD_SIZE is not a valid size: {size:?}"))?;

        Ok(Self {
            variant,
            run_mode: RunMode::parse(raw.run_mode.as_deref()),
            port,
            max_upload_size,
            smtp_host: raw
                .smtp_host
                .unwrap_or_else(|| "smtp.gmail.com".to_string()),
            // Presence checked above
            smtp_user: raw.smtp_user.unwrap_or_default(),
            smtp_app_password: raw.smtp_app_password.unwrap_or_default(),
            sender_name: raw
                .sender_name
                .unwrap_or_else(|| variant.default_sender_name().to_string()),
            sender_email: raw.sender_email.unwrap_or_default(),
            recipient: raw.recipient_email,
            static_dir: raw.static_dir.map(PathBuf::from),
        })
    }

    pub fn service_name(&self) -> &'static str {
        self.variant.service_name()
    }
}

/// Parse a human-readable size like `10mb`, `512kb`, or a plain byte count.
/// Case-insensitive.
pub fn parse_size(value: &str) -> Result<usize> {
    let value = value.trim().to_ascii_lowercase();

    let (digits, multiplier) = if let Some(n) = value.strip_suffix("gb") {
        (n, 1024 * 1024 * 1024)
    } else if let Some(n) = value.strip_suffix("mb") {
        (n, 1024 * 1024)
    } else if let Some(n) = value.strip_suffix("kb") {
        (n, 1024)
    } else if let Some(n) = value.strip_suffix('b') {
        (n, 1)
    } else {
        (value.as_str(), 1)
    };

    let count: usize = digits
        .trim()
        .parse()
        .with_context(|| format!("invalid size: {value:?}"))?;

    Ok(count * multiplier)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_size_suffixes() {
        assert_eq!(parse_size("10mb").unwrap(), 10 * 1024 * 1024);
        assert_eq!(parse_size("512KB").unwrap(), 512 * 1024);
        assert_eq!(parse_size("1gb").unwrap(), 1024 * 1024 * 1024);
        assert_eq!(parse_size("64b").unwrap(), 64);
        assert_eq!(parse_size("1234").unwrap(), 1234);
    }

    #[test]
    fn test_parse_size_rejects_garbage() {
        assert!(parse_size("lots").is_err());
        assert!(parse_size("mb").is_err());
        assert!(parse_size("").is_err());
    }

    #[test]
    fn test_run_mode_defaults_to_development() {
        assert_eq!(RunMode::parse(None), RunMode::Development);
        assert_eq!(RunMode::parse(Some("staging")), RunMode::Development);
        assert_eq!(RunMode::parse(Some("production")), RunMode::Production);
    }

    #[test]
    fn test_variant_registry() {
        assert_eq!(RelayVariant::Gateway.default_port(), 3001);
        assert_eq!(RelayVariant::Photo.default_port(), 3002);
        assert_eq!(RelayVariant::Video.default_port(), 3003);
        assert!(!RelayVariant::Gateway.requires_fixed_recipient());
        assert!(RelayVariant::Photo.requires_fixed_recipient());
    }
}
