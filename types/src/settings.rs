//! Resolved configuration types shared across crates.
//!
//! Raw TOML structs carry `Option` fields; the config loader expands
//! environment references and resolves them into these types at the parse
//! boundary. Existence of an [`SmtpSettings`] value proves a relay is
//! configured.

use std::fmt;
use std::time::Duration;

use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SmtpSettingsError {
    #[error("smtp host must not be empty")]
    EmptyHost,
    #[error("smtp sender address missing: set smtp.from or smtp.username")]
    MissingSender,
    #[error("smtp password given without smtp.username")]
    PasswordWithoutUsername,
    #[error("smtp.username {username} has no password (is the referenced variable set?)")]
    EmptyPassword { username: String },
}

/// How the SMTP connection is secured.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TlsMode {
    /// Plain connection upgraded with STARTTLS (submission port).
    #[default]
    StartTls,
    /// Implicit TLS from the first byte.
    Tls,
    /// No encryption. Only for local relays.
    None,
}

impl TlsMode {
    #[must_use]
    pub const fn default_port(self) -> u16 {
        match self {
            Self::StartTls => 587,
            Self::Tls => 465,
            Self::None => 25,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::StartTls => "starttls",
            Self::Tls => "tls",
            Self::None => "none",
        }
    }
}

/// `[smtp]` table as written in the config file.
#[derive(Default, Deserialize)]
pub struct RawSmtpSettings {
    #[serde(default)]
    pub host: String,
    pub port: Option<u16>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub from: Option<String>,
    #[serde(default)]
    pub tls: TlsMode,
    pub timeout_seconds: Option<u64>,
}

// Manual Debug impl to prevent leaking the relay password in logs.
impl fmt::Debug for RawSmtpSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RawSmtpSettings")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &mask(self.password.is_some()))
            .field("from", &self.from)
            .field("tls", &self.tls)
            .field("timeout_seconds", &self.timeout_seconds)
            .finish()
    }
}

fn mask(present: bool) -> &'static str {
    if present { "[REDACTED]" } else { "None" }
}

#[derive(Clone, PartialEq, Eq)]
pub struct SmtpCredentials {
    username: String,
    password: String,
}

impl SmtpCredentials {
    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    #[must_use]
    pub fn password(&self) -> &str {
        &self.password
    }
}

impl fmt::Debug for SmtpCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SmtpCredentials")
            .field("username", &self.username)
            .field("password", &mask(true))
            .finish()
    }
}

/// Validated relay settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmtpSettings {
    host: String,
    port: u16,
    tls: TlsMode,
    credentials: Option<SmtpCredentials>,
    from: String,
    timeout: Duration,
}

impl SmtpSettings {
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    #[must_use]
    pub fn port(&self) -> u16 {
        self.port
    }

    #[must_use]
    pub fn tls(&self) -> TlsMode {
        self.tls
    }

    #[must_use]
    pub fn credentials(&self) -> Option<&SmtpCredentials> {
        self.credentials.as_ref()
    }

    /// Envelope and header sender.
    #[must_use]
    pub fn from(&self) -> &str {
        &self.from
    }

    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl TryFrom<RawSmtpSettings> for SmtpSettings {
    type Error = SmtpSettingsError;

    fn try_from(raw: RawSmtpSettings) -> Result<Self, Self::Error> {
        let host = raw.host.trim().to_string();
        if host.is_empty() {
            return Err(SmtpSettingsError::EmptyHost);
        }

        let username = raw
            .username
            .map(|u| u.trim().to_string())
            .filter(|u| !u.is_empty());

        let password = raw.password.filter(|p| !p.is_empty());
        let credentials = match (username.clone(), password) {
            (Some(username), Some(password)) => Some(SmtpCredentials { username, password }),
            (Some(username), None) => return Err(SmtpSettingsError::EmptyPassword { username }),
            (None, Some(_)) => return Err(SmtpSettingsError::PasswordWithoutUsername),
            (None, None) => None,
        };

        let from = raw
            .from
            .map(|f| f.trim().to_string())
            .filter(|f| !f.is_empty())
            .or(username)
            .ok_or(SmtpSettingsError::MissingSender)?;

        Ok(Self {
            host,
            port: raw.port.unwrap_or_else(|| raw.tls.default_port()),
            tls: raw.tls,
            credentials,
            from,
            timeout: raw
                .timeout_seconds
                .map_or(Self::DEFAULT_TIMEOUT, Duration::from_secs),
        })
    }
}
