//! Configuration for Signoff.
//!
//! Loaded once at startup from `~/.signoff/config.toml` (or the path in
//! `SIGNOFF_CONFIG`):
//!
//! ```toml
//! [app]
//! database = "~/.signoff/signoff.db"
//!
//! [clients]
//! "Client A" = "a@example.com"
//!
//! [smtp]
//! host = "smtp.example.com"
//! username = "sender@example.com"
//! password = "${SIGNOFF_SMTP_PASSWORD}"
//! ```
//!
//! Relay credentials never live in code. `${VAR}` references in the `[smtp]`
//! table are expanded from the environment at load time.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::{env, fs};

use serde::Deserialize;
use signoff_types::{ClientDirectory, RawSmtpSettings, SmtpSettings, SmtpSettingsError};

/// Environment variable that overrides the config file location.
pub const CONFIG_PATH_ENV: &str = "SIGNOFF_CONFIG";

const DATA_DIR_NAME: &str = ".signoff";
const DATABASE_FILE_NAME: &str = "signoff.db";

#[derive(Debug, Default, Deserialize)]
pub struct SignoffConfig {
    pub app: Option<AppConfig>,
    /// Client id -> notification address.
    #[serde(default)]
    pub clients: BTreeMap<String, String>,
    pub smtp: Option<RawSmtpSettings>,
}

#[derive(Debug, Default, Deserialize)]
pub struct AppConfig {
    /// Database file. `~/` and `${VAR}` are expanded.
    pub database: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config at {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config at {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("invalid [smtp] settings: {0}")]
    Smtp(#[from] SmtpSettingsError),
}

/// A `[clients]` entry left out of the directory.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClientEntryError {
    #[error("blank client id (address {address:?})")]
    BlankId { address: String },
    #[error("client {id:?} has no notification address")]
    BlankAddress { id: String },
    #[error("client {id:?} has an invalid address {address:?}")]
    InvalidAddress { id: String, address: String },
    #[error("client {raw:?} duplicates {id:?} once whitespace is trimmed")]
    DuplicateId { id: String, raw: String },
}

impl ConfigError {
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            ConfigError::Read { path, .. } | ConfigError::Parse { path, .. } => Some(path),
            ConfigError::Smtp(_) => None,
        }
    }
}

impl SignoffConfig {
    /// Load from the default location. `Ok(None)` when no file exists.
    pub fn load() -> Result<Option<Self>, ConfigError> {
        match config_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(None),
        }
    }

    pub fn load_from(path: &Path) -> Result<Option<Self>, ConfigError> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "No config file; using defaults");
            return Ok(None);
        }

        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        toml::from_str(&content)
            .map(Some)
            .map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })
    }

    /// Build the immutable client directory.
    ///
    /// Falls back to the sample clients when `[clients]` is empty so the
    /// submission form always has something to select. Unusable entries are
    /// skipped with a warning; see [`SignoffConfig::resolve_clients`].
    #[must_use]
    pub fn client_directory(&self) -> ClientDirectory {
        if self.clients.is_empty() {
            tracing::info!("No [clients] configured; using sample client directory");
            return ClientDirectory::sample();
        }

        let (directory, skipped) = self.resolve_clients();
        for entry in &skipped {
            tracing::warn!("Skipping [clients] entry: {entry}");
        }
        if directory.is_empty() {
            tracing::warn!("No usable [clients] entries; every submission will be rejected");
        }
        directory
    }

    /// Validate `[clients]`, returning the usable directory and every
    /// rejected entry.
    ///
    /// Ids and addresses are trimmed. When two keys trim to the same id, the
    /// one that sorts first wins and the other is rejected.
    #[must_use]
    pub fn resolve_clients(&self) -> (ClientDirectory, Vec<ClientEntryError>) {
        let mut accepted: BTreeMap<String, String> = BTreeMap::new();
        let mut skipped = Vec::new();

        for (raw_id, raw_address) in &self.clients {
            let id = raw_id.trim();
            let address = raw_address.trim();

            let problem = if id.is_empty() {
                Some(ClientEntryError::BlankId {
                    address: address.to_string(),
                })
            } else if address.is_empty() {
                Some(ClientEntryError::BlankAddress { id: id.to_string() })
            } else if !is_plausible_address(address) {
                Some(ClientEntryError::InvalidAddress {
                    id: id.to_string(),
                    address: address.to_string(),
                })
            } else if accepted.contains_key(id) {
                Some(ClientEntryError::DuplicateId {
                    id: id.to_string(),
                    raw: raw_id.clone(),
                })
            } else {
                None
            };

            match problem {
                Some(problem) => skipped.push(problem),
                None => {
                    accepted.insert(id.to_string(), address.to_string());
                }
            }
        }

        (ClientDirectory::from_entries(accepted), skipped)
    }

    /// Resolved relay settings, or `None` when `[smtp]` is absent.
    pub fn smtp_settings(&self) -> Result<Option<SmtpSettings>, ConfigError> {
        let Some(raw) = self.smtp.as_ref() else {
            return Ok(None);
        };
        let expanded = RawSmtpSettings {
            host: expand_env_vars(&raw.host),
            port: raw.port,
            username: raw.username.as_deref().map(expand_env_vars),
            password: raw.password.as_deref().map(expand_env_vars),
            from: raw.from.as_deref().map(expand_env_vars),
            tls: raw.tls,
            timeout_seconds: raw.timeout_seconds,
        };
        Ok(Some(SmtpSettings::try_from(expanded)?))
    }

    /// Where the record database lives.
    #[must_use]
    pub fn database_path(&self) -> Option<PathBuf> {
        let configured = self
            .app
            .as_ref()
            .and_then(|app| app.database.as_deref())
            .map(str::trim)
            .filter(|raw| !raw.is_empty());

        match configured {
            Some(raw) => Some(expand_home(&expand_env_vars(raw))),
            None => default_database_path(),
        }
    }
}

/// `local@domain` with no whitespace. Full RFC 5322 parsing happens in the
/// mail transport; this only catches obvious typos at startup.
fn is_plausible_address(address: &str) -> bool {
    if address.chars().any(char::is_whitespace) {
        return false;
    }
    match address.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.is_empty()
                && !domain.contains('@')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
        }
        None => false,
    }
}

/// Replace `${VAR}` with the variable's value (empty when unset).
#[must_use]
pub fn expand_env_vars(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut rest = value;

    while let Some(start) = rest.find("${") {
        let after = &rest[start + 2..];
        let Some(end) = after.find('}') else {
            break;
        };
        out.push_str(&rest[..start]);
        let name = &after[..end];
        if !name.is_empty() {
            out.push_str(&env::var(name).unwrap_or_default());
        }
        rest = &after[end + 1..];
    }

    out.push_str(rest);
    out
}

fn expand_home(raw: &str) -> PathBuf {
    if let Some(stripped) = raw.strip_prefix("~/")
        && let Some(home) = dirs::home_dir()
    {
        return home.join(stripped);
    }
    PathBuf::from(raw)
}

/// `~/.signoff`, home of the config file, database and logs.
#[must_use]
pub fn data_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(DATA_DIR_NAME))
}

#[must_use]
pub fn config_path() -> Option<PathBuf> {
    if let Ok(path) = env::var(CONFIG_PATH_ENV)
        && !path.trim().is_empty()
    {
        return Some(PathBuf::from(path));
    }
    data_dir().map(|dir| dir.join("config.toml"))
}

#[must_use]
pub fn default_database_path() -> Option<PathBuf> {
    data_dir().map(|dir| dir.join(DATABASE_FILE_NAME))
}

#[cfg(test)]
mod tests {
    use signoff_types::{ClientId, TlsMode};

    use super::*;

    fn parse(toml_str: &str) -> SignoffConfig {
        toml::from_str(toml_str).unwrap()
    }

    #[test]
    fn expand_env_vars_no_vars() {
        assert_eq!(expand_env_vars("hello world"), "hello world");
    }

    #[test]
    fn expand_env_vars_single_var() {
        unsafe {
            env::set_var("SIGNOFF_TEST_SINGLE", "replaced");
        }
        assert_eq!(
            expand_env_vars("prefix ${SIGNOFF_TEST_SINGLE} suffix"),
            "prefix replaced suffix"
        );
        unsafe {
            env::remove_var("SIGNOFF_TEST_SINGLE");
        }
    }

    #[test]
    fn expand_env_vars_missing_var_becomes_empty() {
        unsafe {
            env::remove_var("SIGNOFF_TEST_MISSING");
        }
        assert_eq!(
            expand_env_vars("before ${SIGNOFF_TEST_MISSING} after"),
            "before  after"
        );
    }

    #[test]
    fn expand_env_vars_adjacent_vars() {
        unsafe {
            env::set_var("SIGNOFF_TEST_ADJ_A", "X");
            env::set_var("SIGNOFF_TEST_ADJ_B", "Y");
        }
        assert_eq!(expand_env_vars("${SIGNOFF_TEST_ADJ_A}${SIGNOFF_TEST_ADJ_B}"), "XY");
        unsafe {
            env::remove_var("SIGNOFF_TEST_ADJ_A");
            env::remove_var("SIGNOFF_TEST_ADJ_B");
        }
    }

    #[test]
    fn expand_env_vars_unclosed_brace_preserved() {
        assert_eq!(expand_env_vars("test ${UNCLOSED"), "test ${UNCLOSED");
    }

    #[test]
    fn expand_env_vars_empty_name_dropped() {
        assert_eq!(expand_env_vars("test ${} more"), "test  more");
    }

    #[test]
    fn parse_empty_config() {
        let config = parse("");
        assert!(config.app.is_none());
        assert!(config.clients.is_empty());
        assert!(config.smtp.is_none());
    }

    #[test]
    fn empty_clients_fall_back_to_sample() {
        let directory = parse("").client_directory();
        assert_eq!(directory, ClientDirectory::sample());
    }

    #[test]
    fn configured_clients_replace_sample() {
        let config = parse(
            r#"
[clients]
"Acme" = " ops@acme.example "
"Globex" = "billing@globex.example"
"#,
        );
        let directory = config.client_directory();
        assert_eq!(directory.len(), 2);
        assert_eq!(directory.resolve("Acme").unwrap(), "ops@acme.example");
        assert!(directory.resolve("Client A").is_err());
    }

    fn clients(toml_str: &str) -> (ClientDirectory, Vec<ClientEntryError>) {
        parse(&format!("[clients]\n{toml_str}")).resolve_clients()
    }

    #[test]
    fn blank_client_id_is_skipped() {
        let (directory, skipped) =
            clients("\"\" = \"blank@example.com\"\n\"Acme\" = \"ops@acme.example\"\n");
        assert_eq!(directory.len(), 1);
        assert_eq!(
            skipped,
            [ClientEntryError::BlankId {
                address: "blank@example.com".to_string()
            }]
        );
    }

    #[test]
    fn blank_address_is_skipped() {
        let (directory, skipped) = clients("\"NoMail\" = \"  \"\n");
        assert!(directory.is_empty());
        assert!(directory.verify("NoMail").is_err());
        assert_eq!(
            skipped,
            [ClientEntryError::BlankAddress {
                id: "NoMail".to_string()
            }]
        );
    }

    #[test]
    fn malformed_addresses_are_skipped() {
        let (directory, skipped) = clients(
            r#"
"NoAt" = "ops.acme.example"
"Spaced" = "ops @acme.example"
"TwoAt" = "a@b@acme.example"
"NoDomain" = "ops@"
"Local" = "ops@localhost"
"#,
        );
        let ids: Vec<&str> = directory.client_ids().map(ClientId::as_str).collect();
        assert_eq!(ids, ["Local"]);
        assert_eq!(skipped.len(), 4);
        assert!(
            skipped
                .iter()
                .all(|e| matches!(e, ClientEntryError::InvalidAddress { .. }))
        );
    }

    #[test]
    fn whitespace_duplicates_keep_first_entry() {
        let (directory, skipped) = clients(
            r#"
"Acme" = "one@acme.example"
" Acme " = "two@acme.example"
"#,
        );
        assert_eq!(directory.len(), 1);
        // " Acme " sorts before "Acme", so it is the entry that survives.
        assert_eq!(directory.resolve("Acme").unwrap(), "two@acme.example");
        assert_eq!(
            skipped,
            [ClientEntryError::DuplicateId {
                id: "Acme".to_string(),
                raw: "Acme".to_string()
            }]
        );
    }

    #[test]
    fn all_invalid_clients_leave_directory_empty() {
        let directory = parse("[clients]\n\"\" = \"\"\n").client_directory();
        assert!(directory.is_empty());
    }

    #[test]
    fn missing_smtp_section_means_no_relay() {
        assert!(parse("").smtp_settings().unwrap().is_none());
    }

    #[test]
    fn smtp_password_is_expanded_from_env() {
        unsafe {
            env::set_var("SIGNOFF_TEST_SMTP_PASSWORD", "from-env");
        }
        let config = parse(
            r#"
[smtp]
host = "smtp.example.com"
username = "sender@example.com"
password = "${SIGNOFF_TEST_SMTP_PASSWORD}"
tls = "tls"
"#,
        );
        let settings = config.smtp_settings().unwrap().unwrap();
        unsafe {
            env::remove_var("SIGNOFF_TEST_SMTP_PASSWORD");
        }

        assert_eq!(settings.credentials().unwrap().password(), "from-env");
        assert_eq!(settings.from(), "sender@example.com");
        assert_eq!(settings.tls(), TlsMode::Tls);
        assert_eq!(settings.port(), 465);
    }

    #[test]
    fn unset_password_variable_is_rejected() {
        unsafe {
            env::remove_var("SIGNOFF_TEST_UNSET_SMTP_PASSWORD");
        }
        let config = parse(
            r#"
[smtp]
host = "smtp.example.com"
username = "me@example.com"
password = "${SIGNOFF_TEST_UNSET_SMTP_PASSWORD}"
"#,
        );

        let err = config.smtp_settings().unwrap_err();

        assert!(matches!(
            err,
            ConfigError::Smtp(SmtpSettingsError::EmptyPassword { ref username })
                if username == "me@example.com"
        ));
    }

    #[test]
    fn invalid_smtp_section_is_reported() {
        let config = parse("[smtp]\nhost = \"relay\"\n");
        let err = config.smtp_settings().unwrap_err();
        assert!(matches!(err, ConfigError::Smtp(SmtpSettingsError::MissingSender)));
        assert!(err.path().is_none());
    }

    #[test]
    fn database_path_from_config() {
        let config = parse("[app]\ndatabase = \"/var/lib/signoff/records.db\"\n");
        assert_eq!(
            config.database_path(),
            Some(PathBuf::from("/var/lib/signoff/records.db"))
        );
    }

    #[test]
    fn database_path_expands_home() {
        let config = parse("[app]\ndatabase = \"~/records.db\"\n");
        if let Some(home) = dirs::home_dir() {
            assert_eq!(config.database_path(), Some(home.join("records.db")));
        }
    }

    #[test]
    fn blank_database_uses_default() {
        let config = parse("[app]\ndatabase = \"  \"\n");
        assert_eq!(config.database_path(), default_database_path());
    }

    #[test]
    fn load_from_missing_file_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = SignoffConfig::load_from(&dir.path().join("absent.toml")).unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn load_from_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[clients]\n\"Client A\" = \"a@example.com\"\n").unwrap();

        let config = SignoffConfig::load_from(&path).unwrap().unwrap();
        assert_eq!(config.clients["Client A"], "a@example.com");
    }

    #[test]
    fn load_from_reports_parse_error_with_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[clients\n").unwrap();

        let err = SignoffConfig::load_from(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert_eq!(err.path(), Some(path.as_path()));
    }
}
