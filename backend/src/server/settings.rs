//! Runtime settings loaded via OrthoConfig.
//!
//! Every value can come from the command line, a configuration file, or a
//! `HEART_`-prefixed environment variable. The database URL additionally
//! falls back to the conventional `DATABASE_URL`.

use std::convert::Infallible;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::{Deserialize, Deserializer, Serialize};

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_MODEL_PATH: &str = "models/heart_model.json";
const DEFAULT_POOL_MAX_SIZE: u32 = 10;
const DEFAULT_POOL_TIMEOUT_SECS: u64 = 30;

/// Settings that could not be interpreted.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SettingsError {
    #[error("invalid bind address {value:?}: {message}")]
    InvalidBindAddr { value: String, message: String },
}

/// CORS origins given either as one comma-separated string or as a list.
///
/// Blank entries are dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct OriginList(Vec<String>);

impl OriginList {
    fn from_entries<'a>(entries: impl IntoIterator<Item = &'a str>) -> Self {
        Self(entries.into_iter().filter_map(non_blank).collect())
    }
}

impl FromStr for OriginList {
    type Err = Infallible;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        Ok(Self::from_entries(raw.split(',')))
    }
}

impl<'de> Deserialize<'de> for OriginList {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Joined(String),
            Listed(Vec<String>),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Joined(raw) => Self::from_entries(raw.split(',')),
            Raw::Listed(entries) => Self::from_entries(entries.iter().map(String::as_str)),
        })
    }
}

/// Configuration values controlling the HTTP server and its adapters.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "HEART")]
pub struct AppSettings {
    /// PostgreSQL connection string. Without one, accounts and predictions
    /// live in memory.
    pub database_url: Option<String>,
    /// Socket address to listen on.
    #[ortho_config(default = DEFAULT_BIND_ADDR.to_owned())]
    pub bind_addr: String,
    /// Path to the classifier artifact.
    #[ortho_config(default = PathBuf::from(DEFAULT_MODEL_PATH))]
    pub model_path: PathBuf,
    /// Upper bound on pooled database connections.
    #[ortho_config(default = DEFAULT_POOL_MAX_SIZE)]
    pub pool_max_size: u32,
    /// Seconds to wait for a pooled connection.
    #[ortho_config(default = DEFAULT_POOL_TIMEOUT_SECS)]
    pub pool_timeout_secs: u64,
    /// CORS origins; any origin is allowed when unset.
    pub allowed_origins: Option<OriginList>,
}

fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_owned())
}

impl AppSettings {
    /// Configured database URL, falling back to `DATABASE_URL`.
    pub fn database_url(&self) -> Option<String> {
        self.database_url
            .as_deref()
            .and_then(non_blank)
            .or_else(|| std::env::var("DATABASE_URL").ok().as_deref().and_then(non_blank))
    }

    /// Parsed listen address.
    ///
    /// # Errors
    /// Returns [`SettingsError::InvalidBindAddr`] when the value is not a
    /// socket address.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        self.bind_addr
            .trim()
            .parse()
            .map_err(|err: std::net::AddrParseError| SettingsError::InvalidBindAddr {
                value: self.bind_addr.clone(),
                message: err.to_string(),
            })
    }

    /// Classifier artifact location.
    pub fn model_path(&self) -> PathBuf {
        self.model_path.clone()
    }

    /// Pool size handed to the database pool, which rejects zero.
    pub fn pool_max_size(&self) -> u32 {
        self.pool_max_size
    }

    /// Connection checkout timeout; zero is rejected by the pool.
    pub fn pool_timeout(&self) -> Duration {
        Duration::from_secs(self.pool_timeout_secs)
    }

    /// Explicit CORS origins; empty means any origin.
    pub fn allowed_origins(&self) -> Vec<String> {
        self.allowed_origins
            .as_ref()
            .map(|origins| origins.0.clone())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for settings parsing.

    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    const VARS: [&str; 7] = [
        "HEART_DATABASE_URL",
        "HEART_BIND_ADDR",
        "HEART_MODEL_PATH",
        "HEART_POOL_MAX_SIZE",
        "HEART_POOL_TIMEOUT_SECS",
        "HEART_ALLOWED_ORIGINS",
        "DATABASE_URL",
    ];

    fn load_from_empty_args() -> AppSettings {
        AppSettings::load_from_iter([OsString::from("heart-predictor")])
            .expect("config should load")
    }

    fn cleared_except(overrides: &[(&str, &str)]) -> Vec<(&'static str, Option<String>)> {
        VARS.iter()
            .map(|name| {
                let value = overrides
                    .iter()
                    .find(|(key, _)| key == name)
                    .map(|(_, value)| (*value).to_owned());
                (*name, value)
            })
            .collect()
    }

    #[rstest]
    fn default_values_are_used_when_missing() {
        let _guard = lock_env(cleared_except(&[]));

        let settings = load_from_empty_args();
        assert_eq!(settings.database_url(), None);
        assert_eq!(
            settings.bind_addr().expect("default address parses"),
            "0.0.0.0:8080".parse::<SocketAddr>().expect("literal")
        );
        assert_eq!(settings.model_path(), PathBuf::from(DEFAULT_MODEL_PATH));
        assert_eq!(settings.pool_max_size(), 10);
        assert_eq!(settings.pool_timeout(), Duration::from_secs(30));
        assert!(settings.allowed_origins().is_empty());
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env(cleared_except(&[
            ("HEART_DATABASE_URL", "postgres://db/heart"),
            ("HEART_BIND_ADDR", "127.0.0.1:9000"),
            ("HEART_MODEL_PATH", "/srv/model.json"),
            ("HEART_POOL_MAX_SIZE", "4"),
            ("HEART_POOL_TIMEOUT_SECS", "5"),
            ("HEART_ALLOWED_ORIGINS", "https://a.example, https://b.example,"),
        ]));

        let settings = load_from_empty_args();
        assert_eq!(settings.database_url().as_deref(), Some("postgres://db/heart"));
        assert_eq!(
            settings.bind_addr().expect("address parses"),
            "127.0.0.1:9000".parse::<SocketAddr>().expect("literal")
        );
        assert_eq!(settings.model_path(), PathBuf::from("/srv/model.json"));
        assert_eq!(settings.pool_max_size(), 4);
        assert_eq!(settings.pool_timeout(), Duration::from_secs(5));
        assert_eq!(
            settings.allowed_origins(),
            vec!["https://a.example".to_owned(), "https://b.example".to_owned()]
        );
    }

    #[rstest]
    #[case("https://only.example", vec!["https://only.example"])]
    #[case(" , ", vec![])]
    fn origin_list_accepts_single_and_listed_values(
        #[case] raw: &str,
        #[case] expected: Vec<&str>,
    ) {
        let _guard = lock_env(cleared_except(&[("HEART_ALLOWED_ORIGINS", raw)]));

        let settings = load_from_empty_args();
        assert_eq!(settings.allowed_origins(), expected);
    }

    #[rstest]
    fn plain_database_url_is_a_fallback() {
        let _guard = lock_env(cleared_except(&[("DATABASE_URL", "postgres://fallback/db")]));

        let settings = load_from_empty_args();
        assert_eq!(settings.database_url().as_deref(), Some("postgres://fallback/db"));
    }

    #[rstest]
    fn malformed_bind_address_is_reported() {
        let _guard = lock_env(cleared_except(&[("HEART_BIND_ADDR", "localhost")]));

        let err = load_from_empty_args()
            .bind_addr()
            .expect_err("hostname is not a socket address");
        assert!(matches!(err, SettingsError::InvalidBindAddr { .. }));
    }
}
