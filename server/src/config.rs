//! Server configuration module.
//!
//! This module loads the Clubhouse server configuration from environment
//! variables.
//!
//! # Environment Variables
//!
//! - `CLUBHOUSE_LISTEN_PORT`: Port to listen on (default: `3000`)
//! - `CLUBHOUSE_ADMIN_CREDENTIALS`: Comma-separated `username:password` pairs
//! - `CLUBHOUSE_ADMIN_USERNAME` / `CLUBHOUSE_ADMIN_PASSWORD`: One extra pair
//! - `CLUBHOUSE_JWT_SECRET`: Token signing secret (required)
//! - `CLUBHOUSE_STORE`: `memory` (default) or `document`
//! - `CLUBHOUSE_DATABASE_DIRECTORY`: Directory for the document store (default: `./data`)
//! - `CLUBHOUSE_DATABASE_NAME`: Document store file stem (default: `clubhouse`)
//! - `CLUBHOUSE_PUBLIC_DIRECTORY`: Static site directory (optional)
//!
//! # Invariants
//!
//! - `admin_credentials` is never empty
//! - `jwt_secret` is never empty
//! - `listen_port` is always a valid port number

use std::path::PathBuf;

use crate::auth::{AdminCredential, CredentialError};
use crate::store::StoreBackend;

const LISTEN_PORT: &str = "CLUBHOUSE_LISTEN_PORT";
const ADMIN_CREDENTIALS: &str = "CLUBHOUSE_ADMIN_CREDENTIALS";
const ADMIN_USERNAME: &str = "CLUBHOUSE_ADMIN_USERNAME";
const ADMIN_PASSWORD: &str = "CLUBHOUSE_ADMIN_PASSWORD";
const JWT_SECRET: &str = "CLUBHOUSE_JWT_SECRET";
const STORE: &str = "CLUBHOUSE_STORE";
const DATABASE_DIRECTORY: &str = "CLUBHOUSE_DATABASE_DIRECTORY";
const DATABASE_NAME: &str = "CLUBHOUSE_DATABASE_NAME";
const PUBLIC_DIRECTORY: &str = "CLUBHOUSE_PUBLIC_DIRECTORY";

/// Server configuration.
///
/// # Post-conditions
///
/// When constructed via `from_env()`, every invariant in the module docs
/// holds.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Port to listen on for HTTP connections.
    pub listen_port: u16,
    /// Accounts allowed to log in.
    pub admin_credentials: Vec<AdminCredential>,
    /// Secret used to sign and verify admin tokens.
    pub jwt_secret: String,
    /// Where records are kept.
    pub store: StoreBackend,
    /// Static site served for non-API paths.
    pub public_directory: Option<PathBuf>,
}

/// Error returned when loading configuration fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// An environment variable is missing.
    MissingEnvVar(String),
    /// An environment variable has an invalid value.
    InvalidValue { name: String, message: String },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingEnvVar(name) => {
                write!(f, "missing required environment variable: {name}")
            }
            Self::InvalidValue { name, message } => {
                write!(f, "invalid value for {name}: {message}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

impl ServerConfig {
    /// Default port for the server.
    pub const DEFAULT_PORT: u16 = 3000;
    /// Default document store directory.
    pub const DEFAULT_DATABASE_DIRECTORY: &'static str = "./data";
    /// Default document store file stem.
    pub const DEFAULT_DATABASE_NAME: &'static str = "clubhouse";

    /// Load configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - no admin credentials are configured, or one is malformed
    /// - `CLUBHOUSE_JWT_SECRET` is not set or is empty
    /// - the port or store kind is set to an unrecognized value
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through `lookup`, which returns the value of a
    /// variable if it is set.
    ///
    /// # Errors
    ///
    /// See [`ServerConfig::from_env`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        Ok(Self {
            listen_port: load_listen_port(&lookup)?,
            admin_credentials: load_admin_credentials(&lookup)?,
            jwt_secret: load_jwt_secret(&lookup)?,
            store: load_store(&lookup)?,
            public_directory: lookup(PUBLIC_DIRECTORY)
                .filter(|value| !value.is_empty())
                .map(PathBuf::from),
        })
    }
}

fn load_listen_port(lookup: &impl Fn(&str) -> Option<String>) -> Result<u16, ConfigError> {
    match lookup(LISTEN_PORT) {
        Some(value) => match value.parse::<u16>() {
            Ok(port) if port > 0 => Ok(port),
            _ => Err(ConfigError::InvalidValue {
                name: LISTEN_PORT.to_string(),
                message: format!("'{value}' is not a valid port number (must be 1-65535)"),
            }),
        },
        None => Ok(ServerConfig::DEFAULT_PORT),
    }
}

fn load_admin_credentials(
    lookup: &impl Fn(&str) -> Option<String>,
) -> Result<Vec<AdminCredential>, ConfigError> {
    let invalid = |e: CredentialError| ConfigError::InvalidValue {
        name: ADMIN_CREDENTIALS.to_string(),
        message: e.to_string(),
    };

    let mut credentials = Vec::new();
    if let Some(list) = lookup(ADMIN_CREDENTIALS) {
        for entry in list.split(',').map(str::trim).filter(|e| !e.is_empty()) {
            credentials.push(AdminCredential::parse(entry).map_err(invalid)?);
        }
    }

    match (lookup(ADMIN_USERNAME), lookup(ADMIN_PASSWORD)) {
        (Some(username), Some(password)) => {
            credentials.push(AdminCredential::new(username.trim(), password));
        }
        (None, None) => {}
        (Some(_), None) => return Err(ConfigError::MissingEnvVar(ADMIN_PASSWORD.to_string())),
        (None, Some(_)) => return Err(ConfigError::MissingEnvVar(ADMIN_USERNAME.to_string())),
    }

    if credentials.is_empty() {
        return Err(ConfigError::MissingEnvVar(ADMIN_CREDENTIALS.to_string()));
    }
    if let Some(bad) = credentials
        .iter()
        .find(|c| c.username.is_empty() || c.password.is_empty())
    {
        return Err(invalid(CredentialError::EmptyField(bad.username.clone())));
    }
    Ok(credentials)
}

fn load_jwt_secret(lookup: &impl Fn(&str) -> Option<String>) -> Result<String, ConfigError> {
    let secret = lookup(JWT_SECRET).ok_or_else(|| ConfigError::MissingEnvVar(JWT_SECRET.to_string()))?;

    if secret.is_empty() {
        return Err(ConfigError::InvalidValue {
            name: JWT_SECRET.to_string(),
            message: "must not be empty".to_string(),
        });
    }

    Ok(secret)
}

fn load_store(lookup: &impl Fn(&str) -> Option<String>) -> Result<StoreBackend, ConfigError> {
    match lookup(STORE).as_deref().map(str::trim) {
        None | Some("" | "memory") => Ok(StoreBackend::Memory),
        Some("document") => {
            let directory = lookup(DATABASE_DIRECTORY)
                .filter(|value| !value.is_empty())
                .unwrap_or_else(|| ServerConfig::DEFAULT_DATABASE_DIRECTORY.to_string());
            let name = lookup(DATABASE_NAME)
                .filter(|value| !value.is_empty())
                .unwrap_or_else(|| ServerConfig::DEFAULT_DATABASE_NAME.to_string());
            Ok(StoreBackend::Document {
                path: PathBuf::from(directory).join(format!("{name}.redb")),
            })
        }
        Some(other) => Err(ConfigError::InvalidValue {
            name: STORE.to_string(),
            message: format!("'{other}' is not a store kind (expected memory or document)"),
        }),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<ServerConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        ServerConfig::from_lookup(|name| vars.get(name).cloned())
    }

    const MINIMAL: [(&str, &str); 2] = [
        (ADMIN_CREDENTIALS, "admin:hunter2"),
        (JWT_SECRET, "secret"),
    ];

    #[test]
    fn test_default_values() {
        let config = load(&MINIMAL).unwrap();
        assert_eq!(config.listen_port, ServerConfig::DEFAULT_PORT);
        assert_eq!(config.store, StoreBackend::Memory);
        assert_eq!(config.public_directory, None);
        assert_eq!(
            config.admin_credentials,
            vec![AdminCredential::new("admin", "hunter2")]
        );
    }

    #[test]
    fn test_multiple_credentials_and_legacy_pair() {
        let config = load(&[
            (ADMIN_CREDENTIALS, "admin:a, coach:b:c"),
            (ADMIN_USERNAME, "owner"),
            (ADMIN_PASSWORD, "d"),
            (JWT_SECRET, "secret"),
        ])
        .unwrap();

        assert_eq!(
            config.admin_credentials,
            vec![
                AdminCredential::new("admin", "a"),
                AdminCredential::new("coach", "b:c"),
                AdminCredential::new("owner", "d"),
            ]
        );
    }

    #[test]
    fn test_legacy_pair_alone() {
        let config = load(&[
            (ADMIN_USERNAME, "admin"),
            (ADMIN_PASSWORD, "pw"),
            (JWT_SECRET, "secret"),
        ])
        .unwrap();
        assert_eq!(config.admin_credentials.len(), 1);
    }

    #[test]
    fn test_missing_credentials() {
        assert_eq!(
            load(&[(JWT_SECRET, "secret")]).unwrap_err(),
            ConfigError::MissingEnvVar(ADMIN_CREDENTIALS.to_string())
        );
        assert_eq!(
            load(&[(ADMIN_USERNAME, "admin"), (JWT_SECRET, "secret")]).unwrap_err(),
            ConfigError::MissingEnvVar(ADMIN_PASSWORD.to_string())
        );
    }

    #[test]
    fn test_malformed_credentials() {
        let err = load(&[(ADMIN_CREDENTIALS, "admin"), (JWT_SECRET, "secret")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref name, .. } if name == ADMIN_CREDENTIALS));

        let err = load(&[(ADMIN_CREDENTIALS, "admin:"), (JWT_SECRET, "secret")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }

    #[test]
    fn test_missing_or_empty_secret() {
        assert_eq!(
            load(&[(ADMIN_CREDENTIALS, "admin:pw")]).unwrap_err(),
            ConfigError::MissingEnvVar(JWT_SECRET.to_string())
        );
        assert!(matches!(
            load(&[(ADMIN_CREDENTIALS, "admin:pw"), (JWT_SECRET, "")]).unwrap_err(),
            ConfigError::InvalidValue { .. }
        ));
    }

    #[test]
    fn test_invalid_port() {
        for port in ["0", "70000", "http"] {
            let mut vars = MINIMAL.to_vec();
            vars.push((LISTEN_PORT, port));
            assert!(load(&vars).is_err(), "accepted port {port}");
        }

        let mut vars = MINIMAL.to_vec();
        vars.push((LISTEN_PORT, "8080"));
        assert_eq!(load(&vars).unwrap().listen_port, 8080);
    }

    #[test]
    fn test_document_store_path() {
        let mut vars = MINIMAL.to_vec();
        vars.push((STORE, "document"));
        assert_eq!(
            load(&vars).unwrap().store,
            StoreBackend::Document {
                path: PathBuf::from("./data/clubhouse.redb")
            }
        );

        vars.push((DATABASE_DIRECTORY, "/var/lib/clubhouse"));
        vars.push((DATABASE_NAME, "site"));
        assert_eq!(
            load(&vars).unwrap().store,
            StoreBackend::Document {
                path: PathBuf::from("/var/lib/clubhouse/site.redb")
            }
        );
    }

    #[test]
    fn test_unknown_store_kind() {
        let mut vars = MINIMAL.to_vec();
        vars.push((STORE, "mongo"));
        assert!(matches!(
            load(&vars).unwrap_err(),
            ConfigError::InvalidValue { ref name, .. } if name == STORE
        ));
    }

    #[test]
    fn test_public_directory() {
        let mut vars = MINIMAL.to_vec();
        vars.push((PUBLIC_DIRECTORY, "public"));
        assert_eq!(
            load(&vars).unwrap().public_directory,
            Some(PathBuf::from("public"))
        );
    }

    #[test]
    fn test_config_error_display_missing() {
        let error = ConfigError::MissingEnvVar("TEST_VAR".to_string());
        assert_eq!(
            error.to_string(),
            "missing required environment variable: TEST_VAR"
        );
    }

    #[test]
    fn test_config_error_display_invalid() {
        let error = ConfigError::InvalidValue {
            name: "TEST_VAR".to_string(),
            message: "bad value".to_string(),
        };
        assert_eq!(error.to_string(), "invalid value for TEST_VAR: bad value");
    }
}
