// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! Environment variable names, defaults, and the typed configuration read
//! from them. Nothing here is required: an encoder built with
//! [`EncoderConfig::default`] signs with `RS256`, sets `typ` to `JWT` and
//! assigns a fresh `jti` to every token.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `JWT_SIGNING_ALGORITHM` | Default `alg` for new builders | `RS256` |
//! | `JWT_TOKEN_TYPE` | Default `typ` for new builders | `JWT` |
//! | `JWT_ISSUE_TOKEN_ID` | Assign a UUID `jti` when none is set | `true` |
//! | `JWT_SIGNING_KEY_PATH` | File holding the signing key | Optional |
//! | `JWT_SIGNING_KEY_TYPE` | `rsa`, `ec-p256`, `ec-p384`, `ed25519` or `hmac` | `rsa` |
//! | `JWT_SIGNING_KEY_ID` | `kid` attached to the loaded key | Optional |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info` |

use std::fs;
use std::path::PathBuf;

use crate::jose::{Curve, JwsAlgorithm, JWT_TYPE};
use crate::keys::{KeySourceError, SigningKey};

/// Environment variable name for the default signing algorithm.
///
/// # Default
/// `RS256`
pub const SIGNING_ALGORITHM_ENV: &str = "JWT_SIGNING_ALGORITHM";

/// Environment variable name for the default `typ` header.
pub const TOKEN_TYPE_ENV: &str = "JWT_TOKEN_TYPE";

/// Environment variable name toggling automatic `jti` assignment.
///
/// Accepts `true`/`false`, `1`/`0`, `yes`/`no`.
pub const ISSUE_TOKEN_ID_ENV: &str = "JWT_ISSUE_TOKEN_ID";

/// Environment variable name for the signing key file.
///
/// PEM for asymmetric keys, raw bytes for HMAC secrets.
pub const SIGNING_KEY_PATH_ENV: &str = "JWT_SIGNING_KEY_PATH";

/// Environment variable name for the signing key family.
pub const SIGNING_KEY_TYPE_ENV: &str = "JWT_SIGNING_KEY_TYPE";

/// Environment variable name for the signing key's `kid`.
pub const SIGNING_KEY_ID_ENV: &str = "JWT_SIGNING_KEY_ID";

/// Environment variable name for the log output format.
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

/// Configuration could not be read.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value for {name}: {reason}")]
    InvalidValue { name: &'static str, reason: String },

    #[error(transparent)]
    KeyFile(#[from] KeySourceError),
}

pub(crate) fn env_optional(name: &str) -> Option<String> {
    lookup_optional(name, |n| std::env::var(n).ok())
}

fn lookup_optional(name: &str, lookup: impl Fn(&str) -> Option<String>) -> Option<String> {
    lookup(name)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_bool(name: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        other => Err(ConfigError::InvalidValue {
            name,
            reason: format!("expected a boolean, got '{other}'"),
        }),
    }
}

/// Defaults applied to every new builder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncoderConfig {
    pub default_algorithm: JwsAlgorithm,
    pub token_type: Option<String>,
    pub issue_token_id: bool,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            default_algorithm: JwsAlgorithm::RS256,
            token_type: Some(JWT_TYPE.to_string()),
            issue_token_id: true,
        }
    }
}

impl EncoderConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read the configuration through `lookup` instead of the process
    /// environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(alg) = lookup_optional(SIGNING_ALGORITHM_ENV, &lookup) {
            config.default_algorithm = alg.parse().map_err(|e: crate::jose::UnknownAlgorithm| {
                ConfigError::InvalidValue {
                    name: SIGNING_ALGORITHM_ENV,
                    reason: e.to_string(),
                }
            })?;
        }
        if let Some(typ) = lookup_optional(TOKEN_TYPE_ENV, &lookup) {
            config.token_type = Some(typ);
        }
        if let Some(flag) = lookup_optional(ISSUE_TOKEN_ID_ENV, &lookup) {
            config.issue_token_id = parse_bool(ISSUE_TOKEN_ID_ENV, &flag)?;
        }
        Ok(config)
    }
}

/// Key family of a configured key file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KeyFileType {
    #[default]
    Rsa,
    EcP256,
    EcP384,
    Ed25519,
    Hmac,
}

impl std::str::FromStr for KeyFileType {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "rsa" => Ok(KeyFileType::Rsa),
            "ec-p256" => Ok(KeyFileType::EcP256),
            "ec-p384" => Ok(KeyFileType::EcP384),
            "ed25519" => Ok(KeyFileType::Ed25519),
            "hmac" => Ok(KeyFileType::Hmac),
            other => Err(ConfigError::InvalidValue {
                name: SIGNING_KEY_TYPE_ENV,
                reason: format!("unknown key type '{other}'"),
            }),
        }
    }
}

/// A signing key loaded from disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SigningKeyConfig {
    pub path: PathBuf,
    pub key_type: KeyFileType,
    pub key_id: Option<String>,
}

impl SigningKeyConfig {
    /// `Ok(None)` when `JWT_SIGNING_KEY_PATH` is not set.
    pub fn from_env() -> Result<Option<Self>, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Option<Self>, ConfigError> {
        let Some(path) = lookup_optional(SIGNING_KEY_PATH_ENV, &lookup) else {
            return Ok(None);
        };
        let key_type = match lookup_optional(SIGNING_KEY_TYPE_ENV, &lookup) {
            Some(value) => value.parse()?,
            None => KeyFileType::default(),
        };
        Ok(Some(Self {
            path: PathBuf::from(path),
            key_type,
            key_id: lookup_optional(SIGNING_KEY_ID_ENV, &lookup),
        }))
    }

    /// Read the key file.
    pub fn load(&self) -> Result<SigningKey, ConfigError> {
        let bytes = fs::read(&self.path).map_err(|source| KeySourceError::Io {
            path: self.path.clone(),
            source,
        })?;
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Err(ConfigError::InvalidValue {
                name: SIGNING_KEY_PATH_ENV,
                reason: format!("{} is empty", self.path.display()),
            });
        }

        let key = match self.key_type {
            KeyFileType::Rsa => SigningKey::rsa_pem(&bytes),
            KeyFileType::EcP256 => SigningKey::ec_pem(Curve::P256, &bytes),
            KeyFileType::EcP384 => SigningKey::ec_pem(Curve::P384, &bytes),
            KeyFileType::Ed25519 => SigningKey::ed25519_pem(&bytes),
            KeyFileType::Hmac => SigningKey::hmac_secret(&bytes),
        };
        Ok(match &self.key_id {
            Some(kid) => key.with_key_id(kid),
            None => key,
        })
    }
}
