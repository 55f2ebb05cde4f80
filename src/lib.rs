// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Relational JWT Encoder - JWT construction and signing
//!
//! Builds signed JWTs from a JOSE header and a claims set. The signing key is
//! selected from a pluggable key source by algorithm, signers are cached per
//! key, and every token is built from its own accumulator.
//!
//! ## Modules
//!
//! - `jose` - Header and claims model
//! - `keys` - Signing keys, key sources and key selection
//! - `signing` - JWS signers and the signer cache
//! - `encoder` - Builder, wire conversion and the signed token
//! - `config` - Environment configuration
//! - `logging` - Tracing subscriber setup
//!
//! ## Example
//!
//! ```no_run
//! use jwt_encoder::{ImmutableKeySet, JwtBuilderFactory, SigningKey};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let pem = std::fs::read("signing.pem")?;
//! let factory: JwtBuilderFactory =
//!     JwtBuilderFactory::new(ImmutableKeySet::from(SigningKey::rsa_pem(pem).with_key_id("k1")));
//!
//! let mut builder = factory.create();
//! builder.claims_mut().subject("user-1")?;
//! builder.claim("scope", "wallet:read")?;
//! let jwt = builder.build()?;
//! println!("{}", jwt.token_value());
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod encoder;
pub mod error;
pub mod jose;
pub mod keys;
pub mod logging;
pub mod signing;

#[cfg(test)]
mod test_support;

pub use config::{ConfigError, EncoderConfig, SigningKeyConfig};
pub use encoder::{HeaderConversionError, Jwt, JwtBuilder, JwtBuilderFactory};
pub use error::{EncodingPhase, JwtEncodingError};
pub use jose::{FieldError, JoseHeader, JoseHeaderBuilder, JwsAlgorithm, JwtClaimsSet, JwtClaimsSetBuilder};
pub use keys::{ImmutableKeySet, KeyMatcher, KeySource, KeySourceError, SigningKey};
pub use signing::{SignerCache, SignerError};
