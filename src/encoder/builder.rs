// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! JWT builder and its factory.
//!
//! [`JwtBuilderFactory`] is created once and shared; it owns the key source,
//! the signer cache and the encoder defaults. Every token starts from
//! [`JwtBuilderFactory::create`], which hands out an independent
//! [`JwtBuilder`] so that no header or claim leaks from one token into the
//! next.

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::config::EncoderConfig;
use crate::error::JwtEncodingError;
use crate::jose::{FieldError, JoseHeader, JoseHeaderBuilder, JwtClaimsSet, JwtClaimsSetBuilder};
use crate::keys::{select_signing_key, KeySource, SigningKey};
use crate::signing::{SignerCache, SignerError, SignerFactory};

use super::convert::{convert_claims, convert_header, signing_input};
use super::jwt::Jwt;

/// Shared entry point producing per-token builders.
///
/// `C` is the type of the opaque context handed to the key source.
pub struct JwtBuilderFactory<C = ()> {
    key_source: Arc<dyn KeySource<C>>,
    signer_cache: Arc<SignerCache>,
    config: Arc<EncoderConfig>,
}

impl<C> Clone for JwtBuilderFactory<C> {
    fn clone(&self) -> Self {
        Self {
            key_source: Arc::clone(&self.key_source),
            signer_cache: Arc::clone(&self.signer_cache),
            config: Arc::clone(&self.config),
        }
    }
}

impl<C> std::fmt::Debug for JwtBuilderFactory<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtBuilderFactory")
            .field("signer_cache", &self.signer_cache)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl<C> JwtBuilderFactory<C> {
    pub fn new(key_source: impl KeySource<C> + 'static) -> Self {
        Self::with_config(key_source, EncoderConfig::default())
    }

    pub fn with_config(key_source: impl KeySource<C> + 'static, config: EncoderConfig) -> Self {
        Self {
            key_source: Arc::new(key_source),
            signer_cache: Arc::new(SignerCache::new()),
            config: Arc::new(config),
        }
    }

    /// Replace the signer factory. Starts from an empty signer cache.
    pub fn with_signer_factory(mut self, factory: Arc<dyn SignerFactory>) -> Self {
        self.signer_cache = Arc::new(SignerCache::with_factory(factory));
        self
    }

    pub fn config(&self) -> &EncoderConfig {
        &self.config
    }

    pub fn signer_cache(&self) -> &SignerCache {
        &self.signer_cache
    }

    /// Start a new token with the configured defaults applied.
    pub fn create(&self) -> JwtBuilder<C> {
        let mut headers = JoseHeaderBuilder::with_algorithm(self.config.default_algorithm);
        if let Some(typ) = &self.config.token_type {
            if let Err(e) = headers.typ(typ.as_str()) {
                warn!(error = %e, "Ignoring configured token type");
            }
        }
        JwtBuilder {
            factory: self.clone(),
            headers,
            claims: JwtClaimsSetBuilder::new(),
            key: None,
            context: None,
        }
    }

    /// Sign a finalized header and claims set.
    ///
    /// The configured `typ` default is not applied; `jti` still is when the
    /// claims carry none.
    pub fn encode(&self, header: &JoseHeader, claims: &JwtClaimsSet) -> Result<Jwt, JwtEncodingError> {
        let mut builder = self.create();
        builder.headers = header.to_builder();
        builder.claims = claims.to_builder();
        builder.build()
    }
}

/// Accumulates one token's header and claims.
pub struct JwtBuilder<C = ()> {
    factory: JwtBuilderFactory<C>,
    headers: JoseHeaderBuilder,
    claims: JwtClaimsSetBuilder,
    key: Option<SigningKey>,
    context: Option<C>,
}

impl<C> std::fmt::Debug for JwtBuilder<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtBuilder")
            .field("headers", &self.headers)
            .field("claims", &self.claims)
            .field("key", &self.key)
            .field("has_context", &self.context.is_some())
            .finish_non_exhaustive()
    }
}

impl<C> JwtBuilder<C> {
    /// Set a custom header parameter.
    pub fn header(&mut self, name: impl Into<String>, value: impl Into<Value>) -> Result<&mut Self, FieldError> {
        self.headers.header(name, value)?;
        Ok(self)
    }

    /// Set a custom claim.
    pub fn claim(&mut self, name: impl Into<String>, value: impl Into<Value>) -> Result<&mut Self, FieldError> {
        self.claims.claim(name, value)?;
        Ok(self)
    }

    pub fn headers_mut(&mut self) -> &mut JoseHeaderBuilder {
        &mut self.headers
    }

    pub fn claims_mut(&mut self) -> &mut JwtClaimsSetBuilder {
        &mut self.claims
    }

    /// Edit the header; nothing is applied if `f` fails.
    pub fn headers<F>(&mut self, f: F) -> Result<&mut Self, FieldError>
    where
        F: FnOnce(&mut JoseHeaderBuilder) -> Result<(), FieldError>,
    {
        let mut headers = self.headers.clone();
        f(&mut headers)?;
        self.headers = headers;
        Ok(self)
    }

    /// Edit the claims; nothing is applied if `f` fails.
    pub fn claims<F>(&mut self, f: F) -> Result<&mut Self, FieldError>
    where
        F: FnOnce(&mut JwtClaimsSetBuilder) -> Result<(), FieldError>,
    {
        let mut claims = self.claims.clone();
        f(&mut claims)?;
        self.claims = claims;
        Ok(self)
    }

    /// Sign with `key` instead of asking the key source.
    ///
    /// The header is not back-filled from a pinned key.
    pub fn pin_key(&mut self, key: SigningKey) -> &mut Self {
        self.key = Some(key);
        self
    }

    /// Context passed to the key source.
    pub fn pin_context(&mut self, context: C) -> &mut Self {
        self.context = Some(context);
        self
    }

    /// Resolve the key, sign and serialize.
    pub fn build(self) -> Result<Jwt, JwtEncodingError> {
        let JwtBuilder {
            factory,
            mut headers,
            mut claims,
            key,
            context,
        } = self;

        let algorithm = match headers.get_algorithm() {
            Some(alg) => alg,
            None => {
                headers.algorithm(factory.config.default_algorithm);
                factory.config.default_algorithm
            }
        };

        let key = match key {
            Some(key) => {
                debug!(alg = %algorithm, fingerprint = %key.fingerprint(), "Using pinned signing key");
                key
            }
            None => select_signing_key(
                factory.key_source.as_ref(),
                algorithm,
                &mut headers,
                context.as_ref(),
            )?,
        };

        if factory.config.issue_token_id && claims.get_id().is_none() {
            claims.id(Uuid::new_v4().to_string())?;
        }

        let header = headers.build()?;
        let claims = claims.build();
        let wire_header = convert_header(&header)?;
        let payload = convert_claims(&claims);

        let signer = factory
            .signer_cache
            .get_or_create(&key)
            .map_err(JwtEncodingError::SignerConstruction)?;
        if !signer.supports(algorithm) {
            return Err(JwtEncodingError::SignerConstruction(
                SignerError::UnsupportedAlgorithm {
                    key_type: signer.key_type(),
                    algorithm,
                },
            ));
        }

        let input = signing_input(&wire_header, &payload).map_err(JwtEncodingError::Serialization)?;
        let signature = signer
            .sign(algorithm, input.as_bytes())
            .map_err(JwtEncodingError::Signing)?;

        debug!(
            alg = %algorithm,
            kid = ?header.key_id(),
            jti = ?claims.id(),
            "Encoded JWT"
        );

        Ok(Jwt::new(
            format!("{input}.{signature}"),
            claims.issued_at(),
            claims.expires_at(),
            header.headers(),
            claims.claims(),
        ))
    }
}
