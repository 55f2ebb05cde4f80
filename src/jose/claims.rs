// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! JWT claims set model.

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

use super::error::{require_text, require_uri, FieldError};

/// Registered claim names (RFC 7519 §4.1).
pub mod names {
    pub const ISS: &str = "iss";
    pub const SUB: &str = "sub";
    pub const AUD: &str = "aud";
    pub const EXP: &str = "exp";
    pub const NBF: &str = "nbf";
    pub const IAT: &str = "iat";
    pub const JTI: &str = "jti";
}

/// Claim names that can never be used as custom claims.
pub const REGISTERED_CLAIM_NAMES: [&str; 7] = [
    names::ISS,
    names::SUB,
    names::AUD,
    names::EXP,
    names::NBF,
    names::IAT,
    names::JTI,
];

/// Whether `name` is a registered claim.
pub fn is_registered_claim(name: &str) -> bool {
    REGISTERED_CLAIM_NAMES.contains(&name)
}

/// NumericDate: whole seconds since the Unix epoch.
pub fn numeric_date(instant: &DateTime<Utc>) -> i64 {
    instant.timestamp()
}

#[derive(Debug, Clone, Default, PartialEq)]
struct ClaimParams {
    iss: Option<String>,
    sub: Option<String>,
    aud: Option<Vec<String>>,
    iat: Option<DateTime<Utc>>,
    exp: Option<DateTime<Utc>>,
    nbf: Option<DateTime<Utc>>,
    jti: Option<String>,
    custom: Map<String, Value>,
}

/// Accumulates claims for a single token.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JwtClaimsSetBuilder {
    params: ClaimParams,
}

impl JwtClaimsSetBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `iss`.
    ///
    /// Any non-empty string is accepted; a value containing `:` is treated as
    /// a URI and must parse as one.
    pub fn issuer(&mut self, iss: impl Into<String>) -> Result<&mut Self, FieldError> {
        let iss = require_text(names::ISS, iss.into())?;
        let iss = if iss.contains(':') {
            require_uri(names::ISS, iss)?
        } else {
            iss
        };
        self.params.iss = Some(iss);
        Ok(self)
    }

    /// Set `sub`.
    pub fn subject(&mut self, sub: impl Into<String>) -> Result<&mut Self, FieldError> {
        self.params.sub = Some(require_text(names::SUB, sub.into())?);
        Ok(self)
    }

    /// Set `aud`. Order is preserved.
    pub fn audience<I, S>(&mut self, aud: I) -> Result<&mut Self, FieldError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let aud = aud
            .into_iter()
            .map(|a| require_text(names::AUD, a.into()))
            .collect::<Result<Vec<_>, _>>()?;
        if aud.is_empty() {
            return Err(FieldError::EmptyValue(names::AUD));
        }
        self.params.aud = Some(aud);
        Ok(self)
    }

    /// Set `iat`.
    pub fn issued_at(&mut self, iat: DateTime<Utc>) -> &mut Self {
        self.params.iat = Some(iat);
        self
    }

    /// Set `exp`.
    pub fn expires_at(&mut self, exp: DateTime<Utc>) -> &mut Self {
        self.params.exp = Some(exp);
        self
    }

    /// Set `nbf`.
    pub fn not_before(&mut self, nbf: DateTime<Utc>) -> &mut Self {
        self.params.nbf = Some(nbf);
        self
    }

    /// Set `jti`.
    pub fn id(&mut self, jti: impl Into<String>) -> Result<&mut Self, FieldError> {
        self.params.jti = Some(require_text(names::JTI, jti.into())?);
        Ok(self)
    }

    /// Set a custom claim.
    ///
    /// Registered names are rejected with [`FieldError::InvalidFieldName`].
    pub fn claim(
        &mut self,
        name: impl Into<String>,
        value: impl Into<Value>,
    ) -> Result<&mut Self, FieldError> {
        let name = name.into();
        if name.is_empty() {
            return Err(FieldError::EmptyValue("claim name"));
        }
        if is_registered_claim(&name) {
            return Err(FieldError::InvalidFieldName(name));
        }
        self.params.custom.insert(name, value.into());
        Ok(self)
    }

    /// Remove a custom claim.
    pub fn remove_claim(&mut self, name: &str) -> Option<Value> {
        self.params.custom.remove(name)
    }

    pub fn get_id(&self) -> Option<&str> {
        self.params.jti.as_deref()
    }

    pub fn get_claim(&self, name: &str) -> Option<&Value> {
        self.params.custom.get(name)
    }

    /// Finalize into an immutable snapshot.
    pub fn build(self) -> JwtClaimsSet {
        JwtClaimsSet {
            params: self.params,
        }
    }
}

/// Finalized JWT claims set.
#[derive(Debug, Clone, PartialEq)]
pub struct JwtClaimsSet {
    params: ClaimParams,
}

impl JwtClaimsSet {
    pub fn builder() -> JwtClaimsSetBuilder {
        JwtClaimsSetBuilder::new()
    }

    /// Reopen this snapshot as an independent accumulator.
    pub fn to_builder(&self) -> JwtClaimsSetBuilder {
        JwtClaimsSetBuilder {
            params: self.params.clone(),
        }
    }

    pub fn issuer(&self) -> Option<&str> {
        self.params.iss.as_deref()
    }

    pub fn subject(&self) -> Option<&str> {
        self.params.sub.as_deref()
    }

    pub fn audience(&self) -> Option<&[String]> {
        self.params.aud.as_deref()
    }

    pub fn issued_at(&self) -> Option<DateTime<Utc>> {
        self.params.iat
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.params.exp
    }

    pub fn not_before(&self) -> Option<DateTime<Utc>> {
        self.params.nbf
    }

    pub fn id(&self) -> Option<&str> {
        self.params.jti.as_deref()
    }

    /// Custom (unregistered) claims only.
    pub fn custom_claims(&self) -> &Map<String, Value> {
        &self.params.custom
    }

    /// Every claim, registered and custom. Instants are NumericDates.
    pub fn claims(&self) -> Map<String, Value> {
        let p = &self.params;
        let mut map = Map::new();
        if let Some(iss) = &p.iss {
            map.insert(names::ISS.into(), Value::from(iss.as_str()));
        }
        if let Some(sub) = &p.sub {
            map.insert(names::SUB.into(), Value::from(sub.as_str()));
        }
        if let Some(aud) = &p.aud {
            map.insert(names::AUD.into(), Value::from(aud.clone()));
        }
        for (name, instant) in [(names::IAT, &p.iat), (names::EXP, &p.exp), (names::NBF, &p.nbf)] {
            if let Some(instant) = instant {
                map.insert(name.into(), Value::from(numeric_date(instant)));
            }
        }
        if let Some(jti) = &p.jti {
            map.insert(names::JTI.into(), Value::from(jti.as_str()));
        }
        for (name, value) in &p.custom {
            map.insert(name.clone(), value.clone());
        }
        map
    }
}
