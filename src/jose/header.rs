// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! JOSE header model.
//!
//! [`JoseHeaderBuilder`] is a per-token accumulator; [`JoseHeader`] is the
//! immutable snapshot it finalizes into. Registered parameters are typed,
//! everything else lives in an open map of `serde_json::Value`.

use std::collections::BTreeSet;

use serde_json::{Map, Value};

use super::algorithm::JwsAlgorithm;
use super::error::{require_text, FieldError};

/// Registered JOSE header parameter names (RFC 7515 §4.1, RFC 7797).
pub mod names {
    pub const ALG: &str = "alg";
    pub const JKU: &str = "jku";
    pub const JWK: &str = "jwk";
    pub const KID: &str = "kid";
    pub const X5U: &str = "x5u";
    pub const X5C: &str = "x5c";
    pub const X5T: &str = "x5t";
    pub const X5T_S256: &str = "x5t#S256";
    pub const TYP: &str = "typ";
    pub const CTY: &str = "cty";
    pub const CRIT: &str = "crit";
    pub const B64: &str = "b64";
}

/// Parameter names that can never be used as custom header fields.
pub const REGISTERED_HEADER_NAMES: [&str; 12] = [
    names::ALG,
    names::JKU,
    names::JWK,
    names::KID,
    names::X5U,
    names::X5C,
    names::X5T,
    names::X5T_S256,
    names::TYP,
    names::CTY,
    names::CRIT,
    names::B64,
];

/// Default `typ` value.
pub const JWT_TYPE: &str = "JWT";

/// Whether `name` is a registered header parameter.
pub fn is_registered_header(name: &str) -> bool {
    REGISTERED_HEADER_NAMES.contains(&name)
}

/// Optional parameters shared by the accumulator and the snapshot.
#[derive(Debug, Clone, Default, PartialEq)]
struct HeaderParams {
    typ: Option<String>,
    cty: Option<String>,
    kid: Option<String>,
    jku: Option<String>,
    jwk: Option<Map<String, Value>>,
    x5u: Option<String>,
    x5c: Option<Vec<String>>,
    x5t: Option<String>,
    x5t_s256: Option<String>,
    crit: Option<BTreeSet<String>>,
    custom: Map<String, Value>,
}

/// Accumulates header parameters for a single token.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JoseHeaderBuilder {
    algorithm: Option<JwsAlgorithm>,
    params: HeaderParams,
}

impl JoseHeaderBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from the given algorithm.
    pub fn with_algorithm(algorithm: JwsAlgorithm) -> Self {
        let mut builder = Self::new();
        builder.algorithm(algorithm);
        builder
    }

    /// Set `alg`.
    pub fn algorithm(&mut self, algorithm: JwsAlgorithm) -> &mut Self {
        self.algorithm = Some(algorithm);
        self
    }

    /// Set `typ`.
    pub fn typ(&mut self, typ: impl Into<String>) -> Result<&mut Self, FieldError> {
        self.params.typ = Some(require_text(names::TYP, typ.into())?);
        Ok(self)
    }

    /// Set `cty`.
    pub fn content_type(&mut self, cty: impl Into<String>) -> Result<&mut Self, FieldError> {
        self.params.cty = Some(require_text(names::CTY, cty.into())?);
        Ok(self)
    }

    /// Set `kid`.
    pub fn key_id(&mut self, kid: impl Into<String>) -> Result<&mut Self, FieldError> {
        self.params.kid = Some(require_text(names::KID, kid.into())?);
        Ok(self)
    }

    /// Set `jku`.
    ///
    /// The value must be an absolute URI by the time the header is converted
    /// for signing; it is stored as given.
    pub fn jwk_set_url(&mut self, jku: impl Into<String>) -> Result<&mut Self, FieldError> {
        self.params.jku = Some(require_text(names::JKU, jku.into())?);
        Ok(self)
    }

    /// Set `jwk` from its JSON members.
    ///
    /// The members are parsed into a key only when the header is converted
    /// for signing.
    pub fn jwk(&mut self, jwk: Map<String, Value>) -> Result<&mut Self, FieldError> {
        if jwk.is_empty() {
            return Err(FieldError::EmptyValue(names::JWK));
        }
        self.params.jwk = Some(jwk);
        Ok(self)
    }

    /// Set `x5u`. Checked as a URI at conversion, like `jku`.
    pub fn x509_url(&mut self, x5u: impl Into<String>) -> Result<&mut Self, FieldError> {
        self.params.x5u = Some(require_text(names::X5U, x5u.into())?);
        Ok(self)
    }

    /// Set `x5c`, base64 (standard) DER certificates, leaf first.
    pub fn x509_cert_chain<I, S>(&mut self, chain: I) -> Result<&mut Self, FieldError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let chain = chain
            .into_iter()
            .map(|cert| require_text(names::X5C, cert.into()))
            .collect::<Result<Vec<_>, _>>()?;
        if chain.is_empty() {
            return Err(FieldError::EmptyValue(names::X5C));
        }
        self.params.x5c = Some(chain);
        Ok(self)
    }

    /// Set `x5t`, the base64url SHA-1 certificate thumbprint.
    pub fn x509_sha1_thumbprint(&mut self, x5t: impl Into<String>) -> Result<&mut Self, FieldError> {
        self.params.x5t = Some(require_text(names::X5T, x5t.into())?);
        Ok(self)
    }

    /// Set `x5t#S256`, the base64url SHA-256 certificate thumbprint.
    pub fn x509_sha256_thumbprint(
        &mut self,
        x5t_s256: impl Into<String>,
    ) -> Result<&mut Self, FieldError> {
        self.params.x5t_s256 = Some(require_text(names::X5T_S256, x5t_s256.into())?);
        Ok(self)
    }

    /// Add names to `crit`.
    pub fn critical<I, S>(&mut self, crit: I) -> Result<&mut Self, FieldError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let added = crit
            .into_iter()
            .map(|name| require_text(names::CRIT, name.into()))
            .collect::<Result<BTreeSet<_>, _>>()?;
        if added.is_empty() {
            return Err(FieldError::EmptyValue(names::CRIT));
        }
        self.params.crit.get_or_insert_with(BTreeSet::new).extend(added);
        Ok(self)
    }

    /// Set a custom header parameter.
    ///
    /// Registered names are rejected with [`FieldError::InvalidFieldName`].
    pub fn header(
        &mut self,
        name: impl Into<String>,
        value: impl Into<Value>,
    ) -> Result<&mut Self, FieldError> {
        let name = name.into();
        if name.is_empty() {
            return Err(FieldError::EmptyValue("header name"));
        }
        if is_registered_header(&name) {
            return Err(FieldError::InvalidFieldName(name));
        }
        self.params.custom.insert(name, value.into());
        Ok(self)
    }

    /// Remove a custom header parameter.
    pub fn remove_header(&mut self, name: &str) -> Option<Value> {
        self.params.custom.remove(name)
    }

    pub fn get_algorithm(&self) -> Option<JwsAlgorithm> {
        self.algorithm
    }

    pub fn get_key_id(&self) -> Option<&str> {
        self.params.kid.as_deref()
    }

    pub fn get_x509_sha256_thumbprint(&self) -> Option<&str> {
        self.params.x5t_s256.as_deref()
    }

    pub fn get_header(&self, name: &str) -> Option<&Value> {
        self.params.custom.get(name)
    }

    /// Finalize into an immutable snapshot. `alg` is required.
    pub fn build(self) -> Result<JoseHeader, FieldError> {
        let algorithm = self.algorithm.ok_or(FieldError::MissingAlgorithm)?;
        Ok(JoseHeader {
            algorithm,
            params: self.params,
        })
    }
}

/// Finalized JOSE header.
#[derive(Debug, Clone, PartialEq)]
pub struct JoseHeader {
    algorithm: JwsAlgorithm,
    params: HeaderParams,
}

impl JoseHeader {
    pub fn builder() -> JoseHeaderBuilder {
        JoseHeaderBuilder::new()
    }

    /// Reopen this snapshot as an independent accumulator.
    pub fn to_builder(&self) -> JoseHeaderBuilder {
        JoseHeaderBuilder {
            algorithm: Some(self.algorithm),
            params: self.params.clone(),
        }
    }

    pub fn algorithm(&self) -> JwsAlgorithm {
        self.algorithm
    }

    pub fn typ(&self) -> Option<&str> {
        self.params.typ.as_deref()
    }

    pub fn content_type(&self) -> Option<&str> {
        self.params.cty.as_deref()
    }

    pub fn key_id(&self) -> Option<&str> {
        self.params.kid.as_deref()
    }

    pub fn jwk_set_url(&self) -> Option<&str> {
        self.params.jku.as_deref()
    }

    pub fn jwk(&self) -> Option<&Map<String, Value>> {
        self.params.jwk.as_ref()
    }

    pub fn x509_url(&self) -> Option<&str> {
        self.params.x5u.as_deref()
    }

    pub fn x509_cert_chain(&self) -> Option<&[String]> {
        self.params.x5c.as_deref()
    }

    pub fn x509_sha1_thumbprint(&self) -> Option<&str> {
        self.params.x5t.as_deref()
    }

    pub fn x509_sha256_thumbprint(&self) -> Option<&str> {
        self.params.x5t_s256.as_deref()
    }

    pub fn critical(&self) -> Option<&BTreeSet<String>> {
        self.params.crit.as_ref()
    }

    /// Custom (unregistered) parameters only.
    pub fn custom_headers(&self) -> &Map<String, Value> {
        &self.params.custom
    }

    /// Every parameter, registered and custom, keyed by wire name.
    pub fn headers(&self) -> Map<String, Value> {
        let p = &self.params;
        let mut map = Map::new();
        map.insert(names::ALG.into(), Value::from(self.algorithm.name()));
        insert_str(&mut map, names::TYP, &p.typ);
        insert_str(&mut map, names::CTY, &p.cty);
        insert_str(&mut map, names::KID, &p.kid);
        insert_str(&mut map, names::JKU, &p.jku);
        if let Some(jwk) = &p.jwk {
            map.insert(names::JWK.into(), Value::Object(jwk.clone()));
        }
        insert_str(&mut map, names::X5U, &p.x5u);
        if let Some(x5c) = &p.x5c {
            map.insert(names::X5C.into(), Value::from(x5c.clone()));
        }
        insert_str(&mut map, names::X5T, &p.x5t);
        insert_str(&mut map, names::X5T_S256, &p.x5t_s256);
        if let Some(crit) = &p.crit {
            map.insert(
                names::CRIT.into(),
                Value::from(crit.iter().cloned().collect::<Vec<_>>()),
            );
        }
        for (name, value) in &p.custom {
            map.insert(name.clone(), value.clone());
        }
        map
    }
}

fn insert_str(map: &mut Map<String, Value>, name: &str, value: &Option<String>) {
    if let Some(value) = value {
        map.insert(name.to_string(), Value::from(value.as_str()));
    }
}
