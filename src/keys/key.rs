// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Signing key material.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use sha2::{Digest, Sha256};

use crate::jose::{Curve, JwsAlgorithm, KeyType};

/// How the private key bytes are encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyEncoding {
    /// PEM text (PKCS#1 or PKCS#8)
    Pem,
    /// DER bytes
    Der,
    /// Raw symmetric secret
    Secret,
}

/// Intended use of a key (`use` JWK parameter).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyUse {
    Signature,
    Encryption,
}

/// SHA-256 digest of a key's material; identifies the key.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct KeyFingerprint([u8; 32]);

impl KeyFingerprint {
    fn of(material: &[u8]) -> Self {
        Self(Sha256::digest(material).into())
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Debug for KeyFingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "KeyFingerprint({self})")
    }
}

impl fmt::Display for KeyFingerprint {
    // Short hex prefix, enough to tell keys apart in logs
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0[..8] {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

/// A private key that can be turned into a signer.
///
/// Equality and hashing consider the key material only, so two handles to
/// the same material with different metadata are the same key. Cloning is
/// cheap: the material is shared.
#[derive(Clone)]
pub struct SigningKey {
    key_type: KeyType,
    curve: Option<Curve>,
    encoding: KeyEncoding,
    material: Arc<[u8]>,
    fingerprint: KeyFingerprint,
    key_id: Option<String>,
    x509_sha256_thumbprint: Option<String>,
    algorithm: Option<JwsAlgorithm>,
    key_use: Option<KeyUse>,
}

impl SigningKey {
    fn new(key_type: KeyType, curve: Option<Curve>, encoding: KeyEncoding, material: &[u8]) -> Self {
        Self {
            key_type,
            curve,
            encoding,
            material: Arc::from(material),
            fingerprint: KeyFingerprint::of(material),
            key_id: None,
            x509_sha256_thumbprint: None,
            algorithm: None,
            key_use: None,
        }
    }

    /// RSA private key in PEM form.
    pub fn rsa_pem(pem: impl AsRef<[u8]>) -> Self {
        Self::new(KeyType::Rsa, None, KeyEncoding::Pem, pem.as_ref())
    }

    /// RSA private key, PKCS#1 DER.
    pub fn rsa_der(der: impl AsRef<[u8]>) -> Self {
        Self::new(KeyType::Rsa, None, KeyEncoding::Der, der.as_ref())
    }

    /// EC private key (PKCS#8 PEM) on a NIST curve.
    pub fn ec_pem(curve: Curve, pem: impl AsRef<[u8]>) -> Self {
        Self::new(KeyType::Ec, Some(curve), KeyEncoding::Pem, pem.as_ref())
    }

    /// EC private key (PKCS#8 DER) on a NIST curve.
    pub fn ec_der(curve: Curve, der: impl AsRef<[u8]>) -> Self {
        Self::new(KeyType::Ec, Some(curve), KeyEncoding::Der, der.as_ref())
    }

    /// Ed25519 private key in PEM form.
    pub fn ed25519_pem(pem: impl AsRef<[u8]>) -> Self {
        Self::new(KeyType::Okp, Some(Curve::Ed25519), KeyEncoding::Pem, pem.as_ref())
    }

    /// Ed25519 private key, PKCS#8 DER.
    pub fn ed25519_der(der: impl AsRef<[u8]>) -> Self {
        Self::new(KeyType::Okp, Some(Curve::Ed25519), KeyEncoding::Der, der.as_ref())
    }

    /// Shared HMAC secret.
    pub fn hmac_secret(secret: impl AsRef<[u8]>) -> Self {
        Self::new(KeyType::Oct, None, KeyEncoding::Secret, secret.as_ref())
    }

    pub fn with_key_id(mut self, kid: impl Into<String>) -> Self {
        self.key_id = Some(kid.into());
        self
    }

    pub fn with_x509_sha256_thumbprint(mut self, thumbprint: impl Into<String>) -> Self {
        self.x509_sha256_thumbprint = Some(thumbprint.into());
        self
    }

    /// Restrict the key to a single algorithm.
    pub fn with_algorithm(mut self, algorithm: JwsAlgorithm) -> Self {
        self.algorithm = Some(algorithm);
        self
    }

    pub fn with_key_use(mut self, key_use: KeyUse) -> Self {
        self.key_use = Some(key_use);
        self
    }

    pub fn key_type(&self) -> KeyType {
        self.key_type
    }

    pub fn curve(&self) -> Option<Curve> {
        self.curve
    }

    pub fn encoding(&self) -> KeyEncoding {
        self.encoding
    }

    pub fn material(&self) -> &[u8] {
        &self.material
    }

    pub fn fingerprint(&self) -> KeyFingerprint {
        self.fingerprint
    }

    pub fn key_id(&self) -> Option<&str> {
        self.key_id.as_deref()
    }

    pub fn x509_sha256_thumbprint(&self) -> Option<&str> {
        self.x509_sha256_thumbprint.as_deref()
    }

    pub fn algorithm(&self) -> Option<JwsAlgorithm> {
        self.algorithm
    }

    pub fn key_use(&self) -> Option<KeyUse> {
        self.key_use
    }

    /// Whether this key's type and curve fit `algorithm`.
    pub fn supports(&self, algorithm: JwsAlgorithm) -> bool {
        self.key_type == algorithm.key_type()
            && (algorithm.curve().is_none() || self.curve == algorithm.curve())
    }
}

impl PartialEq for SigningKey {
    fn eq(&self, other: &Self) -> bool {
        self.fingerprint == other.fingerprint
    }
}

impl Eq for SigningKey {}

impl Hash for SigningKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.fingerprint.hash(state);
    }
}

impl fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SigningKey")
            .field("key_type", &self.key_type)
            .field("curve", &self.curve)
            .field("encoding", &self.encoding)
            .field("fingerprint", &self.fingerprint)
            .field("key_id", &self.key_id)
            .field("algorithm", &self.algorithm)
            .finish_non_exhaustive()
    }
}
