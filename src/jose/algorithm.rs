// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! JWS algorithm and key type vocabulary.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

/// JWS signature algorithms supported by the signing backend.
///
/// `RS256` is the default when a caller does not choose one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Default)]
pub enum JwsAlgorithm {
    /// HMAC using SHA-256
    HS256,
    /// HMAC using SHA-384
    HS384,
    /// HMAC using SHA-512
    HS512,
    /// RSASSA-PKCS1-v1_5 using SHA-256
    #[default]
    RS256,
    /// RSASSA-PKCS1-v1_5 using SHA-384
    RS384,
    /// RSASSA-PKCS1-v1_5 using SHA-512
    RS512,
    /// RSASSA-PSS using SHA-256
    PS256,
    /// RSASSA-PSS using SHA-384
    PS384,
    /// RSASSA-PSS using SHA-512
    PS512,
    /// ECDSA using P-256 and SHA-256
    ES256,
    /// ECDSA using P-384 and SHA-384
    ES384,
    /// Edwards-curve signatures (Ed25519)
    EdDSA,
}

impl JwsAlgorithm {
    /// All supported algorithms.
    pub const ALL: [JwsAlgorithm; 12] = [
        JwsAlgorithm::HS256,
        JwsAlgorithm::HS384,
        JwsAlgorithm::HS512,
        JwsAlgorithm::RS256,
        JwsAlgorithm::RS384,
        JwsAlgorithm::RS512,
        JwsAlgorithm::PS256,
        JwsAlgorithm::PS384,
        JwsAlgorithm::PS512,
        JwsAlgorithm::ES256,
        JwsAlgorithm::ES384,
        JwsAlgorithm::EdDSA,
    ];

    /// Wire name used in the `alg` header.
    pub fn name(&self) -> &'static str {
        match self {
            JwsAlgorithm::HS256 => "HS256",
            JwsAlgorithm::HS384 => "HS384",
            JwsAlgorithm::HS512 => "HS512",
            JwsAlgorithm::RS256 => "RS256",
            JwsAlgorithm::RS384 => "RS384",
            JwsAlgorithm::RS512 => "RS512",
            JwsAlgorithm::PS256 => "PS256",
            JwsAlgorithm::PS384 => "PS384",
            JwsAlgorithm::PS512 => "PS512",
            JwsAlgorithm::ES256 => "ES256",
            JwsAlgorithm::ES384 => "ES384",
            JwsAlgorithm::EdDSA => "EdDSA",
        }
    }

    /// Key type an algorithm signs with.
    pub fn key_type(&self) -> KeyType {
        match self {
            JwsAlgorithm::HS256 | JwsAlgorithm::HS384 | JwsAlgorithm::HS512 => KeyType::Oct,
            JwsAlgorithm::RS256
            | JwsAlgorithm::RS384
            | JwsAlgorithm::RS512
            | JwsAlgorithm::PS256
            | JwsAlgorithm::PS384
            | JwsAlgorithm::PS512 => KeyType::Rsa,
            JwsAlgorithm::ES256 | JwsAlgorithm::ES384 => KeyType::Ec,
            JwsAlgorithm::EdDSA => KeyType::Okp,
        }
    }

    /// Curve required by the algorithm, if it is curve-bound.
    pub fn curve(&self) -> Option<Curve> {
        match self {
            JwsAlgorithm::ES256 => Some(Curve::P256),
            JwsAlgorithm::ES384 => Some(Curve::P384),
            JwsAlgorithm::EdDSA => Some(Curve::Ed25519),
            _ => None,
        }
    }

    /// Minimum HMAC secret length in bytes (RFC 7518 §3.2).
    pub fn min_secret_len(&self) -> Option<usize> {
        match self {
            JwsAlgorithm::HS256 => Some(32),
            JwsAlgorithm::HS384 => Some(48),
            JwsAlgorithm::HS512 => Some(64),
            _ => None,
        }
    }
}

impl fmt::Display for JwsAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when an algorithm name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported JWS algorithm: {0}")]
pub struct UnknownAlgorithm(pub String);

impl FromStr for JwsAlgorithm {
    type Err = UnknownAlgorithm;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        JwsAlgorithm::ALL
            .iter()
            .copied()
            .find(|alg| alg.name() == s)
            .ok_or_else(|| UnknownAlgorithm(s.to_string()))
    }
}

impl From<JwsAlgorithm> for jsonwebtoken::Algorithm {
    fn from(alg: JwsAlgorithm) -> Self {
        match alg {
            JwsAlgorithm::HS256 => jsonwebtoken::Algorithm::HS256,
            JwsAlgorithm::HS384 => jsonwebtoken::Algorithm::HS384,
            JwsAlgorithm::HS512 => jsonwebtoken::Algorithm::HS512,
            JwsAlgorithm::RS256 => jsonwebtoken::Algorithm::RS256,
            JwsAlgorithm::RS384 => jsonwebtoken::Algorithm::RS384,
            JwsAlgorithm::RS512 => jsonwebtoken::Algorithm::RS512,
            JwsAlgorithm::PS256 => jsonwebtoken::Algorithm::PS256,
            JwsAlgorithm::PS384 => jsonwebtoken::Algorithm::PS384,
            JwsAlgorithm::PS512 => jsonwebtoken::Algorithm::PS512,
            JwsAlgorithm::ES256 => jsonwebtoken::Algorithm::ES256,
            JwsAlgorithm::ES384 => jsonwebtoken::Algorithm::ES384,
            JwsAlgorithm::EdDSA => jsonwebtoken::Algorithm::EdDSA,
        }
    }
}

/// Key families (`kty`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyType {
    /// RSA
    Rsa,
    /// Elliptic curve (NIST curves)
    Ec,
    /// Octet sequence (symmetric secret)
    Oct,
    /// Octet key pair (Edwards curves)
    Okp,
}

impl KeyType {
    /// `kty` value as it appears in a JWK.
    pub fn as_str(&self) -> &'static str {
        match self {
            KeyType::Rsa => "RSA",
            KeyType::Ec => "EC",
            KeyType::Oct => "oct",
            KeyType::Okp => "OKP",
        }
    }
}

impl fmt::Display for KeyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Curves that bind a key to a single algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Curve {
    /// NIST P-256
    P256,
    /// NIST P-384
    P384,
    /// Ed25519
    Ed25519,
}

impl Curve {
    /// `crv` value as it appears in a JWK.
    pub fn as_str(&self) -> &'static str {
        match self {
            Curve::P256 => "P-256",
            Curve::P384 => "P-384",
            Curve::Ed25519 => "Ed25519",
        }
    }
}

impl fmt::Display for Curve {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_rs256() {
        assert_eq!(JwsAlgorithm::default(), JwsAlgorithm::RS256);
    }

    #[test]
    fn from_str_parses_every_wire_name() {
        for alg in JwsAlgorithm::ALL {
            assert_eq!(alg.name().parse::<JwsAlgorithm>(), Ok(alg));
        }
        assert_eq!(
            "none".parse::<JwsAlgorithm>(),
            Err(UnknownAlgorithm("none".to_string()))
        );
        // Names are case-sensitive on the wire
        assert!("rs256".parse::<JwsAlgorithm>().is_err());
    }

    #[test]
    fn key_type_follows_algorithm_family() {
        assert_eq!(JwsAlgorithm::HS384.key_type(), KeyType::Oct);
        assert_eq!(JwsAlgorithm::PS512.key_type(), KeyType::Rsa);
        assert_eq!(JwsAlgorithm::ES256.key_type(), KeyType::Ec);
        assert_eq!(JwsAlgorithm::EdDSA.key_type(), KeyType::Okp);
    }

    #[test]
    fn curve_bound_algorithms() {
        assert_eq!(JwsAlgorithm::ES256.curve(), Some(Curve::P256));
        assert_eq!(JwsAlgorithm::ES384.curve(), Some(Curve::P384));
        assert_eq!(JwsAlgorithm::EdDSA.curve(), Some(Curve::Ed25519));
        assert_eq!(JwsAlgorithm::RS256.curve(), None);
    }

    #[test]
    fn serializes_as_wire_name() {
        let json = serde_json::to_string(&JwsAlgorithm::EdDSA).unwrap();
        assert_eq!(json, "\"EdDSA\"");
    }

    #[test]
    fn converts_to_jsonwebtoken_algorithm() {
        let alg: jsonwebtoken::Algorithm = JwsAlgorithm::PS384.into();
        assert_eq!(alg, jsonwebtoken::Algorithm::PS384);
    }
}
