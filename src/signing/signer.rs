// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! JWS signers.
//!
//! A [`JwsSigner`] holds a prepared `jsonwebtoken::EncodingKey` for one
//! [`SigningKey`]. Preparing the key (PEM/DER parsing) is the expensive part,
//! which is why signers are cached per key.

use std::fmt;

use jsonwebtoken::EncodingKey;

use crate::jose::{Curve, JwsAlgorithm, KeyType};
use crate::keys::{KeyEncoding, KeyFingerprint, SigningKey};

/// Minimum HMAC secret length accepted at construction (256 bits).
pub const MIN_HMAC_SECRET_LEN: usize = 32;

/// Signer construction or signing failed.
#[derive(Debug, thiserror::Error)]
pub enum SignerError {
    #[error("invalid {key_type} key material: {source}")]
    InvalidKey {
        key_type: KeyType,
        #[source]
        source: jsonwebtoken::errors::Error,
    },

    #[error("HMAC secret must be at least {min} bytes, got {actual}")]
    SecretTooShort { min: usize, actual: usize },

    #[error("{key_type} keys cannot be encoded as {encoding:?}")]
    UnsupportedEncoding {
        key_type: KeyType,
        encoding: KeyEncoding,
    },

    #[error("{key_type} key cannot sign with '{algorithm}'")]
    UnsupportedAlgorithm {
        key_type: KeyType,
        algorithm: JwsAlgorithm,
    },

    #[error("signature computation failed: {0}")]
    Crypto(#[source] jsonwebtoken::errors::Error),
}

/// Signer bound to a single key.
pub struct JwsSigner {
    encoding_key: EncodingKey,
    key_type: KeyType,
    curve: Option<Curve>,
    secret_len: Option<usize>,
    fingerprint: KeyFingerprint,
}

impl JwsSigner {
    pub fn key_type(&self) -> KeyType {
        self.key_type
    }

    pub fn fingerprint(&self) -> KeyFingerprint {
        self.fingerprint
    }

    /// Whether this signer can produce `algorithm` signatures.
    pub fn supports(&self, algorithm: JwsAlgorithm) -> bool {
        if self.key_type != algorithm.key_type() {
            return false;
        }
        if algorithm.curve().is_some() && self.curve != algorithm.curve() {
            return false;
        }
        match (algorithm.min_secret_len(), self.secret_len) {
            (Some(min), Some(len)) => len >= min,
            _ => true,
        }
    }

    /// Sign `signing_input`, returning the base64url signature.
    pub fn sign(&self, algorithm: JwsAlgorithm, signing_input: &[u8]) -> Result<String, SignerError> {
        if !self.supports(algorithm) {
            return Err(SignerError::UnsupportedAlgorithm {
                key_type: self.key_type,
                algorithm,
            });
        }
        jsonwebtoken::crypto::sign(signing_input, &self.encoding_key, algorithm.into())
            .map_err(SignerError::Crypto)
    }
}

impl fmt::Debug for JwsSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwsSigner")
            .field("key_type", &self.key_type)
            .field("curve", &self.curve)
            .field("fingerprint", &self.fingerprint)
            .finish_non_exhaustive()
    }
}

fn der_check_algorithm(key_type: KeyType, curve: Option<Curve>) -> JwsAlgorithm {
    match (key_type, curve) {
        (KeyType::Ec, Some(Curve::P384)) => JwsAlgorithm::ES384,
        (KeyType::Ec, _) => JwsAlgorithm::ES256,
        (KeyType::Okp, _) => JwsAlgorithm::EdDSA,
        _ => JwsAlgorithm::RS256,
    }
}

/// Builds signers from keys.
pub trait SignerFactory: Send + Sync {
    fn create_signer(&self, key: &SigningKey) -> Result<JwsSigner, SignerError>;
}

/// Signer factory backed by `jsonwebtoken`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultSignerFactory;

impl SignerFactory for DefaultSignerFactory {
    fn create_signer(&self, key: &SigningKey) -> Result<JwsSigner, SignerError> {
        let material = key.material();
        let invalid = |source| SignerError::InvalidKey {
            key_type: key.key_type(),
            source,
        };

        let encoding_key = match (key.key_type(), key.encoding()) {
            (KeyType::Rsa, KeyEncoding::Pem) => EncodingKey::from_rsa_pem(material).map_err(invalid)?,
            (KeyType::Rsa, KeyEncoding::Der) => EncodingKey::from_rsa_der(material),
            (KeyType::Ec, KeyEncoding::Pem) => EncodingKey::from_ec_pem(material).map_err(invalid)?,
            (KeyType::Ec, KeyEncoding::Der) => EncodingKey::from_ec_der(material),
            (KeyType::Okp, KeyEncoding::Pem) => EncodingKey::from_ed_pem(material).map_err(invalid)?,
            (KeyType::Okp, KeyEncoding::Der) => EncodingKey::from_ed_der(material),
            (KeyType::Oct, KeyEncoding::Secret) => {
                if material.len() < MIN_HMAC_SECRET_LEN {
                    return Err(SignerError::SecretTooShort {
                        min: MIN_HMAC_SECRET_LEN,
                        actual: material.len(),
                    });
                }
                EncodingKey::from_secret(material)
            }
            (key_type, encoding) => {
                return Err(SignerError::UnsupportedEncoding { key_type, encoding });
            }
        };

        // DER keys are only parsed when signing.
        if key.encoding() == KeyEncoding::Der {
            let algorithm = der_check_algorithm(key.key_type(), key.curve());
            jsonwebtoken::crypto::sign(b"", &encoding_key, algorithm.into()).map_err(invalid)?;
        }

        Ok(JwsSigner {
            encoding_key,
            key_type: key.key_type(),
            curve: key.curve(),
            secret_len: (key.key_type() == KeyType::Oct).then_some(material.len()),
            fingerprint: key.fingerprint(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{p256_key_pair, rsa_key_pair, verify_signature};

    const SECRET: &[u8] = b"0123456789abcdef0123456789abcdef0123456789abcdef0123456789abcdef";

    #[test]
    fn hmac_signer_signs_and_verifies() {
        let key = SigningKey::hmac_secret(SECRET);
        let signer = DefaultSignerFactory.create_signer(&key).unwrap();

        let input = b"eyJhbGciOiJIUzI1NiJ9.eyJzdWIiOiJ1c2VyIn0";
        let signature = signer.sign(JwsAlgorithm::HS256, input).unwrap();
        assert!(verify_signature(
            &signature,
            input,
            &jsonwebtoken::DecodingKey::from_secret(SECRET),
            JwsAlgorithm::HS256,
        ));
    }

    #[test]
    fn short_hmac_secret_fails_construction() {
        let key = SigningKey::hmac_secret(b"too-short");
        let err = DefaultSignerFactory.create_signer(&key).unwrap_err();
        assert!(matches!(err, SignerError::SecretTooShort { min: 32, actual: 9 }));
    }

    #[test]
    fn hs512_needs_a_longer_secret_than_hs256() {
        let key = SigningKey::hmac_secret(&SECRET[..32]);
        let signer = DefaultSignerFactory.create_signer(&key).unwrap();
        assert!(signer.supports(JwsAlgorithm::HS256));
        assert!(!signer.supports(JwsAlgorithm::HS512));
        assert!(matches!(
            signer.sign(JwsAlgorithm::HS512, b"input").unwrap_err(),
            SignerError::UnsupportedAlgorithm { .. }
        ));
    }

    #[test]
    fn malformed_pem_fails_construction() {
        let key = SigningKey::rsa_pem(b"-----BEGIN NOTHING-----");
        let err = DefaultSignerFactory.create_signer(&key).unwrap_err();
        assert!(matches!(err, SignerError::InvalidKey { key_type: KeyType::Rsa, .. }));
    }

    #[test]
    fn malformed_der_fails_construction() {
        let err = DefaultSignerFactory
            .create_signer(&SigningKey::rsa_der(b"not a der key"))
            .unwrap_err();
        assert!(matches!(err, SignerError::InvalidKey { key_type: KeyType::Rsa, .. }));

        let err = DefaultSignerFactory
            .create_signer(&SigningKey::ec_der(Curve::P256, [0u8; 16]))
            .unwrap_err();
        assert!(matches!(err, SignerError::InvalidKey { key_type: KeyType::Ec, .. }));
    }

    #[test]
    fn der_keys_sign_and_verify() {
        let rsa = rsa_key_pair();
        let signer = DefaultSignerFactory
            .create_signer(&SigningKey::rsa_der(&rsa.private_der))
            .unwrap();
        let signature = signer.sign(JwsAlgorithm::RS256, b"header.payload").unwrap();
        assert!(verify_signature(
            &signature,
            b"header.payload",
            &rsa.decoding_key(),
            JwsAlgorithm::RS256,
        ));

        let ec = p256_key_pair();
        let signer = DefaultSignerFactory
            .create_signer(&SigningKey::ec_der(Curve::P256, &ec.private_der))
            .unwrap();
        let signature = signer.sign(JwsAlgorithm::ES256, b"header.payload").unwrap();
        assert!(verify_signature(
            &signature,
            b"header.payload",
            &ec.decoding_key(),
            JwsAlgorithm::ES256,
        ));
    }

    #[test]
    fn rsa_signer_rejects_other_families() {
        let pair = rsa_key_pair();
        let signer = DefaultSignerFactory
            .create_signer(&SigningKey::rsa_pem(&pair.private_pem))
            .unwrap();
        assert!(signer.supports(JwsAlgorithm::RS256));
        assert!(signer.supports(JwsAlgorithm::PS512));
        let err = signer.sign(JwsAlgorithm::ES256, b"input").unwrap_err();
        assert!(matches!(
            err,
            SignerError::UnsupportedAlgorithm {
                key_type: KeyType::Rsa,
                algorithm: JwsAlgorithm::ES256
            }
        ));
    }

    #[test]
    fn rsa_signer_signs_and_verifies() {
        let pair = rsa_key_pair();
        let signer = DefaultSignerFactory
            .create_signer(&SigningKey::rsa_pem(&pair.private_pem))
            .unwrap();

        let input = b"header.payload";
        let signature = signer.sign(JwsAlgorithm::RS256, input).unwrap();
        assert!(verify_signature(
            &signature,
            input,
            &pair.decoding_key(),
            JwsAlgorithm::RS256,
        ));
    }
}
