// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Shared helpers for unit tests: generated key pairs and signature checks.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::OnceLock;

use jsonwebtoken::DecodingKey;
use rsa::pkcs1::{EncodeRsaPrivateKey, EncodeRsaPublicKey, LineEnding};
use rsa::rand_core::OsRng;

use crate::jose::JwsAlgorithm;
use crate::keys::SigningKey;
use crate::signing::{DefaultSignerFactory, JwsSigner, SignerError, SignerFactory};

/// PEM encoded key pair.
pub struct PemKeyPair {
    pub private_pem: String,
    pub public_pem: String,
    /// PKCS#1 DER for RSA, PKCS#8 DER for EC.
    pub private_der: Vec<u8>,
    ec: bool,
}

impl PemKeyPair {
    pub fn decoding_key(&self) -> DecodingKey {
        let pem = self.public_pem.as_bytes();
        if self.ec {
            DecodingKey::from_ec_pem(pem).expect("EC public key PEM")
        } else {
            DecodingKey::from_rsa_pem(pem).expect("RSA public key PEM")
        }
    }
}

fn generate_rsa() -> PemKeyPair {
    let private_key =
        rsa::RsaPrivateKey::new(&mut OsRng, 2048).expect("Failed to generate RSA private key");
    let public_key = rsa::RsaPublicKey::from(&private_key);
    PemKeyPair {
        private_pem: private_key
            .to_pkcs1_pem(LineEnding::LF)
            .expect("Failed to encode RSA private key")
            .to_string(),
        public_pem: public_key
            .to_pkcs1_pem(LineEnding::LF)
            .expect("Failed to encode RSA public key"),
        private_der: private_key
            .to_pkcs1_der()
            .expect("Failed to encode RSA private key")
            .as_bytes()
            .to_vec(),
        ec: false,
    }
}

/// RSA 2048 key pair, generated once per test binary.
pub fn rsa_key_pair() -> &'static PemKeyPair {
    static PAIR: OnceLock<PemKeyPair> = OnceLock::new();
    PAIR.get_or_init(generate_rsa)
}

/// A second, distinct RSA key pair.
pub fn other_rsa_key_pair() -> &'static PemKeyPair {
    static PAIR: OnceLock<PemKeyPair> = OnceLock::new();
    PAIR.get_or_init(generate_rsa)
}

/// P-256 key pair (PKCS#8 private, SPKI public).
pub fn p256_key_pair() -> &'static PemKeyPair {
    use p256::pkcs8::{EncodePrivateKey, EncodePublicKey};

    static PAIR: OnceLock<PemKeyPair> = OnceLock::new();
    PAIR.get_or_init(|| {
        let secret = p256::SecretKey::random(&mut OsRng);
        PemKeyPair {
            private_pem: secret
                .to_pkcs8_pem(p256::pkcs8::LineEnding::LF)
                .expect("Failed to encode P-256 private key")
                .to_string(),
            public_pem: secret
                .public_key()
                .to_public_key_pem(p256::pkcs8::LineEnding::LF)
                .expect("Failed to encode P-256 public key"),
            private_der: secret
                .to_pkcs8_der()
                .expect("Failed to encode P-256 private key")
                .as_bytes()
                .to_vec(),
            ec: true,
        }
    })
}

/// Check a detached base64url signature over `message`.
pub fn verify_signature(
    signature: &str,
    message: &[u8],
    key: &DecodingKey,
    algorithm: JwsAlgorithm,
) -> bool {
    jsonwebtoken::crypto::verify(signature, message, key, algorithm.into()).unwrap_or(false)
}

/// Decode one base64url token segment into JSON.
pub fn decode_segment(segment: &str) -> serde_json::Value {
    use base64::Engine;

    let bytes = base64::engine::general_purpose::URL_SAFE_NO_PAD
        .decode(segment)
        .expect("segment is base64url");
    serde_json::from_slice(&bytes).expect("segment is JSON")
}

/// Counts signer constructions; fails the first `fail_first` attempts.
pub struct CountingFactory {
    created: AtomicUsize,
    fail_first: AtomicUsize,
}

impl CountingFactory {
    pub fn new() -> Self {
        Self::failing(0)
    }

    pub fn failing(attempts: usize) -> Self {
        Self {
            created: AtomicUsize::new(0),
            fail_first: AtomicUsize::new(attempts),
        }
    }

    pub fn created(&self) -> usize {
        self.created.load(Ordering::SeqCst)
    }
}

impl SignerFactory for CountingFactory {
    fn create_signer(&self, key: &SigningKey) -> Result<JwsSigner, SignerError> {
        let remaining = self.fail_first.load(Ordering::SeqCst);
        if remaining > 0 {
            self.fail_first.store(remaining - 1, Ordering::SeqCst);
            return Err(SignerError::SecretTooShort { min: 32, actual: 0 });
        }
        self.created.fetch_add(1, Ordering::SeqCst);
        DefaultSignerFactory.create_signer(key)
    }
}
