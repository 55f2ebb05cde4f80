// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Key selection filter.

use crate::jose::{Curve, JoseHeaderBuilder, JwsAlgorithm, KeyType};

use super::key::{KeyUse, SigningKey};

/// Criteria a signing key must satisfy for a given header.
///
/// A key matches when:
/// - its type (and curve, for curve-bound algorithms) fits the algorithm
/// - it is not restricted to a different algorithm
/// - it is not an encryption-only key
/// - its `kid` / `x5t#S256` equal the header's, when the header sets them
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyMatcher {
    algorithm: JwsAlgorithm,
    key_id: Option<String>,
    x509_sha256_thumbprint: Option<String>,
}

impl KeyMatcher {
    pub fn for_algorithm(algorithm: JwsAlgorithm) -> Self {
        Self {
            algorithm,
            key_id: None,
            x509_sha256_thumbprint: None,
        }
    }

    /// Matcher for the header as accumulated so far.
    pub fn for_header(algorithm: JwsAlgorithm, header: &JoseHeaderBuilder) -> Self {
        Self {
            algorithm,
            key_id: header.get_key_id().map(str::to_string),
            x509_sha256_thumbprint: header.get_x509_sha256_thumbprint().map(str::to_string),
        }
    }

    pub fn with_key_id(mut self, kid: impl Into<String>) -> Self {
        self.key_id = Some(kid.into());
        self
    }

    pub fn with_x509_sha256_thumbprint(mut self, thumbprint: impl Into<String>) -> Self {
        self.x509_sha256_thumbprint = Some(thumbprint.into());
        self
    }

    pub fn algorithm(&self) -> JwsAlgorithm {
        self.algorithm
    }

    pub fn key_type(&self) -> KeyType {
        self.algorithm.key_type()
    }

    pub fn curve(&self) -> Option<Curve> {
        self.algorithm.curve()
    }

    pub fn key_id(&self) -> Option<&str> {
        self.key_id.as_deref()
    }

    pub fn x509_sha256_thumbprint(&self) -> Option<&str> {
        self.x509_sha256_thumbprint.as_deref()
    }

    pub fn matches(&self, key: &SigningKey) -> bool {
        if !key.supports(self.algorithm) {
            return false;
        }
        if key.algorithm().is_some_and(|alg| alg != self.algorithm) {
            return false;
        }
        if key.key_use() == Some(KeyUse::Encryption) {
            return false;
        }
        if let Some(kid) = &self.key_id {
            if key.key_id() != Some(kid.as_str()) {
                return false;
            }
        }
        if let Some(thumbprint) = &self.x509_sha256_thumbprint {
            if key.x509_sha256_thumbprint() != Some(thumbprint.as_str()) {
                return false;
            }
        }
        true
    }

    /// Keys from `keys` that match, in their original order.
    pub fn select<'a, I>(&self, keys: I) -> Vec<SigningKey>
    where
        I: IntoIterator<Item = &'a SigningKey>,
    {
        keys.into_iter().filter(|k| self.matches(k)).cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secret(n: u8) -> SigningKey {
        SigningKey::hmac_secret([n; 32])
    }

    #[test]
    fn filters_by_key_type() {
        let matcher = KeyMatcher::for_algorithm(JwsAlgorithm::HS256);
        assert!(matcher.matches(&secret(1)));
        assert!(!matcher.matches(&SigningKey::rsa_pem(b"pem")));
    }

    #[test]
    fn respects_key_algorithm_restriction() {
        let matcher = KeyMatcher::for_algorithm(JwsAlgorithm::HS256);
        assert!(matcher.matches(&secret(1).with_algorithm(JwsAlgorithm::HS256)));
        assert!(!matcher.matches(&secret(1).with_algorithm(JwsAlgorithm::HS512)));
    }

    #[test]
    fn excludes_encryption_keys() {
        let matcher = KeyMatcher::for_algorithm(JwsAlgorithm::HS256);
        assert!(matcher.matches(&secret(1).with_key_use(KeyUse::Signature)));
        assert!(!matcher.matches(&secret(1).with_key_use(KeyUse::Encryption)));
    }

    #[test]
    fn header_key_id_narrows_selection() {
        let mut header = JoseHeaderBuilder::with_algorithm(JwsAlgorithm::HS256);
        header.key_id("k2").unwrap();
        let matcher = KeyMatcher::for_header(JwsAlgorithm::HS256, &header);

        let keys = [
            secret(1).with_key_id("k1"),
            secret(2).with_key_id("k2"),
            secret(3),
        ];
        let selected = matcher.select(&keys);
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].key_id(), Some("k2"));
    }

    #[test]
    fn thumbprint_narrows_selection() {
        let matcher =
            KeyMatcher::for_algorithm(JwsAlgorithm::HS256).with_x509_sha256_thumbprint("t1");
        assert!(matcher.matches(&secret(1).with_x509_sha256_thumbprint("t1")));
        assert!(!matcher.matches(&secret(1).with_x509_sha256_thumbprint("t2")));
        assert!(!matcher.matches(&secret(1)));
    }
}
