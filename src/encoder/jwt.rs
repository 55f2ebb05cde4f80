// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

/// A signed JWT.
#[derive(Debug, Clone, PartialEq)]
pub struct Jwt {
    token_value: String,
    issued_at: Option<DateTime<Utc>>,
    expires_at: Option<DateTime<Utc>>,
    headers: Map<String, Value>,
    claims: Map<String, Value>,
}

impl Jwt {
    pub(crate) fn new(
        token_value: String,
        issued_at: Option<DateTime<Utc>>,
        expires_at: Option<DateTime<Utc>>,
        headers: Map<String, Value>,
        claims: Map<String, Value>,
    ) -> Self {
        Self {
            token_value,
            issued_at,
            expires_at,
            headers,
            claims,
        }
    }

    /// Compact serialization, `header.payload.signature`.
    pub fn token_value(&self) -> &str {
        &self.token_value
    }

    pub fn issued_at(&self) -> Option<DateTime<Utc>> {
        self.issued_at
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expires_at
    }

    /// Full header set, registered and custom parameters.
    pub fn headers(&self) -> &Map<String, Value> {
        &self.headers
    }

    /// Full claim set, registered and custom claims.
    pub fn claims(&self) -> &Map<String, Value> {
        &self.claims
    }

    pub fn into_token_value(self) -> String {
        self.token_value
    }
}

impl std::fmt::Display for Jwt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.token_value)
    }
}
