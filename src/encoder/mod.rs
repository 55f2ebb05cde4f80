// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # JWT Encoding
//!
//! Orchestrates a build: key resolution, conversion of the header and claims
//! to their wire form, signing and compact serialization.
//!
//! ## Build Flow
//!
//! 1. Resolve the signing key (pinned, or selected from the key source)
//! 2. Assign a `jti` when none is set
//! 3. Convert header and claims to wire structures
//! 4. Fetch the signer from the signer cache
//! 5. Sign `BASE64URL(header).BASE64URL(payload)` and append the signature

pub mod builder;
pub mod convert;
pub mod jwt;

pub use builder::{JwtBuilder, JwtBuilderFactory};
pub use convert::{convert_claims, convert_header, HeaderConversionError, JwsHeader, JwtClaimsPayload};
pub use jwt::Jwt;
