// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # JOSE Model
//!
//! Value types for the header and claims of a token before they are converted
//! to their wire form.
//!
//! ## Invariants
//!
//! - Registered names never appear in the custom header/claim maps
//! - Accumulators are plain values; each token build owns its own
//! - A rejected setter call leaves the accumulator unchanged

pub mod algorithm;
pub mod claims;
pub mod error;
pub mod header;

pub use algorithm::{Curve, JwsAlgorithm, KeyType, UnknownAlgorithm};
pub use claims::{JwtClaimsSet, JwtClaimsSetBuilder, REGISTERED_CLAIM_NAMES};
pub use error::FieldError;
pub use header::{JoseHeader, JoseHeaderBuilder, JWT_TYPE, REGISTERED_HEADER_NAMES};
