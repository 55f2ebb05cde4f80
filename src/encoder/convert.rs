// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Conversion from the header/claims model to wire-level JOSE structures.
//!
//! The wire structures are what actually gets serialized into the signing
//! input, so every registered parameter is re-validated here against the
//! wire format (URIs must parse, `jwk` must be a well-formed JWK).

use base64ct::{Base64UrlUnpadded, Encoding};
use jsonwebtoken::jwk::Jwk;
use serde::Serialize;
use serde_json::{Map, Value};
use url::Url;

use crate::jose::claims::{is_registered_claim, numeric_date};
use crate::jose::header::{is_registered_header, names};
use crate::jose::{JoseHeader, JwsAlgorithm, JwtClaimsSet};

/// A header parameter could not be expressed in the wire format.
#[derive(Debug, thiserror::Error)]
pub enum HeaderConversionError {
    #[error("Failed to convert '{field}' JOSE header to a URI")]
    InvalidUri {
        field: &'static str,
        #[source]
        source: url::ParseError,
    },

    #[error("Failed to convert 'jwk' JOSE header")]
    MalformedJwk(#[source] serde_json::Error),
}

impl HeaderConversionError {
    /// Name of the header parameter that failed to convert.
    pub fn field(&self) -> &'static str {
        match self {
            Self::InvalidUri { field, .. } => field,
            Self::MalformedJwk(_) => names::JWK,
        }
    }
}

/// Wire-level JWS protected header.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JwsHeader {
    pub alg: JwsAlgorithm,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub typ: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cty: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kid: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jku: Option<Url>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jwk: Option<Jwk>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x5u: Option<Url>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x5c: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x5t: Option<String>,
    #[serde(rename = "x5t#S256", skip_serializing_if = "Option::is_none")]
    pub x5t_s256: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crit: Option<Vec<String>>,
    #[serde(flatten)]
    pub custom: Map<String, Value>,
}

/// Wire-level JWT claims payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JwtClaimsPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aud: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nbf: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jti: Option<String>,
    #[serde(flatten)]
    pub custom: Map<String, Value>,
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value.filter(|v| !v.is_empty()).map(str::to_owned)
}

fn parse_uri(field: &'static str, value: Option<&str>) -> Result<Option<Url>, HeaderConversionError> {
    value
        .map(|raw| Url::parse(raw).map_err(|source| HeaderConversionError::InvalidUri { field, source }))
        .transpose()
}

/// Convert a finalized header into its wire form.
pub fn convert_header(header: &JoseHeader) -> Result<JwsHeader, HeaderConversionError> {
    let jwk = header
        .jwk()
        .map(|jwk| {
            serde_json::from_value::<Jwk>(Value::Object(jwk.clone()))
                .map_err(HeaderConversionError::MalformedJwk)
        })
        .transpose()?;

    let custom = header
        .headers()
        .into_iter()
        .filter(|(name, _)| !is_registered_header(name))
        .collect();

    Ok(JwsHeader {
        alg: header.algorithm(),
        typ: non_empty(header.typ()),
        cty: non_empty(header.content_type()),
        kid: non_empty(header.key_id()),
        jku: parse_uri(names::JKU, header.jwk_set_url())?,
        jwk,
        x5u: parse_uri(names::X5U, header.x509_url())?,
        x5c: header.x509_cert_chain().map(<[String]>::to_vec),
        x5t: header.x509_sha1_thumbprint().map(str::to_owned),
        x5t_s256: header.x509_sha256_thumbprint().map(str::to_owned),
        crit: header
            .critical()
            .filter(|crit| !crit.is_empty())
            .map(|crit| crit.iter().cloned().collect()),
        custom,
    })
}

/// Convert a finalized claims set into its wire form.
pub fn convert_claims(claims: &JwtClaimsSet) -> JwtClaimsPayload {
    let custom = claims
        .claims()
        .into_iter()
        .filter(|(name, _)| !is_registered_claim(name))
        .collect();

    JwtClaimsPayload {
        iss: claims.issuer().map(str::to_owned),
        sub: claims.subject().map(str::to_owned),
        aud: claims.audience().map(<[String]>::to_vec),
        exp: claims.expires_at().as_ref().map(numeric_date),
        nbf: claims.not_before().as_ref().map(numeric_date),
        iat: claims.issued_at().as_ref().map(numeric_date),
        jti: claims.id().map(str::to_owned),
        custom,
    }
}

/// `BASE64URL(header) || '.' || BASE64URL(payload)`.
pub fn signing_input(
    header: &JwsHeader,
    payload: &JwtClaimsPayload,
) -> Result<String, serde_json::Error> {
    let header_json = serde_json::to_vec(header)?;
    let payload_json = serde_json::to_vec(payload)?;
    Ok(format!(
        "{}.{}",
        Base64UrlUnpadded::encode_string(&header_json),
        Base64UrlUnpadded::encode_string(&payload_json)
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jose::JoseHeaderBuilder;
    use crate::test_support::decode_segment;
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    fn header() -> JoseHeaderBuilder {
        JoseHeaderBuilder::with_algorithm(JwsAlgorithm::RS256)
    }

    #[test]
    fn registered_parameters_are_copied() {
        let mut builder = header();
        builder
            .typ("JWT")
            .unwrap()
            .key_id("k1")
            .unwrap()
            .jwk_set_url("https://keys.example.com/jwks.json")
            .unwrap()
            .x509_cert_chain(["MIIBcert"])
            .unwrap()
            .x509_sha256_thumbprint("thumb")
            .unwrap()
            .critical(["exp"])
            .unwrap();
        let wire = convert_header(&builder.build().unwrap()).unwrap();

        assert_eq!(wire.alg, JwsAlgorithm::RS256);
        assert_eq!(wire.typ.as_deref(), Some("JWT"));
        assert_eq!(wire.kid.as_deref(), Some("k1"));
        assert_eq!(
            wire.jku.as_ref().map(Url::as_str),
            Some("https://keys.example.com/jwks.json")
        );
        assert_eq!(wire.x5c, Some(vec!["MIIBcert".to_string()]));
        assert_eq!(wire.x5t_s256.as_deref(), Some("thumb"));
        assert_eq!(wire.crit, Some(vec!["exp".to_string()]));
        assert!(wire.custom.is_empty());
    }

    #[test]
    fn custom_parameters_exclude_registered_names() {
        let mut builder = header();
        builder
            .key_id("k1")
            .unwrap()
            .header("x-tenant", json!("acme"))
            .unwrap();
        let wire = convert_header(&builder.build().unwrap()).unwrap();

        assert_eq!(wire.custom.len(), 1);
        assert_eq!(wire.custom["x-tenant"], json!("acme"));
    }

    #[test]
    fn relative_jku_fails_conversion() {
        let mut builder = header();
        builder.jwk_set_url("keys/jwks.json").unwrap();

        let err = convert_header(&builder.build().unwrap()).unwrap_err();
        assert!(matches!(err, HeaderConversionError::InvalidUri { field: "jku", .. }));
        assert_eq!(err.field(), "jku");
        assert_eq!(err.to_string(), "Failed to convert 'jku' JOSE header to a URI");
    }

    #[test]
    fn unparseable_x5u_names_its_field() {
        let mut builder = header();
        builder
            .jwk_set_url("https://keys.example.com/jwks.json")
            .unwrap()
            .x509_url("certs/chain.pem")
            .unwrap();

        let err = convert_header(&builder.build().unwrap()).unwrap_err();
        assert!(matches!(err, HeaderConversionError::InvalidUri { field: "x5u", .. }));
        assert_eq!(err.field(), "x5u");
        assert_eq!(err.to_string(), "Failed to convert 'x5u' JOSE header to a URI");
    }

    #[test]
    fn x5u_keeps_its_original_form_in_the_snapshot() {
        let mut builder = header();
        builder.x509_url("https://certs.example.com").unwrap();
        let header = builder.build().unwrap();

        assert_eq!(header.x509_url(), Some("https://certs.example.com"));
        let wire = convert_header(&header).unwrap();
        assert_eq!(wire.x5u.unwrap().as_str(), "https://certs.example.com/");
    }

    #[test]
    fn malformed_jwk_is_rejected() {
        let mut builder = header();
        let mut jwk = Map::new();
        jwk.insert("kty".into(), json!("nonsense"));
        builder.jwk(jwk).unwrap();

        let err = convert_header(&builder.build().unwrap()).unwrap_err();
        assert!(matches!(err, HeaderConversionError::MalformedJwk(_)));
        assert_eq!(err.field(), "jwk");
        assert_eq!(err.to_string(), "Failed to convert 'jwk' JOSE header");
    }

    #[test]
    fn well_formed_jwk_is_embedded() {
        let mut builder = header();
        let jwk = json!({
            "kty": "RSA",
            "n": "sXchDaQebHnPiGvyDOAT4saGEUetSyo9MKLOoWFsueri23bOdgWp4Dy1WlUzewbgBHod5pcM9H95GQRV3JDXboIRROSBigeC5yjU1hGzHHyXss8UDprecbAYxknTcQkhslANGRUZmdTOQ5qTRsLAt6BTYuyvVRdhS8exSZEy_c4gs_7svlJJQ4H9_NxsiIoLwAEk7-Q3UXERGYw_75IDrGA84-lA_-Ct4eTlXHBIY2EaV7t7LjJaynVJCpkv4LKjTTAumiGUIuQhrNhZLuF_RJLqHpM2kgWFLU7-VTdL1VbC2tejvcI2BlMkEpk1BzBZI0KQB0GaDWFLN-aEAw3vRw",
            "e": "AQAB"
        });
        let Value::Object(jwk) = jwk else { unreachable!() };
        builder.jwk(jwk).unwrap();

        let wire = convert_header(&builder.build().unwrap()).unwrap();
        let embedded = serde_json::to_value(wire.jwk.unwrap()).unwrap();
        assert_eq!(embedded["kty"], json!("RSA"));
        assert_eq!(embedded["e"], json!("AQAB"));
    }

    #[test]
    fn claims_use_numeric_dates_and_array_audience() {
        let iat = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let mut builder = JwtClaimsSet::builder();
        builder
            .issuer("https://issuer.example.com")
            .unwrap()
            .subject("user-1")
            .unwrap()
            .audience(["api"])
            .unwrap()
            .issued_at(iat)
            .expires_at(iat + chrono::Duration::hours(1))
            .claim("scope", json!(["read", "write"]))
            .unwrap();
        let wire = convert_claims(&builder.build());

        assert_eq!(wire.iss.as_deref(), Some("https://issuer.example.com"));
        assert_eq!(wire.aud, Some(vec!["api".to_string()]));
        assert_eq!(wire.iat, Some(1_704_067_200));
        assert_eq!(wire.exp, Some(1_704_070_800));
        assert_eq!(wire.nbf, None);
        assert_eq!(wire.custom.len(), 1);

        let value = serde_json::to_value(&wire).unwrap();
        assert_eq!(value["aud"], json!(["api"]));
        assert_eq!(value["scope"], json!(["read", "write"]));
        assert!(value.get("nbf").is_none());
    }

    #[test]
    fn signing_input_is_two_base64url_segments() {
        let mut builder = header();
        builder.typ("JWT").unwrap();
        let wire_header = convert_header(&builder.build().unwrap()).unwrap();
        let mut claims = JwtClaimsSet::builder();
        claims.subject("user-1").unwrap();
        let payload = convert_claims(&claims.build());

        let input = signing_input(&wire_header, &payload).unwrap();
        let (h, p) = input.split_once('.').unwrap();
        assert!(!input.contains('='));
        assert_eq!(decode_segment(h), json!({"alg": "RS256", "typ": "JWT"}));
        assert_eq!(decode_segment(p), json!({"sub": "user-1"}));
    }
}
