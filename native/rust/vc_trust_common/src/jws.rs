// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Compact JWS handling.
//!
//! Trust lists, status lists and credentials all arrive as compact JWS
//! (`header.payload.signature`). Only ES256 signatures are verified; any other
//! `alg` is rejected.

use crate::encoding::{decode_base64_lenient, decode_base64url};
use p256::ecdsa::{Signature, VerifyingKey};
use p256::elliptic_curve::sec1::ToEncodedPoint as _;
use p256::pkcs8::DecodePublicKey as _;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use signature::Verifier as _;
use x509_parser::prelude::{FromDer, X509Certificate};

pub const ALG_ES256: &str = "ES256";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum JwsError {
    #[error("jws_malformed: {0}")]
    Malformed(String),

    #[error("jws_unsupported_alg: {0}")]
    UnsupportedAlg(String),

    #[error("jws_missing_x5c")]
    MissingX5c,

    #[error("jws_bad_key: {0}")]
    BadKey(String),

    #[error("jws_signature_invalid")]
    SignatureInvalid,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct JwsHeader {
    #[serde(default)]
    pub alg: Option<String>,
    #[serde(default)]
    pub typ: Option<String>,
    #[serde(default)]
    pub kid: Option<String>,
    #[serde(default)]
    pub x5c: Option<Vec<String>>,
}

#[derive(Debug, Clone)]
pub struct CompactJws {
    raw: String,
    header: JwsHeader,
    payload: Vec<u8>,
    signature: Vec<u8>,
    signing_input_len: usize,
}

impl CompactJws {
    /// Split and decode a compact JWS. The signature is not checked.
    pub fn parse(raw: &str) -> Result<Self, JwsError> {
        let raw = raw.trim();
        let mut parts = raw.split('.');
        let (Some(h), Some(p), Some(s), None) = (parts.next(), parts.next(), parts.next(), parts.next()) else {
            return Err(JwsError::Malformed("expected three dot-separated segments".to_string()));
        };

        let header_bytes = decode_base64url(h).map_err(|e| JwsError::Malformed(format!("header: {e}")))?;
        let header: JwsHeader =
            serde_json::from_slice(&header_bytes).map_err(|e| JwsError::Malformed(format!("header: {e}")))?;
        let payload = decode_base64url(p).map_err(|e| JwsError::Malformed(format!("payload: {e}")))?;
        let signature = decode_base64url(s).map_err(|e| JwsError::Malformed(format!("signature: {e}")))?;

        Ok(Self {
            raw: raw.to_string(),
            header,
            payload,
            signature,
            signing_input_len: h.len() + 1 + p.len(),
        })
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn header(&self) -> &JwsHeader {
        &self.header
    }

    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    pub fn payload_json<T: DeserializeOwned>(&self) -> Result<T, JwsError> {
        serde_json::from_slice(&self.payload).map_err(|e| JwsError::Malformed(format!("payload: {e}")))
    }

    /// The `x5c` header entries, if any.
    pub fn x5c(&self) -> Option<&[String]> {
        self.header.x5c.as_deref().filter(|v| !v.is_empty())
    }

    fn signing_input(&self) -> &[u8] {
        &self.raw.as_bytes()[..self.signing_input_len]
    }

    /// Verify the ES256 signature with `key`.
    pub fn verify_es256(&self, key: &VerifyingKey) -> Result<(), JwsError> {
        match self.header.alg.as_deref() {
            Some(ALG_ES256) => {}
            Some(other) => return Err(JwsError::UnsupportedAlg(other.to_string())),
            None => return Err(JwsError::UnsupportedAlg("<none>".to_string())),
        }

        let sig = Signature::from_slice(&self.signature)
            .map_err(|e| JwsError::Malformed(format!("bad ES256 signature bytes: {e}")))?;
        key.verify(self.signing_input(), &sig)
            .map_err(|_| JwsError::SignatureInvalid)
    }

    /// Verify the signature with the public key of the first `x5c` certificate.
    ///
    /// This proves possession only; whether that certificate is trusted is decided elsewhere.
    pub fn verify_with_x5c_leaf(&self) -> Result<(), JwsError> {
        let leaf_b64 = self.x5c().and_then(|c| c.first()).ok_or(JwsError::MissingX5c)?;
        let der = decode_base64_lenient(leaf_b64).map_err(|e| JwsError::BadKey(format!("x5c[0]: {e}")))?;
        let (_, cert) =
            X509Certificate::from_der(&der).map_err(|e| JwsError::BadKey(format!("x5c[0] is not a certificate: {e:?}")))?;
        let key = verifying_key_from_spki_der(cert.tbs_certificate.subject_pki.raw)?;
        self.verify_es256(&key)
    }
}

/// Build a P-256 verifying key from DER-encoded SubjectPublicKeyInfo.
pub fn verifying_key_from_spki_der(spki_der: &[u8]) -> Result<VerifyingKey, JwsError> {
    let pk = p256::PublicKey::from_public_key_der(spki_der).map_err(|e| JwsError::BadKey(format!("bad P-256 public key: {e}")))?;
    let ep = pk.to_encoded_point(false);
    VerifyingKey::from_sec1_bytes(ep.as_bytes()).map_err(|e| JwsError::BadKey(format!("bad P-256 public key: {e}")))
}

/// Build a verifying key from a PEM `PUBLIC KEY` or a PEM `CERTIFICATE`.
pub fn verifying_key_from_pem(pem: &str) -> Result<VerifyingKey, JwsError> {
    let (_, block) = x509_parser::pem::parse_x509_pem(pem.trim().as_bytes())
        .map_err(|e| JwsError::BadKey(format!("invalid PEM: {e:?}")))?;

    match block.label.as_str() {
        "PUBLIC KEY" => verifying_key_from_spki_der(&block.contents),
        "CERTIFICATE" => {
            let (_, cert) = X509Certificate::from_der(&block.contents)
                .map_err(|e| JwsError::BadKey(format!("invalid certificate: {e:?}")))?;
            verifying_key_from_spki_der(cert.tbs_certificate.subject_pki.raw)
        }
        other => Err(JwsError::BadKey(format!("unsupported PEM label: {other}"))),
    }
}

/// Decode the payload of a compact JWS without checking its signature.
pub fn decode_unverified_payload<T: DeserializeOwned>(jwt: &str) -> Result<T, JwsError> {
    CompactJws::parse(jwt)?.payload_json()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoding::encode_base64url;

    #[test]
    fn parse_rejects_wrong_segment_count() {
        assert!(matches!(CompactJws::parse("a.b"), Err(JwsError::Malformed(_))));
        assert!(matches!(CompactJws::parse("a.b.c.d"), Err(JwsError::Malformed(_))));
    }

    #[test]
    fn unsupported_alg_is_rejected_before_signature_check() {
        let h = encode_base64url(br#"{"alg":"RS256"}"#);
        let p = encode_base64url(br#"{}"#);
        let jws = CompactJws::parse(&format!("{h}.{p}.AAAA")).unwrap();

        let sk = p256::ecdsa::SigningKey::from_slice(&[7u8; 32]).unwrap();
        let err = jws.verify_es256(sk.verifying_key()).unwrap_err();
        assert_eq!(err, JwsError::UnsupportedAlg("RS256".to_string()));
    }

    #[test]
    fn verify_with_x5c_leaf_requires_x5c() {
        let h = encode_base64url(br#"{"alg":"ES256"}"#);
        let p = encode_base64url(br#"{}"#);
        let jws = CompactJws::parse(&format!("{h}.{p}.AAAA")).unwrap();
        assert_eq!(jws.verify_with_x5c_leaf().unwrap_err(), JwsError::MissingX5c);
    }
}
