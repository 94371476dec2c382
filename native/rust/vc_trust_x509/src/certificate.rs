// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use crate::cert_signature::verify_cert_signature;
use crate::error::X509Error;
use sha2::{Digest as _, Sha256};
use std::sync::Arc;
use vc_trust_common::encoding::decode_base64_lenient;
use x509_parser::prelude::*;

/// A decoded certificate with the fields path building and matching need.
///
/// Equality is thumbprint (SHA-256 of the DER) equality.
#[derive(Debug, Clone)]
pub struct Certificate {
    der: Arc<Vec<u8>>,
    thumbprint: String,
    subject: String,
    issuer: String,
    subject_raw: Vec<u8>,
    issuer_raw: Vec<u8>,
    serial_hex: String,
    spki_der: Vec<u8>,
    tbs_der: Vec<u8>,
    signature_oid: String,
    signature: Vec<u8>,
    is_ca: bool,
    subject_key_id: Option<Vec<u8>>,
    authority_key_id: Option<Vec<u8>>,
    not_before_unix_seconds: i64,
    not_after_unix_seconds: i64,
}

impl PartialEq for Certificate {
    fn eq(&self, other: &Self) -> bool {
        self.thumbprint == other.thumbprint
    }
}

impl Eq for Certificate {}

impl Certificate {
    pub fn der(&self) -> &[u8] {
        self.der.as_slice()
    }

    /// Upper-case hex SHA-256 of the DER encoding.
    pub fn thumbprint(&self) -> &str {
        &self.thumbprint
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn issuer(&self) -> &str {
        &self.issuer
    }

    pub fn serial_hex(&self) -> &str {
        &self.serial_hex
    }

    pub fn is_ca(&self) -> bool {
        self.is_ca
    }

    pub fn not_before_unix_seconds(&self) -> i64 {
        self.not_before_unix_seconds
    }

    pub fn not_after_unix_seconds(&self) -> i64 {
        self.not_after_unix_seconds
    }

    /// Name (and, when both sides carry one, key identifier) chaining from `self` to `child`.
    pub(crate) fn could_have_issued(&self, child: &Certificate) -> bool {
        if self.subject_raw != child.issuer_raw {
            return false;
        }
        match (&child.authority_key_id, &self.subject_key_id) {
            (Some(aki), Some(ski)) => aki == ski,
            _ => true,
        }
    }

    /// True if `issuer`'s key verifies this certificate's signature.
    pub fn is_signed_by(&self, issuer: &Certificate) -> bool {
        verify_cert_signature(&issuer.spki_der, &self.tbs_der, &self.signature_oid, &self.signature).is_ok()
    }
}

/// Decode one DER certificate.
pub fn parse_certificate_der(der: &[u8]) -> Result<Certificate, X509Error> {
    let (_, cert) = X509Certificate::from_der(der)
        .map_err(|e| X509Error::MalformedCertificate(format!("invalid cert DER: {e:?}")))?;

    let thumbprint = hex::encode_upper(Sha256::digest(der));

    let mut is_ca = false;
    let mut subject_key_id = None;
    let mut authority_key_id = None;
    for ext in cert.extensions() {
        match ext.parsed_extension() {
            ParsedExtension::BasicConstraints(bc) => is_ca = bc.ca,
            ParsedExtension::SubjectKeyIdentifier(kid) => subject_key_id = Some(kid.0.to_vec()),
            ParsedExtension::AuthorityKeyIdentifier(aki) => {
                authority_key_id = aki.key_identifier.as_ref().map(|k| k.0.to_vec());
            }
            _ => {}
        }
    }

    Ok(Certificate {
        der: Arc::new(der.to_vec()),
        thumbprint,
        subject: cert.subject().to_string(),
        issuer: cert.issuer().to_string(),
        subject_raw: cert.subject().as_raw().to_vec(),
        issuer_raw: cert.issuer().as_raw().to_vec(),
        serial_hex: hex::encode_upper(cert.serial.to_bytes_be()),
        spki_der: cert.tbs_certificate.subject_pki.raw.to_vec(),
        tbs_der: cert.tbs_certificate.as_ref().to_vec(),
        signature_oid: cert.signature_algorithm.algorithm.to_id_string(),
        signature: cert.signature_value.data.to_vec(),
        is_ca,
        subject_key_id,
        authority_key_id,
        not_before_unix_seconds: cert.validity().not_before.timestamp(),
        not_after_unix_seconds: cert.validity().not_after.timestamp(),
    })
}

/// Decode an `x5c` array (base64 DER, leaf first).
pub fn parse_chain<S: AsRef<str>>(x5c: &[S]) -> Result<Vec<Certificate>, X509Error> {
    x5c.iter()
        .enumerate()
        .map(|(i, entry)| {
            let der = decode_base64_lenient(entry.as_ref())
                .map_err(|e| X509Error::MalformedCertificate(format!("x5c[{i}] is not base64: {e}")))?;
            parse_certificate_der(&der)
                .map_err(|e| X509Error::MalformedCertificate(format!("x5c[{i}]: {e}")))
        })
        .collect()
}

/// Decode a trust-list certificate value to DER.
///
/// Values come base64 encoded, sometimes line-wrapped or already PEM-armored. The
/// value is normalized into a canonical PEM block and decoded through the PEM
/// reader; plain base64 decoding is the fallback.
pub fn decode_cert_value(value: &str) -> Result<Vec<u8>, X509Error> {
    let body: String = value
        .lines()
        .filter(|l| !l.trim_start().starts_with("-----"))
        .flat_map(|l| l.chars())
        .filter(|c| !c.is_whitespace())
        .collect();

    if body.is_empty() {
        return Err(X509Error::MalformedCertificate("empty certificate value".to_string()));
    }

    let mut pem = String::with_capacity(body.len() + 64);
    pem.push_str("-----BEGIN CERTIFICATE-----\n");
    for chunk in body.as_bytes().chunks(64) {
        pem.push_str(&String::from_utf8_lossy(chunk));
        pem.push('\n');
    }
    pem.push_str("-----END CERTIFICATE-----\n");

    match x509_parser::pem::parse_x509_pem(pem.as_bytes()) {
        Ok((_, block)) => Ok(block.contents),
        Err(_) => decode_base64_lenient(&body)
            .map_err(|e| X509Error::MalformedCertificate(format!("certificate value is not base64: {e}"))),
    }
}

/// Decode trust-list certificates, skipping (and logging) any that fail to parse.
pub fn parse_trust_anchors<I, S>(cert_values: I) -> Vec<Certificate>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out = Vec::new();
    for (i, value) in cert_values.into_iter().enumerate() {
        match decode_cert_value(value.as_ref()).and_then(|der| parse_certificate_der(&der)) {
            Ok(c) => out.push(c),
            Err(e) => tracing::warn!(index = i, error = %e, "skipping unparseable trust anchor"),
        }
    }
    out
}

/// Basic Constraints CA flag; absent extension means not a CA.
pub fn is_ca(cert: &Certificate) -> bool {
    cert.is_ca
}

/// `not_before <= now <= not_after`.
pub fn is_time_valid(cert: &Certificate, now_unix_seconds: i64) -> bool {
    cert.not_before_unix_seconds <= now_unix_seconds && now_unix_seconds <= cert.not_after_unix_seconds
}
