// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Builders for the signed documents the trust crates consume.

use crate::certs::{x5c_of, TestCert};
use flate2::write::ZlibEncoder;
use flate2::Compression;
use p256::ecdsa::signature::Signer as _;
use p256::ecdsa::Signature;
use serde_json::{json, Value};
use std::io::Write as _;
use vc_trust_common::encoding::encode_base64url;

/// Sign `payload` as a compact ES256 JWS with `header` (its `alg` is forced to ES256).
pub fn sign_es256_jws(header: Value, payload: &Value, signer: &TestCert) -> String {
    let mut header = header;
    header["alg"] = json!("ES256");

    let h = encode_base64url(serde_json::to_vec(&header).unwrap().as_slice());
    let p = encode_base64url(serde_json::to_vec(payload).unwrap().as_slice());
    let signing_input = format!("{h}.{p}");

    let sig: Signature = signer.signing_key().sign(signing_input.as_bytes());
    format!("{signing_input}.{}", encode_base64url(&sig.to_bytes()))
}

/// One trusted entity of a generated trust list.
#[derive(Debug, Clone, Default)]
pub struct LoteEntitySpec {
    pub name: Option<String>,
    /// `(service type, base64 DER)` pairs, one service per certificate.
    pub services: Vec<(String, String)>,
}

impl LoteEntitySpec {
    pub fn named(name: &str) -> Self {
        Self {
            name: Some(name.to_string()),
            services: Vec::new(),
        }
    }

    pub fn service(mut self, service_type: &str, cert: &TestCert) -> Self {
        self.services.push((service_type.to_string(), cert.b64()));
        self
    }

    pub fn raw_service(mut self, service_type: &str, cert_value: &str) -> Self {
        self.services.push((service_type.to_string(), cert_value.to_string()));
        self
    }
}

/// A LoTE payload (wrapped in the top-level `LoTE` member).
pub fn lote_payload(next_update: Option<&str>, entities: &[LoteEntitySpec]) -> Value {
    let entities: Vec<Value> = entities
        .iter()
        .map(|e| {
            let services: Vec<Value> = e
                .services
                .iter()
                .map(|(service_type, cert)| {
                    json!({
                        "ServiceInformation": {
                            "ServiceTypeIdentifier": service_type,
                            "ServiceName": [{ "lang": "en", "value": service_type }],
                            "ServiceDigitalIdentity": { "X509Certificates": [{ "val": cert }] }
                        }
                    })
                })
                .collect();

            let mut info = json!({});
            if let Some(name) = &e.name {
                info["TEName"] = json!([{ "lang": "en", "value": name }]);
            }
            json!({
                "TrustedEntityInformation": info,
                "TrustedEntityServices": services
            })
        })
        .collect();

    let mut scheme = json!({
        "LoTEVersionIdentifier": 1,
        "LoTESequenceNumber": 1,
        "ListIssueDateTime": "2026-01-01T00:00:00Z",
        "SchemeTerritory": "EU"
    });
    if let Some(next) = next_update {
        scheme["NextUpdate"] = json!(next);
    }

    json!({
        "LoTE": {
            "ListAndSchemeInformation": scheme,
            "TrustedEntitiesList": entities
        }
    })
}

/// Sign a LoTE payload, carrying the signer certificate in `x5c`.
pub fn signed_lote(payload: &Value, signer: &TestCert) -> String {
    sign_es256_jws(json!({ "typ": "JWT", "x5c": [signer.b64()] }), payload, signer)
}

/// Bit-pack `statuses` (`bits` per entry, little-endian within each byte), zlib
/// compress and base64url encode, as carried in `status_list.lst`.
pub fn pack_status_list(bits: u8, statuses: &[u8]) -> String {
    let bits = bits as usize;
    let mut bytes = vec![0u8; (statuses.len() * bits).div_ceil(8)];
    let mask = ((1u16 << bits) - 1) as u8;
    for (i, status) in statuses.iter().enumerate() {
        let offset = i * bits;
        bytes[offset / 8] |= (status & mask) << (offset % 8);
    }

    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(&bytes).unwrap();
    encode_base64url(&encoder.finish().unwrap())
}

/// Parameters of a generated status list token.
#[derive(Debug, Clone)]
pub struct StatusListJwtSpec {
    pub uri: String,
    pub bits: u8,
    pub statuses: Vec<u8>,
    pub ttl: Option<u64>,
    pub exp: Option<i64>,
    pub typ: String,
}

impl StatusListJwtSpec {
    pub fn new(uri: &str, bits: u8, statuses: Vec<u8>) -> Self {
        Self {
            uri: uri.to_string(),
            bits,
            statuses,
            ttl: None,
            exp: None,
            typ: "statuslist+jwt".to_string(),
        }
    }
}

/// A status list token signed by `signer` with `chain` as its `x5c`.
pub fn status_list_jwt(spec: &StatusListJwtSpec, signer: &TestCert, chain: &[&TestCert]) -> String {
    let mut payload = json!({
        "sub": spec.uri,
        "iat": vc_trust_common::unix_now(),
        "status_list": {
            "bits": spec.bits,
            "lst": pack_status_list(spec.bits, &spec.statuses)
        }
    });
    if let Some(ttl) = spec.ttl {
        payload["ttl"] = json!(ttl);
    }
    if let Some(exp) = spec.exp {
        payload["exp"] = json!(exp);
    }

    sign_es256_jws(json!({ "typ": spec.typ, "x5c": x5c_of(chain) }), &payload, signer)
}

/// A credential JWT pointing at entry `idx` of the status list at `uri`.
pub fn credential_jwt_with_status(uri: &str, idx: u64, signer: &TestCert) -> String {
    let payload = json!({
        "iss": "https://issuer.example",
        "vct": "urn:example:pid",
        "status": { "status_list": { "idx": idx, "uri": uri } }
    });
    sign_es256_jws(json!({ "typ": "dc+sd-jwt", "x5c": [signer.b64()] }), &payload, signer)
}
