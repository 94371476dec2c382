// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Certificate signature verification.
//!
//! Only ecdsa-with-SHA256 over P-256 is accepted; any other algorithm fails the
//! issuer candidate rather than the whole path search.

use p256::elliptic_curve::sec1::ToEncodedPoint as _;
use p256::pkcs8::DecodePublicKey as _;
use signature::Verifier as _;

pub(crate) const ECDSA_WITH_SHA256_OID: &str = "1.2.840.10045.4.3.2";

pub(crate) fn verify_cert_signature(
    issuer_spki_der: &[u8],
    tbs_der: &[u8],
    signature_oid: &str,
    signature: &[u8],
) -> Result<(), String> {
    match signature_oid {
        ECDSA_WITH_SHA256_OID => {
            let pk = p256::PublicKey::from_public_key_der(issuer_spki_der)
                .map_err(|e| format!("bad P-256 issuer public key: {e}"))?;
            let ep = pk.to_encoded_point(false);
            let vk = p256::ecdsa::VerifyingKey::from_sec1_bytes(ep.as_bytes())
                .map_err(|e| format!("bad P-256 issuer public key: {e}"))?;
            let sig = p256::ecdsa::Signature::from_der(signature)
                .map_err(|e| format!("bad ECDSA signature bytes: {e}"))?;
            vk.verify(tbs_der, &sig)
                .map_err(|_| "certificate signature verification failed".to_string())
        }
        _ => Err(format!("unsupported certificate signature algorithm OID: {signature_oid}")),
    }
}
