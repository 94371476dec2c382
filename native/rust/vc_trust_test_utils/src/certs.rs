// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use p256::pkcs8::{DecodePrivateKey as _, EncodePublicKey as _, LineEnding};
use rcgen::{BasicConstraints, CertificateParams, DistinguishedName, DnType, IsCa, KeyPair, KeyUsagePurpose};
use sha2::{Digest as _, Sha256};
use vc_trust_common::encoding::encode_base64;

/// A generated certificate together with its P-256 key.
pub struct TestCert {
    pub cert: rcgen::Certificate,
    pub key_pair: KeyPair,
    pub der: Vec<u8>,
}

impl TestCert {
    /// Standard base64 DER, as carried in `x5c` and trust lists.
    pub fn b64(&self) -> String {
        encode_base64(&self.der)
    }

    pub fn pem(&self) -> String {
        self.cert.pem()
    }

    pub fn thumbprint(&self) -> String {
        hex::encode_upper(Sha256::digest(&self.der))
    }

    pub fn signing_key(&self) -> p256::ecdsa::SigningKey {
        p256::ecdsa::SigningKey::from_pkcs8_der(&self.key_pair.serialize_der()).unwrap()
    }

    pub fn public_key_pem(&self) -> String {
        self.signing_key()
            .verifying_key()
            .to_public_key_pem(LineEnding::LF)
            .unwrap()
    }
}

fn params(cn: &str, ca: bool) -> CertificateParams {
    let mut params = CertificateParams::new(vec![format!("{}.example", cn.to_lowercase().replace(' ', "-"))]).unwrap();
    let mut dn = DistinguishedName::new();
    dn.push(DnType::CommonName, cn);
    params.distinguished_name = dn;
    if ca {
        params.is_ca = IsCa::Ca(BasicConstraints::Unconstrained);
        params.key_usages = vec![KeyUsagePurpose::KeyCertSign, KeyUsagePurpose::CrlSign, KeyUsagePurpose::DigitalSignature];
    } else {
        params.is_ca = IsCa::NoCa;
        params.key_usages = vec![KeyUsagePurpose::DigitalSignature];
    }
    params
}

fn finish(cert: rcgen::Certificate, key_pair: KeyPair) -> TestCert {
    let der = cert.der().to_vec();
    TestCert { cert, key_pair, der }
}

/// Self-signed CA.
pub fn root_ca(cn: &str) -> TestCert {
    let key_pair = KeyPair::generate().unwrap();
    let cert = params(cn, true).self_signed(&key_pair).unwrap();
    finish(cert, key_pair)
}

/// CA signed by `issuer`.
pub fn intermediate_ca(cn: &str, issuer: &TestCert) -> TestCert {
    let key_pair = KeyPair::generate().unwrap();
    let cert = params(cn, true)
        .signed_by(&key_pair, &issuer.cert, &issuer.key_pair)
        .unwrap();
    finish(cert, key_pair)
}

/// End-entity certificate signed by `issuer`.
pub fn leaf(cn: &str, issuer: &TestCert) -> TestCert {
    let key_pair = KeyPair::generate().unwrap();
    let cert = params(cn, false)
        .signed_by(&key_pair, &issuer.cert, &issuer.key_pair)
        .unwrap();
    finish(cert, key_pair)
}

/// Self-signed end-entity certificate (a typical pinned certificate).
pub fn self_signed_leaf(cn: &str) -> TestCert {
    let key_pair = KeyPair::generate().unwrap();
    let cert = params(cn, false).self_signed(&key_pair).unwrap();
    finish(cert, key_pair)
}

/// End-entity certificate signed by `issuer` whose validity ended in 2001.
pub fn expired_leaf(cn: &str, issuer: &TestCert) -> TestCert {
    let key_pair = KeyPair::generate().unwrap();
    let mut p = params(cn, false);
    p.not_before = rcgen::date_time_ymd(2000, 1, 1);
    p.not_after = rcgen::date_time_ymd(2001, 1, 1);
    let cert = p.signed_by(&key_pair, &issuer.cert, &issuer.key_pair).unwrap();
    finish(cert, key_pair)
}

/// `x5c` entries for `chain`, leaf first.
pub fn x5c_of(chain: &[&TestCert]) -> Vec<String> {
    chain.iter().map(|c| c.b64()).collect()
}
