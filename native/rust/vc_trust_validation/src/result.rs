// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Chain validation outcomes.
//!
//! Validation never fails with `Err`; failures are data carrying a stable code and a
//! diagnostic string detailed enough to debug trust configuration from logs alone.

use std::fmt;
use vc_trust_x509::MatchedTrustedEntity;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChainValidationErrorKind {
    X5cRequired,
    MalformedCertificate,
    FetchFailed,
    FetchTimeout,
    MalformedDocument,
    SignatureInvalid,
    TrustListStale,
    ChainBuildFailed,
    CertificateExpired,
    NoTrustedEntityMatch,
    RevocationBindingMismatch,
    CredentialRevoked,
    CredentialSuspended,
    CredentialStatusUnknown,
}

impl ChainValidationErrorKind {
    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            ChainValidationErrorKind::X5cRequired => "X5C_REQUIRED",
            ChainValidationErrorKind::MalformedCertificate => "CERT_MALFORMED",
            ChainValidationErrorKind::FetchFailed => "FETCH_FAILED",
            ChainValidationErrorKind::FetchTimeout => "FETCH_TIMEOUT",
            ChainValidationErrorKind::MalformedDocument => "DOCUMENT_MALFORMED",
            ChainValidationErrorKind::SignatureInvalid => "SIGNATURE_INVALID",
            ChainValidationErrorKind::TrustListStale => "TRUST_LIST_STALE",
            ChainValidationErrorKind::ChainBuildFailed => "CERT_CHAIN_BUILD_FAILED",
            ChainValidationErrorKind::CertificateExpired => "CERT_EXPIRED",
            ChainValidationErrorKind::NoTrustedEntityMatch => "NO_TRUSTED_ENTITY_MATCH",
            ChainValidationErrorKind::RevocationBindingMismatch => "REVOCATION_BINDING_MISMATCH",
            ChainValidationErrorKind::CredentialRevoked => "CREDENTIAL_REVOKED",
            ChainValidationErrorKind::CredentialSuspended => "CREDENTIAL_SUSPENDED",
            ChainValidationErrorKind::CredentialStatusUnknown => "CREDENTIAL_STATUS_UNKNOWN",
        }
    }
}

impl fmt::Display for ChainValidationErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Clone)]
pub struct ChainValidationResult {
    pub verified: bool,
    pub matched_entity: Option<MatchedTrustedEntity>,
    pub error: Option<ChainValidationErrorKind>,
    pub error_details: Option<String>,
}

impl ChainValidationResult {
    /// Accepted without an entity match (no `x5c`, or no trust source configured).
    pub fn pass() -> Self {
        Self {
            verified: true,
            matched_entity: None,
            error: None,
            error_details: None,
        }
    }

    pub fn matched(entity: MatchedTrustedEntity) -> Self {
        Self {
            verified: true,
            matched_entity: Some(entity),
            error: None,
            error_details: None,
        }
    }

    pub fn failure(kind: ChainValidationErrorKind, details: impl Into<String>) -> Self {
        Self {
            verified: false,
            matched_entity: None,
            error: Some(kind),
            error_details: Some(details.into()),
        }
    }

    pub fn error_code(&self) -> Option<&'static str> {
        self.error.map(|k| k.code())
    }
}

/// A confirmed negative outcome of a credential status check.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{}: {details}", .kind.code())]
pub struct CredentialStatusError {
    pub kind: ChainValidationErrorKind,
    pub details: String,
}

impl CredentialStatusError {
    pub fn new(kind: ChainValidationErrorKind, details: impl Into<String>) -> Self {
        Self {
            kind,
            details: details.into(),
        }
    }
}
