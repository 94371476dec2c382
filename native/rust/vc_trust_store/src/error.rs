// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use vc_trust_common::FetchError;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TrustStoreError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("invalid_verifier_key: {url}: {message}")]
    InvalidVerifierKey { url: String, message: String },

    #[error("signature_invalid: trust list {url}: {message}")]
    SignatureInvalid { url: String, message: String },

    #[error("malformed_document: trust list {url}: {message}")]
    MalformedDocument { url: String, message: String },
}

impl TrustStoreError {
    /// The trust-list URL the failure belongs to.
    pub fn url(&self) -> &str {
        match self {
            TrustStoreError::Fetch(e) => e.url(),
            TrustStoreError::InvalidVerifierKey { url, .. }
            | TrustStoreError::SignatureInvalid { url, .. }
            | TrustStoreError::MalformedDocument { url, .. } => url,
        }
    }
}
