// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use serde::Deserialize;
use sha2::{Digest as _, Sha256};

/// One LoTE document location.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoteSource {
    pub url: String,
    /// PEM `PUBLIC KEY` or `CERTIFICATE` the document signature must verify under.
    /// Without one the document is accepted unverified.
    #[serde(default, alias = "verifierKey")]
    pub verifier_key: Option<String>,
}

impl LoteSource {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            verifier_key: None,
        }
    }

    pub fn with_verifier_key(mut self, pem: impl Into<String>) -> Self {
        self.verifier_key = Some(pem.into());
        self
    }
}

/// The trust lists a verifier consults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TrustListSource {
    #[serde(default)]
    pub lotes: Vec<LoteSource>,
    /// When set, only entities offering at least one of these service types are kept.
    #[serde(default, alias = "acceptedServiceTypes")]
    pub accepted_service_types: Option<Vec<String>>,
}

impl TrustListSource {
    pub fn new(lotes: Vec<LoteSource>) -> Self {
        Self {
            lotes,
            accepted_service_types: None,
        }
    }

    pub fn with_accepted_service_types<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.accepted_service_types = Some(types.into_iter().map(Into::into).collect());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.lotes.is_empty()
    }

    pub fn urls(&self) -> Vec<&str> {
        self.lotes.iter().map(|l| l.url.as_str()).collect()
    }

    /// Canonical cache key: SHA-256 over the sorted URLs (with their verifier keys)
    /// and the sorted accepted service types.
    pub fn fingerprint(&self) -> String {
        let mut lotes: Vec<(&str, &str)> = self
            .lotes
            .iter()
            .map(|l| (l.url.as_str(), l.verifier_key.as_deref().map(str::trim).unwrap_or("")))
            .collect();
        lotes.sort_unstable();
        lotes.dedup();

        let mut h = Sha256::new();
        for (url, key) in lotes {
            h.update(b"url\0");
            h.update(url.as_bytes());
            h.update(b"\0key\0");
            h.update(key.as_bytes());
            h.update([0u8]);
        }

        match &self.accepted_service_types {
            None => h.update(b"types:*"),
            Some(types) => {
                let mut types: Vec<&str> = types.iter().map(String::as_str).collect();
                types.sort_unstable();
                types.dedup();
                h.update(b"types:");
                for t in types {
                    h.update(t.as_bytes());
                    h.update([0u8]);
                }
            }
        }

        hex::encode(h.finalize())
    }
}
