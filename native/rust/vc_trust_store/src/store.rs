// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use chrono::DateTime;
use vc_trust_lote::TrustedEntity;
use vc_trust_x509::TrustedEntityIndex;

/// Merged trusted entities of every configured LoTE. Never mutated after construction.
#[derive(Debug, Clone)]
pub struct TrustStore {
    pub fetched_at_unix: i64,
    /// First non-empty `NextUpdate` across the sources, as published.
    pub next_update: Option<String>,
    index: TrustedEntityIndex,
}

impl TrustStore {
    pub fn new(fetched_at_unix: i64, next_update: Option<String>, entities: Vec<TrustedEntity>) -> Self {
        Self {
            fetched_at_unix,
            next_update,
            index: TrustedEntityIndex::build(entities),
        }
    }

    pub fn entities(&self) -> &[TrustedEntity] {
        self.index.entities()
    }

    pub fn index(&self) -> &TrustedEntityIndex {
        &self.index
    }

    /// `next_update` as unix seconds, when it is a valid RFC 3339 timestamp.
    pub fn next_update_unix(&self) -> Option<i64> {
        let raw = self.next_update.as_deref()?;
        match DateTime::parse_from_rfc3339(raw) {
            Ok(t) => Some(t.timestamp()),
            Err(e) => {
                tracing::warn!(next_update = raw, error = %e, "trust list NextUpdate is not RFC 3339; ignoring it");
                None
            }
        }
    }

    /// True when the publisher's `NextUpdate` lies in the past.
    pub fn is_stale(&self, now_unix: i64) -> bool {
        self.next_update_unix().is_some_and(|t| t < now_unix)
    }

    pub fn age_secs(&self, now_unix: i64) -> i64 {
        now_unix - self.fetched_at_unix
    }
}
