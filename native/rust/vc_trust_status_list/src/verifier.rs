// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use crate::cache::CachedValue;
use crate::error::StatusListError;
use crate::list::{StatusCheckResult, StatusList};
use crate::token::StatusListToken;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use vc_trust_common::{unix_now, DocumentFetcher};

pub const DEFAULT_STATUS_LIST_FETCH_TIMEOUT: Duration = Duration::from_millis(10_000);
pub const DEFAULT_STATUS_LIST_TTL: Duration = Duration::from_secs(300);

const STATUS_LIST_ACCEPT: &str = "application/statuslist+jwt";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusListCacheStats {
    /// Cached decoded lists.
    pub size: usize,
    /// Cached raw tokens.
    pub jwt_cache_size: usize,
    pub uris: Vec<String>,
}

/// Fetches status list tokens and caches each one per URI.
pub struct StatusListVerifier {
    fetcher: Arc<dyn DocumentFetcher>,
    fetch_timeout: Duration,
    default_ttl: Duration,
    cache: RwLock<HashMap<String, CachedValue<StatusListToken>>>,
}

impl StatusListVerifier {
    pub fn new(fetcher: Arc<dyn DocumentFetcher>, fetch_timeout: Duration, default_ttl: Duration) -> Self {
        Self {
            fetcher,
            fetch_timeout,
            default_ttl,
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// The cached token for `uri`, fetching it when absent or expired.
    pub fn get_status_list_token(&self, uri: &str) -> Result<Arc<StatusListToken>, StatusListError> {
        let now = unix_now();
        if let Some(cached) = self.cache.read().get(uri) {
            if !cached.is_expired_at(now, self.default_ttl.as_secs()) {
                tracing::debug!(uri, "status list cache hit");
                return Ok(cached.value.clone());
            }
        }

        tracing::debug!(uri, timeout_ms = self.fetch_timeout.as_millis() as u64, "fetching status list");
        let raw = self.fetcher.fetch(uri, STATUS_LIST_ACCEPT, self.fetch_timeout)?;
        let token = Arc::new(StatusListToken::parse(uri, &raw)?);

        let cached = CachedValue::new(token.clone(), unix_now(), token.ttl(), token.exp());
        self.cache.write().insert(uri.to_string(), cached);
        Ok(token)
    }

    pub fn get_status_list(&self, uri: &str) -> Result<Arc<StatusList>, StatusListError> {
        Ok(self.get_status_list_token(uri)?.list().clone())
    }

    /// The raw status list JWT, for re-verification.
    pub fn get_status_list_jwt(&self, uri: &str) -> Result<String, StatusListError> {
        Ok(self.get_status_list_token(uri)?.raw().to_string())
    }

    pub fn check_status(&self, uri: &str, idx: u64) -> Result<StatusCheckResult, StatusListError> {
        let token = self.get_status_list_token(uri)?;
        Self::status_at(&token, idx)
    }

    /// Look `idx` up in an already fetched token.
    pub fn status_at(token: &StatusListToken, idx: u64) -> Result<StatusCheckResult, StatusListError> {
        let list = token.list();
        let status = list.get(idx).ok_or_else(|| StatusListError::IndexOutOfRange {
            uri: token.uri().to_string(),
            idx,
            len: list.len(),
        })?;
        Ok(StatusCheckResult::from_status(status))
    }

    pub fn clear_cache(&self) {
        self.cache.write().clear();
        tracing::debug!("status list cache cleared");
    }

    pub fn stats(&self) -> StatusListCacheStats {
        let cache = self.cache.read();
        let mut uris: Vec<String> = cache.keys().cloned().collect();
        uris.sort();
        StatusListCacheStats {
            size: cache.len(),
            jwt_cache_size: cache.len(),
            uris,
        }
    }
}
