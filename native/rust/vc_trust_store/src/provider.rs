// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use crate::error::TrustStoreError;
use crate::source::{LoteSource, TrustListSource};
use crate::store::TrustStore;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use vc_trust_common::jws::verifying_key_from_pem;
use vc_trust_common::{unix_now, CompactJws, DocumentFetcher};
use vc_trust_lote::{filter_by_service_types, parse_lote_json, ParsedTrustList};

pub const DEFAULT_TRUST_LIST_FETCH_TIMEOUT: Duration = Duration::from_millis(4000);
pub const DEFAULT_TRUST_LIST_CACHE_TTL: Duration = Duration::from_secs(300);

const LOTE_ACCEPT: &str = "application/jwt, application/json";

/// Loads trust stores and caches them per source fingerprint.
pub struct TrustStoreProvider {
    fetcher: Arc<dyn DocumentFetcher>,
    fetch_timeout: Duration,
    cache: RwLock<HashMap<String, Arc<TrustStore>>>,
}

impl TrustStoreProvider {
    pub fn new(fetcher: Arc<dyn DocumentFetcher>, fetch_timeout: Duration) -> Self {
        Self {
            fetcher,
            fetch_timeout,
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// Cached store for `source` if younger than `cache_ttl`; otherwise fetch every
    /// LoTE again and replace the cache entry.
    ///
    /// A failing source fails the whole call; no previously cached store is
    /// substituted.
    pub fn get_trust_store(&self, source: &TrustListSource, cache_ttl: Duration) -> Result<Arc<TrustStore>, TrustStoreError> {
        let key = source.fingerprint();
        let now = unix_now();

        if let Some(store) = self.cache.read().get(&key).cloned() {
            if store.age_secs(now) < cache_ttl.as_secs() as i64 {
                tracing::debug!(source = %key, age_secs = store.age_secs(now), "trust store cache hit");
                return Ok(store);
            }
            tracing::debug!(source = %key, "trust store cache entry expired");
        }

        let store = Arc::new(self.load_trust_store(source)?);
        self.cache.write().insert(key, store.clone());
        Ok(store)
    }

    /// Fetch, verify, parse and merge every LoTE of `source`, bypassing the cache.
    pub fn load_trust_store(&self, source: &TrustListSource) -> Result<TrustStore, TrustStoreError> {
        let mut next_update = None;
        let mut entities = Vec::new();

        for lote in &source.lotes {
            let mut parsed = self.load_lote(lote)?;
            if let Some(types) = &source.accepted_service_types {
                parsed = filter_by_service_types(&parsed, types);
            }
            if next_update.is_none() {
                next_update = parsed.info.next_update.clone();
            }
            entities.extend(parsed.entities);
        }

        let store = TrustStore::new(unix_now(), next_update, entities);
        tracing::info!(
            sources = source.lotes.len(),
            entities = store.entities().len(),
            service_certs = store.index().service_certs().len(),
            next_update = store.next_update.as_deref().unwrap_or(""),
            "trust store rebuilt"
        );
        Ok(store)
    }

    fn load_lote(&self, lote: &LoteSource) -> Result<ParsedTrustList, TrustStoreError> {
        let body = self.fetcher.fetch(&lote.url, LOTE_ACCEPT, self.fetch_timeout)?;
        let payload = decode_lote_body(lote, &body)?;
        parse_lote_json(&payload).map_err(|e| TrustStoreError::MalformedDocument {
            url: lote.url.clone(),
            message: e.to_string(),
        })
    }

    pub fn clear_cache(&self) {
        self.cache.write().clear();
        tracing::debug!("trust store cache cleared");
    }

    pub fn cached_store_count(&self) -> usize {
        self.cache.read().len()
    }
}

/// Extract the LoTE JSON from a fetched body.
///
/// With a verifier key the body must be a JWS signed under that key. Without one,
/// a JWS is accepted unverified and plain JSON is accepted as is.
fn decode_lote_body(lote: &LoteSource, body: &str) -> Result<Vec<u8>, TrustStoreError> {
    let body = body.trim();
    let malformed = |message: String| TrustStoreError::MalformedDocument {
        url: lote.url.clone(),
        message,
    };

    let Some(pem) = lote.verifier_key.as_deref() else {
        if body.starts_with('{') {
            return Ok(body.as_bytes().to_vec());
        }
        let jws = CompactJws::parse(body).map_err(|e| malformed(e.to_string()))?;
        tracing::debug!(url = %lote.url, "no verifier key configured; accepting trust list signature unchecked");
        return Ok(jws.payload().to_vec());
    };

    let key = verifying_key_from_pem(pem).map_err(|e| TrustStoreError::InvalidVerifierKey {
        url: lote.url.clone(),
        message: e.to_string(),
    })?;
    let jws = CompactJws::parse(body).map_err(|e| malformed(format!("a signed trust list was expected: {e}")))?;
    jws.verify_es256(&key).map_err(|e| TrustStoreError::SignatureInvalid {
        url: lote.url.clone(),
        message: e.to_string(),
    })?;
    Ok(jws.payload().to_vec())
}
