// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::sync::Arc;

/// A fetched value with its freshness hints.
#[derive(Debug)]
pub struct CachedValue<T> {
    pub value: Arc<T>,
    pub fetched_at_unix: i64,
    /// Seconds the publisher allows the value to be cached.
    pub ttl: Option<u64>,
    /// Absolute expiry (unix seconds).
    pub exp: Option<i64>,
}

impl<T> Clone for CachedValue<T> {
    fn clone(&self) -> Self {
        Self {
            value: self.value.clone(),
            fetched_at_unix: self.fetched_at_unix,
            ttl: self.ttl,
            exp: self.exp,
        }
    }
}

impl<T> CachedValue<T> {
    pub fn new(value: Arc<T>, fetched_at_unix: i64, ttl: Option<u64>, exp: Option<i64>) -> Self {
        Self {
            value,
            fetched_at_unix,
            ttl,
            exp,
        }
    }

    /// `exp` wins when present, then `ttl`, then `default_ttl_secs`.
    pub fn is_expired_at(&self, now_unix: i64, default_ttl_secs: u64) -> bool {
        if let Some(exp) = self.exp {
            return now_unix >= exp;
        }
        let ttl = self.ttl.unwrap_or(default_ttl_secs);
        now_unix >= self.fetched_at_unix.saturating_add(i64::try_from(ttl).unwrap_or(i64::MAX))
    }
}
