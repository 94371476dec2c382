// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::time::Duration;
use vc_trust_common::{DocumentFetcher, FetchError};

/// In-memory [`DocumentFetcher`] serving canned responses and counting requests per URL.
///
/// Unknown URLs answer HTTP 404.
#[derive(Default)]
pub struct StaticFetcher {
    responses: Mutex<HashMap<String, Result<String, FetchError>>>,
    counts: Mutex<HashMap<String, usize>>,
}

impl StaticFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_document(self, url: &str, body: impl Into<String>) -> Self {
        self.set_document(url, body);
        self
    }

    pub fn with_error(self, url: &str, error: FetchError) -> Self {
        self.responses.lock().insert(url.to_string(), Err(error));
        self
    }

    /// Replace the response for `url`.
    pub fn set_document(&self, url: &str, body: impl Into<String>) {
        self.responses.lock().insert(url.to_string(), Ok(body.into()));
    }

    pub fn fetch_count(&self, url: &str) -> usize {
        self.counts.lock().get(url).copied().unwrap_or(0)
    }

    pub fn total_fetches(&self) -> usize {
        self.counts.lock().values().sum()
    }
}

impl DocumentFetcher for StaticFetcher {
    fn fetch(&self, url: &str, _accept: &str, _timeout: Duration) -> Result<String, FetchError> {
        *self.counts.lock().entry(url.to_string()).or_default() += 1;
        self.responses
            .lock()
            .get(url)
            .cloned()
            .unwrap_or_else(|| {
                Err(FetchError::HttpStatus {
                    url: url.to_string(),
                    status: 404,
                })
            })
    }
}
