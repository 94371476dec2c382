// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use vc_trust_common::FetchError;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StatusListError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("malformed_document: status list {uri}: {message}")]
    Malformed { uri: String, message: String },

    #[error("status_index_out_of_range: status list {uri} has {len} entries, index {idx} requested")]
    IndexOutOfRange { uri: String, idx: u64, len: u64 },
}

impl StatusListError {
    pub fn uri(&self) -> &str {
        match self {
            StatusListError::Fetch(e) => e.url(),
            StatusListError::Malformed { uri, .. } | StatusListError::IndexOutOfRange { uri, .. } => uri,
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, StatusListError::Fetch(e) if e.is_timeout())
    }
}
