// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoteError {
    #[error("malformed_document: {0}")]
    MalformedDocument(String),
}
