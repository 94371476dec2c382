// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum X509Error {
    #[error("malformed_certificate: {0}")]
    MalformedCertificate(String),

    #[error("chain_build_failed: {0}")]
    ChainBuildFailed(String),
}
