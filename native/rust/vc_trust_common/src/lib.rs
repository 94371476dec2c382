// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Shared plumbing for the credential trust crates.
//!
//! This crate exists to prevent circular dependencies between the trust-list,
//! X.509 and status-list crates. It holds:
//! - compact JWS decoding and ES256 verification ([`jws`])
//! - tolerant base64 helpers for `x5c` entries and JWS segments ([`encoding`])
//! - the [`fetch::DocumentFetcher`] seam and its blocking HTTP implementation

pub mod encoding;
pub mod fetch;
pub mod jws;

pub use fetch::{DocumentFetcher, FetchError, HttpDocumentFetcher};
pub use jws::{CompactJws, JwsError, JwsHeader};

/// Current wall-clock time as unix seconds.
pub fn unix_now() -> i64 {
    chrono::Utc::now().timestamp()
}

#[cfg(test)]
mod tests {
    #[test]
    fn unix_now_reads_the_wall_clock() {
        let now = super::unix_now();
        assert!(now > 1_700_000_000, "{now}");
        assert!((now - chrono::Utc::now().timestamp()).abs() <= 1);
    }
}
