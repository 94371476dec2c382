// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Token status lists: fetching, caching and evaluating revocation status.
//!
//! A status list is a signed JWT (`typ: statuslist+jwt`) carrying a zlib-compressed,
//! bit-packed array. Each fetched token is cached once per URI and serves both the
//! signature/binding check (raw JWS and `x5c`) and the status lookup (decoded list).

pub mod cache;
pub mod entry;
pub mod error;
pub mod list;
pub mod token;
pub mod verifier;

pub use cache::CachedValue;
pub use entry::{status_entry_from_jwt, StatusListEntry};
pub use error::StatusListError;
pub use list::{StatusCheckResult, StatusList, STATUS_INVALID, STATUS_SUSPENDED, STATUS_VALID};
pub use token::{StatusListToken, STATUS_LIST_JWT_TYP};
pub use verifier::{StatusListCacheStats, StatusListVerifier, DEFAULT_STATUS_LIST_FETCH_TIMEOUT, DEFAULT_STATUS_LIST_TTL};
