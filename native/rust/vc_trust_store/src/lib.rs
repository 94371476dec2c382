// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Trust store: configured LoTE documents fetched, verified, parsed and merged.
//!
//! Stores are cached per [`TrustListSource::fingerprint`], so call sites configured
//! with different trust lists never observe each other's cached store.

pub mod error;
pub mod provider;
pub mod source;
pub mod store;

pub use error::TrustStoreError;
pub use provider::{TrustStoreProvider, DEFAULT_TRUST_LIST_CACHE_TTL, DEFAULT_TRUST_LIST_FETCH_TIMEOUT};
pub use source::{LoteSource, TrustListSource};
pub use store::TrustStore;
