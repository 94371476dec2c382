// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! List of Trusted Entities (LoTE) parsing.
//!
//! A LoTE document groups X.509 certificates by the organization ("trusted
//! entity") that operates them and by the role each certificate plays
//! (issuance, revocation, wallet provider, ...). This crate turns the raw
//! document into a [`ParsedTrustList`]; it performs no I/O and no certificate
//! decoding.

pub mod document;
pub mod error;
pub mod parser;
pub mod types;

pub use error::LoteError;
pub use parser::{filter_by_service_types, parse_lote, parse_lote_json};
pub use types::{ParsedTrustList, TrustListInfo, TrustedEntity, TrustedEntityServiceCert};

/// Suffix shared by every revocation service type identifier.
pub const REVOCATION_SERVICE_SUFFIX: &str = "/Revocation";
/// Suffix shared by every issuance service type identifier.
pub const ISSUANCE_SERVICE_SUFFIX: &str = "/Issuance";
