// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Test-only utilities for composing trust scenarios.
//!
//! This crate keeps certificate generation, document signing and the in-memory
//! transport out of the production crates while letting every crate's tests share
//! them.

pub mod certs;
pub mod documents;
pub mod fetcher;

pub use certs::{expired_leaf, intermediate_ca, leaf, root_ca, self_signed_leaf, x5c_of, TestCert};
pub use documents::{
    credential_jwt_with_status, lote_payload, pack_status_list, sign_es256_jws, signed_lote, status_list_jwt,
    LoteEntitySpec, StatusListJwtSpec,
};
pub use fetcher::StaticFetcher;

pub const PID_ISSUANCE: &str = "http://uri.etsi.org/19602/SvcType/PID/Issuance";
pub const PID_REVOCATION: &str = "http://uri.etsi.org/19602/SvcType/PID/Revocation";
pub const EAA_ISSUANCE: &str = "http://uri.etsi.org/19602/SvcType/EAA/Issuance";
pub const WALLET_PROVIDER: &str = "http://uri.etsi.org/19602/SvcType/WalletProvider";
pub const WALLET_PROVIDER_REVOCATION: &str = "http://uri.etsi.org/19602/SvcType/WalletProvider/Revocation";
