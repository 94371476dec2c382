// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Credential trust validation.
//!
//! Entry points used by credential and attestation verifiers:
//! - [`TrustValidator::validate_chain`]: is this `x5c` chain anchored in the configured
//!   trust lists, and which trusted entity does it belong to?
//! - [`TrustValidator::verify_status_list_signature`]: is this status list signed by the
//!   revocation service of that same entity?
//! - [`TrustValidator::check_status`] / [`TrustValidator::check_credential_status`]: what
//!   does the status list say about the credential?
//!
//! Network I/O is blocking with per-request timeouts; async callers should run
//! validation on a blocking-capable thread.

pub mod config;
mod diagnostics;
pub mod policy;
pub mod result;
pub mod validator;

pub use config::{ConfigError, TrustValidationConfig};
pub use policy::ChainValidationPolicy;
pub use result::{ChainValidationErrorKind, ChainValidationResult, CredentialStatusError};
pub use validator::{CacheStats, TrustValidator};

pub use vc_trust_status_list::StatusCheckResult;
pub use vc_trust_store::{LoteSource, TrustListSource};
pub use vc_trust_x509::{MatchMode, MatchedTrustedEntity, PinnedCertMode, ServiceTypeMatcher};
