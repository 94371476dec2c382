// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! X.509 path building and trusted-entity matching for `x5c` chains.
//!
//! The flow is:
//! 1. decode the presented chain ([`parse_chain`]) and the trust-list certificates
//!    ([`parse_trust_anchors`])
//! 2. build a signature-verified path from the leaf to an anchor ([`build_path`])
//! 3. find the trusted entity whose service certificate accounts for that path, and
//!    pair it with the same entity's revocation certificate
//!    ([`path_matches_trusted_entities`] or the indexed [`TrustedEntityIndex`])

pub mod certificate;
pub mod error;
pub mod index;
pub mod matcher;
pub mod path;
mod cert_signature;

pub use certificate::{decode_cert_value, is_ca, is_time_valid, parse_certificate_der, parse_chain, parse_trust_anchors, Certificate};
pub use error::X509Error;
pub use index::{IndexedServiceCert, TrustedEntityIndex};
pub use matcher::{path_matches_trusted_entities, MatchMode, MatchedTrustedEntity, PinnedCertMode, ServiceTypeMatcher};
pub use path::build_path;
