// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Matching a built path against trusted entities.
//!
//! A trust-list certificate that is a CA accounts for a path when it is the path's
//! terminal certificate. A non-CA certificate is pinned: depending on
//! [`PinnedCertMode`] it must be the path's leaf or its terminal certificate.

use crate::certificate::{decode_cert_value, parse_certificate_der, Certificate};
use serde::Deserialize;
use std::fmt;
use vc_trust_lote::TrustedEntity;

/// How a service type identifier is compared against a filter.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(from = "String")]
pub enum ServiceTypeMatcher {
    /// Matches any type ending in the value, e.g. `/Issuance`.
    Suffix(String),
    /// Matches the full URI only.
    Exact(String),
}

impl ServiceTypeMatcher {
    /// A filter starting with `/` is a suffix filter; anything else is exact.
    pub fn parse(filter: &str) -> Self {
        if filter.starts_with('/') {
            ServiceTypeMatcher::Suffix(filter.to_string())
        } else {
            ServiceTypeMatcher::Exact(filter.to_string())
        }
    }

    pub fn issuance() -> Self {
        ServiceTypeMatcher::Suffix(vc_trust_lote::ISSUANCE_SERVICE_SUFFIX.to_string())
    }

    pub fn revocation() -> Self {
        ServiceTypeMatcher::Suffix(vc_trust_lote::REVOCATION_SERVICE_SUFFIX.to_string())
    }

    pub fn matches(&self, service_type: &str) -> bool {
        match self {
            ServiceTypeMatcher::Suffix(s) => service_type.ends_with(s.as_str()),
            ServiceTypeMatcher::Exact(s) => service_type == s,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            ServiceTypeMatcher::Suffix(s) | ServiceTypeMatcher::Exact(s) => s,
        }
    }
}

impl From<String> for ServiceTypeMatcher {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

impl From<&str> for ServiceTypeMatcher {
    fn from(value: &str) -> Self {
        Self::parse(value)
    }
}

impl fmt::Display for ServiceTypeMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceTypeMatcher::Suffix(s) => write!(f, "*{s}"),
            ServiceTypeMatcher::Exact(s) => f.write_str(s),
        }
    }
}

/// Which end of the path a pinned (non-CA) certificate must equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PinnedCertMode {
    #[default]
    Leaf,
    PathEnd,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchMode {
    Ca,
    LeafPinned,
    PathEndPinned,
}

impl MatchMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchMode::Ca => "ca",
            MatchMode::LeafPinned => "leaf-pinned",
            MatchMode::PathEndPinned => "pathEnd-pinned",
        }
    }
}

impl fmt::Display for MatchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The entity and service certificate that account for a path, plus that entity's
/// revocation certificate when it has one.
#[derive(Debug, Clone)]
pub struct MatchedTrustedEntity {
    pub entity: TrustedEntity,
    /// Position of the entity in the trust store it was matched against.
    pub entity_index: usize,
    pub service_type: String,
    pub issuance_cert: Certificate,
    pub issuance_thumbprint: String,
    pub issuance_is_ca: bool,
    pub match_mode: MatchMode,
    pub revocation_cert: Option<Certificate>,
    pub revocation_thumbprint: Option<String>,
    pub revocation_is_ca: Option<bool>,
}

impl MatchedTrustedEntity {
    pub fn entity_fingerprint(&self) -> String {
        self.entity.fingerprint()
    }

    /// True when both matches resolved to the same trusted entity.
    pub fn is_same_entity(&self, other: &MatchedTrustedEntity) -> bool {
        self.entity_fingerprint() == other.entity_fingerprint()
    }

    pub(crate) fn new(
        entity: &TrustedEntity,
        entity_index: usize,
        service_type: &str,
        cert: &Certificate,
        match_mode: MatchMode,
    ) -> Self {
        let revocation = resolve_revocation_cert(entity);
        Self {
            entity: entity.clone(),
            entity_index,
            service_type: service_type.to_string(),
            issuance_thumbprint: cert.thumbprint().to_string(),
            issuance_is_ca: cert.is_ca(),
            issuance_cert: cert.clone(),
            match_mode,
            revocation_thumbprint: revocation.as_ref().map(|c| c.thumbprint().to_string()),
            revocation_is_ca: revocation.as_ref().map(|c| c.is_ca()),
            revocation_cert: revocation,
        }
    }
}

/// Decode the entity's first `/Revocation` service certificate.
pub(crate) fn resolve_revocation_cert(entity: &TrustedEntity) -> Option<Certificate> {
    let service = entity.revocation_service()?;
    match decode_cert_value(&service.cert_value).and_then(|der| parse_certificate_der(&der)) {
        Ok(c) => Some(c),
        Err(e) => {
            tracing::warn!(
                entity = entity.display_name(),
                error = %e,
                "revocation certificate of trusted entity could not be decoded"
            );
            None
        }
    }
}

/// Decide whether `trusted` accounts for `path`.
pub(crate) fn match_service_cert(path: &[Certificate], trusted: &Certificate, pinned_mode: PinnedCertMode) -> Option<MatchMode> {
    let leaf = path.first()?;
    let terminal = path.last()?;

    if trusted.is_ca() {
        return (terminal == trusted).then_some(MatchMode::Ca);
    }

    match pinned_mode {
        PinnedCertMode::Leaf => (leaf == trusted).then_some(MatchMode::LeafPinned),
        PinnedCertMode::PathEnd => (terminal == trusted).then_some(MatchMode::PathEndPinned),
    }
}

/// Linear first-match search over `entities` in list order, then service order.
pub fn path_matches_trusted_entities(
    path: &[Certificate],
    entities: &[TrustedEntity],
    pinned_mode: PinnedCertMode,
    service_type: &ServiceTypeMatcher,
) -> Option<MatchedTrustedEntity> {
    if path.is_empty() {
        return None;
    }

    for (entity_index, entity) in entities.iter().enumerate() {
        for service in entity
            .services
            .iter()
            .filter(|s| service_type.matches(&s.service_type_identifier))
        {
            let cert = match decode_cert_value(&service.cert_value).and_then(|der| parse_certificate_der(&der)) {
                Ok(c) => c,
                Err(e) => {
                    tracing::warn!(entity = entity.display_name(), error = %e, "skipping undecodable service certificate");
                    continue;
                }
            };

            if let Some(mode) = match_service_cert(path, &cert, pinned_mode) {
                return Some(MatchedTrustedEntity::new(
                    entity,
                    entity_index,
                    &service.service_type_identifier,
                    &cert,
                    mode,
                ));
            }
        }
    }

    None
}
