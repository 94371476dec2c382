// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use sha2::{Digest as _, Sha256};

/// One certificate tagged with the role it plays for its entity.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TrustedEntityServiceCert {
    /// Service type URI, e.g. `http://uri.etsi.org/19602/SvcType/PID/Issuance`.
    pub service_type_identifier: String,
    /// Base64 DER certificate, as found in the document.
    pub cert_value: String,
}

/// One organization and every certificate it operates.
///
/// Services of the same entity are jointly trusted: an issuance certificate may
/// only be paired with a revocation certificate from the same entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrustedEntity {
    pub entity_id: Option<String>,
    pub services: Vec<TrustedEntityServiceCert>,
}

impl TrustedEntity {
    pub fn display_name(&self) -> &str {
        self.entity_id.as_deref().unwrap_or("<unnamed entity>")
    }

    pub fn has_service_type(&self, service_type: &str) -> bool {
        self.services
            .iter()
            .any(|s| s.service_type_identifier == service_type)
    }

    /// First service whose type ends in `/Revocation`.
    pub fn revocation_service(&self) -> Option<&TrustedEntityServiceCert> {
        self.services
            .iter()
            .find(|s| s.service_type_identifier.ends_with(crate::REVOCATION_SERVICE_SUFFIX))
    }

    /// Stable identity of the entity: SHA-256 over its id and all of its services.
    ///
    /// Display names are not unique across trust lists, so entity equality is
    /// decided on this value.
    pub fn fingerprint(&self) -> String {
        let mut h = Sha256::new();
        h.update(self.entity_id.as_deref().unwrap_or("").as_bytes());
        h.update([0u8]);
        for s in &self.services {
            h.update(s.service_type_identifier.as_bytes());
            h.update([0u8]);
            h.update(s.cert_value.as_bytes());
            h.update([0u8]);
        }
        hex::encode_upper(h.finalize())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrustListInfo {
    pub version: Option<u32>,
    pub sequence_number: Option<u64>,
    pub list_issue_date_time: Option<String>,
    pub next_update: Option<String>,
    pub scheme_territory: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedTrustList {
    pub info: TrustListInfo,
    pub entities: Vec<TrustedEntity>,
}
