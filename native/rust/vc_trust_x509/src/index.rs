// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use crate::certificate::{decode_cert_value, parse_certificate_der, Certificate};
use crate::matcher::{match_service_cert, MatchedTrustedEntity, PinnedCertMode, ServiceTypeMatcher};
use std::collections::HashMap;
use vc_trust_lote::TrustedEntity;

/// A decoded trust-list certificate and where it came from.
#[derive(Debug, Clone)]
pub struct IndexedServiceCert {
    pub entity_index: usize,
    pub service_index: usize,
    pub service_type: String,
    pub cert: Certificate,
}

/// Trusted entities with every service certificate decoded once and indexed by thumbprint.
///
/// Lookups resolve to the same entity/service as [`crate::path_matches_trusted_entities`]:
/// the lowest entity position wins, then the lowest service position.
#[derive(Debug, Clone, Default)]
pub struct TrustedEntityIndex {
    entities: Vec<TrustedEntity>,
    certs: Vec<IndexedServiceCert>,
    by_thumbprint: HashMap<String, Vec<usize>>,
}

impl TrustedEntityIndex {
    pub fn build(entities: Vec<TrustedEntity>) -> Self {
        let mut certs: Vec<IndexedServiceCert> = Vec::new();
        let mut by_thumbprint: HashMap<String, Vec<usize>> = HashMap::new();

        for (entity_index, entity) in entities.iter().enumerate() {
            for (service_index, service) in entity.services.iter().enumerate() {
                let cert = match decode_cert_value(&service.cert_value).and_then(|der| parse_certificate_der(&der)) {
                    Ok(c) => c,
                    Err(e) => {
                        tracing::warn!(
                            entity = entity.display_name(),
                            service_type = %service.service_type_identifier,
                            error = %e,
                            "skipping unparseable trust anchor"
                        );
                        continue;
                    }
                };

                let slot = by_thumbprint.entry(cert.thumbprint().to_string()).or_default();
                if let Some(&first_pos) = slot.first() {
                    let first = &certs[first_pos];
                    if first.entity_index != entity_index {
                        tracing::warn!(
                            thumbprint = cert.thumbprint(),
                            first_entity = entities[first.entity_index].display_name(),
                            duplicate_entity = entity.display_name(),
                            "certificate listed under more than one trusted entity; the first entity wins"
                        );
                    }
                }
                slot.push(certs.len());
                certs.push(IndexedServiceCert {
                    entity_index,
                    service_index,
                    service_type: service.service_type_identifier.clone(),
                    cert,
                });
            }
        }

        Self {
            entities,
            certs,
            by_thumbprint,
        }
    }

    pub fn entities(&self) -> &[TrustedEntity] {
        &self.entities
    }

    /// Decoded service certificates in store order.
    pub fn service_certs(&self) -> &[IndexedServiceCert] {
        &self.certs
    }

    /// Certificates of every service whose type satisfies `service_type`, in store order.
    pub fn anchors_for(&self, service_type: &ServiceTypeMatcher) -> Vec<Certificate> {
        self.certs
            .iter()
            .filter(|c| service_type.matches(&c.service_type))
            .map(|c| c.cert.clone())
            .collect()
    }

    fn lookup(&self, thumbprint: &str) -> impl Iterator<Item = (usize, &IndexedServiceCert)> {
        self.by_thumbprint
            .get(thumbprint)
            .into_iter()
            .flatten()
            .map(move |&i| (i, &self.certs[i]))
    }

    pub fn match_path(
        &self,
        path: &[Certificate],
        pinned_mode: PinnedCertMode,
        service_type: &ServiceTypeMatcher,
    ) -> Option<MatchedTrustedEntity> {
        let leaf = path.first()?;
        let terminal = path.last()?;

        let candidates = self
            .lookup(terminal.thumbprint())
            .chain(self.lookup(leaf.thumbprint()));

        let (_, best, mode) = candidates
            .filter(|(_, c)| service_type.matches(&c.service_type))
            .filter_map(|(pos, c)| match_service_cert(path, &c.cert, pinned_mode).map(|m| (pos, c, m)))
            .min_by_key(|(pos, _, _)| *pos)?;

        let entity = &self.entities[best.entity_index];
        Some(MatchedTrustedEntity::new(
            entity,
            best.entity_index,
            &best.service_type,
            &best.cert,
            mode,
        ))
    }
}
