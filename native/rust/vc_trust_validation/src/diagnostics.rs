// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::fmt::Write as _;
use vc_trust_store::{TrustListSource, TrustStore};
use vc_trust_x509::{Certificate, ServiceTypeMatcher};

const MAX_LISTED_ENTITIES: usize = 5;

/// Context appended to every chain validation failure.
pub(crate) struct FailureContext<'a> {
    pub leaf: Option<&'a Certificate>,
    pub source: &'a TrustListSource,
    pub store: Option<&'a TrustStore>,
    pub service_type: &'a ServiceTypeMatcher,
    pub list_allowed_thumbprints: bool,
}

impl FailureContext<'_> {
    pub fn describe(&self, message: &str) -> String {
        let mut out = String::from(message);

        match self.leaf {
            Some(leaf) => {
                let _ = write!(
                    out,
                    "\npresented leaf: subject='{}' issuer='{}' serial={} thumbprint={}",
                    leaf.subject(),
                    leaf.issuer(),
                    leaf.serial_hex(),
                    leaf.thumbprint()
                );
            }
            None => out.push_str("\npresented leaf: <not decoded>"),
        }

        let _ = write!(out, "\ntrust lists: {}", self.source.urls().join(", "));
        let _ = write!(out, "\nservice type filter: {}", self.service_type);

        let Some(store) = self.store else {
            return out;
        };

        let entities = store.entities();
        let _ = write!(out, "\nloaded entities ({}):", entities.len());
        for entity in entities.iter().take(MAX_LISTED_ENTITIES) {
            let mut types: Vec<&str> = entity
                .services
                .iter()
                .map(|s| s.service_type_identifier.as_str())
                .collect();
            types.dedup();
            let _ = write!(
                out,
                "\n  - '{}': {} service cert(s) [{}]",
                entity.display_name(),
                entity.services.len(),
                types.join(", ")
            );
        }
        if entities.len() > MAX_LISTED_ENTITIES {
            let _ = write!(out, "\n  ... and {} more", entities.len() - MAX_LISTED_ENTITIES);
        }

        if self.list_allowed_thumbprints {
            let allowed: Vec<String> = store
                .index()
                .service_certs()
                .iter()
                .filter(|c| self.service_type.matches(&c.service_type))
                .map(|c| {
                    format!(
                        "{} ({}, {}{})",
                        c.cert.thumbprint(),
                        entities[c.entity_index].display_name(),
                        c.service_type,
                        if c.cert.is_ca() { ", CA" } else { ", pinned" }
                    )
                })
                .collect();
            if allowed.is_empty() {
                let _ = write!(out, "\nallowed thumbprints: none for this service type");
            } else {
                let _ = write!(out, "\nallowed thumbprints ({}):", allowed.len());
                for a in allowed {
                    let _ = write!(out, "\n  - {a}");
                }
            }
        }

        out
    }
}
