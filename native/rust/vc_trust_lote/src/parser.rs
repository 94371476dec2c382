// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use crate::document::{LoteDocument, RawService, RawTrustedEntity};
use crate::error::LoteError;
use crate::types::{ParsedTrustList, TrustListInfo, TrustedEntity, TrustedEntityServiceCert};

/// Parse a decoded LoTE JSON payload.
///
/// The payload may be the bare list (`{"ListAndSchemeInformation": ...}`) or wrapped
/// in a top-level `LoTE` member.
pub fn parse_lote_json(payload: &[u8]) -> Result<ParsedTrustList, LoteError> {
    let value: serde_json::Value =
        serde_json::from_slice(payload).map_err(|e| LoteError::MalformedDocument(format!("invalid JSON: {e}")))?;

    let body = match value.get("LoTE") {
        Some(inner) => inner.clone(),
        None => value,
    };

    let doc: LoteDocument = serde_json::from_value(body)
        .map_err(|e| LoteError::MalformedDocument(format!("not a LoTE document: {e}")))?;

    Ok(parse_lote(&doc))
}

/// Normalize a LoTE document into entities with one service entry per certificate.
///
/// Untyped services and services without certificates are skipped; an entity left
/// with no service certificates is dropped. Source order is preserved.
pub fn parse_lote(doc: &LoteDocument) -> ParsedTrustList {
    let si = &doc.scheme_information;
    let info = TrustListInfo {
        version: si.version,
        sequence_number: si.sequence_number,
        list_issue_date_time: si.list_issue_date_time.as_ref().map(|d| d.as_str().to_string()),
        next_update: si
            .next_update
            .as_ref()
            .map(|d| d.as_str().trim().to_string())
            .filter(|s| !s.is_empty()),
        scheme_territory: si.scheme_territory.clone(),
    };

    let entities = doc
        .trusted_entities
        .iter()
        .flatten()
        .filter_map(parse_entity)
        .collect();

    ParsedTrustList { info, entities }
}

fn parse_entity(raw: &RawTrustedEntity) -> Option<TrustedEntity> {
    let entity_id = raw
        .information
        .as_ref()
        .and_then(|i| i.names.as_ref())
        .and_then(|names| names.first())
        .map(|n| n.value().to_string());

    let mut services = Vec::new();
    for service in raw.services.iter().flatten() {
        services.extend(parse_service(service));
    }

    if services.is_empty() {
        tracing::debug!(
            entity = entity_id.as_deref().unwrap_or("<unnamed entity>"),
            "dropping trusted entity without usable service certificates"
        );
        return None;
    }

    Some(TrustedEntity { entity_id, services })
}

fn parse_service(raw: &RawService) -> Vec<TrustedEntityServiceCert> {
    let Some(info) = raw.information.as_ref() else {
        return Vec::new();
    };
    let Some(service_type) = info
        .service_type_identifier
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
    else {
        return Vec::new();
    };

    info.digital_identity
        .iter()
        .flat_map(|d| d.x509_certificates.iter().flatten())
        .map(|c| c.value().trim())
        .filter(|v| !v.is_empty())
        .map(|v| TrustedEntityServiceCert {
            service_type_identifier: service_type.to_string(),
            cert_value: v.to_string(),
        })
        .collect()
}

/// Keep entities that offer at least one of `accepted_types`.
///
/// Kept entities retain all of their services, so an entity selected for its issuance
/// service still carries its revocation service.
pub fn filter_by_service_types(parsed: &ParsedTrustList, accepted_types: &[String]) -> ParsedTrustList {
    let entities = parsed
        .entities
        .iter()
        .filter(|e| accepted_types.iter().any(|t| e.has_service_type(t)))
        .cloned()
        .collect();

    ParsedTrustList {
        info: parsed.info.clone(),
        entities,
    }
}
