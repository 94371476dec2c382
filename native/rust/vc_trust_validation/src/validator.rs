// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use crate::config::TrustValidationConfig;
use crate::diagnostics::FailureContext;
use crate::policy::ChainValidationPolicy;
use crate::result::{ChainValidationErrorKind, ChainValidationResult, CredentialStatusError};
use once_cell::sync::Lazy;
use std::collections::HashSet;
use std::sync::Arc;
use vc_trust_common::{unix_now, DocumentFetcher, HttpDocumentFetcher};
use vc_trust_status_list::{
    status_entry_from_jwt, StatusCheckResult, StatusListError, StatusListVerifier, STATUS_INVALID, STATUS_SUSPENDED,
    STATUS_VALID,
};
use vc_trust_store::{TrustListSource, TrustStore, TrustStoreError, TrustStoreProvider};
use vc_trust_x509::{build_path, is_time_valid, parse_chain, Certificate, MatchedTrustedEntity};

static GLOBAL: Lazy<TrustValidator> =
    Lazy::new(|| TrustValidator::with_http(TrustValidationConfig::default()));

/// Sizes of the validator's caches.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub trust_stores: usize,
    pub size: usize,
    pub jwt_cache_size: usize,
    pub uris: Vec<String>,
}

/// Decides whether `x5c` chains are anchored in configured trust lists and whether a
/// credential's status list is attested by the entity that issued it.
///
/// Holds the trust-store and status-list caches; share one instance per process.
pub struct TrustValidator {
    config: TrustValidationConfig,
    trust_stores: TrustStoreProvider,
    status_lists: StatusListVerifier,
}

impl TrustValidator {
    pub fn new(fetcher: Arc<dyn DocumentFetcher>, config: TrustValidationConfig) -> Self {
        Self {
            trust_stores: TrustStoreProvider::new(fetcher.clone(), config.trust_list_fetch_timeout()),
            status_lists: StatusListVerifier::new(
                fetcher,
                config.status_list_fetch_timeout(),
                config.status_list_default_ttl(),
            ),
            config,
        }
    }

    pub fn with_http(config: TrustValidationConfig) -> Self {
        Self::new(Arc::new(HttpDocumentFetcher::new()), config)
    }

    /// Process-wide instance using HTTP and the default configuration.
    pub fn global() -> &'static TrustValidator {
        &GLOBAL
    }

    pub fn config(&self) -> &TrustValidationConfig {
        &self.config
    }

    /// The trust store for `source`, from cache while fresh.
    pub fn trust_store(&self, source: &TrustListSource) -> Result<Arc<TrustStore>, TrustStoreError> {
        self.trust_stores
            .get_trust_store(source, self.config.trust_list_cache_ttl())
    }

    /// Judge an `x5c` chain (leaf first) against `source` under `policy`.
    ///
    /// No `x5c` passes unless the policy requires one; no configured source passes
    /// without an entity match.
    pub fn validate_chain<S: AsRef<str>>(
        &self,
        x5c: &[S],
        source: Option<&TrustListSource>,
        policy: &ChainValidationPolicy,
    ) -> ChainValidationResult {
        if x5c.is_empty() {
            if policy.require_x5c {
                return ChainValidationResult::failure(
                    ChainValidationErrorKind::X5cRequired,
                    "an x5c certificate chain is required by policy but none was presented",
                );
            }
            return ChainValidationResult::pass();
        }

        let Some(source) = source.filter(|s| !s.is_empty()) else {
            tracing::debug!("no trust list configured; accepting x5c chain without trust evaluation");
            return ChainValidationResult::pass();
        };

        let mut ctx = FailureContext {
            leaf: None,
            source,
            store: None,
            service_type: &policy.service_type,
            list_allowed_thumbprints: false,
        };

        let chain = match parse_chain(x5c) {
            Ok(c) => c,
            Err(e) => return fail(&ctx, ChainValidationErrorKind::MalformedCertificate, &e.to_string()),
        };
        let Some(leaf) = chain.first() else {
            return fail(&ctx, ChainValidationErrorKind::MalformedCertificate, "x5c is empty");
        };
        ctx.leaf = Some(leaf);

        let store = match self.trust_store(source) {
            Ok(s) => s,
            Err(e) => return fail(&ctx, trust_store_error_kind(&e), &e.to_string()),
        };
        ctx.store = Some(store.as_ref());

        let now = unix_now();
        if self.config.reject_stale_trust_lists && store.is_stale(now) {
            let message = format!(
                "trust list is stale: NextUpdate {} has passed",
                store.next_update.as_deref().unwrap_or("")
            );
            return fail(&ctx, ChainValidationErrorKind::TrustListStale, &message);
        }

        // Only services of the requested type terminate a path; trust-list certs of other
        // types remain usable as intermediates.
        let index = store.index();
        let anchors = index.anchors_for(&policy.service_type);
        let path = match build_path(leaf, &chain, &anchors, &[]) {
            Ok(p) => p,
            Err(e) => {
                ctx.list_allowed_thumbprints = true;
                let all_anchors: Vec<Certificate> = index.service_certs().iter().map(|c| c.cert.clone()).collect();
                return match build_path(leaf, &chain, &all_anchors, &[]) {
                    Ok(other) => {
                        let terminal = other.last().unwrap_or(leaf);
                        let message = format!(
                            "path ends at '{}' (thumbprint {}), which is not a service of the accepted type",
                            terminal.subject(),
                            terminal.thumbprint()
                        );
                        fail(&ctx, ChainValidationErrorKind::NoTrustedEntityMatch, &message)
                    }
                    Err(_) => fail(&ctx, ChainValidationErrorKind::ChainBuildFailed, &e.to_string()),
                };
            }
        };

        if let Some(expired) = path.iter().find(|c| !is_time_valid(c, now)) {
            let message = format!(
                "certificate '{}' is outside its validity period (not_before={}, not_after={}, now={})",
                expired.subject(),
                expired.not_before_unix_seconds(),
                expired.not_after_unix_seconds(),
                now
            );
            return fail(&ctx, ChainValidationErrorKind::CertificateExpired, &message);
        }

        match index.match_path(&path, policy.pinned_cert_mode, &policy.service_type) {
            Some(matched) => {
                tracing::debug!(
                    entity = matched.entity.display_name(),
                    match_mode = %matched.match_mode,
                    service_type = %matched.service_type,
                    issuance_thumbprint = %matched.issuance_thumbprint,
                    "x5c chain matched trusted entity"
                );
                ChainValidationResult::matched(matched)
            }
            None => {
                ctx.list_allowed_thumbprints = true;
                let terminal = path.last().unwrap_or(leaf);
                let message = format!(
                    "no trusted entity accounts for the path ending at '{}' (thumbprint {}) under pinned mode {:?}",
                    terminal.subject(),
                    terminal.thumbprint(),
                    policy.pinned_cert_mode
                );
                fail(&ctx, ChainValidationErrorKind::NoTrustedEntityMatch, &message)
            }
        }
    }

    /// True when the status list signed with `status_list_x5c` may speak for the
    /// credential matched as `matched`.
    ///
    /// The status list signer must chain to a `/Revocation` service of the same
    /// trusted entity that issued the credential.
    pub fn verify_status_list_signature<S: AsRef<str>>(
        &self,
        status_list_x5c: &[S],
        matched: Option<&MatchedTrustedEntity>,
        source: Option<&TrustListSource>,
        policy: &ChainValidationPolicy,
    ) -> bool {
        let Some(matched) = matched else {
            return true;
        };
        if matched.revocation_cert.is_none() {
            tracing::warn!(
                entity = matched.entity.display_name(),
                "trusted entity has no revocation service; status list signer is not bound"
            );
            return true;
        }
        if status_list_x5c.is_empty() {
            tracing::warn!(entity = matched.entity.display_name(), "status list carries no x5c; cannot bind it to the issuing entity");
            return false;
        }

        let result = self.validate_chain(status_list_x5c, source, &policy.for_revocation());
        let Some(signer) = result.matched_entity else {
            tracing::warn!(
                entity = matched.entity.display_name(),
                error = result.error_code().unwrap_or(""),
                details = result.error_details.as_deref().unwrap_or(""),
                "status list signer is not a trusted revocation service"
            );
            return false;
        };

        if !signer.is_same_entity(matched) {
            tracing::warn!(
                credential_entity = matched.entity.display_name(),
                status_list_entity = signer.entity.display_name(),
                "status list is signed by a different trusted entity than the credential"
            );
            return false;
        }
        true
    }

    pub fn check_status(&self, uri: &str, idx: u64) -> Result<StatusCheckResult, StatusListError> {
        self.status_lists.check_status(uri, idx)
    }

    /// Evaluate the status claim of `credential_jwt`.
    ///
    /// `Ok(None)` when the credential has no status claim or the status list could
    /// not be retrieved. A revoked, suspended or unknown status, a forged status
    /// list and a status list from another entity are errors.
    pub fn check_credential_status(
        &self,
        credential_jwt: &str,
        matched: Option<&MatchedTrustedEntity>,
        source: Option<&TrustListSource>,
        policy: &ChainValidationPolicy,
    ) -> Result<Option<StatusCheckResult>, CredentialStatusError> {
        let Some(entry) = status_entry_from_jwt(credential_jwt) else {
            return Ok(None);
        };

        let token = match self.status_lists.get_status_list_token(&entry.uri) {
            Ok(t) => t,
            Err(e) => {
                tracing::warn!(
                    uri = %entry.uri,
                    idx = entry.idx,
                    timeout = e.is_timeout(),
                    error = %e,
                    "status list unavailable; continuing without status evidence"
                );
                return Ok(None);
            }
        };

        if token.x5c().is_some() {
            if let Err(e) = token.verify_signature() {
                return Err(CredentialStatusError::new(
                    ChainValidationErrorKind::SignatureInvalid,
                    format!("status list {}: {e}", entry.uri),
                ));
            }
        }

        let x5c = token.x5c().unwrap_or(&[]);
        if !self.verify_status_list_signature(x5c, matched, source, policy) {
            return Err(CredentialStatusError::new(
                ChainValidationErrorKind::RevocationBindingMismatch,
                format!(
                    "status list {} is not signed by the revocation service of '{}'",
                    entry.uri,
                    matched.map(|m| m.entity.display_name()).unwrap_or("<none>")
                ),
            ));
        }

        let result = StatusListVerifier::status_at(&token, entry.idx).map_err(|e| {
            CredentialStatusError::new(ChainValidationErrorKind::CredentialStatusUnknown, e.to_string())
        })?;

        let kind = match result.status {
            STATUS_VALID => return Ok(Some(result)),
            STATUS_INVALID => ChainValidationErrorKind::CredentialRevoked,
            STATUS_SUSPENDED => ChainValidationErrorKind::CredentialSuspended,
            _ => ChainValidationErrorKind::CredentialStatusUnknown,
        };
        Err(CredentialStatusError::new(
            kind,
            format!(
                "status list {} index {}: {} (status {})",
                entry.uri, entry.idx, result.description, result.status
            ),
        ))
    }

    /// DER of every distinct service certificate in the store, in store order.
    pub fn trusted_certificate_buffers(&self, source: &TrustListSource) -> Result<Vec<Vec<u8>>, TrustStoreError> {
        let store = self.trust_store(source)?;
        let mut seen = HashSet::new();
        Ok(store
            .index()
            .service_certs()
            .iter()
            .filter(|c| seen.insert(c.cert.thumbprint().to_string()))
            .map(|c| c.cert.der().to_vec())
            .collect())
    }

    pub fn cache_stats(&self) -> CacheStats {
        let status = self.status_lists.stats();
        CacheStats {
            trust_stores: self.trust_stores.cached_store_count(),
            size: status.size,
            jwt_cache_size: status.jwt_cache_size,
            uris: status.uris,
        }
    }

    pub fn clear_caches(&self) {
        self.clear_trust_list_cache();
        self.clear_status_list_cache();
    }

    pub fn clear_trust_list_cache(&self) {
        self.trust_stores.clear_cache();
    }

    pub fn clear_status_list_cache(&self) {
        self.status_lists.clear_cache();
    }
}

fn fail(ctx: &FailureContext<'_>, kind: ChainValidationErrorKind, message: &str) -> ChainValidationResult {
    let details = ctx.describe(message);
    tracing::warn!(error = kind.code(), details = %details, "x5c chain validation failed");
    ChainValidationResult::failure(kind, details)
}

fn trust_store_error_kind(e: &TrustStoreError) -> ChainValidationErrorKind {
    match e {
        TrustStoreError::Fetch(f) if f.is_timeout() => ChainValidationErrorKind::FetchTimeout,
        TrustStoreError::Fetch(_) => ChainValidationErrorKind::FetchFailed,
        TrustStoreError::InvalidVerifierKey { .. } | TrustStoreError::SignatureInvalid { .. } => {
            ChainValidationErrorKind::SignatureInvalid
        }
        TrustStoreError::MalformedDocument { .. } => ChainValidationErrorKind::MalformedDocument,
    }
}
