// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::sync::Arc;
use std::time::Duration;
use vc_trust_common::FetchError;
use vc_trust_store::*;
use vc_trust_test_utils::{
    lote_payload, root_ca, self_signed_leaf, signed_lote, LoteEntitySpec, StaticFetcher, EAA_ISSUANCE, PID_ISSUANCE,
    PID_REVOCATION, WALLET_PROVIDER,
};

const LOTE_A: &str = "https://lists.example/pid.jwt";
const LOTE_B: &str = "https://lists.example/wallets.jwt";
const TTL: Duration = Duration::from_secs(300);

fn provider(fetcher: &Arc<StaticFetcher>) -> TrustStoreProvider {
    TrustStoreProvider::new(fetcher.clone(), Duration::from_millis(4000))
}

fn pid_list() -> serde_json::Value {
    let ca = root_ca("PID Provider CA");
    let rev = self_signed_leaf("PID Provider Status");
    lote_payload(
        Some("2099-01-01T00:00:00Z"),
        &[LoteEntitySpec::named("PID Provider")
            .service(PID_ISSUANCE, &ca)
            .service(PID_REVOCATION, &rev)],
    )
}

#[test]
fn second_call_within_ttl_returns_the_same_store() {
    let signer = root_ca("List Signer");
    let fetcher = Arc::new(StaticFetcher::new().with_document(LOTE_A, signed_lote(&pid_list(), &signer)));
    let provider = provider(&fetcher);
    let source = TrustListSource::new(vec![LoteSource::new(LOTE_A)]);

    let first = provider.get_trust_store(&source, TTL).unwrap();
    let second = provider.get_trust_store(&source, TTL).unwrap();

    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(fetcher.fetch_count(LOTE_A), 1);
    assert_eq!(first.entities().len(), 1);
    assert_eq!(first.next_update.as_deref(), Some("2099-01-01T00:00:00Z"));
}

#[test]
fn clearing_the_cache_refetches_each_source_once() {
    let signer = root_ca("List Signer");
    let fetcher = Arc::new(
        StaticFetcher::new()
            .with_document(LOTE_A, signed_lote(&pid_list(), &signer))
            .with_document(LOTE_B, serde_json::to_string(&lote_payload(None, &[])).unwrap()),
    );
    let provider = provider(&fetcher);
    let source = TrustListSource::new(vec![LoteSource::new(LOTE_A), LoteSource::new(LOTE_B)]);

    let first = provider.get_trust_store(&source, TTL).unwrap();
    provider.clear_cache();
    assert_eq!(provider.cached_store_count(), 0);
    let second = provider.get_trust_store(&source, TTL).unwrap();

    assert!(!Arc::ptr_eq(&first, &second));
    assert_eq!(fetcher.fetch_count(LOTE_A), 2);
    assert_eq!(fetcher.fetch_count(LOTE_B), 2);
}

#[test]
fn zero_ttl_always_refetches() {
    let fetcher = Arc::new(StaticFetcher::new().with_document(LOTE_A, pid_list().to_string()));
    let provider = provider(&fetcher);
    let source = TrustListSource::new(vec![LoteSource::new(LOTE_A)]);

    provider.get_trust_store(&source, Duration::ZERO).unwrap();
    provider.get_trust_store(&source, Duration::ZERO).unwrap();
    assert_eq!(fetcher.fetch_count(LOTE_A), 2);
}

#[test]
fn different_sources_are_cached_separately() {
    let wallet_ca = root_ca("Wallet Provider CA");
    let wallets = lote_payload(None, &[LoteEntitySpec::named("Wallet Co").service(WALLET_PROVIDER, &wallet_ca)]);
    let fetcher = Arc::new(
        StaticFetcher::new()
            .with_document(LOTE_A, pid_list().to_string())
            .with_document(LOTE_B, wallets.to_string()),
    );
    let provider = provider(&fetcher);

    let pid = provider
        .get_trust_store(&TrustListSource::new(vec![LoteSource::new(LOTE_A)]), TTL)
        .unwrap();
    let wallet = provider
        .get_trust_store(&TrustListSource::new(vec![LoteSource::new(LOTE_B)]), TTL)
        .unwrap();

    assert_eq!(pid.entities()[0].entity_id.as_deref(), Some("PID Provider"));
    assert_eq!(wallet.entities()[0].entity_id.as_deref(), Some("Wallet Co"));
    assert_eq!(provider.cached_store_count(), 2);
}

#[test]
fn http_500_fails_naming_the_url() {
    let fetcher = Arc::new(StaticFetcher::new().with_error(
        LOTE_A,
        FetchError::HttpStatus {
            url: LOTE_A.to_string(),
            status: 500,
        },
    ));
    let provider = provider(&fetcher);

    let err = provider
        .get_trust_store(&TrustListSource::new(vec![LoteSource::new(LOTE_A)]), TTL)
        .unwrap_err();
    assert_eq!(err.url(), LOTE_A);
    assert!(matches!(err, TrustStoreError::Fetch(FetchError::HttpStatus { status: 500, .. })));
    assert!(err.to_string().contains(LOTE_A));
    assert_eq!(provider.cached_store_count(), 0);
}

#[test]
fn failed_refresh_does_not_fall_back_to_previous_store() {
    let fetcher = Arc::new(StaticFetcher::new().with_document(LOTE_A, pid_list().to_string()));
    let provider = provider(&fetcher);
    let source = TrustListSource::new(vec![LoteSource::new(LOTE_A)]);
    provider.get_trust_store(&source, TTL).unwrap();

    fetcher.set_document(LOTE_A, "{ not json");
    assert!(matches!(
        provider.get_trust_store(&source, Duration::ZERO),
        Err(TrustStoreError::MalformedDocument { .. })
    ));
}

#[test]
fn verifier_key_accepts_the_matching_signer() {
    let signer = root_ca("Scheme Operator");
    let fetcher = Arc::new(StaticFetcher::new().with_document(LOTE_A, signed_lote(&pid_list(), &signer)));
    let provider = provider(&fetcher);

    for key in [signer.public_key_pem(), signer.pem()] {
        let source = TrustListSource::new(vec![LoteSource::new(LOTE_A).with_verifier_key(key)]);
        assert_eq!(provider.get_trust_store(&source, TTL).unwrap().entities().len(), 1);
    }
}

#[test]
fn verifier_key_rejects_another_signer() {
    let signer = root_ca("Impostor");
    let expected = root_ca("Scheme Operator");
    let fetcher = Arc::new(StaticFetcher::new().with_document(LOTE_A, signed_lote(&pid_list(), &signer)));
    let provider = provider(&fetcher);
    let source = TrustListSource::new(vec![LoteSource::new(LOTE_A).with_verifier_key(expected.public_key_pem())]);

    let err = provider.get_trust_store(&source, TTL).unwrap_err();
    assert!(matches!(err, TrustStoreError::SignatureInvalid { ref url, .. } if url == LOTE_A), "{err}");
}

#[test]
fn verifier_key_requires_a_signed_document() {
    let expected = root_ca("Scheme Operator");
    let fetcher = Arc::new(StaticFetcher::new().with_document(LOTE_A, pid_list().to_string()));
    let provider = provider(&fetcher);
    let source = TrustListSource::new(vec![LoteSource::new(LOTE_A).with_verifier_key(expected.public_key_pem())]);

    assert!(matches!(
        provider.get_trust_store(&source, TTL),
        Err(TrustStoreError::MalformedDocument { .. })
    ));
}

#[test]
fn accepted_types_filter_entities_and_merge_in_source_order() {
    let eaa_ca = root_ca("EAA CA");
    let wallet_ca = root_ca("Wallet CA");
    let second = lote_payload(
        Some("2098-01-01T00:00:00Z"),
        &[
            LoteEntitySpec::named("Wallet Co").service(WALLET_PROVIDER, &wallet_ca),
            LoteEntitySpec::named("EAA Issuer").service(EAA_ISSUANCE, &eaa_ca),
        ],
    );
    let fetcher = Arc::new(
        StaticFetcher::new()
            .with_document(LOTE_A, pid_list().to_string())
            .with_document(LOTE_B, second.to_string()),
    );
    let provider = provider(&fetcher);
    let source = TrustListSource::new(vec![LoteSource::new(LOTE_A), LoteSource::new(LOTE_B)])
        .with_accepted_service_types([PID_ISSUANCE, EAA_ISSUANCE]);

    let store = provider.get_trust_store(&source, TTL).unwrap();
    let names: Vec<&str> = store.entities().iter().map(|e| e.display_name()).collect();
    assert_eq!(names, vec!["PID Provider", "EAA Issuer"]);
    // Retained entities keep their revocation service.
    assert!(store.entities()[0].revocation_service().is_some());
    // The first source's NextUpdate wins.
    assert_eq!(store.next_update.as_deref(), Some("2099-01-01T00:00:00Z"));
}

#[test]
fn past_next_update_marks_the_store_stale() {
    let ca = root_ca("Stale CA");
    let doc = lote_payload(Some("2001-01-01T00:00:00Z"), &[LoteEntitySpec::named("Old").service(PID_ISSUANCE, &ca)]);
    let fetcher = Arc::new(StaticFetcher::new().with_document(LOTE_A, doc.to_string()));
    let provider = provider(&fetcher);

    let store = provider
        .get_trust_store(&TrustListSource::new(vec![LoteSource::new(LOTE_A)]), TTL)
        .unwrap();
    assert!(store.is_stale(vc_trust_common::unix_now()));
}

#[test]
fn source_deserializes_from_json() {
    let source: TrustListSource = serde_json::from_str(
        r#"{"lotes":[{"url":"https://lists.example/a","verifierKey":"PEM"}],"acceptedServiceTypes":["t"]}"#,
    )
    .unwrap();
    assert_eq!(source.lotes[0].verifier_key.as_deref(), Some("PEM"));
    assert_eq!(source.accepted_service_types, Some(vec!["t".to_string()]));
}
