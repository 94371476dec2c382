// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use vc_trust_lote::{TrustedEntity, TrustedEntityServiceCert};
use vc_trust_test_utils::{
    expired_leaf, intermediate_ca, leaf, root_ca, self_signed_leaf, x5c_of, TestCert, PID_ISSUANCE, PID_REVOCATION,
};
use vc_trust_x509::*;

fn cert(c: &TestCert) -> Certificate {
    parse_certificate_der(&c.der).unwrap()
}

fn entity(name: &str, services: &[(&str, &TestCert)]) -> TrustedEntity {
    TrustedEntity {
        entity_id: Some(name.to_string()),
        services: services
            .iter()
            .map(|(t, c)| TrustedEntityServiceCert {
                service_type_identifier: t.to_string(),
                cert_value: c.b64(),
            })
            .collect(),
    }
}

#[test]
fn leaf_signed_by_anchor_builds_two_element_path() {
    let root = root_ca("Path Root");
    let l = leaf("Path Leaf", &root);

    let path = build_path(&cert(&l), &[cert(&l)], &[cert(&root)], &[]).unwrap();
    let thumbprints: Vec<&str> = path.iter().map(|c| c.thumbprint()).collect();
    assert_eq!(thumbprints, vec![l.thumbprint().as_str(), root.thumbprint().as_str()]);
}

#[test]
fn path_runs_through_presented_intermediate() {
    let root = root_ca("Chain Root");
    let mid = intermediate_ca("Chain Intermediate", &root);
    let l = leaf("Chain Leaf", &mid);

    let chain = parse_chain(&x5c_of(&[&l, &mid])).unwrap();
    let path = build_path(&chain[0], &chain, &[cert(&root)], &[]).unwrap();
    assert_eq!(path.len(), 3);
    assert_eq!(path[1].thumbprint(), mid.thumbprint());
    assert_eq!(path[2].thumbprint(), root.thumbprint());
}

#[test]
fn intermediate_may_come_from_extra_pool() {
    let root = root_ca("Extra Root");
    let mid = intermediate_ca("Extra Intermediate", &root);
    let l = leaf("Extra Leaf", &mid);

    let path = build_path(&cert(&l), &[cert(&l)], &[cert(&root)], &[cert(&mid)]).unwrap();
    assert_eq!(path.len(), 3);
}

#[test]
fn anchor_leaf_yields_single_element_path() {
    let pinned = self_signed_leaf("Pinned Leaf");
    let path = build_path(&cert(&pinned), &[cert(&pinned)], &[cert(&pinned)], &[]).unwrap();
    assert_eq!(path.len(), 1);
}

#[test]
fn unrelated_anchor_fails_chain_building() {
    let root = root_ca("Real Root");
    let other = root_ca("Other Root");
    let l = leaf("Orphan Leaf", &root);

    let err = build_path(&cert(&l), &[cert(&l)], &[cert(&other)], &[]).unwrap_err();
    match err {
        X509Error::ChainBuildFailed(msg) => assert!(msg.contains("Orphan Leaf"), "{msg}"),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn non_ca_issuer_is_not_accepted() {
    let root = root_ca("Issuer Root");
    let not_ca = leaf("Not A CA", &root);
    // rcgen lets a non-CA key sign; the path builder must refuse it as an issuer.
    let l = leaf("Below Non CA", &not_ca);

    assert!(build_path(&cert(&l), &[cert(&l), cert(&not_ca)], &[cert(&root)], &[]).is_err());
}

#[test]
fn malformed_chain_entry_names_its_position() {
    let root = root_ca("Malformed Root");
    let err = parse_chain(&[root.b64(), "bm90IGEgY2VydA==".to_string()]).unwrap_err();
    match err {
        X509Error::MalformedCertificate(msg) => assert!(msg.contains("x5c[1]"), "{msg}"),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn malformed_anchor_is_skipped() {
    let root = root_ca("Good Anchor");
    let anchors = parse_trust_anchors(["not-a-certificate".to_string(), root.b64()]);
    assert_eq!(anchors.len(), 1);
    assert_eq!(anchors[0].thumbprint(), root.thumbprint());
}

#[test]
fn ca_flag_is_read_from_basic_constraints() {
    let root = root_ca("Flag Root");
    let l = leaf("Flag Leaf", &root);
    assert!(is_ca(&cert(&root)));
    assert!(!is_ca(&cert(&l)));
}

#[test]
fn expired_certificate_is_not_time_valid() {
    let root = root_ca("Clock Root");
    let old = expired_leaf("Old Leaf", &root);
    let now = vc_trust_common::unix_now();
    assert!(!is_time_valid(&cert(&old), now));
    assert!(is_time_valid(&cert(&root), now));
}

#[test]
fn ca_service_cert_matches_path_terminal() {
    let root = root_ca("Issuer CA");
    let revocation = self_signed_leaf("Issuer Revocation");
    let l = leaf("Issuer Leaf", &root);
    let entities = vec![entity("Issuer Org", &[(PID_ISSUANCE, &root), (PID_REVOCATION, &revocation)])];

    let path = vec![cert(&l), cert(&root)];
    let m = path_matches_trusted_entities(&path, &entities, PinnedCertMode::Leaf, &ServiceTypeMatcher::issuance()).unwrap();

    assert_eq!(m.match_mode, MatchMode::Ca);
    assert!(m.issuance_is_ca);
    assert_eq!(m.issuance_thumbprint, root.thumbprint());
    assert_eq!(m.revocation_thumbprint.as_deref(), Some(revocation.thumbprint().as_str()));
    assert_eq!(m.revocation_is_ca, Some(false));
}

#[test]
fn ca_service_cert_does_not_match_when_it_is_not_terminal() {
    let root = root_ca("Upper CA");
    let mid = intermediate_ca("Listed Intermediate", &root);
    let l = leaf("Deep Leaf", &mid);
    let entities = vec![entity("Org", &[(PID_ISSUANCE, &mid)])];

    let path = vec![cert(&l), cert(&mid), cert(&root)];
    assert!(path_matches_trusted_entities(&path, &entities, PinnedCertMode::Leaf, &ServiceTypeMatcher::issuance()).is_none());
}

#[test]
fn pinned_cert_matches_leaf_or_path_end_per_mode() {
    let pinned = self_signed_leaf("Pinned Issuer");
    let entities = vec![entity("Pinned Org", &[(PID_ISSUANCE, &pinned)])];
    let path = vec![cert(&pinned)];

    let m = path_matches_trusted_entities(&path, &entities, PinnedCertMode::Leaf, &ServiceTypeMatcher::issuance()).unwrap();
    assert_eq!(m.match_mode, MatchMode::LeafPinned);
    assert!(m.revocation_cert.is_none());

    let m = path_matches_trusted_entities(&path, &entities, PinnedCertMode::PathEnd, &ServiceTypeMatcher::issuance()).unwrap();
    assert_eq!(m.match_mode, MatchMode::PathEndPinned);
}

#[test]
fn service_type_filter_is_applied() {
    let root = root_ca("Typed CA");
    let l = leaf("Typed Leaf", &root);
    let entities = vec![entity("Org", &[(PID_REVOCATION, &root)])];

    let path = vec![cert(&l), cert(&root)];
    assert!(path_matches_trusted_entities(&path, &entities, PinnedCertMode::Leaf, &ServiceTypeMatcher::issuance()).is_none());
    assert!(path_matches_trusted_entities(&path, &entities, PinnedCertMode::Leaf, &ServiceTypeMatcher::parse(PID_REVOCATION)).is_some());
}

#[test]
fn revocation_cert_comes_from_the_matched_entity() {
    let root_a = root_ca("Entity A CA");
    let rev_a = self_signed_leaf("Entity A Revocation");
    let root_b = root_ca("Entity B CA");
    let rev_b = self_signed_leaf("Entity B Revocation");
    let entities = vec![
        entity("A", &[(PID_ISSUANCE, &root_a), (PID_REVOCATION, &rev_a)]),
        entity("B", &[(PID_ISSUANCE, &root_b), (PID_REVOCATION, &rev_b)]),
    ];

    let l = leaf("B Leaf", &root_b);
    let path = vec![cert(&l), cert(&root_b)];
    let m = path_matches_trusted_entities(&path, &entities, PinnedCertMode::Leaf, &ServiceTypeMatcher::issuance()).unwrap();
    assert_eq!(m.entity.entity_id.as_deref(), Some("B"));
    assert_eq!(m.entity_index, 1);
    assert_eq!(m.revocation_thumbprint.as_deref(), Some(rev_b.thumbprint().as_str()));
}

#[test]
fn index_matches_like_the_linear_search() {
    let root_a = root_ca("Index A CA");
    let root_b = root_ca("Index B CA");
    let pinned = self_signed_leaf("Index Pinned");
    let rev = self_signed_leaf("Index Revocation");
    let entities = vec![
        entity("A", &[(PID_ISSUANCE, &root_a)]),
        entity("B", &[(PID_REVOCATION, &rev), (PID_ISSUANCE, &root_b), (PID_ISSUANCE, &pinned)]),
        // Same CA listed again under a later entity: the earlier entity wins.
        entity("C", &[(PID_ISSUANCE, &root_b)]),
    ];
    let index = TrustedEntityIndex::build(entities.clone());

    let leaf_b = leaf("Index Leaf B", &root_b);
    let paths = vec![
        vec![cert(&leaf_b), cert(&root_b)],
        vec![cert(&pinned)],
        vec![cert(&leaf("Index Leaf A", &root_a)), cert(&root_a)],
        vec![cert(&self_signed_leaf("Unknown"))],
    ];

    for path in &paths {
        for mode in [PinnedCertMode::Leaf, PinnedCertMode::PathEnd] {
            let linear = path_matches_trusted_entities(path, &entities, mode, &ServiceTypeMatcher::issuance());
            let indexed = index.match_path(path, mode, &ServiceTypeMatcher::issuance());
            assert_eq!(linear.is_some(), indexed.is_some());
            if let (Some(l), Some(i)) = (linear, indexed) {
                assert_eq!(l.entity_index, i.entity_index);
                assert_eq!(l.issuance_thumbprint, i.issuance_thumbprint);
                assert_eq!(l.match_mode, i.match_mode);
                assert!(l.is_same_entity(&i));
            }
        }
    }

    let m = index
        .match_path(&paths[0], PinnedCertMode::Leaf, &ServiceTypeMatcher::issuance())
        .unwrap();
    assert_eq!(m.entity.entity_id.as_deref(), Some("B"));
    assert_eq!(m.revocation_thumbprint.as_deref(), Some(rev.thumbprint().as_str()));
}

#[test]
fn index_skips_undecodable_service_certs() {
    let root = root_ca("Index Good");
    let mut bad = entity("Broken", &[]);
    bad.services.push(TrustedEntityServiceCert {
        service_type_identifier: PID_ISSUANCE.to_string(),
        cert_value: "AAAA".to_string(),
    });
    let index = TrustedEntityIndex::build(vec![bad, entity("Good", &[(PID_ISSUANCE, &root)])]);

    assert_eq!(index.service_certs().len(), 1);
    assert_eq!(index.anchors_for(&ServiceTypeMatcher::issuance()).len(), 1);
    assert_eq!(index.entities().len(), 2);
}
