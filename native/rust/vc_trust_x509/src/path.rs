// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use crate::certificate::Certificate;
use crate::error::X509Error;
use std::collections::HashSet;

const MAX_DEPTH: usize = 16;

/// Build a verified path `leaf ..= anchor`.
///
/// Candidate issuers come from the presented chain, `extra_intermediates` and the
/// anchors themselves, in that order. Each step requires name chaining, a CA issuer
/// and a valid signature; the search backtracks when a branch dead-ends. A leaf that
/// is itself an anchor yields a one-element path.
pub fn build_path(
    leaf: &Certificate,
    presented_chain: &[Certificate],
    anchors: &[Certificate],
    extra_intermediates: &[Certificate],
) -> Result<Vec<Certificate>, X509Error> {
    let anchor_thumbprints: HashSet<&str> = anchors.iter().map(|a| a.thumbprint()).collect();

    let mut seen = HashSet::new();
    let pool: Vec<&Certificate> = presented_chain
        .iter()
        .chain(extra_intermediates.iter())
        .chain(anchors.iter())
        .filter(|c| c.thumbprint() != leaf.thumbprint())
        .filter(|c| seen.insert(c.thumbprint().to_string()))
        .collect();

    let mut path = vec![leaf.clone()];
    if extend_path(&mut path, &pool, &anchor_thumbprints) {
        return Ok(path);
    }

    Err(X509Error::ChainBuildFailed(format!(
        "no path from '{}' (issuer '{}') to any of {} trust anchor(s)",
        leaf.subject(),
        leaf.issuer(),
        anchors.len()
    )))
}

fn extend_path(path: &mut Vec<Certificate>, pool: &[&Certificate], anchors: &HashSet<&str>) -> bool {
    let Some(current) = path.last().cloned() else {
        return false;
    };

    if anchors.contains(current.thumbprint()) {
        return true;
    }
    if path.len() >= MAX_DEPTH {
        return false;
    }

    for candidate in pool {
        if path.iter().any(|p| p.thumbprint() == candidate.thumbprint()) {
            continue;
        }
        if !candidate.could_have_issued(&current) || !candidate.is_ca() {
            continue;
        }
        if !current.is_signed_by(candidate) {
            continue;
        }

        path.push((*candidate).clone());
        if extend_path(path, pool, anchors) {
            return true;
        }
        path.pop();
    }

    false
}
