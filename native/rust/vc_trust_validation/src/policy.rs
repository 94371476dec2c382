// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use serde::Deserialize;
use vc_trust_x509::{PinnedCertMode, ServiceTypeMatcher};

/// How a verifier wants an `x5c` chain judged.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainValidationPolicy {
    #[serde(default, alias = "require_x5c")]
    pub require_x5c: bool,

    #[serde(default, alias = "pinned_cert_mode")]
    pub pinned_cert_mode: PinnedCertMode,

    #[serde(
        default = "ChainValidationPolicy::default_service_type",
        alias = "service_type",
        alias = "serviceTypeFilter"
    )]
    pub service_type: ServiceTypeMatcher,
}

impl Default for ChainValidationPolicy {
    fn default() -> Self {
        Self {
            require_x5c: false,
            pinned_cert_mode: PinnedCertMode::default(),
            service_type: Self::default_service_type(),
        }
    }
}

impl ChainValidationPolicy {
    fn default_service_type() -> ServiceTypeMatcher {
        ServiceTypeMatcher::issuance()
    }

    /// Credential issuers: any `/Issuance` service.
    pub fn issuance() -> Self {
        Self::default()
    }

    /// Wallet attestations: the exact wallet-provider service type.
    pub fn wallet_provider(service_type_uri: &str) -> Self {
        Self {
            service_type: ServiceTypeMatcher::Exact(service_type_uri.to_string()),
            ..Self::default()
        }
    }

    pub fn requiring_x5c(mut self) -> Self {
        self.require_x5c = true;
        self
    }

    pub fn with_pinned_cert_mode(mut self, mode: PinnedCertMode) -> Self {
        self.pinned_cert_mode = mode;
        self
    }

    /// Policy for the status list signer of a credential judged under `self`.
    pub fn for_revocation(&self) -> Self {
        Self {
            require_x5c: true,
            pinned_cert_mode: self.pinned_cert_mode,
            service_type: ServiceTypeMatcher::revocation(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn policy_deserializes_with_defaults() {
        let policy: ChainValidationPolicy = serde_json::from_str("{}").unwrap();
        assert_eq!(policy, ChainValidationPolicy::issuance());

        let policy: ChainValidationPolicy = serde_json::from_str(
            r#"{"requireX5c":true,"pinnedCertMode":"pathEnd","serviceTypeFilter":"http://uri.etsi.org/19602/SvcType/WalletProvider"}"#,
        )
        .unwrap();
        assert!(policy.require_x5c);
        assert_eq!(policy.pinned_cert_mode, PinnedCertMode::PathEnd);
        assert_eq!(
            policy.service_type,
            ServiceTypeMatcher::Exact("http://uri.etsi.org/19602/SvcType/WalletProvider".to_string())
        );
    }

    #[test]
    fn revocation_policy_keeps_pinned_mode() {
        let policy = ChainValidationPolicy::issuance().with_pinned_cert_mode(PinnedCertMode::PathEnd);
        let revocation = policy.for_revocation();
        assert!(revocation.require_x5c);
        assert_eq!(revocation.pinned_cert_mode, PinnedCertMode::PathEnd);
        assert_eq!(revocation.service_type, ServiceTypeMatcher::revocation());
    }
}
