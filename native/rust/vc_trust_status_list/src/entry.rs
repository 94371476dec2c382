// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use serde::Deserialize;
use vc_trust_common::jws::decode_unverified_payload;

/// Pointer from a credential into a status list.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StatusListEntry {
    pub uri: String,
    pub idx: u64,
}

#[derive(Deserialize)]
struct Claims {
    status: Option<StatusClaim>,
}

#[derive(Deserialize)]
struct StatusClaim {
    status_list: Option<StatusListClaim>,
}

#[derive(Deserialize)]
struct StatusListClaim {
    idx: u64,
    uri: String,
}

/// Read `status.status_list.{idx,uri}` from a credential JWT.
///
/// SD-JWT presentations (`jwt~disclosure~...`) are accepted; only the issuer JWT
/// is read. The credential signature is not checked here. A missing or
/// unreadable status claim yields `None`.
pub fn status_entry_from_jwt(credential_jwt: &str) -> Option<StatusListEntry> {
    let issuer_jwt = credential_jwt.split('~').next().unwrap_or(credential_jwt);
    let claims: Claims = match decode_unverified_payload(issuer_jwt) {
        Ok(c) => c,
        Err(e) => {
            tracing::debug!(error = %e, "credential status claim not readable");
            return None;
        }
    };

    let entry = claims.status?.status_list?;
    Some(StatusListEntry {
        uri: entry.uri,
        idx: entry.idx,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use vc_trust_common::encoding::encode_base64url;

    fn jwt(payload: &str) -> String {
        format!(
            "{}.{}.AAAA",
            encode_base64url(br#"{"alg":"ES256"}"#),
            encode_base64url(payload.as_bytes())
        )
    }

    #[test]
    fn entry_is_read_from_status_claim() {
        let token = jwt(r#"{"status":{"status_list":{"idx":42,"uri":"https://status.example/1"}}}"#);
        assert_eq!(
            status_entry_from_jwt(&token),
            Some(StatusListEntry {
                uri: "https://status.example/1".to_string(),
                idx: 42
            })
        );
    }

    #[test]
    fn sd_jwt_disclosures_are_ignored() {
        let token = jwt(r#"{"status":{"status_list":{"idx":1,"uri":"https://status.example/1"}}}"#);
        let sd_jwt = format!("{token}~WyJzYWx0IiwiYSIsMV0~");
        assert_eq!(status_entry_from_jwt(&sd_jwt).map(|e| e.idx), Some(1));
    }

    #[test]
    fn absent_status_is_none() {
        assert_eq!(status_entry_from_jwt(&jwt(r#"{"iss":"x"}"#)), None);
        assert_eq!(status_entry_from_jwt(&jwt(r#"{"status":{}}"#)), None);
        assert_eq!(status_entry_from_jwt("garbage"), None);
    }
}
