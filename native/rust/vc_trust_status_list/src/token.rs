// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use crate::error::StatusListError;
use crate::list::StatusList;
use serde::Deserialize;
use std::sync::Arc;
use vc_trust_common::{CompactJws, JwsError};

pub const STATUS_LIST_JWT_TYP: &str = "statuslist+jwt";

#[derive(Deserialize)]
struct StatusListClaims {
    #[serde(default)]
    sub: Option<String>,
    status_list: StatusListBody,
    #[serde(default)]
    ttl: Option<u64>,
    #[serde(default)]
    exp: Option<i64>,
}

#[derive(Deserialize)]
struct StatusListBody {
    bits: u8,
    lst: String,
}

/// A fetched status list: the raw JWS (for signature and binding checks) and the
/// decoded list (for status lookups).
#[derive(Debug, Clone)]
pub struct StatusListToken {
    uri: String,
    jws: CompactJws,
    list: Arc<StatusList>,
    ttl: Option<u64>,
    exp: Option<i64>,
}

impl StatusListToken {
    pub fn parse(uri: &str, raw: &str) -> Result<Self, StatusListError> {
        let malformed = |message: String| StatusListError::Malformed {
            uri: uri.to_string(),
            message,
        };

        let jws = CompactJws::parse(raw).map_err(|e| malformed(e.to_string()))?;

        let typ = jws.header().typ.as_deref().unwrap_or("");
        let typ_ok = typ.eq_ignore_ascii_case(STATUS_LIST_JWT_TYP)
            || typ.eq_ignore_ascii_case(&format!("application/{STATUS_LIST_JWT_TYP}"));
        if !typ_ok {
            return Err(malformed(format!("header typ must be {STATUS_LIST_JWT_TYP}, found '{typ}'")));
        }

        let claims: StatusListClaims = jws.payload_json().map_err(|e| malformed(e.to_string()))?;
        if let Some(sub) = claims.sub.as_deref() {
            if sub != uri {
                tracing::warn!(uri, sub, "status list subject differs from the URI it was fetched from");
            }
        }

        let list = StatusList::from_encoded(claims.status_list.bits, &claims.status_list.lst).map_err(malformed)?;

        Ok(Self {
            uri: uri.to_string(),
            jws,
            list: Arc::new(list),
            ttl: claims.ttl,
            exp: claims.exp,
        })
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }

    pub fn raw(&self) -> &str {
        self.jws.raw()
    }

    pub fn jws(&self) -> &CompactJws {
        &self.jws
    }

    /// The signer chain from the token header.
    pub fn x5c(&self) -> Option<&[String]> {
        self.jws.x5c()
    }

    pub fn list(&self) -> &Arc<StatusList> {
        &self.list
    }

    pub fn ttl(&self) -> Option<u64> {
        self.ttl
    }

    pub fn exp(&self) -> Option<i64> {
        self.exp
    }

    /// Verify the token signature with the key of its `x5c` leaf.
    pub fn verify_signature(&self) -> Result<(), JwsError> {
        self.jws.verify_with_x5c_leaf()
    }
}
