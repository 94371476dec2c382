// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Wire model of a LoTE payload.
//!
//! Only the members the trust store consumes are modeled; everything else in
//! the document is ignored. Producers differ in how they encode localized text,
//! timestamps and certificate values, so those accept both the plain and the
//! wrapped form.

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct LoteDocument {
    #[serde(rename = "ListAndSchemeInformation")]
    pub scheme_information: RawSchemeInformation,

    #[serde(rename = "TrustedEntitiesList", default)]
    pub trusted_entities: Option<Vec<RawTrustedEntity>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawSchemeInformation {
    #[serde(rename = "LoTEVersionIdentifier", default)]
    pub version: Option<u32>,

    #[serde(rename = "LoTESequenceNumber", default)]
    pub sequence_number: Option<u64>,

    #[serde(rename = "ListIssueDateTime", default)]
    pub list_issue_date_time: Option<DateTimeValue>,

    #[serde(rename = "NextUpdate", default)]
    pub next_update: Option<DateTimeValue>,

    #[serde(rename = "SchemeTerritory", default)]
    pub scheme_territory: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum DateTimeValue {
    Plain(String),
    Wrapped {
        #[serde(rename = "dateTime")]
        date_time: String,
    },
}

impl DateTimeValue {
    pub fn as_str(&self) -> &str {
        match self {
            DateTimeValue::Plain(s) => s,
            DateTimeValue::Wrapped { date_time } => date_time,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawTrustedEntity {
    #[serde(rename = "TrustedEntityInformation", default)]
    pub information: Option<RawEntityInformation>,

    #[serde(rename = "TrustedEntityServices", default)]
    pub services: Option<Vec<RawService>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawEntityInformation {
    #[serde(rename = "TEName", default)]
    pub names: Option<Vec<LocalizedText>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum LocalizedText {
    Plain(String),
    Localized { value: String },
}

impl LocalizedText {
    pub fn value(&self) -> &str {
        match self {
            LocalizedText::Plain(s) => s,
            LocalizedText::Localized { value } => value,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawService {
    #[serde(rename = "ServiceInformation", default)]
    pub information: Option<RawServiceInformation>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawServiceInformation {
    #[serde(rename = "ServiceTypeIdentifier", default)]
    pub service_type_identifier: Option<String>,

    #[serde(rename = "ServiceDigitalIdentity", default)]
    pub digital_identity: Option<RawDigitalIdentity>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawDigitalIdentity {
    #[serde(rename = "X509Certificates", default)]
    pub x509_certificates: Option<Vec<RawCertificate>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawCertificate {
    Plain(String),
    Wrapped { val: String },
}

impl RawCertificate {
    pub fn value(&self) -> &str {
        match self {
            RawCertificate::Plain(s) => s,
            RawCertificate::Wrapped { val } => val,
        }
    }
}
