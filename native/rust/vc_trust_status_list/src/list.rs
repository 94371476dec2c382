// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use flate2::read::ZlibDecoder;
use std::io::Read as _;
use vc_trust_common::encoding::decode_base64url;

pub const STATUS_VALID: u8 = 0;
pub const STATUS_INVALID: u8 = 1;
pub const STATUS_SUSPENDED: u8 = 2;

// Upper bound on the inflated list.
const MAX_DECOMPRESSED_LEN: u64 = 16 * 1024 * 1024;

/// A decoded bit-packed status array.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusList {
    bits: u8,
    bytes: Vec<u8>,
}

impl StatusList {
    pub fn new(bits: u8, bytes: Vec<u8>) -> Result<Self, String> {
        if !matches!(bits, 1 | 2 | 4 | 8) {
            return Err(format!("unsupported bits per entry: {bits}"));
        }
        Ok(Self { bits, bytes })
    }

    /// Decode `status_list.lst`: base64url of zlib-compressed bytes.
    pub fn from_encoded(bits: u8, lst: &str) -> Result<Self, String> {
        let compressed = decode_base64url(lst).map_err(|e| format!("lst is not base64url: {e}"))?;
        let mut bytes = Vec::new();
        ZlibDecoder::new(compressed.as_slice())
            .take(MAX_DECOMPRESSED_LEN + 1)
            .read_to_end(&mut bytes)
            .map_err(|e| format!("lst is not zlib data: {e}"))?;
        if bytes.len() as u64 > MAX_DECOMPRESSED_LEN {
            return Err(format!("lst inflates beyond {MAX_DECOMPRESSED_LEN} bytes"));
        }
        Self::new(bits, bytes)
    }

    pub fn bits(&self) -> u8 {
        self.bits
    }

    /// Number of addressable entries.
    pub fn len(&self) -> u64 {
        self.bytes.len() as u64 * 8 / self.bits as u64
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Status value at `idx`; entries are packed little-endian within each byte.
    pub fn get(&self, idx: u64) -> Option<u8> {
        if idx >= self.len() {
            return None;
        }
        let bit_offset = idx * self.bits as u64;
        let byte = self.bytes[(bit_offset / 8) as usize];
        let shift = (bit_offset % 8) as u8;
        let mask = ((1u16 << self.bits) - 1) as u8;
        Some((byte >> shift) & mask)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusCheckResult {
    pub status: u8,
    pub is_valid: bool,
    pub description: String,
}

impl StatusCheckResult {
    pub fn from_status(status: u8) -> Self {
        let description = match status {
            STATUS_VALID => "Valid".to_string(),
            STATUS_INVALID => "Invalid/Revoked".to_string(),
            STATUS_SUSPENDED => "Suspended".to_string(),
            other => format!("Unknown ({other})"),
        };
        Self {
            status,
            is_valid: status == STATUS_VALID,
            description,
        }
    }
}
