//
// SPDX-License-Identifier: MIT
//

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Wire representation of a periodic or solicited advertisement.
///
/// `kind` is carried through verbatim rather than modeled as an enum: the
/// spec reserves it for future use and requires unrecognized values to be
/// tolerated, not rejected.
#[derive(Debug, Deserialize, Serialize)]
pub struct Update {
    #[serde(rename = "type")]
    pub kind: String,
    pub sender_id: String,
    pub table: BTreeMap<String, Rte>,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Rte {
    pub cost: f64,
    pub next_hop: String,
}

// ===== impl Update =====

impl Update {
    pub fn new(sender_id: &str, table: BTreeMap<String, Rte>) -> Self {
        Update {
            kind: "update".to_owned(),
            sender_id: sender_id.to_owned(),
            table,
        }
    }

    pub fn encode(&self) -> Vec<u8> {
        serde_json::to_vec(self).expect("an Update is always serializable")
    }

    pub fn decode(buf: &[u8]) -> Result<Self, DecodeError> {
        serde_json::from_slice(buf).map_err(DecodeError)
    }
}

#[derive(Debug)]
pub struct DecodeError(serde_json::Error);

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "failed to decode update payload")
    }
}

impl std::error::Error for DecodeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip() {
        let mut table = BTreeMap::new();
        table.insert(
            "r2".to_owned(),
            Rte {
                cost: 21.0,
                next_hop: "r2".to_owned(),
            },
        );
        let update = Update::new("r1", table);
        let encoded = update.encode();
        let decoded = Update::decode(&encoded).unwrap();
        assert_eq!(decoded.kind, "update");
        assert_eq!(decoded.sender_id, "r1");
        assert_eq!(decoded.table["r2"].cost, 21.0);
    }

    #[test]
    fn unrecognized_type_still_decodes() {
        let payload = br#"{"type":"hello","sender_id":"r1","table":{}}"#;
        let decoded = Update::decode(payload).unwrap();
        assert_eq!(decoded.kind, "hello");
    }

    #[test]
    fn extra_fields_are_ignored() {
        let payload = br#"{"type":"update","sender_id":"r1","table":{},"debug_seq":7}"#;
        let decoded = Update::decode(payload).unwrap();
        assert_eq!(decoded.sender_id, "r1");
    }

    #[test]
    fn missing_required_key_fails_to_decode() {
        let payload = br#"{"type":"update","table":{}}"#;
        assert!(Update::decode(payload).is_err());
    }

    #[test]
    fn malformed_json_fails_to_decode() {
        assert!(Update::decode(b"not json").is_err());
    }
}
