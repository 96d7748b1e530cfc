use serde::{Deserialize, Serialize};

use crate::{record_type::RecordType, tnf::Tnf};

/// A decoded record, the derived strings are recomputed on every decode
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, uniffi::Record)]
#[serde(rename_all = "camelCase")]
pub struct NdefRecord {
    pub id: Vec<u8>,
    pub tnf: Tnf,
    /// First byte of the type field, 0 when the record has no type
    #[serde(rename = "type")]
    pub type_: u8,
    pub payload: Vec<u8>,
    pub payload_as_hex_string: String,
    pub payload_as_string_with_prefix: String,
    pub payload_as_string: String,
}

/// Serializes as a bare array of records
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize, uniffi::Record)]
#[serde(transparent)]
pub struct NdefMessage {
    pub records: Vec<NdefRecord>,
}

impl NdefRecord {
    pub fn record_type(&self) -> RecordType {
        match self.type_ {
            0 => RecordType::Absent,
            RecordType::TEXT => RecordType::Text,
            RecordType::URI => RecordType::Uri,
            other => RecordType::Other(other),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.tnf == Tnf::Empty && self.type_ == 0 && self.id.is_empty() && self.payload.is_empty()
    }
}

impl NdefMessage {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn is_erase(&self) -> bool {
        matches!(self.records.as_slice(), [record] if record.is_empty())
    }

    /// Decoded strings of all text records, in message order
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.records
            .iter()
            .filter(|record| record.record_type() == RecordType::Text)
            .map(|record| record.payload_as_string.as_str())
    }

    pub fn iter(&self) -> std::slice::Iter<'_, NdefRecord> {
        self.records.iter()
    }
}

impl<'a> IntoIterator for &'a NdefMessage {
    type Item = &'a NdefRecord;
    type IntoIter = std::slice::Iter<'a, NdefRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn test_message_json_shape() {
        let message = NdefMessage {
            records: vec![NdefRecord {
                id: vec![],
                tnf: Tnf::WellKnown,
                type_: RecordType::TEXT,
                payload: b"\x02enhi".to_vec(),
                payload_as_hex_string: "02656e6869".into(),
                payload_as_string_with_prefix: "\u{2}enhi".into(),
                payload_as_string: "hi".into(),
            }],
        };

        let value = serde_json::to_value(&message).unwrap();
        assert_eq!(
            value,
            json!([{
                "id": [],
                "tnf": 1,
                "type": 84,
                "payload": [2, 101, 110, 104, 105],
                "payloadAsHexString": "02656e6869",
                "payloadAsStringWithPrefix": "\u{2}enhi",
                "payloadAsString": "hi"
            }])
        );

        let back: NdefMessage = serde_json::from_value(value).unwrap();
        assert_eq!(back, message);
    }
}
