//! Entry points for host bindings that only hold bytes

use crate::{
    decode::decode,
    encode::{EncodeError, TextRecord, UriRecord, encode},
    parser::{WireError, parse_message, parse_tlv},
    raw::RawMessage,
    record::NdefMessage,
    uri,
};

/// Decode NDEF wire bytes straight into typed records
#[uniffi::export]
pub fn decode_ndef_bytes(data: Vec<u8>) -> Result<NdefMessage, WireError> {
    let raw = parse_message(&data)?;
    Ok(decode(&raw))
}

/// Decode the NDEF message TLV out of raw tag memory
#[uniffi::export]
pub fn decode_tag_memory(memory: Vec<u8>) -> Result<NdefMessage, WireError> {
    let ndef = parse_tlv(&memory)?;
    decode_ndef_bytes(ndef)
}

#[uniffi::export]
pub fn decode_raw_message(message: RawMessage) -> NdefMessage {
    decode(&message)
}

#[uniffi::export]
pub fn encode_records(
    text_records: Vec<TextRecord>,
    uri_records: Vec<UriRecord>,
) -> Result<RawMessage, EncodeError> {
    encode(&text_records, &uri_records)
}

#[uniffi::export]
pub fn erase_message() -> RawMessage {
    RawMessage::erase()
}

#[uniffi::export]
pub fn uri_prefix(code: u8) -> Option<String> {
    uri::prefix(code).map(ToString::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::writer::{wrap_tlv, write_message};

    #[test]
    fn test_decode_tag_memory() {
        let raw = encode_records(
            vec![TextRecord::new("from memory")],
            vec![UriRecord::new("tel:+3581234")],
        )
        .unwrap();

        let memory = wrap_tlv(&write_message(&raw).unwrap()).unwrap();
        let message = decode_tag_memory(memory).unwrap();

        let strings = message
            .iter()
            .map(|record| record.payload_as_string.as_str())
            .collect::<Vec<_>>();

        assert_eq!(strings, vec!["from memory", "tel:+3581234"]);
    }

    #[test]
    fn test_uri_prefix() {
        assert_eq!(uri_prefix(5).as_deref(), Some("tel:"));
        assert_eq!(uri_prefix(36), None);
    }

    #[test]
    fn test_erase_message_decodes_to_one_empty_record() {
        let message = decode_raw_message(erase_message());
        assert!(message.is_erase());
    }
}
