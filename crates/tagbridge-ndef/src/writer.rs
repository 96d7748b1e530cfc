use crate::{
    header::NdefHeader,
    parser::{TLV_LONG_LENGTH, TLV_NDEF_MESSAGE, TLV_TERMINATOR, WireError},
    raw::RawMessage,
};

/// Serialize a message to NDEF wire bytes
///
/// Records are written unchunked, short records are used for payloads that
/// fit a one byte length. A message without records is written as the erase
/// sentinel, the smallest valid NDEF message.
pub fn write_message(message: &RawMessage) -> Result<Vec<u8>, WireError> {
    if message.is_empty() {
        return write_message(&RawMessage::erase());
    }

    let last = message.records.len() - 1;
    let mut bytes = Vec::new();

    for (index, record) in message.records.iter().enumerate() {
        let header = NdefHeader::for_record(record, index == 0, index == last)?;

        bytes.push(header.flags_byte());
        bytes.push(header.type_length);

        if header.short_record {
            bytes.push(header.payload_length as u8);
        } else {
            bytes.extend_from_slice(&header.payload_length.to_be_bytes());
        }

        if let Some(id_length) = header.id_length {
            bytes.push(id_length);
        }

        bytes.extend_from_slice(&record.type_);
        bytes.extend_from_slice(&record.id);
        bytes.extend_from_slice(&record.payload);
    }

    Ok(bytes)
}

/// Frame NDEF bytes as a message TLV followed by the terminator TLV
pub fn wrap_tlv(ndef: &[u8]) -> Result<Vec<u8>, WireError> {
    let length = ndef.len();
    let mut bytes = Vec::with_capacity(length + 5);
    bytes.push(TLV_NDEF_MESSAGE);

    if length < TLV_LONG_LENGTH as usize {
        bytes.push(length as u8);
    } else {
        let length = u16::try_from(length).map_err(|_| WireError::FieldTooLong {
            field: "tlv".to_string(),
            length: length as u64,
        })?;

        bytes.push(TLV_LONG_LENGTH);
        bytes.extend_from_slice(&length.to_be_bytes());
    }

    bytes.extend_from_slice(ndef);
    bytes.push(TLV_TERMINATOR);

    Ok(bytes)
}
