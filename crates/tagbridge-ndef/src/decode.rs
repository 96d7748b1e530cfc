use tagbridge_util::{hex_string, latin1_string, utf8_lossy, utf16be_lossy};
use tracing::warn;

use crate::{
    raw::{RawMessage, RawRecord},
    record::{NdefMessage, NdefRecord},
    record_type::RecordType,
    uri,
};

/// Low six bits of a text record's status byte
pub const LANGUAGE_LENGTH_MASK: u8 = 0b0011_1111;

/// Top bit of a text record's status byte, set for UTF-16 text
pub const UTF16_FLAG: u8 = 0b1000_0000;

/// Decode every record of a message, in wire order
pub fn decode(message: &RawMessage) -> NdefMessage {
    let records = message.records.iter().map(decode_record).collect();
    NdefMessage { records }
}

pub fn decode_record(raw: &RawRecord) -> NdefRecord {
    let record_type = RecordType::from_type_field(&raw.type_);
    let payload_as_string_with_prefix = latin1_string(&raw.payload);

    let payload_as_string = match record_type {
        RecordType::Text => text_body(&raw.payload),
        RecordType::Uri => full_uri(&raw.payload),
        RecordType::Other(_) | RecordType::Absent => payload_as_string_with_prefix.clone(),
    };

    NdefRecord {
        id: raw.id.clone(),
        tnf: raw.tnf,
        type_: record_type.code(),
        payload: raw.payload.clone(),
        payload_as_hex_string: hex_string(&raw.payload),
        payload_as_string_with_prefix,
        payload_as_string,
    }
}

// status byte, language code, then the text itself
fn text_body(payload: &[u8]) -> String {
    let Some((&status, rest)) = payload.split_first() else {
        warn!("text record without a status byte");
        return String::new();
    };

    let language_length = (status & LANGUAGE_LENGTH_MASK) as usize;
    let Some(text) = rest.get(language_length..) else {
        warn!(
            "text record language length {language_length} runs past the {} byte payload",
            payload.len()
        );
        return String::new();
    };

    if status & UTF16_FLAG != 0 {
        utf16be_lossy(text)
    } else {
        utf8_lossy(text)
    }
}

// identifier code, then the rest of the uri
fn full_uri(payload: &[u8]) -> String {
    let Some((&code, rest)) = payload.split_first() else {
        warn!("uri record without an identifier code");
        return String::new();
    };

    let prefix = uri::prefix(code).unwrap_or_else(|| {
        warn!("unknown uri identifier code {code}, using no prefix");
        ""
    });

    let mut uri = String::with_capacity(prefix.len() + rest.len());
    uri.push_str(prefix);
    uri.push_str(&utf8_lossy(rest));
    uri
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::tnf::Tnf;

    fn well_known(type_: &[u8], payload: &[u8]) -> RawRecord {
        RawRecord::new(Tnf::WellKnown, type_.to_vec(), Vec::new(), payload.to_vec())
    }

    #[test]
    fn test_text_record_skips_status_and_language() {
        let record = decode_record(&well_known(b"T", b"\x02enhi"));

        assert_eq!(record.type_, 84);
        assert_eq!(record.tnf, Tnf::WellKnown);
        assert_eq!(record.payload_as_string, "hi");
        assert_eq!(record.payload_as_string_with_prefix, "\u{2}enhi");
        assert_eq!(record.payload_as_hex_string, "02656e6869");
    }

    #[test]
    fn test_text_record_with_utf8_body() {
        let mut payload = vec![5];
        payload.extend_from_slice(b"en-US");
        payload.extend_from_slice("héllo wörld ✓".as_bytes());

        let record = decode_record(&well_known(b"T", &payload));
        assert_eq!(record.payload_as_string, "héllo wörld ✓");
    }

    #[test]
    fn test_text_record_with_utf16_body() {
        let payload = [0x82, b'e', b'n', 0x00, b'h', 0x00, b'i'];
        let record = decode_record(&well_known(b"T", &payload));
        assert_eq!(record.payload_as_string, "hi");
    }

    #[test]
    fn test_text_record_with_bad_language_length_degrades() {
        let record = decode_record(&well_known(b"T", b"\x3fen"));
        assert_eq!(record.payload_as_string, "");
        assert_eq!(record.payload_as_string_with_prefix, "?en");

        let record = decode_record(&well_known(b"T", b""));
        assert_eq!(record.payload_as_string, "");
        assert_eq!(record.payload_as_hex_string, "");
    }

    #[test]
    fn test_text_record_with_only_language() {
        let record = decode_record(&well_known(b"T", b"\x02en"));
        assert_eq!(record.payload_as_string, "");
    }

    #[test]
    fn test_uri_record_prefixes() {
        let record = decode_record(&well_known(b"U", b"\x00geo:1,2"));
        assert_eq!(record.type_, 85);
        assert_eq!(record.payload_as_string, "geo:1,2");

        let record = decode_record(&well_known(b"U", b"\x02example.com"));
        assert_eq!(record.payload_as_string, "https://www.example.com");

        let record = decode_record(&well_known(b"U", b"\x23foo"));
        assert_eq!(record.payload_as_string, "urn:nfc:foo");
    }

    #[test]
    fn test_uri_record_out_of_range_code_uses_empty_prefix() {
        let record = decode_record(&well_known(b"U", b"\x24example.com"));
        assert_eq!(record.payload_as_string, "example.com");

        let record = decode_record(&well_known(b"U", b"\xffexample.com"));
        assert_eq!(record.payload_as_string, "example.com");

        let record = decode_record(&well_known(b"U", b""));
        assert_eq!(record.payload_as_string, "");
    }

    #[test]
    fn test_other_types_pass_through() {
        let raw = RawRecord::new(
            Tnf::MimeMedia,
            b"application/json".to_vec(),
            b"id1".to_vec(),
            b"{\"a\":1}".to_vec(),
        );

        let record = decode_record(&raw);
        assert_eq!(record.type_, b'a');
        assert_eq!(record.id, b"id1".to_vec());
        assert_eq!(record.payload_as_string, "{\"a\":1}");
        assert_eq!(record.payload_as_string, record.payload_as_string_with_prefix);
    }

    #[test]
    fn test_empty_record_has_no_type() {
        let record = decode_record(&RawRecord::empty());
        assert_eq!(record.type_, 0);
        assert_eq!(record.tnf, Tnf::Empty);
        assert_eq!(record.payload_as_string, "");
        assert!(record.is_empty());
    }

    #[test]
    fn test_malformed_record_does_not_abort_message() {
        let message = RawMessage::new(vec![
            well_known(b"T", b"\x3f"),
            well_known(b"U", b"\x99nowhere"),
            well_known(b"T", b"\x02enok"),
        ]);

        let decoded = decode(&message);
        assert_eq!(decoded.len(), 3);
        assert_eq!(decoded.records[0].payload_as_string, "");
        assert_eq!(decoded.records[1].payload_as_string, "nowhere");
        assert_eq!(decoded.records[2].payload_as_string, "ok");
        assert_eq!(decoded.texts().collect::<Vec<_>>(), vec!["", "ok"]);
    }

    #[test]
    fn test_hex_string_shape_for_all_bytes() {
        let payload = (0..=255_u8).collect::<Vec<u8>>();
        let record = decode_record(&well_known(b"x", &payload));

        assert_eq!(record.payload_as_hex_string.len(), 512);
        assert!(
            record
                .payload_as_hex_string
                .chars()
                .all(|c| matches!(c, '0'..='9' | 'a'..='f'))
        );
        assert_eq!(record.payload_as_string_with_prefix.chars().count(), 256);
    }
}
