use crate::{parser::WireError, raw::RawRecord, tnf::Tnf};

pub const MESSAGE_BEGIN: u8 = 0b1000_0000;
pub const MESSAGE_END: u8 = 0b0100_0000;
pub const CHUNKED: u8 = 0b0010_0000;
pub const SHORT_RECORD: u8 = 0b0001_0000;
pub const HAS_ID_LENGTH: u8 = 0b0000_1000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NdefHeader {
    pub message_begin: bool,
    pub message_end: bool,
    pub chunked: bool,
    pub short_record: bool,
    pub has_id_length: bool,
    pub type_name_format: Tnf,
    pub type_length: u8,
    pub payload_length: u32,
    pub id_length: Option<u8>,
}

impl NdefHeader {
    /// Header for an unchunked record at the given position of a message
    pub fn for_record(
        record: &RawRecord,
        message_begin: bool,
        message_end: bool,
    ) -> Result<Self, WireError> {
        let type_length = field_length::<u8>("type", record.type_.len())?;
        let payload_length = field_length::<u32>("payload", record.payload.len())?;

        let id_length = match record.id.len() {
            0 => None,
            length => Some(field_length::<u8>("id", length)?),
        };

        Ok(Self {
            message_begin,
            message_end,
            chunked: false,
            short_record: payload_length <= u8::MAX as u32,
            has_id_length: id_length.is_some(),
            type_name_format: record.tnf,
            type_length,
            payload_length,
            id_length,
        })
    }

    pub fn flags_byte(&self) -> u8 {
        let mut byte = self.type_name_format.bits();

        for (set, flag) in [
            (self.message_begin, MESSAGE_BEGIN),
            (self.message_end, MESSAGE_END),
            (self.chunked, CHUNKED),
            (self.short_record, SHORT_RECORD),
            (self.has_id_length, HAS_ID_LENGTH),
        ] {
            if set {
                byte |= flag;
            }
        }

        byte
    }
}

fn field_length<T: TryFrom<usize>>(field: &str, length: usize) -> Result<T, WireError> {
    T::try_from(length).map_err(|_| WireError::FieldTooLong {
        field: field.to_string(),
        length: length as u64,
    })
}
