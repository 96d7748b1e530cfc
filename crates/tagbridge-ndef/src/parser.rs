pub mod stream;

use stream::{Stream, StreamExt as _};
use winnow::{
    ModalResult, Parser,
    binary::{
        Endianness, be_u8, be_u16,
        bits::{bits, bool as take_bool, take as take_bits},
    },
    error::{ContextError, ErrMode, Needed},
    token::{any, take},
};

use crate::{
    header::NdefHeader,
    raw::{RawMessage, RawRecord},
    tnf::Tnf,
};

pub const TLV_NULL: u8 = 0x00;
pub const TLV_NDEF_MESSAGE: u8 = 0x03;
pub const TLV_TERMINATOR: u8 = 0xFE;

/// Length byte that announces a two byte length
pub const TLV_LONG_LENGTH: u8 = 0xFF;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, uniffi::Error)]
pub enum WireError {
    /// `needed` is 0 when the parser could not tell how much is missing
    #[error("not enough data to parse, need {needed} more bytes")]
    Incomplete { needed: u64 },

    #[error("error parsing the NDEF message: {0}")]
    Parsing(String),

    #[error("no NDEF message TLV found")]
    NoNdefTlv,

    #[error("{field} is {length} bytes, too long for its length field")]
    FieldTooLong { field: String, length: u64 },
}

impl From<ErrMode<ContextError>> for WireError {
    fn from(error: ErrMode<ContextError>) -> Self {
        match error {
            ErrMode::Incomplete(Needed::Size(needed)) => Self::Incomplete {
                needed: needed.get() as u64,
            },
            ErrMode::Incomplete(Needed::Unknown) => Self::Incomplete { needed: 0 },
            error => Self::Parsing(error.to_string()),
        }
    }
}

/// Parse a complete NDEF message, chunked records are joined back together
pub fn parse_message(data: &[u8]) -> Result<RawMessage, WireError> {
    let mut input = stream::new(data);
    let message = parse_records(&mut input)?;

    if !input.is_empty() {
        let trailing = tagbridge_util::hex_string(&input.remaining());
        tracing::debug!("{} bytes left after the message end record: {trailing}", input.len());
    }

    Ok(message)
}

/// Find the NDEF message TLV in tag memory and return its value
pub fn parse_tlv(data: &[u8]) -> Result<Vec<u8>, WireError> {
    let mut input = stream::new(data);

    while !input.is_empty() {
        match parse_tlv_block(&mut input)? {
            Tlv::Null => continue,
            Tlv::Terminator => break,
            Tlv::Block { tag: TLV_NDEF_MESSAGE, value } => return Ok(value.to_vec()),
            Tlv::Block { tag, .. } => tracing::debug!("skipping tlv block {tag:#04x}"),
        }
    }

    Err(WireError::NoNdefTlv)
}

pub fn parse_records(input: &mut Stream<'_>) -> ModalResult<RawMessage> {
    let mut records = Vec::new();
    let mut chunked: Option<RawRecord> = None;

    while !input.is_empty() {
        let (header, record) = parse_record.parse_next(input)?;

        match chunked.take() {
            None if header.chunked => chunked = Some(record),
            None => records.push(record),

            // middle and last chunks only carry payload
            Some(mut first) => {
                first.payload.extend_from_slice(&record.payload);
                if header.chunked {
                    chunked = Some(first);
                } else {
                    records.push(first);
                }
            }
        }

        if header.message_end {
            break;
        }
    }

    if chunked.is_some() {
        tracing::warn!("message ended in the middle of a chunked record");
        return Err(ErrMode::Cut(ContextError::new()));
    }

    Ok(RawMessage { records })
}

pub fn parse_record(input: &mut Stream<'_>) -> ModalResult<(NdefHeader, RawRecord)> {
    let header = parse_header.parse_next(input)?;
    let type_ = parse_bytes(input, header.type_length as usize)?;
    let id = parse_bytes(input, header.id_length.unwrap_or(0) as usize)?;
    let payload = parse_bytes(input, header.payload_length as usize)?;

    let record = RawRecord {
        tnf: header.type_name_format,
        type_,
        id,
        payload,
    };

    Ok((header, record))
}

// private
enum Tlv<'i> {
    Null,
    Terminator,
    Block { tag: u8, value: &'i [u8] },
}

fn parse_tlv_block<'i>(input: &mut Stream<'i>) -> ModalResult<Tlv<'i>> {
    let tag = be_u8.parse_next(input)?;

    match tag {
        TLV_NULL => return Ok(Tlv::Null),
        TLV_TERMINATOR => return Ok(Tlv::Terminator),
        _ => {}
    }

    let length_indicator = be_u8.parse_next(input)?;
    let length = if length_indicator == TLV_LONG_LENGTH {
        be_u16.parse_next(input)? as usize
    } else {
        length_indicator as usize
    };

    let value = take(length).parse_next(input)?;
    Ok(Tlv::Block { tag, value })
}

fn parse_header_byte(input: &mut Stream<'_>) -> ModalResult<(bool, bool, bool, bool, bool, u8)> {
    bits::<_, _, ErrMode<ContextError>, _, _>((
        take_bool,
        take_bool,
        take_bool,
        take_bool,
        take_bool,
        take_bits(3_u8),
    ))
    .parse_next(input)
}

fn parse_header(input: &mut Stream<'_>) -> ModalResult<NdefHeader> {
    let (message_begin, message_end, chunked, short_record, has_id_length, type_name_format) =
        parse_header_byte(input)?;

    let type_length = winnow::binary::u8.parse_next(input)?;

    let payload_length = if short_record {
        any.map(|x: u8| x as u32).parse_next(input)?
    } else {
        winnow::binary::u32(Endianness::Big).parse_next(input)?
    };

    let id_length = if has_id_length {
        Some(any.parse_next(input)?)
    } else {
        None
    };

    Ok(NdefHeader {
        message_begin,
        message_end,
        chunked,
        short_record,
        has_id_length,
        type_name_format: Tnf::from_bits(type_name_format),
        type_length,
        payload_length,
        id_length,
    })
}

fn parse_bytes(input: &mut Stream<'_>, length: usize) -> ModalResult<Vec<u8>> {
    take(length).map(|s: &[u8]| s.to_vec()).parse_next(input)
}
