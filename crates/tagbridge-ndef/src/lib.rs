//! NDEF codec: raw tag records to typed records and back
//!
//! Decoding never fails, a malformed record degrades to empty strings while
//! the rest of the message still decodes. Encoding covers text and URI
//! records plus the erase sentinel, and the wire module reads and writes the
//! byte level NDEF format for hosts that hand over raw tag memory.

uniffi::setup_scaffolding!();

pub mod decode;
pub mod encode;
pub mod ffi;
pub mod header;
pub mod parser;
pub mod raw;
pub mod record;
pub mod record_type;
pub mod tnf;
pub mod uri;
pub mod writer;

pub use decode::{decode, decode_record};
pub use encode::{EncodeError, TextRecord, UriRecord, encode, encode_erase};
pub use parser::{WireError, parse_message, parse_tlv};
pub use raw::{RawMessage, RawRecord};
pub use record::{NdefMessage, NdefRecord};
pub use record_type::RecordType;
pub use tnf::Tnf;
pub use uri::URI_PREFIXES;
pub use writer::{wrap_tlv, write_message};
