use serde::{Deserialize, Serialize};

use crate::{
    raw::{RawMessage, RawRecord},
    record_type::RecordType,
    tnf::Tnf,
    uri,
};

pub const DEFAULT_LANGUAGE_CODE: &str = "en";

/// Longest language code the status byte can describe
pub const MAX_LANGUAGE_CODE_LENGTH: usize = 63;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, uniffi::Error)]
pub enum EncodeError {
    #[error("language code {language_code:?} is {length} bytes, at most 63 fit in the status byte")]
    LanguageCodeTooLong { language_code: String, length: u32 },
}

type Result<T, E = EncodeError> = std::result::Result<T, E>;

/// A text record to write
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, uniffi::Record)]
#[serde(rename_all = "camelCase")]
pub struct TextRecord {
    pub text: String,
    /// IANA language tag, for example "en" or "fi-FI"
    #[serde(default = "default_language_code")]
    pub language_code: String,
    #[serde(default)]
    pub id: Vec<u8>,
}

/// A URI record to write, compressed with the URI prefix table
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, uniffi::Record)]
pub struct UriRecord {
    pub uri: String,
    #[serde(default)]
    pub id: Vec<u8>,
}

fn default_language_code() -> String {
    DEFAULT_LANGUAGE_CODE.to_string()
}

impl TextRecord {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            language_code: default_language_code(),
            id: Vec::new(),
        }
    }

    pub fn with_language_code(mut self, language_code: impl Into<String>) -> Self {
        self.language_code = language_code.into();
        self
    }

    pub fn with_id(mut self, id: impl Into<Vec<u8>>) -> Self {
        self.id = id.into();
        self
    }

    /// Language code actually written, an empty code falls back to "en"
    pub fn effective_language_code(&self) -> &str {
        if self.language_code.is_empty() {
            DEFAULT_LANGUAGE_CODE
        } else {
            &self.language_code
        }
    }

    pub fn to_raw(&self) -> Result<RawRecord> {
        let language_code = self.effective_language_code();
        let language_length = language_code.len();

        if language_length > MAX_LANGUAGE_CODE_LENGTH {
            return Err(EncodeError::LanguageCodeTooLong {
                language_code: language_code.to_string(),
                length: language_length as u32,
            });
        }

        // utf-8, so the status byte is only the length
        let mut payload = Vec::with_capacity(1 + language_length + self.text.len());
        payload.push(language_length as u8);
        payload.extend_from_slice(language_code.as_bytes());
        payload.extend_from_slice(self.text.as_bytes());

        Ok(RawRecord {
            tnf: Tnf::WellKnown,
            type_: RecordType::Text.type_field().to_vec(),
            id: self.id.clone(),
            payload,
        })
    }
}

impl UriRecord {
    pub fn new(uri: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            id: Vec::new(),
        }
    }

    pub fn with_id(mut self, id: impl Into<Vec<u8>>) -> Self {
        self.id = id.into();
        self
    }

    pub fn to_raw(&self) -> RawRecord {
        let (code, rest) = uri::abbreviate(&self.uri);

        let mut payload = Vec::with_capacity(1 + rest.len());
        payload.push(code);
        payload.extend_from_slice(rest.as_bytes());

        RawRecord {
            tnf: Tnf::WellKnown,
            type_: RecordType::Uri.type_field().to_vec(),
            id: self.id.clone(),
            payload,
        }
    }
}

/// Encode text records followed by URI records, each kept in caller order
pub fn encode(text_records: &[TextRecord], uri_records: &[UriRecord]) -> Result<RawMessage> {
    let mut records = Vec::with_capacity(text_records.len() + uri_records.len());

    for text_record in text_records {
        records.push(text_record.to_raw()?);
    }

    records.extend(uri_records.iter().map(UriRecord::to_raw));

    Ok(RawMessage { records })
}

/// The message that wipes a tag
pub fn encode_erase() -> RawMessage {
    RawMessage::erase()
}
