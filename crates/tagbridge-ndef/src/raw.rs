use serde::{Deserialize, Serialize};

use crate::tnf::Tnf;

/// A record as the platform hands it over, type field kept whole
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize, uniffi::Record)]
pub struct RawRecord {
    pub tnf: Tnf,
    pub type_: Vec<u8>,
    pub id: Vec<u8>,
    pub payload: Vec<u8>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize, uniffi::Record)]
pub struct RawMessage {
    pub records: Vec<RawRecord>,
}

impl RawRecord {
    pub fn new(
        tnf: Tnf,
        type_: impl Into<Vec<u8>>,
        id: impl Into<Vec<u8>>,
        payload: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            tnf,
            type_: type_.into(),
            id: id.into(),
            payload: payload.into(),
        }
    }

    /// The record written to wipe a tag
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.tnf == Tnf::Empty
            && self.type_.is_empty()
            && self.id.is_empty()
            && self.payload.is_empty()
    }
}

impl RawMessage {
    pub fn new(records: Vec<RawRecord>) -> Self {
        Self { records }
    }

    /// Erase sentinel, exactly one empty record
    pub fn erase() -> Self {
        Self {
            records: vec![RawRecord::empty()],
        }
    }

    pub fn is_erase(&self) -> bool {
        matches!(self.records.as_slice(), [record] if record.is_empty())
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl From<Vec<RawRecord>> for RawMessage {
    fn from(records: Vec<RawRecord>) -> Self {
        Self { records }
    }
}
