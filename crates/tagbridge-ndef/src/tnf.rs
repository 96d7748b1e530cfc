use serde::{Deserialize, Serialize};

/// Type Name Format, the 3-bit field that says how type and payload are read
///
/// Serialized as its numeric value.
#[derive(
    Debug, Copy, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize, uniffi::Enum,
)]
#[serde(into = "u8", from = "u8")]
pub enum Tnf {
    #[default]
    Empty,
    WellKnown,
    MimeMedia,
    AbsoluteUri,
    External,
    Unknown,
    Unchanged,
    Reserved,
}

impl Tnf {
    pub const ALL: [Tnf; 8] = [
        Tnf::Empty,
        Tnf::WellKnown,
        Tnf::MimeMedia,
        Tnf::AbsoluteUri,
        Tnf::External,
        Tnf::Unknown,
        Tnf::Unchanged,
        Tnf::Reserved,
    ];

    /// Only the low three bits are looked at
    pub const fn from_bits(bits: u8) -> Self {
        match bits & 0b111 {
            0 => Tnf::Empty,
            1 => Tnf::WellKnown,
            2 => Tnf::MimeMedia,
            3 => Tnf::AbsoluteUri,
            4 => Tnf::External,
            5 => Tnf::Unknown,
            6 => Tnf::Unchanged,
            _ => Tnf::Reserved,
        }
    }

    pub const fn bits(self) -> u8 {
        match self {
            Tnf::Empty => 0,
            Tnf::WellKnown => 1,
            Tnf::MimeMedia => 2,
            Tnf::AbsoluteUri => 3,
            Tnf::External => 4,
            Tnf::Unknown => 5,
            Tnf::Unchanged => 6,
            Tnf::Reserved => 7,
        }
    }
}

impl From<Tnf> for u8 {
    fn from(tnf: Tnf) -> Self {
        tnf.bits()
    }
}

impl From<u8> for Tnf {
    fn from(bits: u8) -> Self {
        Tnf::from_bits(bits)
    }
}
