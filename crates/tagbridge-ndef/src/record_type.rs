/// First byte of a record's type field, the part the decoder cares about
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum RecordType {
    /// "T", well known text record
    Text,
    /// "U", well known URI record
    Uri,
    /// Any other first byte, payload is passed through
    Other(u8),
    /// Empty type field
    Absent,
}

impl RecordType {
    pub const TEXT: u8 = b'T';
    pub const URI: u8 = b'U';

    pub fn from_type_field(type_: &[u8]) -> Self {
        match type_.first() {
            None => RecordType::Absent,
            Some(&Self::TEXT) => RecordType::Text,
            Some(&Self::URI) => RecordType::Uri,
            Some(&other) => RecordType::Other(other),
        }
    }

    /// Decimal value reported on a decoded record, 0 when there is no type
    pub const fn code(self) -> u8 {
        match self {
            RecordType::Text => Self::TEXT,
            RecordType::Uri => Self::URI,
            RecordType::Other(code) => code,
            RecordType::Absent => 0,
        }
    }

    pub const fn type_field(self) -> &'static [u8] {
        match self {
            RecordType::Text => b"T",
            RecordType::Uri => b"U",
            RecordType::Other(_) | RecordType::Absent => b"",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_type_field() {
        assert_eq!(RecordType::from_type_field(b"T"), RecordType::Text);
        assert_eq!(RecordType::from_type_field(b"U"), RecordType::Uri);
        assert_eq!(RecordType::from_type_field(b""), RecordType::Absent);
        assert_eq!(
            RecordType::from_type_field(b"application/json"),
            RecordType::Other(b'a')
        );

        // only the first byte matters
        assert_eq!(RecordType::from_type_field(b"Sp"), RecordType::Other(83));
        assert_eq!(RecordType::from_type_field(b"Tx"), RecordType::Text);
    }

    #[test]
    fn test_codes() {
        assert_eq!(RecordType::Text.code(), 84);
        assert_eq!(RecordType::Uri.code(), 85);
        assert_eq!(RecordType::Absent.code(), 0);
        assert_eq!(RecordType::Other(97).code(), 97);
    }
}
