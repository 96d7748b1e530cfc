use tagbridge_ndef::{EncodeError, NdefMessage};

pub const CONNECT_FAILED_MESSAGE: &str = "Unable to connect to tag.";
pub const STATUS_QUERY_FAILED_MESSAGE: &str = "Unable to query the NDEF status of tag.";
pub const NOT_NDEF_COMPLIANT_MESSAGE: &str = "Tag is not NDEF compliant.";
pub const READ_ONLY_MESSAGE: &str = "Tag is read only.";
pub const READ_FAILED_MESSAGE: &str = "Error reading NDEF message from tag.";
pub const WRITE_FAILED_MESSAGE: &str = "Write NDEF message failed.";

pub type Result<T, E = NfcError> = std::result::Result<T, E>;

/// Error reported by a platform collaborator, only the reason is kept
#[derive(Debug, Clone, PartialEq, Eq, Hash, thiserror::Error)]
#[error("{reason}")]
pub struct PlatformError {
    pub reason: String,
}

impl PlatformError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self { reason: reason.into() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NfcError {
    #[error("NFC is not available on this device")]
    Unavailable,

    #[error("{0} is not supported on this platform")]
    Unsupported(String),

    #[error("unable to start NFC session: {0}")]
    SessionError(String),

    #[error("unable to connect to tag: {0}")]
    ConnectError(String),

    #[error("unable to query the NDEF status of tag: {0}")]
    StatusQueryError(String),

    #[error("tag is not NDEF compliant")]
    TagNotNdefCompliant,

    #[error("tag is read only")]
    TagReadOnly,

    #[error("error reading NDEF message from tag: {0}")]
    ReadError(String),

    #[error("write NDEF message failed: {0}")]
    WriteError(String),

    #[error(transparent)]
    Encode(#[from] EncodeError),

    #[error("{message}")]
    WriteGuardBeforeCheckError { message: String, data: NdefMessage },

    #[error("{message}")]
    WriteGuardAfterCheckError { message: String, data: NdefMessage },

    #[error("NFC session was cancelled")]
    Cancelled,
}

impl NfcError {
    /// Tag content attached to a guard rejection
    pub fn data(&self) -> Option<&NdefMessage> {
        match self {
            Self::WriteGuardBeforeCheckError { data, .. } => Some(data),
            Self::WriteGuardAfterCheckError { data, .. } => Some(data),
            _ => None,
        }
    }

    /// Text shown on the platform sheet when a session ends with this error
    pub fn user_message(&self) -> String {
        match self {
            Self::ConnectError(_) => CONNECT_FAILED_MESSAGE.to_string(),
            Self::StatusQueryError(_) => STATUS_QUERY_FAILED_MESSAGE.to_string(),
            Self::TagNotNdefCompliant => NOT_NDEF_COMPLIANT_MESSAGE.to_string(),
            Self::TagReadOnly => READ_ONLY_MESSAGE.to_string(),
            Self::ReadError(_) => READ_FAILED_MESSAGE.to_string(),
            Self::WriteError(_) | Self::Encode(_) => WRITE_FAILED_MESSAGE.to_string(),
            Self::WriteGuardBeforeCheckError { message, .. } => message.clone(),
            Self::WriteGuardAfterCheckError { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}
