//! Seams to the platform NFC stack
//!
//! A host implements these traits over its native reader API. Every call may
//! be made from a tokio worker, so implementations must be `Send + Sync` and
//! hop to whatever thread the native API needs themselves.

use std::{fmt::Debug, sync::Arc};

use serde::{Deserialize, Serialize};
use tagbridge_ndef::{NdefMessage, RawMessage};

use crate::{error::PlatformError, options::SessionOptions};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TagStatus {
    NotSupported,
    ReadOnly,
    ReadWrite,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NdefStatus {
    pub status: TagStatus,
    /// Usable NDEF bytes, 0 when the platform does not report it
    pub capacity: usize,
}

/// A detected tag, as handed to a tag listener
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NfcTagData {
    pub id: Vec<u8>,
    pub tech_list: Vec<String>,
}

/// A detected tag together with its decoded NDEF message
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NfcNdefData {
    pub id: Vec<u8>,
    pub tech_list: Vec<String>,
    pub message: NdefMessage,
}

impl NfcNdefData {
    pub fn new(tag: NfcTagData, message: NdefMessage) -> Self {
        Self {
            id: tag.id,
            tech_list: tag.tech_list,
            message,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    NdefDetected { tag: NfcTagData, message: RawMessage },
    TagDetected(NfcTagData),

    /// A tag was seen but could not be read, the session keeps polling
    Unreadable(String),

    /// The session ended, no more events follow
    Invalidated(PlatformError),
}

pub trait NfcPlatform: Send + Sync + Debug {
    fn reading_available(&self) -> bool;

    fn enabled(&self) -> bool {
        self.reading_available()
    }

    /// Whether sessions can connect to a tag directly, needed to write and erase
    fn supports_tag_connection(&self) -> bool;

    fn open_session(&self, options: &SessionOptions) -> Result<Arc<dyn SessionHandle>, PlatformError>;
}

#[async_trait::async_trait]
pub trait SessionHandle: Send + Sync + Debug {
    async fn begin(&self) -> Result<(), PlatformError>;

    /// End the session, `error_message` is shown to the user when set
    fn invalidate(&self, error_message: Option<&str>);

    fn set_alert_message(&self, message: &str);

    async fn connect_to_tag(&self) -> Result<Box<dyn TagHandle>, PlatformError>;

    async fn restart_polling(&self) -> Result<(), PlatformError>;

    async fn next_event(&self) -> SessionEvent;
}

#[async_trait::async_trait]
pub trait TagHandle: Send + Sync + Debug {
    async fn query_status(&self) -> Result<NdefStatus, PlatformError>;

    async fn read_message(&self) -> Result<RawMessage, PlatformError>;

    async fn write_message(&self, message: &RawMessage) -> Result<(), PlatformError>;
}
