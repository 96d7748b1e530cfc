use std::time::Duration;

use serde::{Deserialize, Serialize};
use tagbridge_ndef::{TextRecord, UriRecord};

pub const DEFAULT_BEFORE_CHECK_ERROR_MESSAGE: &str = "Tag content rejected before write.";
pub const DEFAULT_AFTER_CHECK_ERROR_MESSAGE: &str = "Tag content rejected after write.";

/// Options shared by listening and write sessions
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SessionOptions {
    /// End a listening session after the first NDEF message
    pub stop_after_first_read: bool,

    /// Alert shown when the session starts
    pub start_message: Option<String>,

    /// Alert shown when a session ends successfully
    pub end_message: Option<String>,

    pub write_guard_before_check_error_message: Option<String>,
    pub write_guard_after_check_error_message: Option<String>,

    /// Alert shown while waiting to read the tag back
    pub write_guard_after_check_message: Option<String>,

    /// Milliseconds to wait after writing before re-polling
    pub write_guard_after_check_delay: u64,
}

pub type ListenerOptions = SessionOptions;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WriteTagOptions {
    #[serde(flatten)]
    pub session: SessionOptions,

    #[serde(default)]
    pub text_records: Vec<TextRecord>,

    #[serde(default)]
    pub uri_records: Vec<UriRecord>,
}

impl SessionOptions {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn after_check_delay(&self) -> Duration {
        Duration::from_millis(self.write_guard_after_check_delay)
    }

    pub fn start_message(&self) -> Option<&str> {
        non_empty(&self.start_message)
    }

    pub fn end_message(&self) -> Option<&str> {
        non_empty(&self.end_message)
    }

    pub fn after_check_message(&self) -> Option<&str> {
        non_empty(&self.write_guard_after_check_message)
    }

    pub fn before_check_error_message(&self) -> &str {
        non_empty(&self.write_guard_before_check_error_message)
            .unwrap_or(DEFAULT_BEFORE_CHECK_ERROR_MESSAGE)
    }

    pub fn after_check_error_message(&self) -> &str {
        non_empty(&self.write_guard_after_check_error_message)
            .unwrap_or(DEFAULT_AFTER_CHECK_ERROR_MESSAGE)
    }
}

impl WriteTagOptions {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

impl From<SessionOptions> for WriteTagOptions {
    fn from(session: SessionOptions) -> Self {
        Self { session, ..Default::default() }
    }
}

fn non_empty(message: &Option<String>) -> Option<&str> {
    message.as_deref().filter(|message| !message.is_empty())
}
