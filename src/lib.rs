//! Read, write and erase NFC tags through a host supplied platform
//!
//! The codec lives in `tagbridge-ndef`, this crate adds the session layer on
//! top of it: the guarded write machine, listening sessions, and the [`Nfc`]
//! facade hosts talk to.

pub mod error;
pub mod listen;
pub mod logging;
pub mod main_context;
pub mod nfc;
pub mod options;
pub mod platform;
pub mod write_session;

#[cfg(test)]
pub(crate) mod testing;

pub use error::{NfcError, PlatformError};
pub use listen::{ListenExit, ListenState, ListeningSession, NdefCallback, TagCallback};
pub use main_context::{InlineDispatcher, MainContext, MainContextDispatcher, QueueDispatcher};
pub use nfc::{Nfc, SessionKind};
pub use options::{ListenerOptions, SessionOptions, WriteTagOptions};
pub use platform::{
    NdefStatus, NfcNdefData, NfcPlatform, NfcTagData, SessionEvent, SessionHandle, TagHandle,
    TagStatus,
};
pub use write_session::{
    GuardedWriteSession, WriteGuard, WriteGuardOutcome, WriteResult, WriteState, WriteStep,
};

pub use tagbridge_ndef as ndef;
