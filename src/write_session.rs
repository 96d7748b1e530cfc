//! Guarded write state machine
//!
//! A write reads the tag first, asks the before guard, writes, waits for the
//! configured delay, reconnects, reads the tag back and asks the after guard.
//! Each step is a [`WriteState`] value, the tag handle lives inside the state
//! that needs it and is dropped as soon as the machine moves past it.

use std::sync::Arc;

use tagbridge_ndef::{NdefMessage, RawMessage, decode, write_message};
use tagbridge_tokio::task::sleep_ms;
use tagbridge_util::result_ext::ResultExt as _;
use tracing::{debug, info, warn};

use crate::{
    error::{NfcError, Result},
    main_context::MainContext,
    options::SessionOptions,
    platform::{NdefStatus, SessionHandle, TagHandle, TagStatus},
};

pub const ERASED_MESSAGE: &str = "Erased data from NFC tag.";

/// Predicate consulted with the tag's current content
pub type WriteGuard = Arc<dyn Fn(&NdefMessage) -> bool + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WriteStep {
    Connecting,
    QueryingStatus,
    ReadingBefore,
    BeforeGuard,
    Writing,
    PollingAfter,
    ReadingAfter,
    AfterGuard,
    Done,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteResult {
    Erased,
    Written(NdefMessage),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteGuardOutcome {
    BeforeCheckRejected(NdefMessage),
    AfterCheckRejected(NdefMessage),
    Accepted,
}

#[derive(Debug)]
pub enum WriteState {
    Connecting,
    QueryingStatus(Box<dyn TagHandle>),
    ReadingBefore(Box<dyn TagHandle>),
    BeforeGuard(Box<dyn TagHandle>, NdefMessage),
    Writing(Box<dyn TagHandle>),
    PollingAfter,
    ReadingAfter(Box<dyn TagHandle>),
    AfterGuard(NdefMessage),
    Done(WriteResult),
    Failed(NfcError),
}

impl WriteState {
    pub fn step(&self) -> WriteStep {
        match self {
            Self::Connecting => WriteStep::Connecting,
            Self::QueryingStatus(_) => WriteStep::QueryingStatus,
            Self::ReadingBefore(_) => WriteStep::ReadingBefore,
            Self::BeforeGuard(..) => WriteStep::BeforeGuard,
            Self::Writing(_) => WriteStep::Writing,
            Self::PollingAfter => WriteStep::PollingAfter,
            Self::ReadingAfter(_) => WriteStep::ReadingAfter,
            Self::AfterGuard(_) => WriteStep::AfterGuard,
            Self::Done(_) => WriteStep::Done,
            Self::Failed(_) => WriteStep::Failed,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done(_) | Self::Failed(_))
    }
}

impl WriteGuardOutcome {
    fn into_result(self, options: &SessionOptions) -> Result<()> {
        match self {
            Self::Accepted => Ok(()),
            Self::BeforeCheckRejected(data) => Err(NfcError::WriteGuardBeforeCheckError {
                message: options.before_check_error_message().to_string(),
                data,
            }),
            Self::AfterCheckRejected(data) => Err(NfcError::WriteGuardAfterCheckError {
                message: options.after_check_error_message().to_string(),
                data,
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Checkpoint {
    Before,
    After,
}

pub struct GuardedWriteSession {
    session: Arc<dyn SessionHandle>,
    main: MainContext,
    message: RawMessage,
    options: SessionOptions,
    before_guard: Option<WriteGuard>,
    after_guard: Option<WriteGuard>,
    state: WriteState,
    path: Vec<WriteStep>,
    capacity: usize,
}

impl std::fmt::Debug for GuardedWriteSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GuardedWriteSession")
            .field("message", &self.message)
            .field("state", &self.state)
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

impl GuardedWriteSession {
    pub fn new(
        session: Arc<dyn SessionHandle>,
        main: MainContext,
        message: RawMessage,
        options: SessionOptions,
    ) -> Self {
        Self {
            session,
            main,
            message,
            options,
            before_guard: None,
            after_guard: None,
            state: WriteState::Connecting,
            path: vec![WriteStep::Connecting],
            capacity: 0,
        }
    }

    pub fn with_guards(mut self, before: Option<WriteGuard>, after: Option<WriteGuard>) -> Self {
        self.before_guard = before;
        self.after_guard = after;
        self
    }

    pub fn step(&self) -> WriteStep {
        self.state.step()
    }

    /// Every step visited so far, in order
    pub fn path(&self) -> &[WriteStep] {
        &self.path
    }

    /// Drive the machine to `Done` or `Failed` and end the platform session
    pub async fn run(&mut self) -> Result<WriteResult> {
        if self.state.is_terminal() {
            return self.result();
        }

        info!("starting write of {} records", self.message.len());

        while !self.state.is_terminal() {
            let state = std::mem::replace(&mut self.state, WriteState::Connecting);
            let from = state.step();
            let next = self.advance(state).await;

            debug!("write session {from:?} -> {:?}", next.step());
            self.path.push(next.step());
            self.state = next;
        }

        self.finish()
    }

    async fn advance(&mut self, state: WriteState) -> WriteState {
        match state {
            WriteState::Connecting => match self.session.connect_to_tag().await {
                Ok(tag) => WriteState::QueryingStatus(tag),
                Err(error) => WriteState::Failed(NfcError::ConnectError(error.to_string())),
            },

            WriteState::QueryingStatus(tag) => match tag.query_status().await {
                Ok(NdefStatus { status: TagStatus::ReadWrite, capacity }) => {
                    self.capacity = capacity;
                    WriteState::ReadingBefore(tag)
                }
                Ok(NdefStatus { status: TagStatus::ReadOnly, .. }) => {
                    WriteState::Failed(NfcError::TagReadOnly)
                }
                Ok(NdefStatus { status: TagStatus::NotSupported, .. }) => {
                    WriteState::Failed(NfcError::TagNotNdefCompliant)
                }
                Err(error) => WriteState::Failed(NfcError::StatusQueryError(error.to_string())),
            },

            WriteState::ReadingBefore(tag) => match read(&*tag).await {
                Ok(data) => WriteState::BeforeGuard(tag, data),
                Err(error) => WriteState::Failed(error),
            },

            WriteState::BeforeGuard(tag, data) => {
                let checked = self.check(Checkpoint::Before, data).await;
                match checked.and_then(|outcome| outcome.into_result(&self.options)) {
                    Ok(()) => WriteState::Writing(tag),
                    Err(error) => WriteState::Failed(error),
                }
            }

            WriteState::Writing(tag) => match self.write(&*tag).await {
                Ok(()) if self.message.is_erase() => WriteState::Done(WriteResult::Erased),
                Ok(()) => WriteState::PollingAfter,
                Err(error) => WriteState::Failed(error),
            },

            WriteState::PollingAfter => match self.reconnect().await {
                Ok(tag) => WriteState::ReadingAfter(tag),
                Err(error) => WriteState::Failed(error),
            },

            WriteState::ReadingAfter(tag) => match read(&*tag).await {
                Ok(data) => WriteState::AfterGuard(data),
                Err(error) => WriteState::Failed(error),
            },

            WriteState::AfterGuard(data) => {
                let checked = self.check(Checkpoint::After, data.clone()).await;
                match checked.and_then(|outcome| outcome.into_result(&self.options)) {
                    Ok(()) => WriteState::Done(WriteResult::Written(data)),
                    Err(error) => WriteState::Failed(error),
                }
            }

            terminal @ (WriteState::Done(_) | WriteState::Failed(_)) => terminal,
        }
    }

    async fn check(&self, checkpoint: Checkpoint, data: NdefMessage) -> Result<WriteGuardOutcome> {
        let guard = match checkpoint {
            Checkpoint::Before => self.before_guard.clone(),
            Checkpoint::After => self.after_guard.clone(),
        };

        let Some(guard) = guard else {
            return Ok(WriteGuardOutcome::Accepted);
        };

        let (accepted, data) = self
            .main
            .call(move || {
                let accepted = guard(&data);
                (accepted, data)
            })
            .await?;

        debug!("{checkpoint:?} guard accepted: {accepted}");

        let outcome = match (accepted, checkpoint) {
            (true, _) => WriteGuardOutcome::Accepted,
            (false, Checkpoint::Before) => WriteGuardOutcome::BeforeCheckRejected(data),
            (false, Checkpoint::After) => WriteGuardOutcome::AfterCheckRejected(data),
        };

        Ok(outcome)
    }

    async fn write(&self, tag: &dyn TagHandle) -> Result<()> {
        let capacity = self.capacity;
        if capacity > 0 {
            let size = write_message(&self.message).map_err_str(NfcError::WriteError)?.len();
            if size > capacity {
                warn!("message is {size} bytes, tag holds {capacity}");
                return Err(NfcError::WriteError(format!(
                    "message is {size} bytes but the tag only holds {capacity}"
                )));
            }
        }

        tag.write_message(&self.message).await.map_err_str(NfcError::WriteError)
    }

    async fn reconnect(&self) -> Result<Box<dyn TagHandle>> {
        if let Some(message) = self.options.after_check_message() {
            self.session.set_alert_message(message);
        }

        sleep_ms(self.options.write_guard_after_check_delay).await;

        self.session.restart_polling().await.map_err_str(NfcError::ConnectError)?;
        self.session.connect_to_tag().await.map_err_str(NfcError::ConnectError)
    }

    fn finish(&self) -> Result<WriteResult> {
        match &self.state {
            WriteState::Done(result) => {
                let alert = match result {
                    WriteResult::Erased => Some(ERASED_MESSAGE),
                    WriteResult::Written(_) => self.options.end_message(),
                };

                if let Some(alert) = alert {
                    self.session.set_alert_message(alert);
                }

                info!("write session done");
                self.session.invalidate(None);
            }

            WriteState::Failed(error) => {
                warn!("write session failed: {error}");
                self.session.invalidate(Some(&error.user_message()));
            }

            _ => {}
        }

        self.result()
    }

    fn result(&self) -> Result<WriteResult> {
        match &self.state {
            WriteState::Done(result) => Ok(result.clone()),
            WriteState::Failed(error) => Err(error.clone()),
            other => Err(NfcError::WriteError(format!(
                "write session stopped in {:?}",
                other.step()
            ))),
        }
    }
}

async fn read(tag: &dyn TagHandle) -> Result<NdefMessage> {
    let raw = tag.read_message().await.map_err_str(NfcError::ReadError)?;
    Ok(decode(&raw))
}
