//! Entry point for hosts: availability, listeners, writing and erasing
//!
//! An [`Nfc`] owns at most one platform session at a time. Starting a session
//! invalidates whatever session was active and aborts the task driving it, a
//! write that loses its session this way resolves to [`NfcError::Cancelled`].

use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};

use parking_lot::Mutex;
use tagbridge_ndef::{NdefMessage, RawMessage, decode, encode, encode_erase};
use tagbridge_tokio::AbortableTask;
use tagbridge_util::result_ext::ResultExt as _;
use tracing::{debug, info};

use crate::{
    error::{NfcError, Result},
    listen::{ListeningSession, Listeners, NdefCallback, SharedListeners, TagCallback},
    main_context::{InlineDispatcher, MainContext, MainContextDispatcher},
    options::{ListenerOptions, SessionOptions, WriteTagOptions},
    platform::{NfcPlatform, SessionHandle},
    write_session::{GuardedWriteSession, WriteGuard, WriteResult},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
pub enum SessionKind {
    #[display("listen")]
    Listen,
    #[display("write")]
    Write,
}

#[derive(Debug)]
struct ActiveSession {
    id: u64,
    kind: SessionKind,
    session: Arc<dyn SessionHandle>,
    task: AbortableTask<()>,
}

impl ActiveSession {
    fn cancel(self) {
        debug!("cancelling {} session {}", self.kind, self.id);

        if !self.task.is_finished() {
            self.session.invalidate(None);
        }

        // dropping the task aborts it
        drop(self.task);
    }
}

pub struct Nfc {
    platform: Arc<dyn NfcPlatform>,
    main: MainContext,
    listeners: SharedListeners,
    active: Mutex<Option<ActiveSession>>,
    next_id: AtomicU64,
}

impl std::fmt::Debug for Nfc {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Nfc")
            .field("platform", &self.platform)
            .field("active", &self.active_session())
            .finish_non_exhaustive()
    }
}

impl Nfc {
    pub fn new(platform: Arc<dyn NfcPlatform>, dispatcher: Arc<dyn MainContextDispatcher>) -> Self {
        Self {
            platform,
            main: MainContext::new(dispatcher),
            listeners: SharedListeners::default(),
            active: Mutex::new(None),
            next_id: AtomicU64::new(0),
        }
    }

    /// Callbacks and guards run on whichever thread the session task is on
    pub fn with_inline_dispatch(platform: Arc<dyn NfcPlatform>) -> Self {
        Self::new(platform, Arc::new(InlineDispatcher))
    }

    pub fn available(&self) -> bool {
        self.platform.reading_available()
    }

    pub fn enabled(&self) -> bool {
        self.platform.enabled()
    }

    /// Kind of the session currently running, if any
    pub fn active_session(&self) -> Option<SessionKind> {
        self.active
            .lock()
            .as_ref()
            .filter(|active| !active.task.is_finished())
            .map(|active| active.kind)
    }

    /// Set or clear the NDEF listener, a listening session runs while any listener is set
    ///
    /// Clearing the last listener ends the active session whatever its kind.
    pub async fn set_ndef_listener(
        &self,
        callback: Option<NdefCallback>,
        options: ListenerOptions,
    ) -> Result<()> {
        match callback {
            Some(callback) => {
                self.ensure_available()?;
                self.listeners.lock().ndef = Some(callback);
                self.start_listening(options).await
            }
            None => {
                self.remove_listener(|listeners| listeners.ndef = None);
                Ok(())
            }
        }
    }

    pub async fn set_tag_listener(
        &self,
        callback: Option<TagCallback>,
        options: ListenerOptions,
    ) -> Result<()> {
        match callback {
            Some(callback) => {
                self.ensure_available()?;
                self.listeners.lock().tag = Some(callback);
                self.start_listening(options).await
            }
            None => {
                self.remove_listener(|listeners| listeners.tag = None);
                Ok(())
            }
        }
    }

    /// Encode the records and write them through the guarded write machine
    ///
    /// Resolves with the message read back from the tag.
    pub async fn write_tag(
        &self,
        options: WriteTagOptions,
        before_guard: Option<WriteGuard>,
        after_guard: Option<WriteGuard>,
    ) -> Result<NdefMessage> {
        self.ensure_available()?;
        self.ensure_tag_connection("writing tags")?;

        let WriteTagOptions {
            session,
            text_records,
            uri_records,
        } = options;

        let message = encode(&text_records, &uri_records)?;

        match self.run_write(message, session, before_guard, after_guard).await? {
            WriteResult::Written(data) => Ok(data),
            WriteResult::Erased => Ok(decode(&encode_erase())),
        }
    }

    pub async fn erase_tag(&self) -> Result<()> {
        self.ensure_available()?;
        self.ensure_tag_connection("erasing tags")?;

        self.run_write(encode_erase(), SessionOptions::default(), None, None)
            .await
            .map(|_| ())
    }

    /// End the active session, if there is one
    pub fn invalidate_session(&self) {
        let active = self.active.lock().take();
        if let Some(active) = active {
            active.cancel();
        }
    }

    // private

    fn ensure_available(&self) -> Result<()> {
        if !self.platform.reading_available() {
            return Err(NfcError::Unavailable);
        }

        Ok(())
    }

    fn ensure_tag_connection(&self, operation: &str) -> Result<()> {
        if !self.platform.supports_tag_connection() {
            return Err(NfcError::Unsupported(operation.to_string()));
        }

        Ok(())
    }

    /// A running listening session picks the change up on its next detection
    fn remove_listener(&self, remove: impl FnOnce(&mut Listeners)) {
        let empty = {
            let mut listeners = self.listeners.lock();
            remove(&mut *listeners);
            listeners.is_empty()
        };

        if empty {
            info!("last listener removed, invalidating session");
            self.invalidate_session();
        }
    }

    async fn start_listening(&self, options: ListenerOptions) -> Result<()> {
        let (id, session) = self.open(&options).await?;

        let mut listen = ListeningSession::new(session.clone(), self.main.clone(), options)
            .with_listeners(self.listeners.clone());

        let task = AbortableTask::spawn(async move {
            let exit = listen.run().await;
            debug!("listening session ended: {exit:?}");
        });

        self.install(ActiveSession {
            id,
            kind: SessionKind::Listen,
            session,
            task,
        })
    }

    async fn run_write(
        &self,
        message: RawMessage,
        options: SessionOptions,
        before_guard: Option<WriteGuard>,
        after_guard: Option<WriteGuard>,
    ) -> Result<WriteResult> {
        let (id, session) = self.open(&options).await?;
        let (sender, receiver) = flume::bounded(1);

        let mut write = GuardedWriteSession::new(session.clone(), self.main.clone(), message, options)
            .with_guards(before_guard, after_guard);

        let task = AbortableTask::spawn(async move {
            let result = write.run().await;
            let _ = sender.send(result);
        });

        self.install(ActiveSession {
            id,
            kind: SessionKind::Write,
            session,
            task,
        })?;

        // sender is dropped with an aborted task
        let result = receiver
            .recv_async()
            .await
            .unwrap_or(Err(NfcError::Cancelled));

        self.release(id);
        result
    }

    /// Preempt the active session, then open and begin a new one
    async fn open(&self, options: &SessionOptions) -> Result<(u64, Arc<dyn SessionHandle>)> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        self.invalidate_session();

        let session = self
            .platform
            .open_session(options)
            .map_err_str(NfcError::SessionError)?;

        if let Some(message) = options.start_message() {
            session.set_alert_message(message);
        }

        session.begin().await.map_err_str(NfcError::SessionError)?;
        info!("session {id} started");

        Ok((id, session))
    }

    /// Make `new` the active session unless a newer one already started
    fn install(&self, new: ActiveSession) -> Result<()> {
        if new.id < self.next_id.load(Ordering::SeqCst) {
            debug!("session {} superseded before it was installed", new.id);
            new.cancel();
            return Err(NfcError::Cancelled);
        }

        let previous = self.active.lock().replace(new);
        if let Some(previous) = previous {
            previous.cancel();
        }

        Ok(())
    }

    fn release(&self, id: u64) {
        let mut active = self.active.lock();
        if active.as_ref().is_some_and(|active| active.id == id) {
            active.take();
        }
    }
}

impl Drop for Nfc {
    fn drop(&mut self) {
        self.invalidate_session();
    }
}
