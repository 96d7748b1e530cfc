//! Scripted platform doubles for tests

use std::{
    collections::VecDeque,
    sync::{
        Arc,
        atomic::{AtomicBool, AtomicUsize, Ordering},
    },
};

use parking_lot::Mutex;
use tagbridge_ndef::{RawMessage, TextRecord, encode};

use crate::{
    error::PlatformError,
    options::SessionOptions,
    platform::{
        NdefStatus, NfcPlatform, NfcTagData, SessionEvent, SessionHandle, TagHandle, TagStatus,
    },
};

pub fn text_message(text: &str) -> RawMessage {
    encode(&[TextRecord::new(text)], &[]).unwrap()
}

#[derive(Debug)]
pub struct MockTag {
    status: Mutex<Result<NdefStatus, PlatformError>>,
    content: Mutex<RawMessage>,
    read_error: Mutex<Option<PlatformError>>,
    write_error: Mutex<Option<PlatformError>>,
    writes: Mutex<Vec<RawMessage>>,
}

impl MockTag {
    pub fn new(content: RawMessage) -> Arc<Self> {
        Arc::new(Self {
            status: Mutex::new(Ok(NdefStatus {
                status: TagStatus::ReadWrite,
                capacity: 0,
            })),
            content: Mutex::new(content),
            read_error: Mutex::new(None),
            write_error: Mutex::new(None),
            writes: Mutex::new(Vec::new()),
        })
    }

    pub fn set_status(&self, status: TagStatus, capacity: usize) {
        *self.status.lock() = Ok(NdefStatus { status, capacity });
    }

    pub fn fail_status(&self, reason: &str) {
        *self.status.lock() = Err(PlatformError::new(reason));
    }

    pub fn fail_read(&self, reason: &str) {
        *self.read_error.lock() = Some(PlatformError::new(reason));
    }

    pub fn fail_write(&self, reason: &str) {
        *self.write_error.lock() = Some(PlatformError::new(reason));
    }

    pub fn content(&self) -> RawMessage {
        self.content.lock().clone()
    }

    pub fn writes(&self) -> Vec<RawMessage> {
        self.writes.lock().clone()
    }
}

#[derive(Debug)]
struct MockTagHandle(Arc<MockTag>);

#[async_trait::async_trait]
impl TagHandle for MockTagHandle {
    async fn query_status(&self) -> Result<NdefStatus, PlatformError> {
        self.0.status.lock().clone()
    }

    async fn read_message(&self) -> Result<RawMessage, PlatformError> {
        match self.0.read_error.lock().clone() {
            Some(error) => Err(error),
            None => Ok(self.0.content()),
        }
    }

    async fn write_message(&self, message: &RawMessage) -> Result<(), PlatformError> {
        if let Some(error) = self.0.write_error.lock().clone() {
            return Err(error);
        }

        self.0.writes.lock().push(message.clone());
        *self.0.content.lock() = message.clone();
        Ok(())
    }
}

#[derive(Debug)]
pub struct MockSession {
    tag: Mutex<Option<Arc<MockTag>>>,
    connect_script: Mutex<VecDeque<PlatformError>>,
    hang_on_connect: AtomicBool,
    begin_error: Mutex<Option<PlatformError>>,
    event_sender: flume::Sender<SessionEvent>,
    event_receiver: flume::Receiver<SessionEvent>,
    alerts: Mutex<Vec<String>>,
    invalidations: Mutex<Vec<Option<String>>>,
    connects: AtomicUsize,
    restarts: AtomicUsize,
    begun: AtomicBool,
}

impl MockSession {
    pub fn new() -> Arc<Self> {
        let (event_sender, event_receiver) = flume::unbounded();
        Arc::new(Self {
            tag: Mutex::new(None),
            connect_script: Mutex::new(VecDeque::new()),
            hang_on_connect: AtomicBool::new(false),
            begin_error: Mutex::new(None),
            event_sender,
            event_receiver,
            alerts: Mutex::new(Vec::new()),
            invalidations: Mutex::new(Vec::new()),
            connects: AtomicUsize::new(0),
            restarts: AtomicUsize::new(0),
            begun: AtomicBool::new(false),
        })
    }

    pub fn with_tag(tag: Arc<MockTag>) -> Arc<Self> {
        let session = Self::new();
        session.set_tag(tag);
        session
    }

    pub fn set_tag(&self, tag: Arc<MockTag>) {
        *self.tag.lock() = Some(tag);
    }

    /// The next connect attempt fails with `reason`
    pub fn fail_connect(&self, reason: &str) {
        self.connect_script.lock().push_back(PlatformError::new(reason));
    }

    /// Connects never resolve, the session waits for a tag forever
    pub fn hang_on_connect(&self) {
        self.hang_on_connect.store(true, Ordering::SeqCst);
    }

    pub fn fail_begin(&self, reason: &str) {
        *self.begin_error.lock() = Some(PlatformError::new(reason));
    }

    pub fn push_event(&self, event: SessionEvent) {
        let _ = self.event_sender.send(event);
    }

    pub fn push_ndef(&self, message: RawMessage) {
        self.push_event(SessionEvent::NdefDetected {
            tag: NfcTagData::default(),
            message,
        });
    }

    pub fn alerts(&self) -> Vec<String> {
        self.alerts.lock().clone()
    }

    pub fn invalidations(&self) -> Vec<Option<String>> {
        self.invalidations.lock().clone()
    }

    pub fn connects(&self) -> usize {
        self.connects.load(Ordering::SeqCst)
    }

    pub fn restarts(&self) -> usize {
        self.restarts.load(Ordering::SeqCst)
    }

    pub fn begun(&self) -> bool {
        self.begun.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl SessionHandle for MockSession {
    async fn begin(&self) -> Result<(), PlatformError> {
        if let Some(error) = self.begin_error.lock().clone() {
            return Err(error);
        }

        self.begun.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn invalidate(&self, error_message: Option<&str>) {
        self.invalidations.lock().push(error_message.map(ToString::to_string));
    }

    fn set_alert_message(&self, message: &str) {
        self.alerts.lock().push(message.to_string());
    }

    async fn connect_to_tag(&self) -> Result<Box<dyn TagHandle>, PlatformError> {
        self.connects.fetch_add(1, Ordering::SeqCst);

        if self.hang_on_connect.load(Ordering::SeqCst) {
            std::future::pending::<()>().await;
        }

        if let Some(error) = self.connect_script.lock().pop_front() {
            return Err(error);
        }

        let tag = self.tag.lock().clone();
        match tag {
            Some(tag) => Ok(Box::new(MockTagHandle(tag))),
            None => Err(PlatformError::new("no tag in range")),
        }
    }

    async fn restart_polling(&self) -> Result<(), PlatformError> {
        self.restarts.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn next_event(&self) -> SessionEvent {
        match self.event_receiver.recv_async().await {
            Ok(event) => event,
            Err(_) => SessionEvent::Invalidated(PlatformError::new("session closed")),
        }
    }
}

#[derive(Debug)]
pub struct MockPlatform {
    available: bool,
    tag_connection: bool,
    sessions: Mutex<VecDeque<Arc<MockSession>>>,
    opened: Mutex<Vec<Arc<MockSession>>>,
}

impl Default for MockPlatform {
    fn default() -> Self {
        Self {
            available: true,
            tag_connection: true,
            sessions: Mutex::new(VecDeque::new()),
            opened: Mutex::new(Vec::new()),
        }
    }
}

impl MockPlatform {
    pub fn unavailable() -> Self {
        Self { available: false, ..Default::default() }
    }

    pub fn without_tag_connection() -> Self {
        Self { tag_connection: false, ..Default::default() }
    }

    /// Sessions are handed out in the order they are pushed
    pub fn push_session(&self, session: Arc<MockSession>) {
        self.sessions.lock().push_back(session);
    }

    pub fn opened(&self) -> Vec<Arc<MockSession>> {
        self.opened.lock().clone()
    }
}

impl NfcPlatform for MockPlatform {
    fn reading_available(&self) -> bool {
        self.available
    }

    fn supports_tag_connection(&self) -> bool {
        self.tag_connection
    }

    fn open_session(
        &self,
        _options: &SessionOptions,
    ) -> Result<Arc<dyn SessionHandle>, PlatformError> {
        let session = self
            .sessions
            .lock()
            .pop_front()
            .ok_or_else(|| PlatformError::new("no session scripted"))?;

        self.opened.lock().push(session.clone());
        Ok(session)
    }
}
