use std::sync::Arc;

use parking_lot::Mutex;
use tagbridge_ndef::decode;
use tracing::{debug, info, warn};

use crate::{
    error::PlatformError,
    main_context::MainContext,
    options::ListenerOptions,
    platform::{NfcNdefData, NfcTagData, SessionEvent, SessionHandle},
};

pub type NdefCallback = Arc<dyn Fn(NfcNdefData) + Send + Sync>;
pub type TagCallback = Arc<dyn Fn(NfcTagData) + Send + Sync>;

/// Callbacks a listening session delivers to
///
/// Shared between the session and its owner, so a listener can be swapped or
/// removed without restarting the platform session.
#[derive(Clone, Default)]
pub struct Listeners {
    pub ndef: Option<NdefCallback>,
    pub tag: Option<TagCallback>,
}

impl Listeners {
    pub fn is_empty(&self) -> bool {
        self.ndef.is_none() && self.tag.is_none()
    }
}

pub type SharedListeners = Arc<Mutex<Listeners>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListenState {
    Idle,
    Listening,
}

/// Why a listening session went back to idle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListenExit {
    StoppedAfterFirstRead,
    Invalidated(PlatformError),
}

pub struct ListeningSession {
    session: Arc<dyn SessionHandle>,
    main: MainContext,
    options: ListenerOptions,
    listeners: SharedListeners,
    state: ListenState,
    delivered: usize,
}

impl std::fmt::Debug for ListeningSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListeningSession")
            .field("options", &self.options)
            .field("state", &self.state)
            .field("delivered", &self.delivered)
            .finish_non_exhaustive()
    }
}

impl ListeningSession {
    pub fn new(session: Arc<dyn SessionHandle>, main: MainContext, options: ListenerOptions) -> Self {
        Self {
            session,
            main,
            options,
            listeners: SharedListeners::default(),
            state: ListenState::Idle,
            delivered: 0,
        }
    }

    /// Deliver to callbacks owned elsewhere, they are looked up on every detection
    pub fn with_listeners(mut self, listeners: SharedListeners) -> Self {
        self.listeners = listeners;
        self
    }

    pub fn on_ndef(self, callback: Option<NdefCallback>) -> Self {
        self.listeners.lock().ndef = callback;
        self
    }

    pub fn on_tag(self, callback: Option<TagCallback>) -> Self {
        self.listeners.lock().tag = callback;
        self
    }

    pub fn state(&self) -> ListenState {
        self.state
    }

    /// Number of callbacks handed to the main context
    pub fn delivered(&self) -> usize {
        self.delivered
    }

    /// Deliver detections until the session ends
    pub async fn run(&mut self) -> ListenExit {
        info!("listening for tags");
        self.state = ListenState::Listening;

        let exit = loop {
            match self.session.next_event().await {
                SessionEvent::NdefDetected { tag, message } => {
                    let data = NfcNdefData::new(tag, decode(&message));
                    self.deliver_ndef(data);

                    if self.options.stop_after_first_read {
                        self.session.invalidate(None);
                        break ListenExit::StoppedAfterFirstRead;
                    }
                }

                SessionEvent::TagDetected(tag) => self.deliver_tag(tag),

                SessionEvent::Unreadable(reason) => {
                    warn!("tag detected but not readable: {reason}");
                }

                SessionEvent::Invalidated(error) => {
                    debug!("listening session invalidated: {error}");
                    break ListenExit::Invalidated(error);
                }
            }
        };

        self.state = ListenState::Idle;
        exit
    }

    fn deliver_ndef(&mut self, data: NfcNdefData) {
        let Some(callback) = self.listeners.lock().ndef.clone() else {
            debug!("ndef message detected, but no ndef listener is set");
            return;
        };

        debug!("delivering ndef message with {} records", data.message.len());
        self.delivered += 1;
        self.main.run(move || callback(data));
    }

    fn deliver_tag(&mut self, tag: NfcTagData) {
        let Some(callback) = self.listeners.lock().tag.clone() else {
            debug!("tag detected, but no tag listener is set");
            return;
        };

        self.delivered += 1;
        self.main.run(move || callback(tag));
    }
}
