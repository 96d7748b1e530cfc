use std::{fmt::Debug, sync::Arc};

use parking_lot::ReentrantMutex;
use tracing::warn;

use crate::error::{NfcError, Result};

pub type MainTask = Box<dyn FnOnce() + Send + 'static>;

/// Runs work on the host's designated callback context
pub trait MainContextDispatcher: Send + Sync + Debug {
    fn run_on_main_context(&self, task: MainTask);
}

/// Runs tasks right away on the calling thread
#[derive(Debug, Default, Clone, Copy)]
pub struct InlineDispatcher;

impl MainContextDispatcher for InlineDispatcher {
    fn run_on_main_context(&self, task: MainTask) {
        task()
    }
}

/// Queues tasks until the host drains them from its own loop
#[derive(Debug, Clone)]
pub struct QueueDispatcher {
    sender: flume::Sender<MainTask>,
    receiver: flume::Receiver<MainTask>,
}

impl Default for QueueDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl QueueDispatcher {
    pub fn new() -> Self {
        let (sender, receiver) = flume::unbounded();
        Self { sender, receiver }
    }

    /// Run every queued task, returns how many ran
    pub fn run_pending(&self) -> usize {
        self.receiver.try_iter().map(|task| task()).count()
    }

    /// Wait for the next task and run it
    pub async fn run_next(&self) -> bool {
        match self.receiver.recv_async().await {
            Ok(task) => {
                task();
                true
            }
            Err(_) => false,
        }
    }

    /// Drop queued tasks without running them
    pub fn discard_pending(&self) -> usize {
        self.receiver.drain().count()
    }
}

impl MainContextDispatcher for QueueDispatcher {
    fn run_on_main_context(&self, task: MainTask) {
        if self.sender.send(task).is_err() {
            warn!("main context queue is closed, dropping task");
        }
    }
}

/// Dispatcher plus the gate that keeps caller code from running concurrently
#[derive(Debug, Clone)]
pub struct MainContext {
    dispatcher: Arc<dyn MainContextDispatcher>,
    gate: Arc<ReentrantMutex<()>>,
}

impl MainContext {
    pub fn new(dispatcher: Arc<dyn MainContextDispatcher>) -> Self {
        Self {
            dispatcher,
            gate: Arc::new(ReentrantMutex::new(())),
        }
    }

    pub fn inline() -> Self {
        Self::new(Arc::new(InlineDispatcher))
    }

    /// Fire and forget
    pub fn run(&self, f: impl FnOnce() + Send + 'static) {
        let gate = self.gate.clone();
        self.dispatcher.run_on_main_context(Box::new(move || {
            let _guard = gate.lock();
            f()
        }));
    }

    /// Run on the main context and wait for the result
    ///
    /// Resolves to [`NfcError::Cancelled`] if the dispatcher drops the task
    /// without running it.
    pub async fn call<T>(&self, f: impl FnOnce() -> T + Send + 'static) -> Result<T>
    where
        T: Send + 'static,
    {
        let (sender, receiver) = flume::bounded(1);
        self.run(move || {
            let _ = sender.send(f());
        });

        receiver.recv_async().await.map_err(|_| NfcError::Cancelled)
    }
}
