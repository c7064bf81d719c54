//! Display container and its dispatcher
//!
//! The [`ViewSlot`] holds the one view currently on display. It lives on a
//! single owning thread, the [`DisplayHost`], which drains a queue of tasks.
//! Any other thread reaches the slot through a cloneable [`Dispatcher`]:
//! `invoke` queues a task and blocks until the owner has run it.
//!
//! The dispatcher blocks with `blocking_recv`, so it must not be called from
//! inside an async runtime.

use hotswap_view_api::View;
use std::panic::AssertUnwindSafe;
use std::sync::{Arc, OnceLock};
use std::thread::{self, JoinHandle, ThreadId};
use thiserror::Error;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, error};

/// A view instance occupying the slot
pub struct MountedView {
    type_name: String,
    generation: u64,
    view: Box<dyn View>,
}

impl MountedView {
    /// Fully-qualified name of the type the view was built from
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Publication counter value when this view was mounted
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn view(&self) -> &dyn View {
        self.view.as_ref()
    }
}

/// Owned copy of what the slot currently shows, safe to send across threads
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewSnapshot {
    pub type_name: String,
    pub generation: u64,
    pub title: String,
    pub content: String,
}

/// Single-slot holder of the current view.
#[derive(Default)]
pub struct ViewSlot {
    current: Option<MountedView>,
    published: u64,
}

impl ViewSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mount `view`, dropping whatever was there. Returns the new generation.
    ///
    /// The previous view gets no teardown call; it is simply dropped. A panic
    /// while dropping it is logged and swallowed, since the new view is
    /// already mounted by then.
    pub fn publish(&mut self, type_name: impl Into<String>, view: Box<dyn View>) -> u64 {
        self.published += 1;
        let mounted = MountedView {
            type_name: type_name.into(),
            generation: self.published,
            view,
        };
        debug!(type_name = %mounted.type_name, generation = mounted.generation, "Publishing view");

        if let Some(previous) = self.current.replace(mounted) {
            let type_name = previous.type_name.clone();
            let generation = previous.generation;
            debug!(type_name = %type_name, generation, "Evicted previous view");

            if std::panic::catch_unwind(AssertUnwindSafe(move || drop(previous))).is_err() {
                error!(type_name = %type_name, generation, "Evicted view panicked while dropping");
            }
        }
        self.published
    }

    pub fn current(&self) -> Option<&MountedView> {
        self.current.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.current.is_none()
    }

    /// Number of publications so far
    pub fn published(&self) -> u64 {
        self.published
    }

    pub fn snapshot(&self) -> Option<ViewSnapshot> {
        self.current.as_ref().map(|mounted| ViewSnapshot {
            type_name: mounted.type_name.clone(),
            generation: mounted.generation,
            title: mounted.view.title(),
            content: mounted.view.render(),
        })
    }
}

/// Errors from handing work to the display thread
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DispatchError {
    /// The display host is gone
    #[error("display host has shut down")]
    Closed,

    /// The task was dropped without replying (it panicked, or the host stopped)
    #[error("display task was dropped before completing")]
    Dropped,

    /// Blocking on the display from its own thread would never return
    #[error("cannot wait on the display from its own thread")]
    Reentrant,
}

type Task = Box<dyn FnOnce(&mut ViewSlot) + Send>;

/// Handle for running work on the display's owning thread
#[derive(Clone)]
pub struct Dispatcher {
    tx: mpsc::UnboundedSender<Task>,
    owner: Arc<OnceLock<ThreadId>>,
}

impl Dispatcher {
    /// Run `task` against the slot on the owning thread and wait for its result.
    pub fn invoke<R, F>(&self, task: F) -> Result<R, DispatchError>
    where
        F: FnOnce(&mut ViewSlot) -> R + Send + 'static,
        R: Send + 'static,
    {
        if self.owner.get() == Some(&thread::current().id()) {
            return Err(DispatchError::Reentrant);
        }

        let (reply_tx, reply_rx) = oneshot::channel();
        self.tx
            .send(Box::new(move |slot: &mut ViewSlot| {
                let _ = reply_tx.send(task(slot));
            }))
            .map_err(|_| DispatchError::Closed)?;

        reply_rx.blocking_recv().map_err(|_| DispatchError::Dropped)
    }

    /// What the slot is showing right now
    pub fn snapshot(&self) -> Result<Option<ViewSnapshot>, DispatchError> {
        self.invoke(|slot| slot.snapshot())
    }

    /// Whether the display host has stopped accepting work
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

/// Owner of the [`ViewSlot`]; runs dispatched tasks.
pub struct DisplayHost {
    slot: ViewSlot,
    rx: mpsc::UnboundedReceiver<Task>,
    owner: Arc<OnceLock<ThreadId>>,
}

impl DisplayHost {
    /// Create a host and the dispatcher that feeds it.
    ///
    /// The first thread to call [`run`](Self::run) or [`pump`](Self::pump)
    /// becomes the owning thread.
    pub fn new() -> (Self, Dispatcher) {
        let (tx, rx) = mpsc::unbounded_channel();
        let owner = Arc::new(OnceLock::new());
        let host = Self {
            slot: ViewSlot::new(),
            rx,
            owner: Arc::clone(&owner),
        };
        (host, Dispatcher { tx, owner })
    }

    /// Start a dedicated display thread running the host.
    ///
    /// The thread exits once every [`Dispatcher`] clone is dropped.
    pub fn spawn(name: &str) -> std::io::Result<(Dispatcher, JoinHandle<()>)> {
        let (tx, rx) = mpsc::unbounded_channel::<Task>();
        let owner = Arc::new(OnceLock::new());
        let dispatcher = Dispatcher {
            tx,
            owner: Arc::clone(&owner),
        };

        let handle = thread::Builder::new().name(name.to_string()).spawn(move || {
            let host = DisplayHost {
                slot: ViewSlot::new(),
                rx,
                owner,
            };
            let slot = host.run();
            debug!(published = slot.published(), "Display host stopped");
        })?;

        Ok((dispatcher, handle))
    }

    /// Run tasks until all dispatchers are dropped, then hand back the slot.
    pub fn run(mut self) -> ViewSlot {
        self.claim();
        while let Some(task) = self.rx.blocking_recv() {
            self.run_task(task);
        }
        self.slot
    }

    /// Run every task queued so far without blocking. Returns how many ran.
    pub fn pump(&mut self) -> usize {
        self.claim();
        let mut ran = 0;
        while let Ok(task) = self.rx.try_recv() {
            self.run_task(task);
            ran += 1;
        }
        ran
    }

    pub fn slot(&self) -> &ViewSlot {
        &self.slot
    }

    fn claim(&self) {
        let _ = self.owner.set(thread::current().id());
    }

    fn run_task(&mut self, task: Task) {
        let slot = &mut self.slot;
        if std::panic::catch_unwind(AssertUnwindSafe(move || task(slot))).is_err() {
            error!("Display task panicked");
        }
    }
}
