//! Background consumer of model change notifications.
//!
//! The housekeeper never touches entity collections. It only counts
//! revisions and raises a dirty flag that the autosave path takes.

use crate::model::ModelEvent;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::mpsc::Receiver;
use std::thread::JoinHandle;

#[derive(Debug, Default)]
struct Shared {
    dirty: AtomicBool,
    revision: AtomicU64,
}

impl Shared {
    fn record(&self, event: ModelEvent) {
        self.revision.fetch_add(1, Ordering::AcqRel);
        self.dirty.store(true, Ordering::Release);
        log::trace!("Housekeeping saw {:?}", event);
    }
}

enum Worker {
    /// Events are drained on a dedicated thread.
    Thread(Option<JoinHandle<()>>),
    /// Events are drained by the caller whenever state is read.
    Inline(Receiver<ModelEvent>),
}

/// Tracks whether the model changed since the last autosave.
pub struct Housekeeper {
    shared: Arc<Shared>,
    worker: Worker,
}

impl Housekeeper {
    /// Drain `events` on a background thread until every sender is gone.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn spawn(events: Receiver<ModelEvent>) -> std::io::Result<Self> {
        let shared = Arc::new(Shared::default());
        let thread_shared = Arc::clone(&shared);

        let handle = std::thread::Builder::new()
            .name("planwright-housekeeping".to_string())
            .spawn(move || {
                log::info!("Housekeeping thread started");
                while let Ok(event) = events.recv() {
                    thread_shared.record(event);
                }
                log::info!("Housekeeping thread exiting");
            })?;

        Ok(Self {
            shared,
            worker: Worker::Thread(Some(handle)),
        })
    }

    /// Drain `events` on the calling thread, lazily.
    pub fn inline(events: Receiver<ModelEvent>) -> Self {
        Self {
            shared: Arc::new(Shared::default()),
            worker: Worker::Inline(events),
        }
    }

    fn pump(&self) {
        if let Worker::Inline(events) = &self.worker {
            for event in events.try_iter() {
                self.shared.record(event);
            }
        }
    }

    /// Return the dirty flag and clear it.
    pub fn take_dirty(&self) -> bool {
        self.pump();
        self.shared.dirty.swap(false, Ordering::AcqRel)
    }

    pub fn is_dirty(&self) -> bool {
        self.pump();
        self.shared.dirty.load(Ordering::Acquire)
    }

    /// Number of change notifications seen so far.
    pub fn revision(&self) -> u64 {
        self.pump();
        self.shared.revision.load(Ordering::Acquire)
    }

    /// Wait for the channel to close and return the final revision.
    pub fn join(mut self) -> u64 {
        if let Worker::Thread(handle) = &mut self.worker {
            if let Some(handle) = handle.take() {
                if handle.join().is_err() {
                    log::error!("Housekeeping thread panicked");
                }
            }
        }
        self.revision()
    }
}

impl std::fmt::Debug for Housekeeper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mode = match self.worker {
            Worker::Thread(_) => "thread",
            Worker::Inline(_) => "inline",
        };
        f.debug_struct("Housekeeper").field("mode", &mode).finish()
    }
}
