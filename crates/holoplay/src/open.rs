//! # Background Open
//!
//! ```text
//! render thread                     tokio blocking pool
//! ─────────────                     ───────────────────
//! dispatch(gen=N) ───spawn────────► engine.open(...)   (may block)
//!                                        │
//! tick: drain() ◄──crossbeam──── OpenCompletion{gen=N}
//!   gen == current? ─ yes ─► finish open on the render thread
//!                   └─ no ──► discard
//! ```
//!
//! Nothing is aborted. `cancel` only moves the generation on, so a completion
//! that arrives afterwards no longer matches and is dropped by `tick`.

use std::path::PathBuf;
use std::sync::Arc;

use crossbeam_channel::{unbounded, Receiver, Sender};
use holoplay_interop::{NativeEngine, SessionId};
use holoplay_shared::OpenSettings;
use tokio::runtime::Handle;

/// Result of one background open.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenCompletion {
    /// Generation the request was dispatched under.
    pub generation: u64,
    /// Session the source was opened on.
    pub session: SessionId,
    /// Resolved path.
    pub path: PathBuf,
    /// Whether the engine accepted the source.
    pub opened: bool,
}

/// Dispatches opens to the blocking pool and collects their completions.
#[derive(Debug)]
pub struct OpenWorker {
    sender: Sender<OpenCompletion>,
    receiver: Receiver<OpenCompletion>,
    generation: u64,
    in_flight: usize,
}

impl Default for OpenWorker {
    fn default() -> Self {
        Self::new()
    }
}

impl OpenWorker {
    /// Creates an idle worker.
    #[must_use]
    pub fn new() -> Self {
        let (sender, receiver) = unbounded();
        Self {
            sender,
            receiver,
            generation: 0,
            in_flight: 0,
        }
    }

    /// Starts a blocking open on `runtime`. Supersedes any earlier request.
    ///
    /// Returns the generation the completion will carry.
    pub fn dispatch(
        &mut self,
        runtime: &Handle,
        engine: Arc<dyn NativeEngine>,
        session: SessionId,
        path: PathBuf,
        settings: OpenSettings,
    ) -> u64 {
        self.generation += 1;
        self.in_flight += 1;
        let generation = self.generation;
        let sender = self.sender.clone();
        tracing::debug!(generation, path = %path.display(), "open dispatched");
        let _detached = runtime.spawn_blocking(move || {
            let opened = engine.open(session, &path, &settings);
            // The worker only goes away with the controller.
            let _ = sender.send(OpenCompletion {
                generation,
                session,
                path,
                opened,
            });
        });
        generation
    }

    /// Makes every outstanding request stale.
    pub fn cancel(&mut self) {
        if self.in_flight > 0 {
            tracing::debug!(in_flight = self.in_flight, "pending opens cancelled");
        }
        self.generation += 1;
    }

    /// Takes every completion that has arrived, stale ones included.
    pub fn drain(&mut self) -> Vec<OpenCompletion> {
        let done: Vec<_> = self.receiver.try_iter().collect();
        self.in_flight = self.in_flight.saturating_sub(done.len());
        done
    }

    /// Whether `completion` belongs to the latest request.
    #[must_use]
    pub fn is_current(&self, completion: &OpenCompletion) -> bool {
        completion.generation == self.generation
    }

    /// Requests dispatched whose completion has not been drained yet.
    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// Current generation.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }
}
