//! # Playback Notifications
//!
//! Events fire synchronously from `tick`, `render_object` and the open
//! continuation, always on the render thread.
//!
//! ```text
//! Controller ──emit──► listeners (in registration order)
//!                 └──► subscribers (crossbeam, try_send, never blocks)
//! ```
//!
//! Within one tick `FrameUpdated` always precedes `EndOfStream`.

use std::path::PathBuf;

use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};
use holoplay_shared::FrameMetadata;

/// Something the host may want to react to.
#[derive(Debug, Clone, PartialEq)]
pub enum PlaybackEvent {
    /// A source finished opening.
    Opened {
        /// Resolved path that was opened.
        path: PathBuf,
    },

    /// New frame metadata was pulled this tick.
    FrameUpdated(FrameMetadata),

    /// The object was rendered by a camera.
    Render,

    /// Playback entered end-of-stream. Fires once per run.
    EndOfStream,

    /// Something failed with no caller left to return an error to.
    FatalError {
        /// What went wrong.
        reason: String,
    },
}

/// Synchronous event callback.
pub trait PlaybackListener: Send {
    /// Called once per event, in emission order.
    fn on_event(&mut self, event: &PlaybackEvent);
}

impl<F> PlaybackListener for F
where
    F: FnMut(&PlaybackEvent) + Send,
{
    fn on_event(&mut self, event: &PlaybackEvent) {
        self(event);
    }
}

/// Handle returned by [`EventHub::add_listener`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// Receiving end of a subscription.
#[derive(Debug, Clone)]
pub struct EventReceiver {
    receiver: Receiver<PlaybackEvent>,
}

impl EventReceiver {
    /// Takes every pending event.
    #[must_use]
    pub fn drain(&self) -> Vec<PlaybackEvent> {
        self.receiver.try_iter().collect()
    }

    /// Takes one pending event.
    #[must_use]
    pub fn try_recv(&self) -> Option<PlaybackEvent> {
        self.receiver.try_recv().ok()
    }

    /// Number of pending events.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.receiver.len()
    }
}

/// Ordered listener list plus channel subscribers.
#[derive(Default)]
pub struct EventHub {
    next_id: u64,
    listeners: Vec<(ListenerId, Box<dyn PlaybackListener>)>,
    subscribers: Vec<Sender<PlaybackEvent>>,
    dropped: u64,
}

impl std::fmt::Debug for EventHub {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventHub")
            .field("listeners", &self.listeners.len())
            .field("subscribers", &self.subscribers.len())
            .field("dropped", &self.dropped)
            .finish()
    }
}

impl EventHub {
    /// Appends a listener. Listeners run in the order they were added.
    pub fn add_listener(&mut self, listener: impl PlaybackListener + 'static) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Removes a listener. Returns false if it was not registered.
    pub fn remove_listener(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(lid, _)| *lid != id);
        self.listeners.len() != before
    }

    /// Opens a bounded channel that receives a copy of every event.
    ///
    /// Events that do not fit are dropped, never waited for.
    pub fn subscribe(&mut self, capacity: usize) -> EventReceiver {
        let (sender, receiver) = bounded(capacity.max(1));
        self.subscribers.push(sender);
        EventReceiver { receiver }
    }

    /// Delivers `event` to every listener, then every subscriber.
    pub fn emit(&mut self, event: &PlaybackEvent) {
        for (_, listener) in &mut self.listeners {
            listener.on_event(event);
        }
        let mut dropped = 0;
        self.subscribers.retain(|sender| match sender.try_send(event.clone()) {
            Ok(()) => true,
            Err(TrySendError::Full(_)) => {
                dropped += 1;
                true
            }
            Err(TrySendError::Disconnected(_)) => false,
        });
        if dropped > 0 {
            self.dropped += dropped;
            tracing::debug!(dropped, "subscriber channel full, event dropped");
        }
    }

    /// Events dropped because a subscriber channel was full.
    #[must_use]
    pub fn dropped_count(&self) -> u64 {
        self.dropped
    }

    /// Number of live subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}
