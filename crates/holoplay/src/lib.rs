//! # HOLOPLAY
//!
//! Playback controller for streamed volumetric video.
//!
//! ## Frame loop
//!
//! ```text
//! host frame
//!   ├─ tick()                  pull frame metadata, bounds, host buffers, events
//!   ├─ will_render_object(cam) native draw: hook + camera view per camera
//!   ├─ render_object(cam)      camera view refresh, Render event
//!   └─ end_of_frame()          host draw: buffer fill request
//! ```
//!
//! The native engine sits behind [`holoplay_interop::NativeEngine`]. Tests and
//! benches use the scripted `mock` modules of the interop and rendering crates.

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod controller;
pub mod error;
pub mod events;
pub mod open;
pub mod report;
pub mod source;

pub use controller::{AudioListener, HostServices, PlaybackController};
pub use error::{PlaybackError, PlaybackResult};
pub use events::{EventHub, EventReceiver, ListenerId, PlaybackEvent, PlaybackListener};
pub use open::{OpenCompletion, OpenWorker};
pub use report::{TickReport, TickSkip};
pub use source::resolve_source_path;
