//! Frame buffer synchronization.
//!
//! Capacities grow in quanta so frames whose vertex/index counts jitter keep
//! reusing the same allocation.

mod capacity;
mod synchronizer;

pub use capacity::{roundup, BufferCapacity};
pub use synchronizer::{FrameBufferSync, SyncStats};
