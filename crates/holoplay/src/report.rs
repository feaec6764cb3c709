//! Per-tick outcome.

/// Why a tick stopped early.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickSkip {
    /// Not initialized, closed or cleaned up.
    NotReady,
    /// The engine had no frame metadata this tick.
    NoFrame,
}

/// What one call to `tick` did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Set when the tick stopped before pulling a frame.
    pub skipped: Option<TickSkip>,
    /// Frame observed this tick.
    pub frame_id: Option<u32>,
    /// Background opens finished on this tick.
    pub opens_completed: u32,
    /// Background opens that came back failed.
    pub opens_failed: u32,
    /// Stale background opens dropped.
    pub opens_discarded: u32,
    /// Native trace lines forwarded to the log.
    pub trace_lines: usize,
    /// Local bounds changed.
    pub bounds_updated: bool,
    /// Maximal world bounds were seeded from this frame.
    pub world_bounds_seeded: bool,
    /// Host buffers were reallocated.
    pub buffers_reallocated: bool,
    /// Host buffers were handed to the engine.
    pub buffers_published: bool,
    /// The one-shot display pause fired.
    pub paused_on_frame: bool,
    /// Playback entered end-of-stream.
    pub end_of_stream: bool,
}

impl TickReport {
    /// Whether the tick ran to completion.
    #[must_use]
    pub fn ran(&self) -> bool {
        self.skipped.is_none()
    }
}
