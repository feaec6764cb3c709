//! Buffer capacity quanta.

use holoplay_shared::{FrameMetadata, INDEX_QUANTUM, TRIANGLE_STRIDE, VERTEX_QUANTUM};

/// Rounds `value` up to the next multiple of `quantum`.
#[inline]
#[must_use]
pub const fn roundup(value: u32, quantum: u32) -> u32 {
    if quantum == 0 {
        return value;
    }
    let rem = value % quantum;
    if rem == 0 {
        value
    } else {
        value.saturating_add(quantum - rem)
    }
}

/// Capacities a frame demands.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BufferCapacity {
    /// Vertex capacity.
    pub vertices: u32,
    /// Index capacity. Always a whole number of triangles.
    pub indices: u32,
}

impl BufferCapacity {
    /// Rounded capacity for raw counts.
    #[must_use]
    pub const fn for_counts(vertex_count: u32, index_count: u32) -> Self {
        Self {
            vertices: roundup(vertex_count, VERTEX_QUANTUM),
            indices: roundup(roundup(index_count, INDEX_QUANTUM), TRIANGLE_STRIDE),
        }
    }

    /// Rounded capacity for a frame.
    #[must_use]
    pub const fn for_frame(frame: &FrameMetadata) -> Self {
        Self::for_counts(frame.vertex_count, frame.index_count)
    }

    /// Whether this capacity holds everything `demand` needs.
    #[must_use]
    pub const fn covers(&self, demand: &Self) -> bool {
        self.vertices >= demand.vertices && self.indices >= demand.indices
    }
}
