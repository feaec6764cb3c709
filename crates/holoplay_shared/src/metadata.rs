//! File-level and per-frame metadata snapshots reported by the engine.

use crate::math::Bounds;

/// Per-source constants, valid for the lifetime of one opened source.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FileMetadata {
    /// Whether the source carries an audio track.
    pub has_audio: bool,
    /// Duration in 100 ns units.
    pub duration_100ns: u64,
    /// Total frame count.
    pub frame_count: u32,
    /// Largest vertex count of any frame.
    pub max_vertex_count: u32,
    /// Largest index count of any frame.
    pub max_index_count: u32,
    /// Average bitrate in megabits per second.
    pub bitrate_mbps: f32,
    /// File size as reported by the container.
    pub file_size: f32,
    /// Bounds of the whole capture. Degenerate when the file has none.
    pub bounds: Bounds,
    /// Texture atlas width.
    pub texture_width: u32,
    /// Texture atlas height.
    pub texture_height: u32,
    /// Whether frames carry normals.
    pub has_normals: bool,
}

impl FileMetadata {
    /// Returns true when the file carried usable bounds.
    #[must_use]
    pub fn has_bounds(&self) -> bool {
        !self.bounds.is_degenerate()
    }

    /// Duration in seconds.
    #[must_use]
    pub fn duration_secs(&self) -> f64 {
        self.duration_100ns as f64 / 10_000_000.0
    }
}

/// Per-rendered-frame snapshot.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameMetadata {
    /// Presentation timestamp in 100 ns units.
    pub timestamp_100ns: u64,
    /// Bounds of this frame. Degenerate when the source has none.
    pub bounds: Bounds,
    /// Frame id, starting from 0.
    pub frame_id: u32,
    /// Vertex count of this frame.
    pub vertex_count: u32,
    /// Index count of this frame.
    pub index_count: u32,
    /// Texture width of this frame.
    pub texture_width: u32,
    /// Texture height of this frame.
    pub texture_height: u32,
    /// Decoder reached the end of the stream.
    pub is_end_of_stream: bool,
    /// Decoder handed back the previous frame because nothing new was ready.
    pub is_repeated_frame: bool,
    /// Frame is a key frame.
    pub is_key_frame: bool,
}

impl FrameMetadata {
    /// Frame metadata sized ahead of the first decoded frame.
    ///
    /// Counts take the larger of the file maxima and the configured defaults
    /// so the first buffer allocation already fits the whole clip.
    #[must_use]
    pub fn presized(file: &FileMetadata, default_vertices: u32, default_indices: u32) -> Self {
        Self {
            vertex_count: file.max_vertex_count.max(default_vertices),
            index_count: file.max_index_count.max(default_indices),
            texture_width: file.texture_width,
            texture_height: file.texture_height,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presize_prefers_file_maxima() {
        let file = FileMetadata {
            max_vertex_count: 20_000,
            max_index_count: 60_000,
            texture_width: 2048,
            texture_height: 1024,
            ..FileMetadata::default()
        };
        let frame = FrameMetadata::presized(&file, 15_000, 45_000);
        assert_eq!(frame.vertex_count, 20_000);
        assert_eq!(frame.index_count, 60_000);
        assert_eq!((frame.texture_width, frame.texture_height), (2048, 1024));
    }

    #[test]
    fn test_presize_falls_back_to_defaults() {
        let file = FileMetadata::default();
        let frame = FrameMetadata::presized(&file, 15_000, 45_000);
        assert_eq!(frame.vertex_count, 15_000);
        assert_eq!(frame.index_count, 45_000);
    }

    #[test]
    fn test_duration_secs() {
        let file = FileMetadata {
            duration_100ns: 25_000_000,
            ..FileMetadata::default()
        };
        assert!((file.duration_secs() - 2.5).abs() < f64::EPSILON);
    }
}
