//! # Player Settings
//!
//! Persisted per-source open settings and the player-wide configuration,
//! loaded once at startup from TOML. Every field has a default so partial
//! files are valid.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{
    DEFAULT_MAX_INDEX_COUNT, DEFAULT_MAX_VERTEX_COUNT, DEFAULT_PAUSE_FRAME_ID,
    DEFAULT_TEXTURE_LOAD_TIMEOUT_MS,
};

/// Errors raised while loading or validating settings.
#[derive(Error, Debug)]
pub enum SettingsError {
    /// The config file could not be read.
    #[error("failed to read config {path}: {source}")]
    Io {
        /// File that failed.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },

    /// The config text is not valid TOML for this schema.
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    /// A field holds a value outside its valid range.
    #[error("invalid value for {field}: {reason}")]
    InvalidValue {
        /// Offending field.
        field: &'static str,
        /// What is wrong with it.
        reason: String,
    },
}

/// Result type for settings operations.
pub type SettingsResult<T> = Result<T, SettingsError>;

/// Host platform. Only path resolution and texture format depend on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Platform {
    /// Windows, macOS, Linux.
    #[default]
    Desktop,
    /// Android. Bare asset names go to the platform asset manager unmodified.
    Android,
}

/// Whether the player runs inside the authoring tool or as a shipped build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuildProfile {
    /// Running inside the authoring editor.
    #[default]
    Editor,
    /// Shipped player build.
    Player,
}

/// Who submits the draw calls for the decoded frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderMode {
    /// The native engine draws through per-camera render hooks.
    NativeDraw,
    /// The host draws from buffers the engine fills.
    #[default]
    HostDraw,
}

/// Rendering target whose coordinate conventions the camera views follow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetDevice {
    /// Pick from the active XR runtime name.
    #[default]
    AutoDetect,
    /// Desktop PC.
    Pc,
    /// HoloLens.
    Hololens,
    /// Store app.
    AppStore,
    /// Windows Mixed Reality headset.
    WindowsMixedReality,
    /// OpenVR / Vive headset.
    Vive,
    /// Oculus headset.
    Oculus,
    /// Post-processing pipeline that draws through an intermediate target.
    PostEffects,
    /// Legacy desktop conventions.
    LegacyPc,
}

/// Verbosity of the native engine's own trace output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NativeLogLevel {
    /// Everything.
    Verbose,
    /// Informational messages.
    Message,
    /// Debug messages.
    Debug,
    /// Critical errors only.
    Critical,
    /// Tracing disabled.
    #[default]
    None,
}

impl NativeLogLevel {
    /// Level code understood by the engine.
    #[must_use]
    pub const fn code(self) -> i32 {
        match self {
            Self::Verbose => 0,
            Self::Message => 1,
            Self::Debug => 2,
            Self::Critical => 3,
            Self::None => 4,
        }
    }

    /// Parses an engine level code. Unknown codes disable tracing.
    #[must_use]
    pub const fn from_code(code: i32) -> Self {
        match code {
            0 => Self::Verbose,
            1 => Self::Message,
            2 => Self::Debug,
            3 => Self::Critical,
            _ => Self::None,
        }
    }
}

/// Memory-pressure thresholds, in gigabytes, handed to the engine at session creation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MemoryLimits {
    /// Lower bound when decoding in hardware.
    pub hardware_min_gb: f32,
    /// Upper bound when decoding in hardware.
    pub hardware_max_gb: f32,
    /// Lower bound when decoding in software.
    pub software_min_gb: f32,
    /// Upper bound when decoding in software.
    pub software_max_gb: f32,
}

impl Default for MemoryLimits {
    fn default() -> Self {
        Self {
            hardware_min_gb: 1.75,
            hardware_max_gb: 2.5,
            software_min_gb: 1.0,
            software_max_gb: 2.2,
        }
    }
}

impl MemoryLimits {
    /// Thresholds in effect for the chosen decode path, as `(min, max)`.
    #[must_use]
    pub fn for_decode(&self, hardware: bool) -> (f32, f32) {
        if hardware {
            (self.hardware_min_gb, self.hardware_max_gb)
        } else {
            (self.software_min_gb, self.software_max_gb)
        }
    }

    fn validate(&self) -> SettingsResult<()> {
        for (field, lo, hi) in [
            ("memory.hardware", self.hardware_min_gb, self.hardware_max_gb),
            ("memory.software", self.software_min_gb, self.software_max_gb),
        ] {
            if !(lo >= 0.0 && hi >= lo) {
                return Err(SettingsError::InvalidValue {
                    field,
                    reason: format!("min {lo} must be non-negative and not above max {hi}"),
                });
            }
        }
        Ok(())
    }
}

/// Settings passed to the engine with every open.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OpenSettings {
    /// Do not decode the audio track.
    pub audio_disabled: bool,
    /// Restart from the beginning at end of stream.
    pub auto_looping: bool,
    /// Present frames by the playback clock instead of as fast as decoded.
    pub render_via_clock: bool,
    /// Ask the engine to output vertex normals.
    pub output_normals: bool,
    /// Remove the download cache on close.
    pub perform_cache_cleanup: bool,
    /// Begin downloading remote sources at open time.
    pub start_download_on_open: bool,
    /// Keep decoded frames in a local cache.
    pub use_frame_cache: bool,
    /// Playback rate multiplier.
    pub playback_rate: f32,
    /// Minimum positional-audio gain, in dB.
    pub hrtf_min_gain: f32,
    /// Maximum positional-audio gain, in dB.
    pub hrtf_max_gain: f32,
    /// Distance at which positional audio plays at unity gain.
    pub hrtf_gain_distance: f32,
    /// Distance beyond which positional audio is silent.
    pub hrtf_cutoff_distance: f32,
    /// Directory for downloaded and cached content. Empty means engine default.
    pub user_cache_location: String,
    /// Audio output device id. Empty means the system default.
    pub audio_device_id: String,
    /// Decode video in hardware.
    pub use_hw_decode: bool,
    /// Keep decoded textures in hardware surfaces.
    pub use_hw_texture: bool,
    /// Lock hardware textures while the host reads them.
    pub lock_hw_textures: bool,
    /// Use a software clock even when an audio clock is available.
    pub force_software_clock: bool,
    /// Fade the last frames of the clip.
    pub render_last_frames_transparent: bool,
}

impl Default for OpenSettings {
    fn default() -> Self {
        Self {
            audio_disabled: false,
            auto_looping: true,
            render_via_clock: true,
            output_normals: true,
            perform_cache_cleanup: false,
            start_download_on_open: false,
            use_frame_cache: false,
            playback_rate: 1.0,
            hrtf_min_gain: -10.0,
            hrtf_max_gain: 12.0,
            hrtf_gain_distance: 1.0,
            hrtf_cutoff_distance: f32::MAX,
            user_cache_location: String::new(),
            audio_device_id: String::new(),
            use_hw_decode: true,
            use_hw_texture: true,
            lock_hw_textures: false,
            force_software_clock: false,
            render_last_frames_transparent: true,
        }
    }
}

impl OpenSettings {
    fn validate(&self) -> SettingsResult<()> {
        if !(self.playback_rate.is_finite() && self.playback_rate > 0.0) {
            return Err(SettingsError::InvalidValue {
                field: "open.playback_rate",
                reason: format!("{} is not a positive rate", self.playback_rate),
            });
        }
        if self.hrtf_min_gain > self.hrtf_max_gain {
            return Err(SettingsError::InvalidValue {
                field: "open.hrtf_min_gain",
                reason: format!(
                    "{} exceeds hrtf_max_gain {}",
                    self.hrtf_min_gain, self.hrtf_max_gain
                ),
            });
        }
        Ok(())
    }
}

/// Player-wide configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Coordinate conventions to render for.
    pub target_device: TargetDevice,
    /// Mirror the capture on X to convert between handedness conventions.
    pub flip_handedness: bool,
    /// Who draws the frame.
    pub render_mode: RenderMode,
    /// Vertex count assumed before the file reports one.
    pub default_max_vertex_count: u32,
    /// Index count assumed before the file reports one.
    pub default_max_index_count: u32,
    /// Memory-pressure thresholds.
    pub memory: MemoryLimits,
    /// Texture load timeout forwarded to the engine.
    pub texture_load_timeout_ms: u32,
    /// Audio volume in `[0, 1]`.
    pub audio_volume: f32,
    /// Playback clock multiplier.
    pub clock_scale: f32,
    /// Frame the one-shot display pause stops on.
    pub pause_frame_id: u32,
    /// Directory bare source names resolve against.
    pub assets_dir: PathBuf,
    /// Host platform.
    pub platform: Platform,
    /// Editor or shipped build.
    pub build_profile: BuildProfile,
    /// Host depth buffer runs far-to-near.
    pub z_buffer_inverted: bool,
    /// Native engine trace verbosity.
    pub native_log_level: NativeLogLevel,
    /// Settings passed with every open.
    pub open: OpenSettings,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            target_device: TargetDevice::default(),
            flip_handedness: true,
            render_mode: RenderMode::default(),
            default_max_vertex_count: DEFAULT_MAX_VERTEX_COUNT,
            default_max_index_count: DEFAULT_MAX_INDEX_COUNT,
            memory: MemoryLimits::default(),
            texture_load_timeout_ms: DEFAULT_TEXTURE_LOAD_TIMEOUT_MS,
            audio_volume: 1.0,
            clock_scale: 1.0,
            pause_frame_id: DEFAULT_PAUSE_FRAME_ID,
            assets_dir: PathBuf::from("assets"),
            platform: Platform::default(),
            build_profile: BuildProfile::default(),
            z_buffer_inverted: false,
            native_log_level: NativeLogLevel::default(),
            open: OpenSettings::default(),
        }
    }
}

impl PlayerConfig {
    /// Parses and validates a config from TOML text.
    ///
    /// # Errors
    ///
    /// Returns an error if the text does not parse or a value is out of range.
    pub fn from_toml_str(text: &str) -> SettingsResult<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a config file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or its contents are invalid.
    pub fn load(path: impl AsRef<Path>) -> SettingsResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Checks every range-constrained field.
    ///
    /// # Errors
    ///
    /// Returns the first field found out of range.
    pub fn validate(&self) -> SettingsResult<()> {
        if !(0.0..=1.0).contains(&self.audio_volume) {
            return Err(SettingsError::InvalidValue {
                field: "audio_volume",
                reason: format!("{} is outside [0, 1]", self.audio_volume),
            });
        }
        if !(self.clock_scale.is_finite() && self.clock_scale > 0.0) {
            return Err(SettingsError::InvalidValue {
                field: "clock_scale",
                reason: format!("{} is not a positive multiplier", self.clock_scale),
            });
        }
        if self.default_max_vertex_count == 0 || self.default_max_index_count == 0 {
            return Err(SettingsError::InvalidValue {
                field: "default_max_vertex_count",
                reason: "default buffer sizes must be non-zero".to_string(),
            });
        }
        self.memory.validate()?;
        self.open.validate()
    }

    /// Thresholds for the decode path selected in [`OpenSettings`].
    #[must_use]
    pub fn active_memory_limits(&self) -> (f32, f32) {
        self.memory.for_decode(self.open.use_hw_decode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_shipped_player() {
        let config = PlayerConfig::default();
        assert!(config.open.auto_looping);
        assert!(config.open.render_via_clock);
        assert!(config.open.use_hw_decode);
        assert_eq!(config.open.hrtf_cutoff_distance, f32::MAX);
        assert_eq!(config.render_mode, RenderMode::HostDraw);
        assert_eq!(config.default_max_vertex_count, 15_000);
        assert_eq!(config.default_max_index_count, 45_000);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = PlayerConfig::from_toml_str(
            r#"
            target_device = "oculus"
            render_mode = "native_draw"

            [open]
            auto_looping = false
            playback_rate = 2.0
            "#,
        )
        .unwrap();
        assert_eq!(config.target_device, TargetDevice::Oculus);
        assert_eq!(config.render_mode, RenderMode::NativeDraw);
        assert!(!config.open.auto_looping);
        assert!((config.open.playback_rate - 2.0).abs() < f32::EPSILON);
        assert!(config.open.output_normals);
        assert_eq!(config.memory, MemoryLimits::default());
    }

    #[test]
    fn test_invalid_volume_rejected() {
        let err = PlayerConfig::from_toml_str("audio_volume = 1.5").unwrap_err();
        assert!(matches!(
            err,
            SettingsError::InvalidValue {
                field: "audio_volume",
                ..
            }
        ));
    }

    #[test]
    fn test_unknown_device_is_parse_error() {
        let err = PlayerConfig::from_toml_str(r#"target_device = "toaster""#).unwrap_err();
        assert!(matches!(err, SettingsError::Parse(_)));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = PlayerConfig::load("/nonexistent/holoplay.toml").unwrap_err();
        assert!(matches!(err, SettingsError::Io { .. }));
    }

    #[test]
    fn test_memory_limits_by_decode_path() {
        let limits = MemoryLimits::default();
        assert_eq!(limits.for_decode(true), (1.75, 2.5));
        assert_eq!(limits.for_decode(false), (1.0, 2.2));
    }

    #[test]
    fn test_log_level_codes() {
        assert_eq!(NativeLogLevel::Verbose.code(), 0);
        assert_eq!(NativeLogLevel::None.code(), 4);
        assert_eq!(NativeLogLevel::from_code(2), NativeLogLevel::Debug);
        assert_eq!(NativeLogLevel::from_code(99), NativeLogLevel::None);
    }
}
