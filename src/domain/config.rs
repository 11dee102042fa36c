use serde::{Deserialize, Serialize};

use crate::domain::pcm::{BITS_PER_SAMPLE, DEFAULT_SAMPLE_RATE};
use crate::domain::DomainError;

/// Canonical PCM format of the editing pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioFormatConfig {
    /// Sample rate in Hz; matches the speech collaborator's output.
    pub sample_rate: u32,
    /// Bits per sample (only 16 is supported).
    pub bits_per_sample: u16,
    /// Channel count (only mono is supported).
    pub channels: u16,
}

impl Default for AudioFormatConfig {
    fn default() -> Self {
        Self {
            sample_rate: DEFAULT_SAMPLE_RATE,
            bits_per_sample: BITS_PER_SAMPLE,
            channels: 1,
        }
    }
}

/// Waveform editor configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Waveform buckets rendered at zoom 1.0.
    pub base_waveform_buckets: usize,
    /// Smallest allowed zoom factor.
    pub min_zoom: f64,
    /// Largest allowed zoom factor.
    pub max_zoom: f64,
    /// Noise gate threshold offered by default (fraction of full scale).
    pub default_noise_gate_threshold: f64,
    /// Silence inserted by default, in seconds.
    pub default_silence_secs: f64,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            base_waveform_buckets: 200,
            min_zoom: 1.0,
            max_zoom: 20.0,
            default_noise_gate_threshold: 0.02,
            default_silence_secs: 1.0,
        }
    }
}

impl AudioFormatConfig {
    /// The engine only handles mono 16-bit PCM at a non-zero rate.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.bits_per_sample != BITS_PER_SAMPLE || self.channels != 1 {
            return Err(DomainError::Config(format!(
                "unsupported audio format: {} channel(s) at {} bits (expected mono 16-bit)",
                self.channels, self.bits_per_sample
            )));
        }
        if self.sample_rate == 0 {
            return Err(DomainError::Config("sample_rate must be non-zero".to_string()));
        }
        Ok(())
    }
}

impl EditorConfig {
    /// Usable zoom range: a missing or non-positive minimum falls back to 1.0,
    /// and the maximum is never below the minimum.
    pub fn zoom_bounds(&self) -> (f64, f64) {
        let min = if self.min_zoom.is_finite() && self.min_zoom > 0.0 {
            self.min_zoom
        } else {
            1.0
        };
        let max = if self.max_zoom.is_finite() {
            self.max_zoom.max(min)
        } else {
            min
        };
        (min, max)
    }

    /// Number of waveform buckets for a zoom factor.
    ///
    /// More buckets reveal more detail as the surface widens.
    pub fn bucket_count(&self, zoom: f64) -> usize {
        let (min, max) = self.zoom_bounds();
        let zoom = if zoom.is_finite() {
            zoom.clamp(min, max)
        } else {
            min
        };
        (self.base_waveform_buckets as f64 * zoom).round() as usize
    }
}

/// Background music mixing configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MixerConfig {
    /// Gain applied to the looping background track (0.0-1.0).
    pub background_volume: f32,
}

impl Default for MixerConfig {
    fn default() -> Self {
        Self {
            background_volume: 0.15,
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: "trace", "debug", "info", "warn", "error".
    pub level: String,
    /// Enable file logging with rotation.
    pub file_logging: bool,
    /// Maximum number of log files to keep.
    pub max_files: u32,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file_logging: true,
            max_files: 7,
        }
    }
}

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub audio: AudioFormatConfig,
    pub editor: EditorConfig,
    pub mixer: MixerConfig,
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Create a new AppConfig with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject settings the engine cannot honor.
    pub fn validate(&self) -> Result<(), DomainError> {
        self.audio.validate()
    }
}
