use crate::domain::DomainError;

/// Sample rate used by the speech collaborator and the whole editing pipeline.
pub const DEFAULT_SAMPLE_RATE: u32 = 24_000;

/// Bit depth of every buffer handled by the engine.
pub const BITS_PER_SAMPLE: u16 = 16;

/// Bytes per mono 16-bit sample.
pub const BYTES_PER_SAMPLE: usize = 2;

/// Longest buffer a WAV `data` chunk (32-bit size field) can describe.
pub const MAX_SAMPLES: usize = (u32::MAX / 2) as usize;

/// Mono 16-bit little-endian PCM.
///
/// The byte length is always even so a sample is never split. Operations
/// never mutate a buffer in place; they build a new one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PcmBuffer {
    bytes: Vec<u8>,
    sample_rate: u32,
}

impl PcmBuffer {
    /// Create an empty buffer.
    pub fn empty(sample_rate: u32) -> Self {
        Self {
            bytes: Vec::new(),
            sample_rate,
        }
    }

    /// Wrap raw little-endian bytes. Odd lengths are rejected.
    pub fn from_bytes(bytes: Vec<u8>, sample_rate: u32) -> Result<Self, DomainError> {
        if bytes.len() % BYTES_PER_SAMPLE != 0 {
            return Err(DomainError::Decode(format!(
                "PCM payload has odd length ({} bytes)",
                bytes.len()
            )));
        }
        Ok(Self { bytes, sample_rate })
    }

    /// Build a buffer from decoded samples.
    pub fn from_samples(samples: &[i16], sample_rate: u32) -> Self {
        let mut bytes = Vec::with_capacity(samples.len() * BYTES_PER_SAMPLE);
        for sample in samples {
            bytes.extend_from_slice(&sample.to_le_bytes());
        }
        Self { bytes, sample_rate }
    }

    /// Decode the samples.
    pub fn samples(&self) -> Vec<i16> {
        self.bytes
            .chunks_exact(BYTES_PER_SAMPLE)
            .map(|pair| i16::from_le_bytes([pair[0], pair[1]]))
            .collect()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn len_bytes(&self) -> usize {
        self.bytes.len()
    }

    pub fn sample_count(&self) -> usize {
        self.bytes.len() / BYTES_PER_SAMPLE
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Get the duration in seconds.
    pub fn duration_secs(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.sample_count() as f64 / self.sample_rate as f64
    }
}
