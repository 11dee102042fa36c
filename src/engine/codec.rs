//! Base64 transport and canonical WAV framing for mono 16-bit PCM.

use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine as _;
use tracing::warn;

use crate::domain::pcm::{BITS_PER_SAMPLE, BYTES_PER_SAMPLE};
use crate::domain::{DomainError, PcmBuffer};

/// Size of the canonical RIFF/WAVE header.
pub const WAV_HEADER_LEN: usize = 44;

/// Encode raw bytes as standard base64.
pub fn encode(bytes: &[u8]) -> String {
    BASE64_STANDARD.encode(bytes)
}

/// Decode standard base64 into raw bytes.
pub fn decode(text: &str) -> Result<Vec<u8>, DomainError> {
    Ok(BASE64_STANDARD.decode(text.trim())?)
}

/// Decode a base64 PCM chunk from the speech collaborator.
pub fn decode_pcm(text: &str, sample_rate: u32) -> Result<PcmBuffer, DomainError> {
    PcmBuffer::from_bytes(decode(text)?, sample_rate)
}

/// Encode a buffer for the episode store.
pub fn encode_pcm(buffer: &PcmBuffer) -> String {
    encode(buffer.as_bytes())
}

/// Duration of a raw chunk in seconds.
pub fn chunk_duration_seconds(byte_len: usize, sample_rate: u32, bits_per_sample: u16) -> f64 {
    let bytes_per_sample = (bits_per_sample / 8).max(1) as usize;
    if sample_rate == 0 {
        return 0.0;
    }
    (byte_len / bytes_per_sample) as f64 / sample_rate as f64
}

/// Fields of the canonical 44-byte header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WavHeader {
    pub sample_rate: u32,
    pub channels: u16,
    pub bits_per_sample: u16,
    pub data_size: u32,
}

impl WavHeader {
    pub fn new(sample_rate: u32, channels: u16, bits_per_sample: u16, data_size: u32) -> Self {
        Self {
            sample_rate,
            channels,
            bits_per_sample,
            data_size,
        }
    }

    pub fn byte_rate(&self) -> u32 {
        self.sample_rate * self.channels as u32 * self.bits_per_sample as u32 / 8
    }

    pub fn block_align(&self) -> u16 {
        self.channels * self.bits_per_sample / 8
    }

    pub fn to_bytes(&self) -> [u8; WAV_HEADER_LEN] {
        let mut out = [0u8; WAV_HEADER_LEN];
        out[0..4].copy_from_slice(b"RIFF");
        out[4..8].copy_from_slice(&(36 + self.data_size).to_le_bytes());
        out[8..12].copy_from_slice(b"WAVE");
        out[12..16].copy_from_slice(b"fmt ");
        out[16..20].copy_from_slice(&16u32.to_le_bytes());
        out[20..22].copy_from_slice(&1u16.to_le_bytes()); // PCM
        out[22..24].copy_from_slice(&self.channels.to_le_bytes());
        out[24..28].copy_from_slice(&self.sample_rate.to_le_bytes());
        out[28..32].copy_from_slice(&self.byte_rate().to_le_bytes());
        out[32..34].copy_from_slice(&self.block_align().to_le_bytes());
        out[34..36].copy_from_slice(&self.bits_per_sample.to_le_bytes());
        out[36..40].copy_from_slice(b"data");
        out[40..44].copy_from_slice(&self.data_size.to_le_bytes());
        out
    }

    /// Parse and validate a canonical header.
    pub fn parse(bytes: &[u8]) -> Result<Self, DomainError> {
        if bytes.len() < WAV_HEADER_LEN {
            return Err(DomainError::Decode("WAV data shorter than header".to_string()));
        }
        if &bytes[0..4] != b"RIFF" || &bytes[8..12] != b"WAVE" {
            return Err(DomainError::Decode("Missing RIFF/WAVE identifier".to_string()));
        }
        if &bytes[12..16] != b"fmt " {
            return Err(DomainError::Decode("Missing fmt chunk".to_string()));
        }
        if &bytes[36..40] != b"data" {
            return Err(DomainError::Decode(
                "data chunk not at canonical offset".to_string(),
            ));
        }

        let audio_format = read_u16(bytes, 20);
        let header = Self {
            channels: read_u16(bytes, 22),
            sample_rate: read_u32(bytes, 24),
            bits_per_sample: read_u16(bytes, 34),
            data_size: read_u32(bytes, 40),
        };

        if audio_format != 1 {
            return Err(DomainError::UnsupportedFormat(format!(
                "WAV format tag {} is not linear PCM",
                audio_format
            )));
        }
        if header.channels != 1 || header.bits_per_sample != BITS_PER_SAMPLE {
            return Err(DomainError::UnsupportedFormat(format!(
                "expected mono 16-bit PCM, got {} channel(s) at {} bits",
                header.channels, header.bits_per_sample
            )));
        }
        Ok(header)
    }
}

pub(crate) fn read_u16(bytes: &[u8], at: usize) -> u16 {
    u16::from_le_bytes([bytes[at], bytes[at + 1]])
}

pub(crate) fn read_u32(bytes: &[u8], at: usize) -> u32 {
    u32::from_le_bytes([bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]])
}

/// Prepend the canonical 44-byte header to raw PCM.
pub fn wrap_as_wav(pcm: &[u8], sample_rate: u32, channels: u16, bits_per_sample: u16) -> Vec<u8> {
    let header = WavHeader::new(sample_rate, channels, bits_per_sample, pcm.len() as u32);
    let mut out = Vec::with_capacity(WAV_HEADER_LEN + pcm.len());
    out.extend_from_slice(&header.to_bytes());
    out.extend_from_slice(pcm);
    out
}

/// Wrap a buffer as a mono 16-bit WAV file.
pub fn buffer_to_wav(buffer: &PcmBuffer) -> Vec<u8> {
    wrap_as_wav(buffer.as_bytes(), buffer.sample_rate(), 1, BITS_PER_SAMPLE)
}

/// Strip the canonical header and return the PCM payload.
///
/// The header tags and format are validated before the fixed offset is
/// trusted. Files with extra chunks go through the import decoder instead.
pub fn unwrap_wav(bytes: &[u8]) -> Result<Vec<u8>, DomainError> {
    let header = WavHeader::parse(bytes)?;
    let available = bytes.len() - WAV_HEADER_LEN;
    let declared = header.data_size as usize;
    if declared > available {
        warn!(
            declared,
            available, "WAV data chunk is shorter than its header claims"
        );
    }
    let end = WAV_HEADER_LEN + declared.min(available);
    Ok(bytes[WAV_HEADER_LEN..end].to_vec())
}

/// Unwrap a canonical WAV file into a buffer at its declared sample rate.
pub fn unwrap_wav_pcm(bytes: &[u8]) -> Result<PcmBuffer, DomainError> {
    let header = WavHeader::parse(bytes)?;
    let mut payload = unwrap_wav(bytes)?;
    if payload.len() % BYTES_PER_SAMPLE != 0 {
        warn!(len = payload.len(), "Dropping trailing half sample");
        payload.pop();
    }
    PcmBuffer::from_bytes(payload, header.sample_rate)
}
