use std::io::Cursor;
use std::path::Path;

use async_trait::async_trait;
use hound::{SampleFormat, WavReader};
use tracing::{debug, info};

use crate::domain::pcm::BITS_PER_SAMPLE;
use crate::domain::{DomainError, PcmBuffer};
use crate::engine::transform::resample;
use crate::ports::AudioDecoder;

/// Decodes uploaded WAV files into the canonical pipeline format.
///
/// Unlike the canonical unwrap, any RIFF layout `hound` reads is accepted
/// (extra `LIST`/`fact` chunks, extensible `fmt `). Only 16-bit integer PCM
/// is supported; channels are averaged to mono and the result is resampled
/// to the target rate.
pub struct WavFileDecoder {
    target_sample_rate: u32,
}

impl WavFileDecoder {
    pub fn new(target_sample_rate: u32) -> Self {
        Self { target_sample_rate }
    }

    pub fn target_sample_rate(&self) -> u32 {
        self.target_sample_rate
    }

    /// Synchronous decode used by the async entry points.
    pub fn decode(&self, bytes: &[u8]) -> Result<PcmBuffer, DomainError> {
        let mut reader = WavReader::new(Cursor::new(bytes))?;
        let spec = reader.spec();

        if spec.sample_format != SampleFormat::Int || spec.bits_per_sample != BITS_PER_SAMPLE {
            return Err(DomainError::UnsupportedFormat(format!(
                "{}-bit {:?} audio (only 16-bit integer PCM is supported)",
                spec.bits_per_sample, spec.sample_format
            )));
        }
        if spec.channels == 0 || spec.sample_rate == 0 {
            return Err(DomainError::UnsupportedFormat(
                "zero channels or sample rate".to_string(),
            ));
        }

        let interleaved = reader
            .samples::<i16>()
            .collect::<Result<Vec<_>, _>>()?;

        let channels = spec.channels as usize;
        let mono: Vec<i16> = interleaved
            .chunks_exact(channels)
            .map(|frame| {
                let sum: i32 = frame.iter().map(|&s| s as i32).sum();
                (sum / channels as i32) as i16
            })
            .collect();

        let resampled = resample(&mono, spec.sample_rate, self.target_sample_rate);

        info!(
            source_rate = spec.sample_rate,
            source_channels = spec.channels,
            samples = resampled.len(),
            target_rate = self.target_sample_rate,
            "Decoded WAV import"
        );

        Ok(PcmBuffer::from_samples(&resampled, self.target_sample_rate))
    }
}

#[async_trait]
impl AudioDecoder for WavFileDecoder {
    async fn decode_bytes(&self, bytes: &[u8]) -> Result<PcmBuffer, DomainError> {
        let owned = bytes.to_vec();
        let decoder = WavFileDecoder::new(self.target_sample_rate);
        tokio::task::spawn_blocking(move || decoder.decode(&owned))
            .await
            .map_err(|e| DomainError::Decode(format!("decoder task failed: {}", e)))?
    }

    async fn decode_file(&self, path: &Path) -> Result<PcmBuffer, DomainError> {
        debug!(path = ?path, "Reading audio file");
        let bytes = tokio::fs::read(path).await?;
        self.decode_bytes(&bytes).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::codec::wrap_as_wav;
    use hound::{WavSpec, WavWriter};
    use std::env;

    fn interleaved(frames: &[(i16, i16)]) -> Vec<u8> {
        let mut out = Vec::new();
        for (l, r) in frames {
            out.extend_from_slice(&l.to_le_bytes());
            out.extend_from_slice(&r.to_le_bytes());
        }
        out
    }

    #[test]
    fn test_decode_canonical_mono() {
        let pcm = PcmBuffer::from_samples(&[1, 2, 3], 24_000);
        let wav = wrap_as_wav(pcm.as_bytes(), 24_000, 1, 16);
        let decoded = WavFileDecoder::new(24_000).decode(&wav).unwrap();
        assert_eq!(decoded, pcm);
    }

    #[test]
    fn test_decode_downmixes_stereo() {
        let data = interleaved(&[(100, 300), (-100, -300)]);
        let wav = wrap_as_wav(&data, 24_000, 2, 16);
        let decoded = WavFileDecoder::new(24_000).decode(&wav).unwrap();
        assert_eq!(decoded.samples(), vec![200, -200]);
    }

    #[test]
    fn test_decode_resamples_to_target() {
        let samples: Vec<i16> = vec![0; 48_000];
        let pcm = PcmBuffer::from_samples(&samples, 48_000);
        let wav = wrap_as_wav(pcm.as_bytes(), 48_000, 1, 16);
        let decoded = WavFileDecoder::new(24_000).decode(&wav).unwrap();
        assert_eq!(decoded.sample_rate(), 24_000);
        assert_eq!(decoded.sample_count(), 24_000);
    }

    #[test]
    fn test_decode_skips_extra_chunks() {
        let canonical = wrap_as_wav(&[7, 0, 8, 0], 24_000, 1, 16);
        let mut wav = canonical[..36].to_vec();
        wav.extend_from_slice(b"LIST");
        wav.extend_from_slice(&4u32.to_le_bytes());
        wav.extend_from_slice(b"INFO");
        wav.extend_from_slice(&canonical[36..]);
        let riff_size = (wav.len() - 8) as u32;
        wav[4..8].copy_from_slice(&riff_size.to_le_bytes());

        let decoded = WavFileDecoder::new(24_000).decode(&wav).unwrap();
        assert_eq!(decoded.samples(), vec![7, 8]);
    }

    #[test]
    fn test_decode_file_written_by_hound() {
        let spec = WavSpec {
            channels: 2,
            sample_rate: 24_000,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        };
        let mut cursor = Cursor::new(Vec::new());
        {
            let mut writer = WavWriter::new(&mut cursor, spec).unwrap();
            for s in [1000i16, 3000, -50, -150] {
                writer.write_sample(s).unwrap();
            }
            writer.finalize().unwrap();
        }

        let decoded = WavFileDecoder::new(24_000)
            .decode(cursor.get_ref())
            .unwrap();
        assert_eq!(decoded.samples(), vec![2000, -100]);
    }

    #[test]
    fn test_decode_rejects_unsupported() {
        let decoder = WavFileDecoder::new(24_000);
        assert!(matches!(
            decoder.decode(b"ID3\x03not a wav file"),
            Err(DomainError::UnsupportedFormat(_))
        ));
        let eight_bit = wrap_as_wav(&[0u8; 4], 24_000, 1, 8);
        assert!(matches!(
            decoder.decode(&eight_bit),
            Err(DomainError::UnsupportedFormat(_))
        ));

        let float_spec = WavSpec {
            channels: 1,
            sample_rate: 24_000,
            bits_per_sample: 32,
            sample_format: SampleFormat::Float,
        };
        let mut cursor = Cursor::new(Vec::new());
        {
            let mut writer = WavWriter::new(&mut cursor, float_spec).unwrap();
            writer.write_sample(0.5f32).unwrap();
            writer.finalize().unwrap();
        }
        assert!(matches!(
            decoder.decode(cursor.get_ref()),
            Err(DomainError::UnsupportedFormat(_))
        ));
    }

    #[tokio::test]
    async fn test_decode_file() {
        let path = env::temp_dir().join("podstudio_decoder_test.wav");
        let wav = wrap_as_wav(&[10, 0, 20, 0], 24_000, 1, 16);
        std::fs::write(&path, &wav).unwrap();

        let decoder = WavFileDecoder::new(24_000);
        let decoded = decoder.decode_file(&path).await.unwrap();
        assert_eq!(decoded.samples(), vec![10, 20]);

        let missing = decoder
            .decode_file(&env::temp_dir().join("podstudio_missing.wav"))
            .await;
        assert!(matches!(missing, Err(DomainError::Io(_))));

        let _ = std::fs::remove_file(&path);
    }
}
