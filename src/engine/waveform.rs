//! Waveform envelope for the editor surface.
//!
//! The values are per-bucket mean absolute amplitudes, stretched into
//! `[-1, 1]` for a mirrored line plot. This is an envelope, not a literal
//! plot of the samples. Recompute whenever the buffer or the bucket count
//! (which scales with zoom) changes.

use crate::domain::PcmBuffer;

/// Downsample a buffer into `bucket_count` normalized envelope values.
///
/// Returns an empty vector when there are fewer samples than buckets.
pub fn analyze(buffer: &PcmBuffer, bucket_count: usize) -> Vec<f32> {
    if bucket_count == 0 {
        return Vec::new();
    }
    let samples: Vec<f32> = buffer
        .samples()
        .iter()
        .map(|&s| s as f32 / 32768.0)
        .collect();

    let block_size = samples.len() / bucket_count;
    if block_size == 0 {
        return Vec::new();
    }

    let means: Vec<f32> = samples
        .chunks_exact(block_size)
        .take(bucket_count)
        .map(|block| block.iter().map(|s| s.abs()).sum::<f32>() / block_size as f32)
        .collect();

    let peak = means.iter().fold(0.0_f32, |acc, &v| acc.max(v));
    let multiplier = if peak > 0.0 { 1.0 / peak } else { 1.0 };

    means.iter().map(|&v| v * multiplier * 2.0 - 1.0).collect()
}
