//! Background music bed under the voice track.

use tracing::debug;

use crate::domain::{DomainError, PcmBuffer};
use crate::engine::transform::clamp16;

/// Lay a looping background track under the voice track.
///
/// The output has the voice track's length. The background wraps around
/// with modulo indexing, and every mixed sample is hard-clipped to 16 bits.
pub fn mix(
    voice: &PcmBuffer,
    background: &PcmBuffer,
    background_volume: f32,
) -> Result<PcmBuffer, DomainError> {
    if !background_volume.is_finite() {
        return Err(DomainError::InvalidParameter(format!(
            "background volume must be finite, got {}",
            background_volume
        )));
    }
    if background.sample_rate() != voice.sample_rate() {
        return Err(DomainError::InvalidParameter(format!(
            "background is {} Hz but the voice track is {} Hz",
            background.sample_rate(),
            voice.sample_rate()
        )));
    }
    if background.is_empty() {
        return Ok(voice.clone());
    }

    let voice_samples = voice.samples();
    let bed = background.samples();
    let volume = background_volume as f64;

    let mixed: Vec<i16> = voice_samples
        .iter()
        .enumerate()
        .map(|(i, &v)| clamp16(v as f64 + bed[i % bed.len()] as f64 * volume))
        .collect();

    debug!(
        voice_samples = voice_samples.len(),
        background_samples = bed.len(),
        loops = voice_samples.len().div_ceil(bed.len()),
        volume = background_volume,
        "Mixed background track"
    );

    Ok(PcmBuffer::from_samples(&mixed, voice.sample_rate()))
}
