//! Sample-accurate edit primitives.
//!
//! Every function takes buffers by reference and returns a new buffer.
//! Time-to-byte conversion always floors and then snaps to an even offset,
//! so a sample is never split.

use serde::{Deserialize, Serialize};

use crate::domain::pcm::{BITS_PER_SAMPLE, BYTES_PER_SAMPLE, DEFAULT_SAMPLE_RATE, MAX_SAMPLES};
use crate::domain::{DomainError, PcmBuffer};

/// Direction of a linear fade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FadeDirection {
    In,
    Out,
}

/// Hard-clip to the signed 16-bit range.
pub(crate) fn clamp16(value: f64) -> i16 {
    value.round().clamp(i16::MIN as f64, i16::MAX as f64) as i16
}

/// Byte offset of a time, floored and aligned down to a sample boundary.
pub fn byte_offset(seconds: f64, sample_rate: u32) -> usize {
    if !seconds.is_finite() || seconds <= 0.0 {
        return 0;
    }
    let raw = (seconds * sample_rate as f64 * BYTES_PER_SAMPLE as f64).floor() as usize;
    raw & !1
}

/// Offset inside `buffer`; times at or past the end map to its full length.
fn offset_in(buffer: &PcmBuffer, seconds: f64) -> usize {
    if seconds >= buffer.duration_secs() {
        return buffer.len_bytes();
    }
    byte_offset(seconds, buffer.sample_rate()).min(buffer.len_bytes())
}

/// Sample-aligned byte range `[start, end)` inside `buffer`.
pub fn range_offsets(buffer: &PcmBuffer, start: f64, end: f64) -> (usize, usize) {
    (offset_in(buffer, start), offset_in(buffer, end))
}

/// Floor a computed output length, rejecting anything that cannot be allocated.
fn checked_sample_count(samples: f64, what: &str) -> Result<usize, DomainError> {
    if !samples.is_finite() || samples > MAX_SAMPLES as f64 {
        return Err(DomainError::InvalidParameter(format!(
            "{} would produce {} samples (limit {})",
            what, samples, MAX_SAMPLES
        )));
    }
    Ok(samples.max(0.0).floor() as usize)
}

fn with_bytes(bytes: Vec<u8>, sample_rate: u32) -> PcmBuffer {
    // Offsets are even and sources are even-length, so this never fails.
    PcmBuffer::from_bytes(bytes, sample_rate).unwrap_or_else(|_| PcmBuffer::empty(sample_rate))
}

/// Join buffers end to end in input order. All buffers must share one sample rate.
pub fn concatenate(buffers: &[PcmBuffer]) -> Result<PcmBuffer, DomainError> {
    let sample_rate = buffers
        .first()
        .map(PcmBuffer::sample_rate)
        .unwrap_or(DEFAULT_SAMPLE_RATE);
    if let Some(other) = buffers.iter().find(|b| b.sample_rate() != sample_rate) {
        return Err(DomainError::InvalidParameter(format!(
            "cannot join {} Hz audio onto {} Hz audio",
            other.sample_rate(),
            sample_rate
        )));
    }
    let total: usize = buffers.iter().map(PcmBuffer::len_bytes).sum();
    let mut bytes = Vec::with_capacity(total);
    for buffer in buffers {
        bytes.extend_from_slice(buffer.as_bytes());
    }
    Ok(with_bytes(bytes, sample_rate))
}

/// Copy out `[start, end)` seconds. An inverted range yields an empty buffer.
pub fn slice(buffer: &PcmBuffer, start: f64, end: f64) -> PcmBuffer {
    let (a, b) = range_offsets(buffer, start, end);
    if a >= b {
        return PcmBuffer::empty(buffer.sample_rate());
    }
    with_bytes(buffer.as_bytes()[a..b].to_vec(), buffer.sample_rate())
}

/// Keep only the selected range.
pub fn trim(buffer: &PcmBuffer, start: f64, end: f64) -> PcmBuffer {
    slice(buffer, start, end)
}

/// Remove the selected range and close the gap.
///
/// Uses the same offsets as [`trim`], so the two results always add up to
/// the original length.
pub fn cut(buffer: &PcmBuffer, start: f64, end: f64) -> PcmBuffer {
    let (a, b) = range_offsets(buffer, start, end);
    let b = b.max(a);
    let bytes = buffer.as_bytes();
    let mut out = Vec::with_capacity(bytes.len() - (b - a));
    out.extend_from_slice(&bytes[..a]);
    out.extend_from_slice(&bytes[b..]);
    with_bytes(out, buffer.sample_rate())
}

/// All-zero buffer of `floor(duration * sample_rate)` samples.
pub fn generate_silence(
    duration_secs: f64,
    sample_rate: u32,
    bits_per_sample: u16,
) -> Result<PcmBuffer, DomainError> {
    if !duration_secs.is_finite() || duration_secs < 0.0 {
        return Err(DomainError::InvalidParameter(format!(
            "silence duration must be a non-negative number, got {}",
            duration_secs
        )));
    }
    if bits_per_sample != BITS_PER_SAMPLE {
        return Err(DomainError::UnsupportedFormat(format!(
            "{}-bit silence",
            bits_per_sample
        )));
    }
    let samples = checked_sample_count(duration_secs * sample_rate as f64, "silence")?;
    Ok(PcmBuffer::from_samples(&vec![0; samples], sample_rate))
}

/// Splice silence in at a point in time.
pub fn insert_silence(
    buffer: &PcmBuffer,
    at_secs: f64,
    duration_secs: f64,
) -> Result<PcmBuffer, DomainError> {
    let silence = generate_silence(duration_secs, buffer.sample_rate(), BITS_PER_SAMPLE)?;
    let at = offset_in(buffer, at_secs);
    let bytes = buffer.as_bytes();
    let mut out = Vec::with_capacity(bytes.len() + silence.len_bytes());
    out.extend_from_slice(&bytes[..at]);
    out.extend_from_slice(silence.as_bytes());
    out.extend_from_slice(&bytes[at..]);
    Ok(with_bytes(out, buffer.sample_rate()))
}

/// Linear gain ramp over the whole buffer.
pub fn apply_fade(buffer: &PcmBuffer, direction: FadeDirection) -> PcmBuffer {
    let samples = buffer.samples();
    let n = samples.len();
    let faded: Vec<i16> = samples
        .iter()
        .enumerate()
        .map(|(i, &s)| {
            let ramp = if n > 1 {
                i as f64 / (n - 1) as f64
            } else {
                1.0
            };
            let gain = match direction {
                FadeDirection::In => ramp,
                FadeDirection::Out if n > 1 => 1.0 - ramp,
                FadeDirection::Out => 1.0,
            };
            (s as f64 * gain).round() as i16
        })
        .collect();
    PcmBuffer::from_samples(&faded, buffer.sample_rate())
}

/// Scale every sample, hard-clipping to the 16-bit range.
pub fn apply_gain(buffer: &PcmBuffer, factor: f64) -> Result<PcmBuffer, DomainError> {
    if !factor.is_finite() {
        return Err(DomainError::InvalidParameter(format!(
            "gain factor must be finite, got {}",
            factor
        )));
    }
    let scaled: Vec<i16> = buffer
        .samples()
        .iter()
        .map(|&s| clamp16(s as f64 * factor))
        .collect();
    Ok(PcmBuffer::from_samples(&scaled, buffer.sample_rate()))
}

/// Zero every sample quieter than `threshold * 32767`.
pub fn apply_noise_gate(buffer: &PcmBuffer, threshold: f64) -> Result<PcmBuffer, DomainError> {
    if !(0.0..=1.0).contains(&threshold) {
        return Err(DomainError::InvalidParameter(format!(
            "noise gate threshold must be within [0, 1], got {}",
            threshold
        )));
    }
    let floor = threshold * i16::MAX as f64;
    let gated: Vec<i16> = buffer
        .samples()
        .iter()
        .map(|&s| if (s as f64).abs() < floor { 0 } else { s })
        .collect();
    Ok(PcmBuffer::from_samples(&gated, buffer.sample_rate()))
}

/// Resample by linear interpolation; changes duration and pitch together.
pub fn change_speed(buffer: &PcmBuffer, speed: f64) -> Result<PcmBuffer, DomainError> {
    if !speed.is_finite() || speed <= 0.0 {
        return Err(DomainError::InvalidParameter(format!(
            "speed factor must be positive, got {}",
            speed
        )));
    }
    let samples = buffer.samples();
    if samples.is_empty() {
        return Ok(PcmBuffer::empty(buffer.sample_rate()));
    }

    let last = samples.len() - 1;
    let output_len = checked_sample_count(samples.len() as f64 / speed, "speed change")?;
    let mut output = Vec::with_capacity(output_len);

    for i in 0..output_len {
        let src_pos = i as f64 * speed;
        let src_idx = (src_pos.floor() as usize).min(last);
        let frac = src_pos - src_pos.floor();
        let s1 = samples[src_idx] as f64;
        let s2 = samples[(src_idx + 1).min(last)] as f64;
        output.push(clamp16(s1 + (s2 - s1) * frac));
    }

    Ok(PcmBuffer::from_samples(&output, buffer.sample_rate()))
}

/// Sample-rate conversion by linear interpolation.
pub fn resample(samples: &[i16], from_rate: u32, to_rate: u32) -> Vec<i16> {
    if from_rate == to_rate || samples.is_empty() || from_rate == 0 || to_rate == 0 {
        return samples.to_vec();
    }

    let ratio = from_rate as f64 / to_rate as f64;
    let output_len = (samples.len() as f64 / ratio).ceil() as usize;
    let mut output = Vec::with_capacity(output_len);

    for i in 0..output_len {
        let src_pos = i as f64 * ratio;
        let src_idx = src_pos.floor() as usize;
        let frac = src_pos.fract();

        let sample = if src_idx + 1 < samples.len() {
            let s0 = samples[src_idx] as f64;
            let s1 = samples[src_idx + 1] as f64;
            clamp16(s0 + (s1 - s0) * frac)
        } else if src_idx < samples.len() {
            samples[src_idx]
        } else {
            0
        };
        output.push(sample);
    }
    output
}

/// Run a transform over `[start, end)` only and splice the result back in.
pub fn apply_to_range<F>(
    buffer: &PcmBuffer,
    start: f64,
    end: f64,
    transform: F,
) -> Result<PcmBuffer, DomainError>
where
    F: FnOnce(&PcmBuffer) -> Result<PcmBuffer, DomainError>,
{
    let (a, b) = range_offsets(buffer, start, end);
    let b = b.max(a);
    let bytes = buffer.as_bytes();
    let region = with_bytes(bytes[a..b].to_vec(), buffer.sample_rate());
    let edited = transform(&region)?;

    let mut out = Vec::with_capacity(a + edited.len_bytes() + (bytes.len() - b));
    out.extend_from_slice(&bytes[..a]);
    out.extend_from_slice(edited.as_bytes());
    out.extend_from_slice(&bytes[b..]);
    Ok(with_bytes(out, buffer.sample_rate()))
}
