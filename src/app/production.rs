use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::domain::{
    DomainError, PcmBuffer, ScriptLine, ScriptTiming, Timeline, VoiceMap,
    INTERRUPTION_OVERLAP_SECONDS,
};
use crate::engine::{codec, transform};
use crate::ports::SpeechSynthesizer;

/// Episode audio as handed to the episode store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EpisodeAudio {
    pub pcm_base64: String,
    pub timings: Vec<ScriptTiming>,
    /// Set once the audio has been edited after the timings were recorded.
    #[serde(default)]
    pub timings_stale: bool,
}

/// Drop the tail overlap from a line the next speaker cuts into.
///
/// Chunks no longer than the overlap are left alone.
pub fn truncate_for_interruption(chunk: &PcmBuffer) -> PcmBuffer {
    let duration = chunk.duration_secs();
    if duration <= INTERRUPTION_OVERLAP_SECONDS {
        return chunk.clone();
    }
    transform::slice(chunk, 0.0, duration - INTERRUPTION_OVERLAP_SECONDS)
}

/// Join per-line chunks into one buffer and record where each line lands.
///
/// `chunks[i]` belongs to `lines[i]`.
pub fn assemble(
    lines: &[ScriptLine],
    chunks: &[PcmBuffer],
    sample_rate: u32,
) -> Result<(PcmBuffer, Timeline), DomainError> {
    if lines.len() != chunks.len() {
        return Err(DomainError::InvalidParameter(format!(
            "{} script lines but {} audio chunks",
            lines.len(),
            chunks.len()
        )));
    }

    let mut timeline = Timeline::new();
    let mut parts = Vec::with_capacity(chunks.len());

    for (index, chunk) in chunks.iter().enumerate() {
        let interrupted = lines.get(index + 1).is_some_and(|next| next.interruption);
        let part = if interrupted {
            truncate_for_interruption(chunk)
        } else {
            chunk.clone()
        };
        timeline.append(index, part.duration_secs());
        parts.push(part);
    }

    let audio = if parts.is_empty() {
        PcmBuffer::empty(sample_rate)
    } else {
        transform::concatenate(&parts)?
    };
    Ok((audio, timeline))
}

/// Drives the speech service line by line and assembles the episode audio.
pub struct EpisodeProducer {
    synthesizer: Arc<dyn SpeechSynthesizer>,
    sample_rate: u32,
}

impl EpisodeProducer {
    pub fn new(synthesizer: Arc<dyn SpeechSynthesizer>, sample_rate: u32) -> Self {
        Self {
            synthesizer,
            sample_rate,
        }
    }

    /// Synthesize every line in order and build the episode.
    ///
    /// All speakers are resolved before the first request, so an unmapped
    /// speaker fails fast without spending any synthesis calls.
    pub async fn produce(
        &self,
        lines: &[ScriptLine],
        voices: &VoiceMap,
    ) -> Result<EpisodeAudio, DomainError> {
        let resolved = lines
            .iter()
            .map(|line| voices.voice_for(&line.speaker))
            .collect::<Result<Vec<_>, _>>()?;

        info!(lines = lines.len(), speakers = voices.len(), "Producing episode audio");

        let mut chunks = Vec::with_capacity(lines.len());
        for (index, (line, voice)) in lines.iter().zip(resolved).enumerate() {
            let encoded = self.synthesizer.synthesize(&line.text, voice).await?;
            let chunk = codec::decode_pcm(&encoded, self.sample_rate)?;
            if chunk.is_empty() {
                warn!(line = index, speaker = %line.speaker, "Speech service returned no audio");
            }
            info!(
                line = index,
                speaker = %line.speaker,
                voice = %voice.voice_name,
                duration_secs = chunk.duration_secs(),
                "Line synthesized"
            );
            chunks.push(chunk);
        }

        let (audio, timeline) = assemble(lines, &chunks, self.sample_rate)?;

        info!(
            duration_secs = audio.duration_secs(),
            lines = timeline.len(),
            "Episode audio assembled"
        );

        Ok(EpisodeAudio {
            pcm_base64: codec::encode_pcm(&audio),
            timings: timeline.timings().to_vec(),
            timings_stale: false,
        })
    }
}
