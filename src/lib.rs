//! PodStudio: sample-accurate editing and mixing of AI-generated podcast audio.
//!
//! The engine works on raw mono 16-bit PCM at 24 kHz as produced by the speech
//! service. Episode audio is assembled from per-line chunks, rendered as a
//! waveform envelope, edited through a selection-driven session with
//! whole-buffer undo, and re-encoded as base64 or WAV.

#![forbid(unsafe_code)]

pub mod adapters;
pub mod app;
pub mod domain;
pub mod engine;
pub mod infrastructure;
pub mod ports;

pub use app::{AppController, EditorSession, EpisodeAudio, EpisodeProducer};
pub use domain::{
    AppConfig, DomainError, EditHistory, PcmBuffer, ScriptLine, ScriptTiming, Selection,
    SelectionModel, VoiceMap,
};
pub use engine::FadeDirection;
