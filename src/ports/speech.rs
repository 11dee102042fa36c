use async_trait::async_trait;

use crate::domain::{DomainError, VoiceConfig};

/// Port for the external text-to-speech service.
///
/// Implementations return base64-encoded raw PCM (16-bit, mono, 24 kHz).
/// Rate limiting and retries are the implementation's concern.
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    async fn synthesize(&self, text: &str, voice: &VoiceConfig) -> Result<String, DomainError>;
}
