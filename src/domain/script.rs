use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

/// One line of a generated dialogue script.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptLine {
    pub speaker: String,
    pub text: String,
    /// The line cuts into the previous speaker.
    #[serde(default)]
    pub interruption: bool,
}

impl ScriptLine {
    pub fn new(speaker: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            speaker: speaker.into(),
            text: text.into(),
            interruption: false,
        }
    }

    pub fn interrupting(mut self) -> Self {
        self.interruption = true;
        self
    }
}

/// Voice settings passed to the speech collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoiceConfig {
    pub voice_name: String,
}

/// Speaker name to voice, built once per generation request.
#[derive(Debug, Clone, Default)]
pub struct VoiceMap {
    voices: HashMap<String, VoiceConfig>,
}

impl VoiceMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_voice(mut self, speaker: impl Into<String>, voice_name: impl Into<String>) -> Self {
        self.voices.insert(
            speaker.into(),
            VoiceConfig {
                voice_name: voice_name.into(),
            },
        );
        self
    }

    pub fn voice_for(&self, speaker: &str) -> Result<&VoiceConfig, DomainError> {
        self.voices
            .get(speaker)
            .ok_or_else(|| DomainError::UnknownSpeaker(speaker.to_string()))
    }

    pub fn len(&self) -> usize {
        self.voices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.voices.is_empty()
    }
}

impl FromIterator<(String, VoiceConfig)> for VoiceMap {
    fn from_iter<T: IntoIterator<Item = (String, VoiceConfig)>>(iter: T) -> Self {
        Self {
            voices: iter.into_iter().collect(),
        }
    }
}
