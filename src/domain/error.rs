use thiserror::Error;

/// Domain-level errors for PodStudio.
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Failed to process audio: {0}")]
    Decode(String),

    #[error("No active selection")]
    EmptySelection,

    #[error("Unsupported format or corrupt file: {0}")]
    UnsupportedFormat(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("No voice configured for speaker: {0}")]
    UnknownSpeaker(String),

    #[error("Speech synthesis failed: {0}")]
    Synthesis(String),

    #[error("No editing session is open")]
    NoSession,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("IO error: {0}")]
    Io(String),
}

impl From<std::io::Error> for DomainError {
    fn from(err: std::io::Error) -> Self {
        DomainError::Io(err.to_string())
    }
}

impl From<toml::de::Error> for DomainError {
    fn from(err: toml::de::Error) -> Self {
        DomainError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for DomainError {
    fn from(err: toml::ser::Error) -> Self {
        DomainError::Serialization(err.to_string())
    }
}

impl From<serde_json::Error> for DomainError {
    fn from(err: serde_json::Error) -> Self {
        DomainError::Serialization(err.to_string())
    }
}

impl From<base64::DecodeError> for DomainError {
    fn from(err: base64::DecodeError) -> Self {
        DomainError::Decode(err.to_string())
    }
}

impl From<hound::Error> for DomainError {
    fn from(err: hound::Error) -> Self {
        match err {
            hound::Error::IoError(e) => DomainError::Io(e.to_string()),
            other => DomainError::UnsupportedFormat(other.to_string()),
        }
    }
}
