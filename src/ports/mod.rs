pub mod config;
pub mod decoder;
pub mod speech;

pub use config::ConfigStore;
pub use decoder::AudioDecoder;
pub use speech::SpeechSynthesizer;
