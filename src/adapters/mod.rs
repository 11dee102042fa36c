pub mod config_store;
pub mod wav_decoder;

pub use config_store::TomlConfigStore;
pub use wav_decoder::WavFileDecoder;
