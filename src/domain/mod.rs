pub mod config;
pub mod error;
pub mod history;
pub mod pcm;
pub mod script;
pub mod selection;
pub mod timing;

pub use config::{AppConfig, AudioFormatConfig, EditorConfig, LoggingConfig, MixerConfig};
pub use error::DomainError;
pub use history::EditHistory;
pub use pcm::PcmBuffer;
pub use script::{ScriptLine, VoiceConfig, VoiceMap};
pub use selection::{
    pointer_to_time, PointerOutcome, Selection, SelectionModel, SelectionState, SurfaceGeometry,
};
pub use timing::{ScriptTiming, Timeline, INTERRUPTION_OVERLAP_SECONDS};
