pub mod controller;
pub mod production;
pub mod session;

pub use controller::AppController;
pub use production::{assemble, truncate_for_interruption, EpisodeAudio, EpisodeProducer};
pub use session::EditorSession;
