pub mod codec;
pub mod mixer;
pub mod transform;
pub mod waveform;

pub use codec::WavHeader;
pub use transform::FadeDirection;
