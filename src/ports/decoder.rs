use std::path::Path;

use async_trait::async_trait;

use crate::domain::{DomainError, PcmBuffer};

/// Port for converting uploaded or recorded audio into the canonical format.
///
/// Conversion is one-shot and cannot be cancelled; the editor stays disabled
/// until it resolves.
#[async_trait]
pub trait AudioDecoder: Send + Sync {
    /// Decode an in-memory file to mono 16-bit PCM at the pipeline rate.
    ///
    /// Returns `UnsupportedFormat` when the data cannot be decoded.
    async fn decode_bytes(&self, bytes: &[u8]) -> Result<PcmBuffer, DomainError>;

    /// Read and decode a file from disk.
    async fn decode_file(&self, path: &Path) -> Result<PcmBuffer, DomainError>;
}
