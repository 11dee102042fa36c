use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;

use crate::adapters::{TomlConfigStore, WavFileDecoder};
use crate::app::production::EpisodeAudio;
use crate::app::session::EditorSession;
use crate::domain::{AppConfig, DomainError, PcmBuffer, Timeline};
use crate::infrastructure::init_logging;
use crate::ports::{AudioDecoder, ConfigStore};

/// Application controller that orchestrates initialization and owns the editing session.
pub struct AppController {
    config: RwLock<AppConfig>,
    config_store: Arc<dyn ConfigStore>,
    decoder: Arc<dyn AudioDecoder>,
    session: RwLock<Option<EditorSession>>,
    _log_guard: Option<WorkerGuard>,
}

impl AppController {
    /// Initialize the application controller.
    /// This sets up configuration, logging, and the audio importer.
    pub fn new() -> Result<Self, DomainError> {
        // Step 1: Initialize config store
        let config_store = Arc::new(TomlConfigStore::new()?);

        // Step 2: Load configuration
        let config = config_store.load()?;
        config.validate()?;

        // Step 3: Initialize logging
        let log_guard = init_logging(&config_store.logs_dir(), &config.logging)?;

        info!("PodStudio starting up");

        let mut controller = Self::from_parts(config_store, config);
        controller._log_guard = log_guard;
        Ok(controller)
    }

    /// Build a controller over an existing store without touching global logging.
    pub fn with_store(config_store: Arc<dyn ConfigStore>) -> Result<Self, DomainError> {
        let config = config_store.load()?;
        config.validate()?;
        Ok(Self::from_parts(config_store, config))
    }

    fn from_parts(config_store: Arc<dyn ConfigStore>, config: AppConfig) -> Self {
        let decoder = Arc::new(WavFileDecoder::new(config.audio.sample_rate));

        info!(
            sample_rate = config.audio.sample_rate,
            "AppController initialized"
        );

        Self {
            config: RwLock::new(config),
            config_store,
            decoder,
            session: RwLock::new(None),
            _log_guard: None,
        }
    }

    /// Get the current configuration.
    pub fn config(&self) -> AppConfig {
        self.config.read().clone()
    }

    /// Update the configuration.
    pub fn update_config(&self, config: AppConfig) -> Result<(), DomainError> {
        config.validate()?;
        self.config_store.save(&config)?;
        *self.config.write() = config;

        info!("Configuration updated");
        Ok(())
    }

    // ==================== Session ====================

    /// Open a persisted episode for editing, replacing any open session.
    pub fn open_episode(&self, episode: &EpisodeAudio) -> Result<(), DomainError> {
        let config = self.config();
        let session = EditorSession::from_episode(episode, config.audio.sample_rate, config.editor)?;
        *self.session.write() = Some(session);
        Ok(())
    }

    /// Open a bare buffer (no line timings) for editing.
    pub fn open_buffer(&self, buffer: PcmBuffer) {
        let session = EditorSession::new(buffer, Timeline::new(), self.config().editor);
        *self.session.write() = Some(session);
    }

    /// Decode an uploaded or recorded file and open it for editing.
    ///
    /// The previous session stays open if decoding fails.
    pub async fn import_audio(&self, path: &Path) -> Result<(), DomainError> {
        let buffer = self.decoder.decode_file(path).await?;
        info!(path = ?path, duration_secs = buffer.duration_secs(), "Audio imported");
        self.open_buffer(buffer);
        Ok(())
    }

    pub fn has_session(&self) -> bool {
        self.session.read().is_some()
    }

    pub fn close_session(&self) {
        *self.session.write() = None;
    }

    /// Run a command against the open session. Edits are serialized by the lock.
    pub fn with_session<R>(
        &self,
        f: impl FnOnce(&mut EditorSession) -> Result<R, DomainError>,
    ) -> Result<R, DomainError> {
        let mut guard = self.session.write();
        let session = guard.as_mut().ok_or(DomainError::NoSession)?;
        f(session)
    }

    /// Mix a background track under the open episode at the configured volume.
    pub fn mix_background(&self, background: &PcmBuffer) -> Result<(), DomainError> {
        let volume = self.config.read().mixer.background_volume;
        self.with_session(|session| session.mix_background(background, volume))
    }

    /// Write the current audio as a WAV file into the exports directory.
    pub fn export_wav(&self, file_name: &str) -> Result<PathBuf, DomainError> {
        let wav = self.with_session(|session| Ok(session.export_wav()))?;
        let dir = self.config_store.exports_dir();
        fs::create_dir_all(&dir)?;
        let path = dir.join(file_name);
        fs::write(&path, wav)?;
        info!(path = ?path, "Exported WAV");
        Ok(path)
    }

    /// Get the data directory path.
    pub fn data_dir(&self) -> String {
        self.config_store.data_dir().to_string_lossy().to_string()
    }

    /// Get the logs directory path.
    pub fn logs_dir(&self) -> String {
        self.config_store.logs_dir().to_string_lossy().to_string()
    }

    /// Get the config file path.
    pub fn config_path(&self) -> String {
        self.config_store.config_path().to_string_lossy().to_string()
    }
}
