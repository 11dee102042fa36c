use tracing::{debug, info};

use crate::domain::{
    pointer_to_time, DomainError, EditHistory, EditorConfig, PcmBuffer, PointerOutcome,
    ScriptTiming, Selection, SelectionModel, SurfaceGeometry, Timeline,
};
use crate::engine::transform::{self, FadeDirection};
use crate::engine::{codec, mixer, waveform};

use super::production::EpisodeAudio;

/// One editing session over the episode audio.
///
/// Owns the current buffer, its undo history, the selection and the line
/// timings. Every destructive command snapshots the buffer first, commits a
/// new buffer only if the transform succeeded, marks the timings stale and
/// clears the selection.
#[derive(Debug, Clone)]
pub struct EditorSession {
    buffer: PcmBuffer,
    history: EditHistory,
    selection: SelectionModel,
    timeline: Timeline,
    editor: EditorConfig,
    edit_mode: bool,
    playhead: f64,
}

impl EditorSession {
    pub fn new(buffer: PcmBuffer, timeline: Timeline, editor: EditorConfig) -> Self {
        info!(
            duration_secs = buffer.duration_secs(),
            lines = timeline.len(),
            "Editing session opened"
        );
        Self {
            buffer,
            history: EditHistory::new(),
            selection: SelectionModel::new(),
            timeline,
            editor,
            edit_mode: false,
            playhead: 0.0,
        }
    }

    /// Open a persisted episode (base64 PCM plus its line timings).
    pub fn from_episode(
        episode: &EpisodeAudio,
        sample_rate: u32,
        editor: EditorConfig,
    ) -> Result<Self, DomainError> {
        let buffer = codec::decode_pcm(&episode.pcm_base64, sample_rate)?;
        let mut timeline = Timeline::from_timings(episode.timings.clone());
        if episode.timings_stale {
            timeline.mark_stale();
        }
        Ok(Self::new(buffer, timeline, editor))
    }

    pub fn buffer(&self) -> &PcmBuffer {
        &self.buffer
    }

    pub fn history(&self) -> &EditHistory {
        &self.history
    }

    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    pub fn timings(&self) -> &[ScriptTiming] {
        self.timeline.timings()
    }

    pub fn duration(&self) -> f64 {
        self.buffer.duration_secs()
    }

    pub fn playhead(&self) -> f64 {
        self.playhead
    }

    pub fn seek(&mut self, time: f64) {
        self.playhead = time.clamp(0.0, self.duration());
    }

    pub fn edit_mode(&self) -> bool {
        self.edit_mode
    }

    /// Toggle between selecting (edit mode) and seeking on pointer-down.
    pub fn set_edit_mode(&mut self, enabled: bool) {
        self.edit_mode = enabled;
        if !enabled {
            self.selection.clear();
        }
    }

    // ==================== Selection ====================

    pub fn selection(&self) -> Option<Selection> {
        self.selection.selection()
    }

    /// The selection destructive commands would act on.
    ///
    /// A range that snaps to zero whole samples does not count.
    pub fn active_selection(&self) -> Option<Selection> {
        self.selection
            .active()
            .map(|s| s.clamped(self.duration()))
            .filter(|s| {
                let (a, b) = transform::range_offsets(&self.buffer, s.start, s.end);
                a < b
            })
    }

    pub fn pointer_down(&mut self, time: f64) -> PointerOutcome {
        let time = time.clamp(0.0, self.duration());
        let outcome = self.selection.pointer_down(time, self.edit_mode);
        if let PointerOutcome::Seek(at) = outcome {
            self.playhead = at;
        }
        outcome
    }

    pub fn pointer_move(&mut self, time: f64) {
        self.selection.pointer_move(time.clamp(0.0, self.duration()));
    }

    pub fn pointer_up(&mut self) -> Option<Selection> {
        self.selection.pointer_up();
        self.active_selection()
    }

    pub fn pointer_down_at(&mut self, client_x: f64, geometry: &SurfaceGeometry) -> PointerOutcome {
        let time = pointer_to_time(client_x, geometry, self.duration());
        self.pointer_down(time)
    }

    pub fn pointer_move_at(&mut self, client_x: f64, geometry: &SurfaceGeometry) {
        let time = pointer_to_time(client_x, geometry, self.duration());
        self.pointer_move(time);
    }

    /// Set the selection directly, e.g. from numeric start/end inputs.
    pub fn select(&mut self, start: f64, end: f64) {
        self.selection.set(Selection::new(start, end));
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    fn require_selection(&self) -> Result<Selection, DomainError> {
        self.active_selection().ok_or(DomainError::EmptySelection)
    }

    // ==================== Edits ====================

    fn commit(&mut self, edit: &'static str, edited: PcmBuffer) {
        let before = std::mem::replace(&mut self.buffer, edited);
        debug!(
            edit,
            before_bytes = before.len_bytes(),
            after_bytes = self.buffer.len_bytes(),
            history = self.history.len() + 1,
            "Committed edit"
        );
        self.history.push(before);
        self.timeline.mark_stale();
        self.selection.clear();
        self.playhead = self.playhead.min(self.duration());
    }

    /// Keep only the selection.
    pub fn trim(&mut self) -> Result<(), DomainError> {
        let range = self.require_selection()?;
        let edited = transform::trim(&self.buffer, range.start, range.end);
        self.commit("trim", edited);
        Ok(())
    }

    /// Remove the selection.
    pub fn cut(&mut self) -> Result<(), DomainError> {
        let range = self.require_selection()?;
        let edited = transform::cut(&self.buffer, range.start, range.end);
        self.commit("cut", edited);
        Ok(())
    }

    /// Replace the selection with silence of the same length.
    pub fn silence_selection(&mut self) -> Result<(), DomainError> {
        let range = self.require_selection()?;
        let edited = transform::apply_to_range(&self.buffer, range.start, range.end, |region| {
            transform::apply_gain(region, 0.0)
        })?;
        self.commit("silence", edited);
        Ok(())
    }

    /// Insert silence at the selection start, or at the playhead if nothing is selected.
    pub fn insert_silence(&mut self, duration_secs: f64) -> Result<(), DomainError> {
        let at = self
            .active_selection()
            .map(|s| s.start)
            .unwrap_or(self.playhead);
        let edited = transform::insert_silence(&self.buffer, at, duration_secs)?;
        self.commit("insert_silence", edited);
        Ok(())
    }

    pub fn fade(&mut self, direction: FadeDirection) -> Result<(), DomainError> {
        let range = self.require_selection()?;
        let edited = transform::apply_to_range(&self.buffer, range.start, range.end, |region| {
            Ok(transform::apply_fade(region, direction))
        })?;
        self.commit("fade", edited);
        Ok(())
    }

    pub fn gain(&mut self, factor: f64) -> Result<(), DomainError> {
        let range = self.require_selection()?;
        let edited = transform::apply_to_range(&self.buffer, range.start, range.end, |region| {
            transform::apply_gain(region, factor)
        })?;
        self.commit("gain", edited);
        Ok(())
    }

    pub fn noise_gate(&mut self, threshold: f64) -> Result<(), DomainError> {
        let range = self.require_selection()?;
        let edited = transform::apply_to_range(&self.buffer, range.start, range.end, |region| {
            transform::apply_noise_gate(region, threshold)
        })?;
        self.commit("noise_gate", edited);
        Ok(())
    }

    /// Insert the configured default length of silence.
    pub fn insert_silence_default(&mut self) -> Result<(), DomainError> {
        self.insert_silence(self.editor.default_silence_secs)
    }

    /// Noise gate with the configured default threshold.
    pub fn noise_gate_default(&mut self) -> Result<(), DomainError> {
        self.noise_gate(self.editor.default_noise_gate_threshold)
    }

    pub fn change_speed(&mut self, speed: f64) -> Result<(), DomainError> {
        let range = self.require_selection()?;
        let edited = transform::apply_to_range(&self.buffer, range.start, range.end, |region| {
            transform::change_speed(region, speed)
        })?;
        self.commit("speed", edited);
        Ok(())
    }

    /// Lay a looping background track under the whole episode.
    pub fn mix_background(
        &mut self,
        background: &PcmBuffer,
        volume: f32,
    ) -> Result<(), DomainError> {
        let edited = mixer::mix(&self.buffer, background, volume)?;
        self.commit("mix_background", edited);
        Ok(())
    }

    /// Restore the buffer from before the last edit. Returns false if there is nothing to undo.
    pub fn undo(&mut self) -> bool {
        match self.history.undo() {
            Some(previous) => {
                self.buffer = previous;
                self.selection.clear();
                self.playhead = self.playhead.min(self.duration());
                debug!(remaining = self.history.len(), "Undo");
                true
            }
            None => false,
        }
    }

    // ==================== Rendering & export ====================

    /// Envelope values for the waveform at a zoom factor.
    pub fn waveform(&self, zoom: f64) -> Vec<f32> {
        waveform::analyze(&self.buffer, self.editor.bucket_count(zoom))
    }

    pub fn export_wav(&self) -> Vec<u8> {
        codec::buffer_to_wav(&self.buffer)
    }

    pub fn export_base64(&self) -> String {
        codec::encode_pcm(&self.buffer)
    }

    /// Payload for the episode store: current audio and its timings.
    pub fn to_episode(&self) -> EpisodeAudio {
        EpisodeAudio {
            pcm_base64: self.export_base64(),
            timings: self.timeline.timings().to_vec(),
            timings_stale: self.timeline.is_stale(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::pcm::DEFAULT_SAMPLE_RATE;

    fn session_with(samples: &[i16]) -> EditorSession {
        let mut timeline = Timeline::new();
        let buffer = PcmBuffer::from_samples(samples, DEFAULT_SAMPLE_RATE);
        timeline.append(0, buffer.duration_secs());
        let mut session = EditorSession::new(buffer, timeline, EditorConfig::default());
        session.set_edit_mode(true);
        session
    }

    fn silent(seconds: usize) -> EditorSession {
        session_with(&vec![0i16; seconds * DEFAULT_SAMPLE_RATE as usize])
    }

    #[test]
    fn test_trim_and_cut_lengths() {
        let mut trimmed = silent(4);
        trimmed.select(1.0, 2.0);
        trimmed.trim().unwrap();
        assert_eq!(trimmed.buffer().len_bytes(), 48_000);

        let mut cut = silent(4);
        cut.select(1.0, 2.0);
        cut.cut().unwrap();
        assert_eq!(cut.buffer().len_bytes(), 144_000);
    }

    #[test]
    fn test_edit_requires_selection() {
        let mut session = silent(1);
        assert!(matches!(session.cut(), Err(DomainError::EmptySelection)));

        session.pointer_down(0.5);
        session.pointer_up();
        assert!(matches!(session.trim(), Err(DomainError::EmptySelection)));
        assert!(matches!(
            session.fade(FadeDirection::In),
            Err(DomainError::EmptySelection)
        ));
        assert!(session.history().is_empty());
        assert!(!session.timeline().is_stale());
    }

    #[test]
    fn test_sub_sample_selection_is_not_applied() {
        let mut session = silent(2);
        session.select(1.0, 1.00001);
        assert!(session.active_selection().is_none());
        assert!(matches!(session.trim(), Err(DomainError::EmptySelection)));
        assert!(matches!(session.cut(), Err(DomainError::EmptySelection)));
        assert_eq!(session.buffer().len_bytes(), 96_000);
        assert!(session.history().is_empty());
    }

    #[test]
    fn test_edit_pushes_history_and_stales_timings() {
        let mut session = silent(2);
        let original = session.buffer().clone();

        session.select(0.5, 1.0);
        session.cut().unwrap();

        assert_eq!(session.history().len(), 1);
        assert!(session.timeline().is_stale());
        assert!(session.selection().is_none());

        assert!(session.undo());
        assert_eq!(session.buffer(), &original);
        assert!(!session.undo());
    }

    #[test]
    fn test_failed_transform_is_not_committed() {
        let mut session = silent(1);
        session.select(0.1, 0.2);
        assert!(session.change_speed(0.0).is_err());
        assert!(session.history().is_empty());
        assert!(session.active_selection().is_some());
    }

    #[test]
    fn test_drag_selection_then_gain_only_touches_range() {
        let mut session = session_with(&[1000; 8]);
        let geometry = SurfaceGeometry {
            left: 0.0,
            scroll_left: 0.0,
            rendered_width: 8.0,
        };
        // 8 samples over 8 pixels: one pixel per sample. Points sit mid-sample.
        session.pointer_down_at(6.5, &geometry);
        session.pointer_move_at(2.5, &geometry);
        let selection = session.pointer_up().unwrap();
        assert!(selection.start < selection.end);

        session.gain(2.0).unwrap();
        assert_eq!(
            session.buffer().samples(),
            vec![1000, 1000, 2000, 2000, 2000, 2000, 1000, 1000]
        );
    }

    #[test]
    fn test_pointer_down_seeks_outside_edit_mode() {
        let mut session = silent(4);
        session.set_edit_mode(false);
        assert_eq!(session.pointer_down(2.5), PointerOutcome::Seek(2.5));
        assert_eq!(session.playhead(), 2.5);
        assert!(session.selection().is_none());

        assert_eq!(session.pointer_down(99.0), PointerOutcome::Seek(4.0));
    }

    #[test]
    fn test_selection_clamped_to_duration() {
        let mut session = silent(2);
        session.select(1.0, 50.0);
        assert_eq!(
            session.active_selection(),
            Some(Selection { start: 1.0, end: 2.0 })
        );
        session.trim().unwrap();
        assert_eq!(session.buffer().len_bytes(), 48_000);
    }

    #[test]
    fn test_silence_selection_keeps_length() {
        let mut session = session_with(&[500; 4]);
        let step = 1.0 / DEFAULT_SAMPLE_RATE as f64;
        session.select(1.5 * step, 3.5 * step);
        session.silence_selection().unwrap();
        assert_eq!(session.buffer().samples(), vec![500, 0, 0, 500]);
    }

    #[test]
    fn test_insert_silence_at_playhead() {
        let mut session = silent(1);
        session.set_edit_mode(false);
        session.pointer_down(0.5);
        session.insert_silence(0.5).unwrap();
        assert_eq!(session.buffer().len_bytes(), 72_000);
        assert_eq!(session.history().len(), 1);
    }

    #[test]
    fn test_insert_default_silence() {
        let mut session = silent(1);
        session.set_edit_mode(false);
        session.insert_silence_default().unwrap();
        assert_eq!(session.buffer().len_bytes(), 96_000);
    }

    #[test]
    fn test_fade_out_selection() {
        let mut session = session_with(&[800; 10]);
        let step = 1.0 / DEFAULT_SAMPLE_RATE as f64;
        session.select(5.5 * step, 1.0);
        session.fade(FadeDirection::Out).unwrap();
        let samples = session.buffer().samples();
        assert_eq!(&samples[..5], &[800; 5]);
        assert_eq!(samples[5], 800);
        assert_eq!(samples[9], 0);
    }

    #[test]
    fn test_mix_background_does_not_need_selection() {
        let mut session = session_with(&[0; 4]);
        let bed = PcmBuffer::from_samples(&[100], DEFAULT_SAMPLE_RATE);
        session.mix_background(&bed, 0.5).unwrap();
        assert_eq!(session.buffer().samples(), vec![50; 4]);
    }

    #[test]
    fn test_waveform_follows_zoom() {
        let session = session_with(&[100; 10_000]);
        assert_eq!(session.waveform(1.0).len(), 200);
        assert_eq!(session.waveform(2.0).len(), 400);
    }

    #[test]
    fn test_export_roundtrips() {
        let session = session_with(&[1, 2, 3]);
        let wav = session.export_wav();
        assert_eq!(codec::unwrap_wav_pcm(&wav).unwrap(), *session.buffer());

        let episode = session.to_episode();
        let reopened =
            EditorSession::from_episode(&episode, DEFAULT_SAMPLE_RATE, EditorConfig::default())
                .unwrap();
        assert_eq!(reopened.buffer(), session.buffer());
        assert_eq!(reopened.timings(), session.timings());
        assert!(!reopened.timeline().is_stale());
    }

    #[test]
    fn test_stale_timings_survive_reopen() {
        let mut session = silent(2);
        session.select(0.0, 1.0);
        session.cut().unwrap();

        let episode = session.to_episode();
        assert!(episode.timings_stale);
        let reopened =
            EditorSession::from_episode(&episode, DEFAULT_SAMPLE_RATE, EditorConfig::default())
                .unwrap();
        assert!(reopened.timeline().is_stale());
        assert!(reopened.timeline().line_at(1.5).is_none());
    }

    #[test]
    fn test_waveform_with_inverted_zoom_bounds() {
        let editor = EditorConfig {
            min_zoom: 10.0,
            max_zoom: 2.0,
            ..EditorConfig::default()
        };
        let session = EditorSession::new(
            PcmBuffer::from_samples(&[100; 10_000], DEFAULT_SAMPLE_RATE),
            Timeline::new(),
            editor,
        );
        assert_eq!(session.waveform(1.0).len(), 2000);
    }
}
