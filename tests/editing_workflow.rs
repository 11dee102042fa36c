use std::sync::Arc;

use async_trait::async_trait;
use podstudio::domain::pcm::DEFAULT_SAMPLE_RATE;
use podstudio::domain::{EditorConfig, SurfaceGeometry, Timeline, VoiceConfig};
use podstudio::engine::{codec, mixer, transform, waveform};
use podstudio::ports::SpeechSynthesizer;
use podstudio::{
    DomainError, EditorSession, EpisodeProducer, FadeDirection, PcmBuffer, ScriptLine, VoiceMap,
};

const RATE: u32 = DEFAULT_SAMPLE_RATE;

fn silent_session(seconds: f64) -> EditorSession {
    let buffer = transform::generate_silence(seconds, RATE, 16).unwrap();
    let mut session = EditorSession::new(buffer, Timeline::new(), EditorConfig::default());
    session.set_edit_mode(true);
    session
}

/// Speech stub: a 440-ish sawtooth, one second per word.
struct ToneSpeech;

#[async_trait]
impl SpeechSynthesizer for ToneSpeech {
    async fn synthesize(&self, text: &str, _voice: &VoiceConfig) -> Result<String, DomainError> {
        let words = text.split_whitespace().count();
        let samples: Vec<i16> = (0..words * RATE as usize)
            .map(|i| ((i % 55) as i16 - 27) * 600)
            .collect();
        Ok(codec::encode_pcm(&PcmBuffer::from_samples(&samples, RATE)))
    }
}

#[test]
fn test_trim_and_cut_on_four_seconds_of_silence() {
    let mut trimmed = silent_session(4.0);
    trimmed.select(1.0, 2.0);
    trimmed.trim().unwrap();
    assert_eq!(trimmed.buffer().len_bytes(), 48_000);

    let mut cut = silent_session(4.0);
    cut.select(1.0, 2.0);
    cut.cut().unwrap();
    assert_eq!(cut.buffer().len_bytes(), 144_000);
}

#[test]
fn test_cut_removes_exactly_what_trim_keeps() {
    let samples: Vec<i16> = (0..37_501).map(|i| (i % 300) as i16).collect();
    let buffer = PcmBuffer::from_samples(&samples, RATE);
    let duration = buffer.duration_secs();

    for (s, e) in [(0.0, 0.5), (0.3333, 0.7777), (1.0, duration), (0.123, 0.123)] {
        let kept = transform::trim(&buffer, s, e);
        let rest = transform::cut(&buffer, s, e);
        let joined = transform::concatenate(&[rest, kept]).unwrap();
        assert_eq!(joined.len_bytes(), buffer.len_bytes());
    }
}

#[test]
fn test_drag_backwards_over_zoomed_surface() {
    let mut session = silent_session(10.0);
    // Zoomed 4x and scrolled one viewport to the right.
    let geometry = SurfaceGeometry {
        left: 50.0,
        scroll_left: 1000.0,
        rendered_width: 4000.0,
    };

    session.pointer_down_at(1050.0, &geometry); // 5.0s
    session.pointer_move_at(850.0, &geometry); // 4.5s
    session.pointer_move_at(850.0 - 200.0, &geometry); // 4.0s
    let selection = session.pointer_up().unwrap();

    assert!((selection.start - 4.0).abs() < 1e-9);
    assert!((selection.end - 5.0).abs() < 1e-9);
}

#[test]
fn test_undo_walks_back_through_edits() {
    let mut session = silent_session(3.0);
    let original = session.buffer().clone();

    session.select(0.5, 1.5);
    session.fade(FadeDirection::In).unwrap();
    let after_fade = session.buffer().clone();

    session.select(0.0, 1.0);
    session.cut().unwrap();
    session.insert_silence(0.25).unwrap();
    assert_eq!(session.history().len(), 3);

    assert!(session.undo());
    assert!(session.undo());
    assert_eq!(session.buffer(), &after_fade);
    assert!(session.undo());
    assert_eq!(session.buffer(), &original);
    assert!(!session.undo());
}

#[test]
fn test_background_bed_loops_under_voice() {
    let voice = PcmBuffer::from_samples(&vec![1000; 10], RATE);
    let bed = PcmBuffer::from_samples(&[400, -400, 200], RATE);
    let mixed = mixer::mix(&voice, &bed, 0.5).unwrap().samples();

    assert_eq!(mixed.len(), 10);
    assert_eq!(mixed[3], 1000 + 200);
    assert_eq!(mixed[4], 1000 - 200);
}

#[tokio::test]
async fn test_produce_edit_and_export_episode() {
    let producer = EpisodeProducer::new(Arc::new(ToneSpeech), RATE);
    let voices = VoiceMap::new()
        .with_voice("Host", "Kore")
        .with_voice("Guest", "Puck");
    let lines = vec![
        ScriptLine::new("Host", "welcome back everyone"),
        ScriptLine::new("Guest", "hold on").interrupting(),
        ScriptLine::new("Host", "sure"),
    ];

    let episode = producer.produce(&lines, &voices).await.unwrap();
    assert_eq!(episode.timings.len(), 3);
    assert_eq!(episode.timings[0].duration, 2.75);
    assert_eq!(episode.timings[2].start_time, 4.75);

    let mut session =
        EditorSession::from_episode(&episode, RATE, EditorConfig::default()).unwrap();
    assert_eq!(session.timeline().line_at(3.0).map(|t| t.line_index), Some(1));

    let envelope = waveform::analyze(session.buffer(), 100);
    assert_eq!(envelope.len(), 100);
    let peak = envelope.iter().fold(0.0_f32, |acc, v| acc.max(v.abs()));
    assert!((peak - 1.0).abs() < 1e-6);

    session.set_edit_mode(true);
    session.select(0.0, 0.75);
    session.cut().unwrap();
    assert!(session.timeline().is_stale());

    let wav = session.export_wav();
    let restored = codec::unwrap_wav_pcm(&wav).unwrap();
    assert_eq!(&restored, session.buffer());
    assert_eq!(restored.duration_secs(), 5.0);
}
