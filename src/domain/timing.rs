use serde::{Deserialize, Serialize};

/// Seconds trimmed from the end of a line when the next line interrupts it.
pub const INTERRUPTION_OVERLAP_SECONDS: f64 = 0.25;

/// Placement of one script line inside the episode audio.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScriptTiming {
    pub line_index: usize,
    /// Offset from the start of the episode, in seconds.
    pub start_time: f64,
    /// Length of the line's audio, in seconds.
    pub duration: f64,
}

impl ScriptTiming {
    pub fn end_time(&self) -> f64 {
        self.start_time + self.duration
    }
}

/// Ordered timings built while chunks are appended.
///
/// Any destructive edit to the episode audio makes the timings stale; they
/// are never adjusted individually.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Timeline {
    timings: Vec<ScriptTiming>,
    stale: bool,
}

impl Timeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restore timings from a persisted episode record.
    pub fn from_timings(timings: Vec<ScriptTiming>) -> Self {
        Self {
            timings,
            stale: false,
        }
    }

    /// Record a chunk that starts where the previous one ended.
    pub fn append(&mut self, line_index: usize, duration: f64) -> ScriptTiming {
        let timing = ScriptTiming {
            line_index,
            start_time: self.total_duration(),
            duration,
        };
        self.timings.push(timing);
        timing
    }

    /// Total duration covered by the timings, in seconds.
    pub fn total_duration(&self) -> f64 {
        self.timings.last().map(ScriptTiming::end_time).unwrap_or(0.0)
    }

    /// Find the line playing at the given time.
    pub fn line_at(&self, time: f64) -> Option<&ScriptTiming> {
        if self.stale {
            return None;
        }
        self.timings
            .iter()
            .find(|t| time >= t.start_time && time < t.end_time())
    }

    pub fn timings(&self) -> &[ScriptTiming] {
        &self.timings
    }

    pub fn mark_stale(&mut self) {
        self.stale = true;
    }

    pub fn is_stale(&self) -> bool {
        self.stale
    }

    pub fn len(&self) -> usize {
        self.timings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timings.is_empty()
    }
}
