use serde::{Deserialize, Serialize};

/// Time range over the episode audio, in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Selection {
    pub start: f64,
    pub end: f64,
}

impl Selection {
    /// Build a selection with `start <= end`.
    pub fn new(a: f64, b: f64) -> Self {
        Self { start: a, end: b }.normalized()
    }

    #[must_use]
    pub fn normalized(self) -> Self {
        if self.start > self.end {
            Self {
                start: self.end,
                end: self.start,
            }
        } else {
            self
        }
    }

    /// Clamp both bounds to `[0, total_duration]`.
    #[must_use]
    pub fn clamped(self, total_duration: f64) -> Self {
        let max = total_duration.max(0.0);
        Self {
            start: self.start.clamp(0.0, max),
            end: self.end.clamp(0.0, max),
        }
    }

    pub fn duration(&self) -> f64 {
        (self.end - self.start).abs()
    }

    /// Zero-length selections (a click without a drag) count as no selection.
    pub fn is_empty(&self) -> bool {
        self.duration() <= f64::EPSILON
    }
}

/// Placement of the waveform surface inside the viewport, in pixels.
///
/// `rendered_width` is the full scrollable width, which grows with zoom.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SurfaceGeometry {
    pub left: f64,
    pub scroll_left: f64,
    pub rendered_width: f64,
}

/// Map a pointer x coordinate to a time on the rendered waveform.
pub fn pointer_to_time(client_x: f64, geometry: &SurfaceGeometry, total_duration: f64) -> f64 {
    if geometry.rendered_width <= 0.0 || total_duration <= 0.0 {
        return 0.0;
    }
    let x = client_x - geometry.left + geometry.scroll_left;
    ((x / geometry.rendered_width) * total_duration).clamp(0.0, total_duration)
}

/// Pointer interaction state.
///
/// State transitions:
/// - Idle -> Dragging (pointer down in edit mode, start = end = time)
/// - Dragging -> Dragging (pointer move, updates end)
/// - Dragging -> Idle (pointer up, selection normalized)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SelectionState {
    Idle,
    Dragging,
}

/// What a pointer-down did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerOutcome {
    /// Edit mode is off; the caller should move the playhead here.
    Seek(f64),
    /// A new drag began at this time.
    SelectionStarted(f64),
}

#[derive(Debug, Clone)]
pub struct SelectionModel {
    state: SelectionState,
    selection: Option<Selection>,
}

impl Default for SelectionModel {
    fn default() -> Self {
        Self::new()
    }
}

impl SelectionModel {
    pub fn new() -> Self {
        Self {
            state: SelectionState::Idle,
            selection: None,
        }
    }

    pub fn state(&self) -> SelectionState {
        self.state
    }

    pub fn pointer_down(&mut self, time: f64, edit_mode: bool) -> PointerOutcome {
        if !edit_mode {
            return PointerOutcome::Seek(time);
        }
        self.state = SelectionState::Dragging;
        self.selection = Some(Selection {
            start: time,
            end: time,
        });
        PointerOutcome::SelectionStarted(time)
    }

    /// Extend the drag. Ignored unless dragging.
    pub fn pointer_move(&mut self, time: f64) {
        if self.state != SelectionState::Dragging {
            return;
        }
        if let Some(selection) = self.selection.as_mut() {
            selection.end = time;
        }
    }

    /// Finish the drag and return the usable selection, if any.
    pub fn pointer_up(&mut self) -> Option<Selection> {
        if self.state != SelectionState::Dragging {
            return self.active();
        }
        self.state = SelectionState::Idle;
        self.selection = self.selection.map(Selection::normalized);
        self.active()
    }

    /// The current range, including a zero-length click or an in-progress drag.
    pub fn selection(&self) -> Option<Selection> {
        self.selection
    }

    /// The finalized, non-empty selection that edits may act on.
    pub fn active(&self) -> Option<Selection> {
        if self.state == SelectionState::Dragging {
            return None;
        }
        self.selection.filter(|s| !s.is_empty())
    }

    /// Replace the selection programmatically (e.g. from numeric inputs).
    pub fn set(&mut self, selection: Selection) {
        self.state = SelectionState::Idle;
        self.selection = Some(selection.normalized());
    }

    pub fn clear(&mut self) {
        self.state = SelectionState::Idle;
        self.selection = None;
    }
}
