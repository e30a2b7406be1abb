//! The drawing and the stroke recorder that mutates it.

use serde::Serialize;

use crate::event::CanvasPoint;
use crate::stroke::Stroke;
use crate::tool::Brush;

/// Strokes with fewer points than this are discarded on end.
pub const MIN_STROKE_POINTS: usize = 2;

/// Committed strokes in insertion order plus at most one in-progress stroke.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Drawing {
    strokes: Vec<Stroke>,
    in_progress: Option<Stroke>,
}

impl Drawing {
    /// Committed strokes, oldest first.
    #[must_use]
    pub fn strokes(&self) -> &[Stroke] {
        &self.strokes
    }

    /// Stroke currently being recorded, if any.
    #[must_use]
    pub const fn in_progress(&self) -> Option<&Stroke> {
        self.in_progress.as_ref()
    }

    /// Number of committed strokes.
    #[must_use]
    pub fn committed_len(&self) -> usize {
        self.strokes.len()
    }

    /// True when there are no committed strokes and nothing in progress.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.strokes.is_empty() && self.in_progress.is_none()
    }

    /// Every stroke in render order: committed strokes, then the in-progress
    /// stroke last.
    pub fn render_order(&self) -> impl Iterator<Item = &Stroke> {
        self.strokes.iter().chain(self.in_progress.iter())
    }
}

/// Whether a stroke is being captured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RecorderState {
    /// No stroke in progress.
    Idle,
    /// A stroke has begun and not yet ended.
    Recording,
}

/// Accumulates canonical points into strokes and owns undo.
#[derive(Debug, Clone, Default)]
pub struct StrokeRecorder {
    drawing: Drawing,
}

impl StrokeRecorder {
    /// Create an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The drawing recorded so far.
    #[must_use]
    pub const fn drawing(&self) -> &Drawing {
        &self.drawing
    }

    /// Current capture state.
    #[must_use]
    pub const fn state(&self) -> RecorderState {
        if self.drawing.in_progress.is_some() {
            RecorderState::Recording
        } else {
            RecorderState::Idle
        }
    }

    /// Start a stroke at `at`, snapshotting `brush` for its whole lifetime.
    ///
    /// Returns false (and changes nothing) when already recording.
    pub fn begin(&mut self, at: CanvasPoint, brush: Brush) -> bool {
        if self.drawing.in_progress.is_some() {
            tracing::debug!("begin ignored: stroke already in progress");
            return false;
        }
        self.drawing.in_progress = Some(Stroke::begin(at, brush));
        true
    }

    /// Append `at` to the in-progress stroke. No-op when idle.
    pub fn extend(&mut self, at: CanvasPoint) -> bool {
        match self.drawing.in_progress.as_mut() {
            Some(stroke) => {
                stroke.push(at);
                true
            }
            None => false,
        }
    }

    /// Finish the in-progress stroke.
    ///
    /// The stroke is committed only if it has at least
    /// [`MIN_STROKE_POINTS`] points; a tap without movement is dropped.
    /// Returns true if a stroke was committed.
    pub fn end(&mut self) -> bool {
        let Some(stroke) = self.drawing.in_progress.take() else {
            return false;
        };
        if stroke.len() < MIN_STROKE_POINTS {
            tracing::debug!(points = stroke.len(), "stroke discarded");
            return false;
        }
        tracing::debug!(
            tool = ?stroke.tool(),
            points = stroke.len(),
            index = self.drawing.strokes.len(),
            "stroke committed"
        );
        self.drawing.strokes.push(stroke);
        true
    }

    /// Remove and return the most recently committed stroke.
    ///
    /// Undone strokes are discarded; there is no redo.
    pub fn undo_last(&mut self) -> Option<Stroke> {
        let undone = self.drawing.strokes.pop();
        if undone.is_some() {
            tracing::debug!(remaining = self.drawing.strokes.len(), "stroke undone");
        }
        undone
    }

    /// Empty the committed log and drop any in-progress stroke.
    pub fn clear(&mut self) {
        self.drawing = Drawing::default();
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::tool::{Tool, ToolModel};
    use proptest::prelude::*;

    fn at(x: f32, y: f32) -> CanvasPoint {
        CanvasPoint::new(x, y)
    }

    fn ink() -> Brush {
        Brush {
            tool: Tool::Ink,
            size: 3.0,
        }
    }

    fn record(recorder: &mut StrokeRecorder, points: &[(f32, f32)]) -> bool {
        let mut iter = points.iter();
        if let Some(&(x, y)) = iter.next() {
            recorder.begin(at(x, y), ink());
        }
        for &(x, y) in iter {
            recorder.extend(at(x, y));
        }
        recorder.end()
    }

    #[test]
    fn tap_without_movement_is_discarded() {
        let mut recorder = StrokeRecorder::new();
        assert!(!record(&mut recorder, &[(10.0, 10.0)]));
        assert!(recorder.drawing().is_empty());
        assert_eq!(recorder.state(), RecorderState::Idle);
    }

    #[test]
    fn two_points_commit_a_stroke() {
        let mut recorder = StrokeRecorder::new();
        assert!(record(&mut recorder, &[(0.0, 0.0), (5.0, 5.0)]));
        assert_eq!(recorder.drawing().committed_len(), 1);
        assert!(recorder.drawing().in_progress().is_none());
    }

    #[test]
    fn begin_while_recording_is_ignored() {
        let mut recorder = StrokeRecorder::new();
        assert!(recorder.begin(at(0.0, 0.0), ink()));
        assert!(!recorder.begin(at(50.0, 50.0), ink()));
        let stroke = recorder.drawing().in_progress().expect("in progress");
        assert_eq!(stroke.len(), 1);
        assert_eq!(stroke.points()[0].x, 0.0);
    }

    #[test]
    fn extend_when_idle_is_noop() {
        let mut recorder = StrokeRecorder::new();
        assert!(!recorder.extend(at(1.0, 1.0)));
        assert!(recorder.drawing().is_empty());
    }

    #[test]
    fn tool_change_mid_stroke_applies_to_next_stroke() {
        let mut tools = ToolModel::default();
        let mut recorder = StrokeRecorder::new();

        recorder.begin(at(0.0, 0.0), tools.brush());
        recorder.extend(at(1.0, 1.0));
        tools.set_tool(Tool::Erase);
        tools.set_size(Tool::Ink, 9.0);
        recorder.extend(at(2.0, 2.0));
        recorder.end();

        recorder.begin(at(5.0, 5.0), tools.brush());
        recorder.extend(at(6.0, 6.0));
        recorder.end();

        let strokes = recorder.drawing().strokes();
        assert!(strokes[0]
            .points()
            .iter()
            .all(|p| p.tool == Tool::Ink && (p.size - 3.0).abs() < f32::EPSILON));
        assert_eq!(strokes[1].tool(), Tool::Erase);
        assert!((strokes[1].size() - 10.0).abs() < f32::EPSILON);
    }

    #[test]
    fn undo_removes_only_the_latest_stroke() {
        let mut recorder = StrokeRecorder::new();
        record(&mut recorder, &[(0.0, 0.0), (1.0, 0.0)]);
        record(&mut recorder, &[(0.0, 5.0), (1.0, 5.0)]);
        record(&mut recorder, &[(0.0, 9.0), (1.0, 9.0)]);

        let undone = recorder.undo_last().expect("stroke");
        assert_eq!(undone.points()[0].y, 9.0);
        let remaining: Vec<f32> = recorder
            .drawing()
            .strokes()
            .iter()
            .map(|s| s.points()[0].y)
            .collect();
        assert_eq!(remaining, vec![0.0, 5.0]);
    }

    #[test]
    fn undo_on_empty_log_is_noop() {
        let mut recorder = StrokeRecorder::new();
        assert!(recorder.undo_last().is_none());
        assert!(recorder.drawing().is_empty());
    }

    #[test]
    fn undo_leaves_in_progress_stroke_alone() {
        let mut recorder = StrokeRecorder::new();
        record(&mut recorder, &[(0.0, 0.0), (1.0, 0.0)]);
        recorder.begin(at(3.0, 3.0), ink());
        recorder.undo_last();
        assert_eq!(recorder.drawing().committed_len(), 0);
        assert_eq!(recorder.state(), RecorderState::Recording);
    }

    #[test]
    fn clear_drops_everything() {
        let mut recorder = StrokeRecorder::new();
        record(&mut recorder, &[(0.0, 0.0), (1.0, 0.0)]);
        recorder.begin(at(3.0, 3.0), ink());
        recorder.clear();
        assert!(recorder.drawing().is_empty());
        assert_eq!(recorder.state(), RecorderState::Idle);
    }

    #[test]
    fn render_order_puts_in_progress_last() {
        let mut recorder = StrokeRecorder::new();
        record(&mut recorder, &[(0.0, 0.0), (1.0, 0.0)]);
        recorder.begin(at(7.0, 7.0), ink());
        let order: Vec<f32> = recorder
            .drawing()
            .render_order()
            .map(|s| s.points()[0].x)
            .collect();
        assert_eq!(order, vec![0.0, 7.0]);
    }

    #[derive(Debug, Clone)]
    enum Op {
        Begin(f32, f32),
        Extend(f32, f32),
        End,
        Undo,
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            (0.0f32..100.0, 0.0f32..100.0).prop_map(|(x, y)| Op::Begin(x, y)),
            (0.0f32..100.0, 0.0f32..100.0).prop_map(|(x, y)| Op::Extend(x, y)),
            Just(Op::End),
            Just(Op::Undo),
        ]
    }

    proptest! {
        #[test]
        fn committed_strokes_always_have_two_points(ops in prop::collection::vec(op(), 0..64)) {
            let mut recorder = StrokeRecorder::new();
            for op in ops {
                match op {
                    Op::Begin(x, y) => { recorder.begin(at(x, y), ink()); }
                    Op::Extend(x, y) => { recorder.extend(at(x, y)); }
                    Op::End => { recorder.end(); }
                    Op::Undo => { recorder.undo_last(); }
                }
                for stroke in recorder.drawing().strokes() {
                    prop_assert!(stroke.len() >= MIN_STROKE_POINTS);
                    let brush = stroke.brush();
                    prop_assert!(stroke.points().iter().all(|p| p.tool == brush.tool));
                }
            }
        }
    }
}
