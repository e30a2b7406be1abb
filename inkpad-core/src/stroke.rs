//! Points and strokes.

use serde::{Deserialize, Serialize};

use crate::event::CanvasPoint;
use crate::tool::{Brush, Tool};

/// A canonical point stamped with the tool and width it was drawn with.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// X in canvas pixels.
    pub x: f32,
    /// Y in canvas pixels.
    pub y: f32,
    /// Tool active when the stroke began.
    pub tool: Tool,
    /// Width active when the stroke began.
    pub size: f32,
}

impl Point {
    /// Stamp a canvas position with a brush.
    #[must_use]
    pub const fn new(at: CanvasPoint, brush: Brush) -> Self {
        Self {
            x: at.x,
            y: at.y,
            tool: brush.tool,
            size: brush.size,
        }
    }
}

/// One continuous gesture: a non-empty, homogeneous run of points.
///
/// The brush is fixed by the first point; every later point carries the same
/// tool and size regardless of tool changes made while recording.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Stroke {
    brush: Brush,
    points: Vec<Point>,
}

impl Stroke {
    /// Start a stroke at `at` with a snapshot of `brush`.
    #[must_use]
    pub fn begin(at: CanvasPoint, brush: Brush) -> Self {
        Self {
            brush,
            points: vec![Point::new(at, brush)],
        }
    }

    /// Append a position using the stroke's own brush.
    pub fn push(&mut self, at: CanvasPoint) {
        self.points.push(Point::new(at, self.brush));
    }

    /// Brush shared by every point.
    #[must_use]
    pub const fn brush(&self) -> Brush {
        self.brush
    }

    /// Tool shared by every point.
    #[must_use]
    pub const fn tool(&self) -> Tool {
        self.brush.tool
    }

    /// Width shared by every point.
    #[must_use]
    pub const fn size(&self) -> f32 {
        self.brush.size
    }

    /// Points in capture order.
    #[must_use]
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Number of points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always false; kept for the `len`/`is_empty` pairing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn points_inherit_the_begin_brush() {
        let ink = Brush {
            tool: Tool::Ink,
            size: 4.0,
        };
        let mut stroke = Stroke::begin(CanvasPoint::new(1.0, 2.0), ink);
        stroke.push(CanvasPoint::new(3.0, 4.0));
        stroke.push(CanvasPoint::new(5.0, 6.0));

        assert_eq!(stroke.len(), 3);
        assert!(stroke
            .points()
            .iter()
            .all(|p| p.tool == Tool::Ink && (p.size - 4.0).abs() < f32::EPSILON));
        assert_eq!(stroke.points()[2].x, 5.0);
    }
}
