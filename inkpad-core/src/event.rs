//! Raw device input and its normalization into canvas-pixel space.
//!
//! Mouse and touch events arrive in client (viewport) coordinates. The canvas
//! may be displayed at a different size than its intrinsic bitmap (CSS
//! scaling on mobile is the usual case), so every point is rescaled by
//! `intrinsic / display` on each axis before it reaches the recorder.

use serde::{Deserialize, Serialize};

use crate::error::InputError;

/// Phase of a pointer or touch interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputPhase {
    /// Button or finger went down.
    Start,
    /// Pointer or finger moved.
    Move,
    /// Button or finger released.
    End,
    /// Interaction aborted (pointer left the canvas, touch cancelled).
    Cancel,
}

impl InputPhase {
    /// Whether this phase closes the current interaction.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::End | Self::Cancel)
    }
}

/// A single touch contact in client coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TouchPoint {
    /// Touch identifier (for multi-touch).
    pub id: u32,
    /// X position in client pixels.
    pub client_x: f32,
    /// Y position in client pixels.
    pub client_y: f32,
}

/// A raw device event as delivered by the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum RawInput {
    /// Mouse (or pen emulating a mouse) event.
    Mouse {
        /// Interaction phase.
        phase: InputPhase,
        /// X position in client pixels.
        client_x: f32,
        /// Y position in client pixels.
        client_y: f32,
    },
    /// Touch event with all currently active touches.
    Touch {
        /// Interaction phase.
        phase: InputPhase,
        /// Active touches; empty on a final touch-end.
        #[serde(default)]
        touches: Vec<TouchPoint>,
    },
}

impl RawInput {
    /// Convenience constructor for a mouse event.
    #[must_use]
    pub const fn mouse(phase: InputPhase, client_x: f32, client_y: f32) -> Self {
        Self::Mouse {
            phase,
            client_x,
            client_y,
        }
    }

    /// Convenience constructor for a single-finger touch event.
    #[must_use]
    pub fn touch(phase: InputPhase, client_x: f32, client_y: f32) -> Self {
        Self::Touch {
            phase,
            touches: vec![TouchPoint {
                id: 0,
                client_x,
                client_y,
            }],
        }
    }

    /// Phase of this event.
    #[must_use]
    pub const fn phase(&self) -> InputPhase {
        match self {
            Self::Mouse { phase, .. } | Self::Touch { phase, .. } => *phase,
        }
    }

    /// Whether the host must suppress the platform's default gesture
    /// handling (scroll, pinch-zoom) while this event is being captured.
    #[must_use]
    pub const fn suppresses_default(&self) -> bool {
        matches!(self, Self::Touch { .. })
    }

    /// Client-space position of the event: the pointer itself for mouse
    /// events, the first active touch for touch events.
    fn client_position(&self) -> Result<(f32, f32), InputError> {
        match self {
            Self::Mouse {
                client_x, client_y, ..
            } => Ok((*client_x, *client_y)),
            Self::Touch { touches, .. } => touches
                .first()
                .map(|t| (t.client_x, t.client_y))
                .ok_or(InputError::NoActiveTouch),
        }
    }
}

/// A device- and scale-independent position in canvas-pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CanvasPoint {
    /// X in canvas pixels.
    pub x: f32,
    /// Y in canvas pixels.
    pub y: f32,
}

impl CanvasPoint {
    /// Create a new canvas point.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// On-screen bounding box of the canvas element in client pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DisplayRect {
    /// Left edge.
    pub left: f32,
    /// Top edge.
    pub top: f32,
    /// Displayed width.
    pub width: f32,
    /// Displayed height.
    pub height: f32,
}

/// Everything needed to map client coordinates onto the canvas bitmap.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CanvasGeometry {
    /// Where the canvas is shown and at what size.
    pub display: DisplayRect,
    /// Intrinsic bitmap width in canvas pixels.
    pub intrinsic_width: u32,
    /// Intrinsic bitmap height in canvas pixels.
    pub intrinsic_height: u32,
}

impl CanvasGeometry {
    /// Geometry for a canvas displayed at its intrinsic size at the origin.
    #[allow(clippy::cast_precision_loss)]
    #[must_use]
    pub fn unscaled(width: u32, height: u32) -> Self {
        Self {
            display: DisplayRect {
                left: 0.0,
                top: 0.0,
                width: width as f32,
                height: height as f32,
            },
            intrinsic_width: width,
            intrinsic_height: height,
        }
    }

    /// Per-axis scale from client pixels to canvas pixels.
    ///
    /// # Errors
    ///
    /// Returns [`InputError::DegenerateCanvas`] if the canvas has no
    /// displayed area.
    #[allow(clippy::cast_precision_loss)]
    pub fn scale(&self) -> Result<(f32, f32), InputError> {
        let DisplayRect { width, height, .. } = self.display;
        if width <= 0.0 || height <= 0.0 || !width.is_finite() || !height.is_finite() {
            return Err(InputError::DegenerateCanvas { width, height });
        }
        Ok((
            self.intrinsic_width as f32 / width,
            self.intrinsic_height as f32 / height,
        ))
    }

    /// Map a raw device event to a canonical canvas point.
    ///
    /// # Errors
    ///
    /// Returns an [`InputError`] for touch events without active touches and
    /// for a canvas with no displayed area.
    pub fn normalize(&self, input: &RawInput) -> Result<CanvasPoint, InputError> {
        let (client_x, client_y) = input.client_position()?;
        let (scale_x, scale_y) = self.scale()?;
        Ok(CanvasPoint {
            x: (client_x - self.display.left) * scale_x,
            y: (client_y - self.display.top) * scale_y,
        })
    }
}
