//! # Inkpad Renderer
//!
//! Deterministic rasterizer for Inkpad drawings, built on tiny-skia.
//!
//! ## Pipeline
//!
//! ```text
//! ┌──────────┐   fold    ┌──────────┐  encode   ┌─────────────────┐
//! │ Drawing  │ ────────► │  Bitmap  │ ────────► │ PNG / JPEG /    │
//! │ (strokes)│           │  (RGBA)  │           │ data URL / file │
//! └──────────┘           └──────────┘           └─────────────────┘
//! ```
//!
//! Every frame is produced from scratch: clear to the background color, then
//! composite each stroke in order. Ink strokes paint source-over; erase
//! strokes use destination-out, so erased pixels become transparent.

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod bitmap;
pub mod error;
pub mod export;

pub use bitmap::Bitmap;
pub use error::{RenderError, RenderResult};
pub use export::{
    export_file_name, timestamped_file_name, Background, BitmapExporter, ExportConfig,
    ExportFormat,
};

use inkpad_core::{Drawing, Stroke, Tool};
use tiny_skia::{
    BlendMode, Color, FillRule, LineCap, LineJoin, Paint, PathBuilder, Pixmap, Transform,
};

/// Default canvas width in pixels.
pub const DEFAULT_WIDTH: u32 = 1000;
/// Default canvas height in pixels.
pub const DEFAULT_HEIGHT: u32 = 600;

/// Configuration for the renderer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RendererConfig {
    /// Canvas width in pixels.
    pub width: u32,
    /// Canvas height in pixels.
    pub height: u32,
    /// Background color (RGBA).
    pub background: [u8; 4],
    /// Ink color (RGBA).
    pub ink: [u8; 4],
    /// Enable anti-aliasing.
    pub anti_aliasing: bool,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            background: [255, 255, 255, 255],
            ink: [0, 0, 0, 255],
            anti_aliasing: true,
        }
    }
}

impl RendererConfig {
    /// Default configuration at a custom canvas size.
    #[must_use]
    pub fn with_size(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }
}

/// Renders drawings into bitmaps.
///
/// Rendering is a pure function of the configuration and the stroke list:
/// identical inputs produce byte-identical bitmaps.
#[derive(Debug, Clone, Default)]
pub struct StrokeRenderer {
    config: RendererConfig,
}

impl StrokeRenderer {
    /// Create a renderer with the given configuration.
    #[must_use]
    pub const fn new(config: RendererConfig) -> Self {
        Self { config }
    }

    /// Get the renderer configuration.
    #[must_use]
    pub const fn config(&self) -> &RendererConfig {
        &self.config
    }

    /// Render a drawing, including any stroke still being recorded.
    ///
    /// # Errors
    ///
    /// Returns an error if the surface cannot be allocated.
    pub fn render(&self, drawing: &Drawing) -> RenderResult<Bitmap> {
        self.render_strokes(drawing.render_order())
    }

    /// Render strokes in the given order onto a fresh surface.
    ///
    /// Strokes with fewer than two points are skipped.
    ///
    /// # Errors
    ///
    /// Returns an error if the surface cannot be allocated.
    pub fn render_strokes<'a>(
        &self,
        strokes: impl IntoIterator<Item = &'a Stroke>,
    ) -> RenderResult<Bitmap> {
        let mut pixmap = Bitmap::surface(self.config.width, self.config.height)?;
        let [r, g, b, a] = self.config.background;
        pixmap.fill(Color::from_rgba8(r, g, b, a));

        let mut drawn = 0_usize;
        for stroke in strokes {
            if stroke.len() < 2 {
                continue;
            }
            self.draw_stroke(&mut pixmap, stroke);
            drawn += 1;
        }

        tracing::trace!(
            width = self.config.width,
            height = self.config.height,
            strokes = drawn,
            "Rendered frame"
        );
        Ok(Bitmap::from_pixmap(pixmap))
    }

    fn paint_for(&self, tool: Tool) -> Paint<'static> {
        let mut paint = Paint {
            anti_alias: self.config.anti_aliasing,
            ..Paint::default()
        };
        match tool {
            Tool::Ink => {
                let [r, g, b, a] = self.config.ink;
                paint.set_color_rgba8(r, g, b, a);
                paint.blend_mode = BlendMode::SourceOver;
            }
            Tool::Erase => {
                // Only the source alpha matters for destination-out.
                paint.set_color_rgba8(0, 0, 0, 255);
                paint.blend_mode = BlendMode::DestinationOut;
            }
        }
        paint
    }

    fn draw_stroke(&self, pixmap: &mut Pixmap, stroke: &Stroke) {
        let paint = self.paint_for(stroke.tool());
        let width = stroke.size();
        let points = stroke.points();
        let first = points[0];

        // A stroke that never moved renders as a round dot.
        let moved = points
            .iter()
            .any(|p| (p.x - first.x).abs() > f32::EPSILON || (p.y - first.y).abs() > f32::EPSILON);
        if !moved {
            if let Some(dot) = PathBuilder::from_circle(first.x, first.y, width / 2.0) {
                pixmap.fill_path(&dot, &paint, FillRule::Winding, Transform::identity(), None);
            }
            return;
        }

        let mut builder = PathBuilder::new();
        builder.move_to(first.x, first.y);
        for p in &points[1..] {
            builder.line_to(p.x, p.y);
        }
        let Some(path) = builder.finish() else {
            tracing::debug!(points = points.len(), "Skipping degenerate stroke path");
            return;
        };

        let style = tiny_skia::Stroke {
            width,
            line_cap: LineCap::Round,
            line_join: LineJoin::Round,
            ..tiny_skia::Stroke::default()
        };
        pixmap.stroke_path(&path, &paint, &style, Transform::identity(), None);
    }
}
