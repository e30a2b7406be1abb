//! WebAssembly bindings for inkpad-core.
//!
//! Translates browser mouse and touch events into [`RawInput`] and
//! normalizes them against the live canvas element. Touch events have their
//! default handling (scroll, pinch-zoom) suppressed while a stroke is
//! captured.

use wasm_bindgen::prelude::*;
use web_sys::{HtmlCanvasElement, MouseEvent, TouchEvent};

use crate::{
    CanvasGeometry, DeviceClass, DisplayRect, InputPhase, RawInput, StrokeRecorder, Tool,
    ToolModel, TouchPoint,
};

/// Initialize the WASM module.
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

/// Device class of the running browser, read once from the user agent.
#[must_use]
pub fn browser_device_class() -> DeviceClass {
    web_sys::window()
        .and_then(|w| w.navigator().user_agent().ok())
        .map_or(DeviceClass::Desktop, |ua| DeviceClass::from_user_agent(&ua))
}

/// Current geometry of a canvas element.
#[must_use]
pub fn canvas_geometry(canvas: &HtmlCanvasElement) -> CanvasGeometry {
    let rect = canvas.get_bounding_client_rect();
    #[allow(clippy::cast_possible_truncation)]
    let display = DisplayRect {
        left: rect.left() as f32,
        top: rect.top() as f32,
        width: rect.width() as f32,
        height: rect.height() as f32,
    };
    CanvasGeometry {
        display,
        intrinsic_width: canvas.width(),
        intrinsic_height: canvas.height(),
    }
}

/// Convert a mouse event.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn mouse_input(event: &MouseEvent, phase: InputPhase) -> RawInput {
    RawInput::mouse(phase, event.client_x() as f32, event.client_y() as f32)
}

/// Convert a touch event, suppressing the browser's default gesture
/// handling for it.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn touch_input(event: &TouchEvent, phase: InputPhase) -> RawInput {
    event.prevent_default();
    event.stop_propagation();
    let list = event.touches();
    let touches = (0..list.length())
        .filter_map(|i| list.get(i))
        .map(|t| TouchPoint {
            id: u32::try_from(t.identifier()).unwrap_or_default(),
            client_x: t.client_x() as f32,
            client_y: t.client_y() as f32,
        })
        .collect();
    RawInput::Touch { phase, touches }
}

/// Stroke capture bound to one canvas element.
#[wasm_bindgen]
pub struct WasmInkpad {
    canvas: HtmlCanvasElement,
    tools: ToolModel,
    recorder: StrokeRecorder,
}

impl WasmInkpad {
    fn feed(&mut self, input: &RawInput) {
        let phase = input.phase();
        if phase.is_terminal() {
            self.recorder.end();
            return;
        }
        match canvas_geometry(&self.canvas).normalize(input) {
            Ok(point) if phase == InputPhase::Start => {
                self.recorder.begin(point, self.tools.brush());
            }
            Ok(point) => {
                self.recorder.extend(point);
            }
            Err(error) => tracing::debug!(%error, "input ignored"),
        }
    }
}

#[wasm_bindgen]
impl WasmInkpad {
    /// Bind to a canvas element.
    #[wasm_bindgen(constructor)]
    #[must_use]
    pub fn new(canvas: HtmlCanvasElement) -> Self {
        Self {
            canvas,
            tools: ToolModel::new(browser_device_class()),
            recorder: StrokeRecorder::new(),
        }
    }

    /// Feed a mouse event (`phase` is one of start/move/end/cancel).
    #[wasm_bindgen(js_name = onMouse)]
    pub fn on_mouse(&mut self, event: &MouseEvent, phase: &str) {
        if let Some(phase) = parse_phase(phase) {
            let input = mouse_input(event, phase);
            self.feed(&input);
        }
    }

    /// Feed a touch event (`phase` is one of start/move/end/cancel).
    #[wasm_bindgen(js_name = onTouch)]
    pub fn on_touch(&mut self, event: &TouchEvent, phase: &str) {
        if let Some(phase) = parse_phase(phase) {
            let input = touch_input(event, phase);
            self.feed(&input);
        }
    }

    /// Switch tool (`ink` or `erase`).
    #[wasm_bindgen(js_name = setTool)]
    pub fn set_tool(&mut self, tool: &str) {
        match tool {
            "ink" => self.tools.set_tool(Tool::Ink),
            "erase" => self.tools.set_tool(Tool::Erase),
            other => tracing::debug!(tool = other, "unknown tool ignored"),
        }
    }

    /// Set the width of the active tool; returns the clamped width.
    #[wasm_bindgen(js_name = setSize)]
    pub fn set_size(&mut self, size: f32) -> f32 {
        self.tools.set_size(self.tools.tool(), size)
    }

    /// Undo the last committed stroke.
    pub fn undo(&mut self) {
        self.recorder.undo_last();
    }

    /// Clear the drawing.
    pub fn clear(&mut self) {
        self.recorder.clear();
    }

    /// Number of committed strokes.
    #[wasm_bindgen(js_name = strokeCount)]
    #[must_use]
    pub fn stroke_count(&self) -> usize {
        self.recorder.drawing().committed_len()
    }

    /// The drawing as JSON, for a host-side renderer.
    #[wasm_bindgen(js_name = getDrawingJson)]
    #[must_use]
    pub fn get_drawing_json(&self) -> String {
        serde_json::to_string(self.recorder.drawing()).unwrap_or_default()
    }
}

fn parse_phase(phase: &str) -> Option<InputPhase> {
    match phase {
        "start" => Some(InputPhase::Start),
        "move" => Some(InputPhase::Move),
        "end" => Some(InputPhase::End),
        "cancel" => Some(InputPhase::Cancel),
        _ => None,
    }
}
