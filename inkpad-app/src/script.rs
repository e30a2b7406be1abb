//! JSON scripts of device events and tool actions, replayed into a session.
//!
//! ```json
//! {
//!   "display": { "left": 0, "top": 0, "width": 500, "height": 300 },
//!   "steps": [
//!     { "action": "tool", "tool": "ink" },
//!     { "action": "input", "event": { "type": "mouse", "phase": "start", "client_x": 10, "client_y": 10 } },
//!     { "action": "input", "event": { "type": "mouse", "phase": "move", "client_x": 40, "client_y": 12 } },
//!     { "action": "input", "event": { "type": "mouse", "phase": "end", "client_x": 40, "client_y": 12 } }
//!   ]
//! }
//! ```

use std::path::Path;

use inkpad_client::RecognitionService;
use inkpad_core::{DisplayRect, RawInput, Tool};
use serde::{Deserialize, Serialize};

use crate::error::SessionResult;
use crate::session::Session;

/// One scripted action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "lowercase")]
pub enum Step {
    /// A raw device event.
    Input {
        /// The event.
        event: RawInput,
    },
    /// Select a tool.
    Tool {
        /// Tool to select.
        tool: Tool,
    },
    /// Set a tool's size.
    Size {
        /// Tool whose size changes.
        tool: Tool,
        /// New size, clamped to the tool's range.
        size: f32,
    },
    /// Undo the last committed stroke.
    Undo,
    /// Clear the canvas.
    Clear,
}

/// A replayable script.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Script {
    /// On-screen canvas placement; defaults to unscaled at the origin.
    #[serde(default)]
    pub display: Option<DisplayRect>,
    /// Steps in order.
    pub steps: Vec<Step>,
}

/// What a replay did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplaySummary {
    /// Steps executed.
    pub steps: usize,
    /// Input events that changed the drawing.
    pub accepted_inputs: usize,
    /// Input events that were ignored.
    pub ignored_inputs: usize,
}

impl Script {
    /// Parse a script from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Script`](crate::SessionError::Script) if the
    /// JSON is malformed.
    pub fn from_json(json: &str) -> SessionResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse a script file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> SessionResult<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Replay every step into `session`.
    pub fn replay<S: RecognitionService>(&self, session: &mut Session<S>) -> ReplaySummary {
        if let Some(display) = self.display {
            session.set_display(display);
        }

        let mut summary = ReplaySummary::default();
        for step in &self.steps {
            match step {
                Step::Input { event } => {
                    if session.handle_input(event) {
                        summary.accepted_inputs += 1;
                    } else {
                        summary.ignored_inputs += 1;
                    }
                }
                Step::Tool { tool } => session.set_tool(*tool),
                Step::Size { tool, size } => {
                    session.set_size(*tool, *size);
                }
                Step::Undo => {
                    session.undo();
                }
                Step::Clear => session.clear(),
            }
            summary.steps += 1;
        }

        tracing::info!(
            steps = summary.steps,
            accepted = summary.accepted_inputs,
            ignored = summary.ignored_inputs,
            strokes = session.drawing().committed_len(),
            "Script replayed"
        );
        summary
    }
}
