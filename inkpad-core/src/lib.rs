//! # Inkpad Core
//!
//! Stroke capture and interaction logic for a handwriting pad whose drawings
//! are sent to an external recognition service.
//! Compiles to WASM; nothing in here performs I/O.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │               inkpad-core                   │
//! ├─────────────────────────────────────────────┤
//! │  Input           │  Drawing                 │
//! │  - Mouse / touch │  - Tool model            │
//! │  - Scale to      │  - Stroke recorder       │
//! │    canvas pixels │  - Undo / clear          │
//! ├─────────────────────────────────────────────┤
//! │  Interaction state machine                  │
//! │  - Submit guards  - Stale-response tickets  │
//! │  - Selection      - Correction              │
//! └─────────────────────────────────────────────┘
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod drawing;
pub mod error;
pub mod event;
pub mod recognition;
pub mod state;
pub mod stroke;
pub mod tool;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use drawing::{Drawing, RecorderState, StrokeRecorder, MIN_STROKE_POINTS};
pub use error::{InputError, PreconditionError};
pub use event::{CanvasGeometry, CanvasPoint, DisplayRect, InputPhase, RawInput, TouchPoint};
pub use recognition::{
    Candidate, Confidence, CorrectionRequest, RecognitionResult, UserId, ANONYMOUS_USER,
};
pub use state::{
    Command, ConnectionStatus, InteractionEvent, InteractionState, Phase, SelectionState, Ticket,
    Transition, UPDATE_INDICATOR_WINDOW,
};
pub use stroke::{Point, Stroke};
pub use tool::{Brush, DeviceClass, SizeRange, Tool, ToolModel};

/// Inkpad core version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
