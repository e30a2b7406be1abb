//! # Inkpad App
//!
//! Session orchestration for the Inkpad drawing pad, plus the `inkpad`
//! headless host.
//!
//! A [`Session`] owns the tool model, the stroke recorder, the renderer, the
//! interaction state machine, and a [`RecognitionService`]. Hosts feed it raw
//! device events and user actions; it keeps the drawing, the rendered frame,
//! and the recognition/correction state consistent.
//!
//! ## Usage
//!
//! ```bash
//! inkpad demos/hello.json --recognize --select 1 --correct "Hello!"
//! ```
//!
//! ## Architecture
//!
//! - `CliArgs` - Command-line arguments parsed with clap
//! - `SessionConfig` - Canvas size, service URL, user id, device class
//! - `Session` - Drawing + state machine + service, one per canvas
//! - `Script` - JSON replay of device events and tool actions
//!
//! [`RecognitionService`]: inkpad_client::RecognitionService

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

mod error;
mod script;
mod session;

pub use error::{SessionError, SessionResult};
pub use script::{ReplaySummary, Script, Step};
pub use session::{PendingCorrection, PendingRecognition, Session};

use std::path::PathBuf;

use clap::Parser;
use inkpad_client::DEFAULT_API_URL;
use inkpad_core::{DeviceClass, UserId};
use inkpad_renderer::{DEFAULT_HEIGHT, DEFAULT_WIDTH};

/// Command-line arguments for inkpad.
#[derive(Debug, Clone, Parser)]
#[command(name = "inkpad")]
#[command(about = "Replay a handwriting script, export it, and optionally recognize it")]
#[command(version)]
pub struct CliArgs {
    /// JSON stroke script to replay
    pub script: PathBuf,

    /// Recognition service base URL
    #[arg(long, env = "INKPAD_API_URL", default_value = DEFAULT_API_URL)]
    pub api_url: String,

    /// User id sent with every request (blank means anonymous)
    #[arg(long, env = "INKPAD_USER_ID", default_value = "")]
    pub user_id: String,

    /// User agent used to pick desktop or mobile tool defaults
    #[arg(long)]
    pub user_agent: Option<String>,

    /// Canvas width in pixels
    #[arg(long, default_value_t = DEFAULT_WIDTH)]
    pub width: u32,

    /// Canvas height in pixels
    #[arg(long, default_value_t = DEFAULT_HEIGHT)]
    pub height: u32,

    /// Directory the exported drawing is written to
    #[arg(long, default_value = ".")]
    pub out_dir: PathBuf,

    /// Export as JPEG instead of PNG
    #[arg(long)]
    pub jpeg: bool,

    /// Send the drawing for recognition after replay
    #[arg(long)]
    pub recognize: bool,

    /// Select suggestion N after recognition
    #[arg(long, requires = "recognize")]
    pub select: Option<usize>,

    /// Submit this text as a correction of the selection
    #[arg(long, requires = "recognize")]
    pub correct: Option<String>,
}

/// Session configuration.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Intrinsic canvas width in pixels.
    pub width: u32,
    /// Intrinsic canvas height in pixels.
    pub height: u32,
    /// Recognition service base URL.
    pub api_url: String,
    /// User id sent with every request.
    pub user_id: UserId,
    /// Device class for tool defaults.
    pub device: DeviceClass,
    /// Directory exports are written to.
    pub out_dir: PathBuf,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionConfig {
    /// Create a new session configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            api_url: DEFAULT_API_URL.to_string(),
            user_id: UserId::default(),
            device: DeviceClass::Desktop,
            out_dir: PathBuf::from("."),
        }
    }
}

impl From<CliArgs> for SessionConfig {
    fn from(args: CliArgs) -> Self {
        Self {
            width: args.width,
            height: args.height,
            api_url: args.api_url,
            user_id: UserId::new(args.user_id),
            device: args
                .user_agent
                .as_deref()
                .map_or(DeviceClass::Desktop, DeviceClass::from_user_agent),
            out_dir: args.out_dir,
        }
    }
}
