//! Drawing tools, their sizes and the device class that bounds them.

use serde::{Deserialize, Serialize};

/// Default ink width on desktop-class devices.
pub const DEFAULT_INK_SIZE: f32 = 3.0;
/// Ink width substituted once on mobile-class devices.
pub const MOBILE_INK_SIZE: f32 = 6.0;
/// Default erase width.
pub const DEFAULT_ERASE_SIZE: f32 = 10.0;

/// User-agent fragments that identify a mobile-class device.
const MOBILE_UA_TOKENS: &[&str] = &[
    "android",
    "webos",
    "iphone",
    "ipad",
    "ipod",
    "blackberry",
    "iemobile",
    "opera mini",
];

/// Drawing tool. Closed two-variant tag, not a hierarchy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tool {
    /// Paints opaque black marks.
    #[default]
    Ink,
    /// Removes previously rendered pixels along its path.
    Erase,
}

/// Class of the host device, resolved once at startup.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceClass {
    /// Mouse-driven desktop or laptop.
    #[default]
    Desktop,
    /// Touch-first phone or tablet.
    Mobile,
}

impl DeviceClass {
    /// Classify a user-agent string.
    #[must_use]
    pub fn from_user_agent(user_agent: &str) -> Self {
        let ua = user_agent.to_lowercase();
        if MOBILE_UA_TOKENS.iter().any(|token| ua.contains(token)) {
            Self::Mobile
        } else {
            Self::Desktop
        }
    }
}

/// Inclusive size bounds for a tool on a device class.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SizeRange {
    /// Smallest allowed width.
    pub min: f32,
    /// Largest allowed width.
    pub max: f32,
}

impl SizeRange {
    /// Bounds for `tool` on `device`.
    #[must_use]
    pub const fn for_tool(tool: Tool, device: DeviceClass) -> Self {
        match (tool, device) {
            (Tool::Ink, DeviceClass::Desktop) => Self { min: 1.0, max: 10.0 },
            (Tool::Ink, DeviceClass::Mobile) => Self { min: 3.0, max: 15.0 },
            (Tool::Erase, _) => Self { min: 5.0, max: 30.0 },
        }
    }

    /// Whether `size` lies within the bounds.
    #[must_use]
    pub fn contains(&self, size: f32) -> bool {
        (self.min..=self.max).contains(&size)
    }

    /// Clamp `size` into the bounds. Non-finite input maps to the minimum.
    #[must_use]
    pub fn clamp(&self, size: f32) -> f32 {
        if size.is_finite() {
            size.clamp(self.min, self.max)
        } else {
            self.min
        }
    }
}

/// A tool together with the width it draws at.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Brush {
    /// Tool.
    pub tool: Tool,
    /// Line width in canvas pixels.
    pub size: f32,
}

/// Current tool selection and the per-tool sizes.
///
/// Switching tools never alters either size.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolModel {
    device: DeviceClass,
    tool: Tool,
    ink_size: f32,
    erase_size: f32,
}

impl ToolModel {
    /// Create the tool model for a device class.
    ///
    /// On mobile the default ink width is bumped to [`MOBILE_INK_SIZE`]
    /// once, here; later size changes are never rewritten.
    #[must_use]
    pub fn new(device: DeviceClass) -> Self {
        let ink_size = match device {
            DeviceClass::Mobile => MOBILE_INK_SIZE,
            DeviceClass::Desktop => DEFAULT_INK_SIZE,
        };
        tracing::debug!(?device, ink_size, "tool model initialized");
        Self {
            device,
            tool: Tool::Ink,
            ink_size,
            erase_size: DEFAULT_ERASE_SIZE,
        }
    }

    /// Device class this model was created for.
    #[must_use]
    pub const fn device_class(&self) -> DeviceClass {
        self.device
    }

    /// Active tool.
    #[must_use]
    pub const fn tool(&self) -> Tool {
        self.tool
    }

    /// Switch the active tool.
    pub fn set_tool(&mut self, tool: Tool) {
        self.tool = tool;
    }

    /// Width configured for `tool`.
    #[must_use]
    pub const fn size(&self, tool: Tool) -> f32 {
        match tool {
            Tool::Ink => self.ink_size,
            Tool::Erase => self.erase_size,
        }
    }

    /// Allowed width range for `tool` on this device.
    #[must_use]
    pub const fn range(&self, tool: Tool) -> SizeRange {
        SizeRange::for_tool(tool, self.device)
    }

    /// Set the width for `tool`, clamped into its range. Returns the value
    /// actually stored.
    pub fn set_size(&mut self, tool: Tool, size: f32) -> f32 {
        let clamped = self.range(tool).clamp(size);
        if (clamped - size).abs() > f32::EPSILON {
            tracing::debug!(?tool, requested = size, clamped, "size clamped");
        }
        match tool {
            Tool::Ink => self.ink_size = clamped,
            Tool::Erase => self.erase_size = clamped,
        }
        clamped
    }

    /// Snapshot of the active tool and its width.
    #[must_use]
    pub const fn brush(&self) -> Brush {
        Brush {
            tool: self.tool,
            size: self.size(self.tool),
        }
    }
}

impl Default for ToolModel {
    fn default() -> Self {
        Self::new(DeviceClass::Desktop)
    }
}
