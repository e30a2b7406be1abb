//! Bitmap export to image files and data URLs.
//!
//! Downloads keep the bitmap's alpha so erased regions stay transparent.
//! The recognition payload is flattened onto opaque white first.

use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use base64::Engine as _;

use crate::bitmap::Bitmap;
use crate::error::{RenderError, RenderResult};

/// Export output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// PNG image.
    Png,
    /// JPEG image (always opaque).
    Jpeg,
}

impl ExportFormat {
    /// File extension without the dot.
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpg",
        }
    }

    /// MIME type.
    #[must_use]
    pub const fn mime_type(self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
        }
    }
}

/// How transparent pixels are treated on export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Background {
    /// Keep the alpha channel as rendered.
    PreserveAlpha,
    /// Composite onto an opaque RGB color.
    Opaque([u8; 3]),
}

impl Background {
    /// Opaque white.
    pub const WHITE: Self = Self::Opaque([255, 255, 255]);
}

/// Configuration for bitmap export.
#[derive(Debug, Clone)]
pub struct ExportConfig {
    /// Background handling.
    pub background: Background,
    /// JPEG quality 1-100 (default: 85).
    pub jpeg_quality: u8,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            background: Background::PreserveAlpha,
            jpeg_quality: 85,
        }
    }
}

/// Encodes bitmaps to image bytes, data URLs, and files.
#[derive(Debug, Clone, Default)]
pub struct BitmapExporter {
    config: ExportConfig,
}

impl BitmapExporter {
    /// Create a new exporter with the given configuration.
    #[must_use]
    pub const fn new(config: ExportConfig) -> Self {
        Self { config }
    }

    /// Create an exporter with default configuration.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::default()
    }

    /// Exporter for the recognition payload: PNG on opaque white.
    #[must_use]
    pub fn for_recognition() -> Self {
        Self::new(ExportConfig {
            background: Background::WHITE,
            ..ExportConfig::default()
        })
    }

    /// Get the export configuration.
    #[must_use]
    pub const fn config(&self) -> &ExportConfig {
        &self.config
    }

    /// Encode a bitmap in the given format.
    ///
    /// # Errors
    ///
    /// Returns an error if encoding fails or the format is not compiled in.
    pub fn export(&self, bitmap: &Bitmap, format: ExportFormat) -> RenderResult<Vec<u8>> {
        match format {
            ExportFormat::Png => self.encode_png(bitmap),
            ExportFormat::Jpeg => self.encode_jpeg(bitmap),
        }
    }

    /// Encode a bitmap as PNG bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if encoding fails.
    pub fn encode_png(&self, bitmap: &Bitmap) -> RenderResult<Vec<u8>> {
        let encoded = match self.config.background {
            Background::PreserveAlpha => bitmap.pixmap().encode_png(),
            Background::Opaque(rgb) => bitmap.flatten(rgb)?.pixmap().encode_png(),
        };
        encoded.map_err(|e| RenderError::Export(format!("PNG encoding failed: {e}")))
    }

    /// Encode a bitmap as JPEG bytes.
    ///
    /// JPEG has no alpha channel, so transparent pixels are always flattened;
    /// [`Background::PreserveAlpha`] falls back to white.
    ///
    /// # Errors
    ///
    /// Returns an error if encoding fails.
    #[cfg(feature = "jpeg")]
    pub fn encode_jpeg(&self, bitmap: &Bitmap) -> RenderResult<Vec<u8>> {
        use image::ImageEncoder;

        let rgb = match self.config.background {
            Background::PreserveAlpha => [255, 255, 255],
            Background::Opaque(rgb) => rgb,
        };
        let flat = bitmap.flatten(rgb)?;
        let (width, height) = (flat.width(), flat.height());

        // Opaque pixels are identical premultiplied or not.
        let rgb_data: Vec<u8> = flat
            .data()
            .chunks_exact(4)
            .flat_map(|px| [px[0], px[1], px[2]])
            .collect();

        let mut buf = std::io::Cursor::new(Vec::new());
        let encoder =
            image::codecs::jpeg::JpegEncoder::new_with_quality(&mut buf, self.config.jpeg_quality);
        encoder
            .write_image(&rgb_data, width, height, image::ColorType::Rgb8.into())
            .map_err(|e| RenderError::Export(format!("JPEG encoding failed: {e}")))?;

        Ok(buf.into_inner())
    }

    /// JPEG support is not compiled in.
    ///
    /// # Errors
    ///
    /// Always returns [`RenderError::Unsupported`].
    #[cfg(not(feature = "jpeg"))]
    pub fn encode_jpeg(&self, _bitmap: &Bitmap) -> RenderResult<Vec<u8>> {
        Err(RenderError::Unsupported("jpeg"))
    }

    /// Encode a bitmap as a base64 PNG data URL (`data:image/png;base64,...`).
    ///
    /// # Errors
    ///
    /// Returns an error if encoding fails.
    pub fn to_data_url(&self, bitmap: &Bitmap) -> RenderResult<String> {
        let png = self.encode_png(bitmap)?;
        let encoded = base64::engine::general_purpose::STANDARD.encode(png);
        Ok(format!("data:{};base64,{encoded}", ExportFormat::Png.mime_type()))
    }

    /// Write a bitmap into `dir` under a timestamped `drawing_<millis>` name.
    ///
    /// # Errors
    ///
    /// Returns an error if encoding or writing fails.
    pub fn write_to_dir(
        &self,
        bitmap: &Bitmap,
        dir: &Path,
        format: ExportFormat,
    ) -> RenderResult<PathBuf> {
        let bytes = self.export(bitmap, format)?;
        let path = dir.join(timestamped_file_name(format));
        std::fs::write(&path, &bytes)?;
        tracing::info!(path = %path.display(), bytes = bytes.len(), "Exported drawing");
        Ok(path)
    }
}

/// File name for an export taken at `timestamp_ms` since the Unix epoch.
#[must_use]
pub fn export_file_name(format: ExportFormat, timestamp_ms: u128) -> String {
    format!("drawing_{timestamp_ms}.{}", format.extension())
}

/// File name for an export taken now.
#[must_use]
pub fn timestamped_file_name(format: ExportFormat) -> String {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default();
    export_file_name(format, now)
}
