//! Exporters that turn a layer collection into a self-contained text artifact.
//!
//! All exporters share one contract: they take the layers and the timeline
//! duration, never mutate them, never perform I/O, and never fail. Writing the
//! result to disk or the clipboard is left to the caller.
//!
//! - `css`: `@keyframes` blocks with percentage stops (lossy)
//! - `svg`: `<animate>` elements built by dense sampling (lossy)
//! - `json`: versioned snapshot that round-trips exactly

pub mod css;
pub mod json;
pub mod svg;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::layer::Layer;

pub use css::{CssOptions, export_css, export_css_with};
pub use json::{FORMAT_VERSION, Snapshot, export_json, export_json_at, import_json};
pub use svg::{DEFAULT_SVG_STEPS, SvgOptions, export_svg, export_svg_with};

/// Target format of an export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportFormat {
    Css,
    Svg,
    Json,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 3] = [ExportFormat::Css, ExportFormat::Svg, ExportFormat::Json];

    pub fn extension(self) -> &'static str {
        match self {
            Self::Css => "css",
            Self::Svg => "svg",
            Self::Json => "json",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            Self::Css => "text/css",
            Self::Svg => "image/svg+xml",
            Self::Json => "application/json",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Error returned when parsing an unknown export format.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown export format: {0} (expected css, svg or json)")]
pub struct UnknownFormat(pub String);

impl FromStr for ExportFormat {
    type Err = UnknownFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ExportFormat::ALL
            .into_iter()
            .find(|format| format.extension().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownFormat(s.to_string()))
    }
}

/// An in-memory export result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedFile {
    pub content: String,
    pub extension: &'static str,
    pub mime_type: &'static str,
}

impl ExportedFile {
    pub(crate) fn new(format: ExportFormat, content: String) -> Self {
        Self {
            content,
            extension: format.extension(),
            mime_type: format.mime_type(),
        }
    }

    /// File name for this export with the given stem, e.g. `animation.css`.
    pub fn file_name(&self, stem: &str) -> String {
        format!("{}.{}", stem, self.extension)
    }
}

/// Per-format export settings.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ExportOptions {
    pub css: CssOptions,
    pub svg: SvgOptions,
}

/// Export layers in the given format.
pub fn export(
    format: ExportFormat,
    layers: &[Layer],
    duration: f64,
    options: &ExportOptions,
) -> ExportedFile {
    let file = match format {
        ExportFormat::Css => export_css_with(layers, duration, &options.css),
        ExportFormat::Svg => export_svg_with(layers, duration, &options.svg),
        ExportFormat::Json => export_json(layers, duration),
    };
    tracing::debug!(
        kind = %format,
        layers = layers.len(),
        bytes = file.content.len(),
        "exported animation"
    );
    file
}

/// Format a number the way the exporters print values.
///
/// Integral values print without a fractional part, negative zero prints as
/// `0` and non-finite values degrade to `0`.
pub(crate) fn format_number(value: f64) -> String {
    if !value.is_finite() || value == 0.0 {
        return "0".to_string();
    }
    format!("{}", value)
}

/// Identifier usable as a CSS class, keyframes name or XML id.
pub(crate) fn layer_ident(layer: &Layer) -> String {
    let sanitized: String = layer
        .id
        .as_str()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '-' })
        .collect();
    format!("layer-{}", sanitized)
}

/// Escape text for use in XML attributes and content.
pub(crate) fn escape_xml(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Make text safe inside a `/* ... */` comment.
pub(crate) fn escape_css_comment(text: &str) -> String {
    text.replace("*/", "* /")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layer::create_layer;
    use crate::types::LayerId;

    #[test]
    fn test_format_metadata() {
        assert_eq!(ExportFormat::Css.extension(), "css");
        assert_eq!(ExportFormat::Css.mime_type(), "text/css");
        assert_eq!(ExportFormat::Svg.extension(), "svg");
        assert_eq!(ExportFormat::Svg.mime_type(), "image/svg+xml");
        assert_eq!(ExportFormat::Json.extension(), "json");
        assert_eq!(ExportFormat::Json.mime_type(), "application/json");
    }

    #[test]
    fn test_parse_format() {
        assert_eq!("css".parse::<ExportFormat>(), Ok(ExportFormat::Css));
        assert_eq!("SVG".parse::<ExportFormat>(), Ok(ExportFormat::Svg));
        assert!("gif".parse::<ExportFormat>().is_err());
    }

    #[test]
    fn test_dispatch_matches_format() {
        let layers = vec![create_layer("Layer 1", 0, "#336699")];
        for format in ExportFormat::ALL {
            let file = export(format, &layers, 1000.0, &ExportOptions::default());
            assert_eq!(file.extension, format.extension());
            assert_eq!(file.mime_type, format.mime_type());
            assert!(!file.content.is_empty());
            assert_eq!(file.file_name("animation"), format!("animation.{}", format));
        }
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(100.0), "100");
        assert_eq!(format_number(0.5), "0.5");
        assert_eq!(format_number(-0.0), "0");
        assert_eq!(format_number(-12.25), "-12.25");
        assert_eq!(format_number(f64::NAN), "0");
    }

    #[test]
    fn test_layer_ident_is_sanitized() {
        let mut layer = create_layer("x", 0, "red");
        layer.id = LayerId::from("a b/c_d-1");
        assert_eq!(layer_ident(&layer), "layer-a-b-c_d-1");
    }

    #[test]
    fn test_escape_xml() {
        assert_eq!(escape_xml("<a & \"b\">"), "&lt;a &amp; &quot;b&quot;&gt;");
    }
}
