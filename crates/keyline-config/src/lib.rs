//! Keyline configuration system
//!
//! Settings are read from `keyline.toml` and can be overridden with
//! `KEYLINE_*` environment variables.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Name of the configuration file looked up in the working directory.
pub const CONFIG_FILE: &str = "keyline.toml";

/// Errors raised while loading a configuration file.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Main configuration structure for Keyline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct KeylineConfig {
    /// New timeline settings
    pub timeline: TimelineConfig,
    /// Exporter settings
    pub export: ExportConfig,
    /// Log output settings
    pub logging: LoggingConfig,
    /// Preview playback settings
    pub playback: PlaybackConfig,
}

/// New timeline configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimelineConfig {
    /// Duration of newly created timelines in milliseconds
    pub default_duration_ms: f64,
}

/// Exporter configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Number of SVG sampling intervals (samples = steps + 1)
    pub svg_steps: usize,
    /// SVG canvas width
    pub svg_width: f64,
    /// SVG canvas height
    pub svg_height: f64,
    /// Write keyframe easing into CSS as `animation-timing-function`
    pub css_timing_functions: bool,
    /// Directory exports are written to when no explicit path is given
    pub output_dir: Option<PathBuf>,
}

/// Log output configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default log filter, e.g. "info" or "keyline_anim=debug". `RUST_LOG` wins.
    pub filter: String,
}

/// Preview playback configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    /// Frames per second of the terminal preview
    pub fps: u32,
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self {
            default_duration_ms: 3000.0,
        }
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            svg_steps: 30,
            svg_width: 800.0,
            svg_height: 600.0,
            css_timing_functions: false,
            output_dir: None,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
        }
    }
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self { fps: 60 }
    }
}

fn parse_flag(val: &str) -> bool {
    val == "1" || val.eq_ignore_ascii_case("true")
}

impl KeylineConfig {
    /// Load configuration from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load `keyline.toml` from the current directory, or the defaults if it
    /// is missing or invalid
    pub fn load_or_default() -> Self {
        match Self::load_from_file(CONFIG_FILE) {
            Ok(config) => config,
            Err(ConfigError::Read { .. }) => Self::default(),
            Err(err) => {
                eprintln!("Ignoring {}: {}", CONFIG_FILE, err);
                Self::default()
            }
        }
    }

    /// Merge configuration with environment variables
    ///
    /// Environment variables take precedence over configuration file values.
    /// Values that fail to parse are ignored.
    pub fn merge_with_env(&mut self) {
        if let Ok(val) = std::env::var("KEYLINE_DURATION") {
            if let Ok(duration) = val.parse::<f64>() {
                self.timeline.default_duration_ms = duration;
            }
        }

        if let Ok(val) = std::env::var("KEYLINE_SVG_STEPS") {
            if let Ok(steps) = val.parse::<usize>() {
                self.export.svg_steps = steps;
            }
        }
        if let Ok(val) = std::env::var("KEYLINE_SVG_WIDTH") {
            if let Ok(width) = val.parse::<f64>() {
                self.export.svg_width = width;
            }
        }
        if let Ok(val) = std::env::var("KEYLINE_SVG_HEIGHT") {
            if let Ok(height) = val.parse::<f64>() {
                self.export.svg_height = height;
            }
        }
        if let Ok(val) = std::env::var("KEYLINE_CSS_TIMING") {
            self.export.css_timing_functions = parse_flag(&val);
        }
        if let Ok(dir) = std::env::var("KEYLINE_OUTPUT_DIR") {
            self.export.output_dir = Some(PathBuf::from(dir));
        }

        if let Ok(filter) = std::env::var("KEYLINE_LOG") {
            self.logging.filter = filter;
        }

        if let Ok(val) = std::env::var("KEYLINE_FPS") {
            if let Ok(fps) = val.parse::<u32>() {
                self.playback.fps = fps;
            }
        }
    }

    /// Load configuration with environment variable overrides
    ///
    /// 1. Load from keyline.toml (or use defaults if not found)
    /// 2. Override with environment variables if present
    pub fn load() -> Self {
        let mut config = Self::load_or_default();
        config.merge_with_env();
        config
    }
}
