//! Keyframe animation core for the Keyline editor.
//!
//! This crate provides:
//! - **Keyframe model**: keyframes and animated properties with validated edits
//! - **Evaluator**: the value of any property at any time, with easing
//! - **Layers**: seven animated attributes per layer, drawn in z order
//! - **Exporters**: CSS `@keyframes`, sampled SVG `<animate>` and JSON snapshots
//! - **Playback**: a host-agnostic driver that loops the timeline
//!
//! # Architecture
//!
//! ```text
//! Timeline
//!   └── Layer (z_index, colour)
//!         └── AnimatedProperty × 7 (x, y, width, height, opacity, rotation, scale)
//!               └── Keyframe (time, value, easing)
//!
//! evaluate(property, time) ← PlaybackDriver (live preview)
//!                          ← export_css / export_svg / export_json
//! ```

pub mod easing;
pub mod error;
pub mod export;
pub mod keyframes;
pub mod layer;
pub mod playback;
pub mod timeline;
pub mod types;

pub use easing::{Easing, NamedEasing};
pub use error::{ImportError, KeyframeError, PlaybackError};
pub use export::{
    CssOptions, ExportFormat, ExportOptions, ExportedFile, FORMAT_VERSION, Snapshot, SvgOptions,
    UnknownFormat, export, export_css, export_css_with, export_json, export_json_at,
    export_svg, export_svg_with, import_json,
};
pub use keyframes::{AnimatedProperty, Keyframe, evaluate};
pub use layer::{Layer, LayerProperties, LayerState, create_layer, layer_state, render_order};
pub use playback::{
    FrameCallback, LoopClock, ManualTicker, PlaybackDriver, TickHandle, Ticker, loop_time,
};
pub use timeline::{LayerOrdering, Timeline};
pub use types::{KeyframeId, LayerId, PropertyKind, UnknownProperty};
