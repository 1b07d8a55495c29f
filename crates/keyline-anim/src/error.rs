//! Error types for the animation core.

use thiserror::Error;

use crate::types::{KeyframeId, LayerId, PropertyKind};

/// Errors raised when constructing or editing keyframes.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum KeyframeError {
    /// Keyframe time is below zero.
    #[error("keyframe time must be non-negative, got {0}ms")]
    NegativeTime(f64),

    /// Keyframe time is NaN or infinite.
    #[error("keyframe time must be finite, got {0}")]
    NonFiniteTime(f64),

    /// Keyframe or default value is NaN or infinite.
    #[error("property value must be finite, got {0}")]
    NonFiniteValue(f64),

    /// A cubic bezier control coordinate is outside [0, 1].
    #[error("bezier control point {index} must be in [0, 1], got {value}")]
    ControlPointOutOfRange { index: usize, value: f64 },

    /// A keyframe with this id already exists in the property.
    #[error("duplicate keyframe id: {0}")]
    DuplicateId(KeyframeId),
}

/// Errors raised when reading a JSON snapshot.
#[derive(Error, Debug)]
pub enum ImportError {
    /// The content is not valid snapshot JSON.
    #[error("malformed snapshot: {0}")]
    Json(#[from] serde_json::Error),

    /// The snapshot was written by an incompatible format version.
    #[error("unsupported snapshot version: {0}")]
    UnsupportedVersion(String),

    /// Snapshot duration is negative or not a number.
    #[error("invalid snapshot duration: {0}")]
    InvalidDuration(f64),

    /// Two layers share an id.
    #[error("duplicate layer id: {0}")]
    DuplicateLayer(LayerId),

    /// A keyframe failed validation.
    #[error("layer {layer} property {property}: {source}")]
    InvalidKeyframe {
        layer: LayerId,
        property: PropertyKind,
        #[source]
        source: KeyframeError,
    },
}

/// Errors raised by the playback driver.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlaybackError {
    /// Playback needs a positive, finite loop duration.
    #[error("playback duration must be positive and finite, got {0}ms")]
    InvalidDuration(f64),
}
