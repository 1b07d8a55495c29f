//! Identifiers and property kinds shared by the keyframe and layer models.
//!
//! - `KeyframeId` / `LayerId`: random, collision-free tokens
//! - `PropertyKind`: the seven animatable attributes of a layer

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Length of generated identifiers.
const ID_LEN: usize = 12;

/// Unique identifier for a keyframe.
///
/// Ids are random tokens, so keyframes created in different sessions (or
/// imported from a snapshot) never collide with freshly generated ones.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeyframeId(pub String);

impl KeyframeId {
    /// Generate a new unique keyframe ID.
    pub fn new() -> Self {
        Self(nanoid::nanoid!(ID_LEN))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for KeyframeId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for KeyframeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for KeyframeId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Unique identifier for a layer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LayerId(pub String);

impl LayerId {
    /// Generate a new unique layer ID.
    pub fn new() -> Self {
        Self(nanoid::nanoid!(ID_LEN))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for LayerId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for LayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for LayerId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// One of the seven independently keyframed attributes of a layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyKind {
    X,
    Y,
    Width,
    Height,
    Opacity,
    Rotation,
    Scale,
}

impl PropertyKind {
    /// Every property, in the order exporters emit them.
    pub const ALL: [PropertyKind; 7] = [
        PropertyKind::X,
        PropertyKind::Y,
        PropertyKind::Width,
        PropertyKind::Height,
        PropertyKind::Opacity,
        PropertyKind::Rotation,
        PropertyKind::Scale,
    ];

    /// Name used in snapshots and generated identifiers.
    pub fn name(self) -> &'static str {
        match self {
            Self::X => "x",
            Self::Y => "y",
            Self::Width => "width",
            Self::Height => "height",
            Self::Opacity => "opacity",
            Self::Rotation => "rotation",
            Self::Scale => "scale",
        }
    }

    /// Value a freshly created layer starts with.
    pub fn default_value(self) -> f64 {
        match self {
            Self::X | Self::Y => 100.0,
            Self::Width | Self::Height => 100.0,
            Self::Opacity => 1.0,
            Self::Rotation => 0.0,
            Self::Scale => 1.0,
        }
    }

    /// Clamp an evaluated value to the range it may be rendered with.
    ///
    /// Width and height never go negative and opacity stays in [0, 1]. The
    /// stored keyframes are left untouched.
    pub fn clamp(self, value: f64) -> f64 {
        match self {
            Self::Width | Self::Height => value.max(0.0),
            Self::Opacity => value.clamp(0.0, 1.0),
            _ => value,
        }
    }

    /// CSS declaration name used by the stylesheet exporter.
    pub fn css_property(self) -> &'static str {
        match self {
            Self::X => "left",
            Self::Y => "top",
            Self::Width => "width",
            Self::Height => "height",
            Self::Opacity => "opacity",
            Self::Rotation => "rotate",
            Self::Scale => "scale",
        }
    }

    /// Unit appended to CSS keyframe values.
    pub fn css_unit(self) -> &'static str {
        match self {
            Self::Opacity => "",
            _ => "px",
        }
    }

    /// SVG attribute targeted by the `<animate>` exporter.
    pub fn svg_attribute(self) -> &'static str {
        match self {
            Self::Rotation => "transform",
            other => other.name(),
        }
    }
}

impl fmt::Display for PropertyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when parsing an unknown property name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown property: {0}")]
pub struct UnknownProperty(pub String);

impl FromStr for PropertyKind {
    type Err = UnknownProperty;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PropertyKind::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownProperty(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_unique() {
        let a = KeyframeId::new();
        let b = KeyframeId::new();
        assert_ne!(a, b);
        assert_eq!(a.as_str().len(), ID_LEN);

        assert_ne!(LayerId::new(), LayerId::new());
    }

    #[test]
    fn test_default_values() {
        assert_eq!(PropertyKind::X.default_value(), 100.0);
        assert_eq!(PropertyKind::Y.default_value(), 100.0);
        assert_eq!(PropertyKind::Width.default_value(), 100.0);
        assert_eq!(PropertyKind::Height.default_value(), 100.0);
        assert_eq!(PropertyKind::Opacity.default_value(), 1.0);
        assert_eq!(PropertyKind::Rotation.default_value(), 0.0);
        assert_eq!(PropertyKind::Scale.default_value(), 1.0);
    }

    #[test]
    fn test_clamp() {
        assert_eq!(PropertyKind::Width.clamp(-5.0), 0.0);
        assert_eq!(PropertyKind::Height.clamp(12.0), 12.0);
        assert_eq!(PropertyKind::Opacity.clamp(1.5), 1.0);
        assert_eq!(PropertyKind::Opacity.clamp(-0.5), 0.0);
        assert_eq!(PropertyKind::X.clamp(-40.0), -40.0);
        assert_eq!(PropertyKind::Rotation.clamp(720.0), 720.0);
    }

    #[test]
    fn test_parse_property() {
        assert_eq!("opacity".parse::<PropertyKind>(), Ok(PropertyKind::Opacity));
        assert_eq!("Width".parse::<PropertyKind>(), Ok(PropertyKind::Width));
        assert!("colour".parse::<PropertyKind>().is_err());
    }

    #[test]
    fn test_svg_attribute() {
        assert_eq!(PropertyKind::Rotation.svg_attribute(), "transform");
        assert_eq!(PropertyKind::Width.svg_attribute(), "width");
        assert_eq!(PropertyKind::Scale.svg_attribute(), "scale");
    }
}
