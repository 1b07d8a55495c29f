//! Versioned JSON snapshots.
//!
//! The snapshot holds the raw keyframe data of every layer, so unlike the CSS
//! and SVG exports it can be read back into an identical layer collection.
//!
//! ```json
//! {
//!   "version": "1.0",
//!   "duration": 3000,
//!   "exportedAt": "2026-01-01T00:00:00Z",
//!   "layers": [
//!     { "id": "...", "name": "Layer 1", "color": "#4f46e5", "zIndex": 0,
//!       "properties": { "x": { "defaultValue": 100, "keyframes": [
//!         { "id": "...", "time": 0, "value": 100, "easing": "linear" } ] }, ... } }
//!   ]
//! }
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::{ExportFormat, ExportedFile};
use crate::error::ImportError;
use crate::layer::Layer;
use crate::timeline::Timeline;

/// Format version written by this exporter.
pub const FORMAT_VERSION: &str = "1.0";

/// Major format version this reader understands.
const SUPPORTED_MAJOR: &str = "1";

/// A decoded snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub version: String,
    pub duration: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exported_at: Option<DateTime<Utc>>,
    pub layers: Vec<Layer>,
}

/// Borrowed view used for writing without cloning the layers.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SnapshotRef<'a> {
    version: &'a str,
    duration: f64,
    exported_at: DateTime<Utc>,
    layers: &'a [Layer],
}

/// Export layers as a JSON snapshot stamped with the current time.
pub fn export_json(layers: &[Layer], duration: f64) -> ExportedFile {
    export_json_at(layers, duration, Utc::now())
}

/// Export layers as a JSON snapshot with an explicit export timestamp.
pub fn export_json_at(layers: &[Layer], duration: f64, exported_at: DateTime<Utc>) -> ExportedFile {
    let snapshot = SnapshotRef {
        version: FORMAT_VERSION,
        duration,
        exported_at,
        layers,
    };

    let content = match serde_json::to_string_pretty(&snapshot) {
        Ok(content) => content,
        Err(error) => {
            tracing::error!(%error, "failed to serialize snapshot");
            String::from("{}")
        }
    };

    ExportedFile::new(ExportFormat::Json, content)
}

/// Read a snapshot written by `export_json`.
///
/// Checks the format version, the duration, layer id uniqueness and every
/// keyframe (time, easing and id uniqueness within its property).
pub fn import_json(content: &str) -> Result<Snapshot, ImportError> {
    let result = serde_json::from_str::<Snapshot>(content)
        .map_err(ImportError::from)
        .and_then(|snapshot| snapshot.validate().map(|()| snapshot));
    if let Err(error) = &result {
        tracing::warn!(%error, "rejected snapshot");
    }
    result
}

impl Snapshot {
    /// Validate a decoded snapshot.
    pub fn validate(&self) -> Result<(), ImportError> {
        let major = self.version.split('.').next().unwrap_or_default();
        if major != SUPPORTED_MAJOR {
            return Err(ImportError::UnsupportedVersion(self.version.clone()));
        }

        if !self.duration.is_finite() || self.duration < 0.0 {
            return Err(ImportError::InvalidDuration(self.duration));
        }

        let mut layer_ids = HashSet::new();
        for layer in &self.layers {
            if !layer_ids.insert(&layer.id) {
                return Err(ImportError::DuplicateLayer(layer.id.clone()));
            }
            for (kind, property) in layer.properties.iter() {
                property
                    .validate()
                    .map_err(|source| ImportError::InvalidKeyframe {
                        layer: layer.id.clone(),
                        property: kind,
                        source,
                    })?;
            }
        }

        Ok(())
    }

    /// Open this snapshot as an editable timeline with the playhead at 0.
    pub fn into_timeline(self) -> Timeline {
        Timeline::from(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::easing::Easing;
    use crate::error::KeyframeError;
    use crate::keyframes::Keyframe;
    use crate::layer::create_layer;
    use crate::types::PropertyKind;
    use chrono::TimeZone;

    fn sample_layers() -> Vec<Layer> {
        let mut first = create_layer("First", 2, "#112233");
        first
            .property_mut(PropertyKind::X)
            .add_keyframe(Keyframe::new(1500.0, 320.5, Easing::EASE_IN_OUT).unwrap())
            .unwrap();
        first
            .property_mut(PropertyKind::Opacity)
            .add_keyframe(
                Keyframe::new(750.0, 0.25, Easing::cubic_bezier(0.1, 0.7, 0.3, 1.0).unwrap())
                    .unwrap(),
            )
            .unwrap();
        let second = create_layer("Second", 1, "rgba(0, 0, 0, 0.5)");
        vec![first, second]
    }

    #[test]
    fn test_snapshot_shape() {
        let layers = sample_layers();
        let at = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
        let file = export_json_at(&layers, 3000.0, at);
        assert_eq!(file.extension, "json");
        assert_eq!(file.mime_type, "application/json");

        let value: serde_json::Value = serde_json::from_str(&file.content).unwrap();
        assert_eq!(value["version"], "1.0");
        assert_eq!(value["duration"], 3000.0);
        let stamp: DateTime<Utc> = value["exportedAt"].as_str().unwrap().parse().unwrap();
        assert_eq!(stamp, at);
        assert_eq!(value["layers"][0]["name"], "First");
        assert_eq!(value["layers"][0]["zIndex"], 2);
        assert_eq!(value["layers"][0]["properties"]["x"]["defaultValue"], 100.0);
        assert_eq!(
            value["layers"][0]["properties"]["x"]["keyframes"][1]["easing"],
            "ease-in-out"
        );
        assert_eq!(
            value["layers"][0]["properties"]["opacity"]["keyframes"][1]["easing"],
            serde_json::json!([0.1, 0.7, 0.3, 1.0])
        );
    }

    #[test]
    fn test_round_trip() {
        let layers = sample_layers();
        let content = export_json(&layers, 4200.0).content;
        let snapshot = import_json(&content).unwrap();

        assert_eq!(snapshot.version, FORMAT_VERSION);
        assert_eq!(snapshot.duration, 4200.0);
        assert_eq!(snapshot.layers, layers);
        assert!(snapshot.exported_at.is_some());
    }

    #[test]
    fn test_rejects_unknown_version() {
        let content = r#"{"version": "2.0", "duration": 1000, "layers": []}"#;
        assert!(matches!(
            import_json(content),
            Err(ImportError::UnsupportedVersion(v)) if v == "2.0"
        ));

        let content = r#"{"version": "1.3", "duration": 1000, "layers": []}"#;
        assert!(import_json(content).is_ok());
    }

    #[test]
    fn test_rejects_malformed_json() {
        assert!(matches!(import_json("{not json"), Err(ImportError::Json(_))));
        assert!(matches!(
            import_json(r#"{"version": "1.0", "duration": -5, "layers": []}"#),
            Err(ImportError::InvalidDuration(_))
        ));
    }

    #[test]
    fn test_rejects_invalid_keyframes() {
        let mut layers = sample_layers();
        layers[0].property_mut(PropertyKind::Y).keyframes[0].time = -10.0;
        let content = export_json(&layers, 1000.0).content;

        match import_json(&content) {
            Err(ImportError::InvalidKeyframe {
                layer,
                property,
                source,
            }) => {
                assert_eq!(layer, layers[0].id);
                assert_eq!(property, PropertyKind::Y);
                assert_eq!(source, KeyframeError::NegativeTime(-10.0));
            }
            other => panic!("expected invalid keyframe, got {:?}", other),
        }
    }

    #[test]
    fn test_rejects_non_finite_values() {
        let mut layers = sample_layers();
        layers[1].property_mut(PropertyKind::Scale).default_value = f64::INFINITY;
        let snapshot = Snapshot {
            version: FORMAT_VERSION.to_string(),
            duration: 1000.0,
            exported_at: None,
            layers: layers.clone(),
        };
        match snapshot.validate() {
            Err(ImportError::InvalidKeyframe {
                property, source, ..
            }) => {
                assert_eq!(property, PropertyKind::Scale);
                assert_eq!(source, KeyframeError::NonFiniteValue(f64::INFINITY));
            }
            other => panic!("expected non-finite default, got {:?}", other),
        }

        layers[1].property_mut(PropertyKind::Scale).default_value = 1.0;
        layers[1].property_mut(PropertyKind::X).keyframes[0].value = f64::NEG_INFINITY;
        let snapshot = Snapshot { layers, ..snapshot };
        assert!(matches!(
            snapshot.validate(),
            Err(ImportError::InvalidKeyframe {
                property: PropertyKind::X,
                source: KeyframeError::NonFiniteValue(_),
                ..
            })
        ));
    }

    #[test]
    fn test_rejects_duplicate_layers() {
        let mut layers = sample_layers();
        layers[1].id = layers[0].id.clone();
        let content = export_json(&layers, 1000.0).content;
        assert!(matches!(import_json(&content), Err(ImportError::DuplicateLayer(_))));
    }
}
