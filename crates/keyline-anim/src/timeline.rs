//! The editable timeline document: layers, duration and playhead.

use crate::easing::Easing;
use crate::error::KeyframeError;
use crate::export::{self, ExportFormat, ExportOptions, ExportedFile, FORMAT_VERSION, Snapshot};
use crate::keyframes::Keyframe;
use crate::layer::{Layer, LayerState, create_layer, render_order};
use crate::types::{KeyframeId, LayerId, PropertyKind};

/// Fill colours handed out to new layers in turn.
const LAYER_COLORS: [&str; 6] = [
    "#4f46e5", "#db2777", "#059669", "#d97706", "#0284c7", "#7c3aed",
];

/// Where to move a layer in the stacking order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayerOrdering {
    /// One step towards the viewer.
    InFront,
    /// One step away from the viewer.
    Behind,
    /// Above every other layer.
    ToTop,
    /// Below every other layer.
    ToBottom,
}

/// A timeline document.
#[derive(Debug, Clone, PartialEq)]
pub struct Timeline {
    layers: Vec<Layer>,
    duration: f64,
    current_time: f64,
    is_playing: bool,
}

impl Timeline {
    /// Create an empty timeline. Negative or non-finite durations become 0.
    pub fn new(duration: f64) -> Self {
        Self {
            layers: Vec::new(),
            duration: sanitize_duration(duration),
            current_time: 0.0,
            is_playing: false,
        }
    }

    /// Build a timeline from already validated parts.
    pub fn from_layers(layers: Vec<Layer>, duration: f64) -> Self {
        Self {
            layers,
            ..Self::new(duration)
        }
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn current_time(&self) -> f64 {
        self.current_time
    }

    pub fn is_playing(&self) -> bool {
        self.is_playing
    }

    pub fn set_playing(&mut self, playing: bool) {
        self.is_playing = playing;
    }

    /// Change the duration. Returns `false` for a negative or non-finite value.
    ///
    /// The playhead is pulled back inside the new range.
    pub fn set_duration(&mut self, duration: f64) -> bool {
        if !duration.is_finite() || duration < 0.0 {
            return false;
        }
        self.duration = duration;
        self.current_time = self.current_time.min(duration);
        true
    }

    /// Move the playhead, clamped to `[0, duration]`.
    pub fn seek(&mut self, time: f64) {
        self.current_time = if time.is_nan() {
            0.0
        } else {
            time.clamp(0.0, self.duration)
        };
    }

    /// Add a seeded layer above every existing one.
    pub fn add_layer(&mut self, name: impl Into<String>, color: impl Into<String>) -> LayerId {
        let layer = create_layer(name, self.next_z_index(), color);
        let id = layer.id.clone();
        tracing::debug!(layer = %id, "added layer");
        self.layers.push(layer);
        id
    }

    /// Add a layer named `Layer N` with the next palette colour.
    pub fn add_default_layer(&mut self) -> LayerId {
        let count = self.layers.len();
        let name = format!("Layer {}", count + 1);
        self.add_layer(name, LAYER_COLORS[count % LAYER_COLORS.len()])
    }

    /// Insert an existing layer. Returns `false` if its id is already taken.
    pub fn insert_layer(&mut self, layer: Layer) -> bool {
        if self.layer(&layer.id).is_some() {
            return false;
        }
        self.layers.push(layer);
        true
    }

    pub fn remove_layer(&mut self, id: &LayerId) -> Option<Layer> {
        let index = self.layers.iter().position(|layer| &layer.id == id)?;
        Some(self.layers.remove(index))
    }

    pub fn layer(&self, id: &LayerId) -> Option<&Layer> {
        self.layers.iter().find(|layer| &layer.id == id)
    }

    pub fn layer_mut(&mut self, id: &LayerId) -> Option<&mut Layer> {
        self.layers.iter_mut().find(|layer| &layer.id == id)
    }

    /// Copy a layer with fresh ids for it and all of its keyframes. The copy
    /// is placed above every existing layer.
    pub fn duplicate_layer(&mut self, id: &LayerId) -> Option<LayerId> {
        let mut copy = self.layer(id)?.clone();
        copy.id = LayerId::new();
        copy.name = format!("{} copy", copy.name);
        copy.z_index = self.next_z_index();
        for kind in PropertyKind::ALL {
            for keyframe in &mut copy.property_mut(kind).keyframes {
                keyframe.id = KeyframeId::new();
            }
        }

        let new_id = copy.id.clone();
        self.layers.push(copy);
        Some(new_id)
    }

    /// Restack a layer. Z indices are renumbered `0..n` in the new order.
    ///
    /// Returns `false` when the layer does not exist.
    pub fn order_layer(&mut self, id: &LayerId, ordering: LayerOrdering) -> bool {
        let mut order: Vec<LayerId> = render_order(&self.layers)
            .into_iter()
            .map(|layer| layer.id.clone())
            .collect();
        let Some(index) = order.iter().position(|other| other == id) else {
            return false;
        };

        let target = match ordering {
            LayerOrdering::InFront => (index + 1).min(order.len() - 1),
            LayerOrdering::Behind => index.saturating_sub(1),
            LayerOrdering::ToTop => order.len() - 1,
            LayerOrdering::ToBottom => 0,
        };
        let moved = order.remove(index);
        order.insert(target, moved);

        for layer in &mut self.layers {
            if let Some(z) = order.iter().position(|other| other == &layer.id) {
                layer.z_index = z as i32;
            }
        }
        true
    }

    /// Record the current value of a property as a keyframe at the playhead.
    ///
    /// A keyframe already at the playhead is left untouched and its id is
    /// returned. Returns `None` when the layer does not exist.
    pub fn record_keyframe(
        &mut self,
        layer: &LayerId,
        kind: PropertyKind,
        easing: Easing,
    ) -> Result<Option<KeyframeId>, KeyframeError> {
        let time = self.current_time;
        let Some(layer) = self.layer_mut(layer) else {
            return Ok(None);
        };

        let property = layer.property_mut(kind);
        if let Some(existing) = property.keyframe_at(time) {
            return Ok(Some(existing.id.clone()));
        }

        let value = property.value_at(time);
        let keyframe = Keyframe::new(time, value, easing)?;
        Ok(Some(property.add_keyframe(keyframe)?.id.clone()))
    }

    /// Key `value` for a property at the playhead.
    ///
    /// Updates the value of a keyframe already at the playhead and keeps its
    /// easing, otherwise adds a new keyframe with `easing`. Returns `None` when
    /// the layer does not exist.
    pub fn set_keyframe_value(
        &mut self,
        layer: &LayerId,
        kind: PropertyKind,
        value: f64,
        easing: Easing,
    ) -> Result<Option<KeyframeId>, KeyframeError> {
        let time = self.current_time;
        let Some(layer) = self.layer_mut(layer) else {
            return Ok(None);
        };

        let property = layer.property_mut(kind);
        if let Some(existing) = property.keyframe_at(time).map(|kf| kf.id.clone()) {
            property.set_value(&existing, value)?;
            tracing::debug!(%existing, value, "updated keyframe at playhead");
            return Ok(Some(existing));
        }

        let keyframe = Keyframe::new(time, value, easing)?;
        Ok(Some(property.add_keyframe(keyframe)?.id.clone()))
    }

    /// State of every layer at `time`, in drawing order.
    pub fn state_at(&self, time: f64) -> Vec<(LayerId, LayerState)> {
        render_order(&self.layers)
            .into_iter()
            .map(|layer| (layer.id.clone(), layer.state_at(time)))
            .collect()
    }

    /// State of every layer at the playhead.
    pub fn current_state(&self) -> Vec<(LayerId, LayerState)> {
        self.state_at(self.current_time)
    }

    pub fn export(&self, format: ExportFormat, options: &ExportOptions) -> ExportedFile {
        export::export(format, &self.layers, self.duration, options)
    }

    /// Owned snapshot of this document, stamped with the current time.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            version: FORMAT_VERSION.to_string(),
            duration: self.duration,
            exported_at: Some(chrono::Utc::now()),
            layers: self.layers.clone(),
        }
    }

    fn next_z_index(&self) -> i32 {
        self.layers
            .iter()
            .map(|layer| layer.z_index)
            .max()
            .map_or(0, |z| z.saturating_add(1))
    }
}

impl Default for Timeline {
    fn default() -> Self {
        Self::new(3000.0)
    }
}

impl From<Snapshot> for Timeline {
    fn from(snapshot: Snapshot) -> Self {
        Timeline::from_layers(snapshot.layers, snapshot.duration)
    }
}

fn sanitize_duration(duration: f64) -> f64 {
    if duration.is_finite() && duration > 0.0 {
        duration
    } else {
        0.0
    }
}
