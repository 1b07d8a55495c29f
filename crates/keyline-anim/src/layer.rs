//! Layers: named, z-ordered units with seven animated attributes.

use serde::{Deserialize, Serialize};

use crate::keyframes::{AnimatedProperty, evaluate};
use crate::types::{LayerId, PropertyKind};

/// The seven independently keyframed attributes of a layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerProperties {
    pub x: AnimatedProperty,
    pub y: AnimatedProperty,
    pub width: AnimatedProperty,
    pub height: AnimatedProperty,
    pub opacity: AnimatedProperty,
    pub rotation: AnimatedProperty,
    pub scale: AnimatedProperty,
}

impl LayerProperties {
    /// Every property seeded with one keyframe at time 0 holding its default.
    pub fn seeded() -> Self {
        Self {
            x: AnimatedProperty::seeded(PropertyKind::X.default_value()),
            y: AnimatedProperty::seeded(PropertyKind::Y.default_value()),
            width: AnimatedProperty::seeded(PropertyKind::Width.default_value()),
            height: AnimatedProperty::seeded(PropertyKind::Height.default_value()),
            opacity: AnimatedProperty::seeded(PropertyKind::Opacity.default_value()),
            rotation: AnimatedProperty::seeded(PropertyKind::Rotation.default_value()),
            scale: AnimatedProperty::seeded(PropertyKind::Scale.default_value()),
        }
    }

    pub fn get(&self, kind: PropertyKind) -> &AnimatedProperty {
        match kind {
            PropertyKind::X => &self.x,
            PropertyKind::Y => &self.y,
            PropertyKind::Width => &self.width,
            PropertyKind::Height => &self.height,
            PropertyKind::Opacity => &self.opacity,
            PropertyKind::Rotation => &self.rotation,
            PropertyKind::Scale => &self.scale,
        }
    }

    pub fn get_mut(&mut self, kind: PropertyKind) -> &mut AnimatedProperty {
        match kind {
            PropertyKind::X => &mut self.x,
            PropertyKind::Y => &mut self.y,
            PropertyKind::Width => &mut self.width,
            PropertyKind::Height => &mut self.height,
            PropertyKind::Opacity => &mut self.opacity,
            PropertyKind::Rotation => &mut self.rotation,
            PropertyKind::Scale => &mut self.scale,
        }
    }

    /// Iterate over (kind, property) pairs in export order.
    pub fn iter(&self) -> impl Iterator<Item = (PropertyKind, &AnimatedProperty)> {
        PropertyKind::ALL.into_iter().map(move |kind| (kind, self.get(kind)))
    }
}

/// A named visual unit on the timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Layer {
    pub id: LayerId,
    /// Display name only.
    pub name: String,
    /// Fill colour as a CSS colour string.
    pub color: String,
    /// Stacking order; lower values are drawn first.
    pub z_index: i32,
    pub properties: LayerProperties,
}

/// Create a layer with every property seeded at its default value.
pub fn create_layer(name: impl Into<String>, z_index: i32, color: impl Into<String>) -> Layer {
    Layer {
        id: LayerId::new(),
        name: name.into(),
        color: color.into(),
        z_index,
        properties: LayerProperties::seeded(),
    }
}

impl Layer {
    pub fn property(&self, kind: PropertyKind) -> &AnimatedProperty {
        self.properties.get(kind)
    }

    pub fn property_mut(&mut self, kind: PropertyKind) -> &mut AnimatedProperty {
        self.properties.get_mut(kind)
    }

    /// Evaluated and clamped value of one property.
    pub fn value_at(&self, kind: PropertyKind, time: f64) -> f64 {
        kind.clamp(evaluate(self.property(kind), time))
    }

    /// Evaluated state of the whole layer.
    pub fn state_at(&self, time: f64) -> LayerState {
        layer_state(self, time)
    }

    /// Whether any property has at least one keyframe.
    pub fn is_animated(&self) -> bool {
        self.properties.iter().any(|(_, property)| property.is_animated())
    }
}

/// The renderable state of a layer at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayerState {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub opacity: f64,
    pub rotation: f64,
    pub scale: f64,
}

impl LayerState {
    pub fn get(&self, kind: PropertyKind) -> f64 {
        match kind {
            PropertyKind::X => self.x,
            PropertyKind::Y => self.y,
            PropertyKind::Width => self.width,
            PropertyKind::Height => self.height,
            PropertyKind::Opacity => self.opacity,
            PropertyKind::Rotation => self.rotation,
            PropertyKind::Scale => self.scale,
        }
    }

    /// Centre of the layer's box.
    pub fn center(&self) -> (f64, f64) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

/// Evaluate every property of a layer at the given time.
///
/// Width and height are clamped to be non-negative and opacity to [0, 1].
pub fn layer_state(layer: &Layer, time: f64) -> LayerState {
    LayerState {
        x: layer.value_at(PropertyKind::X, time),
        y: layer.value_at(PropertyKind::Y, time),
        width: layer.value_at(PropertyKind::Width, time),
        height: layer.value_at(PropertyKind::Height, time),
        opacity: layer.value_at(PropertyKind::Opacity, time),
        rotation: layer.value_at(PropertyKind::Rotation, time),
        scale: layer.value_at(PropertyKind::Scale, time),
    }
}

/// Layers in drawing order: ascending z-index, ties in collection order.
pub fn render_order(layers: &[Layer]) -> Vec<&Layer> {
    let mut ordered: Vec<&Layer> = layers.iter().collect();
    ordered.sort_by_key(|layer| layer.z_index);
    ordered
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::easing::Easing;
    use crate::keyframes::Keyframe;

    #[test]
    fn test_create_layer_defaults() {
        let layer = create_layer("Box", 3, "#ff0000");
        assert_eq!(layer.name, "Box");
        assert_eq!(layer.z_index, 3);
        assert_eq!(layer.color, "#ff0000");

        for (kind, property) in layer.properties.iter() {
            assert_eq!(property.keyframes.len(), 1, "{} should be seeded", kind);
            assert_eq!(property.keyframes[0].time, 0.0);
            assert_eq!(property.keyframes[0].value, kind.default_value());
            assert_eq!(property.default_value, kind.default_value());
        }

        let state = layer_state(&layer, 0.0);
        assert_eq!(
            state,
            LayerState {
                x: 100.0,
                y: 100.0,
                width: 100.0,
                height: 100.0,
                opacity: 1.0,
                rotation: 0.0,
                scale: 1.0,
            }
        );
    }

    #[test]
    fn test_layer_ids_are_unique() {
        let a = create_layer("A", 0, "red");
        let b = create_layer("B", 0, "red");
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_state_is_clamped() {
        let mut layer = create_layer("Shrink", 0, "blue");
        layer
            .property_mut(PropertyKind::Width)
            .add_keyframe(Keyframe::new(1000.0, -100.0, Easing::LINEAR).unwrap())
            .unwrap();
        layer
            .property_mut(PropertyKind::Opacity)
            .add_keyframe(Keyframe::new(1000.0, 3.0, Easing::LINEAR).unwrap())
            .unwrap();

        let state = layer_state(&layer, 1000.0);
        assert_eq!(state.width, 0.0);
        assert_eq!(state.opacity, 1.0);

        // Halfway the raw values are 0 and 2
        let state = layer_state(&layer, 500.0);
        assert_eq!(state.width, 0.0);
        assert_eq!(state.opacity, 1.0);

        // Stored keyframes are untouched
        assert_eq!(layer.property(PropertyKind::Width).keyframes[1].value, -100.0);
    }

    #[test]
    fn test_render_order_is_stable() {
        let back = create_layer("back", 0, "red");
        let front = create_layer("front", 5, "red");
        let tie_a = create_layer("tie a", 2, "red");
        let tie_b = create_layer("tie b", 2, "red");
        let layers = vec![front, tie_a, back, tie_b];

        let names: Vec<&str> = render_order(&layers).iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, vec!["back", "tie a", "tie b", "front"]);
    }

    #[test]
    fn test_layer_without_keyframes_is_not_animated() {
        let mut layer = create_layer("Static", 0, "red");
        assert!(layer.is_animated());
        for kind in PropertyKind::ALL {
            layer.property_mut(kind).keyframes.clear();
        }
        assert!(!layer.is_animated());
        assert_eq!(layer.state_at(500.0).x, 100.0);
    }
}
