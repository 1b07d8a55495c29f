//! Keyframes, animated properties and the time evaluator.
//!
//! This module provides:
//! - `Keyframe`: a (time, value, easing) anchor on the timeline
//! - `AnimatedProperty`: the keyframes of one numeric attribute plus a fallback
//! - `evaluate`: the value of a property at an arbitrary time
//!
//! Keyframes are stored in whatever order the editor produced them. Every
//! consumer sorts by time (stable, ties keep storage order) before use.
//!
//! # Example
//!
//! ```
//! use keyline_anim::{evaluate, AnimatedProperty, Easing, Keyframe};
//!
//! let mut opacity = AnimatedProperty::new(1.0);
//! opacity.add_keyframe(Keyframe::new(0.0, 0.0, Easing::LINEAR).unwrap()).unwrap();
//! opacity.add_keyframe(Keyframe::new(1000.0, 1.0, Easing::LINEAR).unwrap()).unwrap();
//!
//! assert_eq!(evaluate(&opacity, 500.0), 0.5);
//! ```

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::easing::Easing;
use crate::error::KeyframeError;
use crate::types::KeyframeId;

/// A single anchor point of an animated property.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Keyframe {
    pub id: KeyframeId,
    /// Offset from the timeline start in milliseconds.
    pub time: f64,
    pub value: f64,
    /// Easing of the segment from this keyframe to the next one.
    #[serde(default)]
    pub easing: Easing,
}

impl Keyframe {
    /// Create a validated keyframe with a fresh id.
    pub fn new(time: f64, value: f64, easing: Easing) -> Result<Self, KeyframeError> {
        Self::with_id(KeyframeId::new(), time, value, easing)
    }

    /// Create a validated keyframe with an existing id.
    pub fn with_id(
        id: KeyframeId,
        time: f64,
        value: f64,
        easing: Easing,
    ) -> Result<Self, KeyframeError> {
        let keyframe = Self {
            id,
            time,
            value,
            easing,
        };
        keyframe.validate()?;
        Ok(keyframe)
    }

    /// Check the time, value and easing of this keyframe.
    pub fn validate(&self) -> Result<(), KeyframeError> {
        validate_time(self.time)?;
        validate_value(self.value)?;
        self.easing.validate()
    }
}

fn validate_time(time: f64) -> Result<(), KeyframeError> {
    if !time.is_finite() {
        return Err(KeyframeError::NonFiniteTime(time));
    }
    if time < 0.0 {
        return Err(KeyframeError::NegativeTime(time));
    }
    Ok(())
}

fn validate_value(value: f64) -> Result<(), KeyframeError> {
    if !value.is_finite() {
        return Err(KeyframeError::NonFiniteValue(value));
    }
    Ok(())
}

/// The keyframes of one numeric attribute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnimatedProperty {
    /// Value used when there are no keyframes.
    pub default_value: f64,
    /// Keyframes in storage order; see `sorted_keyframes` for time order.
    #[serde(default)]
    pub keyframes: Vec<Keyframe>,
}

impl AnimatedProperty {
    /// Create a property with no keyframes.
    pub fn new(default_value: f64) -> Self {
        Self {
            default_value,
            keyframes: Vec::new(),
        }
    }

    /// Create a property holding one linear keyframe at time 0.
    pub fn seeded(value: f64) -> Self {
        Self {
            default_value: value,
            keyframes: vec![Keyframe {
                id: KeyframeId::new(),
                time: 0.0,
                value,
                easing: Easing::LINEAR,
            }],
        }
    }

    /// Whether at least one keyframe exists.
    pub fn is_animated(&self) -> bool {
        !self.keyframes.is_empty()
    }

    /// Keyframes ordered by time. Ties keep their storage order.
    pub fn sorted_keyframes(&self) -> Vec<&Keyframe> {
        let mut sorted: Vec<&Keyframe> = self.keyframes.iter().collect();
        sorted.sort_by(|a, b| compare_time(a.time, b.time));
        sorted
    }

    /// Value of this property at the given time.
    pub fn value_at(&self, time: f64) -> f64 {
        evaluate(self, time)
    }

    /// Add a keyframe. Fails if it is invalid or a keyframe with the same id
    /// exists.
    pub fn add_keyframe(&mut self, keyframe: Keyframe) -> Result<&Keyframe, KeyframeError> {
        keyframe.validate()?;
        if self.keyframe(&keyframe.id).is_some() {
            return Err(KeyframeError::DuplicateId(keyframe.id));
        }
        self.keyframes.push(keyframe);
        Ok(&self.keyframes[self.keyframes.len() - 1])
    }

    /// Remove a keyframe by id.
    pub fn remove_keyframe(&mut self, id: &KeyframeId) -> Option<Keyframe> {
        let index = self.keyframes.iter().position(|kf| &kf.id == id)?;
        Some(self.keyframes.remove(index))
    }

    /// Find a keyframe by id.
    pub fn keyframe(&self, id: &KeyframeId) -> Option<&Keyframe> {
        self.keyframes.iter().find(|kf| &kf.id == id)
    }

    /// Find a keyframe by id for editing.
    pub fn keyframe_mut(&mut self, id: &KeyframeId) -> Option<&mut Keyframe> {
        self.keyframes.iter_mut().find(|kf| &kf.id == id)
    }

    /// Find the first keyframe stored at exactly this time.
    pub fn keyframe_at(&self, time: f64) -> Option<&Keyframe> {
        self.keyframes.iter().find(|kf| kf.time == time)
    }

    /// Move a keyframe to a new time.
    ///
    /// Returns `Ok(false)` when no keyframe has this id.
    pub fn move_keyframe(&mut self, id: &KeyframeId, time: f64) -> Result<bool, KeyframeError> {
        validate_time(time)?;
        match self.keyframe_mut(id) {
            Some(keyframe) => {
                keyframe.time = time;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Change the value held by a keyframe.
    ///
    /// Returns `Ok(false)` when no keyframe has this id.
    pub fn set_value(&mut self, id: &KeyframeId, value: f64) -> Result<bool, KeyframeError> {
        validate_value(value)?;
        match self.keyframe_mut(id) {
            Some(keyframe) => {
                keyframe.value = value;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Change the easing of a keyframe.
    ///
    /// Returns `Ok(false)` when no keyframe has this id.
    pub fn set_easing(&mut self, id: &KeyframeId, easing: Easing) -> Result<bool, KeyframeError> {
        easing.validate()?;
        match self.keyframe_mut(id) {
            Some(keyframe) => {
                keyframe.easing = easing;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Validate the default value, every keyframe and the uniqueness of
    /// keyframe ids.
    pub fn validate(&self) -> Result<(), KeyframeError> {
        validate_value(self.default_value)?;
        for (index, keyframe) in self.keyframes.iter().enumerate() {
            keyframe.validate()?;
            if self.keyframes[..index].iter().any(|other| other.id == keyframe.id) {
                return Err(KeyframeError::DuplicateId(keyframe.id.clone()));
            }
        }
        Ok(())
    }
}

/// Total order on keyframe times. NaN sorts after every number.
fn compare_time(a: f64, b: f64) -> Ordering {
    a.partial_cmp(&b).unwrap_or_else(|| a.is_nan().cmp(&b.is_nan()))
}

/// Compute the value of a property at the given time.
///
/// - no keyframes: the property's default value
/// - before the first / after the last keyframe: that keyframe's value
/// - otherwise: interpolate between the bracketing keyframes using the easing
///   of the earlier one
///
/// Keyframes sharing a time resolve to the later one in storage order.
pub fn evaluate(property: &AnimatedProperty, time: f64) -> f64 {
    let sorted = property.sorted_keyframes();
    let (Some(first), Some(last)) = (sorted.first(), sorted.last()) else {
        return property.default_value;
    };

    if time.is_nan() || time <= first.time {
        return first.value;
    }
    if time >= last.time {
        return last.value;
    }

    // First keyframe strictly after `time`; never 0 or len here
    let next_index = sorted.partition_point(|kf| kf.time <= time);
    let (Some(prev), Some(next)) = (
        next_index.checked_sub(1).and_then(|i| sorted.get(i)),
        sorted.get(next_index),
    ) else {
        return last.value;
    };

    let span = next.time - prev.time;
    if !(span > 0.0) {
        return next.value;
    }

    let progress = (time - prev.time) / span;
    let eased = prev.easing.evaluate(progress);
    prev.value + (next.value - prev.value) * eased
}
