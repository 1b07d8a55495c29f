//! Easing functions for keyframe interpolation.
//!
//! This module implements the CSS timing functions a keyframe can carry:
//! - Linear
//! - EaseIn, EaseOut, EaseInOut (standard CSS curves)
//! - CubicBezier (custom bezier curves)
//!
//! Curves are solved the way browsers solve `cubic-bezier()`, so the live
//! evaluator, the SVG sampler and a CSS stylesheet all agree.
//!
//! # Usage
//!
//! ```
//! use keyline_anim::easing::{Easing, NamedEasing};
//!
//! let ease = Easing::Named(NamedEasing::EaseInOut);
//! let progress = ease.evaluate(0.5);
//! assert!((progress - 0.5).abs() < 1e-6);
//!
//! let custom = Easing::cubic_bezier(0.4, 0.0, 0.2, 1.0).unwrap();
//! let progress = custom.evaluate(0.5);
//! assert!(progress > 0.5);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::KeyframeError;

const NEWTON_ITERATIONS: usize = 8;
const BISECTION_ITERATIONS: usize = 64;
const SOLVE_EPSILON: f64 = 1e-7;
const SLOPE_EPSILON: f64 = 1e-6;

/// The named CSS timing functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NamedEasing {
    /// No easing.
    #[default]
    Linear,
    /// CSS `ease-in`, equivalent to `cubic-bezier(0.42, 0, 1, 1)`.
    EaseIn,
    /// CSS `ease-out`, equivalent to `cubic-bezier(0, 0, 0.58, 1)`.
    EaseOut,
    /// CSS `ease-in-out`, equivalent to `cubic-bezier(0.42, 0, 0.58, 1)`.
    EaseInOut,
}

impl NamedEasing {
    /// CSS keyword for this curve.
    pub fn css_name(self) -> &'static str {
        match self {
            Self::Linear => "linear",
            Self::EaseIn => "ease-in",
            Self::EaseOut => "ease-out",
            Self::EaseInOut => "ease-in-out",
        }
    }

    /// Control points of the equivalent cubic bezier curve.
    pub fn control_points(self) -> (f64, f64, f64, f64) {
        match self {
            Self::Linear => (0.0, 0.0, 1.0, 1.0),
            Self::EaseIn => (0.42, 0.0, 1.0, 1.0),
            Self::EaseOut => (0.0, 0.0, 0.58, 1.0),
            Self::EaseInOut => (0.42, 0.0, 0.58, 1.0),
        }
    }
}

/// Easing applied to the segment that starts at a keyframe.
///
/// Snapshots store a named curve as its CSS keyword and a custom curve as a
/// `[x1, y1, x2, y2]` array.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Easing {
    Named(NamedEasing),
    /// Custom cubic bezier curve. Parameters: (x1, y1, x2, y2), each in [0, 1].
    CubicBezier(f64, f64, f64, f64),
}

impl Default for Easing {
    fn default() -> Self {
        Self::Named(NamedEasing::Linear)
    }
}

impl From<NamedEasing> for Easing {
    fn from(named: NamedEasing) -> Self {
        Self::Named(named)
    }
}

impl Easing {
    pub const LINEAR: Easing = Easing::Named(NamedEasing::Linear);
    pub const EASE_IN: Easing = Easing::Named(NamedEasing::EaseIn);
    pub const EASE_OUT: Easing = Easing::Named(NamedEasing::EaseOut);
    pub const EASE_IN_OUT: Easing = Easing::Named(NamedEasing::EaseInOut);

    /// Create a validated custom cubic bezier easing.
    ///
    /// Every control coordinate must be finite and within [0, 1].
    pub fn cubic_bezier(x1: f64, y1: f64, x2: f64, y2: f64) -> Result<Self, KeyframeError> {
        let easing = Self::CubicBezier(x1, y1, x2, y2);
        easing.validate()?;
        Ok(easing)
    }

    /// Check the control points of a custom curve.
    pub fn validate(&self) -> Result<(), KeyframeError> {
        if let Self::CubicBezier(x1, y1, x2, y2) = *self {
            for (index, value) in [x1, y1, x2, y2].into_iter().enumerate() {
                if !(0.0..=1.0).contains(&value) {
                    return Err(KeyframeError::ControlPointOutOfRange { index, value });
                }
            }
        }
        Ok(())
    }

    /// Control points of this curve, named curves included.
    pub fn control_points(&self) -> (f64, f64, f64, f64) {
        match *self {
            Self::Named(named) => named.control_points(),
            Self::CubicBezier(x1, y1, x2, y2) => (x1, y1, x2, y2),
        }
    }

    /// Whether this curve maps every progress value to itself.
    pub fn is_linear(&self) -> bool {
        let (x1, y1, x2, y2) = self.control_points();
        x1 == y1 && x2 == y2
    }

    /// Evaluate the easing function at the given progress.
    ///
    /// Progress is clamped to [0, 1]. Malformed custom curves degrade rather
    /// than fail: x control points are clamped and non-finite control points
    /// evaluate as linear.
    pub fn evaluate(&self, t: f64) -> f64 {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };

        match *self {
            Self::Named(NamedEasing::Linear) => t,
            Self::Named(named) => {
                let (x1, y1, x2, y2) = named.control_points();
                cubic_bezier(x1, y1, x2, y2, t)
            }
            Self::CubicBezier(x1, y1, x2, y2) => {
                if ![x1, y1, x2, y2].iter().all(|v| v.is_finite()) {
                    return t;
                }
                cubic_bezier(x1.clamp(0.0, 1.0), y1, x2.clamp(0.0, 1.0), y2, t)
            }
        }
    }

    /// CSS `<easing-function>` text for this curve.
    pub fn to_css(&self) -> String {
        match *self {
            Self::Named(named) => named.css_name().to_string(),
            Self::CubicBezier(x1, y1, x2, y2) => {
                format!("cubic-bezier({}, {}, {}, {})", x1, y1, x2, y2)
            }
        }
    }
}

impl fmt::Display for Easing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_css())
    }
}

/// Evaluate a cubic bezier timing curve at the given progress.
///
/// Finds the curve parameter whose x coordinate equals the progress, then
/// returns the y coordinate at that parameter.
fn cubic_bezier(x1: f64, y1: f64, x2: f64, y2: f64, progress: f64) -> f64 {
    if progress <= 0.0 {
        return 0.0;
    }
    if progress >= 1.0 {
        return 1.0;
    }
    // Identity curve; skip the solver so it matches linear exactly
    if x1 == y1 && x2 == y2 {
        return progress;
    }

    let t = solve_bezier_x(x1, x2, progress);
    bezier_y(y1, y2, t)
}

/// Solve for t in the bezier x equation.
///
/// Newton-Raphson first; bisection when the slope flattens out or the
/// iteration does not converge.
fn solve_bezier_x(x1: f64, x2: f64, target_x: f64) -> f64 {
    let mut t = target_x;
    for _ in 0..NEWTON_ITERATIONS {
        let x = bezier_x(x1, x2, t) - target_x;
        if x.abs() < SOLVE_EPSILON {
            return t;
        }

        let dx = bezier_x_derivative(x1, x2, t);
        if dx.abs() < SLOPE_EPSILON {
            break;
        }

        t -= x / dx;
    }

    let mut lo = 0.0;
    let mut hi = 1.0;
    t = target_x;
    for _ in 0..BISECTION_ITERATIONS {
        let x = bezier_x(x1, x2, t);
        if (x - target_x).abs() < SOLVE_EPSILON {
            break;
        }
        if target_x > x {
            lo = t;
        } else {
            hi = t;
        }
        t = lo + (hi - lo) * 0.5;
    }

    t
}

/// x(t) = 3(1-t)²t·x1 + 3(1-t)t²·x2 + t³
#[inline]
fn bezier_x(x1: f64, x2: f64, t: f64) -> f64 {
    let t2 = t * t;
    let t3 = t2 * t;
    let mt = 1.0 - t;
    let mt2 = mt * mt;

    3.0 * mt2 * t * x1 + 3.0 * mt * t2 * x2 + t3
}

#[inline]
fn bezier_y(y1: f64, y2: f64, t: f64) -> f64 {
    let t2 = t * t;
    let t3 = t2 * t;
    let mt = 1.0 - t;
    let mt2 = mt * mt;

    3.0 * mt2 * t * y1 + 3.0 * mt * t2 * y2 + t3
}

/// dx/dt = 3(1-t)²·x1 + 6(1-t)t·(x2-x1) + 3t²·(1-x2)
#[inline]
fn bezier_x_derivative(x1: f64, x2: f64, t: f64) -> f64 {
    let mt = 1.0 - t;
    3.0 * mt * mt * x1 + 6.0 * mt * t * (x2 - x1) + 3.0 * t * t * (1.0 - x2)
}
