//! CSS `@keyframes` exporter.
//!
//! Each layer becomes a `.layer-<id>` rule positioned at its time-0 state plus
//! one `@keyframes` block per keyframed property. Stops are placed at
//! `time / duration` percent with one decimal.
//!
//! By default the easing of each keyframe is not written, so browsers play
//! every segment with the CSS default timing function. The output then
//! differs from the live evaluator for non-linear curves. Setting
//! `CssOptions::timing_functions` writes an `animation-timing-function` on
//! every stop except the last, which matches the evaluator segment by segment.

use super::{ExportFormat, ExportedFile, escape_css_comment, format_number, layer_ident};
use crate::keyframes::AnimatedProperty;
use crate::layer::{Layer, layer_state, render_order};
use crate::types::PropertyKind;

/// Options for the stylesheet exporter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CssOptions {
    /// Write each keyframe's easing as `animation-timing-function`.
    pub timing_functions: bool,
}

/// Export layers as a stylesheet using the default options.
pub fn export_css(layers: &[Layer], duration: f64) -> ExportedFile {
    export_css_with(layers, duration, &CssOptions::default())
}

/// Export layers as a stylesheet.
pub fn export_css_with(layers: &[Layer], duration: f64, options: &CssOptions) -> ExportedFile {
    let mut out = String::new();
    out.push_str("/* Keyline animation export */\n");
    out.push_str(&format!("/* Duration: {}ms */\n", format_number(duration)));
    if !options.timing_functions {
        out.push_str("/* Keyframe easing is not included; segments use the browser default */\n");
    }

    for layer in render_order(layers) {
        out.push('\n');
        write_layer(&mut out, layer, duration, options);
    }

    ExportedFile::new(ExportFormat::Css, out)
}

fn write_layer(out: &mut String, layer: &Layer, duration: f64, options: &CssOptions) {
    let ident = layer_ident(layer);
    let initial = layer_state(layer, 0.0);

    let animations: Vec<String> = layer
        .properties
        .iter()
        .filter(|(_, property)| property.is_animated())
        .map(|(kind, _)| {
            format!(
                "{} {}ms infinite",
                animation_name(&ident, kind),
                format_number(duration)
            )
        })
        .collect();

    out.push_str(&format!("/* Layer: {} */\n", escape_css_comment(&layer.name)));
    out.push_str(&format!(".{} {{\n", ident));
    out.push_str("  position: absolute;\n");
    for kind in PropertyKind::ALL {
        out.push_str(&format!("  {}\n", declaration(kind, initial.get(kind))));
    }
    out.push_str(&format!("  background-color: {};\n", css_value_text(&layer.color)));
    out.push_str(&format!("  z-index: {};\n", layer.z_index));
    if !animations.is_empty() {
        out.push_str(&format!("  animation: {};\n", animations.join(", ")));
    }
    out.push_str("}\n");

    for (kind, property) in layer.properties.iter() {
        out.push('\n');
        if property.is_animated() {
            write_keyframes(out, &ident, kind, property, duration, options);
        } else {
            out.push_str(&format!("/* {}: no keyframes */\n", animation_name(&ident, kind)));
        }
    }
}

fn write_keyframes(
    out: &mut String,
    ident: &str,
    kind: PropertyKind,
    property: &AnimatedProperty,
    duration: f64,
    options: &CssOptions,
) {
    let sorted = property.sorted_keyframes();
    let last_index = sorted.len().saturating_sub(1);

    out.push_str(&format!("@keyframes {} {{\n", animation_name(ident, kind)));
    for (index, keyframe) in sorted.iter().enumerate() {
        let mut body = declaration(kind, keyframe.value);
        if options.timing_functions && index < last_index {
            body.push_str(&format!(
                " animation-timing-function: {};",
                keyframe.easing.to_css()
            ));
        }
        out.push_str(&format!(
            "  {} {{ {} }}\n",
            stop_percentage(keyframe.time, duration),
            body
        ));
    }
    out.push_str("}\n");
}

/// `@keyframes` name for one property of a layer.
pub(crate) fn animation_name(ident: &str, kind: PropertyKind) -> String {
    format!("{}-{}", ident, kind.name())
}

/// Declaration such as `left: 100px;` or `opacity: 0.5;`.
fn declaration(kind: PropertyKind, value: f64) -> String {
    format!(
        "{}: {}{};",
        kind.css_property(),
        format_number(value),
        kind.css_unit()
    )
}

/// Percentage of the timeline, rounded half away from zero to one decimal.
fn stop_percentage(time: f64, duration: f64) -> String {
    if !(duration > 0.0) {
        return "0.0%".to_string();
    }
    let percent = (time / duration * 100.0 * 10.0).round() / 10.0;
    if !percent.is_finite() || percent == 0.0 {
        return "0.0%".to_string();
    }
    format!("{:.1}%", percent)
}

/// Colour text with characters that would end the declaration removed.
fn css_value_text(text: &str) -> String {
    text.chars().filter(|c| !matches!(c, ';' | '{' | '}')).collect()
}
