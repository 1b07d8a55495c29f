//! SVG `<animate>` exporter.
//!
//! SVG's own spline interpolation cannot express every curve the evaluator
//! supports, so each keyframed property is sampled at `steps + 1` evenly
//! spaced instants and written as a linear `values`/`keyTimes` pair. The
//! result follows the live preview up to the sampling resolution.

use super::{ExportFormat, ExportedFile, escape_xml, format_number, layer_ident};
use crate::layer::{Layer, layer_state, render_order};
use crate::types::PropertyKind;

/// Sample count used when none is configured.
pub const DEFAULT_SVG_STEPS: usize = 30;

/// Options for the SVG exporter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SvgOptions {
    /// Number of intervals the duration is split into; `steps + 1` samples.
    pub steps: usize,
    /// Canvas width in user units.
    pub width: f64,
    /// Canvas height in user units.
    pub height: f64,
}

impl Default for SvgOptions {
    fn default() -> Self {
        Self {
            steps: DEFAULT_SVG_STEPS,
            width: 800.0,
            height: 600.0,
        }
    }
}

/// Export layers as an animated SVG document using the default options.
pub fn export_svg(layers: &[Layer], duration: f64) -> ExportedFile {
    export_svg_with(layers, duration, &SvgOptions::default())
}

/// Export layers as an animated SVG document.
pub fn export_svg_with(layers: &[Layer], duration: f64, options: &SvgOptions) -> ExportedFile {
    let steps = options.steps.max(1);
    let times = sample_times(duration, steps);
    let key_times = key_times(steps).join(";");
    let width = format_number(options.width);
    let height = format_number(options.height);

    let mut out = String::new();
    out.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    out.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\">\n",
        w = width,
        h = height
    ));

    for layer in render_order(layers) {
        write_layer(&mut out, layer, duration, &times, &key_times);
    }

    out.push_str("</svg>\n");
    ExportedFile::new(ExportFormat::Svg, out)
}

fn write_layer(out: &mut String, layer: &Layer, duration: f64, times: &[f64], key_times: &str) {
    let initial = layer_state(layer, 0.0);

    out.push_str(&format!(
        "  <rect id=\"{}\" x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" fill=\"{}\" opacity=\"{}\"",
        layer_ident(layer),
        format_number(initial.x),
        format_number(initial.y),
        format_number(initial.width),
        format_number(initial.height),
        escape_xml(&layer.color),
        format_number(initial.opacity),
    ));
    if initial.rotation != 0.0 {
        let (cx, cy) = initial.center();
        out.push_str(&format!(
            " transform=\"rotate({} {} {})\"",
            format_number(initial.rotation),
            format_number(cx),
            format_number(cy)
        ));
    }
    out.push_str(">\n");
    out.push_str(&format!("    <title>{}</title>\n", escape_xml(&layer.name)));

    let dur = format!("{}ms", format_number(duration));
    for (kind, property) in layer.properties.iter() {
        if !property.is_animated() {
            continue;
        }

        let values = sample_values(layer, kind, times).join(";");
        if kind == PropertyKind::Rotation {
            out.push_str(&format!(
                "    <animateTransform attributeName=\"{}\" type=\"rotate\" values=\"{}\" keyTimes=\"{}\" dur=\"{}\" repeatCount=\"indefinite\" />\n",
                kind.svg_attribute(),
                values,
                key_times,
                dur
            ));
        } else {
            out.push_str(&format!(
                "    <animate attributeName=\"{}\" values=\"{}\" keyTimes=\"{}\" dur=\"{}\" repeatCount=\"indefinite\" />\n",
                kind.svg_attribute(),
                values,
                key_times,
                dur
            ));
        }
    }

    out.push_str("  </rect>\n");
}

/// Evenly spaced sample instants covering `[0, duration]`.
pub(crate) fn sample_times(duration: f64, steps: usize) -> Vec<f64> {
    (0..=steps)
        .map(|i| duration * i as f64 / steps as f64)
        .collect()
}

/// Normalised sample positions with three decimals.
pub(crate) fn key_times(steps: usize) -> Vec<String> {
    (0..=steps)
        .map(|i| format!("{:.3}", i as f64 / steps as f64))
        .collect()
}

/// Sampled values of one property. Rotation samples carry the box centre so
/// the layer spins in place.
fn sample_values(layer: &Layer, kind: PropertyKind, times: &[f64]) -> Vec<String> {
    times
        .iter()
        .map(|&time| {
            if kind == PropertyKind::Rotation {
                let state = layer_state(layer, time);
                let (cx, cy) = state.center();
                format!(
                    "{} {} {}",
                    format_number(state.rotation),
                    format_number(cx),
                    format_number(cy)
                )
            } else {
                format_number(layer.value_at(kind, time))
            }
        })
        .collect()
}
