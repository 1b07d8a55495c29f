use anyhow::{Context, Result, bail};
use keyline_anim::{
    CssOptions, ExportFormat, ExportOptions, ManualTicker, PlaybackDriver, SvgOptions, Timeline,
    import_json,
};
use keyline_config::KeylineConfig;
use serde_json::json;
use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::time::{Duration, Instant};

/// Read a snapshot file into a timeline.
pub fn load_timeline(path: &Path) -> Result<Timeline> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let snapshot =
        import_json(&content).with_context(|| format!("failed to import {}", path.display()))?;
    log::debug!(
        "loaded {} ({} layers, {}ms)",
        path.display(),
        snapshot.layers.len(),
        snapshot.duration
    );
    Ok(snapshot.into_timeline())
}

/// Write a snapshot with `layers` default layers.
pub fn new_timeline(
    config: &KeylineConfig,
    out: &Path,
    layers: usize,
    duration: Option<f64>,
) -> Result<()> {
    let duration = duration.unwrap_or(config.timeline.default_duration_ms);
    if !duration.is_finite() || duration <= 0.0 {
        bail!("duration must be a positive number of milliseconds, got {}", duration);
    }

    let mut timeline = Timeline::new(duration);
    for _ in 0..layers {
        timeline.add_default_layer();
    }

    let file = timeline.export(ExportFormat::Json, &ExportOptions::default());
    fs::write(out, &file.content).with_context(|| format!("failed to write {}", out.display()))?;
    log::info!("wrote {} with {} layers", out.display(), layers);
    Ok(())
}

/// Evaluated state of every layer at `time`, as pretty JSON.
pub fn sample(input: &Path, time: f64) -> Result<String> {
    let timeline = load_timeline(input)?;
    let states: Vec<_> = timeline
        .state_at(time)
        .into_iter()
        .map(|(id, state)| {
            let name = timeline.layer(&id).map(|layer| layer.name.clone());
            json!({ "id": id, "name": name, "state": state })
        })
        .collect();

    let report = json!({ "time": time, "layers": states });
    Ok(serde_json::to_string_pretty(&report)?)
}

/// Export options from configuration with command-line overrides applied.
pub fn export_options(
    config: &KeylineConfig,
    steps: Option<usize>,
    timing_functions: bool,
) -> ExportOptions {
    ExportOptions {
        css: CssOptions {
            timing_functions: timing_functions || config.export.css_timing_functions,
        },
        svg: SvgOptions {
            steps: steps.unwrap_or(config.export.svg_steps),
            width: config.export.svg_width,
            height: config.export.svg_height,
        },
    }
}

/// Export a snapshot. Returns the path written, or `None` when the content
/// went to stdout.
pub fn export(
    config: &KeylineConfig,
    input: &Path,
    format: ExportFormat,
    out: Option<PathBuf>,
    options: &ExportOptions,
) -> Result<Option<PathBuf>> {
    let timeline = load_timeline(input)?;
    let file = timeline.export(format, options);

    let target = out.or_else(|| {
        let stem = input.file_stem()?.to_string_lossy().into_owned();
        config
            .export
            .output_dir
            .as_ref()
            .map(|dir| dir.join(file.file_name(&stem)))
    });

    match target {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)
                    .with_context(|| format!("failed to create {}", parent.display()))?;
            }
            fs::write(&path, &file.content)
                .with_context(|| format!("failed to write {}", path.display()))?;
            log::info!("exported {} ({} bytes) to {}", format, file.content.len(), path.display());
            Ok(Some(path))
        }
        None => {
            print!("{}", file.content);
            Ok(None)
        }
    }
}

/// Preview a timeline in the terminal by printing layer states each frame.
///
/// Runs for `run_for` milliseconds, or a single loop when it is `None`.
pub fn play(mut timeline: Timeline, run_for: Option<f64>, fps: u32) -> Result<()> {
    if fps == 0 {
        bail!("fps must be at least 1");
    }

    let run_for = run_for.unwrap_or_else(|| timeline.duration());
    timeline.set_playing(true);
    let duration = timeline.duration();
    let timeline = Rc::new(RefCell::new(timeline));

    let ticker = Rc::new(ManualTicker::new());
    let driver = PlaybackDriver::new(Rc::clone(&ticker));
    let target = Rc::clone(&timeline);
    driver.start(true, duration, move |time| {
        let mut timeline = target.borrow_mut();
        timeline.seek(time);
        println!("{}", frame_line(&timeline));
    })?;

    let frame = Duration::from_secs_f64(1.0 / fps as f64);
    let started = Instant::now();
    loop {
        let now = started.elapsed().as_secs_f64() * 1000.0;
        if now >= run_for {
            break;
        }
        ticker.fire(now);
        std::thread::sleep(frame);
    }

    driver.stop();
    timeline.borrow_mut().set_playing(false);
    Ok(())
}

fn frame_line(timeline: &Timeline) -> String {
    let mut line = format!("{:>8.1}ms", timeline.current_time());
    for (id, state) in timeline.current_state() {
        let name = timeline.layer(&id).map_or("?", |layer| layer.name.as_str());
        line.push_str(&format!(
            " | {} x={:.1} y={:.1} w={:.1} h={:.1} o={:.2} r={:.1} s={:.2}",
            name, state.x, state.y, state.width, state.height, state.opacity, state.rotation,
            state.scale
        ));
    }
    line
}
