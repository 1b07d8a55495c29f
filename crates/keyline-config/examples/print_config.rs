/// Example program to print the loaded configuration
///
/// Run with: cargo run -p keyline-config --example print_config

fn main() {
    let config = keyline_config::KeylineConfig::load();

    println!("=== Keyline Configuration ===\n");

    println!("Timeline Settings:");
    println!("  Default Duration: {}ms", config.timeline.default_duration_ms);
    println!();

    println!("Export Settings:");
    println!("  SVG Steps: {}", config.export.svg_steps);
    println!(
        "  SVG Canvas: {}x{}",
        config.export.svg_width, config.export.svg_height
    );
    println!("  CSS Timing Functions: {}", config.export.css_timing_functions);
    println!("  Output Dir: {:?}", config.export.output_dir);
    println!();

    println!("Logging: {}", config.logging.filter);
    println!("Playback FPS: {}", config.playback.fps);
    println!();

    match toml::to_string_pretty(&config) {
        Ok(toml_str) => {
            println!("=== Serialized Configuration ===");
            println!("{}", toml_str);
        }
        Err(e) => {
            eprintln!("Failed to serialize config: {}", e);
        }
    }
}
