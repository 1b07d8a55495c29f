mod cli;
mod commands;

use anyhow::Result;
use keyline_config::KeylineConfig;
use std::env;

use cli::{Command, USAGE};

fn main() -> Result<()> {
    let config = KeylineConfig::load();
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.logging.filter.as_str()),
    )
    .init();

    let command = match cli::parse_args(env::args().skip(1).collect()) {
        Ok(command) => command,
        Err(err) => {
            eprintln!("{}", USAGE);
            return Err(err);
        }
    };
    log::debug!("running {:?}", command);

    match command {
        Command::New {
            out,
            layers,
            duration,
        } => commands::new_timeline(&config, &out, layers, duration),
        Command::Sample { input, time } => {
            println!("{}", commands::sample(&input, time)?);
            Ok(())
        }
        Command::Export {
            input,
            format,
            out,
            steps,
            timing_functions,
        } => {
            let options = commands::export_options(&config, steps, timing_functions);
            commands::export(&config, &input, format, out, &options)?;
            Ok(())
        }
        Command::Play {
            input,
            run_for,
            fps,
        } => {
            let fps = fps.unwrap_or(config.playback.fps);
            let timeline = commands::load_timeline(&input)?;
            commands::play(timeline, run_for, fps)
        }
    }
}
