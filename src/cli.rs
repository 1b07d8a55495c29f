use anyhow::{Context, Result, bail};
use keyline_anim::ExportFormat;
use std::path::PathBuf;

pub const USAGE: &str = "\
Usage:
  keyline new <out.json> [--layers N] [--duration MS]
  keyline sample <snapshot.json> --time MS
  keyline export <snapshot.json> --format css|svg|json [--out PATH] [--steps N] [--timing-functions]
  keyline play <snapshot.json> [--for MS] [--fps N]";

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    New {
        out: PathBuf,
        layers: usize,
        duration: Option<f64>,
    },
    Sample {
        input: PathBuf,
        time: f64,
    },
    Export {
        input: PathBuf,
        format: ExportFormat,
        out: Option<PathBuf>,
        steps: Option<usize>,
        timing_functions: bool,
    },
    Play {
        input: PathBuf,
        run_for: Option<f64>,
        fps: Option<u32>,
    },
}

/// Parse the arguments that follow the program name.
pub fn parse_args(mut args: Vec<String>) -> Result<Command> {
    if args.is_empty() {
        bail!("missing command");
    }
    let command = args.remove(0);
    if args.is_empty() {
        bail!("{} expects a file path", command);
    }
    let path = PathBuf::from(args.remove(0));

    match command.as_str() {
        "new" => {
            let mut layers = 1usize;
            let mut duration = None;
            let mut i = 0usize;
            while i < args.len() {
                match args[i].as_str() {
                    "--layers" => {
                        layers = parse_value(&args, i)?;
                        i += 2;
                    }
                    "--duration" => {
                        duration = Some(parse_value(&args, i)?);
                        i += 2;
                    }
                    other => bail!("unexpected argument for new: {}", other),
                }
            }
            Ok(Command::New {
                out: path,
                layers,
                duration,
            })
        }
        "sample" => {
            let mut time = None;
            let mut i = 0usize;
            while i < args.len() {
                match args[i].as_str() {
                    "--time" => {
                        time = Some(parse_value(&args, i)?);
                        i += 2;
                    }
                    other => bail!("unexpected argument for sample: {}", other),
                }
            }
            let Some(time) = time else {
                bail!("sample expects --time MS");
            };
            Ok(Command::Sample { input: path, time })
        }
        "export" => {
            let mut format = None;
            let mut out = None;
            let mut steps = None;
            let mut timing_functions = false;
            let mut i = 0usize;
            while i < args.len() {
                match args[i].as_str() {
                    "--format" => {
                        format = Some(parse_value::<ExportFormat>(&args, i)?);
                        i += 2;
                    }
                    "--out" => {
                        out = Some(PathBuf::from(flag_value(&args, i)?));
                        i += 2;
                    }
                    "--steps" => {
                        steps = Some(parse_value(&args, i)?);
                        i += 2;
                    }
                    "--timing-functions" => {
                        timing_functions = true;
                        i += 1;
                    }
                    other => bail!("unexpected argument for export: {}", other),
                }
            }
            let Some(format) = format else {
                bail!("export expects --format css|svg|json");
            };
            Ok(Command::Export {
                input: path,
                format,
                out,
                steps,
                timing_functions,
            })
        }
        "play" => {
            let mut run_for = None;
            let mut fps = None;
            let mut i = 0usize;
            while i < args.len() {
                match args[i].as_str() {
                    "--for" => {
                        run_for = Some(parse_value(&args, i)?);
                        i += 2;
                    }
                    "--fps" => {
                        fps = Some(parse_value(&args, i)?);
                        i += 2;
                    }
                    other => bail!("unexpected argument for play: {}", other),
                }
            }
            Ok(Command::Play {
                input: path,
                run_for,
                fps,
            })
        }
        other => bail!("unknown command: {}", other),
    }
}

fn flag_value(args: &[String], i: usize) -> Result<&str> {
    match args.get(i + 1) {
        Some(value) => Ok(value.as_str()),
        None => bail!("{} expects a value", args[i]),
    }
}

fn parse_value<T>(args: &[String], i: usize) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let value = flag_value(args, i)?;
    value
        .parse()
        .with_context(|| format!("invalid value for {}: {}", args[i], value))
}
