//! Command-line parsing.
//!
//! `--config` is applied first, then every other flag overrides the loaded
//! file regardless of argument order.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow, bail};

use crate::config::Config;

pub const USAGE: &str = "\
life-studio [options]

  -c, --config <path>          load settings from a YAML file
      --generate-config [path] write a template (default: config.yaml) and exit
  -w, --width <px>             window width
  -h, --height <px>            window height
      --scale <px>             pixels per cell edge
  -p, --probability <p>        initial live probability (0..=1)
  -s, --seed <n>               fixed RNG seed
      --interval-ms <ms>       delay between steps
      --paused                 open with the animation stopped
      --snapshot <path>        save file used by F5 / F9
      --log <filter>           env_logger filter
      --help                   print this text

Keys: R randomize, Delete clear, Space start/stop, N step, S save,
Shift+S restore, F5 save file, F9 load file, Escape quit.
Left button paints, any other button erases.
";

/// What the process was asked to do.
#[derive(Debug, Clone, PartialEq)]
pub enum Invocation {
    Run(Config),
    GenerateConfig(PathBuf),
    Help,
}

pub fn parse<I>(args: I) -> Result<Invocation>
where
    I: IntoIterator<Item = String>,
{
    let argv: Vec<String> = args.into_iter().collect();
    let mut config = Config::default();

    // First pass: --config, --generate-config, --help
    let mut i = 0;
    while i < argv.len() {
        match argv[i].as_str() {
            "--config" | "-c" => {
                let path = value(&argv, &mut i)?;
                config = Config::from_yaml(Path::new(path))?;
            }
            "--generate-config" => {
                let path = match argv.get(i + 1) {
                    Some(p) if !p.starts_with('-') => p.clone(),
                    _ => "config.yaml".to_string(),
                };
                return Ok(Invocation::GenerateConfig(PathBuf::from(path)));
            }
            "--help" => return Ok(Invocation::Help),
            _ => {}
        }
        i += 1;
    }

    // Second pass: flags override config file values
    i = 0;
    while i < argv.len() {
        let flag = argv[i].as_str();
        match flag {
            "--config" | "-c" => i += 1,
            "--width" | "-w" => config.view.width = number(&argv, &mut i)?,
            "--height" | "-h" => config.view.height = number(&argv, &mut i)?,
            "--scale" => config.view.scale = number(&argv, &mut i)?,
            "--probability" | "-p" => config.simulation.probability = number(&argv, &mut i)?,
            "--seed" | "-s" => config.simulation.seed = Some(number(&argv, &mut i)?),
            "--interval-ms" => config.simulation.interval_ms = number(&argv, &mut i)?,
            "--paused" => config.simulation.paused = true,
            "--snapshot" => config.snapshot.path = Some(PathBuf::from(value(&argv, &mut i)?)),
            "--log" => config.log = Some(value(&argv, &mut i)?.to_string()),
            other => bail!("unknown argument '{other}' (see --help)"),
        }
        i += 1;
    }

    Ok(Invocation::Run(config))
}

/// Advances past a flag and returns its value.
fn value<'a>(argv: &'a [String], i: &mut usize) -> Result<&'a str> {
    let flag = &argv[*i];
    *i += 1;
    argv.get(*i)
        .map(String::as_str)
        .ok_or_else(|| anyhow!("{flag} expects a value"))
}

fn number<T>(argv: &[String], i: &mut usize) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let flag = argv[*i].clone();
    let raw = value(argv, i)?;
    raw.parse().with_context(|| format!("invalid value '{raw}' for {flag}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(args: &[&str]) -> Result<Invocation> {
        parse(args.iter().map(|s| s.to_string()))
    }

    fn config(args: &[&str]) -> Config {
        match run(args).unwrap() {
            Invocation::Run(config) => config,
            other => panic!("expected Run, got {other:?}"),
        }
    }

    #[test]
    fn no_arguments_run_defaults() {
        assert_eq!(config(&[]), Config::default());
    }

    #[test]
    fn flags_override_defaults() {
        let c = config(&["-w", "640", "--height", "480", "--scale", "8", "--seed", "3", "--paused"]);
        assert_eq!((c.view.width, c.view.height, c.view.scale), (640, 480, 8));
        assert_eq!(c.simulation.seed, Some(3));
        assert!(c.simulation.paused);
    }

    #[test]
    fn flags_override_config_file_in_any_order() {
        let path = std::env::temp_dir().join(format!("life-studio-args-{}.yaml", std::process::id()));
        std::fs::write(&path, "view:\n  scale: 2\nsimulation:\n  interval_ms: 10\n").unwrap();
        let p = path.to_string_lossy().into_owned();

        let c = config(&["--interval-ms", "30", "--config", &p]);
        let _ = std::fs::remove_file(&path);

        assert_eq!(c.view.scale, 2);
        assert_eq!(c.simulation.interval_ms, 30);
    }

    #[test]
    fn generate_config_defaults_its_path() {
        assert_eq!(
            run(&["--generate-config"]).unwrap(),
            Invocation::GenerateConfig(PathBuf::from("config.yaml"))
        );
        assert_eq!(
            run(&["--generate-config", "my.yaml"]).unwrap(),
            Invocation::GenerateConfig(PathBuf::from("my.yaml"))
        );
    }

    #[test]
    fn bad_input_is_an_error() {
        assert!(run(&["--scale"]).is_err());
        assert!(run(&["--scale", "four"]).is_err());
        assert!(run(&["--frobnicate"]).is_err());
        assert!(run(&["--config", "/nonexistent/life.yaml"]).is_err());
    }

    #[test]
    fn help_short_circuits() {
        assert_eq!(run(&["--width", "1", "--help"]).unwrap(), Invocation::Help);
    }
}
