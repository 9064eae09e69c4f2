//! Interactive Game of Life on the GPU.
//!
//! Run with `--help` for flags and key bindings.

mod app;
mod args;
mod bindings;
mod config;

use anyhow::Result;
use winit::dpi::LogicalSize;

use life_engine::device::GpuInit;
use life_engine::logging::{LoggingConfig, init_logging};
use life_engine::window::{Runtime, RuntimeConfig};

use crate::app::LifeApp;
use crate::args::Invocation;
use crate::config::Config;

const TITLE: &str = "Life";

fn main() -> Result<()> {
    let config = match args::parse(std::env::args().skip(1))? {
        Invocation::Run(config) => config,
        Invocation::GenerateConfig(path) => {
            Config::write_template(&path)?;
            println!("Generated config template: {}", path.display());
            return Ok(());
        }
        Invocation::Help => {
            print!("{}", args::USAGE);
            return Ok(());
        }
    };

    init_logging(LoggingConfig {
        env_filter: config.log.clone(),
        ..LoggingConfig::default()
    });

    for warning in config.validate()? {
        log::warn!("config: {warning}");
    }

    log::info!(
        "{}x{} view at {} px per cell",
        config.view.width,
        config.view.height,
        config.view.scale
    );

    let runtime = RuntimeConfig {
        title: TITLE.to_string(),
        initial_size: LogicalSize::new(config.view.width as f64, config.view.height as f64),
        resizable: false,
    };
    let gpu_init = GpuInit {
        present_mode: config.present_mode(),
        ..GpuInit::default()
    };

    Runtime::run(runtime, gpu_init, LifeApp::new(config, TITLE))
}
