//! Studio configuration, loadable from YAML.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

use life_engine::paint::Color;
use life_engine::render::life::CellPalette;
use life_sim::{CellEncoding, DEFAULT_PROBABILITY, LifeConfig, ViewSize};

/// Everything the studio needs before the window opens.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Window and grid geometry
    pub view: ViewConfig,
    /// Seeding and animation
    pub simulation: SimConfig,
    /// Save file used by F5 / F9
    pub snapshot: SnapshotConfig,
    /// Cell colors as sRGB bytes
    pub palette: PaletteConfig,
    /// `env_logger` filter; falls back to `RUST_LOG`
    pub log: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    /// Window width in logical pixels
    pub width: u32,
    /// Window height in logical pixels
    pub height: u32,
    /// Logical pixels per cell edge
    pub scale: u32,
    pub vsync: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Live probability used for the initial fill and `R`
    pub probability: f64,
    /// Fixed RNG seed (omit for OS entropy)
    pub seed: Option<u64>,
    /// Delay between automatic steps
    pub interval_ms: u64,
    /// Open with the animation stopped
    pub paused: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnapshotConfig {
    pub path: Option<PathBuf>,
    pub encoding: CellEncoding,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaletteConfig {
    pub alive: [u8; 3],
    pub dead: [u8; 3],
}

impl Default for Config {
    fn default() -> Self {
        Self {
            view: ViewConfig::default(),
            simulation: SimConfig::default(),
            snapshot: SnapshotConfig::default(),
            palette: PaletteConfig::default(),
            log: None,
        }
    }
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            width: 512,
            height: 512,
            scale: 4,
            vsync: true,
        }
    }
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            probability: DEFAULT_PROBABILITY,
            seed: None,
            interval_ms: 60,
            paused: false,
        }
    }
}

impl Default for SnapshotConfig {
    fn default() -> Self {
        Self {
            path: Some(PathBuf::from("life.snapshot")),
            encoding: CellEncoding::Packed,
        }
    }
}

impl Default for PaletteConfig {
    fn default() -> Self {
        Self {
            alive: [255, 255, 255],
            dead: [0, 0, 0],
        }
    }
}

impl Config {
    /// Load config from a YAML file
    pub fn from_yaml(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        Self::from_yaml_str(&contents).with_context(|| format!("invalid config {}", path.display()))
    }

    pub fn from_yaml_str(contents: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(contents)?)
    }

    /// Save config to a YAML file
    pub fn to_yaml(&self, path: &Path) -> Result<()> {
        let yaml = serde_yaml::to_string(self)?;
        std::fs::write(path, yaml)
            .with_context(|| format!("failed to write config {}", path.display()))?;
        Ok(())
    }

    /// Generate a template config file
    pub fn write_template(path: &Path) -> Result<()> {
        Config::default().to_yaml(path)
    }

    /// Rejects settings the state machine would refuse once the window is
    /// already open. Returns non-fatal warnings.
    pub fn validate(&self) -> Result<Vec<String>> {
        let mut warnings = Vec::new();

        let view = ViewSize::new(self.view.width, self.view.height);
        view.grid_size(self.view.scale)?;

        let p = self.simulation.probability;
        if !(0.0..=1.0).contains(&p) {
            bail!("probability {p} is outside 0..=1");
        }

        if self.simulation.interval_ms == 0 {
            warnings.push("interval_ms is 0, the grid will step once per frame".to_string());
        }

        if self.snapshot.path.is_none() {
            warnings.push("no snapshot path set, F5 / F9 are disabled".to_string());
        }

        Ok(warnings)
    }

    pub fn life_config(&self) -> LifeConfig {
        LifeConfig {
            view_width: self.view.width,
            view_height: self.view.height,
            scale: self.view.scale,
            seed_probability: self.simulation.probability,
            seed: self.simulation.seed,
            tick_interval: Duration::from_millis(self.simulation.interval_ms),
        }
    }

    pub fn cell_palette(&self) -> CellPalette {
        CellPalette {
            alive: Color::opaque_u8(self.palette.alive),
            dead: Color::opaque_u8(self.palette.dead),
        }
    }

    pub fn present_mode(&self) -> wgpu::PresentMode {
        if self.view.vsync {
            wgpu::PresentMode::Fifo
        } else {
            wgpu::PresentMode::AutoNoVsync
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        let config = Config::default();
        assert!(config.validate().unwrap().is_empty());

        let life = config.life_config();
        assert_eq!((life.view_width, life.view_height, life.scale), (512, 512, 4));
        assert_eq!(life.tick_interval, Duration::from_millis(60));
    }

    #[test]
    fn partial_yaml_keeps_other_defaults() {
        let config = Config::from_yaml_str(
            "view:\n  scale: 8\nsimulation:\n  seed: 7\n  paused: true\n",
        )
        .unwrap();

        assert_eq!(config.view.scale, 8);
        assert_eq!(config.view.width, 512);
        assert_eq!(config.simulation.seed, Some(7));
        assert!(config.simulation.paused);
        assert_eq!(config.simulation.probability, DEFAULT_PROBABILITY);
        assert_eq!(config.snapshot.encoding, CellEncoding::Packed);
    }

    #[test]
    fn encoding_and_palette_parse() {
        let config = Config::from_yaml_str(
            "snapshot:\n  path: out/grid.life\n  encoding: bytes\npalette:\n  alive: [0, 255, 0]\n",
        )
        .unwrap();

        assert_eq!(config.snapshot.encoding, CellEncoding::Bytes);
        assert_eq!(config.snapshot.path, Some(PathBuf::from("out/grid.life")));
        assert_eq!(config.cell_palette().alive, Color::opaque_u8([0, 255, 0]));
        assert_eq!(config.cell_palette().dead, Color::BLACK);
    }

    #[test]
    fn indivisible_view_is_rejected() {
        let mut config = Config::default();
        config.view.width = 510;
        assert!(config.validate().is_err());

        config.view.width = 512;
        config.view.scale = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn bad_probability_is_rejected() {
        let mut config = Config::default();
        config.simulation.probability = 1.5;
        assert!(config.validate().is_err());

        config.simulation.probability = f64::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn zero_interval_warns() {
        let mut config = Config::default();
        config.simulation.interval_ms = 0;
        assert_eq!(config.validate().unwrap().len(), 1);
    }

    #[test]
    fn template_round_trips_through_file() {
        let path = std::env::temp_dir().join(format!("life-studio-config-{}.yaml", std::process::id()));
        Config::write_template(&path).unwrap();
        let loaded = Config::from_yaml(&path).unwrap();
        let _ = std::fs::remove_file(&path);
        assert_eq!(loaded, Config::default());
    }
}
