//! Handles the configuration files for magnet roads.

use anyhow::anyhow;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use world_api::{IntersectionParams, RoadParams};

use figment::{
    providers::{Format, Yaml},
    Figment,
};

/// Returns the directory of the user config:
///
/// Linux: /home/Alice/.config/magnet_roads
/// Windows: C:\Users\Alice\AppData\Roaming\magnet\magnet_roads\config
/// Mac: /Users/Alice/Library/Application Support/com.magnet.magnet_roads
pub fn get_config_dir() -> anyhow::Result<std::path::PathBuf> {
    ProjectDirs::from("com", "magnet", "magnet_roads")
        .map(|dir| dir.config_dir().to_path_buf())
        .ok_or(anyhow!(
            "no valid home directory found using the projectdirs crate, can't use config dir"
        ))
}

/// The parameters that new roads and intersections are generated with.
#[derive(Debug, PartialEq, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct GenerationConfig {
    pub road: RoadParams,
    pub intersection: IntersectionParams,
    /// Appended curve segments space their points this many road widths apart.
    pub spacing_factor: f32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            road: RoadParams::default(),
            intersection: IntersectionParams {
                width: RoadParams::default().width,
                ..Default::default()
            },
            spacing_factor: utils::consts::SEGMENT_SPACING_FACTOR,
        }
    }
}

#[derive(Debug, Default, PartialEq, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct TerrainConfig {
    /// Whether new roads follow the terrain.
    pub enabled: bool,
    /// Height kept between the terrain and road surfaces.
    pub clearance: f32,
}

/// Configuration of magnet roads.
#[derive(Debug, PartialEq, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct Config {
    pub generation: GenerationConfig,
    pub terrain: TerrainConfig,
    /// Where the road network is saved to.
    pub save_path: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            generation: GenerationConfig::default(),
            terrain: TerrainConfig::default(),
            save_path: "network.yml".to_string(),
        }
    }
}

/// Loads the configuration for magnet roads. Later layers override earlier ones: the base config,
/// the user config and in debug builds a config.yml in the working directory.
pub fn load_config() -> anyhow::Result<Config> {
    let mut figment = Figment::from(Yaml::file("res/config/base_config.yml"));
    match get_config_dir() {
        Ok(mut user_conf) => {
            user_conf.push("config.yml");
            figment = figment.merge(Yaml::file(user_conf));
        }
        Err(err) => log::warn!("{err}"),
    }
    #[cfg(debug_assertions)]
    let figment = figment.merge(Yaml::file("config.yml"));

    let config = figment.extract()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::*;
    use std::io::prelude::*;

    #[test]
    fn later_layers_override_earlier_ones() {
        let config: Config = Figment::from(Yaml::string(
            "save_path: base.yml\ngeneration:\n  road:\n    width: 6.0\n",
        ))
        .merge(Yaml::string("save_path: local.yml\n"))
        .extract()
        .unwrap();
        assert_eq!(config.save_path, "local.yml");
        assert_eq!(config.generation.road.width, 6.0);
        assert_eq!(config.generation.road.lanes, 2);
        assert_eq!(config.terrain, TerrainConfig::default());
    }

    // Run with cargo test write_baseconfig -- --ignored --nocapture in this crate
    #[test]
    #[ignore]
    fn write_baseconfig() {
        let baseconfig = Config::default();
        let baseconfigyaml = serde_yaml::to_string(&baseconfig).unwrap();
        println!("{}", baseconfigyaml);

        let mut file = File::create("../res/config/base_config.yml").unwrap();
        file.write_all(baseconfigyaml.as_bytes()).unwrap();
    }
}
