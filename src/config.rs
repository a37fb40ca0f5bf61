use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("Unknown map pool: {0}")]
    UnknownPool(String),
}

/// Named map pools the roster can draw from
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MapPools {
    pub initial: Vec<String>,
    pub sprint1: Vec<String>,
    pub custom: Vec<String>,
}

impl MapPools {
    pub fn get(&self, name: &str) -> Option<&[String]> {
        match name {
            "initial" => Some(&self.initial),
            "sprint1" => Some(&self.sprint1),
            "custom" => Some(&self.custom),
            _ => None,
        }
    }
}

impl Default for MapPools {
    fn default() -> Self {
        MapPools {
            initial: to_names(&["DefaultHuge", "DefaultLarge", "DefaultMedium", "DefaultSmall"]),
            sprint1: to_names(&[
                "AceOfSpades",
                "Alien",
                "Ambush",
                "Battlecode24",
                "BigDucksBigPond",
                "Canals",
                "CH3353C4K3F4CT0RY",
                "Duck",
                "Fountain",
                "Hockey",
                "MazeRunner",
                "Rivers",
                "Snake",
                "Soccer",
                "SteamboatMickey",
                "Yinyang",
            ]),
            custom: to_names(&[
                "pathfinder",
                "bridge_aquifer",
                "buh",
                "crashtest1",
                "Maze",
                "one_on_one",
                "pathfinder2",
                "two_moats",
                "kirby",
                "diagonal_grid",
            ]),
        }
    }
}

fn to_names(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Full arena configuration; every field has a default so a config file only
/// needs to name what it changes
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ArenaConfig {
    /// The bot under iteration; every match pits it against an opponent
    pub current_bot: String,
    /// Baseline opponents to gauntlet against
    pub opponents: Vec<String>,
    pub map_pools: MapPools,
    /// Which pools are active, concatenated in order into the map roster
    pub pools: Vec<String>,
    /// Render outcomes as emoji shorthand in the summary table
    pub emoji: bool,
    /// Where the summary file is written
    pub output: PathBuf,
    /// Directory containing the simulator's gradle wrapper
    pub gradle_dir: PathBuf,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        ArenaConfig {
            current_bot: "mainbot".to_string(),
            opponents: vec!["sprint1".to_string()],
            map_pools: MapPools::default(),
            pools: vec!["initial".to_string()],
            emoji: true,
            output: PathBuf::from("matches-summary.txt"),
            gradle_dir: PathBuf::from("."),
        }
    }
}

impl ArenaConfig {
    /// Load a configuration from a JSON file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// The map roster: active pools concatenated in selection order.
    pub fn maps(&self) -> Result<Vec<String>, ConfigError> {
        let mut maps = Vec::new();
        for pool in &self.pools {
            let pool_maps = self
                .map_pools
                .get(pool)
                .ok_or_else(|| ConfigError::UnknownPool(pool.clone()))?;
            maps.extend(pool_maps.iter().cloned());
        }
        Ok(maps)
    }
}
