//! Simulation settings, read from an optional JSON file.
//!
//! Every field has a default, so a config file only needs to list what it
//! changes:
//!
//! ```json
//! { "mode": "astar", "ticks": 200, "seed": 7 }
//! ```

use std::collections::HashSet;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use zone_core::Bounds;
use zone_paths::{PathfindingMode, PlannerConfig};

/// One faction and the factions it attacks on sight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactionConfig {
    pub name: String,
    /// Centre of the spawn rectangle as fractions of the grid size. `None`
    /// spawns anywhere.
    #[serde(default)]
    pub spawn_bias: Option<(f64, f64)>,
    #[serde(default)]
    pub hostile: Vec<String>,
}

impl FactionConfig {
    fn new(name: &str, hostile: &[&str]) -> Self {
        Self {
            name: name.to_owned(),
            spawn_bias: None,
            hostile: hostile.iter().map(|&h| h.to_owned()).collect(),
        }
    }

    pub fn is_hostile_to(&self, other: &str) -> bool {
        self.hostile.iter().any(|h| h == other)
    }
}

/// The built-in factions and their hostility table.
pub fn default_factions() -> Vec<FactionConfig> {
    vec![
        FactionConfig::new("stalker", &["mercenary", "military", "monolith", "mutant"]),
        FactionConfig::new("ward", &["spark", "mercenary", "monolith", "mutant"]),
        FactionConfig::new("spark", &["ward", "monolith", "mutant"]),
        FactionConfig::new(
            "mercenary",
            &["stalker", "ward", "military", "monolith", "mutant"],
        ),
        FactionConfig::new("military", &["stalker", "mercenary", "monolith", "mutant"]),
        FactionConfig::new(
            "monolith",
            &["stalker", "ward", "spark", "mercenary", "military", "mutant"],
        ),
        FactionConfig::new(
            "mutant",
            &["stalker", "ward", "spark", "mercenary", "military", "monolith"],
        ),
    ]
}

/// Everything the `zone` binary can be told.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub width: i32,
    pub height: i32,
    pub mode: PathfindingMode,
    pub cluster_size: i32,
    pub cache_capacity: usize,
    /// Fixed RNG seed for reproducible runs.
    pub seed: Option<u64>,
    pub ticks: u64,
    pub tick_delay_ms: u64,
    pub show_grid: bool,
    pub max_num_messages: usize,
    pub min_idle_ticks: u32,
    pub max_idle_ticks: u32,
    /// How long hostile squads stay locked together after meeting.
    pub combat_ticks: u32,
    pub min_faction_squads: u32,
    pub max_faction_squads: u32,
    /// A random faction gets a new squad every this many ticks; 0 disables.
    pub spawn_frequency: u64,
    pub map: Option<PathBuf>,
    pub log_level: String,
    pub factions: Vec<FactionConfig>,
}

impl Default for SimConfig {
    fn default() -> Self {
        let planner = PlannerConfig::default();
        Self {
            width: planner.width,
            height: planner.height,
            mode: planner.mode,
            cluster_size: planner.cluster_size,
            cache_capacity: planner.cache_capacity,
            seed: None,
            ticks: 500,
            tick_delay_ms: 100,
            show_grid: true,
            max_num_messages: 20,
            min_idle_ticks: 10,
            max_idle_ticks: 30,
            combat_ticks: 10,
            min_faction_squads: 1,
            max_faction_squads: 1,
            spawn_frequency: 15,
            map: None,
            log_level: "warn".to_owned(),
            factions: default_factions(),
        }
    }
}

impl SimConfig {
    /// Read and validate a config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_owned(),
            source,
        })?;
        let config: Self = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    /// Check cross-field constraints that serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width <= 0 || self.height <= 0 {
            return Err(ConfigError::Invalid(format!(
                "grid must not be empty, got {}",
                self.bounds()
            )));
        }
        if self.cluster_size <= 0 {
            return Err(ConfigError::Invalid(format!(
                "cluster_size must be positive, got {}",
                self.cluster_size
            )));
        }
        if self.min_idle_ticks > self.max_idle_ticks {
            return Err(ConfigError::Invalid(format!(
                "min_idle_ticks ({}) exceeds max_idle_ticks ({})",
                self.min_idle_ticks, self.max_idle_ticks
            )));
        }
        if self.min_faction_squads > self.max_faction_squads {
            return Err(ConfigError::Invalid(format!(
                "min_faction_squads ({}) exceeds max_faction_squads ({})",
                self.min_faction_squads, self.max_faction_squads
            )));
        }
        if self.max_num_messages == 0 {
            return Err(ConfigError::Invalid(
                "max_num_messages must be positive".to_owned(),
            ));
        }
        self.level_filter()?;

        let mut names = HashSet::new();
        for faction in &self.factions {
            if !names.insert(faction.name.as_str()) {
                return Err(ConfigError::Invalid(format!(
                    "faction {:?} is listed twice",
                    faction.name
                )));
            }
        }
        for faction in &self.factions {
            if let Some(unknown) = faction.hostile.iter().find(|h| !names.contains(h.as_str())) {
                return Err(ConfigError::Invalid(format!(
                    "faction {:?} is hostile to unknown faction {unknown:?}",
                    faction.name
                )));
            }
            let in_unit = |v: f64| (0.0..=1.0).contains(&v);
            if faction.spawn_bias.is_some_and(|(bx, by)| !(in_unit(bx) && in_unit(by))) {
                return Err(ConfigError::Invalid(format!(
                    "spawn_bias of {:?} must lie within [0, 1]",
                    faction.name
                )));
            }
        }
        Ok(())
    }

    #[inline]
    pub fn bounds(&self) -> Bounds {
        Bounds::new(self.width, self.height)
    }

    /// Settings for the path planner.
    pub fn planner_config(&self) -> PlannerConfig {
        PlannerConfig {
            width: self.width,
            height: self.height,
            cluster_size: self.cluster_size,
            mode: self.mode,
            cache_capacity: self.cache_capacity,
        }
    }

    /// Maximum level for the stderr log subscriber.
    pub fn level_filter(&self) -> Result<log::LevelFilter, ConfigError> {
        log::LevelFilter::from_str(&self.log_level)
            .map_err(|_| ConfigError::Invalid(format!("unknown log level {:?}", self.log_level)))
    }

    pub fn faction(&self, name: &str) -> Option<&FactionConfig> {
        self.factions.iter().find(|f| f.name == name)
    }
}

/// Failure to obtain a usable [`SimConfig`].
#[derive(Debug)]
pub enum ConfigError {
    Io { path: PathBuf, source: io::Error },
    Parse(serde_json::Error),
    Invalid(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "cannot read config {}: {source}", path.display())
            }
            Self::Parse(err) => write!(f, "malformed config: {err}"),
            Self::Invalid(msg) => write!(f, "invalid config: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse(err) => Some(err),
            Self::Invalid(_) => None,
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = SimConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.bounds(), Bounds::new(40, 24));
        assert_eq!(config.planner_config(), PlannerConfig::default());
        assert_eq!(config.factions.len(), 7);
    }

    #[test]
    fn hostility_table() {
        let config = SimConfig::default();
        let stalker = config.faction("stalker").unwrap();
        assert!(stalker.is_hostile_to("mutant"));
        assert!(!stalker.is_hostile_to("ward"));
        let spark = config.faction("spark").unwrap();
        assert!(spark.is_hostile_to("ward"));
        assert!(!spark.is_hostile_to("military"));
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let config: SimConfig =
            serde_json::from_str(r#"{ "mode": "astar", "ticks": 3, "seed": 7 }"#).unwrap();
        assert_eq!(config.mode, PathfindingMode::Astar);
        assert_eq!(config.ticks, 3);
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.width, 40);
        assert_eq!(config.max_num_messages, 20);
    }

    #[test]
    fn faction_list_from_json() {
        let config: SimConfig = serde_json::from_str(
            r#"{ "factions": [
                { "name": "a", "hostile": ["b"], "spawn_bias": [0.1, 0.9] },
                { "name": "b" }
            ] }"#,
        )
        .unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.factions[0].spawn_bias, Some((0.1, 0.9)));
        assert!(config.factions[1].hostile.is_empty());
    }

    #[test]
    fn rejects_bad_values() {
        let empty = SimConfig {
            width: 0,
            ..SimConfig::default()
        };
        assert!(matches!(empty.validate(), Err(ConfigError::Invalid(_))));

        let idle = SimConfig {
            min_idle_ticks: 5,
            max_idle_ticks: 4,
            ..SimConfig::default()
        };
        assert!(idle.validate().is_err());

        let level = SimConfig {
            log_level: "loud".to_owned(),
            ..SimConfig::default()
        };
        assert!(level.validate().is_err());

        let mut unknown = SimConfig::default();
        unknown.factions[0].hostile.push("aliens".to_owned());
        let err = unknown.validate().unwrap_err();
        assert!(err.to_string().contains("aliens"));

        let mut twice = SimConfig::default();
        twice.factions.push(FactionConfig::new("ward", &[]));
        assert!(twice.validate().is_err());
    }

    #[test]
    fn unknown_mode_is_a_parse_error() {
        let err = serde_json::from_str::<SimConfig>(r#"{ "mode": "dijkstra" }"#).unwrap_err();
        assert!(ConfigError::from(err).to_string().starts_with("malformed config"));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = SimConfig::load(Path::new("/nonexistent/zone.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
