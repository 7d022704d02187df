//! Static map contents and spawn placement.

use std::collections::HashSet;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use zone_core::{Bounds, Location};

use crate::messages::{MessageLog, MsgKind};

/// Share of each grid dimension covered by a biased spawn area.
pub const DEFAULT_SPAWN_FRACTION: f64 = 0.2;

/// Everything on the map that does not move.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AreaMap {
    pub obstacles: HashSet<Location>,
    pub pois: HashSet<Location>,
    pub fields: HashSet<Location>,
    pub traders: HashSet<Location>,
}

/// Accepted map file layouts.
#[derive(Deserialize)]
#[serde(untagged)]
enum MapFile {
    /// A bare list of obstacle cells.
    Obstacles(HashSet<Location>),
    Full(AreaMap),
}

impl AreaMap {
    /// Read a map file and check that it fits in `bounds`.
    pub fn load(path: &Path, bounds: Bounds) -> Result<Self, MapError> {
        let text = std::fs::read_to_string(path).map_err(|source| MapError::Io {
            path: path.to_owned(),
            source,
        })?;
        let map = match serde_json::from_str(&text)? {
            MapFile::Obstacles(obstacles) => AreaMap {
                obstacles,
                ..AreaMap::default()
            },
            MapFile::Full(map) => map,
        };
        map.check(bounds)?;
        Ok(map)
    }

    /// Like [`load`](Self::load), but a missing or unreadable file gives an
    /// empty map and a note in `log`. Maps that do not fit are still errors.
    pub fn load_or_empty(
        path: Option<&Path>,
        bounds: Bounds,
        log: &mut MessageLog,
    ) -> Result<Self, MapError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        match Self::load(path, bounds) {
            Ok(map) => {
                log::info!(
                    "loaded map {} with {} obstacles",
                    path.display(),
                    map.obstacles.len()
                );
                Ok(map)
            }
            Err(err @ (MapError::Io { .. } | MapError::Parse(_))) => {
                log::warn!("{err}");
                log.push(
                    MsgKind::Info,
                    None,
                    &format!("map {} not loaded, using an empty map", path.display()),
                );
                Ok(Self::default())
            }
            Err(err) => Err(err),
        }
    }

    fn check(&self, bounds: Bounds) -> Result<(), MapError> {
        let layers = [
            &self.obstacles,
            &self.pois,
            &self.fields,
            &self.traders,
        ];
        for layer in layers {
            // Report the smallest offender so the message is stable.
            if let Some(&loc) = layer.iter().filter(|&&l| !bounds.contains(l)).min() {
                return Err(MapError::OutOfBounds { loc, bounds });
            }
        }
        Ok(())
    }

    #[inline]
    pub fn is_obstacle(&self, loc: Location) -> bool {
        self.obstacles.contains(&loc)
    }
}

/// Half-open rectangle `[min, max)` where a faction's squads appear.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpawnArea {
    pub min: Location,
    pub max: Location,
}

impl SpawnArea {
    /// The whole grid.
    pub fn full(bounds: Bounds) -> Self {
        Self {
            min: Location::ZERO,
            max: Location::new(bounds.width, bounds.height),
        }
    }

    /// A box of `fractions` of the grid centred on `bias`, both given as
    /// fractions of the grid size, clamped to the grid. `None` for either
    /// argument means the whole grid or [`DEFAULT_SPAWN_FRACTION`].
    pub fn new(bounds: Bounds, bias: Option<(f64, f64)>, fractions: Option<(f64, f64)>) -> Self {
        let Some((bx, by)) = bias else {
            return Self::full(bounds);
        };
        let (fx, fy) = fractions.unwrap_or((DEFAULT_SPAWN_FRACTION, DEFAULT_SPAWN_FRACTION));
        let span = |size: i32, centre: f64, frac: f64| {
            let size_f = f64::from(size);
            let half = size_f * frac.clamp(0.0, 1.0) / 2.0;
            let c = size_f * centre.clamp(0.0, 1.0);
            let lo = ((c - half).round() as i32).clamp(0, size);
            let hi = ((c + half).round() as i32).clamp(0, size);
            // Never collapse to an empty range.
            if lo < hi {
                (lo, hi)
            } else if lo < size {
                (lo, lo + 1)
            } else {
                (size - 1, size)
            }
        };
        let (x0, x1) = span(bounds.width, bx, fx);
        let (y0, y1) = span(bounds.height, by, fy);
        Self {
            min: Location::new(x0, y0),
            max: Location::new(x1, y1),
        }
    }

    pub fn contains(&self, loc: Location) -> bool {
        (self.min.x..self.max.x).contains(&loc.x) && (self.min.y..self.max.y).contains(&loc.y)
    }

    pub fn is_empty(&self) -> bool {
        self.min.x >= self.max.x || self.min.y >= self.max.y
    }
}

/// Failure to load an [`AreaMap`].
#[derive(Debug)]
pub enum MapError {
    Io { path: PathBuf, source: io::Error },
    Parse(serde_json::Error),
    OutOfBounds { loc: Location, bounds: Bounds },
}

impl fmt::Display for MapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "cannot read map {}: {source}", path.display()),
            Self::Parse(err) => write!(f, "malformed map: {err}"),
            Self::OutOfBounds { loc, bounds } => {
                write!(f, "map cell {loc} lies outside the {bounds} grid")
            }
        }
    }
}

impl std::error::Error for MapError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse(err) => Some(err),
            Self::OutOfBounds { .. } => None,
        }
    }
}

impl From<serde_json::Error> for MapError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_file(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("zone-map-{}-{name}", std::process::id()));
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn bare_obstacle_list() {
        let path = temp_file("bare.json", "[[1, 2], [3, 4]]");
        let map = AreaMap::load(&path, Bounds::new(10, 10)).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(map.obstacles.len(), 2);
        assert!(map.is_obstacle(Location::new(3, 4)));
        assert!(map.traders.is_empty());
    }

    #[test]
    fn full_object() {
        let path = temp_file(
            "full.json",
            r#"{ "obstacles": [[0, 0]], "traders": [[5, 5]], "pois": [[1, 1], [2, 2]] }"#,
        );
        let map = AreaMap::load(&path, Bounds::new(10, 10)).unwrap();
        std::fs::remove_file(&path).ok();
        assert!(map.is_obstacle(Location::ZERO));
        assert!(map.traders.contains(&Location::new(5, 5)));
        assert_eq!(map.pois.len(), 2);
        assert!(map.fields.is_empty());
    }

    #[test]
    fn out_of_bounds_is_error() {
        let path = temp_file("oob.json", "[[1, 2], [12, 4]]");
        let mut log = MessageLog::new(4);
        let err = AreaMap::load_or_empty(Some(&path), Bounds::new(10, 10), &mut log).unwrap_err();
        std::fs::remove_file(&path).ok();
        assert!(matches!(
            err,
            MapError::OutOfBounds { loc, .. } if loc == Location::new(12, 4)
        ));
        assert!(log.is_empty());
    }

    #[test]
    fn missing_file_gives_empty_map() {
        let mut log = MessageLog::new(4);
        let path = Path::new("/nonexistent/zone-map.json");
        let map = AreaMap::load_or_empty(Some(path), Bounds::new(10, 10), &mut log).unwrap();
        assert_eq!(map, AreaMap::default());
        let entry = log.entries().next().unwrap();
        assert_eq!(entry.kind, MsgKind::Info);
        assert!(entry.text.contains("EMPTY MAP"));
    }

    #[test]
    fn no_path_gives_empty_map_silently() {
        let mut log = MessageLog::new(4);
        let map = AreaMap::load_or_empty(None, Bounds::new(10, 10), &mut log).unwrap();
        assert!(map.obstacles.is_empty());
        assert!(log.is_empty());
    }

    #[test]
    fn spawn_area_without_bias_is_whole_grid() {
        let bounds = Bounds::new(40, 24);
        let area = SpawnArea::new(bounds, None, None);
        assert_eq!(area, SpawnArea::full(bounds));
        assert!(area.contains(Location::new(39, 23)));
        assert!(!area.contains(Location::new(40, 0)));
    }

    #[test]
    fn spawn_area_centred_on_bias() {
        let area = SpawnArea::new(Bounds::new(40, 20), Some((0.5, 0.5)), None);
        assert_eq!(area.min, Location::new(16, 8));
        assert_eq!(area.max, Location::new(24, 12));
    }

    #[test]
    fn spawn_area_clamped_at_edges() {
        let bounds = Bounds::new(40, 20);
        let area = SpawnArea::new(bounds, Some((0.0, 1.0)), Some((0.5, 0.5)));
        assert_eq!(area.min, Location::new(0, 15));
        assert_eq!(area.max, Location::new(10, 20));
        let tiny = SpawnArea::new(bounds, Some((1.0, 0.0)), Some((0.0, 0.0)));
        assert!(!tiny.is_empty());
        assert!(tiny.contains(Location::new(39, 0)));
    }
}
