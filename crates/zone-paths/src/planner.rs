//! The single entry point used by the simulation: [`PathPlanner`].

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use zone_core::{Bounds, Location};

use crate::cache::{DEFAULT_CACHE_CAPACITY, PathCache};
use crate::cluster::{ClusterGraph, Clusters};
use crate::diagonal::diagonal_path;
use crate::direct::direct_path;
use crate::hpa::hierarchical_path;
use crate::obstacles::LayeredObstacles;
use crate::orthogonal::orthogonal_path;
use crate::traits::Obstacles;

// ---------------------------------------------------------------------------
// PathfindingMode
// ---------------------------------------------------------------------------

/// Which algorithm a [`PathPlanner`] runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "kebab-case")
)]
pub enum PathfindingMode {
    /// Straight walk towards the goal, ignoring obstacles.
    Simple,
    /// 4-directional A* with the path cache.
    Astar,
    /// 8-directional A*.
    DiagonalAstar,
    /// Hierarchical A* over clusters, refined with 8-directional moves.
    #[default]
    Hpa,
}

impl PathfindingMode {
    pub const ALL: [PathfindingMode; 4] = [
        PathfindingMode::Simple,
        PathfindingMode::Astar,
        PathfindingMode::DiagonalAstar,
        PathfindingMode::Hpa,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Simple => "simple",
            Self::Astar => "astar",
            Self::DiagonalAstar => "diagonal-astar",
            Self::Hpa => "hpa",
        }
    }
}

impl fmt::Display for PathfindingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PathfindingMode {
    type Err = ParseModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|mode| mode.as_str() == s)
            .ok_or_else(|| ParseModeError(s.to_string()))
    }
}

/// An unrecognised pathfinding mode name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseModeError(pub String);

impl fmt::Display for ParseModeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown pathfinding mode {:?} (expected simple, astar, diagonal-astar or hpa)",
            self.0
        )
    }
}

impl std::error::Error for ParseModeError {}

// ---------------------------------------------------------------------------
// PlannerConfig / PlannerError
// ---------------------------------------------------------------------------

/// Construction parameters of a [`PathPlanner`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct PlannerConfig {
    pub width: i32,
    pub height: i32,
    /// Side length of an HPA* cluster.
    pub cluster_size: i32,
    pub mode: PathfindingMode,
    /// Maximum number of cached orthogonal paths; 0 disables the cache.
    pub cache_capacity: usize,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            width: 40,
            height: 24,
            cluster_size: 40,
            mode: PathfindingMode::Hpa,
            cache_capacity: DEFAULT_CACHE_CAPACITY,
        }
    }
}

impl PlannerConfig {
    #[inline]
    pub fn bounds(&self) -> Bounds {
        Bounds::new(self.width, self.height)
    }
}

/// Invalid [`PlannerConfig`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlannerError {
    /// Width or height is not positive.
    EmptyGrid { width: i32, height: i32 },
    /// Cluster size is not positive.
    InvalidClusterSize(i32),
}

impl fmt::Display for PlannerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyGrid { width, height } => {
                write!(f, "planner: grid {width}x{height} has no cells")
            }
            Self::InvalidClusterSize(size) => {
                write!(f, "planner: cluster size must be positive, got {size}")
            }
        }
    }
}

impl std::error::Error for PlannerError {}

// ---------------------------------------------------------------------------
// PathPlanner
// ---------------------------------------------------------------------------

/// Pathfinding engine for one map.
///
/// Holds the static obstacles, the cluster partition, the precomputed
/// cluster graph (HPA* mode only) and the path cache. Queries take `&self`;
/// the planner can be shared between threads.
#[derive(Debug)]
pub struct PathPlanner {
    config: PlannerConfig,
    obstacles: Arc<HashSet<Location>>,
    clusters: Clusters,
    graph: Option<ClusterGraph>,
    cache: PathCache,
}

impl PathPlanner {
    /// Build a planner for `config` with the given static obstacles.
    ///
    /// In HPA* mode the cluster graph is computed here, once, so queries that
    /// add no obstacles never pay for it.
    pub fn new(
        config: PlannerConfig,
        obstacles: impl Into<Arc<HashSet<Location>>>,
    ) -> Result<Self, PlannerError> {
        if config.width <= 0 || config.height <= 0 {
            return Err(PlannerError::EmptyGrid {
                width: config.width,
                height: config.height,
            });
        }
        if config.cluster_size <= 0 {
            return Err(PlannerError::InvalidClusterSize(config.cluster_size));
        }

        let obstacles = obstacles.into();
        let clusters = Clusters::new(config.bounds(), config.cluster_size);
        let graph = (config.mode == PathfindingMode::Hpa).then(|| {
            log::info!(
                "pre-computing HPA* cluster links ({} clusters of {}x{})",
                clusters.len(),
                config.cluster_size,
                config.cluster_size
            );
            ClusterGraph::build(&clusters, obstacles.as_ref())
        });

        Ok(Self {
            config,
            obstacles,
            clusters,
            graph,
            cache: PathCache::new(config.cache_capacity),
        })
    }

    /// Find a path from `start` to `goal` avoiding the static obstacles and
    /// `extra`.
    ///
    /// The result starts with the cell after `start` and ends with `goal`;
    /// it is empty when `start == goal`. `None` means no path was found, or
    /// that an endpoint lies off the map.
    pub fn find_path(
        &self,
        start: Location,
        goal: Location,
        extra: Option<&HashSet<Location>>,
    ) -> Option<Vec<Location>> {
        let bounds = self.bounds();
        if !bounds.contains(start) || !bounds.contains(goal) {
            log::debug!("path request {start} -> {goal} leaves the {bounds} map");
            return None;
        }

        let obstacles = LayeredObstacles::new(&self.obstacles, extra);
        let path = match self.config.mode {
            PathfindingMode::Simple => Some(direct_path(start, goal)),
            PathfindingMode::Astar => orthogonal_path(bounds, start, goal, &obstacles, &self.cache),
            PathfindingMode::DiagonalAstar => diagonal_path(bounds, start, goal, &obstacles),
            PathfindingMode::Hpa => {
                let graph = self.graph.as_ref().filter(|_| !obstacles.diverges());
                hierarchical_path(&self.clusters, graph, start, goal, &obstacles)
            }
        };
        if path.is_none() {
            log::debug!("no {} path from {start} to {goal}", self.config.mode);
        }
        path
    }

    /// Whether `loc` is off the map or blocked by the static obstacles or
    /// `extra`.
    pub fn is_blocked(&self, loc: Location, extra: Option<&HashSet<Location>>) -> bool {
        !self.bounds().contains(loc)
            || LayeredObstacles::new(&self.obstacles, extra).is_blocked(loc)
    }

    #[inline]
    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    #[inline]
    pub fn mode(&self) -> PathfindingMode {
        self.config.mode
    }

    #[inline]
    pub fn bounds(&self) -> Bounds {
        self.config.bounds()
    }

    /// The static obstacle set.
    #[inline]
    pub fn obstacles(&self) -> &Arc<HashSet<Location>> {
        &self.obstacles
    }

    #[inline]
    pub fn clusters(&self) -> &Clusters {
        &self.clusters
    }

    /// The precomputed cluster graph; only present in HPA* mode.
    #[inline]
    pub fn cluster_graph(&self) -> Option<&ClusterGraph> {
        self.graph.as_ref()
    }

    /// Number of cached orthogonal paths.
    pub fn cache_len(&self) -> usize {
        self.cache.len()
    }

    pub fn clear_cache(&self) {
        self.cache.clear();
    }
}
