//! Pathfinding engine for the zone simulation.
//!
//! Routes are computed on a bounded grid with static obstacles, optionally
//! extended per query by a transient obstacle set:
//!
//! - **Direct** walk, ignoring obstacles ([`direct_path`])
//! - **A\*** with 4-directional moves and a shared path cache ([`orthogonal_path`])
//! - **A\*** with 8-directional moves ([`diagonal_path`])
//! - **HPA\*** over square clusters, refined into cells ([`hierarchical_path`])
//!
//! Most callers go through [`PathPlanner`], which picks the algorithm from
//! its [`PlannerConfig`] and owns the obstacle set, cluster data and cache.
//!
//! A path never contains its start cell and always ends at the goal. "No
//! path" is an ordinary `None`, not an error.

mod astar;
mod cache;
mod cluster;
mod diagonal;
mod direct;
mod distance;
mod hpa;
mod neighbors;
mod obstacles;
mod orthogonal;
mod planner;
mod traits;

pub use astar::astar;
pub use cache::{CACHE_MIN_DISTANCE, DEFAULT_CACHE_CAPACITY, PathCache};
pub use cluster::{ClusterGraph, ClusterId, Clusters};
pub use diagonal::{DIAGONAL_COST, diagonal_path};
pub use direct::direct_path;
pub use distance::{chebyshev, manhattan};
pub use hpa::hierarchical_path;
pub use neighbors::{ALL as ALL_DIRECTIONS, CARDINAL as CARDINAL_DIRECTIONS};
pub use obstacles::LayeredObstacles;
pub use orthogonal::orthogonal_path;
pub use planner::{ParseModeError, PathPlanner, PathfindingMode, PlannerConfig, PlannerError};
pub use traits::{AstarPather, Obstacles};
