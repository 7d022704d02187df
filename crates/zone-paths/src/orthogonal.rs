use zone_core::{Bounds, Location};

use crate::astar::astar;
use crate::cache::{CACHE_MIN_DISTANCE, PathCache};
use crate::direct::crosses;
use crate::distance::manhattan;
use crate::neighbors;
use crate::traits::{AstarPather, Obstacles};

/// 4-directional movement with unit step cost and the Manhattan heuristic.
///
/// Expanded cells that already have a cached route to the goal finish the
/// search through [`AstarPather::shortcut`].
struct OrthogonalPather<'a, O: ?Sized> {
    bounds: Bounds,
    obstacles: &'a O,
    cache: &'a PathCache,
}

impl<O: Obstacles + ?Sized> AstarPather for OrthogonalPather<'_, O> {
    type Node = Location;

    fn neighbors(&self, node: Location, buf: &mut Vec<Location>) {
        neighbors::cardinal(
            node,
            |n| self.bounds.contains(n) && !self.obstacles.is_blocked(n),
            buf,
        );
    }

    fn cost(&self, _from: Location, _to: Location) -> f64 {
        1.0
    }

    fn estimate(&self, from: Location, to: Location) -> f64 {
        f64::from(manhattan(from, to))
    }

    fn shortcut(&self, node: Location, goal: Location) -> Option<Vec<Location>> {
        let path = self
            .cache
            .get_if(node, goal, |path| !crosses(path, self.obstacles))?;
        log::trace!("path cache hit {node} -> {goal}");
        Some(path)
    }
}

/// Compute a minimum-step orthogonal path from `start` to `goal`.
///
/// Consults `cache` for routes from any expanded cell to `goal` and stores
/// the result under `(start, goal)` when the endpoints are more than
/// [`CACHE_MIN_DISTANCE`] apart. Returns the path excluding `start`, or
/// `None` if `goal` cannot be reached inside `bounds`.
pub fn orthogonal_path<O: Obstacles + ?Sized>(
    bounds: Bounds,
    start: Location,
    goal: Location,
    obstacles: &O,
    cache: &PathCache,
) -> Option<Vec<Location>> {
    let pather = OrthogonalPather {
        bounds,
        obstacles,
        cache,
    };
    let path = astar(&pather, start, goal)?;
    if manhattan(start, goal) > CACHE_MIN_DISTANCE {
        cache.insert(start, goal, path.clone());
    }
    Some(path)
}
