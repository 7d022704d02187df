use zone_core::{Bounds, Location};

use crate::astar::astar;
use crate::distance::chebyshev;
use crate::neighbors;
use crate::traits::{AstarPather, Obstacles};

/// Cost of a diagonal step. Strictly greater than an orthogonal step.
pub const DIAGONAL_COST: f64 = 1.4142;

/// 8-directional movement with the Chebyshev heuristic.
struct DiagonalPather<'a, O: ?Sized> {
    bounds: Bounds,
    obstacles: &'a O,
}

impl<O: Obstacles + ?Sized> AstarPather for DiagonalPather<'_, O> {
    type Node = Location;

    fn neighbors(&self, node: Location, buf: &mut Vec<Location>) {
        neighbors::all(
            node,
            |n| self.bounds.contains(n) && !self.obstacles.is_blocked(n),
            buf,
        );
    }

    fn cost(&self, from: Location, to: Location) -> f64 {
        if neighbors::is_diagonal(from, to) {
            DIAGONAL_COST
        } else {
            1.0
        }
    }

    fn estimate(&self, from: Location, to: Location) -> f64 {
        f64::from(chebyshev(from, to))
    }
}

/// Compute a cheapest 8-directional path from `start` to `goal`.
///
/// Returns the path excluding `start`, or `None` if `goal` cannot be reached
/// inside `bounds`.
pub fn diagonal_path<O: Obstacles + ?Sized>(
    bounds: Bounds,
    start: Location,
    goal: Location,
    obstacles: &O,
) -> Option<Vec<Location>> {
    astar(&DiagonalPather { bounds, obstacles }, start, goal)
}
