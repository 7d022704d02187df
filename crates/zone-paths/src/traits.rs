use std::collections::HashSet;
use std::hash::{BuildHasher, Hash};

use zone_core::Location;

/// A set of impassable cells.
pub trait Obstacles {
    /// Whether `loc` cannot be entered.
    fn is_blocked(&self, loc: Location) -> bool;
}

impl<S: BuildHasher> Obstacles for HashSet<Location, S> {
    #[inline]
    fn is_blocked(&self, loc: Location) -> bool {
        self.contains(&loc)
    }
}

impl<T: Obstacles + ?Sized> Obstacles for &T {
    #[inline]
    fn is_blocked(&self, loc: Location) -> bool {
        (**self).is_blocked(loc)
    }
}

/// Graph interface driving the generic A* search.
///
/// Implemented for the cell grid (orthogonal and diagonal movement) and for
/// the coarse cluster graph.
pub trait AstarPather {
    /// Search node. Its ordering breaks ties between equally good frontier
    /// entries.
    type Node: Copy + Eq + Hash + Ord;

    /// Append neighbours of `node` into `buf`. The caller clears `buf` before
    /// calling.
    fn neighbors(&self, node: Self::Node, buf: &mut Vec<Self::Node>);

    /// Cost of moving from `from` to adjacent `to`. Must be > 0.
    fn cost(&self, from: Self::Node, to: Self::Node) -> f64;

    /// Heuristic estimate of the cost from `from` to `to`.
    /// Must never overestimate the true cost (admissible).
    fn estimate(&self, from: Self::Node, to: Self::Node) -> f64;

    /// A precomputed remainder of the route from `node` to `goal`, excluding
    /// `node`. Returning one ends the search immediately.
    fn shortcut(&self, _node: Self::Node, _goal: Self::Node) -> Option<Vec<Self::Node>> {
        None
    }
}
