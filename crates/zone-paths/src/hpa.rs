//! Hierarchical path-finding (HPA*).
//!
//! A route is first planned over the cluster graph, then refined hop by hop
//! into cells: walk to the nearest open cell on the border of the next
//! cluster, trying a straight walk before falling back to diagonal A*. The
//! hierarchy only speeds things up; whenever it cannot produce a plan the
//! search falls back to diagonal A* over the whole map.

use zone_core::{Bounds, Location};

use crate::astar::astar;
use crate::cluster::{ClusterGraph, ClusterId, ClusterPather, Clusters};
use crate::diagonal::diagonal_path;
use crate::direct::{crosses, direct_path};
use crate::distance::manhattan;
use crate::traits::Obstacles;

/// Compute an 8-directional path from `start` to `goal` through the cluster
/// hierarchy.
///
/// `graph` is a cluster graph built for exactly these `obstacles`; pass
/// `None` to have a scratch graph built for this call only. The result
/// excludes `start`. It is not guaranteed to be the shortest path.
pub fn hierarchical_path<O: Obstacles + ?Sized>(
    clusters: &Clusters,
    graph: Option<&ClusterGraph>,
    start: Location,
    goal: Location,
    obstacles: &O,
) -> Option<Vec<Location>> {
    let bounds = clusters.bounds();
    let start_cluster = clusters.cluster_of(start);
    let goal_cluster = clusters.cluster_of(goal);
    if start_cluster == goal_cluster {
        return diagonal_path(bounds, start, goal, obstacles);
    }

    let scratch;
    let graph = match graph {
        Some(graph) => graph,
        None => {
            log::trace!("building scratch cluster graph for {start} -> {goal}");
            scratch = ClusterGraph::build(clusters, obstacles);
            &scratch
        }
    };

    let Some(hops) = astar(&ClusterPather { graph }, start_cluster, goal_cluster) else {
        return diagonal_path(bounds, start, goal, obstacles);
    };

    let mut path = Vec::new();
    let mut current = start;
    let mut from = start_cluster;
    for to in hops {
        let Some(border) = border_cell(clusters, from, to, current, obstacles) else {
            return diagonal_path(bounds, start, goal, obstacles);
        };
        from = to;
        if border == current {
            continue;
        }
        path.extend(refine(bounds, current, border, obstacles)?);
        current = border;
    }
    path.extend(refine(bounds, current, goal, obstacles)?);
    Some(path)
}

/// The open cell of `from` touching `to` that is closest to `current`.
/// Ties go to the cell listed first.
fn border_cell<O: Obstacles + ?Sized>(
    clusters: &Clusters,
    from: ClusterId,
    to: ClusterId,
    current: Location,
    obstacles: &O,
) -> Option<Location> {
    clusters
        .cells(from)
        .iter()
        .copied()
        .filter(|&c| {
            c.neighbors_8()
                .iter()
                .any(|&n| clusters.cluster_of(n) == to)
        })
        .filter(|&c| !obstacles.is_blocked(c))
        .min_by_key(|&c| manhattan(c, current))
}

/// Connect two cells: the straight walk if it is clear, diagonal A*
/// otherwise.
fn refine<O: Obstacles + ?Sized>(
    bounds: Bounds,
    from: Location,
    to: Location,
    obstacles: &O,
) -> Option<Vec<Location>> {
    let straight = direct_path(from, to);
    if !crosses(&straight, obstacles) {
        return Some(straight);
    }
    diagonal_path(bounds, from, to, obstacles)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn loc(x: i32, y: i32) -> Location {
        Location::new(x, y)
    }

    fn set(cells: &[(i32, i32)]) -> HashSet<Location> {
        cells.iter().map(|&(x, y)| loc(x, y)).collect()
    }

    fn assert_valid(
        path: &[Location],
        start: Location,
        goal: Location,
        obstacles: &HashSet<Location>,
    ) {
        let mut prev = start;
        for &step in path {
            assert!(prev.is_adjacent(step), "{prev} -> {step} is not a single step");
            assert!(!obstacles.contains(&step), "{step} is an obstacle");
            prev = step;
        }
        assert_eq!(prev, goal);
    }

    #[test]
    fn matches_diagonal_search_on_small_clusters() {
        let bounds = Bounds::new(10, 10);
        let obstacles = set(&[(5, 5), (6, 6), (8, 8)]);
        let clusters = Clusters::new(bounds, 2);
        let hpa = hierarchical_path(&clusters, None, loc(0, 0), loc(9, 9), &obstacles);
        let flat = diagonal_path(bounds, loc(0, 0), loc(9, 9), &obstacles);
        assert!(hpa.is_some());
        assert_eq!(hpa, flat);
    }

    #[test]
    fn single_cluster_delegates_to_diagonal_search() {
        let bounds = Bounds::new(10, 10);
        let obstacles = set(&[(5, 5), (6, 6), (8, 8)]);
        let clusters = Clusters::new(bounds, 10);
        assert_eq!(clusters.len(), 1);
        assert_eq!(
            hierarchical_path(&clusters, None, loc(0, 0), loc(9, 9), &obstacles),
            diagonal_path(bounds, loc(0, 0), loc(9, 9), &obstacles)
        );
    }

    #[test]
    fn blocked_row_is_unreachable() {
        let bounds = Bounds::new(10, 10);
        let obstacles: HashSet<_> = (0..10).map(|x| loc(x, 5)).collect();
        let clusters = Clusters::new(bounds, 2);
        assert_eq!(hierarchical_path(&clusters, None, loc(0, 0), loc(9, 9), &obstacles), None);
    }

    #[test]
    fn enclosed_goal_aborts_refinement() {
        let bounds = Bounds::new(10, 10);
        let ring: HashSet<_> = (6..=8)
            .flat_map(|x| (6..=8).map(move |y| loc(x, y)))
            .filter(|&c| c != loc(7, 7))
            .collect();
        let clusters = Clusters::new(bounds, 5);
        let graph = ClusterGraph::build(&clusters, &ring);
        let (from, to) = (ClusterId::new(0, 0), ClusterId::new(1, 1));

        // The hierarchy plans a hop and finds a border cell; only the last
        // segment into the ring fails.
        assert!(graph.is_linked(from, to));
        assert_eq!(border_cell(&clusters, from, to, loc(1, 1), &ring), Some(loc(4, 4)));
        assert_eq!(refine(bounds, loc(1, 1), loc(4, 4), &ring).map(|p| p.len()), Some(3));
        assert_eq!(refine(bounds, loc(4, 4), loc(7, 7), &ring), None);

        assert_eq!(hierarchical_path(&clusters, Some(&graph), loc(1, 1), loc(7, 7), &ring), None);
        assert_eq!(hierarchical_path(&clusters, None, loc(1, 1), loc(7, 7), &ring), None);
    }

    #[test]
    fn crosses_wall_through_gap() {
        let bounds = Bounds::new(20, 20);
        let obstacles: HashSet<_> = (0..18).map(|y| loc(10, y)).collect();
        let clusters = Clusters::new(bounds, 5);
        let graph = ClusterGraph::build(&clusters, &obstacles);
        let path =
            hierarchical_path(&clusters, Some(&graph), loc(2, 2), loc(17, 3), &obstacles).unwrap();
        assert_valid(&path, loc(2, 2), loc(17, 3), &obstacles);
        assert!(path.contains(&loc(10, 18)) || path.contains(&loc(10, 19)));
    }

    #[test]
    fn precomputed_and_scratch_graphs_agree() {
        let bounds = Bounds::new(20, 20);
        let obstacles: HashSet<_> = (0..18).map(|y| loc(10, y)).collect();
        let clusters = Clusters::new(bounds, 5);
        let graph = ClusterGraph::build(&clusters, &obstacles);
        assert_eq!(
            hierarchical_path(&clusters, Some(&graph), loc(2, 2), loc(17, 3), &obstacles),
            hierarchical_path(&clusters, None, loc(2, 2), loc(17, 3), &obstacles)
        );
    }

    #[test]
    fn same_cell_is_empty() {
        let clusters = Clusters::new(Bounds::new(10, 10), 3);
        assert_eq!(
            hierarchical_path(&clusters, None, loc(4, 4), loc(4, 4), &HashSet::<Location>::new()),
            Some(vec![])
        );
    }

    #[test]
    fn border_cell_is_nearest_open_edge_cell() {
        let clusters = Clusters::new(Bounds::new(8, 4), 4);
        let from = ClusterId::new(0, 0);
        let to = ClusterId::new(1, 0);
        let none: HashSet<Location> = HashSet::new();
        assert_eq!(border_cell(&clusters, from, to, loc(0, 2), &none), Some(loc(3, 2)));

        let blocked = set(&[(3, 2)]);
        // (3, 1) and (3, 3) are equally close; the first listed wins.
        assert_eq!(border_cell(&clusters, from, to, loc(0, 2), &blocked), Some(loc(3, 1)));
    }
}
