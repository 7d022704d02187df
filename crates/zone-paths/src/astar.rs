use std::cmp::Ordering;
use std::collections::hash_map::Entry;
use std::collections::{BinaryHeap, HashMap, HashSet};
use std::hash::Hash;

use crate::traits::AstarPather;

/// Frontier entry ordered for use in `BinaryHeap`: smallest `f` first, then
/// smallest `g`, then smallest node.
struct Frontier<N> {
    f: f64,
    g: f64,
    node: N,
}

impl<N: Ord> Ord for Frontier<N> {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse so BinaryHeap (max-heap) pops the best entry first.
        other
            .f
            .total_cmp(&self.f)
            .then_with(|| other.g.total_cmp(&self.g))
            .then_with(|| other.node.cmp(&self.node))
    }
}

impl<N: Ord> PartialOrd for Frontier<N> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<N: Ord> PartialEq for Frontier<N> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<N: Ord> Eq for Frontier<N> {}

/// Compute a cheapest route from `start` to `goal` with A*.
///
/// Returns the nodes after `start` up to and including `goal` (empty when
/// `start == goal`), or `None` once the frontier is exhausted. Every node is
/// expanded at most once.
pub fn astar<P: AstarPather>(
    pather: &P,
    start: P::Node,
    goal: P::Node,
) -> Option<Vec<P::Node>> {
    if start == goal {
        return Some(Vec::new());
    }

    let mut open = BinaryHeap::new();
    let mut g_score: HashMap<P::Node, f64> = HashMap::new();
    let mut came_from: HashMap<P::Node, P::Node> = HashMap::new();
    let mut closed: HashSet<P::Node> = HashSet::new();

    g_score.insert(start, 0.0);
    open.push(Frontier {
        f: pather.estimate(start, goal),
        g: 0.0,
        node: start,
    });

    let mut nbuf = Vec::with_capacity(8);

    while let Some(Frontier { g, node, .. }) = open.pop() {
        if closed.contains(&node) {
            continue;
        }
        if node == goal {
            return Some(reconstruct(&came_from, node));
        }
        if let Some(rest) = pather.shortcut(node, goal) {
            let mut path = reconstruct(&came_from, node);
            path.extend(rest);
            return Some(path);
        }
        closed.insert(node);

        nbuf.clear();
        pather.neighbors(node, &mut nbuf);

        for &next in nbuf.iter() {
            if closed.contains(&next) {
                continue;
            }
            let tentative_g = g + pather.cost(node, next);
            match g_score.entry(next) {
                Entry::Occupied(mut e) => {
                    if tentative_g >= *e.get() {
                        continue;
                    }
                    e.insert(tentative_g);
                }
                Entry::Vacant(e) => {
                    e.insert(tentative_g);
                }
            }
            came_from.insert(next, node);
            open.push(Frontier {
                f: tentative_g + pather.estimate(next, goal),
                g: tentative_g,
                node: next,
            });
        }
    }

    None
}

/// Walk parent links back from `node`. The root (which has no parent) is
/// left out.
fn reconstruct<N: Copy + Eq + Hash>(came_from: &HashMap<N, N>, node: N) -> Vec<N> {
    let mut path = vec![node];
    let mut cur = node;
    while let Some(&parent) = came_from.get(&cur) {
        path.push(parent);
        cur = parent;
    }
    // The last pushed node is the root.
    path.pop();
    path.reverse();
    path
}
