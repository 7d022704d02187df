//! Coarse grid partitioning for hierarchical search.
//!
//! The map is cut into square clusters of `size × size` cells (truncated at
//! the right and bottom edges). Clusters are linked to their eight
//! neighbours when a cheap border check finds an open cell across the shared
//! edge.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use zone_core::{Bounds, Location};

use crate::neighbors;
use crate::traits::{AstarPather, Obstacles};

/// Cluster coordinates: `(x / size, y / size)` of the cells it contains.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ClusterId {
    pub x: i32,
    pub y: i32,
}

impl ClusterId {
    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The cluster owning `loc`. Off-map cells map to clusters that do not
    /// exist rather than folding onto the edge clusters.
    #[inline]
    pub fn of(loc: Location, size: i32) -> Self {
        Self::new(loc.x.div_euclid(size), loc.y.div_euclid(size))
    }

    #[inline]
    const fn shift(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

impl fmt::Display for ClusterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}, {}>", self.x, self.y)
    }
}

// ---------------------------------------------------------------------------
// Clusters
// ---------------------------------------------------------------------------

/// Partition of a map into clusters. Fixed once built.
#[derive(Clone, Debug)]
pub struct Clusters {
    bounds: Bounds,
    size: i32,
    cells: BTreeMap<ClusterId, Vec<Location>>,
}

impl Clusters {
    /// Partition `bounds` into clusters of `size` cells per side.
    ///
    /// Every on-map cell belongs to exactly one cluster. Cells are listed
    /// column by column inside each cluster.
    ///
    /// # Panics
    ///
    /// Panics if `size` is not positive.
    pub fn new(bounds: Bounds, size: i32) -> Self {
        assert!(size > 0, "cluster size must be positive, got {size}");
        let mut cells = BTreeMap::new();
        if !bounds.is_empty() {
            for x0 in (0..bounds.width).step_by(size as usize) {
                for y0 in (0..bounds.height).step_by(size as usize) {
                    let id = ClusterId::new(x0 / size, y0 / size);
                    let x1 = (x0 + size).min(bounds.width);
                    let y1 = (y0 + size).min(bounds.height);
                    let members: Vec<Location> = (x0..x1)
                        .flat_map(|x| (y0..y1).map(move |y| Location::new(x, y)))
                        .collect();
                    cells.insert(id, members);
                }
            }
        }
        Self {
            bounds,
            size,
            cells,
        }
    }

    /// Side length of a full cluster.
    #[inline]
    pub fn size(&self) -> i32 {
        self.size
    }

    #[inline]
    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// Number of clusters.
    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    #[inline]
    pub fn cluster_of(&self, loc: Location) -> ClusterId {
        ClusterId::of(loc, self.size)
    }

    #[inline]
    pub fn contains(&self, id: ClusterId) -> bool {
        self.cells.contains_key(&id)
    }

    /// Cells owned by `id`; empty for unknown clusters.
    pub fn cells(&self, id: ClusterId) -> &[Location] {
        self.cells.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// All cluster ids, in ascending order.
    pub fn ids(&self) -> impl Iterator<Item = ClusterId> + '_ {
        self.cells.keys().copied()
    }
}

// ---------------------------------------------------------------------------
// ClusterGraph
// ---------------------------------------------------------------------------

/// Adjacency between clusters whose shared border looks walkable.
#[derive(Clone, Debug, Default)]
pub struct ClusterGraph {
    links: HashMap<ClusterId, Vec<ClusterId>>,
}

impl ClusterGraph {
    /// Link every pair of 8-adjacent clusters for which some cell of the
    /// source cluster, projected one cluster width towards the neighbour,
    /// lands on an open on-map cell.
    ///
    /// The check samples projections instead of scanning the border, so an
    /// edge may be reported open when only a non-adjacent cell is free.
    pub fn build<O: Obstacles + ?Sized>(clusters: &Clusters, obstacles: &O) -> Self {
        let bounds = clusters.bounds();
        let size = clusters.size();
        let mut links = HashMap::with_capacity(clusters.len());
        for id in clusters.ids() {
            let cells = clusters.cells(id);
            let mut adjacent = Vec::new();
            for (dx, dy) in neighbors::ALL {
                let nid = id.shift(dx, dy);
                if !clusters.contains(nid) {
                    continue;
                }
                let open = cells.iter().any(|c| {
                    let across = c.shift(dx * size, dy * size);
                    bounds.contains(across) && !obstacles.is_blocked(across)
                });
                if open {
                    adjacent.push(nid);
                }
            }
            links.insert(id, adjacent);
        }
        Self { links }
    }

    /// Linked neighbours of `id`.
    pub fn neighbors(&self, id: ClusterId) -> &[ClusterId] {
        self.links.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Whether `from` links to `to`.
    pub fn is_linked(&self, from: ClusterId, to: ClusterId) -> bool {
        self.neighbors(from).contains(&to)
    }
}

/// Uniform-cost search over the cluster graph with the Manhattan heuristic.
pub(crate) struct ClusterPather<'a> {
    pub(crate) graph: &'a ClusterGraph,
}

impl AstarPather for ClusterPather<'_> {
    type Node = ClusterId;

    fn neighbors(&self, node: ClusterId, buf: &mut Vec<ClusterId>) {
        buf.extend_from_slice(self.graph.neighbors(node));
    }

    fn cost(&self, _from: ClusterId, _to: ClusterId) -> f64 {
        1.0
    }

    fn estimate(&self, from: ClusterId, to: ClusterId) -> f64 {
        f64::from((from.x - to.x).abs() + (from.y - to.y).abs())
    }
}
