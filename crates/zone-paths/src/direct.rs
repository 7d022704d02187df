use zone_core::Location;

use crate::traits::Obstacles;

/// Walk straight from `start` towards `dest`, ignoring obstacles.
///
/// Each step moves one cell along every axis that is not yet aligned, so
/// diagonal steps come first and the walk takes exactly
/// `max(|dx|, |dy|)` steps. The result excludes `start` and ends at `dest`.
pub fn direct_path(start: Location, dest: Location) -> Vec<Location> {
    let steps = (dest.x - start.x).abs().max((dest.y - start.y).abs());
    let mut path = Vec::with_capacity(steps as usize);
    let mut cur = start;
    while cur != dest {
        cur = cur.shift((dest.x - cur.x).signum(), (dest.y - cur.y).signum());
        path.push(cur);
    }
    path
}

/// Whether any cell of `path` is blocked.
#[inline]
pub(crate) fn crosses<O: Obstacles + ?Sized>(path: &[Location], obstacles: &O) -> bool {
    path.iter().any(|&c| obstacles.is_blocked(c))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn diagonal_walk() {
        let path = direct_path(Location::new(0, 0), Location::new(9, 9));
        let expected: Vec<_> = (1..=9).map(|i| Location::new(i, i)).collect();
        assert_eq!(path, expected);
    }

    #[test]
    fn diagonal_then_straight() {
        let path = direct_path(Location::new(2, 1), Location::new(5, 7));
        assert_eq!(
            path,
            vec![
                Location::new(3, 2),
                Location::new(4, 3),
                Location::new(5, 4),
                Location::new(5, 5),
                Location::new(5, 6),
                Location::new(5, 7),
            ]
        );
    }

    #[test]
    fn length_is_chebyshev_and_steps_are_adjacent() {
        let cases = [
            (Location::new(7, 3), Location::new(0, 0)),
            (Location::new(0, 9), Location::new(4, 0)),
            (Location::new(5, 5), Location::new(5, 1)),
        ];
        for (start, dest) in cases {
            let path = direct_path(start, dest);
            assert_eq!(path.len() as i32, crate::chebyshev(start, dest));
            assert_eq!(path.last(), Some(&dest));
            let mut prev = start;
            for &step in &path {
                assert!(prev.is_adjacent(step));
                prev = step;
            }
        }
    }

    #[test]
    fn same_cell_is_empty() {
        assert!(direct_path(Location::new(3, 3), Location::new(3, 3)).is_empty());
    }

    #[test]
    fn detects_blocked_cells() {
        let path = direct_path(Location::new(0, 0), Location::new(4, 4));
        let mut obstacles = HashSet::new();
        assert!(!crosses(&path, &obstacles));
        obstacles.insert(Location::new(2, 2));
        assert!(crosses(&path, &obstacles));
    }
}
