use zone_core::Location;

/// Orthogonal step offsets, in expansion order: east, west, south, north.
pub const CARDINAL: [(i32, i32); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

/// All eight step offsets, in expansion order: starting south and turning
/// counter-clockwise on screen axes.
pub const ALL: [(i32, i32); 8] = [
    (0, 1),
    (1, 1),
    (1, 0),
    (1, -1),
    (0, -1),
    (-1, -1),
    (-1, 0),
    (-1, 1),
];

/// Push the orthogonal neighbours of `p` for which `keep` returns `true`.
#[inline]
pub(crate) fn cardinal(p: Location, keep: impl Fn(Location) -> bool, buf: &mut Vec<Location>) {
    for (dx, dy) in CARDINAL {
        let n = p.shift(dx, dy);
        if keep(n) {
            buf.push(n);
        }
    }
}

/// Push all eight neighbours of `p` for which `keep` returns `true`.
#[inline]
pub(crate) fn all(p: Location, keep: impl Fn(Location) -> bool, buf: &mut Vec<Location>) {
    for (dx, dy) in ALL {
        let n = p.shift(dx, dy);
        if keep(n) {
            buf.push(n);
        }
    }
}

/// Whether the step `from -> to` moves along both axes at once.
#[inline]
pub(crate) fn is_diagonal(from: Location, to: Location) -> bool {
    from.x != to.x && from.y != to.y
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filters_with_predicate() {
        let mut buf = Vec::new();
        cardinal(Location::ZERO, |n| n.x >= 0 && n.y >= 0, &mut buf);
        assert_eq!(buf, vec![Location::new(1, 0), Location::new(0, 1)]);

        buf.clear();
        all(Location::new(1, 1), |_| true, &mut buf);
        assert_eq!(buf.len(), 8);
        assert_eq!(buf[0], Location::new(1, 2));
        assert!(buf.iter().all(|&n| n.is_adjacent(Location::new(1, 1))));
    }

    #[test]
    fn diagonal_steps() {
        let p = Location::new(2, 2);
        assert!(is_diagonal(p, Location::new(3, 3)));
        assert!(!is_diagonal(p, Location::new(3, 2)));
    }
}
