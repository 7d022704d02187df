use std::collections::HashSet;

use zone_core::Location;

use crate::traits::Obstacles;

/// The effective obstacle set of one query: the engine's static set plus an
/// optional per-query transient set.
///
/// Neither layer is copied or mutated; membership checks consult both.
#[derive(Clone, Copy, Debug)]
pub struct LayeredObstacles<'a> {
    base: &'a HashSet<Location>,
    extra: Option<&'a HashSet<Location>>,
}

impl<'a> LayeredObstacles<'a> {
    pub fn new(base: &'a HashSet<Location>, extra: Option<&'a HashSet<Location>>) -> Self {
        Self { base, extra }
    }

    /// Whether the transient layer blocks any cell the static layer leaves
    /// open, i.e. whether the union differs from the static set.
    pub fn diverges(&self) -> bool {
        self.extra
            .is_some_and(|extra| extra.iter().any(|loc| !self.base.contains(loc)))
    }
}

impl Obstacles for LayeredObstacles<'_> {
    #[inline]
    fn is_blocked(&self, loc: Location) -> bool {
        self.base.contains(&loc) || self.extra.is_some_and(|extra| extra.contains(&loc))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn union_of_layers() {
        let base: HashSet<_> = [Location::new(1, 1)].into_iter().collect();
        let extra: HashSet<_> = [Location::new(2, 2)].into_iter().collect();
        let layered = LayeredObstacles::new(&base, Some(&extra));
        assert!(layered.is_blocked(Location::new(1, 1)));
        assert!(layered.is_blocked(Location::new(2, 2)));
        assert!(!layered.is_blocked(Location::new(3, 3)));
        assert!(layered.diverges());
    }

    #[test]
    fn subset_does_not_diverge() {
        let base: HashSet<_> = [Location::new(1, 1), Location::new(4, 0)].into_iter().collect();
        let extra: HashSet<_> = [Location::new(4, 0)].into_iter().collect();
        let empty = HashSet::new();
        assert!(!LayeredObstacles::new(&base, Some(&extra)).diverges());
        assert!(!LayeredObstacles::new(&base, Some(&empty)).diverges());
        assert!(!LayeredObstacles::new(&base, None).diverges());
    }
}
