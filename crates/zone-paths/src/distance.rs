use zone_core::Location;

/// Manhattan (L1) distance between two locations.
#[inline]
pub fn manhattan(a: Location, b: Location) -> i32 {
    (a.x - b.x).abs() + (a.y - b.y).abs()
}

/// Chebyshev (L∞) distance between two locations.
#[inline]
pub fn chebyshev(a: Location, b: Location) -> i32 {
    (a.x - b.x).abs().max((a.y - b.y).abs())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metrics() {
        let a = Location::new(0, 0);
        let b = Location::new(3, -7);
        assert_eq!(manhattan(a, b), 10);
        assert_eq!(chebyshev(a, b), 7);
        assert_eq!(manhattan(b, b), 0);
        assert_eq!(chebyshev(b, a), chebyshev(a, b));
    }
}
