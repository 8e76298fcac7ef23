/// A closed scalar range `[min, max]`.
///
/// Serves two roles: the valid hit distance window of a ray query (tested
/// with [`Interval::surrounds`], which excludes both ends) and the display
/// range colors are clamped into (tested with [`Interval::contains`] /
/// [`Interval::clamp`], which include both ends).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    pub min: f64,
    pub max: f64,
}

impl Interval {
    /// An empty interval (min > max, contains nothing).
    pub const EMPTY: Interval = Interval {
        min: f64::INFINITY,
        max: f64::NEG_INFINITY,
    };

    /// A universe interval (contains everything).
    pub const UNIVERSE: Interval = Interval {
        min: f64::NEG_INFINITY,
        max: f64::INFINITY,
    };

    /// Create a new interval given min and max values.
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Returns the size of the interval (max - min).
    pub fn size(&self) -> f64 {
        self.max - self.min
    }

    /// Returns true if x is within the interval [min, max] (inclusive).
    pub fn contains(&self, x: f64) -> bool {
        self.min <= x && x <= self.max
    }

    /// Returns true if x is strictly within the interval (min, max) (exclusive).
    pub fn surrounds(&self, x: f64) -> bool {
        self.min < x && x < self.max
    }

    /// Clamps x to be within the interval [min, max].
    ///
    /// Unlike `f64::clamp` this never panics on an empty interval; the
    /// result is then `min`.
    pub fn clamp(&self, x: f64) -> f64 {
        self.min.max(self.max.min(x))
    }

    /// Same interval with its upper bound moved to `max`.
    pub fn with_max(&self, max: f64) -> Interval {
        Interval::new(self.min, max)
    }
}

impl Default for Interval {
    fn default() -> Self {
        Self::EMPTY
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interval_size() {
        assert_eq!(Interval::new(2.0, 7.0).size(), 5.0);
        assert_eq!(Interval::new(-5.0, 5.0).size(), 10.0);
    }

    #[test]
    fn test_interval_contains() {
        let interval = Interval::new(0.0, 10.0);

        // Inclusive bounds
        assert!(interval.contains(0.0));
        assert!(interval.contains(10.0));
        assert!(interval.contains(5.0));

        assert!(!interval.contains(-0.1));
        assert!(!interval.contains(10.1));
    }

    #[test]
    fn test_interval_surrounds() {
        let interval = Interval::new(0.0, 10.0);

        // Exclusive bounds - endpoints NOT included
        assert!(!interval.surrounds(0.0));
        assert!(!interval.surrounds(10.0));

        assert!(interval.surrounds(5.0));
        assert!(interval.surrounds(0.1));
        assert!(interval.surrounds(9.9));

        assert!(!interval.surrounds(-0.1));
        assert!(!interval.surrounds(10.1));
    }

    #[test]
    fn test_contains_matches_definition_and_surrounds_is_stronger() {
        let intervals = [
            Interval::new(0.0, 1.0),
            Interval::new(-3.5, 2.0),
            Interval::new(0.001, f64::INFINITY),
            Interval::new(4.0, 4.0),
            Interval::EMPTY,
            Interval::UNIVERSE,
        ];
        let values = [-10.0, -3.5, -1.0, 0.0, 0.001, 0.5, 1.0, 2.0, 4.0, 1e300];

        for interval in intervals {
            for x in values {
                assert_eq!(
                    interval.contains(x),
                    interval.min <= x && x <= interval.max,
                    "{interval:?} contains {x}"
                );
                if interval.surrounds(x) {
                    assert!(interval.contains(x));
                }
                assert!(!interval.surrounds(interval.min));
                assert!(!interval.surrounds(interval.max));
            }
        }
    }

    #[test]
    fn test_interval_clamp() {
        let interval = Interval::new(0.0, 1.0);

        assert_eq!(interval.clamp(-5.0), 0.0);
        assert_eq!(interval.clamp(0.0), 0.0);
        assert_eq!(interval.clamp(0.25), 0.25);
        assert_eq!(interval.clamp(1.0), 1.0);
        assert_eq!(interval.clamp(15.0), 1.0);
    }

    #[test]
    fn test_interval_empty() {
        let empty = Interval::EMPTY;

        assert!(empty.min > empty.max);
        assert_eq!(empty.size(), f64::NEG_INFINITY);
        assert!(!empty.contains(0.0));
        assert!(!empty.contains(f64::INFINITY));
        assert_eq!(Interval::default(), empty);
    }

    #[test]
    fn test_interval_universe() {
        let universe = Interval::UNIVERSE;

        assert!(universe.contains(0.0));
        assert!(universe.contains(1e10));
        assert!(universe.contains(-1e10));
        assert_eq!(universe.size(), f64::INFINITY);
    }

    #[test]
    fn test_with_max_narrows_upper_bound() {
        let window = Interval::new(0.001, f64::INFINITY).with_max(3.0);
        assert_eq!(window, Interval::new(0.001, 3.0));
    }
}
