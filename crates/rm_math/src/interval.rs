/// A closed range of scalars.
///
/// Used for the marcher's travel bounds and for clamping linear color
/// before gamma encoding.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    pub min: f32,
    pub max: f32,
}

impl Interval {
    /// The unit interval [0, 1].
    pub const UNIT: Interval = Interval { min: 0.0, max: 1.0 };

    /// Create a new interval given min and max values.
    pub fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Returns true if x is within the interval [min, max] (inclusive).
    pub fn contains(&self, x: f32) -> bool {
        self.min <= x && x <= self.max
    }

    /// Clamps x to be within the interval [min, max].
    pub fn clamp(&self, x: f32) -> f32 {
        x.clamp(self.min, self.max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interval_contains() {
        let interval = Interval::new(0.0, 100.0);

        // Inclusive bounds
        assert!(interval.contains(0.0));
        assert!(interval.contains(100.0));
        assert!(interval.contains(42.0));

        assert!(!interval.contains(-0.1));
        assert!(!interval.contains(100.1));
        assert!(!interval.contains(f32::INFINITY));
    }

    #[test]
    fn test_interval_clamp() {
        let unit = Interval::UNIT;

        assert_eq!(unit.clamp(-5.0), 0.0);
        assert_eq!(unit.clamp(0.25), 0.25);
        assert_eq!(unit.clamp(1.0), 1.0);
        assert_eq!(unit.clamp(3.0), 1.0);
    }
}
