//! Linear range mapping for derived motion outputs

use serde::{Deserialize, Serialize};

/// Maps values from an input range onto an output range.
///
/// Either range may be descending, which is how inverted axes are expressed.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RangeMap {
    pub input: (f64, f64),
    pub output: (f64, f64),
    /// Clamp results to the output range (default) or extrapolate
    #[serde(default = "default_clamp")]
    pub clamp: bool,
}

fn default_clamp() -> bool {
    true
}

impl RangeMap {
    pub const fn new(input: (f64, f64), output: (f64, f64)) -> Self {
        Self {
            input,
            output,
            clamp: true,
        }
    }

    pub fn unclamped(mut self) -> Self {
        self.clamp = false;
        self
    }

    /// Interpolate `value`. A degenerate input range maps to the output start.
    pub fn map(&self, value: f64) -> f64 {
        let (in_start, in_end) = self.input;
        let (out_start, out_end) = self.output;

        let span = in_end - in_start;
        if span.abs() < f64::EPSILON {
            return out_start;
        }

        let mut progress = (value - in_start) / span;
        if self.clamp {
            progress = progress.clamp(0.0, 1.0);
        }

        out_start + (out_end - out_start) * progress
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_maps_midpoint_and_ends() {
        let map = RangeMap::new((-0.5, 0.5), (-8.0, 8.0));
        assert_eq!(map.map(-0.5), -8.0);
        assert_eq!(map.map(0.0), 0.0);
        assert_eq!(map.map(0.25), 4.0);
        assert_eq!(map.map(0.5), 8.0);
    }

    #[test]
    fn test_descending_output_inverts() {
        let map = RangeMap::new((-0.5, 0.5), (5.0, -5.0));
        assert_eq!(map.map(-0.5), 5.0);
        assert_eq!(map.map(0.5), -5.0);
    }

    #[test]
    fn test_clamps_by_default() {
        let map = RangeMap::new((-0.5, 0.5), (-10.0, 10.0));
        assert_eq!(map.map(1.0), 10.0);
        assert_eq!(map.map(-3.0), -10.0);
        assert_eq!(map.unclamped().map(1.0), 20.0);
    }

    #[test]
    fn test_degenerate_input() {
        let map = RangeMap::new((1.0, 1.0), (3.0, 9.0));
        assert_eq!(map.map(42.0), 3.0);
    }
}
