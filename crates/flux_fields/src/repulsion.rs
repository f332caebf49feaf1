//! Cursor repulsion
//!
//! A particle within `radius` of the cursor is pushed directly away from it.
//! The push falls off as `((radius - d) / radius)^1.5`, so it is strongest
//! right under the cursor and vanishes at the edge of the field.

use flux_core::{Point, Rect};
use serde::{Deserialize, Serialize};

/// Repulsion field parameters
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RepulsionConfig {
    /// Field radius in pixels
    pub radius: f64,
    /// Maximum push distance in pixels
    pub strength: f64,
}

impl Default for RepulsionConfig {
    fn default() -> Self {
        Self {
            radius: 100.0,
            strength: 80.0,
        }
    }
}

/// Result of evaluating the field for one particle
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum RepulsionOutcome {
    /// Pointer absent or out of range: relax toward home
    Relax,
    /// Inside the field: move to `target` (already clamped to the container)
    Displace {
        target: Point,
        /// Push vector before clamping
        displacement: Point,
    },
    /// Cursor exactly on the particle; direction undefined, sample ignored
    Skip,
}

impl RepulsionConfig {
    /// Falloff factor in `[0, 1]` for a cursor `distance` away
    pub fn force(&self, distance: f64) -> f64 {
        if distance >= self.radius {
            return 0.0;
        }
        ((self.radius - distance) / self.radius).powf(1.5)
    }

    /// Evaluate the field for a particle at container-local `position`.
    ///
    /// `cursor` is container-local too, `None` when the pointer is absent.
    pub fn evaluate(&self, position: Point, cursor: Option<Point>, bounds: &Rect) -> RepulsionOutcome {
        let Some(cursor) = cursor else {
            return RepulsionOutcome::Relax;
        };

        let distance = position.distance(cursor);
        if distance >= self.radius {
            return RepulsionOutcome::Relax;
        }

        let Some(away) = (position - cursor).normalize() else {
            return RepulsionOutcome::Skip;
        };

        let displacement = away * (self.strength * self.force(distance));
        RepulsionOutcome::Displace {
            target: bounds.clamp_local(position + displacement),
            displacement,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bounds() -> Rect {
        Rect::new(100.0, 100.0, 100.0, 100.0)
    }

    #[test]
    fn test_absent_pointer_relaxes() {
        let field = RepulsionConfig::default();
        assert_eq!(
            field.evaluate(Point::new(50.0, 50.0), None, &bounds()),
            RepulsionOutcome::Relax
        );
    }

    #[test]
    fn test_out_of_range_relaxes() {
        let field = RepulsionConfig::default();
        let outcome = field.evaluate(Point::new(0.0, 0.0), Some(Point::new(100.0, 0.0)), &bounds());
        assert_eq!(outcome, RepulsionOutcome::Relax);
    }

    #[test]
    fn test_diagonal_cursor_pushes_toward_origin() {
        // Particle at (50, 50), cursor at local (100, 100): ~70.7px apart
        let field = RepulsionConfig::default();
        let outcome = field.evaluate(Point::new(50.0, 50.0), Some(Point::new(100.0, 100.0)), &bounds());

        let RepulsionOutcome::Displace { target, .. } = outcome else {
            panic!("expected displacement, got {:?}", outcome);
        };
        assert!(target.x < 50.0 && target.y < 50.0);
        assert!(target.x >= 0.0 && target.y >= 0.0);
        assert!((target.x - target.y).abs() < 1e-9);

        let expected = 50.0 - 80.0 * field.force(50.0 * 2f64.sqrt()) / 2f64.sqrt();
        assert!((target.x - expected).abs() < 1e-9);
    }

    #[test]
    fn test_zero_distance_is_skipped() {
        let field = RepulsionConfig::default();
        let outcome = field.evaluate(Point::new(20.0, 30.0), Some(Point::new(20.0, 30.0)), &bounds());
        assert_eq!(outcome, RepulsionOutcome::Skip);
    }

    #[test]
    fn test_push_is_clamped_to_bounds() {
        let field = RepulsionConfig::default();
        let outcome = field.evaluate(Point::new(2.0, 50.0), Some(Point::new(5.0, 50.0)), &bounds());
        let RepulsionOutcome::Displace { target, displacement } = outcome else {
            panic!("expected displacement");
        };
        assert_eq!(target, Point::new(0.0, 50.0));
        assert!(displacement.x < -2.0);
    }

    #[test]
    fn test_force_falloff() {
        let field = RepulsionConfig::default();
        assert_eq!(field.force(100.0), 0.0);
        assert_eq!(field.force(150.0), 0.0);
        assert!((field.force(0.0) - 1.0).abs() < 1e-12);
        assert!(field.force(25.0) > field.force(75.0));
    }
}
