//! Magnetic attraction
//!
//! An element leans toward the cursor by a fixed fraction of the
//! cursor-to-center offset, and springs back to rest when the pointer leaves.

use flux_animation::{AnimationScheduler, MotionPair, OwnerId, SpringConfig};
use flux_core::{Point, Rect, Result};
use serde::{Deserialize, Serialize};

/// Magnetic binding parameters
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MagneticConfig {
    /// Fraction of the cursor offset applied, in `(0, 1]`
    pub strength: f64,
    pub spring: SpringConfig,
}

impl MagneticConfig {
    /// Call-to-action buttons
    pub fn button() -> Self {
        Self {
            strength: 0.3,
            spring: SpringConfig::standard(),
        }
    }

    /// Large background orbs that trail the cursor
    pub fn orb() -> Self {
        Self {
            strength: 0.1,
            spring: SpringConfig::drift(),
        }
    }
}

impl Default for MagneticConfig {
    fn default() -> Self {
        Self::button()
    }
}

/// Displacement target for an element centered at `center`
pub fn attraction(center: Point, cursor: Option<Point>, strength: f64) -> Point {
    match cursor {
        Some(cursor) => (cursor - center) * strength,
        None => Point::ZERO,
    }
}

/// One element pulled toward the pointer
#[derive(Clone, Debug)]
pub struct MagneticBinding {
    strength: f64,
    motion: MotionPair,
}

impl MagneticBinding {
    pub fn new(
        scheduler: &mut AnimationScheduler,
        owner: OwnerId,
        config: &MagneticConfig,
    ) -> Result<Self> {
        debug_assert!(
            config.strength > 0.0 && config.strength <= 1.0,
            "magnetic strength must be in (0, 1]"
        );
        Ok(Self {
            strength: config.strength,
            motion: MotionPair::create(scheduler, owner, Point::ZERO, config.spring)?,
        })
    }

    pub fn strength(&self) -> f64 {
        self.strength
    }

    pub fn motion(&self) -> MotionPair {
        self.motion
    }

    /// Retarget from the element geometry and a screen-space cursor
    pub fn apply(
        &self,
        scheduler: &mut AnimationScheduler,
        element: &Rect,
        cursor: Option<Point>,
    ) -> Result<()> {
        let target = attraction(element.center(), cursor, self.strength);
        self.motion.set_target(scheduler, target)
    }

    /// Smoothed displacement from the element's resting position
    pub fn offset(&self, scheduler: &AnimationScheduler) -> Result<Point> {
        self.motion.read(scheduler)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attraction_scales_offset() {
        let center = Point::new(100.0, 100.0);
        assert_eq!(
            attraction(center, Some(Point::new(150.0, 80.0)), 0.3),
            Point::new(50.0 * 0.3, -20.0 * 0.3)
        );
        assert_eq!(attraction(center, None, 0.3), Point::ZERO);
    }

    #[test]
    fn test_leave_springs_back_instead_of_jumping() {
        let mut scheduler = AnimationScheduler::new();
        let owner = scheduler.register_owner();
        let binding = MagneticBinding::new(&mut scheduler, owner, &MagneticConfig::button()).unwrap();
        let element = Rect::new(0.0, 0.0, 100.0, 40.0);

        binding
            .apply(&mut scheduler, &element, Some(Point::new(100.0, 40.0)))
            .unwrap();
        for _ in 0..60 {
            scheduler.tick(16.0);
        }
        let pulled = binding.offset(&scheduler).unwrap();
        assert!((pulled.x - 15.0).abs() < 0.1);
        assert!((pulled.y - 6.0).abs() < 0.1);

        binding.apply(&mut scheduler, &element, None).unwrap();
        assert_eq!(binding.offset(&scheduler).unwrap(), pulled);

        scheduler.tick(16.0);
        let after = binding.offset(&scheduler).unwrap();
        assert!(after.x < pulled.x && after.x > 0.0);

        for _ in 0..120 {
            scheduler.tick(16.0);
        }
        assert_eq!(binding.offset(&scheduler).unwrap(), Point::ZERO);
    }
}
