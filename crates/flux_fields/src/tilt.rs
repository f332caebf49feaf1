//! 3D tilt
//!
//! The normalized pointer offset is smoothed by a single spring pair, and
//! every output (rotation about X, rotation about Y, depth) is derived from
//! that one signal at read time. Smoothing each output separately lets the
//! axes drift out of sync, so the rig never does that.
//!
//! The axes are crossed and inverted: vertical offset drives X rotation and
//! horizontal offset drives Y rotation, so the surface tilts toward the cursor.

use flux_animation::{AnimationScheduler, MotionId, MotionPair, OwnerId, RangeMap, SpringConfig};
use flux_core::{Point, Result};
use serde::{Deserialize, Serialize};

/// Tilt ranges
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TiltConfig {
    /// Normalized pointer range mapped onto the full output range
    pub input: (f64, f64),
    /// Peak rotation about the X axis, degrees
    pub rotate_x: f64,
    /// Peak rotation about the Y axis, degrees
    pub rotate_y: f64,
    /// Peak depth translation in pixels; a missing key means no depth
    #[serde(default)]
    pub depth: Option<f64>,
    pub spring: SpringConfig,
}

impl TiltConfig {
    /// Landing hero: strong tilt with a depth parallax
    pub fn hero() -> Self {
        Self {
            input: (-0.5, 0.5),
            rotate_x: 8.0,
            rotate_y: 8.0,
            depth: Some(20.0),
            spring: SpringConfig::gentle(),
        }
    }

    /// Full-width sections: subtle tilt
    pub fn section() -> Self {
        Self {
            rotate_x: 5.0,
            rotate_y: 5.0,
            depth: None,
            ..Self::hero()
        }
    }

    /// Product cards
    pub fn card() -> Self {
        Self {
            rotate_x: 10.0,
            rotate_y: 10.0,
            depth: None,
            ..Self::hero()
        }
    }

    /// Derive the transform for a normalized pointer offset
    pub fn transform(&self, normalized: Point) -> TiltTransform {
        let rotate_x = RangeMap::new(self.input, (self.rotate_x, -self.rotate_x)).map(normalized.y);
        let rotate_y = RangeMap::new(self.input, (-self.rotate_y, self.rotate_y)).map(normalized.x);
        let translate_z = self
            .depth
            .map(|depth| RangeMap::new(self.input, (-depth, depth)).map(normalized.y))
            .unwrap_or(0.0);

        TiltTransform {
            rotate_x,
            rotate_y,
            translate_z,
        }
    }
}

impl Default for TiltConfig {
    fn default() -> Self {
        Self::hero()
    }
}

/// Rotation in degrees and depth in pixels
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct TiltTransform {
    pub rotate_x: f64,
    pub rotate_y: f64,
    pub translate_z: f64,
}

/// Tilt rig for one container
#[derive(Clone, Debug)]
pub struct TiltMapper {
    config: TiltConfig,
    signal: MotionPair,
}

impl TiltMapper {
    pub fn new(scheduler: &mut AnimationScheduler, owner: OwnerId, config: TiltConfig) -> Result<Self> {
        Ok(Self {
            config,
            signal: MotionPair::create(scheduler, owner, Point::ZERO, config.spring)?,
        })
    }

    pub fn config(&self) -> &TiltConfig {
        &self.config
    }

    pub fn signal(&self) -> MotionPair {
        self.signal
    }

    /// Retarget from a normalized pointer offset; `None` levels the surface
    pub fn apply(&self, scheduler: &mut AnimationScheduler, normalized: Option<Point>) -> Result<()> {
        self.signal
            .set_target(scheduler, normalized.unwrap_or(Point::ZERO))
    }

    pub fn read(&self, scheduler: &AnimationScheduler) -> Result<TiltTransform> {
        Ok(self.config.transform(self.signal.read(scheduler)?))
    }
}

/// Hover lift parameters
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LiftConfig {
    /// Depth in pixels while hovered
    pub height: f64,
    pub spring: SpringConfig,
}

impl Default for LiftConfig {
    fn default() -> Self {
        Self {
            height: 20.0,
            spring: SpringConfig::lift(),
        }
    }
}

/// Depth float that rises while the pointer is over the container
#[derive(Clone, Debug)]
pub struct HoverLift {
    height: f64,
    motion: MotionId,
}

impl HoverLift {
    pub fn new(scheduler: &mut AnimationScheduler, owner: OwnerId, config: LiftConfig) -> Result<Self> {
        Ok(Self {
            height: config.height,
            motion: scheduler.create_owned(owner, 0.0, config.spring)?,
        })
    }

    pub fn motion(&self) -> MotionId {
        self.motion
    }

    pub fn apply(&self, scheduler: &mut AnimationScheduler, hovered: bool) -> Result<()> {
        let target = if hovered { self.height } else { 0.0 };
        scheduler.set_target(self.motion, target)
    }

    pub fn read(&self, scheduler: &AnimationScheduler) -> Result<f64> {
        scheduler.read(self.motion)
    }
}
