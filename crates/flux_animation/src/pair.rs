//! Two motion values animated as a 2D point

use crate::scheduler::{AnimationScheduler, MotionId, OwnerId};
use crate::spring::SpringConfig;
use flux_core::{Point, Result};

/// Paired x/y motion values sharing one spring config
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MotionPair {
    pub x: MotionId,
    pub y: MotionId,
}

impl MotionPair {
    pub fn create(
        scheduler: &mut AnimationScheduler,
        owner: OwnerId,
        initial: Point,
        config: SpringConfig,
    ) -> Result<Self> {
        let x = scheduler.create_owned(owner, initial.x, config)?;
        let y = scheduler.create_owned(owner, initial.y, config)?;
        Ok(Self { x, y })
    }

    pub fn read(&self, scheduler: &AnimationScheduler) -> Result<Point> {
        Ok(Point::new(scheduler.read(self.x)?, scheduler.read(self.y)?))
    }

    pub fn target(&self, scheduler: &AnimationScheduler) -> Result<Point> {
        Ok(Point::new(
            scheduler.get(self.x)?.target(),
            scheduler.get(self.y)?.target(),
        ))
    }

    pub fn set_target(&self, scheduler: &mut AnimationScheduler, target: Point) -> Result<()> {
        scheduler.set_target(self.x, target.x)?;
        scheduler.set_target(self.y, target.y)
    }

    pub fn jump(&self, scheduler: &mut AnimationScheduler, value: Point) -> Result<()> {
        scheduler.jump(self.x, value.x)?;
        scheduler.jump(self.y, value.y)
    }

    pub fn release(&self, scheduler: &mut AnimationScheduler) -> Result<()> {
        scheduler.release(self.x)?;
        scheduler.release(self.y)
    }
}
