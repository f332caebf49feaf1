//! Cursor glows
//!
//! [`CursorGlow`]: a highlight drifts from an element's center toward the
//! cursor. The pull fades linearly with distance and disappears beyond
//! `reach` times the element's larger side.
//!
//! [`CardGlow`]: an edge glow and a light reflection on a card, both derived
//! from one smoothed relative pointer offset.

use flux_animation::{AnimationScheduler, MotionPair, OwnerId, RangeMap, SpringConfig};
use flux_core::{Point, Rect, Result};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlowConfig {
    /// Falloff distance as a multiple of the element's larger side
    pub reach: f64,
    /// Fraction of the cursor offset followed at full intensity
    pub follow: f64,
    pub spring: SpringConfig,
}

impl Default for GlowConfig {
    fn default() -> Self {
        Self {
            reach: 0.8,
            follow: 0.3,
            spring: SpringConfig::gentle(),
        }
    }
}

impl GlowConfig {
    /// Glow displacement target for `element` given a screen-space cursor
    pub fn target(&self, element: &Rect, cursor: Option<Point>) -> Point {
        let Some(cursor) = cursor else {
            return Point::ZERO;
        };

        let center = element.center();
        let max_distance = element.width.max(element.height) * self.reach;
        let distance = cursor.distance(center);
        if distance >= max_distance {
            return Point::ZERO;
        }

        let intensity = 1.0 - distance / max_distance;
        (cursor - center) * (intensity * self.follow)
    }
}

/// A glow highlight bound to one element
#[derive(Clone, Debug)]
pub struct CursorGlow {
    config: GlowConfig,
    motion: MotionPair,
}

impl CursorGlow {
    pub fn new(scheduler: &mut AnimationScheduler, owner: OwnerId, config: GlowConfig) -> Result<Self> {
        Ok(Self {
            config,
            motion: MotionPair::create(scheduler, owner, Point::ZERO, config.spring)?,
        })
    }

    pub fn motion(&self) -> MotionPair {
        self.motion
    }

    pub fn apply(
        &self,
        scheduler: &mut AnimationScheduler,
        element: &Rect,
        cursor: Option<Point>,
    ) -> Result<()> {
        self.motion
            .set_target(scheduler, self.config.target(element, cursor))
    }

    pub fn offset(&self, scheduler: &AnimationScheduler) -> Result<Point> {
        self.motion.read(scheduler)
    }
}

/// Card glow layers
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CardGlowConfig {
    /// Relative pointer range mapped onto the full travel
    pub input: (f64, f64),
    /// Edge glow travel in pixels either side of center
    pub edge: f64,
    /// Reflection travel in pixels either side of center
    pub reflection: f64,
    pub spring: SpringConfig,
}

impl Default for CardGlowConfig {
    fn default() -> Self {
        Self {
            input: (-0.5, 0.5),
            edge: 50.0,
            reflection: 100.0,
            spring: SpringConfig::standard(),
        }
    }
}

impl CardGlowConfig {
    /// Layer offsets for a relative pointer offset
    pub fn layers(&self, relative: Point) -> CardGlowFrame {
        let layer = |travel: f64| {
            let map = RangeMap::new(self.input, (-travel, travel));
            Point::new(map.map(relative.x), map.map(relative.y))
        };
        CardGlowFrame {
            edge: layer(self.edge),
            reflection: layer(self.reflection),
        }
    }
}

/// Offsets of the card glow layers in pixels
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct CardGlowFrame {
    pub edge: Point,
    pub reflection: Point,
}

/// Glow layers that follow the pointer across a card
#[derive(Clone, Debug)]
pub struct CardGlow {
    config: CardGlowConfig,
    signal: MotionPair,
}

impl CardGlow {
    pub fn new(scheduler: &mut AnimationScheduler, owner: OwnerId, config: CardGlowConfig) -> Result<Self> {
        Ok(Self {
            config,
            signal: MotionPair::create(scheduler, owner, Point::ZERO, config.spring)?,
        })
    }

    pub fn signal(&self) -> MotionPair {
        self.signal
    }

    /// Retarget from a relative pointer offset; `None` recenters both layers
    pub fn apply(&self, scheduler: &mut AnimationScheduler, relative: Option<Point>) -> Result<()> {
        self.signal
            .set_target(scheduler, relative.unwrap_or(Point::ZERO))
    }

    pub fn read(&self, scheduler: &AnimationScheduler) -> Result<CardGlowFrame> {
        Ok(self.config.layers(self.signal.read(scheduler)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_glow_fades_with_distance() {
        let config = GlowConfig::default();
        let element = Rect::new(0.0, 0.0, 100.0, 100.0);

        let near = config.target(&element, Some(Point::new(60.0, 50.0)));
        let far = config.target(&element, Some(Point::new(110.0, 50.0)));

        // 10px out: intensity 1 - 10/80
        assert!((near.x - 10.0 * (1.0 - 10.0 / 80.0) * 0.3).abs() < 1e-12);
        // 60px out: intensity 1 - 60/80
        assert!((far.x - 60.0 * (1.0 - 60.0 / 80.0) * 0.3).abs() < 1e-12);
        assert_eq!(near.y, 0.0);
    }

    #[test]
    fn test_glow_rests_outside_reach() {
        let config = GlowConfig::default();
        let element = Rect::new(0.0, 0.0, 100.0, 50.0);
        assert_eq!(config.target(&element, Some(Point::new(200.0, 25.0))), Point::ZERO);
        assert_eq!(config.target(&element, None), Point::ZERO);
    }

    #[test]
    fn test_card_layers_span_their_travel() {
        let config = CardGlowConfig::default();

        let corner = config.layers(Point::new(0.5, -0.5));
        assert_eq!(corner.edge, Point::new(50.0, -50.0));
        assert_eq!(corner.reflection, Point::new(100.0, -100.0));

        let quarter = config.layers(Point::new(0.25, 0.0));
        assert_eq!(quarter.edge, Point::new(25.0, 0.0));
        assert_eq!(quarter.reflection, Point::new(50.0, 0.0));
        assert_eq!(config.layers(Point::ZERO), CardGlowFrame::default());
    }

    #[test]
    fn test_card_glow_follows_and_recenters() {
        let mut scheduler = AnimationScheduler::new();
        let owner = scheduler.register_owner();
        let glow = CardGlow::new(&mut scheduler, owner, CardGlowConfig::default()).unwrap();

        glow.apply(&mut scheduler, Some(Point::new(0.2, 0.4))).unwrap();
        for _ in 0..10 {
            scheduler.tick(16.0);
            let frame = glow.read(&scheduler).unwrap();
            // Both layers ride the same smoothed signal
            assert!((frame.reflection.x - 2.0 * frame.edge.x).abs() < 1e-9);
            assert!((frame.reflection.y - 2.0 * frame.edge.y).abs() < 1e-9);
        }
        for _ in 0..90 {
            scheduler.tick(16.0);
        }
        let frame = glow.read(&scheduler).unwrap();
        assert!((frame.edge.x - 20.0).abs() < 0.01);
        assert!((frame.reflection.y - 80.0).abs() < 0.01);

        glow.apply(&mut scheduler, None).unwrap();
        for _ in 0..120 {
            scheduler.tick(16.0);
        }
        assert_eq!(glow.read(&scheduler).unwrap(), CardGlowFrame::default());
    }
}
