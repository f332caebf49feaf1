//! Cursor-reactive particle field
//!
//! A fixed population of particles is scattered over the container when it
//! is first laid out. Each particle springs between its home and the
//! position the repulsion field pushes it to. Resizing moves homes back
//! inside the new bounds instead of scattering a new population.
//!
//! All positions are container-local pixels.

use crate::pulse::{AmbientPulse, PulseFrame};
use crate::repulsion::{RepulsionConfig, RepulsionOutcome};
use flux_animation::{AnimationScheduler, MotionPair, OwnerId, SpringConfig};
use flux_core::{MotionError, Point, Rect, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Opacity and scale of an idle particle
const IDLE_EMPHASIS: (f64, f64) = (0.5, 1.0);
/// Opacity and scale of a particle inside the repulsion field
const HOVER_EMPHASIS: (f64, f64) = (0.9, 1.8);
/// Seconds to ease between idle and hover emphasis
const HOVER_TRANSITION: f64 = 0.2;

/// Particle field parameters
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParticleConfig {
    pub count: u32,
    /// Diameter range in pixels
    pub size: (f64, f64),
    /// Ambient pulse period range in seconds
    pub pulse_period: (f64, f64),
    /// Pulse start delay between consecutive particles, seconds
    pub stagger: f64,
    /// Fixed layout seed; random when unset
    pub seed: Option<u64>,
    pub spring: SpringConfig,
    pub repulsion: RepulsionConfig,
}

impl Default for ParticleConfig {
    fn default() -> Self {
        Self {
            count: 40,
            size: (3.0, 6.0),
            pulse_period: (3.0, 5.0),
            stagger: 0.05,
            seed: None,
            spring: SpringConfig::particle(),
            repulsion: RepulsionConfig::default(),
        }
    }
}

impl ParticleConfig {
    /// Reject ranges the layout sampler cannot draw from
    pub fn validate(&self) -> Result<()> {
        let reason = if !is_ordered_range(self.size) {
            "size must be a positive, ordered range"
        } else if !is_ordered_range(self.pulse_period) {
            "pulse_period must be a positive, ordered range"
        } else if !(self.stagger >= 0.0) {
            "stagger must not be negative"
        } else if !(self.repulsion.radius > 0.0) {
            "repulsion.radius must be positive"
        } else if !(self.repulsion.strength >= 0.0) {
            "repulsion.strength must not be negative"
        } else if !self.spring.is_valid() {
            "spring needs positive stiffness and non-negative damping"
        } else {
            return Ok(());
        };
        Err(MotionError::InvalidParameter { reason })
    }
}

fn is_ordered_range((low, high): (f64, f64)) -> bool {
    low > 0.0 && low <= high && high.is_finite()
}

/// A single particle
#[derive(Clone, Debug)]
pub struct Particle {
    id: u32,
    home: Point,
    motion: MotionPair,
    hovered: bool,
    /// Emphasis when `hovered` last flipped, and when
    transition: Option<((f64, f64), f64)>,
    size_px: f64,
    pulse: AmbientPulse,
}

impl Particle {
    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn home(&self) -> Point {
        self.home
    }

    pub fn motion(&self) -> MotionPair {
        self.motion
    }

    pub fn is_hovered(&self) -> bool {
        self.hovered
    }

    pub fn size_px(&self) -> f64 {
        self.size_px
    }

    pub fn pulse(&self) -> &AmbientPulse {
        &self.pulse
    }

    /// Fraction of a pulse cycle this particle runs ahead of (or behind) zero
    pub fn phase_offset(&self) -> f64 {
        self.pulse.phase
    }

    /// Opacity and scale at `elapsed` seconds, eased out after a hover change
    pub fn emphasis(&self, elapsed: f64) -> (f64, f64) {
        let to = if self.hovered {
            HOVER_EMPHASIS
        } else {
            IDLE_EMPHASIS
        };
        let Some((from, changed_at)) = self.transition else {
            return to;
        };

        let progress = ((elapsed - changed_at) / HOVER_TRANSITION).clamp(0.0, 1.0);
        if progress >= 1.0 {
            return to;
        }
        let eased = 1.0 - (1.0 - progress).powi(3);
        (
            from.0 + (to.0 - from.0) * eased,
            from.1 + (to.1 - from.1) * eased,
        )
    }

    fn set_hovered(&mut self, hovered: bool, elapsed: f64) {
        if self.hovered != hovered {
            self.transition = Some((self.emphasis(elapsed), elapsed));
            self.hovered = hovered;
        }
    }
}

/// What the presentation layer needs to draw one particle
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct ParticleFrame {
    pub id: u32,
    pub position: Point,
    pub size_px: f64,
    pub hovered: bool,
    pub opacity: f64,
    pub scale: f64,
    pub glow: PulseFrame,
}

/// The particle population of one container
#[derive(Clone, Debug)]
pub struct ParticleSystem {
    particles: Vec<Particle>,
    repulsion: RepulsionConfig,
    bounds: Rect,
}

impl ParticleSystem {
    /// Scatter `config.count` particles over `geometry`
    pub fn spawn(
        scheduler: &mut AnimationScheduler,
        owner: OwnerId,
        geometry: &Rect,
        config: &ParticleConfig,
    ) -> Result<Self> {
        config.validate()?;

        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        let mut particles = Vec::with_capacity(config.count as usize);
        for id in 0..config.count {
            let home = Point::new(
                rng.random_range(0.0..=geometry.width),
                rng.random_range(0.0..=geometry.height),
            );
            let size_px = rng.random_range(config.size.0..=config.size.1);
            let period = rng.random_range(config.pulse_period.0..=config.pulse_period.1);

            particles.push(Particle {
                id,
                home,
                motion: MotionPair::create(scheduler, owner, home, config.spring)?,
                hovered: false,
                transition: None,
                size_px,
                pulse: AmbientPulse::delayed(period, id as f64 * config.stagger),
            });
        }

        tracing::debug!(
            count = particles.len(),
            width = geometry.width,
            height = geometry.height,
            "spawned particle field"
        );

        Ok(Self {
            particles,
            repulsion: config.repulsion,
            bounds: *geometry,
        })
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn bounds(&self) -> &Rect {
        &self.bounds
    }

    /// Adopt new container geometry.
    ///
    /// Homes and targets are pulled inside the new extents; particles whose
    /// current position fell outside are moved to the nearest edge at once.
    pub fn resize(&mut self, scheduler: &mut AnimationScheduler, geometry: &Rect) -> Result<()> {
        let resized = geometry.is_resized_from(&self.bounds);
        self.bounds = *geometry;
        if !resized {
            return Ok(());
        }

        for particle in &mut self.particles {
            particle.home = geometry.clamp_local(particle.home);

            let current = particle.motion.read(scheduler)?;
            let inside = geometry.clamp_local(current);
            if inside != current {
                particle.motion.jump(scheduler, inside)?;
            }

            let target = if particle.hovered {
                geometry.clamp_local(particle.motion.target(scheduler)?)
            } else {
                particle.home
            };
            particle.motion.set_target(scheduler, target)?;
        }

        tracing::debug!(
            width = geometry.width,
            height = geometry.height,
            "repositioned particle field"
        );
        Ok(())
    }

    /// Re-evaluate the repulsion field for every particle.
    ///
    /// `cursor` is container-local, `None` when the pointer is absent.
    /// Hover changes start their emphasis transition at `elapsed` seconds.
    /// Returns how many particles are inside the field.
    pub fn apply_pointer(
        &mut self,
        scheduler: &mut AnimationScheduler,
        cursor: Option<Point>,
        elapsed: f64,
    ) -> Result<usize> {
        let mut hovered = 0;
        for particle in &mut self.particles {
            let position = particle.motion.target(scheduler)?;
            match self.repulsion.evaluate(position, cursor, &self.bounds) {
                RepulsionOutcome::Relax => {
                    particle.set_hovered(false, elapsed);
                    particle.motion.set_target(scheduler, particle.home)?;
                }
                RepulsionOutcome::Displace { target, .. } => {
                    particle.set_hovered(true, elapsed);
                    particle.motion.set_target(scheduler, target)?;
                }
                RepulsionOutcome::Skip => {
                    tracing::trace!(id = particle.id, "cursor on particle, sample skipped");
                }
            }
            if particle.hovered {
                hovered += 1;
            }
        }
        Ok(hovered)
    }

    /// Draw state for every particle at `elapsed` seconds
    pub fn frames(&self, scheduler: &AnimationScheduler, elapsed: f64) -> Result<Vec<ParticleFrame>> {
        self.particles
            .iter()
            .map(|particle| -> Result<ParticleFrame> {
                let position = self.bounds.clamp_local(particle.motion.read(scheduler)?);
                let (opacity, scale) = particle.emphasis(elapsed);
                Ok(ParticleFrame {
                    id: particle.id,
                    position,
                    size_px: particle.size_px,
                    hovered: particle.hovered,
                    opacity,
                    scale,
                    glow: particle.pulse.sample(elapsed),
                })
            })
            .collect()
    }
}
