//! Motion engine
//!
//! Routes host input to containers and their effects, and advances every
//! motion value once per frame.
//!
//! Two kinds of calls interleave on one thread:
//!
//! 1. Pointer samples and geometry updates, which only change targets
//! 2. [`MotionEngine::tick`], the only writer of current values
//!
//! A target assigned between two ticks is seen by exactly the next tick.
//!
//! Magnetic, glow, card glow, tilt, and lift effects retarget as soon as a sample or
//! geometry update arrives. Particle fields are polled once per tick, before
//! integration, so a cursor resting inside the field keeps pushing.

use crate::config::EngineConfig;
use flux_animation::{AnimationScheduler, MotionId, OwnerId, SpringConfig};
use flux_core::{MotionError, Point, PointerReading, PointerSample, PointerTracker, Rect, Result};
use flux_fields::{
    CardGlow, CardGlowConfig, CardGlowFrame, CursorGlow, GlowConfig, HoverLift, LiftConfig, MagneticBinding, MagneticConfig,
    ParticleConfig, ParticleFrame, ParticleSystem, TiltConfig, TiltMapper, TiltTransform,
};
use slotmap::{new_key_type, SlotMap};
use smallvec::SmallVec;

new_key_type! {
    /// Handle to a mounted container
    pub struct ContainerId;
    /// Handle to an effect attached to a container
    pub struct EffectId;
}

/// An effect attached to a container
#[derive(Clone, Debug)]
pub enum Effect {
    /// Particle field, spawned once the container is laid out
    Particles(ParticleField),
    Magnet(MagneticBinding),
    Glow(CursorGlow),
    CardGlow(CardGlow),
    Tilt(TiltMapper),
    Lift(HoverLift),
}

/// A particle field waiting for geometry, or live
#[derive(Clone, Debug)]
pub enum ParticleField {
    Pending(ParticleConfig),
    Live(ParticleSystem),
}

impl Effect {
    pub fn kind(&self) -> &'static str {
        match self {
            Effect::Particles(_) => "particles",
            Effect::Magnet(_) => "magnet",
            Effect::Glow(_) => "glow",
            Effect::CardGlow(_) => "card_glow",
            Effect::Tilt(_) => "tilt",
            Effect::Lift(_) => "lift",
        }
    }

    fn motion_ids(&self) -> SmallVec<[MotionId; 4]> {
        match self {
            Effect::Particles(ParticleField::Pending(_)) => SmallVec::new(),
            Effect::Particles(ParticleField::Live(system)) => system
                .particles()
                .iter()
                .flat_map(|p| [p.motion().x, p.motion().y])
                .collect(),
            Effect::Magnet(binding) => SmallVec::from_slice(&[binding.motion().x, binding.motion().y]),
            Effect::Glow(glow) => SmallVec::from_slice(&[glow.motion().x, glow.motion().y]),
            Effect::CardGlow(glow) => SmallVec::from_slice(&[glow.signal().x, glow.signal().y]),
            Effect::Tilt(tilt) => SmallVec::from_slice(&[tilt.signal().x, tilt.signal().y]),
            Effect::Lift(lift) => SmallVec::from_slice(&[lift.motion()]),
        }
    }
}

struct EffectEntry {
    container: ContainerId,
    effect: Effect,
}

struct Container {
    owner: OwnerId,
    tracker: PointerTracker,
    effects: SmallVec<[EffectId; 4]>,
}

/// The pointer-reactive motion engine
pub struct MotionEngine {
    scheduler: AnimationScheduler,
    containers: SlotMap<ContainerId, Container>,
    effects: SlotMap<EffectId, EffectEntry>,
    config: EngineConfig,
    /// Seconds of frame time since the engine started
    elapsed: f64,
}

impl MotionEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            scheduler: AnimationScheduler::new(),
            containers: SlotMap::with_key(),
            effects: SlotMap::with_key(),
            config,
            elapsed: 0.0,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn scheduler(&self) -> &AnimationScheduler {
        &self.scheduler
    }

    /// Frame time accumulated by [`tick`](Self::tick), in seconds
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    /// Whether the host should request another display-refresh tick
    pub fn needs_frame(&self) -> bool {
        self.scheduler.needs_frame()
    }

    // ------------------------------------------------------------------------
    // Free-standing motion values
    // ------------------------------------------------------------------------

    pub fn create(&mut self, initial: f64, spring: SpringConfig) -> MotionId {
        self.scheduler.create(initial, spring)
    }

    #[track_caller]
    pub fn set_target(&mut self, id: MotionId, target: f64) -> Result<()> {
        self.scheduler.set_target(id, target)
    }

    #[track_caller]
    pub fn read(&self, id: MotionId) -> Result<f64> {
        self.scheduler.read(id)
    }

    #[track_caller]
    pub fn release(&mut self, id: MotionId) -> Result<()> {
        self.scheduler.release(id)
    }

    // ------------------------------------------------------------------------
    // Containers
    // ------------------------------------------------------------------------

    pub fn mount(&mut self) -> ContainerId {
        let owner = self.scheduler.register_owner();
        let id = self.containers.insert(Container {
            owner,
            tracker: PointerTracker::new(),
            effects: SmallVec::new(),
        });
        tracing::debug!(container = ?id, "mounted container");
        id
    }

    pub fn is_mounted(&self, container: ContainerId) -> bool {
        self.containers.contains_key(container)
    }

    /// Tear down a container, its effects, and every motion value it owns
    pub fn unmount(&mut self, container: ContainerId) -> Result<()> {
        let removed = self
            .containers
            .remove(container)
            .ok_or(MotionError::UnknownContainer)?;

        let released = self.scheduler.release_owner(removed.owner);
        for effect in &removed.effects {
            self.effects.remove(*effect);
        }

        tracing::debug!(
            ?container,
            effects = removed.effects.len(),
            released,
            "unmounted container"
        );
        Ok(())
    }

    /// Record the latest pointer sample for `container`
    pub fn register_pointer_sample(
        &mut self,
        container: ContainerId,
        sample: PointerSample,
    ) -> Result<()> {
        let entry = self
            .containers
            .get_mut(container)
            .ok_or(MotionError::UnknownContainer)?;
        entry.tracker.record(sample);

        apply_pointer_fields(&mut self.scheduler, &self.effects, entry)
    }

    /// Refresh the geometry of `container`.
    ///
    /// Spawns pending particle fields on first layout and repositions live
    /// ones on resize before any further force computation.
    pub fn notify_geometry_changed(&mut self, container: ContainerId, geometry: Rect) -> Result<()> {
        let entry = self
            .containers
            .get_mut(container)
            .ok_or(MotionError::UnknownContainer)?;
        entry.tracker.set_geometry(geometry);

        let Some(geometry) = entry.tracker.geometry().copied() else {
            tracing::trace!(?container, "container not laid out yet");
            return Ok(());
        };

        for id in &entry.effects {
            let Some(effect) = self.effects.get_mut(*id) else {
                continue;
            };
            if let Effect::Particles(field) = &mut effect.effect {
                match field {
                    ParticleField::Pending(config) => {
                        let system =
                            ParticleSystem::spawn(&mut self.scheduler, entry.owner, &geometry, config)?;
                        *field = ParticleField::Live(system);
                    }
                    ParticleField::Live(system) => system.resize(&mut self.scheduler, &geometry)?,
                }
            }
        }

        apply_pointer_fields(&mut self.scheduler, &self.effects, entry)
    }

    /// Advance one display refresh of `dt_ms` milliseconds.
    ///
    /// Returns the number of motion values still moving.
    pub fn tick(&mut self, dt_ms: f64) -> usize {
        if dt_ms.is_finite() && dt_ms > 0.0 {
            self.elapsed += dt_ms / 1000.0;
        }

        for (id, container) in self.containers.iter() {
            if !self.scheduler.is_owner_alive(container.owner) {
                continue;
            }
            let cursor = match container.tracker.reading() {
                PointerReading::Unavailable => continue,
                reading => reading.local(),
            };

            for effect_id in &container.effects {
                let Some(EffectEntry {
                    effect: Effect::Particles(ParticleField::Live(system)),
                    ..
                }) = self.effects.get_mut(*effect_id)
                else {
                    continue;
                };
                if let Err(err) = system.apply_pointer(&mut self.scheduler, cursor, self.elapsed) {
                    tracing::warn!(container = ?id, %err, "particle field update failed");
                }
            }
        }

        self.scheduler.tick(dt_ms)
    }

    /// Advance by the wall-clock time since the previous frame
    pub fn tick_now(&mut self) -> usize {
        let dt_ms = self.scheduler.since_last_frame_ms();
        self.tick(dt_ms)
    }

    // ------------------------------------------------------------------------
    // Effects
    // ------------------------------------------------------------------------

    /// Attach a particle field; parameters are checked even while the
    /// container waits for its first layout
    pub fn attach_particles(&mut self, container: ContainerId, config: ParticleConfig) -> Result<EffectId> {
        config.validate()?;
        let entry = self
            .containers
            .get(container)
            .ok_or(MotionError::UnknownContainer)?;

        let field = match entry.tracker.geometry() {
            Some(geometry) => ParticleField::Live(ParticleSystem::spawn(
                &mut self.scheduler,
                entry.owner,
                geometry,
                &config,
            )?),
            None => ParticleField::Pending(config),
        };
        self.insert_effect(container, Effect::Particles(field))
    }

    pub fn attach_magnet(&mut self, container: ContainerId, config: MagneticConfig) -> Result<EffectId> {
        let owner = self.owner_of(container)?;
        let binding = MagneticBinding::new(&mut self.scheduler, owner, &config)?;
        self.insert_effect(container, Effect::Magnet(binding))
    }

    pub fn attach_glow(&mut self, container: ContainerId, config: GlowConfig) -> Result<EffectId> {
        let owner = self.owner_of(container)?;
        let glow = CursorGlow::new(&mut self.scheduler, owner, config)?;
        self.insert_effect(container, Effect::Glow(glow))
    }

    pub fn attach_card_glow(&mut self, container: ContainerId, config: CardGlowConfig) -> Result<EffectId> {
        let owner = self.owner_of(container)?;
        let glow = CardGlow::new(&mut self.scheduler, owner, config)?;
        self.insert_effect(container, Effect::CardGlow(glow))
    }

    pub fn attach_tilt(&mut self, container: ContainerId, config: TiltConfig) -> Result<EffectId> {
        let owner = self.owner_of(container)?;
        let tilt = TiltMapper::new(&mut self.scheduler, owner, config)?;
        self.insert_effect(container, Effect::Tilt(tilt))
    }

    pub fn attach_lift(&mut self, container: ContainerId, config: LiftConfig) -> Result<EffectId> {
        let owner = self.owner_of(container)?;
        let lift = HoverLift::new(&mut self.scheduler, owner, config)?;
        self.insert_effect(container, Effect::Lift(lift))
    }

    /// Remove an effect and release its motion values
    pub fn detach(&mut self, effect: EffectId) -> Result<()> {
        let entry = self.effects.remove(effect).ok_or(MotionError::UnknownEffect)?;
        if let Some(container) = self.containers.get_mut(entry.container) {
            container.effects.retain(|id| *id != effect);
        }
        for id in entry.effect.motion_ids() {
            self.scheduler.release(id)?;
        }
        Ok(())
    }

    pub fn effect(&self, effect: EffectId) -> Result<&Effect> {
        self.effects
            .get(effect)
            .map(|entry| &entry.effect)
            .ok_or(MotionError::UnknownEffect)
    }

    /// Draw state of a particle field; empty until the container is laid out
    pub fn particles(&self, effect: EffectId) -> Result<Vec<ParticleFrame>> {
        match self.effect(effect)? {
            Effect::Particles(ParticleField::Live(system)) => system.frames(&self.scheduler, self.elapsed),
            Effect::Particles(ParticleField::Pending(_)) => Ok(Vec::new()),
            _ => Err(MotionError::EffectMismatch {
                expected: "particles",
            }),
        }
    }

    /// Smoothed displacement of a magnet or glow
    pub fn offset(&self, effect: EffectId) -> Result<Point> {
        match self.effect(effect)? {
            Effect::Magnet(binding) => binding.offset(&self.scheduler),
            Effect::Glow(glow) => glow.offset(&self.scheduler),
            _ => Err(MotionError::EffectMismatch {
                expected: "magnet or glow",
            }),
        }
    }

    /// Edge and reflection offsets of a card glow
    pub fn card_glow(&self, effect: EffectId) -> Result<CardGlowFrame> {
        match self.effect(effect)? {
            Effect::CardGlow(glow) => glow.read(&self.scheduler),
            _ => Err(MotionError::EffectMismatch {
                expected: "card glow",
            }),
        }
    }

    pub fn tilt(&self, effect: EffectId) -> Result<TiltTransform> {
        match self.effect(effect)? {
            Effect::Tilt(tilt) => tilt.read(&self.scheduler),
            _ => Err(MotionError::EffectMismatch { expected: "tilt" }),
        }
    }

    pub fn lift(&self, effect: EffectId) -> Result<f64> {
        match self.effect(effect)? {
            Effect::Lift(lift) => lift.read(&self.scheduler),
            _ => Err(MotionError::EffectMismatch { expected: "lift" }),
        }
    }

    fn owner_of(&self, container: ContainerId) -> Result<OwnerId> {
        self.containers
            .get(container)
            .map(|entry| entry.owner)
            .ok_or(MotionError::UnknownContainer)
    }

    fn insert_effect(&mut self, container: ContainerId, effect: Effect) -> Result<EffectId> {
        let kind = effect.kind();
        let id = self.effects.insert(EffectEntry { container, effect });
        let entry = self
            .containers
            .get_mut(container)
            .ok_or(MotionError::UnknownContainer)?;
        entry.effects.push(id);

        tracing::debug!(?container, effect = ?id, kind, "attached effect");
        apply_pointer_fields(&mut self.scheduler, &self.effects, entry)?;
        Ok(id)
    }
}

impl Default for MotionEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

/// Retarget the sample-driven effects of one container
fn apply_pointer_fields(
    scheduler: &mut AnimationScheduler,
    effects: &SlotMap<EffectId, EffectEntry>,
    container: &Container,
) -> Result<()> {
    let reading = container.tracker.reading();
    let Some(geometry) = container.tracker.geometry() else {
        return Ok(());
    };

    for id in &container.effects {
        let Some(entry) = effects.get(*id) else {
            continue;
        };
        match &entry.effect {
            Effect::Magnet(binding) => binding.apply(scheduler, geometry, reading.screen())?,
            Effect::Glow(glow) => glow.apply(scheduler, geometry, reading.screen())?,
            Effect::CardGlow(glow) => glow.apply(scheduler, reading.relative())?,
            Effect::Tilt(tilt) => tilt.apply(scheduler, reading.normalized())?,
            Effect::Lift(lift) => lift.apply(scheduler, reading.is_present())?,
            Effect::Particles(_) => {}
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_container_is_an_error() {
        let mut engine = MotionEngine::default();
        let container = engine.mount();
        engine.unmount(container).unwrap();

        assert_eq!(
            engine.register_pointer_sample(container, PointerSample::at(1.0, 1.0)),
            Err(MotionError::UnknownContainer)
        );
        assert_eq!(
            engine.notify_geometry_changed(container, Rect::new(0.0, 0.0, 10.0, 10.0)),
            Err(MotionError::UnknownContainer)
        );
        assert_eq!(engine.unmount(container), Err(MotionError::UnknownContainer));
    }

    #[test]
    fn test_effect_kind_mismatch() {
        let mut engine = MotionEngine::default();
        let container = engine.mount();
        let lift = engine.attach_lift(container, LiftConfig::default()).unwrap();

        assert_eq!(
            engine.tilt(lift),
            Err(MotionError::EffectMismatch { expected: "tilt" })
        );
        assert_eq!(engine.lift(lift), Ok(0.0));
    }

    #[test]
    fn test_attach_particles_rejects_inverted_ranges() {
        let mut engine = MotionEngine::default();
        let laid_out = engine.mount();
        let pending = engine.mount();
        engine
            .notify_geometry_changed(laid_out, Rect::new(0.0, 0.0, 200.0, 200.0))
            .unwrap();

        let config = ParticleConfig {
            size: (6.0, 3.0),
            ..ParticleConfig::default()
        };
        for container in [laid_out, pending] {
            assert!(matches!(
                engine.attach_particles(container, config),
                Err(MotionError::InvalidParameter { .. })
            ));
        }
        assert_eq!(engine.scheduler().live_count(), 0);
    }

    #[test]
    fn test_card_glow_tracks_relative_offset() {
        let mut engine = MotionEngine::default();
        let card = engine.mount();
        let glow = engine.attach_card_glow(card, CardGlowConfig::default()).unwrap();
        engine
            .notify_geometry_changed(card, Rect::new(100.0, 100.0, 200.0, 100.0))
            .unwrap();

        // Quarter width right of center, at the bottom edge
        engine
            .register_pointer_sample(card, PointerSample::at(250.0, 200.0))
            .unwrap();
        for _ in 0..120 {
            engine.tick(16.0);
        }
        let frame = engine.card_glow(glow).unwrap();
        assert!((frame.edge.x - 25.0).abs() < 0.01);
        assert!((frame.edge.y - 50.0).abs() < 0.01);
        assert!((frame.reflection.x - 50.0).abs() < 0.01);
        assert!((frame.reflection.y - 100.0).abs() < 0.01);

        engine
            .register_pointer_sample(card, PointerSample::absent())
            .unwrap();
        for _ in 0..120 {
            engine.tick(16.0);
        }
        assert_eq!(engine.card_glow(glow).unwrap(), CardGlowFrame::default());
        assert!(!engine.needs_frame());
        assert_eq!(
            engine.offset(glow),
            Err(MotionError::EffectMismatch {
                expected: "magnet or glow"
            })
        );
    }

    #[test]
    fn test_tick_now_uses_wall_clock() {
        let mut engine = MotionEngine::default();
        let id = engine.create(0.0, SpringConfig::gentle());
        engine.set_target(id, 100.0).unwrap();

        std::thread::sleep(std::time::Duration::from_millis(5));
        assert_eq!(engine.tick_now(), 1);
        assert!(engine.elapsed() >= 0.005);
        assert!(engine.read(id).unwrap() > 0.0);
    }

    #[test]
    fn test_detach_releases_values() {
        let mut engine = MotionEngine::default();
        let container = engine.mount();
        let glow = engine.attach_glow(container, GlowConfig::default()).unwrap();
        assert_eq!(engine.scheduler().live_count(), 2);

        engine.detach(glow).unwrap();
        assert_eq!(engine.scheduler().live_count(), 0);
        assert!(!engine.needs_frame());
        assert_eq!(engine.detach(glow), Err(MotionError::UnknownEffect));
    }
}
