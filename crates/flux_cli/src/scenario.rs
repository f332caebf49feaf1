//! Scripted pointer scenarios.
//!
//! A scenario is a JSON list of steps replayed against a [`MotionEngine`]:
//!
//! ```json
//! {
//!   "steps": [
//!     { "type": "mount", "container": "hero" },
//!     { "type": "attach", "container": "hero", "effect": "particles", "name": "dots" },
//!     { "type": "geometry", "container": "hero", "left": 0, "top": 0, "width": 400, "height": 300 },
//!     { "type": "pointer", "container": "hero", "x": 200, "y": 150 },
//!     { "type": "tick", "frames": 30 },
//!     { "type": "dump" }
//!   ]
//! }
//! ```

use anyhow::{bail, Context, Result};
use flux_core::{Point, PointerSample, Rect};
use flux_fields::{CardGlowFrame, ParticleFrame, TiltTransform};
use flux_runtime::{ContainerId, EffectId, EngineConfig, MotionEngine};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

fn default_dt_ms() -> f64 {
    16.0
}

/// Sequence of engine steps
#[derive(Debug, Clone, Deserialize)]
pub struct Scenario {
    pub steps: Vec<ScenarioStep>,
}

impl Scenario {
    pub fn from_json(input: &str) -> Result<Self> {
        Ok(serde_json::from_str(input)?)
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read scenario {}", path.display()))?;
        Self::from_json(&raw).with_context(|| format!("invalid scenario {}", path.display()))
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ScenarioStep {
    Mount {
        container: String,
    },
    Unmount {
        container: String,
    },
    Attach {
        container: String,
        effect: EffectPreset,
        /// Label used in dumps; defaults to the preset name
        #[serde(default)]
        name: Option<String>,
    },
    Geometry {
        container: String,
        left: f64,
        top: f64,
        width: f64,
        height: f64,
    },
    /// Pointer at screen coordinates
    Pointer {
        container: String,
        x: f64,
        y: f64,
    },
    /// Pointer left the container
    Leave {
        container: String,
    },
    Tick {
        frames: u32,
        #[serde(default = "default_dt_ms")]
        dt_ms: f64,
    },
    /// Record the state of every attached effect
    Dump,
}

/// Effects a scenario can attach, configured from the engine config
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectPreset {
    Particles,
    MagnetButton,
    MagnetOrb,
    Glow,
    CardGlow,
    TiltHero,
    TiltSection,
    TiltCard,
    Lift,
}

impl EffectPreset {
    fn label(self) -> &'static str {
        match self {
            EffectPreset::Particles => "particles",
            EffectPreset::MagnetButton => "magnet_button",
            EffectPreset::MagnetOrb => "magnet_orb",
            EffectPreset::Glow => "glow",
            EffectPreset::CardGlow => "card_glow",
            EffectPreset::TiltHero => "tilt_hero",
            EffectPreset::TiltSection => "tilt_section",
            EffectPreset::TiltCard => "tilt_card",
            EffectPreset::Lift => "lift",
        }
    }
}

/// Output of one `dump` step
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub frame: u64,
    pub elapsed: f64,
    pub needs_frame: bool,
    pub effects: Vec<EffectSnapshot>,
}

#[derive(Debug, Clone, Serialize)]
pub struct EffectSnapshot {
    pub name: String,
    pub container: String,
    #[serde(flatten)]
    pub state: EffectState,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EffectState {
    Particles { particles: Vec<ParticleFrame> },
    Offset { offset: Point },
    CardGlow { layers: CardGlowFrame },
    Tilt { transform: TiltTransform },
    Lift { height: f64 },
}

struct Attached {
    name: String,
    container: String,
    preset: EffectPreset,
    id: EffectId,
}

/// Replays scenarios against one engine
pub struct ScenarioRunner {
    engine: MotionEngine,
    containers: FxHashMap<String, ContainerId>,
    effects: Vec<Attached>,
    realtime: bool,
}

impl ScenarioRunner {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            engine: MotionEngine::new(config),
            containers: FxHashMap::default(),
            effects: Vec::new(),
            realtime: false,
        }
    }

    /// Pace ticks on the wall clock: each frame sleeps `dt_ms` and then
    /// advances by the time that actually passed
    pub fn realtime(mut self, realtime: bool) -> Self {
        self.realtime = realtime;
        self
    }

    pub fn engine(&self) -> &MotionEngine {
        &self.engine
    }

    /// Run every step, collecting one snapshot per `dump`
    pub fn run(&mut self, scenario: &Scenario) -> Result<Vec<Snapshot>> {
        let mut snapshots = Vec::new();
        for (index, step) in scenario.steps.iter().enumerate() {
            tracing::debug!(index, ?step, "scenario step");
            if let Some(snapshot) = self
                .step(step)
                .with_context(|| format!("step {index} failed"))?
            {
                snapshots.push(snapshot);
            }
        }
        Ok(snapshots)
    }

    fn step(&mut self, step: &ScenarioStep) -> Result<Option<Snapshot>> {
        match step {
            ScenarioStep::Mount { container } => {
                if self.containers.contains_key(container) {
                    bail!("container `{container}` is already mounted");
                }
                let id = self.engine.mount();
                self.containers.insert(container.clone(), id);
            }
            ScenarioStep::Unmount { container } => {
                let id = self.container(container)?;
                self.engine.unmount(id)?;
                self.containers.remove(container);
                self.effects.retain(|effect| effect.container != *container);
            }
            ScenarioStep::Attach {
                container,
                effect,
                name,
            } => {
                let id = self.container(container)?;
                let effect_id = self.attach(id, *effect)?;
                self.effects.push(Attached {
                    name: name.clone().unwrap_or_else(|| effect.label().to_string()),
                    container: container.clone(),
                    preset: *effect,
                    id: effect_id,
                });
            }
            ScenarioStep::Geometry {
                container,
                left,
                top,
                width,
                height,
            } => {
                let id = self.container(container)?;
                self.engine
                    .notify_geometry_changed(id, Rect::new(*left, *top, *width, *height))?;
            }
            ScenarioStep::Pointer { container, x, y } => {
                let id = self.container(container)?;
                self.engine
                    .register_pointer_sample(id, PointerSample::at(*x, *y))?;
            }
            ScenarioStep::Leave { container } => {
                let id = self.container(container)?;
                self.engine
                    .register_pointer_sample(id, PointerSample::absent())?;
            }
            ScenarioStep::Tick { frames, dt_ms } => {
                let pause = Duration::try_from_secs_f64(*dt_ms / 1000.0).unwrap_or_default();
                for _ in 0..*frames {
                    if self.realtime {
                        std::thread::sleep(pause);
                        self.engine.tick_now();
                    } else {
                        self.engine.tick(*dt_ms);
                    }
                }
            }
            ScenarioStep::Dump => return self.snapshot().map(Some),
        }
        Ok(None)
    }

    fn container(&self, name: &str) -> Result<ContainerId> {
        match self.containers.get(name) {
            Some(id) => Ok(*id),
            None => bail!("unknown container `{name}`"),
        }
    }

    fn attach(&mut self, container: ContainerId, preset: EffectPreset) -> Result<EffectId> {
        let config = self.engine.config().clone();
        let id = match preset {
            EffectPreset::Particles => self.engine.attach_particles(container, config.particles)?,
            EffectPreset::MagnetButton => {
                self.engine.attach_magnet(container, config.magnetic.button)?
            }
            EffectPreset::MagnetOrb => self.engine.attach_magnet(container, config.magnetic.orb)?,
            EffectPreset::Glow => self.engine.attach_glow(container, config.glow)?,
            EffectPreset::CardGlow => self.engine.attach_card_glow(container, config.card_glow)?,
            EffectPreset::TiltHero => self.engine.attach_tilt(container, config.tilt.hero)?,
            EffectPreset::TiltSection => self.engine.attach_tilt(container, config.tilt.section)?,
            EffectPreset::TiltCard => self.engine.attach_tilt(container, config.tilt.card)?,
            EffectPreset::Lift => self.engine.attach_lift(container, config.lift)?,
        };
        Ok(id)
    }

    fn snapshot(&self) -> Result<Snapshot> {
        let mut effects = Vec::with_capacity(self.effects.len());
        for attached in &self.effects {
            let state = match attached.preset {
                EffectPreset::Particles => EffectState::Particles {
                    particles: self.engine.particles(attached.id)?,
                },
                EffectPreset::MagnetButton | EffectPreset::MagnetOrb | EffectPreset::Glow => {
                    EffectState::Offset {
                        offset: self.engine.offset(attached.id)?,
                    }
                }
                EffectPreset::CardGlow => EffectState::CardGlow {
                    layers: self.engine.card_glow(attached.id)?,
                },
                EffectPreset::TiltHero | EffectPreset::TiltSection | EffectPreset::TiltCard => {
                    EffectState::Tilt {
                        transform: self.engine.tilt(attached.id)?,
                    }
                }
                EffectPreset::Lift => EffectState::Lift {
                    height: self.engine.lift(attached.id)?,
                },
            };
            effects.push(EffectSnapshot {
                name: attached.name.clone(),
                container: attached.container.clone(),
                state,
            });
        }

        Ok(Snapshot {
            frame: self.engine.scheduler().frame_count(),
            elapsed: self.engine.elapsed(),
            needs_frame: self.engine.needs_frame(),
            effects,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_steps() {
        let scenario = Scenario::from_json(
            r#"{"steps": [
                {"type": "mount", "container": "a"},
                {"type": "attach", "container": "a", "effect": "tilt_card"},
                {"type": "tick", "frames": 3},
                {"type": "leave", "container": "a"},
                {"type": "dump"}
            ]}"#,
        )
        .unwrap();

        assert_eq!(scenario.steps.len(), 5);
        assert!(matches!(
            scenario.steps[1],
            ScenarioStep::Attach {
                effect: EffectPreset::TiltCard,
                name: None,
                ..
            }
        ));
        assert!(matches!(
            scenario.steps[2],
            ScenarioStep::Tick { frames: 3, dt_ms } if dt_ms == 16.0
        ));
    }

    #[test]
    fn test_unknown_container_fails_with_step_index() {
        let scenario = Scenario::from_json(
            r#"{"steps": [{"type": "pointer", "container": "nope", "x": 1, "y": 2}]}"#,
        )
        .unwrap();

        let err = ScenarioRunner::new(EngineConfig::default())
            .run(&scenario)
            .unwrap_err();
        assert_eq!(err.to_string(), "step 0 failed");
        assert!(format!("{err:#}").contains("unknown container `nope`"));
    }

    #[test]
    fn test_double_mount_is_rejected() {
        let scenario = Scenario::from_json(
            r#"{"steps": [
                {"type": "mount", "container": "a"},
                {"type": "mount", "container": "a"}
            ]}"#,
        )
        .unwrap();

        let err = ScenarioRunner::new(EngineConfig::default())
            .run(&scenario)
            .unwrap_err();
        assert_eq!(err.to_string(), "step 1 failed");
    }
}
