//! Flux Force Fields
//!
//! Rules that turn a pointer sample plus entity geometry into motion targets.
//! None of these types step springs themselves; they only assign targets to
//! motion values owned by the [`AnimationScheduler`](flux_animation::AnimationScheduler).
//!
//! - **Repulsion**: particles flee the cursor and relax back home
//! - **Magnetic**: elements lean toward the cursor
//! - **Glow**: a highlight that trails the cursor with distance falloff, and
//!   card glow layers that follow the pointer across a card
//! - **Tilt**: 3D rotation and depth derived from one smoothed pointer signal
//! - **Pulse**: cosmetic per-particle oscillation, independent of physics

pub mod glow;
pub mod magnetic;
pub mod particles;
pub mod pulse;
pub mod repulsion;
pub mod tilt;

pub use glow::{CardGlow, CardGlowConfig, CardGlowFrame, CursorGlow, GlowConfig};
pub use magnetic::{MagneticBinding, MagneticConfig};
pub use particles::{Particle, ParticleConfig, ParticleFrame, ParticleSystem};
pub use pulse::{AmbientPulse, PulseFrame};
pub use repulsion::{RepulsionConfig, RepulsionOutcome};
pub use tilt::{HoverLift, LiftConfig, TiltConfig, TiltMapper, TiltTransform};
