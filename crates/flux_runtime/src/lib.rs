//! Flux Runtime
//!
//! The [`MotionEngine`] is the single entry point a host talks to:
//!
//! - **Containers**: mounted regions with their own geometry and pointer state
//! - **Effects**: particle fields, magnetic bindings, glows, tilt rigs, and
//!   hover lifts attached to a container
//! - **Frames**: `tick(dt_ms)` once per display refresh while
//!   [`MotionEngine::needs_frame`] is true
//!
//! # Example
//!
//! ```rust
//! use flux_core::{PointerSample, Rect};
//! use flux_fields::MagneticConfig;
//! use flux_runtime::MotionEngine;
//!
//! let mut engine = MotionEngine::default();
//! let button = engine.mount();
//! let magnet = engine.attach_magnet(button, MagneticConfig::button()).unwrap();
//!
//! engine
//!     .notify_geometry_changed(button, Rect::new(0.0, 0.0, 120.0, 40.0))
//!     .unwrap();
//! engine
//!     .register_pointer_sample(button, PointerSample::at(110.0, 30.0))
//!     .unwrap();
//!
//! for _ in 0..60 {
//!     engine.tick(16.0);
//! }
//! let offset = engine.offset(magnet).unwrap();
//! assert!((offset.x - 15.0).abs() < 0.1);
//! ```

pub mod config;
pub mod engine;

pub use config::{ConfigError, EngineConfig, MagneticPresets, TiltPresets};
pub use engine::{ContainerId, Effect, EffectId, MotionEngine};
