//! Spring integration
//!
//! Damped harmonic oscillator stepped with semi-implicit Euler:
//!
//! ```text
//! accel     = stiffness * (target - current) - damping * velocity
//! velocity' = velocity + accel * dt
//! current'  = current + velocity' * dt
//! ```
//!
//! Frame time is clamped to [`MAX_FRAME_DT`] before integrating so a long
//! stall (backgrounded tab, dropped frames) cannot blow the spring up.

use serde::{Deserialize, Serialize};

/// Largest time step fed to the integrator, in seconds (~30fps)
pub const MAX_FRAME_DT: f64 = 1.0 / 30.0;

/// Default distance from target below which a spring may come to rest
pub const DEFAULT_REST_DELTA: f64 = 0.01;

/// Default speed below which a spring may come to rest
pub const DEFAULT_REST_SPEED: f64 = 0.01;

fn default_rest_delta() -> f64 {
    DEFAULT_REST_DELTA
}

fn default_rest_speed() -> f64 {
    DEFAULT_REST_SPEED
}

/// Spring parameters
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpringConfig {
    /// Restoring force per unit of displacement, must be positive
    pub stiffness: f64,
    /// Velocity damping, must be non-negative
    pub damping: f64,
    #[serde(default = "default_rest_delta")]
    pub rest_delta: f64,
    #[serde(default = "default_rest_speed")]
    pub rest_speed: f64,
}

impl SpringConfig {
    pub const fn new(stiffness: f64, damping: f64) -> Self {
        Self {
            stiffness,
            damping,
            rest_delta: DEFAULT_REST_DELTA,
            rest_speed: DEFAULT_REST_SPEED,
        }
    }

    /// General purpose UI spring
    pub const fn standard() -> Self {
        Self::new(300.0, 30.0)
    }

    /// Soft follow used for pointer-driven tilt
    pub const fn gentle() -> Self {
        Self::new(100.0, 20.0)
    }

    /// Quick pull with slight overshoot for magnetic elements
    pub const fn magnetic() -> Self {
        Self::new(400.0, 25.0)
    }

    /// Overdamped, used by repelled particles
    pub const fn particle() -> Self {
        Self::new(300.0, 40.0)
    }

    /// Slow trailing follow for background orbs
    pub const fn drift() -> Self {
        Self::new(50.0, 20.0)
    }

    /// Hover lift on cards
    pub const fn lift() -> Self {
        Self::new(200.0, 25.0)
    }

    pub fn with_rest(mut self, rest_delta: f64, rest_speed: f64) -> Self {
        self.rest_delta = rest_delta;
        self.rest_speed = rest_speed;
        self
    }

    /// `damping / (2 * sqrt(stiffness))`; 1.0 is critically damped
    pub fn damping_ratio(&self) -> f64 {
        self.damping / (2.0 * self.stiffness.sqrt())
    }

    pub fn is_valid(&self) -> bool {
        self.stiffness.is_finite()
            && self.damping.is_finite()
            && self.stiffness > 0.0
            && self.damping >= 0.0
            && self.rest_delta >= 0.0
            && self.rest_speed >= 0.0
    }
}

impl Default for SpringConfig {
    fn default() -> Self {
        Self::standard()
    }
}

/// Position and velocity of a spring
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SpringState {
    pub current: f64,
    pub velocity: f64,
}

impl SpringState {
    pub const fn at_rest(current: f64) -> Self {
        Self {
            current,
            velocity: 0.0,
        }
    }

    /// Whether the state is close enough to `target` to snap onto it
    pub fn can_rest(&self, target: f64, config: &SpringConfig) -> bool {
        (target - self.current).abs() < config.rest_delta
            && self.velocity.abs() < config.rest_speed
    }
}

/// The update rule shared by every motion value
pub struct SpringIntegrator;

impl SpringIntegrator {
    /// Clamp a frame time into `[0, MAX_FRAME_DT]`; NaN becomes zero
    pub fn clamp_dt(dt: f64) -> f64 {
        if dt.is_nan() {
            0.0
        } else {
            dt.clamp(0.0, MAX_FRAME_DT)
        }
    }

    /// Advance `state` toward `target` by `dt` seconds
    pub fn step(state: SpringState, target: f64, config: &SpringConfig, dt: f64) -> SpringState {
        debug_assert!(config.stiffness > 0.0, "spring stiffness must be positive");
        debug_assert!(config.damping >= 0.0, "spring damping must be non-negative");

        let dt = Self::clamp_dt(dt);
        if dt == 0.0 {
            return state;
        }

        let accel = config.stiffness * (target - state.current) - config.damping * state.velocity;
        let velocity = state.velocity + accel * dt;
        let current = state.current + velocity * dt;

        SpringState { current, velocity }
    }
}
