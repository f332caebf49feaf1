//! Motion values
//!
//! A motion value is a scalar that chases an assigned target through a
//! spring. Setting a target never moves the current value; only a step does.

use crate::spring::{SpringConfig, SpringIntegrator, SpringState};

/// A spring-smoothed scalar
#[derive(Clone, Debug)]
pub struct MotionValue {
    state: SpringState,
    target: f64,
    config: SpringConfig,
    settled: bool,
}

impl MotionValue {
    /// Create a value resting at `initial`
    pub fn new(initial: f64, config: SpringConfig) -> Self {
        debug_assert!(config.is_valid(), "invalid spring config: {config:?}");
        Self {
            state: SpringState::at_rest(initial),
            target: initial,
            config,
            settled: true,
        }
    }

    /// Current value
    pub fn value(&self) -> f64 {
        self.state.current
    }

    pub fn target(&self) -> f64 {
        self.target
    }

    pub fn velocity(&self) -> f64 {
        self.state.velocity
    }

    pub fn config(&self) -> &SpringConfig {
        &self.config
    }

    /// Set a new target; takes effect on the next step
    pub fn set_target(&mut self, target: f64) {
        if target != self.target {
            self.target = target;
            self.settled = false;
        }
    }

    /// Move to `value` immediately and come to rest there
    pub fn jump(&mut self, value: f64) {
        self.state = SpringState::at_rest(value);
        self.target = value;
        self.settled = true;
    }

    /// Whether the value is resting on its target
    pub fn is_settled(&self) -> bool {
        self.settled
    }

    /// Advance by `dt` seconds. Returns `true` while still moving.
    pub fn step(&mut self, dt: f64) -> bool {
        if self.settled {
            return false;
        }

        self.state = SpringIntegrator::step(self.state, self.target, &self.config, dt);

        if self.state.can_rest(self.target, &self.config) {
            self.state = SpringState::at_rest(self.target);
            self.settled = true;
        }

        !self.settled
    }
}
