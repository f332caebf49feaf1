//! Ambient particle pulse
//!
//! A cosmetic oscillation of scale and opacity. It is a pure function of
//! elapsed time and never touches spring or force state.

use serde::Serialize;
use std::f64::consts::TAU;

/// Glow scale and opacity at one instant
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct PulseFrame {
    pub scale: f64,
    pub opacity: f64,
}

/// Sinusoidal pulse with a fixed period and phase offset
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AmbientPulse {
    /// Seconds per full cycle
    pub period: f64,
    /// Fraction of a cycle, `[0, 1)`
    pub phase: f64,
    pub scale: (f64, f64),
    pub opacity: (f64, f64),
}

impl AmbientPulse {
    pub fn new(period: f64, phase: f64) -> Self {
        Self {
            period,
            phase: phase.rem_euclid(1.0),
            scale: (1.0, 1.8),
            opacity: (0.4, 0.8),
        }
    }

    /// Pulse that starts `delay` seconds late, expressed as a phase offset
    pub fn delayed(period: f64, delay: f64) -> Self {
        Self::new(period, -delay / period)
    }

    /// Position in the cycle mapped to `[0, 1]`, starting and ending at 0
    pub fn level(&self, elapsed: f64) -> f64 {
        if self.period <= 0.0 {
            return 0.0;
        }
        let cycle = (elapsed / self.period + self.phase).rem_euclid(1.0);
        (1.0 - (TAU * cycle).cos()) / 2.0
    }

    pub fn sample(&self, elapsed: f64) -> PulseFrame {
        let level = self.level(elapsed);
        PulseFrame {
            scale: lerp(self.scale, level),
            opacity: lerp(self.opacity, level),
        }
    }
}

fn lerp((from, to): (f64, f64), t: f64) -> f64 {
    from + (to - from) * t
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pulse_peaks_mid_cycle() {
        let pulse = AmbientPulse::new(4.0, 0.0);
        let start = pulse.sample(0.0);
        let peak = pulse.sample(2.0);

        assert!((start.scale - 1.0).abs() < 1e-12);
        assert!((start.opacity - 0.4).abs() < 1e-12);
        assert!((peak.scale - 1.8).abs() < 1e-12);
        assert!((peak.opacity - 0.8).abs() < 1e-12);
    }

    #[test]
    fn test_pulse_is_periodic() {
        let pulse = AmbientPulse::new(3.5, 0.3);
        for t in [0.0, 0.7, 1.9, 3.1] {
            let a = pulse.sample(t);
            let b = pulse.sample(t + 3.5 * 4.0);
            assert!((a.scale - b.scale).abs() < 1e-9);
        }
    }

    #[test]
    fn test_delay_shifts_the_cycle() {
        let base = AmbientPulse::new(4.0, 0.0);
        let delayed = AmbientPulse::delayed(4.0, 0.5);
        assert!((delayed.level(1.5) - base.level(1.0)).abs() < 1e-12);
    }
}
