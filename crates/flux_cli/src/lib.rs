//! Flux CLI
//!
//! Library half of the `flux` binary, kept separate so scenarios can be
//! replayed from tests.

pub mod scenario;

pub use scenario::{
    EffectPreset, EffectSnapshot, EffectState, Scenario, ScenarioRunner, ScenarioStep, Snapshot,
};
