//! Flux Animation System
//!
//! Spring-smoothed motion values and the frame scheduler that advances them.
//!
//! # Features
//!
//! - **Spring Integration**: semi-implicit Euler with stiffness and damping,
//!   frame-time clamped for stability
//! - **Motion Values**: scalars that chase a target without snapping
//! - **Scheduler**: Idle/Running frame scheduling with owner-scoped teardown
//! - **Range Mapping**: linear interpolation from one range onto another

pub mod motion;
pub mod pair;
pub mod range;
pub mod scheduler;
pub mod spring;

pub use motion::MotionValue;
pub use pair::MotionPair;
pub use range::RangeMap;
pub use scheduler::{AnimationScheduler, MotionId, OwnerId, SchedulerState};
pub use spring::{SpringConfig, SpringIntegrator, SpringState, MAX_FRAME_DT};
