//! Flux Core
//!
//! Foundational types shared by every Flux crate:
//!
//! - **Geometry**: points and container rectangles in screen space
//! - **Pointer sampling**: raw pointer samples and their container-relative forms
//! - **Errors**: the error type surfaced by motion handles and the engine
//!
//! # Example
//!
//! ```rust
//! use flux_core::{PointerSample, PointerTracker, Rect};
//!
//! let mut tracker = PointerTracker::new();
//! tracker.set_geometry(Rect::new(100.0, 100.0, 200.0, 100.0));
//! tracker.record(PointerSample::at(200.0, 150.0));
//!
//! let reading = tracker.reading();
//! assert_eq!(reading.normalized().map(|p| (p.x, p.y)), Some((0.0, 0.0)));
//! ```

pub mod error;
pub mod geometry;
pub mod pointer;

pub use error::{MotionError, Result};
pub use geometry::{Point, Rect};
pub use pointer::{PointerReading, PointerSample, PointerTracker};
