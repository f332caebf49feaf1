//! Pointer sampling
//!
//! The host forwards raw pointer positions per container. A sample either
//! carries a screen coordinate or marks the pointer as having left the region.
//! "Absent" is a distinct state: force fields relax toward rest when the
//! pointer is gone, which is not the same as a pointer resting at the center.

use crate::geometry::{Point, Rect};
use serde::{Deserialize, Serialize};

/// A single raw pointer sample in screen coordinates
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PointerSample {
    pub screen_x: f64,
    pub screen_y: f64,
    /// `false` once the pointer has left the tracked region
    pub present: bool,
}

impl PointerSample {
    /// A pointer located at the given screen coordinate
    pub const fn at(screen_x: f64, screen_y: f64) -> Self {
        Self {
            screen_x,
            screen_y,
            present: true,
        }
    }

    /// The pointer has left the tracked region
    pub const fn absent() -> Self {
        Self {
            screen_x: 0.0,
            screen_y: 0.0,
            present: false,
        }
    }

    /// Screen position, or `None` when the pointer is absent
    pub fn position(&self) -> Option<Point> {
        self.present
            .then(|| Point::new(self.screen_x, self.screen_y))
    }
}

/// Offset from the container center scaled by half extents.
///
/// Each component lies in `[-1, 1]` while the pointer is inside the
/// container; values outside are left unclamped.
pub fn normalized(screen: Point, geometry: &Rect) -> Point {
    let center = geometry.center();
    Point::new(
        (screen.x - center.x) / (geometry.width / 2.0),
        (screen.y - center.y) / (geometry.height / 2.0),
    )
}

/// Offset from the container's top-left corner in pixels
pub fn local_offset(screen: Point, geometry: &Rect) -> Point {
    geometry.to_local(screen)
}

/// Offset from the container center scaled by full extents, `[-0.5, 0.5]` inside
pub fn relative(screen: Point, geometry: &Rect) -> Point {
    let center = geometry.center();
    Point::new(
        (screen.x - center.x) / geometry.width,
        (screen.y - center.y) / geometry.height,
    )
}

/// A pointer sample resolved against the container geometry
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PointerReading {
    /// The container has not been laid out yet; no field is active
    Unavailable,
    /// The pointer has left the container
    Absent,
    /// The pointer is tracked
    Present {
        screen: Point,
        local: Point,
        normalized: Point,
        relative: Point,
    },
}

impl PointerReading {
    pub fn resolve(sample: PointerSample, geometry: Option<&Rect>) -> Self {
        let Some(geometry) = geometry.filter(|g| g.is_laid_out()) else {
            return PointerReading::Unavailable;
        };
        match sample.position() {
            None => PointerReading::Absent,
            Some(screen) => PointerReading::Present {
                screen,
                local: local_offset(screen, geometry),
                normalized: normalized(screen, geometry),
                relative: relative(screen, geometry),
            },
        }
    }

    pub fn is_present(&self) -> bool {
        matches!(self, PointerReading::Present { .. })
    }

    pub fn screen(&self) -> Option<Point> {
        match self {
            PointerReading::Present { screen, .. } => Some(*screen),
            _ => None,
        }
    }

    pub fn local(&self) -> Option<Point> {
        match self {
            PointerReading::Present { local, .. } => Some(*local),
            _ => None,
        }
    }

    pub fn normalized(&self) -> Option<Point> {
        match self {
            PointerReading::Present { normalized, .. } => Some(*normalized),
            _ => None,
        }
    }

    pub fn relative(&self) -> Option<Point> {
        match self {
            PointerReading::Present { relative, .. } => Some(*relative),
            _ => None,
        }
    }
}

/// Latest pointer sample and geometry for one container.
///
/// Samples are overwritten, never queued.
#[derive(Clone, Debug, Default)]
pub struct PointerTracker {
    sample: PointerSample,
    geometry: Option<Rect>,
}

impl PointerTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, sample: PointerSample) {
        self.sample = sample;
    }

    /// Store fresh geometry, returning the previous value
    pub fn set_geometry(&mut self, geometry: Rect) -> Option<Rect> {
        tracing::trace!(?geometry, "pointer tracker geometry updated");
        self.geometry.replace(geometry)
    }

    pub fn sample(&self) -> PointerSample {
        self.sample
    }

    /// Geometry, if the container has been laid out
    pub fn geometry(&self) -> Option<&Rect> {
        self.geometry.as_ref().filter(|g| g.is_laid_out())
    }

    pub fn reading(&self) -> PointerReading {
        PointerReading::resolve(self.sample, self.geometry.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalized_spans_unit_square_inside() {
        let rect = Rect::new(100.0, 100.0, 200.0, 100.0);
        assert_eq!(
            normalized(Point::new(100.0, 100.0), &rect),
            Point::new(-1.0, -1.0)
        );
        assert_eq!(
            normalized(Point::new(300.0, 200.0), &rect),
            Point::new(1.0, 1.0)
        );
        // Outside the container the ratio is left unclamped
        assert_eq!(
            normalized(Point::new(400.0, 150.0), &rect),
            Point::new(2.0, 0.0)
        );
    }

    #[test]
    fn test_local_offset_is_pixels_from_top_left() {
        let rect = Rect::new(100.0, 50.0, 200.0, 100.0);
        assert_eq!(
            local_offset(Point::new(130.0, 60.0), &rect),
            Point::new(30.0, 10.0)
        );
    }

    #[test]
    fn test_absent_is_not_center() {
        let rect = Rect::new(0.0, 0.0, 100.0, 100.0);
        let absent = PointerReading::resolve(PointerSample::absent(), Some(&rect));
        let centered = PointerReading::resolve(PointerSample::at(50.0, 50.0), Some(&rect));

        assert_eq!(absent, PointerReading::Absent);
        assert_eq!(centered.normalized(), Some(Point::ZERO));
        assert_ne!(absent, centered);
    }

    #[test]
    fn test_origin_sample_is_present() {
        let sample = PointerSample::at(0.0, 0.0);
        assert_eq!(sample.position(), Some(Point::ZERO));
        assert_eq!(PointerSample::absent().position(), None);
    }

    #[test]
    fn test_missing_geometry_is_unavailable() {
        let mut tracker = PointerTracker::new();
        tracker.record(PointerSample::at(10.0, 10.0));
        assert_eq!(tracker.reading(), PointerReading::Unavailable);

        tracker.set_geometry(Rect::new(0.0, 0.0, 0.0, 40.0));
        assert_eq!(tracker.reading(), PointerReading::Unavailable);

        tracker.set_geometry(Rect::new(0.0, 0.0, 20.0, 40.0));
        assert!(tracker.reading().is_present());
    }
}
