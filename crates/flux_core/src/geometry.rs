//! Screen-space geometry
//!
//! Every coordinate is in CSS pixels. Container rectangles use the host's
//! layout convention: `left`/`top` is the top-left corner in screen space.

use serde::{Deserialize, Serialize};
use std::ops::{Add, Mul, Sub};

/// 2D point (also used as a displacement vector)
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn length(&self) -> f64 {
        self.x.hypot(self.y)
    }

    pub fn distance(&self, other: Point) -> f64 {
        (*self - other).length()
    }

    pub fn dot(&self, other: Point) -> f64 {
        self.x * other.x + self.y * other.y
    }

    /// Unit vector in the same direction, or `None` for a zero-length vector
    pub fn normalize(&self) -> Option<Point> {
        let len = self.length();
        if len > f64::EPSILON {
            Some(Point::new(self.x / len, self.y / len))
        } else {
            None
        }
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Point {
    type Output = Point;

    fn mul(self, rhs: f64) -> Point {
        Point::new(self.x * rhs, self.y * rhs)
    }
}

/// Bounding rectangle of a tracked region (container geometry)
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const ZERO: Rect = Rect {
        left: 0.0,
        top: 0.0,
        width: 0.0,
        height: 0.0,
    };

    pub const fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    pub fn origin(&self) -> Point {
        Point::new(self.left, self.top)
    }

    pub fn center(&self) -> Point {
        Point::new(
            self.left + self.width / 2.0,
            self.top + self.height / 2.0,
        )
    }

    /// Whether the host has laid this region out with a usable area
    pub fn is_laid_out(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }

    /// Whether the extents differ from `other` (position changes excluded)
    pub fn is_resized_from(&self, other: &Rect) -> bool {
        self.width != other.width || self.height != other.height
    }

    /// Clamp a container-local point into `[0, width] x [0, height]`
    pub fn clamp_local(&self, point: Point) -> Point {
        Point::new(
            point.x.clamp(0.0, self.width.max(0.0)),
            point.y.clamp(0.0, self.height.max(0.0)),
        )
    }

    /// Convert a container-local point to screen space
    pub fn to_screen(&self, local: Point) -> Point {
        local + self.origin()
    }

    /// Convert a screen-space point to container-local space
    pub fn to_local(&self, screen: Point) -> Point {
        screen - self.origin()
    }
}
