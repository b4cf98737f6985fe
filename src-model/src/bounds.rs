//! Axis-aligned site bounds

use serde::{Deserialize, Serialize};

use crate::{ModelError, Point};

/// Axis-aligned bounding box of the site, in meters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub x_min: f64,
    pub y_min: f64,
    pub x_max: f64,
    pub y_max: f64,
}

impl Bounds {
    pub fn new(x_min: f64, y_min: f64, x_max: f64, y_max: f64) -> Result<Self, ModelError> {
        let bounds = Self {
            x_min,
            y_min,
            x_max,
            y_max,
        };
        bounds.validate()?;
        Ok(bounds)
    }

    pub fn validate(&self) -> Result<(), ModelError> {
        if !(self.x_min < self.x_max && self.y_min < self.y_max)
            || !self.x_min.is_finite()
            || !self.y_min.is_finite()
            || !self.x_max.is_finite()
            || !self.y_max.is_finite()
        {
            return Err(ModelError::InvalidBounds {
                x_min: self.x_min,
                y_min: self.y_min,
                x_max: self.x_max,
                y_max: self.y_max,
            });
        }
        Ok(())
    }

    pub fn width(&self) -> f64 {
        self.x_max - self.x_min
    }

    pub fn height(&self) -> f64 {
        self.y_max - self.y_min
    }

    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }

    pub fn diagonal(&self) -> f64 {
        self.width().hypot(self.height())
    }

    pub fn center(&self) -> Point {
        Point::new(
            (self.x_min + self.x_max) / 2.0,
            (self.y_min + self.y_max) / 2.0,
        )
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x_min && p.x <= self.x_max && p.y >= self.y_min && p.y <= self.y_max
    }

    /// Clamp a point into the box eroded by `margin` on every side.
    ///
    /// If the margin swallows an axis the point collapses to the center of
    /// that axis, so the result is always inside the box.
    pub fn clamp_with_margin(&self, p: Point, margin: f64) -> Point {
        let x = if self.x_min + margin <= self.x_max - margin {
            p.x.clamp(self.x_min + margin, self.x_max - margin)
        } else {
            (self.x_min + self.x_max) / 2.0
        };
        let y = if self.y_min + margin <= self.y_max - margin {
            p.y.clamp(self.y_min + margin, self.y_max - margin)
        } else {
            (self.y_min + self.y_max) / 2.0
        };
        Point::new(x, y)
    }
}

impl From<Bounds> for (f64, f64, f64, f64) {
    fn from(b: Bounds) -> Self {
        (b.x_min, b.y_min, b.x_max, b.y_max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_bounds() {
        let b = Bounds::new(0.0, 0.0, 1000.0, 500.0).unwrap();
        assert_eq!(b.width(), 1000.0);
        assert_eq!(b.height(), 500.0);
        assert_eq!(b.area(), 500_000.0);
        assert!((b.diagonal() - (1000.0f64.powi(2) + 500.0f64.powi(2)).sqrt()).abs() < 1e-9);
        assert_eq!(b.center(), Point::new(500.0, 250.0));
    }

    #[test]
    fn test_inverted_bounds_rejected() {
        assert!(Bounds::new(10.0, 0.0, 0.0, 100.0).is_err());
        assert!(Bounds::new(0.0, 100.0, 100.0, 100.0).is_err());
        assert!(Bounds::new(0.0, 0.0, f64::NAN, 100.0).is_err());
    }

    #[test]
    fn test_clamp_with_margin() {
        let b = Bounds::new(0.0, 0.0, 100.0, 100.0).unwrap();
        let p = b.clamp_with_margin(Point::new(-50.0, 120.0), 10.0);
        assert_eq!(p, Point::new(10.0, 90.0));

        // Margin larger than the half-extent collapses to the center
        let q = b.clamp_with_margin(Point::new(0.0, 0.0), 80.0);
        assert_eq!(q, Point::new(50.0, 50.0));
    }
}
