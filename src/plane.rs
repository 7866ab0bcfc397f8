use cgmath::{Point2, point2};

use crate::error::{Error, Result};

/// Mapping between pixel space (origin top-left, Y down) and the Cartesian
/// plane (origin at the surface center, Y up) for a render surface of a
/// given size.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CartesianPlane {
    width: f64,
    height: f64,
}

impl CartesianPlane {
    pub fn new(width: f64, height: f64) -> Result<Self> {
        if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
            return Err(Error::InvalidSurface { width, height });
        }
        Ok(Self { width, height })
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    /// Pixel position of the surface center.
    pub fn pixel_center(&self) -> Point2<f64> {
        point2(self.width * 0.5, self.height * 0.5)
    }

    pub fn pixel_to_coords(&self, pixel: Point2<f64>) -> Point2<f64> {
        point2(pixel.x - self.width * 0.5, self.height * 0.5 - pixel.y)
    }

    pub fn coords_to_pixel(&self, coords: Point2<f64>) -> Point2<f32> {
        point2(
            (coords.x + self.width * 0.5) as f32,
            (self.height * 0.5 - coords.y) as f32,
        )
    }
}
