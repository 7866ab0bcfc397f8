//! Boundary between the simulation and whatever draws it.

use cgmath::Point2;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const WHITE: Color = Color::rgb(255, 255, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FanVertex {
    /// Pixel position, origin top-left, Y down.
    pub position: Point2<f32>,
    pub color: Color,
}

/// Receives one triangle fan per particle per frame: the center vertex first,
/// then the outer ring in sweep order. The ring closes back to its first
/// outer vertex implicitly.
pub trait FanSink {
    fn fan(&mut self, vertices: &[FanVertex]);
}

/// Collects fans in draw order.
impl FanSink for Vec<Vec<FanVertex>> {
    fn fan(&mut self, vertices: &[FanVertex]) {
        self.push(vertices.to_vec());
    }
}
