//! Particle fireworks: clicks spawn bursts of spinning polygons that fall,
//! shrink and fade out. Geometry runs on a small dense-matrix type with
//! rotation, scaling and translation operators.

pub mod config;
pub mod error;
pub mod matrix;
pub mod particle;
pub mod plane;
pub mod render;
pub mod simulation;
pub mod transform;

pub use config::{ConfigError, PhysicsConfig, SimulationConfig};
pub use error::{Error, Result};
pub use matrix::Matrix;
pub use particle::Particle;
pub use plane::CartesianPlane;
pub use render::{Color, FanSink, FanVertex};
pub use simulation::Simulation;
