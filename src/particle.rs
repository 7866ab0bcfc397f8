use std::f64::consts::{FRAC_PI_2, PI, TAU};

use cgmath::{Point2, Vector2, point2, vec2};
use rand::Rng;

use crate::{
    config::PhysicsConfig,
    error::{Error, Result},
    matrix::Matrix,
    plane::CartesianPlane,
    render::{Color, FanSink, FanVertex},
    transform,
};

const ANGULAR_VELOCITY_MAX: f64 = PI;
const SPEED_MIN: f64 = 100.0;
const SPEED_MAX: f64 = 500.0;
const RADIUS_MIN: f64 = 20.0;
const RADIUS_MAX: f64 = 80.0;
// Fraction of the starting ttl below which a particle counts as expired.
// Absorbs the rounding left over from repeated `ttl -= dt`.
const EXPIRY_EPSILON: f64 = 1e-9;

/// A spinning, shrinking polygon thrown from a click position.
///
/// The outline lives in a `2 x N` matrix of Cartesian coordinates, one column
/// per outer vertex. Rotation and scaling are anchored at the particle's own
/// center; only translation moves the center.
#[derive(Clone, Debug)]
pub struct Particle {
    ttl: f64,
    points: Matrix,
    center: Point2<f64>,
    angular_velocity: f64,
    velocity: Vector2<f64>,
    center_color: Color,
    edge_color: Color,
    plane: CartesianPlane,
    physics: PhysicsConfig,
}

impl Particle {
    pub fn new<R: Rng + ?Sized>(
        plane: CartesianPlane,
        point_count: usize,
        click: Point2<f64>,
        physics: PhysicsConfig,
        rng: &mut R,
    ) -> Result<Self> {
        if point_count < 2 {
            return Err(Error::InvalidPointCount(point_count));
        }

        let center = plane.pixel_to_coords(click);
        let angular_velocity = rng.gen_range(0.0..=ANGULAR_VELOCITY_MAX);

        let mut vx = rng.gen_range(SPEED_MIN..=SPEED_MAX);
        if rng.gen_bool(0.5) {
            vx = -vx;
        }
        let vy = rng.gen_range(SPEED_MIN..=SPEED_MAX);

        let edge_color = Color::rgb(
            rng.gen_range(0..=255),
            rng.gen_range(0..=255),
            rng.gen_range(0..=255),
        );

        let mut points = Matrix::new(2, point_count);
        let mut theta = rng.gen_range(0.0..=FRAC_PI_2);
        let step = TAU / (point_count - 1) as f64;
        for col in 0..point_count {
            let r = rng.gen_range(RADIUS_MIN..=RADIUS_MAX);
            let (sin, cos) = theta.sin_cos();
            points[(0, col)] = center.x + r * cos;
            points[(1, col)] = center.y + r * sin;
            theta += step;
        }

        Ok(Self {
            ttl: physics.ttl,
            points,
            center,
            angular_velocity,
            velocity: vec2(vx, vy),
            center_color: Color::WHITE,
            edge_color,
            plane,
            physics,
        })
    }

    /// Advances the particle by `dt` seconds.
    ///
    /// Rotation and translation scale with `dt`; the decay shrink is applied
    /// once per call whatever `dt` is.
    pub fn update(&mut self, dt: f64) {
        self.ttl -= dt;
        self.rotate(dt * self.angular_velocity);
        self.scale(self.physics.decay_rate);
        let dx = self.velocity.x * dt;
        self.velocity.y -= self.physics.gravity * dt;
        let dy = self.velocity.y * dt;
        self.translate(dx, dy);
    }

    /// Rotates the outline about the particle center.
    pub fn rotate(&mut self, theta: f64) {
        self.apply_about_center(&transform::rotation(theta));
    }

    /// Scales the outline about the particle center.
    pub fn scale(&mut self, factor: f64) {
        self.apply_about_center(&transform::scaling(factor));
    }

    /// Shifts the outline and the center.
    pub fn translate(&mut self, dx: f64, dy: f64) {
        let shift = transform::translation(dx, dy, self.points.cols());
        self.points = &shift + &self.points;
        self.center.x += dx;
        self.center.y += dy;
    }

    // Moves the center to the origin, left-multiplies by `operator`, moves back.
    fn apply_about_center(&mut self, operator: &Matrix) {
        let center = self.center;
        self.translate(-center.x, -center.y);
        self.points = operator * &self.points;
        self.translate(center.x, center.y);
    }

    pub fn render<S: FanSink + ?Sized>(&self, sink: &mut S) {
        let mut fan = Vec::with_capacity(self.points.cols() + 1);
        fan.push(FanVertex {
            position: self.plane.coords_to_pixel(self.center),
            color: self.center_color,
        });
        fan.extend((0..self.points.cols()).map(|col| FanVertex {
            position: self
                .plane
                .coords_to_pixel(point2(self.points[(0, col)], self.points[(1, col)])),
            color: self.edge_color,
        }));
        sink.fan(&fan);
    }

    pub fn is_alive(&self) -> bool {
        self.ttl > EXPIRY_EPSILON * self.physics.ttl
    }

    pub fn ttl(&self) -> f64 {
        self.ttl
    }

    pub fn center(&self) -> Point2<f64> {
        self.center
    }

    /// Outer vertices, one column per point.
    pub fn points(&self) -> &Matrix {
        &self.points
    }

    pub fn point_count(&self) -> usize {
        self.points.cols()
    }

    pub fn velocity(&self) -> Vector2<f64> {
        self.velocity
    }

    pub fn angular_velocity(&self) -> f64 {
        self.angular_velocity
    }

    /// `(center, edge)` colors.
    pub fn colors(&self) -> (Color, Color) {
        (self.center_color, self.edge_color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use rand::{SeedableRng, rngs::StdRng};

    fn plane() -> CartesianPlane {
        CartesianPlane::new(1920.0, 1080.0).unwrap()
    }

    fn particle(seed: u64, point_count: usize, click: Point2<f64>) -> Particle {
        let mut rng = StdRng::seed_from_u64(seed);
        Particle::new(plane(), point_count, click, PhysicsConfig::default(), &mut rng).unwrap()
    }

    fn offsets(p: &Particle) -> Vec<(f64, f64)> {
        let c = p.center();
        (0..p.point_count())
            .map(|j| (p.points()[(0, j)] - c.x, p.points()[(1, j)] - c.y))
            .collect()
    }

    #[test]
    fn too_few_points_is_rejected() {
        let mut rng = StdRng::seed_from_u64(0);
        for n in [0, 1] {
            let err = Particle::new(plane(), n, point2(10.0, 10.0), PhysicsConfig::default(), &mut rng)
                .unwrap_err();
            assert!(matches!(err, Error::InvalidPointCount(count) if count == n));
        }
    }

    #[test]
    fn spawn_parameters_stay_in_range() {
        for seed in 0..64 {
            let p = particle(seed, 30, point2(300.0, 200.0));
            assert_eq!(p.ttl(), PhysicsConfig::default().ttl);
            assert!((0.0..=PI).contains(&p.angular_velocity()));
            assert!((SPEED_MIN..=SPEED_MAX).contains(&p.velocity().x.abs()));
            assert!((SPEED_MIN..=SPEED_MAX).contains(&p.velocity().y));
            assert_eq!(p.colors().0, Color::WHITE);
            for (dx, dy) in offsets(&p) {
                let r = dx.hypot(dy);
                assert!((RADIUS_MIN - 1e-9..=RADIUS_MAX + 1e-9).contains(&r), "radius {r}");
            }
        }
    }

    #[test]
    fn horizontal_direction_varies() {
        let signs: Vec<bool> = (0..64)
            .map(|seed| particle(seed, 10, point2(0.0, 0.0)).velocity().x > 0.0)
            .collect();
        assert!(signs.contains(&true) && signs.contains(&false));
    }

    #[test]
    fn outline_sweeps_evenly() {
        let p = particle(7, 5, point2(500.0, 500.0));
        let angles: Vec<f64> = offsets(&p).iter().map(|(x, y)| y.atan2(*x)).collect();
        let first = angles[0];
        assert!((-1e-9..=FRAC_PI_2 + 1e-9).contains(&first));
        for (j, angle) in angles.iter().enumerate() {
            let expected = (first + j as f64 * TAU / 4.0).sin_cos();
            assert_abs_diff_eq!(angle.sin(), expected.0, epsilon = 1e-9);
            assert_abs_diff_eq!(angle.cos(), expected.1, epsilon = 1e-9);
        }
    }

    #[test]
    fn rotation_is_about_own_center() {
        let mut p = particle(3, 12, point2(200.0, 900.0));
        let center = p.center();
        let before = offsets(&p);
        p.rotate(FRAC_PI_2);
        assert_eq!(p.center(), center);
        for ((x, y), (rx, ry)) in before.into_iter().zip(offsets(&p)) {
            assert_abs_diff_eq!(rx, -y, epsilon = 1e-9);
            assert_abs_diff_eq!(ry, x, epsilon = 1e-9);
        }
    }

    #[test]
    fn scale_is_about_own_center() {
        let mut p = particle(4, 12, point2(1500.0, 100.0));
        let center = p.center();
        let before = offsets(&p);
        p.scale(0.5);
        assert_eq!(p.center(), center);
        for ((x, y), (sx, sy)) in before.into_iter().zip(offsets(&p)) {
            assert_abs_diff_eq!(sx, 0.5 * x, epsilon = 1e-9);
            assert_abs_diff_eq!(sy, 0.5 * y, epsilon = 1e-9);
        }
    }

    #[test]
    fn translate_moves_points_and_center() {
        let mut p = particle(5, 8, point2(100.0, 100.0));
        let points = p.points().clone();
        let center = p.center();
        p.translate(10.0, 5.0);
        assert_eq!(p.center(), point2(center.x + 10.0, center.y + 5.0));
        for j in 0..8 {
            assert_eq!(p.points()[(0, j)], points[(0, j)] + 10.0);
            assert_eq!(p.points()[(1, j)], points[(1, j)] + 5.0);
        }
    }

    #[test]
    fn update_rotates_scales_then_falls() {
        let dt = 1.0 / 60.0;
        let mut p = particle(11, 20, point2(960.0, 540.0));
        let mut expected = p.clone();

        p.update(dt);

        expected.rotate(dt * expected.angular_velocity());
        expected.scale(PhysicsConfig::default().decay_rate);
        let dx = expected.velocity().x * dt;
        let vy = expected.velocity().y - PhysicsConfig::default().gravity * dt;
        expected.translate(dx, vy * dt);

        assert_eq!(p.points(), expected.points());
        assert_eq!(p.center(), expected.center());
        assert_eq!(p.velocity().y, vy);
        assert_eq!(p.velocity().x, expected.velocity().x);
        assert_eq!(p.ttl(), PhysicsConfig::default().ttl - dt);
    }

    #[test]
    fn shrink_is_applied_per_update_not_per_second() {
        let decay = PhysicsConfig::default().decay_rate;
        let mut p = particle(12, 16, point2(400.0, 300.0));
        let before = offsets(&p);
        let center = p.center();

        // A zero-length tick still shrinks by the full decay factor.
        p.update(0.0);

        assert_eq!(p.center(), center);
        assert_eq!(p.ttl(), PhysicsConfig::default().ttl);
        for ((x, y), (sx, sy)) in before.into_iter().zip(offsets(&p)) {
            assert_abs_diff_eq!(sx, decay * x, epsilon = 1e-9);
            assert_abs_diff_eq!(sy, decay * y, epsilon = 1e-9);
        }
    }

    #[test]
    fn gravity_pulls_down() {
        let mut p = particle(13, 10, point2(960.0, 540.0));
        let vy = p.velocity().y;
        for _ in 0..60 {
            p.update(1.0 / 60.0);
        }
        assert_abs_diff_eq!(p.velocity().y, vy - 1000.0, epsilon = 1e-6);
    }

    #[test]
    fn expires_after_ttl() {
        let mut p = particle(14, 10, point2(0.0, 0.0));
        assert!(p.is_alive());
        for _ in 0..9 {
            p.update(0.5);
            assert!(p.is_alive());
        }
        p.update(0.5);
        assert!(!p.is_alive());
    }

    #[test]
    fn expiry_absorbs_rounding_at_frame_rate() {
        let dt = 1.0 / 60.0;
        let mut p = particle(16, 10, point2(0.0, 0.0));
        for _ in 0..299 {
            p.update(dt);
            assert!(p.is_alive());
        }
        p.update(dt);
        assert!(!p.is_alive());
    }

    #[test]
    fn render_emits_center_then_ring() {
        let p = particle(15, 6, point2(640.0, 360.0));
        let mut fans: Vec<Vec<FanVertex>> = Vec::new();
        p.render(&mut fans);

        assert_eq!(fans.len(), 1);
        let fan = &fans[0];
        assert_eq!(fan.len(), 7);
        assert_eq!(fan[0].position, point2(640.0f32, 360.0f32));
        assert_eq!(fan[0].color, Color::WHITE);
        let edge = p.colors().1;
        for (j, vertex) in fan[1..].iter().enumerate() {
            assert_eq!(vertex.color, edge);
            let expected = plane()
                .coords_to_pixel(point2(p.points()[(0, j)], p.points()[(1, j)]));
            assert_eq!(vertex.position, expected);
        }
    }
}
