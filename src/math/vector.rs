use std::f64::consts::TAU;
use std::fmt;
use std::ops::{Add, AddAssign, Mul, MulAssign, Neg, Sub, SubAssign};

use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Error)]
pub enum VectorError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(&'static str),
}

/// An immutable 2D vector used for positions, velocities and directions.
///
/// Every operation returns a fresh value. In-place mutation is only available
/// on [`MutVector2D`], so a shared read-only vector can never be changed
/// behind its owner's back:
///
/// ```compile_fail
/// use steer::math::Vector2D;
///
/// let mut v = Vector2D::new(3.0, 4.0);
/// v += Vector2D::new(1.0, 0.0);
/// ```
///
/// The same value may also hold a polar coordinate, in which case the first
/// component is the radius and the second one the angle in radians. See
/// [`Vector2D::r`] and [`Vector2D::theta`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vector2D {
    x: f64,
    y: f64,
}

/// Bounds for [`Vector2D::random_cartesian`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CartesianLimits {
    pub x_limit: f64,
    pub y_limit: f64,
}

/// Bounds for [`Vector2D::random_polar`]. `angle_range` is in radians and is
/// centered around zero.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PolarRange {
    pub angle_range: f64,
    pub speed_min: f64,
    pub speed_max: f64,
}

impl PolarRange {
    /// A unit-length polar value pointing anywhere on the circle.
    pub const FULL_TURN_UNIT: Self = Self {
        angle_range: TAU,
        speed_min: 1.0,
        speed_max: 1.0,
    };
}

impl Vector2D {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn x(&self) -> f64 {
        self.x
    }

    pub fn y(&self) -> f64 {
        self.y
    }

    /// Radius of a polar-encoded value.
    pub fn r(&self) -> f64 {
        self.x
    }

    /// Angle of a polar-encoded value, in radians.
    pub fn theta(&self) -> f64 {
        self.y
    }

    pub fn magnitude(&self) -> f64 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    /// Angle relative to `(1, 0)`, in radians.
    pub fn angle(&self) -> f64 {
        self.y.atan2(self.x)
    }

    pub fn is_zero(&self) -> bool {
        self.x == 0.0 && self.y == 0.0
    }

    /// Weighted addition: `self + other * fac`.
    pub fn add_scaled(self, other: Vector2D, fac: f64) -> Self {
        Self::new(self.x + other.x * fac, self.y + other.y * fac)
    }

    pub fn subtract(self, other: Vector2D) -> Self {
        Self::new(self.x - other.x, self.y - other.y)
    }

    pub fn multiply(self, fac: f64) -> Self {
        Self::new(self.x * fac, self.y * fac)
    }

    pub fn divide(self, fac: f64) -> Result<Self, VectorError> {
        if fac == 0.0 {
            return Err(VectorError::InvalidArgument(
                "Factor is 0 - can't divide by 0",
            ));
        }

        Ok(Self::new(self.x / fac, self.y / fac))
    }

    /// Rotates counter-clockwise by `theta` radians.
    pub fn rotate(self, theta: f64) -> Self {
        let (sin, cos) = theta.sin_cos();
        Self::new(self.x * cos - self.y * sin, self.x * sin + self.y * cos)
    }

    /// Scales to unit length. The zero vector is returned unchanged.
    pub fn normalise(self) -> Self {
        if self.is_zero() {
            return self;
        }

        self.multiply(1.0 / self.magnitude())
    }

    /// Folds the coordinates into `[0, width) x [0, height)`.
    pub fn wrap(self, width: f64, height: f64) -> Result<Self, VectorError> {
        Ok(Self::new(wrap_axis(self.x, width)?, wrap_axis(self.y, height)?))
    }

    /// Dot product.
    pub fn scalar_product(&self, other: Vector2D) -> f64 {
        self.x * other.x + self.y * other.y
    }

    /// Distance between the two vectors interpreted as points.
    pub fn distance(&self, other: Vector2D) -> f64 {
        self.subtract(other).magnitude()
    }

    /// Difference between `self.angle()` and `other.angle()`, in degrees.
    ///
    /// This is not the smallest angle between the two vectors: the result is
    /// signed and may fall anywhere in `(-360, 360)`.
    pub fn angle_between(&self, other: Vector2D) -> f64 {
        (self.angle() - other.angle()).to_degrees()
    }

    /// Unit vector pointing from `self` towards `other`.
    pub fn direction_to(&self, other: Vector2D) -> Self {
        other.subtract(*self).normalise()
    }

    /// `true` if both axis-wise differences are within `eps`.
    pub fn roughly_equals(&self, other: Vector2D, eps: f64) -> bool {
        (self.x - other.x).abs() <= eps && (self.y - other.y).abs() <= eps
    }

    /// Treats `self` as `(r, theta)` and converts it to cartesian.
    pub fn to_cartesian(self) -> Self {
        let (sin, cos) = self.theta().sin_cos();
        Self::new(self.r() * cos, self.r() * sin)
    }

    /// Converts a cartesian vector to `(r, theta)`.
    pub fn to_polar(self) -> Self {
        Self::new(self.magnitude(), self.angle())
    }

    /// Random point in `[0, x_limit) x [0, y_limit)`.
    pub fn random_cartesian<R: Rng + ?Sized>(rng: &mut R, limits: CartesianLimits) -> Self {
        Self::new(
            rng.gen::<f64>() * limits.x_limit,
            rng.gen::<f64>() * limits.y_limit,
        )
    }

    /// Random polar value `(speed, angle)`, laid out the way [`Vector2D::to_cartesian`]
    /// reads it. The speed is uniform in `[speed_min, speed_max]`.
    pub fn random_polar<R: Rng + ?Sized>(rng: &mut R, range: PolarRange) -> Self {
        let angle = rng.gen::<f64>() * range.angle_range - range.angle_range / 2.0;
        let speed = if range.speed_min < range.speed_max {
            rng.gen_range(range.speed_min..=range.speed_max)
        } else {
            range.speed_max
        };

        Self::new(speed, angle)
    }
}

fn wrap_axis(value: f64, bound: f64) -> Result<f64, VectorError> {
    if bound <= 0.0 {
        return Err(VectorError::InvalidArgument("Wrap bounds must be positive"));
    }

    let wrapped = if value >= bound {
        value % bound
    } else if value < 0.0 {
        (value % bound + bound) % bound
    } else {
        value
    };

    Ok(wrapped)
}

impl fmt::Display for Vector2D {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.3}, {:.3})", self.x, self.y)
    }
}

impl Add for Vector2D {
    type Output = Vector2D;

    fn add(self, rhs: Vector2D) -> Vector2D {
        Vector2D::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Vector2D {
    type Output = Vector2D;

    fn sub(self, rhs: Vector2D) -> Vector2D {
        self.subtract(rhs)
    }
}

impl Mul<f64> for Vector2D {
    type Output = Vector2D;

    fn mul(self, rhs: f64) -> Vector2D {
        self.multiply(rhs)
    }
}

impl Neg for Vector2D {
    type Output = Vector2D;

    fn neg(self) -> Vector2D {
        Vector2D::new(-self.x, -self.y)
    }
}

impl From<(f64, f64)> for Vector2D {
    fn from((x, y): (f64, f64)) -> Self {
        Self::new(x, y)
    }
}

/// A 2D vector that owns its components and can be changed in place.
///
/// Behaviours keep their per-tick scratch state in these. Call
/// [`MutVector2D::get`] to hand out an immutable snapshot.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct MutVector2D {
    pub x: f64,
    pub y: f64,
}

impl MutVector2D {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn get(&self) -> Vector2D {
        Vector2D::new(self.x, self.y)
    }

    pub fn magnitude(&self) -> f64 {
        self.get().magnitude()
    }

    pub fn set_to(&mut self, v: Vector2D) {
        self.x = v.x;
        self.y = v.y;
    }

    pub fn add_scaled(&mut self, other: Vector2D, fac: f64) {
        self.set_to(self.get().add_scaled(other, fac));
    }

    /// Divides in place. On error the vector is left untouched.
    pub fn divide(&mut self, fac: f64) -> Result<(), VectorError> {
        let divided = self.get().divide(fac)?;
        self.set_to(divided);
        Ok(())
    }

    pub fn rotate(&mut self, theta: f64) {
        self.set_to(self.get().rotate(theta));
    }

    /// No-op for the zero vector.
    pub fn normalise(&mut self) {
        self.set_to(self.get().normalise());
    }

    /// Wraps in place. On error the vector is left untouched.
    pub fn wrap(&mut self, width: f64, height: f64) -> Result<(), VectorError> {
        let wrapped = self.get().wrap(width, height)?;
        self.set_to(wrapped);
        Ok(())
    }
}

impl From<Vector2D> for MutVector2D {
    fn from(v: Vector2D) -> Self {
        Self::new(v.x, v.y)
    }
}

impl AddAssign<Vector2D> for MutVector2D {
    fn add_assign(&mut self, rhs: Vector2D) {
        self.set_to(self.get() + rhs);
    }
}

impl SubAssign<Vector2D> for MutVector2D {
    fn sub_assign(&mut self, rhs: Vector2D) {
        self.set_to(self.get() - rhs);
    }
}

impl MulAssign<f64> for MutVector2D {
    fn mul_assign(&mut self, rhs: f64) {
        self.set_to(self.get() * rhs);
    }
}

#[cfg(test)]
mod tests {
    use std::f64::consts::{FRAC_PI_2, PI};

    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn magnitude_and_angle() {
        let v = Vector2D::new(3.0, 4.0);
        assert_eq!(v.magnitude(), 5.0);
        assert!((Vector2D::new(0.0, 2.0).angle() - FRAC_PI_2).abs() < EPS);
        assert!((Vector2D::new(-1.0, 0.0).angle() - PI).abs() < EPS);
    }

    #[test]
    fn divide_undoes_multiply() {
        let samples = [
            (Vector2D::new(3.0, -4.5), 2.5),
            (Vector2D::new(-0.001, 1e6), -7.0),
            (Vector2D::new(12.0, 0.0), 1e-3),
        ];

        for (v, s) in samples {
            let mut m = MutVector2D::from(v);
            m *= s;
            m.divide(s).unwrap();
            assert!(m.get().roughly_equals(v, 1e-6), "{} != {}", m.get(), v);

            let back = v.multiply(s).divide(s).unwrap();
            assert!(back.roughly_equals(v, 1e-6));
        }
    }

    #[test]
    fn divide_by_zero_is_rejected() {
        let v = Vector2D::new(1.0, 2.0);
        assert!(matches!(v.divide(0.0), Err(VectorError::InvalidArgument(_))));

        let mut m = MutVector2D::new(1.0, 2.0);
        assert!(m.divide(0.0).is_err());
        assert_eq!(m, MutVector2D::new(1.0, 2.0));
    }

    #[test]
    fn normalise_gives_unit_length() {
        for v in [
            Vector2D::new(3.0, 4.0),
            Vector2D::new(-0.5, 0.1),
            Vector2D::new(1e-4, -1e-4),
        ] {
            let mut m = MutVector2D::from(v);
            m.normalise();
            assert!((m.magnitude() - 1.0).abs() < EPS);
            assert!((v.normalise().magnitude() - 1.0).abs() < EPS);
        }
    }

    #[test]
    fn normalise_zero_is_noop() {
        let mut m = MutVector2D::default();
        m.normalise();
        assert_eq!(m.get(), Vector2D::ZERO);
        assert_eq!(Vector2D::ZERO.normalise(), Vector2D::ZERO);
    }

    #[test]
    fn full_turn_rotation() {
        let v = Vector2D::new(2.0, -7.0);
        assert!(v.rotate(TAU).roughly_equals(v, EPS));

        let quarter = Vector2D::new(1.0, 0.0).rotate(FRAC_PI_2);
        assert!(quarter.roughly_equals(Vector2D::new(0.0, 1.0), EPS));
    }

    #[test]
    fn wrap_folds_into_bounds() {
        let v = Vector2D::new(-5.0, 15.0).wrap(10.0, 10.0).unwrap();
        assert_eq!(v, Vector2D::new(5.0, 5.0));

        let mut m = MutVector2D::new(15.0, -25.0);
        m.wrap(10.0, 10.0).unwrap();
        assert_eq!(m.get(), Vector2D::new(5.0, 5.0));

        let inside = Vector2D::new(0.0, 9.5).wrap(10.0, 10.0).unwrap();
        assert_eq!(inside, Vector2D::new(0.0, 9.5));

        let edge = Vector2D::new(10.0, 20.0).wrap(10.0, 10.0).unwrap();
        assert_eq!(edge, Vector2D::ZERO);
    }

    #[test]
    fn wrap_rejects_empty_bounds() {
        let mut m = MutVector2D::new(3.0, 3.0);
        assert!(m.wrap(0.0, 10.0).is_err());
        assert_eq!(m, MutVector2D::new(3.0, 3.0));
    }

    #[test]
    fn equality() {
        let a = Vector2D::new(1.0, 1.0);
        assert_eq!(a, Vector2D::new(1.0, 1.0));
        assert_ne!(a, Vector2D::new(1.0, 1.0 + 1e-12));
        assert!(a.roughly_equals(Vector2D::new(1.05, 0.95), 0.05 + EPS));
        assert!(!a.roughly_equals(Vector2D::new(1.2, 1.0), 0.1));
    }

    #[test]
    fn products_and_distances() {
        let a = Vector2D::new(1.0, 2.0);
        let b = Vector2D::new(3.0, -1.0);
        assert_eq!(a.scalar_product(b), 1.0);
        assert_eq!(Vector2D::ZERO.distance(Vector2D::new(3.0, 4.0)), 5.0);

        let dir = Vector2D::new(1.0, 1.0).direction_to(Vector2D::new(1.0, 5.0));
        assert!(dir.roughly_equals(Vector2D::new(0.0, 1.0), EPS));
    }

    #[test]
    fn angle_between_is_signed_difference_in_degrees() {
        let up = Vector2D::new(0.0, 1.0);
        let right = Vector2D::new(1.0, 0.0);
        assert!((up.angle_between(right) - 90.0).abs() < EPS);
        assert!((right.angle_between(up) + 90.0).abs() < EPS);
    }

    #[test]
    fn polar_conversions() {
        let polar = Vector2D::new(2.0, FRAC_PI_2);
        assert!(polar.to_cartesian().roughly_equals(Vector2D::new(0.0, 2.0), EPS));

        let v = Vector2D::new(-3.0, 4.0);
        let p = v.to_polar();
        assert!((p.r() - 5.0).abs() < EPS);
        assert!(p.to_cartesian().roughly_equals(v, EPS));
    }

    #[test]
    fn random_cartesian_stays_in_limits() {
        let mut rng = StdRng::seed_from_u64(7);
        let limits = CartesianLimits {
            x_limit: 800.0,
            y_limit: 600.0,
        };

        for _ in 0..100 {
            let v = Vector2D::random_cartesian(&mut rng, limits);
            assert!((0.0..800.0).contains(&v.x()));
            assert!((0.0..600.0).contains(&v.y()));
        }
    }

    #[test]
    fn random_polar_respects_range() {
        let mut rng = StdRng::seed_from_u64(11);
        let range = PolarRange {
            angle_range: PI,
            speed_min: 2.0,
            speed_max: 4.0,
        };

        for _ in 0..100 {
            let p = Vector2D::random_polar(&mut rng, range);
            assert!((2.0..=4.0).contains(&p.r()));
            assert!((-FRAC_PI_2..FRAC_PI_2).contains(&p.theta()));
        }

        let unit = Vector2D::random_polar(&mut rng, PolarRange::FULL_TURN_UNIT);
        assert_eq!(unit.r(), 1.0);
        assert!((unit.to_cartesian().magnitude() - 1.0).abs() < EPS);
    }

    #[test]
    fn in_place_arithmetic() {
        let mut m = MutVector2D::new(1.0, 1.0);
        m += Vector2D::new(2.0, 3.0);
        m -= Vector2D::new(1.0, 0.0);
        m.add_scaled(Vector2D::new(1.0, -1.0), 2.0);
        assert_eq!(m.get(), Vector2D::new(4.0, 2.0));

        m.rotate(PI);
        assert!(m.get().roughly_equals(Vector2D::new(-4.0, -2.0), EPS));
    }
}
