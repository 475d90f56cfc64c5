pub mod vector;

pub use vector::{CartesianLimits, MutVector2D, PolarRange, Vector2D, VectorError};

/// Limits the length of `v` to `max`.
pub fn truncate(v: Vector2D, max: f64) -> Vector2D {
    if v.magnitude() > max {
        return v.normalise() * max;
    }

    v
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_clamps_long_vectors_only() {
        let long = truncate(Vector2D::new(30.0, 40.0), 5.0);
        assert!(long.roughly_equals(Vector2D::new(3.0, 4.0), 1e-9));

        let short = Vector2D::new(0.3, 0.4);
        assert_eq!(truncate(short, 5.0), short);
    }
}
