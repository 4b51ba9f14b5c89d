/// A 2D affine transform mapping `(x, y)` to
/// `(a*x + c*y + tx, b*x + d*y + ty)`.
///
/// The `*_by` builders prepend their operation: `t.translated_by(x, y)`
/// translates points first and then applies `t`, the same convention a
/// drawing context uses when its CTM is modified step by step.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AffineTransform {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub tx: f64,
    pub ty: f64,
}

/// Trig results this close to 0 or ±1 are snapped so quarter turns stay exact.
const SNAP_EPSILON: f64 = 1e-12;

fn snap(value: f64) -> f64 {
    for target in [-1.0, 0.0, 1.0] {
        if (value - target).abs() < SNAP_EPSILON {
            return target;
        }
    }
    value
}

impl AffineTransform {
    pub const IDENTITY: AffineTransform = AffineTransform {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
        tx: 0.0,
        ty: 0.0,
    };

    pub fn translated_by(self, x: f64, y: f64) -> Self {
        Self {
            tx: self.a * x + self.c * y + self.tx,
            ty: self.b * x + self.d * y + self.ty,
            ..self
        }
    }

    /// Rotation by `angle` radians; positive angles turn +x towards +y.
    pub fn rotated_by(self, angle: f64) -> Self {
        let (sin, cos) = angle.sin_cos();
        let (sin, cos) = (snap(sin), snap(cos));
        Self {
            a: self.a * cos + self.c * sin,
            b: self.b * cos + self.d * sin,
            c: self.c * cos - self.a * sin,
            d: self.d * cos - self.b * sin,
            ..self
        }
    }

    pub fn scaled_by(self, sx: f64, sy: f64) -> Self {
        Self {
            a: self.a * sx,
            b: self.b * sx,
            c: self.c * sy,
            d: self.d * sy,
            ..self
        }
    }

    /// Applies `self` and then `next`.
    pub fn then(self, next: AffineTransform) -> Self {
        Self {
            a: next.a * self.a + next.c * self.b,
            b: next.b * self.a + next.d * self.b,
            c: next.a * self.c + next.c * self.d,
            d: next.b * self.c + next.d * self.d,
            tx: next.a * self.tx + next.c * self.ty + next.tx,
            ty: next.b * self.tx + next.d * self.ty + next.ty,
        }
    }

    pub fn apply(&self, x: f64, y: f64) -> (f64, f64) {
        (
            self.a * x + self.c * y + self.tx,
            self.b * x + self.d * y + self.ty,
        )
    }

    pub fn determinant(&self) -> f64 {
        self.a * self.d - self.b * self.c
    }

    /// Returns `None` for a degenerate (non-invertible) transform.
    pub fn inverted(&self) -> Option<Self> {
        let det = self.determinant();
        if det.abs() < SNAP_EPSILON {
            return None;
        }
        let a = self.d / det;
        let b = -self.b / det;
        let c = -self.c / det;
        let d = self.a / det;
        Some(Self {
            a,
            b,
            c,
            d,
            tx: -(a * self.tx + c * self.ty),
            ty: -(b * self.tx + d * self.ty),
        })
    }
}

impl Default for AffineTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::{FRAC_PI_2, PI};

    fn assert_point(actual: (f64, f64), expected: (f64, f64)) {
        assert_relative_eq!(actual.0, expected.0, epsilon = 1e-9);
        assert_relative_eq!(actual.1, expected.1, epsilon = 1e-9);
    }

    #[test]
    fn test_identity_leaves_points() {
        assert_point(AffineTransform::IDENTITY.apply(3.0, -2.0), (3.0, -2.0));
    }

    #[test]
    fn test_translation() {
        let t = AffineTransform::IDENTITY.translated_by(5.0, 7.0);
        assert_point(t.apply(1.0, 1.0), (6.0, 8.0));
    }

    #[test]
    fn test_quarter_turn_is_exact() {
        let t = AffineTransform::IDENTITY.rotated_by(FRAC_PI_2);
        assert_eq!(t.a, 0.0);
        assert_eq!(t.b, 1.0);
        assert_eq!(t.c, -1.0);
        assert_eq!(t.d, 0.0);
        assert_point(t.apply(1.0, 0.0), (0.0, 1.0));
    }

    #[test]
    fn test_builders_prepend_operations() {
        // Rotate first, then translate: (1, 0) -> (0, 1) -> (10, 1).
        let t = AffineTransform::IDENTITY
            .translated_by(10.0, 0.0)
            .rotated_by(FRAC_PI_2);
        assert_point(t.apply(1.0, 0.0), (10.0, 1.0));
    }

    #[test]
    fn test_half_turn_about_canvas() {
        let t = AffineTransform::IDENTITY.translated_by(4.0, 2.0).rotated_by(PI);
        assert_point(t.apply(0.0, 0.0), (4.0, 2.0));
        assert_point(t.apply(4.0, 2.0), (0.0, 0.0));
    }

    #[test]
    fn test_scale_flips_axis() {
        let t = AffineTransform::IDENTITY
            .translated_by(4.0, 0.0)
            .scaled_by(-1.0, 1.0);
        assert_point(t.apply(1.0, 3.0), (3.0, 3.0));
    }

    #[test]
    fn test_then_matches_sequential_application() {
        let first = AffineTransform::IDENTITY.translated_by(2.0, 3.0).rotated_by(0.3);
        let second = AffineTransform::IDENTITY.scaled_by(2.0, -1.0).translated_by(1.0, 1.0);
        let combined = first.then(second);
        let (x, y) = first.apply(1.5, -0.5);
        assert_point(combined.apply(1.5, -0.5), second.apply(x, y));
    }

    #[test]
    fn test_inverse_round_trips() {
        let t = AffineTransform::IDENTITY
            .translated_by(3.0, 1.0)
            .rotated_by(-FRAC_PI_2)
            .scaled_by(-1.0, 1.0);
        let inv = t.inverted().unwrap();
        let (x, y) = t.apply(2.25, 0.75);
        assert_point(inv.apply(x, y), (2.25, 0.75));
        assert_relative_eq!(t.then(inv).a, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_degenerate_transform_has_no_inverse() {
        let t = AffineTransform::IDENTITY.scaled_by(0.0, 1.0);
        assert!(t.inverted().is_none());
    }
}
