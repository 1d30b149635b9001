//! 2-D affine transforms with drawing-context concatenation semantics.
//!
//! A transform maps a point as
//! ```text
//! x' = a * x + c * y + tx
//! y' = b * x + d * y + ty
//! ```
//!
//! `translated`, `rotated` and `scaled` prepend the new operation, so the
//! operation added last is the first one applied to a point. Building
//! `identity.translated(w, 0).rotated(90°)` therefore rotates first and then
//! translates, which is how transforms are stacked on a drawing context.

/// Values this close to an integer are snapped to it.
const SNAP_EPSILON: f64 = 1e-12;

/// A 2x3 affine matrix.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AffineTransform {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub tx: f64,
    pub ty: f64,
}

impl Default for AffineTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
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

    /// A pure translation.
    pub fn translation(tx: f64, ty: f64) -> Self {
        Self {
            tx,
            ty,
            ..Self::IDENTITY
        }
    }

    /// A counter-clockwise rotation by `radians` (in a y-up space).
    ///
    /// Quarter turns produce exact 0/±1 coefficients.
    pub fn rotation(radians: f64) -> Self {
        let (sin, cos) = radians.sin_cos();
        let (sin, cos) = (snap(sin), snap(cos));
        Self {
            a: cos,
            b: sin,
            c: -sin,
            d: cos,
            tx: 0.0,
            ty: 0.0,
        }
    }

    /// A scale about the origin.
    pub fn scale(sx: f64, sy: f64) -> Self {
        Self {
            a: sx,
            d: sy,
            ..Self::IDENTITY
        }
    }

    /// The transform that applies `self` first and then `other`.
    pub fn concat(self, other: AffineTransform) -> Self {
        Self {
            a: self.a * other.a + self.b * other.c,
            b: self.a * other.b + self.b * other.d,
            c: self.c * other.a + self.d * other.c,
            d: self.c * other.b + self.d * other.d,
            tx: self.tx * other.a + self.ty * other.c + other.tx,
            ty: self.tx * other.b + self.ty * other.d + other.ty,
        }
    }

    /// Prepend a translation.
    pub fn translated(self, tx: f64, ty: f64) -> Self {
        Self::translation(tx, ty).concat(self)
    }

    /// Prepend a rotation.
    pub fn rotated(self, radians: f64) -> Self {
        Self::rotation(radians).concat(self)
    }

    /// Prepend a scale.
    pub fn scaled(self, sx: f64, sy: f64) -> Self {
        Self::scale(sx, sy).concat(self)
    }

    /// Map a point through the transform.
    #[inline]
    pub fn apply(&self, x: f64, y: f64) -> (f64, f64) {
        (
            self.a * x + self.c * y + self.tx,
            self.b * x + self.d * y + self.ty,
        )
    }

    pub fn determinant(&self) -> f64 {
        self.a * self.d - self.b * self.c
    }

    /// The inverse transform, or `None` if the matrix is singular.
    pub fn inverted(&self) -> Option<Self> {
        let det = self.determinant();
        if det.abs() < f64::EPSILON {
            return None;
        }
        Some(Self {
            a: self.d / det,
            b: -self.b / det,
            c: -self.c / det,
            d: self.a / det,
            tx: (self.c * self.ty - self.d * self.tx) / det,
            ty: (self.b * self.tx - self.a * self.ty) / det,
        })
    }

    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }
}

#[inline]
fn snap(v: f64) -> f64 {
    let rounded = v.round();
    if (v - rounded).abs() < SNAP_EPSILON {
        // Avoid -0.0 so quarter-turn matrices compare equal
        rounded + 0.0
    } else {
        v
    }
}
