//! Unit-quaternion orientation representation.
//!
//! Construction from axis-angle, matrices and Euler triples normalises, so a
//! quaternion built through those paths is a valid orientation. Raw component
//! construction does not: unit norm is then the caller's contract.

use std::fmt;
use std::fmt::Formatter;
use std::ops::{Add, AddAssign, Div, DivAssign, Index, IndexMut, Mul, MulAssign, Neg, Sub, SubAssign};

use num_traits::One;
use serde::{Deserialize, Serialize};

use crate::axes::{Axis, CartesianPlane, RotationOrder};
use crate::error::{check_slice_len, GMathError};
use crate::euler::Euler;
use crate::matrix3::Matrix3;
use crate::matrix4::Matrix4;
use crate::scalar;
use crate::vector3::Vector3;

/// Don Hatch's sin(x)/x, accurate for very small x (returns 1 at x == 0).
fn sinx_over_x(x: f64) -> f64 {
    if x * x < scalar::EPSILON {
        1.0
    } else {
        x.sin() / x
    }
}

/// A rotation stored as `(x, y, z, w)` with `w` the scalar part.
///
/// `a * b` is the Hamilton product: the rotation that applies `b` first and
/// then `a`, matching the matrix composition order used across the crate.
/// Every 3D rotation is covered by two unit quaternions (`q` and `-q`);
/// [`match_hemisphere`](Quaternion::match_hemisphere) picks the representative
/// nearest a reference before interpolation or distance measurement.
///
/// Equality is component-wise within [`scalar::EPSILON`]; note that under
/// this definition `q` and `-q` compare unequal even though they encode the
/// same rotation.
#[derive(Debug, Copy, Clone, Serialize, Deserialize)]
pub struct Quaternion {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub w: f64,
}

impl Default for Quaternion {
    fn default() -> Self {
        Quaternion::identity()
    }
}

impl Quaternion {
    /// The identity rotation.
    #[must_use]
    pub fn identity() -> Quaternion {
        Quaternion {
            x: 0.0,
            y: 0.0,
            z: 0.0,
            w: 1.0,
        }
    }

    /// Raw component construction. Unit norm is not enforced here; use the
    /// axis-angle/matrix/Euler constructors when an orientation is required.
    #[must_use]
    pub fn new(x: f64, y: f64, z: f64, w: f64) -> Quaternion {
        Quaternion { x, y, z, w }
    }

    /// Builds a quaternion from a flat `(x, y, z, w)` slice; fails unless the
    /// slice is exactly 4 elements long.
    pub fn from_slice(values: &[f64]) -> Result<Quaternion, GMathError> {
        check_slice_len("Quaternion", 4, values.len())?;
        Ok(Quaternion::new(values[0], values[1], values[2], values[3]))
    }

    /// The flat `(x, y, z, w)` interchange form.
    #[must_use]
    pub fn to_array(&self) -> [f64; 4] {
        [self.x, self.y, self.z, self.w]
    }

    pub fn set(&mut self, x: f64, y: f64, z: f64, w: f64) -> &mut Quaternion {
        self.x = x;
        self.y = y;
        self.z = z;
        self.w = w;
        self
    }

    /// The rotation of `angle` radians about `axis`.
    ///
    /// The axis is normalised internally, so a degenerate axis fails.
    pub fn from_axis_angle(axis: Vector3, angle: f64) -> Result<Quaternion, GMathError> {
        Ok(Quaternion::from_unit_axis_angle(axis.normalized()?, angle))
    }

    /// The rotation of `angle` radians about an axis that is already unit
    /// length (`q = cos(A/2) + sin(A/2) * (x i + y j + z k)`).
    #[must_use]
    pub fn from_unit_axis_angle(axis: Vector3, angle: f64) -> Quaternion {
        let half = angle * 0.5;
        let s = half.sin();
        Quaternion {
            x: axis.x * s,
            y: axis.y * s,
            z: axis.z * s,
            w: half.cos(),
        }
    }

    /// Extracts the rotation from a rotation matrix.
    ///
    /// Shoemake's branch-on-largest-diagonal-element technique: numerically
    /// stable even when the trace is near its minimum. The matrix is expected
    /// to be a proper rotation; scale or shear is not removed here (see
    /// [`Matrix4::to_quaternion`] for the scale-aware path).
    #[must_use]
    pub fn from_matrix3(m: &Matrix3) -> Quaternion {
        let a = m.to_array_2d();
        let trace = a[0][0] + a[1][1] + a[2][2];

        if trace > 0.0 {
            // |w| > 1/2; derive the vector part from the skew-symmetric terms.
            let mut root = (trace + 1.0).sqrt(); // 2w
            let w = 0.5 * root;
            root = 0.5 / root; // 1/(4w)
            Quaternion {
                x: (a[1][2] - a[2][1]) * root,
                y: (a[2][0] - a[0][2]) * root,
                z: (a[0][1] - a[1][0]) * root,
                w,
            }
        } else {
            const NEXT: [usize; 3] = [1, 2, 0];
            let mut i = 0;
            if a[1][1] > a[0][0] {
                i = 1;
            }
            if a[2][2] > a[i][i] {
                i = 2;
            }
            let j = NEXT[i];
            let k = NEXT[j];

            let mut root = (a[i][i] - a[j][j] - a[k][k] + 1.0).sqrt();
            let mut q = [0.0; 3];
            q[i] = 0.5 * root;
            root = 0.5 / root;
            let w = (a[j][k] - a[k][j]) * root;
            q[j] = (a[i][j] + a[j][i]) * root;
            q[k] = (a[i][k] + a[k][i]) * root;
            Quaternion {
                x: q[0],
                y: q[1],
                z: q[2],
                w,
            }
        }
    }

    /// Extracts the rotation from a homogeneous transform, removing any
    /// per-axis scale first. Fails when a basis row is degenerate.
    pub fn from_matrix4(m: &Matrix4) -> Result<Quaternion, GMathError> {
        m.to_quaternion()
    }

    /// The rotation described by an Euler triple (honouring its rotation
    /// order and angular unit).
    #[must_use]
    pub fn from_euler(e: &Euler) -> Quaternion {
        e.to_quaternion()
    }

    /// Hamilton-product composition of `angle_x`, `angle_y`, `angle_z`
    /// (radians) in the given order.
    #[must_use]
    pub fn from_euler_angles(
        angle_x: f64,
        angle_y: f64,
        angle_z: f64,
        order: RotationOrder,
    ) -> Quaternion {
        Euler::new(angle_x, angle_y, angle_z, order, crate::axes::Unit::Radians).to_quaternion()
    }

    #[must_use]
    pub fn dot(&self, other: Quaternion) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z + self.w * other.w
    }

    #[must_use]
    pub fn squared_length(&self) -> f64 {
        self.dot(*self)
    }

    #[must_use]
    pub fn length(&self) -> f64 {
        self.squared_length().sqrt()
    }

    /// Returns the unit quaternion with the same axis and angle; fails below
    /// [`scalar::SMALLEST`], consistent with vector normalisation.
    pub fn normalized(&self) -> Result<Quaternion, GMathError> {
        let len = self.length();
        if len < scalar::SMALLEST {
            return Err(GMathError::new(
                "Quaternion: cannot normalise a quaternion of near-zero length",
            ));
        }
        Ok(*self / len)
    }

    /// In-place form of [`normalized`](Quaternion::normalized).
    pub fn normalize_mut(&mut self) -> Result<&mut Quaternion, GMathError> {
        *self = self.normalized()?;
        Ok(self)
    }

    /// The conjugate `(-x, -y, -z, w)`; for a unit quaternion this is also
    /// the inverse.
    #[must_use]
    pub fn conjugate(&self) -> Quaternion {
        Quaternion {
            x: -self.x,
            y: -self.y,
            z: -self.z,
            w: self.w,
        }
    }

    /// In-place form of [`conjugate`](Quaternion::conjugate).
    pub fn conjugate_mut(&mut self) -> &mut Quaternion {
        *self = self.conjugate();
        self
    }

    /// The multiplicative inverse (conjugate over squared norm). Fails when
    /// the squared norm is below [`scalar::SMALLEST`].
    pub fn inverse(&self) -> Result<Quaternion, GMathError> {
        let norm = self.squared_length();
        if norm < scalar::SMALLEST {
            return Err(GMathError::new(
                "Quaternion: cannot invert a quaternion of near-zero norm",
            ));
        }
        Ok(self.conjugate() / norm)
    }

    /// In-place form of [`inverse`](Quaternion::inverse).
    pub fn inverse_mut(&mut self) -> Result<&mut Quaternion, GMathError> {
        *self = self.inverse()?;
        Ok(self)
    }

    /// Exponential map: for a pure quaternion `A * (x i + y j + z k)` with
    /// `(x, y, z)` unit length, returns `cos(A) + sin(A) * (x i + y j + z k)`.
    /// Near zero the limit form is used to stay accurate.
    #[must_use]
    pub fn exp(&self) -> Quaternion {
        let angle = (self.x * self.x + self.y * self.y + self.z * self.z).sqrt();
        let sn = angle.sin();
        let coeff = if sn.abs() >= scalar::EPSILON {
            sn / angle
        } else {
            1.0
        };
        Quaternion {
            x: coeff * self.x,
            y: coeff * self.y,
            z: coeff * self.z,
            w: angle.cos(),
        }
    }

    /// Logarithm map, inverse of [`exp`](Quaternion::exp): for a unit
    /// quaternion `cos(A) + sin(A) * n`, returns the pure quaternion `A * n`.
    #[must_use]
    pub fn log(&self) -> Quaternion {
        if self.w.abs() < 1.0 {
            let angle = scalar::acos(self.w);
            let sn = angle.sin();
            if sn.abs() >= scalar::EPSILON {
                let coeff = angle / sn;
                return Quaternion {
                    x: coeff * self.x,
                    y: coeff * self.y,
                    z: coeff * self.z,
                    w: 0.0,
                };
            }
        }
        Quaternion {
            x: self.x,
            y: self.y,
            z: self.z,
            w: 0.0,
        }
    }

    /// Applies the rotation to a vector (active rotation, `q v q*`).
    #[must_use]
    pub fn rotate_vector(&self, vec: Vector3) -> Vector3 {
        let t = Vector3::new(
            self.z * vec.y - self.y * vec.z,
            self.x * vec.z - self.z * vec.x,
            self.y * vec.x - self.x * vec.y,
        );
        let r = Vector3::new(
            self.z * t.y - self.y * t.z,
            self.x * t.z - self.z * t.x,
            self.y * t.x - self.x * t.y,
        );
        vec - (t * self.w - r) * 2.0
    }

    /// The image of the positive x-axis under this rotation.
    #[must_use]
    pub fn axis_x(&self) -> Vector3 {
        self.rotate_vector(Vector3::x_axis())
    }

    /// The image of the positive y-axis under this rotation.
    #[must_use]
    pub fn axis_y(&self) -> Vector3 {
        self.rotate_vector(Vector3::y_axis())
    }

    /// The image of the positive z-axis under this rotation.
    #[must_use]
    pub fn axis_z(&self) -> Vector3 {
        self.rotate_vector(Vector3::z_axis())
    }

    /// The image of a signed coordinate axis under this rotation.
    #[must_use]
    pub fn axis(&self, axis: Axis) -> Vector3 {
        self.rotate_vector(Vector3::from_axis(axis))
    }

    /// Recovers the unit axis and angle. A near-identity rotation has no
    /// well-defined axis; the positive x-axis and zero angle are returned.
    #[must_use]
    pub fn to_axis_angle(&self) -> (Vector3, f64) {
        let sq = self.x * self.x + self.y * self.y + self.z * self.z;
        if sq > scalar::EPSILON {
            let inv = 1.0 / sq.sqrt();
            (
                Vector3::new(self.x * inv, self.y * inv, self.z * inv),
                2.0 * scalar::acos(self.w),
            )
        } else {
            (Vector3::x_axis(), 0.0)
        }
    }

    /// The equivalent rotation matrix (orthonormal rows, determinant +1 for a
    /// unit quaternion).
    #[must_use]
    pub fn to_matrix3(&self) -> Matrix3 {
        let xx = 2.0 * self.x * self.x;
        let yy = 2.0 * self.y * self.y;
        let zz = 2.0 * self.z * self.z;
        let xy = 2.0 * self.x * self.y;
        let zw = 2.0 * self.z * self.w;
        let xz = 2.0 * self.x * self.z;
        let yw = 2.0 * self.y * self.w;
        let yz = 2.0 * self.y * self.z;
        let xw = 2.0 * self.x * self.w;
        Matrix3::new(
            1.0 - yy - zz,
            xy + zw,
            xz - yw,
            xy - zw,
            1.0 - xx - zz,
            yz + xw,
            xz + yw,
            yz - xw,
            1.0 - xx - yy,
        )
    }

    /// The equivalent homogeneous transform (no translation).
    #[must_use]
    pub fn to_matrix4(&self) -> Matrix4 {
        Matrix4::from_matrix3(&self.to_matrix3())
    }

    /// Extracts the Euler triple for the given rotation order, in radians.
    /// Near gimbal lock the decomposition is underdetermined and canonically
    /// resolved (see [`Euler::from_matrix3`]); this is lossy, not an error.
    #[must_use]
    pub fn to_euler(&self, order: RotationOrder) -> Euler {
        Euler::from_matrix3(&self.to_matrix3(), order)
    }

    /// Flips this quaternion onto the same hypersphere hemisphere as
    /// `reference` by negating all components when `self · reference < 0`.
    ///
    /// Both signs encode the same rotation under the double cover, but
    /// interpolation and difference metrics need agreeing hemispheres to take
    /// the short way around. Idempotent once applied.
    #[must_use]
    pub fn match_hemisphere(&self, reference: Quaternion) -> Quaternion {
        if self.dot(reference) < 0.0 {
            -*self
        } else {
            *self
        }
    }

    /// In-place form of [`match_hemisphere`](Quaternion::match_hemisphere).
    pub fn match_hemisphere_mut(&mut self, reference: Quaternion) -> &mut Quaternion {
        *self = self.match_hemisphere(reference);
        self
    }

    /// Spherical linear interpolation towards `other`, always along the
    /// shortest path. Assumes both quaternions are unit length.
    ///
    /// Uses the Imath `sin(x)/x` formulation, which stays accurate for
    /// nearly-identical inputs.
    #[must_use]
    pub fn slerp(&self, other: Quaternion, t: f64) -> Quaternion {
        let q2 = other.match_hemisphere(*self);

        let length_d = (*self - q2).length();
        let length_s = (*self + q2).length();
        let a = 2.0 * length_d.atan2(length_s);
        let s = 1.0 - t;

        *self * (sinx_over_x(s * a) / sinx_over_x(a) * s)
            + q2 * (sinx_over_x(t * a) / sinx_over_x(a) * t)
    }

    /// Reflects this orientation across the plane with the given normal.
    ///
    /// Naively negating matrix terms would produce an improper rotation
    /// (determinant -1). Instead the rotation's basis vectors are reflected
    /// and a proper right-handed frame is rebuilt from the `primary` and
    /// `secondary` axis hints: those two axes keep their (sign-adjusted)
    /// reflected directions while the remaining axis is recomputed by cross
    /// product. The result is always a unit quaternion whose matrix has
    /// determinant +1, "the same rotation seen in a mirrored frame".
    ///
    /// The default hints for rig-style use are `Axis::PosY` (up) and
    /// `Axis::PosZ` (forward).
    pub fn mirror(
        &self,
        normal: Vector3,
        primary: Axis,
        secondary: Axis,
    ) -> Result<Quaternion, GMathError> {
        let mirrored = self.to_matrix3().mirror(normal, primary, secondary)?;
        Quaternion::from_matrix3(&mirrored).normalized()
    }

    /// In-place form of [`mirror`](Quaternion::mirror).
    pub fn mirror_mut(
        &mut self,
        normal: Vector3,
        primary: Axis,
        secondary: Axis,
    ) -> Result<&mut Quaternion, GMathError> {
        *self = self.mirror(normal, primary, secondary)?;
        Ok(self)
    }

    /// Reflects across a canonical plane, with the axis hints the plane
    /// implies (the two axes spanning it, in its order).
    pub fn mirror_plane(&self, plane: CartesianPlane) -> Result<Quaternion, GMathError> {
        let (primary, secondary) = plane.mirror_hints();
        self.mirror(
            Vector3::from_axis(plane.normal_axis()),
            primary,
            secondary,
        )
    }

    /// In-place form of [`mirror_plane`](Quaternion::mirror_plane).
    pub fn mirror_plane_mut(&mut self, plane: CartesianPlane) -> Result<&mut Quaternion, GMathError> {
        *self = self.mirror_plane(plane)?;
        Ok(self)
    }

    /// Component-wise comparison within [`scalar::EPSILON`]. `q` and `-q`
    /// compare unequal; use [`match_hemisphere`](Quaternion::match_hemisphere)
    /// first to compare rotations rather than representatives.
    #[must_use]
    pub fn almost_eq(&self, other: Quaternion) -> bool {
        scalar::almost_equal(self.x, other.x, scalar::EPSILON)
            && scalar::almost_equal(self.y, other.y, scalar::EPSILON)
            && scalar::almost_equal(self.z, other.z, scalar::EPSILON)
            && scalar::almost_equal(self.w, other.w, scalar::EPSILON)
    }

    /// Whether `other` encodes the same rotation, i.e. equals `self` or its
    /// double-cover twin `-self`.
    #[must_use]
    pub fn same_rotation(&self, other: Quaternion) -> bool {
        self.almost_eq(other) || self.almost_eq(-other)
    }
}

impl PartialEq for Quaternion {
    fn eq(&self, other: &Quaternion) -> bool {
        self.almost_eq(*other)
    }
}

impl One for Quaternion {
    fn one() -> Self {
        Quaternion::identity()
    }
}

impl From<[f64; 4]> for Quaternion {
    fn from(value: [f64; 4]) -> Self {
        Quaternion::new(value[0], value[1], value[2], value[3])
    }
}

impl From<Quaternion> for [f64; 4] {
    fn from(value: Quaternion) -> Self {
        value.to_array()
    }
}

impl fmt::Display for Quaternion {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "quat(")?;
        if let Some(p) = f.precision() {
            write!(
                f,
                "{0:.4$}, {1:.4$}, {2:.4$}, {3:.4$}",
                self.x, self.y, self.z, self.w, p
            )?;
        } else {
            write!(f, "{}, {}, {}, {}", self.x, self.y, self.z, self.w)?;
        }
        write!(f, ")")
    }
}

impl Index<usize> for Quaternion {
    type Output = f64;

    fn index(&self, index: usize) -> &f64 {
        match index {
            0 => &self.x,
            1 => &self.y,
            2 => &self.z,
            3 => &self.w,
            _ => panic!("Quaternion: index {index} out of range"),
        }
    }
}

impl IndexMut<usize> for Quaternion {
    fn index_mut(&mut self, index: usize) -> &mut f64 {
        match index {
            0 => &mut self.x,
            1 => &mut self.y,
            2 => &mut self.z,
            3 => &mut self.w,
            _ => panic!("Quaternion: index {index} out of range"),
        }
    }
}

/// Hamilton product: `a * b` applies `b` first, then `a`.
impl Mul<Quaternion> for Quaternion {
    type Output = Quaternion;

    fn mul(self, rhs: Quaternion) -> Quaternion {
        Quaternion {
            x: self.w * rhs.x + self.x * rhs.w + self.y * rhs.z - self.z * rhs.y,
            y: self.w * rhs.y + self.y * rhs.w + self.z * rhs.x - self.x * rhs.z,
            z: self.w * rhs.z + self.z * rhs.w + self.x * rhs.y - self.y * rhs.x,
            w: self.w * rhs.w - self.x * rhs.x - self.y * rhs.y - self.z * rhs.z,
        }
    }
}

impl MulAssign<Quaternion> for Quaternion {
    fn mul_assign(&mut self, rhs: Quaternion) {
        *self = *self * rhs;
    }
}

impl Add<Quaternion> for Quaternion {
    type Output = Quaternion;

    fn add(self, rhs: Quaternion) -> Quaternion {
        Quaternion {
            x: self.x + rhs.x,
            y: self.y + rhs.y,
            z: self.z + rhs.z,
            w: self.w + rhs.w,
        }
    }
}

impl AddAssign<Quaternion> for Quaternion {
    fn add_assign(&mut self, rhs: Quaternion) {
        *self = *self + rhs;
    }
}

impl Sub<Quaternion> for Quaternion {
    type Output = Quaternion;

    fn sub(self, rhs: Quaternion) -> Quaternion {
        Quaternion {
            x: self.x - rhs.x,
            y: self.y - rhs.y,
            z: self.z - rhs.z,
            w: self.w - rhs.w,
        }
    }
}

impl SubAssign<Quaternion> for Quaternion {
    fn sub_assign(&mut self, rhs: Quaternion) {
        *self = *self - rhs;
    }
}

impl Mul<f64> for Quaternion {
    type Output = Quaternion;

    fn mul(self, rhs: f64) -> Quaternion {
        Quaternion {
            x: self.x * rhs,
            y: self.y * rhs,
            z: self.z * rhs,
            w: self.w * rhs,
        }
    }
}

impl Mul<Quaternion> for f64 {
    type Output = Quaternion;

    fn mul(self, rhs: Quaternion) -> Quaternion {
        rhs * self
    }
}

impl MulAssign<f64> for Quaternion {
    fn mul_assign(&mut self, rhs: f64) {
        *self = *self * rhs;
    }
}

impl Div<f64> for Quaternion {
    type Output = Quaternion;

    fn div(self, rhs: f64) -> Quaternion {
        Quaternion {
            x: self.x / rhs,
            y: self.y / rhs,
            z: self.z / rhs,
            w: self.w / rhs,
        }
    }
}

impl DivAssign<f64> for Quaternion {
    fn div_assign(&mut self, rhs: f64) {
        *self = *self / rhs;
    }
}

impl Neg for Quaternion {
    type Output = Quaternion;

    fn neg(self) -> Quaternion {
        Quaternion {
            x: -self.x,
            y: -self.y,
            z: -self.z,
            w: -self.w,
        }
    }
}
