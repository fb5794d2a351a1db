//! Three-dimensional vector: points, directions, normals, per-axis scales.

use std::fmt;
use std::fmt::Formatter;
use std::iter::Sum;
use std::ops::{
    Add, AddAssign, Div, DivAssign, Index, IndexMut, Mul, MulAssign, Neg, Sub, SubAssign,
};

use num_traits::Zero;
use serde::{Deserialize, Serialize};

use crate::axes::{Axis, CartesianPlane};
use crate::error::{check_slice_len, GMathError};
use crate::scalar;

/// A 3D vector with `f64` components.
///
/// Finiteness of the components is a caller contract: `NaN`/`Inf` inputs are
/// never checked for and propagate through arithmetic as IEEE dictates.
///
/// # Equality
/// `==` compares component-wise within [`scalar::EPSILON`] (see
/// [`almost_eq`](Vector3::almost_eq)), absorbing round-off from trigonometric
/// and matrix arithmetic.
#[derive(Debug, Copy, Clone, Default, Serialize, Deserialize)]
pub struct Vector3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vector3 {
    #[must_use]
    pub fn new(x: f64, y: f64, z: f64) -> Vector3 {
        Vector3 { x, y, z }
    }

    /// Returns the zero vector.
    #[must_use]
    pub fn zero() -> Vector3 {
        Vector3 {
            x: 0.0,
            y: 0.0,
            z: 0.0,
        }
    }

    /// Returns a vector with all components set to 1.0.
    #[must_use]
    pub fn one() -> Vector3 {
        Vector3 {
            x: 1.0,
            y: 1.0,
            z: 1.0,
        }
    }

    /// Creates a vector with all components set to the given value.
    #[must_use]
    pub fn splat(v: f64) -> Vector3 {
        Vector3 { x: v, y: v, z: v }
    }

    /// Returns the unit vector along the positive x-axis.
    #[must_use]
    pub fn x_axis() -> Vector3 {
        Vector3 {
            x: 1.0,
            y: 0.0,
            z: 0.0,
        }
    }

    /// Returns the unit vector along the positive y-axis.
    #[must_use]
    pub fn y_axis() -> Vector3 {
        Vector3 {
            x: 0.0,
            y: 1.0,
            z: 0.0,
        }
    }

    /// Returns the unit vector along the positive z-axis.
    #[must_use]
    pub fn z_axis() -> Vector3 {
        Vector3 {
            x: 0.0,
            y: 0.0,
            z: 1.0,
        }
    }

    /// The unit direction vector for a signed [`Axis`].
    #[must_use]
    pub fn from_axis(axis: Axis) -> Vector3 {
        match axis {
            Axis::PosX => Vector3::new(1.0, 0.0, 0.0),
            Axis::PosY => Vector3::new(0.0, 1.0, 0.0),
            Axis::PosZ => Vector3::new(0.0, 0.0, 1.0),
            Axis::NegX => Vector3::new(-1.0, 0.0, 0.0),
            Axis::NegY => Vector3::new(0.0, -1.0, 0.0),
            Axis::NegZ => Vector3::new(0.0, 0.0, -1.0),
        }
    }

    /// Builds a vector from a flat `(x, y, z)` slice.
    ///
    /// Fails if the slice is not exactly 3 elements long; wrong-length input
    /// is never truncated or padded.
    pub fn from_slice(values: &[f64]) -> Result<Vector3, GMathError> {
        check_slice_len("Vector3", 3, values.len())?;
        Ok(Vector3::new(values[0], values[1], values[2]))
    }

    /// The flat `(x, y, z)` interchange form.
    #[must_use]
    pub fn to_array(&self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }

    /// Sets all three components at once.
    pub fn set(&mut self, x: f64, y: f64, z: f64) -> &mut Vector3 {
        self.x = x;
        self.y = y;
        self.z = z;
        self
    }

    /// Dot product.
    #[must_use]
    pub fn dot(&self, other: Vector3) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    /// Cross product, right-handed.
    #[must_use]
    pub fn cross(&self, other: Vector3) -> Vector3 {
        Vector3 {
            x: self.y * other.z - self.z * other.y,
            y: self.z * other.x - self.x * other.z,
            z: self.x * other.y - self.y * other.x,
        }
    }

    /// Cross product followed by normalisation.
    ///
    /// Fails when the inputs are parallel (or either is degenerate), since
    /// the cross product is then too short to normalise.
    pub fn cross_normalized(&self, other: Vector3) -> Result<Vector3, GMathError> {
        self.cross(other).normalized()
    }

    /// Squared length; cheaper than [`length`](Vector3::length) when only
    /// comparing magnitudes.
    #[must_use]
    pub fn squared_length(&self) -> f64 {
        self.dot(*self)
    }

    /// Euclidean length.
    #[must_use]
    pub fn length(&self) -> f64 {
        self.squared_length().sqrt()
    }

    /// Distance to another point.
    #[must_use]
    pub fn distance(&self, other: Vector3) -> f64 {
        (*self - other).length()
    }

    #[must_use]
    pub fn squared_distance(&self, other: Vector3) -> f64 {
        (*self - other).squared_length()
    }

    /// Returns the unit vector in the same direction.
    ///
    /// Fails when the length is below [`scalar::SMALLEST`]: there is no
    /// direction to preserve, and silently inventing one would corrupt
    /// downstream basis construction.
    pub fn normalized(&self) -> Result<Vector3, GMathError> {
        let len = self.length();
        if len < scalar::SMALLEST {
            return Err(GMathError::new(
                "Vector3: cannot normalise a vector of near-zero length",
            ));
        }
        Ok(*self / len)
    }

    /// In-place form of [`normalized`](Vector3::normalized).
    pub fn normalize_mut(&mut self) -> Result<&mut Vector3, GMathError> {
        *self = self.normalized()?;
        Ok(self)
    }

    /// Component-wise reciprocal. Zero components produce IEEE infinities;
    /// callers needing a guard check against [`scalar::SMALLEST`] first.
    #[must_use]
    pub fn reciprocal(&self) -> Vector3 {
        Vector3 {
            x: 1.0 / self.x,
            y: 1.0 / self.y,
            z: 1.0 / self.z,
        }
    }

    /// Angle in radians between this vector and `other`.
    ///
    /// Both vectors are expected to be unit length; the dot product is
    /// clamped so accumulated round-off cannot produce `NaN`.
    #[must_use]
    pub fn angle(&self, other: Vector3) -> f64 {
        scalar::acos(self.dot(other))
    }

    /// Reflection off a surface with unit normal `normal`: the component
    /// along the normal is kept, the tangential component reversed.
    #[must_use]
    pub fn reflect(&self, normal: Vector3) -> Vector3 {
        normal * (2.0 * self.dot(normal)) - *self
    }

    /// Reflects this vector across the plane whose normal is `normal`
    /// (`v' = v - 2 (v · n̂) n̂`).
    ///
    /// The normal is normalised internally, so a degenerate normal fails.
    pub fn mirror(&self, normal: Vector3) -> Result<Vector3, GMathError> {
        let n = normal.normalized()?;
        Ok(*self - n * (2.0 * self.dot(n)))
    }

    /// In-place form of [`mirror`](Vector3::mirror).
    pub fn mirror_mut(&mut self, normal: Vector3) -> Result<&mut Vector3, GMathError> {
        *self = self.mirror(normal)?;
        Ok(self)
    }

    /// Reflects across one of the canonical planes. Equivalent to
    /// [`mirror`](Vector3::mirror) with the plane's unit normal: exactly one
    /// component flips sign, so this form cannot fail. The sign the plane
    /// ordering gives the normal does not affect the reflection.
    #[must_use]
    pub fn mirror_plane(&self, plane: CartesianPlane) -> Vector3 {
        let mut v = *self;
        match plane.normal_axis().index() {
            0 => v.x = -v.x,
            1 => v.y = -v.y,
            _ => v.z = -v.z,
        }
        v
    }

    /// In-place form of [`mirror_plane`](Vector3::mirror_plane).
    pub fn mirror_plane_mut(&mut self, plane: CartesianPlane) -> &mut Vector3 {
        *self = self.mirror_plane(plane);
        self
    }

    /// Linear interpolation towards `to`; `t` outside `[0, 1]` extrapolates.
    #[must_use]
    pub fn lerp(&self, to: Vector3, t: f64) -> Vector3 {
        *self + (to - *self) * t
    }

    /// Component-wise comparison within [`scalar::EPSILON`].
    #[must_use]
    pub fn almost_eq(&self, other: Vector3) -> bool {
        scalar::almost_equal(self.x, other.x, scalar::EPSILON)
            && scalar::almost_equal(self.y, other.y, scalar::EPSILON)
            && scalar::almost_equal(self.z, other.z, scalar::EPSILON)
    }
}

impl PartialEq for Vector3 {
    fn eq(&self, other: &Vector3) -> bool {
        self.almost_eq(*other)
    }
}

impl Zero for Vector3 {
    fn zero() -> Self {
        Vector3::zero()
    }

    fn is_zero(&self) -> bool {
        self.almost_eq(Vector3::zero())
    }
}

impl From<[f64; 3]> for Vector3 {
    fn from(value: [f64; 3]) -> Self {
        Vector3::new(value[0], value[1], value[2])
    }
}

impl From<Vector3> for [f64; 3] {
    fn from(value: Vector3) -> Self {
        value.to_array()
    }
}

impl From<Axis> for Vector3 {
    fn from(axis: Axis) -> Self {
        Vector3::from_axis(axis)
    }
}

impl fmt::Display for Vector3 {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "vec3(")?;
        if let Some(p) = f.precision() {
            write!(f, "{0:.3$}, {1:.3$}, {2:.3$}", self.x, self.y, self.z, p)?;
        } else {
            write!(f, "{}, {}, {}", self.x, self.y, self.z)?;
        }
        write!(f, ")")
    }
}

impl Index<usize> for Vector3 {
    type Output = f64;

    fn index(&self, index: usize) -> &f64 {
        match index {
            0 => &self.x,
            1 => &self.y,
            2 => &self.z,
            _ => panic!("Vector3: index {index} out of range"),
        }
    }
}

impl IndexMut<usize> for Vector3 {
    fn index_mut(&mut self, index: usize) -> &mut f64 {
        match index {
            0 => &mut self.x,
            1 => &mut self.y,
            2 => &mut self.z,
            _ => panic!("Vector3: index {index} out of range"),
        }
    }
}

impl Add<Vector3> for Vector3 {
    type Output = Vector3;

    fn add(self, rhs: Vector3) -> Vector3 {
        Vector3 {
            x: self.x + rhs.x,
            y: self.y + rhs.y,
            z: self.z + rhs.z,
        }
    }
}

impl AddAssign<Vector3> for Vector3 {
    fn add_assign(&mut self, rhs: Vector3) {
        *self = *self + rhs;
    }
}

impl Sub<Vector3> for Vector3 {
    type Output = Vector3;

    fn sub(self, rhs: Vector3) -> Vector3 {
        Vector3 {
            x: self.x - rhs.x,
            y: self.y - rhs.y,
            z: self.z - rhs.z,
        }
    }
}

impl SubAssign<Vector3> for Vector3 {
    fn sub_assign(&mut self, rhs: Vector3) {
        *self = *self - rhs;
    }
}

impl Mul<f64> for Vector3 {
    type Output = Vector3;

    fn mul(self, rhs: f64) -> Vector3 {
        Vector3 {
            x: self.x * rhs,
            y: self.y * rhs,
            z: self.z * rhs,
        }
    }
}

impl Mul<Vector3> for f64 {
    type Output = Vector3;

    fn mul(self, rhs: Vector3) -> Vector3 {
        rhs * self
    }
}

/// Component-wise product; also used to apply a per-axis scale.
impl Mul<Vector3> for Vector3 {
    type Output = Vector3;

    fn mul(self, rhs: Vector3) -> Vector3 {
        Vector3 {
            x: self.x * rhs.x,
            y: self.y * rhs.y,
            z: self.z * rhs.z,
        }
    }
}

impl MulAssign<f64> for Vector3 {
    fn mul_assign(&mut self, rhs: f64) {
        *self = *self * rhs;
    }
}

impl MulAssign<Vector3> for Vector3 {
    fn mul_assign(&mut self, rhs: Vector3) {
        *self = *self * rhs;
    }
}

impl Div<f64> for Vector3 {
    type Output = Vector3;

    fn div(self, rhs: f64) -> Vector3 {
        Vector3 {
            x: self.x / rhs,
            y: self.y / rhs,
            z: self.z / rhs,
        }
    }
}

impl Div<Vector3> for Vector3 {
    type Output = Vector3;

    fn div(self, rhs: Vector3) -> Vector3 {
        Vector3 {
            x: self.x / rhs.x,
            y: self.y / rhs.y,
            z: self.z / rhs.z,
        }
    }
}

impl DivAssign<f64> for Vector3 {
    fn div_assign(&mut self, rhs: f64) {
        *self = *self / rhs;
    }
}

impl DivAssign<Vector3> for Vector3 {
    fn div_assign(&mut self, rhs: Vector3) {
        *self = *self / rhs;
    }
}

impl Neg for Vector3 {
    type Output = Vector3;

    fn neg(self) -> Vector3 {
        Vector3 {
            x: -self.x,
            y: -self.y,
            z: -self.z,
        }
    }
}

impl Neg for &Vector3 {
    type Output = Vector3;

    fn neg(self) -> Vector3 {
        -*self
    }
}

impl Sum<Vector3> for Vector3 {
    fn sum<I: Iterator<Item = Vector3>>(iter: I) -> Vector3 {
        iter.fold(Vector3::zero(), |acc, v| acc + v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== Construction ====================

    #[test]
    fn vector3_from_slice() {
        let v = Vector3::from_slice(&[1.0, 2.0, 3.0]).unwrap();
        assert_eq!(v, Vector3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn vector3_from_slice_wrong_length_fails() {
        assert!(Vector3::from_slice(&[1.0, 2.0]).is_err());
        assert!(Vector3::from_slice(&[1.0, 2.0, 3.0, 4.0]).is_err());
        assert!(Vector3::from_slice(&[]).is_err());
    }

    #[test]
    fn vector3_array_round_trip() {
        let v: Vector3 = [4.0, 5.0, 6.0].into();
        let arr: [f64; 3] = v.into();
        assert_eq!(arr, [4.0, 5.0, 6.0]);
    }

    #[test]
    fn vector3_from_axis() {
        assert_eq!(Vector3::from_axis(Axis::PosY), Vector3::y_axis());
        assert_eq!(Vector3::from_axis(Axis::NegX), -Vector3::x_axis());
        assert_eq!(Vector3::from(Axis::NegZ), Vector3::new(0.0, 0.0, -1.0));
    }

    // ==================== Arithmetic ====================

    #[test]
    fn vector3_add_sub_neg() {
        let a = Vector3::new(1.0, 2.0, 3.0);
        let b = Vector3::new(4.0, 5.0, 6.0);
        assert_eq!(a + b, Vector3::new(5.0, 7.0, 9.0));
        assert_eq!(b - a, Vector3::new(3.0, 3.0, 3.0));
        assert_eq!(-a, Vector3::new(-1.0, -2.0, -3.0));
        let mut c = a;
        c += b;
        c -= a;
        assert_eq!(c, b);
    }

    #[test]
    fn vector3_scalar_and_component_wise() {
        let a = Vector3::new(1.0, 2.0, 3.0);
        assert_eq!(a * 2.0, Vector3::new(2.0, 4.0, 6.0));
        assert_eq!(2.0 * a, Vector3::new(2.0, 4.0, 6.0));
        assert_eq!(a * Vector3::new(2.0, 3.0, 4.0), Vector3::new(2.0, 6.0, 12.0));
        assert_eq!(a / 2.0, Vector3::new(0.5, 1.0, 1.5));
        assert_eq!(a / Vector3::new(1.0, 2.0, 3.0), Vector3::one());
    }

    #[test]
    fn vector3_dot_and_cross() {
        let x = Vector3::x_axis();
        let y = Vector3::y_axis();
        assert_eq!(x.dot(y), 0.0);
        assert_eq!(x.cross(y), Vector3::z_axis());
        assert_eq!(y.cross(x), -Vector3::z_axis());
        let v = Vector3::new(3.0, 0.0, 0.0);
        assert_eq!(v.cross_normalized(Vector3::new(0.0, 2.0, 0.0)).unwrap(), Vector3::z_axis());
        assert!(v.cross_normalized(v * 5.0).is_err());
    }

    #[test]
    fn vector3_length_and_distance() {
        let v = Vector3::new(3.0, 4.0, 0.0);
        assert_eq!(v.length(), 5.0);
        assert_eq!(v.squared_length(), 25.0);
        assert_eq!(v.distance(Vector3::zero()), 5.0);
        assert_eq!(v.squared_distance(Vector3::new(3.0, 0.0, 0.0)), 16.0);
    }

    #[test]
    fn vector3_normalized() {
        let v = Vector3::new(0.0, 10.0, 0.0);
        assert_eq!(v.normalized().unwrap(), Vector3::y_axis());
        let mut w = v;
        w.normalize_mut().unwrap();
        assert_eq!(w, Vector3::y_axis());
        assert!(Vector3::zero().normalized().is_err());
    }

    #[test]
    fn vector3_lerp() {
        let a = Vector3::zero();
        let b = Vector3::new(10.0, 20.0, 30.0);
        assert_eq!(a.lerp(b, 0.5), Vector3::new(5.0, 10.0, 15.0));
        assert_eq!(a.lerp(b, 0.0), a);
        assert_eq!(a.lerp(b, 1.0), b);
    }

    #[test]
    fn vector3_angle_and_reflect() {
        let x = Vector3::x_axis();
        let y = Vector3::y_axis();
        assert!(scalar::almost_equal(x.angle(y), scalar::HALFPI, scalar::EPSILON));
        assert!(scalar::almost_equal(x.angle(x), 0.0, scalar::EPSILON));
        // Reflecting the x-axis off a 45-degree surface normal sends it to y.
        let n = Vector3::new(1.0, 1.0, 0.0).normalized().unwrap();
        assert_eq!(x.reflect(n), y);
    }

    // ==================== Mirroring ====================

    #[test]
    fn vector3_mirror_across_yz_plane_flips_x() {
        let v = Vector3::new(1.0, 0.0, 0.0);
        assert_eq!(v.mirror_plane(CartesianPlane::YZ), Vector3::new(-1.0, 0.0, 0.0));
    }

    #[test]
    fn vector3_mirror_plane_matches_normal_form() {
        let v = Vector3::new(1.5, -2.0, 3.25);
        for (plane, axis) in [
            (CartesianPlane::XY, Axis::PosZ),
            (CartesianPlane::YZ, Axis::PosX),
            (CartesianPlane::ZX, Axis::PosY),
            (CartesianPlane::YX, Axis::NegZ),
            (CartesianPlane::ZY, Axis::NegX),
            (CartesianPlane::XZ, Axis::NegY),
        ] {
            let by_plane = v.mirror_plane(plane);
            let by_normal = v.mirror(Vector3::from_axis(axis)).unwrap();
            assert_eq!(by_plane, by_normal);
        }
    }

    #[test]
    fn vector3_mirror_twice_is_identity() {
        let v = Vector3::new(1.0, -2.0, 3.0);
        let n = Vector3::new(0.3, -0.5, 0.9);
        let twice = v.mirror(n).unwrap().mirror(n).unwrap();
        assert_eq!(twice, v);
    }

    #[test]
    fn vector3_mirror_degenerate_normal_fails() {
        assert!(Vector3::one().mirror(Vector3::zero()).is_err());
    }

    #[test]
    fn vector3_mirror_mut_chains() {
        let mut v = Vector3::new(2.0, 3.0, 4.0);
        v.mirror_plane_mut(CartesianPlane::YZ).mirror_plane_mut(CartesianPlane::YZ);
        assert_eq!(v, Vector3::new(2.0, 3.0, 4.0));
    }

    // ==================== Misc ====================

    #[test]
    fn vector3_equality_absorbs_round_off() {
        let a = Vector3::new(1.0, 2.0, 3.0);
        let b = Vector3::new(1.0 + 1e-12, 2.0, 3.0 - 1e-12);
        assert_eq!(a, b);
        assert!(a.almost_eq(b));
        assert_ne!(a, Vector3::new(1.001, 2.0, 3.0));
    }

    #[test]
    fn vector3_indexing() {
        let mut v = Vector3::new(1.0, 2.0, 3.0);
        assert_eq!(v[0], 1.0);
        assert_eq!(v[2], 3.0);
        v[1] = 9.0;
        assert_eq!(v.y, 9.0);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn vector3_index_out_of_range_panics() {
        let _ = Vector3::zero()[3];
    }

    #[test]
    fn vector3_sum_and_display() {
        let total: Vector3 = [Vector3::x_axis(), Vector3::y_axis()].into_iter().sum();
        assert_eq!(total, Vector3::new(1.0, 1.0, 0.0));
        assert_eq!(format!("{}", Vector3::new(1.5, 2.5, -3.0)), "vec3(1.5, 2.5, -3)");
        assert_eq!(format!("{:.2}", Vector3::new(1.234, 5.678, 9.0)), "vec3(1.23, 5.68, 9.00)");
    }
}
