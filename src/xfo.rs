//! Compound transform: translation + orientation + per-axis scale.
//!
//! Unlike a raw matrix, the three parts stay independently inspectable and
//! interpolable, which is what rig and animation code wants to poke at.

use std::fmt;
use std::fmt::Formatter;
use std::ops::{Mul, MulAssign};

use serde::{Deserialize, Serialize};

use crate::axes::{Axis, CartesianPlane};
use crate::error::GMathError;
use crate::matrix4::Matrix4;
use crate::quaternion::Quaternion;
use crate::scalar;
use crate::vector3::Vector3;

/// Guards accumulated round-off: unit-norm inputs stay unit through
/// composition, this only trims the drift. A degenerate orientation is a
/// broken caller contract and passes through untouched.
fn renormalized(q: Quaternion) -> Quaternion {
    match q.normalized() {
        Ok(unit) => unit,
        Err(_) => q,
    }
}

/// A rigid-plus-scale transform applying scale, then orientation, then
/// translation: `v' = ori.rotate(v * sc) + tr`.
///
/// `ori` is expected to stay unit norm (every constructor here guarantees
/// it; raw field writes are the caller's contract). `sc` components are
/// independent per axis and may be negative for a mirrored transform; a zero
/// component makes the transform non-invertible.
#[derive(Debug, Copy, Clone, Serialize, Deserialize)]
pub struct Xfo {
    pub tr: Vector3,
    pub ori: Quaternion,
    pub sc: Vector3,
}

impl Default for Xfo {
    fn default() -> Self {
        Xfo::identity()
    }
}

impl Xfo {
    #[must_use]
    pub fn identity() -> Xfo {
        Xfo {
            tr: Vector3::zero(),
            ori: Quaternion::identity(),
            sc: Vector3::one(),
        }
    }

    #[must_use]
    pub fn new(tr: Vector3, ori: Quaternion, sc: Vector3) -> Xfo {
        Xfo { tr, ori, sc }
    }

    /// A pure translation.
    #[must_use]
    pub fn from_translation(tr: Vector3) -> Xfo {
        Xfo {
            tr,
            ..Xfo::identity()
        }
    }

    /// A pure rotation.
    #[must_use]
    pub fn from_orientation(ori: Quaternion) -> Xfo {
        Xfo {
            ori,
            ..Xfo::identity()
        }
    }

    /// Decomposes a homogeneous matrix into an Xfo. Fails when a basis row
    /// is degenerate; negative scale is absorbed into the rotation (see
    /// [`Matrix4::decompose`]).
    pub fn from_matrix4(m: &Matrix4) -> Result<Xfo, GMathError> {
        let (tr, ori, sc) = m.decompose()?;
        Ok(Xfo { tr, ori, sc })
    }

    /// Recomposes the equivalent homogeneous matrix.
    #[must_use]
    pub fn to_matrix4(&self) -> Matrix4 {
        Matrix4::from_parts(self.tr, &self.ori, self.sc)
    }

    /// Applies the transform to a point.
    #[must_use]
    pub fn transform_vector(&self, vec: Vector3) -> Vector3 {
        self.ori.rotate_vector(vec * self.sc) + self.tr
    }

    /// Applies the inverse transform to a point; fails like
    /// [`inverse`](Xfo::inverse).
    pub fn inverse_transform_vector(&self, vec: Vector3) -> Result<Vector3, GMathError> {
        Ok(self.inverse()?.transform_vector(vec))
    }

    /// The inverse transform. Fails when any scale component's magnitude is
    /// below [`scalar::SMALLEST`] (degenerate, non-invertible).
    ///
    /// With non-uniform scale the true inverse of scale-then-rotate picks up
    /// shear that an Xfo cannot represent; the returned value is the exact
    /// inverse for uniform scale and the standard component-wise
    /// approximation otherwise.
    pub fn inverse(&self) -> Result<Xfo, GMathError> {
        if self.sc.x.abs() < scalar::SMALLEST
            || self.sc.y.abs() < scalar::SMALLEST
            || self.sc.z.abs() < scalar::SMALLEST
        {
            return Err(GMathError::new(
                "Xfo: cannot invert a transform with a near-zero scale component",
            ));
        }
        let ori = self.ori.inverse()?;
        let sc = self.sc.reciprocal();
        let tr = ori.rotate_vector(-self.tr * sc);
        Ok(Xfo { tr, ori, sc })
    }

    /// In-place form of [`inverse`](Xfo::inverse).
    pub fn inverse_mut(&mut self) -> Result<&mut Xfo, GMathError> {
        *self = self.inverse()?;
        Ok(self)
    }

    /// Interpolates towards `other`: orientation by shortest-path slerp,
    /// translation and scale linearly.
    #[must_use]
    pub fn slerp(&self, other: &Xfo, t: f64) -> Xfo {
        Xfo {
            tr: self.tr.lerp(other.tr, t),
            ori: self.ori.slerp(other.ori, t),
            sc: self.sc.lerp(other.sc, t),
        }
    }

    /// Translation distance to another transform.
    #[must_use]
    pub fn distance_to(&self, other: &Xfo) -> f64 {
        self.tr.distance(other.tr)
    }

    /// Mirrors about the plane through `center` with the given normal:
    /// translation is reflected relative to `center`, orientation is
    /// mirrored with the axis hints (see [`Quaternion::mirror`]), and scale
    /// is untouched: mirroring changes position and orientation, not
    /// magnitude.
    pub fn mirror(
        &self,
        center: Vector3,
        normal: Vector3,
        primary: Axis,
        secondary: Axis,
    ) -> Result<Xfo, GMathError> {
        Ok(Xfo {
            tr: (self.tr - center).mirror(normal)? + center,
            ori: self.ori.mirror(normal, primary, secondary)?,
            sc: self.sc,
        })
    }

    /// In-place form of [`mirror`](Xfo::mirror).
    pub fn mirror_mut(
        &mut self,
        center: Vector3,
        normal: Vector3,
        primary: Axis,
        secondary: Axis,
    ) -> Result<&mut Xfo, GMathError> {
        *self = self.mirror(center, normal, primary, secondary)?;
        Ok(self)
    }

    /// Mirrors about an origin-centred canonical plane, with the axis hints
    /// the plane implies.
    pub fn mirror_plane(&self, plane: CartesianPlane) -> Result<Xfo, GMathError> {
        Ok(Xfo {
            tr: self.tr.mirror_plane(plane),
            ori: self.ori.mirror_plane(plane)?,
            sc: self.sc,
        })
    }

    /// In-place form of [`mirror_plane`](Xfo::mirror_plane).
    pub fn mirror_plane_mut(&mut self, plane: CartesianPlane) -> Result<&mut Xfo, GMathError> {
        *self = self.mirror_plane(plane)?;
        Ok(self)
    }

    /// Part-wise comparison within [`scalar::EPSILON`].
    #[must_use]
    pub fn almost_eq(&self, other: &Xfo) -> bool {
        self.tr.almost_eq(other.tr) && self.ori.almost_eq(other.ori) && self.sc.almost_eq(other.sc)
    }
}

impl PartialEq for Xfo {
    fn eq(&self, other: &Xfo) -> bool {
        self.almost_eq(other)
    }
}

/// Composition: `a * b` applies `b` first, then `a`: `b`'s translation is
/// scaled and rotated by `a` before `a`'s own offset, matching
/// `a.to_matrix4() * b.to_matrix4()`.
impl Mul<Xfo> for Xfo {
    type Output = Xfo;

    fn mul(self, rhs: Xfo) -> Xfo {
        Xfo {
            tr: self.tr + self.ori.rotate_vector(rhs.tr * self.sc),
            ori: renormalized(self.ori * rhs.ori),
            sc: self.sc * rhs.sc,
        }
    }
}

impl MulAssign<Xfo> for Xfo {
    fn mul_assign(&mut self, rhs: Xfo) {
        *self = *self * rhs;
    }
}

impl fmt::Display for Xfo {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if let Some(p) = f.precision() {
            write!(
                f,
                "xfo(tr: {:.3$}, ori: {:.3$}, sc: {:.3$})",
                self.tr, self.ori, self.sc, p
            )
        } else {
            write!(f, "xfo(tr: {}, ori: {}, sc: {})", self.tr, self.ori, self.sc)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scalar::{EPSILON, HALFPI};

    fn sample_xfo() -> Xfo {
        Xfo::new(
            Vector3::new(1.0, -2.0, 0.5),
            Quaternion::from_axis_angle(Vector3::new(0.3, 1.0, 0.1), 0.8).unwrap(),
            Vector3::new(2.0, 2.0, 2.0),
        )
    }

    // ==================== Identity and construction ====================

    #[test]
    fn xfo_identity_composition_and_inverse() {
        let id = Xfo::identity();
        assert_eq!(id * id, id);
        assert_eq!(id.inverse().unwrap(), id);
        assert_eq!(id, Xfo::default());
        assert_eq!(id.transform_vector(Vector3::new(1.0, 2.0, 3.0)), Vector3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn xfo_from_parts_constructors() {
        let t = Xfo::from_translation(Vector3::new(1.0, 2.0, 3.0));
        assert_eq!(t.ori, Quaternion::identity());
        assert_eq!(t.sc, Vector3::one());
        let r = Xfo::from_orientation(Quaternion::from_axis_angle(Vector3::z_axis(), 1.0).unwrap());
        assert_eq!(r.tr, Vector3::zero());
    }

    // ==================== Transforming points ====================

    #[test]
    fn xfo_transform_scales_rotates_translates() {
        let x = Xfo::new(
            Vector3::new(10.0, 0.0, 0.0),
            Quaternion::from_axis_angle(Vector3::x_axis(), HALFPI).unwrap(),
            Vector3::new(1.0, 3.0, 1.0),
        );
        // (0,1,0) scaled to (0,3,0), rotated to (0,0,3), then offset.
        assert_eq!(x.transform_vector(Vector3::y_axis()), Vector3::new(10.0, 0.0, 3.0));
    }

    #[test]
    fn xfo_transform_matches_matrix_transform() {
        let x = sample_xfo();
        let m = x.to_matrix4();
        for v in [
            Vector3::zero(),
            Vector3::new(1.0, 2.0, 3.0),
            Vector3::new(-0.4, 0.0, 7.5),
        ] {
            assert_eq!(x.transform_vector(v), v * m);
        }
    }

    #[test]
    fn xfo_inverse_transform_round_trip() {
        let x = sample_xfo();
        let v = Vector3::new(0.7, -1.1, 2.0);
        let there = x.transform_vector(v);
        assert_eq!(x.inverse_transform_vector(there).unwrap(), v);
        assert_eq!(x.inverse().unwrap().inverse().unwrap(), x);
    }

    #[test]
    fn xfo_inverse_degenerate_scale_fails() {
        let x = Xfo::new(
            Vector3::zero(),
            Quaternion::identity(),
            Vector3::new(1.0, 0.0, 1.0),
        );
        assert!(x.inverse().is_err());
        assert!(x.inverse_transform_vector(Vector3::one()).is_err());
    }

    // ==================== Composition ====================

    #[test]
    fn xfo_composition_applies_rhs_first() {
        let translate = Xfo::from_translation(Vector3::new(5.0, 0.0, 0.0));
        let rotate = Xfo::from_orientation(
            Quaternion::from_axis_angle(Vector3::z_axis(), HALFPI).unwrap(),
        );
        // Translate then rotate: (1,0,0) -> (6,0,0) -> (0,6,0).
        assert_eq!(
            (rotate * translate).transform_vector(Vector3::x_axis()),
            Vector3::new(0.0, 6.0, 0.0)
        );
        // Rotate then translate: (1,0,0) -> (0,1,0) -> (5,1,0).
        assert_eq!(
            (translate * rotate).transform_vector(Vector3::x_axis()),
            Vector3::new(5.0, 1.0, 0.0)
        );
    }

    #[test]
    fn xfo_composition_matches_matrix_product() {
        let a = sample_xfo();
        let b = Xfo::new(
            Vector3::new(-1.0, 4.0, 2.0),
            Quaternion::from_axis_angle(Vector3::new(1.0, 0.0, -0.5), -1.2).unwrap(),
            Vector3::new(0.5, 0.5, 0.5),
        );
        let composed = (a * b).to_matrix4();
        let product = a.to_matrix4() * b.to_matrix4();
        assert_eq!(composed, product);
    }

    #[test]
    fn xfo_composition_is_associative() {
        let a = sample_xfo();
        let b = Xfo::new(
            Vector3::new(0.3, 0.1, -2.0),
            Quaternion::from_axis_angle(Vector3::y_axis(), 0.4).unwrap(),
            Vector3::new(1.5, 1.5, 1.5),
        );
        let c = Xfo::from_translation(Vector3::new(-4.0, 0.2, 0.0));
        assert_eq!((a * b) * c, a * (b * c));
    }

    #[test]
    fn xfo_inverse_composes_to_identity() {
        let x = sample_xfo();
        assert_eq!(x.inverse().unwrap() * x, Xfo::identity());
    }

    // ==================== Matrix round trip ====================

    #[test]
    fn xfo_matrix4_round_trip() {
        let x = sample_xfo();
        let back = Xfo::from_matrix4(&x.to_matrix4()).unwrap();
        assert_eq!(back.tr, x.tr);
        assert_eq!(back.sc, x.sc);
        assert!(back.ori.same_rotation(x.ori));
    }

    // ==================== Interpolation ====================

    #[test]
    fn xfo_slerp_endpoints_and_midpoint() {
        let a = Xfo::identity();
        let b = Xfo::new(
            Vector3::new(2.0, 0.0, 0.0),
            Quaternion::from_axis_angle(Vector3::z_axis(), HALFPI).unwrap(),
            Vector3::new(3.0, 3.0, 3.0),
        );
        assert_eq!(a.slerp(&b, 0.0), a);
        assert_eq!(a.slerp(&b, 1.0), b);
        let mid = a.slerp(&b, 0.5);
        assert_eq!(mid.tr, Vector3::new(1.0, 0.0, 0.0));
        assert_eq!(mid.sc, Vector3::new(2.0, 2.0, 2.0));
        assert!(mid.ori.same_rotation(
            Quaternion::from_axis_angle(Vector3::z_axis(), HALFPI / 2.0).unwrap()
        ));
    }

    #[test]
    fn xfo_distance() {
        let a = Xfo::from_translation(Vector3::zero());
        let b = Xfo::from_translation(Vector3::new(3.0, 4.0, 0.0));
        assert!(scalar::almost_equal(a.distance_to(&b), 5.0, EPSILON));
    }

    // ==================== Mirroring ====================

    #[test]
    fn xfo_mirror_plane_reflects_translation_keeps_scale() {
        let x = sample_xfo();
        let mirrored = x.mirror_plane(CartesianPlane::YZ).unwrap();
        assert_eq!(mirrored.tr, Vector3::new(-1.0, -2.0, 0.5));
        assert_eq!(mirrored.sc, x.sc);
        assert!(scalar::almost_equal(
            mirrored.ori.to_matrix3().determinant(),
            1.0,
            EPSILON
        ));
    }

    #[test]
    fn xfo_mirror_about_center_fixes_points_on_the_plane() {
        let center = Vector3::new(2.0, 0.0, 0.0);
        let normal = Vector3::x_axis();
        let on_plane = Xfo::from_translation(Vector3::new(2.0, 5.0, -1.0));
        let mirrored = on_plane.mirror(center, normal, Axis::PosY, Axis::PosZ).unwrap();
        assert_eq!(mirrored.tr, on_plane.tr);
        // A point one unit in front lands one unit behind.
        let in_front = Xfo::from_translation(Vector3::new(3.0, 0.0, 0.0));
        let mirrored = in_front.mirror(center, normal, Axis::PosY, Axis::PosZ).unwrap();
        assert_eq!(mirrored.tr, Vector3::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn xfo_mirror_twice_restores() {
        let x = sample_xfo();
        let center = Vector3::new(0.5, 1.0, 0.0);
        let normal = Vector3::new(1.0, 0.3, -0.2);
        let twice = x
            .mirror(center, normal, Axis::PosY, Axis::PosZ)
            .unwrap()
            .mirror(center, normal, Axis::PosY, Axis::PosZ)
            .unwrap();
        assert_eq!(twice.tr, x.tr);
        assert_eq!(twice.sc, x.sc);
        assert!(twice.ori.same_rotation(x.ori));
    }

    #[test]
    fn xfo_mirror_mut_chains() {
        let mut x = sample_xfo();
        let original = x;
        x.mirror_plane_mut(CartesianPlane::XY)
            .unwrap()
            .mirror_plane_mut(CartesianPlane::XY)
            .unwrap();
        assert_eq!(x.tr, original.tr);
        assert!(x.ori.same_rotation(original.ori));
    }

    #[test]
    fn xfo_display() {
        let x = Xfo::identity();
        assert_eq!(
            format!("{:.1}", x),
            "xfo(tr: vec3(0.0, 0.0, 0.0), ori: quat(0.0, 0.0, 0.0, 1.0), sc: vec3(1.0, 1.0, 1.0))"
        );
    }
}
