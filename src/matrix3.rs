//! 3x3 row-major matrix: rotation bases, and the axis-hinted frame
//! reconstruction shared by mirroring and aim constraints.

use std::ops::{Add, Div, Index, Mul, MulAssign, Sub};

use num_traits::One;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::axes::{Axis, CartesianPlane, RotationOrder};
use crate::error::{check_slice_len, GMathError};
use crate::euler::Euler;
use crate::quaternion::Quaternion;
use crate::scalar;
use crate::vector3::Vector3;

/// Levi-Civita sign of the index triple `(p, s, 3 - p - s)`.
fn permutation_sign(p: usize, s: usize) -> f64 {
    if (s + 3 - p) % 3 == 1 {
        1.0
    } else {
        -1.0
    }
}

/// The canonical axis least aligned with `v`, used as a stand-in secondary
/// direction when the supplied one is unusable.
fn least_aligned_axis(v: Vector3) -> Vector3 {
    let ax = v.x.abs();
    let ay = v.y.abs();
    let az = v.z.abs();
    if ax <= ay && ax <= az {
        Vector3::x_axis()
    } else if ay <= az {
        Vector3::y_axis()
    } else {
        Vector3::z_axis()
    }
}

/// A 3x3 matrix stored row-major (`xx, xy, xz` is the x basis row).
///
/// Interpreted as a rotation it acts on row vectors, `v' = v * m`, and its
/// rows are the images of the coordinate axes. Orthonormality/determinant +1
/// is guaranteed when built from a [`Quaternion`] or an [`Euler`] triple, not
/// when built from raw scalars or arbitrary basis rows.
///
/// `a * b` composes so that `b` is applied first:
/// `v * (a * b) == (v * b) * a`, matching quaternion multiplication.
#[derive(Debug, Copy, Clone, Serialize, Deserialize)]
#[must_use]
pub struct Matrix3 {
    pub xx: f64,
    pub xy: f64,
    pub xz: f64,
    pub yx: f64,
    pub yy: f64,
    pub yz: f64,
    pub zx: f64,
    pub zy: f64,
    pub zz: f64,
}

impl Default for Matrix3 {
    fn default() -> Self {
        Matrix3::identity()
    }
}

impl Matrix3 {
    #[must_use]
    pub fn identity() -> Matrix3 {
        Matrix3::new(1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0)
    }

    #[allow(clippy::too_many_arguments)]
    #[must_use]
    pub fn new(
        xx: f64,
        xy: f64,
        xz: f64,
        yx: f64,
        yy: f64,
        yz: f64,
        zx: f64,
        zy: f64,
        zz: f64,
    ) -> Matrix3 {
        Matrix3 {
            xx,
            xy,
            xz,
            yx,
            yy,
            yz,
            zx,
            zy,
            zz,
        }
    }

    /// Builds a matrix from three basis row vectors.
    #[must_use]
    pub fn from_rows(x: Vector3, y: Vector3, z: Vector3) -> Matrix3 {
        Matrix3::new(x.x, x.y, x.z, y.x, y.y, y.z, z.x, z.y, z.z)
    }

    /// Builds a matrix from a flat row-major slice of 9 values; fails on any
    /// other length.
    pub fn from_slice(values: &[f64]) -> Result<Matrix3, GMathError> {
        check_slice_len("Matrix3", 9, values.len())?;
        Ok(Matrix3::new(
            values[0], values[1], values[2], values[3], values[4], values[5], values[6],
            values[7], values[8],
        ))
    }

    /// The flat row-major interchange form.
    #[must_use]
    pub fn to_array(&self) -> [f64; 9] {
        [
            self.xx, self.xy, self.xz, self.yx, self.yy, self.yz, self.zx, self.zy, self.zz,
        ]
    }

    /// Row-major nested form, convenient for index-driven algorithms.
    #[must_use]
    pub fn to_array_2d(&self) -> [[f64; 3]; 3] {
        [
            [self.xx, self.xy, self.xz],
            [self.yx, self.yy, self.yz],
            [self.zx, self.zy, self.zz],
        ]
    }

    /// Elementary rotation of `angle` radians about the x-axis.
    #[must_use]
    pub fn from_rotation_x(angle: f64) -> Matrix3 {
        let (s, c) = angle.sin_cos();
        Matrix3::new(1.0, 0.0, 0.0, 0.0, c, s, 0.0, -s, c)
    }

    /// Elementary rotation of `angle` radians about the y-axis.
    #[must_use]
    pub fn from_rotation_y(angle: f64) -> Matrix3 {
        let (s, c) = angle.sin_cos();
        Matrix3::new(c, 0.0, -s, 0.0, 1.0, 0.0, s, 0.0, c)
    }

    /// Elementary rotation of `angle` radians about the z-axis.
    #[must_use]
    pub fn from_rotation_z(angle: f64) -> Matrix3 {
        let (s, c) = angle.sin_cos();
        Matrix3::new(c, s, 0.0, -s, c, 0.0, 0.0, 0.0, 1.0)
    }

    /// The rotation of `angle` radians about an arbitrary axis (normalised
    /// internally, so a degenerate axis fails).
    pub fn from_axis_angle(axis: Vector3, angle: f64) -> Result<Matrix3, GMathError> {
        Ok(Quaternion::from_axis_angle(axis, angle)?.to_matrix3())
    }

    /// The rotation matrix of a quaternion.
    #[must_use]
    pub fn from_quaternion(q: &Quaternion) -> Matrix3 {
        q.to_matrix3()
    }

    /// The rotation matrix of an Euler triple.
    #[must_use]
    pub fn from_euler(e: &Euler) -> Matrix3 {
        e.to_matrix3()
    }

    /// The shortest-arc rotation taking direction `from` to direction `to`.
    ///
    /// Opposite directions have no unique shortest arc; a half turn about an
    /// arbitrary perpendicular axis is chosen.
    pub fn from_vector_to_vector(from: Vector3, to: Vector3) -> Result<Matrix3, GMathError> {
        let f = from.normalized()?;
        let t = to.normalized()?;
        let d = f.dot(t);
        if d >= 1.0 - scalar::EPSILON {
            return Ok(Matrix3::identity());
        }
        if d <= -1.0 + scalar::EPSILON {
            let axis = f.cross(least_aligned_axis(f)).normalized()?;
            return Ok(Quaternion::from_unit_axis_angle(axis, scalar::PI).to_matrix3());
        }
        let axis = f.cross(t).normalized()?;
        Ok(Quaternion::from_unit_axis_angle(axis, scalar::acos(d)).to_matrix3())
    }

    /// Builds the orthonormal right-handed frame whose `primary` axis points
    /// along `primary_dir` and whose `secondary` axis lies as close to
    /// `secondary_dir` as orthogonality allows; the remaining axis is
    /// recomputed by cross product so the determinant is always +1.
    ///
    /// Degenerate hints are resolved by policy, not failure: a secondary
    /// naming the primary's axis falls back to the next axis, and a
    /// secondary direction parallel to the primary falls back to the least
    /// aligned canonical axis. Only a degenerate `primary_dir` fails.
    pub fn from_aim(
        primary_dir: Vector3,
        secondary_dir: Vector3,
        primary: Axis,
        secondary: Axis,
    ) -> Result<Matrix3, GMathError> {
        let p_idx = primary.index();
        let secondary = if secondary.index() == p_idx {
            let fallback = match p_idx {
                0 => Axis::PosY,
                1 => Axis::PosZ,
                _ => Axis::PosX,
            };
            warn!(
                "secondary axis hint {secondary:?} duplicates primary {primary:?}; using {fallback:?}"
            );
            fallback
        } else {
            secondary
        };
        let s_idx = secondary.index();
        let t_idx = 3 - p_idx - s_idx;
        let eps = permutation_sign(p_idx, s_idx);

        let row_p = primary_dir.normalized()? * primary.sign();
        let mut s_raw = secondary_dir * secondary.sign();
        let mut cross_t = row_p.cross(s_raw) * eps;
        if cross_t.squared_length() < scalar::EPSILON {
            s_raw = least_aligned_axis(row_p);
            warn!("secondary direction is parallel to primary; using a canonical fallback");
            cross_t = row_p.cross(s_raw) * eps;
        }
        let row_t = cross_t.normalized()?;
        let row_s = row_t.cross(row_p) * eps;

        let mut rows = [Vector3::zero(); 3];
        rows[p_idx] = row_p;
        rows[s_idx] = row_s;
        rows[t_idx] = row_t;
        Ok(Matrix3::from_rows(rows[0], rows[1], rows[2]))
    }

    /// Aim constraint: the frame looking along `target_dir` with
    /// `up_dir` steadying the secondary axis.
    pub fn look_at(
        target_dir: Vector3,
        up_dir: Vector3,
        primary: Axis,
        secondary: Axis,
    ) -> Result<Matrix3, GMathError> {
        Matrix3::from_aim(target_dir, up_dir, primary, secondary)
    }

    /// The basis row for the x-axis.
    #[must_use]
    pub fn axis_x(&self) -> Vector3 {
        Vector3::new(self.xx, self.xy, self.xz)
    }

    /// The basis row for the y-axis.
    #[must_use]
    pub fn axis_y(&self) -> Vector3 {
        Vector3::new(self.yx, self.yy, self.yz)
    }

    /// The basis row for the z-axis.
    #[must_use]
    pub fn axis_z(&self) -> Vector3 {
        Vector3::new(self.zx, self.zy, self.zz)
    }

    /// Row accessor: 0, 1, 2 are the x, y, z basis rows.
    #[must_use]
    pub fn row(&self, index: usize) -> Vector3 {
        match index {
            0 => self.axis_x(),
            1 => self.axis_y(),
            2 => self.axis_z(),
            _ => panic!("Matrix3: row {index} out of range"),
        }
    }

    pub fn set_row(&mut self, index: usize, row: Vector3) -> &mut Matrix3 {
        match index {
            0 => {
                self.xx = row.x;
                self.xy = row.y;
                self.xz = row.z;
            }
            1 => {
                self.yx = row.x;
                self.yy = row.y;
                self.yz = row.z;
            }
            2 => {
                self.zx = row.x;
                self.zy = row.y;
                self.zz = row.z;
            }
            _ => panic!("Matrix3: row {index} out of range"),
        }
        self
    }

    #[must_use]
    pub fn transposed(&self) -> Matrix3 {
        Matrix3::new(
            self.xx, self.yx, self.zx, self.xy, self.yy, self.zy, self.xz, self.yz, self.zz,
        )
    }

    /// In-place form of [`transposed`](Matrix3::transposed).
    pub fn transpose_mut(&mut self) -> &mut Matrix3 {
        *self = self.transposed();
        self
    }

    #[must_use]
    pub fn determinant(&self) -> f64 {
        self.xx * (self.yy * self.zz - self.yz * self.zy)
            - self.xy * (self.yx * self.zz - self.yz * self.zx)
            + self.xz * (self.yx * self.zy - self.yy * self.zx)
    }

    /// The inverse matrix; fails when `|determinant|` is below
    /// [`scalar::SMALLEST`].
    pub fn inverse(&self) -> Result<Matrix3, GMathError> {
        let det = self.determinant();
        if det.abs() < scalar::SMALLEST {
            return Err(GMathError::new(
                "Matrix3: cannot invert a matrix with near-zero determinant",
            ));
        }
        let inv_det = 1.0 / det;
        Ok(Matrix3::new(
            (self.yy * self.zz - self.yz * self.zy) * inv_det,
            (self.xz * self.zy - self.xy * self.zz) * inv_det,
            (self.xy * self.yz - self.xz * self.yy) * inv_det,
            (self.yz * self.zx - self.yx * self.zz) * inv_det,
            (self.xx * self.zz - self.xz * self.zx) * inv_det,
            (self.xz * self.yx - self.xx * self.yz) * inv_det,
            (self.yx * self.zy - self.yy * self.zx) * inv_det,
            (self.xy * self.zx - self.xx * self.zy) * inv_det,
            (self.xx * self.yy - self.xy * self.yx) * inv_det,
        ))
    }

    /// In-place form of [`inverse`](Matrix3::inverse).
    pub fn inverse_mut(&mut self) -> Result<&mut Matrix3, GMathError> {
        *self = self.inverse()?;
        Ok(self)
    }

    /// Gram-Schmidt orthonormalisation of the rows, x row first. Fails when a
    /// row collapses to near-zero during the process (rank-deficient basis).
    pub fn orthogonalized(&self) -> Result<Matrix3, GMathError> {
        let x = self.axis_x().normalized()?;
        let y = self.axis_y();
        let y = (y - x * x.dot(y)).normalized()?;
        let z = self.axis_z();
        let z = (z - x * x.dot(z) - y * y.dot(z)).normalized()?;
        Ok(Matrix3::from_rows(x, y, z))
    }

    /// In-place form of [`orthogonalized`](Matrix3::orthogonalized).
    pub fn orthogonalize_mut(&mut self) -> Result<&mut Matrix3, GMathError> {
        *self = self.orthogonalized()?;
        Ok(self)
    }

    /// Per-axis scale carried by the basis rows (their lengths). Sign is not
    /// recoverable: a mirrored basis reports positive scale.
    #[must_use]
    pub fn get_scale(&self) -> Vector3 {
        Vector3::new(
            self.axis_x().length(),
            self.axis_y().length(),
            self.axis_z().length(),
        )
    }

    /// Rescales the basis rows to the given per-axis lengths, keeping their
    /// directions. Fails when a row is degenerate.
    pub fn set_scale(&mut self, scale: Vector3) -> Result<&mut Matrix3, GMathError> {
        let x = self.axis_x().normalized()? * scale.x;
        let y = self.axis_y().normalized()? * scale.y;
        let z = self.axis_z().normalized()? * scale.z;
        *self = Matrix3::from_rows(x, y, z);
        Ok(self)
    }

    /// Extracts the rotation as a quaternion. The matrix is expected to be a
    /// proper rotation.
    #[must_use]
    pub fn to_quaternion(&self) -> Quaternion {
        Quaternion::from_matrix3(self)
    }

    /// Extracts the Euler triple for the given order, in radians.
    #[must_use]
    pub fn to_euler(&self, order: RotationOrder) -> Euler {
        Euler::from_matrix3(self, order)
    }

    /// Reflects the basis across the plane with the given normal, then
    /// rebuilds a proper (determinant +1) frame from the axis hints; see
    /// [`Quaternion::mirror`] for the full contract. Row scale is preserved.
    pub fn mirror(
        &self,
        normal: Vector3,
        primary: Axis,
        secondary: Axis,
    ) -> Result<Matrix3, GMathError> {
        let n = normal.normalized()?;
        let scale = self.get_scale();
        let reflect = |row: Vector3| row - n * (2.0 * row.dot(n));
        let mirrored = [
            reflect(self.axis_x()),
            reflect(self.axis_y()),
            reflect(self.axis_z()),
        ];
        let frame = Matrix3::from_aim(
            mirrored[primary.index()],
            mirrored[secondary.index()],
            primary,
            secondary,
        )?;
        Ok(Matrix3::from_rows(
            frame.axis_x() * scale.x,
            frame.axis_y() * scale.y,
            frame.axis_z() * scale.z,
        ))
    }

    /// In-place form of [`mirror`](Matrix3::mirror).
    pub fn mirror_mut(
        &mut self,
        normal: Vector3,
        primary: Axis,
        secondary: Axis,
    ) -> Result<&mut Matrix3, GMathError> {
        *self = self.mirror(normal, primary, secondary)?;
        Ok(self)
    }

    /// Reflects across a canonical plane with the axis hints it implies.
    pub fn mirror_plane(&self, plane: CartesianPlane) -> Result<Matrix3, GMathError> {
        let (primary, secondary) = plane.mirror_hints();
        self.mirror(Vector3::from_axis(plane.normal_axis()), primary, secondary)
    }

    /// In-place form of [`mirror_plane`](Matrix3::mirror_plane).
    pub fn mirror_plane_mut(&mut self, plane: CartesianPlane) -> Result<&mut Matrix3, GMathError> {
        *self = self.mirror_plane(plane)?;
        Ok(self)
    }

    /// Component-wise comparison within [`scalar::EPSILON`].
    #[must_use]
    pub fn almost_eq(&self, other: &Matrix3) -> bool {
        let a = self.to_array();
        let b = other.to_array();
        a.iter()
            .zip(b.iter())
            .all(|(lhs, rhs)| scalar::almost_equal(*lhs, *rhs, scalar::EPSILON))
    }
}

impl PartialEq for Matrix3 {
    fn eq(&self, other: &Matrix3) -> bool {
        self.almost_eq(other)
    }
}

impl One for Matrix3 {
    fn one() -> Self {
        Matrix3::identity()
    }
}

impl From<[f64; 9]> for Matrix3 {
    fn from(values: [f64; 9]) -> Self {
        Matrix3::new(
            values[0], values[1], values[2], values[3], values[4], values[5], values[6],
            values[7], values[8],
        )
    }
}

impl From<Matrix3> for [f64; 9] {
    fn from(value: Matrix3) -> Self {
        value.to_array()
    }
}

impl Index<(usize, usize)> for Matrix3 {
    type Output = f64;

    fn index(&self, (row, col): (usize, usize)) -> &f64 {
        match (row, col) {
            (0, 0) => &self.xx,
            (0, 1) => &self.xy,
            (0, 2) => &self.xz,
            (1, 0) => &self.yx,
            (1, 1) => &self.yy,
            (1, 2) => &self.yz,
            (2, 0) => &self.zx,
            (2, 1) => &self.zy,
            (2, 2) => &self.zz,
            _ => panic!("Matrix3: index ({row}, {col}) out of range"),
        }
    }
}

/// Composition: `a * b` applies `b` first, then `a`.
impl Mul<Matrix3> for Matrix3 {
    type Output = Matrix3;

    fn mul(self, rhs: Matrix3) -> Matrix3 {
        let f = rhs; // applied first
        let s = self; // applied second
        Matrix3::new(
            f.xx * s.xx + f.xy * s.yx + f.xz * s.zx,
            f.xx * s.xy + f.xy * s.yy + f.xz * s.zy,
            f.xx * s.xz + f.xy * s.yz + f.xz * s.zz,
            f.yx * s.xx + f.yy * s.yx + f.yz * s.zx,
            f.yx * s.xy + f.yy * s.yy + f.yz * s.zy,
            f.yx * s.xz + f.yy * s.yz + f.yz * s.zz,
            f.zx * s.xx + f.zy * s.yx + f.zz * s.zx,
            f.zx * s.xy + f.zy * s.yy + f.zz * s.zy,
            f.zx * s.xz + f.zy * s.yz + f.zz * s.zz,
        )
    }
}

impl MulAssign<Matrix3> for Matrix3 {
    fn mul_assign(&mut self, rhs: Matrix3) {
        *self = *self * rhs;
    }
}

/// Row-vector transform: `v' = v * m`.
impl Mul<Matrix3> for Vector3 {
    type Output = Vector3;

    fn mul(self, m: Matrix3) -> Vector3 {
        Vector3::new(
            self.x * m.xx + self.y * m.yx + self.z * m.zx,
            self.x * m.xy + self.y * m.yy + self.z * m.zy,
            self.x * m.xz + self.y * m.yz + self.z * m.zz,
        )
    }
}

impl MulAssign<Matrix3> for Vector3 {
    fn mul_assign(&mut self, m: Matrix3) {
        *self = *self * m;
    }
}

impl Mul<f64> for Matrix3 {
    type Output = Matrix3;

    fn mul(self, rhs: f64) -> Matrix3 {
        let mut out = self.to_array();
        for v in &mut out {
            *v *= rhs;
        }
        Matrix3::from(out)
    }
}

impl Div<f64> for Matrix3 {
    type Output = Matrix3;

    fn div(self, rhs: f64) -> Matrix3 {
        let mut out = self.to_array();
        for v in &mut out {
            *v /= rhs;
        }
        Matrix3::from(out)
    }
}

impl Add<Matrix3> for Matrix3 {
    type Output = Matrix3;

    fn add(self, rhs: Matrix3) -> Matrix3 {
        let mut out = self.to_array();
        for (v, r) in out.iter_mut().zip(rhs.to_array()) {
            *v += r;
        }
        Matrix3::from(out)
    }
}

impl Sub<Matrix3> for Matrix3 {
    type Output = Matrix3;

    fn sub(self, rhs: Matrix3) -> Matrix3 {
        let mut out = self.to_array();
        for (v, r) in out.iter_mut().zip(rhs.to_array()) {
            *v -= r;
        }
        Matrix3::from(out)
    }
}
