//! 4x4 row-major homogeneous transform matrix.
//!
//! Rows 0-2 carry the rotation/scale basis, row 3 (`px, py, pz, pw`) carries
//! translation; vectors transform as rows, `v' = v * m`.

use std::ops::{Add, Index, Mul, MulAssign, Sub};

use num_traits::One;
use serde::{Deserialize, Serialize};

use crate::axes::{Axis, CartesianPlane, RotationOrder};
use crate::error::{check_slice_len, GMathError};
use crate::euler::Euler;
use crate::matrix3::Matrix3;
use crate::quaternion::Quaternion;
use crate::scalar;
use crate::vector3::Vector3;
use crate::vector4::Vector4;

/// A homogeneous 4x4 matrix stored row-major.
///
/// `a * b` composes so that `b` is applied first, matching [`Matrix3`] and
/// [`Quaternion`]. The decomposition into translation, rotation and per-axis
/// scale is exact (to floating tolerance) for matrices built from those
/// parts with positive scale; negative scale is absorbed into the rotation
/// because a row length cannot remember its sign.
#[derive(Debug, Copy, Clone, Serialize, Deserialize)]
#[must_use]
pub struct Matrix4 {
    pub xx: f64,
    pub xy: f64,
    pub xz: f64,
    pub xw: f64,
    pub yx: f64,
    pub yy: f64,
    pub yz: f64,
    pub yw: f64,
    pub zx: f64,
    pub zy: f64,
    pub zz: f64,
    pub zw: f64,
    pub px: f64,
    pub py: f64,
    pub pz: f64,
    pub pw: f64,
}

impl Default for Matrix4 {
    fn default() -> Self {
        Matrix4::identity()
    }
}

impl Matrix4 {
    #[must_use]
    pub fn identity() -> Matrix4 {
        Matrix4::from_array_2d([
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    #[allow(clippy::too_many_arguments)]
    #[must_use]
    pub fn new(
        xx: f64,
        xy: f64,
        xz: f64,
        xw: f64,
        yx: f64,
        yy: f64,
        yz: f64,
        yw: f64,
        zx: f64,
        zy: f64,
        zz: f64,
        zw: f64,
        px: f64,
        py: f64,
        pz: f64,
        pw: f64,
    ) -> Matrix4 {
        Matrix4 {
            xx,
            xy,
            xz,
            xw,
            yx,
            yy,
            yz,
            yw,
            zx,
            zy,
            zz,
            zw,
            px,
            py,
            pz,
            pw,
        }
    }

    /// Builds a matrix from four row vectors.
    #[must_use]
    pub fn from_rows(x: Vector4, y: Vector4, z: Vector4, p: Vector4) -> Matrix4 {
        Matrix4::from_array_2d([x.to_array(), y.to_array(), z.to_array(), p.to_array()])
    }

    #[must_use]
    pub fn from_array_2d(rows: [[f64; 4]; 4]) -> Matrix4 {
        Matrix4::new(
            rows[0][0], rows[0][1], rows[0][2], rows[0][3], rows[1][0], rows[1][1], rows[1][2],
            rows[1][3], rows[2][0], rows[2][1], rows[2][2], rows[2][3], rows[3][0], rows[3][1],
            rows[3][2], rows[3][3],
        )
    }

    /// Builds a matrix from a flat row-major slice of 16 values; fails on
    /// any other length.
    pub fn from_slice(values: &[f64]) -> Result<Matrix4, GMathError> {
        check_slice_len("Matrix4", 16, values.len())?;
        let mut rows = [[0.0; 4]; 4];
        for (i, row) in rows.iter_mut().enumerate() {
            row.copy_from_slice(&values[i * 4..i * 4 + 4]);
        }
        Ok(Matrix4::from_array_2d(rows))
    }

    /// The flat row-major interchange form.
    #[must_use]
    pub fn to_array(&self) -> [f64; 16] {
        [
            self.xx, self.xy, self.xz, self.xw, self.yx, self.yy, self.yz, self.yw, self.zx,
            self.zy, self.zz, self.zw, self.px, self.py, self.pz, self.pw,
        ]
    }

    /// Row-major nested form.
    #[must_use]
    pub fn to_array_2d(&self) -> [[f64; 4]; 4] {
        [
            [self.xx, self.xy, self.xz, self.xw],
            [self.yx, self.yy, self.yz, self.yw],
            [self.zx, self.zy, self.zz, self.zw],
            [self.px, self.py, self.pz, self.pw],
        ]
    }

    /// Embeds a 3x3 basis with zero translation.
    #[must_use]
    pub fn from_matrix3(m: &Matrix3) -> Matrix4 {
        Matrix4::from_array_2d([
            [m.xx, m.xy, m.xz, 0.0],
            [m.yx, m.yy, m.yz, 0.0],
            [m.zx, m.zy, m.zz, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// Pure rotation transform.
    #[must_use]
    pub fn from_quaternion(q: &Quaternion) -> Matrix4 {
        q.to_matrix4()
    }

    /// Rotation plus translation.
    #[must_use]
    pub fn from_quaternion_translation(q: &Quaternion, tr: Vector3) -> Matrix4 {
        let mut m = q.to_matrix4();
        m.set_position(tr);
        m
    }

    /// Recomposes translation, orientation and per-axis scale: the inverse of
    /// [`decompose`](Matrix4::decompose).
    #[must_use]
    pub fn from_parts(tr: Vector3, ori: &Quaternion, sc: Vector3) -> Matrix4 {
        let r = ori.to_matrix3();
        Matrix4::from_array_2d([
            [r.xx * sc.x, r.xy * sc.x, r.xz * sc.x, 0.0],
            [r.yx * sc.y, r.yy * sc.y, r.yz * sc.y, 0.0],
            [r.zx * sc.z, r.zy * sc.z, r.zz * sc.z, 0.0],
            [tr.x, tr.y, tr.z, 1.0],
        ])
    }

    /// The rotation/scale basis, dropping translation.
    #[must_use]
    pub fn to_matrix3(&self) -> Matrix3 {
        Matrix3::new(
            self.xx, self.xy, self.xz, self.yx, self.yy, self.yz, self.zx, self.zy, self.zz,
        )
    }

    /// Row accessor: 0-2 are basis rows, 3 is the translation row.
    #[must_use]
    pub fn row(&self, index: usize) -> Vector4 {
        let rows = self.to_array_2d();
        match index {
            0..=3 => Vector4::from(rows[index]),
            _ => panic!("Matrix4: row {index} out of range"),
        }
    }

    #[must_use]
    pub fn get_position(&self) -> Vector3 {
        Vector3::new(self.px, self.py, self.pz)
    }

    pub fn set_position(&mut self, pos: Vector3) -> &mut Matrix4 {
        self.px = pos.x;
        self.py = pos.y;
        self.pz = pos.z;
        self
    }

    /// Offsets the translation row.
    pub fn translate(&mut self, offset: Vector3) -> &mut Matrix4 {
        self.px += offset.x;
        self.py += offset.y;
        self.pz += offset.z;
        self
    }

    /// Per-axis scale carried by the basis rows.
    #[must_use]
    pub fn get_scale(&self) -> Vector3 {
        self.to_matrix3().get_scale()
    }

    /// Rescales the basis rows, keeping their directions and the
    /// translation. Fails when a basis row is degenerate.
    pub fn set_scale(&mut self, scale: Vector3) -> Result<&mut Matrix4, GMathError> {
        let mut basis = self.to_matrix3();
        basis.set_scale(scale)?;
        self.xx = basis.xx;
        self.xy = basis.xy;
        self.xz = basis.xz;
        self.yx = basis.yx;
        self.yy = basis.yy;
        self.yz = basis.yz;
        self.zx = basis.zx;
        self.zy = basis.zy;
        self.zz = basis.zz;
        Ok(self)
    }

    /// Splits the transform into translation, orientation and per-axis
    /// scale. Fails when a basis row's length is below
    /// [`scalar::SMALLEST`], since no rotation can then be extracted.
    pub fn decompose(&self) -> Result<(Vector3, Quaternion, Vector3), GMathError> {
        let sc = self.get_scale();
        if sc.x < scalar::SMALLEST || sc.y < scalar::SMALLEST || sc.z < scalar::SMALLEST {
            return Err(GMathError::new(
                "Matrix4: cannot decompose a matrix with a degenerate basis row",
            ));
        }
        let rot = Matrix3::from_rows(
            self.to_matrix3().axis_x() / sc.x,
            self.to_matrix3().axis_y() / sc.y,
            self.to_matrix3().axis_z() / sc.z,
        );
        Ok((self.get_position(), Quaternion::from_matrix3(&rot), sc))
    }

    /// The orientation of the scale-normalised basis.
    pub fn to_quaternion(&self) -> Result<Quaternion, GMathError> {
        self.decompose().map(|(_, ori, _)| ori)
    }

    /// The Euler triple of the scale-normalised basis, in radians.
    pub fn to_euler(&self, order: RotationOrder) -> Result<Euler, GMathError> {
        Ok(self.to_quaternion()?.to_euler(order))
    }

    /// Applies only the rotation/scale basis to a vector (directions, not
    /// points).
    #[must_use]
    pub fn rotate_vector(&self, vec: Vector3) -> Vector3 {
        vec * self.to_matrix3()
    }

    #[must_use]
    pub fn transposed(&self) -> Matrix4 {
        let a = self.to_array_2d();
        let mut out = [[0.0; 4]; 4];
        for (i, row) in a.iter().enumerate() {
            for (j, v) in row.iter().enumerate() {
                out[j][i] = *v;
            }
        }
        Matrix4::from_array_2d(out)
    }

    /// In-place form of [`transposed`](Matrix4::transposed).
    pub fn transpose_mut(&mut self) -> &mut Matrix4 {
        *self = self.transposed();
        self
    }

    fn cofactor_terms(&self) -> ([f64; 6], [f64; 6]) {
        let m = self.to_array_2d();
        let a = [
            m[0][0] * m[1][1] - m[0][1] * m[1][0],
            m[0][0] * m[1][2] - m[0][2] * m[1][0],
            m[0][0] * m[1][3] - m[0][3] * m[1][0],
            m[0][1] * m[1][2] - m[0][2] * m[1][1],
            m[0][1] * m[1][3] - m[0][3] * m[1][1],
            m[0][2] * m[1][3] - m[0][3] * m[1][2],
        ];
        let b = [
            m[2][0] * m[3][1] - m[2][1] * m[3][0],
            m[2][0] * m[3][2] - m[2][2] * m[3][0],
            m[2][0] * m[3][3] - m[2][3] * m[3][0],
            m[2][1] * m[3][2] - m[2][2] * m[3][1],
            m[2][1] * m[3][3] - m[2][3] * m[3][1],
            m[2][2] * m[3][3] - m[2][3] * m[3][2],
        ];
        (a, b)
    }

    #[must_use]
    pub fn determinant(&self) -> f64 {
        let (a, b) = self.cofactor_terms();
        a[0] * b[5] - a[1] * b[4] + a[2] * b[3] + a[3] * b[2] - a[4] * b[1] + a[5] * b[0]
    }

    /// The inverse transform; fails when `|determinant|` is below
    /// [`scalar::SMALLEST`].
    pub fn inverse(&self) -> Result<Matrix4, GMathError> {
        let (a, b) = self.cofactor_terms();
        let det = a[0] * b[5] - a[1] * b[4] + a[2] * b[3] + a[3] * b[2] - a[4] * b[1] + a[5] * b[0];
        if det.abs() < scalar::SMALLEST {
            return Err(GMathError::new(
                "Matrix4: cannot invert a matrix with near-zero determinant",
            ));
        }
        let m = self.to_array_2d();
        let inv = 1.0 / det;
        Ok(Matrix4::from_array_2d([
            [
                (m[1][1] * b[5] - m[1][2] * b[4] + m[1][3] * b[3]) * inv,
                (-m[0][1] * b[5] + m[0][2] * b[4] - m[0][3] * b[3]) * inv,
                (m[3][1] * a[5] - m[3][2] * a[4] + m[3][3] * a[3]) * inv,
                (-m[2][1] * a[5] + m[2][2] * a[4] - m[2][3] * a[3]) * inv,
            ],
            [
                (-m[1][0] * b[5] + m[1][2] * b[2] - m[1][3] * b[1]) * inv,
                (m[0][0] * b[5] - m[0][2] * b[2] + m[0][3] * b[1]) * inv,
                (-m[3][0] * a[5] + m[3][2] * a[2] - m[3][3] * a[1]) * inv,
                (m[2][0] * a[5] - m[2][2] * a[2] + m[2][3] * a[1]) * inv,
            ],
            [
                (m[1][0] * b[4] - m[1][1] * b[2] + m[1][3] * b[0]) * inv,
                (-m[0][0] * b[4] + m[0][1] * b[2] - m[0][3] * b[0]) * inv,
                (m[3][0] * a[4] - m[3][1] * a[2] + m[3][3] * a[0]) * inv,
                (-m[2][0] * a[4] + m[2][1] * a[2] - m[2][3] * a[0]) * inv,
            ],
            [
                (-m[1][0] * b[3] + m[1][1] * b[1] - m[1][2] * b[0]) * inv,
                (m[0][0] * b[3] - m[0][1] * b[1] + m[0][2] * b[0]) * inv,
                (-m[3][0] * a[3] + m[3][1] * a[1] - m[3][2] * a[0]) * inv,
                (m[2][0] * a[3] - m[2][1] * a[1] + m[2][2] * a[0]) * inv,
            ],
        ]))
    }

    /// In-place form of [`inverse`](Matrix4::inverse).
    pub fn inverse_mut(&mut self) -> Result<&mut Matrix4, GMathError> {
        *self = self.inverse()?;
        Ok(self)
    }

    /// Mirrors the rotation/scale basis (per the [`Matrix3::mirror`]
    /// contract) and the translation (per the [`Vector3::mirror`] rule)
    /// independently, then recombines them.
    pub fn mirror(
        &self,
        normal: Vector3,
        primary: Axis,
        secondary: Axis,
    ) -> Result<Matrix4, GMathError> {
        let basis = self.to_matrix3().mirror(normal, primary, secondary)?;
        let pos = self.get_position().mirror(normal)?;
        let mut out = *self;
        out.xx = basis.xx;
        out.xy = basis.xy;
        out.xz = basis.xz;
        out.yx = basis.yx;
        out.yy = basis.yy;
        out.yz = basis.yz;
        out.zx = basis.zx;
        out.zy = basis.zy;
        out.zz = basis.zz;
        out.set_position(pos);
        Ok(out)
    }

    /// In-place form of [`mirror`](Matrix4::mirror).
    pub fn mirror_mut(
        &mut self,
        normal: Vector3,
        primary: Axis,
        secondary: Axis,
    ) -> Result<&mut Matrix4, GMathError> {
        *self = self.mirror(normal, primary, secondary)?;
        Ok(self)
    }

    /// Reflects across a canonical plane with the axis hints it implies.
    pub fn mirror_plane(&self, plane: CartesianPlane) -> Result<Matrix4, GMathError> {
        let (primary, secondary) = plane.mirror_hints();
        self.mirror(Vector3::from_axis(plane.normal_axis()), primary, secondary)
    }

    /// In-place form of [`mirror_plane`](Matrix4::mirror_plane).
    pub fn mirror_plane_mut(&mut self, plane: CartesianPlane) -> Result<&mut Matrix4, GMathError> {
        *self = self.mirror_plane(plane)?;
        Ok(self)
    }

    /// Component-wise comparison within [`scalar::EPSILON`].
    #[must_use]
    pub fn almost_eq(&self, other: &Matrix4) -> bool {
        let a = self.to_array();
        let b = other.to_array();
        a.iter()
            .zip(b.iter())
            .all(|(lhs, rhs)| scalar::almost_equal(*lhs, *rhs, scalar::EPSILON))
    }
}

impl PartialEq for Matrix4 {
    fn eq(&self, other: &Matrix4) -> bool {
        self.almost_eq(other)
    }
}

impl One for Matrix4 {
    fn one() -> Self {
        Matrix4::identity()
    }
}

impl From<[f64; 16]> for Matrix4 {
    fn from(values: [f64; 16]) -> Self {
        let mut rows = [[0.0; 4]; 4];
        for (i, row) in rows.iter_mut().enumerate() {
            row.copy_from_slice(&values[i * 4..i * 4 + 4]);
        }
        Matrix4::from_array_2d(rows)
    }
}

impl From<Matrix4> for [f64; 16] {
    fn from(value: Matrix4) -> Self {
        value.to_array()
    }
}

impl Index<(usize, usize)> for Matrix4 {
    type Output = f64;

    fn index(&self, (row, col): (usize, usize)) -> &f64 {
        let fields = [
            [&self.xx, &self.xy, &self.xz, &self.xw],
            [&self.yx, &self.yy, &self.yz, &self.yw],
            [&self.zx, &self.zy, &self.zz, &self.zw],
            [&self.px, &self.py, &self.pz, &self.pw],
        ];
        if row > 3 || col > 3 {
            panic!("Matrix4: index ({row}, {col}) out of range");
        }
        fields[row][col]
    }
}

/// Composition: `a * b` applies `b` first, then `a`.
impl Mul<Matrix4> for Matrix4 {
    type Output = Matrix4;

    fn mul(self, rhs: Matrix4) -> Matrix4 {
        let f = rhs.to_array_2d(); // applied first
        let s = self.to_array_2d(); // applied second
        let mut out = [[0.0; 4]; 4];
        for i in 0..4 {
            for j in 0..4 {
                out[i][j] = f[i][0] * s[0][j]
                    + f[i][1] * s[1][j]
                    + f[i][2] * s[2][j]
                    + f[i][3] * s[3][j];
            }
        }
        Matrix4::from_array_2d(out)
    }
}

impl MulAssign<Matrix4> for Matrix4 {
    fn mul_assign(&mut self, rhs: Matrix4) {
        *self = *self * rhs;
    }
}

/// Affine point transform: implicit `w = 1`, translation applied.
impl Mul<Matrix4> for Vector3 {
    type Output = Vector3;

    fn mul(self, m: Matrix4) -> Vector3 {
        Vector3::new(
            self.x * m.xx + self.y * m.yx + self.z * m.zx + m.px,
            self.x * m.xy + self.y * m.yy + self.z * m.zy + m.py,
            self.x * m.xz + self.y * m.yz + self.z * m.zz + m.pz,
        )
    }
}

impl MulAssign<Matrix4> for Vector3 {
    fn mul_assign(&mut self, m: Matrix4) {
        *self = *self * m;
    }
}

/// Full homogeneous transform.
impl Mul<Matrix4> for Vector4 {
    type Output = Vector4;

    fn mul(self, m: Matrix4) -> Vector4 {
        Vector4::new(
            self.x * m.xx + self.y * m.yx + self.z * m.zx + self.w * m.px,
            self.x * m.xy + self.y * m.yy + self.z * m.zy + self.w * m.py,
            self.x * m.xz + self.y * m.yz + self.z * m.zz + self.w * m.pz,
            self.x * m.xw + self.y * m.yw + self.z * m.zw + self.w * m.pw,
        )
    }
}

impl MulAssign<Matrix4> for Vector4 {
    fn mul_assign(&mut self, m: Matrix4) {
        *self = *self * m;
    }
}

impl Mul<f64> for Matrix4 {
    type Output = Matrix4;

    fn mul(self, rhs: f64) -> Matrix4 {
        let mut out = self.to_array();
        for v in &mut out {
            *v *= rhs;
        }
        Matrix4::from(out)
    }
}

impl Add<Matrix4> for Matrix4 {
    type Output = Matrix4;

    fn add(self, rhs: Matrix4) -> Matrix4 {
        let mut out = self.to_array();
        for (v, r) in out.iter_mut().zip(rhs.to_array()) {
            *v += r;
        }
        Matrix4::from(out)
    }
}

impl Sub<Matrix4> for Matrix4 {
    type Output = Matrix4;

    fn sub(self, rhs: Matrix4) -> Matrix4 {
        let mut out = self.to_array();
        for (v, r) in out.iter_mut().zip(rhs.to_array()) {
            *v -= r;
        }
        Matrix4::from(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scalar::{EPSILON, HALFPI};

    fn sample_quaternion() -> Quaternion {
        Quaternion::from_axis_angle(Vector3::new(0.2, 1.0, -0.4), 0.9).unwrap()
    }

    // ==================== Construction ====================

    #[test]
    fn matrix4_identity_is_default() {
        assert_eq!(Matrix4::default(), Matrix4::identity());
        assert_eq!(Matrix4::one(), Matrix4::identity());
        let v = Vector3::new(1.0, 2.0, 3.0);
        assert_eq!(v * Matrix4::identity(), v);
    }

    #[test]
    fn matrix4_from_slice_checks_length() {
        let mut values = [0.0; 16];
        values[0] = 1.0;
        values[5] = 1.0;
        values[10] = 1.0;
        values[15] = 1.0;
        assert_eq!(Matrix4::from_slice(&values).unwrap(), Matrix4::identity());
        assert!(Matrix4::from_slice(&[0.0; 15]).is_err());
        assert!(Matrix4::from_slice(&[0.0; 17]).is_err());
    }

    #[test]
    fn matrix4_array_layout_puts_translation_last() {
        let m = Matrix4::from_quaternion_translation(
            &Quaternion::identity(),
            Vector3::new(7.0, 8.0, 9.0),
        );
        let arr = m.to_array();
        assert_eq!(&arr[12..16], &[7.0, 8.0, 9.0, 1.0]);
        assert_eq!(m[(3, 0)], 7.0);
        assert_eq!(m.row(3), Vector4::new(7.0, 8.0, 9.0, 1.0));
    }

    // ==================== Transforms ====================

    #[test]
    fn matrix4_point_transform_applies_translation() {
        let m = Matrix4::from_quaternion_translation(
            &Quaternion::from_axis_angle(Vector3::x_axis(), HALFPI).unwrap(),
            Vector3::new(10.0, 0.0, 0.0),
        );
        // y -> z under the rotation, then translated.
        assert_eq!(Vector3::y_axis() * m, Vector3::new(10.0, 0.0, 1.0));
        // rotate_vector ignores translation.
        assert_eq!(m.rotate_vector(Vector3::y_axis()), Vector3::z_axis());
        // A w = 0 homogeneous vector ignores translation too.
        assert_eq!(
            Vector4::from_direction(Vector3::y_axis()) * m,
            Vector4::from_direction(Vector3::z_axis())
        );
        // A w = 1 vector matches the Vector3 path.
        assert_eq!(
            (Vector4::from_point(Vector3::y_axis()) * m).to_vector3(),
            Vector3::y_axis() * m
        );
    }

    #[test]
    fn matrix4_multiplication_applies_rhs_first() {
        let translate = Matrix4::from_quaternion_translation(
            &Quaternion::identity(),
            Vector3::new(5.0, 0.0, 0.0),
        );
        let rotate = Matrix4::from_quaternion(
            &Quaternion::from_axis_angle(Vector3::z_axis(), HALFPI).unwrap(),
        );
        // Translate first, then rotate: (1,0,0) -> (6,0,0) -> (0,6,0).
        let v = Vector3::x_axis() * (rotate * translate);
        assert_eq!(v, Vector3::new(0.0, 6.0, 0.0));
        // Rotate first, then translate: (1,0,0) -> (0,1,0) -> (5,1,0).
        let v = Vector3::x_axis() * (translate * rotate);
        assert_eq!(v, Vector3::new(5.0, 1.0, 0.0));
    }

    // ==================== Determinant and inverse ====================

    #[test]
    fn matrix4_inverse_of_rigid_transform() {
        let m = Matrix4::from_quaternion_translation(&sample_quaternion(), Vector3::new(1.0, -2.0, 3.0));
        let inv = m.inverse().unwrap();
        assert_eq!(m * inv, Matrix4::identity());
        assert_eq!(inv * m, Matrix4::identity());
        let v = Vector3::new(0.3, 4.0, -1.2);
        assert_eq!((v * m) * inv, v);
    }

    #[test]
    fn matrix4_inverse_of_translation() {
        let m = Matrix4::from_quaternion_translation(&Quaternion::identity(), Vector3::new(2.0, 3.0, 4.0));
        let inv = m.inverse().unwrap();
        assert_eq!(inv.get_position(), Vector3::new(-2.0, -3.0, -4.0));
        assert!(scalar::almost_equal(m.determinant(), 1.0, EPSILON));
    }

    #[test]
    fn matrix4_scaled_transform_determinant() {
        let m = Matrix4::from_parts(
            Vector3::zero(),
            &Quaternion::identity(),
            Vector3::new(2.0, 3.0, 4.0),
        );
        assert!(scalar::almost_equal(m.determinant(), 24.0, EPSILON));
        assert_eq!(m * m.inverse().unwrap(), Matrix4::identity());
    }

    #[test]
    fn matrix4_singular_inverse_fails() {
        let m = Matrix4::from_parts(
            Vector3::zero(),
            &Quaternion::identity(),
            Vector3::new(1.0, 0.0, 1.0),
        );
        assert!(m.inverse().is_err());
    }

    #[test]
    fn matrix4_transpose_involution() {
        let m = Matrix4::from_quaternion_translation(&sample_quaternion(), Vector3::new(1.0, 2.0, 3.0));
        assert_eq!(m.transposed().transposed(), m);
        assert_eq!(m[(3, 1)], m.transposed()[(1, 3)]);
    }

    // ==================== Decomposition ====================

    #[test]
    fn matrix4_decompose_recomposes_exactly() {
        let tr = Vector3::new(1.0, -2.0, 0.5);
        let ori = sample_quaternion();
        let sc = Vector3::new(2.0, 0.5, 1.5);
        let m = Matrix4::from_parts(tr, &ori, sc);
        let (out_tr, out_ori, out_sc) = m.decompose().unwrap();
        assert_eq!(out_tr, tr);
        assert_eq!(out_sc, sc);
        assert!(out_ori.same_rotation(ori));
        assert_eq!(Matrix4::from_parts(out_tr, &out_ori, out_sc), m);
    }

    #[test]
    fn matrix4_decompose_degenerate_scale_fails() {
        let m = Matrix4::from_parts(
            Vector3::zero(),
            &Quaternion::identity(),
            Vector3::new(1.0, 0.0, 1.0),
        );
        assert!(m.decompose().is_err());
        assert!(m.to_quaternion().is_err());
    }

    #[test]
    fn matrix4_to_euler_uses_scale_normalized_basis() {
        let e = Euler::from_radians(0.3, -0.6, 1.1);
        let m = Matrix4::from_parts(
            Vector3::new(4.0, 5.0, 6.0),
            &e.to_quaternion(),
            Vector3::new(2.0, 2.0, 2.0),
        );
        let back = m.to_euler(RotationOrder::XYZ).unwrap();
        assert!(back.to_quaternion().same_rotation(e.to_quaternion()));
    }

    // ==================== Scale and position ====================

    #[test]
    fn matrix4_scale_round_trip() {
        let mut m = Matrix4::from_quaternion(&sample_quaternion());
        m.set_scale(Vector3::new(2.0, 3.0, 0.5)).unwrap();
        assert_eq!(m.get_scale(), Vector3::new(2.0, 3.0, 0.5));
    }

    #[test]
    fn matrix4_translate_offsets_position() {
        let mut m = Matrix4::identity();
        m.set_position(Vector3::new(1.0, 1.0, 1.0));
        m.translate(Vector3::new(0.5, -1.0, 2.0));
        assert_eq!(m.get_position(), Vector3::new(1.5, 0.0, 3.0));
    }

    // ==================== Mirroring ====================

    #[test]
    fn matrix4_mirror_mirrors_translation_and_keeps_proper_basis() {
        let m = Matrix4::from_quaternion_translation(&sample_quaternion(), Vector3::new(2.0, 1.0, -1.0));
        let mirrored = m.mirror_plane(CartesianPlane::YZ).unwrap();
        assert_eq!(mirrored.get_position(), Vector3::new(-2.0, 1.0, -1.0));
        assert!(scalar::almost_equal(
            mirrored.to_matrix3().determinant(),
            1.0,
            EPSILON
        ));
    }

    #[test]
    fn matrix4_mirror_twice_restores() {
        let m = Matrix4::from_parts(
            Vector3::new(1.0, 2.0, 3.0),
            &sample_quaternion(),
            Vector3::new(1.5, 1.0, 2.0),
        );
        let n = Vector3::new(0.3, 0.9, 0.1);
        let twice = m
            .mirror(n, Axis::PosY, Axis::PosZ)
            .unwrap()
            .mirror(n, Axis::PosY, Axis::PosZ)
            .unwrap();
        assert_eq!(twice, m);
    }
}
