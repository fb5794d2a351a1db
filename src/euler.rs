//! Euler angle triple with an owned rotation order and angular unit.
//!
//! A triple is not a unique encoding: many triples describe the same
//! orientation, and near gimbal lock the matrix → Euler extraction is
//! underdetermined. That is expected, lossy behaviour: round trips preserve
//! the *rotation*, not the angle values.

use std::fmt;
use std::fmt::Formatter;
use std::ops::{Index, IndexMut};

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::axes::{RotationOrder, Unit};
use crate::error::{check_slice_len, GMathError};
use crate::matrix3::Matrix3;
use crate::quaternion::Quaternion;
use crate::scalar;
use crate::vector3::Vector3;

/// Three angles about the X, Y and Z axes, composed in the order named by
/// `order`: `XYZ` applies the X rotation first, then Y, then Z.
///
/// Angles are stored in the triple's own `unit`; conversions always compute
/// in radians internally and convert at the boundary.
#[derive(Debug, Copy, Clone, Default, Serialize, Deserialize)]
pub struct Euler {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub order: RotationOrder,
    pub unit: Unit,
}

impl Euler {
    #[must_use]
    pub fn new(x: f64, y: f64, z: f64, order: RotationOrder, unit: Unit) -> Euler {
        Euler {
            x,
            y,
            z,
            order,
            unit,
        }
    }

    /// A radian triple with the default `XYZ` order.
    #[must_use]
    pub fn from_radians(x: f64, y: f64, z: f64) -> Euler {
        Euler::new(x, y, z, RotationOrder::default(), Unit::Radians)
    }

    /// A degree triple with the default `XYZ` order.
    #[must_use]
    pub fn from_degrees(x: f64, y: f64, z: f64) -> Euler {
        Euler::new(x, y, z, RotationOrder::default(), Unit::Degrees)
    }

    /// Maps a vector's components onto the X/Y/Z angles.
    #[must_use]
    pub fn from_vector3(v: Vector3, order: RotationOrder, unit: Unit) -> Euler {
        Euler::new(v.x, v.y, v.z, order, unit)
    }

    /// Builds a triple from a flat `(x, y, z)` angle slice; the order and
    /// unit are passed separately, never embedded in the array. Fails unless
    /// the slice is exactly 3 elements long.
    pub fn from_slice(values: &[f64], order: RotationOrder, unit: Unit) -> Result<Euler, GMathError> {
        check_slice_len("Euler", 3, values.len())?;
        Ok(Euler::new(values[0], values[1], values[2], order, unit))
    }

    /// The flat `(x, y, z)` interchange form (order and unit travel
    /// separately).
    #[must_use]
    pub fn to_array(&self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }

    #[must_use]
    pub fn to_vector3(&self) -> Vector3 {
        Vector3::new(self.x, self.y, self.z)
    }

    /// The same triple expressed in degrees.
    #[must_use]
    pub fn to_degrees(&self) -> Euler {
        match self.unit {
            Unit::Degrees => *self,
            Unit::Radians => Euler::new(
                scalar::to_degrees(self.x),
                scalar::to_degrees(self.y),
                scalar::to_degrees(self.z),
                self.order,
                Unit::Degrees,
            ),
        }
    }

    /// The same triple expressed in radians.
    #[must_use]
    pub fn to_radians(&self) -> Euler {
        match self.unit {
            Unit::Radians => *self,
            Unit::Degrees => Euler::new(
                scalar::to_radians(self.x),
                scalar::to_radians(self.y),
                scalar::to_radians(self.z),
                self.order,
                Unit::Radians,
            ),
        }
    }

    /// Re-tags the triple in `unit`, converting the stored angles in place.
    pub fn set_unit(&mut self, unit: Unit) -> &mut Euler {
        *self = match unit {
            Unit::Degrees => self.to_degrees(),
            Unit::Radians => self.to_radians(),
        };
        self
    }

    /// Composes the three elementary rotations in this triple's order into a
    /// quaternion.
    #[must_use]
    pub fn to_quaternion(&self) -> Quaternion {
        let r = self.to_radians();
        let qx = Quaternion::from_unit_axis_angle(Vector3::x_axis(), r.x);
        let qy = Quaternion::from_unit_axis_angle(Vector3::y_axis(), r.y);
        let qz = Quaternion::from_unit_axis_angle(Vector3::z_axis(), r.z);
        // `a * b` applies `b` first, so the first-applied axis sits rightmost.
        match self.order {
            RotationOrder::XYZ => qz * qy * qx,
            RotationOrder::XZY => qy * qz * qx,
            RotationOrder::YXZ => qz * qx * qy,
            RotationOrder::YZX => qx * qz * qy,
            RotationOrder::ZXY => qy * qx * qz,
            RotationOrder::ZYX => qx * qy * qz,
        }
    }

    /// Composes the three elementary rotations in this triple's order into a
    /// rotation matrix. Agrees with [`to_quaternion`](Euler::to_quaternion).
    #[must_use]
    pub fn to_matrix3(&self) -> Matrix3 {
        let r = self.to_radians();
        let mx = Matrix3::from_rotation_x(r.x);
        let my = Matrix3::from_rotation_y(r.y);
        let mz = Matrix3::from_rotation_z(r.z);
        match self.order {
            RotationOrder::XYZ => mz * my * mx,
            RotationOrder::XZY => my * mz * mx,
            RotationOrder::YXZ => mz * mx * my,
            RotationOrder::YZX => mx * mz * my,
            RotationOrder::ZXY => my * mx * mz,
            RotationOrder::ZYX => mx * my * mz,
        }
    }

    /// Extracts the triple of a rotation matrix for the given order, in
    /// radians.
    ///
    /// Near gimbal lock (the asin argument at ±1) two elementary axes align
    /// and the extraction is underdetermined; the canonical resolution pins
    /// one angle to zero and solves the remaining two. This is lossy, not an
    /// error: the returned triple still reproduces the rotation.
    #[must_use]
    pub fn from_matrix3(m: &Matrix3, order: RotationOrder) -> Euler {
        let (x, y, z) = match order {
            RotationOrder::XYZ => {
                if m.xz < 1.0 {
                    if m.xz > -1.0 {
                        (
                            m.yz.atan2(m.zz),
                            scalar::asin(-m.xz),
                            m.xy.atan2(m.xx),
                        )
                    } else {
                        trace!("gimbal lock in XYZ extraction, pinning z to 0");
                        (m.yx.atan2(m.yy), scalar::HALFPI, 0.0)
                    }
                } else {
                    trace!("gimbal lock in XYZ extraction, pinning z to 0");
                    ((-m.yx).atan2(m.yy), -scalar::HALFPI, 0.0)
                }
            }
            RotationOrder::XZY => {
                if m.xy < 1.0 {
                    if m.xy > -1.0 {
                        (
                            (-m.zy).atan2(m.yy),
                            (-m.xz).atan2(m.xx),
                            scalar::asin(m.xy),
                        )
                    } else {
                        trace!("gimbal lock in XZY extraction, pinning y to 0");
                        ((-m.zx).atan2(m.zz), 0.0, -scalar::HALFPI)
                    }
                } else {
                    trace!("gimbal lock in XZY extraction, pinning y to 0");
                    (m.zx.atan2(m.zz), 0.0, scalar::HALFPI)
                }
            }
            RotationOrder::YXZ => {
                if m.yz < 1.0 {
                    if m.yz > -1.0 {
                        (
                            scalar::asin(m.yz),
                            (-m.xz).atan2(m.zz),
                            (-m.yx).atan2(m.yy),
                        )
                    } else {
                        trace!("gimbal lock in YXZ extraction, pinning z to 0");
                        (-scalar::HALFPI, (-m.xy).atan2(m.xx), 0.0)
                    }
                } else {
                    trace!("gimbal lock in YXZ extraction, pinning z to 0");
                    (scalar::HALFPI, m.xy.atan2(m.xx), 0.0)
                }
            }
            RotationOrder::YZX => {
                if m.yx < 1.0 {
                    if m.yx > -1.0 {
                        (
                            m.yz.atan2(m.yy),
                            m.zx.atan2(m.xx),
                            scalar::asin(-m.yx),
                        )
                    } else {
                        trace!("gimbal lock in YZX extraction, pinning x to 0");
                        (0.0, m.zy.atan2(m.zz), scalar::HALFPI)
                    }
                } else {
                    trace!("gimbal lock in YZX extraction, pinning x to 0");
                    (0.0, (-m.zy).atan2(m.zz), -scalar::HALFPI)
                }
            }
            RotationOrder::ZXY => {
                if m.zy < 1.0 {
                    if m.zy > -1.0 {
                        (
                            scalar::asin(-m.zy),
                            m.zx.atan2(m.zz),
                            m.xy.atan2(m.yy),
                        )
                    } else {
                        trace!("gimbal lock in ZXY extraction, pinning z to 0");
                        (scalar::HALFPI, (-m.xz).atan2(m.xx), 0.0)
                    }
                } else {
                    trace!("gimbal lock in ZXY extraction, pinning z to 0");
                    (-scalar::HALFPI, (-m.xz).atan2(m.xx), 0.0)
                }
            }
            RotationOrder::ZYX => {
                if m.zx < 1.0 {
                    if m.zx > -1.0 {
                        (
                            (-m.zy).atan2(m.zz),
                            scalar::asin(m.zx),
                            (-m.yx).atan2(m.xx),
                        )
                    } else {
                        trace!("gimbal lock in ZYX extraction, pinning z to 0");
                        (-m.xy.atan2(m.xz), -scalar::HALFPI, 0.0)
                    }
                } else {
                    trace!("gimbal lock in ZYX extraction, pinning z to 0");
                    (m.xy.atan2(-m.xz), scalar::HALFPI, 0.0)
                }
            }
        };
        Euler::new(x, y, z, order, Unit::Radians)
    }

    /// Extracts the triple of a quaternion's rotation for the given order.
    #[must_use]
    pub fn from_quaternion(q: Quaternion, order: RotationOrder) -> Euler {
        Euler::from_matrix3(&q.to_matrix3(), order)
    }

    /// Angle comparison within [`scalar::EPSILON`], after converting `other`
    /// to this triple's unit. Triples with different rotation orders never
    /// compare equal: the same numbers mean a different rotation.
    #[must_use]
    pub fn almost_eq(&self, other: Euler) -> bool {
        if self.order != other.order {
            return false;
        }
        let other = match self.unit {
            Unit::Degrees => other.to_degrees(),
            Unit::Radians => other.to_radians(),
        };
        scalar::almost_equal(self.x, other.x, scalar::EPSILON)
            && scalar::almost_equal(self.y, other.y, scalar::EPSILON)
            && scalar::almost_equal(self.z, other.z, scalar::EPSILON)
    }
}

impl PartialEq for Euler {
    fn eq(&self, other: &Euler) -> bool {
        self.almost_eq(*other)
    }
}

impl Index<usize> for Euler {
    type Output = f64;

    fn index(&self, index: usize) -> &f64 {
        match index {
            0 => &self.x,
            1 => &self.y,
            2 => &self.z,
            _ => panic!("Euler: index {index} out of range"),
        }
    }
}

impl IndexMut<usize> for Euler {
    fn index_mut(&mut self, index: usize) -> &mut f64 {
        match index {
            0 => &mut self.x,
            1 => &mut self.y,
            2 => &mut self.z,
            _ => panic!("Euler: index {index} out of range"),
        }
    }
}

impl fmt::Display for Euler {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "euler(")?;
        if let Some(p) = f.precision() {
            write!(f, "{0:.3$}, {1:.3$}, {2:.3$}", self.x, self.y, self.z, p)?;
        } else {
            write!(f, "{}, {}, {}", self.x, self.y, self.z)?;
        }
        write!(f, "; {:?}, {:?})", self.order, self.unit)
    }
}
