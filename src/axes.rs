//! Closed enumerations for axes, planes, rotation orders and angular units.
//!
//! The serialized names (`"POSX"`, `"XY"`, `"XYZ"`, `"degrees"`, ...) are the
//! stable interchange vocabulary for configurations referencing these values.

use serde::{Deserialize, Serialize};

/// A signed coordinate axis.
///
/// Used to pick a reference direction when a basis has to be rebuilt, e.g.
/// after mirroring or when aiming a frame at a target.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Axis {
    PosX,
    PosY,
    PosZ,
    NegX,
    NegY,
    NegZ,
}

impl Axis {
    /// Index of the unsigned coordinate this axis lies along: x = 0, y = 1, z = 2.
    #[must_use]
    pub fn index(self) -> usize {
        match self {
            Axis::PosX | Axis::NegX => 0,
            Axis::PosY | Axis::NegY => 1,
            Axis::PosZ | Axis::NegZ => 2,
        }
    }

    /// `+1.0` for positive axes, `-1.0` for negative ones.
    #[must_use]
    pub fn sign(self) -> f64 {
        if self.is_negative() { -1.0 } else { 1.0 }
    }

    #[must_use]
    pub fn is_negative(self) -> bool {
        matches!(self, Axis::NegX | Axis::NegY | Axis::NegZ)
    }

    /// The axis pointing the opposite way.
    #[must_use]
    pub fn opposite(self) -> Axis {
        match self {
            Axis::PosX => Axis::NegX,
            Axis::PosY => Axis::NegY,
            Axis::PosZ => Axis::NegZ,
            Axis::NegX => Axis::PosX,
            Axis::NegY => Axis::PosY,
            Axis::NegZ => Axis::PosZ,
        }
    }
}

/// One of the six ordered canonical plane namings.
///
/// `XY` and `YX` describe the same geometric plane; the ordering encodes the
/// implied normal direction (`XY` implies +Z, `YX` implies -Z), which
/// downstream handedness bookkeeping relies on. Reflection itself is
/// insensitive to the normal's sign.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CartesianPlane {
    XY,
    YZ,
    ZX,
    YX,
    ZY,
    XZ,
}

impl CartesianPlane {
    /// The signed axis normal to this plane, per the ordering convention.
    #[must_use]
    pub fn normal_axis(self) -> Axis {
        match self {
            CartesianPlane::XY => Axis::PosZ,
            CartesianPlane::YZ => Axis::PosX,
            CartesianPlane::ZX => Axis::PosY,
            CartesianPlane::YX => Axis::NegZ,
            CartesianPlane::ZY => Axis::NegX,
            CartesianPlane::XZ => Axis::NegY,
        }
    }

    /// Default primary/secondary axis hints for rebuilding a mirrored basis:
    /// the two axes spanning the plane, in the plane's own order.
    #[must_use]
    pub fn mirror_hints(self) -> (Axis, Axis) {
        match self {
            CartesianPlane::XY => (Axis::PosX, Axis::PosY),
            CartesianPlane::YZ => (Axis::PosY, Axis::PosZ),
            CartesianPlane::ZX => (Axis::PosZ, Axis::PosX),
            CartesianPlane::YX => (Axis::PosY, Axis::PosX),
            CartesianPlane::ZY => (Axis::PosZ, Axis::PosY),
            CartesianPlane::XZ => (Axis::PosX, Axis::PosZ),
        }
    }
}

/// The sequence elementary axis rotations are applied in when converting an
/// Euler triple to a rotation. `XYZ` applies the X rotation first, then Y,
/// then Z.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum RotationOrder {
    #[default]
    XYZ,
    XZY,
    YXZ,
    YZX,
    ZXY,
    ZYX,
}

/// Angular unit tag for Euler triples. All internal trigonometry is in
/// radians; degree-tagged values convert at the boundary.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    Degrees,
    #[default]
    Radians,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn axis_index_and_sign() {
        assert_eq!(Axis::PosX.index(), 0);
        assert_eq!(Axis::NegZ.index(), 2);
        assert_eq!(Axis::PosY.sign(), 1.0);
        assert_eq!(Axis::NegY.sign(), -1.0);
        assert_eq!(Axis::NegX.opposite(), Axis::PosX);
    }

    #[test]
    fn plane_normals_encode_ordering() {
        assert_eq!(CartesianPlane::XY.normal_axis(), Axis::PosZ);
        assert_eq!(CartesianPlane::YX.normal_axis(), Axis::NegZ);
        assert_eq!(
            CartesianPlane::XY.normal_axis().index(),
            CartesianPlane::YX.normal_axis().index()
        );
        for plane in [
            CartesianPlane::XY,
            CartesianPlane::YZ,
            CartesianPlane::ZX,
            CartesianPlane::YX,
            CartesianPlane::ZY,
            CartesianPlane::XZ,
        ] {
            let (primary, secondary) = plane.mirror_hints();
            assert_ne!(primary.index(), secondary.index());
            assert_ne!(primary.index(), plane.normal_axis().index());
            assert_ne!(secondary.index(), plane.normal_axis().index());
        }
    }

    #[test]
    fn defaults() {
        assert_eq!(RotationOrder::default(), RotationOrder::XYZ);
        assert_eq!(Unit::default(), Unit::Radians);
    }

    #[test]
    fn serialized_names_are_stable() {
        assert_eq!(serde_json::to_string(&Axis::NegX).unwrap(), "\"NEGX\"");
        assert_eq!(serde_json::to_string(&CartesianPlane::ZY).unwrap(), "\"ZY\"");
        assert_eq!(serde_json::to_string(&RotationOrder::XYZ).unwrap(), "\"XYZ\"");
        assert_eq!(serde_json::to_string(&Unit::Degrees).unwrap(), "\"degrees\"");
        let order: RotationOrder = serde_json::from_str("\"ZXY\"").unwrap();
        assert_eq!(order, RotationOrder::ZXY);
    }
}
