//! One-stop import for the public surface.

#[allow(unused_imports)]
pub use crate::{
    axes::{Axis, CartesianPlane, RotationOrder, Unit},
    error::GMathError,
    euler::Euler,
    matrix3::Matrix3,
    matrix4::Matrix4,
    quaternion::Quaternion,
    scalar,
    vector3::Vector3,
    vector4::Vector4,
    xfo::Xfo,
};
