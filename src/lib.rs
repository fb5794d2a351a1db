//! 3D rotation and rigid-transform math for rigging-style applications.
//!
//! The core types are [`Vector3`]/[`Vector4`], [`Quaternion`], [`Euler`]
//! (angle triple with a rotation order and angular unit), [`Matrix3`]/
//! [`Matrix4`] (row-major, row-vector convention `v' = v * m`) and [`Xfo`]
//! (translation + orientation + per-axis scale), together with conversions
//! between them and plane/axis mirroring that always restores a proper,
//! right-handed result.
//!
//! Two conventions hold everywhere:
//! - `a * b` applies `b` first, then `a`: for quaternions, matrices and
//!   transforms alike.
//! - A [`RotationOrder`](axes::RotationOrder) names the application
//!   sequence: `XYZ` applies the X rotation first.
//!
//! Everything is a plain `Copy` value type with no shared state; fallible
//! operations (wrong-length slices, degenerate normalisation, singular
//! inversion) return [`GMathError`](error::GMathError).

pub mod axes;
pub mod error;
pub mod euler;
pub mod matrix3;
pub mod matrix4;
pub mod prelude;
pub mod quaternion;
pub mod scalar;
pub mod vector3;
pub mod vector4;
pub mod xfo;

pub use axes::{Axis, CartesianPlane, RotationOrder, Unit};
pub use error::GMathError;
pub use euler::Euler;
pub use matrix3::Matrix3;
pub use matrix4::Matrix4;
pub use quaternion::Quaternion;
pub use vector3::Vector3;
pub use vector4::Vector4;
pub use xfo::Xfo;
