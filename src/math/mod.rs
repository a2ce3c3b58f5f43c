/// 3D point type.
pub type Point3 = nalgebra::Point3<f64>;

/// 3D vector type.
pub type Vector3 = nalgebra::Vector3<f64>;

/// Unit quaternion orientation type.
pub type UnitQuaternion = nalgebra::UnitQuaternion<f64>;

/// Non-normalized quaternion type.
pub type Quaternion = nalgebra::Quaternion<f64>;

/// Global geometric tolerance for floating-point comparisons.
pub const TOLERANCE: f64 = 1e-10;
