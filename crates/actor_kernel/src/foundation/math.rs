//! Math utilities and types
//!
//! Provides the fundamental math types used by the kernel. The world is Z-up:
//! +X is an actor's forward axis, +Y its right axis and +Z its up axis.

pub use nalgebra::{
    Vector2, Vector3, Vector4,
    Matrix3, Matrix4,
    Quaternion,
    Unit, UnitQuaternion,
};

/// 2D vector type
pub type Vec2 = Vector2<f32>;

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// 4D vector type
pub type Vec4 = Vector4<f32>;

/// 3x3 matrix type
pub type Mat3 = Matrix3<f32>;

/// 4x4 matrix type
pub type Mat4 = Matrix4<f32>;

/// 3D point type
pub type Point3 = nalgebra::Point3<f32>;

/// Quaternion type for rotations
pub type Quat = UnitQuaternion<f32>;

/// Math constants
pub mod constants {
    /// Pi constant
    pub const PI: f32 = std::f32::consts::PI;

    /// 2 * Pi
    pub const TAU: f32 = 2.0 * PI;

    /// Pi / 2
    pub const HALF_PI: f32 = PI * 0.5;

    /// Pi / 4
    pub const QUARTER_PI: f32 = PI * 0.25;

    /// Degrees to radians conversion factor
    pub const DEG_TO_RAD: f32 = PI / 180.0;

    /// Radians to degrees conversion factor
    pub const RAD_TO_DEG: f32 = 180.0 / PI;

    /// Tolerance used by [`super::utils::near_zero`]
    pub const NEAR_ZERO_EPSILON: f32 = 0.001;
}

/// Math utility functions
pub mod utils {
    use super::{constants, Quat, Unit, Vec3};

    /// Convert degrees to radians
    pub fn deg_to_rad(degrees: f32) -> f32 {
        degrees * constants::DEG_TO_RAD
    }

    /// Convert radians to degrees
    pub fn rad_to_deg(radians: f32) -> f32 {
        radians * constants::RAD_TO_DEG
    }

    /// Linear interpolation
    pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
        a + (b - a) * t
    }

    /// True when `value` is within [`constants::NEAR_ZERO_EPSILON`] of zero
    pub fn near_zero(value: f32) -> bool {
        value.abs() <= constants::NEAR_ZERO_EPSILON
    }

    /// Reflect `v` about the normalized vector `n`
    pub fn reflect(v: &Vec3, n: &Vec3) -> Vec3 {
        v - n * (2.0 * v.dot(n))
    }

    /// Rotation of `angle` radians about `axis` (normalized internally)
    pub fn axis_angle(axis: &Vec3, angle: f32) -> Quat {
        Quat::from_axis_angle(&Unit::new_normalize(*axis), angle)
    }

    /// Compose two rotations: apply `first`, then `second`
    pub fn concatenate(first: &Quat, second: &Quat) -> Quat {
        second * first
    }

    /// World-space forward axis
    pub fn unit_forward() -> Vec3 {
        Vec3::x()
    }

    /// World-space right axis
    pub fn unit_right() -> Vec3 {
        Vec3::y()
    }

    /// World-space up axis
    pub fn unit_up() -> Vec3 {
        Vec3::z()
    }
}
