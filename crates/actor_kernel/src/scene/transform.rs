//! Actor transform with a cached world matrix
//!
//! Position, rotation and uniform scale. Every setter recomputes the world
//! matrix before returning, so a read after a write is never stale, and
//! raises a changed flag that the world consumes to notify components.

use crate::foundation::math::{constants, utils, Mat4, Quat, Vec3};

/// Dot product above which two unit vectors count as the same direction
const SAME_DIRECTION: f32 = 0.9999;

/// Local transform of an actor
///
/// The world matrix applies scale first, then rotation, then translation
/// (`T * R * S` on column vectors).
#[derive(Debug, Clone, PartialEq)]
pub struct Transform {
    position: Vec3,
    rotation: Quat,
    scale: f32,
    world: Mat4,
    changed: bool,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::zeros(),
            rotation: Quat::identity(),
            scale: 1.0,
            world: Mat4::identity(),
            changed: false,
        }
    }
}

impl Transform {
    /// Create from position, rotation and scale
    ///
    /// # Panics
    ///
    /// Panics if `scale` is negative.
    pub fn new(position: Vec3, rotation: Quat, scale: f32) -> Self {
        assert!(scale >= 0.0, "Transform scale must be non-negative, got {scale}");
        let mut transform = Self {
            position,
            rotation,
            scale,
            world: Mat4::identity(),
            changed: false,
        };
        transform.compute_world_transform();
        transform
    }

    /// Create at `position` with identity rotation and unit scale
    pub fn from_position(position: Vec3) -> Self {
        Self::new(position, Quat::identity(), 1.0)
    }

    /// Local position
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Local rotation
    pub fn rotation(&self) -> Quat {
        self.rotation
    }

    /// Uniform scale
    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// The cached world matrix
    pub fn world_transform(&self) -> &Mat4 {
        &self.world
    }

    /// Set the position and recompute the world matrix
    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
        self.compute_world_transform();
    }

    /// Set the rotation and recompute the world matrix
    pub fn set_rotation(&mut self, rotation: Quat) {
        self.rotation = rotation;
        self.compute_world_transform();
    }

    /// # Panics
    ///
    /// Panics if `scale` is negative.
    pub fn set_scale(&mut self, scale: f32) {
        assert!(scale >= 0.0, "Transform scale must be non-negative, got {scale}");
        self.scale = scale;
        self.compute_world_transform();
    }

    /// Recompute the world matrix from the current values
    pub fn compute_world_transform(&mut self) {
        self.world = Mat4::new_translation(&self.position)
            * self.rotation.to_homogeneous()
            * Mat4::new_scaling(self.scale);
        self.changed = true;
    }

    /// Whether the world matrix changed since the last [`Self::take_changed`]
    pub fn is_changed(&self) -> bool {
        self.changed
    }

    /// Consume the changed flag
    pub fn take_changed(&mut self) -> bool {
        std::mem::take(&mut self.changed)
    }

    /// Unit forward axis (+X rotated)
    pub fn forward(&self) -> Vec3 {
        self.rotation * utils::unit_forward()
    }

    /// Unit right axis (+Y rotated)
    pub fn right(&self) -> Vec3 {
        self.rotation * utils::unit_right()
    }

    /// Unit up axis (+Z rotated)
    pub fn up(&self) -> Vec3 {
        self.rotation * utils::unit_up()
    }

    /// Replace the rotation so that forward points along `new_forward`
    ///
    /// The rotation is measured from the world forward axis. Directions
    /// opposite to it turn half a circle about the up axis.
    pub fn rotate_to_new_forward(&mut self, new_forward: &Vec3) {
        let Some(target) = new_forward.try_normalize(f32::EPSILON) else {
            return;
        };
        let base = utils::unit_forward();
        let dot = base.dot(&target);

        let rotation = if dot > SAME_DIRECTION {
            Quat::identity()
        } else if dot < -SAME_DIRECTION {
            utils::axis_angle(&utils::unit_up(), constants::PI)
        } else {
            utils::axis_angle(&base.cross(&target), dot.acos())
        };
        self.set_rotation(rotation);
    }
}
