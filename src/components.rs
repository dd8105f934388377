use glam::Mat4;
use glam::Quat;
use glam::Vec3;

use crate::Component;

/// # Name
///
/// Display name of an entity.
#[derive(Clone, Debug, Default, Eq, PartialEq, Hash)]
pub struct Name {
    /// Name text.
    pub value: String,
}

impl Name {
    /// Returns a name with the given text.
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }
}

impl Component for Name {}

impl std::fmt::Display for Name {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.value)
    }
}

/// # Visibility
///
/// Whether the entity is drawn.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum Visibility {
    /// Entity is visible.
    #[default]
    Visible,
    /// Entity is not visible.
    Hidden,
}

impl Component for Visibility {}

/// # Transform
///
/// Position, rotation, and scale of the entity.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Transform {
    /// Position of the transform.
    pub position: Vec3,
    /// Rotation of the transform.
    pub rotation: Quat,
    /// Scale of the transform.
    pub scale: Vec3,
}

impl Transform {
    /// Identity transform.
    pub const IDENTITY: Self = Self {
        position: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        scale: Vec3::ONE,
    };

    /// Returns a transform with the given position, rotation, and scale.
    pub const fn new(position: Vec3, rotation: Quat, scale: Vec3) -> Self {
        Self {
            position,
            rotation,
            scale,
        }
    }

    /// Returns a transform with the given position.
    pub const fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Self::IDENTITY
        }
    }

    /// Returns the model matrix, applying scale, then rotation, then translation.
    pub fn to_mat4(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.position)
    }

    /// Returns the rotated +X axis.
    pub fn right(&self) -> Vec3 {
        self.rotation * Vec3::X
    }

    /// Returns the rotated +Y axis.
    pub fn up(&self) -> Vec3 {
        self.rotation * Vec3::Y
    }

    /// Returns the rotated -Z axis.
    pub fn forward(&self) -> Vec3 {
        self.rotation * Vec3::NEG_Z
    }

    /// Rotates the transform around `axis` by `angle` radians.
    pub fn rotate_axis(&mut self, axis: Vec3, angle: f32) {
        self.rotation = (Quat::from_axis_angle(axis, angle) * self.rotation).normalize();
    }
}

impl Component for Transform {}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}
