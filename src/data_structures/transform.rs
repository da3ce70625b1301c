//! Per-draw model transforms.
//!
//! A [`Transform`] is built for every draw call, turned into a model matrix and
//! pushed to the shader straight away. Nothing keeps it afterwards.

use cgmath::{Deg, Matrix4, Vector3};

use crate::shader::{UniformSink, names};

/// Scale, Euler rotation in degrees and translation for a single draw.
///
/// The matrix is composed as `T * Rz * Ry * Rx * S`: scale first, then rotate
/// about X, Y and Z (in that order) around the origin, then translate. Any
/// other order changes the result for non-uniform scales or combined
/// rotations.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub scale: Vector3<f32>,
    pub rotation_degrees: Vector3<f32>,
    pub translation: Vector3<f32>,
}

impl Transform {
    pub fn new(
        scale: impl Into<Vector3<f32>>,
        rotation_degrees: impl Into<Vector3<f32>>,
        translation: impl Into<Vector3<f32>>,
    ) -> Self {
        Self {
            scale: scale.into(),
            rotation_degrees: rotation_degrees.into(),
            translation: translation.into(),
        }
    }

    /// Unrotated transform, the common case in the desk scene.
    pub fn scaled_at(scale: impl Into<Vector3<f32>>, translation: impl Into<Vector3<f32>>) -> Self {
        Self::new(scale, (0.0, 0.0, 0.0), translation)
    }

    pub fn with_rotation(mut self, x: f32, y: f32, z: f32) -> Self {
        self.rotation_degrees = Vector3::new(x, y, z);
        self
    }

    pub fn to_matrix(&self) -> Matrix4<f32> {
        let scale = Matrix4::from_nonuniform_scale(self.scale.x, self.scale.y, self.scale.z);
        let rotation_x = Matrix4::from_angle_x(Deg(self.rotation_degrees.x));
        let rotation_y = Matrix4::from_angle_y(Deg(self.rotation_degrees.y));
        let rotation_z = Matrix4::from_angle_z(Deg(self.rotation_degrees.z));
        let translation = Matrix4::from_translation(self.translation);

        translation * rotation_z * rotation_y * rotation_x * scale
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::new((1.0, 1.0, 1.0), (0.0, 0.0, 0.0), (0.0, 0.0, 0.0))
    }
}

/// Build the model matrix for `transform` and write it to the `model` uniform.
pub fn set_transformations<S: UniformSink + ?Sized>(sink: &mut S, transform: &Transform) {
    sink.set_mat4(names::MODEL, transform.to_matrix());
}
