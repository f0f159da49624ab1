use crate::matrix::{Matrix, MatrixBuilder};
use crate::types::V3;

/// A full affine transform, baked once into a single matrix at construction.
///
/// Unlike the teacher's `Translated<T>`/`Rotated<T>` wrapper combinators,
/// which transform the incoming ray into object space per-hit and the
/// resulting hit back into world space, this bakes world-space geometry
/// once at `Scene::prepare` time: cheaper per-ray, and the approach the
/// original scene graph uses (`SceneObject::applyTransform`).
#[derive(Copy, Clone)]
pub struct Transform {
    matrix: Matrix,
    /// Scale/rotation only, no translation — for transforming direction vectors (normals).
    linear: Matrix,
    position: V3,
    scale: V3,
}

impl Transform {
    pub fn new(position: V3, rotation: V3, scale: V3) -> Self {
        // Composition order matches `MatrixBuilder`: scale, then rotate
        // (X, then Y, then Z), then translate.
        let linear = MatrixBuilder::new()
            .scale(scale.x(), scale.y(), scale.z())
            .rotate_x(rotation.x())
            .rotate_y(rotation.y())
            .rotate_z(rotation.z())
            .done();
        let matrix = linear * Matrix::translate(position.x(), position.y(), position.z());
        Transform {
            matrix,
            linear,
            position,
            scale,
        }
    }

    pub fn identity() -> Self {
        Transform::new(V3::ZERO, V3::ZERO, V3::ONE)
    }

    pub fn apply(&self, point: V3) -> V3 {
        point * self.matrix
    }

    /// Transforms a direction vector (normal), ignoring translation.
    /// Assumes uniform (or axis-aligned) scale; non-uniform scale would
    /// require the inverse-transpose, which this renderer does not need.
    pub fn apply_direction(&self, direction: V3) -> V3 {
        direction * self.linear
    }

    pub fn position(&self) -> V3 {
        self.position
    }

    pub fn scale(&self) -> V3 {
        self.scale
    }
}

impl Default for Transform {
    fn default() -> Self {
        Transform::identity()
    }
}
