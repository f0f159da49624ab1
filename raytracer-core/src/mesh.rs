use crate::primitive::{MaterialId, Shape};
use crate::types::V3;

/// A loader-side aggregate: an ordered sequence of object-space triangles
/// sharing one transform and material. Never itself an intersection
/// target — `decompose` flattens it into standalone `Shape::Triangle`
/// entries before the Bvh is built, so the tree's leaf granularity stays
/// uniform (see the mesh-decomposition Design Note).
#[derive(Clone, Debug, Default)]
pub struct MeshData {
    pub triangles: Vec<(V3, V3, V3)>,
}

impl MeshData {
    pub fn new(triangles: Vec<(V3, V3, V3)>) -> Self {
        MeshData { triangles }
    }

    /// Flattens this mesh into one `(Shape, MaterialId)` pair per
    /// constituent triangle, ready to be baked by `Scene::prepare`.
    pub fn decompose(&self, material: MaterialId) -> impl Iterator<Item = (Shape, MaterialId)> + '_ {
        self.triangles
            .iter()
            .map(move |&(a, b, c)| (Shape::Triangle { a, b, c }, material))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn decompose_yields_one_shape_per_triangle() {
        let mesh = MeshData::new(vec![
            (V3::ZERO, V3(1.0, 0.0, 0.0), V3(0.0, 1.0, 0.0)),
            (V3::ZERO, V3(0.0, 0.0, 1.0), V3(1.0, 0.0, 0.0)),
        ]);
        let shapes: Vec<_> = mesh.decompose(3).collect();
        assert_eq!(shapes.len(), 2);
        assert!(shapes.iter().all(|(_, m)| *m == 3));
    }
}
