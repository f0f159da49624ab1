use crate::types::{Ray, V3};

/// Minimum direction-component magnitude below which an axis is treated
/// as parallel to the ray rather than divided through.
const PARALLEL_EPSILON: f32 = 1e-12;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Aabb {
    pub min: V3,
    pub max: V3,
}

impl Aabb {
    pub fn from_min_max(min: V3, max: V3) -> Aabb {
        Aabb { min, max }
    }

    /// Finds the axis-aligned bounding box which fully contains the given sequence of vertices.
    pub fn from_vertices(vertices: impl IntoIterator<Item = V3>) -> Aabb {
        let mut iter = vertices.into_iter();
        let mut min = iter.next().expect("Aabb::from_vertices: empty vertex list");
        let mut max = min;
        for v in iter {
            min.0 = f32::min(min.0, v.0);
            min.1 = f32::min(min.1, v.1);
            min.2 = f32::min(min.2, v.2);
            max.0 = f32::max(max.0, v.0);
            max.1 = f32::max(max.1, v.1);
            max.2 = f32::max(max.2, v.2);
        }
        Aabb { min, max }
    }

    /// Widens this box (in place) so that it also contains `other`.
    pub fn subsume(&mut self, other: &Aabb) {
        self.min.0 = f32::min(self.min.0, other.min.0);
        self.min.1 = f32::min(self.min.1, other.min.1);
        self.min.2 = f32::min(self.min.2, other.min.2);
        self.max.0 = f32::max(self.max.0, other.max.0);
        self.max.1 = f32::max(self.max.1, other.max.1);
        self.max.2 = f32::max(self.max.2, other.max.2);
    }

    pub fn surrounding(a: &Aabb, b: &Aabb) -> Aabb {
        let mut out = *a;
        out.subsume(b);
        out
    }

    pub fn centroid(&self) -> V3 {
        (self.min + self.max) * 0.5
    }

    pub fn corners(&self) -> [V3; 8] {
        [
            self.min,
            V3(self.min.0, self.min.1, self.max.2),
            V3(self.min.0, self.max.1, self.min.2),
            V3(self.max.0, self.min.1, self.min.2),
            self.max,
            V3(self.max.0, self.max.1, self.min.2),
            V3(self.max.0, self.min.1, self.max.2),
            V3(self.min.0, self.max.1, self.max.2),
        ]
    }

    /// Slab test. Axes whose ray-direction component is (near) zero are
    /// treated as parallel to that slab: the test fails unless the ray
    /// origin already lies within the slab's bounds on that axis.
    pub fn intersects(&self, ray: &Ray) -> bool {
        let origin = ray.origin.xyz();
        let direction = ray.direction.xyz();
        let min = self.min.xyz();
        let max = self.max.xyz();

        let mut t_min = 0.0f32;
        let mut t_max = f32::INFINITY;

        for axis in 0..3 {
            if direction[axis].abs() < PARALLEL_EPSILON {
                if origin[axis] < min[axis] || origin[axis] > max[axis] {
                    return false;
                }
                continue;
            }
            let inv_d = 1.0 / direction[axis];
            let mut t0 = (min[axis] - origin[axis]) * inv_d;
            let mut t1 = (max[axis] - origin[axis]) * inv_d;
            if inv_d < 0.0 {
                std::mem::swap(&mut t0, &mut t1);
            }
            t_min = t_min.max(t0);
            t_max = t_max.min(t1);
            if t_max < t_min {
                return false;
            }
        }

        true
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn ray_through_box_hits() {
        let b = Aabb::from_min_max(V3(-1.0, -1.0, -1.0), V3(1.0, 1.0, 1.0));
        let r = Ray::new(V3(0.0, 0.0, -5.0), V3(0.0, 0.0, 1.0));
        assert!(b.intersects(&r));
    }

    #[test]
    fn ray_missing_box_misses() {
        let b = Aabb::from_min_max(V3(-1.0, -1.0, -1.0), V3(1.0, 1.0, 1.0));
        let r = Ray::new(V3(5.0, 5.0, -5.0), V3(0.0, 0.0, 1.0));
        assert!(!b.intersects(&r));
    }

    #[test]
    fn ray_behind_box_misses() {
        let b = Aabb::from_min_max(V3(-1.0, -1.0, -1.0), V3(1.0, 1.0, 1.0));
        let r = Ray::new(V3(0.0, 0.0, -5.0), V3(0.0, 0.0, -1.0));
        assert!(!b.intersects(&r));
    }

    #[test]
    fn axis_parallel_ray_inside_slab_hits() {
        let b = Aabb::from_min_max(V3(-1.0, -1.0, -1.0), V3(1.0, 1.0, 1.0));
        // Direction has zero z component; origin z is within [-1, 1].
        let r = Ray::new(V3(-5.0, 0.0, 0.0), V3(1.0, 0.0, 0.0));
        assert!(b.intersects(&r));
    }

    #[test]
    fn axis_parallel_ray_outside_slab_misses() {
        let b = Aabb::from_min_max(V3(-1.0, -1.0, -1.0), V3(1.0, 1.0, 1.0));
        let r = Ray::new(V3(-5.0, 5.0, 0.0), V3(1.0, 0.0, 0.0));
        assert!(!b.intersects(&r));
    }

    #[test]
    fn subsume_widens_box() {
        let mut a = Aabb::from_min_max(V3(0.0, 0.0, 0.0), V3(1.0, 1.0, 1.0));
        let b = Aabb::from_min_max(V3(-1.0, -1.0, -1.0), V3(0.5, 0.5, 0.5));
        a.subsume(&b);
        assert_eq!(a.min, V3(-1.0, -1.0, -1.0));
        assert_eq!(a.max, V3(1.0, 1.0, 1.0));
    }
}
