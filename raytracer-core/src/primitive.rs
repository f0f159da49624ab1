use crate::aabb::Aabb;
use crate::transform::Transform;
use crate::types::{Ray, V3};

/// Stable index into `Scene`'s material table.
pub type MaterialId = usize;

/// Sidedness policy for an intersection query. See the original
/// `CullingType` in the reference scene graph: `Front` accepts a ray
/// entering the surface from outside, `Back` accepts one leaving it
/// (used for shadow rays cast from a hit point towards a light).
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Culling {
    Front,
    Back,
}

/// Sidedness epsilon used by Plane and Triangle intersection (matches the
/// reference implementation's `0.000001`).
const SIDE_EPSILON: f32 = 1e-6;

#[derive(Copy, Clone, Debug)]
pub struct Hit {
    pub position: V3,
    pub normal: V3,
    pub material: MaterialId,
}

/// A closed, tagged set of world-space primitives. Scene owns a dense
/// `Vec<Primitive>`; each variant already carries its baked world-space
/// geometry (produced by `Scene::prepare`), so no `Transform` is consulted
/// at intersection time.
#[derive(Clone, Debug)]
pub enum Primitive {
    Sphere {
        center: V3,
        radius: f32,
        material: MaterialId,
    },
    Plane {
        origin: V3,
        normal: V3,
        /// `Some(r)` turns the plane into a disk of radius `r`.
        radius: Option<f32>,
        material: MaterialId,
    },
    Triangle {
        a: V3,
        b: V3,
        c: V3,
        material: MaterialId,
    },
}

impl Primitive {
    pub fn material(&self) -> MaterialId {
        match *self {
            Primitive::Sphere { material, .. } => material,
            Primitive::Plane { material, .. } => material,
            Primitive::Triangle { material, .. } => material,
        }
    }

    /// An unbounded plane (no disk radius) has no finite bounding box and
    /// is excluded from the Bvh; `Scene` tests it directly instead.
    pub fn is_unbounded(&self) -> bool {
        matches!(self, Primitive::Plane { radius: None, .. })
    }

    /// World-space bounding box. Panics if called on an unbounded plane;
    /// callers must check `is_unbounded` first (mirrors the reference
    /// implementation's decision to exclude infinite planes from the
    /// tree rather than propagate `inf` bounding boxes through it).
    pub fn bounding_box(&self) -> Aabb {
        match *self {
            Primitive::Sphere { center, radius, .. } => {
                let r = V3(radius, radius, radius);
                Aabb::from_min_max(center - r, center + r)
            }
            Primitive::Plane {
                origin,
                radius: Some(radius),
                ..
            } => {
                let r = V3(radius, radius, radius);
                Aabb::from_min_max(origin - r, origin + r)
            }
            Primitive::Plane { radius: None, .. } => {
                panic!("bounding_box called on an unbounded plane")
            }
            Primitive::Triangle { a, b, c, .. } => Aabb::from_vertices([a, b, c]),
        }
    }

    pub fn intersect(&self, ray: &Ray, culling: Culling) -> Option<Hit> {
        match *self {
            Primitive::Sphere {
                center,
                radius,
                material,
            } => intersect_sphere(ray, center, radius, culling, material),
            Primitive::Plane {
                origin,
                normal,
                radius,
                material,
            } => intersect_plane(ray, origin, normal, radius, culling, material),
            Primitive::Triangle { a, b, c, material } => {
                intersect_triangle(ray, a, b, c, culling, material)
            }
        }
    }
}

fn intersect_sphere(
    ray: &Ray,
    center: V3,
    radius: f32,
    culling: Culling,
    material: MaterialId,
) -> Option<Hit> {
    let oc = ray.origin - center;
    let a = V3::dot(ray.direction, ray.direction);
    let b = V3::dot(oc, ray.direction);
    let c = V3::dot(oc, oc) - radius * radius;
    let discriminant = b * b - a * c;
    if discriminant < 0.0 {
        return None;
    }
    let sqrt_d = discriminant.sqrt();
    let t0 = (-b - sqrt_d) / a;
    let t1 = (-b + sqrt_d) / a;

    // `Front` culling: the ray is entering the sphere from outside, so we
    // want the smaller (first) positive root. `Back` culling: the ray is
    // leaving the sphere from inside, so we want the larger root.
    let t = match culling {
        Culling::Front => {
            if t0 > 0.0 {
                t0
            } else if t1 > 0.0 {
                t1
            } else {
                return None;
            }
        }
        Culling::Back => {
            if t1 > 0.0 {
                t1
            } else {
                return None;
            }
        }
    };

    let position = ray.point_at_parameter(t);
    let normal = (position - center).unit();
    Some(Hit {
        position,
        normal,
        material,
    })
}

/// Returns the ray parameter `t` at which it crosses the plane through
/// `origin` with unit `normal`, or `None` if parallel.
fn intersect_plane_t(ray: &Ray, origin: V3, normal: V3) -> Option<f32> {
    let denom = V3::dot(ray.direction, normal);
    if denom.abs() < SIDE_EPSILON {
        return None;
    }
    let numer = V3::dot(origin - ray.origin, normal);
    Some(numer / denom)
}

fn culling_rejects(denom: f32, culling: Culling) -> bool {
    match culling {
        Culling::Front => denom > -SIDE_EPSILON,
        Culling::Back => denom < SIDE_EPSILON,
    }
}

fn intersect_plane(
    ray: &Ray,
    origin: V3,
    normal: V3,
    radius: Option<f32>,
    culling: Culling,
    material: MaterialId,
) -> Option<Hit> {
    let denom = V3::dot(ray.direction, normal);
    if culling_rejects(denom, culling) {
        return None;
    }
    let t = intersect_plane_t(ray, origin, normal)?;
    if t <= 0.0 {
        return None;
    }
    let position = ray.point_at_parameter(t);
    if let Some(radius) = radius {
        if (origin - position).length() > radius {
            return None;
        }
    }
    Some(Hit {
        position,
        normal,
        material,
    })
}

fn intersect_triangle(
    ray: &Ray,
    a: V3,
    b: V3,
    c: V3,
    culling: Culling,
    material: MaterialId,
) -> Option<Hit> {
    let ba = b - a;
    let ca = c - a;
    let normal = V3::cross(ba, ca).unit();

    let denom = V3::dot(ray.direction, normal);
    if culling_rejects(denom, culling) {
        return None;
    }
    let t = intersect_plane_t(ray, a, normal)?;
    if t <= 0.0 {
        return None;
    }
    let q = ray.point_at_parameter(t);

    // Inside test: q must be on the "left" of every edge (cross product
    // aligned with the triangle's normal).
    if V3::dot(normal, V3::cross(ba, q - a)) < 0.0 {
        return None;
    }
    let cb = c - b;
    if V3::dot(normal, V3::cross(cb, q - b)) < 0.0 {
        return None;
    }
    let ac = a - c;
    if V3::dot(normal, V3::cross(ac, q - c)) < 0.0 {
        return None;
    }

    Some(Hit {
        position: q,
        normal,
        material,
    })
}

/// Object-space primitive description, paired with a `Transform` and
/// baked into a world-space `Primitive` by `Scene::prepare`.
#[derive(Clone, Debug)]
pub enum Shape {
    /// Unit sphere centered at the object-space origin, scaled by `radius`
    /// and the transform's uniform scale.
    Sphere { radius: f32 },
    /// Plane through the object-space origin with the given object-space
    /// normal; `radius` turns it into a disk.
    Plane { normal: V3, radius: Option<f32> },
    /// Triangle with object-space vertices.
    Triangle { a: V3, b: V3, c: V3 },
}

impl Shape {
    pub fn bake(&self, transform: &Transform, material: MaterialId) -> Primitive {
        match *self {
            Shape::Sphere { radius } => Primitive::Sphere {
                center: transform.apply(V3::ZERO),
                radius: radius * transform.scale().x(),
                material,
            },
            Shape::Plane { normal, radius } => Primitive::Plane {
                origin: transform.apply(V3::ZERO),
                normal: transform.apply_direction(normal).unit(),
                radius: radius.map(|r| r * transform.scale().x()),
                material,
            },
            Shape::Triangle { a, b, c } => Primitive::Triangle {
                a: transform.apply(a),
                b: transform.apply(b),
                c: transform.apply(c),
                material,
            },
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn sphere_hit_from_outside_picks_near_root() {
        let sphere = Primitive::Sphere {
            center: V3::ZERO,
            radius: 1.0,
            material: 0,
        };
        let ray = Ray::new(V3(0.0, 0.0, -5.0), V3(0.0, 0.0, 1.0));
        let hit = sphere.intersect(&ray, Culling::Front).unwrap();
        assert!((hit.position.z() - (-1.0)).abs() < 1e-5);
        assert!((hit.normal.z() - (-1.0)).abs() < 1e-5);
    }

    #[test]
    fn sphere_tangent_ray_has_perpendicular_normal() {
        let sphere = Primitive::Sphere {
            center: V3::ZERO,
            radius: 1.0,
            material: 0,
        };
        let ray = Ray::new(V3(0.0, 1.0, -5.0), V3(0.0, 0.0, 1.0));
        let hit = sphere.intersect(&ray, Culling::Front).unwrap();
        assert!(V3::dot(hit.normal, ray.direction).abs() < 1e-5);
    }

    #[test]
    fn plane_parallel_to_ray_misses() {
        let plane = Primitive::Plane {
            origin: V3::ZERO,
            normal: V3(0.0, 1.0, 0.0),
            radius: None,
            material: 0,
        };
        let ray = Ray::new(V3(0.0, 1.0, 0.0), V3(1.0, 0.0, 0.0));
        assert!(plane.intersect(&ray, Culling::Front).is_none());
    }

    #[test]
    fn triangle_center_ray_hits() {
        let tri = Primitive::Triangle {
            a: V3(-1.0, -1.0, 0.0),
            b: V3(1.0, -1.0, 0.0),
            c: V3(0.0, 1.0, 0.0),
            material: 0,
        };
        let ray = Ray::new(V3(0.0, -0.2, -5.0), V3(0.0, 0.0, 1.0));
        assert!(tri.intersect(&ray, Culling::Front).is_some());
    }

    #[test]
    fn triangle_outside_edge_misses() {
        let tri = Primitive::Triangle {
            a: V3(-1.0, -1.0, 0.0),
            b: V3(1.0, -1.0, 0.0),
            c: V3(0.0, 1.0, 0.0),
            material: 0,
        };
        let ray = Ray::new(V3(5.0, 5.0, -5.0), V3(0.0, 0.0, 1.0));
        assert!(tri.intersect(&ray, Culling::Front).is_none());
    }

    #[test]
    fn disk_plane_rejects_hit_outside_radius() {
        let plane = Primitive::Plane {
            origin: V3::ZERO,
            normal: V3(0.0, 0.0, 1.0),
            radius: Some(1.0),
            material: 0,
        };
        let ray = Ray::new(V3(5.0, 0.0, -5.0), V3(0.0, 0.0, 1.0));
        assert!(plane.intersect(&ray, Culling::Front).is_none());
    }
}
