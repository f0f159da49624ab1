use crate::bvh::{Bvh, BvhObject};
use crate::material::{Material, PointLight};
use crate::primitive::{Culling, Hit, MaterialId, Primitive, Shape};
use crate::transform::Transform;
use crate::types::{Ray, V3};

/// Self-intersection / early-exit epsilon, matching the original scene
/// graph's `COMPARE_ERROR_CONSTANT`.
pub const COMPARE_ERROR_CONSTANT: f32 = 1e-4;

impl BvhObject for Primitive {
    fn aabb(&self) -> crate::aabb::Aabb {
        self.bounding_box()
    }
}

/// Owns all scene data: primitives, materials, and lights. Built up via
/// `add_object`/`add_light`/`add_material`, then `prepare()`d once before
/// rendering (bakes transforms, builds the Bvh). Read-only afterwards —
/// safe to share (`&Scene`) across render worker threads.
pub struct Scene {
    materials: Vec<Material>,
    lights: Vec<PointLight>,
    pub global_ambient: V3,
    pub max_cast_count: u32,

    raw_objects: Vec<(Shape, Transform, MaterialId)>,

    /// Finite primitives, indexed by the Bvh.
    primitives: Vec<Primitive>,
    /// Unbounded planes (no disk radius): excluded from the Bvh, always
    /// tested directly (see the Plane/tree-membership Open Question).
    unbounded_planes: Vec<Primitive>,
    bvh: Option<Bvh>,
}

impl Scene {
    pub fn new() -> Self {
        Scene {
            materials: Vec::new(),
            lights: Vec::new(),
            global_ambient: V3::ZERO,
            max_cast_count: 5,
            raw_objects: Vec::new(),
            primitives: Vec::new(),
            unbounded_planes: Vec::new(),
            bvh: None,
        }
    }

    pub fn add_material(&mut self, material: Material) -> MaterialId {
        self.materials.push(material);
        self.materials.len() - 1
    }

    pub fn add_light(&mut self, light: PointLight) {
        self.lights.push(light);
    }

    pub fn add_object(&mut self, shape: Shape, transform: Transform, material: MaterialId) {
        self.raw_objects.push((shape, transform, material));
    }

    /// Bakes every object's `Transform` into world-space geometry and
    /// builds the Bvh over the finite (non-plane-unbounded) subset.
    /// Idempotent: safe to call again after adding more objects, which
    /// rebuilds the tree from scratch.
    pub fn prepare(&mut self) {
        self.primitives.clear();
        self.unbounded_planes.clear();

        for (shape, transform, material) in &self.raw_objects {
            let primitive = shape.bake(transform, *material);
            if primitive.is_unbounded() {
                self.unbounded_planes.push(primitive);
            } else {
                self.primitives.push(primitive);
            }
        }

        self.bvh = if self.primitives.is_empty() {
            None
        } else {
            Some(Bvh::build(&self.primitives))
        };

        log::info!(
            "Scene prepared: {} tree primitives, {} unbounded planes, {} lights",
            self.primitives.len(),
            self.unbounded_planes.len(),
            self.lights.len()
        );
    }

    /// Finds the closest intersection along `ray`, optionally bounded to
    /// `max_distance` (used for shadow rays, bounded to the distance to
    /// the light being tested).
    pub fn closest_intersection_bounded(
        &self,
        ray: &Ray,
        culling: Culling,
        max_distance: Option<f32>,
    ) -> Option<Hit> {
        let max_distance_sq = max_distance.map(|d| d * d);
        let mut best_d_sq: f32 = -1.0;
        let mut best_hit: Option<Hit> = None;

        macro_rules! consider {
            ($p:expr) => {
                if let Some(hit) = $p.intersect(ray, culling) {
                    let d_sq = (hit.position - ray.origin).length_squared();
                    let within_bound = max_distance_sq.map_or(true, |m| d_sq < m);
                    if within_bound && (best_d_sq < 0.0 || d_sq < best_d_sq) {
                        best_d_sq = d_sq;
                        best_hit = Some(hit);
                    }
                }
            };
        }

        'search: {
            match &self.bvh {
                Some(bvh) => {
                    for candidate in bvh.candidates(ray) {
                        let p = &self.primitives[candidate.object_index];
                        consider!(p);
                        if best_d_sq >= 0.0 && best_d_sq < COMPARE_ERROR_CONSTANT {
                            break 'search;
                        }
                    }
                }
                None => {
                    for p in &self.primitives {
                        if !p.bounding_box().intersects(ray) {
                            continue;
                        }
                        consider!(p);
                        if best_d_sq >= 0.0 && best_d_sq < COMPARE_ERROR_CONSTANT {
                            break 'search;
                        }
                    }
                }
            }
            for p in &self.unbounded_planes {
                consider!(p);
                if best_d_sq >= 0.0 && best_d_sq < COMPARE_ERROR_CONSTANT {
                    break 'search;
                }
            }
        }

        best_hit
    }

    pub fn closest_intersection(&self, ray: &Ray, culling: Culling) -> Option<Hit> {
        self.closest_intersection_bounded(ray, culling, None)
    }

    /// Same candidate scan as `closest_intersection`, but ignores the Bvh
    /// entirely — used by tests to assert tree/brute-force equivalence.
    pub fn closest_intersection_brute_force(&self, ray: &Ray, culling: Culling) -> Option<Hit> {
        let mut best_d_sq: f32 = -1.0;
        let mut best_hit: Option<Hit> = None;
        for p in self.primitives.iter().chain(self.unbounded_planes.iter()) {
            if let Some(hit) = p.intersect(ray, culling) {
                let d_sq = (hit.position - ray.origin).length_squared();
                if best_d_sq < 0.0 || d_sq < best_d_sq {
                    best_d_sq = d_sq;
                    best_hit = Some(hit);
                }
            }
        }
        best_hit
    }

    /// Whether a point is in shadow with respect to `light`: true if
    /// anything lies between `position` and the light, tested with
    /// `Culling::Back` and bounded to the distance to the light.
    fn in_shadow(&self, position: V3, light: &PointLight) -> bool {
        let to_light = light.position - position;
        let distance = to_light.length();
        if distance == 0.0 {
            return false;
        }
        let origin = position + to_light.unit() * COMPARE_ERROR_CONSTANT;
        let shadow_ray = Ray::new(origin, to_light);
        self.closest_intersection_bounded(&shadow_ray, Culling::Back, Some(distance))
            .is_some()
    }

    /// Local Blinn-Phong-style shading: ambient (unconditional, once) plus
    /// per-light diffuse and specular, each zeroed if the light is
    /// shadowed. Does not include the reflection term — `raycast` adds
    /// that separately.
    fn shade(&self, hit: &Hit, view: V3) -> V3 {
        let material = &self.materials[hit.material];
        let mut color = material.c_ambient * self.global_ambient;

        for light in &self.lights {
            if self.in_shadow(hit.position, light) {
                continue;
            }
            let to_light = (light.position - hit.position).unit();
            let n_dot_l = V3::dot(hit.normal, to_light).max(0.0);
            if n_dot_l <= 0.0 {
                continue;
            }
            let diffuse = material.c_diffuse * light.color * (light.intensity * n_dot_l);

            let reflected = (-to_light).reflect(hit.normal);
            let spec_base = V3::dot(reflected, view).max(0.0);
            let specular = if spec_base > 0.0 {
                material.c_specular * light.color * (light.intensity * spec_base.powf(material.shininess))
            } else {
                V3::ZERO
            };

            color = color + diffuse + specular;
        }

        color
    }

    /// Casts a ray into the scene and evaluates its radiance: local
    /// shading at the closest hit, plus recursive mirror reflection while
    /// `cast_count < max_cast_count` and the hit material reflects.
    pub fn raycast(&self, ray: &Ray, camera_ray: &Ray, cast_count: u32) -> V3 {
        let hit = match self.closest_intersection(ray, Culling::Front) {
            Some(hit) => hit,
            None => return V3::ZERO,
        };

        let view = (camera_ray.origin - hit.position).unit();
        let mut color = self.shade(&hit, view);

        let material = &self.materials[hit.material];
        if cast_count < self.max_cast_count && material.c_reflection > 0.0 {
            let reflect_dir = ray.direction.reflect(hit.normal);
            let origin = hit.position + reflect_dir * COMPARE_ERROR_CONSTANT;
            let reflect_ray = Ray::new(origin, reflect_dir);
            let reflected = self.raycast(&reflect_ray, camera_ray, cast_count + 1);
            color = color + reflected * material.c_reflection;
        }

        color
    }
}

impl Default for Scene {
    fn default() -> Self {
        Scene::new()
    }
}
