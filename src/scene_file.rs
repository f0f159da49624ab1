use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;

use raytracer_core::{Camera, GeometryError, Material, MaterialId, PointLight, Scene, Shape, Transform, V3};

use crate::error::CliError;

fn v3(a: [f32; 3]) -> V3 {
    V3(a[0], a[1], a[2])
}

fn default_camera_position() -> [f32; 3] {
    [0.0, 0.0, -1.0]
}

fn default_reflections() -> u32 {
    5
}

fn default_diffuse() -> [f32; 3] {
    [1.0, 1.0, 1.0]
}

fn default_shininess() -> f32 {
    1.0
}

#[derive(Deserialize)]
struct CameraFile {
    #[serde(default = "default_camera_position")]
    position: [f32; 3],
    #[serde(default = "default_reflections")]
    reflections: u32,
}

impl Default for CameraFile {
    fn default() -> Self {
        CameraFile {
            position: default_camera_position(),
            reflections: default_reflections(),
        }
    }
}

#[derive(Deserialize)]
struct ImageFile {
    width: u32,
    height: u32,
}

#[derive(Deserialize, Default)]
struct TransformFile {
    #[serde(default)]
    position: Option<[f32; 3]>,
    #[serde(default)]
    rotation: Option<[f32; 3]>,
    #[serde(default)]
    scale: Option<[f32; 3]>,
}

impl TransformFile {
    fn to_transform(&self) -> Transform {
        Transform::new(
            self.position.map(v3).unwrap_or(V3::ZERO),
            self.rotation.map(v3).unwrap_or(V3::ZERO),
            self.scale.map(v3).unwrap_or(V3::ONE),
        )
    }
}

#[derive(Deserialize)]
struct LightFile {
    position: [f32; 3],
    color: [f32; 3],
    intensity: f32,
}

#[derive(Deserialize)]
struct MaterialFile {
    #[serde(default)]
    ambient: [f32; 3],
    #[serde(default = "default_diffuse")]
    diffuse: [f32; 3],
    #[serde(default)]
    specular: [f32; 3],
    #[serde(default = "default_shininess")]
    shininess: f32,
    #[serde(default)]
    reflection: f32,
}

#[derive(Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum ObjectFile {
    Sphere {
        #[serde(default)]
        transform: TransformFile,
        material: String,
        radius: f32,
    },
    Plane {
        #[serde(default)]
        transform: TransformFile,
        material: String,
        normal: [f32; 3],
        #[serde(default)]
        radius: Option<f32>,
    },
    Triangle {
        #[serde(default)]
        transform: TransformFile,
        material: String,
        vertices: [[f32; 3]; 3],
    },
    Mesh {
        #[serde(default)]
        transform: TransformFile,
        material: String,
        obj: String,
    },
}

#[derive(Deserialize)]
struct SceneFile {
    #[serde(default)]
    camera: CameraFile,
    image: ImageFile,
    #[serde(rename = "globalAmbient", default)]
    global_ambient: [f32; 3],
    #[serde(default)]
    lights: Vec<LightFile>,
    #[serde(default)]
    materials: HashMap<String, MaterialFile>,
    #[serde(default)]
    objects: Vec<ObjectFile>,
}

fn resolve_material(ids: &HashMap<String, MaterialId>, name: &str) -> Result<MaterialId, CliError> {
    ids.get(name)
        .copied()
        .ok_or_else(|| CliError::Parse(format!("object references undefined material '{name}'")))
}

fn check_sphere_radius(radius: f32) -> Result<(), GeometryError> {
    if radius <= 0.0 {
        return Err(GeometryError::NonPositiveRadius(radius));
    }
    Ok(())
}

fn check_plane_normal(normal: V3) -> Result<(), GeometryError> {
    if normal.length_squared() == 0.0 {
        return Err(GeometryError::ZeroLengthNormal);
    }
    Ok(())
}

fn check_triangle(a: V3, b: V3, c: V3) -> Result<(), GeometryError> {
    if V3::cross(b - a, c - a).length_squared() == 0.0 {
        return Err(GeometryError::DegenerateTriangle);
    }
    Ok(())
}

/// Loads a JSON scene description from `path`, building both the `Scene`
/// (already `prepare()`d) and the `Camera` it describes. `.obj` mesh
/// paths referenced by `mesh` objects are resolved relative to the scene
/// file's own directory.
pub fn load_scene(path: impl AsRef<Path>) -> Result<(Scene, Camera), CliError> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(CliError::InputNotFound(path.to_path_buf()));
    }

    let text = std::fs::read_to_string(path)?;
    let file: SceneFile = serde_json::from_str(&text)?;
    let base_dir = path.parent().unwrap_or_else(|| Path::new("."));

    let mut scene = Scene::new();
    scene.global_ambient = v3(file.global_ambient);
    scene.max_cast_count = file.camera.reflections;

    for light in &file.lights {
        scene.add_light(PointLight {
            position: v3(light.position),
            color: v3(light.color),
            intensity: light.intensity,
        });
    }

    let mut material_ids = HashMap::new();
    for (name, mat) in &file.materials {
        let id = scene.add_material(Material {
            c_ambient: v3(mat.ambient),
            c_diffuse: v3(mat.diffuse),
            c_specular: v3(mat.specular),
            shininess: mat.shininess,
            c_reflection: mat.reflection,
        });
        material_ids.insert(name.clone(), id);
    }

    for object in &file.objects {
        match object {
            ObjectFile::Sphere {
                transform,
                material,
                radius,
            } => {
                check_sphere_radius(*radius)?;
                let material_id = resolve_material(&material_ids, material)?;
                scene.add_object(
                    Shape::Sphere { radius: *radius },
                    transform.to_transform(),
                    material_id,
                );
            }
            ObjectFile::Plane {
                transform,
                material,
                normal,
                radius,
            } => {
                let normal = v3(*normal);
                check_plane_normal(normal)?;
                let material_id = resolve_material(&material_ids, material)?;
                scene.add_object(
                    Shape::Plane {
                        normal,
                        radius: *radius,
                    },
                    transform.to_transform(),
                    material_id,
                );
            }
            ObjectFile::Triangle {
                transform,
                material,
                vertices,
            } => {
                let [a, b, c] = *vertices;
                let (a, b, c) = (v3(a), v3(b), v3(c));
                check_triangle(a, b, c)?;
                let material_id = resolve_material(&material_ids, material)?;
                scene.add_object(Shape::Triangle { a, b, c }, transform.to_transform(), material_id);
            }
            ObjectFile::Mesh {
                transform,
                material,
                obj,
            } => {
                let material_id = resolve_material(&material_ids, material)?;
                let mesh = raytracer_obj::load_mesh(base_dir.join(obj))?;
                let transform = transform.to_transform();
                for (shape, mat) in mesh.decompose(material_id) {
                    scene.add_object(shape, transform, mat);
                }
            }
        }
    }

    scene.prepare();

    let camera = Camera::new(v3(file.camera.position), file.image.width, file.image.height);
    Ok((scene, camera))
}
