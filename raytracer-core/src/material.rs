use crate::types::V3;

/// Local (non-global) surface response: ambient + diffuse + specular,
/// plus a mirror-reflection coefficient consumed by `Scene::raycast`.
///
/// Deterministic by design — no scattering, no sampling — unlike the
/// teacher's Monte-Carlo `MatLambertian`/`MatSpecular`/`MatDielectric`,
/// which this supersedes.
#[derive(Clone, Copy, Debug)]
pub struct Material {
    pub c_ambient: V3,
    pub c_diffuse: V3,
    pub c_specular: V3,
    pub shininess: f32,
    pub c_reflection: f32,
}

impl Default for Material {
    fn default() -> Self {
        Material {
            c_ambient: V3::ZERO,
            c_diffuse: V3::ONE,
            c_specular: V3::ZERO,
            shininess: 1.0,
            c_reflection: 0.0,
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct PointLight {
    pub position: V3,
    pub color: V3,
    pub intensity: f32,
}
