mod format;

use std::path::Path;

use raytracer_core::MeshData;

pub use format::parse_obj;

#[derive(thiserror::Error, Debug)]
pub enum ObjError {
    #[error("error parsing OBJ file: {0}")]
    General(String),
    #[error("IO error reading OBJ file")]
    IoError(#[from] std::io::Error),
}

/// Loads and parses an OBJ file from disk into a `MeshData`.
pub fn load_mesh(path: impl AsRef<Path>) -> Result<MeshData, ObjError> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(ObjError::General(format!(
            "expected OBJ file at path {}",
            path.display()
        )));
    }
    let mut file = std::fs::File::open(path)?;
    let mesh = parse_obj(&mut file)?;
    log::debug!("loaded {} triangles from {}", mesh.triangles.len(), path.display());
    Ok(mesh)
}
