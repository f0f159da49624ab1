/// Top-level CLI error. Every variant maps to a non-zero process exit
/// code; the renderer core itself never returns an error (see
/// `raytracer_core`'s module docs).
#[derive(thiserror::Error, Debug)]
pub enum CliError {
    #[error("scene file not found: {0}")]
    InputNotFound(std::path::PathBuf),

    #[error("failed to parse scene file: {0}")]
    Parse(String),

    #[error("failed to write output image: {0}")]
    OutputWrite(#[from] image::ImageError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for CliError {
    fn from(err: serde_json::Error) -> Self {
        CliError::Parse(err.to_string())
    }
}

impl From<raytracer_obj::ObjError> for CliError {
    fn from(err: raytracer_obj::ObjError) -> Self {
        CliError::Parse(err.to_string())
    }
}

impl From<raytracer_core::GeometryError> for CliError {
    fn from(err: raytracer_core::GeometryError) -> Self {
        CliError::Parse(err.to_string())
    }
}
