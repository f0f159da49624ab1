/// Construction-time geometry validation failures. Numerical edge cases
/// encountered *during* rendering (parallel rays, near-zero denominators)
/// are never errors — they resolve to "no hit" and the pixel falls
/// through to black.
#[derive(thiserror::Error, Debug)]
pub enum GeometryError {
    #[error("sphere radius must be positive, got {0}")]
    NonPositiveRadius(f32),
    #[error("triangle is degenerate (zero area)")]
    DegenerateTriangle,
    #[error("normal vector has zero length")]
    ZeroLengthNormal,
}
