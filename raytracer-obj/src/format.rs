use std::io::{BufRead, BufReader, Read};

use raytracer_core::{MeshData, V3};

use crate::ObjError;

// Obj parser
//
// TODO(benf): Support other features of the OBJ format
// - Vertex normals, texture coordinates, materials
//
// See: https://en.wikipedia.org/wiki/Wavefront_.obj_file
// This parser does not implement the spec correctly and makes some
// assumptions:
// - every vertex has three components `v x y z`
// - every face has three components `f a b c` (triangles only)
// - faces reference vertex positions only; any `vt`/`vn` slots in
//   `a/b/c` indices are parsed (to stay compatible with exported files)
//   but discarded

#[derive(Default, Copy, Clone)]
struct ObjVertexRef {
    vertex_index: usize,
}

#[derive(thiserror::Error, Debug)]
pub enum VertexRefParseError {
    #[error("face vertex: unexpected number of parts")]
    UnexpectedPartCount,
    #[error("face vertex: invalid integer")]
    ParseIntError(#[from] std::num::ParseIntError),
}

impl std::str::FromStr for ObjVertexRef {
    type Err = VertexRefParseError;
    fn from_str(s: &str) -> Result<Self, VertexRefParseError> {
        // Parses vertex references of the form `v/vt?/vn?`, keeping only `v`.
        let mut parts = s.split('/');
        let vertex_index = match parts.next() {
            None => return Err(VertexRefParseError::UnexpectedPartCount),
            Some(v) => v.parse()?,
        };
        if parts.clone().count() > 2 {
            return Err(VertexRefParseError::UnexpectedPartCount);
        }
        Ok(ObjVertexRef { vertex_index })
    }
}

fn try_parse_elements<T, const N: usize>(line: &str) -> Option<[T; N]>
where
    T: std::str::FromStr,
    T: Default,
    T: Copy,
{
    let mut values = [Default::default(); N];
    let mut parts = line.split(char::is_whitespace).filter(|p| !p.is_empty());
    for value in values.iter_mut() {
        let part = parts.next()?;
        *value = part.parse().ok()?;
    }
    if parts.next().is_some() {
        return None;
    }
    Some(values)
}

#[derive(Default)]
struct ObjParseState {
    vertices: Vec<V3>,
    triangles: Vec<(V3, V3, V3)>,
}

impl ObjParseState {
    fn vertex_at(&self, line_no: usize, one_based_index: usize) -> Result<V3, ObjError> {
        one_based_index
            .checked_sub(1)
            .and_then(|i| self.vertices.get(i))
            .copied()
            .ok_or_else(|| {
                ObjError::General(format!(
                    "face on line {line_no} references undefined vertex {one_based_index}"
                ))
            })
    }
}

/// Parses the `v` and `f` directives of a Wavefront OBJ stream into a flat
/// list of world-space (object-space, really — the caller applies a
/// `Transform`) triangles. All other directives (`vt`, `vn`, `g`, `usemtl`,
/// `mtllib`, ...) are ignored.
pub fn parse_obj(source: &mut dyn Read) -> Result<MeshData, ObjError> {
    let mut state = ObjParseState::default();

    for (line_no, line) in BufReader::new(source).lines().enumerate() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        match line.split_once(' ') {
            Some(("v", data)) => {
                let [x, y, z]: [f32; 3] = try_parse_elements(data).ok_or_else(|| {
                    ObjError::General(format!("unable to parse vertex on line {line_no}: {data}"))
                })?;
                state.vertices.push(V3(x, y, z));
            }
            Some(("f", data)) => {
                let [a, b, c]: [ObjVertexRef; 3] = try_parse_elements(data).ok_or_else(|| {
                    ObjError::General(format!("unable to parse face on line {line_no}: {data}"))
                })?;
                let a = state.vertex_at(line_no, a.vertex_index)?;
                let b = state.vertex_at(line_no, b.vertex_index)?;
                let c = state.vertex_at(line_no, c.vertex_index)?;
                state.triangles.push((a, b, c));
            }
            _ => {}
        }
    }

    Ok(MeshData::new(state.triangles))
}
