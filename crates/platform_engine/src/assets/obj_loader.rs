//! OBJ file loader for 3D models
//!
//! Only vertex positions and (triangulated) faces are consumed; the run-time
//! core needs geometry for collision proxies, not shading attributes.

use super::{AssetError, Mesh};
use crate::foundation::math::Vec3;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use thiserror::Error;

/// OBJ parsing errors
#[derive(Error, Debug)]
pub enum ObjError {
    /// Underlying file I/O failure
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A line did not parse as valid OBJ data
    #[error("parse error: {0}")]
    ParseError(String),
}

/// Load an OBJ file and return a mesh
pub fn load_obj<P: AsRef<Path>>(path: P) -> Result<Mesh, AssetError> {
    let path = path.as_ref();
    let name = path.to_string_lossy().to_string();
    parse_obj(path).map_err(|source| AssetError::ImportFailed {
        path: name.clone(),
        source,
    })
    .and_then(|(positions, indices)| Mesh::new(&name, positions, indices))
}

fn parse_obj(path: &Path) -> Result<(Vec<Vec3>, Vec<u32>), ObjError> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);

    let mut positions = Vec::new();
    let mut indices = Vec::new();

    for line in reader.lines() {
        let line = line?;
        let line = line.trim();

        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let parts: Vec<&str> = line.split_whitespace().collect();
        match parts[0] {
            "v" => {
                if parts.len() < 4 {
                    return Err(ObjError::ParseError(format!(
                        "vertex line has too few components: '{line}'"
                    )));
                }
                let x: f32 = parts[1]
                    .parse()
                    .map_err(|_| ObjError::ParseError("invalid vertex x".to_string()))?;
                let y: f32 = parts[2]
                    .parse()
                    .map_err(|_| ObjError::ParseError("invalid vertex y".to_string()))?;
                let z: f32 = parts[3]
                    .parse()
                    .map_err(|_| ObjError::ParseError("invalid vertex z".to_string()))?;
                positions.push(Vec3::new(x, y, z));
            }
            "f" => {
                if parts.len() < 4 {
                    return Err(ObjError::ParseError(format!(
                        "face line has too few vertices: '{line}'"
                    )));
                }
                let mut face = Vec::with_capacity(parts.len() - 1);
                for vertex_data in &parts[1..] {
                    // "pos", "pos/tex" and "pos/tex/norm" all start with
                    // the 1-based position index
                    let position_field = vertex_data
                        .split('/')
                        .next()
                        .unwrap_or_default();
                    let pos_idx: u32 = position_field
                        .parse()
                        .map_err(|_| ObjError::ParseError("invalid position index".to_string()))?;
                    if pos_idx == 0 {
                        return Err(ObjError::ParseError(
                            "position index must be 1-based".to_string(),
                        ));
                    }
                    face.push(pos_idx - 1);
                }
                // Fan-triangulate polygons with more than three vertices
                for i in 1..face.len() - 1 {
                    indices.push(face[0]);
                    indices.push(face[i]);
                    indices.push(face[i + 1]);
                }
            }
            // Normals, texture coordinates, groups and materials are ignored
            _ => {}
        }
    }

    Ok((positions, indices))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp_obj(contents: &str) -> std::path::PathBuf {
        let mut path = std::env::temp_dir();
        path.push(format!("platform_engine_test_{}.obj", std::process::id()));
        let mut file = File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_load_triangle() {
        let path = write_temp_obj(
            "# comment\nv 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n",
        );
        let mesh = load_obj(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(mesh.vertex_count(), 3);
        assert_eq!(mesh.triangle_count(), 1);
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let result = load_obj("definitely/not/here.obj");
        assert!(matches!(result, Err(AssetError::ImportFailed { .. })));
    }
}
