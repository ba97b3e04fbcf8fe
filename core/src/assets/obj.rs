//! Wavefront OBJ parsing
//!
//! Supports `v`, `vt`, `vn` and `f` records. Faces are fan-triangulated and
//! expanded to one vertex per corner. Texture v is flipped so image row 0 is
//! the top of the texture. Other records (`o`, `g`, `s`, `usemtl`, ...) are
//! skipped.

use std::path::Path;

use super::{AssetLoadError, MeshData};

/// Normal used for corners that reference none
const DEFAULT_NORMAL: [f32; 3] = [0.0, 1.0, 0.0];

/// Parse OBJ source text. `path` is only used for error messages.
pub fn parse_obj(source: &str, path: &Path) -> Result<MeshData, AssetLoadError> {
    let mut positions: Vec<[f32; 3]> = Vec::new();
    let mut tex_coords: Vec<[f32; 2]> = Vec::new();
    let mut normals: Vec<[f32; 3]> = Vec::new();
    let mut mesh = MeshData::default();

    for (index, line) in source.lines().enumerate() {
        let line_no = index + 1;
        let malformed = |reason: String| AssetLoadError::MalformedObj {
            path: path.to_path_buf(),
            line: line_no,
            reason,
        };

        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let mut parts = line.split_whitespace();
        let Some(tag) = parts.next() else {
            continue;
        };
        let args: Vec<&str> = parts.collect();

        match tag {
            "v" => positions.push(parse_floats::<3>(&args).map_err(malformed)?),
            "vn" => normals.push(parse_floats::<3>(&args).map_err(malformed)?),
            "vt" => {
                let [u, v] = parse_floats::<2>(&args).map_err(malformed)?;
                tex_coords.push([u, 1.0 - v]);
            }
            "f" => {
                if args.len() < 3 {
                    return Err(malformed(format!(
                        "face needs at least 3 corners, got {}",
                        args.len()
                    )));
                }
                let corners = args
                    .iter()
                    .map(|corner| {
                        parse_corner(corner, positions.len(), tex_coords.len(), normals.len())
                    })
                    .collect::<Result<Vec<_>, _>>()
                    .map_err(malformed)?;

                for i in 1..corners.len() - 1 {
                    for corner in [corners[0], corners[i], corners[i + 1]] {
                        mesh.indices.push(mesh.positions.len() as u32);
                        mesh.positions.push(positions[corner.position]);
                        mesh.uvs
                            .push(corner.uv.map_or([0.0, 0.0], |t| tex_coords[t]));
                        mesh.normals
                            .push(corner.normal.map_or(DEFAULT_NORMAL, |n| normals[n]));
                    }
                }
            }
            _ => {}
        }
    }

    if mesh.indices.is_empty() {
        return Err(AssetLoadError::EmptyMesh {
            path: path.to_path_buf(),
        });
    }
    Ok(mesh)
}

fn parse_floats<const N: usize>(args: &[&str]) -> Result<[f32; N], String> {
    if args.len() < N {
        return Err(format!("expected {} components, got {}", N, args.len()));
    }
    let mut out = [0.0; N];
    for (slot, arg) in out.iter_mut().zip(args) {
        *slot = arg
            .parse()
            .map_err(|_| format!("invalid number '{}'", arg))?;
    }
    Ok(out)
}

/// Resolved zero-based indices for one face corner
#[derive(Debug, Clone, Copy)]
struct Corner {
    position: usize,
    uv: Option<usize>,
    normal: Option<usize>,
}

/// Parse `v`, `v/vt`, `v//vn` or `v/vt/vn`
fn parse_corner(s: &str, positions: usize, uvs: usize, normals: usize) -> Result<Corner, String> {
    let mut fields = s.split('/');
    let position = match fields.next() {
        Some(field) if !field.is_empty() => resolve_index(field, positions, "position")?,
        _ => return Err(format!("corner '{}' has no position index", s)),
    };
    let uv = match fields.next() {
        Some(field) if !field.is_empty() => Some(resolve_index(field, uvs, "texture")?),
        _ => None,
    };
    let normal = match fields.next() {
        Some(field) if !field.is_empty() => Some(resolve_index(field, normals, "normal")?),
        _ => None,
    };
    Ok(Corner {
        position,
        uv,
        normal,
    })
}

/// OBJ indices are 1-based; negative indices count back from the end
fn resolve_index(field: &str, len: usize, kind: &str) -> Result<usize, String> {
    let raw: i64 = field
        .parse()
        .map_err(|_| format!("invalid {} index '{}'", kind, field))?;
    let resolved = match raw {
        0 => None,
        r if r > 0 => Some(r as usize - 1),
        r => len.checked_sub(r.unsigned_abs() as usize),
    };
    resolved
        .filter(|i| *i < len)
        .ok_or_else(|| format!("{} index {} out of range ({} defined)", kind, raw, len))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(source: &str) -> Result<MeshData, AssetLoadError> {
        parse_obj(source, Path::new("test.obj"))
    }

    const QUAD: &str = "\
# unit quad
o quad
v 0 0 0
v 1 0 0
v 1 0 1
v 0 0 1
vt 0 0
vt 1 0
vt 1 1
vt 0 1
vn 0 1 0
s off
f 1/1/1 2/2/1 3/3/1 4/4/1
";

    #[test]
    fn test_quad_is_fan_triangulated() {
        let mesh = parse(QUAD).unwrap();
        assert_eq!(mesh.triangle_count(), 2);
        assert_eq!(mesh.indices, vec![0, 1, 2, 3, 4, 5]);
        assert_eq!(mesh.positions[3], [0.0, 0.0, 0.0]);
        assert_eq!(mesh.positions[4], [1.0, 0.0, 1.0]);
        assert_eq!(mesh.positions[5], [0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_texture_v_is_flipped() {
        let mesh = parse(QUAD).unwrap();
        assert_eq!(mesh.uvs[0], [0.0, 1.0]);
        assert_eq!(mesh.uvs[2], [1.0, 0.0]);
    }

    #[test]
    fn test_corner_forms() {
        let source = "v 0 0 0\nv 1 0 0\nv 0 1 0\nvn 0 0 1\nf 1//1 2 -1//-1\n";
        let mesh = parse(source).unwrap();
        assert_eq!(mesh.triangle_count(), 1);
        assert_eq!(mesh.normals[0], [0.0, 0.0, 1.0]);
        assert_eq!(mesh.normals[1], DEFAULT_NORMAL);
        assert_eq!(mesh.positions[2], [0.0, 1.0, 0.0]);
        assert_eq!(mesh.uvs[0], [0.0, 0.0]);
    }

    #[test]
    fn test_out_of_range_index_reports_line() {
        let err = parse("v 0 0 0\nv 1 0 0\n\nf 1 2 3\n").unwrap_err();
        match err {
            AssetLoadError::MalformedObj { line, reason, .. } => {
                assert_eq!(line, 4);
                assert!(reason.contains("position index 3"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_bad_number_is_malformed() {
        let err = parse("v 0 zero 0\n").unwrap_err();
        assert!(matches!(err, AssetLoadError::MalformedObj { line: 1, .. }));
    }

    #[test]
    fn test_degenerate_face_is_malformed() {
        let err = parse("v 0 0 0\nv 1 0 0\nf 1 2\n").unwrap_err();
        assert!(matches!(err, AssetLoadError::MalformedObj { line: 3, .. }));
    }

    #[test]
    fn test_no_faces_is_empty() {
        let err = parse("v 0 0 0\n").unwrap_err();
        assert!(matches!(err, AssetLoadError::EmptyMesh { .. }));
    }
}
