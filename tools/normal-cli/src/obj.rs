//! OBJ loading into a mesh snapshot
//!
//! Faces are kept as polygons (no triangulation). Only `v`, `vt` and `f`
//! records are read; everything else is ignored.

use anyhow::{Context, Result, bail};
use glam::{Vec2, Vec3};
use normal_core::MeshSnapshot;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Load an OBJ file
pub fn load_obj(input: &Path) -> Result<MeshSnapshot> {
    let file = File::open(input).with_context(|| format!("Failed to open OBJ: {:?}", input))?;
    parse_obj(BufReader::new(file)).with_context(|| format!("Failed to parse OBJ: {:?}", input))
}

/// Parse OBJ text.
///
/// When any face references texture coordinates the mesh gets a UV layer;
/// faces without them then get `(0, 0)` UVs.
pub fn parse_obj<R: BufRead>(reader: R) -> Result<MeshSnapshot> {
    let mut positions: Vec<Vec3> = Vec::new();
    let mut tex_coords: Vec<Vec2> = Vec::new();
    let mut faces: Vec<(usize, Vec<usize>, Option<Vec<Vec2>>)> = Vec::new();

    for (number, line) in reader.lines().enumerate() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let parts: Vec<&str> = line.split_whitespace().collect();
        match parts[0] {
            "v" if parts.len() >= 4 => {
                let x: f32 = parse_float(parts[1], number)?;
                let y: f32 = parse_float(parts[2], number)?;
                let z: f32 = parse_float(parts[3], number)?;
                positions.push(Vec3::new(x, y, z));
            }
            "vt" if parts.len() >= 3 => {
                let u: f32 = parse_float(parts[1], number)?;
                let v: f32 = parse_float(parts[2], number)?;
                tex_coords.push(Vec2::new(u, v));
            }
            "f" => {
                let mut vertices = Vec::with_capacity(parts.len() - 1);
                let mut uvs = Vec::with_capacity(parts.len() - 1);
                for part in &parts[1..] {
                    let (vi, vti) = parse_obj_vertex(part, positions.len(), tex_coords.len())
                        .with_context(|| {
                            format!("line {}: bad face vertex '{}'", number + 1, part)
                        })?;
                    vertices.push(vi);
                    if let Some(ti) = vti {
                        let uv = tex_coords.get(ti).copied().with_context(|| {
                            format!("line {}: texture coordinate {} not defined", number + 1, ti + 1)
                        })?;
                        uvs.push(uv);
                    }
                }

                let uvs = match uvs.len() {
                    0 => None,
                    n if n == vertices.len() => Some(uvs),
                    _ => bail!(
                        "line {}: face mixes corners with and without texture coordinates",
                        number + 1
                    ),
                };
                faces.push((number + 1, vertices, uvs));
            }
            _ => {}
        }
    }

    if positions.is_empty() {
        bail!("No vertices found in OBJ file");
    }

    let mut mesh = MeshSnapshot::new(positions);
    for (line, vertices, uvs) in faces {
        mesh.add_polygon(&vertices, uvs.as_deref())
            .with_context(|| format!("line {}: invalid face", line))?;
    }

    tracing::debug!(
        "Loaded OBJ mesh: {} vertices, {} polygons, uv layer: {}",
        mesh.positions().len(),
        mesh.polygons().len(),
        normal_core::GeometryPort::has_uv_layer(&mesh)
    );
    Ok(mesh)
}

fn parse_float(s: &str, line: usize) -> Result<f32> {
    s.parse()
        .with_context(|| format!("line {}: '{}' is not a number", line + 1, s))
}

/// Parse OBJ vertex reference: "v", "v/vt", "v/vt/vn", or "v//vn".
///
/// Negative indices count back from the elements defined so far.
fn parse_obj_vertex(
    s: &str,
    position_count: usize,
    tex_coord_count: usize,
) -> Option<(usize, Option<usize>)> {
    let mut parts = s.split('/');

    let vi = resolve_index(parts.next()?, position_count)?;

    let vti = match parts.next() {
        None | Some("") => None,
        Some(t) => Some(resolve_index(t, tex_coord_count)?),
    };

    Some((vi, vti))
}

/// 1-based OBJ index to 0-based, `-1` being the last of `count`
fn resolve_index(s: &str, count: usize) -> Option<usize> {
    let index: i64 = s.parse().ok()?;
    if index > 0 {
        usize::try_from(index - 1).ok()
    } else if index < 0 {
        count.checked_sub(usize::try_from(index.unsigned_abs()).ok()?)
    } else {
        None
    }
}
