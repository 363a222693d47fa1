use std::collections::HashMap;
use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::scene::{MeshRecord, NodeRecord, SceneSource};

#[derive(Debug, Error)]
pub enum ObjError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("line {line}: {reason}")]
    Malformed { line: usize, reason: String },

    #[error("line {line}: index out of range")]
    IndexOutOfRange { line: usize },
}

pub fn load(path: &Path) -> Result<SceneSource, ObjError> {
    let text = fs::read_to_string(path)?;
    let name = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("model");
    parse_str(name, &text)
}

/// Raw OBJ face corner, indices already resolved to 0-based.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
struct Corner {
    position: u32,
    uv: Option<u32>,
    normal: Option<u32>,
}

/// One `o`/`g` group being assembled. Corners are welded: a repeated
/// position/uv/normal triple maps to an existing output vertex.
struct GroupBuilder {
    name: String,
    welded: HashMap<Corner, u32>,
    positions: Vec<[f32; 3]>,
    uvs: Vec<[f32; 2]>,
    normals: Vec<[f32; 3]>,
    has_uvs: bool,
    has_normals: bool,
    triangles: Vec<[u32; 3]>,
}

impl GroupBuilder {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            welded: HashMap::new(),
            positions: Vec::new(),
            uvs: Vec::new(),
            normals: Vec::new(),
            has_uvs: false,
            has_normals: false,
            triangles: Vec::new(),
        }
    }

    fn vertex(
        &mut self,
        corner: Corner,
        source_positions: &[[f32; 3]],
        source_uvs: &[[f32; 2]],
        source_normals: &[[f32; 3]],
        line: usize,
    ) -> Result<u32, ObjError> {
        if let Some(&id) = self.welded.get(&corner) {
            return Ok(id);
        }

        let position = *source_positions
            .get(corner.position as usize)
            .ok_or(ObjError::IndexOutOfRange { line })?;
        let uv = match corner.uv {
            Some(i) => {
                self.has_uvs = true;
                *source_uvs
                    .get(i as usize)
                    .ok_or(ObjError::IndexOutOfRange { line })?
            }
            None => [0.0, 0.0],
        };
        let normal = match corner.normal {
            Some(i) => {
                self.has_normals = true;
                *source_normals
                    .get(i as usize)
                    .ok_or(ObjError::IndexOutOfRange { line })?
            }
            None => [0.0, 0.0, 0.0],
        };

        let id = self.positions.len() as u32;
        self.positions.push(position);
        self.uvs.push(uv);
        self.normals.push(normal);
        self.welded.insert(corner, id);
        Ok(id)
    }

    fn finish(self) -> Option<MeshRecord> {
        if self.triangles.is_empty() {
            return None;
        }
        Some(MeshRecord {
            name: self.name,
            positions: self.positions,
            uvs: self.has_uvs.then_some(self.uvs),
            normals: self.has_normals.then_some(self.normals),
            triangles: self.triangles,
        })
    }
}

pub fn parse_str(name: &str, text: &str) -> Result<SceneSource, ObjError> {
    let mut positions: Vec<[f32; 3]> = Vec::new();
    let mut uvs: Vec<[f32; 2]> = Vec::new();
    let mut normals: Vec<[f32; 3]> = Vec::new();

    let mut groups: Vec<GroupBuilder> = Vec::new();
    let mut current = GroupBuilder::new(name);

    for (index, raw) in text.lines().enumerate() {
        let line = index + 1;
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let mut parts = trimmed.split_whitespace();
        let keyword = parts.next().unwrap();

        match keyword {
            "v" => positions.push(parse_floats::<3>(&mut parts, line)?),
            "vt" => uvs.push(parse_floats::<2>(&mut parts, line)?),
            "vn" => normals.push(parse_floats::<3>(&mut parts, line)?),
            "f" => {
                let mut corners = Vec::new();
                for token in parts {
                    corners.push(parse_corner(
                        token,
                        positions.len(),
                        uvs.len(),
                        normals.len(),
                        line,
                    )?);
                }
                if corners.len() < 3 {
                    return Err(ObjError::Malformed {
                        line,
                        reason: format!("face has {} vertices", corners.len()),
                    });
                }
                // Fan triangulation for quads and larger polygons.
                for i in 1..corners.len() - 1 {
                    let a = current.vertex(corners[0], &positions, &uvs, &normals, line)?;
                    let b = current.vertex(corners[i], &positions, &uvs, &normals, line)?;
                    let c = current.vertex(corners[i + 1], &positions, &uvs, &normals, line)?;
                    current.triangles.push([a, b, c]);
                }
            }
            "o" | "g" => {
                let group_name = parts.next().unwrap_or("unnamed");
                if current.triangles.is_empty() {
                    // Nothing emitted yet, just rename the open group.
                    current.name = group_name.to_string();
                } else {
                    groups.push(std::mem::replace(&mut current, GroupBuilder::new(group_name)));
                }
            }
            // Material and smoothing directives are accepted and ignored.
            "mtllib" | "usemtl" | "s" | "l" | "p" => {}
            other => {
                log::debug!("line {line}: skipping unknown directive '{other}'");
            }
        }
    }
    groups.push(current);

    let meshes: Vec<MeshRecord> = groups.into_iter().filter_map(GroupBuilder::finish).collect();

    let mut root = NodeRecord::new(name);
    if meshes.len() == 1 {
        root.meshes = vec![0];
    } else {
        for (i, mesh) in meshes.iter().enumerate() {
            let mut child = NodeRecord::new(&mesh.name);
            child.meshes = vec![i];
            root.children.push(child);
        }
    }

    Ok(SceneSource { meshes, root })
}

fn parse_floats<'a, const N: usize>(
    parts: &mut impl Iterator<Item = &'a str>,
    line: usize,
) -> Result<[f32; N], ObjError> {
    let mut out = [0.0f32; N];
    for slot in &mut out {
        let token = parts.next().ok_or_else(|| ObjError::Malformed {
            line,
            reason: "too few components".to_string(),
        })?;
        *slot = token.parse().map_err(|_| ObjError::Malformed {
            line,
            reason: format!("bad number '{token}'"),
        })?;
    }
    Ok(out)
}

/// Parses one face token: `i`, `i/j`, `i/j/k` or `i//k`. OBJ indices
/// are 1-based; negative indices count back from the current end.
fn parse_corner(
    token: &str,
    position_count: usize,
    uv_count: usize,
    normal_count: usize,
    line: usize,
) -> Result<Corner, ObjError> {
    let mut fields = token.split('/');
    let position = resolve_index(fields.next(), position_count, line)?.ok_or_else(|| {
        ObjError::Malformed {
            line,
            reason: format!("bad face token '{token}'"),
        }
    })?;
    let uv = resolve_index(fields.next(), uv_count, line)?;
    let normal = resolve_index(fields.next(), normal_count, line)?;
    if fields.next().is_some() {
        return Err(ObjError::Malformed {
            line,
            reason: format!("bad face token '{token}'"),
        });
    }
    Ok(Corner {
        position,
        uv,
        normal,
    })
}

fn resolve_index(
    field: Option<&str>,
    count: usize,
    line: usize,
) -> Result<Option<u32>, ObjError> {
    let field = match field {
        Some(f) if !f.is_empty() => f,
        _ => return Ok(None),
    };
    let value: i64 = field.parse().map_err(|_| ObjError::Malformed {
        line,
        reason: format!("bad index '{field}'"),
    })?;
    let resolved = if value > 0 {
        value - 1
    } else if value < 0 {
        count as i64 + value
    } else {
        return Err(ObjError::Malformed {
            line,
            reason: "index 0 is not valid".to_string(),
        });
    };
    if resolved < 0 || resolved as usize >= count {
        return Err(ObjError::IndexOutOfRange { line });
    }
    Ok(Some(resolved as u32))
}
