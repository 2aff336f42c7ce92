// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Partialscan Inc.

//! Wavefront OBJ reader and writer, with the MTL file and texture atlas
//! stored next to the mesh

use super::staged::StagedOutput;
use super::texture::{load_texture, write_texture_png16};
use crate::error::{Error, Result};
use crate::geometry::{Face, Mesh};
use nalgebra::{Point2, Point3, Vector3};
use std::collections::BTreeSet;
use std::fmt::Write as _;
use std::fs;
use std::io::Write as _;
use std::path::Path;

const MATERIAL_NAME: &str = "material_0";

/// Writer options
#[derive(Debug, Clone, Default)]
pub struct ObjWriteOptions {
    /// Paint these vertices red and every other vertex white instead of
    /// writing the mesh's own vertex colors
    pub highlight: Option<BTreeSet<usize>>,
}

impl ObjWriteOptions {
    pub fn with_highlight(vertices: impl IntoIterator<Item = usize>) -> Self {
        Self {
            highlight: Some(vertices.into_iter().collect()),
        }
    }
}

/// One `f` statement split into its corner streams
struct FaceRecord {
    vertices: Vec<usize>,
    texcoords: Option<Vec<usize>>,
    normals: Option<Vec<usize>>,
}

/// Everything a single OBJ text yields before the MTL lookup
#[derive(Debug)]
pub struct ParsedObj {
    pub mesh: Mesh,
    pub mtllib: Option<String>,
}

/// Read an OBJ file; the texture named by its MTL is loaded when both files
/// exist next to it.
pub fn read_obj(path: &Path) -> Result<Mesh> {
    let text = fs::read_to_string(path)?;
    let ParsedObj { mut mesh, mtllib } = parse_obj(&text)?;

    let dir = path.parent().unwrap_or_else(|| Path::new(""));
    if let Some(texture_name) = mtllib.and_then(|mtl| read_mtl_texture(&dir.join(mtl))) {
        let texture_path = dir.join(texture_name);
        if texture_path.exists() {
            mesh.texture = Some(load_texture(&texture_path)?);
        }
    }

    Ok(mesh)
}

/// First `map_Kd` entry of an MTL file, if the file can be read
fn read_mtl_texture(path: &Path) -> Option<String> {
    let text = fs::read_to_string(path).ok()?;
    text.lines().find_map(|line| {
        let line = line.trim();
        line.strip_prefix("map_Kd")
            .filter(|rest| rest.starts_with(char::is_whitespace))
            .map(|rest| rest.trim().to_string())
    })
}

/// Parse OBJ text into a validated mesh
pub fn parse_obj(text: &str) -> Result<ParsedObj> {
    let mut vertices = Vec::new();
    let mut colors = Vec::new();
    let mut normals = Vec::new();
    let mut texcoords = Vec::new();
    let mut records = Vec::new();
    let mut material = None;
    let mut mtllib = None;

    for (line_idx, raw) in text.lines().enumerate() {
        let line_no = line_idx + 1;
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let mut tokens = line.split_whitespace();
        let keyword = tokens.next().unwrap_or_default();
        let args: Vec<&str> = tokens.collect();

        match keyword {
            "v" => {
                let values = parse_floats(&args, line_no)?;
                match values.len() {
                    3 => {}
                    6 => colors.push(Vector3::new(values[3], values[4], values[5])),
                    n => return Err(Error::parse(line_no, format!("vertex with {} components", n))),
                }
                vertices.push(Point3::new(values[0], values[1], values[2]));
            }
            "vn" => {
                let values = parse_floats(&args, line_no)?;
                if values.len() < 3 {
                    return Err(Error::parse(line_no, "normal needs 3 components"));
                }
                normals.push(Vector3::new(values[0], values[1], values[2]));
            }
            "vt" => {
                let values = parse_floats(&args, line_no)?;
                if values.len() < 2 {
                    return Err(Error::parse(line_no, "texture coordinate needs 2 components"));
                }
                texcoords.push(Point2::new(values[0], values[1]));
            }
            "f" => {
                let counts = (vertices.len(), texcoords.len(), normals.len());
                records.push(parse_face(&args, counts, line_no)?);
            }
            "usemtl" | "usemat" => material = args.first().map(|s| s.to_string()),
            "mtllib" => mtllib = args.first().map(|s| s.to_string()),
            _ => {}
        }
    }

    if !colors.is_empty() && colors.len() != vertices.len() {
        return Err(Error::InvalidMesh(format!(
            "{} of {} vertices carry colors",
            colors.len(),
            vertices.len()
        )));
    }

    let faces: Vec<Face> = records.iter().map(|r| r.vertices.clone()).collect();

    let (texcoords, texture_indices) =
        complete_corner_space(texcoords, &records, |r| r.texcoords.as_ref(), Point2::origin());

    let all_normal_corners = !records.is_empty() && records.iter().all(|r| r.normals.is_some());
    let normals_follow_vertices = normals.len() == vertices.len()
        && records.iter().all(|r| r.normals.as_ref().map_or(true, |n| *n == r.vertices));
    let any_normal_corners = records.iter().any(|r| r.normals.is_some());

    let (vertex_normals, face_normals, face_normal_indices) =
        if !normals.is_empty() && normals_follow_vertices && (all_normal_corners || !any_normal_corners) {
            (Some(normals), None, None)
        } else {
            let (table, rows) =
                complete_corner_space(normals, &records, |r| r.normals.as_ref(), Vector3::zeros());
            (None, table, rows)
        };

    let mesh = Mesh {
        vertices,
        vertex_colors: (!colors.is_empty()).then_some(colors),
        vertex_normals,
        faces,
        texcoords,
        texture_indices,
        face_normals,
        face_normal_indices,
        texture: None,
        material,
    };
    mesh.validate()?;

    Ok(ParsedObj { mesh, mtllib })
}

fn parse_floats(args: &[&str], line_no: usize) -> Result<Vec<f64>> {
    args.iter()
        .map(|token| {
            token
                .parse::<f64>()
                .map_err(|_| Error::parse(line_no, format!("invalid number '{}'", token)))
        })
        .collect()
}

/// Resolve a 1-based or negative (relative) OBJ index against `count`
fn resolve_index(token: &str, count: usize, line_no: usize) -> Result<usize> {
    let value: i64 = token
        .parse()
        .map_err(|_| Error::parse(line_no, format!("invalid index '{}'", token)))?;

    let resolved = match value {
        0 => None,
        v if v > 0 => Some(v as usize - 1),
        v => count.checked_sub(v.unsigned_abs() as usize),
    };
    resolved.ok_or_else(|| Error::parse(line_no, format!("index {} does not resolve", value)))
}

fn parse_face(args: &[&str], counts: (usize, usize, usize), line_no: usize) -> Result<FaceRecord> {
    let (vertex_count, texcoord_count, normal_count) = counts;
    if args.len() < 3 {
        return Err(Error::parse(line_no, "face needs at least 3 corners"));
    }

    let mut vertices = Vec::with_capacity(args.len());
    let mut texcoords = Vec::with_capacity(args.len());
    let mut normals = Vec::with_capacity(args.len());

    for corner in args {
        let mut parts = corner.split('/');
        let v = parts.next().unwrap_or_default();
        vertices.push(resolve_index(v, vertex_count, line_no)?);

        if let Some(t) = parts.next().filter(|t| !t.is_empty()) {
            texcoords.push(resolve_index(t, texcoord_count, line_no)?);
        }
        if let Some(n) = parts.next().filter(|n| !n.is_empty()) {
            normals.push(resolve_index(n, normal_count, line_no)?);
        }
    }

    let stream = |indices: Vec<usize>, what: &str| match indices.len() {
        0 => Ok(None),
        n if n == vertices.len() => Ok(Some(indices)),
        _ => Err(Error::parse(line_no, format!("face mixes corners with and without {}", what))),
    };

    Ok(FaceRecord {
        texcoords: stream(texcoords, "texture coordinates")?,
        normals: stream(normals, "normals")?,
        vertices,
    })
}

/// Turn optional per-face corner rows into a total index space.
///
/// When only some faces carry corners, one fallback entry is appended to the
/// table and every missing corner points at it.
fn complete_corner_space<T: Clone>(
    mut table: Vec<T>,
    records: &[FaceRecord],
    rows_of: impl Fn(&FaceRecord) -> Option<&Vec<usize>>,
    fallback: T,
) -> (Option<Vec<T>>, Option<Vec<Face>>) {
    let with_corners = records.iter().filter(|r| rows_of(r).is_some()).count();
    if with_corners == 0 {
        return ((!table.is_empty()).then_some(table), None);
    }

    let fallback_index = table.len();
    if with_corners < records.len() {
        table.push(fallback);
    }

    let rows = records
        .iter()
        .map(|r| match rows_of(r) {
            Some(row) => row.clone(),
            None => vec![fallback_index; r.vertices.len()],
        })
        .collect();

    (Some(table), Some(rows))
}

/// Write a mesh as OBJ. A texture, when present, is written as a 16-bit PNG
/// beside the OBJ together with an MTL that references it.
pub fn write_obj(path: &Path, mesh: &Mesh, options: &ObjWriteOptions) -> Result<()> {
    let mut output = StagedOutput::new();
    stage_obj(&mut output, path, mesh, options)?;
    output.commit()
}

pub(super) fn stage_obj(
    output: &mut StagedOutput,
    path: &Path,
    mesh: &Mesh,
    options: &ObjWriteOptions,
) -> Result<()> {
    mesh.validate()?;

    let mut out = String::new();

    if let Some(texture) = &mesh.texture {
        let mtl_path = path.with_extension("mtl");
        let png_path = path.with_extension("png");
        let file_name = |p: &Path| {
            p.file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default()
        };

        let mtl = format!(
            "newmtl {}\nKa 1 1 1\nKd 1 1 1\nKs 1 1 1\nNs 1000\nmap_Kd {}\n",
            MATERIAL_NAME,
            file_name(&png_path)
        );
        output.create(&mtl_path)?.write_all(mtl.as_bytes())?;
        write_texture_png16(output.create(&png_path)?, texture)?;

        let _ = writeln!(out, "mtllib {}", file_name(&mtl_path));
        let _ = writeln!(out, "usemtl {}", MATERIAL_NAME);
    }

    write_body(&mut out, mesh, options);
    output.create(path)?.write_all(out.as_bytes())?;
    Ok(())
}

fn write_body(out: &mut String, mesh: &Mesh, options: &ObjWriteOptions) {
    for (i, p) in mesh.vertices.iter().enumerate() {
        let color = match (&options.highlight, &mesh.vertex_colors) {
            (Some(highlight), _) if highlight.contains(&i) => Some(Vector3::new(1.0, 0.0, 0.0)),
            (Some(_), _) => Some(Vector3::new(1.0, 1.0, 1.0)),
            (None, Some(colors)) => Some(colors[i]),
            (None, None) => None,
        };
        match color {
            Some(c) => {
                let _ = writeln!(out, "v {} {} {} {} {} {}", p.x, p.y, p.z, c.x, c.y, c.z);
            }
            None => {
                let _ = writeln!(out, "v {} {} {}", p.x, p.y, p.z);
            }
        }
    }

    // The normal corner rows either come from the independent normal space
    // or repeat the vertex rows
    let normal_rows: Option<&Vec<Face>> = match (&mesh.face_normals, &mesh.face_normal_indices) {
        (Some(normals), Some(rows)) => {
            write_normals(out, normals);
            Some(rows)
        }
        _ => match &mesh.vertex_normals {
            Some(normals) => {
                write_normals(out, normals);
                Some(&mesh.faces)
            }
            None => None,
        },
    };

    for t in mesh.texcoords.iter().flatten() {
        let _ = writeln!(out, "vt {} {}", t.x, t.y);
    }

    let texture_rows = mesh.texture_indices.as_ref();
    for (face_idx, face) in mesh.faces.iter().enumerate() {
        out.push('f');
        for (corner, &v) in face.iter().enumerate() {
            let t = texture_rows.map(|rows| rows[face_idx][corner] + 1);
            let n = normal_rows.map(|rows| rows[face_idx][corner] + 1);
            let _ = match (t, n) {
                (None, None) => write!(out, " {}", v + 1),
                (Some(t), None) => write!(out, " {}/{}", v + 1, t),
                (None, Some(n)) => write!(out, " {}//{}", v + 1, n),
                (Some(t), Some(n)) => write!(out, " {}/{}/{}", v + 1, t, n),
            };
        }
        out.push('\n');
    }
}

fn write_normals(out: &mut String, normals: &[Vector3<f64>]) {
    for n in normals {
        let _ = writeln!(out, "vn {} {} {}", n.x, n.y, n.z);
    }
}
