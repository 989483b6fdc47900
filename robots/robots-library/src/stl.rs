//! STL reader for mechanism geometry.
//!
//! Supports both ASCII and binary STL. Every facet becomes its own three
//! vertices; normals are ignored.
//!
//! # Format Detection
//!
//! A buffer whose size matches the binary layout exactly
//! (`84 + 50 * face_count` bytes) is binary, even if its header happens to
//! start with `solid`. Otherwise a buffer starting with `solid` is ASCII.

use std::fs;
use std::path::Path;

use robots_geometry::{Point3, TriangleMesh};

use crate::error::{LibraryError, Result};

/// STL binary header size in bytes.
const HEADER_SIZE: usize = 80;

/// Size of one triangle in binary STL (normal + 3 vertices + attribute).
const TRIANGLE_SIZE: usize = 50;

/// Load a mesh from an STL file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not valid STL.
pub fn load_stl(path: impl AsRef<Path>) -> Result<TriangleMesh> {
    let path = path.as_ref();
    let bytes = fs::read(path)?;
    read_stl(&bytes).map_err(|e| match e {
        LibraryError::InvalidMesh { message } => {
            LibraryError::invalid_mesh(format!("{}: {message}", path.display()))
        }
        other => other,
    })
}

/// Decode an STL file already in memory.
///
/// # Errors
///
/// Returns an error if the content is not valid STL.
pub fn read_stl(bytes: &[u8]) -> Result<TriangleMesh> {
    if bytes.len() < 6 {
        return Err(LibraryError::invalid_mesh("file too small to be valid STL"));
    }

    if is_exact_binary(bytes) {
        return read_binary(bytes);
    }

    let head = String::from_utf8_lossy(&bytes[..bytes.len().min(HEADER_SIZE)]);
    if head.trim_start().starts_with("solid") {
        let text = std::str::from_utf8(bytes)
            .map_err(|e| LibraryError::invalid_mesh(format!("ASCII STL is not UTF-8: {e}")))?;
        read_ascii(text)
    } else {
        read_binary(bytes)
    }
}

fn face_count(bytes: &[u8]) -> Option<u32> {
    let count = bytes.get(HEADER_SIZE..HEADER_SIZE + 4)?;
    Some(u32::from_le_bytes([count[0], count[1], count[2], count[3]]))
}

fn is_exact_binary(bytes: &[u8]) -> bool {
    face_count(bytes).is_some_and(|n| {
        (n as usize)
            .checked_mul(TRIANGLE_SIZE)
            .and_then(|body| body.checked_add(HEADER_SIZE + 4))
            == Some(bytes.len())
    })
}

fn read_binary(bytes: &[u8]) -> Result<TriangleMesh> {
    let count = face_count(bytes).ok_or_else(|| {
        LibraryError::invalid_mesh(format!(
            "binary STL header needs {} bytes, got {}",
            HEADER_SIZE + 4,
            bytes.len()
        ))
    })?;

    let body = &bytes[HEADER_SIZE + 4..];
    let expected = count as usize;
    let available = body.len() / TRIANGLE_SIZE;
    if available < expected {
        return Err(LibraryError::invalid_mesh(format!(
            "binary STL declares {expected} faces but holds {available}"
        )));
    }

    let mut mesh = TriangleMesh::with_capacity(expected * 3, expected);
    for triangle in body.chunks_exact(TRIANGLE_SIZE).take(expected) {
        // Skip normal (12 bytes), read 3 vertices (36 bytes total)
        let base = vertex_index(&mesh)?;
        mesh.vertices.push(read_vertex(&triangle[12..24]));
        mesh.vertices.push(read_vertex(&triangle[24..36]));
        mesh.vertices.push(read_vertex(&triangle[36..48]));
        mesh.faces.push([base, base + 1, base + 2]);
    }

    Ok(mesh)
}

/// Read a vertex from 12 bytes (3 f32s).
fn read_vertex(buf: &[u8]) -> Point3<f64> {
    let x = f32::from_le_bytes([buf[0], buf[1], buf[2], buf[3]]);
    let y = f32::from_le_bytes([buf[4], buf[5], buf[6], buf[7]]);
    let z = f32::from_le_bytes([buf[8], buf[9], buf[10], buf[11]]);
    Point3::new(f64::from(x), f64::from(y), f64::from(z))
}

fn vertex_index(mesh: &TriangleMesh) -> Result<u32> {
    u32::try_from(mesh.vertices.len())
        .ok()
        .filter(|n| n.checked_add(2).is_some())
        .ok_or_else(|| LibraryError::invalid_mesh("too many vertices for 32-bit indices"))
}

fn read_ascii(text: &str) -> Result<TriangleMesh> {
    let mut mesh = TriangleMesh::new();
    let mut in_facet = false;
    let mut in_loop = false;
    let mut corners: Vec<Point3<f64>> = Vec::with_capacity(3);

    for (line_no, line) in text.lines().enumerate() {
        let parts: Vec<&str> = line.split_whitespace().collect();
        let Some(keyword) = parts.first() else {
            continue;
        };

        match keyword.to_lowercase().as_str() {
            "facet" => {
                in_facet = true;
                corners.clear();
            }
            "outer" => {
                if parts.len() >= 2 && parts[1].eq_ignore_ascii_case("loop") {
                    in_loop = true;
                    corners.clear();
                }
            }
            "vertex" => {
                if in_loop {
                    corners.push(parse_ascii_vertex(&parts, line_no + 1)?);
                }
            }
            "endloop" => in_loop = false,
            "endfacet" => {
                if in_facet {
                    if corners.len() != 3 {
                        return Err(LibraryError::invalid_mesh(format!(
                            "line {}: facet has {} vertices, expected 3",
                            line_no + 1,
                            corners.len()
                        )));
                    }
                    let base = vertex_index(&mesh)?;
                    mesh.vertices.append(&mut corners);
                    mesh.faces.push([base, base + 1, base + 2]);
                }
                in_facet = false;
            }
            "endsolid" => break,
            _ => {}
        }
    }

    Ok(mesh)
}

fn parse_ascii_vertex(parts: &[&str], line: usize) -> Result<Point3<f64>> {
    if parts.len() < 4 {
        return Err(LibraryError::invalid_mesh(format!(
            "line {line}: vertex needs 3 coordinates"
        )));
    }
    let coord = |s: &str| {
        s.parse::<f64>()
            .map_err(|_| LibraryError::invalid_mesh(format!("line {line}: invalid coordinate {s:?}")))
    };
    Ok(Point3::new(coord(parts[1])?, coord(parts[2])?, coord(parts[3])?))
}
