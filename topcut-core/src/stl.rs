//! STL file parser for binary and ASCII formats.
//!
//! Triangles are welded on quantized positions and turned into a [`MeshData`]
//! with one entry per shared edge, the form the exporter expects from a host.

use std::collections::HashMap;

use nalgebra::Point3;
use nom::{
    bytes::complete::{tag, take_till},
    character::complete::{multispace0, multispace1},
    multi::many0,
    number::complete::float,
    sequence::preceded,
    IResult,
};
use thiserror::Error;

use crate::geometry::MeshData;

/// Positions closer than `1 / WELD_PRECISION` are merged into one vertex.
const WELD_PRECISION: f64 = 10_000.0;

const HEADER_LEN: usize = 80;
const FACET_LEN: usize = 50;

#[derive(Debug, Error)]
pub enum StlError {
    #[error("File too small to be a valid STL ({0} bytes)")]
    TooSmall(usize),

    #[error("Unexpected end of file: expected {expected} triangles, data holds {available}")]
    Truncated { expected: usize, available: usize },

    #[error("Failed to parse ASCII STL: {0}")]
    Ascii(String),

    #[error("Facet {facet} has a NaN or infinite vertex coordinate")]
    NonFinite { facet: usize },
}

type Facet = [Point3<f64>; 3];

/// Parse a binary STL file
pub fn parse_binary_stl(data: &[u8]) -> Result<MeshData, StlError> {
    if data.len() < HEADER_LEN + 4 {
        return Err(StlError::TooSmall(data.len()));
    }

    // Skip 80-byte header
    let data = &data[HEADER_LEN..];
    let triangle_count = u32::from_le_bytes([data[0], data[1], data[2], data[3]]) as usize;
    let body = &data[4..];

    let available = body.len() / FACET_LEN;
    if available < triangle_count {
        return Err(StlError::Truncated {
            expected: triangle_count,
            available,
        });
    }

    let read_f32 = |bytes: &[u8]| f64::from(f32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]));

    let facets: Vec<Facet> = body
        .chunks_exact(FACET_LEN)
        .take(triangle_count)
        .map(|chunk| {
            // 12 bytes normal, 3 × 12 bytes vertices, 2 bytes attribute count
            let mut corners = [Point3::origin(); 3];
            for (i, corner) in corners.iter_mut().enumerate() {
                let at = 12 + i * 12;
                *corner = Point3::new(
                    read_f32(&chunk[at..]),
                    read_f32(&chunk[at + 4..]),
                    read_f32(&chunk[at + 8..]),
                );
            }
            corners
        })
        .collect();

    weld(&facets)
}

/// Parse an ASCII STL file
pub fn parse_ascii_stl(input: &str) -> Result<MeshData, StlError> {
    match parse_ascii_stl_impl(input) {
        Ok((_, facets)) => weld(&facets),
        Err(e) => Err(StlError::Ascii(format!("{e:?}"))),
    }
}

fn parse_ascii_stl_impl(input: &str) -> IResult<&str, Vec<Facet>> {
    let (input, _) = preceded(multispace0, tag("solid"))(input)?;
    // Optional name, up to the end of the line
    let (input, _) = take_till(|c| c == '\n' || c == '\r')(input)?;
    let (input, facets) = many0(parse_facet)(input)?;
    let (input, _) = preceded(multispace0, tag("endsolid"))(input)?;
    Ok((input, facets))
}

fn parse_facet(input: &str) -> IResult<&str, Facet> {
    let (input, _) = preceded(multispace0, tag("facet"))(input)?;
    let (input, _) = preceded(multispace1, tag("normal"))(input)?;
    let (input, _normal) = parse_vector3(input)?;
    let (input, _) = preceded(multispace0, tag("outer"))(input)?;
    let (input, _) = preceded(multispace1, tag("loop"))(input)?;
    let (input, v1) = parse_vertex(input)?;
    let (input, v2) = parse_vertex(input)?;
    let (input, v3) = parse_vertex(input)?;
    let (input, _) = preceded(multispace0, tag("endloop"))(input)?;
    let (input, _) = preceded(multispace0, tag("endfacet"))(input)?;

    Ok((input, [v1, v2, v3]))
}

fn parse_vertex(input: &str) -> IResult<&str, Point3<f64>> {
    let (input, _) = preceded(multispace0, tag("vertex"))(input)?;
    let (input, (x, y, z)) = parse_vector3(input)?;
    Ok((input, Point3::new(f64::from(x), f64::from(y), f64::from(z))))
}

fn parse_vector3(input: &str) -> IResult<&str, (f32, f32, f32)> {
    let (input, _) = multispace0(input)?;
    let (input, x) = float(input)?;
    let (input, _) = multispace1(input)?;
    let (input, y) = float(input)?;
    let (input, _) = multispace1(input)?;
    let (input, z) = float(input)?;
    Ok((input, (x, y, z)))
}

/// Detect and parse STL file (binary or ASCII)
pub fn parse_stl(data: &[u8]) -> Result<MeshData, StlError> {
    // Binary files may also start with "solid", so fall back on failure
    if data.len() > 5 && &data[0..5] == b"solid" {
        if let Ok(text) = std::str::from_utf8(data) {
            if let Ok(mesh) = parse_ascii_stl(text) {
                return Ok(mesh);
            }
        }
    }

    parse_binary_stl(data)
}

/// Merge coincident corners and derive the shared edge list.
///
/// Quantizing a NaN gives 0, which would weld it onto the origin, so
/// non-finite corners are rejected first.
fn weld(facets: &[Facet]) -> Result<MeshData, StlError> {
    let mut vertices = Vec::new();
    let mut lookup: HashMap<[i64; 3], usize> = HashMap::new();
    let mut triangles = Vec::with_capacity(facets.len());

    for (index, facet) in facets.iter().enumerate() {
        if !facet.iter().all(|corner| corner.coords.iter().all(|c| c.is_finite())) {
            return Err(StlError::NonFinite { facet: index });
        }

        let mut tri = [0usize; 3];
        for (slot, corner) in tri.iter_mut().zip(facet) {
            let key = [
                (corner.x * WELD_PRECISION).round() as i64,
                (corner.y * WELD_PRECISION).round() as i64,
                (corner.z * WELD_PRECISION).round() as i64,
            ];
            *slot = *lookup.entry(key).or_insert_with(|| {
                vertices.push(*corner);
                vertices.len() - 1
            });
        }
        triangles.push(tri);
    }

    Ok(MeshData::from_triangles(vertices, &triangles))
}

#[cfg(test)]
mod tests {
    use super::*;

    const TETRA: &str = "solid tetra
  facet normal 0 0 -1
    outer loop
      vertex 0 0 0
      vertex 1 0 0
      vertex 0 1 0
    endloop
  endfacet
  facet normal 0 -1 0
    outer loop
      vertex 0 0 0
      vertex 0 0 1
      vertex 1 0 0
    endloop
  endfacet
  facet normal -1 0 0
    outer loop
      vertex 0 0 0
      vertex 0 1 0
      vertex 0 0 1
    endloop
  endfacet
  facet normal 1 1 1
    outer loop
      vertex 1 0 0
      vertex 0 0 1
      vertex 0 1 0
    endloop
  endfacet
endsolid tetra
";

    fn binary_stl(facets: &[Facet]) -> Vec<u8> {
        let mut data = vec![0u8; HEADER_LEN];
        data.extend_from_slice(&(facets.len() as u32).to_le_bytes());
        for facet in facets {
            data.extend_from_slice(&[0u8; 12]);
            for corner in facet {
                for c in [corner.x, corner.y, corner.z] {
                    data.extend_from_slice(&(c as f32).to_le_bytes());
                }
            }
            data.extend_from_slice(&[0u8; 2]);
        }
        data
    }

    #[test]
    fn test_parse_binary_header() {
        let mut data = vec![0u8; 84];
        data[80..84].copy_from_slice(&0u32.to_le_bytes());

        let mesh = parse_binary_stl(&data).unwrap();
        assert_eq!(mesh.vertex_count(), 0);
        assert_eq!(mesh.edge_count(), 0);
    }

    #[test]
    fn test_binary_too_small() {
        assert!(matches!(parse_binary_stl(&[0u8; 10]), Err(StlError::TooSmall(10))));
    }

    #[test]
    fn test_binary_truncated() {
        let mut data = vec![0u8; 84];
        data[80..84].copy_from_slice(&2u32.to_le_bytes());
        data.extend_from_slice(&[0u8; FACET_LEN]);
        assert!(matches!(
            parse_binary_stl(&data),
            Err(StlError::Truncated {
                expected: 2,
                available: 1
            })
        ));
    }

    #[test]
    fn test_binary_quad_welds() {
        let a = Point3::new(0.0, 0.0, 0.0);
        let b = Point3::new(1.0, 0.0, 0.0);
        let c = Point3::new(1.0, 1.0, 0.0);
        let d = Point3::new(0.0, 1.0, 0.0);
        let mesh = parse_stl(&binary_stl(&[[a, b, c], [a, c, d]])).unwrap();
        assert_eq!(mesh.vertex_count(), 4);
        // Four sides plus the shared diagonal.
        assert_eq!(mesh.edge_count(), 5);
    }

    #[test]
    fn test_ascii_tetrahedron() {
        let mesh = parse_ascii_stl(TETRA).unwrap();
        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.edge_count(), 6);
    }

    #[test]
    fn test_detect_ascii() {
        let mesh = parse_stl(TETRA.as_bytes()).unwrap();
        assert_eq!(mesh.edge_count(), 6);
    }

    #[test]
    fn test_ascii_non_finite_rejected() {
        for bad in ["nan", "inf"] {
            let text = TETRA.replacen("vertex 1 0 0", &format!("vertex {bad} 0 0"), 1);
            assert!(
                matches!(parse_ascii_stl(&text), Err(StlError::NonFinite { facet: 0 })),
                "{bad}"
            );
        }
    }

    #[test]
    fn test_binary_non_finite_rejected() {
        let a = Point3::new(0.0, 0.0, 0.0);
        let b = Point3::new(1.0, 0.0, 0.0);
        let c = Point3::new(0.0, 1.0, 0.0);
        let nan = Point3::new(f64::NAN, 0.0, 0.0);
        let result = parse_stl(&binary_stl(&[[a, b, c], [a, c, nan]]));
        assert!(matches!(result, Err(StlError::NonFinite { facet: 1 })));
    }

    #[test]
    fn test_ascii_garbage() {
        assert!(matches!(parse_ascii_stl("solid x\n facet nonsense"), Err(StlError::Ascii(_))));
    }
}
