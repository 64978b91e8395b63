//! Mesh geometry consumed by the exporter.
//!
//! Hosts expose their meshes through [`MeshSource`]; [`MeshData`] is the
//! in-memory implementation used by the bundled host, the STL loader and tests.

use std::collections::BTreeSet;

use nalgebra::{Point2, Point3};

/// Read access to a host mesh: local-space vertices plus a deduplicated edge list.
pub trait MeshSource {
    /// Vertex positions in the object's local space.
    fn vertices(&self) -> &[Point3<f64>];

    /// Unordered vertex index pairs, each pair appearing once.
    fn edges(&self) -> &[[usize; 2]];
}

/// An indexed mesh with explicit edges.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshData {
    pub vertices: Vec<Point3<f64>>,
    pub edges: Vec<[usize; 2]>,
}

impl MeshData {
    pub fn new(vertices: Vec<Point3<f64>>, edges: Vec<[usize; 2]>) -> Self {
        Self { vertices, edges }
    }

    /// Build a mesh from indexed triangles, deriving each shared edge once.
    ///
    /// Edges come out sorted by their (low, high) index pair so the result does
    /// not depend on face winding or face order.
    pub fn from_triangles(vertices: Vec<Point3<f64>>, triangles: &[[usize; 3]]) -> Self {
        let mut unique = BTreeSet::new();
        for tri in triangles {
            for (a, b) in [(tri[0], tri[1]), (tri[1], tri[2]), (tri[2], tri[0])] {
                if a != b {
                    unique.insert((a.min(b), a.max(b)));
                }
            }
        }

        Self {
            vertices,
            edges: unique.into_iter().map(|(a, b)| [a, b]).collect(),
        }
    }

    /// Create an axis-aligned cube centred on the origin: 8 vertices, 12 edges.
    pub fn cube(size: f64) -> Self {
        let half = size / 2.0;

        // Bottom ring then top ring, counter-clockwise seen from +Z.
        let vertices = vec![
            Point3::new(-half, -half, -half),
            Point3::new(half, -half, -half),
            Point3::new(half, half, -half),
            Point3::new(-half, half, -half),
            Point3::new(-half, -half, half),
            Point3::new(half, -half, half),
            Point3::new(half, half, half),
            Point3::new(-half, half, half),
        ];

        let edges = vec![
            // Bottom
            [0, 1],
            [1, 2],
            [2, 3],
            [3, 0],
            // Top
            [4, 5],
            [5, 6],
            [6, 7],
            [7, 4],
            // Vertical
            [0, 4],
            [1, 5],
            [2, 6],
            [3, 7],
        ];

        Self { vertices, edges }
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }
}

impl MeshSource for MeshData {
    fn vertices(&self) -> &[Point3<f64>] {
        &self.vertices
    }

    fn edges(&self) -> &[[usize; 2]] {
        &self.edges
    }
}

/// One mesh edge with both endpoints in world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldEdge {
    pub start: Point3<f64>,
    pub end: Point3<f64>,
}

impl WorldEdge {
    pub fn new(start: Point3<f64>, end: Point3<f64>) -> Self {
        Self { start, end }
    }
}

/// A world edge flattened onto the drawing plane, in document units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectedSegment {
    pub start: Point2<f64>,
    pub end: Point2<f64>,
}

impl ProjectedSegment {
    pub fn new(start: Point2<f64>, end: Point2<f64>) -> Self {
        Self { start, end }
    }

    /// Both endpoints coincide, e.g. an edge parallel to the up axis.
    pub fn is_degenerate(&self) -> bool {
        self.start == self.end
    }

    pub fn translated(&self, offset: nalgebra::Vector2<f64>) -> Self {
        Self {
            start: self.start + offset,
            end: self.end + offset,
        }
    }
}
