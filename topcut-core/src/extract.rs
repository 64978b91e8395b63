//! Edge extraction from host meshes.

use nalgebra::Point3;

use crate::error::{ExportError, ExportResult};
use crate::geometry::MeshSource;

/// A mesh's local vertices and its validated edge list, borrowed from the host.
///
/// Only [`extract_edges`] builds one, so every edge index is in bounds and
/// every referenced vertex is finite.
#[derive(Debug, Clone, Copy)]
pub struct MeshEdges<'a> {
    vertices: &'a [Point3<f64>],
    edges: &'a [[usize; 2]],
}

impl<'a> MeshEdges<'a> {
    /// Endpoint pairs in local space, in edge-list order.
    pub fn endpoints(&self) -> impl Iterator<Item = (&'a Point3<f64>, &'a Point3<f64>)> + 'a {
        let vertices = self.vertices;
        let edges = self.edges;
        edges.iter().map(move |[a, b]| (&vertices[*a], &vertices[*b]))
    }

    /// Vertex index pairs, aligned with [`endpoints`](Self::endpoints).
    pub fn indices(&self) -> &'a [[usize; 2]] {
        self.edges
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }
}

/// Return the edges the host exposes for `mesh`, checking every index and
/// every vertex an edge touches.
///
/// No edges are derived here; topology belongs to the host. Degenerate edges
/// pass through untouched. Unreferenced vertices are not inspected.
pub fn extract_edges<'a>(object: &str, mesh: &'a dyn MeshSource) -> ExportResult<MeshEdges<'a>> {
    let vertices = mesh.vertices();
    let edges = mesh.edges();

    for (edge, pair) in edges.iter().enumerate() {
        for &index in pair {
            let Some(vertex) = vertices.get(index) else {
                return Err(ExportError::MalformedMesh {
                    object: object.to_string(),
                    edge,
                    index,
                    vertex_count: vertices.len(),
                });
            };
            if !vertex.coords.iter().all(|c| c.is_finite()) {
                return Err(ExportError::NonFiniteVertex {
                    object: object.to_string(),
                    index,
                });
            }
        }
    }

    Ok(MeshEdges { vertices, edges })
}
