//! Host scene access and the scene walker.
//!
//! The host owns its objects and the way world transforms compose through its
//! hierarchy. The walker only asks for what it needs: which objects exist,
//! whether they render, whether they carry a mesh, and (through an injected
//! resolver) their already-composed world matrix.

use nalgebra::Matrix4;

use crate::error::{ExportError, ExportResult};
use crate::geometry::MeshSource;

/// One entity in the host scene.
pub trait SceneObject {
    fn name(&self) -> &str;

    /// False when the object is disabled for rendering.
    fn is_render_visible(&self) -> bool;

    /// Mesh data, or `None` for curves, lights, cameras and other non-mesh objects.
    fn mesh(&self) -> Option<&dyn MeshSource>;
}

/// A host scene the exporter can enumerate.
pub trait Scene {
    type Object: SceneObject;

    /// Objects under `root`: every object when `root` is `None`, otherwise the
    /// members of the named collection. Returns `None` if the root does not exist.
    fn objects(&self, root: Option<&str>) -> Option<impl Iterator<Item = &Self::Object>>;
}

/// A visible mesh object paired with its resolved world transform.
pub struct WalkedObject<'a, O> {
    pub object: &'a O,
    pub mesh: &'a dyn MeshSource,
    pub world: Matrix4<f64>,
}

/// Lazily enumerate the render-visible mesh objects under `root`.
///
/// Fails up front with [`ExportError::InvalidSceneRoot`] if the root is missing.
pub fn walk_scene<'a, S, F>(
    scene: &'a S,
    root: Option<&'a str>,
    resolve_world_transform: F,
) -> ExportResult<impl Iterator<Item = WalkedObject<'a, S::Object>>>
where
    S: Scene,
    S::Object: 'a,
    F: Fn(&S::Object) -> Matrix4<f64>,
{
    let objects = scene
        .objects(root)
        .ok_or_else(|| ExportError::InvalidSceneRoot(root.unwrap_or("<scene>").to_string()))?;

    Ok(objects.filter_map(move |object| {
        if !object.is_render_visible() {
            tracing::trace!(object = object.name(), "skipping hidden object");
            return None;
        }
        let Some(mesh) = object.mesh() else {
            tracing::trace!(object = object.name(), "skipping non-mesh object");
            return None;
        };
        Some(WalkedObject {
            object,
            mesh,
            world: resolve_world_transform(object),
        })
    }))
}
