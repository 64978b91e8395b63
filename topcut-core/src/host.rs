//! In-memory host scene.
//!
//! A small scene graph with parenting, render flags and named collections. It
//! owns the hierarchy math, so it also provides the world-transform resolver the
//! exporter expects from a host.

use std::collections::BTreeMap;

use nalgebra::Matrix4;

use crate::geometry::{MeshData, MeshSource};
use crate::scene::{Scene, SceneObject};
use crate::transform::{LocalTransform, Transform};

/// Index of an object inside a [`MemoryScene`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ObjectId(pub usize);

#[derive(Debug, Clone)]
pub struct MemoryObject {
    pub name: String,
    pub parent: Option<ObjectId>,
    pub local: LocalTransform,
    pub mesh: Option<MeshData>,
    pub hide_render: bool,
}

impl MemoryObject {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parent: None,
            local: LocalTransform::identity(),
            mesh: None,
            hide_render: false,
        }
    }

    pub fn from_mesh(name: impl Into<String>, mesh: MeshData) -> Self {
        Self {
            mesh: Some(mesh),
            ..Self::new(name)
        }
    }

    #[must_use]
    pub fn with_transform(mut self, local: LocalTransform) -> Self {
        self.local = local;
        self
    }

    #[must_use]
    pub fn with_parent(mut self, parent: ObjectId) -> Self {
        self.parent = Some(parent);
        self
    }

    #[must_use]
    pub fn hidden(mut self) -> Self {
        self.hide_render = true;
        self
    }
}

impl SceneObject for MemoryObject {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_render_visible(&self) -> bool {
        !self.hide_render
    }

    fn mesh(&self) -> Option<&dyn MeshSource> {
        self.mesh.as_ref().map(|m| m as &dyn MeshSource)
    }
}

/// Objects stored in insertion order; parents must be added before children.
#[derive(Debug, Clone, Default)]
pub struct MemoryScene {
    objects: Vec<MemoryObject>,
    collections: BTreeMap<String, Vec<ObjectId>>,
}

impl MemoryScene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an object and return its id.
    ///
    /// A parent id that does not refer to an earlier object is cleared, which
    /// keeps the hierarchy acyclic.
    pub fn add(&mut self, mut object: MemoryObject) -> ObjectId {
        let id = ObjectId(self.objects.len());
        if object.parent.is_some_and(|p| p.0 >= id.0) {
            tracing::warn!(object = %object.name, "ignoring parent that is not an earlier object");
            object.parent = None;
        }
        self.objects.push(object);
        id
    }

    /// Add `id` to the named collection, creating it if needed.
    pub fn link(&mut self, collection: impl Into<String>, id: ObjectId) {
        let members = self.collections.entry(collection.into()).or_default();
        if !members.contains(&id) {
            members.push(id);
        }
    }

    pub fn get(&self, id: ObjectId) -> Option<&MemoryObject> {
        self.objects.get(id.0)
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    fn id_of(&self, object: &MemoryObject) -> Option<ObjectId> {
        self.objects
            .iter()
            .position(|candidate| std::ptr::eq(candidate, object))
            .map(ObjectId)
    }

    /// World matrix of `id`: ancestors' local matrices composed parent-first.
    pub fn world_transform(&self, id: ObjectId) -> Matrix4<f64> {
        let mut chain = Vec::new();
        let mut current = Some(id);
        while let Some(cur) = current {
            let Some(object) = self.get(cur) else { break };
            chain.push(object.local.matrix());
            current = object.parent;
        }

        chain
            .iter()
            .rev()
            .fold(Matrix4::identity(), |world, local| Transform::compose(&world, local))
    }

    /// Resolver for objects borrowed from this scene.
    pub fn resolve_world_transform(&self, object: &MemoryObject) -> Matrix4<f64> {
        match self.id_of(object) {
            Some(id) => self.world_transform(id),
            None => object.local.matrix(),
        }
    }
}

impl Scene for MemoryScene {
    type Object = MemoryObject;

    fn objects(&self, root: Option<&str>) -> Option<impl Iterator<Item = &MemoryObject>> {
        let ids: Vec<ObjectId> = match root {
            None => (0..self.objects.len()).map(ObjectId).collect(),
            Some(name) => self.collections.get(name)?.clone(),
        };
        Some(ids.into_iter().filter_map(move |id| self.get(id)))
    }
}
