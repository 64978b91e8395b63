//! Scene-file host for the topcut exporter.
//!
//! Reads a RON scene description, builds a [`MemoryScene`] from it and runs a
//! single export with the configuration stored in the same file.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use nalgebra::Point3;
use serde::Deserialize;
use thiserror::Error;
use topcut_core::{
    stl, ExportConfig, ExportError, ExportReport, Exporter, LocalTransform, MemoryObject, MemoryScene, MeshData,
};

#[derive(Debug, Error)]
pub enum SceneFileError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid scene file: {0}")]
    Parse(#[from] ron::error::SpannedError),

    #[error("Duplicate object name: {0}")]
    DuplicateName(String),

    #[error("Object {object} has unknown parent {parent}")]
    UnknownParent { object: String, parent: String },

    #[error("Parent cycle through {0}")]
    ParentCycle(String),

    #[error("Collection {collection} references unknown object {object}")]
    UnknownMember { collection: String, object: String },

    #[error("Failed to load mesh {path}: {source}")]
    Stl {
        path: PathBuf,
        #[source]
        source: stl::StlError,
    },
}

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Scene(#[from] SceneFileError),

    #[error(transparent)]
    Export(#[from] ExportError),
}

/// Where an object's mesh comes from.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub enum MeshDesc {
    /// No mesh: lights, cameras, empties.
    #[default]
    Empty,
    Cube {
        size: f64,
    },
    Stl {
        path: PathBuf,
    },
    /// Explicit vertices and edges.
    Edges {
        vertices: Vec<[f64; 3]>,
        edges: Vec<[usize; 2]>,
    },
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ObjectDesc {
    pub name: String,
    #[serde(default)]
    pub parent: Option<String>,
    #[serde(default)]
    pub transform: LocalTransform,
    #[serde(default)]
    pub mesh: MeshDesc,
    #[serde(default)]
    pub hide_render: bool,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SceneFile {
    #[serde(default)]
    pub export: ExportConfig,
    #[serde(default)]
    pub collections: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    pub objects: Vec<ObjectDesc>,
}

/// A scene ready to export.
#[derive(Debug, Clone)]
pub struct LoadedScene {
    pub scene: MemoryScene,
    pub config: ExportConfig,
}

impl SceneFile {
    pub fn parse(text: &str) -> Result<Self, SceneFileError> {
        Ok(ron::from_str(text)?)
    }

    /// Build the in-memory scene. Relative mesh and output paths resolve
    /// against `base_dir`.
    pub fn build(self, base_dir: &Path) -> Result<LoadedScene, SceneFileError> {
        let mut by_name: HashMap<&str, usize> = HashMap::new();
        for (i, desc) in self.objects.iter().enumerate() {
            if by_name.insert(desc.name.as_str(), i).is_some() {
                return Err(SceneFileError::DuplicateName(desc.name.clone()));
            }
        }

        let order = parent_first_order(&self.objects, &by_name)?;

        let mut scene = MemoryScene::new();
        let mut ids = vec![None; self.objects.len()];
        for index in order {
            let desc = &self.objects[index];
            let mut object = MemoryObject::new(desc.name.clone()).with_transform(desc.transform);
            object.mesh = load_mesh(&desc.mesh, base_dir)?;
            object.hide_render = desc.hide_render;
            if let Some(parent) = desc.parent.as_deref().and_then(|p| by_name.get(p)).and_then(|&p| ids[p]) {
                object = object.with_parent(parent);
            }
            ids[index] = Some(scene.add(object));
        }

        for (collection, members) in &self.collections {
            for member in members {
                let id = by_name
                    .get(member.as_str())
                    .and_then(|&i| ids[i])
                    .ok_or_else(|| SceneFileError::UnknownMember {
                        collection: collection.clone(),
                        object: member.clone(),
                    })?;
                scene.link(collection.clone(), id);
            }
        }

        let mut config = self.export;
        if config.output_path.is_relative() {
            config.output_path = base_dir.join(&config.output_path);
        }

        Ok(LoadedScene { scene, config })
    }
}

/// Order objects so every parent precedes its children, rejecting unknown
/// parents and cycles.
fn parent_first_order(objects: &[ObjectDesc], by_name: &HashMap<&str, usize>) -> Result<Vec<usize>, SceneFileError> {
    #[derive(Clone, Copy, PartialEq)]
    enum Mark {
        Unvisited,
        Visiting,
        Done,
    }

    let mut marks = vec![Mark::Unvisited; objects.len()];
    let mut order = Vec::with_capacity(objects.len());

    for start in 0..objects.len() {
        // Walk up the parent chain, then emit it top-down.
        let mut chain = Vec::new();
        let mut current = Some(start);
        while let Some(index) = current {
            match marks[index] {
                Mark::Done => break,
                Mark::Visiting => return Err(SceneFileError::ParentCycle(objects[index].name.clone())),
                Mark::Unvisited => {}
            }
            marks[index] = Mark::Visiting;
            chain.push(index);

            current = match &objects[index].parent {
                None => None,
                Some(parent) => Some(*by_name.get(parent.as_str()).ok_or_else(|| {
                    SceneFileError::UnknownParent {
                        object: objects[index].name.clone(),
                        parent: parent.clone(),
                    }
                })?),
            };
        }

        for index in chain.into_iter().rev() {
            marks[index] = Mark::Done;
            order.push(index);
        }
    }

    Ok(order)
}

fn load_mesh(desc: &MeshDesc, base_dir: &Path) -> Result<Option<MeshData>, SceneFileError> {
    match desc {
        MeshDesc::Empty => Ok(None),
        MeshDesc::Cube { size } => Ok(Some(MeshData::cube(*size))),
        MeshDesc::Edges { vertices, edges } => Ok(Some(MeshData::new(
            vertices.iter().map(|&[x, y, z]| Point3::new(x, y, z)).collect(),
            edges.clone(),
        ))),
        MeshDesc::Stl { path } => {
            let path = base_dir.join(path);
            let data = std::fs::read(&path).map_err(|source| SceneFileError::Io {
                path: path.clone(),
                source,
            })?;
            let mesh = stl::parse_stl(&data).map_err(|source| SceneFileError::Stl {
                path: path.clone(),
                source,
            })?;
            tracing::debug!(path = %path.display(), edges = mesh.edge_count(), "loaded stl");
            Ok(Some(mesh))
        }
    }
}

/// Read and build a scene file.
pub fn load_scene_file(path: &Path) -> Result<LoadedScene, SceneFileError> {
    let text = std::fs::read_to_string(path).map_err(|source| SceneFileError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
    SceneFile::parse(&text)?.build(base_dir)
}

/// Load `path` and export it to the output path it configures.
pub fn run(path: &Path) -> Result<ExportReport, CliError> {
    let LoadedScene { scene, config } = load_scene_file(path)?;
    tracing::info!(objects = scene.len(), output = %config.output_path.display(), "exporting scene");

    let mut exporter = Exporter::new(config)?;
    let report = exporter.export(&scene, |object| scene.resolve_world_transform(object))?;
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use topcut_core::{Scene, SceneObject, UpAxis};

    const DEMO: &str = r#"(
    export: (output_path: "out.svg", unit_scale: 1.0, up_axis: Z, padding: 0.0),
    collections: { "sheet": ["base", "lid"] },
    objects: [
        (name: "lid", parent: Some("base"), mesh: Cube(size: 1.0), transform: (translation: (0.0, 0.0, 2.0))),
        (name: "base", mesh: Cube(size: 2.0), transform: (translation: (5.0, 0.0, 0.0))),
        (name: "lamp"),
        (name: "ghost", mesh: Cube(size: 1.0), hide_render: true),
        (name: "wire", mesh: Edges(vertices: [(0.0, 0.0, 0.0), (1.0, 0.0, 0.0)], edges: [(0, 1)])),
    ],
)"#;

    #[test]
    fn test_parse_demo() {
        let file = SceneFile::parse(DEMO).unwrap();
        assert_eq!(file.objects.len(), 5);
        assert_eq!(file.export.up_axis, UpAxis::Z);
        assert_eq!(file.objects[2].mesh, MeshDesc::Empty);
        assert!(file.objects[3].hide_render);
    }

    #[test]
    fn test_build_orders_parents_first() {
        let loaded = SceneFile::parse(DEMO).unwrap().build(Path::new("/tmp/scenes")).unwrap();
        let names: Vec<_> = loaded.scene.objects(None).unwrap().map(|o| o.name().to_string()).collect();
        assert_eq!(names, vec!["base", "lid", "lamp", "ghost", "wire"]);
        assert_eq!(loaded.config.output_path, PathBuf::from("/tmp/scenes/out.svg"));

        let lid = loaded.scene.objects(Some("sheet")).unwrap().find(|o| o.name() == "lid").unwrap();
        let origin = loaded.scene.resolve_world_transform(lid).transform_point(&Point3::origin());
        assert_eq!(origin, Point3::new(5.0, 0.0, 2.0));
    }

    #[test]
    fn test_bundled_demo_scene() {
        let file = SceneFile::parse(include_str!("../scenes/demo.ron")).unwrap();
        let loaded = file.build(Path::new("scenes")).unwrap();
        assert_eq!(loaded.scene.len(), 5);
        assert_eq!(loaded.config.stroke.width, 0.1);
        assert_eq!(loaded.scene.objects(Some("boxes")).unwrap().count(), 2);
    }

    #[test]
    fn test_unknown_parent() {
        let text = r#"(objects: [(name: "a", parent: Some("nobody"))])"#;
        let err = SceneFile::parse(text).unwrap().build(Path::new(".")).unwrap_err();
        assert!(matches!(err, SceneFileError::UnknownParent { .. }));
    }

    #[test]
    fn test_parent_cycle() {
        let text = r#"(objects: [(name: "a", parent: Some("b")), (name: "b", parent: Some("a"))])"#;
        let err = SceneFile::parse(text).unwrap().build(Path::new(".")).unwrap_err();
        assert!(matches!(err, SceneFileError::ParentCycle(_)));
    }

    #[test]
    fn test_duplicate_name() {
        let text = r#"(objects: [(name: "a"), (name: "a")])"#;
        let err = SceneFile::parse(text).unwrap().build(Path::new(".")).unwrap_err();
        assert!(matches!(err, SceneFileError::DuplicateName(ref n) if n == "a"));
    }

    #[test]
    fn test_unknown_collection_member() {
        let text = r#"(collections: { "sheet": ["missing"] }, objects: [(name: "a")])"#;
        let err = SceneFile::parse(text).unwrap().build(Path::new(".")).unwrap_err();
        assert!(matches!(err, SceneFileError::UnknownMember { .. }));
    }

    #[test]
    fn test_run_writes_svg() {
        let dir = tempfile::tempdir().unwrap();
        let scene_path = dir.path().join("demo.ron");
        std::fs::write(&scene_path, DEMO).unwrap();

        let report = run(&scene_path).unwrap();
        assert_eq!(report.exported, vec!["base", "lid", "wire"]);
        assert_eq!(report.path_count, 25);

        let svg = std::fs::read_to_string(dir.path().join("out.svg")).unwrap();
        assert_eq!(svg.matches("<path").count(), 25);
    }

    #[test]
    fn test_run_missing_stl() {
        let dir = tempfile::tempdir().unwrap();
        let scene_path = dir.path().join("scene.ron");
        std::fs::write(&scene_path, r#"(objects: [(name: "part", mesh: Stl(path: "part.stl"))])"#).unwrap();

        let err = run(&scene_path).unwrap_err();
        assert!(matches!(err, CliError::Scene(SceneFileError::Io { .. })));
        assert!(!dir.path().join("export.svg").exists());
    }
}
