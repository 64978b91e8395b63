//! Topcut Core Library - top-down mesh edge export for laser cutting
//!
//! Walks a host scene, projects every edge of every render-visible mesh
//! orthographically from above, and writes the result as an SVG cut sheet.
//! The host is reached through the [`Scene`], [`SceneObject`] and
//! [`MeshSource`] traits plus an injected world-transform resolver.

pub mod assembler;
pub mod config;
pub mod document;
pub mod error;
pub mod extract;
pub mod geometry;
pub mod host;
pub mod pipeline;
pub mod projection;
pub mod scene;
pub mod stl;
pub mod svg;
pub mod transform;

// Re-export commonly used types
pub use assembler::{assemble, AssembleOptions, DegeneratePolicy};
pub use config::ExportConfig;
pub use document::{BoundingBox, PathPrimitive, VectorDocument};
pub use error::{ConfigError, ExportError, ExportResult};
pub use extract::{extract_edges, MeshEdges};
pub use geometry::{MeshData, MeshSource, ProjectedSegment, WorldEdge};
pub use host::{MemoryObject, MemoryScene, ObjectId};
pub use pipeline::{ExportReport, ExportState, Exporter};
pub use projection::{Projector, UpAxis};
pub use scene::{walk_scene, Scene, SceneObject, WalkedObject};
pub use svg::{render_svg, write_svg, write_svg_file, StrokeStyle};
pub use transform::{LocalTransform, Transform};
