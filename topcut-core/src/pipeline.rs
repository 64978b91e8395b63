//! The export pipeline: walk → extract → project → assemble → write.

use std::io::Write;

use nalgebra::{Matrix4, Point2};

use crate::assembler::assemble;
use crate::config::ExportConfig;
use crate::document::{BoundingBox, VectorDocument};
use crate::error::{ExportError, ExportResult};
use crate::extract::{extract_edges, MeshEdges};
use crate::geometry::ProjectedSegment;
use crate::projection::Projector;
use crate::scene::{walk_scene, Scene, SceneObject};
use crate::svg::{write_svg, write_svg_file};

/// Lifecycle of an [`Exporter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportState {
    Idle,
    Running,
    Done,
    Failed,
}

/// Summary of one export.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExportReport {
    /// Names of the mesh objects whose edges were drawn.
    pub exported: Vec<String>,
    /// Names of the mesh objects skipped because their edge list was malformed
    /// or a vertex was not finite.
    pub skipped: Vec<String>,
    pub path_count: usize,
    pub degenerate_count: usize,
    pub dropped_count: usize,
    /// Projected bounds in document units, before translation and padding.
    pub bounds: Option<BoundingBox>,
    pub canvas: (f64, f64),
}

/// Runs exports with one fixed configuration.
#[derive(Debug)]
pub struct Exporter {
    config: ExportConfig,
    state: ExportState,
}

impl Exporter {
    /// Create an exporter, rejecting an invalid configuration.
    pub fn new(config: ExportConfig) -> ExportResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            state: ExportState::Idle,
        })
    }

    pub fn config(&self) -> &ExportConfig {
        &self.config
    }

    pub fn state(&self) -> ExportState {
        self.state
    }

    /// Export to the configured output path.
    pub fn export<S, F>(&mut self, scene: &S, resolve_world_transform: F) -> ExportResult<ExportReport>
    where
        S: Scene,
        F: Fn(&S::Object) -> Matrix4<f64>,
    {
        let result = self.document(scene, resolve_world_transform).and_then(|(doc, report)| {
            write_svg_file(&doc, &self.config.stroke, &self.config.output_path)?;
            Ok(report)
        });
        self.finish(result)
    }

    /// Export to a caller-supplied stream instead of the configured path.
    pub fn export_to_writer<S, F, W>(
        &mut self,
        scene: &S,
        resolve_world_transform: F,
        writer: &mut W,
    ) -> ExportResult<ExportReport>
    where
        S: Scene,
        F: Fn(&S::Object) -> Matrix4<f64>,
        W: Write,
    {
        let result = self.document(scene, resolve_world_transform).and_then(|(doc, report)| {
            write_svg(&doc, &self.config.stroke, writer).map_err(|source| ExportError::DestinationWrite {
                path: "<stream>".into(),
                source,
            })?;
            Ok(report)
        });
        self.finish(result)
    }

    /// Run every stage except writing and hand back the assembled document.
    pub fn build_document<S, F>(
        &mut self,
        scene: &S,
        resolve_world_transform: F,
    ) -> ExportResult<(VectorDocument, ExportReport)>
    where
        S: Scene,
        F: Fn(&S::Object) -> Matrix4<f64>,
    {
        let result = self.document(scene, resolve_world_transform);
        self.finish(result)
    }

    fn finish<T>(&mut self, result: ExportResult<T>) -> ExportResult<T> {
        self.state = match &result {
            Ok(_) => ExportState::Done,
            Err(err) => {
                tracing::debug!(error = %err, "export failed");
                ExportState::Failed
            }
        };
        result
    }

    fn document<S, F>(&mut self, scene: &S, resolve_world_transform: F) -> ExportResult<(VectorDocument, ExportReport)>
    where
        S: Scene,
        F: Fn(&S::Object) -> Matrix4<f64>,
    {
        self.state = ExportState::Running;

        let config = &self.config;
        let projector: Projector = config.projector();
        let mut report = ExportReport::default();
        let mut segments = Vec::new();

        for walked in walk_scene(scene, config.root.as_deref(), resolve_world_transform)? {
            let name = walked.object.name();
            let projected = extract_edges(name, walked.mesh)
                .and_then(|edges| project_mesh(name, &edges, &walked.world, &projector));
            match projected {
                Ok(projected) => {
                    segments.extend(projected);
                    report.exported.push(name.to_string());
                }
                Err(err) => {
                    tracing::warn!(object = name, error = %err, "skipping malformed mesh");
                    report.skipped.push(name.to_string());
                }
            }
        }

        let assembled = assemble(segments, &config.assemble_options());
        let doc = assembled.document;

        report.path_count = doc.paths.len();
        report.degenerate_count = assembled.degenerate_count;
        report.dropped_count = assembled.dropped_count;
        report.bounds = assembled.bounds;
        report.canvas = (doc.width, doc.height);

        tracing::info!(
            objects = report.exported.len(),
            skipped = report.skipped.len(),
            paths = report.path_count,
            width = doc.width,
            height = doc.height,
            "assembled document"
        );

        Ok((doc, report))
    }
}

/// Project every edge of one mesh, refusing the whole mesh if its world
/// transform pushes any endpoint to NaN or infinity.
fn project_mesh(
    object: &str,
    edges: &MeshEdges<'_>,
    world: &Matrix4<f64>,
    projector: &Projector,
) -> ExportResult<Vec<ProjectedSegment>> {
    tracing::debug!(object = object, edges = edges.len(), "projecting mesh");

    let finite = |p: &Point2<f64>| p.x.is_finite() && p.y.is_finite();
    edges
        .indices()
        .iter()
        .zip(edges.endpoints())
        .map(|(&[a, b], (start, end))| {
            let segment = projector.project(&Projector::to_world(world, start, end));
            match (finite(&segment.start), finite(&segment.end)) {
                (true, true) => Ok(segment),
                (false, _) => Err(non_finite(object, a)),
                (true, false) => Err(non_finite(object, b)),
            }
        })
        .collect()
}

fn non_finite(object: &str, index: usize) -> ExportError {
    ExportError::NonFiniteVertex {
        object: object.to_string(),
        index,
    }
}
