//! Top-down orthographic projection onto the drawing plane.

use nalgebra::{Matrix4, Point2, Point3, Vector3};
use serde::Deserialize;

use crate::geometry::{ProjectedSegment, WorldEdge};

/// The scene axis treated as "up", dropped by the projection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub enum UpAxis {
    X,
    Y,
    #[default]
    Z,
}

impl UpAxis {
    /// World directions that appear as screen-right and screen-up when the
    /// scene is viewed from above. `right × up` is always the up axis, so the
    /// drawing is never mirrored.
    pub fn screen_axes(self) -> (Vector3<f64>, Vector3<f64>) {
        match self {
            UpAxis::Z => (Vector3::x(), Vector3::y()),
            UpAxis::Y => (Vector3::x(), -Vector3::z()),
            UpAxis::X => (Vector3::y(), Vector3::z()),
        }
    }
}

/// Maps world space to document space.
///
/// Document x follows screen-right, document y follows screen-down (as in
/// SVG), and both are multiplied by `unit_scale`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projector {
    pub up_axis: UpAxis,
    pub unit_scale: f64,
}

impl Projector {
    pub fn new(up_axis: UpAxis, unit_scale: f64) -> Self {
        Self { up_axis, unit_scale }
    }

    /// Apply an object's world transform to both endpoints of a local edge.
    pub fn to_world(
        transform: &Matrix4<f64>,
        start: &Point3<f64>,
        end: &Point3<f64>,
    ) -> WorldEdge {
        WorldEdge::new(transform.transform_point(start), transform.transform_point(end))
    }

    /// Drop the up axis and scale into document units.
    pub fn project_point(&self, point: &Point3<f64>) -> Point2<f64> {
        let (right, up) = self.up_axis.screen_axes();
        let x = point.coords.dot(&right);
        let y = -point.coords.dot(&up);
        Point2::new(x * self.unit_scale, y * self.unit_scale)
    }

    pub fn project(&self, edge: &WorldEdge) -> ProjectedSegment {
        ProjectedSegment::new(self.project_point(&edge.start), self.project_point(&edge.end))
    }
}

impl Default for Projector {
    fn default() -> Self {
        Self::new(UpAxis::default(), 1.0)
    }
}
