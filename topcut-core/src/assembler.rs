//! Turns projected segments into a sized vector document.

use nalgebra::Vector2;
use serde::Deserialize;

use crate::document::{BoundingBox, PathPrimitive, VectorDocument};
use crate::geometry::ProjectedSegment;

/// What to do with segments whose endpoints coincide after projection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub enum DegeneratePolicy {
    /// Keep them as zero-length paths, one path per mesh edge.
    #[default]
    Emit,
    /// Remove them before sizing the canvas.
    Drop,
}

/// Canvas layout options.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AssembleOptions {
    /// Margin added on every side of the drawing, in document units.
    pub padding: f64,
    /// Shift the drawing so the padded bounding box starts at (0, 0).
    pub translate_to_origin: bool,
    pub degenerate: DegeneratePolicy,
}

impl Default for AssembleOptions {
    fn default() -> Self {
        Self {
            padding: 10.0,
            translate_to_origin: true,
            degenerate: DegeneratePolicy::Emit,
        }
    }
}

/// A finished document plus the numbers the exporter reports.
#[derive(Debug, Clone, PartialEq)]
pub struct Assembled {
    pub document: VectorDocument,
    /// Bounds of the projected segments before translation.
    pub bounds: Option<BoundingBox>,
    pub degenerate_count: usize,
    pub dropped_count: usize,
}

/// Size the canvas around `segments` and emit one 2-point path per segment.
///
/// Segments are never merged: edges from different meshes carry no ordering
/// or connectivity guarantee. No segments yields an empty `0 × 0` document.
pub fn assemble(segments: Vec<ProjectedSegment>, options: &AssembleOptions) -> Assembled {
    let total = segments.len();
    let degenerate_count = segments.iter().filter(|s| s.is_degenerate()).count();

    let segments: Vec<ProjectedSegment> = match options.degenerate {
        DegeneratePolicy::Emit => segments,
        DegeneratePolicy::Drop => segments.into_iter().filter(|s| !s.is_degenerate()).collect(),
    };
    let dropped_count = total - segments.len();

    let Some(bounds) = BoundingBox::from_segments(&segments) else {
        return Assembled {
            document: VectorDocument::empty(),
            bounds: None,
            degenerate_count,
            dropped_count,
        };
    };

    let padding = Vector2::new(options.padding, options.padding);
    let padded_min = bounds.min - padding;
    let (offset, view_origin) = if options.translate_to_origin {
        (-padded_min.coords, nalgebra::Point2::origin())
    } else {
        (Vector2::zeros(), padded_min)
    };

    let paths = segments
        .iter()
        .map(|segment| PathPrimitive::segment(&segment.translated(offset)))
        .collect();

    let document = VectorDocument {
        width: bounds.width() + 2.0 * options.padding,
        height: bounds.height() + 2.0 * options.padding,
        view_origin,
        paths,
    };

    Assembled {
        document,
        bounds: Some(bounds),
        degenerate_count,
        dropped_count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Point2;

    fn seg(x1: f64, y1: f64, x2: f64, y2: f64) -> ProjectedSegment {
        ProjectedSegment::new(Point2::new(x1, y1), Point2::new(x2, y2))
    }

    fn no_padding() -> AssembleOptions {
        AssembleOptions {
            padding: 0.0,
            ..AssembleOptions::default()
        }
    }

    #[test]
    fn test_empty_input() {
        let assembled = assemble(Vec::new(), &AssembleOptions::default());
        assert!(assembled.document.is_empty());
        assert_eq!(assembled.document.width, 0.0);
        assert_eq!(assembled.document.height, 0.0);
        assert!(assembled.bounds.is_none());
    }

    #[test]
    fn test_one_path_per_segment() {
        let segments = vec![seg(0.0, 0.0, 1.0, 0.0), seg(1.0, 0.0, 1.0, 1.0), seg(1.0, 1.0, 0.0, 0.0)];
        let doc = assemble(segments, &no_padding()).document;
        assert_eq!(doc.paths.len(), 3);
        assert!(doc.paths.iter().all(|p| p.points.len() == 2));
    }

    #[test]
    fn test_translate_to_origin_with_padding() {
        let segments = vec![seg(-5.0, -3.0, 5.0, 7.0)];
        let options = AssembleOptions {
            padding: 2.0,
            ..AssembleOptions::default()
        };
        let assembled = assemble(segments, &options);
        let doc = assembled.document;

        assert_eq!(doc.width, 14.0);
        assert_eq!(doc.height, 14.0);
        assert_eq!(doc.view_origin, Point2::origin());
        assert_eq!(doc.paths[0].points, vec![Point2::new(2.0, 2.0), Point2::new(12.0, 12.0)]);
        assert_eq!(assembled.bounds.unwrap().min, Point2::new(-5.0, -3.0));
    }

    #[test]
    fn test_without_translation_keeps_coordinates() {
        let segments = vec![seg(-5.0, -3.0, 5.0, 7.0)];
        let options = AssembleOptions {
            padding: 1.0,
            translate_to_origin: false,
            ..AssembleOptions::default()
        };
        let doc = assemble(segments, &options).document;
        assert_eq!(doc.view_origin, Point2::new(-6.0, -4.0));
        assert_eq!(doc.paths[0].points[0], Point2::new(-5.0, -3.0));
        assert!(doc.paths[0].points.iter().all(|p| doc.canvas().contains(*p)));
    }

    #[test]
    fn test_degenerate_emitted_by_default() {
        let segments = vec![seg(0.0, 0.0, 4.0, 0.0), seg(2.0, 2.0, 2.0, 2.0)];
        let assembled = assemble(segments, &no_padding());
        assert_eq!(assembled.document.paths.len(), 2);
        assert_eq!(assembled.degenerate_count, 1);
        assert_eq!(assembled.dropped_count, 0);
        // The zero-length segment still counts toward the canvas.
        assert_eq!(assembled.document.height, 2.0);
    }

    #[test]
    fn test_degenerate_drop_policy() {
        let segments = vec![seg(0.0, 0.0, 4.0, 0.0), seg(2.0, 2.0, 2.0, 2.0)];
        let options = AssembleOptions {
            degenerate: DegeneratePolicy::Drop,
            ..no_padding()
        };
        let assembled = assemble(segments, &options);
        assert_eq!(assembled.document.paths.len(), 1);
        assert_eq!(assembled.dropped_count, 1);
        assert_eq!(assembled.document.height, 0.0);
    }

    #[test]
    fn test_only_degenerate_dropped_is_empty() {
        let options = AssembleOptions {
            degenerate: DegeneratePolicy::Drop,
            ..AssembleOptions::default()
        };
        let assembled = assemble(vec![seg(1.0, 1.0, 1.0, 1.0)], &options);
        assert!(assembled.document.is_empty());
        assert_eq!(assembled.document.width, 0.0);
    }

    #[test]
    fn test_all_points_inside_canvas() {
        let segments = vec![
            seg(-12.5, 3.0, 8.0, -40.0),
            seg(100.0, 0.25, -3.0, 7.0),
            seg(0.0, 0.0, 0.0, 0.0),
        ];
        let doc = assemble(segments, &AssembleOptions::default()).document;
        for path in &doc.paths {
            for p in &path.points {
                assert!(p.x >= 0.0 && p.x <= doc.width, "x out of canvas: {p:?}");
                assert!(p.y >= 0.0 && p.y <= doc.height, "y out of canvas: {p:?}");
            }
        }
    }
}
