//! Assembled vector document and its bounding box.

use nalgebra::{Point2, Vector2};

use crate::geometry::ProjectedSegment;

/// Axis-aligned rectangle on the drawing plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min: Point2<f64>,
    pub max: Point2<f64>,
}

impl BoundingBox {
    pub fn from_point(point: Point2<f64>) -> Self {
        Self { min: point, max: point }
    }

    /// Smallest box containing every segment endpoint, `None` when empty.
    pub fn from_segments<'a>(segments: impl IntoIterator<Item = &'a ProjectedSegment>) -> Option<Self> {
        segments.into_iter().fold(None, |bounds, segment| {
            let bounds = match bounds {
                Some(b) => b.include(segment.start),
                None => Self::from_point(segment.start),
            };
            Some(bounds.include(segment.end))
        })
    }

    #[must_use]
    pub fn include(self, point: Point2<f64>) -> Self {
        Self {
            min: Point2::new(self.min.x.min(point.x), self.min.y.min(point.y)),
            max: Point2::new(self.max.x.max(point.x), self.max.y.max(point.y)),
        }
    }

    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }

    pub fn contains(&self, point: Point2<f64>) -> bool {
        point.x >= self.min.x && point.x <= self.max.x && point.y >= self.min.y && point.y <= self.max.y
    }
}

/// One connected stroke.
#[derive(Debug, Clone, PartialEq)]
pub struct PathPrimitive {
    pub points: Vec<Point2<f64>>,
}

impl PathPrimitive {
    pub fn segment(segment: &ProjectedSegment) -> Self {
        Self {
            points: vec![segment.start, segment.end],
        }
    }

    pub fn is_degenerate(&self) -> bool {
        self.points.windows(2).all(|pair| pair[0] == pair[1])
    }
}

/// A canvas plus the ordered strokes drawn on it.
///
/// `view_origin` is the document coordinate shown at the canvas' top-left
/// corner; it is the origin when the assembler translated the drawing.
#[derive(Debug, Clone, PartialEq)]
pub struct VectorDocument {
    pub width: f64,
    pub height: f64,
    pub view_origin: Point2<f64>,
    pub paths: Vec<PathPrimitive>,
}

impl VectorDocument {
    pub fn empty() -> Self {
        Self {
            width: 0.0,
            height: 0.0,
            view_origin: Point2::origin(),
            paths: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// The canvas rectangle in document coordinates.
    pub fn canvas(&self) -> BoundingBox {
        BoundingBox {
            min: self.view_origin,
            max: self.view_origin + Vector2::new(self.width, self.height),
        }
    }
}

impl Default for VectorDocument {
    fn default() -> Self {
        Self::empty()
    }
}
