//! Export configuration, passed explicitly into each export.

use std::path::PathBuf;

use serde::Deserialize;

use crate::assembler::{AssembleOptions, DegeneratePolicy};
use crate::error::ConfigError;
use crate::projection::{Projector, UpAxis};
use crate::svg::StrokeStyle;

/// Default multiplier from scene units to document units.
pub const DEFAULT_UNIT_SCALE: f64 = 10.0;
/// Default margin around the drawing, in document units.
pub const DEFAULT_PADDING: f64 = 10.0;

/// Everything one export needs to know besides the scene itself.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Destination file for [`Exporter::export`](crate::Exporter::export).
    pub output_path: PathBuf,
    /// Multiplier from scene units to document units.
    ///
    /// SVG coordinates are written with 4 decimals, so scene features smaller
    /// than `0.00005 / unit_scale` round to the same document coordinate.
    pub unit_scale: f64,
    pub up_axis: UpAxis,
    pub padding: f64,
    pub stroke: StrokeStyle,
    pub degenerate: DegeneratePolicy,
    pub translate_to_origin: bool,
    /// Named collection to export instead of the whole scene.
    pub root: Option<String>,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_path: PathBuf::from("export.svg"),
            unit_scale: DEFAULT_UNIT_SCALE,
            up_axis: UpAxis::Z,
            padding: DEFAULT_PADDING,
            stroke: StrokeStyle::default(),
            degenerate: DegeneratePolicy::Emit,
            translate_to_origin: true,
            root: None,
        }
    }
}

impl ExportConfig {
    pub fn new(output_path: impl Into<PathBuf>) -> Self {
        Self {
            output_path: output_path.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_unit_scale(mut self, unit_scale: f64) -> Self {
        self.unit_scale = unit_scale;
        self
    }

    #[must_use]
    pub fn with_up_axis(mut self, up_axis: UpAxis) -> Self {
        self.up_axis = up_axis;
        self
    }

    #[must_use]
    pub fn with_padding(mut self, padding: f64) -> Self {
        self.padding = padding;
        self
    }

    #[must_use]
    pub fn with_stroke(mut self, color: &str, width: f64) -> Self {
        self.stroke = StrokeStyle {
            color: color.to_string(),
            width,
        };
        self
    }

    #[must_use]
    pub fn with_degenerate(mut self, degenerate: DegeneratePolicy) -> Self {
        self.degenerate = degenerate;
        self
    }

    #[must_use]
    pub fn with_translate_to_origin(mut self, translate: bool) -> Self {
        self.translate_to_origin = translate;
        self
    }

    #[must_use]
    pub fn with_root(mut self, root: impl Into<String>) -> Self {
        self.root = Some(root.into());
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.unit_scale.is_finite() || self.unit_scale <= 0.0 {
            return Err(ConfigError::InvalidUnitScale(self.unit_scale));
        }
        if !self.padding.is_finite() || self.padding < 0.0 {
            return Err(ConfigError::InvalidPadding(self.padding));
        }
        if !self.stroke.width.is_finite() || self.stroke.width <= 0.0 {
            return Err(ConfigError::InvalidStrokeWidth(self.stroke.width));
        }
        Ok(())
    }

    pub fn projector(&self) -> Projector {
        Projector::new(self.up_axis, self.unit_scale)
    }

    pub fn assemble_options(&self) -> AssembleOptions {
        AssembleOptions {
            padding: self.padding,
            translate_to_origin: self.translate_to_origin,
            degenerate: self.degenerate,
        }
    }
}
