//! SVG serialization of a [`VectorDocument`].
//!
//! Output is deterministic: numbers are printed with a fixed precision and
//! elements keep document order, so the same document always renders to the
//! same bytes.

use std::fmt::Write as _;
use std::io::Write;
use std::path::Path;

use serde::Deserialize;
use tempfile::NamedTempFile;

use crate::document::VectorDocument;
use crate::error::{ExportError, ExportResult};

/// Decimal places kept for coordinates and sizes. Anything finer than half
/// the last place is lost, see [`ExportConfig::unit_scale`](crate::ExportConfig::unit_scale).
const PRECISION: usize = 4;

/// Stroke applied uniformly to every cut path.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct StrokeStyle {
    /// CSS color string.
    pub color: String,
    pub width: f64,
}

impl Default for StrokeStyle {
    fn default() -> Self {
        Self {
            color: "red".to_string(),
            width: 1.0,
        }
    }
}

/// Format a number with at most [`PRECISION`] decimals, no trailing zeros and no `-0`.
fn fmt_num(value: f64) -> String {
    let mut text = format!("{:.*}", PRECISION, value);
    if text.contains('.') {
        let trimmed = text.trim_end_matches('0').trim_end_matches('.').len();
        text.truncate(trimmed);
    }
    if text == "-0" {
        text.remove(0);
    }
    text
}

/// Escape a value for use inside a double-quoted XML attribute.
fn escape_attr(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

/// Render the document as SVG text.
#[must_use]
pub fn render_svg(doc: &VectorDocument, stroke: &StrokeStyle) -> String {
    let width = fmt_num(doc.width);
    let height = fmt_num(doc.height);

    let mut svg = format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{}\" height=\"{}\" viewBox=\"{} {} {} {}\">\n",
        width,
        height,
        fmt_num(doc.view_origin.x),
        fmt_num(doc.view_origin.y),
        width,
        height,
    );

    let _ = writeln!(
        svg,
        "  <g fill=\"none\" stroke=\"{}\" stroke-width=\"{}\">",
        escape_attr(&stroke.color),
        fmt_num(stroke.width)
    );

    for path in &doc.paths {
        let mut d = String::new();
        for (i, point) in path.points.iter().enumerate() {
            let command = if i == 0 { 'M' } else { 'L' };
            if i > 0 {
                d.push(' ');
            }
            let _ = write!(d, "{} {} {}", command, fmt_num(point.x), fmt_num(point.y));
        }
        let _ = writeln!(svg, "    <path d=\"{d}\"/>");
    }

    svg.push_str("  </g>\n</svg>\n");
    svg
}

/// Write the rendered document to a stream.
pub fn write_svg<W: Write>(doc: &VectorDocument, stroke: &StrokeStyle, writer: &mut W) -> std::io::Result<()> {
    writer.write_all(render_svg(doc, stroke).as_bytes())?;
    writer.flush()
}

/// Write the rendered document to `path`, replacing it atomically.
///
/// The document goes to a temporary file next to `path` which is then renamed
/// over the target; on failure the temporary file is removed and nothing is
/// left at `path`.
pub fn write_svg_file(doc: &VectorDocument, stroke: &StrokeStyle, path: &Path) -> ExportResult<()> {
    let io_err = |source: std::io::Error| ExportError::DestinationWrite {
        path: path.to_path_buf(),
        source,
    };

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut file = NamedTempFile::new_in(dir).map_err(io_err)?;
    write_svg(doc, stroke, &mut file).map_err(io_err)?;
    file.as_file().sync_all().map_err(io_err)?;
    file.persist(path).map_err(|e| io_err(e.error))?;

    tracing::debug!(path = %path.display(), "wrote svg");
    Ok(())
}
