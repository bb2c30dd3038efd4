//! Headless chart rendering.
//!
//! Charts are written straight to disk as SVG documents. The pipeline's
//! contract with generated scripts is only that chart files land in the
//! output directory; the drawing itself is intentionally plain.

use std::fmt::Write as _;
use std::io;
use std::path::Path;

/// Kind of chart to draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    /// Vertical bars, one per labeled point.
    Bar,
    /// A connected line through the points in order.
    Line,
    /// Unconnected markers.
    Scatter,
}

/// A fully resolved chart: labeled points plus axis names.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSpec {
    /// Chart kind.
    pub kind: ChartKind,
    /// X-axis label.
    pub x_label: String,
    /// Y-axis label.
    pub y_label: String,
    /// `(x label, y value)` pairs in draw order.
    pub points: Vec<(String, f64)>,
}

const WIDTH: f64 = 640.0;
const HEIGHT: f64 = 480.0;
const MARGIN: f64 = 48.0;

/// Writes the chart as an SVG file at `path`.
///
/// The parent directory is not created here: scripts are expected to
/// `create_dir` the output directory themselves.
pub fn write_chart(spec: &ChartSpec, path: &Path) -> io::Result<()> {
    std::fs::write(path, render_svg(spec))
}

/// Renders the chart as an SVG document.
#[must_use]
pub fn render_svg(spec: &ChartSpec) -> String {
    let plot_w = WIDTH - 2.0 * MARGIN;
    let plot_h = HEIGHT - 2.0 * MARGIN;

    let max_y = spec
        .points
        .iter()
        .map(|(_, y)| *y)
        .fold(f64::NEG_INFINITY, f64::max)
        .max(0.0);
    let min_y = spec
        .points
        .iter()
        .map(|(_, y)| *y)
        .fold(f64::INFINITY, f64::min)
        .min(0.0);
    let span = if (max_y - min_y).abs() < f64::EPSILON {
        1.0
    } else {
        max_y - min_y
    };

    let n = spec.points.len().max(1) as f64;
    let step = plot_w / n;
    let y_of = |y: f64| MARGIN + plot_h - ((y - min_y) / span) * plot_h;

    let mut svg = String::new();
    let _ = writeln!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{WIDTH}" height="{HEIGHT}" viewBox="0 0 {WIDTH} {HEIGHT}">"#
    );
    let _ = writeln!(svg, r#"<rect width="{WIDTH}" height="{HEIGHT}" fill="white"/>"#);

    // Axes.
    let x0 = MARGIN;
    let y0 = MARGIN + plot_h;
    let _ = writeln!(
        svg,
        r#"<line x1="{x0}" y1="{MARGIN}" x2="{x0}" y2="{y0}" stroke="black"/>"#
    );
    let _ = writeln!(
        svg,
        r#"<line x1="{x0}" y1="{y0}" x2="{end}" y2="{y0}" stroke="black"/>"#,
        end = MARGIN + plot_w
    );

    match spec.kind {
        ChartKind::Bar => {
            let bar_w = step * 0.7;
            for (i, (_, y)) in spec.points.iter().enumerate() {
                let x = MARGIN + (i as f64) * step + (step - bar_w) / 2.0;
                let top = y_of(*y);
                let base = y_of(0.0);
                let (rect_y, rect_h) = if top <= base {
                    (top, base - top)
                } else {
                    (base, top - base)
                };
                let _ = writeln!(
                    svg,
                    r#"<rect x="{x:.1}" y="{rect_y:.1}" width="{bar_w:.1}" height="{rect_h:.1}" fill="steelblue"/>"#
                );
            }
        }
        ChartKind::Line => {
            let coords: Vec<String> = spec
                .points
                .iter()
                .enumerate()
                .map(|(i, (_, y))| {
                    format!("{:.1},{:.1}", MARGIN + (i as f64 + 0.5) * step, y_of(*y))
                })
                .collect();
            let _ = writeln!(
                svg,
                r#"<polyline points="{}" fill="none" stroke="steelblue" stroke-width="2"/>"#,
                coords.join(" ")
            );
        }
        ChartKind::Scatter => {
            for (i, (_, y)) in spec.points.iter().enumerate() {
                let _ = writeln!(
                    svg,
                    r#"<circle cx="{:.1}" cy="{:.1}" r="3" fill="steelblue"/>"#,
                    MARGIN + (i as f64 + 0.5) * step,
                    y_of(*y)
                );
            }
        }
    }

    // Point labels along the x axis, thinned when crowded.
    let label_every = (spec.points.len() / 16).max(1);
    for (i, (label, _)) in spec.points.iter().enumerate() {
        if i % label_every != 0 {
            continue;
        }
        let _ = writeln!(
            svg,
            r#"<text x="{:.1}" y="{:.1}" font-size="10" text-anchor="middle">{}</text>"#,
            MARGIN + (i as f64 + 0.5) * step,
            y0 + 14.0,
            escape(label)
        );
    }

    let _ = writeln!(
        svg,
        r#"<text x="{:.1}" y="{:.1}" font-size="12" text-anchor="middle">{}</text>"#,
        MARGIN + plot_w / 2.0,
        HEIGHT - 8.0,
        escape(&spec.x_label)
    );
    let mid = MARGIN + plot_h / 2.0;
    let _ = writeln!(
        svg,
        r#"<text x="14" y="{mid:.1}" font-size="12" text-anchor="middle" transform="rotate(-90 14 {mid:.1})">{}</text>"#,
        escape(&spec.y_label)
    );

    svg.push_str("</svg>\n");
    svg
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_spec(kind: ChartKind) -> ChartSpec {
        ChartSpec {
            kind,
            x_label: "city".to_string(),
            y_label: "price".to_string(),
            points: vec![
                ("oslo".to_string(), 10.0),
                ("bergen".to_string(), 7.5),
                ("voss".to_string(), 3.0),
            ],
        }
    }

    #[test]
    fn test_bar_chart_has_rects() {
        let svg = render_svg(&sample_spec(ChartKind::Bar));
        assert!(svg.starts_with("<svg"));
        assert_eq!(svg.matches("<rect").count(), 4); // background + 3 bars
        assert!(svg.contains("oslo"));
    }

    #[test]
    fn test_line_chart_has_polyline() {
        let svg = render_svg(&sample_spec(ChartKind::Line));
        assert!(svg.contains("<polyline"));
    }

    #[test]
    fn test_scatter_has_circles() {
        let svg = render_svg(&sample_spec(ChartKind::Scatter));
        assert_eq!(svg.matches("<circle").count(), 3);
    }

    #[test]
    fn test_labels_escaped() {
        let spec = ChartSpec {
            kind: ChartKind::Bar,
            x_label: "a<b".to_string(),
            y_label: "y".to_string(),
            points: vec![("x".to_string(), 1.0)],
        };
        let svg = render_svg(&spec);
        assert!(svg.contains("a&lt;b"));
        assert!(!svg.contains("a<b"));
    }

    #[test]
    fn test_write_chart_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chart.svg");
        write_chart(&sample_spec(ChartKind::Bar), &path).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_write_chart_missing_dir_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent").join("chart.svg");
        assert!(write_chart(&sample_spec(ChartKind::Bar), &path).is_err());
    }

    #[test]
    fn test_empty_points_render() {
        let spec = ChartSpec {
            kind: ChartKind::Line,
            x_label: "x".to_string(),
            y_label: "y".to_string(),
            points: Vec::new(),
        };
        // Must not panic or divide by zero.
        let svg = render_svg(&spec);
        assert!(svg.contains("</svg>"));
    }
}
