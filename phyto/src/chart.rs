//! Line chart of a decay series: axes, horizontal grid, polyline, point
//! markers and two axis labels.

use serde::{Deserialize, Serialize};

use crate::decay::SeriesPoint;
use crate::scene::{DrawOp, Font, Path, Point, Rgb, Scene, TextAlign};
use crate::PhytoError;

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct Padding {
    pub left: f64,
    pub right: f64,
    pub top: f64,
    pub bottom: f64,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ChartStyle {
    pub padding: Padding,
    pub axis_color: Rgb,
    pub axis_width: f64,
    pub grid_color: Rgb,
    pub grid_width: f64,
    /// The plot height is split into this many bands; a gridline is drawn
    /// between each pair of neighbouring bands.
    pub grid_divisions: u32,
    pub line_color: Rgb,
    pub line_width: f64,
    pub point_radius: f64,
    pub label_color: Rgb,
    pub label_font: Font,
    pub y_label: String,
    pub x_label: String,
}

impl Default for ChartStyle {
    fn default() -> Self {
        Self {
            padding: Padding {
                left: 60.0,
                right: 20.0,
                top: 20.0,
                bottom: 40.0,
            },
            axis_color: Rgb::new(0xcf, 0xe7, 0xdb),
            axis_width: 1.0,
            grid_color: Rgb::new(0xe7, 0xf3, 0xee),
            grid_width: 1.0,
            grid_divisions: 5,
            line_color: Rgb::new(0x2e, 0x8b, 0x57),
            line_width: 2.0,
            point_radius: 3.5,
            label_color: Rgb::new(0x5b, 0x6b, 0x60),
            label_font: Font {
                size_px: 12.0,
                family: "Inter, Roboto, sans-serif".to_string(),
            },
            y_label: "Vi".to_string(),
            x_label: "i".to_string(),
        }
    }
}

/// Maps a data interval onto a pixel interval. A zero (or NaN) data span is
/// replaced by 1 so a constant series still lands inside the plot.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LinearScale {
    min: f64,
    span: f64,
    start: f64,
    len: f64,
    inverted: bool,
}

impl LinearScale {
    pub fn new(min: f64, max: f64, start: f64, len: f64) -> Self {
        let span = max - min;
        let span = if span == 0.0 || span.is_nan() { 1.0 } else { span };
        Self {
            min,
            span,
            start,
            len,
            inverted: false,
        }
    }

    /// Larger values map to smaller pixel offsets (screen y axis).
    pub fn inverted(mut self) -> Self {
        self.inverted = true;
        self
    }

    pub fn map(&self, v: f64) -> f64 {
        let t = (v - self.min) / self.span;
        let t = if self.inverted { 1.0 - t } else { t };
        self.start + t * self.len
    }
}

fn bounds(values: impl Iterator<Item = f64>) -> (f64, f64) {
    values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    })
}

/// Lay out the chart for `points` on a `width × height` surface.
pub fn layout_chart(
    points: &[SeriesPoint],
    width: u32,
    height: u32,
    style: &ChartStyle,
) -> Result<Scene, PhytoError> {
    if points.is_empty() {
        return Err(PhytoError::EmptySeries);
    }
    let pad = style.padding;
    let plot_w = width as f64 - pad.left - pad.right;
    let plot_h = height as f64 - pad.top - pad.bottom;

    let (x_min, x_max) = bounds(points.iter().map(|p| p.i as f64));
    let (y_min, y_max) = bounds(points.iter().map(|p| p.vi));
    let sx = LinearScale::new(x_min, x_max, pad.left, plot_w);
    let sy = LinearScale::new(y_min, y_max, pad.top, plot_h).inverted();

    let mut scene = Scene::new(width, height);
    scene.push(DrawOp::Clear { color: None });

    let axes = Path::new()
        .move_to(pad.left, pad.top)
        .line_to(pad.left, pad.top + plot_h)
        .line_to(pad.left + plot_w, pad.top + plot_h);
    scene.push(DrawOp::StrokePath {
        path: axes,
        color: style.axis_color,
        width: style.axis_width,
    });

    let divisions = style.grid_divisions.max(1);
    for g in 1..divisions {
        let gy = pad.top + plot_h / divisions as f64 * g as f64;
        scene.push(DrawOp::StrokePath {
            path: Path::new().move_to(pad.left, gy).line_to(pad.left + plot_w, gy),
            color: style.grid_color,
            width: style.grid_width,
        });
    }

    let pixels: Vec<Point> = points
        .iter()
        .map(|p| Point::new(sx.map(p.i as f64), sy.map(p.vi)))
        .collect();

    let mut line = Path::new();
    for (idx, px) in pixels.iter().enumerate() {
        line = if idx == 0 {
            line.move_to(px.x, px.y)
        } else {
            line.line_to(px.x, px.y)
        };
    }
    scene.push(DrawOp::StrokePath {
        path: line,
        color: style.line_color,
        width: style.line_width,
    });

    for px in &pixels {
        scene.push(DrawOp::FillCircle {
            center: *px,
            radius: style.point_radius,
            color: style.line_color,
        });
    }

    scene.push(DrawOp::Text {
        text: style.y_label.clone(),
        pos: Point::new(pad.left - 8.0, pad.top + 10.0),
        color: style.label_color,
        font: style.label_font.clone(),
        align: TextAlign::Right,
    });
    scene.push(DrawOp::Text {
        text: style.x_label.clone(),
        pos: Point::new(pad.left + plot_w / 2.0, pad.top + plot_h + 28.0),
        color: style.label_color,
        font: style.label_font.clone(),
        align: TextAlign::Center,
    });

    Ok(scene)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decay::{compute_series, CalcInput};

    fn circles(scene: &Scene) -> Vec<Point> {
        scene
            .ops()
            .iter()
            .filter_map(|op| match op {
                DrawOp::FillCircle { center, .. } => Some(*center),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn scale_guards_zero_span() {
        let s = LinearScale::new(5.0, 5.0, 10.0, 100.0);
        assert_eq!(s.map(5.0), 10.0);
        assert_eq!(s.map(6.0), 110.0);
        let inv = LinearScale::new(0.0, 10.0, 20.0, 200.0).inverted();
        assert_eq!(inv.map(10.0), 20.0);
        assert_eq!(inv.map(0.0), 220.0);
    }

    #[test]
    fn empty_series_is_rejected() {
        assert!(matches!(
            layout_chart(&[], 640, 320, &ChartStyle::default()),
            Err(PhytoError::EmptySeries)
        ));
    }

    #[test]
    fn points_span_the_plot_area() {
        let series = compute_series(&CalcInput::new(100.0, 0.1, 3).unwrap()).unwrap();
        let scene = layout_chart(&series.points, 640, 320, &ChartStyle::default()).unwrap();
        let pts = circles(&scene);
        assert_eq!(pts.len(), 4);
        // W = 640 - 80 = 560, H = 320 - 60 = 260
        assert_eq!(pts[0], Point::new(60.0, 20.0));
        assert_eq!(pts[3], Point::new(620.0, 280.0));
        assert!(pts.windows(2).all(|w| w[0].x < w[1].x && w[0].y < w[1].y));
    }

    #[test]
    fn draw_order_and_grid() {
        let series = compute_series(&CalcInput::new(100.0, 0.1, 3).unwrap()).unwrap();
        let style = ChartStyle::default();
        let scene = layout_chart(&series.points, 640, 320, &style).unwrap();
        assert_eq!(scene.ops()[0], DrawOp::Clear { color: None });

        let grid: Vec<f64> = scene
            .ops()
            .iter()
            .filter_map(|op| match op {
                DrawOp::StrokePath { path, color, .. } if *color == style.grid_color => {
                    Some(path.flatten(0.5)[0][0].y)
                }
                _ => None,
            })
            .collect();
        assert_eq!(grid, vec![72.0, 124.0, 176.0, 228.0]);

        let labels: Vec<(&str, Point, TextAlign)> = scene
            .ops()
            .iter()
            .filter_map(|op| match op {
                DrawOp::Text { text, pos, align, .. } => Some((text.as_str(), *pos, *align)),
                _ => None,
            })
            .collect();
        assert_eq!(
            labels,
            vec![
                ("Vi", Point::new(52.0, 30.0), TextAlign::Right),
                ("i", Point::new(340.0, 308.0), TextAlign::Center),
            ]
        );
    }

    #[test]
    fn single_point_sits_at_plot_origin() {
        let points = [SeriesPoint { i: 0, vi: 7.0 }];
        let scene = layout_chart(&points, 400, 200, &ChartStyle::default()).unwrap();
        // both spans collapse to 1, so the point maps to the left/bottom edge
        assert_eq!(circles(&scene), vec![Point::new(60.0, 160.0)]);
    }

    #[test]
    fn style_config_fills_missing_fields() {
        let style: ChartStyle = serde_json::from_str(r##"{"line_color": "#000000"}"##).unwrap();
        assert_eq!(style.line_color, Rgb::new(0, 0, 0));
        assert_eq!(style.grid_divisions, 5);
        assert_eq!(style.padding.left, 60.0);
    }
}
