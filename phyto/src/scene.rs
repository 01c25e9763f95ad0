//! Backend-independent drawing primitives.
//!
//! A [`Scene`] is an ordered list of draw operations in pixel coordinates
//! with the origin at the top left, the same model as a 2D canvas context.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::PhytoError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb::new(0xff, 0xff, 0xff);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#rrggbb` or `#rgb`.
    pub fn from_hex(text: &str) -> Result<Self, PhytoError> {
        let invalid = || PhytoError::InvalidColor(text.to_string());
        let hex = text.trim().strip_prefix('#').ok_or_else(invalid)?;
        if !hex.is_ascii() {
            return Err(invalid());
        }
        let channel = |s: &str| u8::from_str_radix(s, 16).map_err(|_| invalid());
        match hex.len() {
            6 => Ok(Self::new(
                channel(&hex[0..2])?,
                channel(&hex[2..4])?,
                channel(&hex[4..6])?,
            )),
            3 => {
                let short = |i: usize| channel(&hex[i..i + 1]).map(|v| v * 17);
                Ok(Self::new(short(0)?, short(1)?, short(2)?))
            }
            _ => Err(invalid()),
        }
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl TryFrom<String> for Rgb {
    type Error = PhytoError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Rgb::from_hex(&value)
    }
}

impl From<Rgb> for String {
    fn from(value: Rgb) -> Self {
        value.to_string()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    fn lerp(self, other: Point, t: f64) -> Point {
        Point::new(self.x + (other.x - self.x) * t, self.y + (other.y - self.y) * t)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum PathCmd {
    MoveTo(Point),
    LineTo(Point),
    QuadTo { ctrl: Point, to: Point },
    Close,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Path {
    pub cmds: Vec<PathCmd>,
}

impl Path {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn move_to(mut self, x: f64, y: f64) -> Self {
        self.cmds.push(PathCmd::MoveTo(Point::new(x, y)));
        self
    }

    pub fn line_to(mut self, x: f64, y: f64) -> Self {
        self.cmds.push(PathCmd::LineTo(Point::new(x, y)));
        self
    }

    pub fn quad_to(mut self, cx: f64, cy: f64, x: f64, y: f64) -> Self {
        self.cmds.push(PathCmd::QuadTo {
            ctrl: Point::new(cx, cy),
            to: Point::new(x, y),
        });
        self
    }

    pub fn close(mut self) -> Self {
        self.cmds.push(PathCmd::Close);
        self
    }

    /// Convert to polylines, one per subpath. Quadratic curves are split so
    /// that the chord deviates from the curve by at most `tolerance` pixels.
    /// Closed subpaths end with a repeat of their first point.
    pub fn flatten(&self, tolerance: f64) -> Vec<Vec<Point>> {
        let tolerance = if tolerance > 0.0 { tolerance } else { 0.25 };
        let mut out: Vec<Vec<Point>> = Vec::new();
        let mut current: Vec<Point> = Vec::new();
        let mut start = Point::new(0.0, 0.0);
        let mut pen = start;

        for cmd in &self.cmds {
            match *cmd {
                PathCmd::MoveTo(p) => {
                    if current.len() > 1 {
                        out.push(std::mem::take(&mut current));
                    }
                    current.clear();
                    current.push(p);
                    start = p;
                    pen = p;
                }
                PathCmd::LineTo(p) => {
                    if current.is_empty() {
                        current.push(pen);
                    }
                    current.push(p);
                    pen = p;
                }
                PathCmd::QuadTo { ctrl, to } => {
                    if current.is_empty() {
                        current.push(pen);
                    }
                    let segments = quad_segments(pen, ctrl, to, tolerance);
                    for step in 1..=segments {
                        let t = step as f64 / segments as f64;
                        let a = pen.lerp(ctrl, t);
                        let b = ctrl.lerp(to, t);
                        current.push(a.lerp(b, t));
                    }
                    pen = to;
                }
                PathCmd::Close => {
                    if !current.is_empty() {
                        current.push(start);
                        out.push(std::mem::take(&mut current));
                    }
                    pen = start;
                }
            }
        }
        if current.len() > 1 {
            out.push(current);
        }
        out
    }
}

// The deviation of a quadratic from its n-segment chord polyline is bounded
// by |p0 - 2c + p1| / (8 n^2).
fn quad_segments(p0: Point, ctrl: Point, p1: Point, tolerance: f64) -> usize {
    let dx = p0.x - 2.0 * ctrl.x + p1.x;
    let dy = p0.y - 2.0 * ctrl.y + p1.y;
    let dd = (dx * dx + dy * dy).sqrt();
    let n = (dd / (8.0 * tolerance)).sqrt().ceil();
    if n.is_finite() {
        (n as usize).clamp(1, 256)
    } else {
        1
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    Left,
    Center,
    Right,
}

impl TextAlign {
    pub fn as_css(self) -> &'static str {
        match self {
            TextAlign::Left => "left",
            TextAlign::Center => "center",
            TextAlign::Right => "right",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Font {
    pub size_px: f64,
    pub family: String,
}

impl Font {
    /// CSS shorthand, e.g. `12px Inter, Roboto, sans-serif`.
    pub fn css(&self) -> String {
        format!("{}px {}", self.size_px, self.family)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum DrawOp {
    /// Reset the whole surface; `None` leaves it transparent.
    Clear { color: Option<Rgb> },
    FillRect {
        x: f64,
        y: f64,
        w: f64,
        h: f64,
        color: Rgb,
    },
    FillCircle {
        center: Point,
        radius: f64,
        color: Rgb,
    },
    FillPath { path: Path, color: Rgb },
    StrokePath { path: Path, color: Rgb, width: f64 },
    /// Text anchored at its baseline.
    Text {
        text: String,
        pos: Point,
        color: Rgb,
        font: Font,
        align: TextAlign,
    },
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    pub width: u32,
    pub height: u32,
    pub ops: Vec<DrawOp>,
}

impl Scene {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ops: Vec::new(),
        }
    }

    pub fn push(&mut self, op: DrawOp) {
        self.ops.push(op);
    }

    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }
}
