//! Backend-independent drawing primitives.
//!
//! Charts are built once as a [`Scene`] in pixel coordinates (origin top-left)
//! and then handed to a backend: [`super::svg`] renders every shape,
//! [`super::png`] rasterizes everything except text.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Color(pub u8, pub u8, pub u8);

impl Color {
    pub const WHITE: Color = Color(0xff, 0xff, 0xff);
    pub const BLACK: Color = Color(0x00, 0x00, 0x00);
    pub const GRID: Color = Color(0xdd, 0xdd, 0xdd);
    pub const AXIS: Color = Color(0x44, 0x44, 0x44);
    pub const REFERENCE: Color = Color(0xd6, 0x27, 0x28);

    /// Fill colors cycled over protocols.
    pub const PALETTE: [Color; 6] = [
        Color(0x1f, 0x77, 0xb4),
        Color(0xff, 0x7f, 0x0e),
        Color(0x2c, 0xa0, 0x2c),
        Color(0x94, 0x67, 0xbd),
        Color(0x8c, 0x56, 0x4b),
        Color(0x17, 0xbe, 0xcf),
    ];

    pub fn of_index(index: usize) -> Color {
        Self::PALETTE[index % Self::PALETTE.len()]
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Anchor {
    Start,
    Middle,
    End,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Shape {
    Rect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        fill: Option<Color>,
        stroke: Option<Color>,
    },
    Line {
        from: (f64, f64),
        to: (f64, f64),
        color: Color,
        width: f64,
        dashed: bool,
    },
    Circle {
        center: (f64, f64),
        radius: f64,
        fill: Color,
    },
    Text {
        at: (f64, f64),
        text: String,
        size: f64,
        anchor: Anchor,
        bold: bool,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Scene {
    pub width: u32,
    pub height: u32,
    pub shapes: Vec<Shape>,
}

impl Scene {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            shapes: vec![],
        }
    }

    pub fn rect(
        &mut self,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        fill: Color,
        stroke: Option<Color>,
    ) {
        self.shapes.push(Shape::Rect {
            x,
            y,
            width,
            height,
            fill: Some(fill),
            stroke,
        });
    }

    pub fn frame(&mut self, x: f64, y: f64, width: f64, height: f64, stroke: Color) {
        self.shapes.push(Shape::Rect {
            x,
            y,
            width,
            height,
            fill: None,
            stroke: Some(stroke),
        });
    }

    pub fn line(&mut self, from: (f64, f64), to: (f64, f64), color: Color, width: f64) {
        self.shapes.push(Shape::Line {
            from,
            to,
            color,
            width,
            dashed: false,
        });
    }

    pub fn dashed_line(&mut self, from: (f64, f64), to: (f64, f64), color: Color, width: f64) {
        self.shapes.push(Shape::Line {
            from,
            to,
            color,
            width,
            dashed: true,
        });
    }

    pub fn circle(&mut self, center: (f64, f64), radius: f64, fill: Color) {
        self.shapes.push(Shape::Circle {
            center,
            radius,
            fill,
        });
    }

    pub fn text(&mut self, at: (f64, f64), text: impl Into<String>, size: f64, anchor: Anchor) {
        self.shapes.push(Shape::Text {
            at,
            text: text.into(),
            size,
            anchor,
            bold: false,
        });
    }

    pub fn title(&mut self, at: (f64, f64), text: impl Into<String>) {
        self.shapes.push(Shape::Text {
            at,
            text: text.into(),
            size: 16.0,
            anchor: Anchor::Middle,
            bold: true,
        });
    }
}

/// Maps a data interval linearly onto a pixel interval.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct LinearScale {
    domain: (f64, f64),
    range: (f64, f64),
}

impl LinearScale {
    /// A degenerate domain is widened so every value maps to the middle of the range.
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        let (lo, hi) = domain;
        let domain = if hi > lo {
            domain
        } else {
            let pad = if lo == 0.0 { 1.0 } else { lo.abs() * 0.1 };
            (lo - pad, lo + pad)
        };
        Self { domain, range }
    }

    pub fn map(&self, value: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        r0 + (value - d0) / (d1 - d0) * (r1 - r0)
    }

    pub fn domain(&self) -> (f64, f64) {
        self.domain
    }
}

/// Roughly `count` evenly spaced, round tick values covering `[lo, hi]`.
pub(crate) fn ticks(lo: f64, hi: f64, count: usize) -> Vec<f64> {
    if !(lo.is_finite() && hi.is_finite()) || hi <= lo || count == 0 {
        return vec![lo];
    }
    #[expect(clippy::cast_precision_loss)]
    let raw_step = (hi - lo) / count as f64;
    let magnitude = 10f64.powf(raw_step.log10().floor());
    let step = [1.0, 2.0, 2.5, 5.0, 10.0]
        .into_iter()
        .map(|m| m * magnitude)
        .find(|s| *s >= raw_step)
        .unwrap_or(10.0 * magnitude);

    let first = (lo / step).ceil();
    let last = (hi / step).floor();
    let mut ticks = vec![];
    let mut i = first;
    while i <= last + 1e-9 {
        ticks.push(i * step);
        i += 1.0;
    }
    ticks
}

/// Padded `[min, max]` of the given values, starting at 0 when all values are non-negative.
pub(crate) fn padded_extent(values: impl IntoIterator<Item = f64>) -> (f64, f64) {
    let (lo, hi) = values
        .into_iter()
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
    if lo > hi {
        return (0.0, 1.0);
    }
    let lo = if lo >= 0.0 { 0.0 } else { lo };
    let pad = (hi - lo).abs() * 0.1;
    let pad = if pad > 0.0 { pad } else { 1.0 };
    (lo, hi + pad)
}

/// Draws a vertical value axis with grid lines at `x` spanning the scale's range.
pub(crate) fn value_axis(
    scene: &mut Scene,
    scale: &LinearScale,
    x: f64,
    grid_to: f64,
    label: &str,
) {
    let (lo, hi) = scale.domain();
    for tick in ticks(lo, hi, 6) {
        let y = scale.map(tick);
        scene.line((x, y), (grid_to, y), Color::GRID, 1.0);
        scene.line((x - 5.0, y), (x, y), Color::AXIS, 1.0);
        scene.text((x - 8.0, y + 4.0), format_tick(tick), 11.0, Anchor::End);
    }
    let (top, bottom) = (scale.map(hi), scale.map(lo));
    scene.line((x, top), (x, bottom), Color::AXIS, 1.5);
    scene.text((x, top - 12.0), label, 12.0, Anchor::Middle);
}

fn format_tick(value: f64) -> String {
    let s = format!("{value:.3}");
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" { "0".to_owned() } else { s.to_owned() }
}
