//! Concentric squares / ellipses with quadratically shrinking spacing.

use std::fmt::Write as _;

/// Number of nested shapes in every pattern.
pub const SHAPE_COUNT: usize = 20;

/// Depth of the overlay on the static panel.
pub const STATIC_OVERLAY_DEPTH: f64 = 20.0;

/// Bounds for the depth once a live spring offset is added.
pub const BOING_DEPTH_MIN: f64 = 2.0;
pub const BOING_DEPTH_MAX: f64 = 60.0;

/// Width and height of the pattern canvas, in CSS/SVG user units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Canvas {
    pub width: f64,
    pub height: f64,
}

impl Canvas {
    pub const DEFAULT: Canvas = Canvas {
        width: 800.0,
        height: 600.0,
    };
}

impl Default for Canvas {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    #[default]
    Square,
    Circle,
}

impl ShapeKind {
    pub fn toggled(self) -> Self {
        match self {
            ShapeKind::Square => ShapeKind::Circle,
            ShapeKind::Circle => ShapeKind::Square,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum BorderStyle {
    #[default]
    Solid,
    Dotted,
    Dashed,
}

impl BorderStyle {
    pub const ALL: [BorderStyle; 3] = [BorderStyle::Solid, BorderStyle::Dotted, BorderStyle::Dashed];

    /// CSS `border-style` keyword, also used as the control label.
    pub fn as_str(self) -> &'static str {
        match self {
            BorderStyle::Solid => "solid",
            BorderStyle::Dotted => "dotted",
            BorderStyle::Dashed => "dashed",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.as_str() == name)
    }

    /// SVG `stroke-dasharray`, `None` for a continuous stroke.
    pub fn dash_array(self) -> Option<&'static str> {
        match self {
            BorderStyle::Solid => None,
            BorderStyle::Dotted => Some("2 4"),
            BorderStyle::Dashed => Some("10 5"),
        }
    }
}

/// One nested shape, in canvas coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Shape {
    Rect { x: f64, y: f64, width: f64, height: f64 },
    Ellipse { cx: f64, cy: f64, rx: f64, ry: f64 },
}

impl Shape {
    /// Outer size of the shape's bounding box.
    pub fn size(&self) -> (f64, f64) {
        match *self {
            Shape::Rect { width, height, .. } => (width, height),
            Shape::Ellipse { rx, ry, .. } => (rx * 2.0, ry * 2.0),
        }
    }
}

/// Inward offset of each shape from the outer boundary.
///
/// `offset[k] = Σ_{i<k} depth · (1 − i/count)²`.
pub fn cumulative_offsets(depth: f64, count: usize) -> Vec<f64> {
    let mut offsets = Vec::with_capacity(count);
    let mut acc = 0.0;
    for i in 0..count {
        offsets.push(acc);
        let shrink = 1.0 - i as f64 / count as f64;
        acc += depth * shrink * shrink;
    }
    offsets
}

/// Depth used by the boing panel: base slider depth plus the live spring
/// offset, kept inside `[BOING_DEPTH_MIN, BOING_DEPTH_MAX]`.
pub fn boing_depth(depth: f64, spring_offset: f64) -> f64 {
    let d = depth + spring_offset;
    if d.is_nan() {
        return BOING_DEPTH_MIN;
    }
    d.clamp(BOING_DEPTH_MIN, BOING_DEPTH_MAX)
}

/// A full set of nested shapes.
#[derive(Clone, Debug, PartialEq)]
pub struct ConcentricLayout {
    pub canvas: Canvas,
    pub kind: ShapeKind,
    pub shapes: Vec<Shape>,
}

impl ConcentricLayout {
    pub fn new(depth: f64, kind: ShapeKind, canvas: Canvas) -> Self {
        let shapes = cumulative_offsets(depth, SHAPE_COUNT)
            .into_iter()
            .map(|offset| {
                let width = canvas.width - offset * 2.0;
                let height = canvas.height - offset * 2.0;
                match kind {
                    ShapeKind::Square => Shape::Rect {
                        x: offset,
                        y: offset,
                        width,
                        height,
                    },
                    ShapeKind::Circle => Shape::Ellipse {
                        cx: canvas.width / 2.0,
                        cy: canvas.height / 2.0,
                        rx: width / 2.0,
                        ry: height / 2.0,
                    },
                }
            })
            .collect();
        Self {
            canvas,
            kind,
            shapes,
        }
    }

    /// Inline SVG with one white 1px stroke per shape.
    pub fn to_svg(&self, style: BorderStyle) -> String {
        let Canvas { width, height } = self.canvas;
        let dash = style
            .dash_array()
            .map(|d| format!(r#" stroke-dasharray="{d}""#))
            .unwrap_or_default();

        let mut svg = format!(
            r#"<svg viewBox="0 0 {width} {height}" xmlns="http://www.w3.org/2000/svg">"#
        );
        for shape in &self.shapes {
            let _ = match *shape {
                Shape::Rect {
                    x,
                    y,
                    width,
                    height,
                } => write!(
                    svg,
                    r#"<rect x="{x}" y="{y}" width="{width}" height="{height}" fill="none" stroke="white" stroke-width="1"{dash}/>"#
                ),
                Shape::Ellipse { cx, cy, rx, ry } => write!(
                    svg,
                    r#"<ellipse cx="{cx}" cy="{cy}" rx="{rx}" ry="{ry}" fill="none" stroke="white" stroke-width="1"{dash}/>"#
                ),
            };
        }
        svg.push_str("</svg>");
        svg
    }

    /// Inline CSS for the bordered `<div>` overlay on the static panel.
    pub fn overlay_styles(&self, style: BorderStyle) -> Vec<String> {
        let radius = match self.kind {
            ShapeKind::Square => "0",
            ShapeKind::Circle => "50%",
        };
        self.shapes
            .iter()
            .map(|shape| {
                let (w, h) = shape.size();
                format!(
                    "width: {w}px; height: {h}px; border-style: {}; border-radius: {radius};",
                    style.as_str()
                )
            })
            .collect()
    }
}


#[cfg(all(test, not(target_arch = "wasm32")))]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn offsets_are_monotonic(depth in 0.0f64..100.0) {
            let offsets = cumulative_offsets(depth, SHAPE_COUNT);
            prop_assert_eq!(offsets[0], 0.0);
            for pair in offsets.windows(2) {
                prop_assert!(pair[1] >= pair[0]);
            }
        }

        #[test]
        fn offsets_strictly_increase_for_positive_depth(depth in 0.001f64..100.0) {
            let offsets = cumulative_offsets(depth, SHAPE_COUNT);
            for pair in offsets.windows(2) {
                prop_assert!(pair[1] > pair[0]);
            }
        }

        #[test]
        fn boing_depth_stays_in_bounds(depth in 5.0f64..=40.0, offset in -1e9f64..1e9) {
            let d = boing_depth(depth, offset);
            prop_assert!((BOING_DEPTH_MIN..=BOING_DEPTH_MAX).contains(&d));
        }
    }
}
