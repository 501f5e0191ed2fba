//! Static isometric prism illustration for the stretch panel.

use std::fmt::Write as _;

struct Gradient {
    id: &'static str,
    x2: &'static str,
    y2: &'static str,
    stops: [&'static str; 3],
}

const GRADIENTS: [Gradient; 3] = [
    Gradient {
        id: "topGrad",
        x2: "100%",
        y2: "100%",
        stops: ["#d4ff8f", "#b8ff6f", "#ffff99"],
    },
    Gradient {
        id: "leftGrad",
        x2: "0%",
        y2: "100%",
        stops: ["#a8e68f", "#8fcc7f", "#ffcc88"],
    },
    Gradient {
        id: "rightGrad",
        x2: "0%",
        y2: "100%",
        stops: ["#d4ff99", "#b8e68f", "#ffaa88"],
    },
];

const STOP_OFFSETS: [&str; 3] = ["0%", "50%", "100%"];

/// Glow outline: (path, stroke).
const OUTLINE: [(&str, &str); 3] = [
    ("M 400 150 L 600 280 L 600 540 L 400 670", "#9b8fcc"),
    ("M 400 150 L 200 280 L 200 540 L 400 670", "#8f7fbb"),
    ("M 200 280 L 400 410 L 600 280", "#a89fdd"),
];

/// Faces, back to front: (path, gradient id, opacity).
const FACES: [(&str, &str, f64); 3] = [
    ("M 400 150 L 200 280 L 200 540 L 400 670 L 400 410 Z", "leftGrad", 0.95),
    ("M 400 150 L 600 280 L 600 540 L 400 670 L 400 410 Z", "rightGrad", 0.95),
    ("M 400 150 L 200 280 L 400 410 L 600 280 Z", "topGrad", 0.98),
];

/// Highlights: (x1, y1, x2, y2, width, opacity).
const HIGHLIGHTS: [(u32, u32, u32, u32, u32, f64); 4] = [
    (400, 150, 400, 410, 4, 0.6),
    (200, 280, 600, 280, 3, 0.5),
    (300, 215, 500, 345, 2, 0.4),
    (500, 215, 300, 345, 2, 0.4),
];

/// Surface spots: (cx, cy, r, fill).
const SPOTS: [(u32, u32, u32, &str); 7] = [
    (350, 250, 15, "#4a5f3f"),
    (450, 300, 20, "#3f4f3f"),
    (380, 380, 12, "#5f4f3f"),
    (250, 350, 18, "#4a5f4a"),
    (520, 320, 16, "#5f5a3f"),
    (300, 480, 14, "#6f5a4a"),
    (500, 500, 17, "#5f4f4f"),
];

const FILTERS: &str = concat!(
    r#"<filter id="pastelTexture">"#,
    r#"<feTurbulence type="fractalNoise" baseFrequency="0.8" numOctaves="4" result="noise"/>"#,
    r#"<feColorMatrix in="noise" type="saturate" values="0.3"/>"#,
    r#"<feBlend in="SourceGraphic" in2="noise" mode="multiply"/>"#,
    r#"</filter>"#,
    r#"<filter id="glow">"#,
    r#"<feGaussianBlur stdDeviation="2" result="coloredBlur"/>"#,
    r#"<feMerge><feMergeNode in="coloredBlur"/><feMergeNode in="SourceGraphic"/></feMerge>"#,
    r#"</filter>"#,
);

/// The whole 800×800 illustration as inline SVG.
pub fn svg() -> String {
    let mut svg = String::with_capacity(4096);
    svg.push_str(r#"<svg viewBox="0 0 800 800" xmlns="http://www.w3.org/2000/svg"><defs>"#);
    for g in &GRADIENTS {
        let _ = write!(
            svg,
            r#"<linearGradient id="{}" x1="0%" y1="0%" x2="{}" y2="{}">"#,
            g.id, g.x2, g.y2
        );
        for (offset, color) in STOP_OFFSETS.iter().zip(g.stops) {
            let _ = write!(
                svg,
                r#"<stop offset="{offset}" style="stop-color: {color}; stop-opacity: 1"/>"#
            );
        }
        svg.push_str("</linearGradient>");
    }
    svg.push_str(FILTERS);
    svg.push_str("</defs>");

    svg.push_str(r#"<g opacity="0.6" filter="url(#glow)">"#);
    for (d, stroke) in OUTLINE {
        let _ = write!(
            svg,
            r#"<path d="{d}" fill="none" stroke="{stroke}" stroke-width="3"/>"#
        );
    }
    svg.push_str("</g>");

    for (d, gradient, opacity) in FACES {
        let _ = write!(
            svg,
            r#"<path d="{d}" fill="url(#{gradient})" filter="url(#pastelTexture)" opacity="{opacity}"/>"#
        );
    }

    svg.push_str(r#"<g opacity="0.7">"#);
    for (x1, y1, x2, y2, width, opacity) in HIGHLIGHTS {
        let _ = write!(
            svg,
            r#"<line x1="{x1}" y1="{y1}" x2="{x2}" y2="{y2}" stroke="white" stroke-width="{width}" opacity="{opacity}"/>"#
        );
    }
    svg.push_str("</g>");

    svg.push_str(r#"<g opacity="0.3">"#);
    for (cx, cy, r, fill) in SPOTS {
        let _ = write!(svg, r#"<circle cx="{cx}" cy="{cy}" r="{r}" fill="{fill}"/>"#);
    }
    svg.push_str("</g></svg>");
    svg
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_face_references_a_defined_gradient() {
        let markup = svg();
        for (_, gradient, _) in FACES {
            assert!(markup.contains(&format!(r#"<linearGradient id="{gradient}""#)));
            assert!(markup.contains(&format!("url(#{gradient})")));
        }
    }

    #[test]
    fn element_counts() {
        let markup = svg();
        assert_eq!(markup.matches("<stop ").count(), 9);
        assert_eq!(markup.matches("<path ").count(), 6);
        assert_eq!(markup.matches("<line ").count(), 4);
        assert_eq!(markup.matches("<circle ").count(), 7);
        assert!(markup.ends_with("</g></svg>"));
    }
}
