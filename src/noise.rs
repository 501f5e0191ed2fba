//! Procedural "TV static" images.
//!
//! The static is an SVG filter graph: fractal turbulence, reduced to
//! grayscale, then remapped per channel through lookup tables. For the
//! primary panel the tables are a linear gradient across the user's color
//! list; the fine-grain panel uses a fixed neutral ramp. The image is a
//! single frame; the element displaying it supplies the motion.

use std::fmt::Write as _;

use crate::color::Rgb;

/// Resolution of the per-channel lookup tables.
pub const TABLE_SIZE: usize = 256;

/// Neutral ramp used by the fine-grain panel.
pub const NEUTRAL_RAMP: [f64; 6] = [0.0, 0.2, 0.4, 0.6, 0.8, 1.0];

/// Animation cycle of the fine-grain panel, in seconds.
pub const FINE_GRAIN_CYCLE_SECS: f64 = 0.3;

const GRAYSCALE_MATRIX: &str = "1 0 0 0 0  1 0 0 0 0  1 0 0 0 0  0 0 0 1 0";
const FILTER_ID_LEN: usize = 9;

/// `feTurbulence` parameters plus the square viewBox the noise is drawn in.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Turbulence {
    pub base_frequency: f64,
    pub octaves: u32,
    pub view_box: u32,
}

impl Turbulence {
    /// Small swatch behind the primary panel.
    pub const SWATCH: Turbulence = Turbulence {
        base_frequency: 0.85,
        octaves: 4,
        view_box: 200,
    };

    /// Dense grain for the large secondary panel.
    pub const FINE_GRAIN: Turbulence = Turbulence {
        base_frequency: 1.15,
        octaves: 5,
        view_box: 400,
    };
}

/// Transfer tables for R, G and B, each value in `[0, 1]`.
#[derive(Clone, Debug, PartialEq)]
pub struct ChannelTables {
    pub r: Vec<f64>,
    pub g: Vec<f64>,
    pub b: Vec<f64>,
}

impl ChannelTables {
    /// Linear gradient across `colors`, sampled at [`TABLE_SIZE`] points.
    ///
    /// A single color yields a flat table; an empty list yields black.
    pub fn gradient(colors: &[Rgb]) -> Self {
        let mut tables = Self {
            r: Vec::with_capacity(TABLE_SIZE),
            g: Vec::with_capacity(TABLE_SIZE),
            b: Vec::with_capacity(TABLE_SIZE),
        };
        if colors.is_empty() {
            let black = vec![0.0; TABLE_SIZE];
            tables.r = black.clone();
            tables.g = black.clone();
            tables.b = black;
            return tables;
        }

        let last = colors.len() - 1;
        for i in 0..TABLE_SIZE {
            let position = i as f64 / (TABLE_SIZE - 1) as f64;
            let virtual_index = position * last as f64;
            let lower = virtual_index.floor() as usize;
            let upper = (virtual_index.ceil() as usize).min(last);
            let t = virtual_index - lower as f64;

            let lo = colors[lower].channels();
            let hi = colors[upper].channels();
            let lerp = |c: usize| {
                let (a, b) = (f64::from(lo[c]), f64::from(hi[c]));
                (a + (b - a) * t) / 255.0
            };
            tables.r.push(lerp(0));
            tables.g.push(lerp(1));
            tables.b.push(lerp(2));
        }
        tables
    }

    /// The same ramp on every channel.
    pub fn uniform(ramp: &[f64]) -> Self {
        Self {
            r: ramp.to_vec(),
            g: ramp.to_vec(),
            b: ramp.to_vec(),
        }
    }
}

/// Everything needed to draw one static image.
#[derive(Clone, Debug, PartialEq)]
pub struct NoiseDescriptor {
    pub filter_id: String,
    pub turbulence: Turbulence,
    pub tables: ChannelTables,
}

impl NoiseDescriptor {
    /// Primary swatch driven by the gradient color list (unparseable entries
    /// count as black).
    pub fn from_colors<S: AsRef<str>>(colors: &[S]) -> Self {
        let colors: Vec<Rgb> = colors
            .iter()
            .map(|c| Rgb::parse_or_black(c.as_ref()))
            .collect();
        tracing::trace!(stops = colors.len(), "regenerating noise tables");
        Self {
            filter_id: random_id("noise"),
            turbulence: Turbulence::SWATCH,
            tables: ChannelTables::gradient(&colors),
        }
    }

    /// High-frequency neutral grain.
    pub fn fine_grain() -> Self {
        Self {
            filter_id: random_id("fine"),
            turbulence: Turbulence::FINE_GRAIN,
            tables: ChannelTables::uniform(&NEUTRAL_RAMP),
        }
    }

    /// Standalone SVG document for the static.
    pub fn to_svg(&self) -> String {
        let Turbulence {
            base_frequency,
            octaves,
            view_box,
        } = self.turbulence;
        let id = &self.filter_id;

        let mut svg = String::with_capacity(8 * 1024);
        let _ = write!(
            svg,
            r#"<svg viewBox="0 0 {view_box} {view_box}" xmlns="http://www.w3.org/2000/svg"><defs><filter id="{id}">"#
        );
        let _ = write!(
            svg,
            r#"<feTurbulence type="fractalNoise" baseFrequency="{base_frequency}" numOctaves="{octaves}" stitchTiles="stitch" result="turbulence"/>"#
        );
        let _ = write!(
            svg,
            r#"<feColorMatrix in="turbulence" type="matrix" values="{GRAYSCALE_MATRIX}" result="grayscale"/>"#
        );
        svg.push_str(r#"<feComponentTransfer in="grayscale">"#);
        for (func, table) in [
            ("feFuncR", &self.tables.r),
            ("feFuncG", &self.tables.g),
            ("feFuncB", &self.tables.b),
        ] {
            let _ = write!(
                svg,
                r#"<{func} type="table" tableValues="{}"/>"#,
                join_values(table)
            );
        }
        svg.push_str(r#"<feFuncA type="identity"/></feComponentTransfer></filter></defs>"#);
        let _ = write!(
            svg,
            r#"<rect width="100%" height="100%" filter="url(#{id})" fill="white"/></svg>"#
        );
        svg
    }

    /// `data:` URL suitable for a CSS `background-image`.
    pub fn to_data_url(&self) -> String {
        format!("data:image/svg+xml,{}", urlencoding::encode(&self.to_svg()))
    }

    /// `url("…")` value for the `background-image` property.
    pub fn css_background(&self) -> String {
        format!("url(\"{}\")", self.to_data_url())
    }
}

fn join_values(values: &[f64]) -> String {
    let mut out = String::with_capacity(values.len() * 8);
    for (i, v) in values.iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        let _ = write!(out, "{v}");
    }
    out
}

fn random_id(prefix: &str) -> String {
    const ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    let suffix: String = (0..FILTER_ID_LEN)
        .map(|_| char::from(ALPHABET[fastrand::usize(..ALPHABET.len())]))
        .collect();
    format!("{prefix}-{suffix}")
}
