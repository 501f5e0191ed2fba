//! Page-local control state and the control panel markup.
//!
//! Every interactive element in the panel carries a `data-action` attribute
//! (plus `data-index` / `data-value` where needed). The DOM layer forwards
//! those strings to [`ControlAction::parse`] and applies the result with
//! [`ControlState::apply`], which reports what needs redrawing.

use std::fmt::Write as _;

use crate::config::PageConfig;
use crate::pattern::{BorderStyle, ShapeKind};

pub const DEFAULT_BACKGROUND: &str = "#111111";
pub const DEFAULT_COLORS: [&str; 4] = ["#000000", "#ffffff", "#ff0000", "#0000ff"];
/// Color appended by the "+ add color" button.
pub const NEW_COLOR: &str = "#888888";
/// The gradient always keeps at least this many stops.
pub const MIN_COLORS: usize = 2;

/// Animation pace, `0..=100`. Higher is faster.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct Pace(u8);

impl Pace {
    pub const MAX: u8 = 100;

    pub fn new(value: u8) -> Self {
        Self(value.min(Self::MAX))
    }

    pub fn value(self) -> u8 {
        self.0
    }

    /// Length of one animation cycle: 5 s at pace 0 down to 1 ms at 100.
    pub fn cycle_secs(self) -> f64 {
        5.0 - (f64::from(self.0) / 100.0) * 4.999
    }

    /// CSS `animation-duration` value.
    pub fn css_duration(self) -> String {
        format!("{}s", self.cycle_secs())
    }
}

impl Default for Pace {
    fn default() -> Self {
        Self(50)
    }
}

/// Pattern depth slider value, `5..=40`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct Depth(u8);

impl Depth {
    pub const MIN: u8 = 5;
    pub const MAX: u8 = 40;

    pub fn new(value: u8) -> Self {
        Self(value.clamp(Self::MIN, Self::MAX))
    }

    pub fn value(self) -> u8 {
        self.0
    }

    pub fn as_f64(self) -> f64 {
        f64::from(self.0)
    }
}

impl Default for Depth {
    fn default() -> Self {
        Self(20)
    }
}

/// Everything the control panel edits.
#[derive(Clone, Debug, PartialEq)]
pub struct ControlState {
    pub background: String,
    colors: Vec<String>,
    pub pace: Pace,
    pub paused: bool,
    pub rotating: bool,
    pub shape: ShapeKind,
    pub border: BorderStyle,
    pub stretch_depth: Depth,
    pub boing_depth: Depth,
}

impl Default for ControlState {
    fn default() -> Self {
        Self {
            background: DEFAULT_BACKGROUND.to_owned(),
            colors: DEFAULT_COLORS.iter().map(|c| (*c).to_owned()).collect(),
            pace: Pace::default(),
            paused: false,
            rotating: false,
            shape: ShapeKind::Square,
            border: BorderStyle::Solid,
            stretch_depth: Depth::default(),
            boing_depth: Depth::default(),
        }
    }
}

/// One user interaction with the control panel.
#[derive(Clone, Debug, PartialEq)]
pub enum ControlAction {
    SetPace(u8),
    TogglePause,
    ToggleRotation,
    SetBackground(String),
    SetColor { index: usize, hex: String },
    AddColor,
    RemoveColor(usize),
    SetBorderStyle(BorderStyle),
    ToggleShape,
    SetStretchDepth(u8),
    SetBoingDepth(u8),
}

impl ControlAction {
    /// Decode a `data-action` attribute with its optional `data-index` and
    /// the element's value (or `data-value`).
    pub fn parse(action: &str, index: Option<&str>, value: &str) -> Option<Self> {
        let index = || index.and_then(|i| i.parse::<usize>().ok());
        let number = || value.trim().parse::<f64>().ok().map(|v| v.clamp(0.0, 255.0) as u8);
        let action = match action {
            "pace" => Self::SetPace(number()?),
            "toggle-pause" => Self::TogglePause,
            "toggle-rotation" => Self::ToggleRotation,
            "background" => Self::SetBackground(value.to_owned()),
            "color" => Self::SetColor {
                index: index()?,
                hex: value.to_owned(),
            },
            "add-color" => Self::AddColor,
            "remove-color" => Self::RemoveColor(index()?),
            "border-style" => Self::SetBorderStyle(BorderStyle::from_name(value)?),
            "toggle-shape" => Self::ToggleShape,
            "stretch-depth" => Self::SetStretchDepth(number()?),
            "boing-depth" => Self::SetBoingDepth(number()?),
            _ => return None,
        };
        Some(action)
    }
}

/// Which derived outputs an action invalidated.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Changes {
    /// Noise image (color list).
    pub noise: bool,
    /// Concentric patterns (shape, border style, depths).
    pub layout: bool,
    /// Animation duration, play state or rotation.
    pub animation: bool,
    pub background: bool,
    /// Control panel markup must be rebuilt (labels, rows).
    pub controls: bool,
}

impl Changes {
    pub fn any(&self) -> bool {
        self.noise || self.layout || self.animation || self.background || self.controls
    }
}

impl ControlState {
    pub fn colors(&self) -> &[String] {
        &self.colors
    }

    /// Removal buttons are only offered above the minimum.
    pub fn can_remove_color(&self) -> bool {
        self.colors.len() > MIN_COLORS
    }

    /// Replace the stop at `index`. Out-of-range indices are ignored.
    pub fn update_color(&mut self, index: usize, hex: &str) -> bool {
        match self.colors.get_mut(index) {
            Some(slot) if slot != hex => {
                *slot = hex.to_owned();
                true
            }
            _ => false,
        }
    }

    pub fn add_color(&mut self) {
        self.colors.push(NEW_COLOR.to_owned());
    }

    /// Remove the stop at `index` unless that would leave fewer than
    /// [`MIN_COLORS`]. Returns whether anything was removed.
    pub fn remove_color(&mut self, index: usize) -> bool {
        if !self.can_remove_color() {
            tracing::debug!(len = self.colors.len(), "refusing to drop below two colors");
            return false;
        }
        if index >= self.colors.len() {
            return false;
        }
        self.colors.remove(index);
        true
    }

    pub fn apply(&mut self, action: ControlAction) -> Changes {
        let mut changes = Changes::default();
        match action {
            ControlAction::SetPace(v) => {
                self.pace = Pace::new(v);
                changes.animation = true;
            }
            ControlAction::TogglePause => {
                self.paused = !self.paused;
                changes.animation = true;
                changes.controls = true;
            }
            ControlAction::ToggleRotation => {
                self.rotating = !self.rotating;
                changes.animation = true;
                changes.controls = true;
            }
            ControlAction::SetBackground(hex) => {
                self.background = hex;
                changes.background = true;
            }
            ControlAction::SetColor { index, hex } => {
                changes.noise = self.update_color(index, &hex);
            }
            ControlAction::AddColor => {
                self.add_color();
                changes.noise = true;
                changes.controls = true;
            }
            ControlAction::RemoveColor(index) => {
                let removed = self.remove_color(index);
                changes.noise = removed;
                changes.controls = removed;
            }
            ControlAction::SetBorderStyle(style) => {
                if self.border != style {
                    self.border = style;
                    changes.layout = true;
                    changes.controls = true;
                }
            }
            ControlAction::ToggleShape => {
                self.shape = self.shape.toggled();
                changes.layout = true;
                changes.controls = true;
            }
            ControlAction::SetStretchDepth(v) => {
                self.stretch_depth = Depth::new(v);
                changes.layout = true;
            }
            ControlAction::SetBoingDepth(v) => {
                self.boing_depth = Depth::new(v);
                changes.layout = true;
            }
        }
        changes
    }

    pub fn pause_label(&self) -> &'static str {
        if self.paused { "play" } else { "pause" }
    }

    pub fn rotation_label(&self) -> &'static str {
        if self.rotating { "stop" } else { "spin" }
    }

    pub fn shape_label(&self) -> &'static str {
        match self.shape {
            ShapeKind::Circle => "squares",
            ShapeKind::Square => "circles",
        }
    }

    /// CSS `animation-play-state`.
    pub fn play_state(&self) -> &'static str {
        if self.paused { "paused" } else { "running" }
    }

    /// Inner HTML of the `.all-controls` panel.
    pub fn controls_html(&self, config: &PageConfig) -> String {
        let mut html = String::with_capacity(2048);

        row(&mut html, "pace", |h| {
            let _ = write!(
                h,
                r#"<input type="range" min="0" max="100" value="{}" class="slider" data-action="pace"/>"#,
                self.pace.value()
            );
        });
        row(&mut html, "motion", |h| {
            button(h, "add-button", "toggle-pause", self.pause_label());
        });
        if config.rotation {
            row(&mut html, "rotation", |h| {
                button(h, "add-button", "toggle-rotation", self.rotation_label());
            });
        }
        row(&mut html, "background", |h| {
            let _ = write!(
                h,
                r#"<input type="color" value="{}" class="color-picker" data-action="background"/>"#,
                escape_attr(&self.background)
            );
        });
        for (index, color) in self.colors.iter().enumerate() {
            row(&mut html, &format!("color {}", index + 1), |h| {
                let _ = write!(
                    h,
                    r#"<input type="color" value="{}" class="color-picker" data-action="color" data-index="{index}"/>"#,
                    escape_attr(color)
                );
                if self.can_remove_color() {
                    let _ = write!(
                        h,
                        r#"<button class="remove-button" data-action="remove-color" data-index="{index}">×</button>"#
                    );
                }
            });
        }
        button(&mut html, "add-button", "add-color", "+ add color");

        row(&mut html, "border style", |h| {
            h.push_str(r#"<div class="button-group">"#);
            for style in BorderStyle::ALL {
                let active = if style == self.border { " active" } else { "" };
                let _ = write!(
                    h,
                    r#"<button class="style-button{active}" data-action="border-style" data-value="{0}">{0}</button>"#,
                    style.as_str()
                );
            }
            h.push_str("</div>");
        });
        if config.shape_toggle {
            row(&mut html, "shape", |h| {
                button(h, "add-button", "toggle-shape", self.shape_label());
            });
        }
        html
    }
}

/// Markup for a depth slider under one of the pattern panels.
pub fn depth_slider_html(action: &str, depth: Depth) -> String {
    let mut html = String::new();
    row(&mut html, "depth", |h| {
        let _ = write!(
            h,
            r#"<input type="range" min="{}" max="{}" value="{}" class="slider" data-action="{action}"/>"#,
            Depth::MIN,
            Depth::MAX,
            depth.value()
        );
    });
    html
}

fn row(html: &mut String, label: &str, body: impl FnOnce(&mut String)) {
    let _ = write!(
        html,
        r#"<div class="slider-container"><span class="slider-label">{}</span>"#,
        escape_attr(label)
    );
    body(html);
    html.push_str("</div>");
}

fn button(html: &mut String, class: &str, action: &str, label: &str) {
    let _ = write!(
        html,
        r#"<button class="{class}" data-action="{action}">{label}</button>"#
    );
}

fn escape_attr(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn pace_maps_to_cycle_length() {
        assert_eq!(Pace::new(0).cycle_secs(), 5.0);
        assert!((Pace::new(100).cycle_secs() - 0.001).abs() < 1e-12);
        assert!((Pace::new(50).cycle_secs() - 2.5005).abs() < 1e-12);
        assert_eq!(Pace::new(0).css_duration(), "5s");
        assert_eq!(Pace::new(250).value(), 100);
    }

    #[test]
    fn depth_is_clamped() {
        assert_eq!(Depth::new(0).value(), 5);
        assert_eq!(Depth::new(99).value(), 40);
        assert_eq!(Depth::new(17).value(), 17);
    }

    #[test]
    fn removal_floor_is_two() {
        let mut state = ControlState::default();
        assert!(state.remove_color(0));
        assert!(state.remove_color(0));
        assert_eq!(state.colors(), ["#ff0000", "#0000ff"]);
        assert!(!state.remove_color(0));
        assert_eq!(state.colors().len(), 2);
    }

    #[test]
    fn removal_keeps_order() {
        let mut state = ControlState::default();
        assert!(state.remove_color(1));
        assert_eq!(state.colors(), ["#000000", "#ff0000", "#0000ff"]);
        assert!(!state.remove_color(7));
        assert_eq!(state.colors().len(), 3);
    }

    #[test]
    fn add_appends_gray() {
        let mut state = ControlState::default();
        let changes = state.apply(ControlAction::AddColor);
        assert!(changes.noise && changes.controls);
        assert_eq!(state.colors().last().map(String::as_str), Some(NEW_COLOR));
        assert_eq!(state.colors().len(), 5);
    }

    #[test]
    fn update_out_of_range_is_ignored() {
        let mut state = ControlState::default();
        assert!(!state.apply(ControlAction::SetColor { index: 9, hex: "#123456".into() }).any());
        let changes = state.apply(ControlAction::SetColor { index: 2, hex: "#123456".into() });
        assert!(changes.noise);
        assert!(!changes.controls, "editing a stop must not rebuild the open picker");
        assert_eq!(state.colors()[2], "#123456");
    }

    #[test]
    fn toggles_flip_labels() {
        let mut state = ControlState::default();
        assert_eq!(
            (state.pause_label(), state.rotation_label(), state.shape_label()),
            ("pause", "spin", "circles")
        );
        state.apply(ControlAction::TogglePause);
        state.apply(ControlAction::ToggleRotation);
        state.apply(ControlAction::ToggleShape);
        assert_eq!(
            (state.pause_label(), state.rotation_label(), state.shape_label()),
            ("play", "stop", "squares")
        );
        assert_eq!(state.play_state(), "paused");
        assert_eq!(state.shape, ShapeKind::Circle);
    }

    #[test]
    fn selecting_current_border_style_is_a_no_op() {
        let mut state = ControlState::default();
        assert!(!state.apply(ControlAction::SetBorderStyle(BorderStyle::Solid)).any());
        assert!(state.apply(ControlAction::SetBorderStyle(BorderStyle::Dashed)).layout);
    }

    #[test]
    fn parses_dom_actions() {
        assert_eq!(ControlAction::parse("pace", None, "73"), Some(ControlAction::SetPace(73)));
        assert_eq!(
            ControlAction::parse("color", Some("2"), "#abcdef"),
            Some(ControlAction::SetColor { index: 2, hex: "#abcdef".into() })
        );
        assert_eq!(
            ControlAction::parse("remove-color", Some("1"), ""),
            Some(ControlAction::RemoveColor(1))
        );
        assert_eq!(
            ControlAction::parse("border-style", None, "dotted"),
            Some(ControlAction::SetBorderStyle(BorderStyle::Dotted))
        );
        assert_eq!(ControlAction::parse("boing-depth", None, "12"), Some(ControlAction::SetBoingDepth(12)));
        assert_eq!(ControlAction::parse("color", None, "#abcdef"), None);
        assert_eq!(ControlAction::parse("pace", None, "fast"), None);
        assert_eq!(ControlAction::parse("border-style", None, "double"), None);
        assert_eq!(ControlAction::parse("launch", None, ""), None);
    }

    #[test]
    fn remove_buttons_only_above_minimum() {
        let config = PageConfig::full();
        let mut state = ControlState::default();
        assert_eq!(state.controls_html(&config).matches("remove-color").count(), 4);
        state.remove_color(0);
        state.remove_color(0);
        let html = state.controls_html(&config);
        assert_eq!(html.matches("remove-color").count(), 0);
        assert!(html.contains("color 2"));
        assert!(!html.contains("color 3"));
    }

    #[test]
    fn controls_follow_capabilities() {
        let state = ControlState::default();
        let basic = state.controls_html(&PageConfig::basic());
        assert!(!basic.contains("toggle-rotation"));
        assert!(!basic.contains("toggle-shape"));
        let full = state.controls_html(&PageConfig::full());
        assert!(full.contains(r#"data-action="toggle-rotation">spin<"#));
        assert!(full.contains(r#"data-action="toggle-shape">circles<"#));
        assert!(full.contains(r#"class="style-button active" data-action="border-style" data-value="solid""#));
    }

    #[test]
    fn attribute_values_are_escaped() {
        let mut state = ControlState::default();
        state.apply(ControlAction::SetBackground(r#""><script>"#.into()));
        let html = state.controls_html(&PageConfig::basic());
        assert!(!html.contains("<script>"));
        assert!(html.contains("&quot;&gt;&lt;script&gt;"));
    }

    #[test]
    fn depth_slider_range() {
        let html = depth_slider_html("stretch-depth", Depth::default());
        assert!(html.contains(r#"min="5" max="40" value="20""#));
        assert!(html.contains(r#"data-action="stretch-depth""#));
    }
}
