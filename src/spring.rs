//! Damped springs driven by pointer drags.
//!
//! An [`Animator`] owns the numeric state of one draggable panel: where the
//! pointer grabbed it, where the spring wants to go, and where it currently
//! is. The host calls the `pointer_*` methods from DOM events and
//! [`Animator::tick`] once per display refresh; nothing here touches the DOM.

use std::fmt;

/// A point in client (viewport) pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A bounding box in client pixels, as from `getBoundingClientRect`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Bounds {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpringParams {
    pub stiffness: f64,
    pub damping: f64,
    /// Velocity and distance below which an axis counts as settled.
    pub rest_threshold: f64,
}

impl SpringParams {
    pub const STRETCH: SpringParams = SpringParams {
        stiffness: 0.15,
        damping: 0.72,
        rest_threshold: 0.0005,
    };

    pub const DEPTH: SpringParams = SpringParams {
        stiffness: 0.18,
        damping: 0.75,
        rest_threshold: 0.002,
    };
}

/// Scale change per pixel of drag.
pub const STRETCH_FACTOR: f64 = 0.003;
/// Skew degrees per pixel of drag.
pub const SKEW_FACTOR: f64 = 0.05;
/// Depth units per vertical pixel of drag.
pub const DEPTH_SENSITIVITY: f64 = 0.12;

/// Independent damped springs on `N` axes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Spring<const N: usize> {
    pub position: [f64; N],
    pub velocity: [f64; N],
    pub target: [f64; N],
}

impl<const N: usize> Default for Spring<N> {
    fn default() -> Self {
        Self {
            position: [0.0; N],
            velocity: [0.0; N],
            target: [0.0; N],
        }
    }
}

impl<const N: usize> Spring<N> {
    /// One integration step on every axis.
    pub fn integrate(&mut self, params: &SpringParams) {
        for axis in 0..N {
            let pull = (self.target[axis] - self.position[axis]) * params.stiffness;
            self.velocity[axis] = (self.velocity[axis] + pull) * params.damping;
            self.position[axis] += self.velocity[axis];
        }
    }

    /// Every axis is slow and close to its target.
    pub fn is_settled(&self, params: &SpringParams) -> bool {
        (0..N).all(|axis| {
            self.velocity[axis].abs() < params.rest_threshold
                && (self.position[axis] - self.target[axis]).abs() < params.rest_threshold
        })
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// What the host should do after a [`Animator::tick`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Step<const N: usize> {
    /// Apply this position and schedule another tick.
    Moving([f64; N]),
    /// The spring snapped back to neutral; clear the transform and stop.
    Rested,
}

impl<const N: usize> Step<N> {
    pub fn is_moving(&self) -> bool {
        matches!(self, Step::Moving(_))
    }
}

/// Transform-origin anchor, in percent of the surface box.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TransformOrigin {
    pub x_pct: f64,
    pub y_pct: f64,
}

impl TransformOrigin {
    /// Mirror of the grab point inside `bounds`, so the surface appears to
    /// be pulled away from where it was grabbed.
    pub fn opposite(pointer: Point, bounds: Bounds) -> Option<Self> {
        if bounds.width <= 0.0 || bounds.height <= 0.0 {
            return None;
        }
        let perc_x = (pointer.x - bounds.left) / bounds.width * 100.0;
        let perc_y = (pointer.y - bounds.top) / bounds.height * 100.0;
        Some(Self {
            x_pct: 100.0 - perc_x,
            y_pct: 100.0 - perc_y,
        })
    }
}

impl fmt::Display for TransformOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}% {}%", self.x_pct, self.y_pct)
    }
}

/// Maps a drag delta `(dx, dy)` to a spring target.
pub type TargetFn<const N: usize> = fn(f64, f64) -> [f64; N];

/// Stretch/skew axes: `[scale_x, scale_y, skew_x_deg, skew_y_deg]`.
pub fn stretch_target(dx: f64, dy: f64) -> [f64; 4] {
    [
        dx * STRETCH_FACTOR,
        dy * STRETCH_FACTOR,
        dy * SKEW_FACTOR,
        dx * SKEW_FACTOR,
    ]
}

/// Single depth axis driven by vertical drag.
pub fn depth_target(_dx: f64, dy: f64) -> [f64; 1] {
    [dy * DEPTH_SENSITIVITY]
}

/// Drag-driven spring for one panel.
#[derive(Clone, Debug)]
pub struct Animator<const N: usize> {
    spring: Spring<N>,
    params: SpringParams,
    target_fn: TargetFn<N>,
    dragging: bool,
    grab: Point,
    track_origin: bool,
    origin: Option<TransformOrigin>,
    frame_pending: bool,
}

impl Animator<4> {
    pub fn stretch() -> Self {
        Self::new(SpringParams::STRETCH, stretch_target, true)
    }

    /// CSS `transform` for the current position, `"none"` at rest.
    pub fn css_transform(&self) -> String {
        stretch_css(self.position())
    }
}

impl Animator<1> {
    pub fn depth() -> Self {
        Self::new(SpringParams::DEPTH, depth_target, false)
    }

    pub fn offset(&self) -> f64 {
        self.spring.position[0]
    }
}

impl<const N: usize> Animator<N> {
    pub fn new(params: SpringParams, target_fn: TargetFn<N>, track_origin: bool) -> Self {
        Self {
            spring: Spring::default(),
            params,
            target_fn,
            dragging: false,
            grab: Point::default(),
            track_origin,
            origin: None,
            frame_pending: false,
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    pub fn position(&self) -> [f64; N] {
        self.spring.position
    }

    pub fn spring(&self) -> &Spring<N> {
        &self.spring
    }

    /// Anchor recorded at the last pointer-down, if this effect tracks one.
    pub fn transform_origin(&self) -> Option<TransformOrigin> {
        self.origin
    }

    /// CSS `transform-origin`, `"center center"` until the first grab.
    pub fn css_transform_origin(&self) -> String {
        self.origin
            .map(|o| o.to_string())
            .unwrap_or_else(|| "center center".to_owned())
    }

    /// Start a drag. Returns `true` if the host must schedule a tick.
    pub fn pointer_down(&mut self, pointer: Point, bounds: Option<Bounds>) -> bool {
        self.dragging = true;
        self.grab = pointer;
        if self.track_origin {
            if let Some(origin) = bounds.and_then(|b| TransformOrigin::opposite(pointer, b)) {
                self.origin = Some(origin);
            }
        }
        self.spring.target = [0.0; N];
        tracing::debug!(x = pointer.x, y = pointer.y, "drag start");
        self.request_frame()
    }

    /// Retarget the spring from the current drag delta. Ignored when idle.
    pub fn pointer_move(&mut self, pointer: Point) {
        if !self.dragging {
            return;
        }
        let dx = pointer.x - self.grab.x;
        let dy = pointer.y - self.grab.y;
        self.spring.target = (self.target_fn)(dx, dy);
    }

    /// Release. Returns `true` if the host must schedule a tick.
    pub fn pointer_up(&mut self) -> bool {
        if !self.dragging {
            return false;
        }
        self.dragging = false;
        self.spring.target = [0.0; N];
        tracing::debug!("drag release");
        self.request_frame()
    }

    /// Claim the single pending-frame slot. `false` means one is already
    /// scheduled and the caller must not schedule another.
    pub fn request_frame(&mut self) -> bool {
        if self.frame_pending {
            return false;
        }
        self.frame_pending = true;
        true
    }

    pub fn frame_pending(&self) -> bool {
        self.frame_pending
    }

    /// The host cancelled the pending frame (teardown).
    pub fn cancel_frame(&mut self) {
        self.frame_pending = false;
    }

    /// Advance one display refresh.
    ///
    /// On [`Step::Moving`] the pending slot stays claimed for the next tick;
    /// on [`Step::Rested`] it is released and every axis is exactly zero.
    pub fn tick(&mut self) -> Step<N> {
        self.spring.integrate(&self.params);
        if !self.dragging && self.spring.is_settled(&self.params) {
            self.spring.reset();
            self.frame_pending = false;
            tracing::trace!("spring at rest");
            return Step::Rested;
        }
        self.frame_pending = true;
        Step::Moving(self.spring.position)
    }
}

/// `scaleX(…) scaleY(…) skewX(…deg) skewY(…deg)`, or `none` when neutral.
pub fn stretch_css([sx, sy, skx, sky]: [f64; 4]) -> String {
    if sx == 0.0 && sy == 0.0 && skx == 0.0 && sky == 0.0 {
        return "none".to_owned();
    }
    format!(
        "scaleX({}) scaleY({}) skewX({skx}deg) skewY({sky}deg)",
        1.0 + sx,
        1.0 + sy
    )
}

/// Maximum opacity of the blue tint over the fine-grain panel.
pub const TINT_MAX_OPACITY: f64 = 0.65;
const TINT_PER_UNIT: f64 = 0.035;

/// Tint opacity for a depth offset.
pub fn tint_opacity(offset: f64) -> f64 {
    (offset.abs() * TINT_PER_UNIT).min(TINT_MAX_OPACITY)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const MAX_TICKS: usize = 10_000;

    fn run_to_rest<const N: usize>(animator: &mut Animator<N>) -> usize {
        for n in 1..=MAX_TICKS {
            if !animator.tick().is_moving() {
                return n;
            }
        }
        panic!("spring did not settle within {MAX_TICKS} ticks");
    }

    #[test]
    fn integration_matches_formula() {
        let mut spring = Spring::<1> {
            target: [1.0],
            ..Default::default()
        };
        spring.integrate(&SpringParams::STRETCH);
        // v = (0 + 1 * 0.15) * 0.72
        assert!((spring.velocity[0] - 0.108).abs() < 1e-12);
        assert!((spring.position[0] - 0.108).abs() < 1e-12);
    }

    #[test]
    fn drag_sets_scaled_targets() {
        let mut a = Animator::stretch();
        assert!(a.pointer_down(Point::new(100.0, 100.0), None));
        a.pointer_move(Point::new(200.0, 150.0));
        let expected = [0.3, 0.15, 2.5, 5.0];
        for (got, want) in a.spring().target.iter().zip(expected) {
            assert!((got - want).abs() < 1e-12, "{got} != {want}");
        }

        let mut d = Animator::depth();
        d.pointer_down(Point::new(0.0, 0.0), None);
        d.pointer_move(Point::new(40.0, 50.0));
        assert!((d.spring().target[0] - 6.0).abs() < 1e-12);
    }

    #[test]
    fn move_without_drag_is_ignored() {
        let mut a = Animator::depth();
        a.pointer_move(Point::new(10.0, 500.0));
        assert_eq!(a.spring().target, [0.0]);
        assert!(!a.pointer_up());
    }

    #[test]
    fn transform_origin_is_mirrored() {
        let mut a = Animator::stretch();
        assert_eq!(a.css_transform_origin(), "center center");
        let bounds = Bounds {
            left: 100.0,
            top: 50.0,
            width: 200.0,
            height: 100.0,
        };
        a.pointer_down(Point::new(150.0, 125.0), Some(bounds));
        assert_eq!(
            a.transform_origin(),
            Some(TransformOrigin {
                x_pct: 75.0,
                y_pct: 25.0
            })
        );
        assert_eq!(a.css_transform_origin(), "75% 25%");
    }

    #[test]
    fn depth_effect_does_not_track_origin() {
        let mut d = Animator::depth();
        let bounds = Bounds {
            left: 0.0,
            top: 0.0,
            width: 10.0,
            height: 10.0,
        };
        d.pointer_down(Point::new(5.0, 5.0), Some(bounds));
        assert_eq!(d.transform_origin(), None);
    }

    #[test]
    fn frame_request_is_idempotent() {
        let mut a = Animator::stretch();
        assert!(a.pointer_down(Point::default(), None));
        assert!(!a.request_frame());
        assert!(!a.pointer_up(), "release while a frame is pending must not double-schedule");
        assert!(a.frame_pending());
    }

    #[test]
    fn keeps_ticking_while_held_at_target() {
        let mut a = Animator::depth();
        a.pointer_down(Point::default(), None);
        // Even at rest on a zero target, a held drag keeps the loop alive.
        for _ in 0..50 {
            assert!(a.tick().is_moving());
        }
    }

    #[test]
    fn release_springs_back_and_snaps_to_zero() {
        let mut a = Animator::stretch();
        a.pointer_down(Point::new(0.0, 0.0), None);
        a.pointer_move(Point::new(120.0, -80.0));
        for _ in 0..30 {
            a.tick();
        }
        assert!(a.position()[0] > 0.0);
        a.pointer_up();
        run_to_rest(&mut a);
        assert_eq!(a.position(), [0.0; 4]);
        assert_eq!(a.css_transform(), "none");
        assert!(!a.frame_pending());
    }

    #[test]
    fn overshoots_before_settling() {
        let mut d = Animator::depth();
        d.pointer_down(Point::new(0.0, 0.0), None);
        d.pointer_move(Point::new(0.0, 100.0));
        for _ in 0..60 {
            d.tick();
        }
        d.pointer_up();
        let mut min = f64::MAX;
        while let Step::Moving([offset]) = d.tick() {
            min = min.min(offset);
        }
        assert!(min < 0.0, "under-damped spring should swing past neutral");
        assert_eq!(d.offset(), 0.0);
    }

    #[test]
    fn stretch_css_formats_axes() {
        assert_eq!(stretch_css([0.0; 4]), "none");
        assert_eq!(
            stretch_css([0.5, -0.25, 2.0, -1.5]),
            "scaleX(1.5) scaleY(0.75) skewX(2deg) skewY(-1.5deg)"
        );
    }

    #[test]
    fn tint_is_capped() {
        assert_eq!(tint_opacity(0.0), 0.0);
        assert!((tint_opacity(-10.0) - 0.35).abs() < 1e-12);
        assert_eq!(tint_opacity(1000.0), TINT_MAX_OPACITY);
    }
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn released_spring_converges_to_neutral(
            dx in -2000.0f64..2000.0,
            dy in -2000.0f64..2000.0,
            held in 0usize..120,
        ) {
            let mut a = Animator::stretch();
            a.pointer_down(Point::new(0.0, 0.0), None);
            a.pointer_move(Point::new(dx, dy));
            for _ in 0..held {
                a.tick();
            }
            a.pointer_up();
            let mut ticks = 0;
            while a.tick().is_moving() {
                ticks += 1;
                prop_assert!(ticks < 10_000);
            }
            prop_assert_eq!(a.position(), [0.0; 4]);
            prop_assert!(!a.frame_pending());
        }

        #[test]
        fn spring_reaches_a_fixed_target(start in -100.0f64..100.0, target in -100.0f64..100.0) {
            let params = SpringParams::DEPTH;
            let mut spring = Spring::<1> {
                position: [start],
                velocity: [0.0],
                target: [target],
            };
            let mut ticks = 0;
            while !spring.is_settled(&params) {
                spring.integrate(&params);
                ticks += 1;
                prop_assert!(ticks < 10_000);
            }
            prop_assert!((spring.position[0] - target).abs() < params.rest_threshold);
        }
    }
}
