//! The page: DOM tree, control dispatch and the draggable panels.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use gloo_events::EventListener;
use wasm_bindgen::prelude::*;
use web_sys::{Element, Event, HtmlElement, HtmlInputElement};

use super::dom;
use super::gesture::{self, Draggable};
use crate::config::PageConfig;
use crate::controls::{depth_slider_html, Changes, ControlAction, ControlState};
use crate::noise::{NoiseDescriptor, FINE_GRAIN_CYCLE_SECS};
use crate::pattern::{boing_depth, Canvas, ConcentricLayout, STATIC_OVERLAY_DEPTH, SHAPE_COUNT};
use crate::prism;
use crate::spring::{tint_opacity, Animator};

/// Handle to a mounted page. Dropping it (or calling `unmount`) removes the
/// page, its listeners and any running animation.
#[wasm_bindgen]
pub struct TvStatic {
    page: Option<Rc<Page>>,
}

#[wasm_bindgen]
impl TvStatic {
    /// Apply one control action, as the control panel would.
    /// Returns `false` when the action is unknown or changed nothing.
    pub fn apply(&self, action: &str, index: Option<String>, value: &str) -> bool {
        let Some(page) = &self.page else {
            return false;
        };
        match ControlAction::parse(action, index.as_deref(), value) {
            Some(action) => page.dispatch(action).any(),
            None => false,
        }
    }

    #[wasm_bindgen(js_name = colorCount)]
    pub fn color_count(&self) -> usize {
        self.page
            .as_ref()
            .map_or(0, |p| p.state.borrow().colors().len())
    }

    /// Current live depth offset of the boing panel.
    #[wasm_bindgen(js_name = boingOffset)]
    pub fn boing_offset(&self) -> f64 {
        self.page.as_ref().map_or(0.0, |p| p.boing_offset.get())
    }

    /// Panels of this page whose drag listeners are still on `window`.
    #[wasm_bindgen(js_name = activeDrags)]
    pub fn active_drags(&self) -> usize {
        self.page.as_ref().map_or(0, |p| {
            let stretching = p.stretchers.borrow().iter().filter(|d| d.is_tracking()).count();
            let boinging = p.boings.borrow().iter().filter(|d| d.is_tracking()).count();
            stretching + boinging
        })
    }

    #[wasm_bindgen(js_name = isMounted)]
    pub fn is_mounted(&self) -> bool {
        self.page.is_some()
    }

    pub fn unmount(&mut self) {
        if self.page.take().is_some() {
            tracing::info!("page unmounted");
        }
    }
}

/// Mount a page inside the element with id `host_id`.
///
/// `config` is either a preset name (`basic`, `intermediate`, `full`) or a
/// JSON object of capability flags; absent means the full page.
#[wasm_bindgen]
pub fn mount(host_id: &str, config: Option<String>) -> Result<TvStatic, JsValue> {
    super::console::init();
    let host = dom::document()?
        .get_element_by_id(host_id)
        .ok_or("mount element not found")?;
    let config = parse_config(config.as_deref())?;
    mount_into(&host, config)
}

/// Drag sessions still holding window listeners, across every mounted page.
#[wasm_bindgen(js_name = liveDragSessions)]
pub fn live_drag_sessions() -> usize {
    gesture::live_sessions()
}

pub fn parse_config(raw: Option<&str>) -> Result<PageConfig, JsValue> {
    let raw = raw.unwrap_or_default();
    if let Some(preset) = PageConfig::preset(raw.trim()) {
        return Ok(preset);
    }
    Ok(PageConfig::from_json(raw)?)
}

pub fn mount_into(host: &Element, config: PageConfig) -> Result<TvStatic, JsValue> {
    let page = Page::build(host, config)?;
    tracing::info!(?config, "page mounted");
    Ok(TvStatic { page: Some(page) })
}

struct Page {
    config: PageConfig,
    state: RefCell<ControlState>,
    root: HtmlElement,
    tv_static: HtmlElement,
    tv_inner: HtmlElement,
    overlay: Vec<HtmlElement>,
    controls: HtmlElement,
    stretch_pattern: Option<HtmlElement>,
    boing_pattern: Option<HtmlElement>,
    fine_inner: Option<HtmlElement>,
    boing_offset: Cell<f64>,
    stretchers: RefCell<Vec<Rc<Draggable<4>>>>,
    boings: RefCell<Vec<Rc<Draggable<1>>>>,
    listeners: RefCell<Vec<EventListener>>,
}

impl Page {
    fn build(host: &Element, config: PageConfig) -> Result<Rc<Self>, JsValue> {
        let root = dom::append(host, "div", "tv-page")?;

        let tv_static = dom::append(&root, "div", "tv-static")?;
        let tv_inner = dom::append(&tv_static, "div", "tv-static-inner")?;
        let overlay = (0..SHAPE_COUNT)
            .map(|_| dom::append(&tv_static, "div", "concentric-square"))
            .collect::<Result<Vec<_>, _>>()?;

        let controls = dom::append(&root, "div", "all-controls")?;
        let state = ControlState::default();

        let stretch_pattern = if config.stretch_panel {
            Some(pattern_panel(&root, "concentric-stretch", "stretch-depth", &state)?)
        } else {
            None
        };
        let boing_pattern = if config.boing_panel {
            Some(pattern_panel(&root, "concentric-boing", "boing-depth", &state)?)
        } else {
            None
        };
        let prism_panel = if config.prism_panel {
            let panel = dom::append(&root, "div", "new-feature-container")?;
            panel.set_inner_html(&prism::svg());
            Some(panel)
        } else {
            None
        };
        let (fine_panel, fine_inner, tint) = if config.fine_grain_panel {
            let wrapper = dom::append(&root, "div", "tv-static-large-wrapper")?;
            let panel = dom::append(&wrapper, "div", "tv-static-large")?;
            let inner = dom::append(&panel, "div", "tv-static-large-inner")?;
            dom::set_style(&inner, "background-image", &NoiseDescriptor::fine_grain().css_background())?;
            dom::set_style(&inner, "animation-duration", &format!("{FINE_GRAIN_CYCLE_SECS}s"))?;
            let tint = dom::append(&panel, "div", "tv-static-large-blue-tint")?;
            tint.set_attribute("aria-hidden", "true")?;
            dom::set_style(&tint, "opacity", "0")?;
            (Some(panel), Some(inner), Some(tint))
        } else {
            (None, None, None)
        };

        let page = Rc::new(Self {
            config,
            state: RefCell::new(state),
            root,
            tv_static,
            tv_inner,
            overlay,
            controls,
            stretch_pattern,
            boing_pattern,
            fine_inner,
            boing_offset: Cell::new(0.0),
            stretchers: RefCell::new(Vec::new()),
            boings: RefCell::new(Vec::new()),
            listeners: RefCell::new(Vec::new()),
        });

        page.render(Changes {
            noise: true,
            layout: true,
            animation: true,
            background: true,
            controls: true,
        })?;
        page.install_controls()?;

        // Rubber stretch writes the transform straight onto the surface.
        let stretch_targets = [
            page.stretch_pattern.as_ref().and_then(|svg| svg.parent_element()),
            prism_panel.map(Element::from),
        ];
        for surface in stretch_targets.into_iter().flatten() {
            let surface = surface.dyn_into::<HtmlElement>()?;
            let draggable = Draggable::attach(surface, Animator::stretch(), |el, animator| {
                let style = el.style();
                let _ = style.set_property("transform", &animator.css_transform());
                let _ = style.set_property("transform-origin", &animator.css_transform_origin());
            })?;
            page.stretchers.borrow_mut().push(draggable);
        }

        // The boing offset feeds the pattern geometry, so it goes through
        // page state instead of a direct style write.
        if let Some(surface) = page.boing_pattern.as_ref().and_then(|svg| svg.parent_element()) {
            let weak = Rc::downgrade(&page);
            let draggable = Draggable::attach(
                surface.dyn_into::<HtmlElement>()?,
                Animator::depth(),
                move |_, animator| {
                    if let Some(page) = weak.upgrade() {
                        page.publish_boing_offset(animator.offset());
                    }
                },
            )?;
            page.boings.borrow_mut().push(draggable);
        }

        if let (Some(panel), Some(tint)) = (fine_panel, tint) {
            let draggable = Draggable::attach(panel, Animator::depth(), move |_, animator| {
                let opacity = tint_opacity(animator.offset());
                let _ = tint.style().set_property("opacity", &opacity.to_string());
            })?;
            page.boings.borrow_mut().push(draggable);
        }

        Ok(page)
    }

    /// Delegated listeners on the page root: every control carries a
    /// `data-action`, so rebuilding the panel markup never drops a live
    /// closure.
    fn install_controls(self: &Rc<Self>) -> Result<(), JsValue> {
        for event in ["input", "click"] {
            let weak: Weak<Self> = Rc::downgrade(self);
            let listener = EventListener::new(&self.root, event, move |event: &Event| {
                let Some(page) = weak.upgrade() else {
                    return;
                };
                if let Some(action) = action_from_event(event) {
                    page.dispatch(action);
                }
            });
            self.listeners.borrow_mut().push(listener);
        }
        Ok(())
    }

    fn dispatch(&self, action: ControlAction) -> Changes {
        tracing::debug!(?action, "control");
        let changes = self.state.borrow_mut().apply(action);
        if let Err(err) = self.render(changes) {
            tracing::warn!(?err, "render failed");
        }
        changes
    }

    fn render(&self, changes: Changes) -> Result<(), JsValue> {
        let state = self.state.borrow();

        if changes.background {
            dom::set_style(&self.tv_static, "background-color", &state.background)?;
        }
        if changes.noise {
            let noise = NoiseDescriptor::from_colors(state.colors());
            dom::set_style(&self.tv_inner, "background-image", &noise.css_background())?;
        }
        if changes.animation {
            dom::set_style(&self.tv_inner, "animation-duration", &state.pace.css_duration())?;
            dom::set_style(&self.tv_inner, "animation-play-state", state.play_state())?;
            let rotating = self.config.rotation && state.rotating;
            self.tv_inner
                .class_list()
                .toggle_with_force("rotating", rotating)?;
            if let Some(inner) = &self.fine_inner {
                dom::set_style(inner, "animation-play-state", state.play_state())?;
            }
        }
        if changes.layout {
            let shape = if self.config.shape_toggle {
                state.shape
            } else {
                Default::default()
            };
            let overlay = ConcentricLayout::new(STATIC_OVERLAY_DEPTH, shape, Canvas::DEFAULT);
            for (el, style) in self.overlay.iter().zip(overlay.overlay_styles(state.border)) {
                el.set_attribute("style", &style)?;
            }
            if let Some(svg) = &self.stretch_pattern {
                let layout = ConcentricLayout::new(state.stretch_depth.as_f64(), shape, Canvas::DEFAULT);
                svg.set_inner_html(&layout.to_svg(state.border));
            }
        }
        if changes.controls {
            self.controls.set_inner_html(&state.controls_html(&self.config));
        }
        drop(state);

        if changes.layout {
            self.render_boing()?;
        }
        Ok(())
    }

    fn publish_boing_offset(&self, offset: f64) {
        if self.boing_offset.replace(offset) == offset {
            return;
        }
        if let Err(err) = self.render_boing() {
            tracing::warn!(?err, "boing render failed");
        }
    }

    fn render_boing(&self) -> Result<(), JsValue> {
        let Some(svg) = &self.boing_pattern else {
            return Ok(());
        };
        let state = self.state.borrow();
        let shape = if self.config.shape_toggle {
            state.shape
        } else {
            Default::default()
        };
        let depth = boing_depth(state.boing_depth.as_f64(), self.boing_offset.get());
        let layout = ConcentricLayout::new(depth, shape, Canvas::DEFAULT);
        svg.set_inner_html(&layout.to_svg(state.border));
        Ok(())
    }
}

impl Drop for Page {
    fn drop(&mut self) {
        for d in self.stretchers.get_mut().drain(..) {
            d.detach();
        }
        for d in self.boings.get_mut().drain(..) {
            d.detach();
        }
        self.listeners.get_mut().clear();
        self.root.remove();
    }
}

/// `<div class="{class}-wrapper">` holding the draggable pattern container
/// and its depth slider. Returns the element the SVG is rendered into.
fn pattern_panel(
    root: &Element,
    class: &str,
    slider_action: &str,
    state: &ControlState,
) -> Result<HtmlElement, JsValue> {
    let wrapper = dom::append(root, "div", &format!("{class}-wrapper"))?;
    let container = dom::append(&wrapper, "div", &format!("{class}-container"))?;
    let svg_host = dom::append(&container, "div", "pattern-svg")?;
    let depth = match slider_action {
        "boing-depth" => state.boing_depth,
        _ => state.stretch_depth,
    };
    wrapper.insert_adjacent_html("beforeend", &depth_slider_html(slider_action, depth))?;
    Ok(svg_host)
}

/// Map an `input`/`click` event to the control it came from.
fn action_from_event(event: &Event) -> Option<ControlAction> {
    let target = event.target()?.dyn_into::<Element>().ok()?;
    let el = target.closest("[data-action]").ok()??;
    let action = el.get_attribute("data-action")?;
    let is_input = el.tag_name().eq_ignore_ascii_case("input");

    // Inputs report through `input`; buttons through `click`.
    match (event.type_().as_str(), is_input) {
        ("input", true) | ("click", false) => {}
        _ => return None,
    }
    let index = el.get_attribute("data-index");
    let value = match el.dyn_ref::<HtmlInputElement>() {
        Some(input) => input.value(),
        None => el.get_attribute("data-value").unwrap_or_default(),
    };
    ControlAction::parse(&action, index.as_deref(), &value)
}
