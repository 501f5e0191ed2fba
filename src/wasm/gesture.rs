//! Mouse drags feeding a spring [`Animator`].

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use gloo_events::EventListener;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Event, HtmlElement, MouseEvent};

use super::dom;
use super::render::FrameLoop;
use crate::spring::{Animator, Bounds, Point};

const DRAGGING_CLASS: &str = "dragging";

fn client_point(event: &MouseEvent) -> Point {
    Point::new(f64::from(event.client_x()), f64::from(event.client_y()))
}

thread_local! {
    static LIVE_SESSIONS: Cell<usize> = const { Cell::new(0) };
}

/// Number of drag sessions whose window listeners are still registered.
pub fn live_sessions() -> usize {
    LIVE_SESSIONS.with(Cell::get)
}

/// Window-level move/up listeners for one drag. Removed on drop, so the
/// drag keeps tracking after the pointer leaves the surface and nothing
/// outlives the gesture or the page.
pub struct DragSession {
    _move: EventListener,
    _up: EventListener,
}

impl DragSession {
    pub fn begin(
        mut on_move: impl FnMut(Point) + 'static,
        mut on_up: impl FnMut() + 'static,
    ) -> Result<Self, JsValue> {
        let window = dom::window()?;
        let _move = EventListener::new(&window, "mousemove", move |event: &Event| {
            if let Some(event) = event.dyn_ref::<MouseEvent>() {
                on_move(client_point(event));
            }
        });
        let _up = EventListener::new(&window, "mouseup", move |_| on_up());
        LIVE_SESSIONS.with(|n| n.set(n.get() + 1));
        Ok(Self { _move, _up })
    }
}

impl Drop for DragSession {
    fn drop(&mut self) {
        LIVE_SESSIONS.with(|n| n.set(n.get().saturating_sub(1)));
    }
}

/// Called after every spring step with the surface and the animator.
pub type FrameHook<const N: usize> = Box<dyn Fn(&HtmlElement, &Animator<N>)>;

/// A surface that springs back after being dragged.
pub struct Draggable<const N: usize> {
    element: HtmlElement,
    animator: RefCell<Animator<N>>,
    session: RefCell<Option<DragSession>>,
    frames: FrameLoop,
    on_frame: FrameHook<N>,
    down: RefCell<Option<EventListener>>,
}

impl<const N: usize> Draggable<N> {
    pub fn attach(
        element: HtmlElement,
        animator: Animator<N>,
        on_frame: impl Fn(&HtmlElement, &Animator<N>) + 'static,
    ) -> Result<Rc<Self>, JsValue> {
        let this = Rc::new_cyclic(|weak: &Weak<Self>| {
            let weak = weak.clone();
            Self {
                element,
                animator: RefCell::new(animator),
                session: RefCell::new(None),
                frames: FrameLoop::new(move || weak.upgrade().is_some_and(|d| d.step())),
                on_frame: Box::new(on_frame),
                down: RefCell::new(None),
            }
        });

        let weak = Rc::downgrade(&this);
        let down = EventListener::new(&this.element, "mousedown", move |event: &Event| {
            let (Some(this), Some(event)) = (weak.upgrade(), event.dyn_ref::<MouseEvent>()) else {
                return;
            };
            event.prevent_default();
            if let Err(err) = this.pointer_down(event) {
                tracing::warn!(?err, "drag start failed");
            }
        });
        *this.down.borrow_mut() = Some(down);
        Ok(this)
    }

    fn pointer_down(self: &Rc<Self>, event: &MouseEvent) -> Result<(), JsValue> {
        let rect = self.element.get_bounding_client_rect();
        let bounds = Bounds {
            left: rect.left(),
            top: rect.top(),
            width: rect.width(),
            height: rect.height(),
        };
        let wants_frame = self
            .animator
            .borrow_mut()
            .pointer_down(client_point(event), Some(bounds));
        self.element.class_list().add_1(DRAGGING_CLASS)?;

        let on_move = Rc::downgrade(self);
        let on_up = Rc::downgrade(self);
        let session = DragSession::begin(
            move |point| {
                if let Some(this) = on_move.upgrade() {
                    this.animator.borrow_mut().pointer_move(point);
                }
            },
            move || {
                if let Some(this) = on_up.upgrade() {
                    this.pointer_up();
                }
            },
        )?;
        // Replacing a stale session from a missed mouseup removes its listeners.
        *self.session.borrow_mut() = Some(session);

        if wants_frame {
            self.start();
        }
        Ok(())
    }

    fn pointer_up(&self) {
        let wants_frame = self.animator.borrow_mut().pointer_up();
        let _ = self.element.class_list().remove_1(DRAGGING_CLASS);
        // The session is released on the next frame: this runs inside its
        // own mouseup closure, which must stay alive until it returns.
        if wants_frame {
            self.start();
        }
    }

    fn start(&self) {
        if let Err(err) = self.frames.start() {
            tracing::warn!(?err, "could not start spring loop");
            self.animator.borrow_mut().cancel_frame();
        }
    }

    /// One spring tick. Returns whether another frame is wanted.
    fn step(&self) -> bool {
        let moving = self.animator.borrow_mut().tick().is_moving();
        if !self.animator.borrow().is_dragging() {
            self.session.borrow_mut().take();
        }
        (self.on_frame)(&self.element, &self.animator.borrow());
        moving
    }

    /// Stop animating and drop any live drag listeners.
    pub fn detach(&self) {
        self.frames.cancel();
        self.animator.borrow_mut().cancel_frame();
        self.session.borrow_mut().take();
        self.down.borrow_mut().take();
    }

    /// Whether window listeners from a drag are still registered.
    pub fn is_tracking(&self) -> bool {
        self.session.borrow().is_some()
    }
}

impl<const N: usize> Drop for Draggable<N> {
    fn drop(&mut self) {
        self.detach();
    }
}
