use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use wasm_bindgen::{closure::Closure, JsCast, JsValue};

use super::dom;

/// A `requestAnimationFrame` loop with at most one pending frame.
///
/// `step` runs once per display refresh and returns whether another frame
/// is wanted. Dropping the loop cancels the pending frame.
pub struct FrameLoop {
    inner: Rc<FrameInner>,
}

struct FrameInner {
    handle: Cell<Option<i32>>,
    // Empty once the loop is dropped; a late frame then finds nothing to run.
    callback: RefCell<Option<Closure<dyn FnMut()>>>,
}

impl FrameInner {
    fn schedule(&self) -> Result<(), JsValue> {
        let callback = self.callback.borrow();
        let callback = callback.as_ref().ok_or("frame loop torn down")?;
        let id = dom::window()?.request_animation_frame(callback.as_ref().unchecked_ref())?;
        self.handle.set(Some(id));
        Ok(())
    }
}

impl FrameLoop {
    pub fn new(mut step: impl FnMut() -> bool + 'static) -> Self {
        let inner = Rc::new(FrameInner {
            handle: Cell::new(None),
            callback: RefCell::new(None),
        });
        let weak: Weak<FrameInner> = Rc::downgrade(&inner);
        *inner.callback.borrow_mut() = Some(Closure::wrap(Box::new(move || {
            let Some(inner) = weak.upgrade() else {
                return;
            };
            inner.handle.set(None);
            // `step` may have restarted the loop itself.
            if step() && inner.handle.get().is_none() {
                if let Err(err) = inner.schedule() {
                    tracing::warn!(?err, "could not schedule animation frame");
                }
            }
        }) as Box<dyn FnMut()>));
        Self { inner }
    }

    /// Schedule the next frame unless one is already pending.
    pub fn start(&self) -> Result<(), JsValue> {
        if self.is_running() {
            return Ok(());
        }
        self.inner.schedule()
    }

    pub fn is_running(&self) -> bool {
        self.inner.handle.get().is_some()
    }

    pub fn cancel(&self) {
        if let Some(id) = self.inner.handle.take() {
            if let Ok(window) = dom::window() {
                let _ = window.cancel_animation_frame(id);
            }
        }
    }
}

impl Drop for FrameLoop {
    fn drop(&mut self) {
        self.cancel();
        self.inner.callback.borrow_mut().take();
    }
}
