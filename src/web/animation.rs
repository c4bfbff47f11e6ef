// animation.rs - Browser scheduling for a running stage
//
// Everything the browser holds on our behalf lives here: the pending
// requestAnimationFrame id, the frame closure and the resize listener.
// `stop()` releases all of it plus the stage's surface in one place.

use super::canvas::CanvasFactory;
use crate::frame::LoopHandle;
use crate::stage::Stage;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys as web;

type SharedStage = Rc<RefCell<Stage<CanvasFactory>>>;
type FrameClosure = Closure<dyn FnMut(f64)>;

pub struct AnimationHandle {
    window: web::Window,
    stage: SharedStage,
    live: LoopHandle,
    raf_id: Rc<Cell<Option<i32>>>,
    frame_cb: Rc<RefCell<Option<FrameClosure>>>,
    resize_cb: Option<Closure<dyn FnMut(web::Event)>>,
}

impl AnimationHandle {
    /// Start driving the stage's active loop. Returns `None` when nothing
    /// is active.
    pub fn start(stage: SharedStage) -> Option<Self> {
        let (window, live) = {
            let s = stage.borrow();
            (s.factory().window().clone(), s.loop_handle()?)
        };

        let raf_id = Rc::new(Cell::new(None));
        let frame_cb: Rc<RefCell<Option<FrameClosure>>> = Rc::new(RefCell::new(None));

        {
            let stage = stage.clone();
            let live = live.clone();
            let window = window.clone();
            let raf_id = raf_id.clone();
            let self_ref = frame_cb.clone();
            *frame_cb.borrow_mut() = Some(Closure::wrap(Box::new(move |now: f64| {
                raf_id.set(None);
                if !live.is_live() { return; }
                if let Ok(mut s) = stage.try_borrow_mut() {
                    s.frame(now);
                }
                if let Some(cb) = self_ref.borrow().as_ref() {
                    raf_id.set(window.request_animation_frame(cb.as_ref().unchecked_ref()).ok());
                }
            }) as Box<dyn FnMut(f64)>));
        }

        // Event timestamps share the rAF clock, so the stage can settle the
        // last resize of a burst from inside `frame`.
        let resize_cb = {
            let stage = stage.clone();
            let live = live.clone();
            Closure::wrap(Box::new(move |event: web::Event| {
                if !live.is_live() { return; }
                if let Ok(mut s) = stage.try_borrow_mut() {
                    s.request_resize(event.time_stamp());
                }
            }) as Box<dyn FnMut(web::Event)>)
        };
        if let Err(e) = window.add_event_listener_with_callback("resize", resize_cb.as_ref().unchecked_ref()) {
            log::warn!("resize listener not attached: {e:?}");
        }

        if let Some(cb) = frame_cb.borrow().as_ref() {
            raf_id.set(window.request_animation_frame(cb.as_ref().unchecked_ref()).ok());
        }

        Some(Self {
            window,
            stage,
            live,
            raf_id,
            frame_cb,
            resize_cb: Some(resize_cb),
        })
    }

    pub fn is_running(&self) -> bool {
        self.live.is_live()
    }

    /// Cancel the pending frame, detach the resize listener and release the
    /// surface. Idempotent.
    pub fn stop(&mut self) {
        self.live.stop();
        if let Some(id) = self.raf_id.take() {
            let _ = self.window.cancel_animation_frame(id);
        }
        // Breaks the closure's reference to itself.
        self.frame_cb.borrow_mut().take();
        if let Some(cb) = self.resize_cb.take() {
            let _ = self
                .window
                .remove_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
        }
        // Only tear down the activation this handle was driving.
        match self.stage.try_borrow_mut() {
            Ok(mut s) if s.loop_handle().is_some_and(|h| h.same_loop(&self.live)) => s.deactivate(),
            Ok(_) => {}
            Err(_) => log::warn!("stage busy during teardown; surface released on next activation"),
        }
    }
}

impl Drop for AnimationHandle {
    fn drop(&mut self) {
        self.stop();
    }
}
