//! requestAnimationFrame scheduler
//!
//! Owns the frame clock, the frame callback and the pending frame handle. Each
//! repaint runs one step to completion, then schedules the next one unless
//! stopped. Stopping cancels the pending frame. The callback only holds a weak
//! reference, so dropping the last handle frees the step closure and whatever
//! it captured.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

use crate::sim::FrameClock;

type StepFn = Box<dyn FnMut(f32)>;

struct Inner {
    clock: RefCell<FrameClock>,
    frame_id: Cell<Option<i32>>,
    on_step: RefCell<StepFn>,
    callback: Closure<dyn FnMut(f64)>,
}

impl Drop for Inner {
    fn drop(&mut self) {
        cancel_frame(&self.frame_id);
    }
}

/// Cloneable handle; every clone drives the same loop
#[derive(Clone)]
pub struct Scheduler {
    inner: Rc<Inner>,
}

impl Scheduler {
    /// `on_step` receives the clamped delta (ms) once per repaint
    pub fn new(on_step: impl FnMut(f32) + 'static) -> Self {
        let inner = Rc::new_cyclic(|weak: &Weak<Inner>| {
            let weak = weak.clone();
            Inner {
                clock: RefCell::new(FrameClock::new()),
                frame_id: Cell::new(None),
                on_step: RefCell::new(Box::new(on_step)),
                callback: Closure::new(move |time: f64| {
                    if let Some(inner) = weak.upgrade() {
                        run_frame(&inner, time);
                    }
                }),
            }
        });
        Self { inner }
    }

    /// Begin producing steps. No-op if already running.
    pub fn start(&self) {
        if self.is_running() {
            return;
        }
        let now = web_sys::window()
            .and_then(|w| w.performance())
            .map(|p| p.now())
            .unwrap_or_default();
        self.inner.clock.borrow_mut().start(now);
        schedule(&self.inner);
        log::info!("Scheduler started");
    }

    /// Halt steps and cancel the pending frame. Safe to call repeatedly,
    /// including from inside a step.
    pub fn stop(&self) {
        cancel_frame(&self.inner.frame_id);
        if self.inner.clock.borrow().is_running() {
            log::info!("Scheduler stopped");
        }
        self.inner.clock.borrow_mut().stop();
    }

    pub fn is_running(&self) -> bool {
        self.inner.clock.borrow().is_running()
    }
}

fn cancel_frame(frame_id: &Cell<Option<i32>>) {
    if let Some(id) = frame_id.take() {
        if let Some(window) = web_sys::window() {
            let _ = window.cancel_animation_frame(id);
        }
    }
}

fn schedule(inner: &Inner) {
    let Some(window) = web_sys::window() else {
        log::error!("No window; cannot schedule frames");
        return;
    };
    match window.request_animation_frame(inner.callback.as_ref().unchecked_ref()) {
        Ok(id) => inner.frame_id.set(Some(id)),
        Err(err) => log::error!("requestAnimationFrame failed: {:?}", err),
    }
}

fn run_frame(inner: &Inner, time: f64) {
    inner.frame_id.set(None);
    // Stopped between scheduling and firing
    let Some(dt) = inner.clock.borrow_mut().advance(time) else {
        return;
    };

    {
        let mut step = inner.on_step.borrow_mut();
        (*step)(dt);
    }

    // The step may have stopped (or stopped and restarted) us
    if inner.clock.borrow().is_running() && inner.frame_id.get().is_none() {
        schedule(inner);
    }
}
