// frame.rs - Render loop pacing
//
// The host calls in once per display refresh (requestAnimationFrame on the
// web). `RenderLoop` decides whether that callback runs a simulation step:
//   - a step runs only if at least 1000/fps ms passed since the last one
//   - skipped callbacks are dropped, never replayed
//   - once the handle is stopped, nothing runs, even if a callback was queued

use std::cell::Cell;
use std::rc::Rc;

/// Shared liveness flag for one running loop.
///
/// Clones observe the same flag. `stop()` is idempotent.
#[derive(Clone, Debug)]
pub struct LoopHandle(Rc<Cell<bool>>);

impl LoopHandle {
    pub fn live() -> Self {
        Self(Rc::new(Cell::new(true)))
    }

    #[inline]
    pub fn is_live(&self) -> bool {
        self.0.get()
    }

    pub fn stop(&self) {
        self.0.set(false);
    }

    /// True when both handles observe the same loop.
    pub fn same_loop(&self, other: &LoopHandle) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

/// Minimum-interval gate on monotonic millisecond timestamps.
#[derive(Clone, Copy, Debug)]
pub struct FrameThrottle {
    interval_ms: f64,
    last_ms: Option<f64>,
}

impl FrameThrottle {
    pub fn new(target_fps: f32) -> Self {
        Self {
            interval_ms: 1000.0 / f64::from(target_fps.max(1.0)),
            last_ms: None,
        }
    }

    pub fn interval_ms(&self) -> f64 {
        self.interval_ms
    }

    /// Returns the time since the previous admitted frame, or `None` if
    /// this callback comes too early. The first call is always admitted
    /// with an elapsed time of zero.
    pub fn admit(&mut self, now_ms: f64) -> Option<f64> {
        match self.last_ms {
            Some(last) if now_ms - last < self.interval_ms => None,
            prev => {
                self.last_ms = Some(now_ms);
                Some(prev.map_or(0.0, |last| now_ms - last))
            }
        }
    }
}

#[derive(Debug)]
pub struct RenderLoop {
    throttle: FrameThrottle,
    handle: LoopHandle,
    steps: u64,
}

impl RenderLoop {
    pub fn start(target_fps: f32) -> Self {
        Self {
            throttle: FrameThrottle::new(target_fps),
            handle: LoopHandle::live(),
            steps: 0,
        }
    }

    pub fn handle(&self) -> LoopHandle {
        self.handle.clone()
    }

    pub fn is_live(&self) -> bool {
        self.handle.is_live()
    }

    pub fn stop(&self) {
        self.handle.stop();
    }

    /// Steps executed so far.
    pub fn steps(&self) -> u64 {
        self.steps
    }

    pub fn interval_ms(&self) -> f64 {
        self.throttle.interval_ms()
    }

    /// One display callback. Runs `step(elapsed_ms)` if the loop is live
    /// and the frame interval has passed; returns whether it ran.
    pub fn pump(&mut self, now_ms: f64, step: impl FnOnce(f64)) -> bool {
        if !self.handle.is_live() { return false; }
        let Some(elapsed) = self.throttle.admit(now_ms) else { return false };
        step(elapsed);
        self.steps += 1;
        true
    }
}

/// Trailing-edge gate for bursty host events (window resize).
///
/// Every `trigger` restarts the quiet period; `fire` reports once, after
/// `delay_ms` passed without a new trigger. The last event of a burst is
/// therefore always acted on.
#[derive(Clone, Copy, Debug)]
pub struct Debounce {
    delay_ms: f64,
    last_ms: Option<f64>,
}

impl Debounce {
    pub fn new(delay_ms: f64) -> Self {
        Self { delay_ms: delay_ms.max(0.0), last_ms: None }
    }

    pub fn trigger(&mut self, now_ms: f64) {
        self.last_ms = Some(now_ms);
    }

    pub fn cancel(&mut self) {
        self.last_ms = None;
    }

    pub fn is_pending(&self) -> bool {
        self.last_ms.is_some()
    }

    pub fn fire(&mut self, now_ms: f64) -> bool {
        match self.last_ms {
            Some(last) if now_ms - last >= self.delay_ms => {
                self.last_ms = None;
                true
            }
            _ => false,
        }
    }
}
