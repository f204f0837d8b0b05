use gloo::timers::callback::Timeout;
use std::cell::RefCell;

/// One pending timeout per purpose. Scheduling drops the previous handle,
/// which cancels it; `cancel` drops it outright.
#[derive(Default)]
pub struct TimerSlot {
    pending: RefCell<Option<Timeout>>,
}

impl TimerSlot {
    pub fn schedule(&self, millis: u32, callback: impl FnOnce() + 'static) {
        let timeout = Timeout::new(millis, callback);
        *self.pending.borrow_mut() = Some(timeout);
    }

    pub fn cancel(&self) {
        self.pending.borrow_mut().take();
    }
}

/// Trailing-edge debounce: only the last call inside a burst runs, `wait_ms`
/// after that call.
pub struct Debouncer {
    wait_ms: u32,
    slot: TimerSlot,
}

impl Debouncer {
    pub fn new(wait_ms: u32) -> Self {
        Self {
            wait_ms,
            slot: TimerSlot::default(),
        }
    }

    pub fn call(&self, callback: impl FnOnce() + 'static) {
        self.slot.schedule(self.wait_ms, callback);
    }

    pub fn cancel(&self) {
        self.slot.cancel();
    }
}
