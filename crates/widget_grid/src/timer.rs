//! Cancellable one-shot timers behind a scheduler trait.
//!
//! The displacement session arms timers through [`TimerScheduler`] and keeps the returned
//! [`TimerHandle`]. [`ManualScheduler`] drives time by hand for tests and headless hosts; the
//! browser uses `setTimeout` through `WebTimerScheduler`.

use std::{
    cell::RefCell,
    collections::BTreeMap,
    fmt,
    rc::{Rc, Weak},
};

type Callback = Box<dyn FnOnce()>;

/// Handle to a scheduled callback. Cancelling is idempotent and a no-op after the timer fired.
pub struct TimerHandle {
    cancel: RefCell<Option<Callback>>,
}

impl TimerHandle {
    /// Wraps the scheduler-specific cancel action.
    pub fn new(cancel: impl FnOnce() + 'static) -> Self {
        Self {
            cancel: RefCell::new(Some(Box::new(cancel))),
        }
    }

    /// A handle with nothing to cancel.
    pub fn inert() -> Self {
        Self {
            cancel: RefCell::new(None),
        }
    }

    pub fn cancel(&self) {
        let cancel = self.cancel.borrow_mut().take();
        if let Some(cancel) = cancel {
            cancel();
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.borrow().is_none()
    }
}

impl fmt::Debug for TimerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TimerHandle")
            .field("cancelled", &self.is_cancelled())
            .finish()
    }
}

/// Schedules one-shot callbacks on the host's event loop.
pub trait TimerScheduler {
    /// Runs `callback` once after `delay_ms`, unless the returned handle is cancelled first.
    fn schedule(&self, delay_ms: u32, callback: Box<dyn FnOnce()>) -> TimerHandle;
}

#[derive(Default)]
struct ManualClock {
    now_ms: u64,
    next_id: u64,
    pending: BTreeMap<(u64, u64), Callback>,
}

/// Deterministic scheduler whose clock only moves through [`ManualScheduler::advance`].
///
/// Clones share the same clock and queue.
#[derive(Clone, Default)]
pub struct ManualScheduler {
    clock: Rc<RefCell<ManualClock>>,
}

impl ManualScheduler {
    pub fn now_ms(&self) -> u64 {
        self.clock.borrow().now_ms
    }

    pub fn pending(&self) -> usize {
        self.clock.borrow().pending.len()
    }

    /// Moves the clock forward and runs every callback that became due, in due order.
    /// Returns how many callbacks ran.
    pub fn advance(&self, ms: u64) -> usize {
        let target = self.clock.borrow().now_ms.saturating_add(ms);
        let mut fired = 0;
        loop {
            // Release the borrow before running the callback; it may schedule again.
            let next = {
                let mut clock = self.clock.borrow_mut();
                let due = clock
                    .pending
                    .keys()
                    .next()
                    .copied()
                    .filter(|(due_ms, _)| *due_ms <= target);
                due.and_then(|key| {
                    clock.now_ms = key.0;
                    clock.pending.remove(&key)
                })
            };
            match next {
                Some(callback) => {
                    callback();
                    fired += 1;
                }
                None => break,
            }
        }
        self.clock.borrow_mut().now_ms = target;
        fired
    }
}

impl fmt::Debug for ManualScheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ManualScheduler")
            .field("now_ms", &self.now_ms())
            .field("pending", &self.pending())
            .finish()
    }
}

impl TimerScheduler for ManualScheduler {
    fn schedule(&self, delay_ms: u32, callback: Box<dyn FnOnce()>) -> TimerHandle {
        let key = {
            let mut clock = self.clock.borrow_mut();
            let key = (clock.now_ms + u64::from(delay_ms), clock.next_id);
            clock.next_id += 1;
            clock.pending.insert(key, callback);
            key
        };
        let clock: Weak<RefCell<ManualClock>> = Rc::downgrade(&self.clock);
        TimerHandle::new(move || {
            if let Some(clock) = clock.upgrade() {
                clock.borrow_mut().pending.remove(&key);
            }
        })
    }
}

/// Commits only the last input written within a quiet period.
///
/// Every [`Debouncer::input`] cancels the armed commit and arms a new one, so the commit runs once
/// the input has been left alone for `delay_ms`.
pub struct Debouncer<T> {
    delay_ms: u32,
    commit: Rc<dyn Fn(T)>,
    armed: Option<TimerHandle>,
}

impl<T: 'static> Debouncer<T> {
    pub fn new(delay_ms: u32, commit: impl Fn(T) + 'static) -> Self {
        Self {
            delay_ms,
            commit: Rc::new(commit),
            armed: None,
        }
    }

    pub fn delay_ms(&self) -> u32 {
        self.delay_ms
    }

    /// Restarts the quiet period with `value` as the pending commit.
    pub fn input<S: TimerScheduler + ?Sized>(&mut self, value: T, scheduler: &S) {
        self.cancel();
        let commit = self.commit.clone();
        self.armed = Some(scheduler.schedule(self.delay_ms, Box::new(move || commit(value))));
    }

    /// Drops the pending commit, if any.
    pub fn cancel(&mut self) {
        if let Some(handle) = self.armed.take() {
            handle.cancel();
        }
    }
}

impl<T> Drop for Debouncer<T> {
    fn drop(&mut self) {
        if let Some(handle) = self.armed.take() {
            handle.cancel();
        }
    }
}

/// `setTimeout`-backed scheduler for the browser.
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Clone, Copy, Default)]
pub struct WebTimerScheduler;

#[cfg(target_arch = "wasm32")]
impl TimerScheduler for WebTimerScheduler {
    fn schedule(&self, delay_ms: u32, callback: Box<dyn FnOnce()>) -> TimerHandle {
        use wasm_bindgen::{closure::Closure, JsCast};

        let Some(window) = web_sys::window() else {
            leptos::logging::warn!("no window: displacement timer not scheduled");
            return TimerHandle::inert();
        };
        let js_callback = Closure::once_into_js(move || callback());
        let delay = i32::try_from(delay_ms).unwrap_or(i32::MAX);
        match window.set_timeout_with_callback_and_timeout_and_arguments_0(
            js_callback.unchecked_ref(),
            delay,
        ) {
            Ok(id) => TimerHandle::new(move || {
                if let Some(window) = web_sys::window() {
                    window.clear_timeout_with_handle(id);
                }
            }),
            Err(err) => {
                leptos::logging::warn!("setTimeout failed: {err:?}");
                TimerHandle::inert()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use pretty_assertions::assert_eq;

    use super::*;

    fn counter() -> (Rc<Cell<u32>>, impl Fn() -> Box<dyn FnOnce()>) {
        let hits = Rc::new(Cell::new(0));
        let make = {
            let hits = hits.clone();
            move || {
                let hits = hits.clone();
                Box::new(move || hits.set(hits.get() + 1)) as Box<dyn FnOnce()>
            }
        };
        (hits, make)
    }

    #[test]
    fn fires_only_once_due() {
        let scheduler = ManualScheduler::default();
        let (hits, make) = counter();
        let _handle = scheduler.schedule(2000, make());

        assert_eq!(scheduler.advance(1999), 0);
        assert_eq!(hits.get(), 0);
        assert_eq!(scheduler.advance(1), 1);
        assert_eq!(hits.get(), 1);
        assert_eq!(scheduler.advance(10_000), 0);
        assert_eq!(scheduler.now_ms(), 12_000);
    }

    #[test]
    fn cancel_is_idempotent_and_prevents_firing() {
        let scheduler = ManualScheduler::default();
        let (hits, make) = counter();
        let handle = scheduler.schedule(50, make());

        handle.cancel();
        handle.cancel();

        assert!(handle.is_cancelled());
        assert_eq!(scheduler.pending(), 0);
        scheduler.advance(100);
        assert_eq!(hits.get(), 0);
    }

    #[test]
    fn cancelling_after_fire_is_harmless() {
        let scheduler = ManualScheduler::default();
        let (hits, make) = counter();
        let first = scheduler.schedule(10, make());
        let _second = scheduler.schedule(20, make());

        scheduler.advance(10);
        first.cancel();
        scheduler.advance(10);

        assert_eq!(hits.get(), 2);
    }

    #[test]
    fn callbacks_may_schedule_more_timers() {
        let scheduler = ManualScheduler::default();
        let (hits, make) = counter();
        let inner = scheduler.clone();
        let follow_up = make();
        let _handle = scheduler.schedule(
            10,
            Box::new(move || {
                let _ = inner.schedule(5, follow_up);
            }),
        );

        assert_eq!(scheduler.advance(15), 2);
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn debouncer_commits_last_input_after_quiet_period() {
        let scheduler = ManualScheduler::default();
        let committed = Rc::new(RefCell::new(Vec::new()));
        let sink = committed.clone();
        let mut debouncer = Debouncer::new(300, move |value: String| sink.borrow_mut().push(value));

        debouncer.input("r".to_string(), &scheduler);
        scheduler.advance(200);
        debouncer.input("ru".to_string(), &scheduler);
        scheduler.advance(200);
        debouncer.input("rust".to_string(), &scheduler);
        scheduler.advance(299);
        assert!(committed.borrow().is_empty());
        assert_eq!(scheduler.pending(), 1);

        scheduler.advance(1);
        assert_eq!(*committed.borrow(), vec!["rust".to_string()]);
    }

    #[test]
    fn cancelled_or_dropped_debouncer_commits_nothing() {
        let scheduler = ManualScheduler::default();
        let hits = Rc::new(Cell::new(0));
        let cancelled_sink = hits.clone();
        let dropped_sink = hits.clone();
        let mut debouncer = Debouncer::new(300, move |_: ()| {
            cancelled_sink.set(cancelled_sink.get() + 1)
        });
        let mut dropped = Debouncer::new(300, move |_: ()| {
            dropped_sink.set(dropped_sink.get() + 1)
        });

        debouncer.input((), &scheduler);
        debouncer.cancel();
        dropped.input((), &scheduler);
        drop(dropped);

        assert_eq!(scheduler.pending(), 0);
        scheduler.advance(1000);
        assert_eq!(hits.get(), 0);
    }
}
