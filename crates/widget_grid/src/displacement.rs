//! Delay-gated drag displacement.
//!
//! While a widget is dragged, the widget it hovers is only pushed aside after the hover has been
//! held for the configured delay. Collisions are always tested against the positions widgets had
//! when the drag started, so a push never cascades into further pushes.
//!
//! The push is committed by the timer callback itself. The session state lives behind an
//! `Rc<RefCell<_>>` shared with the armed callback, so nothing has to poll for fired timers.

use std::{
    cell::RefCell,
    rc::{Rc, Weak},
};

use leptos::logging;

use crate::{
    grid::find_collision,
    model::GridRect,
    timer::{TimerHandle, TimerScheduler},
};

/// Invoked after a timer commits a displacement, so views can redraw the preview.
pub type PreviewListener = Rc<dyn Fn()>;

struct SessionState {
    originals: Vec<(String, GridRect)>,
    start: GridRect,
    live: GridRect,
    target: Option<String>,
    displaced: Option<(String, GridRect)>,
    /// Sequence number of the armed timer, if one is armed and has not fired.
    armed: Option<u64>,
}

impl SessionState {
    fn original(&self, widget_id: &str) -> Option<GridRect> {
        self.originals
            .iter()
            .find(|(id, _)| id == widget_id)
            .map(|(_, rect)| *rect)
    }

    /// Runs when the timer armed for `target_id` fires.
    fn commit(&mut self, target_id: &str, seq: u64) -> bool {
        if self.armed != Some(seq) || self.target.as_deref() != Some(target_id) {
            logging::debug_warn!("stale displacement timer for `{target_id}`");
            return false;
        }
        self.armed = None;

        let Some(original) = self.original(target_id) else {
            return false;
        };
        let pushed = push_rect(original, self.start, self.live);
        self.displaced = Some((target_id.to_string(), pushed));
        true
    }
}

/// One drag gesture over the grid.
pub struct DragDisplacement {
    dragged_id: String,
    state: Rc<RefCell<SessionState>>,
    pending: Option<TimerHandle>,
    next_seq: u64,
    delay_ms: u32,
    listener: Option<PreviewListener>,
}

impl DragDisplacement {
    /// Snapshots every widget's position. Returns `None` if `dragged_id` is not in `layout`.
    pub fn begin(dragged_id: &str, layout: Vec<(String, GridRect)>, delay_ms: u32) -> Option<Self> {
        let start = layout
            .iter()
            .find(|(id, _)| id == dragged_id)
            .map(|(_, rect)| *rect)?;
        Some(Self {
            dragged_id: dragged_id.to_string(),
            state: Rc::new(RefCell::new(SessionState {
                originals: layout,
                start,
                live: start,
                target: None,
                displaced: None,
                armed: None,
            })),
            pending: None,
            next_seq: 0,
            delay_ms,
            listener: None,
        })
    }

    /// Calls `listener` whenever a fired timer changes the preview.
    pub fn with_listener(mut self, listener: Option<PreviewListener>) -> Self {
        self.listener = listener;
        self
    }

    pub fn dragged_id(&self) -> &str {
        &self.dragged_id
    }

    /// Widget currently under the dragged widget, by original position.
    pub fn target(&self) -> Option<String> {
        self.state.borrow().target.clone()
    }

    /// Widget pushed aside and where it was pushed to.
    pub fn displaced(&self) -> Option<(String, GridRect)> {
        self.state.borrow().displaced.clone()
    }

    pub fn has_pending_timer(&self) -> bool {
        self.state.borrow().armed.is_some()
    }

    /// Applies one drag-move tick with the dragged widget's live rect.
    pub fn drag_move<S: TimerScheduler + ?Sized>(&mut self, live: GridRect, scheduler: &S) {
        let rearm = {
            let mut state = self.state.borrow_mut();
            state.live = live;
            let target = find_collision(
                &live,
                &self.dragged_id,
                state.originals.iter().map(|(id, rect)| (id.as_str(), rect)),
            )
            .map(str::to_string);

            if target == state.target {
                return;
            }
            state.armed = None;
            state.target = target.clone();

            match target {
                None => {
                    state.displaced = None;
                    None
                }
                Some(target_id) => {
                    let already_displaced = state
                        .displaced
                        .as_ref()
                        .is_some_and(|(id, _)| *id == target_id);
                    (!already_displaced).then_some(target_id)
                }
            }
        };

        self.cancel_pending();
        if let Some(target_id) = rearm {
            self.arm(target_id, scheduler);
        }
    }

    fn arm<S: TimerScheduler + ?Sized>(&mut self, target_id: String, scheduler: &S) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.state.borrow_mut().armed = Some(seq);

        let state: Weak<RefCell<SessionState>> = Rc::downgrade(&self.state);
        let listener = self.listener.clone();
        let handle = scheduler.schedule(
            self.delay_ms,
            Box::new(move || {
                let Some(state) = state.upgrade() else {
                    return;
                };
                let changed = state.borrow_mut().commit(&target_id, seq);
                if changed {
                    if let Some(listener) = listener {
                        listener();
                    }
                }
            }),
        );
        self.pending = Some(handle);
    }

    fn cancel_pending(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.cancel();
        }
    }

    /// Dragged widget at its live rect, the displaced widget at its push target, everyone else
    /// where the drag found them.
    pub fn preview(&self) -> Vec<(String, GridRect)> {
        let state = self.state.borrow();
        state
            .originals
            .iter()
            .map(|(id, rect)| {
                let rect = if *id == self.dragged_id {
                    state.live
                } else {
                    match &state.displaced {
                        Some((displaced_id, pushed)) if displaced_id == id => *pushed,
                        _ => *rect,
                    }
                };
                (id.clone(), rect)
            })
            .collect()
    }

    /// Ends the gesture and returns the layout to commit.
    pub fn end(mut self) -> Vec<(String, GridRect)> {
        self.cancel_pending();
        self.preview()
    }

    /// Abandons the gesture. Pending timers are cancelled.
    pub fn cancel(mut self) {
        self.cancel_pending();
    }
}

impl Drop for DragDisplacement {
    fn drop(&mut self) {
        self.cancel_pending();
    }
}

/// Pushes `target` one dragged-width along x or one dragged-height along y, following the
/// dominant axis of the drag so far. Ties go horizontal and a zero vector pushes right.
fn push_rect(target: GridRect, start: GridRect, live: GridRect) -> GridRect {
    let dx = live.x - start.x;
    let dy = live.y - start.y;
    if dx.abs() >= dy.abs() {
        let x = if dx >= 0 {
            target.x + live.width
        } else {
            target.x - live.width
        };
        target.moved_to(x.max(0), target.y)
    } else {
        let y = if dy > 0 {
            target.y + live.height
        } else {
            target.y - live.height
        };
        target.moved_to(target.x, y.max(0))
    }
}
