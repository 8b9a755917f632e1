//! Deferred "next turn" task scheduling.
//!
//! A field defers applying native focus until the host has committed its
//! switch to the editing view. The host decides what a "turn" is by
//! implementing [`Scheduler`]; [`TaskQueue`] is a cooperative queue drained
//! explicitly by the event loop.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;

/// A deferred task.
pub type Task = Box<dyn FnOnce()>;

/// Cancellation handle for a scheduled task.
#[derive(Debug, Clone, Default)]
pub struct TaskHandle {
    cancelled: Rc<Cell<bool>>,
}

impl TaskHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Prevent the task from running. Idempotent.
    pub fn cancel(&self) {
        self.cancelled.set(true);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.get()
    }
}

/// Runs tasks after the current UI turn has committed.
pub trait Scheduler {
    /// Queue `task` for the next turn. The returned handle cancels it.
    fn schedule(&self, task: Task) -> TaskHandle;
}

/// A single-threaded task queue.
#[derive(Clone, Default)]
pub struct TaskQueue {
    queue: Rc<RefCell<VecDeque<(TaskHandle, Task)>>>,
}

impl TaskQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of queued tasks, cancelled ones included.
    pub fn pending(&self) -> usize {
        self.queue.borrow().len()
    }

    /// Run every task queued before this call and return how many ran.
    ///
    /// Tasks scheduled while draining wait for the next call.
    pub fn run_pending(&self) -> usize {
        let batch = std::mem::take(&mut *self.queue.borrow_mut());
        let mut ran = 0;
        for (handle, task) in batch {
            if handle.is_cancelled() {
                continue;
            }
            task();
            ran += 1;
        }
        ran
    }
}

impl Scheduler for TaskQueue {
    fn schedule(&self, task: Task) -> TaskHandle {
        let handle = TaskHandle::new();
        self.queue.borrow_mut().push_back((handle.clone(), task));
        handle
    }
}

impl std::fmt::Debug for TaskQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskQueue")
            .field("pending", &self.pending())
            .finish()
    }
}
