//! Cancellable delayed calls on a monotonic simulation clock
//!
//! Tasks are plain data; the owner decides what a task means when it comes
//! due and must check that its target is still alive before acting.

/// Handle for a scheduled task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

#[derive(Debug, Clone)]
struct Pending<T> {
    id: TimerId,
    due: f64,
    task: T,
}

/// Delayed-call queue
#[derive(Debug, Clone)]
pub struct Scheduler<T> {
    /// Simulation seconds since creation
    now: f64,
    next_id: u64,
    pending: Vec<Pending<T>>,
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Scheduler<T> {
    pub fn new() -> Self {
        Self {
            now: 0.0,
            next_id: 1,
            pending: Vec::new(),
        }
    }

    /// Current clock value in seconds
    pub fn now(&self) -> f64 {
        self.now
    }

    /// Run `task` once `delay` seconds have elapsed
    pub fn schedule(&mut self, delay: f32, task: T) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.pending.push(Pending {
            id,
            due: self.now + delay.max(0.0) as f64,
            task,
        });
        id
    }

    /// Cancel a pending task; false if it already ran or was cancelled
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.pending.len();
        self.pending.retain(|p| p.id != id);
        self.pending.len() != before
    }

    pub fn is_pending(&self, id: TimerId) -> bool {
        self.pending.iter().any(|p| p.id == id)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Drop all pending tasks
    pub fn clear(&mut self) {
        self.pending.clear();
    }

    /// Advance the clock and return the tasks that came due.
    ///
    /// Due tasks are ordered by due time, then by scheduling order.
    pub fn advance(&mut self, dt: f32) -> Vec<T> {
        self.now += dt.max(0.0) as f64;
        let now = self.now;

        let mut due = Vec::new();
        let mut i = 0;
        while i < self.pending.len() {
            if self.pending[i].due <= now {
                due.push(self.pending.swap_remove(i));
            } else {
                i += 1;
            }
        }

        due.sort_by(|a, b| a.due.total_cmp(&b.due).then(a.id.cmp(&b.id)));
        due.into_iter().map(|p| p.task).collect()
    }
}
