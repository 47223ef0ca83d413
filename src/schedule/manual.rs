// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Sketchbridge-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Sketchbridge and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use std::rc::Rc;
use std::time::Duration;

use super::{Scheduler, Task, TaskHandle};

#[derive(Default)]
struct ManualState {
    now: Duration,
    next_id: u64,
    queue: BTreeMap<(Duration, u64), Task>,
    deadlines: HashMap<u64, Duration>,
}

/// A scheduler driven by an explicit virtual clock.
///
/// Time only moves through [`advance`](Self::advance). Tasks fire in deadline order (ties in
/// scheduling order) and may schedule further tasks, which fire within the same `advance` call
/// when due.
#[derive(Clone, Default)]
pub struct ManualScheduler {
    inner: Rc<RefCell<ManualState>>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Virtual time elapsed since creation.
    pub fn now(&self) -> Duration {
        self.inner.borrow().now
    }

    pub fn pending(&self) -> usize {
        self.inner.borrow().queue.len()
    }

    /// Moves the clock forward by `by`, running every task that becomes due. Returns the number
    /// of tasks run.
    pub fn advance(&self, by: Duration) -> usize {
        let target = self.now() + by;
        let mut fired = 0;

        loop {
            let task = {
                let mut state = self.inner.borrow_mut();
                let next = state.queue.keys().next().copied();
                match next {
                    Some((deadline, id)) if deadline <= target => {
                        state.now = deadline;
                        state.deadlines.remove(&id);
                        state.queue.remove(&(deadline, id))
                    }
                    _ => None,
                }
            };

            let Some(task) = task else {
                break;
            };
            task();
            fired += 1;
        }

        self.inner.borrow_mut().now = target;
        fired
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(&self, delay: Duration, task: Task) -> TaskHandle {
        let mut state = self.inner.borrow_mut();
        state.next_id += 1;
        let id = state.next_id;
        let deadline = state.now + delay;
        state.queue.insert((deadline, id), task);
        state.deadlines.insert(id, deadline);
        TaskHandle::new(id)
    }

    fn cancel(&self, handle: TaskHandle) {
        let mut state = self.inner.borrow_mut();
        if let Some(deadline) = state.deadlines.remove(&handle.raw()) {
            state.queue.remove(&(deadline, handle.raw()));
        }
    }
}
