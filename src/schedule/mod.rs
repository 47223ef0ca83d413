// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Sketchbridge-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Sketchbridge and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Cancellable delayed tasks on a single-threaded event loop.
//!
//! The debounce logic only needs `schedule(delay, task)` and `cancel(handle)`. [`LocalScheduler`]
//! backs that with tokio timers inside a `LocalSet`; [`ManualScheduler`] is a virtual clock for
//! deterministic tests and for hosts that drive time themselves.

mod local;
mod manual;

use std::time::Duration;

pub use local::LocalScheduler;
pub use manual::ManualScheduler;

/// Handle to a scheduled task; only meaningful to the scheduler that issued it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskHandle(u64);

impl TaskHandle {
    pub(crate) fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn raw(self) -> u64 {
        self.0
    }
}

pub type Task = Box<dyn FnOnce() + 'static>;

pub trait Scheduler {
    /// Runs `task` once after `delay`, unless cancelled first.
    fn schedule(&self, delay: Duration, task: Task) -> TaskHandle;

    /// Cancels a pending task. Cancelling a task that already ran (or was already cancelled) is a
    /// no-op.
    fn cancel(&self, handle: TaskHandle);
}
