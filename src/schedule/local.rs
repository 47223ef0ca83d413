// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Sketchbridge-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Sketchbridge and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use std::time::Duration;

use tokio::task::AbortHandle;

use super::{Scheduler, Task, TaskHandle};

#[derive(Default)]
struct LocalState {
    next_id: u64,
    tasks: HashMap<u64, AbortHandle>,
}

/// Tokio-backed scheduler for a current-thread runtime.
///
/// Tasks are spawned with `spawn_local`, so every call must happen inside a
/// [`tokio::task::LocalSet`].
#[derive(Clone, Default)]
pub struct LocalScheduler {
    inner: Rc<RefCell<LocalState>>,
}

impl LocalScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pending(&self) -> usize {
        self.inner.borrow().tasks.len()
    }
}

impl Scheduler for LocalScheduler {
    fn schedule(&self, delay: Duration, task: Task) -> TaskHandle {
        let id = {
            let mut state = self.inner.borrow_mut();
            state.next_id += 1;
            state.next_id
        };

        let registry = Rc::downgrade(&self.inner);
        let join = tokio::task::spawn_local(async move {
            tokio::time::sleep(delay).await;
            if let Some(registry) = registry.upgrade() {
                registry.borrow_mut().tasks.remove(&id);
            }
            task();
        });

        self.inner.borrow_mut().tasks.insert(id, join.abort_handle());
        TaskHandle::new(id)
    }

    fn cancel(&self, handle: TaskHandle) {
        let removed = self.inner.borrow_mut().tasks.remove(&handle.raw());
        if let Some(abort) = removed {
            abort.abort();
        }
    }
}
