// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Sketchbridge-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Sketchbridge and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::fingerprint::Fingerprint;

/// Re-entrancy flag shared by the reconciler and the emitter.
///
/// Set for the duration of a scene push so mutation events the canvas raises as a direct result
/// are not mistaken for user edits. Single-threaded state, not a lock.
#[derive(Debug, Clone, Default)]
pub struct ApplyGuard {
    applying: Rc<Cell<bool>>,
}

impl ApplyGuard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_applying(&self) -> bool {
        self.applying.get()
    }

    /// Marks an apply in progress until the returned scope is dropped.
    pub fn enter(&self) -> ApplyScope<'_> {
        let previous = self.applying.replace(true);
        ApplyScope { guard: self, previous }
    }
}

#[must_use = "the guard is released as soon as the scope is dropped"]
pub struct ApplyScope<'a> {
    guard: &'a ApplyGuard,
    previous: bool,
}

impl Drop for ApplyScope<'_> {
    fn drop(&mut self) {
        self.guard.applying.set(self.previous);
    }
}

/// Fingerprint of what the canvas is known to display: the last scene pushed into it or the last
/// scene emitted from it, whichever happened most recently.
#[derive(Debug, Clone, Default)]
pub struct SceneLedger {
    shown: Rc<RefCell<Option<Fingerprint>>>,
}

impl SceneLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shown(&self) -> Option<Fingerprint> {
        self.shown.borrow().clone()
    }

    pub fn matches(&self, fingerprint: &Fingerprint) -> bool {
        self.shown.borrow().as_ref() == Some(fingerprint)
    }

    pub(crate) fn record(&self, fingerprint: Option<Fingerprint>) {
        *self.shown.borrow_mut() = fingerprint;
    }
}
