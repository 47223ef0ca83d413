// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Sketchbridge-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Sketchbridge and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

use crate::fingerprint::{fingerprint, Fingerprint, FingerprintFn};
use crate::model::{Assets, DiagramElement, DiagramState, PresentationState};
use crate::schedule::{Scheduler, TaskHandle};

use super::diagnostics::{Diagnostic, Diagnostics};
use super::guard::{ApplyGuard, SceneLedger};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmitterPhase {
    Idle,
    Pending(TaskHandle),
}

/// Counters for what the emitter saw and did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EmitterStats {
    /// User mutations accepted into a burst.
    pub observed: u64,
    /// Mutations raised while a scene push was in progress.
    pub echoes_ignored: u64,
    pub emitted: u64,
    /// Settled bursts whose result matched the last emission.
    pub suppressed: u64,
}

pub type EmitSink = Box<dyn FnMut(DiagramState)>;

struct EmitterCore {
    phase: EmitterPhase,
    generation: u64,
    latest: Option<DiagramState>,
    /// Settled while the sink was running; emitted once it returns.
    deferred: Option<DiagramState>,
    last_emitted: Option<Fingerprint>,
    torn_down: bool,
    stats: EmitterStats,
}

struct EmitterShared {
    core: RefCell<EmitterCore>,
    sink: RefCell<EmitSink>,
    fingerprinter: Cell<FingerprintFn>,
    ledger: SceneLedger,
    diagnostics: Diagnostics,
}

/// Collapses bursts of canvas mutations into single change notifications.
///
/// Every accepted mutation restarts the quiescence window. When it elapses the latest snapshot is
/// fingerprinted and handed to the sink unless it matches what was last emitted. Clones share the
/// same state.
pub struct DebouncedEmitter<S> {
    shared: Rc<EmitterShared>,
    scheduler: S,
    guard: ApplyGuard,
    window: Duration,
}

impl<S: Clone> Clone for DebouncedEmitter<S> {
    fn clone(&self) -> Self {
        Self {
            shared: self.shared.clone(),
            scheduler: self.scheduler.clone(),
            guard: self.guard.clone(),
            window: self.window,
        }
    }
}

impl<S: Scheduler> DebouncedEmitter<S> {
    pub fn new(
        scheduler: S,
        window: Duration,
        guard: ApplyGuard,
        ledger: SceneLedger,
        diagnostics: Diagnostics,
        sink: EmitSink,
    ) -> Self {
        let core = EmitterCore {
            phase: EmitterPhase::Idle,
            generation: 0,
            latest: None,
            deferred: None,
            last_emitted: None,
            torn_down: false,
            stats: EmitterStats::default(),
        };
        Self {
            shared: Rc::new(EmitterShared {
                core: RefCell::new(core),
                sink: RefCell::new(sink),
                fingerprinter: Cell::new(fingerprint as FingerprintFn),
                ledger,
                diagnostics,
            }),
            scheduler,
            guard,
            window,
        }
    }

    /// Swaps the fingerprint function, shared by all clones.
    pub fn set_fingerprinter(&self, fingerprinter: FingerprintFn) {
        self.shared.fingerprinter.set(fingerprinter);
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    pub fn phase(&self) -> EmitterPhase {
        self.shared.core.borrow().phase
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.phase(), EmitterPhase::Pending(_))
    }

    pub fn is_torn_down(&self) -> bool {
        self.shared.core.borrow().torn_down
    }

    pub fn stats(&self) -> EmitterStats {
        self.shared.core.borrow().stats
    }

    pub fn last_emitted(&self) -> Option<Fingerprint> {
        self.shared.core.borrow().last_emitted.clone()
    }

    /// Canvas mutation listener body.
    pub fn on_canvas_mutation(
        &self,
        elements: Vec<DiagramElement>,
        presentation: PresentationState,
        assets: Assets,
    ) {
        let (previous, generation) = {
            let mut core = self.shared.core.borrow_mut();
            if core.torn_down {
                return;
            }
            if self.guard.is_applying() {
                core.stats.echoes_ignored += 1;
                tracing::trace!("mutation raised by a scene push; ignored");
                return;
            }
            core.stats.observed += 1;
            core.latest = Some(DiagramState::new(elements, presentation, assets));
            core.generation += 1;
            let previous = match core.phase {
                EmitterPhase::Pending(handle) => Some(handle),
                EmitterPhase::Idle => None,
            };
            (previous, core.generation)
        };

        if let Some(handle) = previous {
            self.scheduler.cancel(handle);
        }

        let weak = Rc::downgrade(&self.shared);
        let handle = self.scheduler.schedule(
            self.window,
            Box::new(move || {
                if let Some(shared) = weak.upgrade() {
                    shared.settle(generation);
                }
            }),
        );

        let mut core = self.shared.core.borrow_mut();
        if core.generation == generation && !core.torn_down {
            core.phase = EmitterPhase::Pending(handle);
        }
    }

    /// Settles a pending burst now instead of waiting for the window. Returns whether one was
    /// pending.
    pub fn flush(&self) -> bool {
        let (handle, generation) = {
            let core = self.shared.core.borrow();
            match core.phase {
                EmitterPhase::Pending(handle) => (handle, core.generation),
                EmitterPhase::Idle => return false,
            }
        };
        self.scheduler.cancel(handle);
        self.shared.settle(generation);
        true
    }

    /// Cancels any pending emission and stops accepting mutations. Idempotent.
    pub fn teardown(&self) {
        let previous = {
            let mut core = self.shared.core.borrow_mut();
            if core.torn_down {
                return;
            }
            core.torn_down = true;
            core.latest = None;
            core.deferred = None;
            std::mem::replace(&mut core.phase, EmitterPhase::Idle)
        };
        if let EmitterPhase::Pending(handle) = previous {
            self.scheduler.cancel(handle);
            tracing::debug!("pending emission cancelled by teardown");
        }
    }
}

impl EmitterShared {
    fn settle(&self, generation: u64) {
        let candidate = {
            let mut core = self.core.borrow_mut();
            if core.torn_down || core.generation != generation {
                return;
            }
            core.phase = EmitterPhase::Idle;
            core.latest.take()
        };
        if let Some(candidate) = candidate {
            self.emit_if_changed(candidate);
        }
    }

    fn emit_if_changed(&self, candidate: DiagramState) {
        let fingerprint = (self.fingerprinter.get())(&candidate);
        if let Ok(fingerprint) = &fingerprint {
            let mut core = self.core.borrow_mut();
            if core.last_emitted.as_ref() == Some(fingerprint) {
                core.stats.suppressed += 1;
                tracing::debug!(%fingerprint, "canvas settled on the last emitted scene");
                return;
            }
        }

        // Nothing is recorded unless the sink actually receives the snapshot.
        let Ok(mut sink) = self.sink.try_borrow_mut() else {
            tracing::debug!("change sink busy; emission deferred until it returns");
            self.core.borrow_mut().deferred = Some(candidate);
            return;
        };

        {
            let mut core = self.core.borrow_mut();
            core.last_emitted = fingerprint.as_ref().ok().cloned();
            core.stats.emitted += 1;
        }
        match fingerprint {
            Ok(fingerprint) => {
                tracing::debug!(
                    %fingerprint,
                    elements = candidate.elements.len(),
                    "emitting canvas change"
                );
                self.ledger.record(Some(fingerprint));
            }
            Err(err) => {
                tracing::warn!(error = %err, "canvas snapshot could not be fingerprinted; emitting anyway");
                self.ledger.record(None);
                self.diagnostics.report(Diagnostic::FingerprintFailed { error: err.to_string() });
            }
        }

        (&mut **sink)(candidate);
        drop(sink);

        let deferred = {
            let mut core = self.core.borrow_mut();
            if core.torn_down {
                None
            } else {
                core.deferred.take()
            }
        };
        if let Some(deferred) = deferred {
            self.emit_if_changed(deferred);
        }
    }
}
