// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Sketchbridge-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Sketchbridge and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Two-way synchronization between an owner-held diagram state and a live canvas.
//!
//! Inbound scenes go through the [`SceneReconciler`]; canvas mutations go through the
//! [`DebouncedEmitter`]. Both share an [`ApplyGuard`] so scene pushes never come back as user
//! edits, and a [`SceneLedger`] so the canvas is not re-rendered with a scene it already shows
//! (including the owner echoing back an emitted change).

mod diagnostics;
mod emitter;
mod guard;
mod reconciler;

pub use diagnostics::{Diagnostic, DiagnosticSink, Diagnostics};
pub use emitter::{DebouncedEmitter, EmitSink, EmitterPhase, EmitterStats};
pub use guard::{ApplyGuard, ApplyScope, SceneLedger};
pub use reconciler::{ApplyOutcome, ReconcilerPhase, SceneReconciler};

use crate::canvas::CanvasWidget;
use crate::config::SyncConfig;
use crate::model::DiagramState;
use crate::schedule::Scheduler;

/// One canvas kept in sync with its owner.
///
/// Dropping it tears the emitter down, so no change notification fires afterwards.
pub struct CanvasSync<C: CanvasWidget, S: Scheduler + Clone + 'static> {
    reconciler: SceneReconciler<C>,
    emitter: DebouncedEmitter<S>,
    diagnostics: Diagnostics,
}

impl<C: CanvasWidget, S: Scheduler + Clone + 'static> CanvasSync<C, S> {
    pub fn new(
        config: &SyncConfig,
        scheduler: S,
        on_change: impl FnMut(DiagramState) + 'static,
    ) -> Self {
        let guard = ApplyGuard::new();
        let ledger = SceneLedger::new();
        let diagnostics = Diagnostics::new();
        let reconciler = SceneReconciler::new(
            config.policy.clone(),
            guard.clone(),
            ledger.clone(),
            diagnostics.clone(),
        );
        let emitter = DebouncedEmitter::new(
            scheduler,
            config.quiescence_window(),
            guard,
            ledger,
            diagnostics.clone(),
            Box::new(on_change),
        );
        Self { reconciler, emitter, diagnostics }
    }

    pub fn with_diagnostics(self, sink: impl FnMut(Diagnostic) + 'static) -> Self {
        self.diagnostics.set_sink(Box::new(sink));
        self
    }

    /// Widget-ready. Subscribes to the canvas and initializes it with the held scene, if any.
    pub fn attach(&mut self, mut canvas: C) -> ApplyOutcome {
        if self.reconciler.is_ready() {
            tracing::warn!("canvas already attached; ignoring second attach");
            return ApplyOutcome::Skipped;
        }
        let emitter = self.emitter.clone();
        canvas.subscribe(Box::new(move |elements, presentation, assets| {
            emitter.on_canvas_mutation(elements, presentation, assets);
        }));
        let outcome = self.reconciler.attach(canvas);
        tracing::info!(outcome = outcome.as_str(), "canvas attached");
        outcome
    }

    /// New scene from the owner. `None` means the owner has nothing to show yet.
    pub fn apply(&mut self, state: Option<DiagramState>) -> ApplyOutcome {
        let outcome = self.reconciler.apply(state);
        tracing::trace!(outcome = outcome.as_str(), "scene applied");
        outcome
    }

    pub fn reconciler(&self) -> &SceneReconciler<C> {
        &self.reconciler
    }

    pub fn emitter(&self) -> &DebouncedEmitter<S> {
        &self.emitter
    }

    pub fn flush(&self) -> bool {
        self.emitter.flush()
    }

    pub fn teardown(&self) {
        self.emitter.teardown();
    }
}

impl<C: CanvasWidget, S: Scheduler + Clone + 'static> Drop for CanvasSync<C, S> {
    fn drop(&mut self) {
        self.emitter.teardown();
    }
}

#[cfg(test)]
mod tests;
