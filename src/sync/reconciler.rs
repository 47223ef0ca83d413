// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Sketchbridge-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Sketchbridge and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use crate::canvas::{CanvasWidget, SceneUpdate};
use crate::config::PresentationPolicy;
use crate::fingerprint::fingerprint;
use crate::link::{link_elements, link_issues};
use crate::model::DiagramState;

use super::diagnostics::{Diagnostic, Diagnostics};
use super::guard::{ApplyGuard, SceneLedger};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcilerPhase {
    Idle,
    Applying,
}

/// What an `apply` call did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// The scene was pushed into the canvas.
    Rendered,
    /// The canvas is not ready; the scene is held (replacing any earlier one) until it is.
    Held,
    /// The canvas already shows this scene.
    Unchanged,
    /// No scene was supplied.
    Skipped,
}

impl ApplyOutcome {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Rendered => "rendered",
            Self::Held => "held",
            Self::Unchanged => "unchanged",
            Self::Skipped => "skipped",
        }
    }
}

/// Applies externally produced scenes onto the canvas.
pub struct SceneReconciler<C> {
    canvas: Option<C>,
    held: Option<DiagramState>,
    policy: PresentationPolicy,
    guard: ApplyGuard,
    ledger: SceneLedger,
    diagnostics: Diagnostics,
    renders: u64,
}

impl<C: CanvasWidget> SceneReconciler<C> {
    pub fn new(
        policy: PresentationPolicy,
        guard: ApplyGuard,
        ledger: SceneLedger,
        diagnostics: Diagnostics,
    ) -> Self {
        Self { canvas: None, held: None, policy, guard, ledger, diagnostics, renders: 0 }
    }

    pub fn phase(&self) -> ReconcilerPhase {
        if self.guard.is_applying() {
            ReconcilerPhase::Applying
        } else {
            ReconcilerPhase::Idle
        }
    }

    pub fn is_ready(&self) -> bool {
        self.canvas.is_some()
    }

    pub fn canvas(&self) -> Option<&C> {
        self.canvas.as_ref()
    }

    /// The scene waiting for the canvas to become ready, if any.
    pub fn held(&self) -> Option<&DiagramState> {
        self.held.as_ref()
    }

    /// Number of scene pushes performed.
    pub fn renders(&self) -> u64 {
        self.renders
    }

    pub fn apply(&mut self, state: Option<DiagramState>) -> ApplyOutcome {
        let Some(state) = state else {
            tracing::debug!("apply without a scene; nothing to do");
            return ApplyOutcome::Skipped;
        };

        if self.canvas.is_none() {
            if self.held.replace(state).is_some() {
                tracing::debug!("canvas not ready; replaced held scene");
            } else {
                tracing::debug!("canvas not ready; holding scene");
            }
            return ApplyOutcome::Held;
        }

        self.push(state, false)
    }

    /// Widget-ready: takes ownership of the canvas and initializes it with the held scene, if any.
    pub fn attach(&mut self, canvas: C) -> ApplyOutcome {
        self.canvas = Some(canvas);
        match self.held.take() {
            Some(state) => self.push(state, true),
            None => {
                if let Some(canvas) = self.canvas.as_mut() {
                    let _scope = self.guard.enter();
                    canvas.initialize(None);
                }
                ApplyOutcome::Skipped
            }
        }
    }

    fn push(&mut self, state: DiagramState, initialize: bool) -> ApplyOutcome {
        let fingerprint = match fingerprint(&state) {
            Ok(fingerprint) => Some(fingerprint),
            Err(err) => {
                tracing::warn!(error = %err, "inbound scene could not be fingerprinted; rendering anyway");
                self.diagnostics.report(Diagnostic::FingerprintFailed { error: err.to_string() });
                None
            }
        };

        if !initialize {
            if let Some(fingerprint) = fingerprint.as_ref().filter(|fp| self.ledger.matches(fp)) {
                tracing::debug!(%fingerprint, "canvas already shows this scene; skipping render");
                return ApplyOutcome::Unchanged;
            }
        }

        let DiagramState { elements, app_state, files } = state;
        let elements = link_elements(elements);
        let issues = link_issues(&elements);
        if !issues.is_empty() {
            tracing::debug!(count = issues.len(), "inbound scene has inconsistent links");
            self.diagnostics.report(Diagnostic::LinkIssues { issues });
        }
        let update = SceneUpdate { elements, presentation: self.policy.apply_to(&app_state) };

        let Some(canvas) = self.canvas.as_mut() else {
            return ApplyOutcome::Held;
        };
        {
            let _scope = self.guard.enter();
            if !files.is_empty() {
                canvas.add_assets(&files);
            }
            if initialize {
                canvas.initialize(Some(&update));
            } else {
                canvas.update_scene(&update);
            }
        }

        self.ledger.record(fingerprint);
        self.renders += 1;
        tracing::debug!(elements = update.elements.len(), initialize, "scene pushed to canvas");
        ApplyOutcome::Rendered
    }
}
