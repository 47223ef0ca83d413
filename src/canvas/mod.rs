// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Sketchbridge-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Sketchbridge and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! The canvas widget seam.
//!
//! The live scene model belongs to the canvas widget. The engine only pushes scenes into it
//! ([`CanvasWidget::initialize`], [`CanvasWidget::update_scene`]) and listens to the mutation
//! events it raises. [`MemoryCanvas`] is a headless implementation used by the bridge and tests.

mod memory;

pub use memory::MemoryCanvas;

use crate::model::{Assets, DiagramElement, LinkedElement, PresentationState};

/// A normalized scene ready to hand to the canvas.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneUpdate {
    pub elements: Vec<LinkedElement>,
    pub presentation: PresentationState,
}

/// Receives the canvas contents after every mutation, however small (drag tick, keystroke).
pub type MutationListener = Box<dyn FnMut(Vec<DiagramElement>, PresentationState, Assets)>;

pub trait CanvasWidget {
    /// Called once when the widget becomes ready, with the scene to start from (if any).
    fn initialize(&mut self, initial: Option<&SceneUpdate>);

    /// Replaces the rendered elements and presentation state. Assets are left as they are.
    fn update_scene(&mut self, update: &SceneUpdate);

    /// Merges binary assets into the canvas store. Called before a scene push that carries assets.
    fn add_assets(&mut self, _assets: &Assets) {}

    /// Registers a mutation listener. Widgets may invoke listeners synchronously from
    /// `initialize`/`update_scene`.
    fn subscribe(&mut self, listener: MutationListener);
}
