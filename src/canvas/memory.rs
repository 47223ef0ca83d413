// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Sketchbridge-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Sketchbridge and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::cell::RefCell;
use std::rc::Rc;

use super::{CanvasWidget, MutationListener, SceneUpdate};
use crate::model::{Assets, DiagramElement, DiagramState};

#[derive(Debug, Default)]
struct MemoryCanvasState {
    scene: DiagramState,
    initialized: bool,
    renders: usize,
}

/// Headless canvas keeping the live scene in memory.
///
/// Like a real widget it raises a mutation event for every scene push as well as for user edits,
/// so the engine's echo suppression is exercised. Clones share the same scene; keep one clone to
/// play the user while the engine owns another.
#[derive(Clone, Default)]
pub struct MemoryCanvas {
    state: Rc<RefCell<MemoryCanvasState>>,
    listeners: Rc<RefCell<Vec<MutationListener>>>,
}

impl MemoryCanvas {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current canvas contents.
    pub fn snapshot(&self) -> DiagramState {
        self.state.borrow().scene.clone()
    }

    pub fn is_initialized(&self) -> bool {
        self.state.borrow().initialized
    }

    /// Number of scene pushes (`initialize` with a scene, `update_scene`) received so far.
    pub fn renders(&self) -> usize {
        self.state.borrow().renders
    }

    /// User interaction: replaces the whole scene and notifies listeners.
    pub fn edit(&self, scene: DiagramState) {
        self.state.borrow_mut().scene = scene;
        self.notify();
    }

    /// User interaction on the current scene, e.g. a single drag tick.
    pub fn edit_with(&self, edit: impl FnOnce(&mut DiagramState)) {
        edit(&mut self.state.borrow_mut().scene);
        self.notify();
    }

    fn load(&self, update: &SceneUpdate) {
        let mut state = self.state.borrow_mut();
        state.scene.elements = update.elements.iter().cloned().map(DiagramElement::from).collect();
        state.scene.app_state = update.presentation.clone();
        state.renders += 1;
    }

    fn notify(&self) {
        let scene = self.snapshot();
        // Listeners are taken out while running so one may subscribe or edit without a
        // double borrow.
        let mut running = std::mem::take(&mut *self.listeners.borrow_mut());
        for listener in running.iter_mut() {
            listener(scene.elements.clone(), scene.app_state.clone(), scene.files.clone());
        }
        let mut listeners = self.listeners.borrow_mut();
        running.append(&mut listeners);
        *listeners = running;
    }
}

impl CanvasWidget for MemoryCanvas {
    fn initialize(&mut self, initial: Option<&SceneUpdate>) {
        if let Some(update) = initial {
            self.load(update);
        }
        self.state.borrow_mut().initialized = true;
        self.notify();
    }

    fn update_scene(&mut self, update: &SceneUpdate) {
        self.load(update);
        self.notify();
    }

    fn add_assets(&mut self, assets: &Assets) {
        let mut state = self.state.borrow_mut();
        for (id, asset) in assets {
            state.scene.files.insert(id.clone(), asset.clone());
        }
    }

    fn subscribe(&mut self, listener: MutationListener) {
        self.listeners.borrow_mut().push(listener);
    }
}
