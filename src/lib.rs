// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Sketchbridge-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Sketchbridge and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Sketchbridge: keeps an embedded drawing canvas and its owning application in sync.
//!
//! Scenes flow in through [`sync::CanvasSync::apply`] (linked, policy-forced, never echoed back);
//! user edits flow out, debounced and deduplicated by fingerprint, through the change callback.

pub mod bridge;
pub mod canvas;
pub mod config;
pub mod fingerprint;
pub mod link;
pub mod mcp;
pub mod model;
pub mod schedule;
pub mod sync;

pub use canvas::{CanvasWidget, MemoryCanvas};
pub use config::SyncConfig;
pub use model::DiagramState;
pub use sync::{ApplyOutcome, CanvasSync};
