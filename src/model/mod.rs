// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Sketchbridge-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Sketchbridge and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Scene data model shared by the canvas and the assistant pipeline.
//!
//! A [`DiagramState`] is an ordered element list plus presentation state and binary assets. The
//! serde shape matches the canvas wire format (`elements`, `appState`, `files`).

pub mod element;
pub(crate) mod fixtures;
pub mod ids;
pub mod state;

pub use element::{BoundElement, DiagramElement, LinkedElement};
pub use ids::{AssetId, ElementId, Id, IdError};
pub use state::{AssetDataError, Assets, BinaryAsset, DiagramState, PresentationState};
