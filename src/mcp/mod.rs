// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Sketchbridge-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Sketchbridge and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Model Context Protocol (MCP) server surface.
//!
//! Lets assistant tooling push scenes into the headless canvas, play the user, and read back
//! what the canvas emitted.

mod server;
mod types;

pub use server::SketchbridgeMcp;
pub use types::McpDiagramState;
