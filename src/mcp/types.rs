// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Sketchbridge-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Sketchbridge and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Canvas scene in its wire shape. Elements are free-form objects; `id` is required,
/// `boundElements`/`containerId` may be missing or null.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct McpDiagramState {
    #[serde(default)]
    pub elements: Vec<Value>,
    #[serde(default)]
    pub app_state: BTreeMap<String, Value>,
    #[serde(default)]
    pub files: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct SceneApplyParams {
    /// Omit (or pass null) when there is nothing to show yet.
    pub scene: Option<McpDiagramState>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SceneApplyResponse {
    /// One of `rendered`, `held`, `unchanged`, `skipped`.
    pub outcome: String,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct SceneEditParams {
    pub scene: McpDiagramState,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SceneEditResponse {
    pub elements: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SceneReadResponse {
    pub scene: McpDiagramState,
    pub renders: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SceneEmittedResponse {
    pub scene: Option<McpDiagramState>,
    pub count: u64,
    pub fingerprint: Option<String>,
    pub observed: u64,
    pub echoes_ignored: u64,
    pub suppressed: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SceneFlushResponse {
    pub flushed: bool,
}
