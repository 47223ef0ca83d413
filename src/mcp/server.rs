// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Sketchbridge-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Sketchbridge and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use rmcp::handler::server::tool::ToolRouter;
use rmcp::handler::server::wrapper::{Json, Parameters};
use rmcp::model::{ServerCapabilities, ServerInfo};
use rmcp::{tool, tool_handler, tool_router, ErrorData, ServerHandler, ServiceExt};

use crate::bridge::{BridgeError, BridgeHandle};
use crate::model::DiagramState;

use super::types::*;

#[derive(Clone)]
pub struct SketchbridgeMcp {
    bridge: BridgeHandle,
    tool_router: ToolRouter<Self>,
}

#[tool_router]
impl SketchbridgeMcp {
    pub fn new(bridge: BridgeHandle) -> Self {
        Self { bridge, tool_router: Self::tool_router() }
    }

    pub async fn serve_stdio(self) -> Result<(), rmcp::RmcpError> {
        let service = self.serve((tokio::io::stdin(), tokio::io::stdout())).await?;
        service.waiting().await?;
        Ok(())
    }

    /// Push a scene into the canvas. Missing link fields are defaulted and house presentation
    /// settings win over the scene's own; re-sending what the canvas already shows is a no-op.
    #[tool(name = "scene.apply")]
    async fn scene_apply(
        &self,
        params: Parameters<SceneApplyParams>,
    ) -> Result<Json<SceneApplyResponse>, ErrorData> {
        let state = params.0.scene.map(into_state).transpose()?;
        let outcome = self.bridge.apply(state).await.map_err(bridge_error)?;
        Ok(Json(SceneApplyResponse { outcome: outcome.as_str().to_owned() }))
    }

    /// Replace the canvas contents as a user would; the change is emitted once the canvas has
    /// been quiet for the configured window.
    #[tool(name = "scene.edit")]
    async fn scene_edit(
        &self,
        params: Parameters<SceneEditParams>,
    ) -> Result<Json<SceneEditResponse>, ErrorData> {
        let state = into_state(params.0.scene)?;
        let elements = state.elements.len() as u64;
        self.bridge.edit(state).await.map_err(bridge_error)?;
        Ok(Json(SceneEditResponse { elements }))
    }

    /// Read what the canvas currently shows.
    #[tool(name = "scene.read")]
    async fn scene_read(&self) -> Result<Json<SceneReadResponse>, ErrorData> {
        let snapshot = self.bridge.scene().await.map_err(bridge_error)?;
        Ok(Json(SceneReadResponse {
            scene: from_state(&snapshot.state)?,
            renders: snapshot.renders as u64,
        }))
    }

    /// Read the last change the canvas reported, with emission counters.
    #[tool(name = "scene.emitted")]
    async fn scene_emitted(&self) -> Result<Json<SceneEmittedResponse>, ErrorData> {
        let emitted = self.bridge.emitted().await.map_err(bridge_error)?;
        let scene = emitted.state.as_ref().map(from_state).transpose()?;
        Ok(Json(SceneEmittedResponse {
            scene,
            count: emitted.count,
            fingerprint: emitted.fingerprint,
            observed: emitted.stats.observed,
            echoes_ignored: emitted.stats.echoes_ignored,
            suppressed: emitted.stats.suppressed,
        }))
    }

    /// Emit a pending change now instead of waiting for the quiet window.
    #[tool(name = "scene.flush")]
    async fn scene_flush(&self) -> Result<Json<SceneFlushResponse>, ErrorData> {
        let flushed = self.bridge.flush().await.map_err(bridge_error)?;
        Ok(Json(SceneFlushResponse { flushed }))
    }
}

#[tool_handler]
impl ServerHandler for SketchbridgeMcp {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "Sketchbridge canvas sync server (tools: scene.apply, scene.edit, scene.read, scene.emitted, scene.flush)"
                    .into(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}

fn into_state(scene: McpDiagramState) -> Result<DiagramState, ErrorData> {
    // The wire model skips unaddressable elements; tool callers get told instead.
    for (index, element) in scene.elements.iter().enumerate() {
        match element.get("id").and_then(serde_json::Value::as_str) {
            Some(id) if !id.is_empty() => {}
            _ => {
                return Err(ErrorData::invalid_params(
                    format!("invalid scene: element {index} has no id"),
                    None,
                ))
            }
        }
    }
    let value = serde_json::to_value(scene).map_err(|err| {
        ErrorData::internal_error(format!("failed to encode scene: {err}"), None)
    })?;
    serde_json::from_value(value)
        .map_err(|err| ErrorData::invalid_params(format!("invalid scene: {err}"), None))
}

fn from_state(state: &DiagramState) -> Result<McpDiagramState, ErrorData> {
    serde_json::to_value(state)
        .and_then(serde_json::from_value)
        .map_err(|err| ErrorData::internal_error(format!("failed to encode scene: {err}"), None))
}

fn bridge_error(err: BridgeError) -> ErrorData {
    ErrorData::internal_error(format!("canvas unavailable: {err}"), None)
}
