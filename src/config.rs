// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Sketchbridge-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Sketchbridge and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Synchronization settings: the debounce window and the presentation policy forced on every
//! reconciled scene.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::model::state::{
    CURRENT_ITEM_FONT_FAMILY, CURRENT_ITEM_TEXT_ALIGN, DEFAULT_FONT_SIZE, VIEW_BACKGROUND_COLOR,
};
use crate::model::PresentationState;

pub const DEFAULT_QUIESCENCE_WINDOW_MS: u64 = 100;
const MAX_QUIESCENCE_WINDOW_MS: u64 = 10_000;

/// Presentation fields that always win over whatever an inbound scene specifies.
///
/// This is product policy (visual consistency of assistant-generated scenes), not something the
/// synchronization itself depends on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
pub struct PresentationPolicy {
    pub view_background_color: String,
    pub default_font_size: u32,
    pub text_align: String,
    pub font_family: u32,
    /// Additional `appState` keys to force.
    pub extra: BTreeMap<String, Value>,
}

impl Default for PresentationPolicy {
    fn default() -> Self {
        Self {
            view_background_color: "#AFEEEE".to_owned(),
            default_font_size: 20,
            text_align: "center".to_owned(),
            font_family: 1,
            extra: BTreeMap::new(),
        }
    }
}

impl PresentationPolicy {
    /// Returns `presentation` with every policy field overridden.
    pub fn apply_to(&self, presentation: &PresentationState) -> PresentationState {
        let mut forced = presentation.clone();
        forced.insert(VIEW_BACKGROUND_COLOR, json!(self.view_background_color));
        forced.insert(DEFAULT_FONT_SIZE, json!(self.default_font_size));
        forced.insert(CURRENT_ITEM_TEXT_ALIGN, json!(self.text_align));
        forced.insert(CURRENT_ITEM_FONT_FAMILY, json!(self.font_family));
        for (key, value) in &self.extra {
            forced.insert(key.clone(), value.clone());
        }
        forced
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
pub struct SyncConfig {
    pub quiescence_window_ms: u64,
    pub policy: PresentationPolicy,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            quiescence_window_ms: DEFAULT_QUIESCENCE_WINDOW_MS,
            policy: PresentationPolicy::default(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("quiescence window must be between 1 and 10000 ms (got {0})")]
    InvalidWindow(u64),
}

impl SyncConfig {
    /// Loads a JSON config file. Missing fields keep their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|source| ConfigError::Io { path: path.to_path_buf(), source })?;
        let config: Self = serde_json::from_str(&raw)
            .map_err(|source| ConfigError::Parse { path: path.to_path_buf(), source })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.quiescence_window_ms == 0 || self.quiescence_window_ms > MAX_QUIESCENCE_WINDOW_MS {
            return Err(ConfigError::InvalidWindow(self.quiescence_window_ms));
        }
        Ok(())
    }

    pub fn quiescence_window(&self) -> Duration {
        Duration::from_millis(self.quiescence_window_ms)
    }

    pub fn with_quiescence_window(mut self, window: Duration) -> Self {
        self.quiescence_window_ms = u64::try_from(window.as_millis()).unwrap_or(u64::MAX);
        self
    }
}
