// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Sketchbridge-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Sketchbridge and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::BTreeMap;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::element::{lenient_elements, DiagramElement};
use super::ids::AssetId;

pub const VIEW_BACKGROUND_COLOR: &str = "viewBackgroundColor";
pub const DEFAULT_FONT_SIZE: &str = "defaultFontSize";
pub const CURRENT_ITEM_TEXT_ALIGN: &str = "currentItemTextAlign";
pub const CURRENT_ITEM_FONT_FAMILY: &str = "currentItemFontFamily";

/// Canvas presentation state ("appState"): background, default styling, viewport and so on.
///
/// Keys are unordered; a sorted map keeps iteration and serialization canonical.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PresentationState(BTreeMap<String, Value>);

impl PresentationState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        self.0.insert(key.into(), value)
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.0.remove(key)
    }

    pub fn with(mut self, key: impl Into<String>, value: Value) -> Self {
        self.insert(key, value);
        self
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(key, value)| (key.as_str(), value))
    }

    pub fn background_color(&self) -> Option<&str> {
        self.get(VIEW_BACKGROUND_COLOR).and_then(Value::as_str)
    }

    pub fn default_font_size(&self) -> Option<u64> {
        self.get(DEFAULT_FONT_SIZE).and_then(Value::as_u64)
    }

    pub fn text_align(&self) -> Option<&str> {
        self.get(CURRENT_ITEM_TEXT_ALIGN).and_then(Value::as_str)
    }

    pub fn font_family(&self) -> Option<u64> {
        self.get(CURRENT_ITEM_FONT_FAMILY).and_then(Value::as_u64)
    }
}

impl FromIterator<(String, Value)> for PresentationState {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// An embedded binary payload (image) referenced by elements through its asset id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BinaryAsset {
    pub id: AssetId,
    pub mime_type: String,
    #[serde(rename = "dataURL")]
    pub data_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<u64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, thiserror::Error)]
pub enum AssetDataError {
    #[error("asset data is not a base64 data URL")]
    NotBase64DataUrl,
    #[error("asset data is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),
}

impl BinaryAsset {
    pub fn from_bytes(id: AssetId, mime_type: impl Into<String>, bytes: &[u8]) -> Self {
        let mime_type = mime_type.into();
        let data_url = format!("data:{mime_type};base64,{}", STANDARD.encode(bytes));
        Self { id, mime_type, data_url, created: None, extra: Map::new() }
    }

    /// Decodes the payload of a `data:<mime>;base64,<payload>` URL.
    pub fn decode(&self) -> Result<Vec<u8>, AssetDataError> {
        let payload = self
            .data_url
            .strip_prefix("data:")
            .and_then(|rest| rest.split_once(";base64,"))
            .map(|(_, payload)| payload)
            .ok_or(AssetDataError::NotBase64DataUrl)?;
        Ok(STANDARD.decode(payload)?)
    }
}

/// Binary assets keyed by asset id ("files").
pub type Assets = BTreeMap<AssetId, BinaryAsset>;

/// A complete diagram snapshot: ordered elements (z-order), presentation state and assets.
///
/// Snapshots are values. Every update produces a new one; nothing mutates a snapshot that has
/// already been applied or emitted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagramState {
    #[serde(default, deserialize_with = "lenient_elements")]
    pub elements: Vec<DiagramElement>,
    #[serde(default)]
    pub app_state: PresentationState,
    #[serde(default)]
    pub files: Assets,
}

impl DiagramState {
    pub fn new(elements: Vec<DiagramElement>, app_state: PresentationState, files: Assets) -> Self {
        Self { elements, app_state, files }
    }

    pub fn from_elements(elements: Vec<DiagramElement>) -> Self {
        Self { elements, ..Self::default() }
    }
}
