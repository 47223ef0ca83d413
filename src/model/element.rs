// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Sketchbridge-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Sketchbridge and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use super::ids::{lenient_optional_id, ElementId};

/// Forward reference from a container to an element attached to it (e.g. a text label).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundElement {
    pub id: ElementId,
    #[serde(rename = "type", default)]
    pub kind: String,
}

impl BoundElement {
    pub fn new(id: ElementId, kind: impl Into<String>) -> Self {
        Self { id, kind: kind.into() }
    }
}

/// A scene element as produced by the assistant or reported by the canvas.
///
/// Only the identity and link fields are typed. Geometry, styling and everything else the canvas
/// understands is carried in `fields` untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagramElement {
    pub id: ElementId,
    #[serde(default, deserialize_with = "lenient_optional_id")]
    pub container_id: Option<ElementId>,
    #[serde(default, deserialize_with = "lenient_bound_elements")]
    pub bound_elements: Option<Vec<BoundElement>>,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl DiagramElement {
    pub fn new(id: ElementId) -> Self {
        Self { id, container_id: None, bound_elements: None, fields: Map::new() }
    }

    pub fn with_field(mut self, key: impl Into<String>, value: Value) -> Self {
        self.fields.insert(key.into(), value);
        self
    }

    pub fn with_container(mut self, container_id: ElementId) -> Self {
        self.container_id = Some(container_id);
        self
    }

    pub fn with_bound_elements(mut self, bound_elements: Vec<BoundElement>) -> Self {
        self.bound_elements = Some(bound_elements);
        self
    }

    /// The element `type` (`rectangle`, `text`, `arrow`, ...), when present.
    pub fn kind(&self) -> Option<&str> {
        self.fields.get("type").and_then(Value::as_str)
    }
}

/// Reads `boundElements` without failing: a non-list reads as absent and entries that are not
/// `{ id, type }` records with a usable id are dropped.
fn lenient_bound_elements<'de, D>(deserializer: D) -> Result<Option<Vec<BoundElement>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    let Some(Value::Array(entries)) = raw else {
        return Ok(None);
    };
    Ok(Some(
        entries
            .into_iter()
            .filter_map(|entry| serde_json::from_value::<BoundElement>(entry).ok())
            .collect(),
    ))
}

/// Reads an element list, skipping entries that have no usable id.
///
/// Link fields are already read leniently, so only elements the canvas could not address at all
/// are lost.
pub(crate) fn lenient_elements<'de, D>(deserializer: D) -> Result<Vec<DiagramElement>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Vec<Value>>::deserialize(deserializer)?.unwrap_or_default();
    let mut elements = Vec::with_capacity(raw.len());
    for (index, value) in raw.into_iter().enumerate() {
        match serde_json::from_value::<DiagramElement>(value) {
            Ok(element) => elements.push(element),
            Err(err) => tracing::warn!(index, error = %err, "skipping unaddressable element"),
        }
    }
    Ok(elements)
}

/// An element whose link fields are guaranteed present, ready to hand to the canvas.
///
/// Serializes `boundElements` as a list and `containerId` as `null` when there is no container,
/// which is the shape the canvas widget requires.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkedElement {
    pub id: ElementId,
    pub container_id: Option<ElementId>,
    pub bound_elements: Vec<BoundElement>,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl From<LinkedElement> for DiagramElement {
    fn from(element: LinkedElement) -> Self {
        Self {
            id: element.id,
            container_id: element.container_id,
            bound_elements: Some(element.bound_elements),
            fields: element.fields,
        }
    }
}
