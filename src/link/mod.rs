// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Sketchbridge-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Sketchbridge and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Element link normalization.
//!
//! Scenes produced by the assistant are untrusted: `boundElements` and `containerId` may be
//! missing or `null`. The canvas widget requires both fields, so every inbound element list goes
//! through [`link_elements`] first. Normalization never fails and never invents links; dangling
//! or one-sided links are left as they are and can be inspected with [`link_issues`].

use std::fmt;

use rustc_hash::FxHashMap;

use crate::model::{DiagramElement, ElementId, LinkedElement};

/// Fills in missing link fields. Output has the same length and order as the input.
pub fn link_elements(elements: Vec<DiagramElement>) -> Vec<LinkedElement> {
    elements.into_iter().map(link_element).collect()
}

fn link_element(element: DiagramElement) -> LinkedElement {
    LinkedElement {
        id: element.id,
        container_id: element.container_id,
        bound_elements: element.bound_elements.unwrap_or_default(),
        fields: element.fields,
    }
}

/// A referential inconsistency between a container and its bound elements.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkIssue {
    /// `container` lists `bound` but no element with that id exists.
    MissingBoundElement { container: ElementId, bound: ElementId },
    /// `container` lists `bound`, but `bound` points at a different container (or none).
    ContainerMismatch { container: ElementId, bound: ElementId, actual: Option<ElementId> },
    /// `element` names a container that does not exist.
    MissingContainer { element: ElementId, container: ElementId },
}

impl fmt::Display for LinkIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingBoundElement { container, bound } => {
                write!(f, "{container} binds missing element {bound}")
            }
            Self::ContainerMismatch { container, bound, actual: Some(actual) } => {
                write!(f, "{container} binds {bound}, but {bound} is contained by {actual}")
            }
            Self::ContainerMismatch { container, bound, actual: None } => {
                write!(f, "{container} binds {bound}, but {bound} has no container")
            }
            Self::MissingContainer { element, container } => {
                write!(f, "{element} is contained by missing element {container}")
            }
        }
    }
}

/// Reports link inconsistencies without repairing them.
///
/// Only text bindings carry a back-reference on the bound side; arrows bound to a shape keep
/// their own `startBinding`/`endBinding` and are not expected to name a container.
pub fn link_issues(elements: &[LinkedElement]) -> Vec<LinkIssue> {
    let by_id: FxHashMap<&str, &LinkedElement> =
        elements.iter().map(|element| (element.id.as_str(), element)).collect();

    let mut issues = Vec::new();
    for element in elements {
        for bound in &element.bound_elements {
            match by_id.get(bound.id.as_str()) {
                None => issues.push(LinkIssue::MissingBoundElement {
                    container: element.id.clone(),
                    bound: bound.id.clone(),
                }),
                Some(target)
                    if bound.kind == "text"
                        && target.container_id.as_ref() != Some(&element.id) =>
                {
                    issues.push(LinkIssue::ContainerMismatch {
                        container: element.id.clone(),
                        bound: bound.id.clone(),
                        actual: target.container_id.clone(),
                    });
                }
                Some(_) => {}
            }
        }

        if let Some(container) = &element.container_id {
            if !by_id.contains_key(container.as_str()) {
                issues.push(LinkIssue::MissingContainer {
                    element: element.id.clone(),
                    container: container.clone(),
                });
            }
        }
    }
    issues
}
