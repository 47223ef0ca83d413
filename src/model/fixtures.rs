// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Sketchbridge-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Sketchbridge and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

#![cfg(test)]

use serde_json::json;

use super::element::{BoundElement, DiagramElement};
use super::ids::ElementId;
use super::state::{DiagramState, PresentationState};

pub(crate) fn eid(value: &str) -> ElementId {
    ElementId::new(value).expect("element id")
}

/// A rectangle with a bound text label, an arrow between two boxes and a free-standing note.
pub(crate) fn labelled_boxes() -> DiagramState {
    let elements = vec![
        DiagramElement::new(eid("box-a"))
            .with_field("type", json!("rectangle"))
            .with_field("x", json!(0))
            .with_field("y", json!(0))
            .with_bound_elements(vec![
                BoundElement::new(eid("label-a"), "text"),
                BoundElement::new(eid("arrow-ab"), "arrow"),
            ]),
        DiagramElement::new(eid("label-a"))
            .with_field("type", json!("text"))
            .with_field("text", json!("Planner"))
            .with_container(eid("box-a")),
        DiagramElement::new(eid("box-b"))
            .with_field("type", json!("rectangle"))
            .with_field("x", json!(240))
            .with_field("y", json!(0)),
        DiagramElement::new(eid("arrow-ab"))
            .with_field("type", json!("arrow"))
            .with_field("startBinding", json!({ "elementId": "box-a" }))
            .with_field("endBinding", json!({ "elementId": "box-b" })),
        DiagramElement::new(eid("note")).with_field("type", json!("text")),
    ];

    let app_state = PresentationState::new()
        .with("viewBackgroundColor", json!("#ffffff"))
        .with("zoom", json!({ "value": 1 }));

    DiagramState::new(elements, app_state, Default::default())
}

/// `count` rectangles laid out on a grid, each with a bound label.
pub(crate) fn grid(count: usize) -> DiagramState {
    let mut elements = Vec::with_capacity(count * 2);
    for index in 0..count {
        let shape = eid(&format!("shape-{index}"));
        let label = eid(&format!("label-{index}"));
        elements.push(
            DiagramElement::new(shape.clone())
                .with_field("type", json!("rectangle"))
                .with_field("x", json!((index % 20) * 120))
                .with_field("y", json!((index / 20) * 80))
                .with_bound_elements(vec![BoundElement::new(label.clone(), "text")]),
        );
        elements.push(
            DiagramElement::new(label)
                .with_field("type", json!("text"))
                .with_field("text", json!(format!("Step {index}")))
                .with_container(shape),
        );
    }
    DiagramState::from_elements(elements)
}
