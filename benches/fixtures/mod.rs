// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Sketchbridge-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Sketchbridge and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

#![allow(dead_code)]

// Deterministic scenes shaped like assistant output: labelled boxes chained by arrows.

use serde_json::json;

use sketchbridge::model::{BoundElement, DiagramElement, DiagramState, ElementId, PresentationState};

fn eid(value: String) -> ElementId {
    ElementId::new(value).expect("element id")
}

/// `shapes` labelled rectangles, each connected to the next by an arrow. Roughly three elements
/// per shape.
pub fn flowchart(shapes: usize) -> DiagramState {
    let mut elements = Vec::with_capacity(shapes * 3);
    for index in 0..shapes {
        let shape = eid(format!("shape-{index}"));
        let label = eid(format!("label-{index}"));
        let mut bound = vec![BoundElement::new(label.clone(), "text")];
        if index + 1 < shapes {
            bound.push(BoundElement::new(eid(format!("arrow-{index}")), "arrow"));
        }

        elements.push(
            DiagramElement::new(shape.clone())
                .with_field("type", json!("rectangle"))
                .with_field("x", json!((index % 10) * 180))
                .with_field("y", json!((index / 10) * 120))
                .with_field("width", json!(140))
                .with_field("height", json!(60))
                .with_field("strokeColor", json!("#1e1e1e"))
                .with_bound_elements(bound),
        );
        elements.push(
            DiagramElement::new(label)
                .with_field("type", json!("text"))
                .with_field("text", json!(format!("Step {index}")))
                .with_container(shape.clone()),
        );
        if index + 1 < shapes {
            elements.push(
                DiagramElement::new(eid(format!("arrow-{index}")))
                    .with_field("type", json!("arrow"))
                    .with_field("startBinding", json!({ "elementId": shape.as_str() }))
                    .with_field("endBinding", json!({ "elementId": format!("shape-{}", index + 1) })),
            );
        }
    }

    let app_state = PresentationState::new()
        .with("viewBackgroundColor", json!("#ffffff"))
        .with("gridSize", json!(20));
    DiagramState::new(elements, app_state, Default::default())
}

/// The same scene with its link fields stripped, as untrusted input often arrives.
pub fn unlinked(shapes: usize) -> DiagramState {
    let mut state = flowchart(shapes);
    for element in &mut state.elements {
        element.bound_elements = None;
    }
    state
}
