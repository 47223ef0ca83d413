// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Sketchbridge-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Sketchbridge and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use rstest::{fixture, rstest};
use serde_json::json;

use super::{ApplyOutcome, CanvasSync, Diagnostic, EmitterPhase, ReconcilerPhase};
use crate::canvas::MemoryCanvas;
use crate::config::SyncConfig;
use crate::fingerprint::{fingerprint, Fingerprint, FingerprintError};
use crate::link::LinkIssue;
use crate::model::fixtures::{eid, labelled_boxes};
use crate::model::{
    AssetId, BinaryAsset, BoundElement, DiagramElement, DiagramState, PresentationState,
};
use crate::schedule::ManualScheduler;

fn ms(value: u64) -> Duration {
    Duration::from_millis(value)
}

struct Harness {
    sync: CanvasSync<MemoryCanvas, ManualScheduler>,
    clock: ManualScheduler,
    user: MemoryCanvas,
    emitted: Rc<RefCell<Vec<DiagramState>>>,
    diagnostics: Rc<RefCell<Vec<Diagnostic>>>,
}

impl Harness {
    fn detached() -> Self {
        let clock = ManualScheduler::new();
        let emitted = Rc::new(RefCell::new(Vec::new()));
        let diagnostics = Rc::new(RefCell::new(Vec::new()));

        let sink = emitted.clone();
        let reports = diagnostics.clone();
        let sync = CanvasSync::new(&SyncConfig::default(), clock.clone(), move |state| {
            sink.borrow_mut().push(state)
        })
        .with_diagnostics(move |diagnostic| reports.borrow_mut().push(diagnostic));

        Self { sync, clock, user: MemoryCanvas::new(), emitted, diagnostics }
    }

    fn attach(&mut self) -> ApplyOutcome {
        self.sync.attach(self.user.clone())
    }

    fn emitted(&self) -> Vec<DiagramState> {
        self.emitted.borrow().clone()
    }

    fn element_ids(state: &DiagramState) -> Vec<&str> {
        state.elements.iter().map(|element| element.id.as_str()).collect()
    }
}

#[fixture]
fn attached() -> Harness {
    let mut harness = Harness::detached();
    assert_eq!(harness.attach(), ApplyOutcome::Skipped);
    harness
}

fn add(id: &'static str) -> impl FnOnce(&mut DiagramState) {
    move |scene: &mut DiagramState| {
        scene.elements.push(DiagramElement::new(eid(id)).with_field("type", json!("rectangle")))
    }
}

fn failing_fingerprint(_: &DiagramState) -> Result<Fingerprint, FingerprintError> {
    Err(serde_json::from_str::<serde_json::Value>("{").unwrap_err().into())
}

#[rstest]
fn attach_without_scene_initializes_empty_canvas(attached: Harness) {
    assert!(attached.user.is_initialized());
    assert_eq!(attached.user.renders(), 0);
    assert_eq!(attached.sync.emitter().stats().echoes_ignored, 1);
    assert_eq!(attached.sync.reconciler().phase(), ReconcilerPhase::Idle);
}

#[rstest]
fn applying_the_same_scene_twice_renders_once(mut attached: Harness) {
    assert_eq!(attached.sync.apply(Some(labelled_boxes())), ApplyOutcome::Rendered);
    assert_eq!(attached.sync.apply(Some(labelled_boxes())), ApplyOutcome::Unchanged);

    attached.clock.advance(ms(1_000));

    assert_eq!(attached.user.renders(), 1);
    assert!(attached.emitted().is_empty());
}

#[rstest]
fn applied_scenes_are_never_emitted_back(mut attached: Harness) {
    attached.sync.apply(Some(labelled_boxes()));
    let mut other = labelled_boxes();
    other.elements.pop();
    attached.sync.apply(Some(other));

    attached.clock.advance(ms(500));

    assert_eq!(attached.user.renders(), 2);
    assert!(attached.emitted().is_empty());
    assert_eq!(attached.clock.pending(), 0);
    assert_eq!(attached.sync.emitter().stats().echoes_ignored, 3);
    assert_eq!(attached.sync.emitter().stats().observed, 0);
}

#[test]
fn missing_scene_is_skipped() {
    let mut harness = Harness::detached();
    assert_eq!(harness.sync.apply(None), ApplyOutcome::Skipped);
    assert!(harness.sync.reconciler().held().is_none());
}

#[rstest]
fn forced_presentation_fields_win_over_inbound_values(mut attached: Harness) {
    let mut scene = labelled_boxes();
    scene.app_state.insert("defaultFontSize", json!(36));
    scene.app_state.insert("currentItemTextAlign", json!("left"));

    attached.sync.apply(Some(scene));

    let shown = attached.user.snapshot().app_state;
    assert_eq!(shown.background_color(), Some("#AFEEEE"));
    assert_eq!(shown.default_font_size(), Some(20));
    assert_eq!(shown.text_align(), Some("center"));
    assert_eq!(shown.font_family(), Some(1));
    assert_eq!(shown.get("zoom"), Some(&json!({ "value": 1 })));
}

#[rstest]
fn null_links_are_rendered_with_defaults(mut attached: Harness) {
    let scene: DiagramState =
        serde_json::from_value(json!({ "elements": [{ "id": "a", "boundElements": null }] }))
            .unwrap();

    assert_eq!(attached.sync.apply(Some(scene)), ApplyOutcome::Rendered);

    let shown = attached.user.snapshot();
    assert_eq!(shown.elements.len(), 1);
    assert_eq!(shown.elements[0].bound_elements, Some(Vec::new()));
    assert_eq!(shown.elements[0].container_id, None);
}

#[rstest]
fn inconsistent_links_are_rendered_and_reported(mut attached: Harness) {
    let scene = DiagramState::from_elements(vec![DiagramElement::new(eid("box"))
        .with_bound_elements(vec![BoundElement::new(eid("ghost"), "text")])]);

    assert_eq!(attached.sync.apply(Some(scene)), ApplyOutcome::Rendered);

    assert_eq!(
        *attached.diagnostics.borrow(),
        vec![Diagnostic::LinkIssues {
            issues: vec![LinkIssue::MissingBoundElement { container: eid("box"), bound: eid("ghost") }]
        }]
    );
}

#[rstest]
fn inbound_assets_reach_the_canvas(mut attached: Harness) {
    let id = AssetId::new("img-1").unwrap();
    let mut scene = labelled_boxes();
    scene.files.insert(id.clone(), BinaryAsset::from_bytes(id.clone(), "image/png", b"\x89PNG"));

    attached.sync.apply(Some(scene));

    let shown = attached.user.snapshot();
    assert_eq!(shown.files[&id].decode().unwrap(), b"\x89PNG".to_vec());
}

#[rstest]
fn burst_of_edits_emits_once_after_quiet_window(attached: Harness) {
    attached.user.edit_with(add("a"));
    attached.clock.advance(ms(30));
    attached.user.edit_with(add("b"));
    attached.clock.advance(ms(30));
    attached.user.edit_with(add("c"));

    attached.clock.advance(ms(99));
    assert!(attached.emitted().is_empty());
    assert!(attached.sync.emitter().is_pending());

    attached.clock.advance(ms(1));
    let emitted = attached.emitted();
    assert_eq!(attached.clock.now(), ms(160));
    assert_eq!(emitted.len(), 1);
    assert_eq!(Harness::element_ids(&emitted[0]), vec!["a", "b", "c"]);
    assert_eq!(attached.sync.emitter().phase(), EmitterPhase::Idle);
    assert_eq!(attached.sync.emitter().stats().observed, 3);
}

#[rstest]
fn burst_returning_to_last_emitted_scene_is_suppressed(attached: Harness) {
    attached.user.edit_with(add("a"));
    attached.clock.advance(ms(100));
    assert_eq!(attached.emitted().len(), 1);

    attached.user.edit_with(add("b"));
    attached.user.edit_with(|scene| {
        scene.elements.pop();
    });
    attached.clock.advance(ms(100));

    assert_eq!(attached.emitted().len(), 1);
    assert_eq!(attached.sync.emitter().stats().suppressed, 1);
    assert_eq!(
        attached.sync.emitter().last_emitted(),
        Some(fingerprint(&attached.emitted()[0]).unwrap())
    );
}

#[rstest]
fn every_distinct_settled_scene_is_emitted(attached: Harness) {
    attached.user.edit_with(add("a"));
    attached.clock.advance(ms(150));
    attached.user.edit_with(add("b"));
    attached.clock.advance(ms(150));

    let emitted = attached.emitted();
    assert_eq!(emitted.len(), 2);
    assert_eq!(Harness::element_ids(&emitted[1]), vec!["a", "b"]);
}

#[rstest]
fn echo_of_emitted_scene_is_not_rendered(mut attached: Harness) {
    attached.user.edit_with(add("a"));
    attached.clock.advance(ms(100));
    let echoed = attached.emitted()[0].clone();

    assert_eq!(attached.sync.apply(Some(echoed)), ApplyOutcome::Unchanged);
    attached.clock.advance(ms(500));

    assert_eq!(attached.user.renders(), 0);
    assert_eq!(attached.emitted().len(), 1);
}

#[rstest]
fn late_echo_does_not_clobber_a_pending_edit(mut attached: Harness) {
    attached.user.edit_with(add("a"));
    attached.clock.advance(ms(100));
    let echoed = attached.emitted()[0].clone();

    attached.user.edit_with(add("b"));
    assert_eq!(attached.sync.apply(Some(echoed)), ApplyOutcome::Unchanged);
    attached.clock.advance(ms(100));

    let emitted = attached.emitted();
    assert_eq!(emitted.len(), 2);
    assert_eq!(Harness::element_ids(&emitted[1]), vec!["a", "b"]);
    assert_eq!(Harness::element_ids(&attached.user.snapshot()), vec!["a", "b"]);
}

#[rstest]
fn owner_reverting_to_an_earlier_scene_renders_it(mut attached: Harness) {
    let original = labelled_boxes();
    attached.sync.apply(Some(original.clone()));
    attached.user.edit_with(add("extra"));
    attached.clock.advance(ms(100));
    assert_eq!(attached.emitted().len(), 1);

    assert_eq!(attached.sync.apply(Some(original)), ApplyOutcome::Rendered);
    assert_eq!(attached.user.snapshot().elements.len(), 5);
}

#[test]
fn scenes_before_ready_are_held_and_only_latest_is_initialized() {
    let mut harness = Harness::detached();
    let first = labelled_boxes();
    let mut second = labelled_boxes();
    second.elements.truncate(2);

    assert_eq!(harness.sync.apply(Some(first)), ApplyOutcome::Held);
    assert_eq!(harness.sync.apply(Some(second.clone())), ApplyOutcome::Held);
    assert_eq!(harness.sync.reconciler().held(), Some(&second));
    assert!(!harness.user.is_initialized());

    assert_eq!(harness.attach(), ApplyOutcome::Rendered);
    harness.clock.advance(ms(1_000));

    assert!(harness.sync.reconciler().is_ready());
    assert!(harness.sync.reconciler().held().is_none());
    assert_eq!(harness.user.renders(), 1);
    assert_eq!(Harness::element_ids(&harness.user.snapshot()), vec!["box-a", "label-a"]);
    assert_eq!(harness.user.snapshot().app_state.background_color(), Some("#AFEEEE"));
    assert!(harness.emitted().is_empty());
}

#[rstest]
fn second_attach_is_ignored(mut attached: Harness) {
    let other = MemoryCanvas::new();

    assert_eq!(attached.sync.attach(other.clone()), ApplyOutcome::Skipped);

    assert!(!other.is_initialized());
    other.edit_with(add("stray"));
    attached.clock.advance(ms(200));
    assert!(attached.emitted().is_empty());
}

#[rstest]
fn teardown_cancels_pending_emission(attached: Harness) {
    attached.user.edit_with(add("a"));
    attached.clock.advance(ms(50));

    attached.sync.teardown();
    attached.clock.advance(ms(500));
    attached.user.edit_with(add("b"));
    attached.clock.advance(ms(500));

    assert!(attached.emitted().is_empty());
    assert!(attached.sync.emitter().is_torn_down());
    assert_eq!(attached.sync.emitter().phase(), EmitterPhase::Idle);
    assert_eq!(attached.clock.pending(), 0);
}

#[rstest]
fn dropping_the_sync_cancels_pending_emission(attached: Harness) {
    let Harness { sync, clock, user, emitted, .. } = attached;
    user.edit_with(add("a"));

    drop(sync);
    clock.advance(ms(500));

    assert!(emitted.borrow().is_empty());
    assert_eq!(clock.pending(), 0);
}

#[rstest]
fn flush_emits_without_waiting(attached: Harness) {
    assert!(!attached.sync.flush());

    attached.user.edit_with(add("a"));
    assert!(attached.sync.flush());

    assert_eq!(attached.emitted().len(), 1);
    assert_eq!(attached.clock.pending(), 0);
    attached.clock.advance(ms(500));
    assert_eq!(attached.emitted().len(), 1);
}

#[rstest]
fn failed_fingerprint_still_emits(attached: Harness) {
    attached.sync.emitter().set_fingerprinter(failing_fingerprint);

    attached.user.edit_with(add("a"));
    attached.clock.advance(ms(100));
    attached.user.edit_with(|_| {});
    attached.clock.advance(ms(100));

    assert_eq!(attached.emitted().len(), 2);
    assert_eq!(attached.sync.emitter().last_emitted(), None);
    assert_eq!(attached.sync.emitter().stats().suppressed, 0);
    let diagnostics = attached.diagnostics.borrow();
    assert_eq!(diagnostics.len(), 2);
    assert!(matches!(diagnostics[0], Diagnostic::FingerprintFailed { .. }));
}

#[rstest]
fn presentation_only_edits_are_changes(attached: Harness) {
    attached.user.edit_with(|scene| {
        scene.app_state = PresentationState::new().with("viewBackgroundColor", json!("#000000"));
    });
    attached.clock.advance(ms(100));

    let emitted = attached.emitted();
    assert_eq!(emitted.len(), 1);
    assert_eq!(emitted[0].app_state.background_color(), Some("#000000"));
}

#[test]
fn change_settled_inside_the_sink_is_emitted_after_it_returns() {
    let clock = ManualScheduler::new();
    let user = MemoryCanvas::new();
    let emitted = Rc::new(RefCell::new(Vec::new()));
    let emitter_slot: Rc<RefCell<Option<super::DebouncedEmitter<ManualScheduler>>>> =
        Rc::new(RefCell::new(None));

    let sink = emitted.clone();
    let slot = emitter_slot.clone();
    let owner = user.clone();
    let mut sync = CanvasSync::new(&SyncConfig::default(), clock.clone(), move |state| {
        let first = sink.borrow().is_empty();
        sink.borrow_mut().push(state);
        if first {
            owner.edit_with(add("b"));
            if let Some(emitter) = slot.borrow().as_ref() {
                assert!(emitter.flush());
            }
        }
    });
    *emitter_slot.borrow_mut() = Some(sync.emitter().clone());
    sync.attach(user.clone());

    user.edit_with(add("a"));
    clock.advance(ms(100));

    let emitted = emitted.borrow();
    assert_eq!(emitted.len(), 2);
    assert_eq!(Harness::element_ids(&emitted[0]), vec!["a"]);
    assert_eq!(Harness::element_ids(&emitted[1]), vec!["a", "b"]);
    assert_eq!(sync.emitter().stats().emitted, 2);
    assert_eq!(sync.emitter().last_emitted(), Some(fingerprint(&emitted[1]).expect("fingerprint")));

    clock.advance(ms(500));
    drop(emitted);
    drop(sync);
    emitter_slot.borrow_mut().take();
}
