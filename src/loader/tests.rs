// Loader gate tests.
//
// These drive the gate through real sessions with short idle waits. The
// deferred phase runs on the test runtime, so "before settle" assertions are
// deterministic: the spawned task cannot progress until the test awaits.

use super::*;

use std::time::Duration;

use strum::IntoEnumIterator;

use crate::config::MARKDOWN_CDN_URL;
use crate::vendors::TagCommand;

fn test_gate(session: &Session, fallback_ms: u64) -> ScriptGate {
    ScriptGate::new(
        Arc::clone(session.page()),
        VendorSet::from_ids("G-TESTTEST01", "testproj01"),
        IdleScheduler::fallback_with_delay(Duration::from_millis(fallback_ms)),
        Arc::clone(session.stats()),
    )
}

#[tokio::test]
async fn test_trigger_injects_markdown_immediately() {
    let session = Session::new();
    let gate = test_gate(&session, 50);
    gate.initialize(&session).unwrap();

    session.dispatch(InteractionKind::Scroll);

    // Before any await: exactly the immediate injection, nothing deferred
    let scripts = session.page().scripts();
    assert_eq!(scripts.len(), 1);
    assert_eq!(
        scripts[0].src().map(|u| u.as_str()),
        Some(MARKDOWN_CDN_URL)
    );
    assert_eq!(gate.phase(), LoaderPhase::Triggered);
    assert_eq!(gate.triggered_by(), Some(InteractionKind::Scroll));
}

#[tokio::test]
async fn test_deferred_phase_installs_both_vendors_in_order() {
    let session = Session::new();
    let gate = test_gate(&session, 5);
    gate.initialize(&session).unwrap();

    session.dispatch(InteractionKind::PointerMove);
    gate.settle().await;

    assert_eq!(gate.phase(), LoaderPhase::Loaded);

    let scripts = session.page().scripts();
    assert_eq!(scripts.len(), 3);
    // Injection order: markdown (immediate), tracker (remote), recorder (inline)
    assert_eq!(scripts[0].src().map(|u| u.as_str()), Some(MARKDOWN_CDN_URL));
    assert!(scripts[1]
        .src()
        .map(|u| u.as_str().contains("gtag/js?id=G-TESTTEST01"))
        .unwrap_or(false));
    assert!(scripts[2].is_inline());
    assert!(scripts[2].to_html().contains("testproj01"));

    // The tracker queue was seeded before its element was appended
    let buffered = gate.vendors().tag_manager.queue().buffered();
    assert_eq!(buffered.len(), 2);
    assert!(matches!(buffered[0], TagCommand::Js { .. }));
    assert!(matches!(buffered[1], TagCommand::Config { .. }));
}

#[tokio::test]
async fn test_all_listeners_removed_after_trigger() {
    let session = Session::new();
    let gate = test_gate(&session, 5);
    gate.initialize(&session).unwrap();
    assert_eq!(session.window().listener_count(), 5);
    assert_eq!(session.document().listener_count(), 5);

    session.dispatch(InteractionKind::TouchStart);
    gate.settle().await;

    assert_eq!(session.window().listener_count(), 0);
    assert_eq!(session.document().listener_count(), 0);
}

#[tokio::test]
async fn test_event_storm_injects_exactly_once() {
    let session = Session::new();
    let gate = test_gate(&session, 5);
    gate.initialize(&session).unwrap();

    // First scroll triggers via the window listener, whose sweep also strips
    // the document-side listener before the event reaches it
    session.dispatch(InteractionKind::Scroll);
    assert_eq!(session.stats().suppressed_triggers(), 0);

    // Everything after that reaches no listeners at all
    for _ in 0..3 {
        for kind in InteractionKind::iter() {
            session.dispatch(kind);
        }
    }
    gate.settle().await;

    assert_eq!(session.page().script_count(), 3);
    assert_eq!(session.stats().suppressed_triggers(), 0);
    assert_eq!(session.stats().total_dispatched(), 16);
}

#[tokio::test]
async fn test_late_handler_is_counted_not_reinjected() {
    let session = Session::new();
    let gate = test_gate(&session, 5);
    gate.initialize(&session).unwrap();

    session.dispatch(InteractionKind::Scroll);

    // A handler snapshotted for delivery before the sweep still runs after
    // the trigger has fired; the guard turns it into a counted no-op
    GateInner::on_interaction(&gate.inner, &InteractionEvent::new(InteractionKind::Click));

    assert_eq!(session.stats().suppressed_triggers(), 1);
    assert_eq!(gate.triggered_by(), Some(InteractionKind::Scroll));

    gate.settle().await;
    assert_eq!(session.page().script_count(), 3);
}

#[tokio::test]
async fn test_second_initialize_is_rejected() {
    let session = Session::new();
    let gate = test_gate(&session, 5);
    gate.initialize(&session).unwrap();

    let err = gate.initialize(&session).unwrap_err();
    assert!(matches!(err, crate::error_handling::GateError::AlreadyInitialized));
    // The rejected call registered nothing
    assert_eq!(session.window().listener_count(), 5);
    assert_eq!(session.document().listener_count(), 5);
}

#[tokio::test]
async fn test_loading_session_defers_arming_until_ready() {
    let session = Session::new_loading();
    let gate = test_gate(&session, 5);
    gate.initialize(&session).unwrap();

    // Not armed yet: the event reaches no listeners and triggers nothing
    assert_eq!(session.dispatch(InteractionKind::Click), 0);
    assert_eq!(gate.phase(), LoaderPhase::Waiting);
    assert_eq!(session.page().script_count(), 0);

    session.finish_loading();
    assert_eq!(session.window().listener_count(), 5);

    session.dispatch(InteractionKind::Click);
    gate.settle().await;
    assert_eq!(gate.phase(), LoaderPhase::Loaded);
    assert_eq!(session.page().script_count(), 3);
}

#[tokio::test]
async fn test_each_kind_can_trigger() {
    for kind in InteractionKind::iter() {
        let session = Session::new();
        let gate = test_gate(&session, 5);
        gate.initialize(&session).unwrap();

        session.dispatch(kind);
        assert_eq!(gate.triggered_by(), Some(kind), "kind {} should trigger", kind);
        assert_eq!(session.page().script_count(), 1);
    }
}

#[tokio::test]
async fn test_no_interaction_means_no_injection() {
    let session = Session::new();
    let gate = test_gate(&session, 5);
    gate.initialize(&session).unwrap();

    // Well past the fallback delay: nothing is scheduled without a trigger
    tokio::time::sleep(Duration::from_millis(30)).await;

    assert_eq!(gate.phase(), LoaderPhase::Waiting);
    assert_eq!(session.page().script_count(), 0);
    assert_eq!(session.page().render_body(), "");
}

#[tokio::test]
async fn test_settle_is_idempotent() {
    let session = Session::new();
    let gate = test_gate(&session, 5);
    gate.initialize(&session).unwrap();

    session.dispatch(InteractionKind::KeyDown);
    gate.settle().await;
    // Handle already consumed; returns immediately
    gate.settle().await;
    assert_eq!(gate.phase(), LoaderPhase::Loaded);
}

#[tokio::test]
async fn test_dropped_gate_leaves_inert_listeners() {
    let session = Session::new();
    let gate = test_gate(&session, 5);
    gate.initialize(&session).unwrap();
    drop(gate);

    // Handlers hold the gate weakly; both fire but neither can act
    assert_eq!(session.dispatch(InteractionKind::Scroll), 2);
    assert_eq!(session.page().script_count(), 0);
}
