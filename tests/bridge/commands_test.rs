//! Tests for host command dispatch

use qrview_bridge::provider::{ProviderCall, SimulatedOptions};
use qrview_bridge::{BridgeState, MethodCall, PreviewSurface, Reply, ScanRect};

use crate::test_utils::{spawn_bridge, spawn_default_bridge};

#[tokio::test]
async fn test_full_frame_dimensions_start_scanning() {
    let harness = spawn_default_bridge();

    let reply = harness
        .handle
        .call(MethodCall::set_dimensions(300.0, 300.0, 0.0, 0.0))
        .await
        .expect("call");
    assert_eq!(reply, Reply::Empty);

    assert_eq!(harness.handle.state().await.expect("state"), BridgeState::Scanning);
    assert_eq!(
        harness.controller.calls(),
        vec![
            ProviderCall::RequestPermission,
            ProviderCall::StartSession {
                surface: PreviewSurface { width: 300.0, height: 300.0 },
                scan_rect: None,
            },
        ]
    );
}

#[tokio::test]
async fn test_scan_area_constrains_recognition() {
    let harness = spawn_default_bridge();

    harness
        .handle
        .call(MethodCall::set_dimensions(300.0, 300.0, 200.0, 50.0))
        .await
        .expect("call");

    assert_eq!(harness.handle.state().await.expect("state"), BridgeState::Scanning);
    assert_eq!(
        harness.controller.scan_rect(),
        Some(ScanRect { x: 50.0, y: 0.0, width: 200.0, height: 200.0 })
    );
}

#[tokio::test]
async fn test_flip_on_single_camera_is_noop() {
    let harness = spawn_bridge(SimulatedOptions {
        cameras: 1,
        ..Default::default()
    });
    harness
        .handle
        .call(MethodCall::set_dimensions(300.0, 300.0, 0.0, 0.0))
        .await
        .expect("call");

    let reply = harness.handle.call(MethodCall::bare("flipCamera")).await.expect("call");

    assert_eq!(reply, Reply::Empty);
    assert_eq!(harness.handle.state().await.expect("state"), BridgeState::Scanning);
    assert_eq!(harness.controller.count_calls(|c| *c == ProviderCall::SwitchCamera), 0);
    assert_eq!(harness.controller.active_camera(), 0);
}

#[tokio::test]
async fn test_flip_switches_between_cameras() {
    let harness = spawn_default_bridge();
    harness
        .handle
        .call(MethodCall::set_dimensions(300.0, 300.0, 0.0, 0.0))
        .await
        .expect("call");

    harness.handle.call(MethodCall::bare("flipCamera")).await.expect("call");
    assert_eq!(harness.controller.active_camera(), 1);

    harness.handle.call(MethodCall::bare("flipCamera")).await.expect("call");
    assert_eq!(harness.controller.active_camera(), 0);
}

#[tokio::test]
async fn test_toggle_flash_respects_torch_support() {
    let with_torch = spawn_default_bridge();
    with_torch
        .handle
        .call(MethodCall::set_dimensions(300.0, 300.0, 0.0, 0.0))
        .await
        .expect("call");
    with_torch.handle.call(MethodCall::bare("toggleFlash")).await.expect("call");
    assert!(with_torch.controller.torch_on());

    let without_torch = spawn_bridge(SimulatedOptions {
        torch: false,
        ..Default::default()
    });
    without_torch
        .handle
        .call(MethodCall::set_dimensions(300.0, 300.0, 0.0, 0.0))
        .await
        .expect("call");
    let reply = without_torch
        .handle
        .call(MethodCall::bare("toggleFlash"))
        .await
        .expect("call");
    assert_eq!(reply, Reply::Empty);
    assert!(!without_torch.controller.torch_on());
    assert_eq!(
        without_torch.controller.count_calls(|c| *c == ProviderCall::ToggleTorch),
        0
    );
}

#[tokio::test]
async fn test_unknown_method_is_not_implemented() {
    let harness = spawn_default_bridge();

    let reply = harness.handle.call(MethodCall::bare("foo")).await.expect("call");

    assert_eq!(reply, Reply::NotImplemented);
    assert_eq!(harness.handle.state().await.expect("state"), BridgeState::Uninitialized);
    assert!(harness.controller.calls().is_empty());
}

#[tokio::test]
async fn test_malformed_dimensions_are_rejected() {
    let harness = spawn_default_bridge();

    let reply = harness
        .handle
        .call(MethodCall::new(
            "setDimensions",
            serde_json::json!({ "width": "wide", "height": 300.0 }),
        ))
        .await
        .expect("call");

    match reply {
        Reply::Error { code, .. } => assert_eq!(code, "INVALID_ARGUMENTS"),
        other => panic!("Expected error reply, got {other:?}"),
    }
    assert_eq!(harness.handle.state().await.expect("state"), BridgeState::Uninitialized);
    assert!(harness.controller.calls().is_empty());
}

#[tokio::test]
async fn test_camera_commands_before_session_are_noops() {
    let harness = spawn_default_bridge();

    for method in ["flipCamera", "toggleFlash", "pauseCamera", "resumeCamera"] {
        let reply = harness.handle.call(MethodCall::bare(method)).await.expect("call");
        assert_eq!(reply, Reply::Empty, "{method}");
    }

    assert_eq!(harness.handle.state().await.expect("state"), BridgeState::Uninitialized);
    assert!(harness.controller.calls().is_empty());
}

#[tokio::test]
async fn test_pause_queued_ahead_of_permission_answer_is_noop() {
    let harness = spawn_default_bridge();

    // Both calls are queued before the bridge runs, so the permission answer
    // lands behind the pause.
    harness
        .handle
        .send(MethodCall::set_dimensions(300.0, 300.0, 0.0, 0.0))
        .expect("send");
    harness.handle.send(MethodCall::bare("pauseCamera")).expect("send");

    // This query is queued ahead of the permission answer too.
    assert_eq!(harness.handle.state().await.expect("state"), BridgeState::Uninitialized);
    assert_eq!(harness.handle.state().await.expect("state"), BridgeState::Scanning);
    assert_eq!(harness.controller.count_calls(|c| *c == ProviderCall::Freeze), 0);
}
