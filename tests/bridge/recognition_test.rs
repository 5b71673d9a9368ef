//! Tests for recognition event delivery

use qrview_bridge::{BridgeState, CodeKind, Detection, HostEvent, MethodCall, ScanResult, Symbology};

use crate::test_utils::{spawn_default_bridge, Harness};

const SUPPORTED: [(CodeKind, Symbology); 11] = [
    (CodeKind::Aztec, Symbology::Aztec),
    (CodeKind::Code39, Symbology::Code39),
    (CodeKind::Code93, Symbology::Code93),
    (CodeKind::Code128, Symbology::Code128),
    (CodeKind::DataMatrix, Symbology::DataMatrix),
    (CodeKind::Ean8, Symbology::Ean8),
    (CodeKind::Ean13, Symbology::Ean13),
    (CodeKind::Itf14, Symbology::Itf),
    (CodeKind::Pdf417, Symbology::Pdf417),
    (CodeKind::Qr, Symbology::QrCode),
    (CodeKind::UpcE, Symbology::UpcE),
];

const UNSUPPORTED: [CodeKind; 9] = [
    CodeKind::Codabar,
    CodeKind::Code39Mod43,
    CodeKind::Gs1DataBar,
    CodeKind::Interleaved2of5,
    CodeKind::MicroPdf417,
    CodeKind::MicroQr,
    CodeKind::UpcA,
    CodeKind::Face,
    CodeKind::Unknown,
];

fn recognized(code: &str, symbology: Symbology) -> HostEvent {
    HostEvent::RecognizeQr(ScanResult {
        code: code.to_string(),
        symbology,
    })
}

async fn scanning_bridge() -> Harness {
    let harness = spawn_default_bridge();
    harness
        .handle
        .call(MethodCall::set_dimensions(300.0, 300.0, 0.0, 0.0))
        .await
        .expect("call");
    harness.handle.state().await.expect("state");
    harness
}

#[tokio::test]
async fn test_each_supported_symbology_yields_one_event() {
    let mut harness = scanning_bridge().await;

    for (kind, symbology) in SUPPORTED {
        let payload = format!("payload-{}", symbology.tag());
        assert!(harness.controller.emit_frame(vec![Detection::new(kind, payload.clone())]));
        assert_eq!(harness.next_event().await, recognized(&payload, symbology));
    }
    assert!(harness.events.try_recv().is_err());
}

#[tokio::test]
async fn test_unsupported_symbologies_are_dropped() {
    let mut harness = scanning_bridge().await;

    for kind in UNSUPPORTED {
        harness.controller.emit_frame(vec![Detection::new(kind, "ignored")]);
    }
    // Frames are delivered in order, so the marker is the first event only
    // if every earlier frame was dropped.
    harness
        .controller
        .emit_frame(vec![Detection::new(CodeKind::Qr, "marker")]);

    assert_eq!(harness.next_event().await, recognized("marker", Symbology::QrCode));
}

#[tokio::test]
async fn test_empty_payloads_are_dropped() {
    let mut harness = scanning_bridge().await;

    harness.controller.emit_frame(vec![
        Detection::new(CodeKind::Qr, ""),
        Detection::binary(CodeKind::Ean13),
        Detection::new(CodeKind::UpcE, "04210000526"),
    ]);

    assert_eq!(
        harness.next_event().await,
        recognized("04210000526", Symbology::UpcE)
    );
}

#[tokio::test]
async fn test_multiple_codes_in_a_frame_arrive_in_order() {
    let mut harness = scanning_bridge().await;

    harness.controller.emit_frame(vec![
        Detection::new(CodeKind::Qr, "first"),
        Detection::new(CodeKind::Face, "skipped"),
        Detection::new(CodeKind::Code128, "second"),
        Detection::new(CodeKind::DataMatrix, "third"),
    ]);

    assert_eq!(harness.next_event().await, recognized("first", Symbology::QrCode));
    assert_eq!(harness.next_event().await, recognized("second", Symbology::Code128));
    assert_eq!(harness.next_event().await, recognized("third", Symbology::DataMatrix));
}

#[tokio::test]
async fn test_paused_capture_emits_nothing_until_resumed() {
    let mut harness = scanning_bridge().await;

    harness.handle.call(MethodCall::bare("pauseCamera")).await.expect("call");
    assert!(!harness
        .controller
        .emit_frame(vec![Detection::new(CodeKind::Qr, "while-paused")]));

    harness.handle.call(MethodCall::bare("resumeCamera")).await.expect("call");
    assert!(harness
        .controller
        .emit_frame(vec![Detection::new(CodeKind::Qr, "after-resume")]));

    assert_eq!(
        harness.next_event().await,
        recognized("after-resume", Symbology::QrCode)
    );
}

#[tokio::test]
async fn test_frames_before_session_are_discarded() {
    let mut harness = spawn_default_bridge();

    assert!(!harness
        .controller
        .emit_frame(vec![Detection::new(CodeKind::Qr, "too-early")]));
    assert!(harness.events.try_recv().is_err());
}

#[tokio::test]
async fn test_bridge_keeps_running_after_host_stops_listening() {
    let harness = scanning_bridge().await;
    let Harness {
        handle,
        events,
        controller,
        ..
    } = harness;
    drop(events);

    assert!(controller.emit_frame(vec![
        Detection::new(CodeKind::Qr, "unheard"),
        Detection::new(CodeKind::Ean8, "96385074"),
    ]));
    tokio::time::sleep(std::time::Duration::from_millis(50)).await;

    assert_eq!(handle.state().await.expect("state"), BridgeState::Scanning);
    handle.call(MethodCall::bare("pauseCamera")).await.expect("call");
    assert_eq!(handle.state().await.expect("state"), BridgeState::Paused);
}
