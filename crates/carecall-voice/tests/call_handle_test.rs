use carecall_voice::{CallHandle, MockPlatform, PlatformApi, PlatformCall, DEFAULT_TEARDOWN_GRACE};
use std::sync::Arc;
use std::time::Duration;

fn handle() -> (Arc<MockPlatform>, CallHandle) {
    let platform = Arc::new(MockPlatform::new());
    let dyn_platform: Arc<dyn PlatformApi> = platform.clone();
    let handle = CallHandle::new(dyn_platform, "cli-call-+821012345678", "agent-AJ_1");
    (platform, handle)
}

#[tokio::test]
async fn announce_agent_sets_attribute() {
    let (platform, handle) = handle();
    handle.announce_agent("IntakeAgent").await.expect("announce");

    match &platform.calls()[..] {
        [PlatformCall::SetAttributes {
            room,
            identity,
            attributes,
        }] => {
            assert_eq!(room, "cli-call-+821012345678");
            assert_eq!(identity, "agent-AJ_1");
            assert_eq!(attributes.get("agent").map(String::as_str), Some("IntakeAgent"));
        }
        other => panic!("unexpected calls: {other:?}"),
    }
}

#[tokio::test]
async fn dial_into_room_targets_current_room() {
    let (platform, handle) = handle();
    let participant = handle
        .dial_into_room("ST_trunk", "+15550001111", "transfer_abcd1234", "Human Agent")
        .await
        .expect("dial");

    assert_eq!(participant.room_name, "cli-call-+821012345678");
    let requests = platform.sip_requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].trunk_id, "ST_trunk");
    assert_eq!(requests[0].participant_name.as_deref(), Some("Human Agent"));
    assert!(requests[0].krisp_enabled);
}

#[tokio::test(start_paused = true)]
async fn hangup_deletes_room_after_grace() {
    let (platform, handle) = handle();
    let teardown = handle.hangup();
    assert_eq!(teardown.grace(), DEFAULT_TEARDOWN_GRACE);

    tokio::time::sleep(DEFAULT_TEARDOWN_GRACE - Duration::from_millis(1)).await;
    assert!(platform.deleted_rooms().is_empty(), "room deleted too early");

    teardown.wait().await;
    assert_eq!(platform.deleted_rooms(), vec!["cli-call-+821012345678"]);
}

#[tokio::test(start_paused = true)]
async fn cancelled_hangup_never_deletes() {
    let (platform, handle) = handle();
    let handle = handle.with_teardown_grace(Duration::from_secs(2));
    let teardown = handle.hangup();
    teardown.cancel();

    tokio::time::sleep(Duration::from_secs(10)).await;
    assert!(platform.deleted_rooms().is_empty());
}

#[tokio::test]
async fn failing_sip_surfaces_error() {
    let (platform, handle) = handle();
    platform.fail_sip();
    let err = handle
        .dial_into_room("ST_trunk", "+15550001111", "transfer_x", "Human Agent")
        .await
        .unwrap_err();
    assert!(err.to_string().contains("SIP service error"));
}
