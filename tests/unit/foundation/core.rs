use super::*;

#[test]
fn default_state_matches_fresh_actor() {
    let s = ActorState::default();
    assert_eq!((s.x, s.y, s.rotation, s.size), (0.0, 0.0, 0.0, 100.0));
    assert!(s.visible);
    assert!(s.message.is_none());
    assert_eq!(s.message_hold_ms(), 0);
}

#[test]
fn merge_only_touches_supplied_fields() {
    let mut s = ActorState {
        message: Some("hi".to_string()),
        rotation: 90.0,
        ..ActorState::at(10.0, 20.0)
    };
    s.merge(&ActorStatePatch::position(1.0, 2.0));
    assert_eq!((s.x, s.y), (1.0, 2.0));
    assert_eq!(s.rotation, 90.0);
    assert_eq!(s.message.as_deref(), Some("hi"));

    s.merge(&ActorStatePatch {
        message: Some(None),
        ..ActorStatePatch::default()
    });
    assert!(s.message.is_none());
}

#[test]
fn full_patch_reproduces_state() {
    let src = ActorState {
        message: Some("Hello!".to_string()),
        message_duration: Some(1000),
        visible: false,
        ..ActorState::at(-3.0, 4.0)
    };
    let mut dst = ActorState::default();
    dst.merge(&ActorStatePatch::from(src.clone()));
    assert_eq!(dst, src);
    assert!(ActorStatePatch::default().is_empty());
}

#[test]
fn hold_requires_visible_message() {
    let mut s = ActorState {
        message_duration: Some(1000),
        ..ActorState::default()
    };
    assert_eq!(s.message_hold_ms(), 0);
    s.message = Some("Hello!".to_string());
    assert_eq!(s.message_hold_ms(), 1000);
}

#[test]
fn ids_serialize_as_plain_strings() {
    let id = ActorId::from("sprite-1");
    assert_eq!(serde_json::to_string(&id).unwrap(), "\"sprite-1\"");
    assert_eq!(id.to_string(), "sprite-1");
    let state: ActorState =
        serde_json::from_str(r#"{"x":1,"y":2,"rotation":0,"size":100}"#).unwrap();
    assert!(state.visible);
}
