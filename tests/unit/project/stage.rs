use super::*;

#[test]
fn default_stage_has_one_cat_at_origin() {
    let stage = Stage::default();
    assert_eq!(stage.actors().len(), 1);
    let cat = &stage.actors()[0];
    assert_eq!(cat.id.as_str(), "sprite-1");
    assert_eq!(cat.costume, "cat");
    assert_eq!(cat.state, ActorState::default());
    stage.validate().unwrap();
}

#[test]
fn added_actors_get_home_positions() {
    let mut stage = Stage::default();
    let two = stage.add_actor("baseball", None).unwrap();
    let three = stage.add_actor("cat", Some("Tom".to_string())).unwrap();

    assert_eq!(two.as_str(), "sprite-2");
    assert_eq!(three.as_str(), "sprite-3");
    assert_eq!(stage.get(&two).map(|s| (s.x, s.y)), Some((100.0, 0.0)));
    assert_eq!(stage.get(&three).map(|s| s.x), Some(200.0));
    assert_eq!(stage.actor(&three).map(|a| a.name.as_str()), Some("Tom"));
    assert_eq!(stage.actor(&two).map(|a| a.name.as_str()), Some("Sprite 2"));
}

#[test]
fn last_actor_cannot_be_removed() {
    let mut stage = Stage::default();
    let err = stage.remove_actor(&ActorId::from("sprite-1")).unwrap_err();
    assert!(err.is_invalid_state());

    let two = stage.add_actor("cat", None).unwrap();
    let removed = stage.remove_actor(&two).unwrap();
    assert_eq!(removed.id, two);
    assert!(!stage.contains(&two));
}

#[test]
fn rename_requires_a_name() {
    let mut stage = Stage::default();
    let id = ActorId::from("sprite-1");
    assert!(stage.rename_actor(&id, "  ").is_err());
    stage.rename_actor(&id, "Felix").unwrap();
    assert_eq!(stage.actor(&id).map(|a| a.name.as_str()), Some("Felix"));
}

#[test]
fn update_merges_and_reset_goes_home() {
    let mut stage = Stage::default();
    stage.add_actor("cat", None).unwrap();
    let two = ActorId::from("sprite-2");

    let patch = ActorStatePatch {
        rotation: Some(90.0),
        ..ActorStatePatch::position(5.0, 6.0)
    };
    stage.update_actor(&two, &patch).unwrap();
    let s = stage.get(&two).unwrap();
    assert_eq!((s.x, s.y, s.rotation, s.size), (5.0, 6.0, 90.0, 100.0));

    stage.reset_to_home().unwrap();
    assert_eq!(stage.get(&two), Some(ActorState::at(100.0, 0.0)));
    assert_eq!(stage.states(), stage.home_states());
}

#[test]
fn locked_stage_rejects_edits() {
    let mut stage = Stage::default();
    stage.set_locked(true);
    assert!(stage.add_actor("cat", None).unwrap_err().is_invalid_state());
    assert!(stage.reset_to_home().unwrap_err().is_invalid_state());
    assert!(
        stage
            .update_actor(&ActorId::from("sprite-1"), &ActorStatePatch::position(1.0, 1.0))
            .unwrap_err()
            .is_invalid_state()
    );
    stage.set_locked(false);
    stage.add_actor("cat", None).unwrap();
}

#[test]
fn sink_batch_bumps_revision_once() {
    let mut stage = Stage::default();
    stage.add_actor("cat", None).unwrap();
    let before = stage.revision();

    stage.apply_batch(vec![
        (ActorId::from("sprite-1"), ActorStatePatch::position(10.0, 0.0)),
        (ActorId::from("sprite-2"), ActorStatePatch::position(20.0, 0.0)),
        (ActorId::from("ghost"), ActorStatePatch::position(30.0, 0.0)),
    ]);

    assert_eq!(stage.revision(), before + 1);
    assert_eq!(stage.get(&ActorId::from("sprite-1")).map(|s| s.x), Some(10.0));
    assert_eq!(stage.get(&ActorId::from("sprite-2")).map(|s| s.x), Some(20.0));
    assert_eq!(stage.actor_ids().len(), 2);
}

#[test]
fn playback_hooks_toggle_lock() {
    let mut stage = Stage::default();
    stage.playback_started();
    assert!(stage.is_locked());
    // The sink path still writes while locked.
    stage.set(&ActorId::from("sprite-1"), ActorStatePatch::position(3.0, 4.0));
    assert_eq!(stage.get(&ActorId::from("sprite-1")).map(|s| s.y), Some(4.0));
    stage.playback_finished();
    assert!(!stage.is_locked());
}

#[test]
fn lock_and_revision_are_not_serialized() {
    let mut stage = Stage::default();
    stage.set_locked(true);
    let json = serde_json::to_string(&stage).unwrap();
    assert!(!json.contains("locked"));
    let back: Stage = serde_json::from_str(&json).unwrap();
    assert!(!back.is_locked());
    assert_eq!(back.actors(), stage.actors());
}
