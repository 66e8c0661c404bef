use super::*;
use crate::{actions::random::ScriptedRandom, config::Viewport};

fn run(kind: &str, prior: &ActorState, viewport: Viewport, rng: &[f64]) -> ActorState {
    let reg = ActionRegistry::with_builtins();
    let motion = MotionConfig::default();
    let mut rng = ScriptedRandom::new(rng.to_vec());
    let mut ctx = ActionCtx {
        motion: &motion,
        viewport: &viewport,
        rng: &mut rng,
    };
    reg.apply(kind, &ActorId::from("a"), prior, &mut ctx)
        .unwrap()
}

fn narrow() -> Viewport {
    Viewport {
        width: 300.0,
        ..Viewport::default()
    }
}

#[test]
fn move_x_steps_then_wraps_at_boundary() {
    let s = run(MOVE_X_BY_50, &ActorState::default(), narrow(), &[]);
    assert_eq!((s.x, s.y), (50.0, 0.0));

    // 150 + 50 + 100 == 300 still fits; 200 + 50 + 100 does not.
    let s = run(MOVE_X_BY_50, &ActorState::at(150.0, 0.0), narrow(), &[]);
    assert_eq!(s.x, 200.0);
    let s = run(MOVE_X_BY_50, &ActorState::at(200.0, 0.0), narrow(), &[]);
    assert_eq!(s.x, 0.0);
}

#[test]
fn move_y_wraps_against_height() {
    let vp = Viewport {
        height: 300.0,
        ..Viewport::default()
    };
    assert_eq!(run(MOVE_Y_BY_50, &ActorState::at(0.0, 0.0), vp, &[]).y, 50.0);
    // 50 + 50 + 200 == 300 lands exactly on the boundary and still fits.
    assert_eq!(run(MOVE_Y_BY_50, &ActorState::at(0.0, 50.0), vp, &[]).y, 100.0);
    assert_eq!(run(MOVE_Y_BY_50, &ActorState::at(0.0, 100.0), vp, &[]).y, 0.0);
}

#[test]
fn move_xy_resets_both_axes_when_either_overflows() {
    let s = run(MOVE_XY_50, &ActorState::at(200.0, 10.0), narrow(), &[]);
    assert_eq!((s.x, s.y), (0.0, 0.0));

    let tall = Viewport {
        height: 300.0,
        ..Viewport::default()
    };
    let s = run(MOVE_XY_50, &ActorState::at(10.0, 100.0), tall, &[]);
    assert_eq!((s.x, s.y), (0.0, 0.0));

    let s = run(MOVE_XY_50, &ActorState::at(100.0, 10.0), narrow(), &[]);
    assert_eq!((s.x, s.y), (150.0, 60.0));
}

#[test]
fn moves_clear_messages() {
    let prior = ActorState {
        message: Some("Hello!".to_string()),
        ..ActorState::default()
    };
    assert!(run(GO_TO_ORIGIN, &prior, narrow(), &[]).message.is_none());
    assert!(run(TURN_CLOCKWISE_45, &prior, narrow(), &[]).message.is_none());
}

#[test]
fn rotation_is_unbounded() {
    let s = run(ROTATE_360, &ActorState::default(), narrow(), &[]);
    assert_eq!(s.rotation, 360.0);
    let s = run(TURN_ANTICLOCKWISE_45, &ActorState::default(), narrow(), &[]);
    assert_eq!(s.rotation, -45.0);
    let s = run(TURN_CLOCKWISE_45, &s, narrow(), &[]);
    assert_eq!(s.rotation, 0.0);
}

#[test]
fn size_has_a_floor() {
    let tiny = ActorState {
        size: 15.0,
        ..ActorState::default()
    };
    assert_eq!(run(DECREASE_SIZE, &tiny, narrow(), &[]).size, 10.0);
    let s = run(DECREASE_SIZE, &ActorState { size: 10.0, ..tiny }, narrow(), &[]);
    assert_eq!(s.size, 10.0);
    assert_eq!(
        run(INCREASE_SIZE, &ActorState::default(), narrow(), &[]).size,
        110.0
    );
}

#[test]
fn random_position_uses_injected_source() {
    let s = run(
        GO_TO_RANDOM_POSITION,
        &ActorState::default(),
        narrow(),
        &[0.0, 0.5],
    );
    assert_eq!((s.x, s.y), (-150.0, 0.0));

    let s = run(
        GO_TO_RANDOM_POSITION,
        &ActorState::default(),
        narrow(),
        &[0.999_999, 1.0],
    );
    assert_eq!((s.x, s.y), (149.0, 149.0));
}

#[test]
fn greetings_set_message_and_hold() {
    let s = run(SAY_HELLO, &ActorState::default(), narrow(), &[]);
    assert_eq!(s.message.as_deref(), Some("Hello!"));
    assert_eq!(s.message_duration, None);

    let s = run(SAY_HELLO_FOR_1_SEC, &ActorState::default(), narrow(), &[]);
    assert_eq!(s.message_duration, Some(1000));
    assert_eq!(s.message_hold_ms(), 1000);
}
