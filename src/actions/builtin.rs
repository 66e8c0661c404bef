//! Built-in action kinds.
//!
//! Every action except the looks and control kinds clears the actor's speech
//! message, so a greeting stays up only until the actor does something else.

use crate::{
    actions::registry::{ActionCtx, ActionRegistry},
    config::MotionConfig,
    foundation::core::{ActorId, ActorState},
};

pub const MOVE_X_BY_50: &str = "moveXBy50";
pub const MOVE_Y_BY_50: &str = "moveYBy50";
pub const MOVE_XY_50: &str = "moveXY50";
pub const GO_TO_ORIGIN: &str = "goToOrigin";
pub const GO_TO_RANDOM_POSITION: &str = "goToRandomPosition";
pub const TURN_CLOCKWISE_45: &str = "turnClockwise45";
pub const TURN_ANTICLOCKWISE_45: &str = "turnAnticlockwise45";
pub const ROTATE_360: &str = "rotate360";
pub const INCREASE_SIZE: &str = "increaseSize";
pub const DECREASE_SIZE: &str = "decreaseSize";
pub const SAY_HELLO: &str = "sayHello";
pub const SAY_HELLO_FOR_1_SEC: &str = "sayHelloFor1Sec";
pub const REPEAT_WHOLE_ANIMATION: &str = "repeatWholeAnimation";

pub(crate) fn install(reg: &mut ActionRegistry) {
    reg.register(MOVE_X_BY_50, move_x)
        .register(MOVE_Y_BY_50, move_y)
        .register(MOVE_XY_50, move_xy)
        .register(GO_TO_ORIGIN, go_to_origin)
        .register(GO_TO_RANDOM_POSITION, go_to_random_position)
        .register(TURN_CLOCKWISE_45, |_, s, ctx| {
            turn(s, ctx.motion.turn_degrees)
        })
        .register(TURN_ANTICLOCKWISE_45, |_, s, ctx| {
            turn(s, -ctx.motion.turn_degrees)
        })
        .register(ROTATE_360, |_, s, ctx| turn(s, ctx.motion.spin_degrees))
        .register(INCREASE_SIZE, |_, s, ctx| resize(s, ctx.motion, 1.0))
        .register(DECREASE_SIZE, |_, s, ctx| resize(s, ctx.motion, -1.0))
        .register(SAY_HELLO, |_, s, ctx| ActorState {
            message: Some(ctx.motion.greeting.clone()),
            ..s.clone()
        })
        .register(SAY_HELLO_FOR_1_SEC, |_, s, ctx| ActorState {
            message: Some(ctx.motion.greeting.clone()),
            message_duration: Some(ctx.motion.greeting_hold_ms),
            ..s.clone()
        })
        .register_repeat(REPEAT_WHOLE_ANIMATION);
}

fn quiet(s: &ActorState) -> ActorState {
    ActorState {
        message: None,
        ..s.clone()
    }
}

/// Step `coord` forward, wrapping back to 0 once the actor would leave the extent.
fn advance_wrapped(coord: f64, step: f64, margin: f64, extent: f64) -> f64 {
    if coord + step + margin > extent {
        0.0
    } else {
        coord + step
    }
}

fn move_x(_: &ActorId, s: &ActorState, ctx: &mut ActionCtx<'_>) -> ActorState {
    let vp = ctx.viewport;
    ActorState {
        x: advance_wrapped(s.x, ctx.motion.move_step, vp.margin_x, vp.width),
        ..quiet(s)
    }
}

fn move_y(_: &ActorId, s: &ActorState, ctx: &mut ActionCtx<'_>) -> ActorState {
    let vp = ctx.viewport;
    ActorState {
        y: advance_wrapped(s.y, ctx.motion.move_step, vp.margin_y, vp.height),
        ..quiet(s)
    }
}

/// Diagonal move. If either axis would leave the extent, both reset to 0.
fn move_xy(_: &ActorId, s: &ActorState, ctx: &mut ActionCtx<'_>) -> ActorState {
    let vp = ctx.viewport;
    let step = ctx.motion.move_step;
    let off_x = s.x + step + vp.margin_x > vp.width;
    let off_y = s.y + step + vp.margin_y > vp.height;
    let (x, y) = if off_x || off_y {
        (0.0, 0.0)
    } else {
        (s.x + step, s.y + step)
    };
    ActorState { x, y, ..quiet(s) }
}

fn go_to_origin(_: &ActorId, s: &ActorState, _: &mut ActionCtx<'_>) -> ActorState {
    ActorState {
        x: 0.0,
        y: 0.0,
        ..quiet(s)
    }
}

fn go_to_random_position(_: &ActorId, s: &ActorState, ctx: &mut ActionCtx<'_>) -> ActorState {
    let x = random_coord(ctx);
    let y = random_coord(ctx);
    ActorState { x, y, ..quiet(s) }
}

fn random_coord(ctx: &mut ActionCtx<'_>) -> f64 {
    let (min, max) = (ctx.motion.random_min, ctx.motion.random_max);
    let span = max.saturating_sub(min) as f64;
    let r = ctx.rng.next_f64();
    let r = if r.is_finite() { r.clamp(0.0, 1.0) } else { 0.0 };
    // r == 1.0 from a misbehaving source must not land on the exclusive bound.
    let offset = (r * span).floor().min(span - 1.0).max(0.0);
    min as f64 + offset
}

fn turn(s: &ActorState, degrees: f64) -> ActorState {
    ActorState {
        rotation: s.rotation + degrees,
        ..quiet(s)
    }
}

fn resize(s: &ActorState, motion: &MotionConfig, sign: f64) -> ActorState {
    ActorState {
        size: (s.size + sign * motion.size_step).max(motion.min_size),
        ..quiet(s)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/actions/builtin.rs"]
mod tests;
