//! Block-based actor animation.
//!
//! A [`Flow`] is an ordered list of [`ActionBlock`]s, each naming an action
//! kind and the actor it drives. The [`StepCompiler`] turns a flow into a
//! [`StepTable`] of per-step actor states, and the [`Scheduler`] plays that
//! table back into a [`StateSink`] on a timer, restarting the actors that end
//! on a repeat block.

#![forbid(unsafe_code)]

mod actions;
mod compile;
pub mod config;
mod foundation;
mod playback;
mod project;

/// Action kind names understood by [`ActionRegistry::with_builtins`].
pub mod kinds {
    pub use crate::actions::builtin::{
        DECREASE_SIZE, GO_TO_ORIGIN, GO_TO_RANDOM_POSITION, INCREASE_SIZE, MOVE_X_BY_50,
        MOVE_XY_50, MOVE_Y_BY_50, REPEAT_WHOLE_ANIMATION, ROTATE_360, SAY_HELLO,
        SAY_HELLO_FOR_1_SEC, TURN_ANTICLOCKWISE_45, TURN_CLOCKWISE_45,
    };
}

pub use actions::random::{RandomSource, ScriptedRandom, SeededRandom};
pub use actions::registry::{ActionCtx, ActionRegistry, TransitionFn};
pub use compile::steps::{
    RepeatSet, SkipReason, SkippedBlock, StepCompiler, StepSnapshot, StepTable,
};
pub use config::{EngineConfig, MotionConfig, PlaybackConfig, Viewport};
pub use foundation::core::{ActorId, ActorState, ActorStatePatch, BlockId, FlowId};
pub use foundation::error::{FlowError, FlowResult};
pub use playback::driver::{RunEnd, drain, run_realtime};
pub use playback::scheduler::{PlayOutcome, PlaybackEvent, PlaybackStatus, Scheduler};
pub use playback::sink::StateSink;
pub use playback::timer::{TimerQueue, TimerService, TimerToken, Wakeup};
pub use project::Project;
pub use project::flow::{ActionBlock, Flow, FlowBook};
pub use project::stage::{Actor, HOME_SPACING, Stage};
