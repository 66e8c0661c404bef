//! Real-time playback of step tables.
//!
//! The [`Scheduler`] is a two-state machine (`Idle`, `Running`) that owns the
//! current run and the single pending timer. A repeat sub-run replaces the
//! finished run in place, so repeats loop instead of nesting. It never sleeps itself: a [`TimerService`] tells it when to wake
//! up and a driver feeds fired tokens back through [`Scheduler::on_timer`].

use std::{collections::BTreeMap, time::Duration};

use crate::{
    actions::{random::RandomSource, registry::ActionRegistry},
    compile::steps::{RepeatSet, StepCompiler, StepSnapshot, StepTable},
    config::EngineConfig,
    foundation::{
        core::{ActorId, ActorState, ActorStatePatch},
        error::{FlowError, FlowResult},
    },
    playback::{
        sink::StateSink,
        timer::{TimerService, TimerToken, Wakeup},
    },
    project::flow::{ActionBlock, Flow},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaybackStatus {
    Idle,
    Running,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlayOutcome {
    /// Snapshot 0 was applied and step 1 is scheduled.
    Started,
    /// The flow compiled to an empty table; nothing happened.
    Empty,
}

/// Observable playback milestones, drained with [`Scheduler::take_events`].
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum PlaybackEvent {
    Started {
        steps: usize,
    },
    StepApplied {
        /// 0 for the initial run, then one more per repeat sub-run.
        run: u32,
        step: usize,
        last: usize,
        states: BTreeMap<ActorId, ActorState>,
        repeat: RepeatSet,
    },
    RepeatScheduled {
        actors: RepeatSet,
        delay_ms: u64,
    },
    RepeatStarted {
        run: u32,
        actors: RepeatSet,
        steps: usize,
    },
    Finished,
    Stopped,
}

/// The run being played: the blocks it was compiled from, its table,
/// and how far playback has got.
#[derive(Debug)]
struct RunContext {
    blocks: Vec<ActionBlock>,
    table: StepTable,
    step: usize,
}

pub struct Scheduler {
    registry: ActionRegistry,
    config: EngineConfig,
    rng: Box<dyn RandomSource>,
    status: PlaybackStatus,
    pending: Option<(TimerToken, Wakeup)>,
    run: Option<RunContext>,
    repeat_count: u32,
    events: Vec<PlaybackEvent>,
}

impl Scheduler {
    pub fn new(
        registry: ActionRegistry,
        config: EngineConfig,
        rng: impl RandomSource + 'static,
    ) -> Self {
        Self {
            registry,
            config,
            rng: Box::new(rng),
            status: PlaybackStatus::Idle,
            pending: None,
            run: None,
            repeat_count: 0,
            events: Vec::new(),
        }
    }

    pub fn status(&self) -> PlaybackStatus {
        self.status
    }

    pub fn is_running(&self) -> bool {
        self.status == PlaybackStatus::Running
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn registry(&self) -> &ActionRegistry {
        &self.registry
    }

    /// Token of the one outstanding timer, if any.
    pub fn pending_token(&self) -> Option<TimerToken> {
        self.pending.map(|(t, _)| t)
    }

    /// Index of the last applied snapshot in the current run's table.
    pub fn current_step(&self) -> Option<usize> {
        self.run.as_ref().map(|r| r.step)
    }

    pub fn current_table(&self) -> Option<&StepTable> {
        self.run.as_ref().map(|r| &r.table)
    }

    /// Number of repeat sub-runs started since the last `play()`.
    pub fn repeat_count(&self) -> u32 {
        self.repeat_count
    }

    pub fn take_events(&mut self) -> Vec<PlaybackEvent> {
        std::mem::take(&mut self.events)
    }

    /// Compile `flow` against the actors and current states held by `sink`.
    pub fn compile(&mut self, flow: &Flow, sink: &dyn StateSink) -> StepTable {
        let actor_ids = sink.actor_ids();
        let initial = sink.current_states();
        StepCompiler::new(&self.registry, &self.config).compile(
            &flow.blocks,
            &actor_ids,
            &initial,
            self.rng.as_mut(),
        )
    }

    /// Start playing `flow`.
    ///
    /// Fails with [`FlowError::InvalidState`] while a run is in progress; the
    /// running schedule is left untouched in that case.
    pub fn play(
        &mut self,
        flow: &Flow,
        sink: &mut dyn StateSink,
        timer: &mut dyn TimerService,
    ) -> FlowResult<PlayOutcome> {
        if self.is_running() {
            return Err(FlowError::invalid_state(
                "playback already running; stop() it first",
            ));
        }

        let table = self.compile(flow, sink);
        if table.is_empty() {
            tracing::info!(flow = %flow.id, "flow has no playable blocks");
            return Ok(PlayOutcome::Empty);
        }

        tracing::info!(flow = %flow.id, steps = table.len(), "playback started");
        self.status = PlaybackStatus::Running;
        self.repeat_count = 0;
        self.events.push(PlaybackEvent::Started { steps: table.len() });
        sink.playback_started();

        self.run = Some(RunContext {
            blocks: flow.blocks.clone(),
            table,
            step: 0,
        });
        self.apply_current(sink);
        self.arm(timer, Wakeup::Advance, self.config.playback.step_delay());
        Ok(PlayOutcome::Started)
    }

    /// Stop playback. Actor states stay as last applied. Returns `false` if
    /// nothing was running.
    pub fn stop(&mut self, sink: &mut dyn StateSink, timer: &mut dyn TimerService) -> bool {
        if !self.is_running() {
            return false;
        }
        if let Some((token, _)) = self.pending.take() {
            timer.cancel(token);
        }
        tracing::info!(step = ?self.current_step(), "playback stopped");
        self.finish(sink, PlaybackEvent::Stopped);
        true
    }

    /// Handle a fired timer. Tokens other than the pending one are ignored
    /// and reported as `false`.
    pub fn on_timer(
        &mut self,
        token: TimerToken,
        sink: &mut dyn StateSink,
        timer: &mut dyn TimerService,
    ) -> bool {
        let wakeup = match self.pending {
            Some((pending, wakeup)) if pending == token => wakeup,
            _ => {
                tracing::debug!(?token, "stale timer ignored");
                return false;
            }
        };
        self.pending = None;

        match wakeup {
            Wakeup::Advance => self.advance(sink, timer),
            Wakeup::Repeat => self.start_repeat(sink, timer),
        }
        true
    }

    fn advance(&mut self, sink: &mut dyn StateSink, timer: &mut dyn TimerService) {
        let Some(run) = self.run.as_mut() else {
            self.finish(sink, PlaybackEvent::Finished);
            return;
        };
        run.step += 1;
        let step = run.step;
        let last = run.table.last_index().unwrap_or(0);
        let Some(snapshot) = run.table.get(step) else {
            self.finish(sink, PlaybackEvent::Finished);
            return;
        };
        let repeat = snapshot.repeat.clone();
        let hold = if self.config.playback.hold_for_messages {
            Duration::from_millis(snapshot.message_hold_ms())
        } else {
            Duration::ZERO
        };

        self.apply_current(sink);

        if !repeat.is_empty() {
            if self
                .config
                .playback
                .max_repeats
                .is_some_and(|max| self.repeat_count >= max)
            {
                tracing::info!(repeats = self.repeat_count, "repeat limit reached");
                self.finish(sink, PlaybackEvent::Finished);
                return;
            }
            let delay = hold + self.config.playback.repeat_delay();
            tracing::info!(actors = repeat.len(), ?delay, "repeat scheduled");
            self.events.push(PlaybackEvent::RepeatScheduled {
                actors: repeat,
                delay_ms: delay.as_millis() as u64,
            });
            self.arm(timer, Wakeup::Repeat, delay);
        } else if step >= last {
            self.finish(sink, PlaybackEvent::Finished);
        } else {
            self.arm(timer, Wakeup::Advance, hold + self.config.playback.step_delay());
        }
    }

    /// Replace the finished run with a sub-run restricted to the actors that
    /// asked to repeat, seeded from the snapshot that triggered the repeat.
    fn start_repeat(&mut self, sink: &mut dyn StateSink, timer: &mut dyn TimerService) {
        let Some(done) = self.run.take() else {
            self.finish(sink, PlaybackEvent::Finished);
            return;
        };
        let Some(trigger) = done.table.get(done.step) else {
            self.finish(sink, PlaybackEvent::Finished);
            return;
        };

        let actors = trigger.repeat.clone();
        let seeds: BTreeMap<ActorId, ActorState> = actors
            .iter()
            .map(|id| {
                let state = trigger
                    .get(id)
                    .cloned()
                    .or_else(|| sink.get(id))
                    .unwrap_or_default();
                (id.clone(), state)
            })
            .collect();
        let blocks: Vec<ActionBlock> = done
            .blocks
            .into_iter()
            .filter(|b| b.target.as_ref().is_some_and(|t| actors.contains(t)))
            .collect();

        let table = StepCompiler::new(&self.registry, &self.config).recompile_from(
            &blocks,
            &seeds,
            &actors,
            self.rng.as_mut(),
        );
        self.repeat_count += 1;

        if table.is_empty() {
            self.finish(sink, PlaybackEvent::Finished);
            return;
        }

        tracing::info!(
            run = self.repeat_count,
            actors = actors.len(),
            steps = table.len(),
            "repeat sub-run started"
        );
        self.events.push(PlaybackEvent::RepeatStarted {
            run: self.repeat_count,
            actors,
            steps: table.len(),
        });
        // Snapshot 0 of the sub-run equals what is already on screen.
        self.run = Some(RunContext {
            blocks,
            table,
            step: 0,
        });
        self.arm(timer, Wakeup::Advance, self.config.playback.step_delay());
    }

    /// Push the current run's current snapshot to the sink as one batch.
    fn apply_current(&mut self, sink: &mut dyn StateSink) {
        let Some(run) = self.run.as_ref() else {
            return;
        };
        let Some(snapshot) = run.table.get(run.step) else {
            return;
        };
        sink.apply_batch(batch_for(snapshot));
        tracing::debug!(run = self.repeat_count, step = run.step, "snapshot applied");
        self.events.push(PlaybackEvent::StepApplied {
            run: self.repeat_count,
            step: run.step,
            last: run.table.last_index().unwrap_or(0),
            states: snapshot.states.clone(),
            repeat: snapshot.repeat.clone(),
        });
    }

    fn arm(&mut self, timer: &mut dyn TimerService, wakeup: Wakeup, delay: Duration) {
        if let Some((old, _)) = self.pending.take() {
            timer.cancel(old);
        }
        let token = timer.schedule(wakeup, delay);
        self.pending = Some((token, wakeup));
    }

    fn finish(&mut self, sink: &mut dyn StateSink, event: PlaybackEvent) {
        if matches!(event, PlaybackEvent::Finished) {
            tracing::info!(repeats = self.repeat_count, "playback finished");
        }
        self.status = PlaybackStatus::Idle;
        self.pending = None;
        self.run = None;
        self.events.push(event);
        sink.playback_finished();
    }
}

fn batch_for(snapshot: &StepSnapshot) -> Vec<(ActorId, ActorStatePatch)> {
    snapshot
        .states
        .iter()
        .map(|(id, state)| (id.clone(), ActorStatePatch::from(state.clone())))
        .collect()
}

#[cfg(test)]
#[path = "../../tests/unit/playback/scheduler.rs"]
mod tests;
