use std::collections::{BTreeMap, BTreeSet};

use crate::{
    actions::{
        random::RandomSource,
        registry::{ActionCtx, ActionRegistry},
    },
    config::{EngineConfig, MotionConfig, Viewport},
    foundation::core::{ActorId, ActorState, BlockId},
    project::flow::ActionBlock,
};

/// Actors whose block at a given step is a repeat marker.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct RepeatSet(BTreeSet<ActorId>);

impl RepeatSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, actor: ActorId) -> bool {
        self.0.insert(actor)
    }

    pub fn contains(&self, actor: &ActorId) -> bool {
        self.0.contains(actor)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ActorId> + '_ {
        self.0.iter()
    }
}

impl FromIterator<ActorId> for RepeatSet {
    fn from_iter<I: IntoIterator<Item = ActorId>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// State of every covered actor at one step.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize)]
pub struct StepSnapshot {
    pub states: BTreeMap<ActorId, ActorState>,
    pub repeat: RepeatSet,
}

impl StepSnapshot {
    pub fn get(&self, actor: &ActorId) -> Option<&ActorState> {
        self.states.get(actor)
    }

    pub fn actors(&self) -> impl Iterator<Item = &ActorId> + '_ {
        self.states.keys()
    }

    /// Longest message hold among actors that currently show a message.
    pub fn message_hold_ms(&self) -> u64 {
        self.states
            .values()
            .map(ActorState::message_hold_ms)
            .max()
            .unwrap_or(0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// The action kind is not in the registry.
    UnknownAction,
    /// The block has no target actor.
    Unassigned,
    /// The block targets an actor that is not on the stage.
    UnknownActor,
}

/// A block left out of compilation. Skips are diagnostics, never errors.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct SkippedBlock {
    pub block: BlockId,
    pub action: String,
    pub target: Option<ActorId>,
    /// Snapshot index the block would have produced, when it had a slot.
    pub step: Option<usize>,
    pub reason: SkipReason,
}

/// Compiled, immutable sequence of snapshots. Index 0 is the state before any block.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize)]
pub struct StepTable {
    snapshots: Vec<StepSnapshot>,
    skipped: Vec<SkippedBlock>,
}

impl StepTable {
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// An empty table means there is nothing to play.
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&StepSnapshot> {
        self.snapshots.get(index)
    }

    pub fn last_index(&self) -> Option<usize> {
        self.snapshots.len().checked_sub(1)
    }

    pub fn snapshots(&self) -> &[StepSnapshot] {
        &self.snapshots
    }

    pub fn skipped(&self) -> &[SkippedBlock] {
        &self.skipped
    }
}

/// Turns per-actor block lists into a [`StepTable`].
///
/// Step `k` of the table holds, for every actor, the state after that actor's
/// first `k` own blocks. Actors that run out of blocks carry their last state.
pub struct StepCompiler<'a> {
    registry: &'a ActionRegistry,
    motion: &'a MotionConfig,
    viewport: &'a Viewport,
}

impl<'a> StepCompiler<'a> {
    pub fn new(registry: &'a ActionRegistry, config: &'a EngineConfig) -> Self {
        Self {
            registry,
            motion: &config.motion,
            viewport: &config.viewport,
        }
    }

    /// Compile `blocks` for `actor_ids`, seeding step 0 from `initial`.
    ///
    /// Actors missing from `initial` start from [`ActorState::default`]. Blocks
    /// aimed at actors outside `actor_ids` are skipped and reported.
    #[tracing::instrument(skip_all, fields(blocks = blocks.len(), actors = actor_ids.len()))]
    pub fn compile(
        &self,
        blocks: &[ActionBlock],
        actor_ids: &[ActorId],
        initial: &BTreeMap<ActorId, ActorState>,
        rng: &mut dyn RandomSource,
    ) -> StepTable {
        self.build(blocks, actor_ids, initial, true, rng)
    }

    /// Compile only the blocks of `restrict_to`, seeding from `current`.
    ///
    /// Actors outside `restrict_to` are not part of the resulting table at all.
    #[tracing::instrument(skip_all, fields(blocks = blocks.len(), actors = restrict_to.len()))]
    pub fn recompile_from(
        &self,
        blocks: &[ActionBlock],
        current: &BTreeMap<ActorId, ActorState>,
        restrict_to: &RepeatSet,
        rng: &mut dyn RandomSource,
    ) -> StepTable {
        let actors: Vec<ActorId> = restrict_to.iter().cloned().collect();
        self.build(blocks, &actors, current, false, rng)
    }

    fn build(
        &self,
        blocks: &[ActionBlock],
        actor_ids: &[ActorId],
        seed: &BTreeMap<ActorId, ActorState>,
        report_foreign: bool,
        rng: &mut dyn RandomSource,
    ) -> StepTable {
        let mut order: Vec<&ActorId> = Vec::with_capacity(actor_ids.len());
        let mut lanes: BTreeMap<&ActorId, Vec<&ActionBlock>> = BTreeMap::new();
        for id in actor_ids {
            if !lanes.contains_key(id) {
                lanes.insert(id, Vec::new());
                order.push(id);
            }
        }

        let mut skipped = Vec::new();
        for block in blocks {
            let reason = match &block.target {
                None => SkipReason::Unassigned,
                Some(target) => match lanes.get_mut(target) {
                    Some(lane) => {
                        lane.push(block);
                        continue;
                    }
                    None => SkipReason::UnknownActor,
                },
            };
            if report_foreign {
                tracing::debug!(block = %block.id, ?reason, "block left out of compilation");
                skipped.push(SkippedBlock {
                    block: block.id.clone(),
                    action: block.action.clone(),
                    target: block.target.clone(),
                    step: None,
                    reason,
                });
            }
        }

        let steps = lanes.values().map(Vec::len).max().unwrap_or(0);
        if steps == 0 {
            return StepTable {
                snapshots: Vec::new(),
                skipped,
            };
        }

        let first = StepSnapshot {
            states: order
                .iter()
                .map(|&id| (id.clone(), seed.get(id).cloned().unwrap_or_default()))
                .collect(),
            repeat: RepeatSet::new(),
        };

        let mut snapshots = Vec::with_capacity(steps + 1);
        snapshots.push(first);

        let mut ctx = ActionCtx {
            motion: self.motion,
            viewport: self.viewport,
            rng,
        };

        for k in 0..steps {
            let prev = &snapshots[k];
            let mut next = StepSnapshot {
                states: prev.states.clone(),
                repeat: RepeatSet::new(),
            };

            for &actor in &order {
                let Some(block) = lanes[actor].get(k) else {
                    continue;
                };
                let prior = &prev.states[actor];
                match self.registry.apply(&block.action, actor, prior, &mut ctx) {
                    Some(state) => {
                        next.states.insert(actor.clone(), state);
                        if self.registry.is_repeat(&block.action) {
                            next.repeat.insert(actor.clone());
                        }
                    }
                    None => {
                        tracing::warn!(
                            block = %block.id,
                            action = %block.action,
                            actor = %actor,
                            "unknown action kind; block skipped"
                        );
                        skipped.push(SkippedBlock {
                            block: block.id.clone(),
                            action: block.action.clone(),
                            target: Some(actor.clone()),
                            step: Some(k + 1),
                            reason: SkipReason::UnknownAction,
                        });
                    }
                }
            }

            snapshots.push(next);
        }

        StepTable { snapshots, skipped }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compile/steps.rs"]
mod tests;
