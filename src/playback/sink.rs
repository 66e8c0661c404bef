use std::collections::BTreeMap;

use crate::foundation::core::{ActorId, ActorState, ActorStatePatch};

/// Holder of the live per-actor state that playback writes into.
///
/// `set` has shallow-merge semantics. While a run is in progress only the
/// scheduler writes here; front ends are expected to defer their own edits
/// between `playback_started` and `playback_finished`.
pub trait StateSink {
    fn actor_ids(&self) -> Vec<ActorId>;

    fn get(&self, id: &ActorId) -> Option<ActorState>;

    fn set(&mut self, id: &ActorId, patch: ActorStatePatch);

    /// Apply one step's writes as a single unit.
    fn apply_batch(&mut self, batch: Vec<(ActorId, ActorStatePatch)>) {
        for (id, patch) in batch {
            self.set(&id, patch);
        }
    }

    fn current_states(&self) -> BTreeMap<ActorId, ActorState> {
        self.actor_ids()
            .into_iter()
            .filter_map(|id| self.get(&id).map(|s| (id, s)))
            .collect()
    }

    fn playback_started(&mut self) {}

    fn playback_finished(&mut self) {}
}
