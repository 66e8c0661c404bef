use std::collections::{BTreeMap, BTreeSet};

use crate::{
    foundation::{
        core::{ActorId, ActorState, ActorStatePatch},
        error::{FlowError, FlowResult},
    },
    playback::sink::StateSink,
    project::flow::next_free_id,
};

/// Horizontal spacing between actors' home positions.
pub const HOME_SPACING: f64 = 100.0;

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Actor {
    pub id: ActorId,
    pub name: String,
    /// Artwork key used by the front end ("cat", "baseball", ...).
    #[serde(default = "default_costume")]
    pub costume: String,
    #[serde(default)]
    pub state: ActorState,
}

fn default_costume() -> String {
    "cat".to_string()
}

/// The actor roster and the live state every front end displays.
///
/// While locked (during playback) the editing methods refuse to run; only the
/// [`StateSink`] implementation used by the scheduler may write.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Stage {
    actors: Vec<Actor>,
    #[serde(skip)]
    locked: bool,
    #[serde(skip)]
    revision: u64,
}

impl Default for Stage {
    fn default() -> Self {
        Self {
            actors: vec![Actor {
                id: ActorId::from("sprite-1"),
                name: "Cat".to_string(),
                costume: default_costume(),
                state: ActorState::default(),
            }],
            locked: false,
            revision: 0,
        }
    }
}

impl Stage {
    pub fn actors(&self) -> &[Actor] {
        &self.actors
    }

    pub fn actor(&self, id: &ActorId) -> Option<&Actor> {
        self.actors.iter().find(|a| &a.id == id)
    }

    pub fn contains(&self, id: &ActorId) -> bool {
        self.actor(id).is_some()
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    pub fn set_locked(&mut self, locked: bool) {
        self.locked = locked;
    }

    /// Bumped once per write batch; front ends redraw when it changes.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Home position of the actor at roster slot `index`.
    pub fn home_position(index: usize) -> (f64, f64) {
        (index as f64 * HOME_SPACING, 0.0)
    }

    /// Add an actor at its home position and return its id (`sprite-N`).
    pub fn add_actor(
        &mut self,
        costume: impl Into<String>,
        name: Option<String>,
    ) -> FlowResult<ActorId> {
        self.ensure_unlocked("add an actor")?;
        let n = self.actors.len() + 1;
        let id = ActorId(next_free_id("sprite", n, |c| {
            self.actors.iter().any(|a| a.id.as_str() == c)
        }));
        let (x, y) = Self::home_position(self.actors.len());
        self.actors.push(Actor {
            id: id.clone(),
            name: name.unwrap_or_else(|| format!("Sprite {n}")),
            costume: costume.into(),
            state: ActorState::at(x, y),
        });
        self.revision += 1;
        Ok(id)
    }

    /// Remove an actor. The last remaining actor cannot be removed.
    pub fn remove_actor(&mut self, id: &ActorId) -> FlowResult<Actor> {
        self.ensure_unlocked("remove an actor")?;
        let pos = self.position(id)?;
        if self.actors.len() <= 1 {
            return Err(FlowError::invalid_state("cannot remove the last actor"));
        }
        self.revision += 1;
        Ok(self.actors.remove(pos))
    }

    pub fn rename_actor(&mut self, id: &ActorId, name: impl Into<String>) -> FlowResult<()> {
        self.ensure_unlocked("rename an actor")?;
        let name = name.into();
        if name.trim().is_empty() {
            return Err(FlowError::validation("actor name must be non-empty"));
        }
        let pos = self.position(id)?;
        self.actors[pos].name = name;
        Ok(())
    }

    /// Front-end write: shallow-merge `patch` into an actor's state.
    pub fn update_actor(&mut self, id: &ActorId, patch: &ActorStatePatch) -> FlowResult<()> {
        self.ensure_unlocked("edit actor state")?;
        let pos = self.position(id)?;
        self.actors[pos].state.merge(patch);
        self.revision += 1;
        Ok(())
    }

    pub fn states(&self) -> BTreeMap<ActorId, ActorState> {
        self.actors
            .iter()
            .map(|a| (a.id.clone(), a.state.clone()))
            .collect()
    }

    /// Fresh states with every actor at its home position.
    pub fn home_states(&self) -> BTreeMap<ActorId, ActorState> {
        self.actors
            .iter()
            .enumerate()
            .map(|(i, a)| {
                let (x, y) = Self::home_position(i);
                (a.id.clone(), ActorState::at(x, y))
            })
            .collect()
    }

    pub fn reset_to_home(&mut self) -> FlowResult<()> {
        self.ensure_unlocked("reset the stage")?;
        for (i, actor) in self.actors.iter_mut().enumerate() {
            let (x, y) = Self::home_position(i);
            actor.state = ActorState::at(x, y);
        }
        self.revision += 1;
        Ok(())
    }

    pub fn validate(&self) -> FlowResult<()> {
        if self.actors.is_empty() {
            return Err(FlowError::validation("a stage needs at least one actor"));
        }
        let mut seen = BTreeSet::new();
        for a in &self.actors {
            if !seen.insert(&a.id) {
                return Err(FlowError::validation(format!("duplicate actor id '{}'", a.id)));
            }
        }
        Ok(())
    }

    fn position(&self, id: &ActorId) -> FlowResult<usize> {
        self.actors
            .iter()
            .position(|a| &a.id == id)
            .ok_or_else(|| FlowError::validation(format!("unknown actor '{id}'")))
    }

    fn ensure_unlocked(&self, what: &str) -> FlowResult<()> {
        if self.locked {
            return Err(FlowError::invalid_state(format!(
                "cannot {what} while playback is running"
            )));
        }
        Ok(())
    }
}

impl StateSink for Stage {
    fn actor_ids(&self) -> Vec<ActorId> {
        self.actors.iter().map(|a| a.id.clone()).collect()
    }

    fn get(&self, id: &ActorId) -> Option<ActorState> {
        self.actor(id).map(|a| a.state.clone())
    }

    fn set(&mut self, id: &ActorId, patch: ActorStatePatch) {
        if let Some(actor) = self.actors.iter_mut().find(|a| &a.id == id) {
            actor.state.merge(&patch);
            self.revision += 1;
        }
    }

    fn apply_batch(&mut self, batch: Vec<(ActorId, ActorStatePatch)>) {
        for (id, patch) in batch {
            if let Some(actor) = self.actors.iter_mut().find(|a| a.id == id) {
                actor.state.merge(&patch);
            }
        }
        self.revision += 1;
    }

    fn playback_started(&mut self) {
        self.locked = true;
    }

    fn playback_finished(&mut self) {
        self.locked = false;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/project/stage.rs"]
mod tests;
