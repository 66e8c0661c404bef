use std::collections::BTreeSet;

use crate::foundation::{
    core::{ActorId, BlockId, FlowId},
    error::{FlowError, FlowResult},
};

/// One action block placed in a flow.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ActionBlock {
    pub id: BlockId,
    /// Action kind, looked up in the action registry at compile time.
    pub action: String,
    #[serde(default, alias = "targetActorId")]
    pub target: Option<ActorId>,
}

impl ActionBlock {
    pub fn new(id: impl Into<BlockId>, action: impl Into<String>, target: Option<ActorId>) -> Self {
        Self {
            id: id.into(),
            action: action.into(),
            target,
        }
    }
}

/// Ordered list of blocks. Blocks for different actors may interleave freely.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Flow {
    pub id: FlowId,
    pub name: String,
    #[serde(default)]
    pub blocks: Vec<ActionBlock>,
}

impl Flow {
    pub fn new(id: impl Into<FlowId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            blocks: Vec::new(),
        }
    }

    /// Append a block and return its freshly assigned id (`block-N`).
    pub fn push_block(&mut self, action: impl Into<String>, target: Option<ActorId>) -> BlockId {
        let id = BlockId(next_free_id("block", self.blocks.len() + 1, |c| {
            self.blocks.iter().any(|b| b.id.as_str() == c)
        }));
        self.blocks
            .push(ActionBlock::new(id.clone(), action, target));
        id
    }

    pub fn remove_block(&mut self, id: &BlockId) -> Option<ActionBlock> {
        let pos = self.blocks.iter().position(|b| &b.id == id)?;
        Some(self.blocks.remove(pos))
    }

    /// Move the block at `from` so it ends up at index `to`.
    pub fn move_block(&mut self, from: usize, to: usize) -> FlowResult<()> {
        let len = self.blocks.len();
        if from >= len || to >= len {
            return Err(FlowError::validation(format!(
                "block move {from} -> {to} out of range for {len} blocks"
            )));
        }
        let block = self.blocks.remove(from);
        self.blocks.insert(to, block);
        Ok(())
    }

    /// The blocks targeting `actor`, in flow order.
    pub fn blocks_for<'a>(&'a self, actor: &'a ActorId) -> impl Iterator<Item = &'a ActionBlock> + 'a {
        self.blocks
            .iter()
            .filter(move |b| b.target.as_ref() == Some(actor))
    }

    pub fn validate(&self) -> FlowResult<()> {
        let mut seen = BTreeSet::new();
        for b in &self.blocks {
            if !seen.insert(&b.id) {
                return Err(FlowError::validation(format!(
                    "flow '{}' has duplicate block id '{}'",
                    self.id, b.id
                )));
            }
        }
        Ok(())
    }
}

/// All flows of a project plus the one currently selected for playback.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct FlowBook {
    flows: Vec<Flow>,
    active: FlowId,
}

impl Default for FlowBook {
    fn default() -> Self {
        Self {
            flows: vec![Flow::new("flow-1", "Flow 1")],
            active: FlowId::from("flow-1"),
        }
    }
}

impl FlowBook {
    pub fn iter(&self) -> impl Iterator<Item = &Flow> + '_ {
        self.flows.iter()
    }

    pub fn len(&self) -> usize {
        self.flows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flows.is_empty()
    }

    pub fn get(&self, id: &FlowId) -> Option<&Flow> {
        self.flows.iter().find(|f| &f.id == id)
    }

    pub fn get_mut(&mut self, id: &FlowId) -> Option<&mut Flow> {
        self.flows.iter_mut().find(|f| &f.id == id)
    }

    pub fn active_id(&self) -> &FlowId {
        &self.active
    }

    pub fn active(&self) -> Option<&Flow> {
        self.get(&self.active)
    }

    pub fn active_mut(&mut self) -> Option<&mut Flow> {
        let id = self.active.clone();
        self.get_mut(&id)
    }

    pub fn set_active(&mut self, id: &FlowId) -> FlowResult<()> {
        if self.get(id).is_none() {
            return Err(FlowError::validation(format!("unknown flow '{id}'")));
        }
        self.active = id.clone();
        Ok(())
    }

    /// Add an empty flow, make it active and return its id.
    pub fn add_flow(&mut self) -> FlowId {
        let n = self.flows.len() + 1;
        let id = FlowId(next_free_id("flow", n, |c| {
            self.flows.iter().any(|f| f.id.as_str() == c)
        }));
        self.flows.push(Flow::new(id.clone(), format!("Flow {n}")));
        self.active = id.clone();
        id
    }

    /// Delete a flow. The last remaining flow cannot be deleted.
    pub fn delete_flow(&mut self, id: &FlowId) -> FlowResult<Flow> {
        let pos = self
            .flows
            .iter()
            .position(|f| &f.id == id)
            .ok_or_else(|| FlowError::validation(format!("unknown flow '{id}'")))?;
        if self.flows.len() <= 1 {
            return Err(FlowError::invalid_state("cannot delete the last flow"));
        }
        let removed = self.flows.remove(pos);
        if &self.active == id {
            self.active = self.flows[0].id.clone();
        }
        Ok(removed)
    }

    pub fn rename(&mut self, id: &FlowId, name: impl Into<String>) -> FlowResult<()> {
        let flow = self
            .get_mut(id)
            .ok_or_else(|| FlowError::validation(format!("unknown flow '{id}'")))?;
        flow.name = name.into();
        Ok(())
    }

    pub fn validate(&self) -> FlowResult<()> {
        if self.flows.is_empty() {
            return Err(FlowError::validation("a project needs at least one flow"));
        }
        let mut seen = BTreeSet::new();
        for f in &self.flows {
            if !seen.insert(&f.id) {
                return Err(FlowError::validation(format!("duplicate flow id '{}'", f.id)));
            }
            f.validate()?;
        }
        Ok(())
    }
}

/// `{prefix}-{n}`, bumping `n` until `taken` says the candidate is free.
pub(crate) fn next_free_id(prefix: &str, mut n: usize, taken: impl Fn(&str) -> bool) -> String {
    loop {
        let candidate = format!("{prefix}-{n}");
        if !taken(&candidate) {
            return candidate;
        }
        n += 1;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/project/flow.rs"]
mod tests;
