pub(crate) mod flow;
pub(crate) mod stage;

use crate::{
    foundation::error::{FlowError, FlowResult},
    project::{flow::FlowBook, stage::Stage},
};

/// On-disk project document: the stage roster plus all authored flows.
#[derive(Clone, Debug, Default, serde::Serialize, serde::Deserialize)]
pub struct Project {
    #[serde(default)]
    pub stage: Stage,
    #[serde(default)]
    pub flows: FlowBook,
}

impl Project {
    pub fn from_json_str(s: &str) -> FlowResult<Self> {
        let project: Self = serde_json::from_str(s)?;
        project.validate()?;
        Ok(project)
    }

    pub fn to_json_string(&self) -> FlowResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> FlowResult<()> {
        self.stage.validate()?;
        self.flows.validate()?;
        for flow in self.flows.iter() {
            for block in &flow.blocks {
                if let Some(target) = &block.target {
                    if !self.stage.contains(target) {
                        tracing::warn!(
                            flow = %flow.id,
                            block = %block.id,
                            target = %target,
                            "block targets an actor that is not on the stage"
                        );
                    }
                }
            }
        }
        if self.flows.active().is_none() {
            return Err(FlowError::validation("active flow does not exist"));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../tests/unit/project/project.rs"]
mod tests;
