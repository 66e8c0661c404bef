use std::{collections::BTreeMap, fmt, sync::Arc};

use crate::{
    actions::{builtin, random::RandomSource},
    config::{MotionConfig, Viewport},
    foundation::core::{ActorId, ActorState},
};

/// Everything a transition may read besides the actor's prior state.
pub struct ActionCtx<'a> {
    pub motion: &'a MotionConfig,
    pub viewport: &'a Viewport,
    pub rng: &'a mut dyn RandomSource,
}

/// Pure per-actor state transition.
pub type TransitionFn =
    Arc<dyn Fn(&ActorId, &ActorState, &mut ActionCtx<'_>) -> ActorState + Send + Sync>;

#[derive(Clone)]
struct ActionDef {
    apply: TransitionFn,
    repeat: bool,
}

/// Lookup table from action kind to transition.
///
/// Kinds are matched exactly. Compilation and playback only go through this
/// table, so new kinds can be registered without touching the engine.
#[derive(Clone, Default)]
pub struct ActionRegistry {
    actions: BTreeMap<String, ActionDef>,
}

impl ActionRegistry {
    /// An empty registry with no kinds at all.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Registry preloaded with the built-in motion, looks and control kinds.
    pub fn with_builtins() -> Self {
        let mut reg = Self::empty();
        builtin::install(&mut reg);
        reg
    }

    /// Register (or replace) a transition for `kind`.
    pub fn register<F>(&mut self, kind: impl Into<String>, f: F) -> &mut Self
    where
        F: Fn(&ActorId, &ActorState, &mut ActionCtx<'_>) -> ActorState + Send + Sync + 'static,
    {
        self.actions.insert(
            kind.into(),
            ActionDef {
                apply: Arc::new(f),
                repeat: false,
            },
        );
        self
    }

    /// Register `kind` as a repeat marker: state is left untouched and the
    /// actor joins the step's repeat set.
    pub fn register_repeat(&mut self, kind: impl Into<String>) -> &mut Self {
        self.actions.insert(
            kind.into(),
            ActionDef {
                apply: Arc::new(|_, prior, _| prior.clone()),
                repeat: true,
            },
        );
        self
    }

    pub fn contains(&self, kind: &str) -> bool {
        self.actions.contains_key(kind)
    }

    pub fn is_repeat(&self, kind: &str) -> bool {
        self.actions.get(kind).is_some_and(|d| d.repeat)
    }

    /// Registered kinds in sorted order, paired with their repeat flag.
    pub fn kinds(&self) -> impl Iterator<Item = (&str, bool)> + '_ {
        self.actions.iter().map(|(k, d)| (k.as_str(), d.repeat))
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Apply `kind` to `prior`. Returns `None` when the kind is unknown.
    pub fn apply(
        &self,
        kind: &str,
        actor: &ActorId,
        prior: &ActorState,
        ctx: &mut ActionCtx<'_>,
    ) -> Option<ActorState> {
        let def = self.actions.get(kind)?;
        Some((def.apply)(actor, prior, ctx))
    }
}

impl fmt::Debug for ActionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionRegistry")
            .field("kinds", &self.actions.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/actions/registry.rs"]
mod tests;
