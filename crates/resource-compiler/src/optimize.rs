use tracing::debug;

use crate::{ResourceModel, dedup::deduplicate};

/// A pass rewriting an assembled [`ResourceModel`] in place.
pub trait Optimizer {
    fn name(&self) -> &'static str;

    fn optimize(&self, model: &mut ResourceModel);
}

/// Renames colliding composite type names, see [`deduplicate`].
#[derive(Clone, Copy, Debug, Default)]
pub struct Deduplicator;

impl Optimizer for Deduplicator {
    fn name(&self) -> &'static str {
        "deduplicate"
    }

    fn optimize(&self, model: &mut ResourceModel) {
        let renamed = deduplicate(model);
        debug!(renamed, "deduplicated composite type names");
    }
}

/// Applies a sequence of [`Optimizer`]s in order.
///
/// The default chain only deduplicates.
pub struct OptimizerChain {
    passes: Vec<Box<dyn Optimizer>>,
}

impl OptimizerChain {
    /// A chain without any passes.
    pub fn empty() -> Self {
        Self { passes: Vec::new() }
    }

    pub fn with(mut self, pass: impl Optimizer + 'static) -> Self {
        self.passes.push(Box::new(pass));
        self
    }

    pub fn pass_names(&self) -> Vec<&'static str> {
        self.passes.iter().map(|pass| pass.name()).collect()
    }

    pub fn run(&self, model: &mut ResourceModel) {
        for pass in &self.passes {
            debug!(pass = pass.name(), resource_type = %model.resource_type, "running optimizer");
            pass.optimize(model);
        }
    }
}

impl Default for OptimizerChain {
    fn default() -> Self {
        Self::empty().with(Deduplicator)
    }
}

impl std::fmt::Debug for OptimizerChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OptimizerChain")
            .field("passes", &self.pass_names())
            .finish()
    }
}
