//! Read-only traversals over provider schemas.
//!
//! These are used to survey which nesting shapes a provider actually uses
//! before deciding how to compile them, for example how many blocks are
//! singleton collections or which resource types have no nested blocks at
//! all.

use std::{collections::BTreeMap, fmt};

use crate::{Block, NestedBlock, NestingMode, ProviderSchema};

/// Walks every nested block below `block` depth-first, parents before their
/// children. The visitor receives the names leading to the block, the block's
/// own name included.
pub fn visit_blocks<'a, F>(block: &'a Block, visitor: &mut F)
where
    F: FnMut(&[&'a str], &'a NestedBlock),
{
    let mut path = Vec::new();
    visit_blocks_at(block, &mut path, visitor);
}

fn visit_blocks_at<'a, F>(block: &'a Block, path: &mut Vec<&'a str>, visitor: &mut F)
where
    F: FnMut(&[&'a str], &'a NestedBlock),
{
    for (name, nested) in &block.block_types {
        path.push(name);
        visitor(path, nested);
        visit_blocks_at(&nested.block, path, visitor);
        path.pop();
    }
}

/// The shape of a nested block as far as compilation is concerned.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct NestingSignature {
    pub mode: NestingMode,
    pub min_items: u64,
    pub max_items: u64,
    pub required: bool,
}

impl From<&NestedBlock> for NestingSignature {
    fn from(nested: &NestedBlock) -> Self {
        Self {
            mode: nested.nesting,
            min_items: nested.min_items,
            max_items: nested.max_items,
            required: nested.is_required(),
        }
    }
}

impl fmt::Display for NestingSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{mode} [{min}..{max}]{required}",
            mode = self.mode,
            min = self.min_items,
            max = self.max_items,
            required = if self.required { " required" } else { "" }
        )
    }
}

/// Groups the dotted paths (`<resource type>.<block>.<block>`) of all nested
/// blocks of a provider by their [`NestingSignature`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NestingSurvey(BTreeMap<NestingSignature, Vec<String>>);

impl NestingSurvey {
    pub fn of(provider: &ProviderSchema) -> Self {
        let mut survey = Self::default();

        for (resource_type, schema) in &provider.resource_schemas {
            visit_blocks(&schema.block, &mut |path, nested| {
                survey
                    .0
                    .entry(NestingSignature::from(nested))
                    .or_default()
                    .push(format!("{resource_type}.{}", path.join(".")));
            });
        }

        survey
    }

    pub fn signatures(&self) -> impl Iterator<Item = &NestingSignature> {
        self.0.keys()
    }

    pub fn paths(&self, signature: &NestingSignature) -> &[String] {
        self.0.get(signature).map_or(&[], Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Lists the resource types whose schema has no nested blocks.
pub fn flat_resources(provider: &ProviderSchema) -> Vec<&str> {
    provider
        .resource_schemas
        .iter()
        .filter(|(_, schema)| schema.block.block_types.is_empty())
        .map(|(name, _)| name.as_str())
        .collect()
}
