use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::WireType;

/// A single attribute of a [`Block`].
///
/// Arguments are attributes which are `required` or `optional`. Attributes
/// which are only `computed` are filled in by the provider and can never be
/// set by the user. An attribute can be both `optional` and `computed`, in
/// which case the provider fills in a value if the user didn't.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Attribute {
    #[serde(rename = "type")]
    pub wire_type: WireType,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default)]
    pub required: bool,

    #[serde(default)]
    pub optional: bool,

    #[serde(default)]
    pub computed: bool,

    #[serde(default)]
    pub sensitive: bool,

    #[serde(default)]
    pub deprecated: bool,
}

impl Attribute {
    pub fn new(wire_type: WireType) -> Self {
        Self {
            wire_type,
            description: None,
            required: false,
            optional: false,
            computed: false,
            sensitive: false,
            deprecated: false,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    pub fn computed(mut self) -> Self {
        self.computed = true;
        self
    }

    pub fn sensitive(mut self) -> Self {
        self.sensitive = true;
        self
    }

    /// Returns whether the user can set this attribute.
    pub fn is_argument(&self) -> bool {
        self.required || self.optional
    }
}

/// Describes how many instances of a nested block are allowed and how they are
/// collected into the parent value.
#[derive(
    Clone,
    Copy,
    Debug,
    Hash,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Deserialize,
    Serialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum NestingMode {
    /// Exactly one instance which may be absent.
    Single,

    /// Exactly one instance which is never absent. Missing blocks are treated
    /// as present with all their attributes unset.
    Group,

    /// An ordered collection of instances.
    List,

    /// An unordered collection of unique instances.
    Set,

    /// A collection of instances keyed by a single label.
    Map,
}

impl NestingMode {
    /// Returns whether instances are collected into a list, set or map.
    pub fn is_collection(&self) -> bool {
        matches!(self, Self::List | Self::Set | Self::Map)
    }
}

/// A block nested inside another block, together with its nesting mode and
/// item bounds. A `max_items` of `0` means unbounded.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct NestedBlock {
    #[serde(rename = "nesting_mode")]
    pub nesting: NestingMode,

    #[serde(default)]
    pub block: Block,

    #[serde(default)]
    pub min_items: u64,

    #[serde(default)]
    pub max_items: u64,
}

impl NestedBlock {
    pub fn new(nesting: NestingMode, block: Block) -> Self {
        Self {
            nesting,
            block,
            min_items: 0,
            max_items: 0,
        }
    }

    pub fn with_bounds(mut self, min_items: u64, max_items: u64) -> Self {
        self.min_items = min_items;
        self.max_items = max_items;
        self
    }

    /// A block is required if at least one instance must be present.
    pub fn is_required(&self) -> bool {
        self.min_items > 0
    }
}

/// A configuration block made up of attributes and nested blocks.
///
/// Both maps are ordered by name, which makes every traversal of a block
/// deterministic.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Block {
    #[serde(default)]
    pub attributes: BTreeMap<String, Attribute>,

    #[serde(default)]
    pub block_types: BTreeMap<String, NestedBlock>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default)]
    pub deprecated: bool,
}

impl Block {
    pub fn with_attribute(mut self, name: impl Into<String>, attribute: Attribute) -> Self {
        self.attributes.insert(name.into(), attribute);
        self
    }

    pub fn with_block(mut self, name: impl Into<String>, block: NestedBlock) -> Self {
        self.block_types.insert(name.into(), block);
        self
    }

    /// Returns the wire type a value of this block has, nested blocks included.
    pub fn implied_type(&self) -> WireType {
        let mut attributes: BTreeMap<_, _> = self
            .attributes
            .iter()
            .map(|(name, attribute)| (name.clone(), attribute.wire_type.clone()))
            .collect();

        for (name, nested) in &self.block_types {
            let child = nested.block.implied_type();
            let ty = match nested.nesting {
                NestingMode::Single | NestingMode::Group => child,
                NestingMode::List => WireType::list(child),
                NestingMode::Set => WireType::set(child),
                NestingMode::Map => WireType::map(child),
            };

            attributes.insert(name.clone(), ty);
        }

        WireType::Object(attributes)
    }
}

/// The schema of a single resource type.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct ResourceSchema {
    #[serde(default)]
    pub version: i64,

    #[serde(default)]
    pub block: Block,
}

impl ResourceSchema {
    pub fn new(block: Block) -> Self {
        Self { version: 0, block }
    }
}

/// Everything a single provider declares: its own configuration schema plus
/// the schemas of all managed resource types and data sources.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct ProviderSchema {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<ResourceSchema>,

    #[serde(default)]
    pub resource_schemas: BTreeMap<String, ResourceSchema>,

    #[serde(default)]
    pub data_source_schemas: BTreeMap<String, ResourceSchema>,
}

impl ProviderSchema {
    pub fn with_resource(mut self, name: impl Into<String>, schema: ResourceSchema) -> Self {
        self.resource_schemas.insert(name.into(), schema);
        self
    }
}

/// The top-level schema document, keyed by provider source address.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct SchemaDocument {
    #[serde(default)]
    pub format_version: String,

    #[serde(default)]
    pub provider_schemas: BTreeMap<String, ProviderSchema>,
}
