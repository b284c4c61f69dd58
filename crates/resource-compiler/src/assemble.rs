use std::collections::BTreeMap;

use provider_schema::{Attribute, NestingMode, ResourceSchema};
use snafu::{ResultExt, Snafu};
use tracing::{debug, instrument};

use crate::{
    CompilerConfig, Field, ResourceModel,
    codec::Partition,
    field::Composite,
    mapper::map_attribute,
    model::ValidationError,
    naming::{self, ResourceNamer, TypeNames},
    walker::walk_blocks,
};

type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, PartialEq, Eq, Snafu)]
pub enum Error {
    #[snafu(display("failed to derive type names for resource type {resource_type:?}"))]
    Naming {
        source: naming::Error,
        resource_type: String,
    },

    #[snafu(display("assembled an invalid model for resource type {resource_type:?}"))]
    InvalidModel {
        source: ValidationError,
        resource_type: String,
    },
}

/// Decides which partition a top-level attribute belongs to. Arguments are
/// desired, everything the provider computes on its own is observed.
pub fn classify(attribute: &Attribute) -> Partition {
    if attribute.is_argument() {
        Partition::Desired
    } else {
        Partition::Observed
    }
}

/// Builds [`ResourceModel`]s from resource schemas.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Assembler {
    package_path: String,
    reserved_identifier: String,
}

impl Assembler {
    pub fn new(package_path: impl Into<String>) -> Self {
        Self {
            package_path: package_path.into(),
            reserved_identifier: "id".to_owned(),
        }
    }

    pub fn from_config(config: &CompilerConfig) -> Self {
        Self::new(config.package_path.clone())
            .with_reserved_identifier(config.reserved_identifier.clone())
    }

    pub fn with_reserved_identifier(mut self, reserved_identifier: impl Into<String>) -> Self {
        self.reserved_identifier = reserved_identifier.into();
        self
    }

    /// Splits the top-level attributes into the two partitions and attaches
    /// all nested blocks to the desired one.
    ///
    /// Attributes with unsupported types don't fail assembly, they end up as
    /// unsupported fields. Only naming failures are fatal.
    #[instrument(skip(self, schema, namer))]
    pub fn assemble(
        &self,
        resource_type: &str,
        schema: &ResourceSchema,
        namer: &dyn ResourceNamer,
    ) -> Result<ResourceModel> {
        let names = TypeNames::try_from_namer(namer).context(NamingSnafu { resource_type })?;

        let desired_path = format!("{}_{}_{}", names.type_name, names.spec, names.parameters);
        let observed_path = format!("{}_{}_{}", names.type_name, names.status, names.observation);

        let (mut desired, observed) =
            self.partition_attributes(&schema.block.attributes, &desired_path, &observed_path);
        desired.extend(walk_blocks(&schema.block.block_types, &desired_path));

        debug!(
            desired = desired.len(),
            observed = observed.len(),
            "partitioned top-level fields"
        );

        let parameters = partition_root(Partition::Desired, names.parameters.clone(), desired)
            .with_schema_path(desired_path);
        let observation = partition_root(Partition::Observed, names.observation.clone(), observed)
            .with_schema_path(observed_path);

        let model = ResourceModel {
            resource_type: resource_type.to_owned(),
            package_path: self.package_path.clone(),
            names,
            parameters,
            observation,
            reserved_identifier: self.reserved_identifier.clone(),
        };

        model.validate().context(InvalidModelSnafu { resource_type })?;
        Ok(model)
    }

    fn partition_attributes(
        &self,
        attributes: &BTreeMap<String, Attribute>,
        desired_path: &str,
        observed_path: &str,
    ) -> (Vec<Field>, Vec<Field>) {
        let mut desired = Vec::new();
        let mut observed = Vec::new();

        for (name, attribute) in attributes {
            if *name == self.reserved_identifier {
                continue;
            }

            match classify(attribute) {
                Partition::Desired => desired.push(map_attribute(name, attribute, desired_path)),
                Partition::Observed => observed.push(map_attribute(name, attribute, observed_path)),
            }
        }

        (desired, observed)
    }
}

fn partition_root(partition: Partition, type_name: String, children: Vec<Field>) -> Field {
    let wire_name = partition.root_wire_name();

    Field::composite(
        naming::field_name(wire_name),
        wire_name,
        Composite {
            type_name,
            children,
            nesting: NestingMode::Single,
        },
        false,
    )
}
