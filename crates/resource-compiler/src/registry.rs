//! Batch compilation of a whole provider.
//!
//! [`compile_provider`] compiles every resource type of a provider once and
//! returns an explicit [`Registry`] of the results, which callers pass around
//! by reference to encode, decode and merge instances by resource type name.

use std::collections::BTreeMap;

use provider_schema::{ProviderSchema, WireValue};
use snafu::{OptionExt, ResultExt, Snafu};
use tracing::{debug, info, instrument, warn};

use crate::{
    ApiVersion, Assembler, CompilerConfig, ProviderResourceNamer, ResourceInstance,
    ResourceModel, assemble,
    codec::MergeDescription,
    instance::InstanceError,
    naming::{self, ResourceNamer},
    optimize::OptimizerChain,
};

type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, PartialEq, Eq, Snafu)]
pub enum Error {
    #[snafu(display("resource type {resource_type:?} is not registered"))]
    UnknownResourceType { resource_type: String },

    #[snafu(display("failed to convert an instance of resource type {resource_type:?}"))]
    Instance {
        source: InstanceError,
        resource_type: String,
    },
}

/// Why a single resource type failed to compile.
#[derive(Debug, PartialEq, Eq, Snafu)]
pub enum CompileError {
    #[snafu(display("failed to name resource type"))]
    Naming { source: naming::Error },

    #[snafu(display("failed to assemble resource model"))]
    Assemble { source: assemble::Error },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RegistryEntry {
    pub model: ResourceModel,
    pub kind: String,
    pub api_group: String,
    pub api_version: ApiVersion,
}

/// All compiled resource types of one provider, keyed by resource type.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Registry {
    entries: BTreeMap<String, RegistryEntry>,
}

impl Registry {
    pub fn get(&self, resource_type: &str) -> Option<&RegistryEntry> {
        self.entries.get(resource_type)
    }

    pub fn resource_types(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn model(&self, resource_type: &str) -> Result<&ResourceModel> {
        self.get(resource_type)
            .map(|entry| &entry.model)
            .context(UnknownResourceTypeSnafu { resource_type })
    }

    pub fn encode(&self, resource_type: &str, instance: &ResourceInstance) -> Result<WireValue> {
        self.model(resource_type)?
            .encode(instance)
            .context(InstanceSnafu { resource_type })
    }

    pub fn decode(
        &self,
        resource_type: &str,
        state: &WireValue,
        previous: &ResourceInstance,
    ) -> Result<ResourceInstance> {
        self.model(resource_type)?
            .decode(state, previous)
            .context(InstanceSnafu { resource_type })
    }

    pub fn merge(
        &self,
        resource_type: &str,
        desired: &mut ResourceInstance,
        observed: &mut ResourceInstance,
    ) -> Result<MergeDescription> {
        Ok(self.model(resource_type)?.merge(desired, observed))
    }
}

/// The outcome of compiling a provider, per resource type.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct CompileReport {
    pub compiled: Vec<String>,
    pub excluded: Vec<String>,
    pub failed: BTreeMap<String, CompileError>,

    /// Schema paths of fields that were skipped because their type has no
    /// model representation.
    pub unsupported: BTreeMap<String, Vec<String>>,
}

impl CompileReport {
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty() && self.unsupported.is_empty()
    }
}

/// Compiles every resource type of `provider` and runs the default
/// [`OptimizerChain`] over each model.
pub fn compile_provider(
    provider: &ProviderSchema,
    config: &CompilerConfig,
) -> (Registry, CompileReport) {
    compile_provider_with(provider, config, &OptimizerChain::default())
}

/// Like [`compile_provider`], with a custom optimizer chain.
///
/// A resource type which fails to compile is recorded in the report and
/// doesn't affect any other resource type.
#[instrument(skip_all, fields(provider = %config.provider_name))]
pub fn compile_provider_with(
    provider: &ProviderSchema,
    config: &CompilerConfig,
    optimizers: &OptimizerChain,
) -> (Registry, CompileReport) {
    let assembler = Assembler::from_config(config);
    let mut registry = Registry::default();
    let mut report = CompileReport::default();

    for (resource_type, schema) in &provider.resource_schemas {
        if config.is_excluded(resource_type) {
            warn!(%resource_type, "resource type is excluded, skipping");
            report.excluded.push(resource_type.clone());
            continue;
        }

        let entry = ProviderResourceNamer::try_new(
            &config.provider_name,
            resource_type,
            config.api_version,
        )
        .context(NamingSnafu)
        .and_then(|namer| {
            let mut model = assembler
                .assemble(resource_type, schema, &namer)
                .context(AssembleSnafu)?;
            optimizers.run(&mut model);

            Ok(RegistryEntry {
                kind: namer.type_name(),
                api_group: namer.api_group(),
                api_version: namer.api_version(),
                model,
            })
        });

        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                warn!(
                    %resource_type,
                    error = &err as &dyn std::error::Error,
                    "failed to compile resource type"
                );
                report.failed.insert(resource_type.clone(), err);
                continue;
            }
        };

        let unsupported: Vec<String> = entry
            .model
            .fields()
            .filter(|field| field.is_unsupported())
            .map(|field| field.schema_path.clone())
            .collect();
        if !unsupported.is_empty() {
            report.unsupported.insert(resource_type.clone(), unsupported);
        }

        debug!(%resource_type, kind = %entry.kind, "compiled resource type");
        report.compiled.push(resource_type.clone());
        registry.entries.insert(resource_type.clone(), entry);
    }

    info!(
        compiled = report.compiled.len(),
        excluded = report.excluded.len(),
        failed = report.failed.len(),
        "compiled provider"
    );

    (registry, report)
}
