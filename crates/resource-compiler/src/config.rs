use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use snafu::{ResultExt, Snafu, ensure};

use crate::ApiVersion;

type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Snafu)]
pub enum Error {
    #[snafu(display("failed to parse compiler config from YAML"))]
    ParseYaml { source: serde_yaml::Error },

    #[snafu(display("provider name must not be empty"))]
    EmptyProviderName,

    #[snafu(display("reserved identifier must not be empty"))]
    EmptyReservedIdentifier,
}

/// Configuration of a single provider compilation.
///
/// ```yaml
/// providerName: aws
/// apiVersion: v1alpha1
/// packagePath: github.com/example/provider-aws/generated
/// excludeResources:
///   - aws_instance
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CompilerConfig {
    pub provider_name: String,
    pub api_version: ApiVersion,
    pub package_path: String,

    #[serde(default)]
    pub exclude_resources: BTreeSet<String>,

    /// The attribute carrying the external identity of a resource. It is
    /// never part of either partition.
    #[serde(default = "CompilerConfig::default_reserved_identifier")]
    pub reserved_identifier: String,
}

impl CompilerConfig {
    pub fn new(
        provider_name: impl Into<String>,
        api_version: ApiVersion,
        package_path: impl Into<String>,
    ) -> Self {
        Self {
            provider_name: provider_name.into(),
            api_version,
            package_path: package_path.into(),
            exclude_resources: BTreeSet::new(),
            reserved_identifier: Self::default_reserved_identifier(),
        }
    }

    pub fn from_yaml_str(input: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(input).context(ParseYamlSnafu)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(!self.provider_name.is_empty(), EmptyProviderNameSnafu);
        ensure!(
            !self.reserved_identifier.is_empty(),
            EmptyReservedIdentifierSnafu
        );
        Ok(())
    }

    pub fn exclude<I, S>(mut self, resource_types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude_resources
            .extend(resource_types.into_iter().map(Into::into));
        self
    }

    pub fn is_excluded(&self, resource_type: &str) -> bool {
        self.exclude_resources.contains(resource_type)
    }

    fn default_reserved_identifier() -> String {
        "id".to_owned()
    }
}
