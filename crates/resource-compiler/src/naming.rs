//! Naming conventions for the types generated for a resource.
//!
//! Every resource compiles to a handful of named types: the resource kind
//! itself, its list type, the spec and status types and the two partition
//! types nested inside them. A [`ResourceNamer`] derives all of these from
//! a single base name.

use std::sync::LazyLock;

use convert_case::{Case, Casing};
use regex::Regex;
use snafu::{OptionExt, Snafu, ensure};

use crate::ApiVersion;

static TYPE_NAME_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Z][A-Za-z0-9]*$").expect("failed to compile type name regex")
});

type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, PartialEq, Eq, Snafu)]
pub enum Error {
    #[snafu(display("resource type {resource_type:?} is not prefixed with provider {provider:?}"))]
    MissingPrefix {
        provider: String,
        resource_type: String,
    },

    #[snafu(display("resource type {resource_type:?} has no name after the provider prefix"))]
    EmptyName { resource_type: String },

    #[snafu(display(
        "{name:?} is not a valid type name, expected an identifier starting with an uppercase letter"
    ))]
    InvalidTypeName { name: String },
}

/// Derives the type names of a single resource.
///
/// Only [`type_name`](ResourceNamer::type_name) has to be provided, all other
/// names are suffixed versions of it.
pub trait ResourceNamer {
    fn type_name(&self) -> String;

    fn list_type_name(&self) -> String {
        format!("{}List", self.type_name())
    }

    fn spec_type_name(&self) -> String {
        format!("{}Spec", self.type_name())
    }

    fn status_type_name(&self) -> String {
        format!("{}Status", self.type_name())
    }

    /// The type of the desired partition, nested inside the spec.
    fn parameters_type_name(&self) -> String {
        format!("{}Parameters", self.type_name())
    }

    /// The type of the observed partition, nested inside the status.
    fn observation_type_name(&self) -> String {
        format!("{}Observation", self.type_name())
    }
}

/// Names types after an already stripped resource name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DefaultNamer {
    type_name: String,
}

impl DefaultNamer {
    pub fn new(name: &str) -> Self {
        Self {
            type_name: name.to_case(Case::Pascal),
        }
    }
}

impl ResourceNamer for DefaultNamer {
    fn type_name(&self) -> String {
        self.type_name.clone()
    }
}

/// Names types after a provider resource type, for example
/// `aws_iam_user`, with the provider prefix removed.
///
/// ```
/// use resource_compiler::{ApiVersion, ProviderResourceNamer, ResourceNamer};
///
/// let namer = ProviderResourceNamer::try_new("aws", "aws_iam_user", ApiVersion::new(1, None))
///     .expect("resource type has the provider prefix");
///
/// assert_eq!(namer.type_name(), "IamUser");
/// assert_eq!(namer.api_group(), "iam-user.terraform-provider-aws.crossplane.io");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProviderResourceNamer {
    provider: String,
    resource_type: String,
    package_name: String,
    api_version: ApiVersion,
}

impl ProviderResourceNamer {
    /// The provider may be given with or without its trailing underscore,
    /// `aws` and `aws_` strip the same prefix.
    pub fn try_new(provider: &str, resource_type: &str, api_version: ApiVersion) -> Result<Self> {
        let provider = provider.trim_end_matches('_');
        let package_name = resource_type
            .strip_prefix(provider)
            .and_then(|rest| rest.strip_prefix('_'))
            .context(MissingPrefixSnafu {
                provider,
                resource_type,
            })?;

        ensure!(!package_name.is_empty(), EmptyNameSnafu { resource_type });

        Ok(Self {
            provider: provider.to_owned(),
            resource_type: resource_type.to_owned(),
            package_name: package_name.to_owned(),
            api_version,
        })
    }

    pub fn resource_type(&self) -> &str {
        &self.resource_type
    }

    /// The resource type with the provider prefix removed.
    pub fn package_name(&self) -> &str {
        &self.package_name
    }

    pub fn api_group(&self) -> String {
        format!(
            "{}.terraform-provider-{}.crossplane.io",
            self.package_name.from_case(Case::Snake).to_case(Case::Kebab),
            self.provider
        )
    }

    pub fn api_version(&self) -> ApiVersion {
        self.api_version
    }
}

impl ResourceNamer for ProviderResourceNamer {
    fn type_name(&self) -> String {
        self.package_name.to_case(Case::Pascal)
    }
}

/// All type names of one resource, resolved and validated once.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypeNames {
    pub type_name: String,
    pub list: String,
    pub spec: String,
    pub status: String,
    pub parameters: String,
    pub observation: String,
}

impl TypeNames {
    pub fn try_from_namer(namer: &dyn ResourceNamer) -> Result<Self> {
        let names = Self {
            type_name: namer.type_name(),
            list: namer.list_type_name(),
            spec: namer.spec_type_name(),
            status: namer.status_type_name(),
            parameters: namer.parameters_type_name(),
            observation: namer.observation_type_name(),
        };

        for name in [
            &names.type_name,
            &names.list,
            &names.spec,
            &names.status,
            &names.parameters,
            &names.observation,
        ] {
            validate_type_name(name)?;
        }

        Ok(names)
    }
}

pub fn validate_type_name(name: &str) -> Result<()> {
    ensure!(TYPE_NAME_REGEX.is_match(name), InvalidTypeNameSnafu { name });
    Ok(())
}

/// Turns a provider attribute name into the identifier used in the model.
pub fn field_name(wire_name: &str) -> String {
    wire_name.to_case(Case::Pascal)
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn v1alpha1() -> ApiVersion {
        "v1alpha1".parse().expect("valid API version")
    }

    #[rstest]
    #[case("aws", "aws_iam_user", "IamUser", "iam_user")]
    #[case("aws_", "aws_iam_user", "IamUser", "iam_user")]
    #[case("aws", "aws_longer_resource_name", "LongerResourceName", "longer_resource_name")]
    #[case("google", "google_service_account", "ServiceAccount", "service_account")]
    fn provider_names(
        #[case] provider: &str,
        #[case] resource_type: &str,
        #[case] type_name: &str,
        #[case] package_name: &str,
    ) {
        let namer = ProviderResourceNamer::try_new(provider, resource_type, v1alpha1())
            .expect("resource type has the provider prefix");

        assert_eq!(namer.type_name(), type_name);
        assert_eq!(namer.package_name(), package_name);
        assert_eq!(namer.list_type_name(), format!("{type_name}List"));
    }

    #[rstest]
    #[case("aws", "google_service_account", Error::MissingPrefix { provider: "aws".to_owned(), resource_type: "google_service_account".to_owned() })]
    #[case("aws", "awsiam_user", Error::MissingPrefix { provider: "aws".to_owned(), resource_type: "awsiam_user".to_owned() })]
    #[case("aws", "aws_", Error::EmptyName { resource_type: "aws_".to_owned() })]
    fn invalid_provider_names(
        #[case] provider: &str,
        #[case] resource_type: &str,
        #[case] expected: Error,
    ) {
        let err = ProviderResourceNamer::try_new(provider, resource_type, v1alpha1())
            .expect_err("resource type can't be named");

        assert_eq!(err, expected);
    }

    #[test]
    fn api_group() {
        let namer = ProviderResourceNamer::try_new("aws_", "aws_s3_bucket_policy", v1alpha1())
            .expect("resource type has the provider prefix");

        assert_eq!(
            namer.api_group(),
            "s3-bucket-policy.terraform-provider-aws.crossplane.io"
        );
        assert_eq!(namer.api_version().to_string(), "v1alpha1");
    }

    #[test]
    fn default_type_names() {
        let names = TypeNames::try_from_namer(&DefaultNamer::new("security_group"))
            .expect("valid type names");

        assert_eq!(
            names,
            TypeNames {
                type_name: "SecurityGroup".to_owned(),
                list: "SecurityGroupList".to_owned(),
                spec: "SecurityGroupSpec".to_owned(),
                status: "SecurityGroupStatus".to_owned(),
                parameters: "SecurityGroupParameters".to_owned(),
                observation: "SecurityGroupObservation".to_owned(),
            }
        );
    }

    #[rstest]
    #[case("")]
    #[case("lowercase")]
    #[case("With Space")]
    #[case("9Lives")]
    fn invalid_type_names(#[case] name: &str) {
        validate_type_name(name).expect_err("invalid type name");
    }

    #[rstest]
    #[case("name", "Name")]
    #[case("cidr_blocks", "CidrBlocks")]
    #[case("meandering_long_field_name", "MeanderingLongFieldName")]
    fn field_names(#[case] wire_name: &str, #[case] expected: &str) {
        assert_eq!(field_name(wire_name), expected);
    }
}
