use snafu::{Snafu, ensure};

use crate::{Field, codec::Partition, naming::TypeNames};

#[derive(Debug, PartialEq, Eq, Snafu)]
pub enum ValidationError {
    #[snafu(display("resource model has an empty name"))]
    EmptyName,

    #[snafu(display("resource model {name:?} has an empty package path"))]
    EmptyPackagePath { name: String },
}

/// The compiled form of one provider resource type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResourceModel {
    /// The resource type as named by the provider, for example
    /// `aws_security_group`.
    pub resource_type: String,

    pub package_path: String,
    pub names: TypeNames,

    /// The user-settable partition, a composite named after
    /// [`TypeNames::parameters`].
    pub parameters: Field,

    /// The provider-computed partition, a composite named after
    /// [`TypeNames::observation`].
    pub observation: Field,

    /// The attribute carrying the external identity, excluded from both
    /// partitions.
    pub reserved_identifier: String,
}

impl ResourceModel {
    pub fn name(&self) -> &str {
        &self.names.type_name
    }

    pub fn partition(&self, partition: Partition) -> &Field {
        match partition {
            Partition::Desired => &self.parameters,
            Partition::Observed => &self.observation,
        }
    }

    pub fn partition_mut(&mut self, partition: Partition) -> &mut Field {
        match partition {
            Partition::Desired => &mut self.parameters,
            Partition::Observed => &mut self.observation,
        }
    }

    /// Iterates over every field of both partitions, desired first.
    pub fn fields(&self) -> impl Iterator<Item = &Field> {
        self.parameters.walk().chain(self.observation.walk())
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        ensure!(!self.name().is_empty(), EmptyNameSnafu);
        ensure!(
            !self.package_path.is_empty(),
            EmptyPackagePathSnafu { name: self.name() }
        );
        Ok(())
    }
}
