use std::collections::BTreeMap;

use provider_schema::WireValue;
use snafu::{ResultExt, Snafu};

use crate::{
    ResourceModel,
    codec::{self, DecodeError, EncodeError, MergeDescription, ModelValue, Partition},
};

#[derive(Debug, PartialEq, Eq, Snafu)]
pub enum InstanceError {
    #[snafu(display("failed to encode the {partition} partition"))]
    EncodePartition {
        source: EncodeError,
        partition: Partition,
    },

    #[snafu(display("failed to decode the {partition} partition"))]
    DecodePartition {
        source: DecodeError,
        partition: Partition,
    },

    #[snafu(display("expected the encoded {partition} partition to be an object"))]
    PartitionNotAnObject { partition: Partition },

    #[snafu(display("expected the wire state to be an object, got a {found}"))]
    StateNotAnObject { found: &'static str },
}

/// One concrete resource as held in the model: its identity, both partition
/// values and free-form annotations.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ResourceInstance {
    /// The identity the provider knows the resource by. Empty until the
    /// provider has assigned one.
    pub external_name: String,

    pub parameters: ModelValue,
    pub observation: ModelValue,
    pub annotations: BTreeMap<String, String>,
}

impl ResourceInstance {
    pub fn new(external_name: impl Into<String>) -> Self {
        Self {
            external_name: external_name.into(),
            ..Self::default()
        }
    }

    pub fn with_parameters(mut self, parameters: ModelValue) -> Self {
        self.parameters = parameters;
        self
    }

    pub fn with_observation(mut self, observation: ModelValue) -> Self {
        self.observation = observation;
        self
    }

    pub fn with_annotation(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.annotations.insert(key.into(), value.into());
        self
    }
}

impl ResourceModel {
    /// Encodes both partitions of `instance` into a single wire object,
    /// together with the reserved identifier.
    pub fn encode(&self, instance: &ResourceInstance) -> Result<WireValue, InstanceError> {
        let empty = ModelValue::Object(BTreeMap::new());
        let mut attributes = BTreeMap::new();

        for (partition, value) in [
            (Partition::Desired, &instance.parameters),
            (Partition::Observed, &instance.observation),
        ] {
            let value = if value.is_null() { &empty } else { value };

            match codec::encode(self.partition(partition), value)
                .context(EncodePartitionSnafu { partition })?
            {
                WireValue::Object(encoded) => attributes.extend(encoded),
                _ => return PartitionNotAnObjectSnafu { partition }.fail(),
            }
        }

        let identifier = if instance.external_name.is_empty() {
            WireValue::Null
        } else {
            WireValue::string(&instance.external_name)
        };
        attributes.insert(self.reserved_identifier.clone(), identifier);

        Ok(WireValue::Object(attributes))
    }

    /// Decodes wire state on top of `previous`, replacing both partitions.
    /// A non-empty reserved identifier becomes the new external name, all
    /// other properties of `previous` are kept.
    pub fn decode(
        &self,
        state: &WireValue,
        previous: &ResourceInstance,
    ) -> Result<ResourceInstance, InstanceError> {
        if !matches!(state, WireValue::Object(_)) {
            return StateNotAnObjectSnafu { found: state.kind() }.fail();
        }

        let mut instance = previous.clone();
        instance.parameters = codec::decode(&self.parameters, state)
            .context(DecodePartitionSnafu { partition: Partition::Desired })?;
        instance.observation = codec::decode(&self.observation, state)
            .context(DecodePartitionSnafu { partition: Partition::Observed })?;

        if let Some(identifier) = state
            .get(&self.reserved_identifier)
            .and_then(WireValue::as_str)
            .filter(|id| !id.is_empty())
        {
            identifier.clone_into(&mut instance.external_name);
        }

        Ok(instance)
    }

    /// Merges the locally held `desired` instance with the `observed`
    /// instance decoded from the provider, see [`codec::merge`].
    ///
    /// Annotations present on the observed instance are copied over to the
    /// desired one.
    pub fn merge(
        &self,
        desired: &mut ResourceInstance,
        observed: &mut ResourceInstance,
    ) -> MergeDescription {
        let mut md = MergeDescription::default();

        codec::merge(
            &self.parameters,
            Partition::Desired,
            &mut desired.parameters,
            &mut observed.parameters,
            &mut md,
        );
        codec::merge(
            &self.observation,
            Partition::Observed,
            &mut desired.observation,
            &mut observed.observation,
            &mut md,
        );

        for (key, value) in &observed.annotations {
            if desired.annotations.get(key) != Some(value) {
                desired.annotations.insert(key.clone(), value.clone());
                md.annotations_updated = true;
            }
        }

        md
    }
}
