use std::collections::BTreeMap;

use crate::{
    Field,
    codec::{Codec, CollectionKind, ModelValue},
};

/// Which side of a resource a merged field belongs to. The partition decides
/// which instance wins when the two disagree.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum Partition {
    /// User-settable fields. The desired instance is authoritative.
    Desired,

    /// Provider-computed fields. The observed instance is authoritative.
    Observed,
}

impl Partition {
    /// The wire name of the partition's root field.
    pub fn root_wire_name(self) -> &'static str {
        match self {
            Self::Desired => "forProvider",
            Self::Observed => "atProvider",
        }
    }
}

/// Describes what a merge changed.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MergeDescription {
    /// A desired field differs from what the provider reports, the provider
    /// has to be updated.
    pub needs_provider_update: bool,

    /// An observed field changed, the local status has to be written back.
    pub status_updated: bool,

    /// An unset desired field was filled in from the observed instance.
    pub late_initialized: bool,

    pub annotations_updated: bool,

    /// Any supported field reported an update. Set by every merge, not only
    /// by merges of whole instances.
    pub any_field_updated: bool,

    /// Dotted wire paths of every field which reported an update, leaves
    /// before their parents.
    pub updated_paths: Vec<String>,
}

/// Reconciles the value of `field` in the locally held `desired` instance
/// with the value in the `observed` instance reported by the provider.
///
/// Both values are updated in place so that afterwards the desired instance
/// carries the authoritative status and the observed instance the
/// authoritative configuration. Returns whether anything changed.
pub fn merge(
    field: &Field,
    partition: Partition,
    desired: &mut ModelValue,
    observed: &mut ModelValue,
    md: &mut MergeDescription,
) -> bool {
    merge_at(field, partition, desired, observed, md, &field.wire_name)
}

fn merge_at(
    field: &Field,
    partition: Partition,
    desired: &mut ModelValue,
    observed: &mut ModelValue,
    md: &mut MergeDescription,
    path: &str,
) -> bool {
    let codec = field.codec();
    if !codec.is_supported() {
        return false;
    }

    let updated = match (desired.is_null(), observed.is_null()) {
        (true, true) => false,
        (false, false) if !codec.is_leaf() => match codec {
            Codec::CompositeCollection(_) => {
                merge_collection(field, partition, desired, observed, md, path)
            }
            _ => merge_object(field, partition, desired, observed, md, path),
        },
        _ => merge_whole(codec, partition, desired, observed, md),
    };

    if updated {
        md.any_field_updated = true;
        md.updated_paths.push(path.to_owned());
    }

    updated
}

/// Compares two values as a whole and lets the authoritative one win.
fn merge_whole(
    codec: Codec,
    partition: Partition,
    desired: &mut ModelValue,
    observed: &mut ModelValue,
    md: &mut MergeDescription,
) -> bool {
    if values_equal(codec, desired, observed) {
        return false;
    }

    match partition {
        Partition::Desired if desired.is_null() => {
            *desired = observed.clone();
            md.late_initialized = true;
        }
        Partition::Desired => {
            *observed = desired.clone();
            md.needs_provider_update = true;
        }
        Partition::Observed => {
            *desired = observed.clone();
            md.status_updated = true;
        }
    }

    true
}

/// Collections of different length (or maps with different keys) are
/// replaced as a whole, element-wise reconciliation only happens when their
/// shapes line up.
fn merge_collection(
    field: &Field,
    partition: Partition,
    desired: &mut ModelValue,
    observed: &mut ModelValue,
    md: &mut MergeDescription,
    path: &str,
) -> bool {
    match (desired, observed) {
        (ModelValue::List(d), ModelValue::List(o)) if d.len() == o.len() => {
            let mut any_updated = false;
            for (i, (d, o)) in d.iter_mut().zip(o.iter_mut()).enumerate() {
                any_updated |= merge_object(field, partition, d, o, md, &format!("{path}.{i}"));
            }
            any_updated
        }
        (ModelValue::Map(d), ModelValue::Map(o)) if d.keys().eq(o.keys()) => {
            let mut any_updated = false;
            for ((key, d), o) in d.iter_mut().zip(o.values_mut()) {
                any_updated |= merge_object(field, partition, d, o, md, &format!("{path}.{key}"));
            }
            any_updated
        }
        (desired, observed) => merge_whole(field.codec(), partition, desired, observed, md),
    }
}

fn merge_object(
    field: &Field,
    partition: Partition,
    desired: &mut ModelValue,
    observed: &mut ModelValue,
    md: &mut MergeDescription,
    path: &str,
) -> bool {
    match (desired, observed) {
        (ModelValue::Object(d), ModelValue::Object(o)) => {
            merge_fields(field, partition, d, o, md, path)
        }
        (desired, observed) => merge_whole(Codec::Composite, partition, desired, observed, md),
    }
}

fn merge_fields(
    field: &Field,
    partition: Partition,
    desired: &mut BTreeMap<String, ModelValue>,
    observed: &mut BTreeMap<String, ModelValue>,
    md: &mut MergeDescription,
    path: &str,
) -> bool {
    let mut any_child_updated = false;

    for child in field.children() {
        let mut d = desired.remove(&child.name).unwrap_or_default();
        let mut o = observed.remove(&child.name).unwrap_or_default();

        any_child_updated |= merge_at(
            child,
            partition,
            &mut d,
            &mut o,
            md,
            &format!("{path}.{}", child.wire_name),
        );

        if !d.is_null() {
            desired.insert(child.name.clone(), d);
        }
        if !o.is_null() {
            observed.insert(child.name.clone(), o);
        }
    }

    any_child_updated
}

fn values_equal(codec: Codec, lhs: &ModelValue, rhs: &ModelValue) -> bool {
    match (codec, lhs, rhs) {
        (
            Codec::PrimitiveCollection {
                collection: CollectionKind::Set,
                ..
            },
            ModelValue::List(lhs),
            ModelValue::List(rhs),
        ) => same_elements(lhs, rhs),
        _ => lhs == rhs,
    }
}

/// Order-insensitive comparison, respecting duplicates.
fn same_elements(lhs: &[ModelValue], rhs: &[ModelValue]) -> bool {
    if lhs.len() != rhs.len() {
        return false;
    }

    let mut unmatched: Vec<&ModelValue> = rhs.iter().collect();
    lhs.iter().all(|item| {
        match unmatched.iter().position(|other| *other == item) {
            Some(i) => {
                unmatched.swap_remove(i);
                true
            }
            None => false,
        }
    })
}
