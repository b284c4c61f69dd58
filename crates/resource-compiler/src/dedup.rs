//! Resolves type name collisions between composite fields.
//!
//! Composites are built independently of each other, so two blocks which
//! happen to share a name (say, a `rule` block nested in two different
//! parents) end up declaring the same type name. The deduplicator keeps the
//! first claim of every name and renames each later claim by appending its
//! occurrence index, starting at `0`.
//!
//! Collisions are resolved purely by name. Two colliding composites with
//! identical shapes still get distinct names.

use std::collections::HashSet;

use indexmap::IndexMap;
use tracing::debug;

use crate::{Field, ResourceModel, codec::Partition};

/// Identifies a composite by its partition and the child indices leading to
/// it from the partition root.
type FieldAddress = (Partition, Vec<usize>);

/// Renames colliding composite type names in place and returns the number
/// of renames performed. Running it on its own output renames nothing.
pub fn deduplicate(model: &mut ResourceModel) -> usize {
    let claims = collect_claims(model);
    let mut taken: HashSet<String> = claims.keys().cloned().collect();
    let mut renamed = 0;

    for (type_name, addresses) in &claims {
        let mut suffix = 0usize;

        for (partition, path) in addresses.iter().skip(1) {
            let candidate = loop {
                let candidate = format!("{type_name}{suffix}");
                suffix += 1;

                if !taken.contains(&candidate) {
                    break candidate;
                }
            };

            debug!(
                resource_type = %model.resource_type,
                from = %type_name,
                to = %candidate,
                "renaming colliding composite type"
            );

            let field = field_at_mut(model.partition_mut(*partition), path);
            if let Some(composite) = field.as_composite_mut() {
                composite.type_name.clone_from(&candidate);
            }

            taken.insert(candidate);
            renamed += 1;
        }
    }

    renamed
}

/// Collects every claimed type name, depth-first and parents first, desired
/// partition before observed.
fn collect_claims(model: &ResourceModel) -> IndexMap<String, Vec<FieldAddress>> {
    let mut claims = IndexMap::new();

    for partition in [Partition::Desired, Partition::Observed] {
        let mut path = Vec::new();
        collect_at(model.partition(partition), partition, &mut path, &mut claims);
    }

    claims
}

fn collect_at(
    field: &Field,
    partition: Partition,
    path: &mut Vec<usize>,
    claims: &mut IndexMap<String, Vec<FieldAddress>>,
) {
    if let Some(type_name) = field.type_name().filter(|name| !name.is_empty()) {
        claims
            .entry(type_name.to_owned())
            .or_default()
            .push((partition, path.clone()));
    }

    for (i, child) in field.children().iter().enumerate() {
        path.push(i);
        collect_at(child, partition, path, claims);
        path.pop();
    }
}

fn field_at_mut<'a>(root: &'a mut Field, path: &[usize]) -> &'a mut Field {
    path.iter().fold(root, |field, &i| {
        field
            .as_composite_mut()
            .and_then(|composite| composite.children.get_mut(i))
            .expect("internal error: claim addresses point at existing composites")
    })
}
