use std::collections::BTreeMap;

use provider_schema::NestedBlock;

use crate::{
    field::{Composite, Field},
    mapper::map_attribute,
    naming::field_name,
};

/// Returns whether a nested block holds more than one value, which is the
/// case unless it is bounded to exactly one item. A `max_items` of `0` means
/// unbounded.
///
/// The flag doesn't depend on the nesting mode. Single and group blocks still
/// encode as plain objects, see [`Codec::select`](crate::codec::Codec::select).
pub fn is_repeated(max_items: u64) -> bool {
    max_items != 1
}

/// Maps every nested block to a composite field. Children of each composite
/// are the block's attributes followed by its own nested blocks.
pub fn walk_blocks(blocks: &BTreeMap<String, NestedBlock>, parent_path: &str) -> Vec<Field> {
    blocks
        .iter()
        .map(|(name, nested)| walk_block(name, nested, parent_path))
        .collect()
}

fn walk_block(name: &str, nested: &NestedBlock, parent_path: &str) -> Field {
    let type_name = field_name(name);
    let schema_path = format!("{parent_path}_{type_name}");

    let mut children: Vec<_> = nested
        .block
        .attributes
        .iter()
        .map(|(child, attribute)| map_attribute(child, attribute, &schema_path))
        .collect();
    children.extend(walk_blocks(&nested.block.block_types, &schema_path));

    let required = nested.is_required();

    Field::composite(
        type_name.clone(),
        name,
        Composite {
            type_name,
            children,
            nesting: nested.nesting,
        },
        is_repeated(nested.max_items),
    )
    .with_flags(required, !required, false)
    .with_schema_path(schema_path)
}

#[cfg(test)]
mod tests {
    use provider_schema::{Attribute, Block, NestingMode, WireType};
    use rstest::rstest;

    use super::*;
    use crate::codec::{Codec, CollectionKind};

    #[rstest]
    #[case(NestingMode::List, 0, true, Codec::CompositeCollection(CollectionKind::List))]
    #[case(NestingMode::List, 1, false, Codec::CompositeCollectionSingleton(CollectionKind::List))]
    #[case(NestingMode::Set, 1, false, Codec::CompositeCollectionSingleton(CollectionKind::Set))]
    #[case(NestingMode::Set, 5, true, Codec::CompositeCollection(CollectionKind::Set))]
    #[case(NestingMode::Map, 0, true, Codec::CompositeCollection(CollectionKind::Map))]
    #[case(NestingMode::Map, 1, false, Codec::CompositeCollection(CollectionKind::Map))]
    #[case(NestingMode::Single, 0, true, Codec::Composite)]
    #[case(NestingMode::Single, 1, false, Codec::Composite)]
    #[case(NestingMode::Group, 0, true, Codec::Composite)]
    fn repeated_flag(
        #[case] nesting: NestingMode,
        #[case] max_items: u64,
        #[case] repeated: bool,
        #[case] codec: Codec,
    ) {
        let blocks = BTreeMap::from([(
            "block".to_owned(),
            NestedBlock::new(nesting, Block::default()).with_bounds(0, max_items),
        )]);

        let fields = walk_blocks(&blocks, "Group");

        assert_eq!(is_repeated(max_items), repeated);
        assert_eq!(fields[0].repeated, repeated);
        assert_eq!(fields[0].codec(), codec);
    }

    #[rstest]
    #[case(0, 0, false, true)]
    #[case(0, 1, false, false)]
    #[case(1, 1, true, false)]
    #[case(0, 5, false, true)]
    fn bounds(#[case] min: u64, #[case] max: u64, #[case] required: bool, #[case] repeated: bool) {
        let blocks = BTreeMap::from([(
            "rule".to_owned(),
            NestedBlock::new(NestingMode::List, Block::default()).with_bounds(min, max),
        )]);

        let fields = walk_blocks(&blocks, "Group");

        assert_eq!(fields[0].required, required);
        assert_eq!(fields[0].repeated, repeated);
    }

    #[test]
    fn attributes_before_nested_blocks() {
        let block = Block::default()
            .with_attribute("zone", Attribute::new(WireType::String).required())
            .with_block(
                "action",
                NestedBlock::new(
                    NestingMode::Single,
                    Block::default().with_attribute("type", Attribute::new(WireType::String)),
                ),
            );
        let blocks = BTreeMap::from([(
            "timeouts".to_owned(),
            NestedBlock::new(NestingMode::List, block).with_bounds(0, 1),
        )]);

        let fields = walk_blocks(&blocks, "Lb_LbSpec_LbParameters");
        let timeouts = &fields[0];

        let children: Vec<_> = timeouts.children().iter().map(|c| c.wire_name.as_str()).collect();
        assert_eq!(children, ["zone", "action"]);
        assert_eq!(
            timeouts.codec(),
            Codec::CompositeCollectionSingleton(CollectionKind::List)
        );
        assert_eq!(
            timeouts.find("action.type").map(|f| f.schema_path.as_str()),
            Some("Lb_LbSpec_LbParameters_Timeouts_Action_type")
        );
        assert!(timeouts.find("zone").is_some_and(|f| f.required));
    }
}
