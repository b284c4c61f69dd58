//! Codec strategies and their interpreter.
//!
//! Every [`Field`](crate::Field) is assigned exactly one [`Codec`] when it is
//! constructed. The same tag drives all three conversion families, which keeps
//! [`encode`], [`decode`] and [`merge`] consistent with each other for any
//! given field.

use provider_schema::NestingMode;

use crate::field::{AttributeKind, ElementKind, FieldKind, PrimitiveKind};

mod decode;
mod encode;
mod merge;
mod value;

pub use decode::{DecodeError, decode};
pub use encode::{EncodeError, encode};
pub use merge::{MergeDescription, Partition, merge};
pub use value::ModelValue;

#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum CollectionKind {
    List,
    Set,
    Map,
}

/// The conversion strategy of a field.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
pub enum Codec {
    /// A single primitive value.
    Primitive(PrimitiveKind),

    /// A list or set of primitives (or of maps of primitives).
    PrimitiveCollection {
        collection: CollectionKind,
        element: ElementKind,
    },

    /// A map with string keys and primitive values.
    PrimitiveMap(PrimitiveKind),

    /// A single object, encoded field by field.
    Composite,

    /// A list, set or map of objects.
    CompositeCollection(CollectionKind),

    /// A single optional object, carried on the wire as a list or set of at
    /// most one element.
    CompositeCollectionSingleton(CollectionKind),

    /// Skipped by every conversion.
    Unsupported,
}

impl Codec {
    pub fn select(kind: &FieldKind, repeated: bool) -> Self {
        match kind {
            FieldKind::Attribute(AttributeKind::Primitive(primitive)) => {
                Self::Primitive(*primitive)
            }
            FieldKind::Attribute(AttributeKind::Map(primitive)) => Self::PrimitiveMap(*primitive),
            FieldKind::Attribute(AttributeKind::List(element)) => Self::PrimitiveCollection {
                collection: CollectionKind::List,
                element: *element,
            },
            FieldKind::Attribute(AttributeKind::Set(element)) => Self::PrimitiveCollection {
                collection: CollectionKind::Set,
                element: *element,
            },
            FieldKind::Attribute(AttributeKind::Unsupported) => Self::Unsupported,
            FieldKind::Composite(composite) => match (composite.nesting, repeated) {
                (NestingMode::Single | NestingMode::Group, _) => Self::Composite,
                (NestingMode::List, true) => Self::CompositeCollection(CollectionKind::List),
                (NestingMode::Set, true) => Self::CompositeCollection(CollectionKind::Set),
                (NestingMode::List, false) => {
                    Self::CompositeCollectionSingleton(CollectionKind::List)
                }
                (NestingMode::Set, false) => {
                    Self::CompositeCollectionSingleton(CollectionKind::Set)
                }
                (NestingMode::Map, _) => Self::CompositeCollection(CollectionKind::Map),
            },
        }
    }

    pub fn is_supported(&self) -> bool {
        !matches!(self, Self::Unsupported)
    }

    /// Leaves are compared as a whole during merges, composites recurse.
    pub fn is_leaf(&self) -> bool {
        matches!(
            self,
            Self::Primitive(_) | Self::PrimitiveCollection { .. } | Self::PrimitiveMap(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use proptest::prelude::*;
    use rstest::rstest;

    use super::*;
    use crate::{Field, field::Composite};

    fn composite(nesting: NestingMode) -> FieldKind {
        FieldKind::Composite(Composite {
            type_name: "Block".to_owned(),
            children: Vec::new(),
            nesting,
        })
    }

    #[rstest]
    #[case(composite(NestingMode::Single), false, Codec::Composite)]
    #[case(composite(NestingMode::Group), false, Codec::Composite)]
    #[case(composite(NestingMode::List), true, Codec::CompositeCollection(CollectionKind::List))]
    #[case(composite(NestingMode::Set), true, Codec::CompositeCollection(CollectionKind::Set))]
    #[case(composite(NestingMode::Map), true, Codec::CompositeCollection(CollectionKind::Map))]
    #[case(composite(NestingMode::List), false, Codec::CompositeCollectionSingleton(CollectionKind::List))]
    #[case(composite(NestingMode::Set), false, Codec::CompositeCollectionSingleton(CollectionKind::Set))]
    #[case(
        FieldKind::Attribute(AttributeKind::Primitive(PrimitiveKind::String)),
        false,
        Codec::Primitive(PrimitiveKind::String)
    )]
    #[case(
        FieldKind::Attribute(AttributeKind::Map(PrimitiveKind::Bool)),
        false,
        Codec::PrimitiveMap(PrimitiveKind::Bool)
    )]
    #[case(
        FieldKind::Attribute(AttributeKind::Set(ElementKind::Map(PrimitiveKind::String))),
        true,
        Codec::PrimitiveCollection { collection: CollectionKind::Set, element: ElementKind::Map(PrimitiveKind::String) }
    )]
    #[case(FieldKind::Attribute(AttributeKind::Unsupported), false, Codec::Unsupported)]
    fn selection(#[case] kind: FieldKind, #[case] repeated: bool, #[case] expected: Codec) {
        assert_eq!(Codec::select(&kind, repeated), expected);
    }

    fn leaf(kind: AttributeKind) -> Field {
        Field::attribute("Value", "value", kind, false)
    }

    fn block(nesting: NestingMode, repeated: bool) -> Field {
        Field::composite(
            "Rule",
            "rule",
            Composite {
                type_name: "Rule".to_owned(),
                children: vec![
                    Field::attribute(
                        "Action",
                        "action",
                        AttributeKind::Primitive(PrimitiveKind::String),
                        false,
                    ),
                    Field::attribute(
                        "Port",
                        "port",
                        AttributeKind::Primitive(PrimitiveKind::Integer),
                        false,
                    ),
                ],
                nesting,
            },
            repeated,
        )
    }

    fn rule(action: &str, port: i64) -> ModelValue {
        ModelValue::object([
            ("Action", ModelValue::from(action)),
            ("Port", ModelValue::from(port)),
        ])
    }

    fn entries(values: impl IntoIterator<Item = (&'static str, ModelValue)>) -> ModelValue {
        ModelValue::Map(values.into_iter().map(|(k, v)| (k.to_owned(), v)).collect())
    }

    #[rstest]
    #[case::bool(leaf(AttributeKind::Primitive(PrimitiveKind::Bool)), ModelValue::Bool(false))]
    #[case::integer(leaf(AttributeKind::Primitive(PrimitiveKind::Integer)), ModelValue::Int(-42))]
    #[case::float(leaf(AttributeKind::Primitive(PrimitiveKind::Float)), ModelValue::Float(0.25))]
    #[case::byte(leaf(AttributeKind::Primitive(PrimitiveKind::Byte)), ModelValue::Byte(255))]
    #[case::string(leaf(AttributeKind::Primitive(PrimitiveKind::String)), ModelValue::from("x"))]
    #[case::primitive_map(
        leaf(AttributeKind::Map(PrimitiveKind::Float)),
        entries([("low", ModelValue::Float(-1.5)), ("high", ModelValue::Float(2.0))])
    )]
    #[case::primitive_list(
        leaf(AttributeKind::List(ElementKind::Primitive(PrimitiveKind::Integer))),
        ModelValue::from(vec![3_i64, 1, 3])
    )]
    #[case::primitive_set(
        leaf(AttributeKind::Set(ElementKind::Primitive(PrimitiveKind::Byte))),
        ModelValue::List(vec![ModelValue::Byte(0), ModelValue::Byte(8)])
    )]
    #[case::list_of_maps(
        leaf(AttributeKind::List(ElementKind::Map(PrimitiveKind::String))),
        ModelValue::List(vec![
            entries([("team", ModelValue::from("infra"))]),
            ModelValue::Map(BTreeMap::new()),
        ])
    )]
    #[case::set_of_maps(
        leaf(AttributeKind::Set(ElementKind::Map(PrimitiveKind::Bool))),
        ModelValue::List(vec![entries([("enabled", ModelValue::Bool(true))])])
    )]
    #[case::single(block(NestingMode::Single, false), rule("allow", 22))]
    #[case::group(block(NestingMode::Group, false), rule("deny", 0))]
    #[case::group_without_fields(
        block(NestingMode::Group, false),
        ModelValue::Object(BTreeMap::new())
    )]
    #[case::composite_list(
        block(NestingMode::List, true),
        ModelValue::List(vec![rule("allow", 80), rule("allow", 443)])
    )]
    #[case::composite_set(block(NestingMode::Set, true), ModelValue::List(vec![rule("deny", 25)]))]
    #[case::composite_map(
        block(NestingMode::Map, true),
        entries([("ssh", rule("allow", 22)), ("smtp", rule("deny", 25))])
    )]
    #[case::singleton_list(block(NestingMode::List, false), rule("allow", 8080))]
    #[case::singleton_set(block(NestingMode::Set, false), rule("deny", 3389))]
    #[case::empty_singleton(block(NestingMode::List, false), ModelValue::Null)]
    fn encode_then_decode(#[case] field: Field, #[case] value: ModelValue) {
        let wire = encode(&field, &value).expect("value encodes");
        assert_eq!(decode(&field, &wire), Ok(value));
    }

    fn rule_strategy() -> impl Strategy<Value = ModelValue> {
        (
            proptest::option::of("[a-z]{0,8}"),
            proptest::option::of(any::<i64>()),
        )
            .prop_map(|(action, port)| {
                let mut fields = BTreeMap::new();
                if let Some(action) = action {
                    fields.insert("Action".to_owned(), ModelValue::from(action));
                }
                if let Some(port) = port {
                    fields.insert("Port".to_owned(), ModelValue::from(port));
                }
                ModelValue::Object(fields)
            })
    }

    proptest! {
        #[test]
        fn composite_collections_round_trip(
            rules in proptest::collection::vec(rule_strategy(), 0..8),
            keyed in proptest::collection::btree_map("[a-z]{1,6}", rule_strategy(), 0..8),
        ) {
            let list = ModelValue::List(rules);
            let field = block(NestingMode::List, true);
            let wire = encode(&field, &list).expect("list encodes");
            prop_assert_eq!(decode(&field, &wire), Ok(list));

            let map = ModelValue::Map(keyed);
            let field = block(NestingMode::Map, true);
            let wire = encode(&field, &map).expect("map encodes");
            prop_assert_eq!(decode(&field, &wire), Ok(map));
        }

        #[test]
        fn finite_floats_round_trip(
            value in any::<f64>().prop_filter("finite", |f| f.is_finite()),
        ) {
            let field = leaf(AttributeKind::Primitive(PrimitiveKind::Float));
            let wire = encode(&field, &ModelValue::Float(value)).expect("finite float encodes");
            prop_assert_eq!(decode(&field, &wire), Ok(ModelValue::Float(value)));
        }
    }
}
