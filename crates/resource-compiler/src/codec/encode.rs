use std::collections::BTreeMap;

use provider_schema::WireValue;
use serde_json::Number;
use snafu::{OptionExt, Snafu};

use crate::{
    Field,
    codec::{Codec, CollectionKind, ModelValue},
    field::{ElementKind, PrimitiveKind},
};

type Result<T, E = EncodeError> = std::result::Result<T, E>;

#[derive(Debug, PartialEq, Eq, Snafu)]
pub enum EncodeError {
    #[snafu(display("cannot encode {found} value at {path:?} as {expected}"))]
    ShapeMismatch {
        path: String,
        expected: String,
        found: &'static str,
    },

    #[snafu(display("object at {path:?} has no field named {name:?}"))]
    UnknownField { path: String, name: String },

    #[snafu(display("float at {path:?} is not finite and has no wire representation"))]
    NonFiniteFloat { path: String },
}

/// Encodes a model value of `field` into its wire representation.
///
/// Composite values always encode every supported child, absent ones as
/// [`WireValue::Null`].
pub fn encode(field: &Field, value: &ModelValue) -> Result<WireValue> {
    encode_at(field, value, &field.wire_name)
}

pub(crate) fn encode_at(field: &Field, value: &ModelValue, path: &str) -> Result<WireValue> {
    match (field.codec(), value) {
        (Codec::CompositeCollectionSingleton(collection), ModelValue::Null) => {
            Ok(wrap(collection, Vec::new()))
        }
        (Codec::CompositeCollectionSingleton(collection), value) => {
            let element = encode_object(field, value, path)?;
            Ok(wrap(collection, vec![element]))
        }
        (_, ModelValue::Null) | (Codec::Unsupported, _) => Ok(WireValue::Null),
        (Codec::Primitive(kind), value) => encode_primitive(kind, value, path),
        (Codec::PrimitiveMap(kind), value) => encode_map(kind, value, path),
        (
            Codec::PrimitiveCollection {
                collection,
                element,
            },
            ModelValue::List(items),
        ) => {
            let items = items
                .iter()
                .enumerate()
                .map(|(i, item)| {
                    let path = format!("{path}.{i}");
                    match element {
                        ElementKind::Primitive(kind) => encode_primitive(kind, item, &path),
                        ElementKind::Map(kind) => encode_map(kind, item, &path),
                    }
                })
                .collect::<Result<_>>()?;

            Ok(wrap(collection, items))
        }
        (Codec::Composite, value) => encode_object(field, value, path),
        (Codec::CompositeCollection(CollectionKind::Map), ModelValue::Map(entries)) => entries
            .iter()
            .map(|(key, item)| {
                let item = encode_object(field, item, &format!("{path}.{key}"))?;
                Ok((key.clone(), item))
            })
            .collect::<Result<_>>()
            .map(WireValue::Map),
        (Codec::CompositeCollection(collection), ModelValue::List(items))
            if collection != CollectionKind::Map =>
        {
            let items = items
                .iter()
                .enumerate()
                .map(|(i, item)| encode_object(field, item, &format!("{path}.{i}")))
                .collect::<Result<_>>()?;

            Ok(wrap(collection, items))
        }
        (codec, value) => mismatch(codec, value, path),
    }
}

fn encode_primitive(kind: PrimitiveKind, value: &ModelValue, path: &str) -> Result<WireValue> {
    match (kind, value) {
        (_, ModelValue::Null) => Ok(WireValue::Null),
        (PrimitiveKind::Bool, ModelValue::Bool(b)) => Ok(WireValue::Bool(*b)),
        (PrimitiveKind::Integer, ModelValue::Int(i)) => Ok(WireValue::Number((*i).into())),
        (PrimitiveKind::Byte, ModelValue::Byte(b)) => Ok(WireValue::Number((*b).into())),
        (PrimitiveKind::Float, ModelValue::Float(f)) => Number::from_f64(*f)
            .map(WireValue::Number)
            .context(NonFiniteFloatSnafu { path }),
        (PrimitiveKind::String, ModelValue::String(s)) => Ok(WireValue::String(s.clone())),
        (kind, value) => mismatch(Codec::Primitive(kind), value, path),
    }
}

fn encode_map(kind: PrimitiveKind, value: &ModelValue, path: &str) -> Result<WireValue> {
    match value {
        ModelValue::Null => Ok(WireValue::Null),
        ModelValue::Map(entries) => entries
            .iter()
            .map(|(key, item)| {
                let item = encode_primitive(kind, item, &format!("{path}.{key}"))?;
                Ok((key.clone(), item))
            })
            .collect::<Result<_>>()
            .map(WireValue::Map),
        value => mismatch(Codec::PrimitiveMap(kind), value, path),
    }
}

/// Encodes one object of a composite field, keyed by wire name.
fn encode_object(field: &Field, value: &ModelValue, path: &str) -> Result<WireValue> {
    let fields = match value {
        ModelValue::Null => return Ok(WireValue::Null),
        ModelValue::Object(fields) => fields,
        value => return mismatch(Codec::Composite, value, path),
    };

    let children = field.children();
    if let Some(unknown) = fields.keys().find(|name| !children.iter().any(|c| &c.name == *name)) {
        return UnknownFieldSnafu {
            path,
            name: unknown.clone(),
        }
        .fail();
    }

    let mut attributes = BTreeMap::new();
    for child in children.iter().filter(|c| c.codec().is_supported()) {
        let value = fields.get(&child.name).unwrap_or(&ModelValue::Null);
        let encoded = encode_at(child, value, &format!("{path}.{}", child.wire_name))?;
        attributes.insert(child.wire_name.clone(), encoded);
    }

    Ok(WireValue::Object(attributes))
}

fn wrap(collection: CollectionKind, items: Vec<WireValue>) -> WireValue {
    match collection {
        CollectionKind::Set => WireValue::Set(items),
        CollectionKind::List | CollectionKind::Map => WireValue::List(items),
    }
}

fn mismatch<T>(codec: Codec, value: &ModelValue, path: &str) -> Result<T> {
    ShapeMismatchSnafu {
        path,
        expected: format!("{codec:?}"),
        found: value.kind(),
    }
    .fail()
}

#[cfg(test)]
mod tests {
    use provider_schema::NestingMode;
    use rstest::rstest;

    use super::*;
    use crate::field::{AttributeKind, Composite};

    fn leaf(wire_name: &str, kind: AttributeKind) -> Field {
        Field::attribute(crate::field_name(wire_name), wire_name, kind, false)
    }

    fn timeouts(nesting: NestingMode, repeated: bool) -> Field {
        Field::composite(
            "Timeouts",
            "timeouts",
            Composite {
                type_name: "Timeouts".to_owned(),
                children: vec![
                    leaf("create", AttributeKind::Primitive(PrimitiveKind::String)),
                    leaf("legacy", AttributeKind::Unsupported),
                ],
                nesting,
            },
            repeated,
        )
    }

    #[rstest]
    #[case(AttributeKind::Primitive(PrimitiveKind::Integer), ModelValue::Int(-3), WireValue::int(-3))]
    #[case(AttributeKind::Primitive(PrimitiveKind::Byte), ModelValue::Byte(7), WireValue::int(7))]
    #[case(AttributeKind::Primitive(PrimitiveKind::Bool), ModelValue::Bool(true), WireValue::Bool(true))]
    #[case(AttributeKind::Primitive(PrimitiveKind::String), ModelValue::Null, WireValue::Null)]
    #[case(
        AttributeKind::Set(ElementKind::Primitive(PrimitiveKind::String)),
        ModelValue::from(vec!["a", "b"]),
        WireValue::Set(vec![WireValue::string("a"), WireValue::string("b")])
    )]
    #[case(
        AttributeKind::Map(PrimitiveKind::String),
        ModelValue::Map([("team".to_owned(), ModelValue::from("infra"))].into()),
        WireValue::Map([("team".to_owned(), WireValue::string("infra"))].into())
    )]
    fn encode_leaves(
        #[case] kind: AttributeKind,
        #[case] value: ModelValue,
        #[case] expected: WireValue,
    ) {
        assert_eq!(encode(&leaf("value", kind), &value), Ok(expected));
    }

    #[test]
    fn composite_encodes_every_supported_child() {
        let empty = ModelValue::Object(BTreeMap::new());
        let encoded = encode(&timeouts(NestingMode::Single, false), &empty);

        assert_eq!(encoded, Ok(WireValue::object([("create", WireValue::Null)])));
    }

    #[test]
    fn singleton_wraps_into_collection() {
        let field = timeouts(NestingMode::List, false);
        let value = ModelValue::object([("Create", ModelValue::from("10m"))]);

        assert_eq!(
            encode(&field, &value),
            Ok(WireValue::List(vec![WireValue::object([(
                "create",
                WireValue::string("10m")
            )])]))
        );
        assert_eq!(encode(&field, &ModelValue::Null), Ok(WireValue::List(Vec::new())));
    }

    #[test]
    fn shape_mismatch_reports_path() {
        let field = timeouts(NestingMode::Set, true);
        let value = ModelValue::List(vec![ModelValue::object([("Create", ModelValue::Int(10))])]);

        assert_eq!(
            encode(&field, &value),
            Err(EncodeError::ShapeMismatch {
                path: "timeouts.0.create".to_owned(),
                expected: "Primitive(String)".to_owned(),
                found: "integer",
            })
        );
    }

    #[test]
    fn unknown_model_field() {
        let value = ModelValue::object([("Delete", ModelValue::from("10m"))]);

        assert!(matches!(
            encode(&timeouts(NestingMode::Single, false), &value),
            Err(EncodeError::UnknownField { name, .. }) if name == "Delete"
        ));
    }

    #[test]
    fn non_finite_float() {
        let field = leaf("ratio", AttributeKind::Primitive(PrimitiveKind::Float));

        assert_eq!(
            encode(&field, &ModelValue::Float(f64::NAN)),
            Err(EncodeError::NonFiniteFloat {
                path: "ratio".to_owned()
            })
        );
    }
}
