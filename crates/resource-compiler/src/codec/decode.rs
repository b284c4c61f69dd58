use std::collections::BTreeMap;

use provider_schema::WireValue;
use snafu::{OptionExt, Snafu};

use crate::{
    Field,
    codec::{Codec, CollectionKind, ModelValue},
    field::{ElementKind, PrimitiveKind},
};

type Result<T, E = DecodeError> = std::result::Result<T, E>;

#[derive(Debug, PartialEq, Eq, Snafu)]
pub enum DecodeError {
    #[snafu(display("cannot decode {found} wire value at {path:?} as {expected}"))]
    ShapeMismatch {
        path: String,
        expected: String,
        found: &'static str,
    },

    #[snafu(display("number {number} at {path:?} does not fit into {kind}"))]
    NumberOutOfRange {
        path: String,
        number: String,
        kind: PrimitiveKind,
    },
}

/// Decodes the wire representation of `field` into a model value.
///
/// A singleton collection decodes to its first element, or to
/// [`ModelValue::Null`] if the collection is empty.
pub fn decode(field: &Field, value: &WireValue) -> Result<ModelValue> {
    decode_at(field, value, &field.wire_name)
}

pub(crate) fn decode_at(field: &Field, value: &WireValue, path: &str) -> Result<ModelValue> {
    match (field.codec(), value) {
        (_, WireValue::Null) | (Codec::Unsupported, _) => Ok(ModelValue::Null),
        (Codec::Primitive(kind), value) => decode_primitive(kind, value, path),
        (Codec::PrimitiveMap(kind), value) => decode_map(kind, value, path),
        (Codec::PrimitiveCollection { element, .. }, value) => {
            let items = value.as_elements().map_or_else(
                || mismatch(field.codec(), value, path),
                |items| {
                    items
                        .iter()
                        .enumerate()
                        .map(|(i, item)| {
                            let path = format!("{path}.{i}");
                            match element {
                                ElementKind::Primitive(kind) => decode_primitive(kind, item, &path),
                                ElementKind::Map(kind) => decode_map(kind, item, &path),
                            }
                        })
                        .collect()
                },
            )?;

            Ok(ModelValue::List(items))
        }
        (Codec::Composite, value) => decode_object(field, value, path),
        (Codec::CompositeCollection(CollectionKind::Map), WireValue::Map(entries)) => entries
            .iter()
            .map(|(key, item)| {
                let item = decode_object(field, item, &format!("{path}.{key}"))?;
                Ok((key.clone(), item))
            })
            .collect::<Result<_>>()
            .map(ModelValue::Map),
        (Codec::CompositeCollection(collection), WireValue::List(items) | WireValue::Set(items))
            if collection != CollectionKind::Map =>
        {
            items
                .iter()
                .enumerate()
                .map(|(i, item)| decode_object(field, item, &format!("{path}.{i}")))
                .collect::<Result<_>>()
                .map(ModelValue::List)
        }
        (
            Codec::CompositeCollectionSingleton(_),
            WireValue::List(items) | WireValue::Set(items),
        ) => match items.first() {
            Some(first) => decode_object(field, first, &format!("{path}.0")),
            None => Ok(ModelValue::Null),
        },
        (codec, value) => mismatch(codec, value, path),
    }
}

fn decode_primitive(kind: PrimitiveKind, value: &WireValue, path: &str) -> Result<ModelValue> {
    let out_of_range = |number: &serde_json::Number| NumberOutOfRangeSnafu {
        path,
        number: number.to_string(),
        kind,
    };

    match (kind, value) {
        (_, WireValue::Null) => Ok(ModelValue::Null),
        (PrimitiveKind::Bool, WireValue::Bool(b)) => Ok(ModelValue::Bool(*b)),
        (PrimitiveKind::String, WireValue::String(s)) => Ok(ModelValue::String(s.clone())),
        (PrimitiveKind::Integer, WireValue::Number(n)) => n
            .as_i64()
            .map(ModelValue::Int)
            .context(out_of_range(n)),
        (PrimitiveKind::Byte, WireValue::Number(n)) => n
            .as_u64()
            .and_then(|n| u8::try_from(n).ok())
            .map(ModelValue::Byte)
            .context(out_of_range(n)),
        (PrimitiveKind::Float, WireValue::Number(n)) => n
            .as_f64()
            .map(ModelValue::Float)
            .context(out_of_range(n)),
        (kind, value) => mismatch(Codec::Primitive(kind), value, path),
    }
}

fn decode_map(kind: PrimitiveKind, value: &WireValue, path: &str) -> Result<ModelValue> {
    match value {
        WireValue::Null => Ok(ModelValue::Null),
        WireValue::Map(entries) | WireValue::Object(entries) => entries
            .iter()
            .map(|(key, item)| {
                let item = decode_primitive(kind, item, &format!("{path}.{key}"))?;
                Ok((key.clone(), item))
            })
            .collect::<Result<_>>()
            .map(ModelValue::Map),
        value => mismatch(Codec::PrimitiveMap(kind), value, path),
    }
}

/// Decodes one object of a composite field. Attributes the field doesn't
/// declare are ignored, unset ones are left out of the result.
fn decode_object(field: &Field, value: &WireValue, path: &str) -> Result<ModelValue> {
    let attributes = match value {
        WireValue::Null => return Ok(ModelValue::Null),
        WireValue::Object(attributes) | WireValue::Map(attributes) => attributes,
        value => return mismatch(Codec::Composite, value, path),
    };

    let mut fields = BTreeMap::new();
    for child in field.children().iter().filter(|c| c.codec().is_supported()) {
        let Some(attribute) = attributes.get(&child.wire_name) else {
            continue;
        };

        let decoded = decode_at(child, attribute, &format!("{path}.{}", child.wire_name))?;
        if !decoded.is_null() {
            fields.insert(child.name.clone(), decoded);
        }
    }

    Ok(ModelValue::Object(fields))
}

fn mismatch<T>(codec: Codec, value: &WireValue, path: &str) -> Result<T> {
    ShapeMismatchSnafu {
        path,
        expected: format!("{codec:?}"),
        found: value.kind(),
    }
    .fail()
}
