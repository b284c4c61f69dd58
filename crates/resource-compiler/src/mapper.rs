use provider_schema::{Attribute, NestingMode, WireType};
use tracing::warn;

use crate::{
    field::{AttributeKind, Composite, ElementKind, Field, PrimitiveKind},
    naming::field_name,
};

/// Maps a schema attribute to a field, carrying over its argument flags.
///
/// See [`map_wire_type`] for how the wire type is translated.
pub fn map_attribute(name: &str, attribute: &Attribute, parent_path: &str) -> Field {
    map_wire_type(name, &attribute.wire_type, parent_path).with_flags(
        attribute.required,
        attribute.optional,
        attribute.sensitive,
    )
}

/// Maps a single wire type to a field.
///
/// Primitives and collections of primitives become attribute fields, lists
/// and sets of objects become repeated composites whose children are the
/// object's attributes. Every other shape is kept as an
/// [`AttributeKind::Unsupported`] field instead of failing the whole
/// resource.
pub fn map_wire_type(name: &str, wire_type: &WireType, parent_path: &str) -> Field {
    let schema_path = format!("{parent_path}_{name}");
    let friendly_name = wire_type.friendly_name();

    let attribute = |kind: AttributeKind, repeated: bool| {
        Field::attribute(field_name(name), name, kind, repeated)
    };
    let primitive = |kind| attribute(AttributeKind::Primitive(kind), false);
    let map = |kind| attribute(AttributeKind::Map(kind), false);
    let list = |element| attribute(AttributeKind::List(element), true);
    let set = |element| attribute(AttributeKind::Set(element), true);

    let field = match friendly_name.as_str() {
        "bool" => primitive(PrimitiveKind::Bool),
        "number" => primitive(PrimitiveKind::Integer),
        "string" => primitive(PrimitiveKind::String),
        "map of bool" => map(PrimitiveKind::Bool),
        "map of number" => map(PrimitiveKind::Integer),
        "map of string" => map(PrimitiveKind::String),
        "list of number" => list(ElementKind::Primitive(PrimitiveKind::Integer)),
        "list of string" => list(ElementKind::Primitive(PrimitiveKind::String)),
        "set of number" => set(ElementKind::Primitive(PrimitiveKind::Integer)),
        "set of string" => set(ElementKind::Primitive(PrimitiveKind::String)),
        "list of map of string" => list(ElementKind::Map(PrimitiveKind::String)),
        "set of map of string" => set(ElementKind::Map(PrimitiveKind::String)),
        "list of object" | "set of object" => object_collection(name, wire_type, &schema_path)
            .unwrap_or_else(|| unsupported(name, wire_type, &schema_path)),
        _ => unsupported(name, wire_type, &schema_path),
    };

    field.with_schema_path(schema_path)
}

fn object_collection(name: &str, wire_type: &WireType, schema_path: &str) -> Option<Field> {
    let nesting = match wire_type {
        WireType::List(_) => NestingMode::List,
        WireType::Set(_) => NestingMode::Set,
        _ => return None,
    };

    let attributes = wire_type.element_type()?.attribute_types()?;
    let children = attributes
        .iter()
        .map(|(child, ty)| map_wire_type(child, ty, schema_path))
        .collect();

    let type_name = field_name(name);
    Some(Field::composite(
        type_name.clone(),
        name,
        Composite {
            type_name,
            children,
            nesting,
        },
        true,
    ))
}

fn unsupported(name: &str, wire_type: &WireType, schema_path: &str) -> Field {
    warn!(
        schema_path,
        wire_type = %wire_type,
        "attribute type has no model representation, skipping field"
    );

    Field::attribute(field_name(name), name, AttributeKind::Unsupported, false)
}
