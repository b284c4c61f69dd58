//! The typed field tree a resource compiles to.
//!
//! A [`Field`] is either a leaf attribute with an [`AttributeKind`] or a
//! [`Composite`] owning an ordered list of child fields. Children keep the
//! order they were mapped in; every downstream traversal (encoding, merging,
//! deduplication) iterates them in that order.

use std::collections::{BTreeSet, HashSet};

use provider_schema::NestingMode;
use tracing::debug;

use crate::codec::Codec;

/// The primitive value kinds a leaf can hold.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum PrimitiveKind {
    Bool,
    Integer,
    Float,
    String,
    Byte,
}

/// The element kinds of a primitive list or set.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
pub enum ElementKind {
    Primitive(PrimitiveKind),

    /// A map with string keys and primitive values.
    Map(PrimitiveKind),
}

#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
pub enum AttributeKind {
    Primitive(PrimitiveKind),
    Map(PrimitiveKind),
    List(ElementKind),
    Set(ElementKind),

    /// The wire type has no model representation. The field is kept in the
    /// tree so it can be reported, but no codec touches it.
    Unsupported,
}

/// A field with an object value, made up of child fields.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Composite {
    /// The name of the generated type, unique within a resource after
    /// deduplication.
    pub type_name: String,
    pub children: Vec<Field>,
    pub nesting: NestingMode,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FieldKind {
    Attribute(AttributeKind),
    Composite(Composite),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Field {
    /// The identifier used in the model.
    pub name: String,

    /// The attribute name the provider uses on the wire.
    pub wire_name: String,

    pub kind: FieldKind,
    pub repeated: bool,
    pub required: bool,
    pub optional: bool,
    pub sensitive: bool,

    /// Where in the schema this field came from, used for diagnostics.
    pub schema_path: String,

    codec: Codec,
}

impl Field {
    pub fn attribute(
        name: impl Into<String>,
        wire_name: impl Into<String>,
        kind: AttributeKind,
        repeated: bool,
    ) -> Self {
        Self::new(name.into(), wire_name.into(), FieldKind::Attribute(kind), repeated)
    }

    /// Children whose in-model name collides with an earlier sibling are
    /// renamed by appending the lowest free index, starting at `0`. Distinct
    /// wire names like `foo_1` and `foo1` would otherwise share one value.
    ///
    /// # Panics
    ///
    /// Panics if two children share a wire name. Valid schemas never declare
    /// the same name twice within one block.
    pub fn composite(
        name: impl Into<String>,
        wire_name: impl Into<String>,
        mut composite: Composite,
        repeated: bool,
    ) -> Self {
        let mut seen = BTreeSet::new();
        for child in &composite.children {
            assert!(
                seen.insert(child.wire_name.as_str()),
                "internal error: duplicate wire name {:?} in composite {:?}",
                child.wire_name,
                composite.type_name
            );
        }

        disambiguate_names(&mut composite.children);
        Self::new(name.into(), wire_name.into(), FieldKind::Composite(composite), repeated)
    }

    fn new(name: String, wire_name: String, kind: FieldKind, repeated: bool) -> Self {
        let codec = Codec::select(&kind, repeated);

        Self {
            name,
            wire_name,
            kind,
            repeated,
            required: false,
            optional: false,
            sensitive: false,
            schema_path: String::new(),
            codec,
        }
    }

    pub fn with_flags(mut self, required: bool, optional: bool, sensitive: bool) -> Self {
        self.required = required;
        self.optional = optional;
        self.sensitive = sensitive;
        self
    }

    pub fn with_schema_path(mut self, schema_path: impl Into<String>) -> Self {
        self.schema_path = schema_path.into();
        self
    }

    /// The strategy used to encode, decode and merge values of this field.
    pub fn codec(&self) -> Codec {
        self.codec
    }

    pub fn is_unsupported(&self) -> bool {
        matches!(self.kind, FieldKind::Attribute(AttributeKind::Unsupported))
    }

    pub fn as_composite(&self) -> Option<&Composite> {
        match &self.kind {
            FieldKind::Composite(composite) => Some(composite),
            FieldKind::Attribute(_) => None,
        }
    }

    pub fn as_composite_mut(&mut self) -> Option<&mut Composite> {
        match &mut self.kind {
            FieldKind::Composite(composite) => Some(composite),
            FieldKind::Attribute(_) => None,
        }
    }

    pub fn type_name(&self) -> Option<&str> {
        self.as_composite().map(|c| c.type_name.as_str())
    }

    pub fn children(&self) -> &[Field] {
        self.as_composite().map_or(&[], |c| c.children.as_slice())
    }

    pub fn child(&self, wire_name: &str) -> Option<&Field> {
        self.children().iter().find(|c| c.wire_name == wire_name)
    }

    /// Looks up a descendant by its dotted wire path, for example
    /// `ingress.cidr_blocks`.
    pub fn find(&self, path: &str) -> Option<&Field> {
        path.split('.')
            .try_fold(self, |field, segment| field.child(segment))
    }

    /// Iterates over this field and all its descendants, parents before
    /// children.
    pub fn walk(&self) -> Walk<'_> {
        Walk { stack: vec![self] }
    }

    /// Returns the schema paths of all unsupported descendants.
    pub fn unsupported_paths(&self) -> Vec<&str> {
        self.walk()
            .filter(|f| f.is_unsupported())
            .map(|f| f.schema_path.as_str())
            .collect()
    }
}

fn disambiguate_names(children: &mut [Field]) {
    let mut taken: HashSet<String> = children.iter().map(|c| c.name.clone()).collect();
    let mut seen = HashSet::new();

    for child in children {
        if seen.insert(child.name.clone()) {
            continue;
        }

        let renamed = (0usize..)
            .map(|i| format!("{}{i}", child.name))
            .find(|candidate| !taken.contains(candidate))
            .expect("internal error: unbounded suffixes always yield a free name");

        debug!(
            wire_name = %child.wire_name,
            from = %child.name,
            to = %renamed,
            "renaming field with colliding in-model name"
        );

        taken.insert(renamed.clone());
        seen.insert(renamed.clone());
        child.name = renamed;
    }
}

/// Pre-order iterator over a field tree, see [`Field::walk`].
pub struct Walk<'a> {
    stack: Vec<&'a Field>,
}

impl<'a> Iterator for Walk<'a> {
    type Item = &'a Field;

    fn next(&mut self) -> Option<Self::Item> {
        let field = self.stack.pop()?;
        self.stack.extend(field.children().iter().rev());
        Some(field)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree() -> Field {
        let rule = Field::composite(
            "Rule",
            "rule",
            Composite {
                type_name: "Rule".to_owned(),
                children: vec![
                    Field::attribute(
                        "Port",
                        "port",
                        AttributeKind::Primitive(PrimitiveKind::Integer),
                        false,
                    ),
                    Field::attribute("Labels", "labels", AttributeKind::Unsupported, false)
                        .with_schema_path("Group_rule_labels"),
                ],
                nesting: NestingMode::List,
            },
            true,
        );

        Field::composite(
            "ForProvider",
            "forProvider",
            Composite {
                type_name: "GroupParameters".to_owned(),
                children: vec![
                    Field::attribute(
                        "Name",
                        "name",
                        AttributeKind::Primitive(PrimitiveKind::String),
                        false,
                    ),
                    rule,
                ],
                nesting: NestingMode::Single,
            },
            false,
        )
    }

    #[test]
    fn walk_is_pre_order() {
        let tree = tree();
        let names: Vec<_> = tree.walk().map(|f| f.wire_name.as_str()).collect();

        assert_eq!(names, ["forProvider", "name", "rule", "port", "labels"]);
    }

    #[test]
    fn find_by_wire_path() {
        let tree = tree();

        assert_eq!(tree.find("rule.port").map(|f| f.name.as_str()), Some("Port"));
        assert_eq!(tree.find("rule").and_then(Field::type_name), Some("Rule"));
        assert!(tree.find("rule.missing").is_none());
        assert!(tree.find("name.port").is_none());
    }

    #[test]
    fn unsupported_fields() {
        assert_eq!(tree().unsupported_paths(), ["Group_rule_labels"]);
    }

    #[test]
    fn colliding_model_names_get_suffixes() {
        let string = |name: &str, wire_name: &str| {
            let kind = AttributeKind::Primitive(PrimitiveKind::String);
            Field::attribute(name, wire_name, kind, false)
        };

        let field = Field::composite(
            "Thing",
            "thing",
            Composite {
                type_name: "Thing".to_owned(),
                children: vec![
                    string("Foo1", "foo1"),
                    string("Foo10", "foo10"),
                    string("Foo1", "foo_1"),
                    string("Foo1", "foo__1"),
                ],
                nesting: NestingMode::Single,
            },
            false,
        );

        let names: Vec<_> = field
            .children()
            .iter()
            .map(|c| (c.name.as_str(), c.wire_name.as_str()))
            .collect();
        assert_eq!(
            names,
            [
                ("Foo1", "foo1"),
                ("Foo10", "foo10"),
                ("Foo11", "foo_1"),
                ("Foo12", "foo__1"),
            ]
        );
    }

    #[test]
    #[should_panic(expected = "internal error: duplicate wire name")]
    fn duplicate_wire_names() {
        let name = Field::attribute(
            "Name",
            "name",
            AttributeKind::Primitive(PrimitiveKind::String),
            false,
        );

        Field::composite(
            "Broken",
            "broken",
            Composite {
                type_name: "Broken".to_owned(),
                children: vec![name.clone(), name],
                nesting: NestingMode::Single,
            },
            false,
        );
    }
}
