use std::collections::BTreeMap;

use serde_json::{Number, Value};
use snafu::{Snafu, ensure};

use crate::WireType;

#[derive(Debug, PartialEq, Eq, Snafu)]
pub enum FromJsonError {
    #[snafu(display("value at {path:?} is a {found}, expected {expected}"))]
    TypeMismatch {
        path: String,
        expected: String,
        found: &'static str,
    },

    #[snafu(display("object at {path:?} contains unknown attribute {attribute:?}"))]
    UnknownAttribute { path: String, attribute: String },

    #[snafu(display("tuple at {path:?} has {found} elements, expected {expected}"))]
    TupleLength {
        path: String,
        expected: usize,
        found: usize,
    },
}

/// A dynamically typed value as exchanged with a provider plugin.
///
/// Lists and sets keep the order they were built in. Objects are keyed by
/// the provider's attribute names.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum WireValue {
    #[default]
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    List(Vec<WireValue>),
    Set(Vec<WireValue>),
    Map(BTreeMap<String, WireValue>),
    Object(BTreeMap<String, WireValue>),
}

impl WireValue {
    pub fn string(value: impl Into<String>) -> Self {
        Self::String(value.into())
    }

    pub fn int(value: i64) -> Self {
        Self::Number(value.into())
    }

    pub fn object<I, K>(attributes: I) -> Self
    where
        I: IntoIterator<Item = (K, WireValue)>,
        K: Into<String>,
    {
        Self::Object(attributes.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<&Number> {
        match self {
            Self::Number(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(value) => Some(value),
            _ => None,
        }
    }

    /// Returns the elements of a list or set.
    pub fn as_elements(&self) -> Option<&[WireValue]> {
        match self {
            Self::List(elements) | Self::Set(elements) => Some(elements),
            _ => None,
        }
    }

    /// Returns the entries of a map or the attributes of an object.
    pub fn as_entries(&self) -> Option<&BTreeMap<String, WireValue>> {
        match self {
            Self::Map(entries) | Self::Object(entries) => Some(entries),
            _ => None,
        }
    }

    /// Returns the attribute `name` of an object, [`WireValue::Null`] if the
    /// object doesn't carry it.
    pub fn get(&self, name: &str) -> Option<&WireValue> {
        self.as_entries().map(|entries| entries.get(name).unwrap_or(&Self::Null))
    }

    /// A short name of the value's shape, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Number(_) => "number",
            Self::String(_) => "string",
            Self::List(_) => "list",
            Self::Set(_) => "set",
            Self::Map(_) => "map",
            Self::Object(_) => "object",
        }
    }

    /// Types the untyped JSON `value` as a value of `wire_type`.
    ///
    /// Missing object attributes become [`WireValue::Null`]. Values of the
    /// [`WireType::Dynamic`] type take the shape of the JSON they were read
    /// from.
    pub fn from_json(value: &Value, wire_type: &WireType) -> Result<Self, FromJsonError> {
        Self::from_json_at(value, wire_type, "")
    }

    fn from_json_at(
        value: &Value,
        wire_type: &WireType,
        path: &str,
    ) -> Result<Self, FromJsonError> {
        let mismatch = || {
            TypeMismatchSnafu {
                path,
                expected: wire_type.friendly_name(),
                found: json_kind(value),
            }
            .fail()
        };

        if value.is_null() {
            return Ok(Self::Null);
        }

        match (wire_type, value) {
            (WireType::Bool, Value::Bool(b)) => Ok(Self::Bool(*b)),
            (WireType::Number, Value::Number(n)) => Ok(Self::Number(n.clone())),
            (WireType::String, Value::String(s)) => Ok(Self::String(s.clone())),
            (WireType::Dynamic, value) => Ok(Self::from_untyped(value)),
            (WireType::List(element), Value::Array(items)) => {
                Self::elements_from_json(items, element, path).map(Self::List)
            }
            (WireType::Set(element), Value::Array(items)) => {
                Self::elements_from_json(items, element, path).map(Self::Set)
            }
            (WireType::Map(element), Value::Object(entries)) => entries
                .iter()
                .map(|(key, v)| {
                    Ok((
                        key.clone(),
                        Self::from_json_at(v, element, &join(path, key))?,
                    ))
                })
                .collect::<Result<_, _>>()
                .map(Self::Map),
            (WireType::Object(attributes), Value::Object(entries)) => {
                if let Some(unknown) = entries.keys().find(|k| !attributes.contains_key(*k)) {
                    return UnknownAttributeSnafu {
                        path,
                        attribute: unknown.clone(),
                    }
                    .fail();
                }

                attributes
                    .iter()
                    .map(|(name, ty)| {
                        let v = entries.get(name).unwrap_or(&Value::Null);
                        Ok((name.clone(), Self::from_json_at(v, ty, &join(path, name))?))
                    })
                    .collect::<Result<_, _>>()
                    .map(Self::Object)
            }
            (WireType::Tuple(types), Value::Array(items)) => {
                ensure!(
                    types.len() == items.len(),
                    TupleLengthSnafu {
                        path,
                        expected: types.len(),
                        found: items.len(),
                    }
                );

                types
                    .iter()
                    .zip(items)
                    .enumerate()
                    .map(|(i, (ty, v))| Self::from_json_at(v, ty, &join(path, &i.to_string())))
                    .collect::<Result<_, _>>()
                    .map(Self::List)
            }
            _ => mismatch(),
        }
    }

    fn elements_from_json(
        items: &[Value],
        element: &WireType,
        path: &str,
    ) -> Result<Vec<Self>, FromJsonError> {
        items
            .iter()
            .enumerate()
            .map(|(i, v)| Self::from_json_at(v, element, &join(path, &i.to_string())))
            .collect()
    }

    fn from_untyped(value: &Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(b) => Self::Bool(*b),
            Value::Number(n) => Self::Number(n.clone()),
            Value::String(s) => Self::String(s.clone()),
            Value::Array(items) => Self::List(items.iter().map(Self::from_untyped).collect()),
            Value::Object(entries) => Self::Object(
                entries
                    .iter()
                    .map(|(k, v)| (k.clone(), Self::from_untyped(v)))
                    .collect(),
            ),
        }
    }

    /// Erases the type information, producing plain JSON.
    pub fn to_json(&self) -> Value {
        match self {
            Self::Null => Value::Null,
            Self::Bool(b) => Value::Bool(*b),
            Self::Number(n) => Value::Number(n.clone()),
            Self::String(s) => Value::String(s.clone()),
            Self::List(items) | Self::Set(items) => {
                Value::Array(items.iter().map(Self::to_json).collect())
            }
            Self::Map(entries) | Self::Object(entries) => Value::Object(
                entries
                    .iter()
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect(),
            ),
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn join(path: &str, segment: &str) -> String {
    if path.is_empty() {
        segment.to_owned()
    } else {
        format!("{path}.{segment}")
    }
}
