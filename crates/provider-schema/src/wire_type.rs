use std::{collections::BTreeMap, fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use snafu::{OptionExt, ResultExt, Snafu, ensure};

/// Error variants which can be encountered when parsing a [`WireType`] from the
/// provider's JSON type encoding.
#[derive(Debug, Snafu)]
pub enum ParseWireTypeError {
    #[snafu(display("unknown primitive type {name:?}"))]
    UnknownPrimitive { name: String },

    #[snafu(display("unknown type constructor {name:?}"))]
    UnknownConstructor { name: String },

    #[snafu(display("type constructor {name:?} expects {expected}"))]
    InvalidArgument { name: String, expected: &'static str },

    #[snafu(display(
        "invalid type encoding, expected a type name or a [constructor, argument] array"
    ))]
    InvalidEncoding,

    #[snafu(display("failed to parse type encoding as JSON"))]
    ParseJson { source: serde_json::Error },
}

/// The type of a value exchanged with a provider plugin.
///
/// Types are encoded in JSON the same way the provider's schema document does
/// it: primitives are plain strings (`"string"`), everything else is a
/// `[constructor, argument]` pair, for example `["list", "string"]` or
/// `["object", {"name": "string"}]`.
///
/// ```
/// use provider_schema::WireType;
///
/// let ty: WireType = r#"["set", ["map", "string"]]"#.parse().unwrap();
/// assert_eq!(ty.friendly_name(), "set of map of string");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(try_from = "Value", into = "Value")]
pub enum WireType {
    Bool,
    Number,
    String,

    /// Any type, decided per value at runtime.
    Dynamic,

    List(Box<WireType>),
    Set(Box<WireType>),
    Map(Box<WireType>),
    Object(BTreeMap<String, WireType>),
    Tuple(Vec<WireType>),
}

impl WireType {
    pub fn list(element: WireType) -> Self {
        Self::List(Box::new(element))
    }

    pub fn set(element: WireType) -> Self {
        Self::Set(Box::new(element))
    }

    pub fn map(element: WireType) -> Self {
        Self::Map(Box::new(element))
    }

    pub fn object<I, K>(attributes: I) -> Self
    where
        I: IntoIterator<Item = (K, WireType)>,
        K: Into<String>,
    {
        Self::Object(attributes.into_iter().map(|(k, t)| (k.into(), t)).collect())
    }

    /// Returns the human readable type name, for example `list of string` or
    /// `set of object`. Object and tuple element types are not spelled out.
    pub fn friendly_name(&self) -> String {
        match self {
            Self::Bool => "bool".to_owned(),
            Self::Number => "number".to_owned(),
            Self::String => "string".to_owned(),
            Self::Dynamic => "dynamic".to_owned(),
            Self::List(element) => format!("list of {}", element.friendly_name()),
            Self::Set(element) => format!("set of {}", element.friendly_name()),
            Self::Map(element) => format!("map of {}", element.friendly_name()),
            Self::Object(_) => "object".to_owned(),
            Self::Tuple(_) => "tuple".to_owned(),
        }
    }

    pub fn is_primitive(&self) -> bool {
        matches!(self, Self::Bool | Self::Number | Self::String)
    }

    /// Lists, sets and maps are collections. Objects and tuples are structural
    /// types.
    pub fn is_collection(&self) -> bool {
        matches!(self, Self::List(_) | Self::Set(_) | Self::Map(_))
    }

    pub fn is_list(&self) -> bool {
        matches!(self, Self::List(_))
    }

    pub fn is_set(&self) -> bool {
        matches!(self, Self::Set(_))
    }

    pub fn is_object(&self) -> bool {
        matches!(self, Self::Object(_))
    }

    /// Returns the element type of a collection type.
    pub fn element_type(&self) -> Option<&WireType> {
        match self {
            Self::List(element) | Self::Set(element) | Self::Map(element) => Some(element),
            _ => None,
        }
    }

    /// Returns the attribute types of an object type.
    pub fn attribute_types(&self) -> Option<&BTreeMap<String, WireType>> {
        match self {
            Self::Object(attributes) => Some(attributes),
            _ => None,
        }
    }

    fn parse_collection(name: &str, argument: &Value) -> Result<Box<Self>, ParseWireTypeError> {
        Self::try_from(argument.clone()).map(Box::new).map_err(|err| match err {
            ParseWireTypeError::InvalidEncoding => ParseWireTypeError::InvalidArgument {
                name: name.to_owned(),
                expected: "an element type",
            },
            err => err,
        })
    }
}

impl TryFrom<Value> for WireType {
    type Error = ParseWireTypeError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::String(name) => match name.as_str() {
                "bool" => Ok(Self::Bool),
                "number" => Ok(Self::Number),
                "string" => Ok(Self::String),
                "dynamic" => Ok(Self::Dynamic),
                _ => UnknownPrimitiveSnafu { name }.fail(),
            },
            Value::Array(parts) => {
                // The provider may append a third element listing optional object
                // attributes. It carries no shape information and is ignored.
                ensure!(parts.len() == 2 || parts.len() == 3, InvalidEncodingSnafu);

                let name = parts[0].as_str().context(InvalidEncodingSnafu)?;
                let argument = &parts[1];

                match name {
                    "list" => Ok(Self::List(Self::parse_collection(name, argument)?)),
                    "set" => Ok(Self::Set(Self::parse_collection(name, argument)?)),
                    "map" => Ok(Self::Map(Self::parse_collection(name, argument)?)),
                    "object" => {
                        let attributes = argument.as_object().context(InvalidArgumentSnafu {
                            name,
                            expected: "a map of attribute types",
                        })?;

                        attributes
                            .iter()
                            .map(|(k, v)| Ok((k.clone(), Self::try_from(v.clone())?)))
                            .collect::<Result<_, _>>()
                            .map(Self::Object)
                    }
                    "tuple" => {
                        let elements = argument.as_array().context(InvalidArgumentSnafu {
                            name,
                            expected: "a list of element types",
                        })?;

                        elements
                            .iter()
                            .cloned()
                            .map(Self::try_from)
                            .collect::<Result<_, _>>()
                            .map(Self::Tuple)
                    }
                    _ => UnknownConstructorSnafu { name }.fail(),
                }
            }
            _ => InvalidEncodingSnafu.fail(),
        }
    }
}

impl From<WireType> for Value {
    fn from(value: WireType) -> Self {
        match value {
            WireType::Bool => json!("bool"),
            WireType::Number => json!("number"),
            WireType::String => json!("string"),
            WireType::Dynamic => json!("dynamic"),
            WireType::List(element) => json!(["list", Value::from(*element)]),
            WireType::Set(element) => json!(["set", Value::from(*element)]),
            WireType::Map(element) => json!(["map", Value::from(*element)]),
            WireType::Object(attributes) => {
                let attributes: serde_json::Map<_, _> = attributes
                    .into_iter()
                    .map(|(k, t)| (k, Value::from(t)))
                    .collect();
                json!(["object", attributes])
            }
            WireType::Tuple(elements) => {
                json!(["tuple", elements.into_iter().map(Value::from).collect::<Vec<_>>()])
            }
        }
    }
}

impl FromStr for WireType {
    type Err = ParseWireTypeError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let value: Value = serde_json::from_str(input).context(ParseJsonSnafu)?;
        Self::try_from(value)
    }
}

impl fmt::Display for WireType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.friendly_name())
    }
}
