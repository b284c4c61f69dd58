use std::collections::BTreeMap;

/// A value of the typed model.
///
/// Objects are keyed by in-model field name and only hold fields which are
/// set. An absent field and a field set to [`ModelValue::Null`] mean the same
/// thing, decoding never produces the latter.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum ModelValue {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Byte(u8),
    String(String),
    List(Vec<ModelValue>),
    Map(BTreeMap<String, ModelValue>),
    Object(BTreeMap<String, ModelValue>),
}

impl ModelValue {
    pub fn string(value: impl Into<String>) -> Self {
        Self::String(value.into())
    }

    pub fn object<I, K>(fields: I) -> Self
    where
        I: IntoIterator<Item = (K, ModelValue)>,
        K: Into<String>,
    {
        Self::Object(fields.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn as_object(&self) -> Option<&BTreeMap<String, ModelValue>> {
        match self {
            Self::Object(fields) => Some(fields),
            _ => None,
        }
    }

    /// Returns the field `name` of an object.
    pub fn get(&self, name: &str) -> Option<&ModelValue> {
        self.as_object().and_then(|fields| fields.get(name))
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Int(_) => "integer",
            Self::Float(_) => "float",
            Self::Byte(_) => "byte",
            Self::String(_) => "string",
            Self::List(_) => "list",
            Self::Map(_) => "map",
            Self::Object(_) => "object",
        }
    }
}

impl From<bool> for ModelValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for ModelValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<&str> for ModelValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_owned())
    }
}

impl From<String> for ModelValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl<T> From<Vec<T>> for ModelValue
where
    T: Into<ModelValue>,
{
    fn from(values: Vec<T>) -> Self {
        Self::List(values.into_iter().map(Into::into).collect())
    }
}
