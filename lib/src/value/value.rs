use std::sync::Arc;
use std::collections::BTreeMap;

use serde::{Serialize, Deserialize};

pub type Dict<K = Arc<str>, V = Value> = BTreeMap<K, V>;

/// Represents any value a content header, front matter or render context may
/// carry.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(untagged)]
pub enum Value {
    Null,
    Bool(bool),
    Num(Num),
    String(Arc<str>),
    Array(Arc<Vec<Value>>),
    Dict(Arc<Dict>),
}

impl Value {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(&**s),
            _ => None
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Num(_) => "number",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Dict(_) => "dict",
        }
    }
}

macro_rules! impl_from_primitive {
    ($($T:ty),+ => $E:ident::$kind:ident) => {
        $(
            impl From<$T> for $E {
                fn from(value: $T) -> Self {
                    $E::$kind(value.into())
                }
            }
        )+
    };
}

impl_from_primitive!(&str => Value::String);
impl_from_primitive!(String => Value::String);
impl_from_primitive!(Arc<str> => Value::String);

impl From<Dict> for Value {
    fn from(value: Dict) -> Self {
        Value::Dict(Arc::new(value))
    }
}

/// A numeric value as decoded from JSON or TOML.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Num {
    /// A non-negative integer.
    U64(u64),
    /// A negative integer.
    I64(i64),
    /// Anything with a fractional part or exponent.
    F64(f64),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_json_headers() {
        let value: Value = serde_json::from_str(r#"{
            "date": "2014-03-14",
            "id": 31415,
            "offset": -2,
            "ratio": 1.5,
            "draft": false,
            "tags": ["rust", "web"],
            "cover": null
        }"#).unwrap();

        let Value::Dict(dict) = value else { panic!("expected a dict") };
        assert_eq!(dict["date"].as_str(), Some("2014-03-14"));
        assert_eq!(dict["id"], Value::Num(Num::U64(31415)));
        assert_eq!(dict["offset"], Value::Num(Num::I64(-2)));
        assert_eq!(dict["ratio"], Value::Num(Num::F64(1.5)));
        assert_eq!(dict["draft"], Value::Bool(false));
        assert_eq!(dict["tags"].kind(), "array");
        assert_eq!(dict["cover"], Value::Null);
    }

    #[test]
    fn decodes_toml_front_matter() {
        let dict: Dict = toml::from_str("title = \"About\"\nweight = 3\n").unwrap();
        assert_eq!(dict["title"], Value::from("About"));
        assert_eq!(dict["weight"], Value::Num(Num::U64(3)));
    }
}
