//! LSP content schema
//!
//! Every protocol interface is a plain serde type implementing [`Content`].
//! Constructing one from JSON always goes through [`Content::from_value`],
//! which runs the interface's structural validation before deserializing, so
//! a typed value never exists for a payload that failed validation.
//!
//! Validation is written with [`Validator`], which checks the top-level JSON
//! kind, each required property and each optional property that happens to be
//! present. Nested interfaces are validated recursively and report failures
//! under their own interface name.

use crate::lsp::error::LspError;
use crate::lsp::uri::DocumentUri;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Declare a protocol enumeration that travels as a JSON number
///
/// Generates the enum, `number`/`from_number`, numeric serde impls and a
/// [`Content`] impl whose validation accepts only the listed values.
macro_rules! numeric_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $($(#[$vmeta:meta])* $variant:ident = $value:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        $vis enum $name {
            $($(#[$vmeta])* $variant = $value),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn from_number(number: i64) -> Option<Self> {
                match number {
                    $($value => Some(Self::$variant),)+
                    _ => None,
                }
            }

            pub fn number(self) -> i64 {
                self as i64
            }
        }

        impl serde::Serialize for $name {
            fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_i64(self.number())
            }
        }

        impl<'de> serde::Deserialize<'de> for $name {
            fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let number = <i64 as serde::Deserialize>::deserialize(deserializer)?;
                Self::from_number(number).ok_or_else(|| {
                    serde::de::Error::custom(format!(
                        "{} has no value {}",
                        stringify!($name),
                        number
                    ))
                })
            }
        }

        impl $crate::lsp::content::Content for $name {
            const NAME: &'static str = stringify!($name);

            fn validate(data: &serde_json::Value) -> Result<(), $crate::lsp::error::LspError> {
                match data.as_i64().and_then(Self::from_number) {
                    Some(_) => Ok(()),
                    None => Err($crate::lsp::error::LspError::invalid(
                        Self::NAME,
                        format!("invalid data type, shall be one of {:?}", Self::ALL),
                    )),
                }
            }
        }
    };
}

pub mod basic;
pub mod capabilities;
pub mod document;
pub mod lifecycle;
pub mod registration;
pub mod window;
pub mod workspace;

pub use basic::*;
pub use capabilities::*;
pub use document::*;
pub use lifecycle::*;
pub use registration::*;
pub use window::*;
pub use workspace::*;

// ============================================================================
// Content Trait
// ============================================================================

/// A named, validated LSP interface
pub trait Content: Serialize + DeserializeOwned {
    /// Interface name used in validation errors
    const NAME: &'static str;

    /// Structural check of raw JSON against this interface
    fn validate(data: &Value) -> Result<(), LspError>;

    fn is_valid(data: &Value) -> bool {
        Self::validate(data).is_ok()
    }

    /// Validate, then deserialize. Nothing is constructed if validation fails.
    fn from_value(data: Value) -> Result<Self, LspError> {
        Self::validate(&data)?;
        serde_json::from_value(data).map_err(|e| LspError::invalid(Self::NAME, e.to_string()))
    }

    /// Parse JSON text as this interface
    fn from_json(text: &str) -> Result<Self, LspError> {
        let data: Value = serde_json::from_str(text)?;
        Self::from_value(data)
    }

    /// Serialize into a fresh JSON tree
    fn to_value(&self) -> Result<Value, LspError> {
        serde_json::to_value(self).map_err(|e| LspError::Serialization(e.to_string()))
    }
}

/// Arbitrary JSON (`LSPAny`), e.g. configuration sections
impl Content for Value {
    const NAME: &'static str = "LSPAny";

    fn validate(_data: &Value) -> Result<(), LspError> {
        Ok(())
    }
}

/// A list of interfaces is valid when it is an array of valid elements
impl<T: Content> Content for Vec<T> {
    const NAME: &'static str = T::NAME;

    fn validate(data: &Value) -> Result<(), LspError> {
        Validator::array_of::<T>(Self::NAME, data)
    }
}

/// Nullable results: `null` or a valid `T`
impl<T: Content> Content for Option<T> {
    const NAME: &'static str = T::NAME;

    fn validate(data: &Value) -> Result<(), LspError> {
        match data {
            Value::Null => Ok(()),
            other => T::validate(other),
        }
    }
}

// ============================================================================
// JSON Kinds
// ============================================================================

/// Expected JSON kind of a property
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JsonKind {
    Object,
    Array,
    String,
    Number,
    /// Whole number within the signed 32-bit range (LSP `integer`)
    Integer,
    /// Whole number within the unsigned 32-bit range (LSP `uinteger`)
    Unsigned,
    Boolean,
    /// String, or whole number within the signed 64-bit range
    StringOrInteger,
    /// `Unsigned` or null
    UnsignedOrNull,
    ArrayOfString,
    Uri,
    UriOrNull,
}

impl JsonKind {
    pub fn matches(self, value: &Value) -> bool {
        match self {
            Self::Object => value.is_object(),
            Self::Array => value.is_array(),
            Self::String => value.is_string(),
            Self::Number => value.is_number(),
            Self::Integer => value
                .as_i64()
                .is_some_and(|n| i32::try_from(n).is_ok()),
            Self::Unsigned => value
                .as_u64()
                .is_some_and(|n| u32::try_from(n).is_ok()),
            Self::Boolean => value.is_boolean(),
            Self::StringOrInteger => value.is_string() || value.is_i64(),
            Self::UnsignedOrNull => value.is_null() || Self::Unsigned.matches(value),
            Self::ArrayOfString => value
                .as_array()
                .is_some_and(|items| items.iter().all(Value::is_string)),
            Self::Uri => value
                .as_str()
                .is_some_and(|text| DocumentUri::parse(text).is_ok()),
            Self::UriOrNull => {
                value.is_null()
                    || value
                        .as_str()
                        .is_some_and(|text| DocumentUri::parse(text).is_ok())
            }
        }
    }

    fn describe(self) -> &'static str {
        match self {
            Self::Object => "object",
            Self::Array => "array",
            Self::String => "string",
            Self::Number => "number",
            Self::Integer => "integer",
            Self::Unsigned => "unsigned integer",
            Self::Boolean => "boolean",
            Self::StringOrInteger => "string or integer",
            Self::UnsignedOrNull => "unsigned integer or null",
            Self::ArrayOfString => "array of string",
            Self::Uri => "URI",
            Self::UriOrNull => "URI or null",
        }
    }
}

impl fmt::Display for JsonKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.describe())
    }
}

// ============================================================================
// Validator
// ============================================================================

/// Property checks over a JSON object, chained with `?`
///
/// ```
/// use lsp_server_core::lsp::content::{JsonKind, Validator};
/// use serde_json::json;
///
/// let data = json!({"line": 1, "character": 4});
/// Validator::object("Position", &data)?
///     .required("line", JsonKind::Unsigned)?
///     .required("character", JsonKind::Unsigned)?;
/// # Ok::<(), lsp_server_core::LspError>(())
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Validator<'a> {
    interface: &'static str,
    object: &'a Map<String, Value>,
}

impl<'a> Validator<'a> {
    /// Require `data` to be an object
    pub fn object(interface: &'static str, data: &'a Value) -> Result<Self, LspError> {
        match data.as_object() {
            Some(object) => Ok(Self { interface, object }),
            None => Err(LspError::invalid(
                interface,
                "invalid data type, shall be 'object'",
            )),
        }
    }

    /// Require `data` to be an array and validate every element as `T`
    pub fn array_of<T: Content>(interface: &'static str, data: &Value) -> Result<(), LspError> {
        let items = data
            .as_array()
            .ok_or_else(|| LspError::invalid(interface, "invalid data type, shall be 'array'"))?;
        items.iter().try_for_each(T::validate)
    }

    pub fn has(&self, field: &str) -> bool {
        self.object.contains_key(field)
    }

    pub fn get(&self, field: &str) -> Option<&'a Value> {
        self.object.get(field)
    }

    fn missing(&self, field: &str) -> LspError {
        LspError::invalid(self.interface, format!("missing property '{field}'"))
    }

    fn mismatch(&self, field: &str, expected: impl fmt::Display) -> LspError {
        LspError::invalid(
            self.interface,
            format!("invalid property '{field}', shall be '{expected}'"),
        )
    }

    fn check(self, field: &str, kind: JsonKind, required: bool) -> Result<Self, LspError> {
        match self.object.get(field) {
            Some(value) if kind.matches(value) => Ok(self),
            Some(_) => Err(self.mismatch(field, kind)),
            None if required => Err(self.missing(field)),
            None => Ok(self),
        }
    }

    fn check_content<T: Content>(self, field: &str, required: bool) -> Result<Self, LspError> {
        match self.object.get(field) {
            Some(value) => T::validate(value).map(|()| self),
            None if required => Err(self.missing(field)),
            None => Ok(self),
        }
    }

    fn check_content_array<T: Content>(self, field: &str, required: bool) -> Result<Self, LspError> {
        match self.object.get(field) {
            Some(Value::Array(items)) => {
                items.iter().try_for_each(T::validate)?;
                Ok(self)
            }
            Some(_) => Err(self.mismatch(field, format!("array of {}", T::NAME))),
            None if required => Err(self.missing(field)),
            None => Ok(self),
        }
    }

    /// Property must be present and of `kind`
    pub fn required(self, field: &str, kind: JsonKind) -> Result<Self, LspError> {
        self.check(field, kind, true)
    }

    /// Property may be absent; if present it must be of `kind`
    pub fn optional(self, field: &str, kind: JsonKind) -> Result<Self, LspError> {
        self.check(field, kind, false)
    }

    /// Property must be present and a valid `T`
    pub fn required_content<T: Content>(self, field: &str) -> Result<Self, LspError> {
        self.check_content::<T>(field, true)
    }

    pub fn optional_content<T: Content>(self, field: &str) -> Result<Self, LspError> {
        self.check_content::<T>(field, false)
    }

    /// Property must be present and an array of valid `T`
    pub fn required_array_of<T: Content>(self, field: &str) -> Result<Self, LspError> {
        self.check_content_array::<T>(field, true)
    }

    pub fn optional_array_of<T: Content>(self, field: &str) -> Result<Self, LspError> {
        self.check_content_array::<T>(field, false)
    }
}

// ============================================================================
// Shared Value Shapes
// ============================================================================

/// Integer-or-string value, used for diagnostic codes
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NumberOrString {
    Number(i64),
    String(String),
}

impl fmt::Display for NumberOrString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::String(s) => f.write_str(s),
        }
    }
}

impl From<i64> for NumberOrString {
    fn from(n: i64) -> Self {
        Self::Number(n)
    }
}

impl From<&str> for NumberOrString {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

/// Wire shape that may be a single item or a list of items
#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany<T> {
    Many(Vec<T>),
    One(T),
}

/// Deserialize either `T` or `[T]` into a list
pub(crate) fn one_or_many<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(item) => vec![item],
        OneOrMany::Many(items) => items,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    numeric_enum! {
        enum Fruit {
            Apple = 1,
            Pear = 2,
        }
    }

    #[test]
    fn test_json_kind_matching() {
        assert!(JsonKind::Integer.matches(&json!(-5)));
        assert!(!JsonKind::Integer.matches(&json!(1.5)));
        assert!(!JsonKind::Integer.matches(&json!(i64::from(i32::MAX) + 1)));
        assert!(JsonKind::Unsigned.matches(&json!(0)));
        assert!(!JsonKind::Unsigned.matches(&json!(-1)));
        assert!(JsonKind::Number.matches(&json!(1.5)));
        assert!(JsonKind::StringOrInteger.matches(&json!("x")));
        assert!(JsonKind::StringOrInteger.matches(&json!(3)));
        assert!(!JsonKind::StringOrInteger.matches(&json!(3.5)));
        assert!(!JsonKind::StringOrInteger.matches(&json!(null)));
        assert!(JsonKind::UnsignedOrNull.matches(&json!(null)));
        assert!(JsonKind::UnsignedOrNull.matches(&json!(4242)));
        assert!(!JsonKind::UnsignedOrNull.matches(&json!(-1)));
        assert!(JsonKind::ArrayOfString.matches(&json!(["a", "b"])));
        assert!(!JsonKind::ArrayOfString.matches(&json!(["a", 1])));
        assert!(JsonKind::Uri.matches(&json!("file:///a")));
        assert!(!JsonKind::Uri.matches(&json!("no scheme here")));
        assert!(JsonKind::UriOrNull.matches(&json!(null)));
        assert!(!JsonKind::UriOrNull.matches(&json!(7)));
    }

    #[test]
    fn test_validator_reports_missing_and_invalid() {
        let data = json!({"a": "text"});

        let err = Validator::object("Thing", &data)
            .and_then(|v| v.required("b", JsonKind::String))
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid data for interface 'Thing': missing property 'b'"
        );

        let err = Validator::object("Thing", &data)
            .and_then(|v| v.required("a", JsonKind::Number))
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid data for interface 'Thing': invalid property 'a', shall be 'number'"
        );
    }

    #[test]
    fn test_validator_optional_absent_is_ok() {
        let data = json!({});
        let result = Validator::object("Thing", &data)
            .and_then(|v| v.optional("maybe", JsonKind::Boolean))
            .map(|_| ());
        assert!(result.is_ok());
    }

    #[test]
    fn test_validator_rejects_non_object() {
        let err = Validator::object("Thing", &json!([1, 2])).unwrap_err();
        assert_eq!(err.interface(), Some("Thing"));
        assert!(err.to_string().contains("shall be 'object'"));
    }

    #[test]
    fn test_numeric_enum_serde_and_validation() {
        assert_eq!(serde_json::to_value(Fruit::Pear).unwrap(), json!(2));
        assert_eq!(Fruit::from_value(json!(1)).unwrap(), Fruit::Apple);
        assert!(Fruit::from_value(json!(3)).is_err());
        assert!(Fruit::from_value(json!("1")).is_err());
        assert_eq!(Fruit::ALL.len(), 2);
    }

    #[test]
    fn test_one_or_many() {
        #[derive(Deserialize)]
        struct Holder {
            #[serde(deserialize_with = "one_or_many")]
            items: Vec<String>,
        }

        let one: Holder = serde_json::from_value(json!({"items": "a"})).unwrap();
        assert_eq!(one.items, vec!["a"]);

        let many: Holder = serde_json::from_value(json!({"items": ["a", "b"]})).unwrap();
        assert_eq!(many.items, vec!["a", "b"]);
    }

    #[test]
    fn test_number_or_string_display() {
        assert_eq!(NumberOrString::from(42i64).to_string(), "42");
        assert_eq!(NumberOrString::from("E001").to_string(), "E001");
        let parsed: NumberOrString = serde_json::from_value(json!(7)).unwrap();
        assert_eq!(parsed, NumberOrString::Number(7));
    }
}
