//! Local shaping schema
//!
//! A schema maps type names to [`TypeRule`]s. A rule fixes which keys of an
//! object come first (and with which sub-type they recurse), whether keys it does
//! not name are suppressed, and which attribute names are allowed.
//!
//! This is not XML Schema: nothing is validated, the rules only steer rendering.
//!
//! The JSON layout mirrors the one used by existing configuration files:
//!
//! ```json
//! {
//!     "order": {
//!         "IncludeNamedElementsOnly": true,
//!         "ValidAttributes": ["id"],
//!         "0": { "ElementName": "customer", "Type": "customer" },
//!         "1": { "ElementName": "lines", "Type": null }
//!     }
//! }
//! ```

use std::fs;
use std::path::Path;

use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value as JsonValue};

use crate::error::{Error, Result};

const INCLUDE_NAMED_ONLY_KEY: &str = "IncludeNamedElementsOnly";
const VALID_ATTRIBUTES_KEY: &str = "ValidAttributes";
const ELEMENT_NAME_KEY: &str = "ElementName";
const ELEMENT_TYPE_KEY: &str = "Type";

/// A schema-declared element and the type its value recurses with
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementRule {
    name: String,
    sub_type: Option<String>,
}

impl ElementRule {
    /// Create a new element rule
    pub fn new(name: impl Into<String>, sub_type: Option<&str>) -> Self {
        Self {
            name: name.into(),
            sub_type: sub_type.map(str::to_string),
        }
    }

    /// Key the element is read from
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Type active while rendering the element's value
    pub fn sub_type(&self) -> Option<&str> {
        self.sub_type.as_deref()
    }
}

/// Ordering, inclusion and attribute rules for one type
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypeRule {
    valid_attributes: Option<IndexSet<String>>,
    include_named_only: bool,
    ordered_elements: Vec<ElementRule>,
}

impl TypeRule {
    /// Create an empty rule
    pub fn new() -> Self {
        Self::default()
    }

    /// Attribute allow-list, if one is set
    pub fn valid_attributes(&self) -> Option<&IndexSet<String>> {
        self.valid_attributes.as_ref()
    }

    /// Whether keys not named by the rule are suppressed
    pub fn include_named_only(&self) -> bool {
        self.include_named_only
    }

    /// Declared elements in order
    pub fn ordered_elements(&self) -> &[ElementRule] {
        &self.ordered_elements
    }

    /// Set the suppression flag
    pub fn with_include_named_only(mut self, include_named_only: bool) -> Self {
        self.include_named_only = include_named_only;
        self
    }

    /// Set the attribute allow-list
    pub fn with_valid_attributes<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.valid_attributes = Some(names.into_iter().map(Into::into).collect());
        self
    }

    /// Append a declared element
    pub fn with_element(mut self, name: impl Into<String>, sub_type: Option<&str>) -> Self {
        self.ordered_elements.push(ElementRule::new(name, sub_type));
        self
    }

    fn from_json_map(type_name: &str, map: &Map<String, JsonValue>) -> Result<Self> {
        let mut rule = TypeRule::new();

        match map.get(INCLUDE_NAMED_ONLY_KEY) {
            None | Some(JsonValue::Null) => {}
            Some(JsonValue::Bool(flag)) => rule.include_named_only = *flag,
            Some(other) => {
                return Err(Error::Schema(format!(
                    "{}.{} must be a boolean, found {}",
                    type_name, INCLUDE_NAMED_ONLY_KEY, other
                )))
            }
        }

        match map.get(VALID_ATTRIBUTES_KEY) {
            None | Some(JsonValue::Null) => {}
            Some(JsonValue::Array(names)) => {
                let mut allowed = IndexSet::new();
                for name in names {
                    let name = name.as_str().ok_or_else(|| {
                        Error::Schema(format!(
                            "{}.{} must only contain strings",
                            type_name, VALID_ATTRIBUTES_KEY
                        ))
                    })?;
                    allowed.insert(name.to_string());
                }
                rule.valid_attributes = Some(allowed);
            }
            Some(_) => {
                return Err(Error::Schema(format!(
                    "{}.{} must be an array of strings",
                    type_name, VALID_ATTRIBUTES_KEY
                )))
            }
        }

        // Declared elements live under "0", "1", ... and end at the first gap
        let mut index = 0usize;
        while let Some(entry) = map.get(&index.to_string()) {
            rule.ordered_elements
                .push(element_from_json(type_name, index, entry)?);
            index += 1;
        }

        Ok(rule)
    }
}

fn element_from_json(type_name: &str, index: usize, entry: &JsonValue) -> Result<ElementRule> {
    let entry = entry.as_object().ok_or_else(|| {
        Error::Schema(format!("{}.{} must be an object", type_name, index))
    })?;

    let name = entry
        .get(ELEMENT_NAME_KEY)
        .and_then(JsonValue::as_str)
        .ok_or_else(|| {
            Error::Schema(format!(
                "{}.{} needs a string {}",
                type_name, index, ELEMENT_NAME_KEY
            ))
        })?;

    let sub_type = match entry.get(ELEMENT_TYPE_KEY) {
        None | Some(JsonValue::Null) => None,
        Some(JsonValue::String(s)) => Some(s.as_str()),
        Some(other) => {
            return Err(Error::Schema(format!(
                "{}.{}.{} must be a string or null, found {}",
                type_name, index, ELEMENT_TYPE_KEY, other
            )))
        }
    };

    Ok(ElementRule::new(name, sub_type))
}

/// Type name to rule mapping
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Schema {
    types: IndexMap<String, TypeRule>,
}

impl Schema {
    /// Create an empty schema
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a type rule
    pub fn with_type(mut self, name: impl Into<String>, rule: TypeRule) -> Self {
        self.types.insert(name.into(), rule);
        self
    }

    /// Look up the rule for a type
    pub fn get(&self, type_name: &str) -> Option<&TypeRule> {
        self.types.get(type_name)
    }

    /// Iterate over types in declaration order
    pub fn types(&self) -> impl Iterator<Item = (&str, &TypeRule)> {
        self.types.iter().map(|(name, rule)| (name.as_str(), rule))
    }

    /// Number of declared types
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Whether no types are declared
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Read a schema from a parsed JSON document
    pub fn from_json_value(value: &JsonValue) -> Result<Self> {
        let map = value
            .as_object()
            .ok_or_else(|| Error::Schema("schema must be a JSON object".to_string()))?;

        let mut schema = Schema::new();
        for (type_name, rule) in map {
            let rule = rule.as_object().ok_or_else(|| {
                Error::Schema(format!("type '{}' must be an object", type_name))
            })?;
            schema
                .types
                .insert(type_name.clone(), TypeRule::from_json_map(type_name, rule)?);
        }
        Ok(schema)
    }

    /// Read a schema from JSON text
    pub fn from_json_str(text: &str) -> Result<Self> {
        let value: JsonValue = serde_json::from_str(text)?;
        Self::from_json_value(&value)
    }

    /// Read a schema from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }
}

impl<'de> Deserialize<'de> for Schema {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let value = JsonValue::deserialize(deserializer)?;
        Schema::from_json_value(&value).map_err(serde::de::Error::custom)
    }
}
