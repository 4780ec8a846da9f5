//! Render configuration
//!
//! [`RenderConfig`] is fixed for the duration of a render. [`PartialConfig`] is
//! the overlay form: only the fields it carries replace the current values.

use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::schema::Schema;

/// How date values are written
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DateFormat {
    /// `YYYY-MM-DDTHH:MM:SS.mmmZ`, in UTC
    #[default]
    Iso,
    /// `YYYY-MM-DD HH:MM:SS`, in the value's own offset
    Sql,
    /// `Www Mmm DD YYYY HH:MM:SS GMT+hhmm`
    Js,
    /// Any other name; rendering a date with it is an error
    Other(String),
}

impl DateFormat {
    /// The configured name
    pub fn name(&self) -> &str {
        match self {
            DateFormat::Iso => "ISO",
            DateFormat::Sql => "SQL",
            DateFormat::Js => "JS",
            DateFormat::Other(name) => name,
        }
    }
}

impl FromStr for DateFormat {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(match s {
            "ISO" => DateFormat::Iso,
            "SQL" => DateFormat::Sql,
            "JS" => DateFormat::Js,
            other => DateFormat::Other(other.to_string()),
        })
    }
}

impl From<String> for DateFormat {
    fn from(s: String) -> Self {
        match s.parse() {
            Ok(format) => format,
            Err(never) => match never {},
        }
    }
}

impl fmt::Display for DateFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl<'de> Deserialize<'de> for DateFormat {
    fn deserialize<D: serde::Deserializer<'de>>(
        deserializer: D,
    ) -> std::result::Result<Self, D::Error> {
        String::deserialize(deserializer).map(DateFormat::from)
    }
}

/// Configuration for rendering
#[derive(Debug, Clone, PartialEq)]
pub struct RenderConfig {
    /// Name array entries after the singular form of the array's key
    singularize_children: bool,
    /// Treat keys starting with `underscore_char` as attributes
    underscore_attributes: bool,
    /// Attribute marker character
    underscore_char: char,
    /// Root element name
    root_element: String,
    /// Date output format
    date_format: DateFormat,
    /// Emit an XML declaration
    manifest: bool,
    /// Write array entries as siblings instead of inside a wrapper element
    unwrapped_arrays: bool,
    /// Optional shaping schema
    schema: Option<Schema>,
    /// Indentation width for XML output
    indent: usize,
    /// Element name used in place of numeric keys
    bare_item_container: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            singularize_children: true,
            underscore_attributes: true,
            underscore_char: '_',
            root_element: "response".to_string(),
            date_format: DateFormat::Iso,
            manifest: false,
            unwrapped_arrays: false,
            schema: None,
            indent: 4,
            bare_item_container: "Item".to_string(),
        }
    }
}

impl RenderConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if array entry names are singularized
    pub fn singularize_children(&self) -> bool {
        self.singularize_children
    }

    /// Check if underscore keys become attributes
    pub fn underscore_attributes(&self) -> bool {
        self.underscore_attributes
    }

    /// Get the attribute marker character
    pub fn underscore_char(&self) -> char {
        self.underscore_char
    }

    /// Get the root element name
    pub fn root_element(&self) -> &str {
        &self.root_element
    }

    /// Get the date format
    pub fn date_format(&self) -> &DateFormat {
        &self.date_format
    }

    /// Check if an XML declaration is written
    pub fn manifest(&self) -> bool {
        self.manifest
    }

    /// Check if arrays are unwrapped
    pub fn unwrapped_arrays(&self) -> bool {
        self.unwrapped_arrays
    }

    /// Get the schema
    pub fn schema(&self) -> Option<&Schema> {
        self.schema.as_ref()
    }

    /// Get indentation width
    pub fn indent(&self) -> usize {
        self.indent
    }

    /// Get the element name used for numeric keys
    pub fn bare_item_container(&self) -> &str {
        &self.bare_item_container
    }

    /// Whether the flattening mode that predates array handling is active
    pub fn legacy_flattening(&self) -> bool {
        !self.singularize_children && !self.unwrapped_arrays
    }

    /// Set singularization of array entry names
    pub fn with_singularize_children(mut self, singularize: bool) -> Self {
        self.singularize_children = singularize;
        self
    }

    /// Set attribute detection for underscore keys
    pub fn with_underscore_attributes(mut self, enabled: bool) -> Self {
        self.underscore_attributes = enabled;
        self
    }

    /// Set the attribute marker character
    pub fn with_underscore_char(mut self, marker: char) -> Self {
        self.underscore_char = marker;
        self
    }

    /// Set the root element name
    pub fn with_root_element(mut self, name: impl Into<String>) -> Self {
        self.root_element = name.into();
        self
    }

    /// Set the date format
    pub fn with_date_format(mut self, format: DateFormat) -> Self {
        self.date_format = format;
        self
    }

    /// Set XML declaration output
    pub fn with_manifest(mut self, manifest: bool) -> Self {
        self.manifest = manifest;
        self
    }

    /// Set array unwrapping
    pub fn with_unwrapped_arrays(mut self, unwrapped: bool) -> Self {
        self.unwrapped_arrays = unwrapped;
        self
    }

    /// Set the schema
    pub fn with_schema(mut self, schema: Option<Schema>) -> Self {
        self.schema = schema;
        self
    }

    /// Set indentation
    pub fn with_indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }

    /// Set the element name used for numeric keys
    pub fn with_bare_item_container(mut self, name: impl Into<String>) -> Self {
        self.bare_item_container = name.into();
        self
    }

    /// Overlay the fields present in `partial`, keeping the rest
    pub fn merge(mut self, partial: PartialConfig) -> Self {
        let PartialConfig {
            singularize_children,
            underscore_attributes,
            underscore_char,
            root_element,
            date_format,
            manifest,
            unwrapped_arrays,
            schema,
            indent,
            bare_item_container,
        } = partial;

        if let Some(v) = singularize_children {
            self.singularize_children = v;
        }
        if let Some(v) = underscore_attributes {
            self.underscore_attributes = v;
        }
        if let Some(v) = underscore_char {
            self.underscore_char = v;
        }
        if let Some(v) = root_element {
            self.root_element = v;
        }
        if let Some(v) = date_format {
            self.date_format = v;
        }
        if let Some(v) = manifest {
            self.manifest = v;
        }
        if let Some(v) = unwrapped_arrays {
            self.unwrapped_arrays = v;
        }
        if let Some(v) = schema {
            self.schema = v;
        }
        if let Some(v) = indent {
            self.indent = v;
        }
        if let Some(v) = bare_item_container {
            self.bare_item_container = v;
        }
        self
    }
}

/// Configuration overlay; absent fields leave the current value untouched
///
/// Field names follow the camelCase keys of JSON configuration files.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PartialConfig {
    /// Name array entries after the singular form of the array's key
    pub singularize_children: Option<bool>,
    /// Treat marker-prefixed keys as attributes
    pub underscore_attributes: Option<bool>,
    /// Attribute marker character
    pub underscore_char: Option<char>,
    /// Root element name
    pub root_element: Option<String>,
    /// Date output format
    pub date_format: Option<DateFormat>,
    /// Emit an XML declaration
    pub manifest: Option<bool>,
    /// Write array entries as siblings
    pub unwrapped_arrays: Option<bool>,
    /// Shaping schema; `Some(None)` (a JSON `null`) removes the current one
    #[serde(default, deserialize_with = "present_or_null")]
    pub schema: Option<Option<Schema>>,
    /// Indentation width
    pub indent: Option<usize>,
    /// Element name used in place of numeric keys
    pub bare_item_container: Option<String>,
}

// Distinguishes an explicit `null` from a missing key, which `default` covers
fn present_or_null<'de, D, T>(deserializer: D) -> std::result::Result<Option<Option<T>>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

impl PartialConfig {
    /// Create an empty overlay
    pub fn new() -> Self {
        Self::default()
    }

    /// Read an overlay from JSON text
    pub fn from_json_str(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|e| Error::Config(e.to_string()))
    }

    /// Read an overlay from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }
}
