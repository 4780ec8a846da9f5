//! Mapping a single key/value pair onto the tree

use std::borrow::Cow;

use chrono::{DateTime, FixedOffset, Utc};
use indexmap::IndexSet;

use crate::config::DateFormat;
use crate::error::{Error, Result};
use crate::names::{is_numeric_key, strip_first_char};
use crate::tree::XmlNode;
use crate::values::Value;

use super::Walker;

/// Attribute allow-list of the active schema type
type AllowList<'s> = Option<&'s IndexSet<String>>;

impl Walker<'_> {
    /// Emit `object[key]` into `parent`; a missing key is a no-op
    pub(super) fn map_key(
        &self,
        key: &str,
        parent: &mut XmlNode,
        object: &Value,
        type_name: Option<&str>,
        valid_attributes: AllowList<'_>,
        depth: usize,
    ) -> Result<()> {
        let Some(child) = object.get(key) else {
            return Ok(());
        };

        let key = self.normalize_key(key);
        if self.is_attribute(key) {
            return self.map_attribute(key, child, parent, valid_attributes);
        }

        let mut element = XmlNode::new(key);

        // Predates array and date handling; only reachable with both flags off
        if self.config.legacy_flattening() && child.is_object_like() {
            self.flatten_legacy(&mut element, child, type_name, depth)?;
            parent.push_child(element);
            return Ok(());
        }

        match child {
            Value::Null => element.set_text(""),
            Value::Date(date) => element.set_text(self.format_date(key, date)?),
            Value::Array(items) => {
                return self.map_array(key, element, items, parent, type_name, depth);
            }
            Value::Object(_) => self.traverse(&mut element, child, type_name, depth + 1)?,
            Value::Bool(_) | Value::Number(_) | Value::String(_) => {
                if let Some(text) = child.primitive_text() {
                    element.set_text(text);
                }
            }
            Value::Undefined => {
                log::trace!("dropping undefined '{}'", key);
                return Ok(());
            }
            Value::Unsupported(label) => {
                return Err(Error::UnknownDataType {
                    key: key.to_string(),
                    type_label: label.clone(),
                });
            }
        }

        parent.push_child(element);
        Ok(())
    }

    /// Text for booleans, numbers, strings and dates; `None` for everything else
    pub(super) fn scalar_text(&self, key: &str, value: &Value) -> Result<Option<String>> {
        match value {
            Value::Date(date) => self.format_date(key, date).map(Some),
            Value::Unsupported(label) => Err(Error::UnknownDataType {
                key: key.to_string(),
                type_label: label.clone(),
            }),
            other => Ok(other.primitive_text().map(Cow::into_owned)),
        }
    }

    fn normalize_key<'k>(&'k self, key: &'k str) -> &'k str {
        if is_numeric_key(key) {
            self.config.bare_item_container()
        } else {
            key
        }
    }

    fn is_text_marker(&self, key: &str) -> bool {
        let mut chars = key.chars();
        chars.next() == Some(self.config.underscore_char()) && chars.next().is_none()
    }

    fn map_attribute(
        &self,
        key: &str,
        child: &Value,
        parent: &mut XmlNode,
        valid_attributes: AllowList<'_>,
    ) -> Result<()> {
        match child {
            Value::Bool(_) | Value::Number(_) | Value::String(_) | Value::Date(_) => {
                let text = self.scalar_text(key, child)?.unwrap_or_default();
                if self.is_text_marker(key) {
                    parent.set_text(text);
                } else {
                    self.set_attribute(parent, strip_first_char(key), text, valid_attributes);
                }
            }
            // One marker key can carry a whole set of attributes
            Value::Object(entries) => {
                for (name, value) in entries {
                    if let Some(text) = self.scalar_text(name, value)? {
                        self.set_attribute(parent, name, text, valid_attributes);
                    }
                }
            }
            Value::Unsupported(label) => {
                return Err(Error::UnknownDataType {
                    key: key.to_string(),
                    type_label: label.clone(),
                });
            }
            Value::Null | Value::Undefined | Value::Array(_) => {
                log::trace!("ignoring {} attribute value for '{}'", child.type_label(), key);
            }
        }
        Ok(())
    }

    fn set_attribute(
        &self,
        node: &mut XmlNode,
        name: &str,
        value: String,
        valid_attributes: AllowList<'_>,
    ) {
        if valid_attributes.is_some_and(|allowed| !allowed.contains(name)) {
            log::debug!("attribute '{}' is not in the allow-list", name);
            return;
        }
        node.set_attribute(name, value);
    }

    fn format_date(&self, key: &str, date: &DateTime<FixedOffset>) -> Result<String> {
        let text = match self.config.date_format() {
            DateFormat::Iso => date
                .with_timezone(&Utc)
                .format("%Y-%m-%dT%H:%M:%S%.3fZ")
                .to_string(),
            DateFormat::Sql => date.format("%Y-%m-%d %H:%M:%S").to_string(),
            DateFormat::Js => date.format("%a %b %d %Y %H:%M:%S GMT%z").to_string(),
            DateFormat::Other(name) => {
                return Err(Error::UnknownDateFormat {
                    key: key.to_string(),
                    format: name.clone(),
                })
            }
        };
        Ok(text)
    }

    fn map_array(
        &self,
        key: &str,
        mut wrapper: XmlNode,
        items: &[Value],
        parent: &mut XmlNode,
        type_name: Option<&str>,
        depth: usize,
    ) -> Result<()> {
        let unwrapped = self.config.unwrapped_arrays();
        let entry_name = if unwrapped && !self.config.singularize_children() {
            key.to_string()
        } else {
            (self.singularize)(key)
        };

        for item in items {
            if matches!(item, Value::Undefined) {
                continue;
            }

            let mut entry = XmlNode::new(entry_name.as_str());
            if item.is_enumerable() {
                self.traverse(&mut entry, item, type_name, depth + 1)?;
            } else if let Some(text) = self.scalar_text(key, item)? {
                entry.set_text(text);
            }

            if unwrapped {
                parent.push_child(entry);
            } else {
                wrapper.push_child(entry);
            }
        }

        // Unwrapped entries went straight to the parent; the wrapper is not needed
        if !unwrapped {
            parent.push_child(wrapper);
        }
        Ok(())
    }

    fn flatten_legacy(
        &self,
        element: &mut XmlNode,
        child: &Value,
        type_name: Option<&str>,
        depth: usize,
    ) -> Result<()> {
        let mut current = element;
        let mut chain = 0usize;
        for (inner_key, inner) in child.entries() {
            if inner.is_object_like() {
                self.traverse(current, inner, type_name, depth + 1 + chain)?;
            } else if let Some(text) = self.scalar_text(&inner_key, inner)? {
                // Each scalar nests under the previous one, so the chain counts as depth
                chain += 1;
                self.limits.check_depth(depth + chain)?;
                current = current.push_child(XmlNode::new(inner_key.into_owned()).with_text(text));
            }
        }
        Ok(())
    }
}
