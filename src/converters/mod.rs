//! Value to XML conversion
//!
//! [`Renderer`] turns a [`Value`] into an XML document. The work is split in two:
//!
//! - traversal decides which keys of an object are visited and in what order,
//!   honouring the schema rule of the active type;
//! - mapping turns one key/value pair into an attribute, text, an element, a run
//!   of repeated elements or a nested subtree.
//!
//! Elements are built locally and attached to their parent only once their final
//! shape is known, so nothing is ever attached and then removed again.

mod mapper;
mod traversal;

use std::fmt;

use crate::config::{PartialConfig, RenderConfig};
use crate::error::{Error, Result};
use crate::inflection::{singularize, SingularizeFn};
use crate::limits::Limits;
use crate::tree::{write_document, WriteOptions, XmlNode};
use crate::values::Value;

/// Renders values as XML documents under one configuration
#[derive(Clone)]
pub struct Renderer {
    config: RenderConfig,
    limits: Limits,
    singularize: SingularizeFn,
}

impl fmt::Debug for Renderer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Renderer")
            .field("config", &self.config)
            .field("limits", &self.limits)
            .finish_non_exhaustive()
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer {
    /// Create a renderer with the default configuration
    pub fn new() -> Self {
        Self::with_config(RenderConfig::default())
    }

    /// Create with configuration
    pub fn with_config(config: RenderConfig) -> Self {
        Self {
            config,
            limits: Limits::default(),
            singularize,
        }
    }

    /// Set rendering limits
    pub fn with_limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }

    /// Replace the function used to singularize array entry names
    pub fn with_singularizer(mut self, singularize: SingularizeFn) -> Self {
        self.singularize = singularize;
        self
    }

    /// Get the configuration
    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Overlay a partial configuration onto the current one
    pub fn configure(&mut self, partial: PartialConfig) {
        self.config = std::mem::take(&mut self.config).merge(partial);
    }

    /// Render a value under the configured root element, without a schema type
    pub fn render(&self, value: &Value) -> Result<String> {
        self.render_as(value, None, None)
    }

    /// Render a value with an optional schema type and root element override
    pub fn render_as(
        &self,
        value: &Value,
        type_name: Option<&str>,
        root_element: Option<&str>,
    ) -> Result<String> {
        let root = self.build_tree(value, type_name, root_element)?;
        let options = WriteOptions {
            declaration: self.config.manifest(),
            indent: self.config.indent(),
        };
        write_document(&root, &options)
    }

    /// Build the element tree for a value without serializing it
    pub fn build_tree(
        &self,
        value: &Value,
        type_name: Option<&str>,
        root_element: Option<&str>,
    ) -> Result<XmlNode> {
        let root_name = root_element.unwrap_or_else(|| self.config.root_element());
        let mut root = XmlNode::new(root_name);
        let walker = self.walker();

        match value {
            Value::Object(_) | Value::Array(_) => {
                walker.traverse(&mut root, value, type_name, 0)?;
            }
            Value::Null | Value::Undefined => {}
            Value::Unsupported(label) => {
                return Err(Error::UnknownDataType {
                    key: root_name.to_string(),
                    type_label: label.clone(),
                })
            }
            scalar => {
                if let Some(text) = walker.scalar_text(root_name, scalar)? {
                    root.set_text(text);
                }
            }
        }

        Ok(root)
    }

    fn walker(&self) -> Walker<'_> {
        Walker {
            config: &self.config,
            limits: &self.limits,
            singularize: self.singularize,
        }
    }
}

/// Render a value with the default configuration
pub fn to_xml(value: &Value) -> Result<String> {
    Renderer::new().render(value)
}

/// State shared by one render pass
struct Walker<'a> {
    config: &'a RenderConfig,
    limits: &'a Limits,
    singularize: SingularizeFn,
}

impl Walker<'_> {
    /// Keys starting with the marker character are attributes, when enabled
    fn is_attribute(&self, key: &str) -> bool {
        self.config.underscore_attributes()
            && crate::names::has_attribute_marker(key, self.config.underscore_char())
    }
}
