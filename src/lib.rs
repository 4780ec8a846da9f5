//! # xmlrender
//!
//! Render arbitrary data values as XML documents.
//!
//! A [`Value`] (objects, arrays, scalars, dates, null and undefined) is mapped onto
//! an element tree under a set of shaping rules, then written out as text.
//!
//! ## Features
//!
//! - Marker-prefixed keys (`_id`) become attributes, `_` alone becomes text
//! - Arrays render as wrapped, singularized entries or as unwrapped siblings
//! - Dates in ISO, SQL or JS style
//! - A local schema that orders keys, suppresses unnamed ones and filters attributes
//! - Configuration overlays and schemas read from JSON
//!
//! ## Example
//!
//! ```rust
//! use serde_json::json;
//! use xmlrender::{Renderer, Value};
//!
//! let value = Value::from(json!({"_id": "7", "name": "x"}));
//! let xml = Renderer::new().render(&value)?;
//! assert_eq!(xml, "<response id=\"7\">\n    <name>x</name>\n</response>");
//! # Ok::<(), xmlrender::Error>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

// Foundation
pub mod error;
pub mod limits;
pub mod names;

// Data model
pub mod config;
pub mod schema;
pub mod values;

// Output
pub mod inflection;
pub mod tree;

// Rendering
pub mod converters;

// Re-exports for convenience
pub use config::{DateFormat, PartialConfig, RenderConfig};
pub use converters::{to_xml, Renderer};
pub use error::{Error, Result};
pub use schema::{ElementRule, Schema, TypeRule};
pub use tree::{write_document, WriteOptions, XmlNode};
pub use values::Value;

/// Version of the xmlrender library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
