//! Key ordering and inclusion
//!
//! With an active schema type, the keys the type declares are visited first, in
//! declared order and with their declared sub-types. The remaining keys follow in
//! object order. A type marked `IncludeNamedElementsOnly` suppresses those remaining
//! keys, except attributes, as long as at least one declared key was present.

use std::collections::HashSet;

use crate::error::Result;
use crate::schema::TypeRule;
use crate::tree::XmlNode;
use crate::values::Value;

use super::Walker;

impl Walker<'_> {
    /// Populate `node` from the keys of `object` under the active `type_name`
    pub(super) fn traverse(
        &self,
        node: &mut XmlNode,
        object: &Value,
        type_name: Option<&str>,
        depth: usize,
    ) -> Result<()> {
        if !object.is_enumerable() {
            return Ok(());
        }
        self.limits.check_depth(depth)?;

        let keys = object.keys();
        let mut valid_attributes = None;
        let mut include_named_only = false;
        let mut included_count = 0usize;
        let mut consumed: HashSet<&str> = HashSet::new();

        if let Some(rule) = self.type_rule(type_name) {
            valid_attributes = rule.valid_attributes();
            include_named_only = rule.include_named_only();

            for element in rule.ordered_elements() {
                if object.get(element.name()).is_some_and(Value::is_present) {
                    included_count += 1;
                }
                self.map_key(
                    element.name(),
                    node,
                    object,
                    element.sub_type(),
                    valid_attributes,
                    depth,
                )?;
                consumed.insert(element.name());
            }
        }

        // A rule that matched nothing does not apply
        let suppress_unnamed = include_named_only && included_count >= 1;

        for key in keys.iter().filter(|key| !consumed.contains::<str>(key)) {
            if suppress_unnamed && !self.is_attribute(key) {
                log::trace!("suppressing '{}' not named by the schema", key);
                continue;
            }
            self.map_key(key, node, object, type_name, valid_attributes, depth)?;
        }

        Ok(())
    }

    fn type_rule(&self, type_name: Option<&str>) -> Option<&TypeRule> {
        let schema = self.config.schema()?;
        let type_name = type_name?;
        let rule = schema.get(type_name);
        if rule.is_none() {
            log::debug!("schema has no rule for type '{}'", type_name);
        }
        rule
    }
}

#[cfg(test)]
mod tests {
    use crate::config::RenderConfig;
    use crate::converters::Renderer;
    use crate::schema::{Schema, TypeRule};
    use crate::tree::XmlNode;
    use crate::values::Value;
    use serde_json::json;

    fn tags(node: &XmlNode) -> Vec<&str> {
        node.children().iter().map(XmlNode::tag).collect()
    }

    fn renderer(schema: Schema) -> Renderer {
        Renderer::with_config(RenderConfig::new().with_schema(Some(schema)))
    }

    #[test]
    fn test_object_order_without_schema() {
        let tree = Renderer::new()
            .build_tree(&Value::from(json!({"b": 1, "a": 2, "c": 3})), None, None)
            .unwrap();
        assert_eq!(tags(&tree), vec!["b", "a", "c"]);
    }

    #[test]
    fn test_schema_order_comes_first() {
        let schema = Schema::new().with_type(
            "t",
            TypeRule::new()
                .with_element("c", None)
                .with_element("a", None),
        );
        let tree = renderer(schema)
            .build_tree(&Value::from(json!({"a": 1, "b": 2, "c": 3})), Some("t"), None)
            .unwrap();
        assert_eq!(tags(&tree), vec!["c", "a", "b"]);
    }

    #[test]
    fn test_declared_but_missing_element_is_skipped() {
        let schema = Schema::new().with_type(
            "t",
            TypeRule::new()
                .with_element("missing", None)
                .with_element("a", None),
        );
        let tree = renderer(schema)
            .build_tree(&Value::from(json!({"a": 1})), Some("t"), None)
            .unwrap();
        assert_eq!(tags(&tree), vec!["a"]);
    }

    #[test]
    fn test_unknown_type_falls_back() {
        let schema = Schema::new().with_type(
            "t",
            TypeRule::new()
                .with_include_named_only(true)
                .with_element("a", None),
        );
        let tree = renderer(schema)
            .build_tree(&Value::from(json!({"x": 1, "a": 2})), Some("nope"), None)
            .unwrap();
        assert_eq!(tags(&tree), vec!["x", "a"]);
    }

    #[test]
    fn test_named_only_suppresses_unnamed_keys() {
        let schema = Schema::new().with_type(
            "t",
            TypeRule::new()
                .with_include_named_only(true)
                .with_element("a", None),
        );
        let tree = renderer(schema)
            .build_tree(
                &Value::from(json!({"x": 1, "_id": "7", "a": 2})),
                Some("t"),
                None,
            )
            .unwrap();
        assert_eq!(tags(&tree), vec!["a"]);
        assert_eq!(tree.attribute("id"), Some("7"));
    }

    #[test]
    fn test_named_only_without_matches_emits_everything() {
        let schema = Schema::new().with_type(
            "t",
            TypeRule::new()
                .with_include_named_only(true)
                .with_element("a", None),
        );
        let tree = renderer(schema)
            .build_tree(&Value::from(json!({"x": 1, "y": 2})), Some("t"), None)
            .unwrap();
        assert_eq!(tags(&tree), vec!["x", "y"]);
    }

    #[test]
    fn test_null_declared_key_does_not_count_as_match() {
        let schema = Schema::new().with_type(
            "t",
            TypeRule::new()
                .with_include_named_only(true)
                .with_element("a", None),
        );
        let tree = renderer(schema)
            .build_tree(&Value::from(json!({"a": null, "x": 1})), Some("t"), None)
            .unwrap();
        assert_eq!(tags(&tree), vec!["a", "x"]);
    }

    #[test]
    fn test_sub_type_applies_to_declared_child() {
        let schema = Schema::new()
            .with_type("outer", TypeRule::new().with_element("inner", Some("inner")))
            .with_type(
                "inner",
                TypeRule::new()
                    .with_include_named_only(true)
                    .with_element("keep", None),
            );
        let tree = renderer(schema)
            .build_tree(
                &Value::from(json!({"inner": {"drop": 1, "keep": 2}})),
                Some("outer"),
                None,
            )
            .unwrap();
        let inner = tree.child("inner").unwrap();
        assert_eq!(tags(inner), vec!["keep"]);
    }

    #[test]
    fn test_type_passes_through_undeclared_objects() {
        let schema = Schema::new().with_type(
            "t",
            TypeRule::new()
                .with_include_named_only(true)
                .with_element("keep", None),
        );
        // "wrap" is visited with the same type, so its own keys obey the rule
        let tree = renderer(schema)
            .build_tree(
                &Value::from(json!({"wrap": {"drop": 1, "keep": 2}})),
                Some("t"),
                None,
            )
            .unwrap();
        let wrap = tree.child("wrap").unwrap();
        assert_eq!(tags(wrap), vec!["keep"]);
    }
}
