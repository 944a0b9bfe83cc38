//! Caller-owned rule engine facade

use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use crate::attribute::{attribute_from_json, Attributes};
use crate::config::EngineConfig;
use crate::error::{Result, RuleError};
use crate::rule::{combine_rules, evaluate, parse, RuleCache, RuleNode};

/// Field of an evaluation payload that carries the rule text
pub const RULE_FIELD: &str = "rule";

/// Rule engine: configuration plus a parse cache.
///
/// Holds no global state; every caller owns its engine. Shared use across
/// threads only goes through the cache lock.
#[derive(Debug)]
pub struct RuleEngine {
    config: EngineConfig,
    cache: RuleCache,
}

impl RuleEngine {
    pub fn new(config: EngineConfig) -> Self {
        let cache = RuleCache::new(config.cache_capacity);
        Self { config, cache }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn cache(&self) -> &RuleCache {
        &self.cache
    }

    /// Parse a rule into a fresh tree
    pub fn create_rule(&self, rule: &str) -> Result<RuleNode> {
        parse(rule)
    }

    /// Parse and left-fold several rules; a missing or blank connective
    /// falls back to the configured default
    pub fn combine_rules<S>(&self, rules: &[S], connective: Option<&str>) -> Result<RuleNode>
    where
        S: AsRef<str>,
    {
        let connective = self.config.resolve_connective(connective)?;
        debug!(count = rules.len(), %connective, "combining rules");
        combine_rules(rules, connective)
    }

    pub fn evaluate(&self, node: &RuleNode, attributes: &Attributes) -> Result<bool> {
        evaluate(node, attributes)
    }

    /// Parse a rule through the cache; the same text yields the same shared tree
    pub fn cached_rule(&self, rule: &str) -> Result<Arc<RuleNode>> {
        self.cache.get_or_parse(rule)
    }

    /// Evaluate rule text, reusing a cached tree when the same text was seen
    pub fn evaluate_rule(&self, rule: &str, attributes: &Attributes) -> Result<bool> {
        let ast = self.cached_rule(rule)?;
        evaluate(&ast, attributes)
    }

    /// Evaluate a JSON request of the form
    /// `{"rule": "age > 30", "age": 35, ...}`: every field except `rule`
    /// is an attribute.
    pub fn evaluate_payload(&self, payload: &str) -> Result<bool> {
        let value: Value = serde_json::from_str(payload)?;
        let object = value.as_object().ok_or_else(|| {
            RuleError::Serialization("evaluation payload must be a JSON object".to_string())
        })?;

        let rule = object
            .get(RULE_FIELD)
            .and_then(Value::as_str)
            .ok_or_else(|| RuleError::Serialization("payload has no \"rule\" string".to_string()))?;

        let mut attributes = Attributes::with_capacity(object.len());
        for (name, raw) in object.iter().filter(|(name, _)| name.as_str() != RULE_FIELD) {
            attributes.insert(name.clone(), attribute_from_json(name, raw)?);
        }

        self.evaluate_rule(rule, &attributes)
    }
}

impl Default for RuleEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attribute::AttributeValue;
    use crate::rule::{Branch, Connective, NodeKind, RuleView};

    fn employee() -> Attributes {
        let mut attrs = Attributes::new();
        attrs.insert("age".to_string(), AttributeValue::Integer(35));
        attrs.insert("department".to_string(), AttributeValue::Text("Sales".to_string()));
        attrs
    }

    #[test]
    fn test_create_and_evaluate() {
        let engine = RuleEngine::default();
        let ast = engine.create_rule("age > 30 AND department = 'Sales'").unwrap();
        assert_eq!(ast.kind(), NodeKind::And);
        assert!(engine.evaluate(&ast, &employee()).unwrap());
    }

    #[test]
    fn test_combine_uses_default_connective() {
        let engine = RuleEngine::default();
        let tree = engine.combine_rules(&["age > 30", "age < 50"], None).unwrap();
        assert_eq!(tree.connective(), Some(Connective::And));

        let tree = engine.combine_rules(&["age > 30", "age < 50"], Some("")).unwrap();
        assert_eq!(tree.connective(), Some(Connective::And));

        let engine = RuleEngine::new(EngineConfig {
            default_connective: Connective::Or,
            ..EngineConfig::default()
        });
        let tree = engine.combine_rules(&["age > 30", "age < 50"], None).unwrap();
        assert_eq!(tree.connective(), Some(Connective::Or));
    }

    #[test]
    fn test_combine_explicit_connective() {
        let engine = RuleEngine::default();
        let tree = engine.combine_rules(&["age > 40", "department = 'Sales'"], Some("or")).unwrap();
        assert_eq!(tree.connective(), Some(Connective::Or));
        assert!(engine.evaluate(&tree, &employee()).unwrap());

        assert_eq!(
            engine.combine_rules(&["age > 40"], Some("XOR")),
            Err(RuleError::UnknownConnective("XOR".to_string()))
        );
    }

    #[test]
    fn test_evaluate_rule_uses_cache() {
        let engine = RuleEngine::default();
        assert!(engine.evaluate_rule("age > 30", &employee()).unwrap());
        assert!(engine.evaluate_rule("age > 30", &employee()).unwrap());
        assert_eq!(engine.cache().len(), 1);
    }

    #[test]
    fn test_cached_rule_shares_tree() {
        let engine = RuleEngine::default();
        let first = engine.cached_rule("age > 30 OR age < 10").unwrap();
        let second = engine.cached_rule("age > 30 OR age < 10").unwrap();
        assert!(Arc::ptr_eq(&first, &second));

        let view = RuleView::from(first);
        let right = view.child(Branch::Right).unwrap();
        assert_eq!(right.node().clause(), Some("age < 10"));
        assert!(Arc::ptr_eq(right.root(), &second));
    }

    #[test]
    fn test_evaluate_payload() {
        let engine = RuleEngine::default();
        let payload = r#"{"rule": "age > 30 AND department = 'Sales'", "age": 35, "department": "Sales"}"#;
        assert_eq!(engine.evaluate_payload(payload), Ok(true));

        let payload = r#"{"rule": "age > 30", "age": 25}"#;
        assert_eq!(engine.evaluate_payload(payload), Ok(false));
    }

    #[test]
    fn test_evaluate_payload_errors() {
        let engine = RuleEngine::default();
        assert_eq!(
            engine.evaluate_payload(r#"{"rule": "age > 30"}"#),
            Err(RuleError::MissingAttribute("age".to_string()))
        );
        assert!(matches!(
            engine.evaluate_payload(r#"{"age": 30}"#),
            Err(RuleError::Serialization(_))
        ));
        assert!(matches!(
            engine.evaluate_payload("[1]"),
            Err(RuleError::Serialization(_))
        ));
        assert_eq!(
            engine.evaluate_payload(r#"{"rule": "age > 30", "age": 30.5}"#),
            Err(RuleError::InvalidAttribute("age".to_string()))
        );
    }
}
