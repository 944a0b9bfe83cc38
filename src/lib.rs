//! Rule AST Core - boolean rule parsing and evaluation
//!
//! Turns rule strings such as `age > 30 AND (department = 'Sales' OR
//! salary > 50000)` into an AST, folds several rules into one tree, and
//! evaluates trees against a record of integer or string attributes.
//! Python bindings are available behind the `python` feature.

pub mod attribute;
pub mod config;
pub mod error;
pub mod rule;
pub mod service;

pub use crate::attribute::{AttributeValue, Attributes};
pub use crate::error::{Result, RuleError};
pub use crate::rule::{Connective, NodeKind, RuleNode};
pub use crate::service::RuleEngine;

/// Parse a rule string into a depth-tagged AST
pub fn parse_rule(rule: &str) -> Result<RuleNode> {
    rule::parse(rule)
}

/// Parse each rule string and left-fold the trees with `connective`
pub fn combine_rules<S: AsRef<str>>(rules: &[S], connective: Connective) -> Result<RuleNode> {
    rule::combine_rules(rules, connective)
}

/// Evaluate an AST against attribute values
pub fn evaluate_rule(ast: &RuleNode, attributes: &Attributes) -> Result<bool> {
    rule::evaluate(ast, attributes)
}

#[cfg(feature = "python")]
mod python {
    use pyo3::prelude::*;
    use pyo3::types::PyDict;

    use crate::config::{deserialize_attributes, EngineConfig};
    use crate::rule::RuleNode;
    use crate::service::{PyRuleEngine, RuleTree, RULE_FIELD};

    // ========================================================================
    // Python Functions
    // ========================================================================

    /// Parse a rule string into a RuleTree
    ///
    /// # Raises
    /// ValueError if the rule does not form a single tree
    #[pyfunction]
    fn parse_rule(rule: &str) -> PyResult<RuleTree> {
        Ok(RuleTree::new(crate::parse_rule(rule)?))
    }

    /// Combine several rule strings into one tree
    ///
    /// # Arguments
    /// * `rules` - Rule strings, folded left to right
    /// * `operator` - "AND" or "OR" (default: "AND")
    #[pyfunction]
    #[pyo3(signature = (rules, operator=None))]
    fn combine_rules(rules: Vec<String>, operator: Option<String>) -> PyResult<RuleTree> {
        let connective = EngineConfig::default().resolve_connective(operator.as_deref())?;
        Ok(RuleTree::new(crate::combine_rules(&rules, connective)?))
    }

    /// Evaluate a RuleTree against a dict of attributes
    ///
    /// # Raises
    /// KeyError if an attribute used by the rule is missing
    #[pyfunction]
    fn evaluate_rule(tree: &RuleTree, data: &Bound<'_, PyDict>) -> PyResult<bool> {
        let attributes = deserialize_attributes(data, &[])?;
        Ok(crate::evaluate_rule(tree.node(), &attributes)?)
    }

    /// Parse and evaluate in one call; a "rule" key in `data` is ignored
    #[pyfunction]
    fn evaluate_rule_text(rule: &str, data: &Bound<'_, PyDict>) -> PyResult<bool> {
        let attributes = deserialize_attributes(data, &[RULE_FIELD])?;
        let ast = crate::parse_rule(rule)?;
        Ok(crate::evaluate_rule(&ast, &attributes)?)
    }

    /// Rebuild a RuleTree from its JSON form
    #[pyfunction]
    fn rule_from_json(json: &str) -> PyResult<RuleTree> {
        Ok(RuleTree::new(RuleNode::from_json(json)?))
    }

    // ========================================================================
    // Python Module Definition
    // ========================================================================

    /// Python module definition
    #[pymodule]
    fn rule_ast_core(m: &Bound<'_, PyModule>) -> PyResult<()> {
        m.add_function(wrap_pyfunction!(parse_rule, m)?)?;
        m.add_function(wrap_pyfunction!(combine_rules, m)?)?;
        m.add_function(wrap_pyfunction!(evaluate_rule, m)?)?;
        m.add_function(wrap_pyfunction!(evaluate_rule_text, m)?)?;
        m.add_function(wrap_pyfunction!(rule_from_json, m)?)?;
        m.add_class::<RuleTree>()?;
        m.add_class::<PyRuleEngine>()?;
        Ok(())
    }
}
