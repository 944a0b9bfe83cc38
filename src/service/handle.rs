//! Python handle types for the Python-Rust boundary
//!
//! `RuleTree` keeps a parsed tree in Rust heap memory so Python can walk
//! and evaluate it without serializing it first.

use std::sync::Arc;

use pyo3::prelude::*;
use pyo3::types::PyDict;

use super::{RuleEngine, RULE_FIELD};
use crate::config::{deserialize_attributes, deserialize_engine_config, EngineConfig};
use crate::rule::{evaluate, Branch, NodeKind, RuleNode, RuleView};

// ============================================================================
// RuleTree PyClass
// ============================================================================

/// Read-only view of a rule AST
///
/// Child handles share the parsed tree; no subtree is ever copied.
#[pyclass(frozen)]
#[derive(Clone)]
pub struct RuleTree {
    view: RuleView,
}

impl RuleTree {
    pub fn new(node: RuleNode) -> Self {
        Self {
            view: RuleView::new(node),
        }
    }

    pub fn node(&self) -> &RuleNode {
        self.view.node()
    }

    fn child(&self, branch: Branch) -> Option<RuleTree> {
        self.view.child(branch).map(|view| RuleTree { view })
    }
}

impl From<Arc<RuleNode>> for RuleTree {
    fn from(node: Arc<RuleNode>) -> Self {
        Self {
            view: RuleView::from(node),
        }
    }
}

#[pymethods]
impl RuleTree {
    /// "AND", "OR" or "OPERAND"
    #[getter]
    fn kind(&self) -> &'static str {
        match self.node().kind() {
            NodeKind::And => "AND",
            NodeKind::Or => "OR",
            NodeKind::Operand => "OPERAND",
        }
    }

    #[getter]
    fn clause(&self) -> Option<String> {
        self.node().clause().map(str::to_string)
    }

    #[getter]
    fn left(&self) -> Option<RuleTree> {
        self.child(Branch::Left)
    }

    #[getter]
    fn right(&self) -> Option<RuleTree> {
        self.child(Branch::Right)
    }

    #[getter]
    fn depth_tag(&self) -> u32 {
        self.node().depth_tag()
    }

    fn to_json(&self) -> PyResult<String> {
        Ok(self.node().to_json()?)
    }

    /// Evaluate against a dict of attribute name -> int | str
    fn evaluate(&self, data: &Bound<'_, PyDict>) -> PyResult<bool> {
        let attributes = deserialize_attributes(data, &[])?;
        Ok(evaluate(self.node(), &attributes)?)
    }

    fn __repr__(&self) -> String {
        format!("RuleTree({})", self.node())
    }
}

// ============================================================================
// RuleEngine PyClass
// ============================================================================

/// Python wrapper around [`RuleEngine`]
#[pyclass(frozen, name = "RuleEngine")]
pub struct PyRuleEngine {
    engine: RuleEngine,
}

#[pymethods]
impl PyRuleEngine {
    /// Create an engine; `config` may set `default_connective` and `cache_capacity`
    #[new]
    #[pyo3(signature = (config=None))]
    fn py_new(config: Option<&Bound<'_, PyDict>>) -> PyResult<Self> {
        let config = match config {
            Some(dict) => deserialize_engine_config(dict)?,
            None => EngineConfig::default(),
        };
        Ok(Self {
            engine: RuleEngine::new(config),
        })
    }

    fn create_rule(&self, rule: &str) -> PyResult<RuleTree> {
        Ok(RuleTree::new(self.engine.create_rule(rule)?))
    }

    /// Parse through the engine cache; repeated text shares one tree
    fn cached_rule(&self, rule: &str) -> PyResult<RuleTree> {
        Ok(RuleTree::from(self.engine.cached_rule(rule)?))
    }

    #[pyo3(signature = (rules, operator=None))]
    fn combine_rules(&self, rules: Vec<String>, operator: Option<String>) -> PyResult<RuleTree> {
        let tree = self.engine.combine_rules(&rules, operator.as_deref())?;
        Ok(RuleTree::new(tree))
    }

    fn evaluate(&self, tree: &RuleTree, data: &Bound<'_, PyDict>) -> PyResult<bool> {
        let attributes = deserialize_attributes(data, &[])?;
        Ok(self.engine.evaluate(tree.node(), &attributes)?)
    }

    /// Evaluate rule text; a `rule` key in `data` is not treated as an attribute
    fn evaluate_rule(&self, rule: &str, data: &Bound<'_, PyDict>) -> PyResult<bool> {
        let attributes = deserialize_attributes(data, &[RULE_FIELD])?;
        Ok(self.engine.evaluate_rule(rule, &attributes)?)
    }

    #[getter]
    fn cache_size(&self) -> usize {
        self.engine.cache().len()
    }

    fn clear_cache(&self) {
        self.engine.cache().clear();
    }
}
