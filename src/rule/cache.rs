//! Rule parsing cache - owned by the caller, keyed by the raw rule string

use std::sync::Arc;

use ahash::AHashMap;
use parking_lot::RwLock;
use tracing::{debug, trace};

use crate::attribute::Attributes;
use crate::error::Result;
use crate::rule::ast::RuleNode;
use crate::rule::evaluator::evaluate;
use crate::rule::parser;

/// Default number of distinct rule strings kept
pub const DEFAULT_CACHE_CAPACITY: usize = 2048;

/// Parsed-rule cache with fast hashing (ahash).
///
/// Cached trees are shared behind `Arc` and never mutated.
#[derive(Debug)]
pub struct RuleCache {
    entries: RwLock<AHashMap<String, Arc<RuleNode>>>,
    capacity: usize,
}

impl RuleCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: RwLock::new(AHashMap::with_capacity(capacity.min(DEFAULT_CACHE_CAPACITY))),
            capacity,
        }
    }

    /// Get or parse a rule string, using the cache for repeated rules.
    ///
    /// Once `capacity` entries are held, new rules are parsed but not stored.
    pub fn get_or_parse(&self, rule: &str) -> Result<Arc<RuleNode>> {
        // Fast path: check read lock first
        {
            let entries = self.entries.read();
            if let Some(ast) = entries.get(rule) {
                trace!(rule, "rule cache hit");
                return Ok(Arc::clone(ast));
            }
        }

        // Slow path: parse and cache
        let ast = Arc::new(parser::parse(rule)?);

        let mut entries = self.entries.write();
        if entries.len() < self.capacity {
            entries.insert(rule.to_string(), Arc::clone(&ast));
            debug!(rule, cached = entries.len(), "rule cache miss");
        } else {
            debug!(rule, capacity = self.capacity, "rule cache full, not storing");
        }

        Ok(ast)
    }

    /// Evaluate a rule string against attributes, using the cached AST
    pub fn check_rule(&self, rule: &str, attributes: &Attributes) -> Result<bool> {
        let ast = self.get_or_parse(rule)?;
        evaluate(&ast, attributes)
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&self) {
        self.entries.write().clear();
    }
}

impl Default for RuleCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_CAPACITY)
    }
}
